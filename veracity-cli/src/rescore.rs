//! Replay stored reviews through the current engine
//!
//! Reviews are replayed in submission order; each one sees exactly the
//! reviews stored before it as history. Profiles and product averages are
//! today's snapshots, not the ones in effect when the review was written.

use tracing::warn;

use veracity_core::{
    parse_timestamp, EngineError, Label, ReviewHistoryEntry, ReviewSubmission, ScoreResult,
};
use veracity_engine::{fetch_product, fetch_profile, Engine, InMemoryStore};

/// Outcome of replaying one stored review
#[derive(Debug)]
pub struct Replayed {
    pub id: String,
    pub stored: Option<Label>,
    pub outcome: Result<ScoreResult, EngineError>,
}

impl Replayed {
    /// Whether the current verdict differs from the stored label
    pub fn changed(&self) -> bool {
        match (&self.outcome, self.stored) {
            (Ok(result), Some(stored)) => result.label != stored,
            _ => false,
        }
    }
}

pub fn replay(store: &InMemoryStore, engine: &Engine) -> Vec<Replayed> {
    let mut timeline: Vec<_> = store
        .reviews()
        .into_iter()
        .filter_map(|(id, record)| match parse_timestamp(&record.time) {
            Ok(at) => Some((at, id, record)),
            Err(e) => {
                warn!("Not replaying review {}: {}", id, e);
                None
            }
        })
        .collect();
    timeline.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

    let mut history = Vec::with_capacity(timeline.len());
    let mut replayed = Vec::with_capacity(timeline.len());

    for (at, id, record) in timeline {
        let submission = ReviewSubmission::new(
            record.user_id.clone(),
            record.product_id.clone(),
            record.rating,
            record.text.clone(),
            at,
        );
        let outcome = replay_one(store, engine, &submission, &history);

        replayed.push(Replayed {
            id,
            stored: record.result,
            outcome,
        });
        history.push(record.history_entry());
    }

    replayed
}

fn replay_one(
    store: &InMemoryStore,
    engine: &Engine,
    submission: &ReviewSubmission,
    history: &[ReviewHistoryEntry],
) -> Result<ScoreResult, EngineError> {
    let profile = fetch_profile(store, &submission.author_id)?;
    let product = fetch_product(store, &submission.product_id)?;

    engine.evaluate(&profile, submission, &product, history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use veracity_core::{ScoringConfig, UserProfile};
    use veracity_engine::{ProductRecord, ReviewRecord};
    use veracity_signals::FixedPolarity;

    fn record(user: &str, time: &str, result: Option<Label>) -> ReviewRecord {
        ReviewRecord {
            user_id: user.to_string(),
            product_id: "p001".to_string(),
            product_name: "Kettle".to_string(),
            rating: 4.0,
            text: "Heats up fast and the handle stays cool".to_string(),
            time: time.to_string(),
            result,
            score: None,
            reasons: Vec::new(),
        }
    }

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new();
        store.insert_user("u001", UserProfile::new(400, 20, 0));
        store.insert_product(
            "p001",
            ProductRecord {
                name: "Kettle".to_string(),
                average_rating: 4.0,
            },
        );
        store
    }

    #[test]
    fn test_replay_sees_only_earlier_reviews() {
        let store = store();
        // Inserted out of order on purpose; ids do not follow time.
        store.insert_review("r004", record("u001", "2024-03-01 10:30", Some(Label::Genuine)));
        store.insert_review("r001", record("u001", "2024-03-01 10:00", Some(Label::Genuine)));
        store.insert_review("r003", record("u001", "2024-03-01 10:20", Some(Label::Genuine)));
        store.insert_review("r002", record("u001", "2024-03-01 10:10", Some(Label::Genuine)));

        let engine = Engine::new(ScoringConfig::default(), Arc::new(FixedPolarity(0.1))).unwrap();
        let replayed = replay(&store, &engine);

        let ids: Vec<_> = replayed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["r001", "r002", "r003", "r004"]);

        let bursts: Vec<_> = replayed
            .iter()
            .map(|r| r.outcome.as_ref().unwrap().reasons.len())
            .collect();
        assert_eq!(bursts, vec![0, 0, 0, 1]);
        assert!(replayed.iter().all(|r| !r.changed()));
    }

    #[test]
    fn test_replay_flags_label_changes_and_errors() {
        let store = store();
        store.insert_review("r001", record("u001", "2024-03-01 10:00", Some(Label::Fake)));
        store.insert_review("r002", record("u999", "2024-03-01 10:05", Some(Label::Genuine)));
        store.insert_review("r003", record("u001", "sometime", None));

        let engine = Engine::new(ScoringConfig::default(), Arc::new(FixedPolarity(0.1))).unwrap();
        let replayed = replay(&store, &engine);

        assert_eq!(replayed.len(), 2);
        assert!(replayed[0].changed());
        assert!(matches!(
            replayed[1].outcome,
            Err(EngineError::UserNotFound(_))
        ));
    }

    #[test]
    fn test_replay_reports_missing_product() {
        let store = store();
        let mut orphan = record("u001", "2024-03-01 10:00", Some(Label::Genuine));
        orphan.product_id = "p404".to_string();
        store.insert_review("r001", orphan);

        let engine = Engine::new(ScoringConfig::default(), Arc::new(FixedPolarity(0.1))).unwrap();
        let replayed = replay(&store, &engine);

        assert!(matches!(
            replayed[0].outcome,
            Err(EngineError::ProductNotFound(ref id)) if id == "p404"
        ));
        assert!(!replayed[0].changed());
    }
}
