//! Submission-burst detector
//!
//! Counts the author's prior submissions inside the trailing window ending at
//! the scored submission's timestamp. The submission being scored is not in
//! the history yet and never counts toward its own burst.
//!
//! Unparsable history rows are skipped one by one; only a history where no
//! row at all can be read fails the evaluation.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use veracity_core::{BurstConfig, EngineError, ReviewHistoryEntry, SignalKind, SignalReport};

use crate::{EvaluationContext, Evaluator};

/// Prior submissions by `author_id` with `0 <= now - t < window_secs`
pub fn recent_submissions(
    author_id: &str,
    history: &[ReviewHistoryEntry],
    now: DateTime<Utc>,
    window_secs: i64,
) -> Result<usize, EngineError> {
    let window_ms = window_secs.saturating_mul(1000);
    let mut readable = 0;
    let mut recent = 0;

    for entry in history {
        let submitted_at = match entry.timestamp() {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping history entry for {}: {}", entry.author_id, e);
                continue;
            }
        };
        readable += 1;

        if entry.author_id != author_id {
            continue;
        }

        let age_ms = (now - submitted_at).num_milliseconds();
        if (0..window_ms).contains(&age_ms) {
            recent += 1;
        }
    }

    if readable == 0 && !history.is_empty() {
        return Err(EngineError::HistoryUnreadable {
            entries: history.len(),
        });
    }

    Ok(recent)
}

pub struct BurstEvaluator {
    config: BurstConfig,
}

impl BurstEvaluator {
    pub fn new(config: BurstConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for BurstEvaluator {
    fn kind(&self) -> SignalKind {
        SignalKind::SubmissionBurst
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<SignalReport, EngineError> {
        let submission = ctx.submission;
        let recent = recent_submissions(
            &submission.author_id,
            ctx.history,
            submission.submitted_at,
            self.config.window_secs,
        )?;
        let fired = recent >= self.config.max_recent;
        debug!(
            "{} prior submissions by {} in {}s (fired: {})",
            recent, submission.author_id, self.config.window_secs, fired
        );

        Ok(SignalReport::evaluated(self.kind(), fired, self.config.penalty)
            .with_value(recent as f64))
    }
}
