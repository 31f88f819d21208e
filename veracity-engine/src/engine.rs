//! Aggregator
//!
//! Single pass over the evaluators in signal order. Order only fixes the
//! order of reasons; the score is a plain sum of fired penalties.

use tracing::{debug, info, warn};

use veracity_core::{
    Collaborator, EngineError, Label, OracleFailurePolicy, ProductAggregate, ReviewHistoryEntry,
    ReviewSubmission, ScoreResult, ScoringConfig, SignalReport, SkippedCheck, UserProfile,
    MAX_SCORE,
};
use veracity_signals::{
    checked_polarity, default_evaluators, EvaluationContext, Evaluator, SentimentReading,
    SharedOracle,
};

/// The review scoring engine
pub struct Engine {
    config: ScoringConfig,
    oracle: SharedOracle,
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl Engine {
    /// Create an engine from a configuration, validating it first
    pub fn new(config: ScoringConfig, oracle: SharedOracle) -> Result<Self, EngineError> {
        config.validate()?;
        let evaluators = default_evaluators(&config);
        info!(
            "Initialized {} evaluators with oracle '{}'",
            evaluators.len(),
            oracle.name()
        );

        Ok(Self {
            config,
            oracle,
            evaluators,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Score one submission against already-fetched inputs
    ///
    /// `history` may contain other authors; only the submitting author's
    /// entries count toward a burst.
    pub fn evaluate(
        &self,
        profile: &UserProfile,
        submission: &ReviewSubmission,
        product: &ProductAggregate,
        history: &[ReviewHistoryEntry],
    ) -> Result<ScoreResult, EngineError> {
        submission.validate()?;
        product.validate()?;

        let sentiment = self.read_sentiment(&submission.text)?;
        let ctx = EvaluationContext {
            profile,
            submission,
            product,
            history,
            sentiment: &sentiment,
        };

        let mut reports = Vec::with_capacity(self.evaluators.len());
        let mut skipped = Vec::new();

        for evaluator in &self.evaluators {
            let report = evaluator.evaluate(&ctx)?;
            if let Some(check) = evaluator.skipped_check(&ctx) {
                skipped.push(check);
            }
            reports.push(report);
        }

        let result = aggregate(reports, skipped, self.config.decision.fake_threshold);
        debug!(
            "Scored review by {} on {}: {} ({})",
            submission.author_id, submission.product_id, result.label, result.confidence
        );
        Ok(result)
    }

    fn read_sentiment(&self, text: &str) -> Result<SentimentReading, EngineError> {
        match checked_polarity(self.oracle.as_ref(), text) {
            Ok(polarity) => Ok(SentimentReading::Polarity(polarity)),
            Err(e) => match self.config.oracle.on_failure {
                OracleFailurePolicy::Degrade => {
                    warn!("Sentiment oracle '{}' failed, degrading: {}", self.oracle.name(), e);
                    Ok(SentimentReading::Unavailable(e.to_string()))
                }
                OracleFailurePolicy::Fail => Err(EngineError::unavailable(
                    Collaborator::SentimentOracle,
                    e.to_string(),
                )),
            },
        }
    }
}

/// Reduce signal reports to a verdict
///
/// Confidence is the clamped sum of fired penalties and the label depends
/// on confidence alone. Reasons come from the same fired reports, so a
/// reason never appears without its penalty.
pub fn aggregate(
    reports: Vec<SignalReport>,
    not_evaluated: Vec<SkippedCheck>,
    fake_threshold: u32,
) -> ScoreResult {
    let total = reports
        .iter()
        .filter(|r| r.fired)
        .fold(0u32, |acc, r| acc.saturating_add(r.penalty));
    let confidence = total.min(MAX_SCORE as u32) as u8;

    let reasons = reports
        .iter()
        .filter(|r| r.fired)
        .map(|r| r.kind.reason().to_string())
        .collect();

    ScoreResult {
        label: Label::from_confidence(confidence, fake_threshold),
        confidence,
        reasons,
        signals: reports,
        not_evaluated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use veracity_core::{SignalKind, TrustConfig};
    use veracity_signals::{FixedPolarity, OracleError, SentimentOracle};

    struct DownOracle;

    impl SentimentOracle for DownOracle {
        fn polarity(&self, _text: &str) -> Result<f64, OracleError> {
            Err(OracleError::Unavailable("503".to_string()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn engine(polarity: f64) -> Engine {
        Engine::new(ScoringConfig::default(), Arc::new(FixedPolarity(polarity))).unwrap()
    }

    fn submission(rating: f64, text: &str) -> ReviewSubmission {
        ReviewSubmission::new("u001", "p001", rating, text, now())
    }

    fn burst_history() -> Vec<ReviewHistoryEntry> {
        (1..=3)
            .map(|m| ReviewHistoryEntry::new("u001", now() - Duration::minutes(m * 10)))
            .collect()
    }

    #[test]
    fn test_short_generic_review_against_average() {
        let result = engine(0.8)
            .evaluate(
                &UserProfile::new(180, 10, 0),
                &submission(5.0, "good"),
                &ProductAggregate::new(3.0),
                &[],
            )
            .unwrap();

        assert_eq!(result.confidence, 40);
        assert_eq!(result.label, Label::Genuine);
        assert_eq!(
            result.reasons,
            vec!["Generic or short review", "Rating deviates from product average"]
        );
        assert_eq!(result.report(SignalKind::LowTrust).unwrap().score, Some(50));
        assert!(result.not_evaluated.is_empty());
    }

    #[test]
    fn test_all_signals_fire() {
        // Low trust, short, negative text on a 5-star rating far above
        // the average, and a burst of prior reviews.
        let result = engine(-0.6)
            .evaluate(
                &UserProfile::new(3, 0, 2),
                &submission(5.0, "awful"),
                &ProductAggregate::new(2.0),
                &burst_history(),
            )
            .unwrap();

        assert_eq!(result.confidence, 100);
        assert_eq!(result.label, Label::Fake);
        let expected: Vec<_> = SignalKind::ALL.iter().map(|k| k.reason()).collect();
        assert_eq!(result.reasons, expected);
        assert_eq!(result.fired().count(), 5);
    }

    #[test]
    fn test_confidence_clamps_when_penalties_exceed_scale() {
        let config = ScoringConfig {
            trust: TrustConfig {
                penalty: 30,
                ..TrustConfig::default()
            },
            ..ScoringConfig::default()
        };
        let engine = Engine::new(config, Arc::new(FixedPolarity(-0.6))).unwrap();
        let result = engine
            .evaluate(
                &UserProfile::new(3, 0, 2),
                &submission(5.0, "awful"),
                &ProductAggregate::new(2.0),
                &burst_history(),
            )
            .unwrap();

        let raw: u32 = result.signals.iter().map(|s| s.penalty).sum();
        assert_eq!(raw, 105);
        assert_eq!(result.confidence, 100);
    }

    #[test]
    fn test_clean_review_scores_zero() {
        let result = engine(0.3)
            .evaluate(
                &UserProfile::new(400, 25, 0),
                &submission(4.0, "Sturdy handle, heats evenly, a bit heavy to lift"),
                &ProductAggregate::new(4.2),
                &[],
            )
            .unwrap();

        assert_eq!(result.confidence, 0);
        assert_eq!(result.label, Label::Genuine);
        assert!(result.reasons.is_empty());
        assert_eq!(result.signals.len(), 5);
    }

    #[test]
    fn test_fake_threshold_is_inclusive() {
        // Low trust (25) + short text (20) + burst (15) = 60
        let result = engine(0.0)
            .evaluate(
                &UserProfile::new(3, 0, 1),
                &submission(4.0, "ok"),
                &ProductAggregate::new(4.0),
                &burst_history(),
            )
            .unwrap();
        assert_eq!(result.confidence, 60);
        assert!(result.is_fake());

        let config = ScoringConfig::from_toml_str("[decision]\nfake_threshold = 61").unwrap();
        let strict = Engine::new(config, Arc::new(FixedPolarity(0.0))).unwrap();
        let result = strict
            .evaluate(
                &UserProfile::new(3, 0, 1),
                &submission(4.0, "ok"),
                &ProductAggregate::new(4.0),
                &burst_history(),
            )
            .unwrap();
        assert_eq!(result.label, Label::Genuine);
    }

    #[test]
    fn test_confidence_monotonic_in_fired_signals() {
        let mut previous = 0;
        for fired in 0..=SignalKind::ALL.len() {
            let reports = SignalKind::ALL
                .iter()
                .enumerate()
                .map(|(i, kind)| SignalReport::evaluated(*kind, i < fired, 25))
                .collect();
            let result = aggregate(reports, Vec::new(), 50);
            assert!(result.confidence >= previous);
            assert!(result.confidence <= 100);
            assert_eq!(result.reasons.len(), fired);
            previous = result.confidence;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let engine = engine(0.9);
        let profile = UserProfile::new(10, 1, 0);
        let review = submission(5.0, "best best best awesome purchase");
        let product = ProductAggregate::new(4.6);
        let history = burst_history();

        let first = engine.evaluate(&profile, &review, &product, &history).unwrap();
        let second = engine.evaluate(&profile, &review, &product, &history).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_oracle_failure_degrades_with_flag() {
        let engine = Engine::new(ScoringConfig::default(), Arc::new(DownOracle)).unwrap();
        let result = engine
            .evaluate(
                &UserProfile::new(180, 10, 0),
                &submission(5.0, "good"),
                &ProductAggregate::new(3.0),
                &[],
            )
            .unwrap();

        assert_eq!(
            result.not_evaluated,
            vec![SkippedCheck::ExcessivePositivity, SkippedCheck::SentimentMismatch]
        );
        let mismatch = result.report(SignalKind::SentimentMismatch).unwrap();
        assert!(!mismatch.evaluated);
        // Without the positivity term "good" scores 30, still below 40.
        assert_eq!(result.report(SignalKind::GenericText).unwrap().score, Some(30));
        assert_eq!(result.confidence, 40);
    }

    #[test]
    fn test_oracle_failure_can_fail_evaluation() {
        let config = ScoringConfig::from_toml_str("[oracle]\non_failure = \"fail\"").unwrap();
        let engine = Engine::new(config, Arc::new(DownOracle)).unwrap();
        let err = engine
            .evaluate(
                &UserProfile::default(),
                &submission(3.0, "fine"),
                &ProductAggregate::new(3.0),
                &[],
            )
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::CollaboratorUnavailable {
                collaborator: Collaborator::SentimentOracle,
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range_polarity_is_an_oracle_failure() {
        let result = engine(1.7)
            .evaluate(
                &UserProfile::default(),
                &submission(3.0, "fine"),
                &ProductAggregate::new(3.0),
                &[],
            )
            .unwrap();
        assert_eq!(result.not_evaluated.len(), 2);
    }

    #[test]
    fn test_invalid_input_is_not_masked() {
        let engine = engine(0.0);
        let err = engine
            .evaluate(
                &UserProfile::default(),
                &submission(6.0, "fine"),
                &ProductAggregate::new(3.0),
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let err = engine
            .evaluate(
                &UserProfile::default(),
                &submission(3.0, "fine"),
                &ProductAggregate::new(7.5),
                &[],
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_unreadable_history_propagates() {
        let history = vec![ReviewHistoryEntry::from_raw("u001", "garbled")];
        let err = engine(0.0)
            .evaluate(
                &UserProfile::default(),
                &submission(3.0, "fine"),
                &ProductAggregate::new(3.0),
                &history,
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::HistoryUnreadable { entries: 1 }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ScoringConfig {
            decision: veracity_core::DecisionConfig {
                fake_threshold: 150,
            },
            ..ScoringConfig::default()
        };
        assert!(matches!(
            Engine::new(config, Arc::new(FixedPolarity(0.0))),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_concurrent_evaluations_are_independent() {
        let engine = Arc::new(engine(0.8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    let author = format!("u{:03}", i);
                    let review = ReviewSubmission::new(&author, "p001", 5.0, "good", now());
                    engine
                        .evaluate(
                            &UserProfile::new(180, 10, 0),
                            &review,
                            &ProductAggregate::new(3.0),
                            &[],
                        )
                        .unwrap()
                })
            })
            .collect();

        for handle in handles {
            let result = handle.join().unwrap();
            assert_eq!(result.confidence, 40);
        }
    }
}
