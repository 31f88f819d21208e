//! Rating vs sentiment evaluator
//!
//! A direct boolean gate: a high rating with negative text, or a low rating
//! with positive text.

use tracing::debug;
use veracity_core::{EngineError, SentimentMismatchConfig, SignalKind, SignalReport, SkippedCheck};

use crate::{EvaluationContext, Evaluator};

/// Whether the text's polarity contradicts the star rating
pub fn sentiment_contradicts_rating(
    rating: f64,
    polarity: f64,
    config: &SentimentMismatchConfig,
) -> bool {
    (rating >= config.high_rating && polarity < 0.0)
        || (rating <= config.low_rating && polarity > 0.0)
}

pub struct SentimentMismatchEvaluator {
    config: SentimentMismatchConfig,
}

impl SentimentMismatchEvaluator {
    pub fn new(config: SentimentMismatchConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for SentimentMismatchEvaluator {
    fn kind(&self) -> SignalKind {
        SignalKind::SentimentMismatch
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<SignalReport, EngineError> {
        let Some(polarity) = ctx.sentiment.polarity() else {
            debug!("Sentiment unavailable, mismatch not evaluated");
            return Ok(SignalReport::not_evaluated(self.kind()));
        };

        let fired = sentiment_contradicts_rating(ctx.submission.rating, polarity, &self.config);
        debug!(
            "Rating {} vs polarity {:.2} (fired: {})",
            ctx.submission.rating, polarity, fired
        );

        Ok(SignalReport::evaluated(self.kind(), fired, self.config.penalty).with_value(polarity))
    }

    fn skipped_check(&self, ctx: &EvaluationContext<'_>) -> Option<SkippedCheck> {
        ctx.sentiment
            .polarity()
            .is_none()
            .then_some(SkippedCheck::SentimentMismatch)
    }
}
