//! Rating vs product population evaluator
//!
//! An outlier rating is suspicious on its own, whatever the text says.

use tracing::debug;
use veracity_core::{EngineError, RatingDeviationConfig, SignalKind, SignalReport};

use crate::{EvaluationContext, Evaluator};

pub fn rating_deviation(rating: f64, average_rating: f64) -> f64 {
    (rating - average_rating).abs()
}

pub struct RatingDeviationEvaluator {
    config: RatingDeviationConfig,
}

impl RatingDeviationEvaluator {
    pub fn new(config: RatingDeviationConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for RatingDeviationEvaluator {
    fn kind(&self) -> SignalKind {
        SignalKind::RatingDeviation
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<SignalReport, EngineError> {
        let deviation = rating_deviation(ctx.submission.rating, ctx.product.average_rating);
        let fired = deviation >= self.config.max_deviation;
        debug!(
            "Rating {} vs product average {:.2} (fired: {})",
            ctx.submission.rating, ctx.product.average_rating, fired
        );

        Ok(SignalReport::evaluated(self.kind(), fired, self.config.penalty).with_value(deviation))
    }
}
