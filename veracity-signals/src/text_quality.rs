//! Text-quality evaluator
//!
//! Short, generically worded and excessively positive text correlates with
//! templated or incentivized reviews. The three traits are weak on their own
//! and are combined additively, so no single trait dominates.
//!
//! Senses: review text, sentiment polarity
//! Fires: "Generic or short review" when quality falls below the threshold

use tracing::debug;
use veracity_core::{
    clamp_score, EngineError, SignalKind, SignalReport, SkippedCheck, TextQualityConfig,
};

use crate::{EvaluationContext, Evaluator};

/// Whitespace-separated word count
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Total case-insensitive substring occurrences of the vocabulary
///
/// Each word is counted independently, so one span may match several
/// vocabulary words ("goodbest" counts twice).
pub fn generic_occurrences(text: &str, vocabulary: &[String]) -> usize {
    let lower = text.to_lowercase();
    vocabulary
        .iter()
        .filter(|w| !w.is_empty())
        .map(|w| lower.matches(w.as_str()).count())
        .sum()
}

/// Quality on a 0-100 scale
///
/// Without a polarity the positivity term is left out.
pub fn text_quality(text: &str, polarity: Option<f64>, config: &TextQualityConfig) -> i32 {
    let mut score = config.base;

    if word_count(text) < config.min_words {
        score -= config.short_penalty;
    }
    if generic_occurrences(text, &config.generic_words) > config.generic_limit {
        score -= config.generic_penalty;
    }
    if polarity.is_some_and(|p| p > config.positivity_ceiling) {
        score -= config.positivity_penalty;
    }

    clamp_score(score)
}

pub struct TextQualityEvaluator {
    config: TextQualityConfig,
}

impl TextQualityEvaluator {
    pub fn new(config: TextQualityConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for TextQualityEvaluator {
    fn kind(&self) -> SignalKind {
        SignalKind::GenericText
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<SignalReport, EngineError> {
        let text = &ctx.submission.text;
        let quality = text_quality(text, ctx.sentiment.polarity(), &self.config);
        let fired = quality < self.config.threshold;
        debug!(
            "Text quality: {} ({} words, {} generic, fired: {})",
            quality,
            word_count(text),
            generic_occurrences(text, &self.config.generic_words),
            fired
        );

        Ok(SignalReport::evaluated(self.kind(), fired, self.config.penalty).with_score(quality))
    }

    fn skipped_check(&self, ctx: &EvaluationContext<'_>) -> Option<SkippedCheck> {
        ctx.sentiment
            .polarity()
            .is_none()
            .then_some(SkippedCheck::ExcessivePositivity)
    }
}
