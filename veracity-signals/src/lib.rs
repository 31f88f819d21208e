//! Veracity Signals
//!
//! Independent evaluators, each pure given its inputs:
//! - **Trust**: reputation derived from account age and review history
//! - **Text quality**: short, generic or excessively positive wording
//! - **Sentiment mismatch**: stated sentiment contradicting the star rating
//! - **Rating deviation**: rating far from the product's population average
//! - **Burst**: too many submissions by one author in a trailing window
//!
//! Sentiment polarity comes from an external [`SentimentOracle`].

pub mod burst;
pub mod lexicon;
pub mod oracle;
pub mod rating_deviation;
pub mod sentiment_mismatch;
pub mod text_quality;
pub mod traits;
pub mod trust;

#[cfg(test)]
mod fixtures;

pub use burst::*;
pub use lexicon::*;
pub use oracle::*;
pub use rating_deviation::*;
pub use sentiment_mismatch::*;
pub use text_quality::*;
pub use traits::*;
pub use trust::*;

/// Evaluators for every signal, in evaluation order
pub fn default_evaluators(config: &veracity_core::ScoringConfig) -> Vec<Box<dyn Evaluator>> {
    vec![
        Box::new(TrustEvaluator::new(config.trust.clone())),
        Box::new(TextQualityEvaluator::new(config.text_quality.clone())),
        Box::new(SentimentMismatchEvaluator::new(config.sentiment_mismatch.clone())),
        Box::new(RatingDeviationEvaluator::new(config.rating_deviation.clone())),
        Box::new(BurstEvaluator::new(config.burst.clone())),
    ]
}
