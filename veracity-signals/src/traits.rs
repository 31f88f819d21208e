//! Common interface for signal evaluators

use veracity_core::{
    EngineError, ProductAggregate, ReviewHistoryEntry, ReviewSubmission, SignalKind,
    SignalReport, SkippedCheck, UserProfile,
};

/// Sentiment of the review text, read once per evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum SentimentReading {
    Polarity(f64),
    /// The oracle failed and the caller chose to degrade
    Unavailable(String),
}

impl SentimentReading {
    pub fn polarity(&self) -> Option<f64> {
        match self {
            SentimentReading::Polarity(p) => Some(*p),
            SentimentReading::Unavailable(_) => None,
        }
    }
}

/// Everything an evaluator may look at, already fetched and immutable
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub profile: &'a UserProfile,
    pub submission: &'a ReviewSubmission,
    pub product: &'a ProductAggregate,
    pub history: &'a [ReviewHistoryEntry],
    pub sentiment: &'a SentimentReading,
}

/// One independent fraud signal
pub trait Evaluator: Send + Sync {
    /// Which signal this evaluator decides
    fn kind(&self) -> SignalKind;

    /// Decide the signal; not firing is `Ok`, never an error
    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<SignalReport, EngineError>;

    /// Check left out of this evaluation because sentiment was unavailable
    fn skipped_check(&self, _ctx: &EvaluationContext<'_>) -> Option<SkippedCheck> {
        None
    }
}
