//! Shared inputs for evaluator tests

use chrono::{DateTime, TimeZone, Utc};
use veracity_core::{ProductAggregate, ReviewHistoryEntry, ReviewSubmission, UserProfile};

use crate::{EvaluationContext, SentimentReading};

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub(crate) struct Fixture {
    pub profile: UserProfile,
    pub submission: ReviewSubmission,
    pub product: ProductAggregate,
    pub history: Vec<ReviewHistoryEntry>,
    pub sentiment: SentimentReading,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            profile: UserProfile::default(),
            submission: ReviewSubmission::new(
                "u001",
                "p001",
                4.0,
                "Solid kettle that boils fast and pours cleanly",
                now(),
            ),
            product: ProductAggregate::new(4.0),
            history: Vec::new(),
            sentiment: SentimentReading::Polarity(0.2),
        }
    }

    pub fn ctx(&self) -> EvaluationContext<'_> {
        EvaluationContext {
            profile: &self.profile,
            submission: &self.submission,
            product: &self.product,
            history: &self.history,
            sentiment: &self.sentiment,
        }
    }
}
