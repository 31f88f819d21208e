//! Data contracts exchanged with collaborators
//!
//! The engine reads these and never mutates them:
//! - `UserProfile` and `ProductAggregate` are snapshots owned elsewhere
//! - `ReviewSubmission` is the ephemeral review being scored
//! - `ReviewHistoryEntry` is one row of the append-only submission log
//! - `ScoreResult` is the engine's explainable output

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{ContractViolation, HistoryEntryError, MAX_RATING, MIN_RATING};

/// Reputation inputs for a review author
///
/// Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub account_age_days: u32,
    pub total_reviews: u32,
    pub reported_reviews: u32,
}

impl UserProfile {
    pub fn new(account_age_days: u32, total_reviews: u32, reported_reviews: u32) -> Self {
        Self {
            account_age_days,
            total_reviews,
            reported_reviews,
        }
    }
}

/// Catalog snapshot for the reviewed product
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductAggregate {
    pub average_rating: f64,
}

impl ProductAggregate {
    pub fn new(average_rating: f64) -> Self {
        Self { average_rating }
    }

    pub fn validate(&self) -> Result<(), ContractViolation> {
        let avg = self.average_rating;
        if !avg.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&avg) {
            return Err(ContractViolation::ProductAverageOutOfRange(avg));
        }
        Ok(())
    }
}

/// A review waiting to be scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub author_id: String,
    pub product_id: String,
    pub rating: f64,
    pub text: String,
    /// Reference point for the burst window
    pub submitted_at: DateTime<Utc>,
}

impl ReviewSubmission {
    pub fn new(
        author_id: impl Into<String>,
        product_id: impl Into<String>,
        rating: f64,
        text: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            product_id: product_id.into(),
            rating,
            text: text.into(),
            submitted_at,
        }
    }

    /// Check the submission against the input contract
    pub fn validate(&self) -> Result<(), ContractViolation> {
        if self.author_id.trim().is_empty() {
            return Err(ContractViolation::EmptyAuthorId);
        }
        if self.product_id.trim().is_empty() {
            return Err(ContractViolation::EmptyProductId);
        }
        if !self.rating.is_finite() {
            return Err(ContractViolation::NonFiniteRating);
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(ContractViolation::RatingOutOfRange(self.rating));
        }
        if self.text.trim().is_empty() {
            return Err(ContractViolation::EmptyText);
        }
        Ok(())
    }
}

/// One prior submission in the history log
///
/// The timestamp is kept as read from the store so that a single corrupt
/// row can be skipped instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewHistoryEntry {
    pub author_id: String,
    pub submitted_at: String,
}

impl ReviewHistoryEntry {
    pub fn new(author_id: impl Into<String>, submitted_at: DateTime<Utc>) -> Self {
        Self {
            author_id: author_id.into(),
            submitted_at: submitted_at.to_rfc3339(),
        }
    }

    pub fn from_raw(author_id: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            submitted_at: raw.into(),
        }
    }

    pub fn timestamp(&self) -> Result<DateTime<Utc>, HistoryEntryError> {
        parse_timestamp(&self.submitted_at)
    }
}

/// Parse a stored timestamp
///
/// Accepts RFC 3339 plus the naive `YYYY-MM-DD HH:MM[:SS]` layouts of the
/// flat-file store. The flat files were written in the host's wall-clock
/// time, so naive values are read in the local zone.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, HistoryEntryError> {
    parse_timestamp_in(raw, &Local)
}

/// Parse a stored timestamp, reading naive values in `tz`
///
/// A naive time that falls in a DST gap is unreadable; one that repeats
/// in a DST fold takes the earlier instant.
pub fn parse_timestamp_in<Tz: TimeZone>(
    raw: &str,
    tz: &Tz,
) -> Result<DateTime<Utc>, HistoryEntryError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    for layout in ["%Y-%m-%d %H:%M:%S", crate::FLAT_FILE_TIMESTAMP_FORMAT] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, layout) {
            if let Some(local) = tz.from_local_datetime(&naive).earliest() {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }

    Err(HistoryEntryError {
        raw: raw.to_string(),
    })
}

/// Final classification of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Fake,
    Genuine,
}

impl Label {
    /// Label is a pure function of confidence
    pub fn from_confidence(confidence: u8, fake_threshold: u32) -> Self {
        if u32::from(confidence) >= fake_threshold {
            Label::Fake
        } else {
            Label::Genuine
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Fake => f.write_str("Fake"),
            Label::Genuine => f.write_str("Genuine"),
        }
    }
}

/// The independent signals, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    LowTrust,
    GenericText,
    SentimentMismatch,
    RatingDeviation,
    SubmissionBurst,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::LowTrust,
        SignalKind::GenericText,
        SignalKind::SentimentMismatch,
        SignalKind::RatingDeviation,
        SignalKind::SubmissionBurst,
    ];

    /// Human-readable reason emitted when the signal fires
    pub fn reason(&self) -> &'static str {
        match self {
            SignalKind::LowTrust => "Low user trust",
            SignalKind::GenericText => "Generic or short review",
            SignalKind::SentimentMismatch => "Rating vs sentiment mismatch",
            SignalKind::RatingDeviation => "Rating deviates from product average",
            SignalKind::SubmissionBurst => "Too many reviews in short time",
        }
    }
}

/// Checks that could not run because the sentiment oracle failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkippedCheck {
    /// Polarity term of the text-quality score
    ExcessivePositivity,
    /// Rating vs sentiment gate
    SentimentMismatch,
}

/// Outcome of one evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub kind: SignalKind,
    pub evaluated: bool,
    pub fired: bool,
    /// Penalty contributed to confidence (0 unless fired)
    pub penalty: u32,
    /// Derived 0-100 score, for evaluators that compute one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    /// Measured quantity behind the decision (deviation, recent count, polarity)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl SignalReport {
    /// Report for an evaluator that ran; the penalty only applies if it fired
    pub fn evaluated(kind: SignalKind, fired: bool, penalty: u32) -> Self {
        Self {
            kind,
            evaluated: true,
            fired,
            penalty: if fired { penalty } else { 0 },
            score: None,
            value: None,
        }
    }

    pub fn not_evaluated(kind: SignalKind) -> Self {
        Self {
            kind,
            evaluated: false,
            fired: false,
            penalty: 0,
            score: None,
            value: None,
        }
    }

    pub fn with_score(mut self, score: i32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }
}

/// Explainable verdict for one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub label: Label,
    /// Sum of fired penalties, clamped to 0-100
    pub confidence: u8,
    /// Reasons of fired signals, in evaluation order
    pub reasons: Vec<String>,
    pub signals: Vec<SignalReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_evaluated: Vec<SkippedCheck>,
}

impl ScoreResult {
    pub fn is_fake(&self) -> bool {
        self.label == Label::Fake
    }

    pub fn fired(&self) -> impl Iterator<Item = SignalKind> + '_ {
        self.signals.iter().filter(|s| s.fired).map(|s| s.kind)
    }

    pub fn report(&self, kind: SignalKind) -> Option<&SignalReport> {
        self.signals.iter().find(|s| s.kind == kind)
    }
}
