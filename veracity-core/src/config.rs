//! Scoring configuration
//!
//! Every weight and threshold is a named field. Sections are independently
//! defaulted, so a TOML file only needs to name what it overrides:
//!
//! ```toml
//! [decision]
//! fake_threshold = 60
//!
//! [burst]
//! window_secs = 1800
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{ConfigError, DEFAULT_BURST_WINDOW_SECS, DEFAULT_FAKE_THRESHOLD, MAX_SCORE};

/// Full engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    pub decision: DecisionConfig,
    pub trust: TrustConfig,
    pub text_quality: TextQualityConfig,
    pub sentiment_mismatch: SentimentMismatchConfig,
    pub rating_deviation: RatingDeviationConfig,
    pub burst: BurstConfig,
    pub oracle: OracleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecisionConfig {
    /// Confidence at or above which the label is Fake
    pub fake_threshold: u32,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            fake_threshold: DEFAULT_FAKE_THRESHOLD,
        }
    }
}

/// Trust-from-history weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrustConfig {
    pub base: i32,
    /// Accounts strictly older than this earn the maturity bonus
    pub mature_account_days: u32,
    pub mature_account_bonus: i32,
    /// Authors with strictly more reviews than this earn the activity bonus
    pub active_reviewer_reviews: u32,
    pub active_reviewer_bonus: i32,
    /// Subtracted once if the author has any reported review
    pub reported_penalty: i32,
    /// Trust strictly below this fires the signal
    pub threshold: i32,
    pub penalty: u32,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            base: 50,
            mature_account_days: 180,
            mature_account_bonus: 20,
            active_reviewer_reviews: 10,
            active_reviewer_bonus: 20,
            reported_penalty: 30,
            threshold: 40,
            penalty: 25,
        }
    }
}

/// Text-quality weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextQualityConfig {
    pub base: i32,
    /// Texts with fewer words than this are short
    pub min_words: usize,
    pub short_penalty: i32,
    /// Generic praise vocabulary, matched case-insensitively as substrings
    pub generic_words: Vec<String>,
    /// More generic occurrences than this is generic
    pub generic_limit: usize,
    pub generic_penalty: i32,
    /// Polarity strictly above this is excessively positive
    pub positivity_ceiling: f64,
    pub positivity_penalty: i32,
    /// Quality strictly below this fires the signal
    pub threshold: i32,
    pub penalty: u32,
}

impl Default for TextQualityConfig {
    fn default() -> Self {
        Self {
            base: 50,
            min_words: 5,
            short_penalty: 20,
            generic_words: ["best", "nice", "good", "awesome"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            generic_limit: 3,
            generic_penalty: 20,
            positivity_ceiling: 0.7,
            positivity_penalty: 10,
            threshold: 40,
            penalty: 20,
        }
    }
}

/// Rating vs sentiment gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SentimentMismatchConfig {
    /// Ratings at or above this expect non-negative polarity
    pub high_rating: f64,
    /// Ratings at or below this expect non-positive polarity
    pub low_rating: f64,
    pub penalty: u32,
}

impl Default for SentimentMismatchConfig {
    fn default() -> Self {
        Self {
            high_rating: 4.0,
            low_rating: 2.0,
            penalty: 20,
        }
    }
}

/// Rating vs product population gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatingDeviationConfig {
    /// Absolute distance from the product average that fires the signal
    pub max_deviation: f64,
    pub penalty: u32,
}

impl Default for RatingDeviationConfig {
    fn default() -> Self {
        Self {
            max_deviation: 2.0,
            penalty: 20,
        }
    }
}

/// Submission-burst detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BurstConfig {
    pub window_secs: i64,
    /// Prior submissions inside the window that fire the signal
    pub max_recent: usize,
    pub penalty: u32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_BURST_WINDOW_SECS,
            max_recent: 3,
            penalty: 15,
        }
    }
}

/// What to do when the sentiment oracle fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleFailurePolicy {
    /// Skip sentiment-dependent checks and flag them as not evaluated
    #[default]
    Degrade,
    /// Abort the evaluation with a collaborator error
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OracleConfig {
    pub on_failure: OracleFailurePolicy,
}

impl ScoringConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: ScoringConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.text_quality.generic_words = config
            .text_quality
            .generic_words
            .iter()
            .map(|w| w.trim().to_lowercase())
            .collect();
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded scoring config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = MAX_SCORE as u32;

        if self.decision.fake_threshold > max {
            return Err(ConfigError::invalid(
                "decision.fake_threshold",
                format!("{} exceeds {}", self.decision.fake_threshold, max),
            ));
        }

        for (field, value) in [
            ("trust.threshold", self.trust.threshold),
            ("trust.base", self.trust.base),
            ("text_quality.threshold", self.text_quality.threshold),
            ("text_quality.base", self.text_quality.base),
        ] {
            if !(0..=MAX_SCORE).contains(&value) {
                return Err(ConfigError::invalid(field, format!("{} is outside [0, 100]", value)));
            }
        }

        let tq = &self.text_quality;
        if tq.generic_words.is_empty() {
            return Err(ConfigError::invalid(
                "text_quality.generic_words",
                "vocabulary is empty",
            ));
        }
        if let Some(word) = tq
            .generic_words
            .iter()
            .find(|w| w.is_empty() || **w != w.to_lowercase())
        {
            return Err(ConfigError::invalid(
                "text_quality.generic_words",
                format!("'{}' must be a non-empty lowercase word", word),
            ));
        }
        if !(-1.0..=1.0).contains(&tq.positivity_ceiling) {
            return Err(ConfigError::invalid(
                "text_quality.positivity_ceiling",
                format!("{} is outside [-1, 1]", tq.positivity_ceiling),
            ));
        }

        let sm = &self.sentiment_mismatch;
        if sm.low_rating >= sm.high_rating {
            return Err(ConfigError::invalid(
                "sentiment_mismatch.low_rating",
                format!("{} must be below high_rating {}", sm.low_rating, sm.high_rating),
            ));
        }

        let max_deviation = self.rating_deviation.max_deviation;
        if max_deviation.is_nan() || max_deviation <= 0.0 {
            return Err(ConfigError::invalid(
                "rating_deviation.max_deviation",
                "must be positive",
            ));
        }

        if self.burst.window_secs <= 0 {
            return Err(ConfigError::invalid("burst.window_secs", "must be positive"));
        }
        if self.burst.max_recent == 0 {
            return Err(ConfigError::invalid("burst.max_recent", "must be at least 1"));
        }

        Ok(())
    }
}
