//! Sentiment oracle abstraction
//!
//! Polarity is an external, possibly approximate NLP primitive. The engine
//! only relies on the contract: a value in [-1.0, 1.0] for a text span.

use std::sync::Arc;

use thiserror::Error;

/// Sentiment oracle errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OracleError {
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),

    #[error("Polarity {0} is outside [-1, 1]")]
    InvalidPolarity(f64),

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(String),
}

/// Text polarity provider
pub trait SentimentOracle: Send + Sync {
    /// Polarity of `text`, from -1.0 (negative) to 1.0 (positive)
    fn polarity(&self, text: &str) -> Result<f64, OracleError>;

    /// Name used in logs
    fn name(&self) -> &str;
}

/// Thread-safe reference to a sentiment oracle
pub type SharedOracle = Arc<dyn SentimentOracle>;

/// Ask the oracle and hold it to its range contract
pub fn checked_polarity(oracle: &dyn SentimentOracle, text: &str) -> Result<f64, OracleError> {
    let polarity = oracle.polarity(text)?;
    if !polarity.is_finite() || !(-1.0..=1.0).contains(&polarity) {
        return Err(OracleError::InvalidPolarity(polarity));
    }
    Ok(polarity)
}

/// Oracle that answers the same polarity for every text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPolarity(pub f64);

impl SentimentOracle for FixedPolarity {
    fn polarity(&self, _text: &str) -> Result<f64, OracleError> {
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
