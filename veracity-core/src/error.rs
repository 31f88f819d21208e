//! Error taxonomy shared by the scoring crates
//!
//! A signal that does not fire is a normal result, never an error. Errors
//! here are either broken input contracts, unreachable collaborators, or
//! invalid configuration.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A submission or snapshot that breaks the engine's input contract
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("Rating {0} is outside [1, 5]")]
    RatingOutOfRange(f64),

    #[error("Rating is not a finite number")]
    NonFiniteRating,

    #[error("Review text is empty")]
    EmptyText,

    #[error("Author id is empty")]
    EmptyAuthorId,

    #[error("Product id is empty")]
    EmptyProductId,

    #[error("Product average rating {0} is outside [1, 5]")]
    ProductAverageOutOfRange(f64),
}

/// External collaborators the engine depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    SentimentOracle,
    ProfileSource,
    ProductCatalog,
    HistoryStore,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::SentimentOracle => "sentiment oracle",
            Collaborator::ProfileSource => "profile source",
            Collaborator::ProductCatalog => "product catalog",
            Collaborator::HistoryStore => "history store",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by an evaluation
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ContractViolation),

    #[error("{collaborator} unavailable: {reason}")]
    CollaboratorUnavailable {
        collaborator: Collaborator,
        reason: String,
    },

    #[error("Review history unreadable: none of {entries} entries has a valid timestamp")]
    HistoryUnreadable { entries: usize },

    #[error("Unknown user: {0}")]
    UserNotFound(String),

    #[error("Unknown product: {0}")]
    ProductNotFound(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    pub fn unavailable(collaborator: Collaborator, reason: impl Into<String>) -> Self {
        EngineError::CollaboratorUnavailable {
            collaborator,
            reason: reason.into(),
        }
    }
}

/// A single history entry whose timestamp could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized timestamp '{raw}'")]
pub struct HistoryEntryError {
    pub raw: String,
}

/// Errors loading or validating a scoring configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
