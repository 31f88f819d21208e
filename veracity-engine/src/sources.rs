//! Narrow interfaces to the collaborators that own engine inputs
//!
//! Profiles, catalog snapshots and the submission log live outside the
//! engine. Keeping them behind these traits lets the engine run without any
//! storage dependency.

use chrono::{DateTime, Utc};
use thiserror::Error;

use veracity_core::{Collaborator, EngineError, ProductAggregate, ReviewHistoryEntry, UserProfile};

/// Errors from a collaborator lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Author reputation lookup
pub trait ProfileSource: Send + Sync {
    fn user_profile(&self, author_id: &str) -> Result<UserProfile, StoreError>;
}

/// Product aggregate lookup
pub trait ProductCatalog: Send + Sync {
    fn average_rating(&self, product_id: &str) -> Result<ProductAggregate, StoreError>;
}

/// Submission log lookup
pub trait ReviewHistorySource: Send + Sync {
    /// The author's entries inside `window_secs` before `now`
    ///
    /// Rows whose timestamp cannot be read are skipped, unless none of the
    /// author's rows can be read; then those rows are returned as-is so the
    /// burst detector can report the history as unreadable.
    fn recent_reviews_by_author(
        &self,
        author_id: &str,
        window_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewHistoryEntry>, StoreError>;
}

/// Look up an author, mapping store failures onto engine errors
pub fn fetch_profile(
    source: &dyn ProfileSource,
    author_id: &str,
) -> Result<UserProfile, EngineError> {
    source.user_profile(author_id).map_err(|e| match e {
        StoreError::NotFound(_) => EngineError::UserNotFound(author_id.to_string()),
        StoreError::Unavailable(reason) => {
            EngineError::unavailable(Collaborator::ProfileSource, reason)
        }
    })
}

/// Look up a product snapshot, mapping store failures onto engine errors
pub fn fetch_product(
    catalog: &dyn ProductCatalog,
    product_id: &str,
) -> Result<ProductAggregate, EngineError> {
    catalog.average_rating(product_id).map_err(|e| match e {
        StoreError::NotFound(_) => EngineError::ProductNotFound(product_id.to_string()),
        StoreError::Unavailable(reason) => {
            EngineError::unavailable(Collaborator::ProductCatalog, reason)
        }
    })
}
