//! In-memory collaborator store
//!
//! Holds users, products and assessed reviews in the shapes of the flat-file
//! records, and implements every collaborator interface over them. Reads
//! take a shared lock; `record` is the only writer. Callers racing two
//! submissions by one author must serialize around `assess` + `record`
//! themselves if they need both to see each other.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use veracity_core::{
    parse_timestamp, Label, ProductAggregate, ReviewHistoryEntry, ReviewSubmission, ScoreResult,
    UserProfile,
};

use crate::{ProductCatalog, ProfileSource, ReviewHistorySource, StoreError};

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub name: String,
    pub average_rating: f64,
}

/// A stored, assessed review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub user_id: String,
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    pub rating: f64,
    pub text: String,
    /// Submission time as stored
    pub time: String,
    #[serde(default)]
    pub result: Option<Label>,
    #[serde(default)]
    pub score: Option<u8>,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl ReviewRecord {
    pub fn history_entry(&self) -> ReviewHistoryEntry {
        ReviewHistoryEntry::from_raw(self.user_id.clone(), self.time.clone())
    }
}

/// One past the highest numeric `rNNN` id, so gaps are never refilled
fn next_review_id(reviews: &BTreeMap<String, ReviewRecord>) -> String {
    let next = reviews
        .keys()
        .filter_map(|id| id.strip_prefix('r')?.parse::<u64>().ok())
        .max()
        .map_or(1, |n| n.saturating_add(1));
    format!("r{:03}", next)
}

#[derive(Debug, Default)]
struct StoreData {
    users: HashMap<String, UserProfile>,
    products: HashMap<String, ProductRecord>,
    reviews: BTreeMap<String, ReviewRecord>,
}

/// Thread-safe store backing all collaborator lookups
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(
        users: HashMap<String, UserProfile>,
        products: HashMap<String, ProductRecord>,
        reviews: BTreeMap<String, ReviewRecord>,
    ) -> Self {
        debug!(
            "Store loaded: {} users, {} products, {} reviews",
            users.len(),
            products.len(),
            reviews.len()
        );
        Self {
            data: RwLock::new(StoreData {
                users,
                products,
                reviews,
            }),
        }
    }

    pub fn insert_user(&self, id: impl Into<String>, profile: UserProfile) {
        self.data.write().users.insert(id.into(), profile);
    }

    pub fn insert_product(&self, id: impl Into<String>, product: ProductRecord) {
        self.data.write().products.insert(id.into(), product);
    }

    pub fn insert_review(&self, id: impl Into<String>, review: ReviewRecord) {
        self.data.write().reviews.insert(id.into(), review);
    }

    /// Keep an assessed submission
    ///
    /// Appends it to the history, stores the verdict and bumps the author's
    /// review count. Returns the new review id.
    pub fn record(&self, submission: &ReviewSubmission, result: &ScoreResult) -> String {
        let mut data = self.data.write();

        let id = next_review_id(&data.reviews);
        let product_name = data
            .products
            .get(&submission.product_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();

        data.reviews.insert(
            id.clone(),
            ReviewRecord {
                user_id: submission.author_id.clone(),
                product_id: submission.product_id.clone(),
                product_name,
                rating: submission.rating,
                text: submission.text.clone(),
                time: submission.submitted_at.to_rfc3339(),
                result: Some(result.label),
                score: Some(result.confidence),
                reasons: result.reasons.clone(),
            },
        );

        if let Some(profile) = data.users.get_mut(&submission.author_id) {
            profile.total_reviews = profile.total_reviews.saturating_add(1);
        }

        debug!("Recorded review {} by {}", id, submission.author_id);
        id
    }

    pub fn review(&self, id: &str) -> Option<ReviewRecord> {
        self.data.read().reviews.get(id).cloned()
    }

    /// All reviews, ordered by id
    pub fn reviews(&self) -> Vec<(String, ReviewRecord)> {
        self.data
            .read()
            .reviews
            .iter()
            .map(|(id, r)| (id.clone(), r.clone()))
            .collect()
    }

    /// Reviews labelled Genuine, the only ones fit for public listing
    pub fn genuine_reviews(&self) -> Vec<(String, ReviewRecord)> {
        self.data
            .read()
            .reviews
            .iter()
            .filter(|(_, r)| r.result == Some(Label::Genuine))
            .map(|(id, r)| (id.clone(), r.clone()))
            .collect()
    }

    pub fn user_count(&self) -> usize {
        self.data.read().users.len()
    }

    pub fn product_count(&self) -> usize {
        self.data.read().products.len()
    }
}

impl ProfileSource for InMemoryStore {
    fn user_profile(&self, author_id: &str) -> Result<UserProfile, StoreError> {
        self.data
            .read()
            .users
            .get(author_id)
            .copied()
            .ok_or_else(|| StoreError::NotFound(author_id.to_string()))
    }
}

impl ProductCatalog for InMemoryStore {
    fn average_rating(&self, product_id: &str) -> Result<ProductAggregate, StoreError> {
        self.data
            .read()
            .products
            .get(product_id)
            .map(|p| ProductAggregate::new(p.average_rating))
            .ok_or_else(|| StoreError::NotFound(product_id.to_string()))
    }
}

impl ReviewHistorySource for InMemoryStore {
    fn recent_reviews_by_author(
        &self,
        author_id: &str,
        window_secs: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReviewHistoryEntry>, StoreError> {
        let window_ms = window_secs.saturating_mul(1000);
        let data = self.data.read();

        let mut any_readable = false;
        let mut recent = Vec::new();
        let mut unreadable = Vec::new();

        for (id, record) in data.reviews.iter().filter(|(_, r)| r.user_id == author_id) {
            match parse_timestamp(&record.time) {
                Ok(t) => {
                    any_readable = true;
                    if (0..window_ms).contains(&(now - t).num_milliseconds()) {
                        recent.push(record.history_entry());
                    }
                }
                Err(e) => {
                    warn!("Review {} has an unreadable time: {}", id, e);
                    unreadable.push(record.history_entry());
                }
            }
        }

        if any_readable {
            Ok(recent)
        } else {
            Ok(unreadable)
        }
    }
}
