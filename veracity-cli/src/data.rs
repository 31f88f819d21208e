//! Flat-file data directory loading
//!
//! A data directory holds `users.json`, `products.json` and optionally
//! `reviews.json`, each a JSON object keyed by record id.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::from_str;
use tracing::debug;

use veracity_core::UserProfile;
use veracity_engine::{InMemoryStore, ProductRecord, ReviewRecord};

pub const USERS_FILE: &str = "users.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const REVIEWS_FILE: &str = "reviews.json";

/// Load every record file in `dir` into a store
pub fn load_store(dir: &Path) -> Result<InMemoryStore> {
    let users: HashMap<String, UserProfile> = read_json(&dir.join(USERS_FILE))?;
    let products: HashMap<String, ProductRecord> = read_json(&dir.join(PRODUCTS_FILE))?;

    let reviews_path = dir.join(REVIEWS_FILE);
    let reviews: BTreeMap<String, ReviewRecord> = if reviews_path.exists() {
        read_json(&reviews_path)?
    } else {
        debug!("No {} in {}, starting with empty history", REVIEWS_FILE, dir.display());
        BTreeMap::new()
    };

    Ok(InMemoryStore::from_records(users, products, reviews))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
