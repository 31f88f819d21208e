//! Veracity Core - data contracts for review trust scoring
//!
//! This crate provides the foundational primitives:
//! - Inputs supplied by collaborators (user profile, product aggregate, history)
//! - The review submission being scored
//! - The explainable score result and per-signal reports
//! - Tunable scoring configuration and the error taxonomy

pub mod config;
pub mod error;
pub mod model;

pub use config::*;
pub use error::*;
pub use model::*;

/// Confidence at or above which a review is labelled fake
pub const DEFAULT_FAKE_THRESHOLD: u32 = 50;

/// Upper bound of every 0-100 scale (trust, quality, confidence)
pub const MAX_SCORE: i32 = 100;

/// Lower bound of every 0-100 scale
pub const MIN_SCORE: i32 = 0;

/// Valid star rating range
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Trailing window for burst detection, in seconds
pub const DEFAULT_BURST_WINDOW_SECS: i64 = 3600;

/// Timestamp layout used by the flat-file review store
pub const FLAT_FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Clamp a raw score onto the 0-100 scale
pub fn clamp_score(raw: i32) -> i32 {
    raw.clamp(MIN_SCORE, MAX_SCORE)
}
