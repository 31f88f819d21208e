//! Assessor - fetches engine inputs from collaborators and scores a review

use std::sync::Arc;

use tracing::info;

use veracity_core::{Collaborator, EngineError, ReviewSubmission, ScoreResult};

use crate::{
    fetch_product, fetch_profile, Engine, InMemoryStore, ProductCatalog, ProfileSource,
    ReviewHistorySource,
};

/// Scores submissions using live collaborator lookups
pub struct Assessor {
    engine: Engine,
    profiles: Arc<dyn ProfileSource>,
    catalog: Arc<dyn ProductCatalog>,
    history: Arc<dyn ReviewHistorySource>,
}

impl Assessor {
    pub fn new(
        engine: Engine,
        profiles: Arc<dyn ProfileSource>,
        catalog: Arc<dyn ProductCatalog>,
        history: Arc<dyn ReviewHistorySource>,
    ) -> Self {
        Self {
            engine,
            profiles,
            catalog,
            history,
        }
    }

    /// Use one store for every collaborator
    pub fn with_store(engine: Engine, store: Arc<InMemoryStore>) -> Self {
        Self::new(engine, store.clone(), store.clone(), store)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Fetch profile, product snapshot and recent history, then evaluate
    pub fn assess(&self, submission: &ReviewSubmission) -> Result<ScoreResult, EngineError> {
        submission.validate()?;

        let profile = fetch_profile(self.profiles.as_ref(), &submission.author_id)?;
        let product = fetch_product(self.catalog.as_ref(), &submission.product_id)?;

        let window_secs = self.engine.config().burst.window_secs;
        let history = self
            .history
            .recent_reviews_by_author(&submission.author_id, window_secs, submission.submitted_at)
            .map_err(|e| EngineError::unavailable(Collaborator::HistoryStore, e.to_string()))?;

        let result = self
            .engine
            .evaluate(&profile, submission, &product, &history)?;

        info!(
            "Assessed review by {} on {}: {} ({}%)",
            submission.author_id, submission.product_id, result.label, result.confidence
        );
        Ok(result)
    }
}
