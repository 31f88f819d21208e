//! Trust-from-history evaluator
//!
//! Senses: the author's profile
//! Fires: "Low user trust" when trust falls below the threshold

use tracing::debug;
use veracity_core::{clamp_score, EngineError, SignalKind, SignalReport, TrustConfig, UserProfile};

use crate::{EvaluationContext, Evaluator};

/// Reputation on a 0-100 scale
pub fn trust_score(profile: &UserProfile, config: &TrustConfig) -> i32 {
    let mut score = config.base;

    if profile.account_age_days > config.mature_account_days {
        score += config.mature_account_bonus;
    }
    if profile.total_reviews > config.active_reviewer_reviews {
        score += config.active_reviewer_bonus;
    }
    if profile.reported_reviews > 0 {
        score -= config.reported_penalty;
    }

    clamp_score(score)
}

pub struct TrustEvaluator {
    config: TrustConfig,
}

impl TrustEvaluator {
    pub fn new(config: TrustConfig) -> Self {
        Self { config }
    }
}

impl Evaluator for TrustEvaluator {
    fn kind(&self) -> SignalKind {
        SignalKind::LowTrust
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<SignalReport, EngineError> {
        let trust = trust_score(ctx.profile, &self.config);
        let fired = trust < self.config.threshold;
        debug!("Trust for {}: {} (fired: {})", ctx.submission.author_id, trust, fired);

        Ok(SignalReport::evaluated(self.kind(), fired, self.config.penalty).with_score(trust))
    }
}
