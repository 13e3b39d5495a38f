//! Tunable weights for the trust-score model.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which community signal states count toward the community score.
///
/// Hidden and rejected signals never count under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCountingPolicy {
    #[default]
    VerifiedOnly,
    VerifiedAndPending,
}

impl FromStr for SignalCountingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verified_only" => Ok(Self::VerifiedOnly),
            "verified_and_pending" => Ok(Self::VerifiedAndPending),
            other => Err(format!(
                "expected 'verified_only' or 'verified_and_pending', got '{other}'"
            )),
        }
    }
}

impl std::fmt::Display for SignalCountingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VerifiedOnly => write!(f, "verified_only"),
            Self::VerifiedAndPending => write!(f, "verified_and_pending"),
        }
    }
}

/// Weights for the AI, community and combined scores.
///
/// The defaults are the canonical model; every call site reads them from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub base_score: f64,
    pub ai_drama_penalty: f64,
    pub ai_good_action_bonus: f64,
    pub ai_sentiment_weight: f64,
    /// Blend applied to the 0-100 normalized rating delta.
    pub community_rating_weight: f64,
    pub community_drama_penalty: f64,
    pub community_positive_bonus: f64,
    pub ai_weight: f64,
    pub community_weight: f64,
    pub top_mentions: usize,
    pub counting_policy: SignalCountingPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            ai_drama_penalty: 10.0,
            ai_good_action_bonus: 8.0,
            ai_sentiment_weight: 15.0,
            community_rating_weight: 0.4,
            community_drama_penalty: 5.0,
            community_positive_bonus: 4.0,
            ai_weight: 0.6,
            community_weight: 0.4,
            top_mentions: 3,
            counting_policy: SignalCountingPolicy::default(),
        }
    }
}
