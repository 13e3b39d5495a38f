//! Trust-score model for trustrank.
//!
//! Combines an AI sub-score derived from categorized mentions with a
//! community sub-score derived from user ratings and reports, blends them
//! 60/40 into a combined score, and explains the result as a breakdown.
//! Everything here is pure: no I/O, no shared state, inputs are never mutated.

pub mod ai;
pub mod breakdown;
pub mod classifier;
pub mod community;
pub mod engine;
pub mod impact;
pub mod tier;

#[cfg(test)]
pub(crate) mod test_support;

pub use ai::{AiComponents, AiScore};
pub use breakdown::{ScoreBreakdown, TopMention};
pub use classifier::{classify_content, keyword_sentiment, Classification};
pub use community::{counted_signals, CommunityComponents, CommunityScore};
pub use engine::ScoreEngine;
pub use impact::mention_impact;
pub use tier::TrustLevel;

/// Clamp a raw additive score into the displayable `[0, 100]` range.
pub(crate) fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}

/// Round to two decimals for display values.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
