//! Per-mention point contribution, persisted as `score_impact`.

use trustrank_core::{MentionLabel, Severity};

const DRAMA_BASE_IMPACT: f64 = -15.0;
const GOOD_ACTION_BASE_IMPACT: f64 = 10.0;
const SENTIMENT_IMPACT_WEIGHT: f64 = 5.0;

/// Signed impact of a single mention.
///
/// The label sets the base (scaled by severity, `MEDIUM` when absent) and the
/// sentiment nudges it. A missing or non-finite sentiment adds nothing.
#[must_use]
pub fn mention_impact(
    label: MentionLabel,
    severity: Option<Severity>,
    sentiment: Option<f64>,
) -> f64 {
    let multiplier = severity.unwrap_or_default().multiplier();
    let base = match label {
        MentionLabel::Drama => DRAMA_BASE_IMPACT * multiplier,
        MentionLabel::GoodAction => GOOD_ACTION_BASE_IMPACT * multiplier,
        MentionLabel::Neutral => 0.0,
    };
    let nudge = sentiment
        .filter(|s| s.is_finite())
        .map_or(0.0, |s| s * SENTIMENT_IMPACT_WEIGHT);
    base + nudge
}
