//! Community sub-score from ratings and reports.

use serde::Serialize;
use trustrank_core::{CommunitySignal, ScoringConfig, SignalCountingPolicy, SignalStatus, SignalType};

use crate::clamp_score;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityComponents {
    pub base: f64,
    pub rating_impact: f64,
    pub drama_impact: f64,
    pub positive_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityScore {
    pub total: f64,
    pub components: CommunityComponents,
    pub rating_count: usize,
    /// Mean star rating on the 1-5 scale; `0.0` when nobody has rated.
    pub avg_rating: f64,
    pub drama_reports: usize,
    pub positive_reports: usize,
    #[serde(skip)]
    pub skipped: usize,
}

impl CommunityScore {
    /// Whether any rating backs this score.
    ///
    /// Without ratings the community axis is left out of the combined score
    /// instead of being blended in at its baseline.
    #[must_use]
    pub fn has_data(&self) -> bool {
        self.rating_count > 0
    }

    /// The total to blend, or `None` when there is no community data.
    #[must_use]
    pub fn blendable_total(&self) -> Option<f64> {
        self.has_data().then_some(self.total)
    }
}

/// Keep only the signals that count toward the community score.
#[must_use]
pub fn counted_signals(
    signals: &[CommunitySignal],
    policy: SignalCountingPolicy,
) -> Vec<&CommunitySignal> {
    signals
        .iter()
        .filter(|s| !s.is_hidden)
        .filter(|s| match (policy, s.status) {
            (_, SignalStatus::Verified) => true,
            (SignalCountingPolicy::VerifiedAndPending, SignalStatus::Pending) => true,
            _ => false,
        })
        .collect()
}

pub(crate) fn compute<'a, I>(signals: I, config: &ScoringConfig) -> CommunityScore
where
    I: IntoIterator<Item = &'a CommunitySignal>,
{
    let mut rating_sum = 0.0_f64;
    let mut rating_count = 0usize;
    let mut drama_reports = 0usize;
    let mut positive_reports = 0usize;
    let mut skipped = 0usize;

    for signal in signals {
        match signal.signal_type {
            SignalType::Rating => match signal.rating {
                Some(r) => {
                    rating_sum += f64::from(r);
                    rating_count += 1;
                }
                None => skipped += 1,
            },
            SignalType::DramaReport => drama_reports += 1,
            SignalType::PositiveAction => positive_reports += 1,
            SignalType::Comment => {}
        }
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            "skipped RATING signals without a rating while computing community score"
        );
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_rating = if rating_count == 0 {
        0.0
    } else {
        rating_sum / rating_count as f64
    };

    let rating_impact = if rating_count == 0 {
        0.0
    } else {
        ((avg_rating / 5.0) * 100.0 - 50.0) * config.community_rating_weight
    };

    #[allow(clippy::cast_precision_loss)]
    let components = CommunityComponents {
        base: config.base_score,
        rating_impact,
        drama_impact: -config.community_drama_penalty * drama_reports as f64,
        positive_impact: config.community_positive_bonus * positive_reports as f64,
    };

    let total = clamp_score(
        components.base
            + components.rating_impact
            + components.drama_impact
            + components.positive_impact,
    );

    CommunityScore {
        total,
        components,
        rating_count,
        avg_rating,
        drama_reports,
        positive_reports,
        skipped,
    }
}
