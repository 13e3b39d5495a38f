use trustrank_core::{CommunitySignal, Mention, ScoringConfig};

use crate::ai::{self, AiScore};
use crate::breakdown::ScoreBreakdown;
use crate::community::{self, counted_signals, CommunityScore};

/// Stateless scorer parameterized by a [`ScoringConfig`].
///
/// Every method is pure: inputs are borrowed, never mutated, and the same
/// input always yields the same output.
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// AI sub-score from the influencer's categorized mentions.
    #[must_use]
    pub fn compute_ai_score(&self, mentions: &[Mention]) -> AiScore {
        ai::compute(mentions, &self.config)
    }

    /// Community sub-score from signals already filtered to the counted set.
    #[must_use]
    pub fn compute_community_score<'a, I>(&self, signals: I) -> CommunityScore
    where
        I: IntoIterator<Item = &'a CommunitySignal>,
    {
        community::compute(signals, &self.config)
    }

    /// Blend the two axes into the headline 0-100 score.
    ///
    /// `None` means the community axis has no ratings; the AI total then
    /// stands alone rather than being averaged against a zero.
    #[must_use]
    pub fn compute_combined_score(&self, ai_total: f64, community_total: Option<f64>) -> u8 {
        let raw = match community_total {
            Some(community) => {
                ai_total * self.config.ai_weight + community * self.config.community_weight
            }
            None => ai_total,
        };
        if raw.is_nan() {
            return 0;
        }
        // f64::round rounds half away from zero.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let score = raw.round().clamp(0.0, 100.0) as u8;
        score
    }

    /// Full breakdown over a consistent snapshot of one influencer's data.
    ///
    /// `signals` must already be restricted to the counted set; see
    /// [`ScoreEngine::breakdown_for`] to apply the configured policy.
    #[must_use]
    pub fn build_breakdown<'a, I>(
        &self,
        mentions: &[Mention],
        signals: I,
        top_n: usize,
    ) -> ScoreBreakdown
    where
        I: IntoIterator<Item = &'a CommunitySignal>,
    {
        let ai = self.compute_ai_score(mentions);
        let community = self.compute_community_score(signals);
        let combined = self.compute_combined_score(ai.total, community.blendable_total());
        ScoreBreakdown::assemble(ai, community, combined, mentions, top_n)
    }

    /// Breakdown over raw signals, filtered by the configured counting policy
    /// and capped at the configured number of top mentions.
    #[must_use]
    pub fn breakdown_for(&self, mentions: &[Mention], signals: &[CommunitySignal]) -> ScoreBreakdown {
        let counted = counted_signals(signals, self.config.counting_policy);
        self.build_breakdown(mentions, counted, self.config.top_mentions)
    }
}

#[cfg(test)]
mod tests {
    use trustrank_core::{MentionLabel, SignalCountingPolicy, SignalStatus, SignalType};

    use super::*;
    use crate::test_support::{mention, signal, with_impact, with_status};
    use crate::tier::TrustLevel;

    #[test]
    fn combined_without_community_is_ai_alone() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.compute_combined_score(70.0, None), 70);
        assert_eq!(engine.compute_combined_score(70.4, None), 70);
    }

    #[test]
    fn combined_blends_sixty_forty() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.compute_combined_score(83.4, Some(61.2)), 75);
    }

    #[test]
    fn combined_zero_community_is_not_no_data() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.compute_combined_score(80.0, Some(0.0)), 48);
        assert_eq!(engine.compute_combined_score(80.0, None), 80);
    }

    #[test]
    fn combined_rounds_half_away_from_zero_and_clamps() {
        let engine = ScoreEngine::default();
        assert_eq!(engine.compute_combined_score(62.5, None), 63);
        assert_eq!(engine.compute_combined_score(150.0, None), 100);
        assert_eq!(engine.compute_combined_score(-3.0, None), 0);
        assert_eq!(engine.compute_combined_score(f64::NAN, None), 0);
    }

    #[test]
    fn breakdown_scenario_without_ratings() {
        let engine = ScoreEngine::default();
        let mentions = [
            with_impact(mention(1, Some(MentionLabel::Drama), Some(-0.5)), Some(-17.5)),
            with_impact(mention(2, Some(MentionLabel::Drama), Some(-0.8)), Some(-19.0)),
            with_impact(mention(3, Some(MentionLabel::GoodAction), Some(0.9)), Some(14.5)),
        ];
        let signals = [
            signal(1, SignalType::DramaReport, None),
            signal(2, SignalType::DramaReport, None),
            signal(3, SignalType::PositiveAction, None),
        ];

        let b = engine.build_breakdown(&mentions, &signals, 3);

        assert_eq!(b.ai_score.total, 36.0);
        assert_eq!(b.ai_score.avg_sentiment, -0.13);
        assert_eq!(b.ai_score.components.sentiment_impact, -2.0);
        assert_eq!(b.community_score.total, 44.0);
        assert!(!b.has_community_data);
        assert_eq!(b.combined_score, 36);
        assert_eq!(b.trust_level, TrustLevel::Unreliable);
        assert_eq!(
            b.top_dramas.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(b.top_positive.len(), 1);
        assert_eq!(b.skipped_records, 0);
    }

    #[test]
    fn breakdown_blends_when_ratings_exist() {
        let engine = ScoreEngine::default();
        let signals = [
            signal(1, SignalType::Rating, Some(5)),
            signal(2, SignalType::Rating, Some(4)),
        ];
        let b = engine.build_breakdown(&[], &signals, 3);
        // ai 50, community 66 -> 30 + 26.4
        assert!(b.has_community_data);
        assert_eq!(b.combined_score, 56);
    }

    #[test]
    fn breakdown_for_applies_counting_policy() {
        let signals = [
            with_status(signal(1, SignalType::Rating, Some(5)), SignalStatus::Verified),
            with_status(signal(2, SignalType::Rating, Some(1)), SignalStatus::Pending),
        ];

        let strict = ScoreEngine::default();
        let b = strict.breakdown_for(&[], &signals);
        assert_eq!(b.community_score.avg_rating, 5.0);

        let lenient = ScoreEngine::new(ScoringConfig {
            counting_policy: SignalCountingPolicy::VerifiedAndPending,
            ..ScoringConfig::default()
        });
        let b = lenient.breakdown_for(&[], &signals);
        assert_eq!(b.community_score.avg_rating, 3.0);
    }

    #[test]
    fn unmoderated_rating_does_not_move_default_score() {
        let signals = [with_status(
            signal(1, SignalType::Rating, Some(1)),
            SignalStatus::Pending,
        )];
        let b = ScoreEngine::default().breakdown_for(&[], &signals);
        assert!(!b.has_community_data);
        assert_eq!(b.combined_score, 50);
    }

    #[test]
    fn breakdown_for_uses_configured_top_cap() {
        let engine = ScoreEngine::new(ScoringConfig {
            top_mentions: 1,
            ..ScoringConfig::default()
        });
        let mentions: Vec<_> = (1..=4)
            .map(|i| mention(i, Some(MentionLabel::Drama), Some(-0.2)))
            .collect();
        let b = engine.breakdown_for(&mentions, &[]);
        assert_eq!(b.top_dramas.len(), 1);
    }

    #[test]
    fn breakdown_counts_skipped_records() {
        let engine = ScoreEngine::default();
        let mentions = [mention(1, None, Some(0.3))];
        let signals = [signal(1, SignalType::Rating, None)];
        let b = engine.build_breakdown(&mentions, &signals, 3);
        assert_eq!(b.skipped_records, 2);
    }

    #[test]
    fn breakdown_serializes_camel_case() {
        let engine = ScoreEngine::default();
        let b = engine.build_breakdown(&[], std::iter::empty(), 3);
        let json = serde_json::to_value(&b).expect("serialize breakdown");
        assert_eq!(json["aiScore"]["total"], 50.0);
        assert_eq!(json["aiScore"]["components"]["sentimentImpact"], 0.0);
        assert_eq!(json["communityScore"]["components"]["ratingImpact"], 0.0);
        assert_eq!(json["combinedScore"], 50);
        assert_eq!(json["hasCommunityData"], false);
        assert!(json["topDramas"].as_array().is_some());
        assert!(json["topPositive"].as_array().is_some());
        assert!(json["aiScore"].get("skipped").is_none());
    }

    #[test]
    fn inputs_are_not_mutated() {
        let engine = ScoreEngine::default();
        let mentions = vec![mention(1, Some(MentionLabel::Drama), Some(-0.5))];
        let signals = vec![signal(1, SignalType::Rating, Some(2))];
        let before = (mentions.clone(), signals.clone());
        let _ = engine.breakdown_for(&mentions, &signals);
        assert_eq!((mentions, signals), before);
    }
}
