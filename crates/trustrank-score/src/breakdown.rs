//! Explainable view of a trust score, serialized verbatim to the mobile client.

use chrono::{DateTime, Utc};
use serde::Serialize;
use trustrank_core::{Mention, MentionLabel, Severity};

use crate::ai::AiScore;
use crate::community::CommunityScore;
use crate::round2;
use crate::tier::TrustLevel;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMention {
    pub id: i64,
    pub label: MentionLabel,
    pub text: String,
    pub source: String,
    pub source_url: Option<String>,
    /// Stored `score_impact`, or `0.0` when missing or not finite.
    pub impact: f64,
    pub severity: Severity,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub ai_score: AiScore,
    pub community_score: CommunityScore,
    pub combined_score: u8,
    pub has_community_data: bool,
    pub trust_level: TrustLevel,
    pub trust_label: &'static str,
    pub trust_color: &'static str,
    pub top_dramas: Vec<TopMention>,
    pub top_positive: Vec<TopMention>,
    /// Mentions and signals left out because they were malformed.
    pub skipped_records: usize,
}

impl ScoreBreakdown {
    pub(crate) fn assemble(
        ai: AiScore,
        community: CommunityScore,
        combined_score: u8,
        mentions: &[Mention],
        top_n: usize,
    ) -> Self {
        let level = TrustLevel::from_score(f64::from(combined_score));
        let skipped_records = ai.skipped + community.skipped;
        let has_community_data = community.has_data();

        Self {
            ai_score: rounded_ai(ai),
            community_score: rounded_community(community),
            combined_score,
            has_community_data,
            trust_level: level,
            trust_label: level.label(),
            trust_color: level.color(),
            top_dramas: top_mentions(mentions, MentionLabel::Drama, top_n),
            top_positive: top_mentions(mentions, MentionLabel::GoodAction, top_n),
            skipped_records,
        }
    }
}

fn rounded_ai(mut ai: AiScore) -> AiScore {
    ai.total = round2(ai.total);
    ai.avg_sentiment = round2(ai.avg_sentiment);
    ai.components.base = round2(ai.components.base);
    ai.components.drama_impact = round2(ai.components.drama_impact);
    ai.components.positive_impact = round2(ai.components.positive_impact);
    ai.components.sentiment_impact = round2(ai.components.sentiment_impact);
    ai
}

fn rounded_community(mut community: CommunityScore) -> CommunityScore {
    community.total = round2(community.total);
    community.avg_rating = round2(community.avg_rating);
    community.components.base = round2(community.components.base);
    community.components.rating_impact = round2(community.components.rating_impact);
    community.components.drama_impact = round2(community.components.drama_impact);
    community.components.positive_impact = round2(community.components.positive_impact);
    community
}

fn impact_of(mention: &Mention) -> f64 {
    mention
        .score_impact
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Mentions carrying `label`, strongest impact first, capped at `top_n`.
///
/// Dramas rank most negative first and good actions most positive first.
/// Ties fall back to the most recent `scraped_at`, then the lowest id.
pub(crate) fn top_mentions(
    mentions: &[Mention],
    label: MentionLabel,
    top_n: usize,
) -> Vec<TopMention> {
    let mut picked: Vec<&Mention> = mentions
        .iter()
        .filter(|m| m.label == Some(label))
        .collect();

    picked.sort_by(|a, b| {
        let by_impact = match label {
            MentionLabel::Drama => impact_of(a).total_cmp(&impact_of(b)),
            _ => impact_of(b).total_cmp(&impact_of(a)),
        };
        by_impact
            .then_with(|| b.scraped_at.cmp(&a.scraped_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    picked
        .into_iter()
        .take(top_n)
        .map(|m| TopMention {
            id: m.id,
            label,
            text: m.text_excerpt.clone(),
            source: m.source.clone(),
            source_url: m.source_url.clone(),
            impact: round2(impact_of(m)),
            severity: m.effective_severity(),
            date: m.scraped_at,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{mention, with_impact};

    fn ids(list: &[TopMention]) -> Vec<i64> {
        list.iter().map(|m| m.id).collect()
    }

    #[test]
    fn lists_only_contain_their_label() {
        let mentions = [
            with_impact(mention(1, Some(MentionLabel::Drama), None), Some(-20.0)),
            with_impact(mention(2, Some(MentionLabel::GoodAction), None), Some(12.0)),
            with_impact(mention(3, Some(MentionLabel::Neutral), None), Some(-40.0)),
            with_impact(mention(4, None, None), Some(-50.0)),
        ];
        let dramas = top_mentions(&mentions, MentionLabel::Drama, 10);
        let positives = top_mentions(&mentions, MentionLabel::GoodAction, 10);
        assert!(dramas.iter().all(|m| m.label == MentionLabel::Drama));
        assert!(positives.iter().all(|m| m.label == MentionLabel::GoodAction));
        assert_eq!(ids(&dramas), vec![1]);
        assert_eq!(ids(&positives), vec![2]);
    }

    #[test]
    fn dramas_rank_most_negative_first() {
        let mentions = [
            with_impact(mention(1, Some(MentionLabel::Drama), None), Some(-5.0)),
            with_impact(mention(2, Some(MentionLabel::Drama), None), Some(-30.0)),
            with_impact(mention(3, Some(MentionLabel::Drama), None), Some(-15.0)),
            with_impact(mention(4, Some(MentionLabel::Drama), None), Some(-1.0)),
        ];
        let dramas = top_mentions(&mentions, MentionLabel::Drama, 3);
        assert_eq!(ids(&dramas), vec![2, 3, 1]);
    }

    #[test]
    fn positives_rank_most_positive_first() {
        let mentions = [
            with_impact(mention(1, Some(MentionLabel::GoodAction), None), Some(5.0)),
            with_impact(mention(2, Some(MentionLabel::GoodAction), None), Some(20.0)),
            with_impact(mention(3, Some(MentionLabel::GoodAction), None), None),
        ];
        let positives = top_mentions(&mentions, MentionLabel::GoodAction, 3);
        assert_eq!(ids(&positives), vec![2, 1, 3]);
        assert_eq!(positives[2].impact, 0.0);
    }

    #[test]
    fn missing_and_nan_impact_rank_as_zero() {
        let mentions = [
            with_impact(mention(1, Some(MentionLabel::Drama), None), Some(f64::NAN)),
            with_impact(mention(2, Some(MentionLabel::Drama), None), Some(-3.0)),
            with_impact(mention(3, Some(MentionLabel::Drama), None), Some(2.0)),
        ];
        let dramas = top_mentions(&mentions, MentionLabel::Drama, 3);
        assert_eq!(ids(&dramas), vec![2, 1, 3]);
    }

    #[test]
    fn ties_prefer_most_recent_then_lowest_id() {
        let mut same_time = mention(7, Some(MentionLabel::Drama), None);
        same_time.scraped_at = mention(9, None, None).scraped_at;
        let mentions = [
            with_impact(mention(2, Some(MentionLabel::Drama), None), Some(-15.0)),
            with_impact(mention(9, Some(MentionLabel::Drama), None), Some(-15.0)),
            with_impact(same_time, Some(-15.0)),
            with_impact(mention(5, Some(MentionLabel::Drama), None), Some(-15.0)),
        ];
        let dramas = top_mentions(&mentions, MentionLabel::Drama, 10);
        assert_eq!(ids(&dramas), vec![7, 9, 5, 2]);
    }

    #[test]
    fn zero_cap_yields_empty_lists() {
        let mentions = [with_impact(mention(1, Some(MentionLabel::Drama), None), Some(-15.0))];
        assert!(top_mentions(&mentions, MentionLabel::Drama, 0).is_empty());
    }

    #[test]
    fn top_mention_uses_effective_severity() {
        let mentions = [mention(1, Some(MentionLabel::Drama), None)];
        let dramas = top_mentions(&mentions, MentionLabel::Drama, 1);
        assert_eq!(dramas[0].severity, Severity::Medium);
    }
}
