//! AI sub-score from categorized mentions.

use serde::Serialize;
use trustrank_core::{Mention, MentionLabel, ScoringConfig};

use crate::clamp_score;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiComponents {
    pub base: f64,
    pub drama_impact: f64,
    pub positive_impact: f64,
    pub sentiment_impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiScore {
    /// Clamped to `[0, 100]`.
    pub total: f64,
    pub components: AiComponents,
    pub drama_count: usize,
    pub good_action_count: usize,
    pub neutral_count: usize,
    /// Mean of finite sentiment values; `0.0` when there are none.
    pub avg_sentiment: f64,
    /// Mentions skipped because they carried no usable label.
    #[serde(skip)]
    pub skipped: usize,
}

pub(crate) fn compute(mentions: &[Mention], config: &ScoringConfig) -> AiScore {
    let mut drama_count = 0usize;
    let mut good_action_count = 0usize;
    let mut neutral_count = 0usize;
    let mut skipped = 0usize;
    let mut sentiment_sum = 0.0_f64;
    let mut sentiment_n = 0usize;

    for mention in mentions {
        let Some(label) = mention.label else {
            skipped += 1;
            continue;
        };
        match label {
            MentionLabel::Drama => drama_count += 1,
            MentionLabel::GoodAction => good_action_count += 1,
            MentionLabel::Neutral => neutral_count += 1,
        }
        if let Some(sentiment) = mention.finite_sentiment() {
            sentiment_sum += sentiment;
            sentiment_n += 1;
        }
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            total = mentions.len(),
            "skipped mentions without a label while computing AI score"
        );
    }

    #[allow(clippy::cast_precision_loss)]
    let avg_sentiment = if sentiment_n == 0 {
        0.0
    } else {
        sentiment_sum / sentiment_n as f64
    };

    #[allow(clippy::cast_precision_loss)]
    let components = AiComponents {
        base: config.base_score,
        drama_impact: -config.ai_drama_penalty * drama_count as f64,
        positive_impact: config.ai_good_action_bonus * good_action_count as f64,
        sentiment_impact: avg_sentiment * config.ai_sentiment_weight,
    };

    let total = clamp_score(
        components.base
            + components.drama_impact
            + components.positive_impact
            + components.sentiment_impact,
    );

    AiScore {
        total,
        components,
        drama_count,
        good_action_count,
        neutral_count,
        avg_sentiment,
        skipped,
    }
}
