//! Keyword classifier for research mentions that arrive without a label.
//!
//! Mentions in the corpus are mostly French, with English slang mixed in, so
//! both appear in the keyword tables. Matching is by substring on the
//! lowercased text, which lets inflected forms ("accusé", "accusation")
//! share a stem.

use serde::Serialize;
use trustrank_core::MentionLabel;

pub(crate) const DRAMA_KEYWORDS: &[&str] = &[
    "scandale",
    "controvers",
    "polémique",
    "accus",
    "clash",
    "conflit",
    "arnaque",
    "mensonge",
    "menteur",
    "tricherie",
    "manipul",
    "plagiat",
    "insulte",
    "racis",
    "sexis",
    "harcèlement",
    "harceleur",
    "agression",
    "violence",
    "fraude",
    "plainte",
    "procès",
    "condamné",
    "boycott",
    "bad buzz",
    "dérapage",
    "drama",
    "beef",
    "cancel",
    "toxi",
    "backlash",
    "shitstorm",
    "scam",
    "lawsuit",
];

pub(crate) const GOOD_ACTION_KEYWORDS: &[&str] = &[
    "charité",
    "charitable",
    "générosité",
    "généreu",
    "solidari",
    "solidaire",
    "bénévol",
    "humanitaire",
    "entraide",
    "bienfaisance",
    "philanthrop",
    "sensibilis",
    "collecte",
    "cagnotte",
    "levée de fonds",
    "fundraising",
    "crowdfunding",
    "bonne action",
    "altruiste",
    "bienveillant",
    "inspirant",
    "exemplaire",
    "héroïque",
    "charity",
    "donation",
];

/// Result of classifying a text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Classification {
    pub label: MentionLabel,
    pub sentiment: f64,
    /// In `[0.2, 1.0]`, growing with the number of keyword hits.
    pub confidence: f64,
}

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Classify a text given an externally supplied sentiment.
///
/// Keyword hits aligned with the sentiment win first; several hits of one
/// kind win next with a weaker sentiment requirement; otherwise the majority
/// of hits decides, and a tie (including no hits) is neutral.
#[must_use]
pub fn classify_content(text: &str, sentiment: f64) -> Classification {
    let lower = text.to_lowercase();
    let drama = count_hits(&lower, DRAMA_KEYWORDS);
    let good = count_hits(&lower, GOOD_ACTION_KEYWORDS);
    let sentiment = if sentiment.is_finite() { sentiment } else { 0.0 };

    let label = if drama > 0 && sentiment < -0.1 {
        MentionLabel::Drama
    } else if good > 0 && sentiment > 0.1 {
        MentionLabel::GoodAction
    } else if drama >= 2 && sentiment <= 0.0 {
        MentionLabel::Drama
    } else if good >= 2 && sentiment >= 0.0 {
        MentionLabel::GoodAction
    } else if drama > good {
        MentionLabel::Drama
    } else if good > drama {
        MentionLabel::GoodAction
    } else {
        MentionLabel::Neutral
    };

    #[allow(clippy::cast_precision_loss)]
    let confidence = ((drama + good) as f64 / 5.0).min(1.0).max(0.2);

    Classification {
        label,
        sentiment,
        confidence,
    }
}

/// Keyword-balance sentiment in `[-1.0, 1.0]`; `0.0` when no keyword matches.
#[must_use]
pub fn keyword_sentiment(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let drama = count_hits(&lower, DRAMA_KEYWORDS);
    let good = count_hits(&lower, GOOD_ACTION_KEYWORDS);
    let total = drama + good;
    if total == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let balance = (good as f64 - drama as f64) / total as f64;
    balance
}
