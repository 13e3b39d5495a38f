use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Category assigned to a mention by research ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionLabel {
    Drama,
    GoodAction,
    Neutral,
}

impl MentionLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drama => "drama",
            Self::GoodAction => "good_action",
            Self::Neutral => "neutral",
        }
    }

    /// Parse a stored label. Unknown values yield `None` so callers can skip
    /// the record instead of failing the whole batch.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "drama" => Some(Self::Drama),
            "good_action" => Some(Self::GoodAction),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for MentionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Multiplier applied to a mention's base impact.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Low => 0.5,
            Self::Medium => 1.0,
            Self::High => 1.5,
            Self::Critical => 2.0,
        }
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(Self::Low),
            "MEDIUM" => Ok(Self::Medium),
            "HIGH" => Ok(Self::High),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(CoreError::UnknownSeverity(s.to_string())),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single piece of evidence about an influencer.
///
/// `label` and `sentiment_score` are optional because upstream research data
/// can be dirty; the score engine skips or excludes such values rather than
/// treating them as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    pub id: i64,
    pub influencer_id: i64,
    pub source: String,
    pub source_url: Option<String>,
    pub text_excerpt: String,
    pub sentiment_score: Option<f64>,
    pub label: Option<MentionLabel>,
    pub severity: Option<Severity>,
    pub score_impact: Option<f64>,
    pub is_verified: bool,
    pub scraped_at: DateTime<Utc>,
}

impl Mention {
    /// Sentiment if present and finite.
    #[must_use]
    pub fn finite_sentiment(&self) -> Option<f64> {
        self.sentiment_score.filter(|s| s.is_finite())
    }

    #[must_use]
    pub fn effective_severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_parse_known_values() {
        assert_eq!(MentionLabel::parse("drama"), Some(MentionLabel::Drama));
        assert_eq!(
            MentionLabel::parse("good_action"),
            Some(MentionLabel::GoodAction)
        );
        assert_eq!(MentionLabel::parse(" neutral "), Some(MentionLabel::Neutral));
    }

    #[test]
    fn label_parse_unknown_is_none() {
        assert_eq!(MentionLabel::parse(""), None);
        assert_eq!(MentionLabel::parse("scandal"), None);
    }

    #[test]
    fn label_serializes_snake_case() {
        let json = serde_json::to_string(&MentionLabel::GoodAction).unwrap();
        assert_eq!(json, "\"good_action\"");
    }

    #[test]
    fn severity_parse_is_case_insensitive() {
        assert_eq!("high".parse::<Severity>(), Ok(Severity::High));
        assert_eq!("CRITICAL".parse::<Severity>(), Ok(Severity::Critical));
    }

    #[test]
    fn severity_parse_unknown_fails() {
        assert_eq!(
            "extreme".parse::<Severity>(),
            Err(CoreError::UnknownSeverity("extreme".to_string()))
        );
    }

    #[test]
    fn severity_defaults_to_medium() {
        assert_eq!(Severity::default(), Severity::Medium);
        assert!((Severity::default().multiplier() - 1.0).abs() < f64::EPSILON);
    }
}
