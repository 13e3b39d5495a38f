use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::CoreError;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;
pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalType {
    Rating,
    DramaReport,
    PositiveAction,
    Comment,
}

impl SignalType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "RATING",
            Self::DramaReport => "DRAMA_REPORT",
            Self::PositiveAction => "POSITIVE_ACTION",
            Self::Comment => "COMMENT",
        }
    }

    /// Drama and positive-action reports are the types checked for duplicates.
    #[must_use]
    pub fn is_report(self) -> bool {
        matches!(self, Self::DramaReport | Self::PositiveAction)
    }
}

impl FromStr for SignalType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "RATING" => Ok(Self::Rating),
            "DRAMA_REPORT" => Ok(Self::DramaReport),
            "POSITIVE_ACTION" => Ok(Self::PositiveAction),
            "COMMENT" => Ok(Self::Comment),
            other => Err(CoreError::UnknownSignalType(other.to_string())),
        }
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verification workflow state of a community signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl SignalStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Unknown stored values fall back to `Pending`.
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        match s.trim() {
            "VERIFIED" => Self::Verified,
            "REJECTED" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

impl FromStr for SignalStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "PENDING" => Ok(Self::Pending),
            "VERIFIED" => Ok(Self::Verified),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(CoreError::UnknownSignalStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for SignalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted user rating or report about an influencer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunitySignal {
    pub id: i64,
    pub influencer_id: i64,
    pub user_id: Uuid,
    pub signal_type: SignalType,
    pub rating: Option<i16>,
    pub comment: Option<String>,
    pub status: SignalStatus,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
}

/// A signal as submitted by a user, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommunitySignal {
    pub influencer_id: i64,
    pub user_id: Uuid,
    pub signal_type: SignalType,
    pub rating: Option<i16>,
    pub comment: Option<String>,
}

impl NewCommunitySignal {
    /// Reject signals that would violate the score engine's input contract.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), CoreError> {
        match (self.signal_type, self.rating) {
            (SignalType::Rating, None) => return Err(CoreError::MissingRating),
            (SignalType::Rating, Some(r)) if !(MIN_RATING..=MAX_RATING).contains(&r) => {
                return Err(CoreError::RatingOutOfRange(r));
            }
            (other, Some(_)) if other != SignalType::Rating => {
                return Err(CoreError::UnexpectedRating(other));
            }
            _ => {}
        }

        if let Some(comment) = &self.comment {
            if comment.trim().is_empty() {
                return Err(CoreError::BlankComment);
            }
            if comment.chars().count() > MAX_COMMENT_CHARS {
                return Err(CoreError::CommentTooLong {
                    max: MAX_COMMENT_CHARS,
                });
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn content_hash(&self) -> Option<String> {
        self.comment.as_deref().map(content_hash)
    }
}

/// SHA-256 hex digest of the trimmed, lowercased text.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let normalized = text.trim().to_lowercase();
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_signal(signal_type: SignalType, rating: Option<i16>) -> NewCommunitySignal {
        NewCommunitySignal {
            influencer_id: 1,
            user_id: Uuid::nil(),
            signal_type,
            rating,
            comment: None,
        }
    }

    #[test]
    fn rating_within_range_is_valid() {
        for r in 1..=5 {
            assert_eq!(new_signal(SignalType::Rating, Some(r)).validate(), Ok(()));
        }
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        assert_eq!(
            new_signal(SignalType::Rating, Some(0)).validate(),
            Err(CoreError::RatingOutOfRange(0))
        );
        assert_eq!(
            new_signal(SignalType::Rating, Some(6)).validate(),
            Err(CoreError::RatingOutOfRange(6))
        );
    }

    #[test]
    fn rating_signal_requires_rating() {
        assert_eq!(
            new_signal(SignalType::Rating, None).validate(),
            Err(CoreError::MissingRating)
        );
    }

    #[test]
    fn report_with_rating_is_rejected() {
        assert_eq!(
            new_signal(SignalType::DramaReport, Some(3)).validate(),
            Err(CoreError::UnexpectedRating(SignalType::DramaReport))
        );
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut signal = new_signal(SignalType::Comment, None);
        signal.comment = Some("   ".to_string());
        assert_eq!(signal.validate(), Err(CoreError::BlankComment));
    }

    #[test]
    fn overlong_comment_is_rejected() {
        let mut signal = new_signal(SignalType::PositiveAction, None);
        signal.comment = Some("a".repeat(MAX_COMMENT_CHARS + 1));
        assert_eq!(
            signal.validate(),
            Err(CoreError::CommentTooLong {
                max: MAX_COMMENT_CHARS
            })
        );
    }

    #[test]
    fn content_hash_ignores_case_and_surrounding_whitespace() {
        assert_eq!(content_hash("  Charity Stream "), content_hash("charity stream"));
        assert_eq!(content_hash("x").len(), 64);
    }

    #[test]
    fn signal_type_round_trips_through_str() {
        for t in [
            SignalType::Rating,
            SignalType::DramaReport,
            SignalType::PositiveAction,
            SignalType::Comment,
        ] {
            assert_eq!(t.as_str().parse::<SignalType>(), Ok(t));
        }
    }

    #[test]
    fn unknown_status_falls_back_to_pending() {
        assert_eq!(SignalStatus::parse_lossy("ARCHIVED"), SignalStatus::Pending);
        assert_eq!(SignalStatus::parse_lossy("VERIFIED"), SignalStatus::Verified);
    }

    #[test]
    fn status_from_str_is_strict() {
        assert_eq!("REJECTED".parse::<SignalStatus>().ok(), Some(SignalStatus::Rejected));
        assert!(matches!(
            "ARCHIVED".parse::<SignalStatus>(),
            Err(CoreError::UnknownSignalStatus(ref s)) if s == "ARCHIVED"
        ));
    }
}
