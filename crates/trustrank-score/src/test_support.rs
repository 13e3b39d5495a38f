//! Fixture builders shared by the unit tests in this crate.

use chrono::{DateTime, Duration, TimeZone, Utc};
use trustrank_core::{CommunitySignal, Mention, MentionLabel, SignalStatus, SignalType};
use uuid::Uuid;

pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// A mention scraped `id` hours after the fixture epoch.
pub(crate) fn mention(id: i64, label: Option<MentionLabel>, sentiment: Option<f64>) -> Mention {
    Mention {
        id,
        influencer_id: 1,
        source: "news".to_string(),
        source_url: Some(format!("https://example.com/{id}")),
        text_excerpt: format!("mention {id}"),
        sentiment_score: sentiment,
        label,
        severity: None,
        score_impact: None,
        is_verified: false,
        scraped_at: epoch() + Duration::hours(id),
    }
}

pub(crate) fn with_impact(mut m: Mention, impact: Option<f64>) -> Mention {
    m.score_impact = impact;
    m
}

pub(crate) fn signal(id: i64, signal_type: SignalType, rating: Option<i16>) -> CommunitySignal {
    CommunitySignal {
        id,
        influencer_id: 1,
        user_id: Uuid::nil(),
        signal_type,
        rating,
        comment: None,
        status: SignalStatus::Verified,
        is_hidden: false,
        created_at: epoch(),
    }
}

pub(crate) fn with_status(mut s: CommunitySignal, status: SignalStatus) -> CommunitySignal {
    s.status = status;
    s
}
