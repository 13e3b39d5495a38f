//! Database operations for the `influencers` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use trustrank_core::{parse_social_handles, SocialHandle};
use uuid::Uuid;

use crate::{decimal_to_f64, f64_to_decimal, DbError};

const INFLUENCER_COLUMNS: &str = "id, public_id, name, slug, niche, image_url, notes, social_handles, \
     trust_score, drama_count, good_action_count, neutral_count, avg_sentiment, last_scored_at, \
     is_active, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `influencers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InfluencerRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub niche: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub social_handles: serde_json::Value,
    pub trust_score: Decimal,
    pub drama_count: i32,
    pub good_action_count: i32,
    pub neutral_count: i32,
    pub avg_sentiment: Decimal,
    pub last_scored_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Influencer as consumed by the API and the score engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Influencer {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub slug: String,
    pub niche: Option<String>,
    pub image_url: Option<String>,
    pub social_handles: Vec<SocialHandle>,
    pub trust_score: f64,
    pub drama_count: i32,
    pub good_action_count: i32,
    pub neutral_count: i32,
    pub avg_sentiment: f64,
    pub last_scored_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl InfluencerRow {
    /// Convert to the domain type, parsing `social_handles` once.
    ///
    /// A malformed handles document is logged and read as empty rather than
    /// hiding the influencer.
    #[must_use]
    pub fn into_domain(self) -> Influencer {
        let social_handles = match parse_social_handles(&self.social_handles) {
            Ok(handles) => handles,
            Err(e) => {
                tracing::warn!(
                    influencer_id = self.id,
                    error = %e,
                    "unparseable social_handles; treating as empty"
                );
                Vec::new()
            }
        };

        Influencer {
            id: self.id,
            public_id: self.public_id,
            name: self.name,
            slug: self.slug,
            niche: self.niche,
            image_url: self.image_url,
            social_handles,
            trust_score: decimal_to_f64(self.trust_score),
            drama_count: self.drama_count,
            good_action_count: self.good_action_count,
            neutral_count: self.neutral_count,
            avg_sentiment: decimal_to_f64(self.avg_sentiment),
            last_scored_at: self.last_scored_at,
            is_active: self.is_active,
        }
    }
}

/// Optional filters for [`list_ranked_influencers`].
#[derive(Debug, Clone, Default)]
pub struct InfluencerFilter {
    pub min_trust_score: Option<f64>,
    pub niche: Option<String>,
    /// Case-insensitive substring of the name.
    pub search: Option<String>,
}

/// Values written back by a rescore.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InfluencerScores {
    pub trust_score: f64,
    pub drama_count: i32,
    pub good_action_count: i32,
    pub neutral_count: i32,
    pub avg_sentiment: f64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Active influencers ordered by `trust_score DESC, name`, filtered and capped.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ranked_influencers(
    pool: &PgPool,
    filter: &InfluencerFilter,
    limit: i64,
) -> Result<Vec<InfluencerRow>, DbError> {
    let min_score = filter.min_trust_score.map(|s| f64_to_decimal(s, 2));
    let search = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(escape_like);

    let rows = sqlx::query_as::<_, InfluencerRow>(&format!(
        "SELECT {INFLUENCER_COLUMNS} \
         FROM influencers \
         WHERE is_active = true \
           AND ($1::NUMERIC IS NULL OR trust_score >= $1) \
           AND ($2::TEXT IS NULL OR niche = $2) \
           AND ($3::TEXT IS NULL OR name ILIKE '%' || $3 || '%') \
         ORDER BY trust_score DESC, name \
         LIMIT $4"
    ))
    .bind(min_score)
    .bind(filter.niche.as_deref())
    .bind(search)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Returns an active influencer by public id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_influencer_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<InfluencerRow>, DbError> {
    let row = sqlx::query_as::<_, InfluencerRow>(&format!(
        "SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE public_id = $1 AND is_active = true"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns an active influencer by slug, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_influencer_by_slug(
    pool: &PgPool,
    slug: &str,
) -> Result<Option<InfluencerRow>, DbError> {
    let row = sqlx::query_as::<_, InfluencerRow>(&format!(
        "SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE slug = $1 AND is_active = true"
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all active influencers, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_influencers(pool: &PgPool) -> Result<Vec<InfluencerRow>, DbError> {
    let rows = sqlx::query_as::<_, InfluencerRow>(&format!(
        "SELECT {INFLUENCER_COLUMNS} FROM influencers WHERE is_active = true ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Write a fresh AI score and mention tallies for one influencer.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no influencer has `influencer_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_influencer_scores<'e, E>(
    executor: E,
    influencer_id: i64,
    scores: &InfluencerScores,
) -> Result<(), DbError>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE influencers \
         SET trust_score = $2, \
             drama_count = $3, \
             good_action_count = $4, \
             neutral_count = $5, \
             avg_sentiment = $6, \
             last_scored_at = NOW(), \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(influencer_id)
    .bind(f64_to_decimal(scores.trust_score, 2))
    .bind(scores.drama_count)
    .bind(scores.good_action_count)
    .bind(scores.neutral_count)
    .bind(f64_to_decimal(scores.avg_sentiment, 3))
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("100%_real"), "100\\%\\_real");
        assert_eq!(escape_like("plain"), "plain");
    }
}
