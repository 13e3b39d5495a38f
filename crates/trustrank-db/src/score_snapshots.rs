//! Database operations for the `score_snapshots` table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{f64_to_decimal, DbError};

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `score_snapshots` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoreSnapshotRow {
    pub id: i64,
    pub influencer_id: i64,
    pub ai_score: Decimal,
    pub community_score: Option<Decimal>,
    pub combined_score: i16,
    pub mention_count: i32,
    pub signal_count: i32,
    pub captured_at: DateTime<Utc>,
}

/// Scores captured by one rescore. `community_score` is `None` when no
/// rating backed the community axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewScoreSnapshot {
    pub ai_score: f64,
    pub community_score: Option<f64>,
    pub combined_score: u8,
    pub mention_count: i32,
    pub signal_count: i32,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a snapshot and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_score_snapshot<'e, E>(
    executor: E,
    influencer_id: i64,
    snapshot: &NewScoreSnapshot,
) -> Result<i64, DbError>
where
    E: sqlx::PgExecutor<'e>,
{
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO score_snapshots \
             (influencer_id, ai_score, community_score, combined_score, mention_count, signal_count) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id",
    )
    .bind(influencer_id)
    .bind(f64_to_decimal(snapshot.ai_score, 2))
    .bind(snapshot.community_score.map(|s| f64_to_decimal(s, 2)))
    .bind(i16::from(snapshot.combined_score))
    .bind(snapshot.mention_count)
    .bind(snapshot.signal_count)
    .fetch_one(executor)
    .await?;

    Ok(id)
}

/// Score history for one influencer, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_score_snapshots(
    pool: &PgPool,
    influencer_id: i64,
    limit: i64,
) -> Result<Vec<ScoreSnapshotRow>, DbError> {
    let rows = sqlx::query_as::<_, ScoreSnapshotRow>(
        "SELECT id, influencer_id, ai_score, community_score, combined_score, \
                mention_count, signal_count, captured_at \
         FROM score_snapshots \
         WHERE influencer_id = $1 \
         ORDER BY captured_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(influencer_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
