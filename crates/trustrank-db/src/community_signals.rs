//! Database operations for the `community_signals` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trustrank_core::{CommunitySignal, NewCommunitySignal, SignalStatus, SignalType};
use uuid::Uuid;

use crate::DbError;

const SIGNAL_COLUMNS: &str = "id, influencer_id, user_id, signal_type, rating, comment, content_hash, \
     status, is_hidden, created_at, updated_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `community_signals` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommunitySignalRow {
    pub id: i64,
    pub influencer_id: i64,
    pub user_id: Uuid,
    pub signal_type: String,
    pub rating: Option<i16>,
    pub comment: Option<String>,
    pub content_hash: Option<String>,
    pub status: String,
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommunitySignalRow {
    /// `None` when the stored type is unknown. An unknown status reads as
    /// `PENDING`.
    #[must_use]
    pub fn into_domain(self) -> Option<CommunitySignal> {
        let signal_type = self.signal_type.parse::<SignalType>().ok()?;
        Some(CommunitySignal {
            id: self.id,
            influencer_id: self.influencer_id,
            user_id: self.user_id,
            signal_type,
            rating: self.rating,
            comment: self.comment,
            status: SignalStatus::parse_lossy(&self.status),
            is_hidden: self.is_hidden,
            created_at: self.created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Non-hidden signals for one influencer, newest first, capped at `limit`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_signals_for_influencer<'e, E>(
    executor: E,
    influencer_id: i64,
    limit: i64,
) -> Result<Vec<CommunitySignalRow>, DbError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, CommunitySignalRow>(&format!(
        "SELECT {SIGNAL_COLUMNS} \
         FROM community_signals \
         WHERE influencer_id = $1 AND is_hidden = false \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(influencer_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

/// Create a signal, or replace the user's previous signal of the same type.
///
/// A replaced signal goes back to `PENDING`. Callers validate the signal
/// first; the table's constraints reject anything that slips through.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_community_signal(
    pool: &PgPool,
    signal: &NewCommunitySignal,
) -> Result<CommunitySignalRow, DbError> {
    let row = sqlx::query_as::<_, CommunitySignalRow>(&format!(
        "INSERT INTO community_signals \
           (influencer_id, user_id, signal_type, rating, comment, content_hash) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (user_id, influencer_id, signal_type) DO UPDATE SET \
             rating = EXCLUDED.rating, \
             comment = EXCLUDED.comment, \
             content_hash = EXCLUDED.content_hash, \
             status = 'PENDING', \
             updated_at = NOW() \
         RETURNING {SIGNAL_COLUMNS}"
    ))
    .bind(signal.influencer_id)
    .bind(signal.user_id)
    .bind(signal.signal_type.as_str())
    .bind(signal.rating)
    .bind(signal.comment.as_deref())
    .bind(signal.content_hash())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Another user's non-rejected report about the same influencer with
/// identical normalized content, if any.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_report_by_content_hash(
    pool: &PgPool,
    influencer_id: i64,
    content_hash: &str,
    exclude_user: Uuid,
) -> Result<Option<CommunitySignalRow>, DbError> {
    let row = sqlx::query_as::<_, CommunitySignalRow>(&format!(
        "SELECT {SIGNAL_COLUMNS} \
         FROM community_signals \
         WHERE influencer_id = $1 \
           AND content_hash = $2 \
           AND user_id <> $3 \
           AND signal_type IN ('DRAMA_REPORT', 'POSITIVE_ACTION') \
           AND status <> 'REJECTED' \
         ORDER BY created_at \
         LIMIT 1"
    ))
    .bind(influencer_id)
    .bind(content_hash)
    .bind(exclude_user)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Move a signal through the moderation workflow.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the signal does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_signal_status(
    pool: &PgPool,
    signal_id: i64,
    status: SignalStatus,
) -> Result<CommunitySignalRow, DbError> {
    let row = sqlx::query_as::<_, CommunitySignalRow>(&format!(
        "UPDATE community_signals \
         SET status = $2, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {SIGNAL_COLUMNS}"
    ))
    .bind(signal_id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}

/// Hide or unhide a signal. Hidden signals drop out of listings and scoring.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the signal does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_signal_hidden(
    pool: &PgPool,
    signal_id: i64,
    hidden: bool,
) -> Result<CommunitySignalRow, DbError> {
    let row = sqlx::query_as::<_, CommunitySignalRow>(&format!(
        "UPDATE community_signals \
         SET is_hidden = $2, updated_at = NOW() \
         WHERE id = $1 \
         RETURNING {SIGNAL_COLUMNS}"
    ))
    .bind(signal_id)
    .bind(hidden)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}
