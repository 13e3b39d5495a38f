//! Database operations for the `mentions` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use trustrank_core::{Mention, MentionLabel, Severity};

use crate::DbError;

const MENTION_COLUMNS: &str = "id, influencer_id, source, source_url, text_excerpt, sentiment_score, \
     label, severity, score_impact, is_verified, verified_by, verified_at, scraped_at, created_at";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `mentions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MentionRow {
    pub id: i64,
    pub influencer_id: i64,
    pub source: String,
    pub source_url: Option<String>,
    pub text_excerpt: String,
    pub sentiment_score: Option<f64>,
    pub label: Option<String>,
    pub severity: Option<String>,
    pub score_impact: Option<f64>,
    pub is_verified: bool,
    pub verified_by: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MentionRow {
    /// Unknown label or severity strings become `None`; the score engine
    /// skips unlabeled mentions and treats a missing severity as `MEDIUM`.
    #[must_use]
    pub fn into_domain(self) -> Mention {
        Mention {
            id: self.id,
            influencer_id: self.influencer_id,
            source: self.source,
            source_url: self.source_url,
            text_excerpt: self.text_excerpt,
            sentiment_score: self.sentiment_score,
            label: self.label.as_deref().and_then(MentionLabel::parse),
            severity: self.severity.as_deref().and_then(|s| s.parse::<Severity>().ok()),
            score_impact: self.score_impact,
            is_verified: self.is_verified,
            scraped_at: self.scraped_at,
        }
    }
}

/// A researched mention ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMention {
    pub source: String,
    pub source_url: Option<String>,
    pub text_excerpt: String,
    pub sentiment_score: Option<f64>,
    pub label: MentionLabel,
    pub severity: Option<Severity>,
    pub score_impact: f64,
    pub scraped_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Most recent mentions for one influencer, newest first, capped at `limit`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_mentions_for_influencer<'e, E>(
    executor: E,
    influencer_id: i64,
    limit: i64,
) -> Result<Vec<MentionRow>, DbError>
where
    E: sqlx::PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, MentionRow>(&format!(
        "SELECT {MENTION_COLUMNS} \
         FROM mentions \
         WHERE influencer_id = $1 \
         ORDER BY scraped_at DESC, id DESC \
         LIMIT $2"
    ))
    .bind(influencer_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows)
}

/// Returns a single mention by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_mention(pool: &PgPool, mention_id: i64) -> Result<Option<MentionRow>, DbError> {
    let row = sqlx::query_as::<_, MentionRow>(&format!(
        "SELECT {MENTION_COLUMNS} FROM mentions WHERE id = $1"
    ))
    .bind(mention_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Supersede an influencer's mentions with a fresh research batch.
///
/// Existing rows are deleted and `mentions` inserted in one transaction, so
/// readers see either the old set or the new one. Returns the number inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails; nothing is changed then.
pub async fn replace_mentions(
    pool: &PgPool,
    influencer_id: i64,
    mentions: &[NewMention],
) -> Result<usize, DbError> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM mentions WHERE influencer_id = $1")
        .bind(influencer_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    for mention in mentions {
        sqlx::query(
            "INSERT INTO mentions \
               (influencer_id, source, source_url, text_excerpt, sentiment_score, label, \
                severity, score_impact, scraped_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(influencer_id)
        .bind(&mention.source)
        .bind(mention.source_url.as_deref())
        .bind(&mention.text_excerpt)
        .bind(mention.sentiment_score.filter(|s| s.is_finite()))
        .bind(mention.label.as_str())
        .bind(mention.severity.map(Severity::as_str))
        .bind(mention.score_impact)
        .bind(mention.scraped_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(
        influencer_id,
        removed,
        inserted = mentions.len(),
        "replaced mentions"
    );
    Ok(mentions.len())
}

/// Record a moderator's severity decision and the recomputed impact.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the mention does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_mention_severity(
    pool: &PgPool,
    mention_id: i64,
    severity: Severity,
    score_impact: f64,
    verified_by: &str,
) -> Result<MentionRow, DbError> {
    let row = sqlx::query_as::<_, MentionRow>(&format!(
        "UPDATE mentions \
         SET severity = $2, score_impact = $3, is_verified = true, \
             verified_by = $4, verified_at = NOW() \
         WHERE id = $1 \
         RETURNING {MENTION_COLUMNS}"
    ))
    .bind(mention_id)
    .bind(severity.as_str())
    .bind(score_impact)
    .bind(verified_by)
    .fetch_optional(pool)
    .await?;

    row.ok_or(DbError::NotFound)
}
