//! Consistent read of everything the score engine needs for one influencer.

use sqlx::PgPool;
use trustrank_core::{CommunitySignal, Mention};

use crate::community_signals::list_signals_for_influencer;
use crate::mentions::list_mentions_for_influencer;
use crate::DbError;

/// Upper bound on signals read per influencer.
pub const DEFAULT_SIGNAL_LIMIT: i64 = 5_000;

#[derive(Debug, Clone, Default)]
pub struct ScoringSnapshot {
    /// Newest first.
    pub mentions: Vec<Mention>,
    /// Non-hidden signals, newest first, not yet filtered by counting policy.
    pub signals: Vec<CommunitySignal>,
}

/// Read mentions and signals inside one repeatable-read, read-only
/// transaction so both lists reflect the same instant.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the transaction or either query fails.
pub async fn load_scoring_snapshot(
    pool: &PgPool,
    influencer_id: i64,
    mention_limit: i64,
    signal_limit: i64,
) -> Result<ScoringSnapshot, DbError> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let mention_rows = list_mentions_for_influencer(&mut *tx, influencer_id, mention_limit).await?;
    let signal_rows = list_signals_for_influencer(&mut *tx, influencer_id, signal_limit).await?;

    tx.commit().await?;

    let mentions = mention_rows
        .into_iter()
        .map(crate::MentionRow::into_domain)
        .collect();

    let total_signals = signal_rows.len();
    let signals: Vec<CommunitySignal> = signal_rows
        .into_iter()
        .filter_map(crate::CommunitySignalRow::into_domain)
        .collect();
    if signals.len() < total_signals {
        tracing::warn!(
            influencer_id,
            dropped = total_signals - signals.len(),
            "dropped community signals with an unknown type"
        );
    }

    Ok(ScoringSnapshot { mentions, signals })
}
