//! Recompute and persist an influencer's scores.

use sqlx::PgPool;
use trustrank_score::{counted_signals, ScoreEngine};

use crate::influencers::{update_influencer_scores, InfluencerScores};
use crate::score_snapshots::{insert_score_snapshot, NewScoreSnapshot};
use crate::scoring_data::{load_scoring_snapshot, DEFAULT_SIGNAL_LIMIT};
use crate::DbError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RescoreOutcome {
    pub influencer_id: i64,
    /// The AI total, persisted as `influencers.trust_score`.
    pub trust_score: f64,
    pub community_score: Option<f64>,
    pub combined_score: u8,
    pub mention_count: usize,
    pub signal_count: usize,
    pub skipped: usize,
    /// `false` for a dry run.
    pub persisted: bool,
}

fn saturating_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Score one influencer from a consistent snapshot and, unless `dry_run`,
/// write the AI score, tallies and a history row in one transaction.
///
/// # Errors
///
/// Returns [`DbError`] if reading or writing fails, including
/// [`DbError::NotFound`] when the influencer row is gone.
pub async fn rescore_influencer(
    pool: &PgPool,
    engine: &ScoreEngine,
    influencer_id: i64,
    mention_limit: i64,
    dry_run: bool,
) -> Result<RescoreOutcome, DbError> {
    let snapshot =
        load_scoring_snapshot(pool, influencer_id, mention_limit, DEFAULT_SIGNAL_LIMIT).await?;

    let ai = engine.compute_ai_score(&snapshot.mentions);
    let counted = counted_signals(&snapshot.signals, engine.config().counting_policy);
    let signal_count = counted.len();
    let community = engine.compute_community_score(counted);
    let community_score = community.blendable_total();
    let combined_score = engine.compute_combined_score(ai.total, community_score);

    let outcome = RescoreOutcome {
        influencer_id,
        trust_score: ai.total,
        community_score,
        combined_score,
        mention_count: snapshot.mentions.len(),
        signal_count,
        skipped: ai.skipped + community.skipped,
        persisted: !dry_run,
    };

    if dry_run {
        tracing::info!(
            influencer_id,
            trust_score = ai.total,
            combined_score,
            "dry run; scores not written"
        );
        return Ok(outcome);
    }

    let scores = InfluencerScores {
        trust_score: ai.total,
        drama_count: saturating_i32(ai.drama_count),
        good_action_count: saturating_i32(ai.good_action_count),
        neutral_count: saturating_i32(ai.neutral_count),
        avg_sentiment: ai.avg_sentiment,
    };
    let history = NewScoreSnapshot {
        ai_score: ai.total,
        community_score,
        combined_score,
        mention_count: saturating_i32(outcome.mention_count),
        signal_count: saturating_i32(signal_count),
    };

    let mut tx = pool.begin().await?;
    update_influencer_scores(&mut *tx, influencer_id, &scores).await?;
    insert_score_snapshot(&mut *tx, influencer_id, &history).await?;
    tx.commit().await?;

    tracing::info!(
        influencer_id,
        trust_score = ai.total,
        combined_score,
        mentions = outcome.mention_count,
        signals = signal_count,
        "influencer rescored"
    );
    Ok(outcome)
}
