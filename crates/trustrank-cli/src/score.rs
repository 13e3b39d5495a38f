//! `score rescore` and `score show`.

use futures::stream::{self, StreamExt};
use trustrank_db::{InfluencerRow, RescoreOutcome};
use trustrank_score::ScoreEngine;

/// Load the influencers to rescore: one by slug, or every active one.
pub(crate) async fn load_influencers_for_rescore(
    pool: &sqlx::PgPool,
    filter: Option<&str>,
) -> anyhow::Result<Vec<InfluencerRow>> {
    match filter {
        Some(slug) => {
            let row = trustrank_db::get_influencer_by_slug(pool, slug)
                .await?
                .ok_or_else(|| anyhow::anyhow!("influencer '{slug}' not found"))?;
            Ok(vec![row])
        }
        None => Ok(trustrank_db::list_active_influencers(pool).await?),
    }
}

fn format_outcome(slug: &str, outcome: &RescoreOutcome) -> String {
    let community = outcome
        .community_score
        .map_or_else(|| "n/a".to_string(), |c| format!("{c:.2}"));
    format!(
        "  \u{2713} {slug:<24} ai {:>6.2}  community {community:>6}  combined {:>3}  ({} mentions, {} signals)",
        outcome.trust_score, outcome.combined_score, outcome.mention_count, outcome.signal_count,
    )
}

/// Recompute scores with bounded concurrency. Per-influencer failures are
/// reported and counted, not propagated.
///
/// # Errors
///
/// Returns an error if the influencer filter matches nothing or the
/// influencer list cannot be loaded.
pub(crate) async fn run_rescore(
    pool: &sqlx::PgPool,
    config: &trustrank_core::AppConfig,
    filter: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let influencers = load_influencers_for_rescore(pool, filter).await?;
    if influencers.is_empty() {
        println!("no active influencers to rescore");
        return Ok(());
    }

    let engine = ScoreEngine::new(config.scoring.clone());
    let engine = &engine;
    let max_concurrent = config.rescore_concurrency.max(1);

    let results: Vec<(&InfluencerRow, Result<RescoreOutcome, trustrank_db::DbError>)> =
        stream::iter(&influencers)
            .map(|influencer| {
                let fut = trustrank_db::rescore_influencer(
                    pool,
                    engine,
                    influencer.id,
                    config.mention_retention,
                    dry_run,
                );
                async move { (influencer, fut.await) }
            })
            .buffer_unordered(max_concurrent)
            .collect()
            .await;

    let mut failed = 0usize;
    for (influencer, result) in &results {
        match result {
            Ok(outcome) => println!("{}", format_outcome(&influencer.slug, outcome)),
            Err(e) => {
                failed += 1;
                tracing::error!(influencer = %influencer.slug, error = %e, "rescore failed");
                println!("  \u{2717} {:<24} {e}", influencer.slug);
            }
        }
    }

    let verb = if dry_run { "computed (dry-run)" } else { "rescored" };
    println!(
        "{verb} {} of {} influencers",
        results.len() - failed,
        results.len()
    );
    if failed > 0 {
        anyhow::bail!("{failed} influencer(s) failed to rescore");
    }
    Ok(())
}

/// Print the full breakdown for one influencer as pretty JSON.
///
/// # Errors
///
/// Returns an error if the influencer is unknown or its data cannot be read.
pub(crate) async fn run_show(
    pool: &sqlx::PgPool,
    config: &trustrank_core::AppConfig,
    slug: &str,
) -> anyhow::Result<()> {
    let influencer = trustrank_db::get_influencer_by_slug(pool, slug)
        .await?
        .ok_or_else(|| anyhow::anyhow!("influencer '{slug}' not found"))?;

    let snapshot = trustrank_db::load_scoring_snapshot(
        pool,
        influencer.id,
        config.mention_retention,
        trustrank_db::DEFAULT_SIGNAL_LIMIT,
    )
    .await?;

    let engine = ScoreEngine::new(config.scoring.clone());
    let breakdown = engine.breakdown_for(&snapshot.mentions, &snapshot.signals);
    println!("{}", serde_json::to_string_pretty(&breakdown)?);
    Ok(())
}
