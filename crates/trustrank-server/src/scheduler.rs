//! Background job scheduler.
//!
//! Registers the recurring rescore job at server startup.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use trustrank_core::AppConfig;
use trustrank_score::ScoreEngine;

/// Builds and starts the background job scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process;
/// dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the rescore cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    engine: Arc<ScoreEngine>,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_rescore_job(&scheduler, pool, engine, &config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the rescore job on `TRUSTRANK_RESCORE_CRON` (default daily at
/// 03:00 UTC).
async fn register_rescore_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    engine: Arc<ScoreEngine>,
    config: &AppConfig,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);
    let mention_limit = config.mention_retention;

    let job = Job::new_async(config.rescore_cron.as_str(), move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let engine = Arc::clone(&engine);

        Box::pin(async move {
            tracing::info!("scheduler: starting rescore run");
            run_rescore_job(&pool, &engine, mention_limit).await;
            tracing::info!("scheduler: rescore run complete");
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = %config.rescore_cron, "scheduler: registered rescore job");
    Ok(())
}

/// Rescore every active influencer. One influencer's failure is logged and
/// does not abort the run.
async fn run_rescore_job(pool: &PgPool, engine: &ScoreEngine, mention_limit: i64) {
    let influencers = match trustrank_db::list_active_influencers(pool).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to list active influencers");
            return;
        }
    };

    if influencers.is_empty() {
        tracing::info!("scheduler: no active influencers; skipping");
        return;
    }

    let mut succeeded = 0usize;
    for influencer in &influencers {
        match trustrank_db::rescore_influencer(pool, engine, influencer.id, mention_limit, false)
            .await
        {
            Ok(outcome) => {
                succeeded += 1;
                tracing::debug!(
                    influencer = %influencer.slug,
                    trust_score = outcome.trust_score,
                    combined_score = outcome.combined_score,
                    "scheduler: influencer rescored"
                );
            }
            Err(e) => {
                tracing::error!(
                    influencer = %influencer.slug,
                    error = %e,
                    "scheduler: rescore failed"
                );
            }
        }
    }

    tracing::info!(
        total = influencers.len(),
        succeeded,
        "scheduler: rescore summary"
    );
}
