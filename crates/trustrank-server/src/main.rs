mod api;
mod middleware;
mod scheduler;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use trustrank_score::ScoreEngine;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(trustrank_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = trustrank_db::PoolConfig::from_app_config(&config);
    let pool = trustrank_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = trustrank_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let engine = Arc::new(ScoreEngine::new(config.scoring.clone()));
    tracing::info!(
        counting_policy = %config.scoring.counting_policy,
        rating_weight = config.scoring.community_rating_weight,
        "score engine configured"
    );

    let _scheduler =
        scheduler::build_scheduler(pool.clone(), Arc::clone(&engine), Arc::clone(&config)).await?;

    let auth = AuthState::from_env(matches!(
        config.env,
        trustrank_core::Environment::Development
    ))?;
    let state = AppState {
        pool,
        engine,
        mention_retention: config.mention_retention,
    };
    let app = build_app(state, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "trustrank-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
