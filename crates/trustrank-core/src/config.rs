use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::scoring::{ScoringConfig, SignalCountingPolicy};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn parse_value<T>(raw: &str, var: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let database_url = require("DATABASE_URL")?;

    let env = parse_environment(&or_default("TRUSTRANK_ENV", "development"))?;

    let bind_addr: SocketAddr = parse_value(
        &or_default("TRUSTRANK_BIND_ADDR", "0.0.0.0:3000"),
        "TRUSTRANK_BIND_ADDR",
    )?;
    let log_level = or_default("TRUSTRANK_LOG_LEVEL", "info");
    let influencers_path = PathBuf::from(or_default(
        "TRUSTRANK_INFLUENCERS_PATH",
        "./config/influencers.yaml",
    ));

    let db_max_connections: u32 = parse_value(
        &or_default("TRUSTRANK_DB_MAX_CONNECTIONS", "10"),
        "TRUSTRANK_DB_MAX_CONNECTIONS",
    )?;
    let db_min_connections: u32 = parse_value(
        &or_default("TRUSTRANK_DB_MIN_CONNECTIONS", "1"),
        "TRUSTRANK_DB_MIN_CONNECTIONS",
    )?;
    let db_acquire_timeout_secs: u64 = parse_value(
        &or_default("TRUSTRANK_DB_ACQUIRE_TIMEOUT_SECS", "10"),
        "TRUSTRANK_DB_ACQUIRE_TIMEOUT_SECS",
    )?;

    let mention_retention: i64 = parse_value(
        &or_default("TRUSTRANK_MENTION_RETENTION", "50"),
        "TRUSTRANK_MENTION_RETENTION",
    )?;
    if mention_retention < 1 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRUSTRANK_MENTION_RETENTION".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let rescore_cron = or_default("TRUSTRANK_RESCORE_CRON", "0 0 3 * * *");
    let rescore_concurrency: usize = parse_value(
        &or_default("TRUSTRANK_RESCORE_CONCURRENCY", "4"),
        "TRUSTRANK_RESCORE_CONCURRENCY",
    )?;

    let counting_policy: SignalCountingPolicy = parse_value(
        &or_default("TRUSTRANK_SIGNAL_COUNTING", "verified_only"),
        "TRUSTRANK_SIGNAL_COUNTING",
    )?;

    let community_rating_weight: f64 = parse_value(
        &or_default("TRUSTRANK_RATING_WEIGHT", "0.4"),
        "TRUSTRANK_RATING_WEIGHT",
    )?;
    if !community_rating_weight.is_finite() {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRUSTRANK_RATING_WEIGHT".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    let top_mentions: usize = parse_value(
        &or_default("TRUSTRANK_TOP_MENTIONS", "3"),
        "TRUSTRANK_TOP_MENTIONS",
    )?;

    let scoring = ScoringConfig {
        community_rating_weight,
        top_mentions,
        counting_policy,
        ..ScoringConfig::default()
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        influencers_path,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        mention_retention,
        rescore_cron,
        rescore_concurrency,
        scoring,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRUSTRANK_ENV".to_string(),
            reason: format!("expected development, test, or production; got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
