mod mentions;
mod score;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "trustrank-cli")]
#[command(about = "TrustRank command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Research mention ingestion
    Mentions {
        #[command(subcommand)]
        command: MentionsCommands,
    },
    /// Trust score computation
    Score {
        #[command(subcommand)]
        command: ScoreCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Upsert influencers from the YAML seed file
    Seed,
}

#[derive(Debug, Subcommand)]
enum MentionsCommands {
    /// Replace an influencer's mentions with a JSON research file and rescore
    Import {
        /// Influencer slug
        #[arg(long)]
        influencer: String,
        /// JSON array of research mentions
        #[arg(long)]
        file: PathBuf,
        /// Classify and score without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ScoreCommands {
    /// Recompute and persist trust scores
    Rescore {
        /// Only this influencer (slug); all active influencers otherwise
        #[arg(long)]
        influencer: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Print an influencer's score breakdown as JSON
    Show {
        #[arg(long)]
        influencer: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("trustrank-cli: no command given; run with --help for usage");
        return Ok(());
    };

    let config = trustrank_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = trustrank_db::PoolConfig::from_app_config(&config);
    let pool = trustrank_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to database")?;

    match command {
        Commands::Db { command } => run_db(&pool, &config, command).await?,
        Commands::Mentions {
            command:
                MentionsCommands::Import {
                    influencer,
                    file,
                    dry_run,
                },
        } => mentions::run_import(&pool, &config, &influencer, &file, dry_run).await?,
        Commands::Score { command } => match command {
            ScoreCommands::Rescore {
                influencer,
                dry_run,
            } => score::run_rescore(&pool, &config, influencer.as_deref(), dry_run).await?,
            ScoreCommands::Show { influencer } => {
                score::run_show(&pool, &config, &influencer).await?;
            }
        },
    }

    pool.close().await;
    Ok(())
}

async fn run_db(
    pool: &sqlx::PgPool,
    config: &trustrank_core::AppConfig,
    command: DbCommands,
) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            trustrank_db::ping(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = trustrank_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => {
            let file = trustrank_core::load_influencers(&config.influencers_path)?;
            let count = trustrank_db::seed_influencers(pool, &file.influencers).await?;
            println!(
                "seeded {count} influencers from {}",
                config.influencers_path.display()
            );
        }
    }
    Ok(())
}
