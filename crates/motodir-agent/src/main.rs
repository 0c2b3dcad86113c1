mod commands;
mod crawl;
mod schedule;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "motodir-agent")]
#[command(about = "Crawl agent for the motorcycle repair shop directory")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
enum Commands {
    /// Crawl the next batch of locations (the default)
    Run,
    /// Print the persisted crawl state without crawling
    Status,
    /// Ping the store and list the first directory rows
    CheckDb {
        #[arg(long, default_value_t = 5)]
        limit: i64,
    },
    /// Stay resident and crawl on the configured cron schedule
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = motodir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            commands::run(&config).await?;
        }
        Commands::Status => commands::status(&config)?,
        Commands::CheckDb { limit } => commands::check_db(&config, limit).await?,
        Commands::Schedule => schedule::run_scheduled(Arc::new(config)).await?,
    }

    Ok(())
}
