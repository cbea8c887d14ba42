mod collect;
mod export;
mod reset;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use flowpulse_core::{AppConfig, Platform};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flowpulse")]
#[command(about = "Collect and rank n8n workflow popularity signals")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch every selected source, normalize, and upsert into `workflows`
    Collect {
        /// Restrict the run to these sources (repeatable); defaults to all
        #[arg(long = "source", value_enum)]
        sources: Vec<SourceArg>,

        /// Fetch and normalize without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Write the whole `workflows` table as a portable SQL dump
    Export {
        #[arg(long, short, default_value = "workflows_dump.sql")]
        output: PathBuf,
    },
    /// Drop and recreate the `workflows` table
    Reset {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SourceArg {
    Youtube,
    Forum,
    Trends,
}

impl From<SourceArg> for Platform {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Youtube => Platform::YouTube,
            SourceArg::Forum => Platform::Forum,
            SourceArg::Trends => Platform::GoogleTrends,
        }
    }
}

/// Resolve `--source` flags to platforms in canonical run order, without duplicates.
fn selected_platforms(sources: &[SourceArg]) -> Vec<Platform> {
    if sources.is_empty() {
        return Platform::ALL.to_vec();
    }
    let wanted: Vec<Platform> = sources.iter().copied().map(Platform::from).collect();
    Platform::ALL
        .into_iter()
        .filter(|p| wanted.contains(p))
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("no command given; run `flowpulse --help` for usage");
        return Ok(());
    };

    let config = flowpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if let Commands::Reset { yes: false } = command {
        if !reset::prompt_confirmation()? {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let pool_config = flowpulse_db::PoolConfig::from_app_config(&config);
    let pool = flowpulse_db::connect_pool(&config.database_url, pool_config).await?;

    let result = run_command(&pool, &config, command).await;
    flowpulse_db::close_pool(pool).await;
    result
}

async fn run_command(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Collect { sources, dry_run } => {
            flowpulse_db::run_migrations(pool).await?;
            let platforms = selected_platforms(&sources);
            let outcomes = collect::run_ingestion(pool, config, &platforms, dry_run).await;
            collect::print_summary(&outcomes, dry_run);
        }
        Commands::Export { output } => {
            let count = export::run_export(pool, &output).await?;
            println!("exported {count} workflows to {}", output.display());
        }
        Commands::Reset { .. } => {
            flowpulse_db::reset_workflows_table(pool).await?;
            println!("workflows table dropped and recreated");
        }
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                flowpulse_db::ping(pool).await?;
                println!("database reachable");
            }
            DbCommands::Migrate => {
                let applied = flowpulse_db::run_migrations(pool).await?;
                println!("applied {applied} migrations");
            }
        },
    }
    Ok(())
}
