mod config;
mod id;
mod plan_cmds;
mod render;

#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use huddle_core::PlanRepository;
use huddle_db::config::DbConfig;
use huddle_db::pool;

use config::HuddleConfig;

#[derive(Parser)]
#[command(name = "huddle", about = "Group scheduling: propose times, collect answers")]
struct Cli {
    /// Database URL (overrides HUDDLE_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a huddle config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Base URL used when printing share links
        #[arg(long, default_value = config::DEFAULT_BASE_URL)]
        base_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the huddle database (requires config file or env vars)
    DbInit,
    /// Plan management
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Create a plan with candidate times
    Create {
        /// Plan name shown to participants
        #[arg(long)]
        name: String,
        /// Candidate time as YYYY-MM-DDTHH:MM (repeatable)
        #[arg(long = "option", required = true)]
        options: Vec<String>,
    },
    /// Show a plan with its availability table
    Show {
        /// Plan ID to show
        plan_id: String,
        /// Print the plan and table as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a participant's answers
    Respond {
        /// Plan ID to respond to
        plan_id: String,
        /// Participant name
        #[arg(long)]
        name: String,
        /// Answer as KEY=yes|maybe|no (repeatable)
        #[arg(long = "choice")]
        choices: Vec<String>,
    },
}

/// Execute the `huddle init` command: write config file.
fn cmd_init(db_url: &str, base_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        share: config::ShareSection {
            base_url: base_url.to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  share.base_url = {base_url}");
    println!();
    println!("Next: run `huddle db-init` to create the database and schema.");

    Ok(())
}

/// Execute the `huddle db-init` command: create database and schema.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = HuddleConfig::resolve(cli_db_url);

    println!("Initializing huddle database...");

    // 1. Create the database if it does not exist.
    pool::ensure_database_exists(&resolved.db_config).await?;

    // 2. Connect and create tables.
    let db_pool = pool::connect_and_prepare(&resolved.db_config).await?;

    // 3. Print success with table counts.
    let counts = pool::table_counts(&db_pool).await?;
    println!("Database ready. Tables:");
    for (table, count) in &counts {
        println!("  {table}: {count} rows");
    }

    // 4. Clean shutdown.
    db_pool.close().await;

    println!("huddle db-init complete.");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            base_url,
            force,
        } => {
            cmd_init(&db_url, &base_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Plan { command } => {
            let resolved = HuddleConfig::resolve(cli.database_url.as_deref());
            let repo = PlanRepository::open(&resolved.db_config).await?;
            let result = plan_cmds::run_plan_command(command, &repo, &resolved).await;
            repo.close().await;
            result?;
        }
    }

    Ok(())
}
