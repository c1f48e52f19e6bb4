//! Ladder Control - CLI for the Ladder progression engine
//!
//! Reads activity snapshots and leaderboard files and prints the derived
//! level, streak, badge and rank state.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable controlling log verbosity
const LOG_ENV: &str = "LADDER_LOG";

#[derive(Parser)]
#[command(name = "ladderctl")]
#[command(about = "Ladder - progression and engagement engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to $LADDER_CONFIG or ~/.config/ladder/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level and title for an XP amount
    Level {
        #[arg(allow_hyphen_values = true)]
        xp: i64,
    },

    /// Evaluate streak health for a snapshot
    Streak {
        snapshot: PathBuf,

        /// Day to evaluate against (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
    },

    /// List badges the snapshot newly qualifies for
    Badges { snapshot: PathBuf },

    /// Full progress report for a snapshot
    Report {
        snapshot: PathBuf,

        /// Day to evaluate against (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Last-known-good report, shown if the snapshot is invalid
        /// and refreshed after a successful run
        #[arg(long)]
        fallback: Option<PathBuf>,
    },

    /// Rank users from a JSON entries file
    Leaderboard {
        entries: PathBuf,

        /// Number of rows to show
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Always show this user's row
        #[arg(long)]
        user: Option<String>,
    },

    /// Print the effective configuration
    Config {
        /// Print built-in defaults instead
        #[arg(long)]
        default: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let engine = commands::load_engine(cli.config.as_deref())?;

    match cli.command {
        Commands::Level { xp } => commands::level(&engine, xp),
        Commands::Streak { snapshot, today } => commands::streak(&engine, &snapshot, today.as_deref()),
        Commands::Badges { snapshot } => commands::badges(&engine, &snapshot),
        Commands::Report { snapshot, today, json, fallback } => {
            commands::report(&engine, &snapshot, today.as_deref(), json, fallback.as_deref())
        }
        Commands::Leaderboard { entries, top, user } => {
            commands::leaderboard(&entries, top, user.as_deref())
        }
        Commands::Config { default } => commands::config(&engine, default),
    }
}
