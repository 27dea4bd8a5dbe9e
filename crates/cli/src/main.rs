//! VitalChat CLI — the main entry point.
//!
//! Commands:
//! - `chat`     — Interactive chat or single-message mode
//! - `metrics`  — List the queryable health metrics
//! - `fetch`    — Run the get_health_metric tool directly
//! - `compare`  — Run the compare_periods tool directly
//! - `doctor`   — Diagnose configuration and backend reachability

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "vitalchat",
    about = "VitalChat — conversational assistant for your health data",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the health assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// List the health metrics that can be queried
    Metrics,

    /// Fetch one metric's daily values (bypasses the LLM)
    Fetch {
        /// Metric key, e.g. steps, sleep, restingHeartRate
        metric: String,

        /// How many days back to fetch (1-90)
        #[arg(short, long, default_value = "7")]
        days: String,
    },

    /// Compare a metric across two periods (bypasses the LLM)
    Compare {
        /// Metric key, e.g. steps, sleep, bodyWeight
        metric: String,

        /// First period as day offsets from today: START END
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        p1: Vec<i64>,

        /// Second period as day offsets from today: START END
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        p2: Vec<i64>,
    },

    /// Diagnose configuration and backend reachability
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await,
        Commands::Metrics => commands::metrics::run().await,
        Commands::Fetch { metric, days } => commands::fetch::run(&metric, &days).await,
        Commands::Compare { metric, p1, p2 } => commands::compare::run(&metric, &p1, &p2).await,
        Commands::Doctor => commands::doctor::run().await,
    }
}
