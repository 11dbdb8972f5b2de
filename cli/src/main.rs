//! CLI for Counterpass
//!
//! Commands:
//! - plan: Schedule a set of counters into passes and report result locations
//! - list: List the public counters a catalog defines
//! - check: Validate a catalog file

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod output;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "counterpass")]
#[command(about = "Counterpass - GPU counter pass planner", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./counterpass.toml when present)
    #[arg(long, global = true, env = "COUNTERPASS_CONFIG")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule counters into passes
    Plan(commands::plan::PlanArgs),

    /// List public counters in a catalog
    List(commands::list::ListArgs),

    /// Validate a catalog file
    Check(commands::check::CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    init_tracing(cli.verbose, &config.log_level);

    match cli.command {
        Commands::Plan(args) => commands::plan::run(args, &config),
        Commands::List(args) => commands::list::run(args, &config),
        Commands::Check(args) => commands::check::run(args, &config),
    }
}

fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
