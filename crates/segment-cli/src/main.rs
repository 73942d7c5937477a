mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use segment_core::settings::DebugLevel;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "segment", about = "Specimen segmentation for focus-stacked images")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Segment a stack using a settings file
    Run(commands::run::RunArgs),
    /// Find objects in a single image
    Detect(commands::detect::DetectArgs),
    /// Show the thresholds a threshold specification expands to
    Thresholds(commands::thresholds::ThresholdsArgs),
    /// Print a default settings file
    Config(commands::config::ConfigArgs),
}

/// Log filter for a run: the settings' debug level unless `--verbose`.
pub(crate) fn log_filter(debug: DebugLevel, verbose: bool) -> &'static str {
    if verbose {
        return "debug";
    }
    match debug {
        DebugLevel::Off => "warn",
        DebugLevel::Low => "info",
        DebugLevel::High => "debug",
    }
}

pub(crate) fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let quiet = log_filter(DebugLevel::Off, cli.verbose);

    match &cli.command {
        // The run command sets up logging once its settings are parsed.
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Detect(args) => {
            init_tracing(quiet);
            commands::detect::run(args)
        }
        Commands::Thresholds(args) => {
            init_tracing(quiet);
            commands::thresholds::run(args)
        }
        Commands::Config(args) => {
            init_tracing(quiet);
            commands::config::run(args)
        }
    }
}
