//! GFwalk CLI - Command-line interface
//!
//! This binary exposes the GFwalk discovery engine: one-shot distance and
//! classification queries, catalog inspection, configuration management and
//! an interactive walking session.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};

use gfwalk::geo::Coordinate;
use gfwalk::logging::{init_logging, LogConfig};

use commands::common::ModeArg;
use commands::config::ConfigCommands;
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "gfwalk")]
#[command(about = "Discover points of interest by walking near them", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Configuration file (defaults to the per-user config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Point catalog JSON (overrides the configuration file)
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Great-circle distance between two coordinates
    Distance {
        /// Latitude of the first point
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        /// Longitude of the first point
        #[arg(allow_negative_numbers = true)]
        lon1: f64,
        /// Latitude of the second point
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        /// Longitude of the second point
        #[arg(allow_negative_numbers = true)]
        lon2: f64,
    },

    /// List the points of interest
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify every point around a coordinate
    Classify {
        /// Subject latitude
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        /// Subject longitude
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        /// Thresholds to apply
        #[arg(long, value_enum, default_value = "legacy")]
        mode: ModeArg,
        /// Point ids to treat as already discovered
        #[arg(long = "discovered", value_name = "ID")]
        discovered: Vec<String>,
    },

    /// Start an interactive walking session
    Walk {
        /// Initial mode
        #[arg(long, value_enum, default_value = "remote")]
        mode: ModeArg,
        /// Latitude reported by the live location provider
        #[arg(long, requires = "live_lon", allow_negative_numbers = true)]
        live_lat: Option<f64>,
        /// Longitude reported by the live location provider
        #[arg(long, requires = "live_lat", allow_negative_numbers = true)]
        live_lon: Option<f64>,
        /// Latency of the live location provider in milliseconds
        #[arg(long, default_value = "0", value_name = "MS")]
        live_delay_ms: u64,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    // Held until the command returns so buffered file logs are flushed.
    let _guard = init_logging(&LogConfig {
        verbose: cli.verbose,
        log_file: cli.log_file.clone(),
    })?;

    match cli.command {
        Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => commands::distance::run(Coordinate::new(lat1, lon1), Coordinate::new(lat2, lon2)),

        Commands::Config { command } => commands::config::run(command, cli.config.as_deref()),

        Commands::Catalog { json } => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.catalog)?;
            runner.log_startup("catalog");
            commands::catalog::run(&runner, json)
        }

        Commands::Classify {
            lat,
            lon,
            mode,
            discovered,
        } => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.catalog)?;
            runner.log_startup("classify");
            commands::classify::run(
                &runner,
                commands::classify::ClassifyArgs {
                    subject: Coordinate::new(lat, lon),
                    mode: mode.into(),
                    discovered,
                },
            )
        }

        Commands::Walk {
            mode,
            live_lat,
            live_lon,
            live_delay_ms,
        } => {
            let runner = CliRunner::new(cli.config.as_deref(), cli.catalog)?;
            runner.log_startup("walk");

            let live = live_lat.zip(live_lon).map(|(lat, lon)| Coordinate::new(lat, lon));
            let args = commands::walk::WalkArgs {
                mode: mode.into(),
                live,
                live_delay: Duration::from_millis(live_delay_ms),
            };

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(commands::walk::run(&runner, args))
        }
    }
}
