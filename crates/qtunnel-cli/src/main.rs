//! qtunnel command-line interface
//!
//! Drives the two-particle tunnelling simulator: evolve the initial
//! configuration, sample positions, or animate the particles frame by frame.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::SimArgs;
use commands::{animate, config, run, sample, version};

/// qtunnel - two-particle quantum tunnelling on a qubit lattice
#[derive(Parser)]
#[command(name = "qtunnel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML configuration file
    #[arg(short, long, global = true, env = "QTUNNEL_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Report format for `run`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Evolve the initial configuration and print the position distribution
    Run {
        #[command(flatten)]
        sim: SimArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Number of joint outcomes listed in the table
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Evolve, then draw repeated position measurements
    Sample {
        #[command(flatten)]
        sim: SimArgs,

        /// Number of shots
        #[arg(short, long, default_value = "1024")]
        shots: u64,
    },

    /// Sample one position pair per frame until the particles meet
    Animate {
        #[command(flatten)]
        sim: SimArgs,

        /// Pause between frames in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },

    /// Print the effective configuration as YAML
    Config {
        #[command(flatten)]
        sim: SimArgs,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run { sim, format, top } => run::execute(config_path, &sim, format, top),
        Commands::Sample { sim, shots } => sample::execute(config_path, &sim, shots),
        Commands::Animate { sim, delay_ms } => animate::execute(config_path, &sim, delay_ms),
        Commands::Config { sim } => config::execute(config_path, &sim),
        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
