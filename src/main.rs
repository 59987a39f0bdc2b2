use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

mod config;
mod core;
mod logging;

use config::{BalanceConfig, PreprocessConfig};

/// Curate a multi-source spice image collection into a balanced,
/// quality-controlled training corpus.
#[derive(Parser)]
#[command(name = "curate-spice-dataset", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile every class to an exact per-class image count
    Balance {
        /// Source roots scanned for class subdirectories (first is primary)
        #[arg(long = "source", default_values = ["dataset/merged", "dataset/external"])]
        sources: Vec<PathBuf>,
        /// Output root for the balanced corpus
        #[arg(long, default_value = "dataset/balanced")]
        output: PathBuf,
        /// Desired number of images per class
        #[arg(long, default_value_t = 200)]
        target_per_class: usize,
        /// Seed for the run's random source
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Normalize raw photographs into a uniform square format
    Preprocess {
        /// Root of the raw input tree
        #[arg(long, default_value = "dataset/raw")]
        input: PathBuf,
        /// Output root for the processed corpus
        #[arg(long, default_value = "dataset/processed")]
        output: PathBuf,
        /// Final square edge length
        #[arg(long, default_value_t = 384)]
        target_size: u32,
        /// Inputs smaller than this are never upscaled
        #[arg(long, default_value_t = 300)]
        min_size_threshold: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging();
    info!("Starting spice dataset curator");

    let result = match cli.command {
        Command::Balance {
            sources,
            output,
            target_per_class,
            seed,
        } => {
            let config = BalanceConfig {
                source_roots: sources,
                output_root: output,
                target_per_class,
                random_seed: seed,
                ..BalanceConfig::default()
            };
            crate::core::balance::run(&config)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
        Command::Preprocess {
            input,
            output,
            target_size,
            min_size_threshold,
        } => {
            let config = PreprocessConfig {
                input_root: input,
                output_root: output,
                target_size,
                min_size_threshold,
                ..PreprocessConfig::default()
            };
            crate::core::preprocess::run(&config)
                .map(|_| ())
                .map_err(|e| e.to_string())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
