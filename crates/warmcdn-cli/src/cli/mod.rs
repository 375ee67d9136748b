//! CLI for the warmcdn edge-cache warmer.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use warmcdn_core::config;

use commands::{run_config_path, run_plan, run_warm};

/// Top-level CLI for the warmcdn edge-cache warmer.
#[derive(Debug, Parser)]
#[command(name = "warmcdn")]
#[command(about = "warmcdn: warm a CDN edge cache from an object-storage bucket", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one warming pass: list the bucket, classify, dispatch prefetches.
    Run {
        /// Build and print the dispatch plan without calling the CDN.
        #[arg(long)]
        dry_run: bool,
    },

    /// List the bucket and print the dispatch plan (no CDN calls).
    Plan,

    /// Print the resolved path of the config file.
    ConfigPath,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        if let CliCommand::ConfigPath = cli.command {
            return run_config_path();
        }

        let cfg = config::load_or_init()?;
        cfg.validate()?;
        tracing::debug!("loaded config for bucket {}", cfg.storage.bucket);

        match cli.command {
            CliCommand::Run { dry_run } => run_warm(&cfg, dry_run).await?,
            CliCommand::Plan => run_plan(&cfg).await?,
            CliCommand::ConfigPath => unreachable!("handled above"),
        }

        Ok(())
    }
}
