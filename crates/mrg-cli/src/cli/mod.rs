//! CLI for the MRG release watcher.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mrg_core::config;
use std::path::Path;

use commands::{run_checksum, run_once, run_watch};

/// Top-level CLI for the MRG release watcher.
#[derive(Debug, Parser)]
#[command(name = "mrg")]
#[command(about = "MRG: MikroTik RouterOS release watcher and verified downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one scrape-and-download pass now.
    Run {
        /// Fetch files even if they already exist locally.
        #[arg(long)]
        redownload: bool,
    },

    /// Keep running passes on the configured interval.
    Watch,

    /// Compute SHA-256 of a file (e.g. to check a download by hand).
    Checksum {
        /// Path to the file.
        path: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run { redownload } => {
                if redownload {
                    cfg.redownload = true;
                }
                run_once(&cfg)?;
            }
            CliCommand::Watch => run_watch(&cfg).await?,
            CliCommand::Checksum { path } => run_checksum(Path::new(&path))?,
        }

        Ok(())
    }
}
