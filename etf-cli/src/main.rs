// SPDX-License-Identifier: AGPL-3.0-or-later
//! Event to Files CLI
//!
//! Simulates file-input and drag-and-drop events over local paths and
//! prints the files an extraction yields.

mod commands;

use clap::{Parser, Subcommand};
use console::style;
use etf_core::{ExtractOptions, TraversalOrder};
use etf_providers::LocalConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "etf")]
#[command(author, version, about = "Event to Files - extract files from change and drop events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print one JSON object per file
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop files and directories, walking dropped directories
    Drop {
        /// Paths to drop
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Directory entries returned per read
        #[arg(long, default_value_t = 100)]
        page_size: usize,

        /// Visit directories level by level
        #[arg(long)]
        breadth_first: bool,

        /// Attach entries to directly dropped files
        #[arg(long)]
        attach_entries: bool,

        /// Follow symbolic links
        #[arg(short = 'L', long)]
        follow_symlinks: bool,
    },

    /// Select files as a file input would
    Change {
        /// Files to select
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Drop { paths, page_size, breadth_first, attach_entries, follow_symlinks } => {
            let order = if breadth_first {
                TraversalOrder::BreadthFirst
            } else {
                TraversalOrder::DepthFirst
            };
            let options = ExtractOptions::default()
                .with_order(order)
                .with_attach_entries(attach_entries);
            let config = LocalConfig { page_size, follow_symlinks };
            commands::drop_paths(&paths, options, config, cli.json).await
        }
        Commands::Change { paths } => commands::change_paths(&paths, cli.json).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
