// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! tabbench CLI
//!
//! Command-line interface for the tabbench read/write harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::run::RunArgs;

/// tabbench - Compare tabular data backends on a read-then-write workload
#[derive(Parser)]
#[command(name = "tabbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (./tabbench.yaml is used when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run every selected backend and write the JSON report
    Run(RunArgs),

    /// Validate the configuration and print the resolved settings
    Validate,

    /// List registered backends in run order
    Backends,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Dispatch to command handlers
    match cli.command {
        Commands::Run(args) => commands::run::execute(cli.config.as_deref(), args),
        Commands::Validate => commands::validate::execute(cli.config.as_deref()),
        Commands::Backends => commands::backends::execute(),
    }
}
