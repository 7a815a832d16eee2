// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tabbench run` command - Benchmark backends and write the report.

use std::path::{Path, PathBuf};

use clap::Args;
use tabbench_core::{
    BackendRegistry, BackendSummary, BenchmarkReport, ConfigLoader, ConfigOverrides, SuiteOutcome,
    SuiteRunner,
};

/// Flags overriding the configuration file.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Dataset to read
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory for the report and temporary outputs
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Report file name inside the output directory
    #[arg(long)]
    pub report_file: Option<String>,

    /// Trials per backend (values below 1 run once)
    #[arg(short, long, allow_negative_numbers = true)]
    pub runs: Option<i64>,

    /// Field separator of the input (single ASCII character)
    #[arg(short, long)]
    pub separator: Option<String>,

    /// Text encoding of the input (utf-8, latin-1)
    #[arg(short, long)]
    pub encoding: Option<String>,

    /// Backend to run; repeat to select several (default: all)
    #[arg(short, long = "backend")]
    pub backends: Vec<String>,
}

impl From<RunArgs> for ConfigOverrides {
    fn from(args: RunArgs) -> Self {
        Self {
            input: args.input,
            output_dir: args.output_dir,
            report_file: args.report_file,
            encoding: args.encoding,
            separator: args.separator,
            runs: args.runs,
            backends: (!args.backends.is_empty()).then_some(args.backends),
        }
    }
}

pub fn execute(
    config_path: Option<&Path>,
    args: RunArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(config_path, &args.into())?;
    let registry = BackendRegistry::with_builtin();

    tracing::info!(
        input = %config.input.display(),
        output_dir = %config.output_dir.display(),
        runs = config.runs,
        "Running benchmark"
    );

    match SuiteRunner::new(&config, &registry).run()? {
        SuiteOutcome::Completed { report, path } => {
            print_summary(&report);
            println!();
            println!("Report saved to: {}", path.display());
            Ok(())
        }
        outcome @ SuiteOutcome::InputMissing { .. } => {
            eprintln!("✗ Input file not found: {}", config.input.display());
            eprintln!("  Error report saved to: {}", outcome.report_path().display());
            std::process::exit(outcome.exit_code());
        }
    }
}

fn print_summary(report: &BenchmarkReport) {
    println!(
        "Input: {} (runs: {}, separator: {:?})",
        report.input, report.runs, report.separator
    );
    println!();
    println!(
        "{:<12} {:>12} {:>12} {:>12} {:>12} {:>6}",
        "backend", "read (s)", "write (s)", "read (MB)", "write (MB)", "runs"
    );

    for (id, summary) in report.libs.iter() {
        match summary {
            BackendSummary::Measured(stats) => println!(
                "{:<12} {:>12.6} {:>12.6} {:>12.2} {:>12.2} {:>6}",
                id.as_str(),
                stats.read_time_s,
                stats.write_time_s,
                stats.read_mem_mb,
                stats.write_mem_mb,
                stats.runs_used
            ),
            BackendSummary::Failed { error } => println!("{:<12} ✗ {}", id.as_str(), error),
        }
    }
}
