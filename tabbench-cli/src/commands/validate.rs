// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tabbench validate` command - Validate configuration.

use std::path::Path;

use tabbench_core::{BackendRegistry, ConfigLoader, ConfigOverrides};

pub fn execute(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(config = ?config_path, "Validating configuration");

    let registry = BackendRegistry::with_builtin();
    let resolved = ConfigLoader::load(config_path, &ConfigOverrides::default()).and_then(|config| {
        registry.select(config.backends.as_deref())?;
        Ok(config)
    });

    match resolved {
        Ok(config) => {
            let selected = registry.select(config.backends.as_deref())?;

            println!("✓ Configuration is valid");
            println!();
            println!("  Input:        {}", config.input.display());
            println!("  Output Dir:   {}", config.output_dir.display());
            println!("  Report:       {}", config.report_path().display());
            println!("  Encoding:     {}", config.encoding);
            println!("  Separator:    {:?}", config.separator.to_string());
            println!("  Runs:         {}", config.runs);
            println!();
            println!("Backends ({}):", selected.len());
            for entry in selected {
                println!("  - {}", entry.id);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
