// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `tabbench backends` command - List registered backends.

use tabbench_core::BackendRegistry;

pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    let registry = BackendRegistry::with_builtin();

    for entry in registry.iter() {
        println!("{:<12} {}", entry.id.as_str(), entry.workload.description());
    }
    println!();
    println!("Total: {} backend(s)", registry.len());

    Ok(())
}
