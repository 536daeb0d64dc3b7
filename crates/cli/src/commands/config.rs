// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration commands

use anyhow::bail;
use clap::{Args, Subcommand};
use sechub_core::{SecHubConfig, SystemEnvironment};
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate executor configuration against the current environment
    Check {
        /// Configuration file
        file: PathBuf,
    },
}

pub fn handle(command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Check { file } => check(file),
    }
}

fn check(file: PathBuf) -> anyhow::Result<()> {
    let config = SecHubConfig::load(&file)?;
    let errors = config.validate(&SystemEnvironment::from_process());

    if !errors.is_empty() {
        for error in &errors {
            eprintln!("{}", error);
        }
        bail!("{} invalid executor configuration(s) in {}", errors.len(), file.display());
    }

    if config.executors.is_empty() {
        println!("No executors configured");
        return Ok(());
    }

    println!("{:<20} {:<18} {:>8} ENABLED", "EXECUTOR", "PRODUCT", "PRIORITY");
    for executor in &config.executors {
        println!(
            "{:<20} {:<18} {:>8} {}",
            executor.id,
            executor.product.name(),
            executor.priority,
            if executor.enabled { "yes" } else { "no" }
        );
    }
    Ok(())
}
