// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use sechub_core::JobStatus;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Job status as printed by `job status` and `run`
#[derive(Serialize)]
#[serde(transparent)]
pub struct StatusView<'a>(pub &'a JobStatus);

impl fmt::Display for StatusView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.0;
        writeln!(f, "Job: {}", status.job_uuid)?;
        writeln!(f, "Project: {}", status.project_id)?;
        writeln!(f, "State: {}", status.execution_state)?;
        writeln!(f, "Result: {}", status.execution_result)?;
        writeln!(f, "Created: {}", status.created.to_rfc3339())?;
        if let Some(started) = status.started {
            writeln!(f, "Started: {}", started.to_rfc3339())?;
        }
        if let Some(ended) = status.ended {
            writeln!(f, "Ended: {}", ended.to_rfc3339())?;
        }
        if let Some(error) = &status.error {
            writeln!(f, "Error: {}", error)?;
        }
        write!(f, "Product results: {}", status.product_results)
    }
}
