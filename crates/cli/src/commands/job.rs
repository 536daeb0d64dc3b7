// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job commands

use super::parse_name;
use crate::client::{self, HttpStatusSource, ServerArgs, ServerSettings};
use crate::output::{self, OutputFormat, StatusView};
use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use sechub_core::{
    ExecutionResult, ExecutionState, JobStatus, JobStatusPoller, JobUuid, PollerSettings,
    SecHubConfig, StatusSource, SystemClock, SystemEnvironment,
};
use sechub_storage::JobStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    pub command: JobCommand,
}

/// Where job status is read from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Project the job belongs to
    #[arg(long)]
    pub project: String,
    /// Read from a local job log instead of the server
    #[arg(long)]
    pub store: Option<PathBuf>,
    #[command(flatten)]
    pub server: ServerArgs,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Show the status of a job
    Status {
        /// Job UUID
        job: JobUuid,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,
    },
    /// Wait for a job to show up (or disappear) and check its state
    Await {
        /// Job UUID
        job: JobUuid,
        #[command(flatten)]
        source: SourceArgs,
        /// Wait for the job to disappear instead
        #[arg(long)]
        absent: bool,
        /// Give up after this many milliseconds [env: SECHUB_TIMEOUT_MS]
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Take poll interval and timeout defaults from this configuration file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Accepted execution states, e.g. ENDED
        #[arg(long = "state", value_parser = parse_name::<ExecutionState>)]
        states: Vec<ExecutionState>,
        /// Required execution result, e.g. OK
        #[arg(long, value_parser = parse_name::<ExecutionResult>)]
        result: Option<ExecutionResult>,
    },
}

pub async fn handle(command: JobCommand) -> anyhow::Result<()> {
    match command {
        JobCommand::Status {
            job,
            source,
            output,
        } => show_status(job, source, output).await,
        JobCommand::Await {
            job,
            source,
            absent,
            timeout_ms,
            config,
            states,
            result,
        } => {
            let settings = match config {
                Some(path) => SecHubConfig::load(&path)?.poller,
                None => PollerSettings::default(),
            };
            let timeout = timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| client::await_timeout(&settings));
            let interval = client::poll_interval(&settings);
            await_job(job, source, !absent, interval, timeout, &states, result).await
        }
    }
}

fn open_source(args: &SourceArgs) -> anyhow::Result<Arc<dyn StatusSource>> {
    let source: Arc<dyn StatusSource> = match &args.store {
        Some(path) => Arc::new(open_store(path)?),
        None => {
            let settings = ServerSettings::resolve(&args.server, &SystemEnvironment::from_process())?;
            Arc::new(HttpStatusSource::new(settings))
        }
    };
    Ok(source)
}

fn open_store(path: &Path) -> anyhow::Result<JobStore<SystemClock>> {
    if !path.exists() {
        bail!("no job log at {}", path.display());
    }
    JobStore::open(path, SystemClock)
        .with_context(|| format!("failed to read job log {}", path.display()))
}

async fn show_status(job: JobUuid, args: SourceArgs, format: OutputFormat) -> anyhow::Result<()> {
    let source = open_source(&args)?;

    let Some(json) = source.fetch(&args.project, &job).await? else {
        println!("Job not found: {}", job);
        return Ok(());
    };
    let status: JobStatus = serde_json::from_str(&json)
        .with_context(|| format!("unexpected status document:\n{}", json))?;

    output::print(&StatusView(&status), format)
}

async fn await_job(
    job: JobUuid,
    args: SourceArgs,
    want_present: bool,
    interval: Duration,
    timeout: Duration,
    states: &[ExecutionState],
    result: Option<ExecutionResult>,
) -> anyhow::Result<()> {
    let poller = JobStatusPoller::new(open_source(&args)?, args.project).with_interval(interval);

    let observation = poller.await_state(&job, want_present, timeout).await?;
    if !want_present {
        println!("Job {} is gone", job);
        return Ok(());
    }

    if !states.is_empty() {
        observation.has_one_of_states(states)?;
    }
    if let Some(result) = result {
        observation.has_result(result)?;
    }

    println!("Job {} found", job);
    Ok(())
}
