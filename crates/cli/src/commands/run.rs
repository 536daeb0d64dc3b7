// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local job run
//!
//! Submits a job to an in-process scheduler whose products are no-ops. The
//! executor chain still validates every matching executor configuration,
//! requires uploaded archives where the product needs them and goes through
//! the resilience layer, so this is a dry run of what the server would do.

use super::parse_name;
use crate::output::{self, OutputFormat, StatusView};
use anyhow::{bail, Context};
use clap::Args;
use sechub_adapters::content::{BINARIES_TAR, SOURCECODE_ZIP};
use sechub_adapters::{
    NoOpProductAdapter, StorageContentProvider, TracedContentProvider, TracedProductAdapter,
    TracingInspector,
};
use sechub_core::{
    ExecutionResult, JobStatus, ScanType, SecHubConfig, SystemClock, SystemEnvironment, UuidIdGen,
};
use sechub_engine::{JobScheduler, SchedulerDeps};
use sechub_storage::JobStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args)]
pub struct RunArgs {
    /// Executor configuration file
    #[arg(long)]
    pub config: PathBuf,
    /// Project the job belongs to
    #[arg(long)]
    pub project: String,
    /// Scan types to run, e.g. licenseScan
    #[arg(long = "scan-type", required = true, value_delimiter = ',', value_parser = parse_name::<ScanType>)]
    pub scan_types: Vec<ScanType>,
    /// Source code archive to upload for the job
    #[arg(long)]
    pub source_zip: Option<PathBuf>,
    /// Binaries archive to upload for the job
    #[arg(long)]
    pub binaries_tar: Option<PathBuf>,
    /// Upload directory, laid out as <project>/<job>/
    #[arg(long, default_value = ".sechub/uploads")]
    pub uploads: PathBuf,
    /// Persist the job to this job log
    #[arg(long)]
    pub store: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t)]
    pub output: OutputFormat,
}

pub async fn handle(args: RunArgs) -> anyhow::Result<()> {
    let config = SecHubConfig::load(&args.config)?;
    let store = match &args.store {
        Some(path) => JobStore::open(path, SystemClock)
            .with_context(|| format!("failed to open job log {}", path.display()))?,
        None => JobStore::in_memory(SystemClock),
    };
    let uploads = StorageContentProvider::new(&args.uploads);

    let scheduler = Arc::new(JobScheduler::new(
        SchedulerDeps {
            adapter: TracedProductAdapter::new(NoOpProductAdapter::new()),
            content: TracedContentProvider::new(uploads.clone()),
            inspector: TracingInspector,
            clock: SystemClock,
            ids: UuidIdGen,
            env: SystemEnvironment::from_process(),
            store: Arc::new(store),
        },
        config,
    ));

    let job = scheduler.submit(&args.project, args.scan_types)?;
    let job_dir = uploads.job_dir(&args.project, &job.uuid);
    if let Some(archive) = &args.source_zip {
        stage_upload(archive, &job_dir, SOURCECODE_ZIP)?;
    }
    if let Some(archive) = &args.binaries_tar {
        stage_upload(archive, &job_dir, BINARIES_TAR)?;
    }

    let job = scheduler.spawn(job.uuid).await??;

    output::print(&StatusView(&JobStatus::from(&job)), args.output)?;
    if job.result == ExecutionResult::Failed {
        bail!(
            "job {} failed: {}",
            job.uuid,
            job.error.as_deref().unwrap_or("no reason given")
        );
    }
    Ok(())
}

fn stage_upload(archive: &Path, job_dir: &Path, name: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(job_dir)
        .with_context(|| format!("failed to create {}", job_dir.display()))?;
    std::fs::copy(archive, job_dir.join(name))
        .with_context(|| format!("failed to upload {}", archive.display()))?;
    tracing::debug!(archive = %archive.display(), dir = %job_dir.display(), "staged upload");
    Ok(())
}
