// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store: the single writer of job state
//!
//! Every change is validated against the pure job state machine, appended to
//! the WAL, applied to the materialized state and then published as a fresh
//! immutable [`JobStatus`] snapshot. Readers only ever clone a published
//! `Arc`, so they never block a writer or see a half-applied change.

use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use async_trait::async_trait;
use sechub_core::{
    AttachError, Clock, ExecutionState, InvalidTransition, Job, JobEvent, JobStatus, JobUuid,
    Operation, ProductResult, ScanType, SourceError, StatusSource,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Errors from job store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("job {0} not found")]
    NotFound(JobUuid),
    #[error("job {0} already exists")]
    Duplicate(JobUuid),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
    #[error(transparent)]
    Attach(#[from] AttachError),
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
}

struct Inner {
    state: MaterializedState,
    wal: Option<Wal>,
}

impl Inner {
    fn record(&mut self, op: Operation) -> Result<(), StoreError> {
        if let Some(wal) = self.wal.as_mut() {
            wal.append(&op)?;
        }
        self.state.apply(&op);
        Ok(())
    }
}

/// Durable, concurrently readable job store
pub struct JobStore<C: Clock> {
    clock: C,
    inner: Mutex<Inner>,
    published: RwLock<HashMap<JobUuid, Arc<JobStatus>>>,
}

impl<C: Clock> JobStore<C> {
    /// Store without persistence
    pub fn in_memory(clock: C) -> Self {
        Self {
            clock,
            inner: Mutex::new(Inner {
                state: MaterializedState::default(),
                wal: None,
            }),
            published: RwLock::new(HashMap::new()),
        }
    }

    /// Open a store backed by the WAL at `path`, replaying existing entries
    pub fn open(path: &Path, clock: C) -> Result<Self, StoreError> {
        let mut state = MaterializedState::default();
        let ops = Wal::replay(path)?;
        for op in &ops {
            state.apply(op);
        }
        let wal = Wal::open(path)?;
        tracing::info!(
            path = %path.display(),
            operations = ops.len(),
            jobs = state.jobs.len(),
            "replayed job store"
        );

        let published = state
            .jobs
            .values()
            .map(|job| (job.uuid, Arc::new(JobStatus::from(job))))
            .collect();

        Ok(Self {
            clock,
            inner: Mutex::new(Inner {
                state,
                wal: Some(wal),
            }),
            published: RwLock::new(published),
        })
    }

    /// Create a job in `INITIALIZING`
    pub fn create(
        &self,
        uuid: JobUuid,
        project_id: &str,
        scan_types: Vec<ScanType>,
    ) -> Result<Job, StoreError> {
        let mut inner = self.lock();
        if inner.state.jobs.contains_key(&uuid) {
            return Err(StoreError::Duplicate(uuid));
        }

        let job = Job::new(uuid, project_id, scan_types, &self.clock);
        inner.record(Operation::JobCreate {
            id: job.uuid,
            project_id: job.project_id.clone(),
            scan_types: job.scan_types.clone(),
            created: job.created,
        })?;
        tracing::info!(job_uuid = %uuid, project_id, "job created");
        self.publish(&job);
        Ok(job)
    }

    /// Apply a lifecycle event; invalid transitions leave the job unchanged
    pub fn transition(&self, uuid: &JobUuid, event: JobEvent) -> Result<Job, StoreError> {
        let mut inner = self.lock();
        let current = inner
            .state
            .get_job(uuid)
            .ok_or(StoreError::NotFound(*uuid))?;

        let event_name = event.name();
        let next = current.transition(event, &self.clock)?;
        let at = match next.state {
            ExecutionState::Started => next.started,
            ExecutionState::Ended => next.ended,
            _ => None,
        }
        .unwrap_or_else(|| self.clock.utc_now());
        inner.record(Operation::transition(&next, at))?;
        tracing::info!(
            job_uuid = %uuid,
            event = event_name,
            state = %next.state,
            result = %next.result,
            "job transitioned"
        );

        let job = inner.state.get_job(uuid).cloned().unwrap_or(next);
        self.publish(&job);
        Ok(job)
    }

    /// Attach a product result to its (running) job
    pub fn attach(&self, result: ProductResult) -> Result<Job, StoreError> {
        let mut inner = self.lock();
        let uuid = result.job_uuid;
        let current = inner
            .state
            .get_job(&uuid)
            .ok_or(StoreError::NotFound(uuid))?;

        let next = current.attach(result.clone())?;
        inner.record(Operation::ProductResultAttach { result })?;
        tracing::debug!(
            job_uuid = %uuid,
            results = next.product_results.len(),
            "product result attached"
        );

        self.publish(&next);
        Ok(next)
    }

    /// Full job record
    pub fn job(&self, uuid: &JobUuid) -> Option<Job> {
        self.lock().state.get_job(uuid).cloned()
    }

    /// Latest published status snapshot
    pub fn status(&self, uuid: &JobUuid) -> Option<Arc<JobStatus>> {
        self.published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(uuid)
            .cloned()
    }

    /// Snapshots of every job, oldest first
    pub fn list(&self) -> Vec<Arc<JobStatus>> {
        let mut statuses: Vec<_> = self
            .published
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        statuses.sort_by(|a, b| {
            a.created
                .cmp(&b.created)
                .then_with(|| a.job_uuid.cmp(&b.job_uuid))
        });
        statuses
    }

    fn publish(&self, job: &Job) {
        self.published
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(job.uuid, Arc::new(JobStatus::from(job)));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl<C: Clock> StatusSource for JobStore<C> {
    async fn fetch(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<String>, SourceError> {
        let Some(status) = self.status(job_uuid) else {
            return Ok(None);
        };
        // Jobs of other projects are invisible, like on the REST API
        if status.project_id != project_id {
            return Ok(None);
        }
        status
            .to_json()
            .map(Some)
            .map_err(|e| SourceError(e.to_string()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
