// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job scheduler: drives jobs through their lifecycle

use crate::error::EngineError;
use crate::product::{ExecutionContext, ProductExecutor, ProductExecutorDeps};
use sechub_adapters::{ContentProvider, MetaDataInspector, ProductAdapter};
use sechub_core::{
    Clock, ExecutionResult, IdGen, Job, JobEvent, JobUuid, ScanType, SecHubConfig,
    SystemEnvironment,
};
use sechub_storage::{JobStore, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Error recorded on jobs that were cancelled
pub const CANCELED: &str = "canceled";

/// Scheduler dependencies
pub struct SchedulerDeps<A, P, M, C: Clock, I> {
    pub adapter: A,
    pub content: P,
    pub inspector: M,
    pub clock: C,
    pub ids: I,
    pub env: SystemEnvironment,
    pub store: Arc<JobStore<C>>,
}

/// Runs each job's executor chain and records the outcome
pub struct JobScheduler<A, P, M, C: Clock, I: IdGen> {
    store: Arc<JobStore<C>>,
    executor: ProductExecutor<A, P, M, C, I>,
    config: SecHubConfig,
    ids: I,
}

impl<A, P, M, C, I> JobScheduler<A, P, M, C, I>
where
    A: ProductAdapter,
    P: ContentProvider,
    M: MetaDataInspector,
    C: Clock,
    I: IdGen,
{
    pub fn new(deps: SchedulerDeps<A, P, M, C, I>, config: SecHubConfig) -> Self {
        let executor = ProductExecutor::new(
            ProductExecutorDeps {
                adapter: deps.adapter,
                content: deps.content,
                inspector: deps.inspector,
                clock: deps.clock,
                ids: deps.ids.clone(),
                env: deps.env,
            },
            config.resilience,
        );
        Self {
            store: deps.store,
            executor,
            config,
            ids: deps.ids,
        }
    }

    pub fn store(&self) -> &Arc<JobStore<C>> {
        &self.store
    }

    /// Create a job and mark it ready to start
    pub fn submit(&self, project_id: &str, scan_types: Vec<ScanType>) -> Result<Job, EngineError> {
        let uuid = self.ids.next_job();
        self.store.create(uuid, project_id, scan_types)?;
        Ok(self.store.transition(&uuid, JobEvent::MarkReady)?)
    }

    /// Ask a job to stop; running product calls are not interrupted
    pub fn cancel(&self, uuid: &JobUuid) -> Result<Job, EngineError> {
        Ok(self.store.transition(uuid, JobEvent::RequestCancel)?)
    }

    /// Run a ready job to completion
    ///
    /// Matching executors run one after another in priority order. The chain
    /// stops at the first failure or when a cancel request is seen between
    /// two executors.
    pub async fn run(&self, uuid: &JobUuid) -> Result<Job, EngineError> {
        let span = tracing::info_span!("job.run", job_uuid = %uuid);
        self.run_inner(uuid).instrument(span).await
    }

    async fn run_inner(&self, uuid: &JobUuid) -> Result<Job, EngineError> {
        let job = match self.store.transition(uuid, JobEvent::Start) {
            Ok(job) => job,
            // Cancelled before it could start
            Err(StoreError::Transition(_)) if self.is_cancel_requested(uuid) => {
                return self.end(uuid, None);
            }
            Err(e) => return Err(e.into()),
        };

        match self.run_executors(uuid, &job).await {
            Ok(failure) => self.end(uuid, failure),
            Err(e) => {
                // A started job must still reach a terminal state
                if let Err(end_error) = self.end(uuid, Some(e.to_string())) {
                    tracing::error!(error = %end_error, "could not end aborted job");
                }
                Err(e)
            }
        }
    }

    /// Run the matching executors; `Ok(Some(..))` carries a product failure
    async fn run_executors(
        &self,
        uuid: &JobUuid,
        job: &Job,
    ) -> Result<Option<String>, EngineError> {
        let context = ExecutionContext {
            job_uuid: job.uuid,
            project_id: job.project_id.clone(),
            triggered_by: None,
        };
        let executors = self.config.executors_for(&job.scan_types);
        tracing::info!(executors = executors.len(), "job started");

        for config in executors {
            if self.is_cancel_requested(uuid) {
                tracing::info!(next = %config.id, "cancel requested, skipping remaining executors");
                break;
            }
            match self.executor.execute(&context, config).await {
                Ok(results) => {
                    for result in results {
                        self.store.attach(result)?;
                    }
                }
                Err(e) => {
                    tracing::error!(executor = %config.id, error = %e, "executor failed");
                    return Ok(Some(e.to_string()));
                }
            }
        }
        Ok(None)
    }

    fn end(&self, uuid: &JobUuid, failure: Option<String>) -> Result<Job, EngineError> {
        let event = if self.is_cancel_requested(uuid) {
            JobEvent::End {
                result: ExecutionResult::Failed,
                error: Some(CANCELED.to_string()),
            }
        } else {
            match failure {
                Some(error) => JobEvent::End {
                    result: ExecutionResult::Failed,
                    error: Some(error),
                },
                None => JobEvent::End {
                    result: ExecutionResult::Ok,
                    error: None,
                },
            }
        };
        let job = self.store.transition(uuid, event)?;
        tracing::info!(result = %job.result, error = job.error.as_deref(), "job ended");
        Ok(job)
    }

    fn is_cancel_requested(&self, uuid: &JobUuid) -> bool {
        self.store
            .job(uuid)
            .is_some_and(|job| job.is_cancel_requested())
    }

    /// Run a job on the tokio runtime
    pub fn spawn(self: &Arc<Self>, uuid: JobUuid) -> JoinHandle<Result<Job, EngineError>> {
        let scheduler = Arc::clone(self);
        tokio::spawn(async move { scheduler.run(&uuid).await })
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
