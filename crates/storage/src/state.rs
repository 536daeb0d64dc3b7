// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use sechub_core::{
    ExecutionResult, ExecutionState, Job, JobUuid, Operation, ProductResult,
};
use std::collections::HashMap;

/// Materialized state built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub jobs: HashMap<JobUuid, Job>,
}

impl MaterializedState {
    pub fn get_job(&self, id: &JobUuid) -> Option<&Job> {
        self.jobs.get(id)
    }

    /// Apply an operation to update the state
    ///
    /// Operations are validated before they are logged, so applying never
    /// fails; operations for unknown jobs are ignored.
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::JobCreate {
                id,
                project_id,
                scan_types,
                created,
            } => {
                self.jobs.entry(*id).or_insert_with(|| Job {
                    uuid: *id,
                    project_id: project_id.clone(),
                    scan_types: scan_types.clone(),
                    state: ExecutionState::Initializing,
                    result: ExecutionResult::None,
                    created: *created,
                    started: None,
                    ended: None,
                    error: None,
                    product_results: Vec::new(),
                });
            }

            Operation::JobTransition {
                id,
                state,
                result,
                at,
                error,
            } => {
                if let Some(job) = self.jobs.get_mut(id) {
                    job.state = *state;
                    job.result = *result;
                    job.error = error.clone();
                    match state {
                        ExecutionState::Started => job.started = Some(*at),
                        ExecutionState::Ended => job.ended = Some(*at),
                        _ => {}
                    }
                }
            }

            Operation::ProductResultAttach { result } => {
                if let Some(job) = self.jobs.get_mut(&result.job_uuid) {
                    attach_once(job, result);
                }
            }
        }
    }
}

fn attach_once(job: &mut Job, result: &ProductResult) {
    if !job.product_results.iter().any(|r| r.uuid == result.uuid) {
        job.product_results.push(result.clone());
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
