// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log

use crate::id::JobUuid;
use crate::job::{ExecutionResult, ExecutionState, Job};
use crate::product::{ProductResult, ScanType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Create a new job in `INITIALIZING`
    JobCreate {
        id: JobUuid,
        project_id: String,
        scan_types: Vec<ScanType>,
        created: DateTime<Utc>,
    },

    /// Record the outcome of an accepted state transition
    JobTransition {
        id: JobUuid,
        state: ExecutionState,
        result: ExecutionResult,
        at: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// Attach a product result to its job
    ProductResultAttach { result: ProductResult },
}

impl Operation {
    /// Operation recording a job that just changed state
    pub fn transition(after: &Job, at: DateTime<Utc>) -> Self {
        Operation::JobTransition {
            id: after.uuid,
            state: after.state,
            result: after.result,
            at,
            error: after.error.clone(),
        }
    }

    /// The job this operation touches
    pub fn job_uuid(&self) -> JobUuid {
        match self {
            Operation::JobCreate { id, .. } | Operation::JobTransition { id, .. } => *id,
            Operation::ProductResultAttach { result } => result.job_uuid,
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
