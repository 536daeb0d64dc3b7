// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status document
//!
//! This is the read-only representation clients poll. It is produced from a
//! consistent job snapshot and never mutated once published.

use crate::id::JobUuid;
use crate::job::{ExecutionResult, ExecutionState, Job};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of one job as exposed by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(rename = "jobUUID")]
    pub job_uuid: JobUuid,
    pub project_id: String,
    pub execution_state: ExecutionState,
    pub execution_result: ExecutionResult,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of product results attached so far
    #[serde(default)]
    pub product_results: usize,
}

impl From<&Job> for JobStatus {
    fn from(job: &Job) -> Self {
        JobStatus {
            job_uuid: job.uuid,
            project_id: job.project_id.clone(),
            execution_state: job.state,
            execution_result: job.result,
            created: job.created,
            started: job.started,
            ended: job.ended,
            error: job.error.clone(),
            product_results: job.product_results.len(),
        }
    }
}

impl JobStatus {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Path of the status endpoint for a job, relative to the server root
pub fn job_status_path(project_id: &str, job_uuid: &JobUuid) -> String {
    format!("/api/project/{}/job/{}", project_id, job_uuid)
}
