// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job status observation
//!
//! The poller repeatedly fetches a job's status document until the job shows
//! up (or disappears) or a timeout elapses. It is a read-side client: it has
//! no authority over job execution.
//!
//! Documents are parsed as JSON and the full `jobUUID` field is compared, so a
//! document for a different job whose UUID shares a prefix never counts as a
//! match.

use crate::id::JobUuid;
use crate::job::{ExecutionResult, ExecutionState};
use crate::status::JobStatus;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Default time to wait for a job to appear or disappear
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(6000);

/// Default pause between two fetches
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Error raised by a status source
#[derive(Debug, Error)]
#[error("status source failed: {0}")]
pub struct SourceError(pub String);

/// Where the poller gets status documents from
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw status document; `Ok(None)` when the job is unknown
    async fn fetch(&self, project_id: &str, job_uuid: &JobUuid)
        -> Result<Option<String>, SourceError>;
}

#[async_trait]
impl<S: StatusSource + ?Sized> StatusSource for std::sync::Arc<S> {
    async fn fetch(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<String>, SourceError> {
        (**self).fetch(project_id, job_uuid).await
    }
}

/// Errors from waiting on a job
#[derive(Debug, Error)]
pub enum PollError {
    #[error(
        "job {job_uuid} was {} after waiting {} ms, last seen:\n{}",
        presence_failure(.want_present),
        .waited.as_millis(),
        or_nothing(.last_seen)
    )]
    Timeout {
        job_uuid: JobUuid,
        want_present: bool,
        waited: Duration,
        last_seen: Option<String>,
    },
    #[error(transparent)]
    Source(#[from] SourceError),
}

fn presence_failure(want_present: &bool) -> &'static str {
    if *want_present {
        "not found"
    } else {
        "still found"
    }
}

fn or_nothing(json: &Option<String>) -> &str {
    json.as_deref().unwrap_or("<nothing>")
}

/// Failed point-in-time check on an observed document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("job data has no field {field}:\n{json}")]
    MissingField { field: &'static str, json: String },
    #[error("job data contains not {expected} but:\n{json}")]
    Mismatch { expected: String, json: String },
}

/// Polls a [`StatusSource`] for one project
pub struct JobStatusPoller<S> {
    source: S,
    project_id: String,
    interval: Duration,
}

impl<S: StatusSource> JobStatusPoller<S> {
    pub fn new(source: S, project_id: impl Into<String>) -> Self {
        Self {
            source,
            project_id: project_id.into(),
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wait until the job is present (or absent, if `want_present` is false)
    ///
    /// One fetch always happens after the timeout has passed, so a job that
    /// appears right at the deadline is still seen.
    pub async fn await_state(
        &self,
        job_uuid: &JobUuid,
        want_present: bool,
        timeout: Duration,
    ) -> Result<Observation, PollError> {
        let start = Instant::now();
        loop {
            let waited = start.elapsed();
            let time_elapsed = waited > timeout;

            let json = self.source.fetch(&self.project_id, job_uuid).await?;
            let found = json.as_deref().is_some_and(|body| matches_job(body, job_uuid));
            tracing::debug!(%job_uuid, found, want_present, waited_ms = waited.as_millis() as u64, "polled");

            if found == want_present {
                return Ok(Observation::new(*job_uuid, json));
            }
            if time_elapsed {
                return Err(PollError::Timeout {
                    job_uuid: *job_uuid,
                    want_present,
                    waited,
                    last_seen: json,
                });
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Wait up to [`DEFAULT_TIMEOUT`] for the job to appear
    pub async fn can_find_job(&self, job_uuid: &JobUuid) -> Result<Observation, PollError> {
        self.await_state(job_uuid, true, DEFAULT_TIMEOUT).await
    }

    /// Wait up to [`DEFAULT_TIMEOUT`] for the job to disappear
    pub async fn can_not_find_job(&self, job_uuid: &JobUuid) -> Result<Observation, PollError> {
        self.await_state(job_uuid, false, DEFAULT_TIMEOUT).await
    }
}

fn matches_job(body: &str, job_uuid: &JobUuid) -> bool {
    let Ok(document) = serde_json::from_str::<Value>(body) else {
        return false;
    };
    document
        .get("jobUUID")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<JobUuid>().ok())
        .is_some_and(|found| found == *job_uuid)
}

/// The last document fetched by a successful wait
#[derive(Debug, Clone)]
pub struct Observation {
    job_uuid: JobUuid,
    json: Option<String>,
    document: Option<Value>,
}

impl Observation {
    fn new(job_uuid: JobUuid, json: Option<String>) -> Self {
        let document = json
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok());
        Self {
            job_uuid,
            json,
            document,
        }
    }

    pub fn job_uuid(&self) -> &JobUuid {
        &self.job_uuid
    }

    /// Raw document as fetched
    pub fn json(&self) -> Option<&str> {
        self.json.as_deref()
    }

    /// Typed view of the document, if it is a complete status document
    pub fn status(&self) -> Option<JobStatus> {
        self.document
            .as_ref()
            .and_then(|doc| serde_json::from_value(doc.clone()).ok())
    }

    pub fn has_state(&self, expected: ExecutionState) -> Result<&Self, AssertionError> {
        self.has_one_of_states(&[expected])
    }

    pub fn has_one_of_states(&self, expected: &[ExecutionState]) -> Result<&Self, AssertionError> {
        let actual = self.field("executionState")?;
        if expected.iter().any(|state| state.name() == actual) {
            Ok(self)
        } else {
            Err(self.mismatch(NamesOf(expected)))
        }
    }

    pub fn has_result(&self, expected: ExecutionResult) -> Result<&Self, AssertionError> {
        let actual = self.field("executionResult")?;
        if expected.name() == actual {
            Ok(self)
        } else {
            Err(self.mismatch(expected))
        }
    }

    fn field(&self, field: &'static str) -> Result<&str, AssertionError> {
        self.document
            .as_ref()
            .and_then(|doc| doc.get(field))
            .and_then(Value::as_str)
            .ok_or_else(|| AssertionError::MissingField {
                field,
                json: self.json_for_message(),
            })
    }

    fn mismatch(&self, expected: impl fmt::Display) -> AssertionError {
        AssertionError::Mismatch {
            expected: expected.to_string(),
            json: self.json_for_message(),
        }
    }

    fn json_for_message(&self) -> String {
        self.json.clone().unwrap_or_else(|| "<nothing>".to_string())
    }
}

struct NamesOf<'a>(&'a [ExecutionState]);

impl fmt::Display for NamesOf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|s| s.name()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
