// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job state machine
//!
//! A job moves `INITIALIZING -> READY_TO_START -> STARTED -> ENDED`. A cancel
//! request may interrupt any non-terminal state and is always followed by
//! `ENDED`. Nothing leaves `ENDED`, and the execution result is set exactly
//! once, on entering it.

use crate::clock::Clock;
use crate::id::{JobUuid, ResultUuid};
use crate::product::{ProductResult, ScanType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle phase of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Initializing,
    ReadyToStart,
    Started,
    CancelRequested,
    Ended,
}

impl ExecutionState {
    pub const ALL: [ExecutionState; 5] = [
        ExecutionState::Initializing,
        ExecutionState::ReadyToStart,
        ExecutionState::Started,
        ExecutionState::CancelRequested,
        ExecutionState::Ended,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionState::Initializing => "INITIALIZING",
            ExecutionState::ReadyToStart => "READY_TO_START",
            ExecutionState::Started => "STARTED",
            ExecutionState::CancelRequested => "CANCEL_REQUESTED",
            ExecutionState::Ended => "ENDED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionState::Ended)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a job, meaningful once the job has ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionResult {
    #[default]
    None,
    Ok,
    Failed,
}

impl ExecutionResult {
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionResult::None => "NONE",
            ExecutionResult::Ok => "OK",
            ExecutionResult::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events that drive a job through its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// Scheduler accepted the job
    MarkReady,
    /// Executor chain begins
    Start,
    /// Client asked to cancel; advisory for in-flight product calls
    RequestCancel,
    /// Executor chain finished
    End {
        result: ExecutionResult,
        error: Option<String>,
    },
}

impl JobEvent {
    pub fn name(&self) -> &'static str {
        match self {
            JobEvent::MarkReady => "mark_ready",
            JobEvent::Start => "start",
            JobEvent::RequestCancel => "request_cancel",
            JobEvent::End { .. } => "end",
        }
    }
}

/// A transition the state machine does not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("job {job}: {event} is not allowed in state {from}")]
pub struct InvalidTransition {
    pub job: JobUuid,
    pub from: ExecutionState,
    pub event: &'static str,
}

/// Reasons a product result cannot be attached to a job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    #[error("product result {result} belongs to job {owner}, not {job}")]
    WrongJob {
        job: JobUuid,
        owner: JobUuid,
        result: ResultUuid,
    },
    #[error("job {job} does not accept product results in state {state}")]
    NotRunning { job: JobUuid, state: ExecutionState },
    #[error("product result {0} already attached")]
    Duplicate(ResultUuid),
}

/// A scan job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub uuid: JobUuid,
    pub project_id: String,
    pub scan_types: Vec<ScanType>,
    pub state: ExecutionState,
    pub result: ExecutionResult,
    pub created: DateTime<Utc>,
    pub started: Option<DateTime<Utc>>,
    pub ended: Option<DateTime<Utc>>,
    /// Why the job failed, when it did
    pub error: Option<String>,
    pub product_results: Vec<ProductResult>,
}

impl Job {
    /// Create a new job in the `INITIALIZING` state
    pub fn new(
        uuid: JobUuid,
        project_id: impl Into<String>,
        scan_types: Vec<ScanType>,
        clock: &impl Clock,
    ) -> Self {
        Job {
            uuid,
            project_id: project_id.into(),
            scan_types,
            state: ExecutionState::Initializing,
            result: ExecutionResult::None,
            created: clock.utc_now(),
            started: None,
            ended: None,
            error: None,
            product_results: Vec::new(),
        }
    }

    /// Pure transition function - returns the job after `event`
    pub fn transition(&self, event: JobEvent, clock: &impl Clock) -> Result<Job, InvalidTransition> {
        let rejected = |event: &JobEvent| InvalidTransition {
            job: self.uuid,
            from: self.state,
            event: event.name(),
        };

        match (self.state, event) {
            (ExecutionState::Initializing, JobEvent::MarkReady) => Ok(Job {
                state: ExecutionState::ReadyToStart,
                ..self.clone()
            }),

            (ExecutionState::ReadyToStart, JobEvent::Start) => Ok(Job {
                state: ExecutionState::Started,
                started: Some(clock.utc_now()),
                ..self.clone()
            }),

            (
                ExecutionState::Initializing
                | ExecutionState::ReadyToStart
                | ExecutionState::Started,
                JobEvent::RequestCancel,
            ) => Ok(Job {
                state: ExecutionState::CancelRequested,
                ..self.clone()
            }),

            // NONE is not a valid outcome of an ended job
            (_, event @ JobEvent::End {
                result: ExecutionResult::None,
                ..
            }) => Err(rejected(&event)),

            (
                ExecutionState::Started | ExecutionState::CancelRequested,
                JobEvent::End { result, error },
            ) => Ok(Job {
                state: ExecutionState::Ended,
                result,
                ended: Some(clock.utc_now()),
                error,
                ..self.clone()
            }),

            (_, event) => Err(rejected(&event)),
        }
    }

    /// Attach a product result; only running jobs accept results
    pub fn attach(&self, result: ProductResult) -> Result<Job, AttachError> {
        if result.job_uuid != self.uuid {
            return Err(AttachError::WrongJob {
                job: self.uuid,
                owner: result.job_uuid,
                result: result.uuid,
            });
        }
        if !matches!(
            self.state,
            ExecutionState::Started | ExecutionState::CancelRequested
        ) {
            return Err(AttachError::NotRunning {
                job: self.uuid,
                state: self.state,
            });
        }
        if self.product_results.iter().any(|r| r.uuid == result.uuid) {
            return Err(AttachError::Duplicate(result.uuid));
        }

        let mut job = self.clone();
        job.product_results.push(result);
        Ok(job)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.state == ExecutionState::CancelRequested
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
