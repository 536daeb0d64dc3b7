// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sechub-core: Core library for SecHub scan job scheduling
//!
//! This crate provides:
//! - The pure job lifecycle state machine
//! - Product identifiers, product results and result slots
//! - Executor configuration and environment resolution
//! - WAL operations
//! - The job status document and the status poller

pub mod clock;
pub mod config;
pub mod id;
pub mod job;
pub mod operation;
pub mod poller;
pub mod product;
pub mod status;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{
    ConfigError, ExecutorSetup, PollerSettings, ProductExecutorConfig, ResilienceSettings,
    SecHubConfig, SystemEnvironment, ValidatedExecutorConfig,
};
pub use id::{IdGen, JobUuid, ResultUuid, SequentialIdGen, UuidIdGen};
pub use job::{AttachError, ExecutionResult, ExecutionState, InvalidTransition, Job, JobEvent};
pub use operation::Operation;
pub use poller::{
    AssertionError, JobStatusPoller, Observation, PollError, SourceError, StatusSource,
};
pub use product::{AdapterMetaData, ProductIdentifier, ProductResult, ScanType};
pub use status::{job_status_path, JobStatus};
