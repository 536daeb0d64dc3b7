// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! SecHub job execution engine

mod error;
mod product;
pub mod resilience;
mod scheduler;

pub use error::EngineError;
pub use product::{
    trace_id, ExecutionContext, ExecutorError, ProductExecutor, ProductExecutorDeps,
};
pub use resilience::{
    pds_consultant, Consultant, ResilienceContext, ResilienceError, ResilienceProposal,
    ResilientActionExecutor, ResilientOutcome,
};
pub use scheduler::{JobScheduler, SchedulerDeps, CANCELED};
