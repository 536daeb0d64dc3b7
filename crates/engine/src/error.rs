// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the job scheduler

use sechub_storage::StoreError;
use thiserror::Error;

/// Errors that can occur while scheduling jobs
///
/// Product failures are not errors at this level: they end the job FAILED.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
