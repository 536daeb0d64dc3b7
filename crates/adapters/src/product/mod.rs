// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product adapters: the call into a concrete scan product

mod noop;

pub use noop::NoOpProductAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{AdapterCall, FakeProductAdapter};

use crate::content::{ContentError, ContentStream};
use async_trait::async_trait;
use sechub_core::{AdapterMetaData, JobUuid, ProductIdentifier, ValidatedExecutorConfig};
use thiserror::Error;

/// Errors from a product adapter call
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("product server unreachable: {0}")]
    Unreachable(String),
    #[error("product call timed out: {0}")]
    Timeout(String),
    #[error("product server answered {status}: {message}")]
    Http { status: u16, message: String },
    #[error("product run failed: {0}")]
    Failed(String),
    #[error(transparent)]
    Content(#[from] ContentError),
}

impl AdapterError {
    /// HTTP status of the failed call, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            AdapterError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Everything one adapter call gets
///
/// Content streams are owned by the request and released when it is dropped,
/// whether the adapter read them or not.
#[derive(Debug)]
pub struct AdapterRequest {
    pub trace_id: String,
    pub job_uuid: JobUuid,
    pub project_id: String,
    pub product: ProductIdentifier,
    pub config: ValidatedExecutorConfig,
    pub source_zip: Option<ContentStream>,
    pub binaries_tar: Option<ContentStream>,
}

/// Adapter for one product integration
#[async_trait]
pub trait ProductAdapter: Clone + Send + Sync + 'static {
    /// Run the product and return its raw result payload
    ///
    /// `meta` is scoped to this invocation; whatever the adapter records
    /// there ends up on the product result.
    async fn start(
        &self,
        request: AdapterRequest,
        meta: &AdapterMetaData,
    ) -> Result<String, AdapterError>;
}
