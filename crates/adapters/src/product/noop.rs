// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op product adapter for executors without a product backend.

use super::{AdapterError, AdapterRequest, ProductAdapter};
use async_trait::async_trait;
use sechub_core::AdapterMetaData;

/// Product adapter that returns an empty payload.
///
/// Used for dry runs where the executor chain should complete without
/// contacting a product server.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpProductAdapter;

impl NoOpProductAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProductAdapter for NoOpProductAdapter {
    async fn start(
        &self,
        _request: AdapterRequest,
        _meta: &AdapterMetaData,
    ) -> Result<String, AdapterError> {
        Ok(String::new())
    }
}
