// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::content::{ContentError, ContentProvider, ContentStream};
use crate::product::{AdapterError, AdapterRequest, ProductAdapter};
use async_trait::async_trait;
use sechub_core::{AdapterMetaData, JobUuid};
use tracing::Instrument;

/// Wrapper that adds tracing to any ProductAdapter
#[derive(Clone)]
pub struct TracedProductAdapter<A> {
    inner: A,
}

impl<A> TracedProductAdapter<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: ProductAdapter> ProductAdapter for TracedProductAdapter<A> {
    async fn start(
        &self,
        request: AdapterRequest,
        meta: &AdapterMetaData,
    ) -> Result<String, AdapterError> {
        let span = tracing::info_span!(
            "product.start",
            trace_id = %request.trace_id,
            product = %request.product,
            executor = %request.config.id,
        );

        async move {
            tracing::info!(
                job_uuid = %request.job_uuid,
                source_zip = request.source_zip.is_some(),
                binaries_tar = request.binaries_tar.is_some(),
                "starting"
            );

            let start = std::time::Instant::now();
            let result = self.inner.start(request, meta).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(payload) => tracing::info!(
                    payload_len = payload.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "product finished"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "product failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ContentProvider
#[derive(Clone)]
pub struct TracedContentProvider<C> {
    inner: C,
}

impl<C> TracedContentProvider<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: ContentProvider> ContentProvider for TracedContentProvider<C> {
    async fn source_zip(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError> {
        let result = self.inner.source_zip(project_id, job_uuid).await;
        log_content("sourcecode.zip", &result);
        result
    }

    async fn binaries_tar(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError> {
        let result = self.inner.binaries_tar(project_id, job_uuid).await;
        log_content("binaries.tar", &result);
        result
    }
}

fn log_content(name: &str, result: &Result<Option<ContentStream>, ContentError>) {
    match result {
        Ok(stream) => tracing::debug!(name, present = stream.is_some(), "content acquired"),
        Err(e) => tracing::warn!(name, error = %e, "content unavailable"),
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
