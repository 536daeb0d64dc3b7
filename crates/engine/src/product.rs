// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product executor: one product integration for one job

use crate::resilience::{pds_consultant, ResilienceError, ResilientActionExecutor};
use sechub_adapters::{
    AdapterError, AdapterRequest, ContentProvider, MetaDataInspector, ProductAdapter, TRACE_ID,
};
use sechub_core::{
    AdapterMetaData, Clock, ConfigError, IdGen, JobUuid, ProductExecutorConfig,
    ProductIdentifier, ProductResult, ResilienceSettings, SystemEnvironment,
};
use thiserror::Error;
use tracing::Instrument;

/// Errors from a product execution
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("executor {executor} failed: {source}")]
    Product {
        executor: String,
        #[source]
        source: ResilienceError<AdapterError>,
    },
}

/// What an executor knows about the job it runs for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    pub job_uuid: JobUuid,
    pub project_id: String,
    /// Who or what triggered the run, for logging
    pub triggered_by: Option<String>,
}

/// How a product variant uses uploaded content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentUse {
    /// Archives are passed on when present
    Optional,
    /// At least one archive must be present
    Required,
    /// Archives are never opened
    Never,
}

fn content_use(product: ProductIdentifier) -> ContentUse {
    match product {
        ProductIdentifier::PdsCodeScan | ProductIdentifier::PdsLicenseScan => ContentUse::Required,
        ProductIdentifier::PdsSecretScan => ContentUse::Optional,
        ProductIdentifier::PdsWebScan | ProductIdentifier::PdsInfraScan => ContentUse::Never,
    }
}

/// Trace id handed to the adapter and noticed in the scan metadata
pub fn trace_id(job_uuid: &JobUuid, product: ProductIdentifier) -> String {
    format!("sechub-{}-{}", job_uuid, product.name())
}

/// Collaborators of a [`ProductExecutor`]
pub struct ProductExecutorDeps<A, P, M, C, I> {
    pub adapter: A,
    pub content: P,
    pub inspector: M,
    pub clock: C,
    pub ids: I,
    pub env: SystemEnvironment,
}

/// Runs product adapters under the PDS retry policy
pub struct ProductExecutor<A, P, M, C: Clock, I: IdGen> {
    adapter: A,
    content: P,
    inspector: M,
    clock: C,
    ids: I,
    env: SystemEnvironment,
    resilience: ResilientActionExecutor<AdapterError>,
}

impl<A, P, M, C, I> ProductExecutor<A, P, M, C, I>
where
    A: ProductAdapter,
    P: ContentProvider,
    M: MetaDataInspector,
    C: Clock,
    I: IdGen,
{
    pub fn new(deps: ProductExecutorDeps<A, P, M, C, I>, settings: ResilienceSettings) -> Self {
        Self {
            adapter: deps.adapter,
            content: deps.content,
            inspector: deps.inspector,
            clock: deps.clock,
            ids: deps.ids,
            env: deps.env,
            resilience: ResilientActionExecutor::new().with_consultant(pds_consultant(settings)),
        }
    }

    /// Execute one product integration; yields exactly one result on success
    pub async fn execute(
        &self,
        context: &ExecutionContext,
        config: &ProductExecutorConfig,
    ) -> Result<Vec<ProductResult>, ExecutorError> {
        let span = tracing::info_span!(
            "product.execute",
            job_uuid = %context.job_uuid,
            product = %config.product,
            executor = %config.id,
        );
        self.execute_inner(context, config).instrument(span).await
    }

    async fn execute_inner(
        &self,
        context: &ExecutionContext,
        config: &ProductExecutorConfig,
    ) -> Result<Vec<ProductResult>, ExecutorError> {
        let validated = config.validate(&self.env)?;
        let product = config.product;
        let content_use = content_use(product);
        if content_use == ContentUse::Required && !self.has_content(context).await {
            return Err(ConfigError::InvalidSetup {
                executor: config.id.clone(),
                reason: format!(
                    "{} needs a source zip or binaries tar, job {} has neither",
                    product.scan_type(),
                    context.job_uuid
                ),
            }
            .into());
        }

        let trace_id = trace_id(&context.job_uuid, product);
        self.inspector.notice(product.name(), TRACE_ID, &trace_id);
        tracing::info!(triggered_by = context.triggered_by.as_deref(), "executing product");

        let started = self.clock.utc_now();
        let outcome = self
            .resilience
            .execute_resilient(|| {
                let validated = validated.clone();
                let trace_id = trace_id.clone();
                async move {
                    // Fresh streams and metadata per attempt; the request owns the streams
                    let (source_zip, binaries_tar) = match content_use {
                        ContentUse::Never => (None, None),
                        ContentUse::Optional | ContentUse::Required => (
                            self.content
                                .source_zip(&context.project_id, &context.job_uuid)
                                .await?,
                            self.content
                                .binaries_tar(&context.project_id, &context.job_uuid)
                                .await?,
                        ),
                    };
                    let request = AdapterRequest {
                        trace_id,
                        job_uuid: context.job_uuid,
                        project_id: context.project_id.clone(),
                        product,
                        config: validated,
                        source_zip,
                        binaries_tar,
                    };
                    let meta = AdapterMetaData::new();
                    let payload = self.adapter.start(request, &meta).await?;
                    Ok::<_, AdapterError>((payload, meta.snapshot()))
                }
            })
            .await
            .map_err(|source| ExecutorError::Product {
                executor: config.id.clone(),
                source,
            })?;
        let (payload, meta_data) = outcome.value;

        tracing::info!(retries = outcome.retries, "product result ready");
        Ok(vec![ProductResult {
            uuid: self.ids.next_result(),
            job_uuid: context.job_uuid,
            product,
            executor_config: config.id.clone(),
            result: payload,
            success: true,
            retries: outcome.retries,
            meta_data,
            started,
            ended: self.clock.utc_now(),
        }])
    }

    /// Whether the job has any archive; probed streams are released at once
    ///
    /// An archive that exists but cannot be opened counts as present, so the
    /// open failure surfaces from the adapter call instead.
    async fn has_content(&self, context: &ExecutionContext) -> bool {
        let source_zip = self
            .content
            .source_zip(&context.project_id, &context.job_uuid)
            .await;
        if !matches!(source_zip, Ok(None)) {
            return true;
        }
        let binaries_tar = self
            .content
            .binaries_tar(&context.project_id, &context.job_uuid)
            .await;
        !matches!(binaries_tar, Ok(None))
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
