// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake product adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{AdapterError, AdapterRequest, ProductAdapter};
use async_trait::async_trait;
use sechub_core::{AdapterMetaData, JobUuid, ProductIdentifier};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Recorded adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterCall {
    pub trace_id: String,
    pub job_uuid: JobUuid,
    pub product: ProductIdentifier,
    pub executor: String,
    /// Content of the source zip, if one was provided
    pub source_zip: Option<Vec<u8>>,
    /// Content of the binaries tar, if one was provided
    pub binaries_tar: Option<Vec<u8>>,
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<Result<String, AdapterError>>,
    calls: Vec<AdapterCall>,
}

/// Fake product adapter for testing
///
/// Replays scripted outcomes in order, then answers with the default payload.
#[derive(Clone)]
pub struct FakeProductAdapter {
    state: Arc<Mutex<FakeState>>,
    payload: String,
    metadata: BTreeMap<String, String>,
}

impl Default for FakeProductAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeProductAdapter {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            payload: r#"{"findings":[]}"#.to_string(),
            metadata: BTreeMap::new(),
        }
    }

    /// Payload returned once the script is used up
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Metadata the adapter records on every call
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Fail the next call with `error`
    pub fn fail_next(&self, error: AdapterError) {
        self.lock().script.push_back(Err(error));
    }

    /// Fail the next `times` calls with errors built by `make`
    pub fn fail_times(&self, times: usize, make: impl Fn() -> AdapterError) {
        let mut state = self.lock();
        for _ in 0..times {
            state.script.push_back(Err(make()));
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<AdapterCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ProductAdapter for FakeProductAdapter {
    async fn start(
        &self,
        request: AdapterRequest,
        meta: &AdapterMetaData,
    ) -> Result<String, AdapterError> {
        let source_zip = match request.source_zip {
            Some(stream) => Some(stream.read_all().await?),
            None => None,
        };
        let binaries_tar = match request.binaries_tar {
            Some(stream) => Some(stream.read_all().await?),
            None => None,
        };

        for (key, value) in &self.metadata {
            meta.set(key.clone(), value.clone());
        }

        let mut state = self.lock();
        state.calls.push(AdapterCall {
            trace_id: request.trace_id,
            job_uuid: request.job_uuid,
            product: request.product,
            executor: request.config.id,
            source_zip,
            binaries_tar,
        });

        match state.script.pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.payload.clone()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
