// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scan metadata inspection
//!
//! An inspection is a named bag of notices collected while a job runs (for
//! example the trace id handed to a product adapter).

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{MemoryInspector, Notice};

/// Notice key for the adapter trace id
pub const TRACE_ID: &str = "traceId";

/// Collector of scan metadata notices
pub trait MetaDataInspector: Clone + Send + Sync + 'static {
    fn notice(&self, inspection: &str, key: &str, value: &str);
}

/// Inspector that reports notices through `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingInspector;

impl MetaDataInspector for TracingInspector {
    fn notice(&self, inspection: &str, key: &str, value: &str) {
        tracing::info!(inspection, key, value, "metadata notice");
    }
}
