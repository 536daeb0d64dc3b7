// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for scan products and uploaded content

pub mod content;
pub mod inspect;
pub mod product;
pub mod traced;

pub use content::{ContentError, ContentProvider, ContentStream, StorageContentProvider};
pub use inspect::{MetaDataInspector, TracingInspector, TRACE_ID};
pub use product::{AdapterError, AdapterRequest, NoOpProductAdapter, ProductAdapter};
pub use traced::{TracedContentProvider, TracedProductAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use content::FakeContentProvider;
#[cfg(any(test, feature = "test-support"))]
pub use inspect::{MemoryInspector, Notice};
#[cfg(any(test, feature = "test-support"))]
pub use product::{AdapterCall, FakeProductAdapter};
