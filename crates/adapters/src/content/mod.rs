// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Uploaded scan content (source zip, binaries tar)

mod storage;

pub use storage::{StorageContentProvider, BINARIES_TAR, SOURCECODE_ZIP};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeContentProvider;

use async_trait::async_trait;
use sechub_core::JobUuid;
use std::fmt;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Errors from acquiring scan content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("cannot open {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// A readable content stream, released when dropped
pub struct ContentStream {
    name: String,
    reader: Pin<Box<dyn AsyncRead + Send>>,
}

impl ContentStream {
    pub fn new(name: impl Into<String>, reader: impl AsyncRead + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::pin(reader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the whole stream into memory, consuming it
    pub async fn read_all(mut self) -> Result<Vec<u8>, ContentError> {
        let mut buf = Vec::new();
        match self.reader.read_to_end(&mut buf).await {
            Ok(_) => Ok(buf),
            Err(source) => Err(ContentError::Read {
                name: self.name,
                source,
            }),
        }
    }

    pub fn into_reader(self) -> Pin<Box<dyn AsyncRead + Send>> {
        self.reader
    }
}

impl fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentStream")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Source of the content uploaded for a job
#[async_trait]
pub trait ContentProvider: Clone + Send + Sync + 'static {
    /// Open the source code zip; `Ok(None)` when none was uploaded
    async fn source_zip(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError>;

    /// Open the binaries tar; `Ok(None)` when none was uploaded
    async fn binaries_tar(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError>;
}
