// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake content provider for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ContentError, ContentProvider, ContentStream};
use async_trait::async_trait;
use sechub_core::JobUuid;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

#[derive(Default)]
struct Uploads {
    source_zip: Option<Vec<u8>>,
    binaries_tar: Option<Vec<u8>>,
}

/// In-memory content provider that tracks open streams
#[derive(Clone, Default)]
pub struct FakeContentProvider {
    uploads: Arc<Mutex<Uploads>>,
    open: Arc<AtomicUsize>,
    opened: Arc<AtomicUsize>,
}

impl FakeContentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_zip(self, content: impl Into<Vec<u8>>) -> Self {
        self.uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .source_zip = Some(content.into());
        self
    }

    pub fn with_binaries_tar(self, content: impl Into<Vec<u8>>) -> Self {
        self.uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .binaries_tar = Some(content.into());
        self
    }

    /// Streams handed out and not yet dropped
    pub fn open_streams(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    /// Streams handed out in total
    pub fn opened_streams(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn stream(&self, name: &str, content: Option<Vec<u8>>) -> Option<ContentStream> {
        let content = content?;
        self.open.fetch_add(1, Ordering::SeqCst);
        self.opened.fetch_add(1, Ordering::SeqCst);
        Some(ContentStream::new(
            name,
            TrackedReader {
                inner: Cursor::new(content),
                open: self.open.clone(),
            },
        ))
    }
}

#[async_trait]
impl ContentProvider for FakeContentProvider {
    async fn source_zip(
        &self,
        _project_id: &str,
        _job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError> {
        let content = self
            .uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .source_zip
            .clone();
        Ok(self.stream("sourcecode.zip", content))
    }

    async fn binaries_tar(
        &self,
        _project_id: &str,
        _job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError> {
        let content = self
            .uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .binaries_tar
            .clone();
        Ok(self.stream("binaries.tar", content))
    }
}

/// Reader that marks its stream released on drop
struct TrackedReader {
    inner: Cursor<Vec<u8>>,
    open: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}
