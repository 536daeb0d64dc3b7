// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content provider backed by the local upload directory

use super::{ContentError, ContentProvider, ContentStream};
use async_trait::async_trait;
use sechub_core::JobUuid;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SOURCECODE_ZIP: &str = "sourcecode.zip";
pub const BINARIES_TAR: &str = "binaries.tar";

/// Reads uploads from `<root>/<project>/<job uuid>/`
#[derive(Clone, Debug)]
pub struct StorageContentProvider {
    root: PathBuf,
}

impl StorageContentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the uploads of one job
    pub fn job_dir(&self, project_id: &str, job_uuid: &JobUuid) -> PathBuf {
        self.root.join(project_id).join(job_uuid.to_string())
    }

    async fn open(&self, path: &Path) -> Result<Option<ContentStream>, ContentError> {
        let name = path.display().to_string();
        match tokio::fs::File::open(path).await {
            Ok(file) => {
                tracing::debug!(path = %name, "opened content");
                Ok(Some(ContentStream::new(name, file)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ContentError::Open { name, source }),
        }
    }
}

#[async_trait]
impl ContentProvider for StorageContentProvider {
    async fn source_zip(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError> {
        self.open(&self.job_dir(project_id, job_uuid).join(SOURCECODE_ZIP))
            .await
    }

    async fn binaries_tar(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<ContentStream>, ContentError> {
        self.open(&self.job_dir(project_id, job_uuid).join(BINARIES_TAR))
            .await
    }
}

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
