// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SecHub server client for CLI commands

use async_trait::async_trait;
use clap::Args;
use sechub_core::config::Secret;
use sechub_core::{
    job_status_path, JobUuid, PollerSettings, SourceError, StatusSource, SystemEnvironment,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const ENV_SERVER: &str = "SECHUB_SERVER";
pub const ENV_USER: &str = "SECHUB_USERID";
pub const ENV_APITOKEN: &str = "SECHUB_APITOKEN";

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Pause between two status fetches
pub fn poll_interval(settings: &PollerSettings) -> Duration {
    parse_duration_ms("SECHUB_POLL_INTERVAL_MS").unwrap_or(settings.interval)
}

/// Time to wait for a job to appear or disappear
pub fn await_timeout(settings: &PollerSettings) -> Duration {
    parse_duration_ms("SECHUB_TIMEOUT_MS").unwrap_or(settings.timeout)
}

/// Client errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("no server configured, pass --server or set SECHUB_SERVER")]
    NoServer,

    #[error("server url must be http(s), was '{0}'")]
    InvalidServer(String),

    #[error("no credentials configured, pass --user/--apitoken or set SECHUB_USERID and SECHUB_APITOKEN")]
    NoCredentials,
}

/// Server connection flags; each falls back to its environment variable
#[derive(Args, Debug, Clone, Default)]
pub struct ServerArgs {
    /// Server url [env: SECHUB_SERVER]
    #[arg(long)]
    pub server: Option<String>,
    /// User id [env: SECHUB_USERID]
    #[arg(long)]
    pub user: Option<String>,
    /// API token [env: SECHUB_APITOKEN]
    #[arg(long)]
    pub apitoken: Option<String>,
}

/// Resolved connection to a SecHub server
#[derive(Debug, Clone)]
pub struct ServerSettings {
    base_url: String,
    user: String,
    token: Secret,
}

impl ServerSettings {
    pub fn resolve(args: &ServerArgs, env: &SystemEnvironment) -> Result<Self, ClientError> {
        let pick = |flag: &Option<String>, var: &str| {
            flag.clone()
                .or_else(|| env.get(var).map(str::to_string))
                .filter(|v| !v.trim().is_empty())
        };

        let server = pick(&args.server, ENV_SERVER).ok_or(ClientError::NoServer)?;
        let server = server.trim();
        if !(server.starts_with("https://") || server.starts_with("http://")) {
            return Err(ClientError::InvalidServer(server.to_string()));
        }

        let user = pick(&args.user, ENV_USER).ok_or(ClientError::NoCredentials)?;
        let token = pick(&args.apitoken, ENV_APITOKEN).ok_or(ClientError::NoCredentials)?;

        Ok(Self {
            base_url: server.trim_end_matches('/').to_string(),
            user,
            token: Secret::new(token),
        })
    }

    pub fn status_url(&self, project_id: &str, job_uuid: &JobUuid) -> String {
        format!("{}{}", self.base_url, job_status_path(project_id, job_uuid))
    }

    fn authorization(&self) -> String {
        let credentials = format!("{}:{}", self.user, self.token.expose());
        format!("Basic {}", base64::encode(credentials))
    }
}

/// Status source reading `GET /api/project/{project}/job/{job}`
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    settings: Arc<ServerSettings>,
}

impl HttpStatusSource {
    pub fn new(settings: ServerSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(
        &self,
        project_id: &str,
        job_uuid: &JobUuid,
    ) -> Result<Option<String>, SourceError> {
        let url = self.settings.status_url(project_id, job_uuid);
        let authorization = self.settings.authorization();

        tokio::task::spawn_blocking(move || get_status(&url, &authorization))
            .await
            .map_err(|e| SourceError(format!("status request aborted: {}", e)))?
    }
}

fn get_status(url: &str, authorization: &str) -> Result<Option<String>, SourceError> {
    tracing::debug!(url, "fetching job status");
    match ureq::get(url).header("Authorization", authorization).call() {
        Ok(mut response) => response
            .body_mut()
            .read_to_string()
            .map(Some)
            .map_err(|e| SourceError(format!("failed to read response: {}", e))),
        Err(ureq::Error::StatusCode(404)) => Ok(None),
        Err(e) => Err(SourceError(format!("HTTP request failed: {}", e))),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
