// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! [resilience]
//! max_retries = 3
//! retry_wait = "10s"
//!
//! [poller]
//! interval = "500ms"
//! timeout = "6s"
//!
//! [[executors]]
//! id = "pds-license"
//! product = "PDS_LICENSESCAN"
//! priority = 1
//! setup = { base_url = "https://pds.example.org", user = "env:PDS_USER", password = "env:PDS_TOKEN" }
//! parameters = { "pds.config.productidentifier" = "PDS_SCANCODE" }
//! ```

mod environment;
mod executor;

pub use environment::{SystemEnvironment, ENV_PREFIX};
pub use executor::{
    ExecutorSetup, ProductExecutorConfig, Secret, ValidatedExecutorConfig,
    PARAM_PRODUCT_IDENTIFIER, PARAM_TIMEOUT_MINUTES, PARAM_TRUST_ALL_CERTIFICATES,
    PARAM_WAIT_NEXT_CHECK_MS,
};

use crate::product::ScanType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("executor {executor}: environment variable {variable} is not set")]
    MissingEnvironment { executor: String, variable: String },
    #[error("executor {executor}: missing parameter {key}")]
    MissingParameter { executor: String, key: String },
    #[error("executor {executor}: invalid value '{value}' for {key}: {reason}")]
    InvalidParameter {
        executor: String,
        key: String,
        value: String,
        reason: String,
    },
    #[error("executor {executor}: {reason}")]
    InvalidSetup { executor: String, reason: String },
    #[error("executor id {0} is configured more than once")]
    DuplicateExecutor(String),
}

/// Retry policy for calls to the delegation server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceSettings {
    pub max_retries: u32,
    #[serde(with = "humantime_serde")]
    pub retry_wait: Duration,
}

impl Default for ResilienceSettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_wait: Duration::from_secs(10),
        }
    }
}

/// Status polling behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: crate::poller::DEFAULT_INTERVAL,
            timeout: crate::poller::DEFAULT_TIMEOUT,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecHubConfig {
    pub resilience: ResilienceSettings,
    pub poller: PollerSettings,
    pub executors: Vec<ProductExecutorConfig>,
}

impl SecHubConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: SecHubConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut seen = HashSet::new();
        for executor in &config.executors {
            if !seen.insert(executor.id.as_str()) {
                return Err(ConfigError::DuplicateExecutor(executor.id.clone()));
            }
        }
        Ok(config)
    }

    /// Enabled executors whose product serves one of the scan types,
    /// in ascending priority (ties broken by id)
    pub fn executors_for(&self, scan_types: &[ScanType]) -> Vec<&ProductExecutorConfig> {
        let mut matched: Vec<_> = self
            .executors
            .iter()
            .filter(|e| e.enabled && scan_types.contains(&e.product.scan_type()))
            .collect();
        matched.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.id.cmp(&b.id)));
        matched
    }

    /// Validate every executor, collecting all failures
    pub fn validate(&self, env: &SystemEnvironment) -> Vec<ConfigError> {
        self.executors
            .iter()
            .filter_map(|e| e.validate(env).err())
            .collect()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
