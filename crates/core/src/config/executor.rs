// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Product executor configuration and its validation

use super::environment::SystemEnvironment;
use super::ConfigError;
use crate::product::ProductIdentifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Identifier of the product on the delegation server
pub const PARAM_PRODUCT_IDENTIFIER: &str = "pds.config.productidentifier";
/// Pause between two status checks against the delegation server
pub const PARAM_WAIT_NEXT_CHECK_MS: &str = "pds.productexecutor.timetowait.nextcheck.milliseconds";
/// Overall time a product run may take
pub const PARAM_TIMEOUT_MINUTES: &str = "pds.productexecutor.timeout.minutes";
/// Accept any TLS certificate of the delegation server
pub const PARAM_TRUST_ALL_CERTIFICATES: &str = "pds.productexecutor.trustall.certificates";

const DEFAULT_WAIT_NEXT_CHECK: Duration = Duration::from_millis(2000);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120 * 60);

/// Connection setup of a product executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorSetup {
    pub base_url: String,
    /// User name or `env:NAME`
    pub user: String,
    /// Password / API token or `env:NAME`
    pub password: String,
}

/// Static configuration of one product executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductExecutorConfig {
    pub id: String,
    pub product: ProductIdentifier,
    /// Executors of a job run in ascending priority
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub setup: ExecutorSetup,
    /// Free-form parameters; values may be `env:NAME` references
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    true
}

/// Credential value that never shows up in logs
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Executor configuration with all environment references resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExecutorConfig {
    pub id: String,
    pub product: ProductIdentifier,
    pub base_url: String,
    pub user: String,
    pub password: Secret,
    pub product_identifier: String,
    pub time_to_wait_for_next_check: Duration,
    pub timeout: Duration,
    pub trust_all_certificates: bool,
    pub parameters: BTreeMap<String, String>,
}

impl ProductExecutorConfig {
    /// Validate against the environment; never touches the network
    pub fn validate(&self, env: &SystemEnvironment) -> Result<ValidatedExecutorConfig, ConfigError> {
        let base_url = self.setup.base_url.trim();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidSetup {
                executor: self.id.clone(),
                reason: format!("base url must be http(s), was '{}'", self.setup.base_url),
            });
        }

        let user = self.resolve(env, &self.setup.user)?;
        let password = self.resolve(env, &self.setup.password)?;
        if user.is_empty() || password.is_empty() {
            return Err(ConfigError::InvalidSetup {
                executor: self.id.clone(),
                reason: "credentials must not be empty".to_string(),
            });
        }

        let mut parameters = BTreeMap::new();
        for (key, value) in &self.parameters {
            parameters.insert(key.clone(), self.resolve(env, value)?);
        }

        let product_identifier = parameters
            .get(PARAM_PRODUCT_IDENTIFIER)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .ok_or_else(|| ConfigError::MissingParameter {
                executor: self.id.clone(),
                key: PARAM_PRODUCT_IDENTIFIER.to_string(),
            })?;

        let time_to_wait_for_next_check = self
            .number(&parameters, PARAM_WAIT_NEXT_CHECK_MS)?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_WAIT_NEXT_CHECK);
        let timeout = match self.number(&parameters, PARAM_TIMEOUT_MINUTES)? {
            None => DEFAULT_TIMEOUT,
            Some(minutes) => minutes
                .checked_mul(60)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidParameter {
                    executor: self.id.clone(),
                    key: PARAM_TIMEOUT_MINUTES.to_string(),
                    value: minutes.to_string(),
                    reason: "timeout too large".to_string(),
                })?,
        };
        let trust_all_certificates = match parameters.get(PARAM_TRUST_ALL_CERTIFICATES) {
            None => false,
            Some(value) => value.trim().parse::<bool>().map_err(|_| ConfigError::InvalidParameter {
                executor: self.id.clone(),
                key: PARAM_TRUST_ALL_CERTIFICATES.to_string(),
                value: value.clone(),
                reason: "expected true or false".to_string(),
            })?,
        };

        Ok(ValidatedExecutorConfig {
            id: self.id.clone(),
            product: self.product,
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            password: Secret::new(password),
            product_identifier,
            time_to_wait_for_next_check,
            timeout,
            trust_all_certificates,
            parameters,
        })
    }

    fn resolve(&self, env: &SystemEnvironment, value: &str) -> Result<String, ConfigError> {
        env.resolve(value)
            .map(str::to_string)
            .map_err(|variable| ConfigError::MissingEnvironment {
                executor: self.id.clone(),
                variable,
            })
    }

    fn number(
        &self,
        parameters: &BTreeMap<String, String>,
        key: &str,
    ) -> Result<Option<u64>, ConfigError> {
        parameters
            .get(key)
            .map(|value| {
                value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidParameter {
                    executor: self.id.clone(),
                    key: key.to_string(),
                    value: value.clone(),
                    reason: "expected a positive number".to_string(),
                })
            })
            .transpose()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
