// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable snapshot of the process environment

use std::collections::BTreeMap;

/// Prefix marking a configuration value as an environment variable reference
pub const ENV_PREFIX: &str = "env:";

/// Environment variables captured once at startup
///
/// Executor configurations are validated against this snapshot instead of
/// reading the process environment directly, so validation is repeatable and
/// tests can inject their own values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemEnvironment {
    vars: BTreeMap<String, String>,
}

impl SystemEnvironment {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Resolve a configured value: `env:NAME` reads `NAME`, anything else is
    /// returned as is. `Err` carries the missing variable name.
    pub fn resolve<'a>(&'a self, value: &'a str) -> Result<&'a str, String> {
        match value.strip_prefix(ENV_PREFIX) {
            Some(name) => self.get(name.trim()).ok_or_else(|| name.trim().to_string()),
            None => Ok(value),
        }
    }
}
