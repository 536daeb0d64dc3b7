// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod config;
pub mod job;
pub mod run;

use serde::de::DeserializeOwned;

/// Parse a value by its wire name, e.g. `ENDED` or `licenseScan`
pub fn parse_name<T: DeserializeOwned>(value: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown value '{}'", value))
}
