// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scan products and their results

use crate::id::{JobUuid, ResultUuid};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Kind of scan a job requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanType {
    CodeScan,
    WebScan,
    InfraScan,
    LicenseScan,
    SecretScan,
}

impl ScanType {
    pub fn id(&self) -> &'static str {
        match self {
            ScanType::CodeScan => "codeScan",
            ScanType::WebScan => "webScan",
            ScanType::InfraScan => "infraScan",
            ScanType::LicenseScan => "licenseScan",
            ScanType::SecretScan => "secretScan",
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Closed set of product executors
///
/// Every identifier is bound to exactly one [`ScanType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductIdentifier {
    #[serde(rename = "PDS_CODESCAN")]
    PdsCodeScan,
    #[serde(rename = "PDS_WEBSCAN")]
    PdsWebScan,
    #[serde(rename = "PDS_INFRASCAN")]
    PdsInfraScan,
    #[serde(rename = "PDS_LICENSESCAN")]
    PdsLicenseScan,
    #[serde(rename = "PDS_SECRETSCAN")]
    PdsSecretScan,
}

impl ProductIdentifier {
    pub const ALL: [ProductIdentifier; 5] = [
        ProductIdentifier::PdsCodeScan,
        ProductIdentifier::PdsWebScan,
        ProductIdentifier::PdsInfraScan,
        ProductIdentifier::PdsLicenseScan,
        ProductIdentifier::PdsSecretScan,
    ];

    pub fn scan_type(&self) -> ScanType {
        match self {
            ProductIdentifier::PdsCodeScan => ScanType::CodeScan,
            ProductIdentifier::PdsWebScan => ScanType::WebScan,
            ProductIdentifier::PdsInfraScan => ScanType::InfraScan,
            ProductIdentifier::PdsLicenseScan => ScanType::LicenseScan,
            ProductIdentifier::PdsSecretScan => ScanType::SecretScan,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProductIdentifier::PdsCodeScan => "PDS_CODESCAN",
            ProductIdentifier::PdsWebScan => "PDS_WEBSCAN",
            ProductIdentifier::PdsInfraScan => "PDS_INFRASCAN",
            ProductIdentifier::PdsLicenseScan => "PDS_LICENSESCAN",
            ProductIdentifier::PdsSecretScan => "PDS_SECRETSCAN",
        }
    }
}

impl fmt::Display for ProductIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output record of one product invocation for a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResult {
    pub uuid: ResultUuid,
    pub job_uuid: JobUuid,
    pub product: ProductIdentifier,
    /// Id of the executor configuration that produced this result
    pub executor_config: String,
    /// Raw payload returned by the adapter
    pub result: String,
    pub success: bool,
    /// Retries the resilience layer needed before the adapter call succeeded
    pub retries: u32,
    #[serde(default)]
    pub meta_data: BTreeMap<String, String>,
    pub started: DateTime<Utc>,
    pub ended: DateTime<Utc>,
}

/// Key/value metadata an adapter reports while it runs (e.g. remote job ids)
///
/// Cloning shares the underlying map; the executor takes a snapshot once the
/// adapter returned.
#[derive(Debug, Clone, Default)]
pub struct AdapterMetaData {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl AdapterMetaData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[cfg(test)]
#[path = "product_tests.rs"]
mod tests;
