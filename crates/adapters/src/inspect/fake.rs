// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory metadata inspector for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::MetaDataInspector;
use std::sync::{Arc, Mutex};

/// Recorded notice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub inspection: String,
    pub key: String,
    pub value: String,
}

/// Inspector that keeps every notice
#[derive(Clone, Default)]
pub struct MemoryInspector {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemoryInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded notices
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl MetaDataInspector for MemoryInspector {
    fn notice(&self, inspection: &str, key: &str, value: &str) {
        self.notices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notice {
                inspection: inspection.to_string(),
                key: key.to_string(),
                value: value.to_string(),
            });
    }
}
