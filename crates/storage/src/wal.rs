// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable job storage
//!
//! One JSON entry per line, synced to disk before `append` returns.

use sechub_core::Operation;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write-ahead log for durable operation storage
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create a WAL at the given path
    ///
    /// A torn final entry left by a crash mid-append is cut off so the next
    /// append starts on a fresh line.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        let scan = Scan::of(&bytes)?;

        let len = bytes.len() as u64;
        if scan.intact < len {
            tracing::warn!(
                path = %path.display(),
                dropped_bytes = len - scan.intact,
                "truncating torn WAL tail"
            );
            file.set_len(scan.intact)?;
            file.sync_all()?;
        } else if scan.unterminated {
            file.write_all(b"\n")?;
            file.sync_all()?;
        }

        let sequence = scan.entries.last().map_or(0, |entry| entry.seq);
        Ok(Self { file, sequence })
    }

    /// Append an operation to the log
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        self.sequence += 1;
        let entry = WalEntry {
            seq: self.sequence,
            op: op.clone(),
        };
        let mut line = serde_json::to_vec(&entry)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        self.file.sync_all()?;
        Ok(self.sequence)
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replay all operations from the log
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let scan = Scan::of(&bytes)?;
        Ok(scan.entries.into_iter().map(|entry| entry.op).collect())
    }
}

/// Parsed log contents
struct Scan {
    entries: Vec<WalEntry>,
    /// Length of the prefix that holds only complete entries
    intact: u64,
    /// The last entry parsed but its newline never made it to disk
    unterminated: bool,
}

impl Scan {
    fn of(bytes: &[u8]) -> Result<Self, WalError> {
        let mut scan = Scan {
            entries: Vec::new(),
            intact: 0,
            unterminated: false,
        };
        let mut offset = 0u64;

        for segment in bytes.split_inclusive(|b| *b == b'\n') {
            offset += segment.len() as u64;
            let terminated = segment.ends_with(b"\n");
            let body = segment.strip_suffix(b"\n").unwrap_or(segment);

            if body.iter().all(u8::is_ascii_whitespace) {
                if terminated {
                    scan.intact = offset;
                }
                continue;
            }
            match serde_json::from_slice::<WalEntry>(body) {
                Ok(entry) => {
                    scan.entries.push(entry);
                    scan.intact = offset;
                    scan.unterminated = !terminated;
                }
                // Only the final line can lack its newline: a crash mid-append
                Err(e) if !terminated => {
                    tracing::warn!(error = %e, "ignoring torn final WAL entry");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(scan)
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct WalEntry {
    seq: u64,
    op: Operation,
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
