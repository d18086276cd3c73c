//! JSON-file seen-store implementation.
//!
//! Holds the full record set in memory behind a mutex (lookups are cheap
//! local reads; writes are serialized) and persists it as a single JSON file
//! with an atomic temp-file + rename write.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::store::{SeenRecord, SeenStore};

const STORE_VERSION: u32 = 1;

/// On-disk format of the seen-store file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    records: Vec<SeenRecord>,
}

/// File-backed seen-job store.
pub struct JsonSeenStore {
    path: PathBuf,
    records: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl JsonSeenStore {
    /// Open the store at the given path, loading existing records.
    ///
    /// A missing file is an empty store (first run); an unreadable or
    /// unparsable file is a `Storage` error and aborts the run.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file: StoreFile = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::storage(format!("corrupt seen store {}: {}", path.display(), e))
                })?;
                file.records
                    .into_iter()
                    .map(|r| (r.id, r.first_seen))
                    .collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::storage(format!(
                    "cannot read seen store {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        self.records.lock().expect("seen store lock poisoned")
    }

    /// Snapshot records sorted for deterministic file output.
    fn snapshot(&self) -> Vec<SeenRecord> {
        let records = self.lock_records();
        let mut list: Vec<SeenRecord> = records
            .iter()
            .map(|(id, first_seen)| SeenRecord {
                id: id.clone(),
                first_seen: *first_seen,
            })
            .collect();
        list.sort_by(|a, b| a.first_seen.cmp(&b.first_seen).then(a.id.cmp(&b.id)));
        list
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(e))?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(|e| AppError::storage(e))?;
        file.write_all(bytes).await.map_err(|e| AppError::storage(e))?;
        file.flush().await.map_err(|e| AppError::storage(e))?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::storage(e))?;
        Ok(())
    }
}

#[async_trait]
impl SeenStore for JsonSeenStore {
    async fn has_seen(&self, id: &str) -> Result<bool> {
        Ok(self.lock_records().contains_key(id))
    }

    async fn mark_seen(&self, id: &str, timestamp: DateTime<Utc>) -> Result<bool> {
        let mut records = self.lock_records();
        if records.contains_key(id) {
            return Ok(false);
        }
        records.insert(id.to_string(), timestamp);
        Ok(true)
    }

    async fn purge_older_than(&self, max_age: Duration) -> Result<usize> {
        let cutoff = Utc::now() - max_age;
        let removed = {
            let mut records = self.lock_records();
            let before = records.len();
            records.retain(|_, first_seen| *first_seen >= cutoff);
            before - records.len()
        };

        if removed > 0 {
            self.flush().await?;
        }
        Ok(removed)
    }

    async fn flush(&self) -> Result<()> {
        let file = StoreFile {
            version: STORE_VERSION,
            records: self.snapshot(),
        };
        let bytes =
            serde_json::to_vec_pretty(&file).map_err(|e| AppError::storage(e))?;
        self.write_atomic(&bytes).await
    }

    async fn record_count(&self) -> Result<usize> {
        Ok(self.lock_records().len())
    }
}
