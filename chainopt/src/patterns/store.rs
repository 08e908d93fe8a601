//! Pattern store implementations

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::types::{ChainFailure, PatternRecord, SuccessfulPattern};
use crate::error::PatternStoreError;

/// External persistence for chain outcomes
#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn store_success(&self, pattern: SuccessfulPattern) -> Result<(), PatternStoreError>;

    async fn record_failure(&self, failure: ChainFailure) -> Result<(), PatternStoreError>;
}

/// Keeps records in memory; useful for tests and embedding
#[derive(Debug, Default)]
pub struct InMemoryPatternStore {
    records: Mutex<Vec<PatternRecord>>,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<PatternRecord> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, record: PatternRecord) {
        match self.records.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}

#[async_trait]
impl PatternStore for InMemoryPatternStore {
    async fn store_success(&self, pattern: SuccessfulPattern) -> Result<(), PatternStoreError> {
        self.push(PatternRecord::Success(pattern));
        Ok(())
    }

    async fn record_failure(&self, failure: ChainFailure) -> Result<(), PatternStoreError> {
        self.push(PatternRecord::Failure(failure));
        Ok(())
    }
}

/// Appends one JSON object per line to a file
#[derive(Debug)]
pub struct JsonlPatternStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonlPatternStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append(&self, record: &PatternRecord) -> Result<(), PatternStoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read every record back; a missing file reads as empty
    pub async fn read_all(&self) -> Result<Vec<PatternRecord>, PatternStoreError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(PatternStoreError::from))
            .collect()
    }
}

#[async_trait]
impl PatternStore for JsonlPatternStore {
    async fn store_success(&self, pattern: SuccessfulPattern) -> Result<(), PatternStoreError> {
        self.append(&PatternRecord::Success(pattern)).await
    }

    async fn record_failure(&self, failure: ChainFailure) -> Result<(), PatternStoreError> {
        self.append(&PatternRecord::Failure(failure)).await
    }
}
