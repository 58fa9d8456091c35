//! I/O boundary traits for testability
//!
//! Loading the raw dataset is the only suspension point of the pipeline;
//! everything after it is synchronous.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, LoadResultExt};
use crate::domain::RawRecord;

/// Source of raw character records.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load the full ordered sequence of raw records.
    async fn load(&self) -> ApplicationResult<Vec<RawRecord>>;

    /// Human-readable origin, used in log messages.
    fn describe(&self) -> String;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// JSON file holding an array of character objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn load(&self) -> ApplicationResult<Vec<RawRecord>> {
        debug!("load: path={}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_path_context("read", &self.path)?;
        parse_records(&content).with_path_context("parse", &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse a JSON array of records. The top level must be an array;
/// elements that are not objects become empty records.
pub fn parse_records(content: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Records held in memory, e.g. already fetched by the caller.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<RawRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Parse records from a JSON string up front.
    pub fn from_json(content: &str) -> ApplicationResult<Self> {
        let records = parse_records(content).map_err(|e| ApplicationError::LoadFailed {
            context: "parse in-memory json".to_string(),
            source: Box::new(e),
        })?;
        Ok(Self::new(records))
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn load(&self) -> ApplicationResult<Vec<RawRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}
