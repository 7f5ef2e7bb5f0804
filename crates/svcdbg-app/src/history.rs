//! Query history and saved queries
//!
//! Both are JSON arrays of [`QueryRecord`] under the data directory. History is
//! append-only with a size limit; saved queries are listed newest first.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use svcdbg_core::prelude::*;
use svcdbg_core::Value;
use svcdbg_gateway::CallTarget;

use crate::session::InitialRequest;

const HISTORY_FILENAME: &str = "history.json";
const SAVED_FILENAME: &str = "saved.json";

/// One invocation as remembered locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub module: String,
    pub service: String,
    pub instance: String,
    pub method: String,
    pub body: Value,
    pub time: DateTime<Local>,
}

impl QueryRecord {
    pub fn new(target: &CallTarget, body: Value) -> Self {
        Self {
            module: target.module.clone(),
            service: target.service.clone(),
            instance: target.instance.clone(),
            method: target.method.clone(),
            body,
            time: Local::now(),
        }
    }

    /// `module .service.method`
    pub fn label(&self) -> String {
        format!("{} .{}.{}", self.module, self.service, self.method)
    }

    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.label().to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn to_initial_request(&self) -> InitialRequest {
        InitialRequest {
            service: Some(self.service.clone()),
            instance: Some(self.instance.clone()),
            method: self.method.clone(),
            body: self.body.clone(),
        }
    }
}

/// A JSON file of records held in memory
#[derive(Debug, Clone)]
pub struct QueryStore {
    path: Option<PathBuf>,
    records: Vec<QueryRecord>,
    limit: Option<usize>,
}

impl QueryStore {
    /// Store that never touches the disk
    pub fn in_memory(limit: Option<usize>) -> Self {
        Self {
            path: None,
            records: Vec::new(),
            limit,
        }
    }

    /// `<data_dir>/history.json`, bounded by `limit`
    pub fn history(data_dir: &Path, limit: usize) -> Self {
        Self::load(data_dir.join(HISTORY_FILENAME), Some(limit))
    }

    /// `<data_dir>/saved.json`, unbounded
    pub fn saved(data_dir: &Path) -> Self {
        Self::load(data_dir.join(SAVED_FILENAME), None)
    }

    /// Read `path`; a missing or unreadable file yields an empty store.
    pub fn load(path: PathBuf, limit: Option<usize>) -> Self {
        let records = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<QueryRecord>>(&content) {
                Ok(records) => records,
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Failed to read {:?}: {}", path, e);
                Vec::new()
            }
        };
        let mut store = Self {
            path: Some(path),
            records,
            limit,
        };
        store.enforce_limit();
        store
    }

    pub fn records(&self) -> &[QueryRecord] {
        &self.records
    }

    /// Newest first
    pub fn newest_first(&self) -> Vec<&QueryRecord> {
        let mut sorted: Vec<_> = self.records.iter().collect();
        sorted.sort_by(|a, b| b.time.cmp(&a.time));
        sorted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = Some(limit);
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    pub fn add(&mut self, record: QueryRecord) -> Result<()> {
        self.records.push(record);
        self.enforce_limit();
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(&self.records)?;
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, path)?;
        debug!("Wrote {} records to {:?}", self.records.len(), path);
        Ok(())
    }
}
