use crate::fs::{DocumentError, FileSystem, read_json, write_json};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Saved expansion state of one visualization session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionSnapshot {
    /// Snapshot version for forward compatibility
    pub version: u32,
    /// Model the state was captured from
    pub model: String,
    /// Expanded node ids, sorted
    pub expanded: Vec<String>,
}

impl ExpansionSnapshot {
    pub fn new(model: impl Into<String>, expanded: Vec<String>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            model: model.into(),
            expanded,
        }
    }
}

pub fn save_snapshot(
    fs: &dyn FileSystem,
    snapshot: &ExpansionSnapshot,
    path: &Path,
) -> Result<(), DocumentError> {
    write_json(fs, path, snapshot)
}

pub fn load_snapshot(fs: &dyn FileSystem, path: &Path) -> Result<ExpansionSnapshot, DocumentError> {
    read_json(fs, path)
}
