//! Artifact storage keyed by generated names.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{ErrorInfo, LabError};
use crate::params::ParamSet;
use crate::serde::{load_params_file, to_canonical_json_pretty, to_yaml_string};

/// Storage backend for saved parameter/result records.
pub trait ArtifactStore {
    /// Returns `true` if an artifact is stored under `key`.
    fn exists(&self, key: &str) -> bool;

    /// Loads the artifact stored under `key`.
    fn load(&self, key: &str) -> Result<ParamSet, LabError>;

    /// Stores `record` under `key`, replacing any previous artifact.
    fn save(&self, key: &str, record: &ParamSet) -> Result<(), LabError>;
}

/// Stores each artifact as a file below a root directory.
///
/// Keys are relative paths. Keys ending in `.yaml`/`.yml` are written as YAML,
/// everything else as canonical JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Creates a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl ArtifactStore for JsonFileStore {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }

    fn load(&self, key: &str) -> Result<ParamSet, LabError> {
        let path = self.path_for(key);
        debug!(path = %path.display(), "loading artifact");
        load_params_file(&path)
    }

    fn save(&self, key: &str, record: &ParamSet) -> Result<(), LabError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| LabError::io("store.mkdir", parent, err))?;
        }
        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let text = if is_yaml {
            to_yaml_string(record)?
        } else {
            to_canonical_json_pretty(record)?
        };
        fs::write(&path, text).map_err(|err| LabError::io("store.write", &path, err))?;
        debug!(path = %path.display(), "saved artifact");
        Ok(())
    }
}

/// In-memory store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, ParamSet>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Keys of all stored artifacts in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl ArtifactStore for MemoryStore {
    fn exists(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    fn load(&self, key: &str) -> Result<ParamSet, LabError> {
        self.entries.borrow().get(key).cloned().ok_or_else(|| {
            LabError::Load(ErrorInfo::new("store.missing", "no artifact stored").with_context("key", key))
        })
    }

    fn save(&self, key: &str, record: &ParamSet) -> Result<(), LabError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), record.clone());
        Ok(())
    }
}
