use std::path::{Path, PathBuf};

use labbook_core::errors::LabError;
use labbook_core::{load_params_file, ParamSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::collect::{collect_into, CollectOptions, ResultRecord};
use crate::table::ResultTable;

/// Where the persistent table of a scan lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableLocation {
    /// `results_<folder>.json` next to the scanned folder.
    #[default]
    Default,
    /// An explicit file.
    Path(PathBuf),
    /// Start from an empty table and do not save it.
    Disabled,
}

/// Options for [`collect_results`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    #[serde(default)]
    pub subfolders: bool,
    /// Table loaded before and saved after the scan.
    #[serde(default)]
    pub filename: TableLocation,
    /// File name endings accepted as results, leading dot included.
    #[serde(default = "ScanOptions::default_filetypes")]
    pub valid_filetypes: Vec<String>,
}

impl ScanOptions {
    fn default_filetypes() -> Vec<String> {
        vec![".json".to_string()]
    }

    /// Resolves the table file for `folder`, `None` when persistence is off.
    pub fn table_path(&self, folder: &Path) -> Option<PathBuf> {
        match &self.filename {
            TableLocation::Default => Some(default_table_path(folder)),
            TableLocation::Path(path) => Some(path.clone()),
            TableLocation::Disabled => None,
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            subfolders: false,
            filename: TableLocation::Default,
            valid_filetypes: Self::default_filetypes(),
        }
    }
}

/// `results_<basename>.json` in the parent of `folder`.
///
/// Folders without a final name such as `.` take it from their canonical form.
pub fn default_table_path(folder: &Path) -> PathBuf {
    let basename = folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            let canonical = folder.canonicalize().ok()?;
            canonical
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "root".to_string());
    let parent = folder.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("results_{basename}.json"))
}

/// Whether `candidate` is the table file. Spellings of the same file differ
/// (`./t.json` against `t.json`), so matching names are compared canonically.
fn is_table_file(candidate: &Path, table: &Path, canonical_table: Option<&Path>) -> bool {
    if candidate == table {
        return true;
    }
    if candidate.file_name() != table.file_name() {
        return false;
    }
    match (canonical_table, candidate.canonicalize()) {
        (Some(canonical), Ok(found)) => found == canonical,
        _ => false,
    }
}

fn accepted(path: &Path, valid_filetypes: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    valid_filetypes.iter().any(|ending| name.ends_with(ending.as_str()))
}

/// Lazily lists result files under `folder`, sorted by name within each
/// directory.
pub fn scan_results(
    folder: &Path,
    subfolders: bool,
    valid_filetypes: &[String],
) -> impl Iterator<Item = PathBuf> {
    let valid_filetypes = valid_filetypes.to_vec();
    let max_depth = if subfolders { usize::MAX } else { 1 };
    WalkDir::new(folder)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "unreadable directory entry skipped");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(move |path| accepted(path, &valid_filetypes))
}

/// Reads JSON or YAML parameter files.
pub fn default_loader(path: &Path) -> Result<ParamSet, LabError> {
    load_params_file(path)
}

/// Scans `folder` and folds every new result file into the stored table.
///
/// Files that fail to load are logged and skipped. The updated table is saved
/// unless persistence is disabled, and returned.
pub fn collect_results(
    folder: &Path,
    scan: &ScanOptions,
    opts: &CollectOptions,
    loader: &dyn Fn(&Path) -> Result<ParamSet, LabError>,
) -> Result<ResultTable, LabError> {
    if !folder.is_dir() {
        return Err(LabError::io("collect.folder", folder, "not a directory"));
    }
    let table_path = scan.table_path(folder);
    let mut table = match &table_path {
        Some(path) => ResultTable::load(path)?,
        None => ResultTable::new(),
    };
    let canonical_table = table_path.as_ref().and_then(|path| path.canonicalize().ok());

    let mut added = 0;
    let mut skipped = 0;
    for path in scan_results(folder, scan.subfolders, &scan.valid_filetypes) {
        if let Some(table_file) = &table_path {
            if is_table_file(&path, table_file, canonical_table.as_deref()) {
                debug!(path = %path.display(), "table file skipped");
                continue;
            }
        }
        let key = path.display().to_string();
        if table.contains_path(&key) {
            debug!(path = %key, "already collected");
            continue;
        }
        match loader(&path) {
            Ok(data) => {
                added += collect_into(&mut table, [ResultRecord::new(key, data)], opts);
            }
            Err(err) => {
                warn!(path = %key, error = %err, "result could not be loaded, skipped");
                skipped += 1;
            }
        }
    }

    if let Some(path) = &table_path {
        table.save(path)?;
    }
    info!(
        folder = %folder.display(),
        added,
        skipped,
        total = table.len(),
        "collected results"
    );
    Ok(table)
}
