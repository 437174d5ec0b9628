use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use labbook_core::errors::{ErrorInfo, LabError};
use labbook_core::{from_json_slice, to_canonical_json_pretty, ParamSet, ParamValue};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the provenance column. It is always the first column of a table.
pub const PATH_COLUMN: &str = "path";

/// One named column; `None` marks a record that lacked the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// One cell per row, in row order.
    pub cells: Vec<Option<ParamValue>>,
}

/// Column-oriented table of collected records.
///
/// The column set is the union of every key ingested so far. Rows are keyed
/// by the path of the artifact they were loaded from and a path is never
/// ingested twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultTable {
    rows: Vec<String>,
    paths: BTreeSet<String>,
    columns: Vec<Column>,
}

#[derive(Serialize, Deserialize)]
struct StoredTable {
    columns: Vec<Column>,
}

fn table_error(code: &str, message: impl Into<String>) -> LabError {
    LabError::Serde(ErrorInfo::new(code, message))
}

fn table_error_at(code: &str, message: impl Into<String>, found: &str) -> LabError {
    LabError::Serde(ErrorInfo::new(code, message).with_context("found", found))
}

impl ResultTable {
    /// Creates a table without rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when no record has been ingested.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data columns in the order they were discovered, without the path column.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// All column names, starting with [`PATH_COLUMN`].
    pub fn column_names(&self) -> Vec<&str> {
        std::iter::once(PATH_COLUMN)
            .chain(self.columns.iter().map(|column| column.name.as_str()))
            .collect()
    }

    /// Looks up a data column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns `true` if a record with this path was already ingested.
    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Set of ingested paths.
    pub fn paths(&self) -> &BTreeSet<String> {
        &self.paths
    }

    /// Paths in row order.
    pub fn row_paths(&self) -> &[String] {
        &self.rows
    }

    /// Cell at `row` in column `name`; `None` for missing rows, columns or cells.
    pub fn cell(&self, row: usize, name: &str) -> Option<&ParamValue> {
        self.column(name)?.cells.get(row)?.as_ref()
    }

    /// Row `index` as a record. Absent cells are [`ParamValue::Null`] and the
    /// path appears under [`PATH_COLUMN`].
    pub fn row(&self, index: usize) -> Option<ParamSet> {
        let path = self.rows.get(index)?;
        let mut row = ParamSet::new();
        row.insert(PATH_COLUMN.to_string(), ParamValue::Text(path.clone()));
        for column in &self.columns {
            let value = column.cells.get(index).cloned().flatten().unwrap_or(ParamValue::Null);
            row.insert(column.name.clone(), value);
        }
        Some(row)
    }

    /// Appends a row, adding unseen columns with null back-fill.
    ///
    /// Returns `false` without touching the table when `path` is already known.
    /// A `path` key inside `cells` is ignored; the provenance column is
    /// reserved.
    pub fn push_row(&mut self, path: impl Into<String>, mut cells: ParamSet) -> bool {
        let path = path.into();
        if self.paths.contains(&path) {
            return false;
        }
        cells.remove(PATH_COLUMN);
        let previous = self.rows.len();
        for column in &mut self.columns {
            let cell = cells.remove(&column.name).filter(|value| !value.is_null());
            column.cells.push(cell);
        }
        for (name, value) in cells {
            debug!(column = %name, backfill = previous, "new column");
            let mut column = vec![None; previous];
            column.push(Some(value).filter(|value| !value.is_null()));
            self.columns.push(Column {
                name,
                cells: column,
            });
        }
        self.paths.insert(path.clone());
        self.rows.push(path);
        true
    }

    /// Rebuilds a table from stored columns, the first of which must be the
    /// path column.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, LabError> {
        let mut columns = columns.into_iter();
        let Some(path_column) = columns.next() else {
            return Ok(Self::new());
        };
        if path_column.name != PATH_COLUMN {
            return Err(table_error_at(
                "table.path-column",
                format!("first column must be `{PATH_COLUMN}`"),
                &path_column.name,
            ));
        }

        let mut table = Self::new();
        for cell in path_column.cells {
            let Some(ParamValue::Text(path)) = cell else {
                return Err(table_error("table.path-cell", "path cells must be strings"));
            };
            if !table.paths.insert(path.clone()) {
                return Err(table_error_at(
                    "table.duplicate-path",
                    "path ingested twice",
                    &path,
                ));
            }
            table.rows.push(path);
        }

        let mut names = BTreeSet::new();
        for mut column in columns {
            if column.name == PATH_COLUMN || !names.insert(column.name.clone()) {
                return Err(table_error_at(
                    "table.duplicate-column",
                    "column appears twice",
                    &column.name,
                ));
            }
            if column.cells.len() != table.rows.len() {
                return Err(table_error_at(
                    "table.column-length",
                    format!(
                        "column has {} cells but the table has {} rows",
                        column.cells.len(),
                        table.rows.len()
                    ),
                    &column.name,
                ));
            }
            for cell in &mut column.cells {
                if cell.as_ref().is_some_and(ParamValue::is_null) {
                    *cell = None;
                }
            }
            table.columns.push(column);
        }
        Ok(table)
    }

    /// Columns as stored on disk, path column first.
    pub fn to_columns(&self) -> Vec<Column> {
        let path_column = Column {
            name: PATH_COLUMN.to_string(),
            cells: self
                .rows
                .iter()
                .map(|path| Some(ParamValue::Text(path.clone())))
                .collect(),
        };
        std::iter::once(path_column)
            .chain(self.columns.iter().cloned())
            .collect()
    }

    /// Loads a table saved by [`ResultTable::save`]. A missing file yields an
    /// empty table.
    pub fn load(path: &Path) -> Result<Self, LabError> {
        if !path.exists() {
            debug!(path = %path.display(), "no stored table, starting empty");
            return Ok(Self::new());
        }
        let bytes = fs::read(path).map_err(|err| LabError::io("table.read", path, err))?;
        let stored: StoredTable = from_json_slice(&bytes).map_err(|err| {
            LabError::Serde(
                err.info()
                    .clone()
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let table = Self::from_columns(stored.columns)?;
        debug!(path = %path.display(), rows = table.len(), "loaded table");
        Ok(table)
    }

    /// Writes the table as canonical JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), LabError> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| LabError::io("table.mkdir", parent, err))?;
        }
        let stored = StoredTable {
            columns: self.to_columns(),
        };
        let text = to_canonical_json_pretty(&stored)?;
        fs::write(path, text).map_err(|err| LabError::io("table.write", path, err))?;
        debug!(path = %path.display(), rows = self.len(), "saved table");
        Ok(())
    }
}
