use std::fs;
use std::path::Path;

use labbook_core::errors::{ErrorInfo, LabError};
use labbook_core::{to_canonical_json_bytes, to_canonical_json_pretty, ParamSet, ParamValue};

use crate::table::ResultTable;

fn export_error(path: &Path, err: impl ToString) -> LabError {
    LabError::Serde(
        ErrorInfo::new("collect.export", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

fn ensure_parent(path: &Path) -> Result<(), LabError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|err| LabError::io("collect.mkdir", parent, err))
        }
        _ => Ok(()),
    }
}

fn csv_cell(cell: Option<&ParamValue>) -> Result<String, LabError> {
    match cell {
        None | Some(ParamValue::Null) => Ok(String::new()),
        Some(value @ (ParamValue::List(_) | ParamValue::Map(_))) => {
            let bytes = to_canonical_json_bytes(value)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Some(value) => Ok(value.to_string()),
    }
}

/// Writes the table as CSV with a header row. Null cells are empty, lists and
/// maps are embedded as canonical JSON.
pub fn export_csv(table: &ResultTable, path: &Path) -> Result<(), LabError> {
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path).map_err(|err| export_error(path, err))?;
    writer
        .write_record(table.column_names())
        .map_err(|err| export_error(path, err))?;
    for (index, row_path) in table.row_paths().iter().enumerate() {
        let mut record = vec![row_path.clone()];
        for column in table.columns() {
            record.push(csv_cell(column.cells.get(index).and_then(Option::as_ref))?);
        }
        writer
            .write_record(&record)
            .map_err(|err| export_error(path, err))?;
    }
    writer.flush().map_err(|err| export_error(path, err))
}

/// Writes the table as a canonical JSON array of row objects.
pub fn export_json(table: &ResultTable, path: &Path) -> Result<(), LabError> {
    ensure_parent(path)?;
    let rows: Vec<ParamSet> = (0..table.len()).filter_map(|index| table.row(index)).collect();
    let text = to_canonical_json_pretty(&rows)?;
    fs::write(path, text).map_err(|err| LabError::io("collect.write", path, err))
}
