use std::fs;
use std::path::Path;

use labbook_collect::{
    collect_results, default_loader, scan_results, CollectOptions, ResultTable, ScanOptions,
    TableLocation,
};
use labbook_core::{LabError, ParamSet, ParamValue};
use tempfile::tempdir;

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

#[test]
fn scan_filters_and_sorts() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("b.json"), "{}");
    write(&root.join("a.json"), "{}");
    write(&root.join("notes.txt"), "x");
    write(&root.join("nested/c.json"), "{}");

    let flat: Vec<_> = scan_results(root, false, &[".json".to_string()]).collect();
    assert_eq!(flat, vec![root.join("a.json"), root.join("b.json")]);

    let deep: Vec<_> = scan_results(root, true, &[".json".to_string()]).collect();
    assert_eq!(deep.len(), 3);
    assert!(deep.contains(&root.join("nested/c.json")));
}

#[test]
fn rescans_only_ingest_new_files() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("sims");
    write(&folder.join("x=1.json"), r#"{"x": 1, "y": 2.5}"#);
    write(&folder.join("broken.json"), "{not json");

    let scan = ScanOptions::default();
    let opts = CollectOptions::default();
    let first = collect_results(&folder, &scan, &opts, &default_loader).unwrap();
    assert_eq!(first.len(), 1);
    let stored = dir.path().join("results_sims.json");
    assert!(stored.is_file());

    write(&folder.join("x=2.json"), r#"{"x": 2, "z": true}"#);
    let second = collect_results(&folder, &scan, &opts, &default_loader).unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second.cell(0, "y"), Some(&ParamValue::Float(2.5)));
    assert_eq!(second.cell(0, "z"), None);
    assert_eq!(second.cell(1, "z"), Some(&ParamValue::Bool(true)));

    assert_eq!(ResultTable::load(&stored).unwrap(), second);
}

#[test]
fn custom_loader_and_disabled_persistence() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("runs");
    write(&folder.join("one.out"), "1");
    write(&folder.join("two.out"), "2");

    let scan = ScanOptions {
        filename: TableLocation::Disabled,
        valid_filetypes: vec![".out".to_string()],
        ..ScanOptions::default()
    };
    let loader = |path: &Path| -> Result<ParamSet, LabError> {
        let text = fs::read_to_string(path).map_err(|err| LabError::io("test.read", path, err))?;
        let mut record = ParamSet::new();
        record.insert("value".into(), ParamValue::Text(text));
        Ok(record)
    };
    let table = collect_results(&folder, &scan, &CollectOptions::default(), &loader).unwrap();
    assert_eq!(table.len(), 2);
    assert!(!dir.path().join("results_runs.json").exists());
}

#[test]
fn table_inside_the_scanned_folder_is_not_ingested() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("sims");
    write(&folder.join("a.json"), r#"{"a": 1}"#);
    let scan = ScanOptions {
        filename: TableLocation::Path(folder.join("table.json")),
        ..ScanOptions::default()
    };
    let opts = CollectOptions::default();
    collect_results(&folder, &scan, &opts, &default_loader).unwrap();
    let again = collect_results(&folder, &scan, &opts, &default_loader).unwrap();
    assert_eq!(again.len(), 1);
}

#[test]
fn respelled_table_path_is_still_recognised() {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("sims");
    write(&folder.join("a.json"), r#"{"a": 1}"#);
    fs::create_dir_all(folder.join("sub")).unwrap();
    let scan = ScanOptions {
        filename: TableLocation::Path(folder.join("sub").join("..").join("table.json")),
        ..ScanOptions::default()
    };
    let opts = CollectOptions::default();
    collect_results(&folder, &scan, &opts, &default_loader).unwrap();
    let again = collect_results(&folder, &scan, &opts, &default_loader).unwrap();
    assert_eq!(again.len(), 1);
    assert_eq!(again.column_names(), vec!["path", "a"]);
}

#[test]
fn missing_folder_is_an_error() {
    let dir = tempdir().unwrap();
    let err = collect_results(
        &dir.path().join("absent"),
        &ScanOptions::default(),
        &CollectOptions::default(),
        &default_loader,
    )
    .unwrap_err();
    assert_eq!(err.info().code, "collect.folder");
}
