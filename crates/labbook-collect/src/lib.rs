//! Folds saved parameter/result records into one table, reconciling the key
//! drift between records with null cells.

mod collect;
mod export;
mod scan;
mod table;

pub use collect::{collect, collect_into, CollectOptions, Derived, ResultRecord};
pub use export::{export_csv, export_json};
pub use scan::{
    collect_results, default_loader, default_table_path, scan_results, ScanOptions, TableLocation,
};
pub use table::{Column, ResultTable, PATH_COLUMN};
