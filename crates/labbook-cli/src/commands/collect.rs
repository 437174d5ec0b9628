use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use labbook_collect::{
    collect_results, default_loader, export_csv, export_json, CollectOptions, ScanOptions,
    TableLocation,
};

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Directory holding result files.
    #[arg(long)]
    pub folder: PathBuf,
    /// Descend into subdirectories.
    #[arg(long)]
    pub subfolders: bool,
    /// Table file; defaults to `results_<folder>.json` next to the folder.
    #[arg(long, conflicts_with = "no_save")]
    pub filename: Option<PathBuf>,
    /// Start from an empty table and do not save it.
    #[arg(long)]
    pub no_save: bool,
    /// Accepted file endings.
    #[arg(long = "ext", value_delimiter = ',', default_value = ".json")]
    pub valid_filetypes: Vec<String>,
    /// Keep only these keys.
    #[arg(long, value_delimiter = ',')]
    pub white_list: Vec<String>,
    /// Drop these keys.
    #[arg(long, value_delimiter = ',')]
    pub black_list: Vec<String>,
    /// Also export the table as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Also export the table as a JSON array of rows.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

impl CollectArgs {
    fn scan_options(&self) -> ScanOptions {
        let filename = match (&self.filename, self.no_save) {
            (_, true) => TableLocation::Disabled,
            (Some(path), false) => TableLocation::Path(path.clone()),
            (None, false) => TableLocation::Default,
        };
        ScanOptions {
            subfolders: self.subfolders,
            filename,
            valid_filetypes: self.valid_filetypes.clone(),
        }
    }

    fn collect_options(&self) -> CollectOptions {
        let mut opts = CollectOptions::default().with_black_list(self.black_list.iter().cloned());
        if !self.white_list.is_empty() {
            opts = opts.with_white_list(self.white_list.iter().cloned());
        }
        opts
    }
}

pub fn run(args: &CollectArgs) -> Result<(), Box<dyn Error>> {
    let table = collect_results(
        &args.folder,
        &args.scan_options(),
        &args.collect_options(),
        &default_loader,
    )?;
    println!("rows={} columns={}", table.len(), table.column_names().len());
    if let Some(path) = &args.csv {
        export_csv(&table, path)?;
    }
    if let Some(path) = &args.json {
        export_json(&table, path)?;
    }
    Ok(())
}
