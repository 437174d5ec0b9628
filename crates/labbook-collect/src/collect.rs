use std::fmt;

use labbook_core::errors::LabError;
use labbook_core::{ParamSet, ParamValue};
use tracing::{debug, warn};

use crate::table::{ResultTable, PATH_COLUMN};

type Extractor = dyn Fn(&ParamSet) -> Result<ParamValue, LabError>;

/// Derived column computed from the raw loaded record.
pub struct Derived {
    name: String,
    extract: Box<Extractor>,
}

impl Derived {
    /// Creates a derived column named `name`.
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&ParamSet) -> Result<ParamValue, LabError> + 'static,
    {
        Self {
            name: name.into(),
            extract: Box::new(extract),
        }
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the extractor, turning a failure into null.
    fn evaluate(&self, path: &str, record: &ParamSet) -> ParamValue {
        match (self.extract)(record) {
            Ok(value) => value,
            Err(err) => {
                warn!(path, field = %self.name, error = %err, "derived field failed, storing null");
                ParamValue::Null
            }
        }
    }
}

impl fmt::Debug for Derived {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Derived").field("name", &self.name).finish()
    }
}

/// Key filters and derived columns applied to every collected record.
#[derive(Debug, Default)]
pub struct CollectOptions {
    /// Keys kept from each record; `None` keeps all of them.
    pub white_list: Option<Vec<String>>,
    /// Keys removed after the white list is applied.
    pub black_list: Vec<String>,
    /// Extra columns computed from the unfiltered record.
    pub special_list: Vec<Derived>,
}

impl CollectOptions {
    /// Keeps only the given keys.
    pub fn with_white_list<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.white_list = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Drops the given keys.
    pub fn with_black_list<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.black_list = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a derived column.
    pub fn with_derived(mut self, derived: Derived) -> Self {
        self.special_list.push(derived);
        self
    }
}

/// A loaded record together with the artifact path it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Provenance of the record; identifies its row.
    pub path: String,
    /// Loaded parameters and results.
    pub data: ParamSet,
}

impl ResultRecord {
    /// Pairs `data` with its origin.
    pub fn new(path: impl Into<String>, data: ParamSet) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }
}

fn row_for(record: &ResultRecord, opts: &CollectOptions) -> ParamSet {
    let mut row: ParamSet = match &opts.white_list {
        Some(keys) => keys
            .iter()
            .filter_map(|key| record.data.get_key_value(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        None => record.data.clone(),
    };
    for key in &opts.black_list {
        row.remove(key);
    }
    if row.remove(PATH_COLUMN).is_some() {
        warn!(path = %record.path, "record key `path` is reserved, dropped");
    }
    for derived in &opts.special_list {
        if derived.name == PATH_COLUMN {
            warn!(path = %record.path, "derived column `path` is reserved, skipped");
            continue;
        }
        let value = derived.evaluate(&record.path, &record.data);
        row.insert(derived.name.clone(), value);
    }
    row
}

/// Merges `records` into `table` in place, returning how many rows were added.
///
/// Records whose path is already in the table, including repeats within
/// `records`, are skipped.
pub fn collect_into<I>(table: &mut ResultTable, records: I, opts: &CollectOptions) -> usize
where
    I: IntoIterator<Item = ResultRecord>,
{
    let mut added = 0;
    for record in records {
        if table.contains_path(&record.path) {
            debug!(path = %record.path, "already collected");
            continue;
        }
        let row = row_for(&record, opts);
        if table.push_row(record.path, row) {
            added += 1;
        }
    }
    added
}

/// Merges `records` into `table`.
///
/// Collecting the same batch twice leaves the table as it was after the first
/// pass.
///
/// ```
/// use labbook_collect::{collect, CollectOptions, ResultRecord, ResultTable};
/// use labbook_core::param_set;
///
/// let records = vec![
///     ResultRecord::new("a.json", param_set!("x" => 1)),
///     ResultRecord::new("b.json", param_set!("x" => 2, "y" => 0.5)),
/// ];
/// let opts = CollectOptions::default();
/// let table = collect(ResultTable::new(), records.clone(), &opts);
/// assert_eq!(table.column_names(), vec!["path", "x", "y"]);
/// assert_eq!(collect(table.clone(), records, &opts), table);
/// ```
pub fn collect<I>(mut table: ResultTable, records: I, opts: &CollectOptions) -> ResultTable
where
    I: IntoIterator<Item = ResultRecord>,
{
    collect_into(&mut table, records, opts);
    table
}
