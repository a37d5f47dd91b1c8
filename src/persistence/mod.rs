use crate::CalendarTable;
use polars::prelude::PolarsError;
use serde_json::Error as SerdeJsonError;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no '{}' column", crate::table::EVENT_NAME_COLUMN)]
    MissingKeyColumn,
    #[error("column header '{0}' is not a year")]
    InvalidYearColumn(String),
    #[error("year {0} is declared more than once")]
    DuplicateYear(i32),
    #[error("event '{0}' is declared more than once")]
    DuplicateEvent(String),
    #[error("event '{event}' has {found} cells but {expected} years are declared")]
    RowWidth {
        event: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("unsupported dataset format: {0}")]
    UnsupportedFormat(String),
    #[error("no calendar stored")]
    NotFound,
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Anything a `CalendarTable` can be loaded from.
pub trait CalendarSource {
    fn load_table(&self) -> LoadResult<CalendarTable>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetFormat {
    Csv,
    Json,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl DatasetFormat {
    /// Format implied by a file extension. A path without an extension is
    /// read as CSV; an extension no loader handles is an error.
    pub fn from_path<P: AsRef<Path>>(path: P) -> LoadResult<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            None => Ok(DatasetFormat::Csv),
            Some(ext) => ext.parse().map_err(LoadError::UnsupportedFormat),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetFormat::Csv => "csv",
            DatasetFormat::Json => "json",
            #[cfg(feature = "sqlite")]
            DatasetFormat::Sqlite => "sqlite",
        }
    }
}

impl FromStr for DatasetFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DatasetFormat::Csv),
            "json" => Ok(DatasetFormat::Json),
            #[cfg(feature = "sqlite")]
            "sqlite" | "db" => Ok(DatasetFormat::Sqlite),
            "xlsx" | "xls" => Err(format!(
                "workbooks are not read directly; export the sheet to CSV with an '{}' column",
                crate::table::EVENT_NAME_COLUMN
            )),
            other => Err(format!("unknown dataset format '{other}'")),
        }
    }
}

/// A dataset file on disk together with its format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetFile {
    pub path: PathBuf,
    pub format: DatasetFormat,
}

impl DatasetFile {
    pub fn new(path: impl Into<PathBuf>, format: DatasetFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalendarSource for DatasetFile {
    fn load_table(&self) -> LoadResult<CalendarTable> {
        match self.format {
            DatasetFormat::Csv => file::load_table_from_csv(&self.path),
            DatasetFormat::Json => file::load_table_from_json(&self.path),
            #[cfg(feature = "sqlite")]
            DatasetFormat::Sqlite => sqlite::SqliteCalendarStore::open(&self.path)?
                .load_table()?
                .ok_or(LoadError::NotFound),
        }
    }
}

pub mod cache;
pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cache::load_cached;
pub use file::{
    load_table_from_csv, load_table_from_json, read_table_csv, save_table_to_csv,
    save_table_to_json,
};
