pub mod config;
pub mod date_record;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod month_filter;
pub mod persistence;
pub mod render;
pub mod report;
pub mod resolver;
pub mod table;

pub use config::{AppConfig, ConfigError};
pub use date_record::{NotFoundReason, RawCell, ResolutionOutcome, ResolvedDate, parse};
pub use month_filter::{MonthRosterEntry, filter_by_month, parse_month_name};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCalendarStore;
pub use persistence::{
    CalendarSource, DatasetFile, DatasetFormat, LoadError, load_cached, load_table_from_csv,
    load_table_from_json, read_table_csv, save_table_to_csv, save_table_to_json,
};
pub use render::{RenderError, ReportFormat};
pub use report::{YearReport, YearReportRow, build_year_report};
pub use resolver::resolve;
pub use table::{CalendarTable, EVENT_NAME_COLUMN, NotFoundError};
