//! Fixed-width, CSV and JSON writers for tabular listings.

use crate::month_filter::MonthRosterEntry;
use crate::report::YearReport;
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("dataframe conversion error: {0}")]
    DataFrame(#[from] PolarsError),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}'")),
        }
    }
}

pub const ORDINAL_HEADER: &str = "No.";
pub const EVENT_HEADER: &str = "Event";
pub const DATE_HEADER: &str = "Date";

impl YearReport {
    /// Three-column frame (`No.`, `Event`, `Date`) in row order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let ordinals: Vec<i64> = self.rows.iter().map(|row| row.ordinal as i64).collect();
        let events: Vec<&str> = self.rows.iter().map(|row| row.event.as_str()).collect();
        let dates: Vec<&str> = self.rows.iter().map(|row| row.date.as_str()).collect();
        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static(ORDINAL_HEADER), ordinals).into_column(),
            Series::new(PlSmallStr::from_static(EVENT_HEADER), events).into_column(),
            Series::new(PlSmallStr::from_static(DATE_HEADER), dates).into_column(),
        ])
    }
}

pub fn roster_to_dataframe(roster: &[MonthRosterEntry]) -> PolarsResult<DataFrame> {
    let events: Vec<&str> = roster.iter().map(|entry| entry.event.as_str()).collect();
    let dates: Vec<String> = roster.iter().map(MonthRosterEntry::day_label).collect();
    DataFrame::new(vec![
        Series::new(PlSmallStr::from_static(EVENT_HEADER), events).into_column(),
        Series::new(PlSmallStr::from_static(DATE_HEADER), dates).into_column(),
    ])
}

fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Boxed fixed-width table of any frame. Widths count characters, so
/// accented event names stay aligned.
pub fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.chars().count());
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_line = |out: &mut String, values: &[String]| {
        out.push('|');
        for (ci, s) in values.iter().enumerate() {
            out.push(' ');
            out.push_str(s);
            let pad = widths[ci].saturating_sub(s.chars().count());
            out.push_str(&" ".repeat(pad));
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_line(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_line(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

pub fn render_text_table(report: &YearReport) -> RenderResult<String> {
    Ok(render_df_as_text_table(&report.to_dataframe()?))
}

pub fn write_csv<W: Write>(report: &YearReport, output: W) -> RenderResult<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([ORDINAL_HEADER, EVENT_HEADER, DATE_HEADER])?;
    for row in &report.rows {
        let ordinal = row.ordinal.to_string();
        writer.write_record([ordinal.as_str(), row.event.as_str(), row.date.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(report: &YearReport) -> RenderResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders `report` in `format` into any writer.
pub fn render_to<W: Write>(
    report: &YearReport,
    format: ReportFormat,
    mut output: W,
) -> RenderResult<()> {
    match format {
        ReportFormat::Text => output.write_all(render_text_table(report)?.as_bytes())?,
        ReportFormat::Csv => write_csv(report, &mut output)?,
        ReportFormat::Json => {
            output.write_all(to_json(report)?.as_bytes())?;
            output.write_all(b"\n")?;
        }
    }
    output.flush()?;
    Ok(())
}

pub fn write_report<P: AsRef<Path>>(
    report: &YearReport,
    format: ReportFormat,
    path: P,
) -> RenderResult<()> {
    let file = File::create(path)?;
    render_to(report, format, io::BufWriter::new(file))
}
