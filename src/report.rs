use crate::date_record::{self, NotFoundReason, RawCell, ResolutionOutcome, UNDETERMINED_TEXT};
use crate::table::CalendarTable;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReportRow {
    pub ordinal: usize,
    pub event: String,
    pub date: String,
}

/// Every event of one year, ready for a tabular renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearReport {
    pub year: i32,
    pub rows: Vec<YearReportRow>,
}

impl YearReport {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Builds the full listing for `year`: one row per event, ordinals from 1 in
/// table order. Never fails; a malformed cell is passed through as raw text.
pub fn build_year_report(table: &CalendarTable, year: i32) -> YearReport {
    let rows = table
        .column(year)
        .into_iter()
        .enumerate()
        .map(|(idx, (event, cell))| {
            let date = format_cell(&event, year, &cell);
            YearReportRow {
                ordinal: idx + 1,
                event,
                date,
            }
        })
        .collect();
    YearReport { year, rows }
}

fn format_cell(event: &str, year: i32, cell: &RawCell) -> String {
    match date_record::parse(cell) {
        ResolutionOutcome::Resolved(date) => date.day_label(),
        ResolutionOutcome::Undetermined => UNDETERMINED_TEXT.to_string(),
        ResolutionOutcome::NotFound(NotFoundReason::NoEntry) => String::new(),
        ResolutionOutcome::NotFound(NotFoundReason::Malformed { raw }) => {
            warn!(event, year, raw = raw.as_str(), "passing malformed date text through to report");
            raw
        }
    }
}
