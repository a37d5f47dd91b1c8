use crate::date_record::{self, NotFoundReason, ResolutionOutcome};
use crate::table::{CalendarTable, NotFoundError};
use tracing::warn;

/// Single-event query: the outcome for `event` in `year`.
///
/// Undetermined, absent and malformed cells are all outcomes. Only an event
/// the table does not know is an error.
pub fn resolve(
    table: &CalendarTable,
    event: &str,
    year: i32,
) -> Result<ResolutionOutcome, NotFoundError> {
    let cell = table.cell(event, year)?;
    let outcome = date_record::parse(&cell);
    if let ResolutionOutcome::NotFound(NotFoundReason::Malformed { raw }) = &outcome {
        warn!(event, year, raw = raw.as_str(), "malformed date text in calendar table");
    }
    Ok(outcome)
}
