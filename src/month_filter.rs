use crate::date_record::{ResolutionOutcome, ResolvedDate};
use crate::resolver::resolve;
use crate::table::CalendarTable;
use chrono::Month;
use serde::Serialize;

/// One observance in a month roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthRosterEntry {
    pub event: String,
    pub date: ResolvedDate,
}

impl MonthRosterEntry {
    pub fn date_text(&self) -> String {
        self.date.date_text()
    }

    pub fn day_label(&self) -> String {
        self.date.day_label()
    }
}

/// Accepts `March`, `mar`, `MARCH` and so on.
pub fn parse_month_name(name: &str) -> Option<Month> {
    name.trim().parse::<Month>().ok()
}

/// Events of `year` whose resolved date falls in `month`, in table order.
///
/// Undetermined, absent and malformed cells belong to no month and are left
/// out. An empty roster is a normal answer.
pub fn filter_by_month(table: &CalendarTable, year: i32, month: Month) -> Vec<MonthRosterEntry> {
    let mut roster = Vec::new();
    for event in table.events() {
        let Ok(outcome) = resolve(table, event, year) else {
            continue;
        };
        match outcome {
            ResolutionOutcome::Resolved(date) if date.month() == month => {
                roster.push(MonthRosterEntry {
                    event: event.clone(),
                    date,
                });
            }
            ResolutionOutcome::Resolved(_)
            | ResolutionOutcome::Undetermined
            | ResolutionOutcome::NotFound(_) => {}
        }
    }
    roster
}
