use chrono::{Datelike, Month, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

/// Fixed layout of every dated cell, e.g. `31-Mar-2024`.
pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// Sentinel text for a date the dataset has intentionally left open.
pub const UNDETERMINED_TEXT: &str = "TBD";

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Raw content of one (event, year) cell, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RawCell {
    DateText(String),
    Undetermined,
    Absent,
}

impl RawCell {
    /// Classifies a cell read from a dataset. Only empty text counts as no
    /// entry and only the exact sentinel is undetermined; any other text is
    /// kept byte for byte.
    pub fn from_text(text: &str) -> Self {
        match text {
            "" => RawCell::Absent,
            UNDETERMINED_TEXT => RawCell::Undetermined,
            other => RawCell::DateText(other.to_string()),
        }
    }

    /// The same cell as it would read back from a dataset: date text equal to
    /// the sentinel is undetermined, empty date text is absent.
    pub fn canonical(self) -> Self {
        match self {
            RawCell::DateText(text) => Self::from_text(&text),
            other => other,
        }
    }

    pub fn from_option(text: Option<&str>) -> Self {
        text.map(Self::from_text).unwrap_or(RawCell::Absent)
    }

    /// The text a dataset would hold for this cell; `None` for an absent cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawCell::DateText(text) => Some(text),
            RawCell::Undetermined => Some(UNDETERMINED_TEXT),
            RawCell::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "ResolvedDateRepr")]
pub struct ResolvedDate {
    date: NaiveDate,
}

#[derive(Serialize)]
struct ResolvedDateRepr {
    date: NaiveDate,
    date_text: String,
    weekday: String,
}

impl From<ResolvedDate> for ResolvedDateRepr {
    fn from(value: ResolvedDate) -> Self {
        Self {
            date: value.date,
            date_text: value.date_text(),
            weekday: value.weekday_name(),
        }
    }
}

impl ResolvedDate {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> Month {
        MONTHS[self.date.month0() as usize]
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Weekday on the proleptic Gregorian calendar, for every supported year.
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Full English weekday name, e.g. `Sunday`.
    pub fn weekday_name(&self) -> String {
        self.date.format("%A").to_string()
    }

    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// `Weekday, DD-Mon-YYYY`, the form used in listings.
    pub fn day_label(&self) -> String {
        format!("{}, {}", self.weekday_name(), self.date_text())
    }
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.day_label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotFoundReason {
    NoEntry,
    Malformed { raw: String },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::NoEntry => write!(f, "no entry for this year"),
            NotFoundReason::Malformed { raw } => write!(f, "malformed date text: {raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ResolutionOutcome {
    Resolved(ResolvedDate),
    Undetermined,
    NotFound(NotFoundReason),
}

impl ResolutionOutcome {
    pub fn resolved(&self) -> Option<&ResolvedDate> {
        match self {
            ResolutionOutcome::Resolved(date) => Some(date),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ResolutionOutcome::NotFound(NotFoundReason::Malformed { .. })
        )
    }
}

/// Parses date text in the exact `DD-Mon-YYYY` layout.
///
/// chrono accepts some looser spellings (`1-mar-2024`, full month names), so
/// the parsed date must format back to the identical text.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(text, DATE_FORMAT).ok()?;
    if date.format(DATE_FORMAT).to_string() == text {
        Some(date)
    } else {
        None
    }
}

pub fn parse(raw: &RawCell) -> ResolutionOutcome {
    match raw {
        RawCell::Absent => ResolutionOutcome::NotFound(NotFoundReason::NoEntry),
        RawCell::Undetermined => ResolutionOutcome::Undetermined,
        RawCell::DateText(text) => match parse_date_text(text) {
            Some(date) => ResolutionOutcome::Resolved(ResolvedDate::new(date)),
            None => ResolutionOutcome::NotFound(NotFoundReason::Malformed { raw: text.clone() }),
        },
    }
}
