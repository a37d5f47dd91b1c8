use crate::date_record::RawCell;
use crate::persistence::{LoadError, LoadResult};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Header of the key column in every tabular dataset.
pub const EVENT_NAME_COLUMN: &str = "Event Name";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no such event: {event}")]
pub struct NotFoundError {
    pub event: String,
}

impl NotFoundError {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
        }
    }
}

/// Read-only (event, year) lookup table.
///
/// Backed by a `DataFrame` whose first column is `Event Name` followed by one
/// nullable string column per declared year. Row order is the declaration
/// order of the dataset and is preserved by every derived listing.
#[derive(Debug, Clone)]
pub struct CalendarTable {
    df: DataFrame,
    events: Vec<String>,
    event_index: HashMap<String, usize>,
    years: Vec<i32>,
    year_index: HashMap<i32, usize>,
}

impl CalendarTable {
    /// Builds a table from rows of `(event name, cells)`, where `cells[i]`
    /// belongs to `years[i]`. Year columns are stored in ascending order
    /// whatever order they arrive in. Cells are stored in their canonical
    /// form, see [`RawCell::canonical`].
    pub fn from_rows<I>(years: Vec<i32>, rows: I) -> LoadResult<Self>
    where
        I: IntoIterator<Item = (String, Vec<RawCell>)>,
    {
        let mut order: Vec<usize> = (0..years.len()).collect();
        order.sort_by_key(|idx| years[*idx]);
        let mut year_index = HashMap::with_capacity(years.len());
        for (slot, idx) in order.iter().enumerate() {
            if year_index.insert(years[*idx], slot).is_some() {
                return Err(LoadError::DuplicateYear(years[*idx]));
            }
        }
        let sorted_years: Vec<i32> = order.iter().map(|idx| years[*idx]).collect();

        let mut events = Vec::new();
        let mut event_index = HashMap::new();
        let mut cells_by_row = Vec::new();
        for (name, cells) in rows {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(LoadError::InvalidData(format!(
                    "row {} has an empty event name",
                    events.len() + 1
                )));
            }
            if cells.len() != years.len() {
                return Err(LoadError::RowWidth {
                    event: name,
                    expected: years.len(),
                    found: cells.len(),
                });
            }
            if event_index.insert(name.clone(), events.len()).is_some() {
                return Err(LoadError::DuplicateEvent(name));
            }
            let sorted: Vec<RawCell> = order
                .iter()
                .map(|idx| cells[*idx].clone().canonical())
                .collect();
            events.push(name);
            cells_by_row.push(sorted);
        }
        let years = sorted_years;

        let mut columns: Vec<Column> = Vec::with_capacity(years.len() + 1);
        columns.push(
            Series::new(PlSmallStr::from_static(EVENT_NAME_COLUMN), events.clone()).into_column(),
        );
        for (col_idx, year) in years.iter().enumerate() {
            let values: Vec<Option<String>> = cells_by_row
                .iter()
                .map(|cells| cells[col_idx].as_text().map(str::to_string))
                .collect();
            columns.push(Series::new(PlSmallStr::from(year.to_string()), values).into_column());
        }
        let df = DataFrame::new(columns)?;

        Ok(Self {
            df,
            events,
            event_index,
            years,
            year_index,
        })
    }

    /// Adopts a frame produced by an external loader. Every column other than
    /// `Event Name` must be headed by a year number.
    pub fn from_dataframe(df: &DataFrame) -> LoadResult<Self> {
        let key = df
            .column(EVENT_NAME_COLUMN)
            .map_err(|_| LoadError::MissingKeyColumn)?
            .cast(&DataType::String)?;
        let names = key.str()?;

        let mut years = Vec::new();
        let mut year_columns = Vec::new();
        for column in df.get_columns() {
            let header = column.name().as_str();
            if header == EVENT_NAME_COLUMN {
                continue;
            }
            let year = parse_year_header(header)?;
            years.push(year);
            year_columns.push(column.cast(&DataType::String)?);
        }
        let year_values = year_columns
            .iter()
            .map(|column| column.str())
            .collect::<PolarsResult<Vec<_>>>()?;

        let mut rows = Vec::with_capacity(df.height());
        for (row_idx, name) in names.into_iter().enumerate() {
            let name = name.ok_or_else(|| {
                LoadError::InvalidData(format!("row {} has no event name", row_idx + 1))
            })?;
            let cells = year_values
                .iter()
                .map(|values| RawCell::from_option(values.get(row_idx)))
                .collect();
            rows.push((name.to_string(), cells));
        }
        Self::from_rows(years, rows)
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Event names in declaration order.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// Declared year columns, in dataset order.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn year_range(&self) -> Option<RangeInclusive<i32>> {
        let min = self.years.iter().copied().min()?;
        let max = self.years.iter().copied().max()?;
        Some(min..=max)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains_event(&self, event: &str) -> bool {
        self.event_index.contains_key(event)
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.year_index.contains_key(&year)
    }

    /// Cell for `(event, year)`. A year outside the declared columns is an
    /// absent cell, not an error.
    pub fn cell(&self, event: &str, year: i32) -> Result<RawCell, NotFoundError> {
        let row = self
            .event_index
            .get(event)
            .copied()
            .ok_or_else(|| NotFoundError::new(event))?;
        Ok(self.cell_at(row, year))
    }

    /// Every row for one year, in row order.
    pub fn column(&self, year: i32) -> Vec<(String, RawCell)> {
        let values = self.year_values(year);
        self.events
            .iter()
            .enumerate()
            .map(|(row, event)| {
                let cell = values
                    .map(|ca| RawCell::from_option(ca.get(row)))
                    .unwrap_or(RawCell::Absent);
                (event.clone(), cell)
            })
            .collect()
    }

    fn cell_at(&self, row: usize, year: i32) -> RawCell {
        self.year_values(year)
            .map(|ca| RawCell::from_option(ca.get(row)))
            .unwrap_or(RawCell::Absent)
    }

    fn year_values(&self, year: i32) -> Option<&StringChunked> {
        // Offset by one for the key column.
        let col_idx = self.year_index.get(&year)? + 1;
        self.df.get_columns().get(col_idx)?.str().ok()
    }
}

impl PartialEq for CalendarTable {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events
            && self.years == other.years
            && self.df.equals_missing(&other.df)
    }
}

pub(crate) fn parse_year_header(header: &str) -> LoadResult<i32> {
    header
        .trim()
        .parse::<i32>()
        .map_err(|_| LoadError::InvalidYearColumn(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CalendarTable {
        CalendarTable::from_rows(
            vec![2024, 2025],
            vec![
                (
                    "Easter".to_string(),
                    vec![
                        RawCell::DateText("31-Mar-2024".into()),
                        RawCell::DateText("20-Apr-2025".into()),
                    ],
                ),
                (
                    "Pentecost".to_string(),
                    vec![RawCell::Undetermined, RawCell::Absent],
                ),
            ],
        )
        .unwrap()
    }

    #[test]
    fn frame_layout_has_key_and_year_columns() {
        let table = sample();
        let names: Vec<String> = table
            .dataframe()
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["Event Name", "2024", "2025"]);
        assert_eq!(table.dataframe().height(), 2);
    }

    #[test]
    fn absent_cells_are_stored_as_null() {
        let table = sample();
        let col = table.dataframe().column("2025").unwrap().str().unwrap();
        assert_eq!(col.get(1), None);
        assert_eq!(col.get(0), Some("20-Apr-2025"));
    }

    #[test]
    fn round_trips_through_its_own_frame() {
        let table = sample();
        let rebuilt = CalendarTable::from_dataframe(table.dataframe()).unwrap();
        assert_eq!(rebuilt, table);
    }
}
