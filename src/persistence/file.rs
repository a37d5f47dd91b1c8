use super::{LoadError, LoadResult};
use crate::date_record::RawCell;
use crate::table::{self, CalendarTable, EVENT_NAME_COLUMN};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

#[derive(Serialize, Deserialize)]
struct CalendarSnapshot {
    years: Vec<i32>,
    events: Vec<EventSnapshot>,
}

#[derive(Serialize, Deserialize)]
struct EventSnapshot {
    name: String,
    dates: Vec<Option<String>>,
}

impl CalendarSnapshot {
    fn from_table(table: &CalendarTable) -> Self {
        let columns: Vec<Vec<(String, RawCell)>> =
            table.years().iter().map(|year| table.column(*year)).collect();
        let events = table
            .events()
            .iter()
            .enumerate()
            .map(|(row, name)| EventSnapshot {
                name: name.clone(),
                dates: columns
                    .iter()
                    .map(|column| column[row].1.as_text().map(str::to_string))
                    .collect(),
            })
            .collect();
        Self {
            years: table.years().to_vec(),
            events,
        }
    }

    fn into_table(self) -> LoadResult<CalendarTable> {
        let rows = self.events.into_iter().map(|event| {
            let cells = event
                .dates
                .iter()
                .map(|date| RawCell::from_option(date.as_deref()))
                .collect();
            (event.name, cells)
        });
        CalendarTable::from_rows(self.years, rows)
    }
}

pub fn save_table_to_json<P: AsRef<Path>>(table: &CalendarTable, path: P) -> LoadResult<()> {
    let snapshot = CalendarSnapshot::from_table(table);
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_table_from_json<P: AsRef<Path>>(path: P) -> LoadResult<CalendarTable> {
    let file = File::open(path)?;
    let snapshot: CalendarSnapshot = serde_json::from_reader(BufReader::new(file))?;
    snapshot.into_table()
}

/// Reads the wide layout: an `Event Name` column plus one column per year.
pub fn read_table_csv<R: io::Read>(input: R) -> LoadResult<CalendarTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let key_idx = headers
        .iter()
        .position(|header| header == EVENT_NAME_COLUMN)
        .ok_or(LoadError::MissingKeyColumn)?;

    let mut years = Vec::with_capacity(headers.len().saturating_sub(1));
    let mut positions = Vec::with_capacity(headers.len().saturating_sub(1));
    for (idx, header) in headers.iter().enumerate() {
        if idx == key_idx {
            continue;
        }
        years.push(table::parse_year_header(header)?);
        positions.push(idx);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let name = record.get(key_idx).unwrap_or_default().to_string();
        let cells = positions
            .iter()
            .map(|idx| RawCell::from_option(record.get(*idx)))
            .collect();
        rows.push((name, cells));
    }
    CalendarTable::from_rows(years, rows)
}

pub fn load_table_from_csv<P: AsRef<Path>>(path: P) -> LoadResult<CalendarTable> {
    let file = File::open(path)?;
    read_table_csv(BufReader::new(file))
}

pub fn save_table_to_csv<P: AsRef<Path>>(table: &CalendarTable, path: P) -> LoadResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = Vec::with_capacity(table.years().len() + 1);
    header.push(EVENT_NAME_COLUMN.to_string());
    header.extend(table.years().iter().map(|year| year.to_string()));
    writer.write_record(&header)?;

    let columns: Vec<Vec<(String, RawCell)>> =
        table.years().iter().map(|year| table.column(*year)).collect();
    for (row, event) in table.events().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(event.as_str());
        for column in &columns {
            record.push(column[row].1.as_text().unwrap_or_default());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

