use super::LoadResult;
use crate::CalendarTable;
use crate::date_record::RawCell;
use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::sync::Mutex;

/// Calendar dataset kept in a SQLite file.
///
/// Events keep their declaration order through `position`; absent cells
/// have no row in `calendar_cells`.
pub struct SqliteCalendarStore {
    connection: Mutex<Connection>,
}

impl SqliteCalendarStore {
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> LoadResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> LoadResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS calendar_years (
                year INTEGER PRIMARY KEY,
                position INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS calendar_events (
                position INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS calendar_cells (
                position INTEGER NOT NULL,
                year INTEGER NOT NULL,
                date_text TEXT NOT NULL,
                PRIMARY KEY (position, year)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.connection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the stored dataset with `table`.
    pub fn save_table(&self, table: &CalendarTable) -> LoadResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM calendar_cells", [])?;
        tx.execute("DELETE FROM calendar_events", [])?;
        tx.execute("DELETE FROM calendar_years", [])?;
        {
            let mut year_stmt =
                tx.prepare("INSERT INTO calendar_years (year, position) VALUES (?1, ?2)")?;
            for (position, year) in table.years().iter().enumerate() {
                year_stmt.execute(params![year, position as i64])?;
            }

            let mut event_stmt =
                tx.prepare("INSERT INTO calendar_events (position, name) VALUES (?1, ?2)")?;
            for (position, name) in table.events().iter().enumerate() {
                event_stmt.execute(params![position as i64, name])?;
            }

            let mut cell_stmt = tx.prepare(
                "INSERT INTO calendar_cells (position, year, date_text) VALUES (?1, ?2, ?3)",
            )?;
            for year in table.years() {
                for (position, (_, cell)) in table.column(*year).iter().enumerate() {
                    if let Some(text) = cell.as_text() {
                        cell_stmt.execute(params![position as i64, year, text])?;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Returns `None` when nothing has been saved yet.
    pub fn load_table(&self) -> LoadResult<Option<CalendarTable>> {
        let conn = self.lock();

        let mut stmt =
            conn.prepare("SELECT position, name FROM calendar_events ORDER BY position ASC")?;
        let declared = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        if declared.is_empty() {
            return Ok(None);
        }
        let event_slot: HashMap<i64, usize> = declared
            .iter()
            .enumerate()
            .map(|(slot, (position, _))| (*position, slot))
            .collect();
        let events: Vec<String> = declared.into_iter().map(|(_, name)| name).collect();

        let mut stmt = conn.prepare("SELECT year FROM calendar_years ORDER BY position ASC")?;
        let years = stmt
            .query_map([], |row| row.get::<_, i32>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let year_slot: HashMap<i32, usize> = years
            .iter()
            .enumerate()
            .map(|(slot, year)| (*year, slot))
            .collect();

        let mut cells = vec![vec![RawCell::Absent; years.len()]; events.len()];
        let mut stmt = conn.prepare("SELECT position, year, date_text FROM calendar_cells")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i32>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        for row in rows {
            let (position, year, text) = row?;
            let row_slot = event_slot.get(&position).copied();
            let col_slot = year_slot.get(&year).copied();
            if let (Some(row_slot), Some(col_slot)) = (row_slot, col_slot) {
                cells[row_slot][col_slot] = RawCell::from_text(&text);
            } else {
                return Err(super::LoadError::InvalidData(format!(
                    "cell ({position}, {year}) has no matching event or year"
                )));
            }
        }

        CalendarTable::from_rows(years, events.into_iter().zip(cells)).map(Some)
    }
}
