#![cfg(feature = "sqlite")]

use liturgical_calendar::{
    CalendarSource, DatasetFile, DatasetFormat, LoadError, SqliteCalendarStore, read_table_csv,
};
use tempfile::NamedTempFile;

const SAMPLE_CSV: &str = "\
Event Name,2023,2024
Easter,09-Apr-2023,31-Mar-2024
Pentecost,28-May-2023,TBD
Ascension,,09-May-2024
";

#[test]
fn sqlite_round_trip_preserves_table() {
    let table = read_table_csv(SAMPLE_CSV.as_bytes()).unwrap();
    let tmp = NamedTempFile::new().unwrap();

    let store = SqliteCalendarStore::open(tmp.path()).unwrap();
    store.save_table(&table).unwrap();

    let loaded = store.load_table().unwrap().expect("stored table");
    assert_eq!(loaded, table);
    assert_eq!(loaded.events(), ["Easter", "Pentecost", "Ascension"]);
}

#[test]
fn saving_replaces_previous_contents() {
    let tmp = NamedTempFile::new().unwrap();
    let store = SqliteCalendarStore::open(tmp.path()).unwrap();
    store
        .save_table(&read_table_csv(SAMPLE_CSV.as_bytes()).unwrap())
        .unwrap();

    let smaller = read_table_csv("Event Name,2024\nChristmas,25-Dec-2024\n".as_bytes()).unwrap();
    store.save_table(&smaller).unwrap();
    assert_eq!(store.load_table().unwrap(), Some(smaller));
}

#[test]
fn empty_store_has_no_table() {
    let tmp = NamedTempFile::new().unwrap();
    let store = SqliteCalendarStore::open(tmp.path()).unwrap();
    assert!(store.load_table().unwrap().is_none());

    let err = DatasetFile::new(tmp.path(), DatasetFormat::Sqlite)
        .load_table()
        .unwrap_err();
    assert!(matches!(err, LoadError::NotFound));
}

#[test]
fn dataset_file_reads_sqlite() {
    let tmp = NamedTempFile::new().unwrap();
    let table = read_table_csv(SAMPLE_CSV.as_bytes()).unwrap();
    SqliteCalendarStore::open(tmp.path())
        .unwrap()
        .save_table(&table)
        .unwrap();

    let loaded = DatasetFile::new(tmp.path(), DatasetFormat::Sqlite)
        .load_table()
        .unwrap();
    assert_eq!(loaded, table);
}
