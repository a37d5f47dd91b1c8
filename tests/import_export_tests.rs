use liturgical_calendar::persistence::cache::evict;
use liturgical_calendar::{
    CalendarSource, CalendarTable, DatasetFile, DatasetFormat, LoadError, RawCell, load_cached,
    load_table_from_csv, load_table_from_json, read_table_csv, save_table_to_csv,
    save_table_to_json,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const SAMPLE_CSV: &str = "\
Event Name,2024,2025
Epiphany,06-Jan-2024,06-Jan-2025
Easter,31-Mar-2024,20-Apr-2025
Pentecost,TBD,
Corpus Christi,32-Foo-2024,19-Jun-2025
";

fn csv_file(contents: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("create temp file");
    tmp.write_all(contents.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

#[test]
fn csv_reads_wide_layout() {
    let table = read_table_csv(SAMPLE_CSV.as_bytes()).unwrap();
    assert_eq!(table.events(), ["Epiphany", "Easter", "Pentecost", "Corpus Christi"]);
    assert_eq!(table.years(), [2024, 2025]);
    assert_eq!(table.cell("Pentecost", 2024).unwrap(), RawCell::Undetermined);
    assert_eq!(table.cell("Pentecost", 2025).unwrap(), RawCell::Absent);
    assert_eq!(
        table.cell("Corpus Christi", 2024).unwrap(),
        RawCell::DateText("32-Foo-2024".into())
    );
}

#[test]
fn event_name_column_may_sit_anywhere() {
    let csv = "2024,Event Name\n31-Mar-2024,Easter\n";
    let table = read_table_csv(csv.as_bytes()).unwrap();
    assert_eq!(table.events(), ["Easter"]);
    assert_eq!(
        table.cell("Easter", 2024).unwrap(),
        RawCell::DateText("31-Mar-2024".into())
    );
}

#[test]
fn csv_without_event_name_column_fails() {
    let err = read_table_csv("Name,2024\nEaster,31-Mar-2024\n".as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::MissingKeyColumn));
}

#[test]
fn csv_with_non_year_header_fails() {
    let err = read_table_csv("Event Name,Notes\nEaster,x\n".as_bytes()).unwrap_err();
    assert!(matches!(err, LoadError::InvalidYearColumn(header) if header == "Notes"));
}

#[test]
fn csv_json_round_trip_preserves_table() {
    let source = csv_file(SAMPLE_CSV);
    let table = load_table_from_csv(source.path()).unwrap();

    let json = NamedTempFile::new().unwrap();
    save_table_to_json(&table, json.path()).unwrap();
    let from_json = load_table_from_json(json.path()).unwrap();
    assert_eq!(from_json, table);

    let csv = NamedTempFile::new().unwrap();
    save_table_to_csv(&from_json, csv.path()).unwrap();
    let from_csv = load_table_from_csv(csv.path()).unwrap();
    assert_eq!(from_csv, table);
}

#[test]
fn json_snapshot_uses_null_for_absent_cells() {
    let table = read_table_csv(SAMPLE_CSV.as_bytes()).unwrap();
    let json = NamedTempFile::new().unwrap();
    save_table_to_json(&table, json.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json.path()).unwrap()).unwrap();
    assert_eq!(value["years"], serde_json::json!([2024, 2025]));
    assert_eq!(value["events"][2]["name"], "Pentecost");
    assert_eq!(value["events"][2]["dates"], serde_json::json!(["TBD", null]));
}

#[test]
fn dataset_file_dispatches_on_format() {
    let source = csv_file(SAMPLE_CSV);
    let table: CalendarTable = DatasetFile::new(source.path(), DatasetFormat::Csv)
        .load_table()
        .unwrap();
    assert_eq!(table.len(), 4);

    let err = DatasetFile::new(source.path(), DatasetFormat::Json)
        .load_table()
        .unwrap_err();
    assert!(matches!(err, LoadError::Serialization(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_table_from_csv("/definitely/not/here.csv").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn cached_loads_share_one_table() {
    let source = csv_file(SAMPLE_CSV);
    let dataset = DatasetFile::new(source.path(), DatasetFormat::Csv);
    let first = load_cached(&dataset).unwrap();
    let second = load_cached(&dataset).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    assert!(evict(&dataset));
    assert!(!evict(&dataset));
    let third = load_cached(&dataset).unwrap();
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(*first, *third);
}

#[test]
fn csv_year_columns_load_in_ascending_order() {
    let csv = "Event Name,2025,2024\nEaster,20-Apr-2025,31-Mar-2024\n";
    let table = read_table_csv(csv.as_bytes()).unwrap();
    assert_eq!(table.years(), [2024, 2025]);
    assert_eq!(
        table.cell("Easter", 2024).unwrap(),
        RawCell::DateText("31-Mar-2024".into())
    );
}

#[test]
fn format_follows_file_extension() {
    assert_eq!(DatasetFormat::from_path("calendar.csv").unwrap(), DatasetFormat::Csv);
    assert_eq!(DatasetFormat::from_path("calendar.JSON").unwrap(), DatasetFormat::Json);
    assert_eq!(DatasetFormat::from_path("calendar").unwrap(), DatasetFormat::Csv);

    let err = DatasetFormat::from_path("LiturgicalCalendar_1_3000.xlsx").unwrap_err();
    assert!(matches!(&err, LoadError::UnsupportedFormat(_)));
    assert!(err.to_string().contains("export the sheet to CSV"), "{err}");

    let err = DatasetFormat::from_path("calendar.parquet").unwrap_err();
    assert!(matches!(&err, LoadError::UnsupportedFormat(msg) if msg.contains("parquet")));
}
