use liturgical_calendar::render::{self, ReportFormat};
use liturgical_calendar::{CalendarTable, RawCell, build_year_report};
use tempfile::NamedTempFile;

fn report() -> liturgical_calendar::YearReport {
    let table = CalendarTable::from_rows(
        vec![2024],
        vec![
            ("Easter".to_string(), vec![RawCell::from_text("31-Mar-2024")]),
            ("Pentecost".to_string(), vec![RawCell::from_text("TBD")]),
            ("Présentation".to_string(), vec![RawCell::Absent]),
        ],
    )
    .unwrap();
    build_year_report(&table, 2024)
}

#[test]
fn text_table_lines_share_one_width() {
    let text = render::render_text_table(&report()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // border, header, border, three rows, border
    assert_eq!(lines.len(), 7);
    let width = lines[0].chars().count();
    assert!(lines.iter().all(|l| l.chars().count() == width));
    assert!(lines[1].contains("No."));
    assert!(lines[3].contains("Sunday, 31-Mar-2024"));
    assert!(lines[5].contains("Présentation"));
}

#[test]
fn csv_output_has_header_and_rows() {
    let mut out = Vec::new();
    render::write_csv(&report(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "No.,Event,Date");
    assert_eq!(lines[1], "1,Easter,\"Sunday, 31-Mar-2024\"");
    assert_eq!(lines[2], "2,Pentecost,TBD");
    assert_eq!(lines[3], "3,Présentation,");
}

#[test]
fn json_output_reads_back() {
    let report = report();
    let json = render::to_json(&report).unwrap();
    let parsed: liturgical_calendar::YearReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn report_formats_parse() {
    assert_eq!("csv".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
    assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
    assert_eq!("txt".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
    assert!("pdf".parse::<ReportFormat>().is_err());
}

#[test]
fn write_report_to_file() {
    let tmp = NamedTempFile::new().unwrap();
    render::write_report(&report(), ReportFormat::Csv, tmp.path()).unwrap();
    let contents = std::fs::read_to_string(tmp.path()).unwrap();
    assert!(contents.starts_with("No.,Event,Date"));
    assert_eq!(contents.lines().count(), 4);
}
