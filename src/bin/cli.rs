use clap::Parser;
use liturgical_calendar::config::AppConfig;
use liturgical_calendar::render::{self, ReportFormat};
use liturgical_calendar::{
    CalendarTable, DatasetFile, DatasetFormat, EVENT_NAME_COLUMN, ResolutionOutcome,
    build_year_report, filter_by_month, load_cached, logging, parse_month_name, resolve,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::info;

/// Interactive liturgical calendar lookup.
#[derive(Parser)]
#[command(name = "cli", version, about = "Look up liturgical observance dates")]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dataset file, overriding the config. Its extension picks the format
    /// unless `--format` is given.
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Dataset format (csv, json, sqlite), overriding the config.
    #[arg(short, long)]
    format: Option<DatasetFormat>,

    /// Year selected at startup.
    #[arg(short, long)]
    year: Option<i32>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct Session {
    table: Arc<CalendarTable>,
    config: AppConfig,
    year: i32,
}

impl Session {
    fn year_in_bounds(&self, year: i32) -> bool {
        self.config.calendar.accepts(year)
    }

    fn lookup_event_name(&self, input: &str) -> Option<String> {
        if self.table.contains_event(input) {
            return Some(input.to_string());
        }
        let idx: usize = input.parse().ok()?;
        self.table.events().get(idx.checked_sub(1)?).cloned()
    }

    fn show(&self, input: &str) {
        let event = self
            .lookup_event_name(input)
            .unwrap_or_else(|| input.to_string());
        match resolve(&self.table, &event, self.year) {
            Ok(ResolutionOutcome::Resolved(date)) => println!(
                "{} falls on {}, {} in {}",
                event,
                date.weekday_name(),
                date.date_text(),
                self.year
            ),
            Ok(ResolutionOutcome::Undetermined) => {
                println!("{}", self.config.labels.undetermined(&event, self.year))
            }
            Ok(ResolutionOutcome::NotFound(reason)) => {
                println!("Unable to find data: {}", reason)
            }
            Err(e) => println!("Unable to find data: {}", e),
        }
    }

    fn month(&self, name: &str) {
        let Some(month) = parse_month_name(name) else {
            println!("Unknown month '{}'.", name);
            return;
        };
        let roster = filter_by_month(&self.table, self.year, month);
        if roster.is_empty() {
            println!("{}", self.config.labels.empty_month(month.name(), self.year));
            return;
        }
        println!("Events in {} {}:", month.name(), self.year);
        match render::roster_to_dataframe(&roster) {
            Ok(df) => println!("{}", render::render_df_as_text_table(&df)),
            Err(e) => println!("Error rendering roster: {}", e),
        }
    }

    fn all(&self) {
        if !self.table.has_year(self.year) {
            println!("No column for {} in this dataset.", self.year);
            return;
        }
        let selection = [EVENT_NAME_COLUMN.to_string(), self.year.to_string()];
        match self.table.dataframe().select(selection) {
            Ok(df) => println!("{}", render::render_df_as_text_table(&df)),
            Err(e) => println!("Error: {}", e),
        }
    }

    fn report(&self, format: ReportFormat, path: Option<&str>) {
        let report = build_year_report(&self.table, self.year);
        match path {
            Some(path) => match render::write_report(&report, format, path) {
                Ok(_) => println!("Report for {} saved to {}.", self.year, path),
                Err(e) => println!("Error writing report: {}", e),
            },
            None => {
                if format == ReportFormat::Text {
                    println!("{}", self.config.labels.report_heading(self.year));
                }
                let stdout = io::stdout();
                if let Err(e) = render::render_to(&report, format, stdout.lock()) {
                    println!("Error rendering report: {}", e);
                }
            }
        }
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  year [<n>]                         Show or set the selected year\n  events                             List observances (numbered)\n  show <event|number>                Date and weekday of one observance\n  month <name>                       Observances falling in a month\n  all                                Raw dataset column for the selected year\n  report [text|csv|json] [path]      Full-year listing, printed or saved\n  quit|exit                          Exit"
    );
}

fn print_events(table: &CalendarTable) {
    for (idx, event) in table.events().iter().enumerate() {
        println!("  {:>3}. {}", idx + 1, event);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(path) = cli.dataset {
        if cli.format.is_none() {
            config.dataset.format = DatasetFormat::from_path(&path)?;
        }
        config.dataset.path = path;
    }
    if let Some(format) = cli.format {
        config.dataset.format = format;
    }

    let year = cli.year.unwrap_or(config.calendar.default_year);
    if !config.calendar.accepts(year) {
        return Err(format!(
            "year {} is outside {}..={}",
            year, config.calendar.min_year, config.calendar.max_year
        )
        .into());
    }

    let source: DatasetFile = config.dataset.source();
    let table = load_cached(&source)?;
    info!(year, events = table.len(), "session started");

    let mut session = Session {
        table,
        config,
        year,
    };

    println!(
        "{} - type 'help' for commands\n",
        session.config.labels.title
    );
    println!(
        "{} observances loaded. Selected year: {}",
        session.table.len(),
        session.year
    );

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "year" => match parts.next() {
                None => println!("Selected year: {}", session.year),
                Some(year_s) => match year_s.parse::<i32>() {
                    Ok(year) if session.year_in_bounds(year) => {
                        session.year = year;
                        println!("Selected year: {}", session.year);
                    }
                    Ok(year) => println!(
                        "Year {} is outside {}..={}.",
                        year, session.config.calendar.min_year, session.config.calendar.max_year
                    ),
                    Err(_) => println!("Invalid year"),
                },
            },
            "events" => print_events(&session.table),
            "show" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: show <event|number>");
                    continue;
                }
                session.show(&rest.join(" "));
            }
            "month" => match parts.next() {
                Some(name) => session.month(name),
                None => println!("Usage: month <name>"),
            },
            "all" => session.all(),
            "report" => {
                let mut format = ReportFormat::Text;
                let mut path = None;
                for arg in parts {
                    match arg.parse::<ReportFormat>() {
                        Ok(parsed) if path.is_none() => format = parsed,
                        _ => path = Some(arg),
                    }
                }
                session.report(format, path);
            }
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
