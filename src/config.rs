use crate::persistence::{DatasetFile, DatasetFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Settings for the presentation layer. Nothing here reaches the query
/// functions except through explicit arguments.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,

    #[serde(default)]
    pub labels: LabelConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
    #[serde(default = "default_dataset_format")]
    pub format: DatasetFormat,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            format: default_dataset_format(),
        }
    }
}

impl DatasetConfig {
    pub fn source(&self) -> DatasetFile {
        DatasetFile::new(self.path.clone(), self.format)
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("LiturgicalCalendar.csv")
}
fn default_dataset_format() -> DatasetFormat {
    DatasetFormat::Csv
}

/// Year bounds accepted from user input, and the year selected at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    #[serde(default = "default_year")]
    pub default_year: i32,
    #[serde(default = "default_min_year")]
    pub min_year: i32,
    #[serde(default = "default_max_year")]
    pub max_year: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            default_year: default_year(),
            min_year: default_min_year(),
            max_year: default_max_year(),
        }
    }
}

impl CalendarConfig {
    pub fn accepts(&self, year: i32) -> bool {
        (self.min_year..=self.max_year).contains(&year)
    }
}

fn default_year() -> i32 {
    2024
}
fn default_min_year() -> i32 {
    1
}
fn default_max_year() -> i32 {
    3000
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// `{event}` and `{year}` are substituted.
    #[serde(default = "default_undetermined_notice")]
    pub undetermined_notice: String,
    /// `{month}` and `{year}` are substituted.
    #[serde(default = "default_empty_month_notice")]
    pub empty_month_notice: String,
    /// `{year}` is substituted.
    #[serde(default = "default_report_title")]
    pub report_title: String,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            undetermined_notice: default_undetermined_notice(),
            empty_month_notice: default_empty_month_notice(),
            report_title: default_report_title(),
        }
    }
}

impl LabelConfig {
    pub fn undetermined(&self, event: &str, year: i32) -> String {
        self.undetermined_notice
            .replace("{event}", event)
            .replace("{year}", &year.to_string())
    }

    pub fn empty_month(&self, month: &str, year: i32) -> String {
        self.empty_month_notice
            .replace("{month}", month)
            .replace("{year}", &year.to_string())
    }

    pub fn report_heading(&self, year: i32) -> String {
        self.report_title.replace("{year}", &year.to_string())
    }
}

fn default_title() -> String {
    "Liturgical Calendar Explorer".to_string()
}
fn default_undetermined_notice() -> String {
    "The date for {event} in {year} is marked TBD.".to_string()
}
fn default_empty_month_notice() -> String {
    "No events found in {month} {year}.".to_string()
}
fn default_report_title() -> String {
    "Liturgical Calendar {year}".to_string()
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let calendar = &self.calendar;
        if calendar.min_year > calendar.max_year {
            return Err(ConfigError::Invalid(format!(
                "min_year {} is after max_year {}",
                calendar.min_year, calendar.max_year
            )));
        }
        if !calendar.accepts(calendar.default_year) {
            return Err(ConfigError::Invalid(format!(
                "default_year {} is outside {}..={}",
                calendar.default_year, calendar.min_year, calendar.max_year
            )));
        }
        Ok(())
    }
}
