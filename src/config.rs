use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::TrackerError;
use crate::export::DEFAULT_EXPORT_FILE;
use crate::format::{format_date, DEFAULT_DATE_FORMAT};

pub const CONFIG_FILE: &str = "expenses.config";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    pub currency: char,
    pub date_format: String,
    pub data_dir: Option<PathBuf>,
    pub export_file: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            currency: '$',
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            data_dir: None,
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
        }
    }
}

impl TrackerConfig {
    pub fn from_toml(content: &str) -> Result<Self, TrackerError> {
        let config: Self = toml::from_str(content)?;
        let sample = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        format_date(sample, &config.date_format)?;
        Ok(config)
    }

    /// Reads `explicit` if given, otherwise `expenses.config` in the working
    /// directory when it exists, otherwise falls back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, TrackerError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = std::env::current_dir()?.join(CONFIG_FILE);
                if !path.exists() {
                    tracing::debug!("no config file at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };
        tracing::debug!("reading config from {}", path.display());
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Directory holding the stored expenses.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("expense-tracker")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
