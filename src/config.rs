// src/config.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::dates::DateParser;
use crate::error::{Error, Result};

pub const CONFIG_ENV_VAR: &str = "OUTREACH_REPORT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "outreach_report.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dark_mode: bool,
    pub refresh_interval_secs: u64,
    pub window_width: u32,
    pub window_height: u32,
    /// chrono format strings tried after the built-in date formats
    pub extra_date_formats: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            dark_mode: true,
            refresh_interval_secs: 5,
            window_width: 1280,
            window_height: 800,
            extra_date_formats: Vec::new(),
        }
    }
}

impl Settings {
    /// Env var path first, then `outreach_report.json` in the working directory,
    /// then defaults. A file that exists but does not parse is an error.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }

        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(&local);
        }

        debug!("no config file found, using defaults");
        Ok(Settings::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_json(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        if settings.refresh_interval_secs == 0 {
            return Err(Error::Config("refresh_interval_secs must be at least 1".to_string()));
        }
        Ok(settings)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.extra_date_formats.clone())
    }
}
