//! Startup settings.
//!
//! Loaded once through the `config` crate from an optional TOML file and
//! `TABVIEW_*` environment variables, then overridden by CLI flags.
//!
//! ```toml
//! title = "Billing Reconciliation"
//! page_size = 10
//! delimiter = ";"
//! export_dir = "exports"
//! theme = "dark"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::ViewOptions;

/// Theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect from the terminal background.
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeMode {
    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Auto => "auto",
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Title used when the dataset document has none.
    pub title: String,
    pub pagination: bool,
    pub page_size: usize,
    pub searchable: bool,
    pub downloadable: bool,
    /// Export field delimiter. Must be a single ASCII character.
    pub delimiter: char,
    /// Directory exports are written to.
    pub export_dir: PathBuf,
    pub theme: ThemeMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Table".to_string(),
            pagination: true,
            page_size: 5,
            searchable: true,
            downloadable: true,
            delimiter: ',',
            export_dir: PathBuf::from("."),
            theme: ThemeMode::Auto,
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder.add_source(Environment::with_prefix("TABVIEW")).build()?;
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        if !self.delimiter.is_ascii() || self.delimiter == '"' || self.delimiter == '\n' {
            bail!("delimiter must be a single ASCII character other than a quote or newline");
        }
        Ok(())
    }

    /// View options derived from these settings.
    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            pagination: self.pagination,
            page_size: self.page_size,
            searchable: self.searchable,
            downloadable: self.downloadable,
            delimiter: self.delimiter as u8,
        }
    }
}
