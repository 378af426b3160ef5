use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{default_display_order, default_rules, CategoryRule, CategoryTable};

const CONFIG_FILE: &str = "categories.toml";
const DEFAULT_SOURCE_DIR: &str = "./expense_reports";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("display_order must not be empty")]
    EmptyDisplayOrder,
    #[error("display_order must end with \"other\", found \"{0}\"")]
    DisplayOrderMustEndWithOther(String),
    #[error("category \"{0}\" is missing from display_order")]
    CategoryMissingFromDisplayOrder(String),
    #[error("category \"{0}\" has an empty keyword list or an empty keyword")]
    EmptyKeywords(String),
    #[error("category \"{0}\" is defined more than once")]
    DuplicateCategory(String),
    #[error("delimiter must be a single byte, got {0:?}")]
    InvalidDelimiter(String),
}

/// What to do when a source file cannot be opened or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileErrorPolicy {
    /// Log, record the file as skipped and continue with the others.
    #[default]
    Skip,
    /// Fail the whole ingestion on the first unreadable file.
    Abort,
}

/// Positional layout of a card export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceProfile {
    pub direction_column: usize,
    pub amount_column: usize,
    pub date_column: usize,
    pub merchant_column: usize,
    pub date_format: String,
    pub credit_marker: String,
    pub delimiter: String,
}

impl Default for SourceProfile {
    fn default() -> Self {
        Self {
            direction_column: 0,
            amount_column: 2,
            date_column: 6,
            merchant_column: 10,
            date_format: "%d.%m.%Y".into(),
            credit_marker: "kredit".into(),
            delimiter: ",".into(),
        }
    }
}

impl SourceProfile {
    /// Rows with fewer fields than this are rejected.
    pub fn min_fields(&self) -> usize {
        [
            self.direction_column,
            self.amount_column,
            self.date_column,
            self.merchant_column,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }

    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(ConfigError::InvalidDelimiter(self.delimiter.clone())),
        }
    }
}

/// Raw shape of `categories.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    source_dir: Option<PathBuf>,
    on_file_error: FileErrorPolicy,
    source: SourceProfile,
    categories: Option<Vec<CategoryRule>>,
    display_order: Option<Vec<String>>,
}

/// Process-wide configuration, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub on_file_error: FileErrorPolicy,
    pub source: SourceProfile,
    pub categories: CategoryTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            on_file_error: FileErrorPolicy::default(),
            source: SourceProfile::default(),
            categories: CategoryTable::default(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawSettings = toml::from_str(content).context("Failed to parse settings TOML")?;
        raw.source.delimiter_byte()?;

        let categories = match (raw.categories, raw.display_order) {
            (None, None) => CategoryTable::default(),
            (rules, order) => CategoryTable::new(
                rules.unwrap_or_else(default_rules),
                order.unwrap_or_else(default_display_order),
            )?,
        };

        Ok(Self {
            source_dir: raw
                .source_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
            on_file_error: raw.on_file_error,
            source: raw.source,
            categories,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Load from an explicit path, else the platform config dir, else defaults.
    /// Only an explicitly requested file is required to exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!("loading settings from {}", path.display());
                Self::from_file(&path)
            }
            _ => {
                tracing::debug!("no settings file found, using built-in categories");
                Ok(Self::default())
            }
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "cardspend", "cardspend")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}
