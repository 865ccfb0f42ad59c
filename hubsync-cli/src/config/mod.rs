//! Config file loading and resolved sync settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

use crate::api::models::FilterCriterion;
use crate::sync::columns::{output_columns, state_filter_criteria, OutputColumn, DATA_SHEET};

pub const DEFAULT_WORKBOOK: &str = "hubsync.xlsx";

/// Optional overrides read from the TOML config file. Every field has a
/// sensible default so the file itself is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub token: Option<String>,
    pub workbook: Option<PathBuf>,
    pub sheet: Option<String>,
    pub filter_pipeline_label: Option<String>,
    pub state_filter: Option<bool>,
}

impl FileConfig {
    /// Load the config file. An explicit path must exist and parse; the
    /// default path is only read when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let Some(path) = default_config_path() else {
                    return Ok(Self::default());
                };
                if path.exists() {
                    Self::read(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hubsync").join("config.toml"))
}

/// Fully resolved settings for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub workbook: PathBuf,
    pub sheet: String,
    pub inline_token: Option<String>,
    pub filter_pipeline_label: String,
    pub state_filter: bool,
    pub state_filter_criteria: Vec<FilterCriterion>,
    pub output_columns: Vec<OutputColumn>,
}

impl SyncConfig {
    /// Merge the command line flag over the config file over the
    /// built-in defaults.
    pub fn resolve(file: FileConfig, workbook_flag: Option<PathBuf>) -> Self {
        let workbook = workbook_flag
            .or(file.workbook)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK));

        Self {
            workbook,
            sheet: file.sheet.unwrap_or_else(|| DATA_SHEET.to_string()),
            inline_token: file.token,
            filter_pipeline_label: file.filter_pipeline_label.unwrap_or_default(),
            state_filter: file.state_filter.unwrap_or(true),
            state_filter_criteria: state_filter_criteria(),
            output_columns: output_columns(),
        }
    }
}
