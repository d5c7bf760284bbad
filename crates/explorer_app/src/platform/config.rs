use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use explorer_client::ClientSettings;
use explorer_core::{DisplaySettings, DEFAULT_QUERY_LIMIT};
use explorer_logging::{explorer_info, explorer_warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

use super::logging::LogDestination;

pub(crate) const DEFAULT_CONFIG_FILENAME: &str = "explorer.ron";

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ExplorerConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub max_body_bytes: u64,
    pub default_limit: u32,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub log_file: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let client = ClientSettings::default();
        Self {
            base_url: client.base_url,
            connect_timeout_ms: client.connect_timeout.as_millis() as u64,
            request_timeout_ms: client.request_timeout.as_millis() as u64,
            max_body_bytes: client.max_body_bytes,
            default_limit: DEFAULT_QUERY_LIMIT,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
            log_file: PathBuf::from("./explorer.log"),
        }
    }
}

impl ExplorerConfig {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            max_body_bytes: self.max_body_bytes,
        }
    }

    pub fn display_settings(&self) -> DisplaySettings {
        DisplaySettings {
            base_url: self.base_url.clone(),
            default_limit: self.default_limit,
        }
    }
}

/// Reads the config file. A missing or unreadable file yields defaults.
///
/// Called before logging is up, so problems are returned as notes for the
/// caller to log once the logger exists.
pub(crate) fn load_config(path: &Path) -> (ExplorerConfig, Option<String>) {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return (ExplorerConfig::default(), None);
        }
        Err(err) => {
            return (
                ExplorerConfig::default(),
                Some(format!("Failed to read config from {:?}: {}", path, err)),
            );
        }
    };

    match ron::from_str(&content) {
        Ok(config) => (config, None),
        Err(err) => (
            ExplorerConfig::default(),
            Some(format!("Failed to parse config from {:?}: {}", path, err)),
        ),
    }
}

/// Writes the defaults next to the binary's working directory so they can be edited.
pub(crate) fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(&ExplorerConfig::default(), pretty)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ConfigError::Io(e.error))?;
    explorer_info!("Wrote default config to {:?}", path);
    Ok(())
}

/// Loads the config, creating a default file on first run.
pub(crate) fn load_or_init(path: &Path) -> (ExplorerConfig, Vec<String>) {
    let mut notes = Vec::new();
    if !path.exists() {
        if let Err(err) = write_default_config(path) {
            notes.push(format!("Failed to write default config to {:?}: {}", path, err));
        }
    }
    let (config, note) = load_config(path);
    notes.extend(note);
    (config, notes)
}

pub(crate) fn log_notes(notes: &[String]) {
    for note in notes {
        explorer_warn!("{}", note);
    }
}
