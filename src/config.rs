use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ingestion::bestiary::FlattenOptions;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub logging: LoggingConfig,
    pub extraction: ExtractionConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// JSON file holding the array of monster records.
    pub input: PathBuf,
    /// Where to write flattened records; stdout when unset.
    pub output: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    /// `trace` dumps every record as it is processed.
    pub filter: String,
    /// Emit JSON lines instead of human-readable text.
    pub json: bool,
}

/// Extraction behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Flatten records in parallel (output order is preserved).
    pub parallel: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data.json"),
            output: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
            json: false,
        }
    }
}

impl ExtractionConfig {
    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            parallel: self.parallel,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/statblock-features/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit file; errors are returned.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("statblock-features").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
