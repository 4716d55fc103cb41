//! Application configuration.
//!
//! Stored as TOML at `<data_dir>/config.toml`. Every section has defaults,
//! so a missing file or a partial file both load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::StaticEnvironment;
use crate::terrain::MeshOptions;
use crate::visualization::{ModePreference, Quality};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Mode and quality choices
    pub visualization: VisualizationSettings,
    /// Terrain mesh parameters
    pub mesh: MeshOptions,
    /// Profile synthesis settings
    pub synthesis: SynthesisSettings,
    /// Environment used when no platform environment is available
    pub environment: StaticEnvironment,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            visualization: VisualizationSettings::default(),
            mesh: MeshOptions::default(),
            synthesis: SynthesisSettings::default(),
            environment: StaticEnvironment::default(),
        }
    }
}

/// Visualization choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizationSettings {
    /// Mode to use, or `auto`
    pub mode: ModePreference,
    /// Fixed quality; chosen automatically when absent
    pub quality: Option<Quality>,
    /// Run the benchmark before choosing a mode
    pub run_benchmark: bool,
    /// Ask for the high-performance adapter when probing
    pub high_performance_adapter: bool,
}

impl Default for VisualizationSettings {
    fn default() -> Self {
        Self {
            mode: ModePreference::Auto,
            quality: None,
            run_benchmark: true,
            high_performance_adapter: false,
        }
    }
}

/// Profile synthesis settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    /// Seed for reproducible profiles; entropy when absent
    pub seed: Option<u64>,
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "colviz", "ColViz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from `path`, falling back to defaults if it is absent.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "No config file, using defaults");
        return Ok(AppConfig {
            data_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to `path`.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
