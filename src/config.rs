use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::ExerciseCatalog;
use crate::error::AletheiaError;
use crate::logging::{LogConfig, LogFormat, LogLevel};
use crate::models::Units;

/// Keys accepted by [`AppConfig::get`] and [`AppConfig::set`]
pub const CONFIG_KEYS: [&str; 7] = [
    "settings.units",
    "settings.data_dir",
    "settings.catalog_path",
    "settings.color_output",
    "logging.level",
    "logging.format",
    "logging.file_path",
];

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Logging output
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Distance units for pace and distance display
    pub units: Units,

    /// Directory run files are read from when given a bare name
    pub data_dir: PathBuf,

    /// Exercise catalog replacing the built-in one
    pub catalog_path: Option<PathBuf>,

    /// Colored terminal output
    pub color_output: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            metadata: ConfigMetadata::default(),
            settings: AppSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for ConfigMetadata {
    fn default() -> Self {
        let now = Utc::now();

        ConfigMetadata {
            version: "1.0".to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            units: Units::Metric,
            data_dir: PathBuf::from("./runs"),
            catalog_path: None,
            color_output: true,
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", path.as_ref().display())
        })?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".aletheia")
            .join("config.toml")
    }

    /// Load configuration, using defaults only when the file does not exist
    ///
    /// A file that exists but cannot be read or parsed is an error, so a
    /// later save never overwrites it with defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            tracing::debug!(
                path = %path.as_ref().display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Read one setting as a string
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "settings.units" => self.settings.units.to_string(),
            "settings.data_dir" => self.settings.data_dir.display().to_string(),
            "settings.catalog_path" => self
                .settings
                .catalog_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "settings.color_output" => self.settings.color_output.to_string(),
            "logging.level" => self.logging.level.to_filter(),
            "logging.format" => format!("{:?}", self.logging.format).to_lowercase(),
            "logging.file_path" => self
                .logging
                .file_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    /// Update one setting from a string; an empty value clears optional paths
    ///
    /// Unknown keys and unparseable values fail with
    /// [`AletheiaError::Configuration`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |reason: String| anyhow::Error::from(AletheiaError::Configuration(reason));
        let optional_path = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(PathBuf::from(value))
            }
        };

        match key {
            "settings.units" => {
                self.settings.units = value.parse::<Units>().map_err(invalid)?
            }
            "settings.data_dir" => self.settings.data_dir = PathBuf::from(value),
            "settings.catalog_path" => self.settings.catalog_path = optional_path(value),
            "settings.color_output" => {
                self.settings.color_output = value.parse::<bool>().map_err(|_| {
                    invalid(format!("Expected true or false for {}, got '{}'", key, value))
                })?
            }
            "logging.level" => {
                self.logging.level = value.parse::<LogLevel>().map_err(invalid)?
            }
            "logging.format" => {
                self.logging.format = value.parse::<LogFormat>().map_err(invalid)?
            }
            "logging.file_path" => self.logging.file_path = optional_path(value),
            _ => return Err(invalid(format!("Unknown configuration key: {}", key))),
        }

        self.metadata.updated_at = Utc::now();
        Ok(())
    }

    /// Catalog from `settings.catalog_path`, or the built-in one
    pub fn exercise_catalog(&self) -> Result<ExerciseCatalog> {
        match &self.settings.catalog_path {
            Some(path) => ExerciseCatalog::load_from_file(path)
                .with_context(|| format!("Failed to load exercise catalog: {}", path.display())),
            None => Ok(ExerciseCatalog::builtin()),
        }
    }

    /// Resolve a run file argument against the data directory
    pub fn resolve_run_path(&self, path: &Path) -> PathBuf {
        if path.exists() || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.settings.data_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.settings, deserialized.settings);
        assert_eq!(config.logging, deserialized.logging);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original_config = AppConfig::default();
        original_config.set("settings.units", "imperial").unwrap();
        original_config.save_to_file(&config_path).unwrap();

        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();
        assert_eq!(loaded_config.settings.units, Units::Imperial);
    }

    #[test]
    fn test_get_and_set() {
        let mut config = AppConfig::default();
        for key in CONFIG_KEYS {
            assert!(config.get(key).is_some(), "missing key {}", key);
        }

        config.set("logging.level", "debug").unwrap();
        assert_eq!(config.get("logging.level").unwrap(), "debug");

        config.set("settings.catalog_path", "drills.toml").unwrap();
        assert_eq!(config.get("settings.catalog_path").unwrap(), "drills.toml");
        config.set("settings.catalog_path", "").unwrap();
        assert_eq!(config.settings.catalog_path, None);

        assert!(config.set("settings.color_output", "maybe").is_err());
        let err = config.set("settings.nope", "1").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AletheiaError>(),
            Some(AletheiaError::Configuration(_))
        ));
        assert!(config.get("settings.nope").is_none());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.settings, AppSettings::default());
    }

    #[test]
    fn test_broken_file_is_not_replaced_by_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.set("settings.data_dir", "/my/runs").unwrap();
        config.save_to_file(&config_path).unwrap();

        let saved = fs::read_to_string(&config_path).unwrap();
        let broken = saved.replace("color_output = true", "color_output = yes");
        assert_ne!(saved, broken);
        fs::write(&config_path, &broken).unwrap();

        assert!(AppConfig::load_or_default(&config_path).is_err());
        let on_disk = fs::read_to_string(&config_path).unwrap();
        assert!(on_disk.contains("/my/runs"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[settings]\ndata_dir = \"/my/runs\"\n\n[logging]\nlevel = \"debug\"\n",
        )
        .unwrap();

        let config = AppConfig::load_or_default(&config_path).unwrap();
        assert_eq!(config.settings.data_dir, PathBuf::from("/my/runs"));
        assert_eq!(config.settings.units, Units::Metric);
        assert!(config.settings.color_output);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.metadata.version, "1.0");
    }

    #[test]
    fn test_catalog_from_settings() {
        let mut config = AppConfig::default();
        assert_eq!(config.exercise_catalog().unwrap().len(), 15);

        config.settings.catalog_path = Some(PathBuf::from("/definitely/not/here.toml"));
        assert!(config.exercise_catalog().is_err());
    }
}
