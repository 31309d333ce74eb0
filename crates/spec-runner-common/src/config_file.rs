//! Optional TOML settings file.
//!
//! ```toml
//! [engine]
//! accelerate = false
//! max_memory_pages = 256
//! max_fuel = 50_000_000
//! ```
//!
//! Every key is optional. Unknown keys are rejected so a misspelt setting
//! does not silently fall back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{EngineConfig, RunnerConfig};

/// Contents of a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineConfig,
}

impl ConfigFile {
    /// Read and parse a settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid settings
    /// TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml(&text)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigFileError> {
        Ok(toml::from_str(text)?)
    }

    pub fn into_runner_config(self) -> RunnerConfig {
        RunnerConfig {
            engine: self.engine,
        }
    }
}

/// Settings file errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Cannot read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = ConfigFile::from_toml("").unwrap();
        assert_eq!(file, ConfigFile::default());
        assert_eq!(file.engine, EngineConfig::default());
    }

    #[test]
    fn test_engine_table() {
        let text = "
            [engine]
            accelerate = false
            max_fuel = 1_000_000
        ";

        let config = ConfigFile::from_toml(text).unwrap().into_runner_config();

        assert!(!config.engine.accelerate);
        assert_eq!(config.engine.max_memory_pages, 1024);
        assert_eq!(config.engine.max_fuel, Some(1_000_000));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = ConfigFile::from_toml("[engine]\nmax_pages = 4\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::Parse(_)));

        assert!(ConfigFile::from_toml("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = ConfigFile::from_toml("[engine]\naccelerate = \"yes\"\n").unwrap_err();
        assert!(err.to_string().starts_with("Malformed settings file"));
    }

    #[test]
    fn test_unreadable_file() {
        let err = ConfigFile::from_file("/definitely/not/here/spec-runner.toml").unwrap_err();
        assert!(matches!(err, ConfigFileError::Io { .. }));
    }
}
