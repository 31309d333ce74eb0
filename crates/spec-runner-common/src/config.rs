//! Configuration structures for spec-runner.
//!
//! - [`RunnerConfig`]: Top-level configuration containing all settings
//! - [`EngineConfig`]: Settings applied to every engine instance

use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// Size of one WebAssembly linear-memory page in bytes.
pub const WASM_PAGE_SIZE: u64 = 64 * 1024;

/// Largest page count a 32-bit linear memory can address.
pub const MAX_WASM32_PAGES: u32 = 65_536;

/// Top-level runner configuration.
///
/// Loaded from an optional TOML file and then overridden from the command line.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RunnerConfig {
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Engine configuration shared by every instance of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Compile with the optimizing backend.
    ///
    /// When disabled, modules are still compiled, but without optimization.
    #[serde(default = "defaults::accelerate")]
    pub accelerate: bool,

    /// Upper bound on linear-memory growth, in 64 KiB pages.
    ///
    /// `memory.grow` past this bound fails (returns -1) instead of allocating.
    /// The default is large enough for the memory-limit spec tests.
    #[serde(default = "defaults::max_memory_pages")]
    pub max_memory_pages: u32,

    /// Optional fuel budget per instance.
    ///
    /// `None` disables fuel metering; a guest that never returns then stalls
    /// the run.
    #[serde(default)]
    pub max_fuel: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accelerate: defaults::accelerate(),
            max_memory_pages: defaults::max_memory_pages(),
            max_fuel: None,
        }
    }
}

impl EngineConfig {
    /// Memory ceiling in bytes.
    pub fn max_memory_bytes(&self) -> u64 {
        u64::from(self.max_memory_pages) * WASM_PAGE_SIZE
    }

    /// Check that the settings describe a usable engine.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.max_memory_pages > MAX_WASM32_PAGES {
            return Err(HarnessError::invalid_config(format!(
                "max_memory_pages {} exceeds the 32-bit limit of {MAX_WASM32_PAGES}",
                self.max_memory_pages
            )));
        }
        if self.max_fuel == Some(0) {
            return Err(HarnessError::invalid_config(
                "max_fuel must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Default value functions for serde.
mod defaults {
    pub const fn accelerate() -> bool {
        true
    }

    pub const fn max_memory_pages() -> u32 {
        1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();

        assert!(config.engine.accelerate);
        assert_eq!(config.engine.max_memory_pages, 1024);
        assert_eq!(config.engine.max_fuel, None);
        assert!(config.engine.validate().is_ok());
    }

    #[test]
    fn test_max_memory_bytes() {
        let config = EngineConfig::default();
        assert_eq!(config.max_memory_bytes(), 1024 * 64 * 1024);
    }

    #[test]
    fn test_config_serialization() {
        let config = RunnerConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: RunnerConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            config.engine.max_memory_pages,
            deserialized.engine.max_memory_pages
        );
        assert_eq!(config.engine.accelerate, deserialized.engine.accelerate);
    }

    #[test]
    fn test_partial_deserialization() {
        let json = r#"{"engine": {"max_fuel": 5000}}"#;
        let config: RunnerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.engine.max_fuel, Some(5000));
        assert!(config.engine.accelerate);
        assert_eq!(config.engine.max_memory_pages, 1024);
    }

    #[test]
    fn test_validate_rejects_oversized_memory() {
        let config = EngineConfig {
            max_memory_pages: MAX_WASM32_PAGES + 1,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_rejects_zero_fuel() {
        let config = EngineConfig {
            max_fuel: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
