//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use spec_runner_common::EngineConfig;

/// Default tracing filter when neither `--log-level` nor the environment sets one.
pub const DEFAULT_LOG_FILTER: &str = "warn,spec_runner=info";

/// Run a WebAssembly spec-test script.
#[derive(Debug, Parser)]
#[command(name = "spec-runner", version, about)]
pub struct Args {
    /// Path to the JSON script produced by wast2json
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,

    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Compile without optimizations
    #[arg(long)]
    pub no_accelerate: bool,

    /// Memory-growth ceiling in 64 KiB pages
    #[arg(long, value_name = "N")]
    pub max_memory_pages: Option<u32>,

    /// Fuel budget per instance
    #[arg(long, value_name = "N")]
    pub max_fuel: Option<u64>,

    /// Tracing filter directive
    #[arg(long, value_name = "FILTER", env = "SPEC_RUNNER_LOG")]
    pub log_level: Option<String>,
}

impl Args {
    /// Apply flag overrides on top of file or default settings.
    pub fn apply(&self, engine: &mut EngineConfig) {
        if self.no_accelerate {
            engine.accelerate = false;
        }
        if let Some(pages) = self.max_memory_pages {
            engine.max_memory_pages = pages;
        }
        if let Some(fuel) = self.max_fuel {
            engine.max_fuel = Some(fuel);
        }
    }

    pub fn log_filter(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
