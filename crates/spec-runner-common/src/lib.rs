//! Common types, errors, and utilities for spec-runner.
//!
//! This crate provides shared functionality used across the spec-runner workspace:
//! - Error types using `thiserror` for the fail-fast error taxonomy
//! - Configuration structures for engine settings
//! - The engine boundary: [`Engine`], [`EngineInstance`] and [`ImportResolver`]

pub mod boundary;
pub mod config;
pub mod config_file;
pub mod error;

pub use boundary::{Engine, EngineInstance, ExportKind, HostFunction, ImportKind, ImportResolver, Lane};
pub use config::{EngineConfig, RunnerConfig};
pub use config_file::{ConfigFile, ConfigFileError};
pub use error::HarnessError;
