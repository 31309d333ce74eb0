//! Error types for spec-runner.
//!
//! Every variant of [`HarnessError`] is fatal: the runner stops at the first
//! error and reports it. The variants fall into four classes:
//! - configuration errors (script, bytecode files, values, imports, tags)
//! - resolution errors (unknown module names, missing exports)
//! - assertion mismatches
//! - engine faults raised while executing guest code

use std::io;

use thiserror::Error;

use crate::boundary::{ExportKind, ImportKind};

/// Fatal harness errors.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A file (script or module bytecode) could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFile {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The test script is not valid JSON or is structurally incomplete.
    #[error("Invalid script: {reason}")]
    InvalidScript {
        /// Description of the problem.
        reason: String,
    },

    /// A command or action carried a type tag the runner does not know.
    #[error("Unrecognized command: {tag}")]
    UnrecognizedCommand {
        /// The offending tag.
        tag: String,
    },

    /// A value could not be decoded into a lane for its declared type.
    #[error("Invalid {value_type} value: {text:?}")]
    InvalidValue {
        /// Declared type of the value.
        value_type: String,
        /// Raw text from the script.
        text: String,
    },

    /// A module asked for an import outside the stubbed `spectest` surface.
    #[error("Unsupported import ({kind}): {module}.{field}")]
    UnsupportedImport {
        /// Kind of import requested.
        kind: ImportKind,
        /// Import module name.
        module: String,
        /// Import field name.
        field: String,
    },

    /// Compiling, linking or instantiating a module failed.
    #[error("Instantiation failed: {reason}")]
    Instantiation {
        /// Description of the failure.
        reason: String,
    },

    /// An action named a module that was never registered.
    #[error("Named module not found: {name}")]
    ModuleNotFound {
        /// The unresolved module name.
        name: String,
    },

    /// An action ran before any module was loaded.
    #[error("No module has been loaded")]
    NoCurrentModule,

    /// The target instance has no export of the requested kind and name.
    #[error("Export not found ({kind}): {field}")]
    ExportNotFound {
        /// Kind of export looked up.
        kind: ExportKind,
        /// Export name.
        field: String,
    },

    /// The observed value differs from the expected one under the width rule.
    #[error(
        "Assertion failed at line {line}: {field} got {actual}, expected {expected} ({value_type})"
    )]
    AssertionMismatch {
        /// Source line of the failing command.
        line: u32,
        /// Export the value came from.
        field: String,
        /// Declared type of the expected value.
        value_type: String,
        /// Observed lane, reduced to the comparison width.
        actual: u64,
        /// Expected lane, reduced to the comparison width.
        expected: u64,
    },

    /// The engine reported an error while running guest code.
    #[error("Engine fault: {message}")]
    EngineFault {
        /// Description of the fault.
        message: String,
    },

    /// Invalid configuration was provided.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the configuration error.
        reason: String,
    },

    /// Writing the progress stream failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HarnessError {
    /// Create a new `ReadFile` error.
    pub fn read_file(path: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a new `InvalidScript` error.
    pub fn invalid_script(reason: impl Into<String>) -> Self {
        Self::InvalidScript {
            reason: reason.into(),
        }
    }

    /// Create a new `UnrecognizedCommand` error.
    pub fn unrecognized(tag: impl Into<String>) -> Self {
        Self::UnrecognizedCommand { tag: tag.into() }
    }

    /// Create a new `InvalidValue` error.
    pub fn invalid_value(value_type: impl Into<String>, text: impl Into<String>) -> Self {
        Self::InvalidValue {
            value_type: value_type.into(),
            text: text.into(),
        }
    }

    /// Create a new `UnsupportedImport` error.
    pub fn unsupported_import(
        kind: ImportKind,
        module: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::UnsupportedImport {
            kind,
            module: module.into(),
            field: field.into(),
        }
    }

    /// Create a new `Instantiation` error.
    pub fn instantiation(reason: impl Into<String>) -> Self {
        Self::Instantiation {
            reason: reason.into(),
        }
    }

    /// Create a new `ModuleNotFound` error.
    pub fn module_not_found(name: impl Into<String>) -> Self {
        Self::ModuleNotFound { name: name.into() }
    }

    /// Create a new `ExportNotFound` error.
    pub fn export_not_found(kind: ExportKind, field: impl Into<String>) -> Self {
        Self::ExportNotFound {
            kind,
            field: field.into(),
        }
    }

    /// Create a new `EngineFault` error.
    pub fn engine_fault(message: impl Into<String>) -> Self {
        Self::EngineFault {
            message: message.into(),
        }
    }

    /// Create a new `InvalidConfig` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors caused by the script, its files or the
    /// runner configuration rather than by the engine under test.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ReadFile { .. }
                | Self::InvalidScript { .. }
                | Self::UnrecognizedCommand { .. }
                | Self::InvalidValue { .. }
                | Self::UnsupportedImport { .. }
                | Self::InvalidConfig { .. }
        )
    }

    /// Returns `true` if this error is a failed value assertion.
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionMismatch { .. })
    }

    /// Returns `true` if the engine itself faulted while executing.
    pub fn is_engine_fault(&self) -> bool {
        matches!(self, Self::EngineFault { .. })
    }
}
