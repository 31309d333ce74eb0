//! Spec-test script interpreter.
//!
//! Reads a `wast2json` script and drives an [`Engine`](spec_runner_common::Engine)
//! through it:
//! - [`TestScript`]: the parsed script
//! - [`Interpreter`]: the sequential, fail-fast driver loop
//! - [`ModuleRegistry`]: instances loaded so far, by name and recency
//!
//! Progress is written as plain lines (`PASS L<line>`, `skipping <type>`,
//! `Entry = <export>`) to any [`std::io::Write`] sink.

pub mod dispatch;
pub mod interpreter;
pub mod registry;
pub mod reporter;
pub mod script;
pub mod value;

pub use interpreter::Interpreter;
pub use registry::ModuleRegistry;
pub use reporter::{Reporter, RunSummary};
pub use script::{Action, ActionKind, Command, CommandKind, SkipCategory, TestScript, ValueInfo, ValueText, ValueType};
pub use value::Width;
