//! Wasmtime-backed engine for spec-runner.
//!
//! This crate implements the engine boundary defined in `spec-runner-common`
//! on top of Wasmtime:
//! - [`WasmEngine`]: Configured Wasmtime engine, creates instances
//! - [`CompiledModule`]: Compiled WebAssembly module wrapper
//! - [`WasmInstance`]: One instance with its own store
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     WasmEngine                          │
//! │  (One per run)                                          │
//! │  - Optimization level (acceleration)                    │
//! │  - Fuel metering switch                                 │
//! └─────────────────────────────────────────────────────────┘
//!                            │  instantiate(bytecode, resolver)
//!                            ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │        CompiledModule + Linker (resolver imports)       │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │        Store<InstanceContext> + Instance                │
//! │  (One per module command, never shared)                 │
//! │  - Memory ceiling                                       │
//! │  - Fuel budget                                          │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod engine;
pub mod instance;
pub mod lane;
pub mod linker;
pub mod module;
pub mod store;

pub use engine::WasmEngine;
pub use instance::WasmInstance;
pub use module::CompiledModule;
pub use store::InstanceContext;
