//! Bytecode compilation.
//!
//! A module that fails to compile is reported as an instantiation error; the
//! harness only distinguishes "loaded" from "not loaded".

use std::time::Instant;

use tracing::{debug, instrument};
use wasmtime::{Engine, Module};

use spec_runner_common::HarnessError;

/// `\0asm`
const WASM_MAGIC: [u8; 4] = *b"\0asm";

/// The only binary format version the runner accepts.
const WASM_VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

/// A compiled core module, ready to be linked.
#[derive(Clone)]
pub struct CompiledModule {
    inner: Module,
    size: usize,
}

impl CompiledModule {
    /// Compile binary bytecode.
    ///
    /// Text-format input is rejected here; scripts only ever point at binary
    /// module files.
    #[instrument(skip_all, fields(size = bytecode.len()))]
    pub fn from_bytes(engine: &Engine, bytecode: &[u8]) -> Result<Self, HarnessError> {
        let start = Instant::now();

        check_preamble(bytecode)?;

        let inner = Module::from_binary(engine, bytecode)
            .map_err(|e| HarnessError::instantiation(format!("compile error: {e:#}")))?;

        let module = Self {
            inner,
            size: bytecode.len(),
        };
        debug!(
            imports = module.inner.imports().len(),
            exports = module.inner.exports().len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Module compiled"
        );

        Ok(module)
    }

    /// Compile a module from WAT source.
    pub fn from_wat(engine: &Engine, wat: &str) -> Result<Self, HarnessError> {
        let inner = Module::new(engine, wat)
            .map_err(|e| HarnessError::instantiation(format!("WAT error: {e:#}")))?;

        Ok(Self {
            inner,
            size: wat.len(),
        })
    }

    /// Length of the source the module was compiled from.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn as_module(&self) -> &Module {
        &self.inner
    }
}

impl std::fmt::Debug for CompiledModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledModule")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Check the 8-byte binary preamble.
fn check_preamble(bytecode: &[u8]) -> Result<(), HarnessError> {
    let Some((magic, rest)) = bytecode.split_first_chunk::<4>() else {
        return Err(HarnessError::instantiation("not a binary module: too short"));
    };
    if *magic != WASM_MAGIC {
        return Err(HarnessError::instantiation("not a binary module: bad magic"));
    }

    match rest.first_chunk::<4>() {
        Some(version) if *version == WASM_VERSION => Ok(()),
        Some(version) => Err(HarnessError::instantiation(format!(
            "unsupported binary version {}",
            u32::from_le_bytes(*version)
        ))),
        None => Err(HarnessError::instantiation("not a binary module: too short")),
    }
}
