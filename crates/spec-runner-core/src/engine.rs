//! Wasmtime engine configuration and creation.
//!
//! The [`WasmEngine`] is the harness's view of the engine under test. It is
//! built once per run from an [`EngineConfig`] and then creates one
//! [`WasmInstance`] per module command.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use wasmtime::{Config, Engine, Linker, OptLevel, Strategy};

use spec_runner_common::{EngineConfig, HarnessError, ImportResolver};

use crate::instance::WasmInstance;
use crate::linker::link_imports;
use crate::module::CompiledModule;
use crate::store::create_store;

/// Shared WebAssembly engine wrapper.
///
/// Wraps a Wasmtime [`Engine`] together with the configuration every instance
/// is created with.
///
/// # Configuration
///
/// - **Acceleration**: Cranelift with speed optimizations, or no optimization
///   when acceleration is disabled
/// - **Memory ceiling**: enforced per store through resource limits
/// - **Fuel**: optional per-instance budget
///
/// # Example
///
/// ```ignore
/// use spec_runner_common::EngineConfig;
/// use spec_runner_core::WasmEngine;
///
/// let engine = WasmEngine::new(&EngineConfig::default())?;
/// ```
#[derive(Clone)]
pub struct WasmEngine {
    engine: Arc<Engine>,
    config: EngineConfig,
}

impl WasmEngine {
    /// Create a new engine with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range or Wasmtime
    /// rejects it.
    pub fn new(config: &EngineConfig) -> Result<Self, HarnessError> {
        config.validate()?;

        let mut wasmtime_config = Config::new();
        wasmtime_config.strategy(Strategy::Cranelift);

        if config.accelerate {
            wasmtime_config.cranelift_opt_level(OptLevel::Speed);
        } else {
            wasmtime_config.cranelift_opt_level(OptLevel::None);
        }

        // Fuel metering for deterministic CPU limiting
        if config.max_fuel.is_some() {
            wasmtime_config.consume_fuel(true);
        }

        let engine = Engine::new(&wasmtime_config).map_err(|e| {
            HarnessError::invalid_config(format!("Failed to create Wasmtime engine: {e}"))
        })?;

        info!(
            accelerate = config.accelerate,
            max_memory_pages = config.max_memory_pages,
            max_fuel = ?config.max_fuel,
            "Wasmtime engine initialized"
        );

        Ok(Self {
            engine: Arc::new(engine),
            config: config.clone(),
        })
    }

    /// Instantiate an already compiled module.
    ///
    /// Every import of the module is linked through `resolver`; instantiation
    /// fails on the first import the resolver refuses.
    #[instrument(skip_all, fields(size = module.size()))]
    pub fn instantiate_module(
        &self,
        module: &CompiledModule,
        resolver: &dyn ImportResolver,
    ) -> Result<WasmInstance, HarnessError> {
        let mut store = create_store(self)?;
        let mut linker = Linker::new(&self.engine);

        link_imports(&mut linker, &mut store, module.as_module(), resolver)?;

        debug!("Imports linked, instantiating");

        let instance = linker
            .instantiate(&mut store, module.as_module())
            .map_err(|e| HarnessError::instantiation(format!("{e:#}")))?;

        debug!("Module instantiated");

        Ok(WasmInstance::new(store, instance))
    }

    /// Get a reference to the inner Wasmtime engine.
    pub fn inner(&self) -> &Engine {
        &self.engine
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl spec_runner_common::Engine for WasmEngine {
    type Instance = WasmInstance;

    fn instantiate(
        &self,
        bytecode: &[u8],
        resolver: &dyn ImportResolver,
    ) -> Result<WasmInstance, HarnessError> {
        let module = CompiledModule::from_bytes(&self.engine, bytecode)?;
        self.instantiate_module(&module, resolver)
    }
}

impl std::fmt::Debug for WasmEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasmEngine")
            .field("accelerate", &self.config.accelerate)
            .field("max_memory_pages", &self.config.max_memory_pages)
            .field("max_fuel", &self.config.max_fuel)
            .finish_non_exhaustive()
    }
}
