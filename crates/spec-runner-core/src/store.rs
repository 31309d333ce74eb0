//! Per-instance store management.
//!
//! Every module command gets its own [`Store`], so instances never share
//! memories, globals or fuel.

use wasmtime::{Store, StoreLimits, StoreLimitsBuilder};

use spec_runner_common::HarnessError;

use crate::WasmEngine;

/// Data attached to each instance's store.
pub struct InstanceContext {
    /// Resource limits enforcing the memory ceiling.
    limits: StoreLimits,

    /// Number of host (import) calls made by the guest.
    pub host_calls: u64,
}

impl InstanceContext {
    /// Create a context whose memories may grow to at most `max_memory_bytes`.
    pub fn new(max_memory_bytes: u64) -> Self {
        let max = usize::try_from(max_memory_bytes).unwrap_or(usize::MAX);
        let limits = StoreLimitsBuilder::new().memory_size(max).build();

        Self {
            limits,
            host_calls: 0,
        }
    }
}

/// Create a new store for one instance.
///
/// The store enforces the engine's memory ceiling and, when configured, starts
/// with the engine's fuel budget.
///
/// # Errors
///
/// Returns an error if fuel cannot be set on the store.
pub fn create_store(engine: &WasmEngine) -> Result<Store<InstanceContext>, HarnessError> {
    let config = engine.config();
    let context = InstanceContext::new(config.max_memory_bytes());
    let mut store = Store::new(engine.inner(), context);

    store.limiter(|ctx| &mut ctx.limits);

    if let Some(fuel) = config.max_fuel {
        store
            .set_fuel(fuel)
            .map_err(|e| HarnessError::invalid_config(format!("Failed to set fuel: {e}")))?;
    }

    Ok(store)
}

/// Get remaining fuel from a store, if metering is enabled.
pub fn get_remaining_fuel(store: &Store<InstanceContext>) -> Option<u64> {
    store.get_fuel().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spec_runner_common::EngineConfig;

    #[test]
    fn test_instance_context_creation() {
        let ctx = InstanceContext::new(64 * 1024);
        assert_eq!(ctx.host_calls, 0);
    }

    #[test]
    fn test_store_creation() {
        let engine = WasmEngine::new(&EngineConfig::default()).unwrap();

        let store = create_store(&engine);
        assert!(store.is_ok());
    }

    #[test]
    fn test_store_without_fuel() {
        let engine = WasmEngine::new(&EngineConfig::default()).unwrap();
        let store = create_store(&engine).unwrap();

        assert_eq!(get_remaining_fuel(&store), None);
    }

    #[test]
    fn test_store_fuel() {
        let config = EngineConfig {
            max_fuel: Some(1000),
            ..Default::default()
        };
        let engine = WasmEngine::new(&config).unwrap();
        let store = create_store(&engine).unwrap();

        assert_eq!(get_remaining_fuel(&store), Some(1000));
    }
}
