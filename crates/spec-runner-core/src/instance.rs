//! Instantiated modules.
//!
//! [`WasmInstance`] pairs a Wasmtime [`Instance`] with the [`Store`] that owns
//! it and implements the harness's [`EngineInstance`] contract on top.

use tracing::{debug, instrument, warn};
use wasmtime::{Func, Global, Instance, Store, Trap, Val, ValType};

use spec_runner_common::{EngineInstance, HarnessError, Lane};

use crate::lane::{lane_to_val, val_to_lane};
use crate::store::{InstanceContext, get_remaining_fuel};

/// A live module instance and its store.
pub struct WasmInstance {
    store: Store<InstanceContext>,
    instance: Instance,
}

impl WasmInstance {
    pub(crate) fn new(store: Store<InstanceContext>, instance: Instance) -> Self {
        Self { store, instance }
    }

    /// Number of import calls the guest has made so far.
    pub fn host_calls(&self) -> u64 {
        self.store.data().host_calls
    }

    /// Remaining fuel, if metering is enabled.
    pub fn remaining_fuel(&self) -> Option<u64> {
        get_remaining_fuel(&self.store)
    }
}

impl EngineInstance for WasmInstance {
    type Func = Func;
    type Global = Global;

    fn lookup_function_export(&mut self, name: &str) -> Option<Func> {
        self.instance.get_func(&mut self.store, name)
    }

    #[instrument(skip(self, func))]
    fn invoke(&mut self, func: &Func, args: &[Lane]) -> Result<Lane, HarnessError> {
        let ty = func.ty(&self.store);

        if ty.params().len() != args.len() {
            return Err(HarnessError::engine_fault(format!(
                "expected {} arguments, got {}",
                ty.params().len(),
                args.len()
            )));
        }

        let params = ty
            .params()
            .zip(args)
            .map(|(param, lane)| lane_to_val(&param, *lane))
            .collect::<Result<Vec<Val>, _>>()?;
        let mut results: Vec<Val> = ty.results().map(|r| zero_for(&r)).collect();

        func.call(&mut self.store, &params, &mut results)
            .map_err(|e| fault_from(&e))?;

        let ret = match results.first() {
            Some(val) => val_to_lane(val)?,
            None => 0,
        };

        debug!(ret, results = results.len(), "Call returned");

        Ok(ret)
    }

    fn lookup_global_export(&mut self, name: &str) -> Option<Global> {
        self.instance.get_global(&mut self.store, name)
    }

    fn read_global(&mut self, global: &Global) -> Result<Lane, HarnessError> {
        val_to_lane(&global.get(&mut self.store))
    }
}

impl std::fmt::Debug for WasmInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WasmInstance")
            .field("host_calls", &self.host_calls())
            .finish_non_exhaustive()
    }
}

/// Placeholder result slot for a value type.
fn zero_for(ty: &ValType) -> Val {
    lane_to_val(ty, 0).unwrap_or(Val::I32(0))
}

/// Convert a Wasmtime execution error into an engine fault.
fn fault_from(error: &wasmtime::Error) -> HarnessError {
    match error.downcast_ref::<Trap>() {
        Some(Trap::OutOfFuel) => {
            warn!("Execution terminated: fuel exhausted");
            HarnessError::engine_fault("fuel exhausted")
        }
        Some(trap) => HarnessError::engine_fault(format!("trap: {trap}")),
        None => HarnessError::engine_fault(format!("{error:#}")),
    }
}
