//! Conversion between harness lanes and Wasmtime values.
//!
//! Narrow values are taken from the low bits of a lane; results are
//! zero-extended into it. Floats move as bit patterns in both directions, so
//! NaN payloads and signed zeros survive the round trip.

use wasmtime::{Val, ValType};

use spec_runner_common::{HarnessError, Lane};

/// Build a Wasmtime value of type `ty` from a lane.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub fn lane_to_val(ty: &ValType, lane: Lane) -> Result<Val, HarnessError> {
    match ty {
        ValType::I32 => Ok(Val::I32(lane as u32 as i32)),
        ValType::I64 => Ok(Val::I64(lane)),
        ValType::F32 => Ok(Val::F32(lane as u32)),
        ValType::F64 => Ok(Val::F64(lane as u64)),
        other => Err(HarnessError::engine_fault(format!(
            "value type {other} cannot be carried in a lane"
        ))),
    }
}

/// Flatten a Wasmtime value into a lane.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
pub fn val_to_lane(val: &Val) -> Result<Lane, HarnessError> {
    match val {
        Val::I32(v) => Ok(Lane::from(*v as u32)),
        Val::I64(v) => Ok(*v),
        Val::F32(bits) => Ok(Lane::from(*bits)),
        Val::F64(bits) => Ok(*bits as Lane),
        other => Err(HarnessError::engine_fault(format!(
            "value {other:?} cannot be carried in a lane"
        ))),
    }
}
