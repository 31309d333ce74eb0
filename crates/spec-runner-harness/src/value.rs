//! Lane decoding and comparison.
//!
//! Every value crosses the engine boundary as a 64-bit [`Lane`]. 32-bit types
//! are zero-extended and floats travel as their raw bit patterns, so equality
//! of two lanes is bit equality at the declared width.

use spec_runner_common::{HarnessError, Lane};

use crate::script::{ValueInfo, ValueText, ValueType};

/// Comparison width of a declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    /// i32 and f32: only the low 32 bits are significant.
    Bits32,
    /// i64 and f64: the full lane is significant.
    Bits64,
}

impl Width {
    /// Width of a numeric type, `None` for anything a lane cannot carry.
    pub fn of(value_type: &ValueType) -> Option<Self> {
        match value_type {
            ValueType::I32 | ValueType::F32 => Some(Self::Bits32),
            ValueType::I64 | ValueType::F64 => Some(Self::Bits64),
            ValueType::Other(_) => None,
        }
    }

    /// Reduce a lane to its significant bits.
    pub fn reduce(self, lane: Lane) -> u64 {
        let bits = u64::from_ne_bytes(lane.to_ne_bytes());
        match self {
            Self::Bits32 => bits & 0xFFFF_FFFF,
            Self::Bits64 => bits,
        }
    }

    /// Whether two lanes are equal at this width.
    pub fn lanes_match(self, actual: Lane, expected: Lane) -> bool {
        self.reduce(actual) == self.reduce(expected)
    }
}

/// Decode a script value into a lane.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidValue`] for missing text, lane arrays,
/// non-numeric types, non-decimal text or out-of-range values.
pub fn decode(info: &ValueInfo) -> Result<Lane, HarnessError> {
    let invalid = || {
        let shown = info.value.as_ref().map(ToString::to_string).unwrap_or_default();
        HarnessError::invalid_value(info.value_type.to_string(), shown)
    };

    let width = Width::of(&info.value_type).ok_or_else(invalid)?;
    let text = info
        .value
        .as_ref()
        .and_then(ValueText::as_scalar)
        .ok_or_else(invalid)?;
    match width {
        Width::Bits32 => decode_u32(text).map(Lane::from).ok_or_else(invalid),
        Width::Bits64 => decode_u64(text)
            .map(|bits| Lane::from_ne_bytes(bits.to_ne_bytes()))
            .ok_or_else(invalid),
    }
}

/// Decode a list of arguments.
pub fn decode_all(values: &[ValueInfo]) -> Result<Vec<Lane>, HarnessError> {
    values.iter().map(decode).collect()
}

fn decode_u32(text: &str) -> Option<u32> {
    text.parse::<u32>()
        .ok()
        .or_else(|| text.parse::<i32>().ok().map(|v| u32::from_ne_bytes(v.to_ne_bytes())))
}

fn decode_u64(text: &str) -> Option<u64> {
    text.parse::<u64>()
        .ok()
        .or_else(|| text.parse::<i64>().ok().map(|v| u64::from_ne_bytes(v.to_ne_bytes())))
}
