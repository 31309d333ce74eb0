//! Action dispatch.
//!
//! Runs an `invoke` or `get` against its target instance and checks the
//! result against the first expected value, if any.

use std::io::Write;

use tracing::{debug, instrument};

use spec_runner_common::{EngineInstance, ExportKind, HarnessError, Lane};

use crate::registry::ModuleRegistry;
use crate::reporter::Reporter;
use crate::script::{Action, ActionKind, Command, ValueInfo};
use crate::value::{self, Width};

/// Perform the action carried by `command`.
///
/// # Errors
///
/// Any resolution, decoding, execution or assertion failure.
#[instrument(skip_all, fields(line = command.line, field = %action.field))]
pub fn dispatch<I, W>(
    registry: &mut ModuleRegistry<I>,
    command: &Command,
    action: &Action,
    reporter: &mut Reporter<W>,
) -> Result<(), HarnessError>
where
    I: EngineInstance,
    W: Write,
{
    match &action.kind {
        ActionKind::Invoke => invoke(registry, command, action, reporter),
        ActionKind::Get => get(registry, command, action),
        ActionKind::Unrecognized(tag) => Err(HarnessError::unrecognized(tag.as_str())),
    }
}

fn invoke<I, W>(
    registry: &mut ModuleRegistry<I>,
    command: &Command,
    action: &Action,
    reporter: &mut Reporter<W>,
) -> Result<(), HarnessError>
where
    I: EngineInstance,
    W: Write,
{
    let instance = registry.resolve_mut(action.target())?;
    let func = instance
        .lookup_function_export(&action.field)
        .ok_or_else(|| HarnessError::export_not_found(ExportKind::Function, &action.field))?;
    let args = value::decode_all(&action.args)?;

    reporter.entry(&action.field)?;
    let actual = instance.invoke(&func, &args)?;
    debug!(?args, actual, "Invoked");

    check(command, &action.field, command.expected_for(action), actual)
}

fn get<I: EngineInstance>(
    registry: &mut ModuleRegistry<I>,
    command: &Command,
    action: &Action,
) -> Result<(), HarnessError> {
    let instance = registry.resolve_mut(action.target())?;
    let global = instance
        .lookup_global_export(&action.field)
        .ok_or_else(|| HarnessError::export_not_found(ExportKind::Global, &action.field))?;

    let actual = instance.read_global(&global)?;
    debug!(actual, "Read global");

    check(command, &action.field, &command.expected, actual)
}

/// Compare `actual` with the first expected value under the width rule.
///
/// An empty list or a type-only first entry asserts nothing.
fn check(
    command: &Command,
    field: &str,
    expected: &[ValueInfo],
    actual: Lane,
) -> Result<(), HarnessError> {
    let Some(first) = expected.first().filter(|v| v.value.is_some()) else {
        return Ok(());
    };

    let wanted = value::decode(first)?;
    let width = Width::of(&first.value_type)
        .ok_or_else(|| HarnessError::invalid_value(first.value_type.to_string(), ""))?;

    if width.lanes_match(actual, wanted) {
        Ok(())
    } else {
        Err(HarnessError::AssertionMismatch {
            line: command.line,
            field: field.to_string(),
            value_type: first.value_type.to_string(),
            actual: width.reduce(actual),
            expected: width.reduce(wanted),
        })
    }
}
