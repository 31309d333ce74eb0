//! Import linking for core modules.
//!
//! The resolver is the only source of imports. Each import the module
//! declares is requested from it by module and field name; function imports
//! become host functions, global imports become fresh globals holding the
//! resolved value. Memory and table imports are never supported.

use tracing::{debug, trace};
use wasmtime::{ExternType, FuncType, Global, Linker, Module, Store, ValType};

use spec_runner_common::{HarnessError, HostFunction, ImportKind, ImportResolver, Lane};

use crate::lane::{lane_to_val, val_to_lane};
use crate::store::InstanceContext;

/// Define every import of `module` on `linker`.
///
/// # Errors
///
/// Returns the resolver's error for the first import it refuses, or an
/// unsupported-import error for memory/table/tag imports.
pub fn link_imports(
    linker: &mut Linker<InstanceContext>,
    store: &mut Store<InstanceContext>,
    module: &Module,
    resolver: &dyn ImportResolver,
) -> Result<(), HarnessError> {
    for import in module.imports() {
        let (module_name, field) = (import.module(), import.name());

        match import.ty() {
            ExternType::Func(func_type) => {
                let host = resolver.resolve_func(module_name, field)?;
                define_host_func(linker, module_name, field, func_type, host)?;
            }
            ExternType::Global(global_type) => {
                let lane = resolver.resolve_global(module_name, field)?;
                let value = lane_to_val(global_type.content(), lane)?;
                let global = Global::new(&mut *store, global_type, value).map_err(|e| {
                    HarnessError::instantiation(format!(
                        "Failed to create global {module_name}.{field}: {e}"
                    ))
                })?;
                linker
                    .define(&*store, module_name, field, global)
                    .map_err(|e| HarnessError::instantiation(e.to_string()))?;
            }
            ExternType::Memory(_) => {
                return Err(HarnessError::unsupported_import(
                    ImportKind::Memory,
                    module_name,
                    field,
                ));
            }
            ExternType::Table(_) => {
                return Err(HarnessError::unsupported_import(
                    ImportKind::Table,
                    module_name,
                    field,
                ));
            }
        }

        debug!(module = module_name, field = field, "Import linked");
    }

    Ok(())
}

/// Wrap a resolved host callable as a Wasmtime function of type `func_type`.
///
/// Parameters are flattened to lanes; the callable's lane fills the first
/// result and any further results are zero.
fn define_host_func(
    linker: &mut Linker<InstanceContext>,
    module_name: &str,
    field: &str,
    func_type: FuncType,
    host: HostFunction,
) -> Result<(), HarnessError> {
    let result_types: Vec<ValType> = func_type.results().collect();
    let name = format!("{module_name}.{field}");

    linker
        .func_new(
            module_name,
            field,
            func_type,
            move |mut caller, params, results| {
                caller.data_mut().host_calls += 1;

                let args = params
                    .iter()
                    .map(val_to_lane)
                    .collect::<Result<Vec<Lane>, _>>()?;
                let ret = host(&args);

                trace!(import = %name, ?args, ret, "Host function called");

                for (i, (slot, ty)) in results.iter_mut().zip(&result_types).enumerate() {
                    *slot = lane_to_val(ty, if i == 0 { ret } else { 0 })?;
                }
                Ok(())
            },
        )
        .map_err(|e| HarnessError::instantiation(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::CompiledModule;
    use crate::store::create_store;
    use crate::WasmEngine;
    use spec_runner_common::EngineConfig;

    struct RefuseAll;

    impl ImportResolver for RefuseAll {
        fn resolve_func(&self, module: &str, field: &str) -> Result<HostFunction, HarnessError> {
            Err(HarnessError::unsupported_import(
                ImportKind::Function,
                module,
                field,
            ))
        }

        fn resolve_global(&self, module: &str, field: &str) -> Result<Lane, HarnessError> {
            Err(HarnessError::unsupported_import(
                ImportKind::Global,
                module,
                field,
            ))
        }
    }

    fn link(wat: &str) -> Result<(), HarnessError> {
        let engine = WasmEngine::new(&EngineConfig::default()).unwrap();
        let module = CompiledModule::from_wat(engine.inner(), wat).unwrap();
        let mut store = create_store(&engine).unwrap();
        let mut linker = Linker::new(engine.inner());

        link_imports(&mut linker, &mut store, module.as_module(), &RefuseAll)
    }

    #[test]
    fn test_module_without_imports_links() {
        assert!(link("(module (func (export \"f\")))").is_ok());
    }

    #[test]
    fn test_refused_function_import() {
        let err = link(r#"(module (import "env" "f" (func)))"#).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::UnsupportedImport {
                kind: ImportKind::Function,
                ..
            }
        ));
    }

    #[test]
    fn test_memory_import_unsupported() {
        let err = link(r#"(module (import "spectest" "memory" (memory 1)))"#).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::UnsupportedImport {
                kind: ImportKind::Memory,
                ..
            }
        ));
    }

    #[test]
    fn test_table_import_unsupported() {
        let err = link(r#"(module (import "spectest" "table" (table 10 funcref)))"#).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::UnsupportedImport {
                kind: ImportKind::Table,
                ..
            }
        ));
    }
}
