//! Integration tests for spec-runner-core.
//!
//! These tests drive real Wasmtime instances through the engine boundary:
//! - WAT compilation and instantiation against the spectest stub
//! - Function invocation with lane marshalling
//! - Global reads
//! - Memory ceiling, traps and fuel exhaustion

use spec_runner_common::{Engine, EngineConfig, EngineInstance, HarnessError, ImportKind};
use spec_runner_core::{CompiledModule, WasmEngine, WasmInstance};
use spec_runner_host::SpectestResolver;

fn instantiate_wat(config: &EngineConfig, wat: &str) -> Result<WasmInstance, HarnessError> {
    let engine = WasmEngine::new(config).unwrap();
    let module = CompiledModule::from_wat(engine.inner(), wat).unwrap();
    engine.instantiate_module(&module, &SpectestResolver)
}

fn call(instance: &mut WasmInstance, name: &str, args: &[i64]) -> Result<i64, HarnessError> {
    let func = instance.lookup_function_export(name).expect("export");
    instance.invoke(&func, args)
}

// ============================================================================
// Test: Invocation
// ============================================================================

#[test]
fn test_invoke_add() {
    let wat = r#"
        (module
            (func (export "add") (param i32 i32) (result i32)
                (i32.add (local.get 0) (local.get 1)))
        )
    "#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    assert_eq!(call(&mut instance, "add", &[2, 3]).unwrap(), 5);
    // i32 results are zero-extended into the lane
    assert_eq!(call(&mut instance, "add", &[0xFFFF_FFFF, 0]).unwrap(), 0xFFFF_FFFF);
}

#[test]
fn test_invoke_without_results_returns_zero() {
    let wat = r#"(module (func (export "nop")))"#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    assert_eq!(call(&mut instance, "nop", &[]).unwrap(), 0);
}

#[test]
fn test_invoke_float_bits_round_trip() {
    let wat = r#"
        (module
            (func (export "neg") (param f64) (result f64)
                (f64.neg (local.get 0)))
        )
    "#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    // neg(+0.0) is -0.0: only the sign bit differs
    let ret = call(&mut instance, "neg", &[0]).unwrap();
    #[allow(clippy::cast_sign_loss)]
    let bits = ret as u64;
    assert_eq!(bits, 0x8000_0000_0000_0000);
}

#[test]
fn test_invoke_wrong_arity_is_fault() {
    let wat = r#"(module (func (export "id") (param i32) (result i32) (local.get 0)))"#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    let err = call(&mut instance, "id", &[]).unwrap_err();
    assert!(err.is_engine_fault());
}

#[test]
fn test_missing_export() {
    let wat = r#"(module (func (export "f")))"#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    assert!(instance.lookup_function_export("g").is_none());
    assert!(instance.lookup_global_export("f").is_none());
}

// ============================================================================
// Test: Globals
// ============================================================================

#[test]
fn test_read_global() {
    let wat = r#"
        (module
            (global (export "g") (mut i64) (i64.const -7))
            (func (export "bump") (global.set 0 (i64.add (global.get 0) (i64.const 1))))
        )
    "#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();
    let global = instance.lookup_global_export("g").unwrap();

    assert_eq!(instance.read_global(&global).unwrap(), -7);
    call(&mut instance, "bump", &[]).unwrap();
    assert_eq!(instance.read_global(&global).unwrap(), -6);
}

// ============================================================================
// Test: spectest imports
// ============================================================================

#[test]
fn test_spectest_imports_resolve() {
    let wat = r#"
        (module
            (import "spectest" "print_i32" (func $print (param i32)))
            (import "spectest" "global_i32" (global $g i32))
            (func (export "run") (result i32)
                (call $print (i32.const 42))
                (global.get $g))
        )
    "#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    assert_eq!(call(&mut instance, "run", &[]).unwrap(), 0);
    assert_eq!(instance.host_calls(), 1);
}

#[test]
fn test_unsupported_import_fails_instantiation() {
    let wat = r#"
        (module
            (import "spectest" "print_i64" (func (param i64)))
        )
    "#;

    let err = instantiate_wat(&EngineConfig::default(), wat).unwrap_err();

    assert!(matches!(
        err,
        HarnessError::UnsupportedImport {
            kind: ImportKind::Function,
            ..
        }
    ));
}

// ============================================================================
// Test: Memory ceiling
// ============================================================================

#[test]
fn test_memory_growth_ceiling() {
    let wat = r#"
        (module
            (memory 1)
            (func (export "grow") (param i32) (result i32)
                (memory.grow (local.get 0)))
        )
    "#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    // 1 + 9 pages is well under the 1024-page ceiling
    assert_eq!(call(&mut instance, "grow", &[9]).unwrap(), 1);
    // Growing past the ceiling fails with -1 rather than trapping
    assert_eq!(call(&mut instance, "grow", &[2000]).unwrap(), 0xFFFF_FFFF);
}

// ============================================================================
// Test: Faults
// ============================================================================

#[test]
fn test_trap_is_engine_fault() {
    let wat = r#"(module (func (export "boom") unreachable))"#;

    let mut instance = instantiate_wat(&EngineConfig::default(), wat).unwrap();

    let err = call(&mut instance, "boom", &[]).unwrap_err();
    assert!(err.is_engine_fault(), "Expected engine fault, got {err:?}");
}

#[test]
fn test_fuel_exhaustion() {
    let wat = r#"
        (module
            (func (export "spin")
                (loop $forever (br $forever)))
        )
    "#;

    let config = EngineConfig {
        max_fuel: Some(1000),
        ..Default::default()
    };
    let mut instance = instantiate_wat(&config, wat).unwrap();

    let err = call(&mut instance, "spin", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Engine fault: fuel exhausted");
}

// ============================================================================
// Test: Engine trait entry point
// ============================================================================

#[test]
fn test_instantiate_from_bytes() {
    // (module (func (export "add") (param i32 i32) (result i32) ...))
    let bytes: &[u8] = &[
        0x00, 0x61, 0x73, 0x6d, 0x01, 0x00, 0x00, 0x00, // header
        0x01, 0x07, 0x01, 0x60, 0x02, 0x7f, 0x7f, 0x01, 0x7f, // type
        0x03, 0x02, 0x01, 0x00, // func
        0x07, 0x07, 0x01, 0x03, b'a', b'd', b'd', 0x00, 0x00, // export
        0x0a, 0x09, 0x01, 0x07, 0x00, 0x20, 0x00, 0x20, 0x01, 0x6a, 0x0b, // code
    ];

    let engine = WasmEngine::new(&EngineConfig::default()).unwrap();
    let mut instance = engine.instantiate(bytes, &SpectestResolver).unwrap();

    assert_eq!(call(&mut instance, "add", &[40, 2]).unwrap(), 42);
}

#[test]
fn test_instantiate_rejects_text() {
    let engine = WasmEngine::new(&EngineConfig::default()).unwrap();

    let err = engine
        .instantiate(b"(module)", &SpectestResolver)
        .unwrap_err();
    assert!(matches!(err, HarnessError::Instantiation { .. }));
}
