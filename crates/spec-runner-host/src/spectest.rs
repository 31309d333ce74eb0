//! The `spectest` import stub.
//!
//! Only two imports are provided:
//! - `spectest.print_i32`: a function that ignores its arguments and yields zero
//! - `spectest.global_i32`: a global holding zero
//!
//! Every other request is refused with an unsupported-import error, so a test
//! module needing more of the spectest surface fails loudly at instantiation.

use tracing::debug;

use spec_runner_common::{HarnessError, HostFunction, ImportKind, ImportResolver, Lane};

/// Name of the host module test scripts import from.
pub const SPECTEST_MODULE: &str = "spectest";

/// The one supported function import.
pub const PRINT_I32: &str = "print_i32";

/// The one supported global import.
pub const GLOBAL_I32: &str = "global_i32";

/// Import resolver emulating the minimal `spectest` host module.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectestResolver;

impl SpectestResolver {
    /// Create a new resolver.
    pub fn new() -> Self {
        Self
    }
}

impl ImportResolver for SpectestResolver {
    fn resolve_func(&self, module: &str, field: &str) -> Result<HostFunction, HarnessError> {
        if module != SPECTEST_MODULE || field != PRINT_I32 {
            return Err(HarnessError::unsupported_import(
                ImportKind::Function,
                module,
                field,
            ));
        }

        Ok(Box::new(|args: &[Lane]| {
            debug!(?args, "spectest.print_i32");
            0
        }))
    }

    fn resolve_global(&self, module: &str, field: &str) -> Result<Lane, HarnessError> {
        if module != SPECTEST_MODULE || field != GLOBAL_I32 {
            return Err(HarnessError::unsupported_import(
                ImportKind::Global,
                module,
                field,
            ));
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_i32_yields_zero() {
        let resolver = SpectestResolver::new();
        let print = resolver.resolve_func("spectest", "print_i32").unwrap();

        assert_eq!(print(&[42]), 0);
        assert_eq!(print(&[]), 0);
    }

    #[test]
    fn test_global_i32_is_zero() {
        let resolver = SpectestResolver::new();
        assert_eq!(resolver.resolve_global("spectest", "global_i32").unwrap(), 0);
    }

    #[test]
    fn test_other_functions_refused() {
        let resolver = SpectestResolver::new();

        for (module, field) in [
            ("spectest", "print"),
            ("spectest", "print_i64"),
            ("env", "print_i32"),
        ] {
            let err = resolver.resolve_func(module, field).err().unwrap();
            assert!(matches!(
                err,
                HarnessError::UnsupportedImport {
                    kind: ImportKind::Function,
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_other_globals_refused() {
        let resolver = SpectestResolver::new();

        let err = resolver.resolve_global("spectest", "global_i64").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported import (global): spectest.global_i64"
        );
        assert!(resolver.resolve_global("env", "global_i32").is_err());
    }
}
