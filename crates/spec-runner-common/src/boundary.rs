//! The contract between the harness and the engine under test.
//!
//! The harness never touches engine internals. It instantiates modules through
//! [`Engine`], drives them through [`EngineInstance`], and supplies imports
//! through [`ImportResolver`]. Every numeric value crossing this boundary is a
//! [`Lane`]: a 64-bit integer holding either an integer or the raw bit pattern
//! of a float.

use std::fmt;

use crate::HarnessError;

/// Fixed-width transport value for all numeric types.
///
/// 32-bit values occupy the low half of the lane. Floats are carried as their
/// IEEE-754 bit patterns, never as decoded magnitudes.
pub type Lane = i64;

/// A host callable handed to the engine for a function import.
pub type HostFunction = Box<dyn Fn(&[Lane]) -> Lane + Send + Sync>;

/// Kind of import a module declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// Function import.
    Function,
    /// Global import.
    Global,
    /// Linear memory import.
    Memory,
    /// Table import.
    Table,
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportKind::Function => write!(f, "function"),
            ImportKind::Global => write!(f, "global"),
            ImportKind::Memory => write!(f, "memory"),
            ImportKind::Table => write!(f, "table"),
        }
    }
}

/// Kind of export an action looks up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Exported function.
    Function,
    /// Exported global.
    Global,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Function => write!(f, "func"),
            ExportKind::Global => write!(f, "global"),
        }
    }
}

/// Source of every import a module is instantiated with.
pub trait ImportResolver {
    /// Resolve a function import to a host callable.
    fn resolve_func(&self, module: &str, field: &str) -> Result<HostFunction, HarnessError>;

    /// Resolve a global import to its initial value.
    fn resolve_global(&self, module: &str, field: &str) -> Result<Lane, HarnessError>;
}

/// An engine able to turn module bytecode into running instances.
///
/// Engine-wide settings (acceleration, memory ceiling, fuel) are fixed when
/// the engine is constructed and apply to every instance it creates.
pub trait Engine {
    /// Instance type produced by this engine.
    type Instance: EngineInstance;

    /// Compile and instantiate `bytecode`, linking all imports through `resolver`.
    fn instantiate(
        &self,
        bytecode: &[u8],
        resolver: &dyn ImportResolver,
    ) -> Result<Self::Instance, HarnessError>;
}

/// One instantiated module.
pub trait EngineInstance {
    /// Handle to an exported function.
    type Func;

    /// Handle to an exported global.
    type Global;

    /// Look up an exported function by name.
    fn lookup_function_export(&mut self, name: &str) -> Option<Self::Func>;

    /// Call an exported function.
    ///
    /// Returns the first result lane, or zero for functions without results.
    fn invoke(&mut self, func: &Self::Func, args: &[Lane]) -> Result<Lane, HarnessError>;

    /// Look up an exported global by name.
    fn lookup_global_export(&mut self, name: &str) -> Option<Self::Global>;

    /// Read the current value of an exported global.
    fn read_global(&mut self, global: &Self::Global) -> Result<Lane, HarnessError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_kind_display() {
        assert_eq!(ImportKind::Function.to_string(), "function");
        assert_eq!(ImportKind::Global.to_string(), "global");
        assert_eq!(ImportKind::Memory.to_string(), "memory");
        assert_eq!(ImportKind::Table.to_string(), "table");
    }

    #[test]
    fn test_export_kind_display() {
        assert_eq!(ExportKind::Function.to_string(), "func");
        assert_eq!(ExportKind::Global.to_string(), "global");
    }

    #[test]
    fn test_host_function_is_callable() {
        let f: HostFunction = Box::new(|args| args.iter().sum());
        assert_eq!(f(&[1, 2, 3]), 6);
    }
}
