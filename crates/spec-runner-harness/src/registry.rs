//! Loaded module instances.

use std::collections::HashMap;

use tracing::debug;

use spec_runner_common::HarnessError;

/// Instances created during a run.
///
/// Every instance lives until the registry is dropped. Rebinding a name only
/// moves the name; the earlier instance stays owned here.
#[derive(Debug)]
pub struct ModuleRegistry<I> {
    instances: Vec<I>,
    names: HashMap<String, usize>,
    current: Option<usize>,
}

impl<I> ModuleRegistry<I> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            names: HashMap::new(),
            current: None,
        }
    }

    /// Add an instance, make it current and optionally bind it to a name.
    pub fn insert(&mut self, instance: I, name: Option<&str>) {
        let index = self.instances.len();
        self.instances.push(instance);
        self.current = Some(index);

        if let Some(name) = name {
            if self.names.insert(name.to_string(), index).is_some() {
                debug!(name, "Module name rebound");
            }
        }
    }

    /// Look up the instance an action targets.
    ///
    /// A name selects the latest instance bound to it; no name selects the
    /// current instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is unbound or no module has been loaded.
    pub fn resolve_mut(&mut self, name: Option<&str>) -> Result<&mut I, HarnessError> {
        let index = match name {
            Some(name) => *self
                .names
                .get(name)
                .ok_or_else(|| HarnessError::module_not_found(name))?,
            None => self.current.ok_or(HarnessError::NoCurrentModule)?,
        };

        self.instances
            .get_mut(index)
            .ok_or(HarnessError::NoCurrentModule)
    }

    /// Number of instances created.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no module has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl<I> Default for ModuleRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}
