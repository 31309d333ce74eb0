//! The command driver loop.
//!
//! Commands run strictly in file order. Each one either passes, is skipped
//! (acknowledged without touching the engine) or aborts the run with the
//! first error. The registry is the only state carried between commands.

use std::io::Write;

use tracing::{debug, info, instrument};

use spec_runner_common::{Engine, HarnessError, ImportResolver};

use crate::dispatch::dispatch;
use crate::registry::ModuleRegistry;
use crate::reporter::{Reporter, RunSummary};
use crate::script::{Command, CommandKind, TestScript};

/// Runs test scripts against an engine.
pub struct Interpreter<E: Engine, R, W> {
    engine: E,
    resolver: R,
    registry: ModuleRegistry<E::Instance>,
    reporter: Reporter<W>,
}

impl<E, R, W> Interpreter<E, R, W>
where
    E: Engine,
    R: ImportResolver,
    W: Write,
{
    /// Create an interpreter writing progress lines to `out`.
    pub fn new(engine: E, resolver: R, out: W) -> Self {
        Self {
            engine,
            resolver,
            registry: ModuleRegistry::new(),
            reporter: Reporter::new(out),
        }
    }

    /// Run every command of `script`, stopping at the first failure.
    ///
    /// Each run starts with an empty registry and fresh counts; modules
    /// loaded by an earlier script are dropped.
    ///
    /// # Errors
    ///
    /// The first fatal condition met; commands after it are not run.
    #[instrument(skip_all, fields(source = %script.source_filename))]
    pub fn run(&mut self, script: &TestScript) -> Result<RunSummary, HarnessError> {
        self.registry = ModuleRegistry::new();
        self.reporter.reset();

        for command in &script.commands {
            self.step(script, command)?;
        }

        let summary = self.reporter.summary();
        info!(
            passed = summary.passed,
            skipped = summary.skipped,
            modules = self.registry.len(),
            "Script finished"
        );

        Ok(summary)
    }

    fn step(&mut self, script: &TestScript, command: &Command) -> Result<(), HarnessError> {
        debug!(line = command.line, kind = %command.kind, "Command");

        match &command.kind {
            CommandKind::Module => self.load_module(script, command)?,
            CommandKind::AssertReturn | CommandKind::Action => {
                let action = command.action.as_ref().ok_or_else(|| {
                    HarnessError::invalid_script(format!(
                        "{} at line {} has no action",
                        command.kind, command.line
                    ))
                })?;
                dispatch(&mut self.registry, command, action, &mut self.reporter)?;
            }
            CommandKind::Skipped(category) => self.reporter.skip(category.tag())?,
            CommandKind::Unrecognized(tag) => {
                return Err(HarnessError::unrecognized(tag.as_str()));
            }
        }

        self.reporter.pass(command.line)
    }

    fn load_module(&mut self, script: &TestScript, command: &Command) -> Result<(), HarnessError> {
        let filename = command.filename.as_deref().ok_or_else(|| {
            HarnessError::invalid_script(format!(
                "module at line {} has no filename",
                command.line
            ))
        })?;

        let path = script.module_path(filename);
        let bytecode = std::fs::read(&path)
            .map_err(|e| HarnessError::read_file(path.display().to_string(), e))?;

        let instance = self.engine.instantiate(&bytecode, &self.resolver)?;
        self.registry.insert(instance, command.bind_name());

        debug!(
            path = %path.display(),
            name = command.bind_name(),
            "Module loaded"
        );

        Ok(())
    }

    /// Loaded instances.
    pub fn registry(&self) -> &ModuleRegistry<E::Instance> {
        &self.registry
    }

    /// Counts so far.
    pub fn summary(&self) -> RunSummary {
        self.reporter.summary()
    }

    /// Consume the interpreter and return the output sink.
    pub fn into_output(self) -> W {
        self.reporter.into_inner()
    }
}
