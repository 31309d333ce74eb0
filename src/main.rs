//! spec-runner CLI entry point.
//!
//! Runs one `wast2json` script against the Wasmtime engine. Progress lines go
//! to stdout and logs to stderr; the first failure ends the run with a
//! non-zero exit status.

mod cli;

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spec_runner_common::{ConfigFile, RunnerConfig};
use spec_runner_core::WasmEngine;
use spec_runner_harness::{Interpreter, TestScript};
use spec_runner_host::SpectestResolver;

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(args.log_filter())
                .with_context(|| format!("Invalid log filter '{}'", args.log_filter()))?,
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = match &args.config {
        Some(path) => ConfigFile::from_file(path)
            .context("Failed to load configuration")?
            .into_runner_config(),
        None => RunnerConfig::default(),
    };
    args.apply(&mut config.engine);

    info!(
        accelerate = config.engine.accelerate,
        max_memory_pages = config.engine.max_memory_pages,
        max_fuel = ?config.engine.max_fuel,
        "Configuration loaded"
    );

    let engine = WasmEngine::new(&config.engine).context("Failed to create engine")?;

    let script = TestScript::from_file(&args.script)
        .with_context(|| format!("Failed to load script '{}'", args.script.display()))?;

    let mut interpreter = Interpreter::new(engine, SpectestResolver::new(), io::stdout().lock());
    let summary = interpreter
        .run(&script)
        .with_context(|| format!("Run of '{}' aborted", args.script.display()))?;

    info!(
        passed = summary.passed,
        skipped = summary.skipped,
        "All commands passed"
    );

    Ok(())
}
