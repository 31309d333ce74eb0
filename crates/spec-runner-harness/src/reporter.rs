//! Progress output.

use std::io::Write;

use spec_runner_common::HarnessError;

/// Counts of command dispositions for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands that passed, skips included.
    pub passed: usize,
    /// Commands acknowledged without evaluation.
    pub skipped: usize,
}

/// Writes progress lines to a sink and keeps the counts.
#[derive(Debug)]
pub struct Reporter<W> {
    out: W,
    summary: RunSummary,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: RunSummary::default(),
        }
    }

    /// `PASS L<line>`
    pub fn pass(&mut self, line: u32) -> Result<(), HarnessError> {
        self.summary.passed += 1;
        writeln!(self.out, "PASS L{line}")?;
        Ok(())
    }

    /// `skipping <type>`
    pub fn skip(&mut self, tag: &str) -> Result<(), HarnessError> {
        self.summary.skipped += 1;
        writeln!(self.out, "skipping {tag}")?;
        Ok(())
    }

    /// `Entry = <export>`
    pub fn entry(&mut self, field: &str) -> Result<(), HarnessError> {
        writeln!(self.out, "Entry = {field}")?;
        Ok(())
    }

    /// Zero the counts; the sink is kept.
    pub fn reset(&mut self) {
        self.summary = RunSummary::default();
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
