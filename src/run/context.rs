//! Per-run diagnostic state.

use std::path::PathBuf;

use crate::probe::ProbeResult;

use super::RunOutcome;

/// State accumulated across one run.
///
/// Every diagnostic line is logged and kept in order. The error flag can be
/// raised by any step and is never cleared.
#[derive(Debug, Default)]
pub struct RunContext {
    error_occurred: bool,
    diagnostics: Vec<String>,
}

impl RunContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records an informational line.
    pub fn info(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::info!("{line}");
        self.diagnostics.push(line);
    }

    /// Logs and records a warning line.
    pub fn warn(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::warn!("{line}");
        self.diagnostics.push(line);
    }

    /// Logs and records an error line and marks the run as errored.
    pub fn error(&mut self, line: impl Into<String>) {
        let line = line.into();
        log::error!("{line}");
        self.diagnostics.push(line);
        self.mark_error();
    }

    /// Marks the run as errored.
    pub fn mark_error(&mut self) {
        self.error_occurred = true;
    }

    /// Whether any step marked the run as errored.
    pub fn error_occurred(&self) -> bool {
        self.error_occurred
    }

    /// Recorded lines, in order.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Finishes the run.
    pub fn into_outcome(
        self,
        results: Vec<ProbeResult>,
        transcript_path: Option<PathBuf>,
    ) -> RunOutcome {
        RunOutcome {
            error_occurred: self.error_occurred,
            results,
            diagnostics: self.diagnostics,
            transcript_path,
        }
    }
}
