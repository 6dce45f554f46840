//! Diagnostics sink for soft errors.
//!
//! Skin resolution and layout-time usage errors are reported here instead
//! of aborting the frame loop. The default sink forwards to the `log`
//! facade; tests inject [`RecordingDiagnostics`] and assert on messages.

use std::cell::RefCell;

/// Receiver for recoverable-error reports with source provenance.
pub trait Diagnostics {
    /// Report a soft error. `line` is zero-based when present.
    fn report(&mut self, file: &str, line: Option<u32>, message: &str);
}

/// Default sink: forwards every report to `log::warn!`.
#[derive(Debug, Default)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, file: &str, line: Option<u32>, message: &str) {
        match line {
            Some(n) => log::warn!("{file}:{n}: {message}"),
            None => log::warn!("{file}: {message}"),
        }
    }
}

/// Recording sink for tests: keeps every formatted report.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: Vec<String>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports formatted as `file:line: message`.
    pub fn reports(&self) -> &[String] {
        &self.reports
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether any report contains the given substring.
    pub fn contains(&self, needle: &str) -> bool {
        self.reports.iter().any(|r| r.contains(needle))
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn report(&mut self, file: &str, line: Option<u32>, message: &str) {
        match line {
            Some(n) => self.reports.push(format!("{file}:{n}: {message}")),
            None => self.reports.push(format!("{file}: {message}")),
        }
    }
}

// A &RefCell<D> sink lets widget update/draw paths share one collector
// without threading &mut through immutable call chains.
impl<D: Diagnostics> Diagnostics for &RefCell<D> {
    fn report(&mut self, file: &str, line: Option<u32>, message: &str) {
        self.borrow_mut().report(file, line, message);
    }
}
