//! Load and apply statistics with per-failure diagnostics.

use crate::error::PatchError;

/// One directive (or record, or file) that did not make it.
#[derive(Debug)]
pub struct PatchFailure {
    /// Target prototype name, or the file name for file-level failures.
    pub target: String,
    pub path: String,
    pub error: PatchError,
}

#[derive(Debug, Default)]
pub struct PatchReport {
    pub files_read: usize,
    pub files_failed: usize,
    /// Directives bound and indexed.
    pub loaded: usize,
    pub disabled: usize,
    /// Records whose target prototype name did not resolve.
    pub invalid_targets: usize,
    /// Records rejected for shape, value kind, path or payload.
    pub invalid_records: usize,
    pub applied: usize,
    /// Apply attempts at a root's exit that failed.
    pub failed: usize,
    pub failures: Vec<PatchFailure>,
}

impl PatchReport {
    pub fn record_failure(&mut self, target: impl Into<String>, path: impl Into<String>, error: PatchError) {
        self.failures.push(PatchFailure {
            target: target.into(),
            path: path.into(),
            error,
        });
    }

    /// Failures whose error is a name resolution failure.
    pub fn name_resolution_failures(&self) -> impl Iterator<Item = &PatchFailure> {
        self.failures
            .iter()
            .filter(|failure| matches!(failure.error, PatchError::NameResolution(_)))
    }

    pub fn summary(&self) -> String {
        format!(
            "{} loaded, {} disabled, {} invalid, {} applied, {} failed",
            self.loaded,
            self.disabled,
            self.invalid_targets + self.invalid_records,
            self.applied,
            self.failed
        )
    }
}
