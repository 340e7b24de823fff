//! Offline directive checks: everything that can be validated without a
//! game database. Backs the `proto-patch check` command.

use std::fmt;
use std::fs;
use std::path::Path;

use proto_patch_path::parse_patch_path;
use serde_json::Value;
use tracing::{debug, info};

use crate::directive::DirectiveRecord;
use crate::error::PatchError;
use crate::loader::directive_files;
use crate::options::PatchOptions;
use crate::value::{check_shape, ValueKind};

#[derive(Debug)]
pub struct LintDiagnostic {
    pub file: String,
    /// Position of the record in its file; `None` for file-level problems.
    pub record: Option<usize>,
    pub error: PatchError,
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.record {
            Some(record) => write!(f, "{}[{}]: {}", self.file, record, self.error),
            None => write!(f, "{}: {}", self.file, self.error),
        }
    }
}

#[derive(Debug, Default)]
pub struct LintReport {
    pub files: usize,
    pub records: usize,
    pub disabled: usize,
    pub invalid: usize,
    pub diagnostics: Vec<LintDiagnostic>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn push(&mut self, file: &str, record: Option<usize>, error: PatchError) {
        self.diagnostics.push(LintDiagnostic { file: file.to_string(), record, error });
    }
}

/// Check every directive file of the configured directory.
pub fn lint_directory(options: &PatchOptions) -> Result<LintReport, PatchError> {
    let mut report = LintReport::default();
    for file in directive_files(options)? {
        lint_file(&file, &mut report);
    }
    info!(files = report.files, records = report.records, invalid = report.invalid, "checked directive files");
    Ok(report)
}

pub fn lint_file(path: &Path, report: &mut LintReport) {
    let name = path.display().to_string();
    match fs::read_to_string(path) {
        Ok(text) => lint_source(&name, &text, report),
        Err(source) => {
            report.files += 1;
            report.push(&name, None, PatchError::Io { file: path.to_path_buf(), source });
        }
    }
}

pub fn lint_source(source: &str, text: &str, report: &mut LintReport) {
    report.files += 1;
    let records: Vec<Value> = match serde_json::from_str(text) {
        Ok(records) => records,
        Err(err) => {
            report.push(source, None, PatchError::Json { file: source.into(), source: err });
            return;
        }
    };

    for (position, raw) in records.into_iter().enumerate() {
        report.records += 1;
        match lint_record(raw) {
            Ok(true) => debug!(file = source, record = position, "record ok"),
            Ok(false) => report.disabled += 1,
            Err(err) => {
                report.invalid += 1;
                report.push(source, Some(position), err);
            }
        }
    }
}

/// Validate one record; returns its enabled flag. Disabled records are
/// checked too.
fn lint_record(raw: Value) -> Result<bool, PatchError> {
    let record = DirectiveRecord::from_json(raw)?;
    if record.prototype.trim().is_empty() {
        return Err(PatchError::Load("empty prototype name".into()));
    }
    let kind: ValueKind = record.value_type.parse()?;
    parse_patch_path(&record.path)?;
    check_shape(kind, &record.value)?;
    Ok(record.enabled)
}
