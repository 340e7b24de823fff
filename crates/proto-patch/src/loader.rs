//! Directive file loading.
//!
//! A directive file is a JSON array of directive records. Failures are
//! isolated: an unreadable or malformed file is skipped, and within a file a
//! bad record is skipped while the rest still load.

use std::fs;
use std::path::{Path, PathBuf};

use proto_data::GameDatabase;
use serde_json::Value;
use tracing::{debug, info, trace, warn};

use crate::directive::{Directive, DirectiveRecord};
use crate::error::PatchError;
use crate::index::DirectiveIndex;
use crate::options::PatchOptions;
use crate::report::PatchReport;

/// Directive files in the configured directory, sorted by path.
pub fn directive_files(options: &PatchOptions) -> Result<Vec<PathBuf>, PatchError> {
    let io_error = |source| PatchError::Io { file: options.directory.clone(), source };
    let mut files = Vec::new();
    for entry in fs::read_dir(&options.directory).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| options.matches_file_name(name));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every directive file of the configured directory.
///
/// Fails only when the directory itself cannot be listed.
pub fn load_directory(
    options: &PatchOptions,
    db: &mut GameDatabase,
    index: &mut DirectiveIndex,
    report: &mut PatchReport,
) -> Result<(), PatchError> {
    for file in directive_files(options)? {
        load_file(&file, db, index, report);
    }
    Ok(())
}

pub fn load_file(path: &Path, db: &mut GameDatabase, index: &mut DirectiveIndex, report: &mut PatchReport) {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    info!(file = %name, "loading directive file");

    match fs::read_to_string(path) {
        Ok(text) => load_source(&name, &text, db, index, report),
        Err(source) => {
            let err = PatchError::Io { file: path.to_path_buf(), source };
            warn!(file = %name, %err, "failed to read directive file");
            report.files_failed += 1;
            report.record_failure(name, "", err);
        }
    }
}

/// Load directives from the text of one file; `source` names it in diagnostics.
pub fn load_source(
    source: &str,
    text: &str,
    db: &mut GameDatabase,
    index: &mut DirectiveIndex,
    report: &mut PatchReport,
) {
    let records: Vec<Value> = match serde_json::from_str(text) {
        Ok(records) => records,
        Err(err) => {
            let err = PatchError::Json { file: PathBuf::from(source), source: err };
            warn!(file = %source, %err, "failed to deserialize directive file");
            report.files_failed += 1;
            report.record_failure(source, "", err);
            return;
        }
    };

    report.files_read += 1;
    for (position, raw) in records.into_iter().enumerate() {
        load_record(source, position, raw, db, index, report);
    }
}

fn load_record(
    source: &str,
    position: usize,
    raw: Value,
    db: &mut GameDatabase,
    index: &mut DirectiveIndex,
    report: &mut PatchReport,
) {
    let record = match DirectiveRecord::from_json(raw) {
        Ok(record) => record,
        Err(err) => {
            warn!(file = %source, record = position, %err, "skipping malformed directive record");
            report.invalid_records += 1;
            report.record_failure(format!("{source}#{position}"), "", err);
            return;
        }
    };

    if !record.enabled {
        trace!(prototype = %record.prototype, path = %record.path, "skipped disabled directive");
        report.disabled += 1;
        return;
    }

    match Directive::from_record(&record, db) {
        Ok(directive) => {
            debug!(
                prototype = %directive.target_name(),
                path = %directive.path(),
                kind = %directive.kind(),
                "loaded directive"
            );
            index.insert(directive);
            report.loaded += 1;
        }
        Err(err @ PatchError::NameResolution(_)) => {
            warn!(prototype = %record.prototype, path = %record.path, "invalid prototype reference in directive");
            report.invalid_targets += 1;
            report.record_failure(record.prototype, record.path, err);
        }
        Err(err) => {
            warn!(prototype = %record.prototype, path = %record.path, %err, "skipping invalid directive");
            report.invalid_records += 1;
            report.record_failure(record.prototype, record.path, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_data::FieldType;
    use serde_json::json;

    fn database() -> GameDatabase {
        let mut db = GameDatabase::new();
        let power = db
            .schemas
            .define_class("PowerPrototype", None, [("Radius", FieldType::Float)])
            .unwrap();
        db.define_prototype("Powers/Summon", power).unwrap();
        db
    }

    #[test]
    fn test_records_are_isolated() {
        let mut db = database();
        let mut index = DirectiveIndex::new();
        let mut report = PatchReport::default();
        let text = json!([
            { "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Float", "Value": 5.0 },
            { "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Float" },
            { "Enabled": false, "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Float", "Value": 9.0 },
            { "Prototype": "Powers/Missing", "Path": "Radius", "ValueType": "Float", "Value": 1.0 },
            { "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Float", "Value": [] }
        ])
        .to_string();

        load_source("PatchDataTest.json", &text, &mut db, &mut index, &mut report);

        assert_eq!(report.files_read, 1);
        assert_eq!(report.loaded, 1);
        assert_eq!(report.disabled, 1);
        assert_eq!(report.invalid_targets, 1);
        assert_eq!(report.invalid_records, 2);
        assert_eq!(report.failures.len(), 3);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_malformed_file() {
        let mut db = database();
        let mut index = DirectiveIndex::new();
        let mut report = PatchReport::default();
        load_source("PatchDataBroken.json", "{ not json", &mut db, &mut index, &mut report);
        load_source("PatchDataObject.json", "{}", &mut db, &mut index, &mut report);
        assert_eq!(report.files_failed, 2);
        assert_eq!(report.files_read, 0);
        assert!(index.is_empty());
        assert!(matches!(report.failures[0].error, PatchError::Json { .. }));
    }
}
