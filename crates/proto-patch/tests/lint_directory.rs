mod common;

use common::fixtures::write_directives;
use proto_patch::{lint_directory, PatchError, PatchOptions};
use serde_json::json;

#[test]
fn lint_walks_matching_files_only() {
    let dir = tempfile::tempdir().unwrap();
    write_directives(
        dir.path(),
        "PatchDataGood.json",
        &json!([
            { "Prototype": "Powers/Summon", "Path": "Contexts[1].SummonRadius", "ValueType": "Float", "Value": 9.0 },
            { "Prototype": "Powers/Summon", "Path": "Keywords[]", "ValueType": "PrototypeId[]", "Value": ["Keywords/Pet", 12] },
            { "Prototype": "Powers/Summon", "Path": "Icon", "ValueType": "AssetId", "Value": "summon_icon.png (IconAsset)" }
        ]),
    );
    write_directives(
        dir.path(),
        "PatchDataBad.json",
        &json!([
            { "Prototype": "Powers/Summon", "Path": "Contexts[].SummonRadius", "ValueType": "Float", "Value": 9.0 },
            { "Prototype": "Powers/Summon", "Path": "Context", "ValueType": "Prototype", "Value": { "SummonRadius": 1.0 } }
        ]),
    );
    std::fs::write(dir.path().join("PatchDataBroken.json"), "[{").unwrap();
    std::fs::write(dir.path().join("Ignored.json"), "[{").unwrap();

    let report = lint_directory(&PatchOptions::with_directory(dir.path())).unwrap();
    assert_eq!(report.files, 3);
    assert_eq!(report.records, 5);
    assert_eq!(report.invalid, 2);
    assert_eq!(report.diagnostics.len(), 3);

    let file_level: Vec<_> = report.diagnostics.iter().filter(|d| d.record.is_none()).collect();
    assert_eq!(file_level.len(), 1);
    assert!(matches!(file_level[0].error, PatchError::Json { .. }));
    assert!(report.diagnostics.iter().any(|d| matches!(d.error, PatchError::Path(_))));
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.error.to_string().contains("missing required 'ParentDataRef'")));
}

#[test]
fn lint_missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = lint_directory(&PatchOptions::with_directory(dir.path().join("missing"))).unwrap_err();
    assert!(matches!(err, PatchError::Io { .. }));
}
