//! Error taxonomy of the patch engine.
//!
//! Every variant is recoverable: the loader isolates errors per file and per
//! record, and the controller isolates them per directive.

use std::path::PathBuf;

use proto_data::DataError;
use proto_patch_path::PathError;
use thiserror::Error;

/// A directive payload did not match its declared value kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot parse {kind} from {input}: {reason}")]
pub struct ValueParseError {
    pub kind: String,
    /// Compact rendering of the offending JSON input.
    pub input: String,
    pub reason: String,
}

impl ValueParseError {
    pub fn new(kind: impl Into<String>, input: &serde_json::Value, reason: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            input: compact(input),
            reason: reason.into(),
        }
    }
}

const MAX_INPUT_CHARS: usize = 64;

fn compact(input: &serde_json::Value) -> String {
    let rendered = input.to_string();
    if rendered.chars().count() <= MAX_INPUT_CHARS {
        return rendered;
    }
    let mut out: String = rendered.chars().take(MAX_INPUT_CHARS).collect();
    out.push_str("...");
    out
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to read '{}': {source}", file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed directive file '{}': {source}", file.display())]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid patch options: {0}")]
    Config(#[from] toml::de::Error),
    /// Malformed directive record.
    #[error("invalid directive record: {0}")]
    Load(String),
    #[error("invalid path: {0}")]
    Path(#[from] PathError),
    #[error("unknown prototype '{0}'")]
    NameResolution(String),
    #[error(transparent)]
    ValueParse(#[from] ValueParseError),
    #[error("cannot resolve '{path}': {reason}")]
    PathResolution { path: String, reason: String },
    #[error("cannot assign field '{field}': {reason}")]
    TypeConversion { field: String, reason: String },
    /// Unknown class or parent data ref while building a nested object.
    #[error("schema resolution failed: {0}")]
    SchemaResolution(String),
}

impl PatchError {
    pub(crate) fn path_resolution(path: impl Into<String>, reason: impl Into<String>) -> Self {
        PatchError::PathResolution { path: path.into(), reason: reason.into() }
    }

    pub(crate) fn type_conversion(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PatchError::TypeConversion { field: field.into(), reason: reason.into() }
    }

    pub(crate) fn from_data(field: &str, err: DataError) -> Self {
        PatchError::type_conversion(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_parse_error_is_compact() {
        let long = json!("x".repeat(200));
        let err = ValueParseError::new("Integer", &long, "expected a number");
        assert!(err.input.ends_with("..."));
        assert!(err.input.chars().count() <= MAX_INPUT_CHARS + 3);
        assert!(err.to_string().starts_with("cannot parse Integer from"));
    }

    #[test]
    fn test_display() {
        let err = PatchError::path_resolution("Contexts[5]", "index 5 out of range for 3 elements");
        assert_eq!(
            err.to_string(),
            "cannot resolve 'Contexts[5]': index 5 out of range for 3 elements"
        );
        assert_eq!(PatchError::NameResolution("Powers/Nope".into()).to_string(), "unknown prototype 'Powers/Nope'");
    }
}
