//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PatchError;

/// Where directive files live and whether the engine runs at all.
///
/// Deserializable from TOML; unknown keys are rejected.
///
/// ```toml
/// enabled = true
/// directory = "Data/Game/Patches"
/// file_prefix = "PatchData"
/// extension = "json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchOptions {
    pub enabled: bool,
    pub directory: PathBuf,
    /// Only files whose name starts with this prefix are loaded.
    pub file_prefix: String,
    /// File extension without the leading dot, matched case-insensitively.
    pub extension: String,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("Data/Game/Patches"),
            file_prefix: "PatchData".to_string(),
            extension: "json".to_string(),
        }
    }
}

impl PatchOptions {
    pub fn from_toml_str(source: &str) -> Result<Self, PatchError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| PatchError::Io {
            file: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Options reading from `directory` with the default naming convention.
    pub fn with_directory(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into(), ..Self::default() }
    }

    /// True if `file_name` follows the prefix and extension convention.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let Some((stem, extension)) = file_name.rsplit_once('.') else {
            return false;
        };
        stem.starts_with(&self.file_prefix) && extension.eq_ignore_ascii_case(&self.extension)
    }
}
