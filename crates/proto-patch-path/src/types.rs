//! Type definitions for patch paths.

use std::fmt;

/// One step of a structural path: a field name, optionally indexed.
///
/// `Contexts[2]` is `PathStep { field: "Contexts", index: Some(2) }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub field: String,
    pub index: Option<usize>,
}

impl PathStep {
    pub fn field(name: impl Into<String>) -> Self {
        Self { field: name.into(), index: None }
    }

    pub fn indexed(name: impl Into<String>, index: usize) -> Self {
        Self { field: name.into(), index: Some(index) }
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.field, index),
            None => f.write_str(&self.field),
        }
    }
}

/// How the terminal field of a directive is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpec {
    /// `Field`: the field itself is replaced.
    Scalar,
    /// `Field[]`: the value is appended to the sequence held by the field.
    Append,
    /// `Field[n]`: slot `n` of the sequence is overwritten.
    At(usize),
}

/// A parsed directive path, split into the container part and the terminal field.
///
/// For `Contexts[2].Radius` the container is `Contexts[2]` and the field is
/// `Radius`; for a single-segment path the container is empty, meaning the
/// root prototype itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPath {
    /// The path exactly as written.
    pub raw: String,
    /// Steps leading to the object that owns the terminal field.
    pub container: Vec<PathStep>,
    /// Normalized rendering of `container`, comparable with registered structural paths.
    pub clear_path: String,
    /// Name of the terminal field.
    pub field_name: String,
    pub index: IndexSpec,
}

impl PatchPath {
    /// True when the terminal field lives directly on the root prototype.
    pub fn targets_root(&self) -> bool {
        self.container.is_empty()
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(PathStep::field("Radius").to_string(), "Radius");
        assert_eq!(PathStep::indexed("Contexts", 3).to_string(), "Contexts[3]");
    }
}
