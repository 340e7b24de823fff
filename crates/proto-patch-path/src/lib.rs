//! Field path expressions for prototype patch directives.
//!
//! A path names a field relative to a root prototype: dot-separated field
//! names, each optionally followed by a bracketed array index. The final
//! segment decides how the field is written:
//!
//! - `Radius` replaces the field,
//! - `Contexts[1]` overwrites slot 1 of the sequence held by `Contexts`,
//! - `Keywords[]` appends to the sequence held by `Keywords`.
//!
//! # Example
//!
//! ```
//! use proto_patch_path::{parse_patch_path, IndexSpec};
//!
//! let path = parse_patch_path("Contexts[2].Radius").unwrap();
//! assert_eq!(path.clear_path, "Contexts[2]");
//! assert_eq!(path.field_name, "Radius");
//! assert_eq!(path.index, IndexSpec::Scalar);
//!
//! let path = parse_patch_path("Keywords[]").unwrap();
//! assert!(path.targets_root());
//! assert_eq!(path.index, IndexSpec::Append);
//! ```

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub mod types;
pub use types::{IndexSpec, PatchPath, PathStep};

/// Maximum number of segments in a single path.
pub const MAX_PATH_STEPS: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path has an empty segment at position {0}")]
    EmptySegment(usize),
    #[error("invalid path segment '{0}'")]
    InvalidSegment(String),
    #[error("append marker '[]' is only allowed on the final segment, found in '{0}'")]
    AppendInContainer(String),
    #[error("array index out of range in segment '{0}'")]
    IndexOverflow(String),
    #[error("path has more than {MAX_PATH_STEPS} segments")]
    TooLong,
}

/// Bracket suffix of a raw segment.
enum Bracket {
    None,
    Empty,
    Index(usize),
}

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)(?:\[([0-9]*)\])?$").expect("segment pattern is valid")
    })
}

fn parse_segment(segment: &str) -> Result<(String, Bracket), PathError> {
    let caps = segment_regex()
        .captures(segment)
        .ok_or_else(|| PathError::InvalidSegment(segment.to_string()))?;
    let name = caps[1].to_string();
    let bracket = match caps.get(2) {
        None => Bracket::None,
        Some(digits) if digits.as_str().is_empty() => Bracket::Empty,
        Some(digits) => {
            let index = digits
                .as_str()
                .parse::<usize>()
                .map_err(|_| PathError::IndexOverflow(segment.to_string()))?;
            Bracket::Index(index)
        }
    };
    Ok((name, bracket))
}

fn split_segments(path: &str) -> Result<Vec<&str>, PathError> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.len() > MAX_PATH_STEPS {
        return Err(PathError::TooLong);
    }
    if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
        return Err(PathError::EmptySegment(pos));
    }
    Ok(segments)
}

fn container_step(segment: &str) -> Result<PathStep, PathError> {
    match parse_segment(segment)? {
        (name, Bracket::None) => Ok(PathStep::field(name)),
        (name, Bracket::Index(index)) => Ok(PathStep::indexed(name, index)),
        (_, Bracket::Empty) => Err(PathError::AppendInContainer(segment.to_string())),
    }
}

/// Parse a directive path into its container steps and terminal field.
///
/// # Errors
///
/// Fails on an empty path, an empty segment (`a..b`, trailing `.`), a
/// segment that is not `Identifier` optionally followed by `[digits]` or
/// `[]`, or an append marker outside the final segment.
///
/// # Example
///
/// ```
/// use proto_patch_path::{parse_patch_path, IndexSpec, PathStep};
///
/// let path = parse_patch_path("Context.Keywords[3]").unwrap();
/// assert_eq!(path.container, vec![PathStep::field("Context")]);
/// assert_eq!(path.field_name, "Keywords");
/// assert_eq!(path.index, IndexSpec::At(3));
///
/// assert!(parse_patch_path("").is_err());
/// assert!(parse_patch_path("Contexts[].Radius").is_err());
/// ```
pub fn parse_patch_path(raw: &str) -> Result<PatchPath, PathError> {
    if raw.is_empty() {
        return Err(PathError::Empty);
    }
    let segments = split_segments(raw)?;
    let (last, init) = segments.split_last().ok_or(PathError::Empty)?;

    let container = init
        .iter()
        .map(|segment| container_step(segment))
        .collect::<Result<Vec<_>, _>>()?;

    let (field_name, index) = match parse_segment(last)? {
        (name, Bracket::None) => (name, IndexSpec::Scalar),
        (name, Bracket::Empty) => (name, IndexSpec::Append),
        (name, Bracket::Index(index)) => (name, IndexSpec::At(index)),
    };

    Ok(PatchPath {
        raw: raw.to_string(),
        clear_path: format_steps(&container),
        container,
        field_name,
        index,
    })
}

/// Parse a structural path (no append markers) into steps.
///
/// The empty string is the root and yields no steps.
///
/// # Example
///
/// ```
/// use proto_patch_path::{parse_steps, PathStep};
///
/// assert!(parse_steps("").unwrap().is_empty());
/// assert_eq!(
///     parse_steps("Contexts[1].Bounds").unwrap(),
///     vec![PathStep::indexed("Contexts", 1), PathStep::field("Bounds")]
/// );
/// ```
pub fn parse_steps(path: &str) -> Result<Vec<PathStep>, PathError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    split_segments(path)?.into_iter().map(container_step).collect()
}

/// Render steps in normalized form (`a.b[2].c`). No steps render as the empty string.
///
/// # Example
///
/// ```
/// use proto_patch_path::{format_steps, PathStep};
///
/// assert_eq!(format_steps(&[]), "");
/// assert_eq!(
///     format_steps(&[PathStep::indexed("Contexts", 0), PathStep::field("Bounds")]),
///     "Contexts[0].Bounds"
/// );
/// ```
pub fn format_steps(steps: &[PathStep]) -> String {
    let mut out = String::new();
    for (i, step) in steps.iter().enumerate() {
        if i > 0 {
            out.push('.');
        }
        out.push_str(&step.field);
        if let Some(index) = step.index {
            out.push('[');
            out.push_str(&index.to_string());
            out.push(']');
        }
    }
    out
}

/// Structural path of a child discovered under `parent_path` in `field`,
/// optionally at position `index` of a sequence.
///
/// # Example
///
/// ```
/// use proto_patch_path::child_path;
///
/// assert_eq!(child_path("", "Context", None), "Context");
/// assert_eq!(child_path("", "Contexts", Some(2)), "Contexts[2]");
/// assert_eq!(child_path("Contexts[2]", "Bounds", None), "Contexts[2].Bounds");
/// ```
pub fn child_path(parent_path: &str, field: &str, index: Option<usize>) -> String {
    let step = PathStep { field: field.to_string(), index };
    if parent_path.is_empty() {
        step.to_string()
    } else {
        format!("{parent_path}.{step}")
    }
}

impl std::str::FromStr for PatchPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_patch_path(s)
    }
}
