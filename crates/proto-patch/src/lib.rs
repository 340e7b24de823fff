//! proto-patch: data-driven field overrides for game prototypes.
//!
//! Directive files are JSON arrays of records, each naming a target
//! prototype, a field path, a declared value kind and a payload. The
//! [`PatchManager`] loads them once and is then handed to the construction
//! walker as its [`ConstructionHooks`](proto_data::ConstructionHooks): each
//! directive is applied at most once, when its target prototype (or the
//! nested object its path names) finishes post-processing.
//!
//! # Example
//!
//! ```
//! use proto_data::{construct_prototype, FieldType, FieldValue, GameDatabase};
//! use proto_patch::PatchManager;
//!
//! let mut db = GameDatabase::new();
//! let power = db
//!     .schemas
//!     .define_class("PowerPrototype", None, [("Radius", FieldType::Float)])
//!     .unwrap();
//! let (id, _) = db.define_prototype("Powers/Summon", power).unwrap();
//!
//! let mut manager = PatchManager::new();
//! manager.load_source(
//!     "PatchDataExample.json",
//!     r#"[{ "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Float", "Value": 5.0 }]"#,
//!     &mut db,
//! );
//!
//! let root = construct_prototype(&mut db, id, &mut manager).unwrap();
//! assert_eq!(db.get(root, "Radius"), Some(&FieldValue::Float(5.0)));
//! assert_eq!(manager.report().applied, 1);
//! ```

pub mod directive;
pub mod error;
pub mod index;
pub mod lint;
pub mod loader;
pub mod manager;
pub mod mutate;
pub mod options;
pub mod report;
pub mod resolve;
pub mod value;

pub use directive::{Directive, DirectiveRecord};
pub use error::{PatchError, ValueParseError};
pub use index::DirectiveIndex;
pub use lint::{lint_directory, lint_source, LintDiagnostic, LintReport};
pub use manager::PatchManager;
pub use options::PatchOptions;
pub use report::{PatchFailure, PatchReport};
pub use value::{EnumLiteral, TypedValue, ValueKind};
