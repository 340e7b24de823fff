//! Directives: one field override each.

use proto_data::{GameDatabase, PrototypeId};
use proto_patch_path::{parse_patch_path, IndexSpec, PatchPath, PathStep};
use serde::Deserialize;

use crate::error::PatchError;
use crate::value::{parse_value, TypedValue, ValueKind};

fn enabled_by_default() -> bool {
    true
}

/// A directive exactly as written in a directive file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DirectiveRecord {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Symbolic name of the prototype to patch.
    pub prototype: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    pub value_type: String,
    pub value: serde_json::Value,
}

impl DirectiveRecord {
    pub fn from_json(record: serde_json::Value) -> Result<Self, PatchError> {
        serde_json::from_value(record).map_err(|err| PatchError::Load(err.to_string()))
    }
}

/// A loaded directive, bound to a prototype id and carrying a parsed payload.
///
/// Everything but the consumed and failed flags is fixed once loaded.
#[derive(Debug, Clone)]
pub struct Directive {
    target: PrototypeId,
    target_name: String,
    path: PatchPath,
    description: String,
    kind: ValueKind,
    value: TypedValue,
    consumed: bool,
    /// Set when an attempt at the target's exit failed; never retried.
    failed: bool,
}

impl Directive {
    /// Bind a record: parse its value kind and path, resolve its target,
    /// then parse its payload.
    ///
    /// `Properties` directives come back already consumed; they are applied
    /// by direct injection, never through a path.
    pub fn from_record(record: &DirectiveRecord, db: &mut GameDatabase) -> Result<Self, PatchError> {
        let kind: ValueKind = record.value_type.parse()?;
        let path = parse_patch_path(&record.path)?;
        let target = db
            .prototypes
            .resolve_name(&record.prototype)
            .ok_or_else(|| PatchError::NameResolution(record.prototype.clone()))?;
        let value = parse_value(db, kind, &record.value)?;

        Ok(Self {
            target,
            target_name: record.prototype.clone(),
            path,
            description: record.description.clone(),
            kind,
            value,
            consumed: kind == ValueKind::Properties,
            failed: false,
        })
    }

    pub fn target(&self) -> PrototypeId {
        self.target
    }

    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    pub fn path(&self) -> &PatchPath {
        &self.path
    }

    /// Structural path of the container of the target field.
    pub fn clear_path(&self) -> &str {
        &self.path.clear_path
    }

    pub fn container(&self) -> &[PathStep] {
        &self.path.container
    }

    pub fn field_name(&self) -> &str {
        &self.path.field_name
    }

    pub fn index(&self) -> IndexSpec {
        self.path.index
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn value(&self) -> &TypedValue {
        &self.value
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Neither applied nor given up on.
    pub fn is_pending(&self) -> bool {
        !self.consumed && !self.failed
    }

    pub(crate) fn mark_consumed(&mut self) {
        self.consumed = true;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.failed = true;
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
    fn test_record_defaults() {
        let record = DirectiveRecord::from_json(json!({
            "Prototype": "Powers/Summon",
            "Path": "Radius",
            "ValueType": "Float",
            "Value": 5.0
        }))
        .unwrap();
        assert!(record.enabled);
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_record_requires_fields() {
        for missing in ["Prototype", "Path", "ValueType", "Value"] {
            let mut record = json!({
                "Prototype": "Powers/Summon",
                "Path": "Radius",
                "ValueType": "Float",
                "Value": 5.0
            });
            record.as_object_mut().unwrap().remove(missing);
            assert!(
                matches!(DirectiveRecord::from_json(record), Err(PatchError::Load(_))),
                "{missing} should be required"
            );
        }
    }

    #[test]
    fn test_bind() {
        let mut db = database();
        let record = DirectiveRecord::from_json(json!({
            "Prototype": "Powers/Summon",
            "Path": "Contexts[1].SummonRadius",
            "ValueType": "float",
            "Value": 2.0
        }))
        .unwrap();
        let directive = Directive::from_record(&record, &mut db).unwrap();
        assert_eq!(directive.clear_path(), "Contexts[1]");
        assert_eq!(directive.field_name(), "SummonRadius");
        assert_eq!(directive.index(), IndexSpec::Scalar);
        assert_eq!(directive.value(), &TypedValue::Float(2.0));
        assert!(!directive.is_consumed());
    }

    #[test]
    fn test_bind_errors() {
        let mut db = database();
        let bind = |db: &mut GameDatabase, record: serde_json::Value| {
            Directive::from_record(&DirectiveRecord::from_json(record).unwrap(), db)
        };
        assert!(matches!(
            bind(&mut db, json!({ "Prototype": "Powers/Nope", "Path": "Radius", "ValueType": "Float", "Value": 1 })),
            Err(PatchError::NameResolution(_))
        ));
        assert!(matches!(
            bind(&mut db, json!({ "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Colour", "Value": 1 })),
            Err(PatchError::Load(_))
        ));
        assert!(matches!(
            bind(&mut db, json!({ "Prototype": "Powers/Summon", "Path": "Radius..X", "ValueType": "Float", "Value": 1 })),
            Err(PatchError::Path(_))
        ));
        assert!(matches!(
            bind(&mut db, json!({ "Prototype": "Powers/Summon", "Path": "Radius", "ValueType": "Float", "Value": "x" })),
            Err(PatchError::ValueParse(_))
        ));
    }

    #[test]
    fn test_properties_directive_is_consumed_at_load() {
        let mut db = database();
        let record = DirectiveRecord::from_json(json!({
            "Prototype": "Powers/Summon",
            "Path": "Properties",
            "ValueType": "Properties",
            "Value": {}
        }))
        .unwrap();
        assert!(Directive::from_record(&record, &mut db).unwrap().is_consumed());
    }
}
