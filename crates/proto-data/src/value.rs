//! Live field values stored in prototype objects.

use std::fmt;

use crate::graph::ObjectHandle;
use crate::ids::{AssetId, LocaleStringId, PrototypeGuid, PrototypeId};
use crate::properties::{PropertyCollection, PropertyId};
use crate::schema::FieldType;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// The value held by one field slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Unset reference-like field (string, prototype, list, property collection).
    #[default]
    Null,
    Bool(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    /// Enum ordinal.
    Enum(i32),
    PrototypeId(PrototypeId),
    PrototypeGuid(PrototypeGuid),
    LocaleStringId(LocaleStringId),
    AssetId(AssetId),
    Vector3(Vector3),
    PropertyId(PropertyId),
    Properties(PropertyCollection),
    Object(ObjectHandle),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Value a freshly allocated object holds for a field of type `ty`.
    pub fn default_for(ty: &FieldType) -> Self {
        match ty {
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::Int => FieldValue::Int(0),
            FieldType::Long => FieldValue::Long(0),
            FieldType::Float => FieldValue::Float(0.0),
            FieldType::Double => FieldValue::Double(0.0),
            FieldType::Enum(_) => FieldValue::Enum(0),
            FieldType::PrototypeId => FieldValue::PrototypeId(PrototypeId::INVALID),
            FieldType::PrototypeGuid => FieldValue::PrototypeGuid(PrototypeGuid::INVALID),
            FieldType::LocaleStringId => FieldValue::LocaleStringId(LocaleStringId::INVALID),
            FieldType::AssetId => FieldValue::AssetId(AssetId::INVALID),
            FieldType::Vector3 => FieldValue::Vector3(Vector3::default()),
            FieldType::String
            | FieldType::PropertyId
            | FieldType::Properties
            | FieldType::Prototype(_)
            | FieldType::List(_) => FieldValue::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            FieldValue::Object(handle) => Some(*handle),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the value's variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Long(_) => "long",
            FieldValue::Float(_) => "float",
            FieldValue::Double(_) => "double",
            FieldValue::String(_) => "string",
            FieldValue::Enum(_) => "enum",
            FieldValue::PrototypeId(_) => "PrototypeId",
            FieldValue::PrototypeGuid(_) => "PrototypeGuid",
            FieldValue::LocaleStringId(_) => "LocaleStringId",
            FieldValue::AssetId(_) => "AssetId",
            FieldValue::Vector3(_) => "Vector3",
            FieldValue::PropertyId(_) => "PropertyId",
            FieldValue::Properties(_) => "PropertyCollection",
            FieldValue::Object(_) => "object",
            FieldValue::List(_) => "list",
        }
    }
}
