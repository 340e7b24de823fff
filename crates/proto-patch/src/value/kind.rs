//! Declared value kinds of directive payloads.

use std::fmt;
use std::str::FromStr;

use crate::error::PatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    Boolean,
    Float,
    Double,
    Integer,
    Enum,
    PrototypeGuid,
    PrototypeId,
    /// Accepted alias of `PrototypeId`.
    PrototypeDataRef,
    LocaleStringId,
    AssetId,
    Vector3,
    PropertyId,
    Eval,
    Prototype,
    Properties,
    ComplexObject,
    StringArray,
    BooleanArray,
    FloatArray,
    DoubleArray,
    IntegerArray,
    EnumArray,
    PrototypeIdArray,
    PrototypeDataRefArray,
    AssetIdArray,
    Vector3Array,
    PrototypeArray,
}

impl ValueKind {
    pub const ALL: [ValueKind; 28] = [
        ValueKind::String,
        ValueKind::Boolean,
        ValueKind::Float,
        ValueKind::Double,
        ValueKind::Integer,
        ValueKind::Enum,
        ValueKind::PrototypeGuid,
        ValueKind::PrototypeId,
        ValueKind::PrototypeDataRef,
        ValueKind::LocaleStringId,
        ValueKind::AssetId,
        ValueKind::Vector3,
        ValueKind::PropertyId,
        ValueKind::Eval,
        ValueKind::Prototype,
        ValueKind::Properties,
        ValueKind::ComplexObject,
        ValueKind::StringArray,
        ValueKind::BooleanArray,
        ValueKind::FloatArray,
        ValueKind::DoubleArray,
        ValueKind::IntegerArray,
        ValueKind::EnumArray,
        ValueKind::PrototypeIdArray,
        ValueKind::PrototypeDataRefArray,
        ValueKind::AssetIdArray,
        ValueKind::Vector3Array,
        ValueKind::PrototypeArray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "String",
            ValueKind::Boolean => "Boolean",
            ValueKind::Float => "Float",
            ValueKind::Double => "Double",
            ValueKind::Integer => "Integer",
            ValueKind::Enum => "Enum",
            ValueKind::PrototypeGuid => "PrototypeGuid",
            ValueKind::PrototypeId => "PrototypeId",
            ValueKind::PrototypeDataRef => "PrototypeDataRef",
            ValueKind::LocaleStringId => "LocaleStringId",
            ValueKind::AssetId => "AssetId",
            ValueKind::Vector3 => "Vector3",
            ValueKind::PropertyId => "PropertyId",
            ValueKind::Eval => "Eval",
            ValueKind::Prototype => "Prototype",
            ValueKind::Properties => "Properties",
            ValueKind::ComplexObject => "ComplexObject",
            ValueKind::StringArray => "StringArray",
            ValueKind::BooleanArray => "BooleanArray",
            ValueKind::FloatArray => "FloatArray",
            ValueKind::DoubleArray => "DoubleArray",
            ValueKind::IntegerArray => "IntegerArray",
            ValueKind::EnumArray => "EnumArray",
            ValueKind::PrototypeIdArray => "PrototypeIdArray",
            ValueKind::PrototypeDataRefArray => "PrototypeDataRefArray",
            ValueKind::AssetIdArray => "AssetIdArray",
            ValueKind::Vector3Array => "Vector3Array",
            ValueKind::PrototypeArray => "PrototypeArray",
        }
    }

    /// Element kind of an array kind.
    pub fn element(&self) -> Option<ValueKind> {
        let element = match self {
            ValueKind::StringArray => ValueKind::String,
            ValueKind::BooleanArray => ValueKind::Boolean,
            ValueKind::FloatArray => ValueKind::Float,
            ValueKind::DoubleArray => ValueKind::Double,
            ValueKind::IntegerArray => ValueKind::Integer,
            ValueKind::EnumArray => ValueKind::Enum,
            ValueKind::PrototypeIdArray => ValueKind::PrototypeId,
            ValueKind::PrototypeDataRefArray => ValueKind::PrototypeDataRef,
            ValueKind::AssetIdArray => ValueKind::AssetId,
            ValueKind::Vector3Array => ValueKind::Vector3,
            ValueKind::PrototypeArray => ValueKind::Prototype,
            _ => return None,
        };
        Some(element)
    }

    pub fn is_array(&self) -> bool {
        self.element().is_some()
    }

    /// Kinds whose payload is a nested object built at load time.
    pub fn is_object(&self) -> bool {
        matches!(self, ValueKind::Eval | ValueKind::Prototype | ValueKind::ComplexObject)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = PatchError;

    /// Case-insensitive; `X[]` is accepted for `XArray`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().replace("[]", "Array");
        ValueKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(&name))
            .ok_or_else(|| PatchError::Load(format!("unknown ValueType '{s}'")))
    }
}
