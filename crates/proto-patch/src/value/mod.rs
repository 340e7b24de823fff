//! Typed value model: the payload a directive carries.
//!
//! Payloads are parsed once, at load time, against the declared
//! [`ValueKind`]. Nested objects (`Prototype`, `ComplexObject`, `Eval`) are
//! fully built in the object arena at that point, so a [`TypedValue`] never
//! holds unparsed JSON.

mod kind;
mod parse;

use std::fmt;

use proto_data::{
    AssetId, EnumId, GameDatabase, LocaleStringId, ObjectHandle, PropertyCollection, PropertyId, PrototypeGuid,
    PrototypeId, Vector3,
};
use tracing::warn;

pub use kind::ValueKind;
pub use parse::{check_shape, parse_field_value, parse_value};

/// An enum payload, resolved against the target field's enum at assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumLiteral {
    Name(String),
    Ordinal(i32),
}

impl fmt::Display for EnumLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumLiteral::Name(name) => f.write_str(name),
            EnumLiteral::Ordinal(ordinal) => write!(f, "{ordinal}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    String(String),
    Boolean(bool),
    Float(f32),
    Double(f64),
    Integer(i32),
    Enum(EnumLiteral),
    PrototypeGuid(PrototypeGuid),
    PrototypeId(PrototypeId),
    LocaleStringId(LocaleStringId),
    AssetId(AssetId),
    Vector3(Vector3),
    PropertyId(PropertyId),
    Properties(PropertyCollection),
    Prototype(ObjectHandle),
    ComplexObject(ObjectHandle),
    Eval(ObjectHandle),
    Array(Vec<TypedValue>),
}

impl TypedValue {
    /// The built object carried by the object kinds.
    pub fn as_object(&self) -> Option<ObjectHandle> {
        match self {
            TypedValue::Prototype(object) | TypedValue::ComplexObject(object) | TypedValue::Eval(object) => {
                Some(*object)
            }
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[TypedValue]> {
        match self {
            TypedValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_properties(&self) -> Option<&PropertyCollection> {
        match self {
            TypedValue::Properties(properties) => Some(properties),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => f.write_str("null"),
            TypedValue::String(s) => write!(f, "{s:?}"),
            TypedValue::Boolean(b) => write!(f, "{b}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Double(v) => write!(f, "{v}"),
            TypedValue::Integer(v) => write!(f, "{v}"),
            TypedValue::Enum(literal) => write!(f, "{literal}"),
            TypedValue::PrototypeGuid(id) => write!(f, "guid {id}"),
            TypedValue::PrototypeId(id) => write!(f, "prototype {id}"),
            TypedValue::LocaleStringId(id) => write!(f, "locale string {id}"),
            TypedValue::AssetId(id) => write!(f, "asset {id}"),
            TypedValue::Vector3(v) => write!(f, "{v}"),
            TypedValue::PropertyId(id) => write!(f, "property {}", id.property.0),
            TypedValue::Properties(props) => write!(f, "{{{} properties}}", props.len()),
            TypedValue::Prototype(object) | TypedValue::ComplexObject(object) | TypedValue::Eval(object) => {
                write!(f, "object {object}")
            }
            TypedValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Ordinal of `literal` in the enum `id`.
///
/// Names match case-insensitively; an ordinal the enum does not define is
/// accepted with a warning.
pub(crate) fn enum_ordinal(db: &GameDatabase, id: EnumId, literal: &EnumLiteral) -> Result<i32, String> {
    let schema = db.schemas.enum_schema(id);
    match literal {
        EnumLiteral::Name(name) => schema.ordinal_of(name).ok_or_else(|| {
            let valid: Vec<&str> = schema.variant_names().collect();
            format!(
                "invalid enum value '{name}' for '{}', valid values are: {}",
                schema.name,
                valid.join(", ")
            )
        }),
        EnumLiteral::Ordinal(ordinal) => {
            if !schema.is_defined(*ordinal) {
                warn!(ordinal, enum_name = %schema.name, "numeric enum value is not defined, using it anyway");
            }
            Ok(*ordinal)
        }
    }
}

/// The constructed object of the prototype `id`.
pub(crate) fn prototype_object(db: &GameDatabase, id: PrototypeId) -> Result<ObjectHandle, String> {
    db.prototype_object(id)
        .ok_or_else(|| format!("data ref {id} does not name a constructed prototype"))
}
