//! Field mutation: assign a directive's payload to its terminal field on a
//! resolved container.
//!
//! Payloads are converted to the field's declared type first; nothing is
//! written unless the whole new value converts.

use proto_data::{ClassId, FieldRef, FieldType, FieldValue, GameDatabase, ObjectHandle};
use proto_patch_path::IndexSpec;
use tracing::trace;

use crate::directive::Directive;
use crate::error::PatchError;
use crate::value::{enum_ordinal, prototype_object, EnumLiteral, TypedValue};

/// Apply `directive` to its terminal field on `container`.
pub fn apply_directive(db: &mut GameDatabase, container: ObjectHandle, directive: &Directive) -> Result<(), PatchError> {
    let name = directive.field_name();
    let raw = &directive.path().raw;
    let field = db.field(container, name).ok_or_else(|| {
        PatchError::path_resolution(
            raw.clone(),
            format!(
                "no field '{name}' on '{}', available: {}",
                db.class_of(container).name,
                db.available_fields(container).join(", ")
            ),
        )
    })?;
    let ty = db.field_type(field).clone();
    trace!(object = %container, field = %name, index = ?directive.index(), "assigning field");

    let value = match directive.index() {
        IndexSpec::Scalar => to_field_value(db, directive.value(), &ty, name)?,
        IndexSpec::At(index) => {
            let element = sequence_element(db, field, &ty, name)?;
            let mut items = current_items(db.read(field), name)?;
            if index >= items.len() {
                return Err(PatchError::path_resolution(
                    raw.clone(),
                    format!("index {index} out of range for {} elements", items.len()),
                ));
            }
            items[index] = to_field_value(db, directive.value(), element, name)?;
            FieldValue::List(items)
        }
        IndexSpec::Append => {
            let element = sequence_element(db, field, &ty, name)?;
            let mut items = current_items(db.read(field), name)?;
            match directive.value() {
                TypedValue::Array(values) => {
                    for value in values {
                        items.push(to_field_value(db, value, element, name)?);
                    }
                }
                value => items.push(to_field_value(db, value, element, name)?),
            }
            FieldValue::List(items)
        }
    };

    db.write(field, value).map_err(|err| PatchError::from_data(name, err))
}

fn sequence_element<'a>(
    db: &GameDatabase,
    field: FieldRef,
    ty: &'a FieldType,
    name: &str,
) -> Result<&'a FieldType, PatchError> {
    match ty.element() {
        Some(element) if db.is_sequence(field) => Ok(element),
        _ => Err(PatchError::type_conversion(
            name,
            format!("field of type {} is not a sequence", db.schemas.type_name(ty)),
        )),
    }
}

/// A copy of the sequence currently stored in a field; null reads as empty.
fn current_items(value: &FieldValue, name: &str) -> Result<Vec<FieldValue>, PatchError> {
    match value {
        FieldValue::List(items) => Ok(items.clone()),
        FieldValue::Null => Ok(Vec::new()),
        other => Err(PatchError::type_conversion(name, format!("field holds {}, not a sequence", other.kind_name()))),
    }
}

/// Convert a parsed payload to a value for a field declared as `ty`.
pub fn to_field_value(db: &GameDatabase, value: &TypedValue, ty: &FieldType, name: &str) -> Result<FieldValue, PatchError> {
    let mismatch = || {
        PatchError::type_conversion(
            name,
            format!("cannot assign {} value {value} to {}", kind_name(value), db.schemas.type_name(ty)),
        )
    };

    let converted = match (value, ty) {
        (TypedValue::Null, _) if db.value_fits(&FieldValue::Null, ty) => FieldValue::Null,
        (TypedValue::String(s), FieldType::String) => FieldValue::String(s.clone()),
        (TypedValue::Boolean(b), FieldType::Bool) => FieldValue::Bool(*b),
        (TypedValue::Integer(i), FieldType::Int) => FieldValue::Int(*i),
        (TypedValue::Integer(i), FieldType::Long) => FieldValue::Long(i64::from(*i)),
        (TypedValue::Integer(i), FieldType::Float) => FieldValue::Float(*i as f32),
        (TypedValue::Integer(i), FieldType::Double) => FieldValue::Double(f64::from(*i)),
        (TypedValue::Integer(i), FieldType::Enum(id)) => {
            let ordinal = enum_ordinal(db, *id, &EnumLiteral::Ordinal(*i))
                .map_err(|reason| PatchError::type_conversion(name, reason))?;
            FieldValue::Enum(ordinal)
        }
        (TypedValue::Float(f), FieldType::Float) => FieldValue::Float(*f),
        (TypedValue::Float(f), FieldType::Double) => FieldValue::Double(f64::from(*f)),
        (TypedValue::Double(d), FieldType::Double) => FieldValue::Double(*d),
        (TypedValue::Double(d), FieldType::Float) => {
            if d.is_finite() && d.abs() > f64::from(f32::MAX) {
                return Err(PatchError::type_conversion(name, format!("{d} is out of range for float")));
            }
            FieldValue::Float(*d as f32)
        }
        (TypedValue::Enum(literal), FieldType::Enum(id)) => {
            let ordinal = enum_ordinal(db, *id, literal).map_err(|reason| PatchError::type_conversion(name, reason))?;
            FieldValue::Enum(ordinal)
        }
        (TypedValue::PrototypeGuid(guid), FieldType::PrototypeGuid) => FieldValue::PrototypeGuid(*guid),
        (TypedValue::PrototypeId(id), FieldType::PrototypeId) => FieldValue::PrototypeId(*id),
        (TypedValue::PrototypeId(id), FieldType::Prototype(class)) => {
            let object = prototype_object(db, *id).map_err(|reason| PatchError::type_conversion(name, reason))?;
            check_class(db, object, *class, name)?;
            FieldValue::Object(object)
        }
        (TypedValue::LocaleStringId(id), FieldType::LocaleStringId) => FieldValue::LocaleStringId(*id),
        (TypedValue::AssetId(id), FieldType::AssetId) => FieldValue::AssetId(*id),
        (TypedValue::Vector3(v), FieldType::Vector3) => FieldValue::Vector3(*v),
        (TypedValue::PropertyId(id), FieldType::PropertyId) => FieldValue::PropertyId(*id),
        (TypedValue::Properties(props), FieldType::Properties) => FieldValue::Properties(props.clone()),
        (
            TypedValue::Prototype(object) | TypedValue::ComplexObject(object) | TypedValue::Eval(object),
            FieldType::Prototype(class),
        ) => {
            check_class(db, *object, *class, name)?;
            FieldValue::Object(*object)
        }
        (TypedValue::Array(items), FieldType::List(element)) => FieldValue::List(
            items
                .iter()
                .map(|item| to_field_value(db, item, element, name))
                .collect::<Result<_, _>>()?,
        ),
        _ => return Err(mismatch()),
    };
    Ok(converted)
}

fn check_class(db: &GameDatabase, object: ObjectHandle, class: ClassId, name: &str) -> Result<(), PatchError> {
    let actual = db.object(object).class;
    if db.schemas.is_subclass_of(actual, class) {
        return Ok(());
    }
    Err(PatchError::type_conversion(
        name,
        format!(
            "object of class '{}' is not a '{}'",
            db.schemas.class(actual).name,
            db.schemas.class(class).name
        ),
    ))
}

fn kind_name(value: &TypedValue) -> &'static str {
    match value {
        TypedValue::Null => "null",
        TypedValue::String(_) => "String",
        TypedValue::Boolean(_) => "Boolean",
        TypedValue::Float(_) => "Float",
        TypedValue::Double(_) => "Double",
        TypedValue::Integer(_) => "Integer",
        TypedValue::Enum(_) => "Enum",
        TypedValue::PrototypeGuid(_) => "PrototypeGuid",
        TypedValue::PrototypeId(_) => "PrototypeId",
        TypedValue::LocaleStringId(_) => "LocaleStringId",
        TypedValue::AssetId(_) => "AssetId",
        TypedValue::Vector3(_) => "Vector3",
        TypedValue::PropertyId(_) => "PropertyId",
        TypedValue::Properties(_) => "Properties",
        TypedValue::Prototype(_) => "Prototype",
        TypedValue::ComplexObject(_) => "ComplexObject",
        TypedValue::Eval(_) => "Eval",
        TypedValue::Array(_) => "array",
    }
}
