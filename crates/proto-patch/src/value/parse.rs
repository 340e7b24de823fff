//! JSON payload parsing.
//!
//! [`parse_value`] parses a directive payload against its declared kind,
//! [`parse_field_value`] parses a nested object's field against the field's
//! declared type, and [`check_shape`] validates a payload's JSON shape
//! without a database.

use proto_data::{
    split_asset_reference, AssetId, FieldType, FieldValue, GameDatabase, LocaleStringId, ObjectHandle,
    PropertyCollection, PropertyDataType, PropertyId, PropertyParam, PropertyParamType, PropertyValue,
    PrototypeGuid, PrototypeId, Vector3, MAX_PARAM_COUNT,
};
use serde_json::{Map, Value};
use tracing::{error, trace, warn};

use super::{enum_ordinal, prototype_object, EnumLiteral, TypedValue, ValueKind};
use crate::error::{PatchError, ValueParseError};

const PARENT_DATA_REF: &str = "ParentDataRef";
const CLASS_NAME: &str = "ClassName";
const PROPERTY_ENUM: &str = "PropertyEnum";
const PARAMS: &str = "Params";

/// Parse a directive payload declared as `kind`.
///
/// Objects allocated for a payload that fails to parse are released.
pub fn parse_value(db: &mut GameDatabase, kind: ValueKind, json: &Value) -> Result<TypedValue, PatchError> {
    let mark = db.objects.len();
    let parsed = parse_kind(db, kind, json);
    if parsed.is_err() {
        db.objects.truncate(mark);
    }
    parsed
}

fn parse_kind(db: &mut GameDatabase, kind: ValueKind, json: &Value) -> Result<TypedValue, PatchError> {
    let label = kind.as_str();
    let value = match kind {
        ValueKind::String if json.is_null() => TypedValue::Null,
        ValueKind::String => TypedValue::String(expect_str(label, json)?.to_string()),
        ValueKind::Boolean => TypedValue::Boolean(expect_bool(label, json)?),
        ValueKind::Float => TypedValue::Float(expect_f32(label, json)?),
        ValueKind::Double => TypedValue::Double(expect_f64(label, json)?),
        ValueKind::Integer => TypedValue::Integer(expect_i32(label, json)?),
        ValueKind::Enum => TypedValue::Enum(expect_enum_literal(label, json)?),
        ValueKind::PrototypeGuid => TypedValue::PrototypeGuid(PrototypeGuid(expect_handle(label, json)?)),
        ValueKind::PrototypeId | ValueKind::PrototypeDataRef => {
            TypedValue::PrototypeId(resolve_prototype_ref(db, label, json)?)
        }
        ValueKind::LocaleStringId => TypedValue::LocaleStringId(LocaleStringId(expect_handle(label, json)?)),
        ValueKind::AssetId => TypedValue::AssetId(resolve_asset_ref(db, label, json)?),
        ValueKind::Vector3 => TypedValue::Vector3(expect_vector3(label, json)?),
        ValueKind::PropertyId => TypedValue::PropertyId(parse_property_id(db, json)?),
        ValueKind::Properties => TypedValue::Properties(parse_properties(db, json)?),
        ValueKind::Prototype => TypedValue::Prototype(parse_object(db, label, json, ObjectMode::Prototype)?),
        ValueKind::ComplexObject => {
            TypedValue::ComplexObject(parse_object(db, label, json, ObjectMode::Complex)?)
        }
        ValueKind::Eval => TypedValue::Eval(parse_object(db, label, json, ObjectMode::Eval)?),
        ValueKind::StringArray => parse_array(db, kind, ValueKind::String, json)?,
        ValueKind::BooleanArray => parse_array(db, kind, ValueKind::Boolean, json)?,
        ValueKind::FloatArray => parse_array(db, kind, ValueKind::Float, json)?,
        ValueKind::DoubleArray => parse_array(db, kind, ValueKind::Double, json)?,
        ValueKind::IntegerArray => parse_array(db, kind, ValueKind::Integer, json)?,
        ValueKind::EnumArray => parse_array(db, kind, ValueKind::Enum, json)?,
        ValueKind::PrototypeIdArray => parse_array(db, kind, ValueKind::PrototypeId, json)?,
        ValueKind::PrototypeDataRefArray => parse_array(db, kind, ValueKind::PrototypeDataRef, json)?,
        ValueKind::AssetIdArray => parse_array(db, kind, ValueKind::AssetId, json)?,
        ValueKind::Vector3Array => parse_array(db, kind, ValueKind::Vector3, json)?,
        ValueKind::PrototypeArray => parse_array(db, kind, ValueKind::Prototype, json)?,
    };
    Ok(value)
}

fn parse_array(
    db: &mut GameDatabase,
    kind: ValueKind,
    element: ValueKind,
    json: &Value,
) -> Result<TypedValue, PatchError> {
    let items = json
        .as_array()
        .ok_or_else(|| ValueParseError::new(kind.as_str(), json, "expected an array"))?;
    let items = items
        .iter()
        .map(|item| parse_kind(db, element, item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TypedValue::Array(items))
}

// ── Nested objects ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectMode {
    /// `ParentDataRef` required.
    Prototype,
    /// `ParentDataRef` required and its class must be an eval class.
    Eval,
    /// `ParentDataRef` or `ClassName`.
    Complex,
}

/// Build a nested object: allocate its class, copy the parent data ref's
/// values, then parse every other key against the class's field table.
///
/// A key that names no field, or whose value fails to parse, is logged and
/// the field keeps its inherited value.
fn parse_object(db: &mut GameDatabase, label: &str, json: &Value, mode: ObjectMode) -> Result<ObjectHandle, PatchError> {
    let map = json
        .as_object()
        .ok_or_else(|| ValueParseError::new(label, json, "expected an object"))?;

    let parent = match map.get(PARENT_DATA_REF) {
        Some(parent) => Some(resolve_prototype_ref(db, label, parent)?),
        None => None,
    };

    let class = match (parent, mode) {
        (Some(parent), _) => db.class_for(parent).ok_or_else(|| {
            PatchError::SchemaResolution(format!("no class for parent data ref '{}'", db.prototypes.display_name(parent)))
        })?,
        (None, ObjectMode::Complex) => {
            let name = map.get(CLASS_NAME).and_then(Value::as_str).ok_or_else(|| {
                PatchError::SchemaResolution(format!("{label} requires '{PARENT_DATA_REF}' or '{CLASS_NAME}'"))
            })?;
            db.schemas
                .class_by_name(name)
                .ok_or_else(|| PatchError::SchemaResolution(format!("unknown class '{name}'")))?
        }
        (None, _) => {
            return Err(ValueParseError::new(label, json, format!("missing required '{PARENT_DATA_REF}'")).into());
        }
    };

    if mode == ObjectMode::Eval && !db.schemas.is_eval_class(class) {
        let reason = format!("class '{}' is not an eval class", db.schemas.class(class).name);
        return Err(ValueParseError::new(label, json, reason).into());
    }

    let object = db.allocate(class);
    if let Some(parent) = parent {
        db.copy_inherited_fields(object, parent)
            .map_err(|err| PatchError::SchemaResolution(err.to_string()))?;
    }
    trace!(%object, class = %db.schemas.class(class).name, "allocated nested object");

    for (key, value) in map {
        if key == PARENT_DATA_REF || key == CLASS_NAME {
            continue;
        }
        let Some(field) = db.field(object, key) else {
            warn!(field = %key, class = %db.class_of(object).name, "field not found on nested object, skipping");
            continue;
        };
        let ty = db.field_type(field).clone();
        let mark = db.objects.len();
        let result = parse_field_value(db, &ty, value)
            .and_then(|parsed| db.write(field, parsed).map_err(|err| PatchError::from_data(key, err)));
        if let Err(err) = result {
            db.objects.truncate(mark);
            error!(field = %key, class = %db.class_of(object).name, %err, "failed to parse nested field, keeping inherited value");
        }
    }

    Ok(object)
}

/// Parse a nested object's field value against the field's declared type.
pub fn parse_field_value(db: &mut GameDatabase, ty: &FieldType, json: &Value) -> Result<FieldValue, PatchError> {
    let label = db.schemas.type_name(ty);
    if json.is_null() {
        if db.value_fits(&FieldValue::Null, ty) {
            return Ok(FieldValue::Null);
        }
        return Err(ValueParseError::new(label, json, "null is not allowed for this field").into());
    }

    let value = match ty {
        FieldType::Bool => FieldValue::Bool(expect_bool(&label, json)?),
        FieldType::Int => FieldValue::Int(expect_i32(&label, json)?),
        FieldType::Long => FieldValue::Long(expect_i64(&label, json)?),
        FieldType::Float => FieldValue::Float(expect_f32(&label, json)?),
        FieldType::Double => FieldValue::Double(expect_f64(&label, json)?),
        FieldType::String => FieldValue::String(expect_str(&label, json)?.to_string()),
        FieldType::Enum(id) => {
            let literal = expect_enum_literal(&label, json)?;
            let ordinal = enum_ordinal(db, *id, &literal).map_err(|reason| ValueParseError::new(&label, json, reason))?;
            FieldValue::Enum(ordinal)
        }
        FieldType::PrototypeId => FieldValue::PrototypeId(resolve_prototype_ref(db, &label, json)?),
        FieldType::PrototypeGuid => FieldValue::PrototypeGuid(PrototypeGuid(expect_handle(&label, json)?)),
        FieldType::LocaleStringId => FieldValue::LocaleStringId(LocaleStringId(expect_handle(&label, json)?)),
        FieldType::AssetId => FieldValue::AssetId(resolve_asset_ref(db, &label, json)?),
        FieldType::Vector3 => FieldValue::Vector3(expect_vector3(&label, json)?),
        FieldType::PropertyId => FieldValue::PropertyId(parse_property_id(db, json)?),
        FieldType::Properties => FieldValue::Properties(parse_properties(db, json)?),
        FieldType::Prototype(class) if json.is_object() => {
            let mode = if db.schemas.is_eval_class(*class) {
                ObjectMode::Eval
            } else {
                ObjectMode::Prototype
            };
            FieldValue::Object(parse_object(db, &label, json, mode)?)
        }
        FieldType::Prototype(_) => {
            // A bare reference names an existing prototype object.
            let id = resolve_prototype_ref(db, &label, json)?;
            let object = prototype_object(db, id).map_err(|reason| ValueParseError::new(&label, json, reason))?;
            FieldValue::Object(object)
        }
        FieldType::List(element) => {
            let items = json
                .as_array()
                .ok_or_else(|| ValueParseError::new(&label, json, "expected an array"))?;
            let mut parsed = Vec::with_capacity(items.len());
            for item in items {
                parsed.push(parse_field_value(db, element, item)?);
            }
            FieldValue::List(parsed)
        }
    };
    Ok(value)
}

// ── Properties ────────────────────────────────────────────────────────────

/// `{"PropertyEnum": name, "Params": [...]}`, `{"PropertyEnum": name, "Param0": n, ...}`,
/// or `{"ParentDataRef": id}` naming the property's backing prototype.
fn parse_property_id(db: &GameDatabase, json: &Value) -> Result<PropertyId, PatchError> {
    let label = ValueKind::PropertyId.as_str();
    let map = json
        .as_object()
        .ok_or_else(|| ValueParseError::new(label, json, "expected an object"))?;

    if let Some(parent) = map.get(PARENT_DATA_REF) {
        let id = resolve_prototype_ref(db, label, parent)?;
        let property = db
            .properties
            .enum_from_prototype(id)
            .ok_or_else(|| ValueParseError::new(label, json, format!("no property is backed by prototype {id}")))?;
        return Ok(PropertyId::new(property));
    }

    let name = map
        .get(PROPERTY_ENUM)
        .and_then(Value::as_str)
        .ok_or_else(|| ValueParseError::new(label, json, format!("missing '{PROPERTY_ENUM}'")))?;
    let property = db
        .properties
        .enum_by_name(name)
        .ok_or_else(|| ValueParseError::new(label, json, format!("unknown property '{name}'")))?;
    let Some(info) = db.properties.lookup(property) else {
        return Err(ValueParseError::new(label, json, format!("unknown property '{name}'")).into());
    };

    let mut params = info.default_params;
    if let Some(list) = map.get(PARAMS) {
        let list = list
            .as_array()
            .ok_or_else(|| ValueParseError::new(label, json, "'Params' must be an array"))?;
        if list.len() > info.param_count() {
            let reason = format!("'{name}' takes {} params, got {}", info.param_count(), list.len());
            return Err(ValueParseError::new(label, json, reason).into());
        }
        for (slot, (param, ty)) in list.iter().zip(&info.param_types).enumerate() {
            params[slot] = parse_param(db, *ty, param)?;
        }
    } else {
        for (slot, param) in params.iter_mut().enumerate().take(MAX_PARAM_COUNT) {
            if let Some(raw) = map.get(&format!("Param{slot}")) {
                *param = PropertyParam(expect_handle(label, raw)?);
            }
        }
    }

    Ok(PropertyId::with_params(property, params))
}

/// `{ PropertyName: value }` or `{ PropertyName: [param..., value] }`.
///
/// An entry that fails to parse is skipped with a warning.
fn parse_properties(db: &GameDatabase, json: &Value) -> Result<PropertyCollection, PatchError> {
    let map = json
        .as_object()
        .ok_or_else(|| ValueParseError::new(ValueKind::Properties.as_str(), json, "expected an object"))?;

    let mut properties = PropertyCollection::new();
    for (name, value) in map {
        match parse_property_entry(db, name, value) {
            Ok((id, value)) => properties.set_property(value, id),
            Err(err) => warn!(property = %name, %err, "failed to parse property, skipping"),
        }
    }
    Ok(properties)
}

fn parse_property_entry(db: &GameDatabase, name: &str, json: &Value) -> Result<(PropertyId, PropertyValue), PatchError> {
    let label = ValueKind::Properties.as_str();
    let property = db
        .properties
        .enum_by_name(name)
        .ok_or_else(|| ValueParseError::new(label, json, format!("unknown property '{name}'")))?;
    let Some(info) = db.properties.lookup(property) else {
        return Err(ValueParseError::new(label, json, format!("unknown property '{name}'")).into());
    };

    let mut params = info.default_params;
    let mut payload = json;
    if info.param_count() > 0 {
        if let Some(list) = json.as_array() {
            let (last, leading) = list
                .split_last()
                .ok_or_else(|| ValueParseError::new(label, json, "empty parameter list"))?;
            for (slot, (param, ty)) in leading.iter().zip(&info.param_types).enumerate() {
                params[slot] = parse_param(db, *ty, param)?;
            }
            payload = last;
        }
    }

    let value = match info.data_type {
        PropertyDataType::Integer => PropertyValue::Integer(expect_i64(label, payload)?),
        PropertyDataType::Real => PropertyValue::Real(expect_f32(label, payload)?),
        PropertyDataType::Boolean => PropertyValue::Boolean(expect_bool(label, payload)?),
        PropertyDataType::Prototype => PropertyValue::Prototype(resolve_prototype_ref(db, label, payload)?),
        PropertyDataType::Asset => PropertyValue::Asset(resolve_asset_ref(db, label, payload)?),
    };
    Ok((PropertyId::with_params(property, params), value))
}

fn parse_param(db: &GameDatabase, ty: PropertyParamType, json: &Value) -> Result<PropertyParam, PatchError> {
    let label = "PropertyParam";
    let param = match ty {
        PropertyParamType::Integer => PropertyParam(expect_handle(label, json)?),
        PropertyParamType::Prototype => PropertyParam(resolve_prototype_ref(db, label, json)?.0),
        PropertyParamType::Asset => PropertyParam(resolve_asset_ref(db, label, json)?.0),
    };
    Ok(param)
}

// ── References ────────────────────────────────────────────────────────────

/// A prototype id given as an integer or a symbolic prototype name.
fn resolve_prototype_ref(db: &GameDatabase, label: &str, json: &Value) -> Result<PrototypeId, PatchError> {
    if let Some(name) = json.as_str() {
        return db
            .prototypes
            .resolve_name(name)
            .ok_or_else(|| ValueParseError::new(label, json, format!("unknown prototype '{name}'")).into());
    }
    Ok(PrototypeId(expect_handle(label, json)?))
}

/// An asset id given as an integer or a `"Name (TypeName)"` reference.
fn resolve_asset_ref(db: &GameDatabase, label: &str, json: &Value) -> Result<AssetId, PatchError> {
    if let Some(reference) = json.as_str() {
        return db
            .assets
            .resolve_reference(reference)
            .map_err(|err| ValueParseError::new(label, json, err.to_string()).into());
    }
    Ok(AssetId(expect_handle(label, json)?))
}

// ── Primitives ────────────────────────────────────────────────────────────

fn expect_str<'a>(label: &str, json: &'a Value) -> Result<&'a str, ValueParseError> {
    json.as_str()
        .ok_or_else(|| ValueParseError::new(label, json, "expected a string"))
}

fn expect_bool(label: &str, json: &Value) -> Result<bool, ValueParseError> {
    json.as_bool()
        .ok_or_else(|| ValueParseError::new(label, json, "expected a boolean"))
}

fn expect_f64(label: &str, json: &Value) -> Result<f64, ValueParseError> {
    json.as_f64()
        .ok_or_else(|| ValueParseError::new(label, json, "expected a number"))
}

fn expect_f32(label: &str, json: &Value) -> Result<f32, ValueParseError> {
    let value = expect_f64(label, json)?;
    if value.abs() > f64::from(f32::MAX) {
        return Err(ValueParseError::new(label, json, "out of range for a 32-bit float"));
    }
    Ok(value as f32)
}

fn expect_i64(label: &str, json: &Value) -> Result<i64, ValueParseError> {
    if let Some(value) = json.as_i64() {
        return Ok(value);
    }
    let reason = if json.is_number() {
        "expected an integer in 64-bit range"
    } else {
        "expected an integer"
    };
    Err(ValueParseError::new(label, json, reason))
}

fn expect_i32(label: &str, json: &Value) -> Result<i32, ValueParseError> {
    let value = expect_i64(label, json)?;
    i32::try_from(value).map_err(|_| ValueParseError::new(label, json, "out of range for a 32-bit integer"))
}

/// Opaque 64-bit handle: a non-negative integer.
fn expect_handle(label: &str, json: &Value) -> Result<u64, ValueParseError> {
    json.as_u64()
        .ok_or_else(|| ValueParseError::new(label, json, "expected a non-negative integer"))
}

fn expect_enum_literal(label: &str, json: &Value) -> Result<EnumLiteral, ValueParseError> {
    match json {
        Value::String(name) => Ok(EnumLiteral::Name(name.clone())),
        Value::Number(_) => Ok(EnumLiteral::Ordinal(expect_i32(label, json)?)),
        _ => Err(ValueParseError::new(label, json, "expected an enum name or ordinal")),
    }
}

fn expect_vector3(label: &str, json: &Value) -> Result<Vector3, ValueParseError> {
    let Some([x, y, z]) = json.as_array().map(Vec::as_slice).and_then(|items| <&[Value; 3]>::try_from(items).ok())
    else {
        return Err(ValueParseError::new(label, json, "expected an array of 3 numbers"));
    };
    Ok(Vector3::new(
        expect_f32(label, x)?,
        expect_f32(label, y)?,
        expect_f32(label, z)?,
    ))
}

fn expect_object<'a>(label: &str, json: &'a Value) -> Result<&'a Map<String, Value>, ValueParseError> {
    json.as_object()
        .ok_or_else(|| ValueParseError::new(label, json, "expected an object"))
}

// ── Shape checks ──────────────────────────────────────────────────────────

/// Validate the JSON shape of a payload declared as `kind` without a game
/// database. Names of prototypes, assets, classes and properties are not
/// resolved.
pub fn check_shape(kind: ValueKind, json: &Value) -> Result<(), ValueParseError> {
    let label = kind.as_str();
    match kind {
        ValueKind::String if json.is_null() => Ok(()),
        ValueKind::String => expect_str(label, json).map(drop),
        ValueKind::Boolean => expect_bool(label, json).map(drop),
        ValueKind::Float => expect_f32(label, json).map(drop),
        ValueKind::Double => expect_f64(label, json).map(drop),
        ValueKind::Integer => expect_i32(label, json).map(drop),
        ValueKind::Enum => expect_enum_literal(label, json).map(drop),
        ValueKind::PrototypeGuid | ValueKind::LocaleStringId => expect_handle(label, json).map(drop),
        ValueKind::PrototypeId | ValueKind::PrototypeDataRef => match json {
            Value::String(_) => Ok(()),
            _ => expect_handle(label, json).map(drop),
        },
        ValueKind::AssetId => match json.as_str() {
            Some(reference) if split_asset_reference(reference).is_some() => Ok(()),
            Some(_) => Err(ValueParseError::new(label, json, "expected 'Name (Type)'")),
            None => expect_handle(label, json).map(drop),
        },
        ValueKind::Vector3 => expect_vector3(label, json).map(drop),
        ValueKind::PropertyId => {
            let map = expect_object(label, json)?;
            if map.contains_key(PARENT_DATA_REF) || map.get(PROPERTY_ENUM).is_some_and(Value::is_string) {
                Ok(())
            } else {
                Err(ValueParseError::new(label, json, format!("missing '{PROPERTY_ENUM}'")))
            }
        }
        ValueKind::Properties => expect_object(label, json).map(drop),
        ValueKind::Prototype | ValueKind::Eval => {
            let map = expect_object(label, json)?;
            if map.contains_key(PARENT_DATA_REF) {
                Ok(())
            } else {
                Err(ValueParseError::new(label, json, format!("missing required '{PARENT_DATA_REF}'")))
            }
        }
        ValueKind::ComplexObject => {
            let map = expect_object(label, json)?;
            if map.contains_key(PARENT_DATA_REF) || map.contains_key(CLASS_NAME) {
                Ok(())
            } else {
                Err(ValueParseError::new(label, json, format!("requires '{PARENT_DATA_REF}' or '{CLASS_NAME}'")))
            }
        }
        _ => match kind.element() {
            Some(element) => {
                let items = json
                    .as_array()
                    .ok_or_else(|| ValueParseError::new(label, json, "expected an array"))?;
                items.iter().try_for_each(|item| check_shape(element, item))
            }
            None => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_data::{PropertyInfo, EVAL_CLASS_NAME};
    use serde_json::json;

    fn database() -> GameDatabase {
        let mut db = GameDatabase::new();
        let shape = db.schemas.define_enum("TargetingShapeType", &["None", "CircleArea", "WedgeArea"]);
        let eval = db.schemas.define_class(EVAL_CLASS_NAME, None, []).unwrap();
        let add = db
            .schemas
            .define_class("AddProtoEval", Some(eval), [("Value", FieldType::Int)])
            .unwrap();
        let context = db
            .schemas
            .define_class(
                "SummonContextPrototype",
                None,
                [
                    ("SummonRadius", FieldType::Float),
                    ("Shape", FieldType::Enum(shape)),
                    ("Offset", FieldType::Vector3),
                    ("Amount", FieldType::Prototype(eval)),
                    ("Stages", FieldType::list(FieldType::Prototype(eval))),
                ],
            )
            .unwrap();
        db.define_prototype("Powers/Contexts/Default", context).unwrap();
        let (_, add_object) = db.define_prototype("Evals/AddOne", add).unwrap();
        db.set(add_object, "Value", FieldValue::Int(1)).unwrap();

        db.properties
            .define(PropertyInfo::new("HealthBase", PropertyDataType::Integer))
            .unwrap();
        db.properties
            .define(
                PropertyInfo::new("DamagePctBonusVsKeyword", PropertyDataType::Real)
                    .with_params(&[PropertyParamType::Prototype]),
            )
            .unwrap();
        db.properties
            .define(
                PropertyInfo::new("PowerRankBonus", PropertyDataType::Integer)
                    .with_params(&[PropertyParamType::Integer]),
            )
            .unwrap();
        db.assets.add_asset("DamageType", "Fire");
        db
    }

    #[test]
    fn test_primitives() {
        let mut db = database();
        assert_eq!(parse_value(&mut db, ValueKind::Float, &json!(5.0)).unwrap(), TypedValue::Float(5.0));
        assert_eq!(parse_value(&mut db, ValueKind::Integer, &json!(-3)).unwrap(), TypedValue::Integer(-3));
        assert_eq!(parse_value(&mut db, ValueKind::String, &json!(null)).unwrap(), TypedValue::Null);
        assert!(parse_value(&mut db, ValueKind::Integer, &json!(1.5)).is_err());
        assert!(parse_value(&mut db, ValueKind::Integer, &json!(3_000_000_000_i64)).is_err());
        assert!(parse_value(&mut db, ValueKind::Float, &json!(1e300)).is_err());
        assert!(parse_value(&mut db, ValueKind::Boolean, &json!("true")).is_err());
        assert!(parse_value(&mut db, ValueKind::PrototypeGuid, &json!(-1)).is_err());
    }

    #[test]
    fn test_references() {
        let mut db = database();
        let default = db.prototypes.resolve_name("Powers/Contexts/Default").unwrap();
        assert_eq!(
            parse_value(&mut db, ValueKind::PrototypeDataRef, &json!("Powers/Contexts/Default")).unwrap(),
            TypedValue::PrototypeId(default)
        );
        assert_eq!(
            parse_value(&mut db, ValueKind::PrototypeId, &json!(77)).unwrap(),
            TypedValue::PrototypeId(PrototypeId(77))
        );
        assert!(parse_value(&mut db, ValueKind::PrototypeId, &json!("Powers/Missing")).is_err());
        assert!(matches!(
            parse_value(&mut db, ValueKind::AssetId, &json!("fire (DamageType)")).unwrap(),
            TypedValue::AssetId(id) if id.is_valid()
        ));
        assert!(parse_value(&mut db, ValueKind::AssetId, &json!("Fire")).is_err());
    }

    #[test]
    fn test_arrays_fail_as_a_whole() {
        let mut db = database();
        assert_eq!(
            parse_value(&mut db, ValueKind::Vector3Array, &json!([[1, 2, 3]])).unwrap(),
            TypedValue::Array(vec![TypedValue::Vector3(Vector3::new(1.0, 2.0, 3.0))])
        );
        assert!(parse_value(&mut db, ValueKind::IntegerArray, &json!([1, "two"])).is_err());
        assert!(parse_value(&mut db, ValueKind::Vector3, &json!([1, 2])).is_err());
    }

    #[test]
    fn test_nested_prototype() {
        let mut db = database();
        let value = json!({
            "ParentDataRef": "Powers/Contexts/Default",
            "SummonRadius": 12.5,
            "Shape": "wedgearea",
            "Offset": [0, 0, 1],
            "Amount": { "ParentDataRef": "Evals/AddOne", "Value": 4 },
            "Unknown": true
        });
        let TypedValue::Prototype(object) = parse_value(&mut db, ValueKind::Prototype, &value).unwrap() else {
            panic!("expected a prototype");
        };
        assert_eq!(db.get(object, "SummonRadius"), Some(&FieldValue::Float(12.5)));
        assert_eq!(db.get(object, "Shape"), Some(&FieldValue::Enum(2)));
        assert_eq!(db.get(object, "Offset"), Some(&FieldValue::Vector3(Vector3::new(0.0, 0.0, 1.0))));
        let amount = db.get(object, "Amount").and_then(FieldValue::as_object).unwrap();
        assert_eq!(db.get(amount, "Value"), Some(&FieldValue::Int(4)));
        assert!(db.object(object).parent_data_ref.is_valid());
    }

    #[test]
    fn test_bad_nested_field_keeps_inherited_value() {
        let mut db = database();
        let value = json!({ "ParentDataRef": "Powers/Contexts/Default", "SummonRadius": "wide" });
        let object = parse_value(&mut db, ValueKind::Prototype, &value).unwrap().as_object().unwrap();
        assert_eq!(db.get(object, "SummonRadius"), Some(&FieldValue::Float(0.0)));
    }

    #[test]
    fn test_object_schema_resolution() {
        let mut db = database();
        assert!(matches!(
            parse_value(&mut db, ValueKind::Prototype, &json!({ "SummonRadius": 1 })),
            Err(PatchError::ValueParse(_))
        ));
        assert!(matches!(
            parse_value(&mut db, ValueKind::ComplexObject, &json!({ "ClassName": "NoSuchPrototype" })),
            Err(PatchError::SchemaResolution(_))
        ));
        assert!(matches!(
            parse_value(&mut db, ValueKind::Prototype, &json!({ "ParentDataRef": 999 })),
            Err(PatchError::SchemaResolution(_))
        ));
        let complex = parse_value(&mut db, ValueKind::ComplexObject, &json!({ "ClassName": "SummonContextPrototype" }));
        assert!(complex.unwrap().as_object().is_some());
    }

    #[test]
    fn test_failed_payload_releases_its_objects() {
        let mut db = database();
        let before = db.objects.len();
        let value = json!([
            { "ParentDataRef": "Powers/Contexts/Default", "SummonRadius": 2.0 },
            { "SummonRadius": 3.0 }
        ]);
        assert!(parse_value(&mut db, ValueKind::PrototypeArray, &value).is_err());
        assert_eq!(db.objects.len(), before);

        let nested_failure = json!({
            "ParentDataRef": "Powers/Contexts/Default",
            "Stages": [{ "ParentDataRef": "Evals/AddOne" }, { "Value": 2 }]
        });
        let object = parse_value(&mut db, ValueKind::Prototype, &nested_failure).unwrap().as_object().unwrap();
        assert_eq!(db.objects.len(), before + 1);
        assert_eq!(object.0 as usize, before);
    }

    #[test]
    fn test_eval_requires_eval_class() {
        let mut db = database();
        assert!(parse_value(&mut db, ValueKind::Eval, &json!({ "ParentDataRef": "Evals/AddOne" })).is_ok());
        assert!(matches!(
            parse_value(&mut db, ValueKind::Eval, &json!({ "ParentDataRef": "Powers/Contexts/Default" })),
            Err(PatchError::ValueParse(_))
        ));
    }

    #[test]
    fn test_property_id() {
        let mut db = database();
        let keyword = db.prototypes.resolve_name("Powers/Contexts/Default").unwrap();
        let damage = db.properties.enum_by_name("DamagePctBonusVsKeyword").unwrap();

        let value = json!({ "PropertyEnum": "damagepctbonusvskeyword", "Params": ["Powers/Contexts/Default"] });
        let TypedValue::PropertyId(id) = parse_value(&mut db, ValueKind::PropertyId, &value).unwrap() else {
            panic!("expected a property id");
        };
        assert_eq!(id.property, damage);
        assert_eq!(id.params[0], PropertyParam(keyword.0));

        let named = json!({ "PropertyEnum": "DamagePctBonusVsKeyword", "Param0": 9 });
        let TypedValue::PropertyId(id) = parse_value(&mut db, ValueKind::PropertyId, &named).unwrap() else {
            panic!("expected a property id");
        };
        assert_eq!(id.params[0], PropertyParam(9));

        assert!(parse_value(&mut db, ValueKind::PropertyId, &json!({ "PropertyEnum": "Nope" })).is_err());
        assert!(parse_value(&mut db, ValueKind::PropertyId, &json!({ "PropertyEnum": "HealthBase", "Params": [1] })).is_err());
    }

    #[test]
    fn test_negative_integer_param_is_rejected() {
        let mut db = database();
        let rank = db.properties.enum_by_name("PowerRankBonus").unwrap();
        let value = json!({ "PropertyEnum": "PowerRankBonus", "Params": [3] });
        let TypedValue::PropertyId(id) = parse_value(&mut db, ValueKind::PropertyId, &value).unwrap() else {
            panic!("expected a property id");
        };
        assert_eq!(id.property, rank);
        assert_eq!(id.params[0], PropertyParam(3));

        let negative = json!({ "PropertyEnum": "PowerRankBonus", "Params": [-1] });
        assert!(matches!(
            parse_value(&mut db, ValueKind::PropertyId, &negative),
            Err(PatchError::ValueParse(_))
        ));

        let TypedValue::Properties(props) =
            parse_value(&mut db, ValueKind::Properties, &json!({ "PowerRankBonus": [-2, 10] })).unwrap()
        else {
            panic!("expected properties");
        };
        assert!(props.is_empty());
    }

    #[test]
    fn test_properties_skip_bad_entries() {
        let mut db = database();
        let value = json!({
            "HealthBase": 500,
            "DamagePctBonusVsKeyword": ["Powers/Contexts/Default", 0.25],
            "NotAProperty": 1
        });
        let TypedValue::Properties(props) = parse_value(&mut db, ValueKind::Properties, &value).unwrap() else {
            panic!("expected properties");
        };
        assert_eq!(props.len(), 2);
        let health = PropertyId::new(db.properties.enum_by_name("HealthBase").unwrap());
        assert_eq!(props.get(&health), Some(&PropertyValue::Integer(500)));
    }

    #[test]
    fn test_check_shape() {
        assert!(check_shape(ValueKind::Float, &json!(2.5)).is_ok());
        assert!(check_shape(ValueKind::PrototypeIdArray, &json!(["Powers/A", 12])).is_ok());
        assert!(check_shape(ValueKind::AssetId, &json!("Fire (DamageType)")).is_ok());
        assert!(check_shape(ValueKind::AssetId, &json!("Fire")).is_err());
        assert!(check_shape(ValueKind::Prototype, &json!({ "Radius": 1 })).is_err());
        assert!(check_shape(ValueKind::ComplexObject, &json!({ "ClassName": "X" })).is_ok());
        assert!(check_shape(ValueKind::IntegerArray, &json!([1, 2.5])).is_err());
    }
}
