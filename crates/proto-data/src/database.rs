//! The game database: allocator and generic field accessor over the object arena.

use crate::assets::AssetDirectory;
use crate::directory::PrototypeDirectory;
use crate::error::DataError;
use crate::graph::{ObjectArena, ObjectHandle, PrototypeObject};
use crate::ids::PrototypeId;
use crate::properties::PropertyInfoTable;
use crate::schema::{ClassId, ClassSchema, FieldType, SchemaRegistry};
use crate::value::FieldValue;

/// A field slot of one object. Only minted by [`GameDatabase::field`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    object: ObjectHandle,
    slot: usize,
}

#[derive(Debug, Default)]
pub struct GameDatabase {
    pub schemas: SchemaRegistry,
    pub objects: ObjectArena,
    pub prototypes: PrototypeDirectory,
    pub assets: AssetDirectory,
    pub properties: PropertyInfoTable,
}

impl GameDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Allocation ────────────────────────────────────────────────────────

    /// Allocate an embedded object of `class` with default slot values.
    pub fn allocate(&mut self, class: ClassId) -> ObjectHandle {
        let fields = self
            .schemas
            .class(class)
            .fields()
            .map(|(_, ty)| FieldValue::default_for(ty))
            .collect();
        self.objects.insert(PrototypeObject {
            class,
            data_ref: PrototypeId::INVALID,
            parent_data_ref: PrototypeId::INVALID,
            fields,
        })
    }

    /// Register a named prototype of `class` and allocate its object.
    pub fn define_prototype(&mut self, name: &str, class: ClassId) -> Result<(PrototypeId, ObjectHandle), DataError> {
        let id = self.prototypes.register(name, class)?;
        let object = self.allocate(class);
        self.objects.get_mut(object).data_ref = id;
        self.prototypes.set_object(id, object);
        Ok((id, object))
    }

    /// Register a named prototype that inherits class and values from `parent`.
    pub fn define_derived_prototype(
        &mut self,
        name: &str,
        parent: PrototypeId,
    ) -> Result<(PrototypeId, ObjectHandle), DataError> {
        let class = self
            .prototypes
            .class_for(parent)
            .ok_or_else(|| DataError::UnknownPrototype(parent.to_string()))?;
        let (id, object) = self.define_prototype(name, class)?;
        self.copy_inherited_fields(object, parent)?;
        Ok((id, object))
    }

    /// Copy every slot shared (same name and type) with the object of prototype `from`.
    pub fn copy_inherited_fields(&mut self, object: ObjectHandle, from: PrototypeId) -> Result<(), DataError> {
        let source = self
            .prototype_object(from)
            .ok_or_else(|| DataError::UnknownPrototype(from.to_string()))?;
        let source_object = self.objects.get(source);
        let source_class = self.schemas.class(source_object.class);
        let target_class = self.schemas.class(self.objects.get(object).class);

        let copies: Vec<(usize, FieldValue)> = target_class
            .fields()
            .enumerate()
            .filter_map(|(slot, (name, ty))| {
                let (source_slot, source_ty) = source_class.field(name)?;
                (source_ty == ty).then(|| (slot, source_object.fields[source_slot].clone()))
            })
            .collect();

        let target = self.objects.get_mut(object);
        for (slot, value) in copies {
            target.fields[slot] = value;
        }
        target.parent_data_ref = from;
        Ok(())
    }

    pub fn class_for(&self, id: PrototypeId) -> Option<ClassId> {
        self.prototypes.class_for(id)
    }

    /// The constructed object of a top-level prototype.
    pub fn prototype_object(&self, id: PrototypeId) -> Option<ObjectHandle> {
        self.prototypes.object_for(id)
    }

    pub fn object(&self, object: ObjectHandle) -> &PrototypeObject {
        self.objects.get(object)
    }

    pub fn class_of(&self, object: ObjectHandle) -> &ClassSchema {
        self.schemas.class(self.objects.get(object).class)
    }

    // ── Field access ──────────────────────────────────────────────────────

    pub fn field(&self, object: ObjectHandle, name: &str) -> Option<FieldRef> {
        self.class_of(object)
            .field(name)
            .map(|(slot, _)| FieldRef { object, slot })
    }

    pub fn field_name(&self, field: FieldRef) -> &str {
        self.class_of(field.object).slot_name(field.slot)
    }

    pub fn field_type(&self, field: FieldRef) -> &FieldType {
        self.class_of(field.object).slot_type(field.slot)
    }

    pub fn is_sequence(&self, field: FieldRef) -> bool {
        self.field_type(field).is_sequence()
    }

    pub fn read(&self, field: FieldRef) -> &FieldValue {
        &self.objects.get(field.object).fields[field.slot]
    }

    /// Write a slot; the value must fit the declared field type.
    pub fn write(&mut self, field: FieldRef, value: FieldValue) -> Result<(), DataError> {
        let ty = self.field_type(field);
        if !self.value_fits(&value, ty) {
            return Err(DataError::TypeMismatch {
                field: self.field_name(field).to_string(),
                expected: self.schemas.type_name(ty),
                value: value.kind_name().to_string(),
            });
        }
        self.objects.get_mut(field.object).fields[field.slot] = value;
        Ok(())
    }

    pub fn get(&self, object: ObjectHandle, name: &str) -> Option<&FieldValue> {
        self.field(object, name).map(|field| self.read(field))
    }

    pub fn set(&mut self, object: ObjectHandle, name: &str, value: FieldValue) -> Result<(), DataError> {
        let field = self.field(object, name).ok_or_else(|| DataError::UnknownField {
            class: self.class_of(object).name.clone(),
            field: name.to_string(),
        })?;
        self.write(field, value)
    }

    /// `Name:Type` for every field of the object, for diagnostics.
    pub fn available_fields(&self, object: ObjectHandle) -> Vec<String> {
        self.class_of(object)
            .fields()
            .map(|(name, ty)| format!("{name}:{}", self.schemas.type_name(ty)))
            .collect()
    }

    /// True if `value` may be stored in a slot declared as `ty`.
    pub fn value_fits(&self, value: &FieldValue, ty: &FieldType) -> bool {
        match (value, ty) {
            (
                FieldValue::Null,
                FieldType::String
                | FieldType::PropertyId
                | FieldType::Properties
                | FieldType::Prototype(_)
                | FieldType::List(_),
            ) => true,
            (FieldValue::Bool(_), FieldType::Bool)
            | (FieldValue::Int(_), FieldType::Int)
            | (FieldValue::Long(_), FieldType::Long)
            | (FieldValue::Float(_), FieldType::Float)
            | (FieldValue::Double(_), FieldType::Double)
            | (FieldValue::String(_), FieldType::String)
            | (FieldValue::Enum(_), FieldType::Enum(_))
            | (FieldValue::PrototypeId(_), FieldType::PrototypeId)
            | (FieldValue::PrototypeGuid(_), FieldType::PrototypeGuid)
            | (FieldValue::LocaleStringId(_), FieldType::LocaleStringId)
            | (FieldValue::AssetId(_), FieldType::AssetId)
            | (FieldValue::Vector3(_), FieldType::Vector3)
            | (FieldValue::PropertyId(_), FieldType::PropertyId)
            | (FieldValue::Properties(_), FieldType::Properties) => true,
            (FieldValue::Object(object), FieldType::Prototype(class)) => {
                self.schemas.is_subclass_of(self.objects.get(*object).class, *class)
            }
            (FieldValue::List(items), FieldType::List(element)) => {
                items.iter().all(|item| self.value_fits(item, element))
            }
            _ => false,
        }
    }
}
