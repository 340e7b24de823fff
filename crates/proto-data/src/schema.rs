//! Class and enum schemas.
//!
//! A class's field table is flattened once, when the class is defined:
//! the parent's fields come first, in their declared order, followed by the
//! class's own. Objects store one slot per table entry, so a field's
//! position in the table is its slot index.

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use crate::error::DataError;

/// Root of the eval class family.
pub const EVAL_CLASS_NAME: &str = "EvalPrototype";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(pub u32);

/// Declared type of a prototype field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Long,
    Float,
    Double,
    String,
    Enum(EnumId),
    PrototypeId,
    PrototypeGuid,
    LocaleStringId,
    AssetId,
    Vector3,
    PropertyId,
    Properties,
    /// An embedded or referenced prototype of the given class (or a subclass).
    Prototype(ClassId),
    List(Box<FieldType>),
}

impl FieldType {
    pub fn list(element: FieldType) -> Self {
        FieldType::List(Box::new(element))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, FieldType::List(_))
    }

    /// Element type of a sequence field.
    pub fn element(&self) -> Option<&FieldType> {
        match self {
            FieldType::List(element) => Some(element),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClassSchema {
    pub id: ClassId,
    pub name: String,
    pub parent: Option<ClassId>,
    fields: IndexMap<String, FieldType>,
}

impl ClassSchema {
    /// Slot index and type of a field, matched case-sensitively.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldType)> {
        self.fields.get_full(name).map(|(slot, _, ty)| (slot, ty))
    }

    pub fn field_at(&self, slot: usize) -> Option<(&str, &FieldType)> {
        self.fields.get_index(slot).map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn slot_name(&self, slot: usize) -> &str {
        self.fields.get_index(slot).map(|(name, _)| name.as_str()).unwrap_or_default()
    }

    pub fn slot_type(&self, slot: usize) -> &FieldType {
        &self.fields[slot]
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone)]
pub struct EnumSchema {
    pub id: EnumId,
    pub name: String,
    variants: IndexMap<String, i32>,
}

impl EnumSchema {
    /// Ordinal of a variant, matched case-insensitively.
    pub fn ordinal_of(&self, name: &str) -> Option<i32> {
        self.variants
            .iter()
            .find(|(variant, _)| variant.eq_ignore_ascii_case(name))
            .map(|(_, ordinal)| *ordinal)
    }

    pub fn name_of(&self, ordinal: i32) -> Option<&str> {
        self.variants
            .iter()
            .find(|(_, value)| **value == ordinal)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_defined(&self, ordinal: i32) -> bool {
        self.name_of(ordinal).is_some()
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }
}

/// Registration table of every class and enum known to the game data.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    classes: Vec<ClassSchema>,
    class_names: HashMap<String, ClassId>,
    enums: Vec<EnumSchema>,
    enum_names: HashMap<String, EnumId>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a class, inheriting every field of `parent`.
    pub fn define_class<'a>(
        &mut self,
        name: &str,
        parent: Option<ClassId>,
        own_fields: impl IntoIterator<Item = (&'a str, FieldType)>,
    ) -> Result<ClassId, DataError> {
        if self.class_names.contains_key(name) {
            return Err(DataError::DuplicateClass(name.to_string()));
        }

        let mut fields = match parent {
            Some(parent) => self.class(parent).fields.clone(),
            None => IndexMap::new(),
        };
        for (field, ty) in own_fields {
            if fields.insert(field.to_string(), ty).is_some() {
                return Err(DataError::DuplicateField {
                    class: name.to_string(),
                    field: field.to_string(),
                });
            }
        }

        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassSchema { id, name: name.to_string(), parent, fields });
        self.class_names.insert(name.to_string(), id);
        Ok(id)
    }

    /// Define an enum whose variants take ordinals in declaration order.
    pub fn define_enum(&mut self, name: &str, variants: &[&str]) -> EnumId {
        let id = EnumId(self.enums.len() as u32);
        let variants = variants
            .iter()
            .enumerate()
            .map(|(ordinal, variant)| (variant.to_string(), ordinal as i32))
            .collect();
        self.enums.push(EnumSchema { id, name: name.to_string(), variants });
        self.enum_names.insert(name.to_string(), id);
        id
    }

    /// Class ids are only minted by this registry, so lookup cannot miss.
    pub fn class(&self, id: ClassId) -> &ClassSchema {
        &self.classes[id.0 as usize]
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassId> {
        self.class_names.get(name).copied()
    }

    pub fn enum_schema(&self, id: EnumId) -> &EnumSchema {
        &self.enums[id.0 as usize]
    }

    pub fn enum_by_name(&self, name: &str) -> Option<EnumId> {
        self.enum_names.get(name).copied()
    }

    /// True if `class` is `base` or derives from it.
    pub fn is_subclass_of(&self, class: ClassId, base: ClassId) -> bool {
        let mut current = Some(class);
        while let Some(id) = current {
            if id == base {
                return true;
            }
            current = self.class(id).parent;
        }
        false
    }

    pub fn is_eval_class(&self, class: ClassId) -> bool {
        self.class_by_name(EVAL_CLASS_NAME)
            .is_some_and(|eval| self.is_subclass_of(class, eval))
    }

    /// Human-readable type name for diagnostics.
    pub fn type_name(&self, ty: &FieldType) -> String {
        TypeName { registry: self, ty }.to_string()
    }
}

struct TypeName<'a> {
    registry: &'a SchemaRegistry,
    ty: &'a FieldType,
}

impl fmt::Display for TypeName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            FieldType::Bool => f.write_str("bool"),
            FieldType::Int => f.write_str("int"),
            FieldType::Long => f.write_str("long"),
            FieldType::Float => f.write_str("float"),
            FieldType::Double => f.write_str("double"),
            FieldType::String => f.write_str("string"),
            FieldType::Enum(id) => f.write_str(&self.registry.enum_schema(*id).name),
            FieldType::PrototypeId => f.write_str("PrototypeId"),
            FieldType::PrototypeGuid => f.write_str("PrototypeGuid"),
            FieldType::LocaleStringId => f.write_str("LocaleStringId"),
            FieldType::AssetId => f.write_str("AssetId"),
            FieldType::Vector3 => f.write_str("Vector3"),
            FieldType::PropertyId => f.write_str("PropertyId"),
            FieldType::Properties => f.write_str("PropertyCollection"),
            FieldType::Prototype(class) => f.write_str(&self.registry.class(*class).name),
            FieldType::List(element) => {
                write!(f, "{}[]", TypeName { registry: self.registry, ty: element })
            }
        }
    }
}
