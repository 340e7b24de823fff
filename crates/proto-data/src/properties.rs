//! Property descriptors and property collections.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::DataError;
use crate::ids::{AssetId, PrototypeId};

/// Maximum number of parameters a property id carries.
pub const MAX_PARAM_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyEnum(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PropertyParam(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyDataType {
    Integer,
    Real,
    Boolean,
    Prototype,
    Asset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyParamType {
    Integer,
    Prototype,
    Asset,
}

#[derive(Debug, Clone)]
pub struct PropertyInfo {
    pub name: String,
    pub data_type: PropertyDataType,
    pub param_types: Vec<PropertyParamType>,
    pub default_params: [PropertyParam; MAX_PARAM_COUNT],
    /// Prototype backing this property, if any.
    pub prototype: PrototypeId,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, data_type: PropertyDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            param_types: Vec::new(),
            default_params: [PropertyParam::default(); MAX_PARAM_COUNT],
            prototype: PrototypeId::INVALID,
        }
    }

    pub fn with_params(mut self, param_types: &[PropertyParamType]) -> Self {
        self.param_types = param_types.iter().take(MAX_PARAM_COUNT).copied().collect();
        self
    }

    pub fn with_prototype(mut self, prototype: PrototypeId) -> Self {
        self.prototype = prototype;
        self
    }

    pub fn param_count(&self) -> usize {
        self.param_types.len()
    }
}

#[derive(Debug, Default)]
pub struct PropertyInfoTable {
    infos: Vec<PropertyInfo>,
    by_name: HashMap<String, PropertyEnum>,
    by_prototype: HashMap<PrototypeId, PropertyEnum>,
}

impl PropertyInfoTable {
    pub fn define(&mut self, info: PropertyInfo) -> Result<PropertyEnum, DataError> {
        let key = info.name.to_ascii_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(DataError::DuplicateProperty(info.name));
        }
        let id = PropertyEnum(self.infos.len() as u16);
        if info.prototype.is_valid() {
            self.by_prototype.insert(info.prototype, id);
        }
        self.by_name.insert(key, id);
        self.infos.push(info);
        Ok(id)
    }

    pub fn lookup(&self, property: PropertyEnum) -> Option<&PropertyInfo> {
        self.infos.get(property.0 as usize)
    }

    /// Property enum by name, matched case-insensitively.
    pub fn enum_by_name(&self, name: &str) -> Option<PropertyEnum> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn enum_from_prototype(&self, prototype: PrototypeId) -> Option<PropertyEnum> {
        self.by_prototype.get(&prototype).copied()
    }
}

/// A property key: the property enum plus its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyId {
    pub property: PropertyEnum,
    pub params: [PropertyParam; MAX_PARAM_COUNT],
}

impl PropertyId {
    pub fn new(property: PropertyEnum) -> Self {
        Self { property, params: [PropertyParam::default(); MAX_PARAM_COUNT] }
    }

    pub fn with_params(property: PropertyEnum, params: [PropertyParam; MAX_PARAM_COUNT]) -> Self {
        Self { property, params }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    Real(f32),
    Boolean(bool),
    Prototype(PrototypeId),
    Asset(AssetId),
}

/// Insertion-ordered set of property values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyCollection {
    values: IndexMap<PropertyId, PropertyValue>,
}

impl PropertyCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_property(&mut self, value: PropertyValue, id: PropertyId) {
        self.values.insert(id, value);
    }

    pub fn get(&self, id: &PropertyId) -> Option<&PropertyValue> {
        self.values.get(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyId, &PropertyValue)> {
        self.values.iter()
    }
}
