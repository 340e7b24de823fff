//! Prototype name directory.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::DataError;
use crate::graph::ObjectHandle;
use crate::ids::{PrototypeGuid, PrototypeId};
use crate::schema::ClassId;

#[derive(Debug, Clone)]
pub struct PrototypeRecord {
    pub id: PrototypeId,
    pub guid: PrototypeGuid,
    pub name: String,
    pub class: ClassId,
    /// The constructed object, once allocated.
    pub object: Option<ObjectHandle>,
}

/// Maps symbolic prototype names to ids, and ids to class and object.
#[derive(Debug, Default)]
pub struct PrototypeDirectory {
    records: IndexMap<PrototypeId, PrototypeRecord>,
    by_name: HashMap<String, PrototypeId>,
}

impl PrototypeDirectory {
    pub fn register(&mut self, name: &str, class: ClassId) -> Result<PrototypeId, DataError> {
        if self.by_name.contains_key(name) {
            return Err(DataError::DuplicatePrototype(name.to_string()));
        }
        let ordinal = self.records.len() as u64 + 1;
        let id = PrototypeId(ordinal);
        let record = PrototypeRecord {
            id,
            guid: PrototypeGuid(ordinal | (1 << 63)),
            name: name.to_string(),
            class,
            object: None,
        };
        self.records.insert(id, record);
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn resolve_name(&self, name: &str) -> Option<PrototypeId> {
        self.by_name.get(name).copied()
    }

    pub fn identifier_to_name(&self, id: PrototypeId) -> Option<&str> {
        self.records.get(&id).map(|record| record.name.as_str())
    }

    /// Name for log lines; falls back to the numeric id.
    pub fn display_name(&self, id: PrototypeId) -> String {
        match self.identifier_to_name(id) {
            Some(name) => name.to_string(),
            None => id.to_string(),
        }
    }

    pub fn record(&self, id: PrototypeId) -> Option<&PrototypeRecord> {
        self.records.get(&id)
    }

    pub fn class_for(&self, id: PrototypeId) -> Option<ClassId> {
        self.records.get(&id).map(|record| record.class)
    }

    pub fn object_for(&self, id: PrototypeId) -> Option<ObjectHandle> {
        self.records.get(&id).and_then(|record| record.object)
    }

    pub fn set_object(&mut self, id: PrototypeId, object: ObjectHandle) {
        if let Some(record) = self.records.get_mut(&id) {
            record.object = Some(object);
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut directory = PrototypeDirectory::default();
        let id = directory.register("Powers/Summon.prototype", ClassId(0)).unwrap();
        assert!(id.is_valid());
        assert_eq!(directory.resolve_name("Powers/Summon.prototype"), Some(id));
        assert_eq!(directory.identifier_to_name(id), Some("Powers/Summon.prototype"));
        assert_eq!(directory.resolve_name("Powers/Missing.prototype"), None);
        assert_eq!(directory.display_name(PrototypeId(999)), "999");
        assert!(directory.register("Powers/Summon.prototype", ClassId(0)).is_err());
    }
}
