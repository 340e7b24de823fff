//! Arena of prototype objects.
//!
//! Objects are addressed by [`ObjectHandle`]; two handles are the same
//! object iff they are equal, which is what identity-keyed side tables rely on.

use std::fmt;

use crate::ids::PrototypeId;
use crate::schema::ClassId;
use crate::value::FieldValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u32);

impl fmt::Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct PrototypeObject {
    pub class: ClassId,
    /// Id of the prototype this object is; invalid for embedded objects.
    pub data_ref: PrototypeId,
    /// Prototype this object's values were inherited from.
    pub parent_data_ref: PrototypeId,
    /// One slot per entry of the class field table.
    pub fields: Vec<FieldValue>,
}

#[derive(Debug, Default)]
pub struct ObjectArena {
    objects: Vec<PrototypeObject>,
}

impl ObjectArena {
    pub fn insert(&mut self, object: PrototypeObject) -> ObjectHandle {
        let handle = ObjectHandle(self.objects.len() as u32);
        self.objects.push(object);
        handle
    }

    /// Handles are only minted by this arena, so lookup cannot miss.
    pub fn get(&self, handle: ObjectHandle) -> &PrototypeObject {
        &self.objects[handle.0 as usize]
    }

    pub fn get_mut(&mut self, handle: ObjectHandle) -> &mut PrototypeObject {
        &mut self.objects[handle.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Drop every object allocated at or after `len`, as returned by an
    /// earlier [`len`](Self::len). Handles to dropped objects must not be used.
    pub fn truncate(&mut self, len: usize) {
        self.objects.truncate(len);
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
