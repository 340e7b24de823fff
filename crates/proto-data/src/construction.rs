//! Construction pipeline: the depth-first post-processing walk over a
//! prototype's object graph, and the hook seam a patch engine plugs into.
//!
//! For every object the walker visits it calls [`ConstructionHooks::enter`]
//! (prototypes with a valid data ref only), then, for each embedded
//! prototype found in a `Prototype` field or a `List(Prototype)` element,
//! [`ConstructionHooks::register_path`] followed by a recursive visit, and
//! finally [`ConstructionHooks::exit`]. Children are always fully exited
//! before their parent.
//!
//! An object is *tracked* when its own `enter` returned true or when it was
//! registered under a tracked parent. `register_path` is only called while
//! the parent is tracked and `exit` only for tracked objects, so an engine
//! that declines a prototype sees nothing of its subtree.

use tracing::{debug, trace, warn};

use crate::database::GameDatabase;
use crate::error::DataError;
use crate::graph::ObjectHandle;
use crate::ids::PrototypeId;
use crate::properties::PropertyCollection;
use crate::schema::FieldType;
use crate::value::FieldValue;

/// Field a properties override is injected into.
pub const PROPERTIES_FIELD: &str = "Properties";

pub trait ConstructionHooks {
    /// A whole replacement property collection for `id`, if one is pending.
    fn properties_override(&mut self, id: PrototypeId) -> Option<PropertyCollection>;

    /// Called before the walker descends into the prototype `id`.
    fn enter(&mut self, id: PrototypeId) -> bool;

    /// Called for each embedded child discovered under a tracked parent.
    /// `child` is `None` when the slot holds no object.
    fn register_path(
        &mut self,
        db: &GameDatabase,
        parent: ObjectHandle,
        child: Option<ObjectHandle>,
        field: &str,
        index: Option<usize>,
    );

    /// Called after every child of a tracked object has been processed.
    fn exit(&mut self, db: &mut GameDatabase, object: ObjectHandle);
}

/// Hooks that observe nothing; construction without a patch engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl ConstructionHooks for NoHooks {
    fn properties_override(&mut self, _id: PrototypeId) -> Option<PropertyCollection> {
        None
    }

    fn enter(&mut self, _id: PrototypeId) -> bool {
        false
    }

    fn register_path(
        &mut self,
        _db: &GameDatabase,
        _parent: ObjectHandle,
        _child: Option<ObjectHandle>,
        _field: &str,
        _index: Option<usize>,
    ) {
    }

    fn exit(&mut self, _db: &mut GameDatabase, _object: ObjectHandle) {}
}

/// Finish construction of the top-level prototype `id`.
///
/// Injects a properties override into the root's [`PROPERTIES_FIELD`] when
/// the hooks offer one, then runs [`post_process`] over the root's graph.
pub fn construct_prototype<H>(db: &mut GameDatabase, id: PrototypeId, hooks: &mut H) -> Result<ObjectHandle, DataError>
where
    H: ConstructionHooks + ?Sized,
{
    let object = db
        .prototype_object(id)
        .ok_or_else(|| DataError::UnknownPrototype(db.prototypes.display_name(id)))?;

    if let Some(properties) = hooks.properties_override(id) {
        match db.field(object, PROPERTIES_FIELD) {
            Some(field) => {
                debug!(prototype = %db.prototypes.display_name(id), count = properties.len(), "injecting properties override");
                db.write(field, FieldValue::Properties(properties))?;
            }
            None => warn!(
                prototype = %db.prototypes.display_name(id),
                "properties override offered for a prototype without a Properties field"
            ),
        }
    }

    post_process(db, object, hooks);
    Ok(object)
}

/// Depth-first post-processing walk rooted at `object`.
pub fn post_process<H>(db: &mut GameDatabase, object: ObjectHandle, hooks: &mut H)
where
    H: ConstructionHooks + ?Sized,
{
    let mut walk = Vec::new();
    visit(db, object, false, hooks, &mut walk);
}

struct Child {
    field: String,
    index: Option<usize>,
    object: Option<ObjectHandle>,
}

fn visit<H>(db: &mut GameDatabase, object: ObjectHandle, registered: bool, hooks: &mut H, walk: &mut Vec<ObjectHandle>)
where
    H: ConstructionHooks + ?Sized,
{
    if walk.contains(&object) {
        trace!(%object, "object already on the walk stack, skipping");
        return;
    }
    walk.push(object);

    let data_ref = db.object(object).data_ref;
    let entered = data_ref.is_valid() && hooks.enter(data_ref);
    let tracked = entered || registered;
    trace!(%object, %data_ref, tracked, "post-processing");

    for child in children(db, object) {
        if tracked {
            hooks.register_path(db, object, child.object, &child.field, child.index);
        }
        if let Some(child_object) = child.object {
            visit(db, child_object, tracked, hooks, walk);
        }
    }

    if tracked {
        hooks.exit(db, object);
    }
    walk.pop();
}

/// Embedded prototypes of `object`, in field-table order.
fn children(db: &GameDatabase, object: ObjectHandle) -> Vec<Child> {
    let class = db.class_of(object);
    let values = &db.object(object).fields;
    let mut found = Vec::new();

    for ((name, ty), value) in class.fields().zip(values) {
        match (ty, value) {
            (FieldType::Prototype(_), FieldValue::Object(child)) => found.push(Child {
                field: name.to_string(),
                index: None,
                object: Some(*child),
            }),
            (FieldType::Prototype(_), _) => found.push(Child {
                field: name.to_string(),
                index: None,
                object: None,
            }),
            (FieldType::List(element), FieldValue::List(items)) if matches!(**element, FieldType::Prototype(_)) => {
                for (index, item) in items.iter().enumerate() {
                    found.push(Child {
                        field: name.to_string(),
                        index: Some(index),
                        object: item.as_object(),
                    });
                }
            }
            _ => {}
        }
    }
    found
}
