use proto_data::{
    construct_prototype, post_process, ConstructionHooks, DataError, FieldType, FieldValue, GameDatabase,
    NoHooks, ObjectHandle, PropertyCollection, PrototypeId,
};

/// Records the walk as `(event, object)` pairs; accepts every prototype in `accept`.
#[derive(Default)]
struct Trace {
    accept: Vec<PrototypeId>,
    registered: Vec<(ObjectHandle, String, Option<usize>)>,
    exited: Vec<ObjectHandle>,
}

impl ConstructionHooks for Trace {
    fn properties_override(&mut self, _id: PrototypeId) -> Option<PropertyCollection> {
        None
    }

    fn enter(&mut self, id: PrototypeId) -> bool {
        self.accept.contains(&id)
    }

    fn register_path(
        &mut self,
        _db: &GameDatabase,
        parent: ObjectHandle,
        _child: Option<ObjectHandle>,
        field: &str,
        index: Option<usize>,
    ) {
        self.registered.push((parent, field.to_string(), index));
    }

    fn exit(&mut self, _db: &mut GameDatabase, object: ObjectHandle) {
        self.exited.push(object);
    }
}

struct World {
    db: GameDatabase,
    summon: PrototypeId,
    root: ObjectHandle,
    shared: PrototypeId,
    shared_object: ObjectHandle,
    first: ObjectHandle,
    first_bounds: ObjectHandle,
}

fn world() -> World {
    let mut db = GameDatabase::new();
    let bounds = db
        .schemas
        .define_class("BoundsPrototype", None, [("Radius", FieldType::Float)])
        .unwrap();
    let context = db
        .schemas
        .define_class("SummonContextPrototype", None, [("Bounds", FieldType::Prototype(bounds))])
        .unwrap();
    let power = db
        .schemas
        .define_class(
            "SummonPowerPrototype",
            None,
            [
                ("Context", FieldType::Prototype(context)),
                ("Contexts", FieldType::list(FieldType::Prototype(context))),
            ],
        )
        .unwrap();

    let (shared, shared_object) = db.define_prototype("Contexts/Shared", context).unwrap();
    let (summon, root) = db.define_prototype("Powers/Summon", power).unwrap();
    let first = db.allocate(context);
    let first_bounds = db.allocate(bounds);
    db.set(first, "Bounds", FieldValue::Object(first_bounds)).unwrap();
    db.set(root, "Context", FieldValue::Object(shared_object)).unwrap();
    db.set(root, "Contexts", FieldValue::List(vec![FieldValue::Object(first)])).unwrap();

    World { db, summon, root, shared, shared_object, first, first_bounds }
}

#[test]
fn children_exit_before_parents() {
    let mut w = world();
    let mut trace = Trace { accept: vec![w.summon], ..Default::default() };
    construct_prototype(&mut w.db, w.summon, &mut trace).unwrap();

    assert_eq!(trace.exited, vec![w.shared_object, w.first_bounds, w.first, w.root]);
    assert_eq!(
        trace.registered,
        vec![
            (w.root, "Context".to_string(), None),
            (w.shared_object, "Bounds".to_string(), None),
            (w.root, "Contexts".to_string(), Some(0)),
            (w.first, "Bounds".to_string(), None),
        ]
    );
}

#[test]
fn declined_subtree_is_invisible() {
    let mut w = world();
    let mut trace = Trace { accept: vec![w.shared], ..Default::default() };
    post_process(&mut w.db, w.root, &mut trace);

    // Only the accepted nested prototype is tracked.
    assert_eq!(trace.exited, vec![w.shared_object]);
    assert_eq!(trace.registered, vec![(w.shared_object, "Bounds".to_string(), None)]);
}

#[test]
fn construction_without_hooks() {
    let mut w = world();
    assert_eq!(construct_prototype(&mut w.db, w.summon, &mut NoHooks).unwrap(), w.root);
    assert!(matches!(
        construct_prototype(&mut w.db, PrototypeId(99), &mut NoHooks),
        Err(DataError::UnknownPrototype(_))
    ));
}

#[test]
fn directory_ids_and_guids() {
    let w = world();
    assert_eq!(w.db.prototypes.len(), 2);
    assert_eq!(w.db.prototypes.identifier_to_name(w.summon), Some("Powers/Summon"));
    assert_eq!(w.db.prototypes.display_name(PrototypeId(99)), "99");
    let record = w.db.prototypes.record(w.shared).unwrap();
    assert_eq!(record.guid.0 & !(1 << 63), record.id.0);
    assert_eq!(record.object, Some(w.shared_object));
}
