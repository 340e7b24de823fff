use std::fs;
use std::path::Path;

use proto_data::{
    construct_prototype, FieldType, FieldValue, GameDatabase, ObjectHandle, PropertyDataType, PropertyInfo,
    PrototypeId, PROPERTIES_FIELD,
};
use proto_patch::PatchManager;
use serde_json::Value;

pub const CONTEXT_COUNT: usize = 3;

/// A summon power with embedded contexts, plus the prototypes directives refer to.
///
/// ```text
/// Powers/Summon : SummonPowerPrototype
///   Properties, Radius, Shape, Keywords
///   Context   -> Contexts/Shared (a top-level prototype) -> Bounds
///   Contexts  -> [context -> Bounds] x 3
/// ```
pub struct SummonWorld {
    pub db: GameDatabase,
    pub summon: PrototypeId,
    pub root: ObjectHandle,
    pub shared: PrototypeId,
    pub shared_object: ObjectHandle,
    pub contexts: Vec<ObjectHandle>,
}

impl SummonWorld {
    pub fn id(&self, name: &str) -> PrototypeId {
        self.db.prototypes.resolve_name(name).unwrap()
    }

    pub fn get(&self, object: ObjectHandle, field: &str) -> &FieldValue {
        self.db.get(object, field).unwrap()
    }

    pub fn object_at(&self, object: ObjectHandle, field: &str) -> ObjectHandle {
        self.get(object, field).as_object().unwrap()
    }

    /// Run the construction walk for `Powers/Summon` with `manager` as the hooks.
    pub fn construct(&mut self, manager: &mut PatchManager) -> ObjectHandle {
        construct_prototype(&mut self.db, self.summon, manager).unwrap()
    }

    pub fn manager(&mut self, records: Value) -> PatchManager {
        let mut manager = PatchManager::new();
        manager.load_source("PatchDataTest.json", &records.to_string(), &mut self.db);
        manager
    }
}

pub fn summon_world() -> SummonWorld {
    let mut db = GameDatabase::new();
    let shape = db
        .schemas
        .define_enum("TargetingShapeType", &["None", "CircleArea", "WedgeArea"]);
    db.properties
        .define(PropertyInfo::new("Health", PropertyDataType::Integer))
        .unwrap();

    let keyword = db
        .schemas
        .define_class("KeywordPrototype", None, [("Hidden", FieldType::Bool)])
        .unwrap();
    let entity = db
        .schemas
        .define_class("AgentPrototype", None, [("Level", FieldType::Int)])
        .unwrap();
    let bounds = db
        .schemas
        .define_class("BoundsPrototype", None, [("Radius", FieldType::Float)])
        .unwrap();
    let context = db
        .schemas
        .define_class(
            "SummonContextPrototype",
            None,
            [
                ("SummonEntity", FieldType::PrototypeId),
                ("SummonRadius", FieldType::Float),
                ("Bounds", FieldType::Prototype(bounds)),
            ],
        )
        .unwrap();
    let power = db
        .schemas
        .define_class(
            "SummonPowerPrototype",
            None,
            [
                (PROPERTIES_FIELD, FieldType::Properties),
                ("Radius", FieldType::Float),
                ("Shape", FieldType::Enum(shape)),
                ("Keywords", FieldType::list(FieldType::PrototypeId)),
                ("Context", FieldType::Prototype(context)),
                ("Contexts", FieldType::list(FieldType::Prototype(context))),
            ],
        )
        .unwrap();

    for name in ["Keywords/Summon", "Keywords/Pet", "Keywords/Ranged"] {
        db.define_prototype(name, keyword).unwrap();
    }
    for name in ["Entities/Wolf", "Entities/Bear"] {
        db.define_prototype(name, entity).unwrap();
    }

    let (shared, shared_object) = db.define_prototype("Contexts/Shared", context).unwrap();
    let shared_bounds = db.allocate(bounds);
    db.set(shared_object, "Bounds", FieldValue::Object(shared_bounds)).unwrap();
    db.set(shared_object, "SummonRadius", FieldValue::Float(4.0)).unwrap();

    let (summon, root) = db.define_prototype("Powers/Summon", power).unwrap();

    let mut contexts = Vec::with_capacity(CONTEXT_COUNT);
    for i in 0..CONTEXT_COUNT {
        let object = db.allocate(context);
        let object_bounds = db.allocate(bounds);
        db.set(object, "Bounds", FieldValue::Object(object_bounds)).unwrap();
        db.set(object, "SummonRadius", FieldValue::Float(i as f32 + 1.0)).unwrap();
        contexts.push(object);
    }
    db.set(root, "Radius", FieldValue::Float(2.0)).unwrap();
    db.set(root, "Context", FieldValue::Object(shared_object)).unwrap();
    db.set(
        root,
        "Contexts",
        FieldValue::List(contexts.iter().map(|c| FieldValue::Object(*c)).collect()),
    )
    .unwrap();

    SummonWorld {
        db,
        summon,
        root,
        shared,
        shared_object,
        contexts,
    }
}

pub fn write_directives(dir: &Path, file: &str, records: &Value) {
    fs::write(dir.join(file), serde_json::to_string_pretty(records).unwrap()).unwrap();
}
