//! proto-data: the game-data side of prototype patching.
//!
//! Holds everything the patch engine treats as an external collaborator:
//! prototype ids and the name directory, class schemas with their field
//! tables, the object arena the construction pipeline fills, asset and
//! property lookups, and the depth-first construction walker that calls
//! into [`ConstructionHooks`].

pub mod assets;
pub mod construction;
pub mod database;
pub mod directory;
pub mod error;
pub mod graph;
pub mod ids;
pub mod properties;
pub mod schema;
pub mod value;

pub use assets::{split_asset_reference, AssetDirectory, AssetType};
pub use construction::{construct_prototype, post_process, ConstructionHooks, NoHooks, PROPERTIES_FIELD};
pub use database::{FieldRef, GameDatabase};
pub use directory::{PrototypeDirectory, PrototypeRecord};
pub use error::DataError;
pub use graph::{ObjectArena, ObjectHandle, PrototypeObject};
pub use ids::{AssetId, LocaleStringId, PrototypeGuid, PrototypeId};
pub use properties::{
    PropertyCollection, PropertyDataType, PropertyEnum, PropertyId, PropertyInfo, PropertyInfoTable,
    PropertyParam, PropertyParamType, PropertyValue, MAX_PARAM_COUNT,
};
pub use schema::{ClassId, ClassSchema, EnumId, EnumSchema, FieldType, SchemaRegistry, EVAL_CLASS_NAME};
pub use value::{FieldValue, Vector3};
