use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),
    #[error("class '{0}' is already defined")]
    DuplicateClass(String),
    #[error("field '{field}' is declared twice on class '{class}'")]
    DuplicateField { class: String, field: String },
    #[error("unknown prototype '{0}'")]
    UnknownPrototype(String),
    #[error("prototype '{0}' is already defined")]
    DuplicatePrototype(String),
    #[error("field '{field}' not found on class '{class}'")]
    UnknownField { class: String, field: String },
    #[error("cannot write {value} into field '{field}' of type {expected}")]
    TypeMismatch { field: String, expected: String, value: String },
    #[error("unknown asset type '{0}'")]
    UnknownAssetType(String),
    #[error("asset '{name}' not found in asset type '{asset_type}'")]
    UnknownAsset { asset_type: String, name: String },
    #[error("malformed asset reference '{0}', expected 'Name (Type)'")]
    MalformedAssetReference(String),
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    #[error("property '{0}' is already defined")]
    DuplicateProperty(String),
}
