//! Asset types and `"Name (TypeName)"` asset references.

use crate::error::DataError;
use crate::ids::AssetId;

#[derive(Debug, Clone)]
pub struct AssetType {
    pub name: String,
    assets: Vec<(String, AssetId)>,
}

impl AssetType {
    pub fn find_asset_by_name(&self, name: &str, case_insensitive: bool) -> Option<AssetId> {
        self.assets
            .iter()
            .find(|(asset, _)| {
                if case_insensitive {
                    asset.eq_ignore_ascii_case(name)
                } else {
                    asset == name
                }
            })
            .map(|(_, id)| *id)
    }
}

#[derive(Debug, Default)]
pub struct AssetDirectory {
    types: Vec<AssetType>,
    next_id: u64,
}

impl AssetDirectory {
    /// Asset type by name, matched case-insensitively.
    pub fn asset_type(&self, name: &str) -> Option<&AssetType> {
        self.types.iter().find(|ty| ty.name.eq_ignore_ascii_case(name))
    }

    /// Add an asset, creating its asset type on first use.
    pub fn add_asset(&mut self, type_name: &str, asset_name: &str) -> AssetId {
        self.next_id += 1;
        let id = AssetId(self.next_id);
        match self.types.iter_mut().find(|ty| ty.name.eq_ignore_ascii_case(type_name)) {
            Some(ty) => ty.assets.push((asset_name.to_string(), id)),
            None => self.types.push(AssetType {
                name: type_name.to_string(),
                assets: vec![(asset_name.to_string(), id)],
            }),
        }
        id
    }

    pub fn asset_name(&self, id: AssetId) -> Option<&str> {
        self.types
            .iter()
            .flat_map(|ty| ty.assets.iter())
            .find(|(_, asset)| *asset == id)
            .map(|(name, _)| name.as_str())
    }

    /// Resolve a `"Name (TypeName)"` reference; asset names match case-insensitively.
    pub fn resolve_reference(&self, reference: &str) -> Result<AssetId, DataError> {
        let (name, type_name) = split_asset_reference(reference)
            .ok_or_else(|| DataError::MalformedAssetReference(reference.to_string()))?;
        let ty = self
            .asset_type(type_name)
            .ok_or_else(|| DataError::UnknownAssetType(type_name.to_string()))?;
        ty.find_asset_by_name(name, true).ok_or_else(|| DataError::UnknownAsset {
            asset_type: ty.name.clone(),
            name: name.to_string(),
        })
    }
}

/// Split `"Name (TypeName)"` into its trimmed, non-empty parts.
pub fn split_asset_reference(reference: &str) -> Option<(&str, &str)> {
    let open = reference.rfind('(')?;
    let close = reference.rfind(')')?;
    if close <= open {
        return None;
    }
    let name = reference[..open].trim();
    let type_name = reference[open + 1..close].trim();
    if name.is_empty() || type_name.is_empty() {
        return None;
    }
    Some((name, type_name))
}
