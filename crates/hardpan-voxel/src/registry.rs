//! Voxel type registry: maps compact [`VoxelTypeId`] values to [`VoxelTypeDef`] metadata.
//!
//! The registry is built once when the host starts. Air is always ID 0 so that
//! zero-initialized section memory represents empty space. Names are resolved
//! one at a time, so a single bad name in a configuration list only fails that
//! name.

use std::collections::HashMap;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every voxel cell (2 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelTypeId(pub u16);

impl VoxelTypeId {
    /// The empty voxel. Always registered first.
    pub const AIR: VoxelTypeId = VoxelTypeId(0);
}

/// Physical state of a voxel type's material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Matter {
    /// Air and other gases.
    Gas,
    /// Flowing material such as water or lava.
    Liquid,
    /// Everything else.
    Solid,
}

/// Full descriptor for a voxel type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelTypeDef {
    /// Identifier used by configuration files (e.g. "stone", "water").
    pub name: String,
    /// Physical state of the material.
    pub matter: Matter,
}

impl VoxelTypeDef {
    /// Shorthand for a solid.
    pub fn solid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            matter: Matter::Solid,
        }
    }

    /// Shorthand for a liquid.
    pub fn liquid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            matter: Matter::Liquid,
        }
    }
}

/// Errors that can occur during voxel type registration or lookup.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type with the same name has already been registered.
    #[error("duplicate voxel type name: {0}")]
    DuplicateName(String),
    /// All 65 535 user-defined slots have been consumed.
    #[error("voxel type registry is full (max 65536 types)")]
    RegistryFull,
    /// No type is registered under this name.
    #[error("unknown voxel type: {0:?}")]
    UnknownName(String),
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`VoxelTypeId`] → [`VoxelTypeDef`] with O(1) lookup by index and
/// O(1) reverse lookup by name.
#[derive(Debug)]
pub struct VoxelTypeRegistry {
    /// Dense array where `index == VoxelTypeId.0`.
    types: Vec<VoxelTypeDef>,
    /// Reverse lookup: name → ID.
    name_to_id: HashMap<String, VoxelTypeId>,
}

impl VoxelTypeRegistry {
    /// Creates a new registry with Air pre-registered as ID 0.
    pub fn new() -> Self {
        let air = VoxelTypeDef {
            name: "air".to_string(),
            matter: Matter::Gas,
        };

        let mut name_to_id = HashMap::new();
        name_to_id.insert("air".to_string(), VoxelTypeId::AIR);

        Self {
            types: vec![air],
            name_to_id,
        }
    }

    /// Creates a registry holding the standard terrain palette.
    ///
    /// IDs are stable: stone=1, dirt=2, grass=3, sand=4, gravel=5, water=6,
    /// lava=7, bedrock=8, obsidian=9, coal_ore=10, iron_ore=11.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let defaults = [
            VoxelTypeDef::solid("stone"),
            VoxelTypeDef::solid("dirt"),
            VoxelTypeDef::solid("grass"),
            VoxelTypeDef::solid("sand"),
            VoxelTypeDef::solid("gravel"),
            VoxelTypeDef::liquid("water"),
            VoxelTypeDef::liquid("lava"),
            VoxelTypeDef::solid("bedrock"),
            VoxelTypeDef::solid("obsidian"),
            VoxelTypeDef::solid("coal_ore"),
            VoxelTypeDef::solid("iron_ore"),
        ];
        for def in defaults {
            let registered = registry.register(def);
            debug_assert!(registered.is_ok(), "default palette entry rejected: {registered:?}");
        }
        registry
    }

    /// Registers a new voxel type and returns its assigned ID.
    ///
    /// IDs are assigned sequentially starting from 1 (0 is Air).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a type with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if all 65 536 slots
    /// are consumed.
    pub fn register(&mut self, def: VoxelTypeDef) -> Result<VoxelTypeId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        if self.types.len() > u16::MAX as usize {
            return Err(RegistryError::RegistryFull);
        }

        let id = VoxelTypeId(self.types.len() as u16);
        self.name_to_id.insert(def.name.clone(), id);
        self.types.push(def);
        Ok(id)
    }

    /// Returns the definition for a given ID, or `None` for IDs the registry
    /// never handed out.
    pub fn get(&self, id: VoxelTypeId) -> Option<&VoxelTypeDef> {
        self.types.get(id.0 as usize)
    }

    /// Returns the ID for a named voxel type, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<VoxelTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Resolves a configured name to its ID.
    ///
    /// Surrounding whitespace is ignored, so list entries copied from a
    /// hand-edited file still match.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownName`] when nothing is registered under
    /// `name`.
    pub fn resolve(&self, name: &str) -> Result<VoxelTypeId, RegistryError> {
        self.lookup_by_name(name.trim())
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))
    }

    /// Returns the matter of a voxel type. Unknown IDs read as gas, the same
    /// as unloaded space.
    pub fn matter(&self, id: VoxelTypeId) -> Matter {
        self.get(id).map_or(Matter::Gas, |def| def.matter)
    }

    /// Returns `true` if the voxel type is a liquid.
    pub fn is_liquid(&self, id: VoxelTypeId) -> bool {
        self.matter(id) == Matter::Liquid
    }

    /// Returns the registered name of `id`, or `"<unknown>"`.
    pub fn name(&self, id: VoxelTypeId) -> &str {
        self.get(id).map_or("<unknown>", |def| def.name.as_str())
    }

    /// Returns the total number of registered types (including Air).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if only Air is registered.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= 1
    }
}

impl Default for VoxelTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_id_zero() {
        let registry = VoxelTypeRegistry::new();
        let air = registry.get(VoxelTypeId::AIR).unwrap();
        assert_eq!(air.name, "air");
        assert_eq!(air.matter, Matter::Gas);
    }

    #[test]
    fn test_register_returns_sequential_ids() {
        let mut registry = VoxelTypeRegistry::new();
        let id1 = registry.register(VoxelTypeDef::solid("stone")).unwrap();
        let id2 = registry.register(VoxelTypeDef::solid("dirt")).unwrap();
        let id3 = registry.register(VoxelTypeDef::liquid("water")).unwrap();
        assert_eq!(id1, VoxelTypeId(1));
        assert_eq!(id2, VoxelTypeId(2));
        assert_eq!(id3, VoxelTypeId(3));
    }

    #[test]
    fn test_default_palette_ids_are_stable() {
        let registry = VoxelTypeRegistry::with_defaults();
        assert_eq!(registry.len(), 12);
        let palette = [
            "stone", "dirt", "grass", "sand", "gravel", "water", "lava", "bedrock", "obsidian",
            "coal_ore", "iron_ore",
        ];
        for (id, name) in (1u16..).zip(palette) {
            assert_eq!(registry.lookup_by_name(name), Some(VoxelTypeId(id)), "{name}");
            assert_eq!(registry.name(VoxelTypeId(id)), name);
        }
        assert_eq!(registry.lookup_by_name("stone"), Some(VoxelTypeId(1)));
        assert_eq!(registry.lookup_by_name("water"), Some(VoxelTypeId(6)));
        assert_eq!(registry.lookup_by_name("bedrock"), Some(VoxelTypeId(8)));
        assert_eq!(registry.lookup_by_name("obsidian"), Some(VoxelTypeId(9)));
    }

    #[test]
    fn test_resolve_fails_per_name() {
        let registry = VoxelTypeRegistry::with_defaults();
        let names = ["air", "not_a_block", " water "];
        let resolved: Vec<_> = names.iter().map(|n| registry.resolve(n).ok()).collect();
        assert_eq!(
            resolved,
            vec![Some(VoxelTypeId::AIR), None, Some(VoxelTypeId(6))]
        );
        assert!(matches!(
            registry.resolve("not_a_block"),
            Err(RegistryError::UnknownName(name)) if name == "not_a_block"
        ));
    }

    #[test]
    fn test_liquid_lookup() {
        let registry = VoxelTypeRegistry::with_defaults();
        assert!(registry.is_liquid(VoxelTypeId(6)));
        assert!(registry.is_liquid(VoxelTypeId(7)));
        assert!(!registry.is_liquid(VoxelTypeId(1)));
        assert!(!registry.is_liquid(VoxelTypeId::AIR));
        // Unknown IDs read as gas.
        assert_eq!(registry.matter(VoxelTypeId(999)), Matter::Gas);
        assert_eq!(registry.name(VoxelTypeId(999)), "<unknown>");
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = VoxelTypeRegistry::new();
        registry.register(VoxelTypeDef::solid("stone")).unwrap();
        let result = registry.register(VoxelTypeDef::solid("stone"));
        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
    }

    #[test]
    fn test_len() {
        let mut registry = VoxelTypeRegistry::new();
        assert_eq!(registry.len(), 1); // Air
        assert!(registry.is_empty());
        registry.register(VoxelTypeDef::solid("stone")).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
