//! Immutable per-invocation settings resolved against the voxel registry.
//!
//! Configuration holds voxel *names*; the pass needs *IDs*. Names are resolved
//! once when a snapshot is captured, not per voxel, and each name fails on its
//! own: a typo in the safe list drops that one entry and logs one warning.

use std::sync::Arc;

use hardpan_config::{Config, GenerationConfig, LayeredConfig, WhitelistConfig};
use hardpan_voxel::{VoxelTypeId, VoxelTypeRegistry};
use rustc_hash::FxHashSet;

use crate::grid::Cell;

/// Hardened type used when the configured one does not resolve.
pub const FALLBACK_HARD_BLOCK: &str = "obsidian";

/// Provides configuration values per dimension.
pub trait SettingsSource {
    /// Generation settings for `dimension`, overrides already applied.
    fn generation(&self, dimension: i32) -> GenerationConfig;

    /// Which dimensions the pass runs in.
    fn whitelist(&self) -> WhitelistConfig;
}

impl SettingsSource for Config {
    fn generation(&self, _dimension: i32) -> GenerationConfig {
        self.generation.clone()
    }

    fn whitelist(&self) -> WhitelistConfig {
        self.whitelist.clone()
    }
}

impl SettingsSource for LayeredConfig {
    fn generation(&self, dimension: i32) -> GenerationConfig {
        self.generation_for(dimension)
    }

    fn whitelist(&self) -> WhitelistConfig {
        LayeredConfig::whitelist(self)
    }
}

impl<T: SettingsSource + ?Sized> SettingsSource for Arc<T> {
    fn generation(&self, dimension: i32) -> GenerationConfig {
        (**self).generation(dimension)
    }

    fn whitelist(&self) -> WhitelistConfig {
        (**self).whitelist()
    }
}

/// Resolved dimension whitelist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Whitelist {
    global: bool,
    dimensions: FxHashSet<i32>,
}

impl Whitelist {
    /// Captures a whitelist from configuration.
    pub fn from_config(config: &WhitelistConfig) -> Self {
        Self {
            global: config.enable_global_whitelist,
            dimensions: config.whitelisted_dimension_ids.iter().copied().collect(),
        }
    }

    /// Returns `true` if the pass runs in `dimension`.
    pub fn allows(&self, dimension: i32) -> bool {
        self.global || self.dimensions.contains(&dimension)
    }
}

/// Everything one tile invocation needs, frozen at capture time.
#[derive(Debug)]
pub struct TileSettings {
    radius: u32,
    max_altitude: u32,
    liquid_safety: bool,
    safe: FxHashSet<VoxelTypeId>,
    untouchable: FxHashSet<VoxelTypeId>,
    hardened: Option<VoxelTypeId>,
    registry: Arc<VoxelTypeRegistry>,
}

impl TileSettings {
    /// Resolves `config` against `registry`.
    ///
    /// Unknown safe/untouchable names are skipped with a warning. An unknown
    /// hardened name falls back to [`FALLBACK_HARD_BLOCK`]; if that is missing
    /// too, the snapshot has no hardened type and commits nothing.
    pub fn resolve(config: &GenerationConfig, registry: Arc<VoxelTypeRegistry>) -> Self {
        let config = config.sanitized();
        let safe = resolve_set(&registry, &config.safe_blocks, "safe");
        let untouchable = resolve_set(&registry, &config.untouchable_blocks, "untouchable");
        let hardened = resolve_hardened(&registry, &config.hard_block);

        if let Some(id) = hardened
            && (safe.contains(&id) || untouchable.contains(&id))
        {
            tracing::warn!(
                hard_block = registry.name(id),
                "hard block is also listed as safe or untouchable; hardened voxels will protect on re-runs"
            );
        }

        Self {
            radius: config.radius,
            max_altitude: config.max_altitude,
            liquid_safety: config.enable_liquid_safety,
            safe,
            untouchable,
            hardened,
            registry,
        }
    }

    /// Chebyshev protection radius.
    pub fn radius(&self) -> u32 {
        self.radius
    }

    /// Altitude ceiling (exclusive).
    pub fn max_altitude(&self) -> u32 {
        self.max_altitude
    }

    /// Whether liquids count as safe.
    pub fn liquid_safety(&self) -> bool {
        self.liquid_safety
    }

    /// Type written over unprotected voxels, if one resolved.
    pub fn hardened(&self) -> Option<VoxelTypeId> {
        self.hardened
    }

    /// Returns `true` if `id` is in the resolved safe set.
    pub fn is_safe_type(&self, id: VoxelTypeId) -> bool {
        self.safe.contains(&id)
    }

    /// Returns `true` if `id` is in the resolved untouchable set.
    pub fn is_untouchable_type(&self, id: VoxelTypeId) -> bool {
        self.untouchable.contains(&id)
    }

    /// Initial classification of a voxel of type `id`.
    ///
    /// Untouchable wins over safe.
    pub fn classify(&self, id: VoxelTypeId) -> Cell {
        if self.untouchable.contains(&id) {
            Cell::Untouchable
        } else if self.safe.contains(&id) || (self.liquid_safety && self.registry.is_liquid(id)) {
            Cell::Safe
        } else {
            Cell::Convertible
        }
    }

    /// Registry the names were resolved against.
    pub fn registry(&self) -> &VoxelTypeRegistry {
        &self.registry
    }
}

fn resolve_set(registry: &VoxelTypeRegistry, names: &[String], kind: &str) -> FxHashSet<VoxelTypeId> {
    names
        .iter()
        .filter_map(|name| match registry.resolve(name) {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(kind, %err, "skipping unresolvable {kind} block");
                None
            }
        })
        .collect()
}

fn resolve_hardened(registry: &VoxelTypeRegistry, name: &str) -> Option<VoxelTypeId> {
    match registry.resolve(name) {
        Ok(id) => {
            tracing::info!(hard_block = name, "using hard block");
            Some(id)
        }
        Err(err) => {
            tracing::warn!(%err, "unable to use hard block; using {FALLBACK_HARD_BLOCK} instead");
            match registry.resolve(FALLBACK_HARD_BLOCK) {
                Ok(id) => Some(id),
                Err(err) => {
                    tracing::error!(%err, "no usable hard block; hardening disabled");
                    None
                }
            }
        }
    }
}
