//! Per-tile entry point.
//!
//! [`Hardener::generate`] is called once for every tile the host generates.
//! It captures the current whitelist and the dimension's settings snapshot at
//! entry, then runs classification, propagation, and commit to completion. A
//! [`refresh`](Hardener::refresh) after a config reload swaps in new snapshots
//! for later invocations; in-flight ones keep the `Arc` they already hold.

use std::sync::{Arc, PoisonError, RwLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use hardpan_voxel::{TilePos, VoxelAccess, VoxelTypeId, VoxelTypeRegistry};

use crate::bounds::TileBounds;
use crate::grid::ClassificationGrid;
use crate::propagate::{CommitStats, TilePlan, commit, propagate};
use crate::settings::{SettingsSource, TileSettings, Whitelist};

/// Why a tile was left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The world is a client mirror or preview, not the live simulation.
    NotLive,
    /// The tile's dimension is not whitelisted.
    NotWhitelisted,
    /// Neither the configured hard block nor the fallback resolved.
    NoHardenedType,
}

/// What one invocation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOutcome {
    /// Nothing was read or written.
    Skipped(SkipReason),
    /// The pass ran; tallies of the inner volume.
    Hardened(CommitStats),
}

/// Runs the hardening pass on tiles as they are generated.
pub struct Hardener<S> {
    source: S,
    registry: Arc<VoxelTypeRegistry>,
    whitelist: RwLock<Arc<Whitelist>>,
    snapshots: DashMap<i32, Arc<TileSettings>>,
}

impl<S: SettingsSource> Hardener<S> {
    /// Creates a hardener reading settings from `source` and resolving voxel
    /// names against `registry`.
    pub fn new(source: S, registry: Arc<VoxelTypeRegistry>) -> Self {
        let whitelist = Whitelist::from_config(&source.whitelist());
        Self {
            source,
            registry,
            whitelist: RwLock::new(Arc::new(whitelist)),
            snapshots: DashMap::new(),
        }
    }

    /// The configuration source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The registry voxel names resolve against.
    pub fn registry(&self) -> &Arc<VoxelTypeRegistry> {
        &self.registry
    }

    /// Re-captures configuration. Call after the source has been reloaded.
    ///
    /// The whitelist is re-read immediately; per-dimension snapshots are
    /// dropped and re-resolved lazily on their next tile.
    pub fn refresh(&self) {
        let whitelist = Arc::new(Whitelist::from_config(&self.source.whitelist()));
        *self.whitelist.write().unwrap_or_else(PoisonError::into_inner) = whitelist;
        let dropped = self.snapshots.len();
        self.snapshots.clear();
        tracing::debug!(dropped, "hardening settings refreshed");
    }

    /// Settings snapshot for `dimension`, resolving it on first use.
    pub fn settings_for(&self, dimension: i32) -> Arc<TileSettings> {
        if let Some(settings) = self.snapshots.get(&dimension) {
            return Arc::clone(settings.value());
        }

        // Resolve before taking the shard lock: the source may read files.
        let config = self.source.generation(dimension);
        let resolved = Arc::new(TileSettings::resolve(&config, Arc::clone(&self.registry)));

        match self.snapshots.entry(dimension) {
            Entry::Occupied(existing) => Arc::clone(existing.get()),
            Entry::Vacant(slot) => {
                tracing::info!(
                    dimension,
                    radius = resolved.radius(),
                    max_altitude = resolved.max_altitude(),
                    liquid_safety = resolved.liquid_safety(),
                    "captured hardening settings"
                );
                Arc::clone(slot.insert(resolved).value())
            }
        }
    }

    /// Hardens tile `(tile_x, tile_z)` of `world`.
    ///
    /// Never fails: skips are reported in the outcome, configuration problems
    /// were already degraded to defaults when the snapshot was captured.
    pub fn generate<W: VoxelAccess + ?Sized>(
        &self,
        tile_x: i32,
        tile_z: i32,
        world: &mut W,
    ) -> TileOutcome {
        let (bounds, settings, hardened) = match self.prepare(tile_x, tile_z, &*world) {
            Ok(prepared) => prepared,
            Err(reason) => return TileOutcome::Skipped(reason),
        };

        let mut grid = ClassificationGrid::build(bounds.outer, &*world, &settings);
        let newly_protected = propagate(&mut grid, settings.radius());
        let stats = commit(&grid, bounds.inner, world, hardened);

        tracing::debug!(
            tile_x,
            tile_z,
            converted = stats.converted,
            already_hardened = stats.already_hardened,
            newly_protected,
            "tile hardened"
        );
        TileOutcome::Hardened(stats)
    }

    /// Computes the writes [`generate`](Self::generate) would make, without
    /// making them.
    pub fn plan<W: VoxelAccess + ?Sized>(
        &self,
        tile_x: i32,
        tile_z: i32,
        world: &W,
    ) -> Result<TilePlan, SkipReason> {
        let (bounds, settings, hardened) = self.prepare(tile_x, tile_z, world)?;
        Ok(TilePlan::compute(bounds, world, &settings, hardened))
    }

    fn prepare<W: VoxelAccess + ?Sized>(
        &self,
        tile_x: i32,
        tile_z: i32,
        world: &W,
    ) -> Result<(TileBounds, Arc<TileSettings>, VoxelTypeId), SkipReason> {
        if !world.is_live_simulation() {
            tracing::trace!(tile_x, tile_z, "skipping tile: world is not live");
            return Err(SkipReason::NotLive);
        }

        let dimension = world.dimension_id();
        let whitelist = Arc::clone(&self.whitelist.read().unwrap_or_else(PoisonError::into_inner));
        if !whitelist.allows(dimension) {
            tracing::trace!(tile_x, tile_z, dimension, "skipping tile: dimension not whitelisted");
            return Err(SkipReason::NotWhitelisted);
        }

        let settings = self.settings_for(dimension);
        let Some(hardened) = settings.hardened() else {
            return Err(SkipReason::NoHardenedType);
        };

        let bounds = TileBounds::new(
            TilePos::new(tile_x, tile_z),
            settings.radius(),
            settings.max_altitude(),
            world.min_y(),
            world.max_y(),
        );
        Ok((bounds, settings, hardened))
    }
}

#[cfg(test)]
#[path = "hardener_tests.rs"]
mod tests;
