//! World accessor trait and the in-memory world that owns loaded tile columns.
//!
//! [`VoxelAccess`] is the only view post-generation passes get of the host
//! world: absolute-coordinate reads and writes plus the two facts that gate a
//! pass (live simulation, dimension). [`VoxelWorld`] implements it over an
//! [`FxHashMap`](rustc_hash::FxHashMap) of [`VoxelColumn`]s.

use rustc_hash::FxHashMap;

use crate::column::VoxelColumn;
use crate::position::{TILE_SIZE, TilePos, VoxelBox, VoxelPos};
use crate::registry::VoxelTypeId;
use crate::section::SECTION_SIZE;

/// Absolute-coordinate access to a voxel world.
pub trait VoxelAccess {
    /// Returns the voxel at `pos`. Unloaded or out-of-range positions read as air.
    fn voxel(&self, pos: VoxelPos) -> VoxelTypeId;

    /// Writes the voxel at `pos`. Writes to unloaded or out-of-range positions
    /// are dropped.
    fn set_voxel(&mut self, pos: VoxelPos, voxel: VoxelTypeId);

    /// Returns `true` if this world is an authoritative server-side simulation
    /// (as opposed to a client mirror or a preview).
    fn is_live_simulation(&self) -> bool;

    /// Identifier of the dimension this world belongs to.
    fn dimension_id(&self) -> i32;

    /// Lowest buildable altitude.
    fn min_y(&self) -> i32;

    /// One past the highest buildable altitude.
    fn max_y(&self) -> i32;
}

/// Owns every loaded tile column of one dimension.
#[derive(Clone, Debug)]
pub struct VoxelWorld {
    columns: FxHashMap<TilePos, VoxelColumn>,
    dimension: i32,
    live: bool,
    min_y: i32,
    sections: usize,
}

impl VoxelWorld {
    /// Creates an empty live world for `dimension` spanning `height` voxels
    /// upward from `min_y`. `height` is rounded up to a whole section.
    pub fn new(dimension: i32, min_y: i32, height: u32) -> Self {
        Self {
            columns: FxHashMap::default(),
            dimension,
            live: true,
            min_y,
            sections: (height as usize).div_ceil(SECTION_SIZE).max(1),
        }
    }

    /// Marks the world as a client mirror / preview (`false`) or an
    /// authoritative simulation (`true`).
    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    /// Inserts an empty column at `tile` if none is loaded and returns it.
    pub fn load_column(&mut self, tile: TilePos) -> &mut VoxelColumn {
        let (min_y, sections) = (self.min_y, self.sections);
        self.columns
            .entry(tile)
            .or_insert_with(|| VoxelColumn::new(min_y, sections))
    }

    /// Immutable access to a loaded column.
    pub fn column(&self, tile: TilePos) -> Option<&VoxelColumn> {
        self.columns.get(&tile)
    }

    /// Number of loaded columns.
    pub fn loaded_count(&self) -> usize {
        self.columns.len()
    }

    /// Writes `voxel` at every loaded position inside `area`.
    pub fn fill_box(&mut self, area: VoxelBox, voxel: VoxelTypeId) {
        for pos in area.iter() {
            self.set_voxel(pos, voxel);
        }
    }

    /// Counts positions inside `area` holding `voxel`.
    pub fn count_in(&self, area: VoxelBox, voxel: VoxelTypeId) -> usize {
        area.iter().filter(|&pos| self.voxel(pos) == voxel).count()
    }

    fn split(pos: VoxelPos) -> (TilePos, usize, usize) {
        let tile = TilePos::containing(pos);
        let x = pos.x.rem_euclid(TILE_SIZE) as usize;
        let z = pos.z.rem_euclid(TILE_SIZE) as usize;
        (tile, x, z)
    }
}

impl VoxelAccess for VoxelWorld {
    fn voxel(&self, pos: VoxelPos) -> VoxelTypeId {
        let (tile, x, z) = Self::split(pos);
        self.columns
            .get(&tile)
            .map_or(VoxelTypeId::AIR, |column| column.get(x, pos.y, z))
    }

    fn set_voxel(&mut self, pos: VoxelPos, voxel: VoxelTypeId) {
        let (tile, x, z) = Self::split(pos);
        match self.columns.get_mut(&tile) {
            Some(column) => {
                column.set(x, pos.y, z, voxel);
            }
            None => tracing::trace!(?pos, "write to unloaded column dropped"),
        }
    }

    fn is_live_simulation(&self) -> bool {
        self.live
    }

    fn dimension_id(&self) -> i32 {
        self.dimension
    }

    fn min_y(&self) -> i32 {
        self.min_y
    }

    fn max_y(&self) -> i32 {
        self.min_y + (self.sections * SECTION_SIZE) as i32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
