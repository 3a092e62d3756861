//! Radius propagation over a classification grid and the commit pass that
//! turns what is left unprotected into the hardened type.
//!
//! Propagation is a single sweep: every cell that is `Safe` when the sweep
//! starts stamps a `(2r+1)³` cube of `Protected` around itself, clipped to the
//! grid. Protection is not transitive, so no fixed-point iteration is needed.
//! Commit only ever looks at the inner volume, and every write is decided
//! before the first one happens, so write order does not matter.

use hardpan_voxel::{VoxelAccess, VoxelBox, VoxelPos, VoxelTypeId};

use crate::bounds::TileBounds;
use crate::grid::{Cell, ClassificationGrid};
use crate::settings::TileSettings;

/// Per-state tallies of an inner volume after propagation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Voxels rewritten to the hardened type.
    pub converted: usize,
    /// Convertible voxels that already held the hardened type.
    pub already_hardened: usize,
    /// Voxels within the radius of a safe voxel.
    pub protected: usize,
    /// Safe voxels.
    pub safe: usize,
    /// Untouchable voxels.
    pub untouchable: usize,
}

impl CommitStats {
    /// Sums two tallies.
    pub fn merge(&mut self, other: &CommitStats) {
        self.converted += other.converted;
        self.already_hardened += other.already_hardened;
        self.protected += other.protected;
        self.safe += other.safe;
        self.untouchable += other.untouchable;
    }

    /// Number of voxels tallied.
    pub fn total(&self) -> usize {
        self.converted + self.already_hardened + self.protected + self.safe + self.untouchable
    }
}

/// Protects every cell within Chebyshev distance `radius` of a `Safe` cell.
///
/// Returns how many cells went from `Convertible` to `Protected`.
pub fn propagate(grid: &mut ClassificationGrid, radius: u32) -> usize {
    let (sx, sy, sz) = grid.size();
    let r = radius as usize;
    let mut newly_protected = 0;

    // Stamping never creates or removes `Safe` cells, so scanning the grid
    // in place visits exactly the sources present at sweep start.
    for y in 0..sy {
        let (y0, y1) = (y.saturating_sub(r), (y + r).min(sy - 1));
        for z in 0..sz {
            let (z0, z1) = (z.saturating_sub(r), (z + r).min(sz - 1));
            for x in 0..sx {
                if grid.get(x, y, z) != Cell::Safe {
                    continue;
                }
                let (x0, x1) = (x.saturating_sub(r), (x + r).min(sx - 1));
                for ny in y0..=y1 {
                    for nz in z0..=z1 {
                        for cell in &mut grid.row_mut(ny, nz)[x0..=x1] {
                            let merged = cell.merge_protected();
                            if merged != *cell {
                                newly_protected += 1;
                                *cell = merged;
                            }
                        }
                    }
                }
            }
        }
    }

    newly_protected
}

/// Writes `hardened` over every `Convertible` cell of `inner`.
///
/// `inner` must lie inside the grid. Cells in any other state are never
/// written, and voxels already holding `hardened` are left alone.
pub fn commit<W: VoxelAccess + ?Sized>(
    grid: &ClassificationGrid,
    inner: VoxelBox,
    world: &mut W,
    hardened: VoxelTypeId,
) -> CommitStats {
    let mut targets = Vec::new();
    let stats = tally_inner(grid, inner, &*world, hardened, |pos| targets.push(pos));
    for pos in targets {
        world.set_voxel(pos, hardened);
    }
    stats
}

/// Walks `inner`, counting states and reporting positions to harden.
fn tally_inner<W: VoxelAccess + ?Sized>(
    grid: &ClassificationGrid,
    inner: VoxelBox,
    world: &W,
    hardened: VoxelTypeId,
    mut on_target: impl FnMut(VoxelPos),
) -> CommitStats {
    debug_assert!(grid.area().contains_box(&inner), "inner volume must lie inside the grid");
    let mut stats = CommitStats::default();

    for pos in inner.iter() {
        match grid.at_world(pos) {
            Some(Cell::Convertible) => {
                if world.voxel(pos) == hardened {
                    stats.already_hardened += 1;
                } else {
                    stats.converted += 1;
                    on_target(pos);
                }
            }
            Some(Cell::Protected) => stats.protected += 1,
            Some(Cell::Safe) => stats.safe += 1,
            Some(Cell::Untouchable) => stats.untouchable += 1,
            None => {}
        }
    }

    stats
}

/// Read-only result of classifying and propagating one tile: the exact set
/// of writes the commit pass would make.
///
/// Computing a plan needs only `&W`, so plans for several tiles can be
/// computed concurrently against a shared world and applied afterwards.
/// Inner volumes of distinct tiles never overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePlan {
    bounds: TileBounds,
    hardened: VoxelTypeId,
    targets: Vec<VoxelPos>,
    stats: CommitStats,
}

impl TilePlan {
    /// Classifies `bounds.outer`, propagates, and records the inner writes.
    pub fn compute<W: VoxelAccess + ?Sized>(
        bounds: TileBounds,
        world: &W,
        settings: &TileSettings,
        hardened: VoxelTypeId,
    ) -> Self {
        let mut grid = ClassificationGrid::build(bounds.outer, world, settings);
        propagate(&mut grid, settings.radius());

        let mut targets = Vec::new();
        let stats = tally_inner(&grid, bounds.inner, world, hardened, |pos| targets.push(pos));

        Self {
            bounds,
            hardened,
            targets,
            stats,
        }
    }

    /// Volumes the plan was computed over.
    pub fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    /// Positions that will be hardened.
    pub fn targets(&self) -> &[VoxelPos] {
        &self.targets
    }

    /// Tallies at planning time.
    pub fn stats(&self) -> CommitStats {
        self.stats
    }

    /// Performs the planned writes.
    pub fn apply<W: VoxelAccess + ?Sized>(self, world: &mut W) -> CommitStats {
        for &pos in &self.targets {
            world.set_voxel(pos, self.hardened);
        }
        self.stats
    }
}
