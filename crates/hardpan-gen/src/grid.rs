//! Classification grid: one [`Cell`] per voxel of a tile's outer volume.

use hardpan_voxel::{VoxelAccess, VoxelBox, VoxelPos};

use crate::settings::TileSettings;

/// Classification of one voxel.
///
/// Propagation only lowers a cell along `Convertible > Protected > Safe`;
/// `Untouchable` sits outside that order and never changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Cell {
    /// Never protects, never written.
    Untouchable = -1,
    /// Itself a safe type (or a liquid with liquid safety on).
    Safe = 0,
    /// Within the radius of a safe cell.
    Protected = 1,
    /// Candidate for hardening.
    Convertible = 2,
}

impl Cell {
    /// Min-merge toward `Protected`.
    #[inline]
    pub fn merge_protected(self) -> Cell {
        match self {
            Cell::Convertible | Cell::Protected => Cell::Protected,
            other => other,
        }
    }
}

/// Dense 3D array of [`Cell`]s covering a [`VoxelBox`].
///
/// Local coordinates are offsets from `area.min`; storage is x fastest, then
/// z, then y, matching [`VoxelBox::iter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassificationGrid {
    area: VoxelBox,
    size: (usize, usize, usize),
    cells: Vec<Cell>,
}

impl ClassificationGrid {
    /// Creates a grid over `area` with every cell set to `fill`.
    pub fn filled(area: VoxelBox, fill: Cell) -> Self {
        Self {
            area,
            size: area.size(),
            cells: vec![fill; area.volume()],
        }
    }

    /// Classifies every voxel of `area` from the live world.
    pub fn build<W: VoxelAccess + ?Sized>(area: VoxelBox, world: &W, settings: &TileSettings) -> Self {
        let cells: Vec<Cell> = area
            .iter()
            .map(|pos| settings.classify(world.voxel(pos)))
            .collect();
        debug_assert_eq!(cells.len(), area.volume());

        Self {
            area,
            size: area.size(),
            cells,
        }
    }

    /// World volume covered.
    pub fn area(&self) -> VoxelBox {
        self.area
    }

    /// Extent along each axis.
    pub fn size(&self) -> (usize, usize, usize) {
        self.size
    }

    /// Cell at local `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Cell {
        self.cells[self.index(x, y, z)]
    }

    /// Overwrites the cell at local `(x, y, z)`.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, cell: Cell) {
        let index = self.index(x, y, z);
        self.cells[index] = cell;
    }

    /// Cell at an absolute world position, or `None` outside the grid.
    pub fn at_world(&self, pos: VoxelPos) -> Option<Cell> {
        self.local(pos).map(|(x, y, z)| self.get(x, y, z))
    }

    /// Overwrites the cell at an absolute world position. Returns `false`
    /// outside the grid.
    pub fn set_world(&mut self, pos: VoxelPos, cell: Cell) -> bool {
        match self.local(pos) {
            Some((x, y, z)) => {
                self.set(x, y, z, cell);
                true
            }
            None => false,
        }
    }

    /// Number of cells in the given state.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// Absolute position of every cell in the given state.
    pub fn positions_of(&self, cell: Cell) -> impl Iterator<Item = VoxelPos> + '_ {
        self.area
            .iter()
            .zip(self.cells.iter())
            .filter(move |&(_, &c)| c == cell)
            .map(|(pos, _)| pos)
    }

    /// Converts a world position to local coordinates.
    pub fn local(&self, pos: VoxelPos) -> Option<(usize, usize, usize)> {
        self.area.contains(pos).then(|| {
            (
                (pos.x - self.area.min.x) as usize,
                (pos.y - self.area.min.y) as usize,
                (pos.z - self.area.min.z) as usize,
            )
        })
    }

    /// Mutable row of cells along X at local `(y, z)`, for bulk merges.
    pub(crate) fn row_mut(&mut self, y: usize, z: usize) -> &mut [Cell] {
        let start = self.index(0, y, z);
        let len = self.size.0;
        &mut self.cells[start..start + len]
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let (sx, sy, sz) = self.size;
        debug_assert!(x < sx && y < sy && z < sz, "({x}, {y}, {z}) outside {:?}", self.size);
        x + z * sx + y * sx * sz
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hardpan_config::GenerationConfig;
    use hardpan_voxel::{TilePos, VoxelTypeRegistry, VoxelWorld};

    use super::*;

    #[test]
    fn test_merge_is_min_toward_protected() {
        assert_eq!(Cell::Convertible.merge_protected(), Cell::Protected);
        assert_eq!(Cell::Protected.merge_protected(), Cell::Protected);
        assert_eq!(Cell::Safe.merge_protected(), Cell::Safe);
        assert_eq!(Cell::Untouchable.merge_protected(), Cell::Untouchable);
    }

    #[test]
    fn test_discriminants() {
        assert_eq!(Cell::Untouchable as i8, -1);
        assert_eq!(Cell::Safe as i8, 0);
        assert_eq!(Cell::Protected as i8, 1);
        assert_eq!(Cell::Convertible as i8, 2);
    }

    #[test]
    fn test_world_and_local_coordinates_agree() {
        let area = VoxelBox::new(VoxelPos::new(-3, 0, 5), VoxelPos::new(2, 4, 9));
        let mut grid = ClassificationGrid::filled(area, Cell::Convertible);
        assert_eq!(grid.size(), (5, 4, 4));

        assert!(grid.set_world(VoxelPos::new(-3, 0, 5), Cell::Safe));
        assert!(grid.set_world(VoxelPos::new(1, 3, 8), Cell::Untouchable));
        assert!(!grid.set_world(VoxelPos::new(2, 0, 5), Cell::Safe));

        assert_eq!(grid.get(0, 0, 0), Cell::Safe);
        assert_eq!(grid.get(4, 3, 3), Cell::Untouchable);
        assert_eq!(grid.at_world(VoxelPos::new(0, 1, 6)), Some(Cell::Convertible));
        assert_eq!(grid.at_world(VoxelPos::new(0, 4, 6)), None);

        let safe: Vec<_> = grid.positions_of(Cell::Safe).collect();
        assert_eq!(safe, vec![VoxelPos::new(-3, 0, 5)]);
    }

    #[test]
    fn test_build_covers_every_voxel() {
        let registry = Arc::new(VoxelTypeRegistry::with_defaults());
        let stone = registry.lookup_by_name("stone").unwrap();
        let bedrock = registry.lookup_by_name("bedrock").unwrap();
        let water = registry.lookup_by_name("water").unwrap();
        let settings = TileSettings::resolve(&GenerationConfig::default(), registry);

        let mut world = VoxelWorld::new(0, 0, 16);
        world.load_column(TilePos::new(0, 0));
        let area = TilePos::new(0, 0).column_box(0, 8);
        world.fill_box(area, stone);
        world.fill_box(TilePos::new(0, 0).column_box(0, 1), bedrock);
        world.set_voxel(VoxelPos::new(3, 4, 3), water);
        world.set_voxel(VoxelPos::new(5, 5, 5), hardpan_voxel::VoxelTypeId::AIR);

        let grid = ClassificationGrid::build(area, &world, &settings);
        assert_eq!(grid.count(Cell::Untouchable), 256);
        assert_eq!(grid.count(Cell::Safe), 1);
        assert_eq!(grid.count(Cell::Protected), 0);
        assert_eq!(grid.count(Cell::Convertible), area.volume() - 257);
        assert_eq!(grid.at_world(VoxelPos::new(3, 4, 3)), Some(Cell::Convertible));
        assert_eq!(grid.at_world(VoxelPos::new(5, 5, 5)), Some(Cell::Safe));
    }
}
