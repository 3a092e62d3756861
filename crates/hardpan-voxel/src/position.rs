//! Integer world coordinates: single voxels, tile columns, and half-open boxes.

/// Horizontal side length of a tile (one generated column of the world).
pub const TILE_SIZE: i32 = 16;

/// Absolute voxel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VoxelPos {
    /// East-west.
    pub x: i32,
    /// Altitude.
    pub y: i32,
    /// North-south.
    pub z: i32,
}

impl VoxelPos {
    /// Creates a new position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the position offset by `(dx, dy, dz)`.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Largest per-axis distance to `other` (the L∞ norm of the difference).
    pub fn chebyshev_distance(self, other: VoxelPos) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        let dz = self.z.abs_diff(other.z);
        dx.max(dy).max(dz)
    }
}

/// Identifies a tile by its tile-grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePos {
    /// Tile-grid X coordinate.
    pub x: i32,
    /// Tile-grid Z coordinate.
    pub z: i32,
}

impl TilePos {
    /// Creates a new tile address.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Returns the tile containing the given voxel.
    pub fn containing(pos: VoxelPos) -> Self {
        Self {
            x: pos.x.div_euclid(TILE_SIZE),
            z: pos.z.div_euclid(TILE_SIZE),
        }
    }

    /// World X of the tile's western edge.
    pub const fn min_x(self) -> i32 {
        self.x * TILE_SIZE
    }

    /// World Z of the tile's northern edge.
    pub const fn min_z(self) -> i32 {
        self.z * TILE_SIZE
    }

    /// The full column of this tile between `min_y` (inclusive) and `max_y`
    /// (exclusive).
    pub fn column_box(self, min_y: i32, max_y: i32) -> VoxelBox {
        VoxelBox::new(
            VoxelPos::new(self.min_x(), min_y, self.min_z()),
            VoxelPos::new(self.min_x() + TILE_SIZE, max_y, self.min_z() + TILE_SIZE),
        )
    }
}

/// Half-open axis-aligned box `[min, max)` in voxel coordinates.
///
/// Invariant: `min <= max` on every axis. An axis with `min == max` makes the
/// box empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelBox {
    /// Inclusive lower corner.
    pub min: VoxelPos,
    /// Exclusive upper corner.
    pub max: VoxelPos,
}

impl VoxelBox {
    /// Creates a box from two corners, sorting components so `min <= max`.
    pub fn new(a: VoxelPos, b: VoxelPos) -> Self {
        Self {
            min: VoxelPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: VoxelPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Extent along each axis.
    pub fn size(&self) -> (usize, usize, usize) {
        (
            (self.max.x - self.min.x) as usize,
            (self.max.y - self.min.y) as usize,
            (self.max.z - self.min.z) as usize,
        )
    }

    /// Number of voxels inside.
    pub fn volume(&self) -> usize {
        let (sx, sy, sz) = self.size();
        sx * sy * sz
    }

    /// Returns `true` if the box holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.volume() == 0
    }

    /// Returns `true` if `pos` lies inside.
    pub fn contains(&self, pos: VoxelPos) -> bool {
        (self.min.x..self.max.x).contains(&pos.x)
            && (self.min.y..self.max.y).contains(&pos.y)
            && (self.min.z..self.max.z).contains(&pos.z)
    }

    /// Returns `true` if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &VoxelBox) -> bool {
        other.is_empty()
            || (other.min.x >= self.min.x
                && other.min.y >= self.min.y
                && other.min.z >= self.min.z
                && other.max.x <= self.max.x
                && other.max.y <= self.max.y
                && other.max.z <= self.max.z)
    }

    /// Overlap of two boxes; empty (min == max) if they do not overlap.
    pub fn intersection(&self, other: &VoxelBox) -> VoxelBox {
        let min = VoxelPos::new(
            self.min.x.max(other.min.x),
            self.min.y.max(other.min.y),
            self.min.z.max(other.min.z),
        );
        let max = VoxelPos::new(
            self.max.x.min(other.max.x).max(min.x),
            self.max.y.min(other.max.y).max(min.y),
            self.max.z.min(other.max.z).max(min.z),
        );
        VoxelBox { min, max }
    }

    /// Iterates every position, x fastest, then z, then y.
    pub fn iter(&self) -> impl Iterator<Item = VoxelPos> + use<> {
        let VoxelBox { min, max } = *self;
        (min.y..max.y).flat_map(move |y| {
            (min.z..max.z).flat_map(move |z| (min.x..max.x).map(move |x| VoxelPos::new(x, y, z)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_containing_negative_coords() {
        assert_eq!(TilePos::containing(VoxelPos::new(0, 5, 15)), TilePos::new(0, 0));
        assert_eq!(TilePos::containing(VoxelPos::new(16, 5, 31)), TilePos::new(1, 1));
        assert_eq!(TilePos::containing(VoxelPos::new(-1, 5, -16)), TilePos::new(-1, -1));
        assert_eq!(TilePos::containing(VoxelPos::new(-17, 0, 0)), TilePos::new(-2, 0));
    }

    #[test]
    fn test_chebyshev_distance_is_max_axis() {
        let a = VoxelPos::new(0, 0, 0);
        assert_eq!(a.chebyshev_distance(VoxelPos::new(3, -2, 1)), 3);
        assert_eq!(a.chebyshev_distance(VoxelPos::new(-3, -3, -3)), 3);
        assert_eq!(a.chebyshev_distance(a), 0);
    }

    #[test]
    fn test_box_sorts_corners() {
        let b = VoxelBox::new(VoxelPos::new(5, 2, 8), VoxelPos::new(1, 4, 0));
        assert_eq!(b.min, VoxelPos::new(1, 2, 0));
        assert_eq!(b.max, VoxelPos::new(5, 4, 8));
        assert_eq!(b.size(), (4, 2, 8));
        assert_eq!(b.volume(), 64);
    }

    #[test]
    fn test_box_contains_is_half_open() {
        let b = TilePos::new(0, 0).column_box(0, 4);
        assert!(b.contains(VoxelPos::new(0, 0, 0)));
        assert!(b.contains(VoxelPos::new(15, 3, 15)));
        assert!(!b.contains(VoxelPos::new(16, 0, 0)));
        assert!(!b.contains(VoxelPos::new(0, 4, 0)));
        assert!(!b.contains(VoxelPos::new(0, -1, 0)));
    }

    #[test]
    fn test_intersection_of_disjoint_boxes_is_empty() {
        let a = TilePos::new(0, 0).column_box(0, 8);
        let b = TilePos::new(1, 0).column_box(0, 8);
        assert!(a.intersection(&b).is_empty());

        let c = VoxelBox::new(VoxelPos::new(8, 2, 8), VoxelPos::new(24, 20, 24));
        let overlap = a.intersection(&c);
        assert_eq!(overlap.min, VoxelPos::new(8, 2, 8));
        assert_eq!(overlap.max, VoxelPos::new(16, 8, 16));
        assert!(a.contains_box(&overlap));
    }

    #[test]
    fn test_iter_visits_every_voxel_once() {
        let b = VoxelBox::new(VoxelPos::new(-1, 0, 2), VoxelPos::new(2, 2, 4));
        let all: Vec<_> = b.iter().collect();
        assert_eq!(all.len(), b.volume());
        assert_eq!(all[0], VoxelPos::new(-1, 0, 2));
        assert_eq!(all[1], VoxelPos::new(0, 0, 2));
        let mut dedup = all.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), all.len());
    }
}
