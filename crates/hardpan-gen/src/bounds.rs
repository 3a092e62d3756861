//! Inner (written) and outer (read) volumes of one tile invocation.

use hardpan_config::MAX_RADIUS;
use hardpan_voxel::{TilePos, VoxelBox, VoxelPos};

/// The two volumes a tile invocation works on.
///
/// `inner` is the tile column from the world floor up to the altitude ceiling;
/// it is the only volume ever written. `outer` pads it by `radius` on ±X, ±Z
/// and above, so a safe voxel up to `radius` outside the tile is still seen.
/// Nothing exists under the world floor, so the outer volume is not padded
/// downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileBounds {
    /// Tile being processed.
    pub tile: TilePos,
    /// Written volume.
    pub inner: VoxelBox,
    /// Read volume. Always contains `inner`.
    pub outer: VoxelBox,
}

impl TileBounds {
    /// Computes the bounds for `tile`.
    ///
    /// The inner top is `max_altitude` clamped into `[min_y, max_y]`; reads
    /// above the world's top are left to the accessor (they come back as air).
    /// `radius` is capped at [`MAX_RADIUS`].
    pub fn new(tile: TilePos, radius: u32, max_altitude: u32, min_y: i32, max_y: i32) -> Self {
        let r = i32::try_from(radius.min(MAX_RADIUS)).unwrap_or(0);
        let top = i32::try_from(max_altitude)
            .unwrap_or(i32::MAX)
            .clamp(min_y, max_y.max(min_y));

        let inner = tile.column_box(min_y, top);
        let outer = VoxelBox::new(
            VoxelPos::new(inner.min.x - r, min_y, inner.min.z - r),
            VoxelPos::new(inner.max.x + r, top + r, inner.max.z + r),
        );

        Self { tile, inner, outer }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_tile_bounds() {
        let bounds = TileBounds::new(TilePos::new(0, 0), 3, 64, 0, 256);
        assert_eq!(bounds.inner.min, VoxelPos::new(0, 0, 0));
        assert_eq!(bounds.inner.max, VoxelPos::new(16, 64, 16));
        assert_eq!(bounds.outer.min, VoxelPos::new(-3, 0, -3));
        assert_eq!(bounds.outer.max, VoxelPos::new(19, 67, 19));
        assert!(bounds.outer.contains_box(&bounds.inner));
    }

    #[test]
    fn test_negative_tile_bounds() {
        let bounds = TileBounds::new(TilePos::new(-2, 1), 1, 10, 0, 256);
        assert_eq!(bounds.inner.min, VoxelPos::new(-32, 0, 16));
        assert_eq!(bounds.inner.max, VoxelPos::new(-16, 10, 32));
        assert_eq!(bounds.outer.size(), (18, 11, 18));
    }

    #[test]
    fn test_altitude_clamped_to_world() {
        let bounds = TileBounds::new(TilePos::new(0, 0), 2, 1000, -64, 128);
        assert_eq!(bounds.inner.min.y, -64);
        assert_eq!(bounds.inner.max.y, 128);
        assert_eq!(bounds.outer.max.y, 130);
    }

    #[test]
    fn test_oversized_radius_is_capped() {
        let capped = TileBounds::new(TilePos::new(0, 0), 100_000, 256, 0, 256);
        let limit = TileBounds::new(TilePos::new(0, 0), MAX_RADIUS, 256, 0, 256);
        assert_eq!(capped, limit);
        let r = MAX_RADIUS as usize;
        assert_eq!(capped.outer.size(), (16 + 2 * r, 256 + r, 16 + 2 * r));

        let wrapped = TileBounds::new(TilePos::new(0, 0), u32::MAX, u32::MAX, 0, 64);
        assert!(wrapped.outer.contains_box(&wrapped.inner));
        assert_eq!(wrapped.inner.max.y, 64);
        assert_eq!(wrapped.outer.max.y, 64 + MAX_RADIUS as i32);
    }

    #[test]
    fn test_ceiling_below_floor_gives_empty_inner() {
        let bounds = TileBounds::new(TilePos::new(0, 0), 1, 0, 16, 64);
        assert!(bounds.inner.is_empty());
        assert!(!bounds.outer.is_empty());
    }

    #[test]
    fn test_adjacent_inner_volumes_are_disjoint() {
        let a = TileBounds::new(TilePos::new(0, 0), 4, 32, 0, 64);
        let b = TileBounds::new(TilePos::new(1, 0), 4, 32, 0, 64);
        assert!(a.inner.intersection(&b.inner).is_empty());
        // The padded volumes overlap by 2 * radius columns.
        assert_eq!(a.outer.intersection(&b.outer).size().0, 8);
    }
}
