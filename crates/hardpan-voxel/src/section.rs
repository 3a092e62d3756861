//! Palette-compressed storage for one 16×16×16 section of a tile column.
//!
//! A section keeps a small palette of distinct [`VoxelTypeId`] values and an
//! index array into it. Uniform sections (freshly generated air or stone)
//! store no indices at all; the index width grows from bytes to `u16` only
//! when the palette outgrows 256 entries.

use crate::registry::VoxelTypeId;

/// Side length of a section in voxels.
pub const SECTION_SIZE: usize = 16;

/// Total number of voxels in a section (16³).
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Palette indices for every voxel of a section.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Indices {
    /// Every voxel is `palette[0]`.
    Uniform,
    /// Up to 256 palette entries.
    Narrow(Box<[u8]>),
    /// More than 256 palette entries.
    Wide(Box<[u16]>),
}

/// Palette-compressed voxel storage for a 16×16×16 section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSection {
    /// Palette mapping local indices to global [`VoxelTypeId`] values.
    palette: Vec<VoxelTypeId>,
    indices: Indices,
}

impl ColumnSection {
    /// Creates a section filled entirely with the given voxel type.
    pub fn new(fill: VoxelTypeId) -> Self {
        Self {
            palette: vec![fill],
            indices: Indices::Uniform,
        }
    }

    /// Creates a section filled with air.
    pub fn new_air() -> Self {
        Self::new(VoxelTypeId::AIR)
    }

    /// Returns the voxel type at section-local `(x, y, z)`, each in `0..16`.
    pub fn get(&self, x: usize, y: usize, z: usize) -> VoxelTypeId {
        let index = Self::linear_index(x, y, z);
        let palette_index = match &self.indices {
            Indices::Uniform => 0,
            Indices::Narrow(data) => data[index] as usize,
            Indices::Wide(data) => data[index] as usize,
        };
        self.palette[palette_index]
    }

    /// Sets the voxel type at section-local `(x, y, z)`.
    ///
    /// New types are appended to the palette; the index array is widened
    /// when needed.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: VoxelTypeId) {
        if matches!(self.indices, Indices::Uniform) && self.palette[0] == voxel {
            return;
        }
        let palette_index = self.palette_index_or_insert(voxel);
        let index = Self::linear_index(x, y, z);
        match &mut self.indices {
            Indices::Uniform => unreachable!("palette insert always leaves explicit indices"),
            Indices::Narrow(data) => data[index] = palette_index as u8,
            Indices::Wide(data) => data[index] = palette_index as u16,
        }
    }

    /// Resets the section to a uniform fill.
    pub fn fill(&mut self, voxel: VoxelTypeId) {
        self.palette = vec![voxel];
        self.indices = Indices::Uniform;
    }

    /// Returns `true` if every voxel holds the same type.
    pub fn is_uniform(&self) -> bool {
        matches!(self.indices, Indices::Uniform)
    }

    /// Returns a reference to the palette.
    pub fn palette(&self) -> &[VoxelTypeId] {
        &self.palette
    }

    /// Drops unused palette entries, collapsing to uniform when only one type
    /// remains.
    ///
    /// Scans every voxel; call after bulk edits, not after every `set()`.
    pub fn compact(&mut self) {
        if self.is_uniform() {
            return;
        }

        let mut used = vec![false; self.palette.len()];
        for i in 0..SECTION_VOLUME {
            used[self.raw_index(i)] = true;
        }

        let mut remap = vec![0usize; self.palette.len()];
        let mut palette = Vec::new();
        for (old, &is_used) in used.iter().enumerate() {
            if is_used {
                remap[old] = palette.len();
                palette.push(self.palette[old]);
            }
        }

        if palette.len() <= 1 {
            self.fill(palette.first().copied().unwrap_or(self.palette[0]));
            return;
        }

        let indices = if palette.len() <= 256 {
            Indices::Narrow((0..SECTION_VOLUME).map(|i| remap[self.raw_index(i)] as u8).collect())
        } else {
            Indices::Wide((0..SECTION_VOLUME).map(|i| remap[self.raw_index(i)] as u16).collect())
        };
        self.palette = palette;
        self.indices = indices;
    }

    /// Converts `(x, y, z)` to a linear index (x fastest, then z, then y).
    fn linear_index(x: usize, y: usize, z: usize) -> usize {
        debug_assert!(x < SECTION_SIZE && y < SECTION_SIZE && z < SECTION_SIZE);
        x + z * SECTION_SIZE + y * SECTION_SIZE * SECTION_SIZE
    }

    fn raw_index(&self, i: usize) -> usize {
        match &self.indices {
            Indices::Uniform => 0,
            Indices::Narrow(data) => data[i] as usize,
            Indices::Wide(data) => data[i] as usize,
        }
    }

    /// Finds or appends a palette entry, materializing or widening the index
    /// array as required.
    fn palette_index_or_insert(&mut self, voxel: VoxelTypeId) -> usize {
        if let Some(idx) = self.palette.iter().position(|&v| v == voxel) {
            if matches!(self.indices, Indices::Uniform) {
                self.indices = Indices::Narrow(vec![0u8; SECTION_VOLUME].into_boxed_slice());
            }
            return idx;
        }

        let idx = self.palette.len();
        self.palette.push(voxel);

        match &self.indices {
            Indices::Uniform => {
                self.indices = Indices::Narrow(vec![0u8; SECTION_VOLUME].into_boxed_slice());
            }
            Indices::Narrow(data) if idx > u8::MAX as usize => {
                let wide = data.iter().map(|&i| u16::from(i)).collect();
                self.indices = Indices::Wide(wide);
            }
            _ => {}
        }
        idx
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_section_is_uniform() {
        let section = ColumnSection::new_air();
        assert!(section.is_uniform());
        assert_eq!(section.palette(), &[VoxelTypeId::AIR]);
        assert_eq!(section.get(15, 15, 15), VoxelTypeId::AIR);
    }

    #[test]
    fn test_set_same_type_on_uniform_is_noop() {
        let mut section = ColumnSection::new(VoxelTypeId(3));
        section.set(0, 0, 0, VoxelTypeId(3));
        assert!(section.is_uniform());
        assert_eq!(section.palette().len(), 1);
    }

    #[test]
    fn test_single_change_grows_palette() {
        let mut section = ColumnSection::new_air();
        section.set(1, 2, 3, VoxelTypeId(9));
        assert!(!section.is_uniform());
        assert_eq!(section.palette(), &[VoxelTypeId::AIR, VoxelTypeId(9)]);
        assert_eq!(section.get(1, 2, 3), VoxelTypeId(9));
        assert_eq!(section.get(3, 2, 1), VoxelTypeId::AIR);
    }

    #[test]
    fn test_compact_collapses_back_to_uniform() {
        let mut section = ColumnSection::new_air();
        section.set(5, 5, 5, VoxelTypeId(42));
        section.set(5, 5, 5, VoxelTypeId::AIR);
        section.compact();
        assert!(section.is_uniform());
        assert_eq!(section.palette(), &[VoxelTypeId::AIR]);
    }

    #[test]
    fn test_compact_keeps_used_entries_only() {
        let mut section = ColumnSection::new(VoxelTypeId(1));
        section.set(0, 0, 0, VoxelTypeId(2));
        section.set(1, 0, 0, VoxelTypeId(3));
        section.set(0, 0, 0, VoxelTypeId(1));
        section.compact();
        assert_eq!(section.palette(), &[VoxelTypeId(1), VoxelTypeId(3)]);
        assert_eq!(section.get(1, 0, 0), VoxelTypeId(3));
        assert_eq!(section.get(0, 0, 0), VoxelTypeId(1));
    }

    #[test]
    fn test_widens_past_256_types() {
        let mut section = ColumnSection::new_air();
        for i in 1..=300u16 {
            let i_usize = i as usize;
            section.set(
                i_usize % SECTION_SIZE,
                i_usize / (SECTION_SIZE * SECTION_SIZE),
                (i_usize / SECTION_SIZE) % SECTION_SIZE,
                VoxelTypeId(i),
            );
        }
        assert_eq!(section.palette().len(), 301);
        for i in 1..=300u16 {
            let i_usize = i as usize;
            assert_eq!(
                section.get(
                    i_usize % SECTION_SIZE,
                    i_usize / (SECTION_SIZE * SECTION_SIZE),
                    (i_usize / SECTION_SIZE) % SECTION_SIZE,
                ),
                VoxelTypeId(i)
            );
        }
    }

    #[test]
    fn test_all_voxels_accessible() {
        let types = [VoxelTypeId(0), VoxelTypeId(1), VoxelTypeId(2)];
        let mut section = ColumnSection::new_air();
        for y in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                for x in 0..SECTION_SIZE {
                    section.set(x, y, z, types[(x + y + z) % 3]);
                }
            }
        }
        for y in 0..SECTION_SIZE {
            for z in 0..SECTION_SIZE {
                for x in 0..SECTION_SIZE {
                    assert_eq!(
                        section.get(x, y, z),
                        types[(x + y + z) % 3],
                        "mismatch at ({x}, {y}, {z})"
                    );
                }
            }
        }
    }
}
