//! A tile column: a vertical stack of [`ColumnSection`]s.

use crate::registry::VoxelTypeId;
use crate::section::{ColumnSection, SECTION_SIZE};

/// Vertical stack of 16³ sections covering `[min_y, min_y + 16 * sections)`.
///
/// Coordinates passed to [`get`](Self::get) and [`set`](Self::set) are
/// tile-local on X/Z (`0..16`) and absolute on Y. Reads outside the covered
/// range return air; writes there are dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelColumn {
    min_y: i32,
    sections: Vec<ColumnSection>,
}

impl VoxelColumn {
    /// Creates an all-air column with `sections` sections starting at `min_y`.
    pub fn new(min_y: i32, sections: usize) -> Self {
        Self {
            min_y,
            sections: vec![ColumnSection::new_air(); sections],
        }
    }

    /// Lowest covered altitude.
    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    /// One past the highest covered altitude.
    pub fn max_y(&self) -> i32 {
        self.min_y + (self.sections.len() * SECTION_SIZE) as i32
    }

    /// Returns the voxel at tile-local `(x, z)` and absolute `y`.
    pub fn get(&self, x: usize, y: i32, z: usize) -> VoxelTypeId {
        match self.locate(y) {
            Some((section, local_y)) => self.sections[section].get(x, local_y, z),
            None => VoxelTypeId::AIR,
        }
    }

    /// Writes the voxel at tile-local `(x, z)` and absolute `y`.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, x: usize, y: i32, z: usize, voxel: VoxelTypeId) -> bool {
        let Some((section, local_y)) = self.locate(y) else {
            tracing::trace!(y, "VoxelColumn::set outside vertical range");
            return false;
        };
        let section = &mut self.sections[section];
        if section.get(x, local_y, z) == voxel {
            return false;
        }
        section.set(x, local_y, z, voxel);
        true
    }

    /// Compacts every section's palette.
    pub fn compact(&mut self) {
        for section in &mut self.sections {
            section.compact();
        }
    }

    fn locate(&self, y: i32) -> Option<(usize, usize)> {
        if y < self.min_y || y >= self.max_y() {
            return None;
        }
        let offset = (y - self.min_y) as usize;
        Some((offset / SECTION_SIZE, offset % SECTION_SIZE))
    }
}
