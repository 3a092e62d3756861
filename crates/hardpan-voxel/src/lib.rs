//! Voxel types, palette-compressed tile columns, and the world accessor used by
//! post-generation passes.

pub mod column;
pub mod position;
pub mod registry;
pub mod section;
pub mod world;

pub use column::VoxelColumn;
pub use position::{TILE_SIZE, TilePos, VoxelBox, VoxelPos};
pub use registry::{Matter, RegistryError, VoxelTypeDef, VoxelTypeId, VoxelTypeRegistry};
pub use section::{ColumnSection, SECTION_SIZE, SECTION_VOLUME};
pub use world::{VoxelAccess, VoxelWorld};
