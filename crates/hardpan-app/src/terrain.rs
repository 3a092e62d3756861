//! Demo terrain: fBm heightmap, sea, caves, lava pools, ore, bedrock floor.
//!
//! Every voxel is a pure function of the seed and its absolute position, so
//! columns can be generated in any order and neighbors always agree.

use hardpan_voxel::{RegistryError, TILE_SIZE, TilePos, VoxelTypeId, VoxelTypeRegistry, VoxelWorld};
use noise::{NoiseFn, Simplex};

/// Shape of the demo terrain.
#[derive(Clone, Debug)]
pub struct TerrainParams {
    /// World seed.
    pub seed: u64,
    /// Mean surface altitude.
    pub base_height: f64,
    /// Amplitude of the first heightmap octave.
    pub amplitude: f64,
    /// Frequency of the first heightmap octave.
    pub base_frequency: f64,
    /// Heightmap octaves.
    pub octaves: u32,
    /// Columns whose surface is below this altitude are flooded with water.
    pub sea_level: i32,
    /// Cave noise at or below this value is carved out.
    pub cave_threshold: f64,
    /// Frequency of the cave noise.
    pub cave_frequency: f64,
    /// Caves below this altitude fill with lava.
    pub lava_level: i32,
    /// Thickness of the bedrock floor.
    pub bedrock_layers: i32,
    /// Ore noise above this value places ore.
    pub ore_threshold: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 0,
            base_height: 64.0,
            amplitude: 24.0,
            base_frequency: 0.01,
            octaves: 4,
            sea_level: 56,
            cave_threshold: -0.55,
            cave_frequency: 0.06,
            lava_level: 10,
            bedrock_layers: 2,
            ore_threshold: 0.75,
        }
    }
}

/// Voxel ids the generator places.
#[derive(Clone, Copy, Debug)]
struct Palette {
    stone: VoxelTypeId,
    dirt: VoxelTypeId,
    grass: VoxelTypeId,
    sand: VoxelTypeId,
    water: VoxelTypeId,
    lava: VoxelTypeId,
    bedrock: VoxelTypeId,
    coal_ore: VoxelTypeId,
    iron_ore: VoxelTypeId,
}

impl Palette {
    fn resolve(registry: &VoxelTypeRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            stone: registry.resolve("stone")?,
            dirt: registry.resolve("dirt")?,
            grass: registry.resolve("grass")?,
            sand: registry.resolve("sand")?,
            water: registry.resolve("water")?,
            lava: registry.resolve("lava")?,
            bedrock: registry.resolve("bedrock")?,
            coal_ore: registry.resolve("coal_ore")?,
            iron_ore: registry.resolve("iron_ore")?,
        })
    }
}

/// Fills tile columns of a [`VoxelWorld`] with noise terrain.
pub struct TerrainGenerator {
    height_noise: Simplex,
    cave_noise: Simplex,
    ore_noise: Simplex,
    params: TerrainParams,
    palette: Palette,
}

impl TerrainGenerator {
    /// Creates a generator placing voxels from `registry`.
    ///
    /// Fails if the registry lacks one of the terrain voxel types.
    pub fn new(params: TerrainParams, registry: &VoxelTypeRegistry) -> Result<Self, RegistryError> {
        let palette = Palette::resolve(registry)?;
        // Distinct seed offsets decorrelate the three noise fields.
        Ok(Self {
            height_noise: Simplex::new(params.seed as u32),
            cave_noise: Simplex::new(params.seed.wrapping_add(0xCAFE_BABE) as u32),
            ore_noise: Simplex::new(params.seed.wrapping_add(0x0DE5_EED5) as u32),
            params,
            palette,
        })
    }

    /// Terrain parameters.
    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Surface altitude at column `(x, z)`: the first air (or water) voxel.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let mut total = 0.0;
        let mut frequency = self.params.base_frequency;
        let mut amplitude = self.params.amplitude;
        for _ in 0..self.params.octaves {
            total += self.height_noise.get([x as f64 * frequency, z as f64 * frequency]) * amplitude;
            frequency *= 2.0;
            amplitude *= 0.5;
        }
        (self.params.base_height + total).round() as i32
    }

    /// Voxel at absolute `(x, y, z)` given the column's surface altitude.
    pub fn voxel_at(&self, x: i32, y: i32, z: i32, surface: i32) -> VoxelTypeId {
        let p = &self.params;
        let palette = &self.palette;

        if y < p.bedrock_layers {
            return palette.bedrock;
        }
        if y >= surface {
            return if y < p.sea_level { palette.water } else { VoxelTypeId::AIR };
        }

        let depth = surface - y;
        if depth > 3 && self.is_cave(x, y, z) {
            return if y < p.lava_level { palette.lava } else { VoxelTypeId::AIR };
        }

        match depth {
            1 if surface <= p.sea_level + 1 => palette.sand,
            1 => palette.grass,
            2..=3 => palette.dirt,
            _ => self.ore_at(x, y, z).unwrap_or(palette.stone),
        }
    }

    /// Loads the column of `tile` into `world` and overwrites every voxel of
    /// it with generated terrain.
    pub fn populate(&self, world: &mut VoxelWorld, tile: TilePos) {
        let column = world.load_column(tile);
        let (min_y, max_y) = (column.min_y(), column.max_y());

        for lz in 0..TILE_SIZE {
            for lx in 0..TILE_SIZE {
                let (x, z) = (tile.min_x() + lx, tile.min_z() + lz);
                let surface = self.surface_height(x, z);
                for y in min_y..max_y {
                    let voxel = self.voxel_at(x, y, z, surface);
                    column.set(lx as usize, y, lz as usize, voxel);
                }
            }
        }

        column.compact();
    }

    fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let f = self.params.cave_frequency;
        // Squash vertically so caves run as tunnels rather than shafts.
        let noise = self.cave_noise.get([x as f64 * f, y as f64 * f * 2.0, z as f64 * f]);
        noise <= self.params.cave_threshold
    }

    fn ore_at(&self, x: i32, y: i32, z: i32) -> Option<VoxelTypeId> {
        let noise = self.ore_noise.get([x as f64 * 0.15, y as f64 * 0.15, z as f64 * 0.15]);
        if noise <= self.params.ore_threshold {
            return None;
        }
        Some(if y < self.params.sea_level / 2 {
            self.palette.iron_ore
        } else {
            self.palette.coal_ore
        })
    }
}
