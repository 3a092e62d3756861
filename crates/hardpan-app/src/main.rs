//! `hardpan`: generates a demo world and runs the hardening pass over it.

mod terrain;

use std::sync::Arc;

use clap::Parser;
use hardpan_config::{CliArgs, Config, LayeredConfig, default_config_dir};
use hardpan_gen::{CommitStats, Hardener, TileOutcome};
use hardpan_voxel::{TilePos, VoxelTypeRegistry, VoxelWorld};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::terrain::{TerrainGenerator, TerrainParams};

/// Vertical extent of the demo world.
const WORLD_HEIGHT: u32 = 256;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides
    let layered = LayeredConfig::load(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        LayeredConfig::with_global(&config_dir, Config::default())
    });
    let mut config = layered.global();
    config.apply_cli_overrides(&args);
    layered.set_global(config.clone());

    let log_dir = config_dir.join("logs");
    hardpan_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %config_dir.display(), dimension = args.dimension, "hardpan starting");

    let registry = Arc::new(VoxelTypeRegistry::with_defaults());
    let params = TerrainParams {
        seed: args.seed,
        ..Default::default()
    };
    let generator = TerrainGenerator::new(params, &registry)?;

    // One column of margin so edge tiles see real neighbors.
    let side = args.tiles as i32;
    let mut world = VoxelWorld::new(args.dimension, 0, WORLD_HEIGHT);
    for tx in -1..=side {
        for tz in -1..=side {
            generator.populate(&mut world, TilePos::new(tx, tz));
        }
    }
    info!(
        columns = world.loaded_count(),
        seed = args.seed,
        sea_level = generator.params().sea_level,
        "demo terrain generated"
    );

    let mut order: Vec<TilePos> = (0..side)
        .flat_map(|x| (0..side).map(move |z| TilePos::new(x, z)))
        .collect();
    order.shuffle(&mut ChaCha8Rng::seed_from_u64(args.seed));

    let hardener = Hardener::new(Arc::new(layered), registry);
    let mut total = CommitStats::default();
    let mut skipped = 0usize;

    for tile in order {
        match hardener.generate(tile.x, tile.z, &mut world) {
            TileOutcome::Hardened(stats) => {
                info!(
                    tile_x = tile.x,
                    tile_z = tile.z,
                    converted = stats.converted,
                    protected = stats.protected,
                    safe = stats.safe,
                    "tile hardened"
                );
                total.merge(&stats);
            }
            TileOutcome::Skipped(reason) => {
                info!(tile_x = tile.x, tile_z = tile.z, ?reason, "tile skipped");
                skipped += 1;
            }
        }
    }

    info!(
        tiles = side * side,
        skipped,
        converted = total.converted,
        already_hardened = total.already_hardened,
        protected = total.protected,
        safe = total.safe,
        untouchable = total.untouchable,
        "hardening complete"
    );
    Ok(())
}
