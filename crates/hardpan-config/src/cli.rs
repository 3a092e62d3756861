//! Command-line argument parsing for the `hardpan` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// hardpan command-line arguments.
///
/// Generation values override settings loaded from `hardpan.ron`.
#[derive(Parser, Debug)]
#[command(name = "hardpan", about = "Harden voxels out of reach of air")]
pub struct CliArgs {
    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Protection radius in voxels.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Altitude ceiling of the pass.
    #[arg(long)]
    pub max_altitude: Option<u32>,

    /// Count liquids as safe voxels.
    #[arg(long)]
    pub liquid_safety: Option<bool>,

    /// Voxel type written over unprotected voxels.
    #[arg(long)]
    pub hard_block: Option<String>,

    /// Dimension the demo world belongs to.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub dimension: i32,

    /// Side length of the demo world in tiles.
    #[arg(long, default_value_t = 4)]
    pub tiles: u32,

    /// Terrain seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(radius) = args.radius {
            self.generation.radius = radius;
        }
        if let Some(altitude) = args.max_altitude {
            self.generation.max_altitude = altitude;
        }
        if let Some(liquid) = args.liquid_safety {
            self.generation.enable_liquid_safety = liquid;
        }
        if let Some(ref block) = args.hard_block {
            self.generation.hard_block = block.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs::parse_from(["hardpan", "--radius", "3", "--hard-block", "stone"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.radius, 3);
        assert_eq!(config.generation.hard_block, "stone");
        // Non-overridden fields retain defaults
        assert_eq!(config.generation.max_altitude, 255);
        assert!(!config.generation.enable_liquid_safety);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        let args = CliArgs::parse_from(["hardpan"]);
        config.apply_cli_overrides(&args);
        assert_eq!(config, original);
        assert_eq!(args.tiles, 4);
        assert_eq!(args.dimension, 0);
    }

    #[test]
    fn test_negative_dimension_parses() {
        let args = CliArgs::parse_from(["hardpan", "--dimension", "-1", "--liquid-safety", "true"]);
        assert_eq!(args.dimension, -1);
        assert_eq!(args.liquid_safety, Some(true));
    }
}
