//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the global configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "hardpan.ron";

/// Largest accepted protection radius. The padded read volume grows with the
/// cube of the radius, so larger values are clamped to this.
pub const MAX_RADIUS: u32 = 32;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Hardening pass settings. Per-dimension files may override these.
    pub generation: GenerationConfig,
    /// Which dimensions the pass runs in.
    pub whitelist: WhitelistConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Settings for the hardening pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Chebyshev distance within which a safe voxel protects its neighbors.
    pub radius: u32,
    /// Voxels at or above this altitude are never hardened.
    pub max_altitude: u32,
    /// Treat every liquid as a safe voxel.
    pub enable_liquid_safety: bool,
    /// Names of voxel types that protect themselves and their surroundings.
    pub safe_blocks: Vec<String>,
    /// Names of voxel types that are never read as protecting and never written.
    pub untouchable_blocks: Vec<String>,
    /// Name of the voxel type written over unprotected voxels.
    pub hard_block: String,
}

/// Dimension whitelist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WhitelistConfig {
    /// Run in every dimension, ignoring the ID list.
    pub enable_global_whitelist: bool,
    /// Dimensions the pass runs in when the global whitelist is off.
    pub whitelisted_dimension_ids: Vec<i32>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            radius: 1,
            max_altitude: 255,
            enable_liquid_safety: false,
            safe_blocks: vec!["air".to_string()],
            untouchable_blocks: vec!["bedrock".to_string()],
            hard_block: "obsidian".to_string(),
        }
    }
}

impl Default for WhitelistConfig {
    fn default() -> Self {
        Self {
            enable_global_whitelist: false,
            whitelisted_dimension_ids: vec![0],
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Returns a copy with `radius` clamped to `1..=MAX_RADIUS` and
    /// `max_altitude` to at least 1.
    pub fn sanitized(&self) -> Self {
        let mut clean = self.clone();
        if clean.radius == 0 {
            log::warn!("radius must be positive; using 1");
            clean.radius = 1;
        } else if clean.radius > MAX_RADIUS {
            log::warn!("radius {} exceeds {MAX_RADIUS}; using {MAX_RADIUS}", clean.radius);
            clean.radius = MAX_RADIUS;
        }
        if clean.max_altitude == 0 {
            log::warn!("max_altitude must be positive; using 1");
            clean.max_altitude = 1;
        }
        clean
    }
}

impl WhitelistConfig {
    /// Returns `true` if the pass should run in `dimension`.
    pub fn allows(&self, dimension: i32) -> bool {
        self.enable_global_whitelist || self.whitelisted_dimension_ids.contains(&dimension)
    }
}

/// Default config directory: `<platform config dir>/hardpan`, or `./config`
/// when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("hardpan"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `hardpan.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE_NAME))?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("radius: 1"));
        assert!(ron_str.contains("hard_block: \"obsidian\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(generation: (radius: 4))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.generation.radius, 4);
        assert_eq!(config.generation.max_altitude, 255);
        assert_eq!(config.whitelist, WhitelistConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_sanitized_clamps_zero() {
        let config = GenerationConfig {
            radius: 0,
            max_altitude: 0,
            ..Default::default()
        };
        let clean = config.sanitized();
        assert_eq!(clean.radius, 1);
        assert_eq!(clean.max_altitude, 1);
        assert_eq!(clean.hard_block, config.hard_block);
    }

    #[test]
    fn test_sanitized_clamps_oversized_radius() {
        for radius in [MAX_RADIUS + 1, 100_000, 3_000_000_000, u32::MAX] {
            let config = GenerationConfig {
                radius,
                ..Default::default()
            };
            assert_eq!(config.sanitized().radius, MAX_RADIUS);
        }
        let at_limit = GenerationConfig {
            radius: MAX_RADIUS,
            ..Default::default()
        };
        assert_eq!(at_limit.sanitized().radius, MAX_RADIUS);
    }

    #[test]
    fn test_whitelist_allows() {
        let mut whitelist = WhitelistConfig::default();
        assert!(whitelist.allows(0));
        assert!(!whitelist.allows(-1));
        whitelist.enable_global_whitelist = true;
        assert!(whitelist.allows(-1));
        assert!(whitelist.allows(42));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.generation.radius = 3;
        config.generation.safe_blocks.push("water".to_string());
        config.whitelist.whitelisted_dimension_ids = vec![0, -1];

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.generation.hard_block = "stone".to_string();
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().generation.hard_block, "stone");
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}
