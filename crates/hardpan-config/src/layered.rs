//! Per-dimension overrides layered over the global configuration.
//!
//! A dimension may carry its own `dimensions/DIM<id>.ron` next to the global
//! `hardpan.ron`. Every field in it is optional; absent fields inherit the
//! global value. A missing, unreadable, or malformed override file never
//! fails resolution, it just yields the global settings.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::config::{Config, GenerationConfig, WhitelistConfig};
use crate::error::ConfigError;

/// Subdirectory of the config directory holding per-dimension files.
pub const DIMENSIONS_DIR: &str = "dimensions";

/// Sparse per-dimension override of [`GenerationConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationOverride {
    /// Overrides [`GenerationConfig::radius`].
    pub radius: Option<u32>,
    /// Overrides [`GenerationConfig::max_altitude`].
    pub max_altitude: Option<u32>,
    /// Overrides [`GenerationConfig::enable_liquid_safety`].
    pub enable_liquid_safety: Option<bool>,
    /// Overrides [`GenerationConfig::safe_blocks`].
    pub safe_blocks: Option<Vec<String>>,
    /// Overrides [`GenerationConfig::untouchable_blocks`].
    pub untouchable_blocks: Option<Vec<String>>,
    /// Overrides [`GenerationConfig::hard_block`].
    pub hard_block: Option<String>,
}

impl GenerationOverride {
    /// Applies the fields that are set on top of `base`.
    pub fn apply_to(&self, base: &GenerationConfig) -> GenerationConfig {
        GenerationConfig {
            radius: self.radius.unwrap_or(base.radius),
            max_altitude: self.max_altitude.unwrap_or(base.max_altitude),
            enable_liquid_safety: self
                .enable_liquid_safety
                .unwrap_or(base.enable_liquid_safety),
            safe_blocks: self
                .safe_blocks
                .clone()
                .unwrap_or_else(|| base.safe_blocks.clone()),
            untouchable_blocks: self
                .untouchable_blocks
                .clone()
                .unwrap_or_else(|| base.untouchable_blocks.clone()),
            hard_block: self
                .hard_block
                .clone()
                .unwrap_or_else(|| base.hard_block.clone()),
        }
    }
}

/// Returns the override file path for `dimension` under `config_dir`.
pub fn dimension_file(config_dir: &Path, dimension: i32) -> PathBuf {
    config_dir
        .join(DIMENSIONS_DIR)
        .join(format!("DIM{dimension}.ron"))
}

/// Global config plus on-demand per-dimension overrides from one directory.
#[derive(Debug)]
pub struct LayeredConfig {
    config_dir: PathBuf,
    global: RwLock<Config>,
}

impl LayeredConfig {
    /// Loads (or creates) the global config in `config_dir`.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let global = Config::load_or_create(config_dir)?;
        Ok(Self::with_global(config_dir, global))
    }

    /// Wraps an already-loaded global config.
    pub fn with_global(config_dir: &Path, global: Config) -> Self {
        Self {
            config_dir: config_dir.to_path_buf(),
            global: RwLock::new(global),
        }
    }

    /// Directory holding `hardpan.ron` and `dimensions/`.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Copy of the current global config.
    pub fn global(&self) -> Config {
        self.global
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the global config (e.g. after CLI overrides).
    pub fn set_global(&self, config: Config) {
        *self.global.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    /// Re-reads `hardpan.ron`. Returns `true` if it changed.
    ///
    /// Override files are read on every [`generation_for`](Self::generation_for)
    /// call, so they need no reload.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let mut global = self.global.write().unwrap_or_else(PoisonError::into_inner);
        match global.reload(&self.config_dir)? {
            Some(new_config) => {
                *global = new_config;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Current whitelist (global only; dimensions cannot whitelist themselves).
    pub fn whitelist(&self) -> WhitelistConfig {
        self.global
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .whitelist
            .clone()
    }

    /// Resolves the generation settings for `dimension`.
    ///
    /// Falls back to the global settings, with a log line, when the override
    /// file is missing, is a directory, cannot be read, or does not parse.
    pub fn generation_for(&self, dimension: i32) -> GenerationConfig {
        let base = self
            .global
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
            .clone();

        let path = dimension_file(&self.config_dir, dimension);
        if !path.exists() {
            log::info!("No config file for dimension {dimension}; using global config");
            return base;
        }
        if path.is_dir() {
            log::warn!(
                "Config path for dimension {dimension} is a directory ({}); using global config",
                path.display()
            );
            return base;
        }

        match read_override(&path) {
            Ok(overrides) => {
                log::info!("Read config for dimension {dimension} from {}", path.display());
                overrides.apply_to(&base)
            }
            Err(err @ ConfigError::ReadError { .. }) => {
                log::warn!("Config for dimension {dimension} not readable: {err}; using global config");
                base
            }
            Err(err) => {
                log::error!("Error loading config for dimension {dimension}: {err}");
                log::info!("Using global config instead");
                base
            }
        }
    }

    /// Writes an override file for `dimension`.
    pub fn save_override(
        &self,
        dimension: i32,
        overrides: &GenerationOverride,
    ) -> Result<(), ConfigError> {
        let path = dimension_file(&self.config_dir, dimension);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::WriteError)?;
        }
        let serialized = ron::ser::to_string_pretty(overrides, ron::ser::PrettyConfig::new())
            .map_err(ConfigError::SerializeError)?;
        std::fs::write(&path, serialized).map_err(ConfigError::WriteError)
    }
}

fn read_override(path: &Path) -> Result<GenerationOverride, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&contents).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}
