//! Configuration for the hardening pass.
//!
//! Settings persist to disk as RON. A global `hardpan.ron` holds the defaults;
//! optional `dimensions/DIM<id>.ron` files override them per dimension.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;
mod layered;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, GenerationConfig, MAX_RADIUS, WhitelistConfig,
    default_config_dir,
};
pub use error::ConfigError;
pub use layered::{DIMENSIONS_DIR, GenerationOverride, LayeredConfig, dimension_file};
