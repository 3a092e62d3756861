//! Post-generation hardening pass.
//!
//! For each freshly generated tile, every voxel that is not within a
//! configurable Chebyshev radius of a *safe* voxel (air by default, optionally
//! liquids) is replaced with a single *hardened* type. *Untouchable* voxels are
//! neither read as candidates nor written.
//!
//! A pass reads a volume padded by the radius around the tile, so protection
//! crosses tile boundaries, but only writes inside the tile itself. The final
//! result therefore does not depend on the order tiles are generated in.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hardpan_config::Config;
//! use hardpan_gen::Hardener;
//! use hardpan_voxel::{VoxelTypeRegistry, VoxelWorld};
//!
//! let hardener = Hardener::new(Config::default(), Arc::new(VoxelTypeRegistry::with_defaults()));
//! let mut world = VoxelWorld::new(0, 0, 256);
//! let outcome = hardener.generate(0, 0, &mut world);
//! println!("{outcome:?}");
//! ```

pub mod bounds;
pub mod grid;
pub mod hardener;
pub mod propagate;
pub mod settings;

pub use bounds::TileBounds;
pub use grid::{Cell, ClassificationGrid};
pub use hardener::{Hardener, SkipReason, TileOutcome};
pub use propagate::{CommitStats, TilePlan, commit, propagate};
pub use settings::{FALLBACK_HARD_BLOCK, SettingsSource, TileSettings, Whitelist};
