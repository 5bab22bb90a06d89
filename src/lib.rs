//! Seeded overworld generation library
//!
//! Builds a playable 2D world from a single seed: terrain, roads between
//! points of interest, houses and ruins, and dungeons behind their entrances.
//! Re-exports modules for use by the binary and tools.

pub mod ascii;
pub mod campus;
pub mod config;
pub mod dungeon;
pub mod error;
pub mod export;
pub mod poi;
pub mod rng;
pub mod roads;
pub mod seeds;
pub mod structures;
pub mod terrain;
pub mod tilemap;
pub mod tiles;
pub mod types;
pub mod value_noise;
pub mod world;

pub use config::GeneratorConfig;
pub use error::ConfigError;
pub use tiles::{Legend, TileCode};
pub use types::{GeneratedWorld, MapData};
pub use world::{generate_world, generate_world_with};
