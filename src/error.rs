//! Generator error types.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("map is {width}x{height}, minimum is {min}x{min}")]
    MapTooSmall { width: usize, height: usize, min: usize },

    #[error("tile size must be non-zero")]
    ZeroTileSize,

    #[error("tile size {tile_size} puts a {extent}-tile edge past the pixel range")]
    TileSizeTooLarge { tile_size: u32, extent: usize },

    #[error("POI spacing {spacing} is below the structure clearance of {min}")]
    SpacingTooSmall { spacing: f64, min: f64 },

    #[error("POI margin {margin} leaves no placement area on a {width}x{height} map")]
    NoPlacementArea { margin: usize, width: usize, height: usize },

    #[error("POI margin {margin} is below the minimum of {min}")]
    MarginTooSmall { margin: usize, min: usize },

    #[error("POI spacing must be a finite, non-negative distance, got {0}")]
    InvalidSpacing(f64),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("invalid {name} range: {min}..={max}")]
    InvalidRange { name: &'static str, min: usize, max: usize },

    #[error("dungeon is {width}x{height}, too small for rooms up to {room_max}")]
    DungeonTooSmall { width: usize, height: usize, room_max: usize },
}
