//! Generator configuration
//!
//! Every tunable the generator reads. `GeneratorConfig::default()` is the
//! shipped configuration; custom values go through [`GeneratorConfig::validate`]
//! before any generation starts.

use crate::error::ConfigError;

/// Smallest map edge the structure stamps fit on.
pub const MIN_MAP_SIZE: usize = 24;

/// Structures reach up to this many tiles from their anchor, plus one for the
/// border ring.
pub const MIN_POI_MARGIN: usize = 4;

/// Smallest POI spacing that keeps structures apart.
///
/// A footprint plus the tile in front of its door spans at most two tiles
/// either side of its anchor. A Euclidean spacing of `6 * sqrt(2)` forces at
/// least six tiles on one axis, which leaves a free column or row between
/// neighbours for roads to pass.
pub const MIN_POI_SPACING: f64 = 9.0;

/// Configuration for world generation
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    // =========================================================================
    // Exterior map
    // =========================================================================

    pub map_width: usize,
    pub map_height: usize,
    /// Pixels per tile in exported positions
    pub tile_size: u32,

    // =========================================================================
    // Points of interest
    // =========================================================================

    /// Attempted POIs besides the spawn (best-effort)
    pub poi_count: usize,
    /// Minimum Euclidean spacing between POIs, in tiles
    pub poi_min_distance: f64,
    /// Keep-out band along every edge
    pub poi_margin: usize,
    /// Rejected positions before a POI is abandoned
    pub poi_max_attempts: usize,
    /// Chance a new POI is a dungeon entrance (while under the cap)
    pub dungeon_chance: f64,
    pub max_dungeons: usize,
    /// Share of the remaining POIs that become ruins rather than houses
    pub ruin_fraction: f64,

    // =========================================================================
    // Roads and terrain
    // =========================================================================

    /// Chance a carved road step also paves a neighbouring cell
    pub road_widen_chance: f64,
    /// Per-cell enemy roll in dense and mixed forest
    pub forest_enemy_chance: f64,
    /// Per-cell enemy roll on open ground
    pub open_enemy_chance: f64,
    pub house_npc_chance: f64,

    // =========================================================================
    // Dungeons
    // =========================================================================

    pub dungeon_width: usize,
    pub dungeon_height: usize,
    pub dungeon_min_rooms: usize,
    pub dungeon_max_rooms: usize,
    pub room_min_size: usize,
    pub room_max_size: usize,
    /// Chance an interior room gets a wandering enemy
    pub room_enemy_chance: f64,
    /// Chance an interior room gets a loot chest
    pub room_loot_chance: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            map_width: 100,
            map_height: 100,
            tile_size: 32,
            poi_count: 10,
            poi_min_distance: 14.0,
            poi_margin: 8,
            poi_max_attempts: 60,
            dungeon_chance: 0.2,
            max_dungeons: 2,
            ruin_fraction: 0.6,
            road_widen_chance: 0.3,
            forest_enemy_chance: 0.01,
            open_enemy_chance: 0.004,
            house_npc_chance: 0.7,
            dungeon_width: 48,
            dungeon_height: 48,
            dungeon_min_rooms: 6,
            dungeon_max_rooms: 8,
            room_min_size: 4,
            room_max_size: 9,
            room_enemy_chance: 0.6,
            room_loot_chance: 0.5,
        }
    }
}

impl GeneratorConfig {
    /// Check the configuration can produce a well-formed world.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.map_width < MIN_MAP_SIZE || self.map_height < MIN_MAP_SIZE {
            return Err(ConfigError::MapTooSmall {
                width: self.map_width,
                height: self.map_height,
                min: MIN_MAP_SIZE,
            });
        }
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        // Pixel positions are i32; the far edge of the largest grid must fit
        let extent = self
            .map_width
            .max(self.map_height)
            .max(self.dungeon_width)
            .max(self.dungeon_height);
        if (extent as u64).saturating_mul(self.tile_size as u64) > i32::MAX as u64 {
            return Err(ConfigError::TileSizeTooLarge {
                tile_size: self.tile_size,
                extent,
            });
        }
        if self.poi_margin < MIN_POI_MARGIN {
            return Err(ConfigError::MarginTooSmall {
                margin: self.poi_margin,
                min: MIN_POI_MARGIN,
            });
        }
        if self.poi_margin * 2 >= self.map_width || self.poi_margin * 2 >= self.map_height {
            return Err(ConfigError::NoPlacementArea {
                margin: self.poi_margin,
                width: self.map_width,
                height: self.map_height,
            });
        }
        if !self.poi_min_distance.is_finite() || self.poi_min_distance < 0.0 {
            return Err(ConfigError::InvalidSpacing(self.poi_min_distance));
        }
        if self.poi_min_distance < MIN_POI_SPACING {
            return Err(ConfigError::SpacingTooSmall {
                spacing: self.poi_min_distance,
                min: MIN_POI_SPACING,
            });
        }

        for (name, value) in [
            ("dungeon_chance", self.dungeon_chance),
            ("ruin_fraction", self.ruin_fraction),
            ("road_widen_chance", self.road_widen_chance),
            ("forest_enemy_chance", self.forest_enemy_chance),
            ("open_enemy_chance", self.open_enemy_chance),
            ("house_npc_chance", self.house_npc_chance),
            ("room_enemy_chance", self.room_enemy_chance),
            ("room_loot_chance", self.room_loot_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }

        if self.dungeon_min_rooms == 0 || self.dungeon_min_rooms > self.dungeon_max_rooms {
            return Err(ConfigError::InvalidRange {
                name: "dungeon rooms",
                min: self.dungeon_min_rooms,
                max: self.dungeon_max_rooms,
            });
        }
        if self.room_min_size < 3 || self.room_min_size > self.room_max_size {
            return Err(ConfigError::InvalidRange {
                name: "room size",
                min: self.room_min_size,
                max: self.room_max_size,
            });
        }
        // Rooms sit inside a one-tile wall ring
        if self.room_max_size + 2 > self.dungeon_width || self.room_max_size + 2 > self.dungeon_height {
            return Err(ConfigError::DungeonTooSmall {
                width: self.dungeon_width,
                height: self.dungeon_height,
                room_max: self.room_max_size,
            });
        }

        Ok(())
    }
}
