//! Tile codes shared between the generator and its consumers
//!
//! The numeric values are the contract: renderers and collision code index by
//! them. Codes `0..=14` form the overworld legend; `15..=23` are urban tiles
//! that only the campus generator emits.

use serde::{Deserialize, Serialize};

/// A single tile code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum TileCode {
    #[default]
    Grass = 0,
    /// Tree. Also the generic impassable wall: grid borders, mountains and
    /// dungeon rock all use this code.
    Tree = 1,
    Water = 2,
    Floor = 3,
    Path = 4,
    Door = 5,
    Carpet = 6,
    Flower = 7,
    Rock = 8,
    HouseWall = 9,
    Roof = 10,
    Bush = 11,
    TallGrass = 12,
    Sand = 13,
    Dirt = 14,
    // Urban legend
    Road = 15,
    Building = 16,
    Sidewalk = 17,
    Parking = 18,
    Plaza = 19,
    Hedge = 20,
    SportField = 21,
    BuildingDark = 22,
    BigTree = 23,
}

/// Impassable tile written on every grid border.
pub const BORDER_TILE: TileCode = TileCode::Tree;

impl TileCode {
    pub fn all() -> &'static [TileCode] {
        use TileCode::*;
        &[
            Grass, Tree, Water, Floor, Path, Door, Carpet, Flower, Rock, HouseWall, Roof, Bush,
            TallGrass, Sand, Dirt, Road, Building, Sidewalk, Parking, Plaza, Hedge, SportField,
            BuildingDark, BigTree,
        ]
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<TileCode> {
        TileCode::all().get(code as usize).copied()
    }

    /// Blocks movement for the collision collaborator.
    pub fn is_solid(self) -> bool {
        use TileCode::*;
        matches!(
            self,
            Tree | Water | Rock | HouseWall | Roof | Building | Hedge | BuildingDark | BigTree
        )
    }

    pub fn is_road(self) -> bool {
        matches!(self, TileCode::Path | TileCode::Road)
    }

    pub fn name(self) -> &'static str {
        use TileCode::*;
        match self {
            Grass => "Grass",
            Tree => "Tree",
            Water => "Water",
            Floor => "Floor",
            Path => "Path",
            Door => "Door",
            Carpet => "Carpet",
            Flower => "Flower",
            Rock => "Rock",
            HouseWall => "House Wall",
            Roof => "Roof",
            Bush => "Bush",
            TallGrass => "Tall Grass",
            Sand => "Sand",
            Dirt => "Dirt",
            Road => "Road",
            Building => "Building",
            Sidewalk => "Sidewalk",
            Parking => "Parking",
            Plaza => "Plaza",
            Hedge => "Hedge",
            SportField => "Sport Field",
            BuildingDark => "Dark Building",
            BigTree => "Big Tree",
        }
    }

    /// Preview color used by the PNG exporter.
    pub fn color(self) -> (u8, u8, u8) {
        use TileCode::*;
        match self {
            Grass => (106, 170, 80),
            Tree => (34, 92, 44),
            Water => (52, 110, 190),
            Floor => (170, 140, 100),
            Path => (196, 170, 120),
            Door => (120, 70, 30),
            Carpet => (160, 40, 50),
            Flower => (220, 120, 170),
            Rock => (120, 120, 120),
            HouseWall => (150, 110, 80),
            Roof => (170, 60, 40),
            Bush => (60, 130, 60),
            TallGrass => (90, 150, 60),
            Sand => (225, 205, 150),
            Dirt => (140, 105, 70),
            Road => (70, 70, 75),
            Building => (180, 180, 190),
            Sidewalk => (200, 200, 200),
            Parking => (110, 110, 120),
            Plaza => (215, 205, 185),
            Hedge => (45, 110, 50),
            SportField => (80, 160, 90),
            BuildingDark => (95, 95, 110),
            BigTree => (25, 75, 35),
        }
    }
}

impl From<TileCode> for u8 {
    fn from(tile: TileCode) -> u8 {
        tile.code()
    }
}

impl TryFrom<u8> for TileCode {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        TileCode::from_code(code).ok_or_else(|| format!("unknown tile code {}", code))
    }
}

/// Which code range a map is allowed to use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Legend {
    /// Exterior world, interiors and dungeons: codes 0..=14
    Overworld,
    /// Campus maps: urban codes plus a few natural tiles
    Campus,
}

impl Legend {
    pub fn allows(self, tile: TileCode) -> bool {
        use TileCode::*;
        match self {
            Legend::Overworld => tile.code() <= Dirt.code(),
            Legend::Campus => matches!(
                tile,
                Grass | Tree | Water | Path | Flower | Rock | TallGrass | Sand
            ) || tile.code() >= Road.code(),
        }
    }
}
