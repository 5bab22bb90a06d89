//! Output schema and shared generator types
//!
//! Everything a consumer reads lives here: maps, portals, interactables and
//! enemies in pixel space, plus the tile-space anchors (points of interest,
//! rooms, road segments) the generator works with internally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;
use crate::tiles::TileCode;

/// Id of the exterior map in every generated world.
pub const WORLD_MAP_ID: &str = "world";

/// A cell position in tile space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: usize,
    pub y: usize,
}

impl TilePos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn manhattan(&self, other: &TilePos) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn distance(&self, other: &TilePos) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Offset by a signed delta. `None` if it would go negative.
    pub fn offset(&self, dx: i64, dy: i64) -> Option<TilePos> {
        let x = self.x as i64 + dx;
        let y = self.y as i64 + dy;
        (x >= 0 && y >= 0).then(|| TilePos::new(x as usize, y as usize))
    }

    /// Top-left pixel of this tile. Saturates at `i32::MAX`; validated
    /// configs never get there.
    pub fn to_pixels(&self, tile_size: u32) -> Point {
        let scale = |v: usize| {
            let px = (v as u64).saturating_mul(tile_size as u64);
            i32::try_from(px).unwrap_or(i32::MAX)
        };
        Point {
            x: scale(self.x),
            y: scale(self.y),
        }
    }
}

/// A position in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Tile containing this pixel.
    pub fn to_tile(&self, tile_size: u32) -> Option<TilePos> {
        if self.x < 0 || self.y < 0 || tile_size == 0 {
            return None;
        }
        Some(TilePos::new(
            self.x as usize / tile_size as usize,
            self.y as usize / tile_size as usize,
        ))
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The rectangle covering exactly one tile.
    pub fn tile(pos: TilePos, tile_size: u32) -> Self {
        let origin = pos.to_pixels(tile_size);
        Self {
            x: origin.x,
            y: origin.y,
            width: tile_size as i32,
            height: tile_size as i32,
        }
    }

    pub fn top_left(&self) -> Point {
        Point { x: self.x, y: self.y }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Facing direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Overlay style the renderer applies to a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapTheme {
    Outdoor,
    Indoor,
    Dungeon,
    Cave,
}

/// How an interactable fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trigger {
    /// Player faces it and presses the action key
    Press,
    /// Player walks into it
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractableKind {
    Sign,
    Npc,
    Item,
}

/// Keys of the items loot can hand out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKey {
    Potion,
    OldKey,
    Flower,
    Berry,
}

impl ItemKey {
    pub fn all() -> &'static [ItemKey] {
        &[ItemKey::Potion, ItemKey::OldKey, ItemKey::Flower, ItemKey::Berry]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemKey::Potion => "Healing Potion",
            ItemKey::OldKey => "Old Key",
            ItemKey::Flower => "Wildflower",
            ItemKey::Berry => "Forest Berry",
        }
    }
}

/// A placed object the player can interact with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interactable {
    pub id: String,
    pub position: Point,
    pub width: i32,
    pub height: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(rename = "type")]
    pub kind: InteractableKind,
    pub active: bool,
    pub trigger: Trigger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_key: Option<ItemKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_flag: Option<String>,
}

impl Interactable {
    /// One-tile loot pickup.
    pub fn item(id: String, at: TilePos, key: ItemKey, tile_size: u32) -> Self {
        Self {
            id,
            position: at.to_pixels(tile_size),
            width: tile_size as i32,
            height: tile_size as i32,
            text: Vec::new(),
            kind: InteractableKind::Item,
            active: true,
            trigger: Trigger::Press,
            item_key: Some(key),
            req_flag: None,
        }
    }

    /// One-tile character with dialog lines.
    pub fn npc(id: String, at: TilePos, lines: &[&str], tile_size: u32) -> Self {
        Self {
            id,
            position: at.to_pixels(tile_size),
            width: tile_size as i32,
            height: tile_size as i32,
            text: lines.iter().map(|l| l.to_string()).collect(),
            kind: InteractableKind::Npc,
            active: true,
            trigger: Trigger::Press,
            item_key: None,
            req_flag: None,
        }
    }
}

/// Enemy archetype. Determines movement speed and base stats in the AI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Slime,
    Bat,
    Skeleton,
    Boss,
}

impl EnemyKind {
    /// Movement speed in pixels per millisecond
    pub fn speed(&self) -> f32 {
        match self {
            EnemyKind::Slime => 0.05,
            EnemyKind::Bat => 0.08,
            EnemyKind::Skeleton => 0.06,
            EnemyKind::Boss => 0.07,
        }
    }

    pub fn max_hp(&self) -> u32 {
        match self {
            EnemyKind::Slime => 20,
            EnemyKind::Bat => 12,
            EnemyKind::Skeleton => 35,
            EnemyKind::Boss => 150,
        }
    }

    /// Pixels within which the enemy notices the player
    pub fn detection_range(&self) -> f32 {
        match self {
            EnemyKind::Slime => 160.0,
            EnemyKind::Bat => 200.0,
            EnemyKind::Skeleton => 180.0,
            EnemyKind::Boss => 256.0,
        }
    }

    /// Pixels within which the enemy can hit the player
    pub fn attack_range(&self) -> f32 {
        match self {
            EnemyKind::Slime => 24.0,
            EnemyKind::Bat => 20.0,
            EnemyKind::Skeleton => 28.0,
            EnemyKind::Boss => 40.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyState {
    #[default]
    Idle,
    Chase,
}

/// A hostile entity placed on a map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub position: Point,
    pub direction: Direction,
    pub state: EnemyState,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
}

impl Enemy {
    /// Fresh enemy with the archetype's stats, idle and facing down.
    pub fn spawn(id: String, kind: EnemyKind, at: TilePos, tile_size: u32) -> Self {
        Self {
            id,
            kind,
            position: at.to_pixels(tile_size),
            direction: Direction::Down,
            state: EnemyState::Idle,
            hp: kind.max_hp(),
            max_hp: kind.max_hp(),
            speed: kind.speed(),
            detection_range: kind.detection_range(),
            attack_range: kind.attack_range(),
        }
    }
}

/// One half of a map link. The origin rectangle is in the owning map's pixel
/// space; the target is in the target map's pixel space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    #[serde(flatten)]
    pub origin: Rect,
    pub target_map: String,
    pub target_x: i32,
    pub target_y: i32,
    pub direction: Direction,
}

impl Portal {
    pub fn new(origin: Rect, target_map: &str, target: Point, direction: Direction) -> Self {
        Self {
            origin,
            target_map: target_map.to_string(),
            target_x: target.x,
            target_y: target.y,
            direction,
        }
    }

    pub fn target(&self) -> Point {
        Point { x: self.target_x, y: self.target_y }
    }
}

/// One playable map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub id: String,
    pub tiles: Tilemap<TileCode>,
    pub interactables: Vec<Interactable>,
    pub enemies: Vec<Enemy>,
    pub portals: Vec<Portal>,
    pub theme: MapTheme,
}

impl MapData {
    pub fn new(id: impl Into<String>, tiles: Tilemap<TileCode>, theme: MapTheme) -> Self {
        Self {
            id: id.into(),
            tiles,
            interactables: Vec::new(),
            enemies: Vec::new(),
            portals: Vec::new(),
            theme,
        }
    }

    pub fn tile_at(&self, pos: TilePos) -> Option<TileCode> {
        self.tiles.get(pos.x, pos.y).copied()
    }

    /// Portals leading to `target_map`.
    pub fn portals_to<'a>(&'a self, target_map: &'a str) -> impl Iterator<Item = &'a Portal> + 'a {
        self.portals.iter().filter(move |p| p.target_map == target_map)
    }
}

/// Kind of a point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiKind {
    Spawn,
    House,
    Ruin,
    Dungeon,
}

impl PoiKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PoiKind::Spawn => "Spawn",
            PoiKind::House => "House",
            PoiKind::Ruin => "Ruin",
            PoiKind::Dungeon => "Dungeon Entrance",
        }
    }
}

/// Anchor for terrain clearing, roads and structures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub position: TilePos,
    pub kind: PoiKind,
}

/// A rectangular dungeon room in tile space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> TilePos {
        TilePos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.x && pos.x < self.x + self.width && pos.y >= self.y && pos.y < self.y + self.height
    }
}

/// A carved road between two points of interest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub start: TilePos,
    pub end: TilePos,
    /// Centre-line tiles in walking order (widening tiles are not listed)
    pub path: Vec<TilePos>,
}

/// Top-level generator output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWorld {
    pub seed: i64,
    pub world_map: MapData,
    pub interior_maps: BTreeMap<String, MapData>,
    /// Player start, in pixels
    pub spawn: Point,
    pub points_of_interest: Vec<PointOfInterest>,
    pub roads: Vec<RoadSegment>,
}

impl GeneratedWorld {
    /// Look up a map by id, exterior included.
    pub fn map(&self, id: &str) -> Option<&MapData> {
        if id == self.world_map.id {
            Some(&self.world_map)
        } else {
            self.interior_maps.get(id)
        }
    }
}
