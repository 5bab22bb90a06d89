//! Houses: exterior footprint, door path, interior map and the portal pair.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::rng::RandomStream;
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{Direction, Interactable, MapData, MapTheme, Portal, Rect, TilePos, WORLD_MAP_ID};

use super::prefabs::{house_exterior, house_interior};
use super::{connect_door, stamp_footprint, Footprint};

pub const WIDTH: usize = 5;
pub const HEIGHT: usize = 4;
/// Offset of the POI inside the exterior prefab
pub const ANCHOR: TilePos = TilePos::new(2, 2);
/// Door cell inside the exterior prefab
pub const DOOR: TilePos = TilePos::new(2, 3);
/// Door cell inside the interior map
pub const INTERIOR_DOOR: TilePos = TilePos::new(5, 7);
/// Where players appear when entering, just inside the door
pub const INTERIOR_ARRIVAL: TilePos = TilePos::new(5, 6);

const VILLAGER_LINES: &[&[&str]] = &[
    &["Welcome, traveler!", "The road east leads to some old ruins."],
    &["Careful in the woods.", "Slimes have been spotted near the river."],
    &["I heard there's a cave entrance nearby.", "Nobody who went in came back the same."],
    &["Make yourself at home.", "Just don't touch the carpet with muddy boots."],
];

/// Exterior rectangle of the house anchored at `pos`.
pub fn footprint_at(pos: TilePos) -> Footprint {
    Footprint {
        x: pos.x.saturating_sub(ANCHOR.x),
        y: pos.y.saturating_sub(ANCHOR.y),
        width: WIDTH,
        height: HEIGHT,
    }
}

/// Registry id of the house anchored at `pos`.
pub fn house_id(pos: TilePos) -> String {
    format!("house_{}_{}", pos.x, pos.y)
}

pub struct BuiltHouse {
    pub interior: MapData,
    /// Lives on the exterior map, leads inside
    pub exterior_portal: Portal,
}

/// Stamp a house at `pos` and build its interior.
pub fn build_house(
    map: &mut Tilemap<TileCode>,
    pos: TilePos,
    footprints: &[Footprint],
    config: &GeneratorConfig,
    rng: &mut RandomStream,
) -> BuiltHouse {
    let footprint = footprint_at(pos);
    stamp_footprint(map, &house_exterior(), &footprint, footprints);

    let door = TilePos::new(footprint.x + DOOR.x, footprint.y + DOOR.y);
    let front = TilePos::new(door.x, door.y + 1);
    connect_door(map, front, footprints);

    let id = house_id(pos);
    let tile_size = config.tile_size;
    let mut interior = MapData::new(id.clone(), house_interior().to_tilemap(), MapTheme::Indoor);
    interior.portals.push(Portal::new(
        Rect::tile(INTERIOR_DOOR, tile_size),
        WORLD_MAP_ID,
        front.to_pixels(tile_size),
        Direction::Down,
    ));

    if rng.chance(config.house_npc_chance) {
        let lines = rng.pick(VILLAGER_LINES).copied().unwrap_or(&["Hello!"]);
        let at = TilePos::new(rng.range(2, 8), 2);
        interior
            .interactables
            .push(Interactable::npc(format!("{}_villager", id), at, lines, tile_size));
    }

    debug!("House {} with {} residents", id, interior.interactables.len());

    let exterior_portal = Portal::new(
        Rect::tile(door, tile_size),
        &id,
        INTERIOR_ARRIVAL.to_pixels(tile_size),
        Direction::Up,
    );

    BuiltHouse { interior, exterior_portal }
}
