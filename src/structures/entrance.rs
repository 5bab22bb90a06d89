//! Dungeon entrances: a rock rim on the exterior and the dungeon behind it.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::dungeon::generate_dungeon;
use crate::seeds::combine_seeds;
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{Direction, MapData, Portal, Rect, TilePos, WORLD_MAP_ID};

use super::prefabs::dungeon_entrance;
use super::{connect_door, stamp_footprint, Footprint};

/// Registry id of the dungeon behind the entrance at `pos`.
pub fn dungeon_id(pos: TilePos) -> String {
    format!("dungeon_{}_{}", pos.x, pos.y)
}

/// Rim rectangle, centred on the entrance door.
pub fn footprint_at(pos: TilePos) -> Footprint {
    Footprint {
        x: pos.x.saturating_sub(1),
        y: pos.y.saturating_sub(1),
        width: 3,
        height: 3,
    }
}

pub struct BuiltEntrance {
    pub dungeon: MapData,
    /// Lives on the exterior map, leads down
    pub exterior_portal: Portal,
}

/// Stamp the entrance at `pos` and generate its dungeon.
///
/// The dungeon's seed depends only on the world seed and the entrance
/// position, so it does not consume draws from the world stream.
pub fn build_entrance(
    map: &mut Tilemap<TileCode>,
    pos: TilePos,
    footprints: &[Footprint],
    world_seed: i64,
    config: &GeneratorConfig,
) -> BuiltEntrance {
    let footprint = footprint_at(pos);
    stamp_footprint(map, &dungeon_entrance(), &footprint, footprints);

    // Just outside the open south side of the rim
    let front = TilePos::new(pos.x, footprint.y + footprint.height);
    connect_door(map, front, footprints);

    let id = dungeon_id(pos);
    let seed = combine_seeds(world_seed, pos.x, pos.y);
    let layout = generate_dungeon(seed, &id, config);
    let tile_size = config.tile_size;

    let mut dungeon = layout.map;
    dungeon.portals.push(Portal::new(
        Rect::tile(layout.exit, tile_size),
        WORLD_MAP_ID,
        front.to_pixels(tile_size),
        Direction::Down,
    ));
    debug!("Dungeon {} seeded with {}", id, seed);

    let exterior_portal = Portal::new(
        Rect::tile(pos, tile_size),
        &id,
        layout.arrival.to_pixels(tile_size),
        Direction::Down,
    );

    BuiltEntrance { dungeon, exterior_portal }
}
