//! Dungeon generation
//!
//! Rooms are scattered inside a solid rock grid and chained with L-shaped
//! corridors in creation order. Rooms may overlap; the chain keeps every room
//! reachable regardless. The first room holds the way out, the last one the
//! boss.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::rng::RandomStream;
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{Enemy, EnemyKind, Interactable, ItemKey, MapData, MapTheme, Room, TilePos};

/// Tile for solid rock
pub const WALL_TILE: TileCode = TileCode::Tree;
/// Tile for carved rooms and corridors
pub const FLOOR_TILE: TileCode = TileCode::Floor;

/// A generated dungeon and the anchors the caller links portals to.
#[derive(Clone, Debug)]
pub struct DungeonLayout {
    pub map: MapData,
    pub rooms: Vec<Room>,
    /// Centre of the first room; the return portal sits here
    pub exit: TilePos,
    /// Where arriving players are placed, one tile south of the exit
    pub arrival: TilePos,
}

/// Generate a dungeon map from its own seed.
pub fn generate_dungeon(seed: i64, id: &str, config: &GeneratorConfig) -> DungeonLayout {
    let mut rng = RandomStream::new(seed);
    let mut tiles = Tilemap::new_with(config.dungeon_width, config.dungeon_height, WALL_TILE);

    let room_count = rng.range(config.dungeon_min_rooms, config.dungeon_max_rooms + 1);
    let rooms: Vec<Room> = (0..room_count)
        .map(|_| random_room(&mut rng, config))
        .collect();

    for room in &rooms {
        carve_room(&mut tiles, room);
    }
    for pair in rooms.windows(2) {
        let horizontal_first = rng.chance(0.5);
        carve_corridor(&mut tiles, pair[0].center(), pair[1].center(), horizontal_first);
    }

    let exit = rooms[0].center();
    let arrival = TilePos::new(exit.x, exit.y + 1);
    let mut map = MapData::new(id, tiles, MapTheme::Dungeon);

    let boss_at = boss_cell(&rooms[rooms.len() - 1], &[exit, arrival]);
    map.enemies.push(Enemy::spawn(
        format!("{}_boss", id),
        EnemyKind::Boss,
        boss_at,
        config.tile_size,
    ));

    let mut reserved = vec![exit, arrival, boss_at];
    if rooms.len() > 2 {
        for (i, room) in rooms[1..rooms.len() - 1].iter().enumerate() {
            if rng.chance(config.room_enemy_chance) {
                let kind = rng
                    .weighted(&[
                        (EnemyKind::Skeleton, 0.5),
                        (EnemyKind::Slime, 0.25),
                        (EnemyKind::Bat, 0.25),
                    ])
                    .unwrap_or(EnemyKind::Skeleton);
                let at = random_cell(&mut rng, room);
                if !reserved.contains(&at) {
                    reserved.push(at);
                    let enemy_id = format!("{}_enemy_{}", id, i + 1);
                    map.enemies.push(Enemy::spawn(enemy_id, kind, at, config.tile_size));
                }
            }
            if rng.chance(config.room_loot_chance) {
                let key = rng.pick(ItemKey::all()).copied().unwrap_or(ItemKey::Potion);
                let at = random_cell(&mut rng, room);
                if !reserved.contains(&at) {
                    reserved.push(at);
                    let loot_id = format!("{}_chest_{}", id, i + 1);
                    map.interactables.push(Interactable::item(loot_id, at, key, config.tile_size));
                }
            }
        }
    }

    debug!(
        "Dungeon {}: {} rooms, {} enemies, {} chests",
        id,
        rooms.len(),
        map.enemies.len(),
        map.interactables.len()
    );

    DungeonLayout { map, rooms, exit, arrival }
}

/// Random room fully inside the one-tile wall ring.
fn random_room(rng: &mut RandomStream, config: &GeneratorConfig) -> Room {
    let width = rng.range(config.room_min_size, config.room_max_size + 1);
    let height = rng.range(config.room_min_size, config.room_max_size + 1);
    let x = rng.range(1, config.dungeon_width - width);
    let y = rng.range(1, config.dungeon_height - height);
    Room::new(x, y, width, height)
}

/// Centre of the boss room, or its first free cell when the centre is taken
/// by the way in or out (the last room can overlap the first).
fn boss_cell(room: &Room, taken: &[TilePos]) -> TilePos {
    let center = room.center();
    if !taken.contains(&center) {
        return center;
    }
    (room.y..room.y + room.height)
        .flat_map(|y| (room.x..room.x + room.width).map(move |x| TilePos::new(x, y)))
        .find(|p| !taken.contains(p))
        .unwrap_or(center)
}

fn random_cell(rng: &mut RandomStream, room: &Room) -> TilePos {
    TilePos::new(
        rng.range(room.x, room.x + room.width),
        rng.range(room.y, room.y + room.height),
    )
}

/// Carve a room's cells to floor.
pub fn carve_room(tiles: &mut Tilemap<TileCode>, room: &Room) {
    tiles.fill_rect(room.x, room.y, room.width, room.height, FLOOR_TILE);
}

/// Carve an L-shaped corridor between two points
pub fn carve_corridor(
    tiles: &mut Tilemap<TileCode>,
    start: TilePos,
    end: TilePos,
    horizontal_first: bool,
) {
    let corner = if horizontal_first {
        TilePos::new(end.x, start.y)
    } else {
        TilePos::new(start.x, end.y)
    };
    carve_line(tiles, start, corner);
    carve_line(tiles, corner, end);
}

/// Carve a straight axis-aligned run, endpoints included.
fn carve_line(tiles: &mut Tilemap<TileCode>, a: TilePos, b: TilePos) {
    for y in a.y.min(b.y)..=a.y.max(b.y) {
        for x in a.x.min(b.x)..=a.x.max(b.x) {
            tiles.set(x, y, FLOOR_TILE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Floor cells reachable from `start` over non-solid tiles.
    fn flood(tiles: &Tilemap<TileCode>, start: TilePos) -> Vec<bool> {
        let mut seen = vec![false; tiles.width * tiles.height];
        let mut stack = vec![start];
        seen[start.y * tiles.width + start.x] = true;
        while let Some(p) = stack.pop() {
            for (nx, ny) in tiles.neighbors(p.x, p.y) {
                let idx = ny * tiles.width + nx;
                if !seen[idx] && !tiles.get(nx, ny).unwrap().is_solid() {
                    seen[idx] = true;
                    stack.push(TilePos::new(nx, ny));
                }
            }
        }
        seen
    }

    #[test]
    fn test_exactly_one_boss_in_last_room() {
        let config = GeneratorConfig::default();
        for seed in 1..30 {
            let layout = generate_dungeon(seed, "d", &config);
            let bosses: Vec<_> = layout
                .map
                .enemies
                .iter()
                .filter(|e| e.kind == EnemyKind::Boss)
                .collect();
            assert_eq!(bosses.len(), 1);
            let last = layout.rooms.last().unwrap();
            let at = bosses[0].position.to_tile(config.tile_size).unwrap();
            assert!(last.contains(at));
            assert_ne!(at, layout.exit);
            assert_ne!(at, layout.arrival);
        }
    }

    #[test]
    fn test_room_count_and_bounds() {
        let config = GeneratorConfig::default();
        for seed in 1..30 {
            let layout = generate_dungeon(seed, "d", &config);
            assert!(layout.rooms.len() >= config.dungeon_min_rooms);
            assert!(layout.rooms.len() <= config.dungeon_max_rooms);
            let tiles = &layout.map.tiles;
            for (x, y, &t) in tiles.iter() {
                if tiles.is_border(x, y) {
                    assert_eq!(t, WALL_TILE);
                }
            }
        }
    }

    #[test]
    fn test_every_room_reachable_from_exit() {
        let config = GeneratorConfig::default();
        for seed in 1..30 {
            let layout = generate_dungeon(seed, "d", &config);
            let tiles = &layout.map.tiles;
            let seen = flood(tiles, layout.exit);
            for room in &layout.rooms {
                let c = room.center();
                assert!(seen[c.y * tiles.width + c.x], "seed {} room {:?}", seed, room);
            }
            for enemy in &layout.map.enemies {
                let p = enemy.position.to_tile(config.tile_size).unwrap();
                assert!(seen[p.y * tiles.width + p.x]);
            }
        }
    }

    #[test]
    fn test_exit_and_arrival_are_floor() {
        let config = GeneratorConfig::default();
        let layout = generate_dungeon(4242, "d", &config);
        assert_eq!(layout.map.tile_at(layout.exit), Some(FLOOR_TILE));
        assert_eq!(layout.map.tile_at(layout.arrival), Some(FLOOR_TILE));
        assert!(layout.rooms[0].contains(layout.arrival));
    }

    #[test]
    fn test_overlapping_rooms_stay_connected() {
        let mut tiles = Tilemap::new_with(30, 30, WALL_TILE);
        let rooms = [
            Room::new(2, 2, 8, 8),
            Room::new(6, 6, 8, 8),
            Room::new(20, 20, 5, 5),
        ];
        for room in &rooms {
            carve_room(&mut tiles, room);
        }
        for pair in rooms.windows(2) {
            carve_corridor(&mut tiles, pair[0].center(), pair[1].center(), false);
        }
        let seen = flood(&tiles, rooms[0].center());
        for room in &rooms {
            let c = room.center();
            assert!(seen[c.y * 30 + c.x]);
        }
    }

    #[test]
    fn test_same_seed_same_dungeon() {
        let config = GeneratorConfig::default();
        let a = generate_dungeon(99, "d", &config);
        let b = generate_dungeon(99, "d", &config);
        assert_eq!(a.map, b.map);
        assert_eq!(a.rooms, b.rooms);
    }

    #[test]
    fn test_only_overworld_codes() {
        let layout = generate_dungeon(8, "d", &GeneratorConfig::default());
        assert!(layout
            .map
            .tiles
            .iter()
            .all(|(_, _, &t)| t == WALL_TILE || t == FLOOR_TILE));
    }

    #[test]
    fn test_boss_moves_off_the_way_in() {
        let room = Room::new(10, 10, 5, 5);
        assert_eq!(boss_cell(&room, &[]), TilePos::new(12, 12));

        let exit = room.center();
        let arrival = TilePos::new(exit.x, exit.y + 1);
        let at = boss_cell(&room, &[exit, arrival]);
        assert!(room.contains(at));
        assert_eq!(at, TilePos::new(10, 10));
    }

    #[test]
    fn test_boss_never_on_exit_in_crowded_dungeon() {
        // Small grid, so the last room often lands on the first
        let config = GeneratorConfig {
            dungeon_width: 12,
            dungeon_height: 12,
            ..Default::default()
        };
        for seed in 1..200 {
            let layout = generate_dungeon(seed, "d", &config);
            for enemy in &layout.map.enemies {
                let at = enemy.position.to_tile(config.tile_size).unwrap();
                assert_ne!(at, layout.exit, "seed {}", seed);
                assert_ne!(at, layout.arrival, "seed {}", seed);
            }
        }
    }
}
