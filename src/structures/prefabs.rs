//! Fixed structure templates
//!
//! Small tile stamps for exterior footprints and the house interior. Each
//! prefab is anchored at its top-left cell.

use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::TilePos;

/// A rectangular tile stamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Prefab {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<TileCode>>,
}

impl Prefab {
    /// Create a new prefab from a tile grid
    pub fn new(name: &'static str, tiles: Vec<Vec<TileCode>>) -> Self {
        let height = tiles.len();
        let width = if height > 0 { tiles[0].len() } else { 0 };
        Self { name, width, height, tiles }
    }

    /// Get a tile at local coordinates (returns None if out of bounds)
    pub fn get(&self, x: usize, y: usize) -> Option<TileCode> {
        self.tiles.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Local position of the first door cell in row-major order.
    pub fn door(&self) -> Option<TilePos> {
        self.tiles.iter().enumerate().find_map(|(y, row)| {
            row.iter()
                .position(|&t| t == TileCode::Door)
                .map(|x| TilePos::new(x, y))
        })
    }

    /// Write the prefab with its top-left corner at `origin`, clipped to the map.
    pub fn stamp(&self, map: &mut Tilemap<TileCode>, origin: TilePos) {
        for (dy, row) in self.tiles.iter().enumerate() {
            for (dx, &tile) in row.iter().enumerate() {
                map.set(origin.x + dx, origin.y + dy, tile);
            }
        }
    }

    /// Fresh map holding only this prefab.
    pub fn to_tilemap(&self) -> Tilemap<TileCode> {
        let mut map = Tilemap::new(self.width, self.height);
        self.stamp(&mut map, TilePos::new(0, 0));
        map
    }
}

/// Exterior of a house (5x4): two roof rows over two wall rows, door at the
/// bottom centre.
pub fn house_exterior() -> Prefab {
    use TileCode::*;
    Prefab::new(
        "house_exterior",
        vec![
            vec![Roof, Roof, Roof, Roof, Roof],
            vec![Roof, Roof, Roof, Roof, Roof],
            vec![HouseWall, HouseWall, HouseWall, HouseWall, HouseWall],
            vec![HouseWall, HouseWall, Door, HouseWall, HouseWall],
        ],
    )
}

/// Interior of a house (10x8) with a carpet and the door in the bottom wall.
pub fn house_interior() -> Prefab {
    use TileCode::*;
    const W: TileCode = HouseWall;
    const F: TileCode = Floor;
    const C: TileCode = Carpet;
    Prefab::new(
        "house_interior",
        vec![
            vec![W, W, W, W, W, W, W, W, W, W],
            vec![W, F, F, F, F, F, F, F, F, W],
            vec![W, F, F, F, F, F, F, F, F, W],
            vec![W, F, F, C, C, C, C, F, F, W],
            vec![W, F, F, C, C, C, C, F, F, W],
            vec![W, F, F, F, F, F, F, F, F, W],
            vec![W, F, F, F, F, F, F, F, F, W],
            vec![W, W, W, W, W, Door, W, W, W, W],
        ],
    )
}

/// Dungeon entrance (3x3): rock rim open to the south around a door.
pub fn dungeon_entrance() -> Prefab {
    use TileCode::*;
    Prefab::new(
        "dungeon_entrance",
        vec![
            vec![Rock, Rock, Rock],
            vec![Rock, Door, Rock],
            vec![Rock, Floor, Rock],
        ],
    )
}
