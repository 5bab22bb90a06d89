//! Ruins: rubble scattered around the anchor and a loot pickup at its centre.

use crate::config::GeneratorConfig;
use crate::rng::RandomStream;
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{Interactable, ItemKey, TilePos};

/// Rubble never lands farther than this from the anchor
pub const RUBBLE_RADIUS: i64 = 3;
const RUBBLE_CHANCE: f64 = 0.3;

/// Scatter rubble around `pos` and return the loot placed at its centre.
///
/// Road tiles and the centre cell are never covered, so the ruin stays
/// reachable.
pub fn build_ruin(
    map: &mut Tilemap<TileCode>,
    pos: TilePos,
    config: &GeneratorConfig,
    rng: &mut RandomStream,
) -> Interactable {
    for dy in -RUBBLE_RADIUS..=RUBBLE_RADIUS {
        for dx in -RUBBLE_RADIUS..=RUBBLE_RADIUS {
            if (dx == 0 && dy == 0) || dx * dx + dy * dy > RUBBLE_RADIUS * RUBBLE_RADIUS {
                continue;
            }
            let Some(cell) = pos.offset(dx, dy) else { continue };
            let keep = match map.get(cell.x, cell.y) {
                Some(tile) => tile.is_road() || map.is_border(cell.x, cell.y),
                None => true,
            };
            if keep {
                continue;
            }
            if rng.chance(RUBBLE_CHANCE) {
                let rubble = if rng.chance(0.5) { TileCode::Rock } else { TileCode::Dirt };
                map.set(cell.x, cell.y, rubble);
            }
        }
    }

    let key = rng.pick(ItemKey::all()).copied().unwrap_or(ItemKey::OldKey);
    Interactable::item(format!("ruin_{}_{}_loot", pos.x, pos.y), pos, key, config.tile_size)
}
