//! ASCII rendering and export for generated worlds
//!
//! One character per tile, with entity markers drawn on top.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::tiles::TileCode;
use crate::types::{EnemyKind, GeneratedWorld, MapData, PoiKind, Point};

/// Get ASCII character for a tile
pub fn tile_char(tile: TileCode) -> char {
    use TileCode::*;
    match tile {
        Grass => '.',
        Tree => 'T',
        Water => '~',
        Floor => '_',
        Path => '=',
        Door => 'D',
        Carpet => 'c',
        Flower => '*',
        Rock => '^',
        HouseWall => '#',
        Roof => 'A',
        Bush => '%',
        TallGrass => '"',
        Sand => ':',
        Dirt => ',',
        Road => '-',
        Building => 'B',
        Sidewalk => '+',
        Parking => 'P',
        Plaza => 'o',
        Hedge => 'h',
        SportField => 'f',
        BuildingDark => 'b',
        BigTree => 'Y',
    }
}

/// Render a map, overlaying portals (`O`), enemies (`e`, boss `&`) and
/// interactables (`!`).
pub fn render_ascii_map(map: &MapData, tile_size: u32) -> String {
    let mut grid: Vec<Vec<char>> = map
        .tiles
        .rows()
        .map(|row| row.iter().map(|&t| tile_char(t)).collect())
        .collect();

    let mut mark = |pos: Point, c: char| {
        if let Some(tile) = pos.to_tile(tile_size) {
            if let Some(cell) = grid.get_mut(tile.y).and_then(|row| row.get_mut(tile.x)) {
                *cell = c;
            }
        }
    };
    for portal in &map.portals {
        mark(portal.origin.top_left(), 'O');
    }
    for item in &map.interactables {
        mark(item.position, '!');
    }
    for enemy in &map.enemies {
        let c = if enemy.kind == EnemyKind::Boss { '&' } else { 'e' };
        mark(enemy.position, c);
    }

    let mut out = String::with_capacity(map.tiles.width * map.tiles.height + map.tiles.height);
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

/// Tile counts for a map, in code order.
pub fn tile_histogram(map: &MapData) -> BTreeMap<TileCode, usize> {
    let mut counts = BTreeMap::new();
    for (_, _, &tile) in map.tiles.iter() {
        *counts.entry(tile).or_insert(0) += 1;
    }
    counts
}

/// One line per loot pickup on a map: id, tile and item name.
pub fn loot_listing(map: &MapData, tile_size: u32) -> Vec<String> {
    map.interactables
        .iter()
        .filter_map(|item| {
            let key = item.item_key?;
            let tile = item.position.to_tile(tile_size)?;
            Some(format!("  {:28} ({:>3}, {:>3}) {}", item.id, tile.x, tile.y, key.name()))
        })
        .collect()
}

/// Export a world summary plus every map to a text file
pub fn export_world_file(world: &GeneratedWorld, tile_size: u32, path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = File::create(path)?;
    let tiles = &world.world_map.tiles;

    // Header
    writeln!(file, "=== OVERWORLD GENERATOR WORLD FILE ===")?;
    writeln!(file, "Seed: {}", world.seed)?;
    writeln!(file, "Size: {}x{}", tiles.width, tiles.height)?;
    writeln!(file, "Spawn: ({}, {}) px", world.spawn.x, world.spawn.y)?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== POINTS OF INTEREST ===")?;
    for poi in &world.points_of_interest {
        writeln!(file, "  {:18} ({:>3}, {:>3})", poi.kind.display_name(), poi.position.x, poi.position.y)?;
    }
    writeln!(file)?;

    writeln!(file, "=== MAP ({}) ===", world.world_map.id)?;
    write!(file, "{}", render_ascii_map(&world.world_map, tile_size))?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    let total = tiles.width * tiles.height;
    for (tile, count) in tile_histogram(&world.world_map) {
        let pct = 100.0 * count as f64 / total.max(1) as f64;
        writeln!(file, "  {:14} {} {:>6} ({:>5.1}%)", tile.name(), tile_char(tile), count, pct)?;
    }
    writeln!(file, "Enemies: {}", world.world_map.enemies.len())?;
    writeln!(file, "Roads: {} segments", world.roads.len())?;
    let dungeons = world
        .points_of_interest
        .iter()
        .filter(|p| p.kind == PoiKind::Dungeon)
        .count();
    writeln!(file, "Dungeons: {}", dungeons)?;
    writeln!(file)?;

    writeln!(file, "=== LOOT ===")?;
    for map in std::iter::once(&world.world_map).chain(world.interior_maps.values()) {
        for line in loot_listing(map, tile_size) {
            writeln!(file, "{}", line)?;
        }
    }
    writeln!(file)?;

    for (id, map) in &world.interior_maps {
        writeln!(file, "=== INTERIOR {} ({:?}) ===", id, map.theme)?;
        write!(file, "{}", render_ascii_map(map, tile_size))?;
        writeln!(file)?;
    }

    Ok(())
}
