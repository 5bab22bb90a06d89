//! Campus map generation
//!
//! Produces a single outdoor map in the urban legend: a street grid with
//! sidewalks, and each block between streets filled with one of a handful of
//! layouts (office rows, courtyard buildings, wings, parks, parking, a sports
//! field). Uses its own ChaCha stream; it shares nothing with the overworld
//! generator besides the tile codes.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::error::ConfigError;
use crate::seeds::normalize_seed;
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{MapData, MapTheme};

/// Id of the generated campus map
pub const CAMPUS_MAP_ID: &str = "campus";

/// Sidewalk, four road lanes, sidewalk
const STREET_WIDTH: usize = 6;
const ROAD_LANES: usize = 4;
const MIN_CAMPUS_SIZE: usize = 48;

/// Campus generation settings
#[derive(Clone, Debug, PartialEq)]
pub struct CampusConfig {
    pub width: usize,
    pub height: usize,
    /// Smallest block edge between streets
    pub min_block: usize,
    /// Flower and tall grass density on leftover lawn
    pub lawn_scatter: f64,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            width: 132,
            height: 100,
            min_block: 12,
            lawn_scatter: 0.04,
        }
    }
}

impl CampusConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_CAMPUS_SIZE || self.height < MIN_CAMPUS_SIZE {
            return Err(ConfigError::MapTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_CAMPUS_SIZE,
            });
        }
        if self.min_block < 12 {
            return Err(ConfigError::InvalidRange {
                name: "campus block size",
                min: self.min_block,
                max: self.width.min(self.height),
            });
        }
        if !(0.0..=1.0).contains(&self.lawn_scatter) {
            return Err(ConfigError::InvalidProbability {
                name: "lawn_scatter",
                value: self.lawn_scatter,
            });
        }
        Ok(())
    }
}

/// Open side of a U-shaped building
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    North,
    South,
    East,
    West,
}

/// Corner an L-shaped building wraps around
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

/// What fills a city block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockKind {
    Offices,
    Courtyard,
    Wing,
    Park,
    Parking,
    SportField,
}

/// Rectangle between streets
#[derive(Clone, Copy, Debug)]
struct Block {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

/// Generate a campus map.
pub fn generate_campus(seed: i64, config: &CampusConfig) -> Result<MapData, ConfigError> {
    config.validate()?;
    let seed = normalize_seed(seed);
    let mut rng = ChaCha8Rng::seed_from_u64((seed as u64).wrapping_add(0xCA4F_0500));
    let mut tiles = Tilemap::new(config.width, config.height);

    let columns = split_axis(config.width, config.min_block, &mut rng);
    let rows = split_axis(config.height, config.min_block, &mut rng);

    lay_streets(&mut tiles, &columns, &rows);

    let mut has_field = false;
    let mut block_count = 0;
    for &(y, h) in &rows {
        for &(x, w) in &columns {
            let block = Block { x, y, width: w, height: h };
            let kind = pick_block_kind(&mut rng, has_field);
            has_field |= kind == BlockKind::SportField;
            fill_block(&mut tiles, block, kind, &mut rng);
            block_count += 1;
        }
    }

    // Lawn detail on whatever grass is left
    for (_, _, tile) in tiles.iter_mut() {
        if *tile == TileCode::Grass && rng.gen_bool(config.lawn_scatter) {
            *tile = if rng.gen_bool(0.5) { TileCode::Flower } else { TileCode::TallGrass };
        }
    }

    outline(&mut tiles, 0, 0, config.width, config.height, TileCode::Hedge);

    info!(
        "Campus {}x{} with {} blocks (seed {})",
        config.width, config.height, block_count, seed
    );
    Ok(MapData::new(CAMPUS_MAP_ID, tiles, MapTheme::Outdoor))
}

/// Partition one axis into blocks separated by streets.
///
/// Returns `(start, length)` of each block. Streets run along both ends and
/// between every pair of blocks; the border ring is excluded.
fn split_axis(length: usize, min_block: usize, rng: &mut ChaCha8Rng) -> Vec<(usize, usize)> {
    let inner = length - 2;
    let max_blocks = ((inner - STREET_WIDTH) / (min_block + STREET_WIDTH)).max(1);
    let count = rng.gen_range(3..=5).min(max_blocks);
    let block_len = (inner - (count + 1) * STREET_WIDTH) / count;
    let leftover = inner - (count + 1) * STREET_WIDTH - block_len * count;

    let mut blocks = Vec::with_capacity(count);
    let mut cursor = 1 + STREET_WIDTH;
    for i in 0..count {
        let len = if i + 1 == count { block_len + leftover } else { block_len };
        blocks.push((cursor, len));
        cursor += len + STREET_WIDTH;
    }
    blocks
}

/// Paint every street strip: sidewalk, road lanes, sidewalk.
fn lay_streets(tiles: &mut Tilemap<TileCode>, columns: &[(usize, usize)], rows: &[(usize, usize)]) {
    let (w, h) = (tiles.width, tiles.height);

    let street_starts = |blocks: &[(usize, usize)]| -> Vec<usize> {
        let mut starts = vec![1];
        starts.extend(blocks.iter().map(|&(s, l)| s + l));
        starts
    };
    let xs = street_starts(columns);
    let ys = street_starts(rows);

    for &x in &xs {
        rect(tiles, x, 1, STREET_WIDTH, h - 2, TileCode::Sidewalk);
    }
    for &y in &ys {
        rect(tiles, 1, y, w - 2, STREET_WIDTH, TileCode::Sidewalk);
    }
    // Lanes on top so crossings stay road
    for &x in &xs {
        rect(tiles, x + 1, 1, ROAD_LANES, h - 2, TileCode::Road);
    }
    for &y in &ys {
        rect(tiles, 1, y + 1, w - 2, ROAD_LANES, TileCode::Road);
    }
}

fn pick_block_kind(rng: &mut ChaCha8Rng, has_field: bool) -> BlockKind {
    let roll = rng.gen_range(0..100);
    match roll {
        0..=27 => BlockKind::Offices,
        28..=47 => BlockKind::Courtyard,
        48..=65 => BlockKind::Wing,
        66..=81 => BlockKind::Park,
        82..=91 => BlockKind::Parking,
        _ if has_field => BlockKind::Park,
        _ => BlockKind::SportField,
    }
}

fn building_tile(rng: &mut ChaCha8Rng) -> TileCode {
    if rng.gen_bool(0.4) {
        TileCode::BuildingDark
    } else {
        TileCode::Building
    }
}

fn fill_block(tiles: &mut Tilemap<TileCode>, b: Block, kind: BlockKind, rng: &mut ChaCha8Rng) {
    // One tile of lawn between the sidewalk and anything built
    let (x, y, w, h) = (b.x + 1, b.y + 1, b.width - 2, b.height - 2);

    match kind {
        BlockKind::Offices => {
            let top = h / 2 - 1;
            let left = w / 2 - 1;
            let first = building_tile(rng);
            let second = building_tile(rng);
            rect(tiles, x, y + 1, left, top - 1, first);
            rect(tiles, x + left + 2, y + 1, w - left - 2, top - 1, second);
            rect(tiles, x, y + top, w, 2, TileCode::Plaza);
            let long = building_tile(rng);
            rect(tiles, x + 1, y + top + 3, w - 2, h - top - 3, long);
            tree_row(tiles, x, y, w, false);
        }
        BlockKind::Courtyard => {
            let thickness = (w.min(h) / 4).max(2);
            let side = match rng.gen_range(0..4) {
                0 => Side::North,
                1 => Side::South,
                2 => Side::East,
                _ => Side::West,
            };
            let tile = building_tile(rng);
            u_building(tiles, x, y, w, h, side, thickness, tile);
            tree_area(
                tiles,
                x + thickness,
                y + thickness,
                w - 2 * thickness,
                h - 2 * thickness,
                0.45,
                rng,
            );
        }
        BlockKind::Wing => {
            let corner = match rng.gen_range(0..4) {
                0 => Corner::NorthWest,
                1 => Corner::NorthEast,
                2 => Corner::SouthWest,
                _ => Corner::SouthEast,
            };
            let (arm_w, arm_h) = ((w / 3).max(3), (h / 3).max(3));
            let tile = building_tile(rng);
            l_building(tiles, x, y, w, h, corner, arm_w, arm_h, tile);
            // Garden in the opposite quadrant
            let (gx, gy) = match corner {
                Corner::NorthWest => (x + arm_w + 1, y + arm_h + 1),
                Corner::NorthEast => (x, y + arm_h + 1),
                Corner::SouthWest => (x + arm_w + 1, y),
                Corner::SouthEast => (x, y),
            };
            tree_area(tiles, gx, gy, w - arm_w - 1, h - arm_h - 1, 0.5, rng);
        }
        BlockKind::Park => {
            tree_area(tiles, x, y, w, h, 0.3, rng);
            let (pw, ph) = (w / 3, h / 3);
            let (px, py) = (x + (w - pw) / 2, y + (h - ph) / 2);
            rect(tiles, px - 1, py - 1, pw + 2, ph + 2, TileCode::Sand);
            rect(tiles, px, py, pw, ph, TileCode::Water);
            // Footpaths around the pond
            rect(tiles, x, py - 2, w, 1, TileCode::Path);
            rect(tiles, px - 2, y, 1, h, TileCode::Path);
            scatter(tiles, x, y, w, h, TileCode::Flower, 0.05, rng);
            scatter(tiles, x, y, w, h, TileCode::Rock, 0.01, rng);
        }
        BlockKind::Parking => {
            rect(tiles, x + 1, y + 1, w - 2, h - 2, TileCode::Parking);
            tree_row(tiles, x, y, w, false);
            tree_row(tiles, x, y + h - 1, w, false);
        }
        BlockKind::SportField => {
            outline(tiles, x, y, w, h, TileCode::Hedge);
            rect(tiles, x + 1, y + 1, w - 2, h - 2, TileCode::SportField);
            // Gate on the south side
            rect(tiles, x + w / 2 - 1, y + h - 1, 2, 1, TileCode::Sidewalk);
        }
    }
}

/// Fill a rectangle, clipped to the map.
fn rect(tiles: &mut Tilemap<TileCode>, x: usize, y: usize, w: usize, h: usize, tile: TileCode) {
    tiles.fill_rect(x, y, w, h, tile);
}

/// Paint only the border of a rectangle.
fn outline(tiles: &mut Tilemap<TileCode>, x: usize, y: usize, w: usize, h: usize, tile: TileCode) {
    if w == 0 || h == 0 {
        return;
    }
    rect(tiles, x, y, w, 1, tile);
    rect(tiles, x, y + h - 1, w, 1, tile);
    rect(tiles, x, y, 1, h, tile);
    rect(tiles, x + w - 1, y, 1, h, tile);
}

/// Randomly place `tile` in a region with the given density.
#[allow(clippy::too_many_arguments)]
fn scatter(
    tiles: &mut Tilemap<TileCode>,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    tile: TileCode,
    density: f64,
    rng: &mut ChaCha8Rng,
) {
    for yy in y..y + h {
        for xx in x..x + w {
            if rng.gen_bool(density) {
                tiles.set(xx, yy, tile);
            }
        }
    }
}

/// Mixed stand of big and regular trees.
fn tree_area(
    tiles: &mut Tilemap<TileCode>,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    density: f64,
    rng: &mut ChaCha8Rng,
) {
    for yy in y..y + h {
        for xx in x..x + w {
            if rng.gen_bool(density) {
                let tree = if rng.gen_bool(0.55) { TileCode::BigTree } else { TileCode::Tree };
                tiles.set(xx, yy, tree);
            }
        }
    }
}

/// Alternating big and regular trees along a line.
fn tree_row(tiles: &mut Tilemap<TileCode>, x: usize, y: usize, len: usize, vertical: bool) {
    for i in 0..len {
        let (tx, ty) = if vertical { (x, y + i) } else { (x + i, y) };
        let tree = if i % 2 == 0 { TileCode::BigTree } else { TileCode::Tree };
        tiles.set(tx, ty, tree);
    }
}

/// U-shaped building open towards `open`.
#[allow(clippy::too_many_arguments)]
fn u_building(
    tiles: &mut Tilemap<TileCode>,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    open: Side,
    thickness: usize,
    tile: TileCode,
) {
    let t = thickness;
    match open {
        Side::North => {
            rect(tiles, x, y, t, h, tile);
            rect(tiles, x + w - t, y, t, h, tile);
            rect(tiles, x, y + h - t, w, t, tile);
        }
        Side::South => {
            rect(tiles, x, y, t, h, tile);
            rect(tiles, x + w - t, y, t, h, tile);
            rect(tiles, x, y, w, t, tile);
        }
        Side::East => {
            rect(tiles, x, y, w, t, tile);
            rect(tiles, x, y + h - t, w, t, tile);
            rect(tiles, x, y, t, h, tile);
        }
        Side::West => {
            rect(tiles, x, y, w, t, tile);
            rect(tiles, x, y + h - t, w, t, tile);
            rect(tiles, x + w - t, y, t, h, tile);
        }
    }
}

/// L-shaped building wrapped around `corner`.
#[allow(clippy::too_many_arguments)]
fn l_building(
    tiles: &mut Tilemap<TileCode>,
    x: usize,
    y: usize,
    w: usize,
    h: usize,
    corner: Corner,
    arm_w: usize,
    arm_h: usize,
    tile: TileCode,
) {
    match corner {
        Corner::NorthWest => {
            rect(tiles, x, y, w, arm_h, tile);
            rect(tiles, x, y, arm_w, h, tile);
        }
        Corner::NorthEast => {
            rect(tiles, x, y, w, arm_h, tile);
            rect(tiles, x + w - arm_w, y, arm_w, h, tile);
        }
        Corner::SouthWest => {
            rect(tiles, x, y + h - arm_h, w, arm_h, tile);
            rect(tiles, x, y, arm_w, h, tile);
        }
        Corner::SouthEast => {
            rect(tiles, x, y + h - arm_h, w, arm_h, tile);
            rect(tiles, x + w - arm_w, y, arm_w, h, tile);
        }
    }
}
