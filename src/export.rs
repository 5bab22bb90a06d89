//! JSON and PNG export of generated maps

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::types::{GeneratedWorld, MapData};

/// Serialize a whole world to compact JSON.
///
/// Interiors are keyed in a sorted map, so the same world always produces
/// the same bytes.
pub fn world_to_json(world: &GeneratedWorld) -> serde_json::Result<String> {
    serde_json::to_string(world)
}

/// Write a world as JSON.
pub fn export_world_json(world: &GeneratedWorld, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    write_json(world, path.as_ref())
}

/// Write a single map as JSON, in the shape a map loader reads.
pub fn export_map_json(map: &MapData, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    write_json(map, path.as_ref())
}

fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<(), Box<dyn Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Marker colors drawn over the tile colors
const PORTAL_COLOR: [u8; 3] = [250, 220, 40];
const ENEMY_COLOR: [u8; 3] = [220, 30, 30];
const ITEM_COLOR: [u8; 3] = [60, 220, 230];

/// Render a map preview, `scale` pixels per tile.
///
/// Portals, enemies and interactables are drawn as a centred dot on their
/// tile when the scale leaves room for one.
pub fn render_map_image(map: &MapData, scale: u32, tile_size: u32) -> RgbImage {
    let scale = scale.max(1);
    let width = map.tiles.width as u32 * scale;
    let height = map.tiles.height as u32 * scale;

    let mut img: RgbImage = ImageBuffer::from_fn(width, height, |px, py| {
        let tile = map
            .tiles
            .get((px / scale) as usize, (py / scale) as usize)
            .copied()
            .unwrap_or_default();
        let (r, g, b) = tile.color();
        Rgb([r, g, b])
    });

    let portals = map.portals.iter().map(|p| (p.origin.top_left(), PORTAL_COLOR));
    let enemies = map.enemies.iter().map(|e| (e.position, ENEMY_COLOR));
    let items = map.interactables.iter().map(|i| (i.position, ITEM_COLOR));
    for (pos, color) in portals.chain(enemies).chain(items) {
        if let Some(tile) = pos.to_tile(tile_size) {
            mark_tile(&mut img, tile.x as u32, tile.y as u32, scale, color);
        }
    }

    img
}

fn mark_tile(img: &mut RgbImage, tx: u32, ty: u32, scale: u32, color: [u8; 3]) {
    // Dot covering the middle half of the tile, or the whole tile when tiny
    let inset = if scale >= 4 { scale / 4 } else { 0 };
    for y in ty * scale + inset..(ty + 1) * scale - inset {
        for x in tx * scale + inset..(tx + 1) * scale - inset {
            if x < img.width() && y < img.height() {
                img.put_pixel(x, y, Rgb(color));
            }
        }
    }
}

/// Save a map preview as PNG.
pub fn export_map_png(
    map: &MapData,
    path: impl AsRef<Path>,
    scale: u32,
    tile_size: u32,
) -> Result<(), Box<dyn Error>> {
    render_map_image(map, scale, tile_size).save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tilemap::Tilemap;
    use crate::tiles::TileCode;
    use crate::types::{Direction, MapTheme, Point, Portal, Rect, TilePos};

    fn sample_map() -> MapData {
        let mut tiles = Tilemap::new(4, 3);
        tiles.set(1, 1, TileCode::Water);
        let mut map = MapData::new("sample", tiles, MapTheme::Outdoor);
        map.portals.push(Portal::new(
            Rect::tile(TilePos::new(3, 2), 32),
            "elsewhere",
            Point { x: 0, y: 0 },
            Direction::Down,
        ));
        map
    }

    #[test]
    fn test_image_dimensions_and_colors() {
        let map = sample_map();
        let img = render_map_image(&map, 8, 32);
        assert_eq!(img.dimensions(), (32, 24));
        let (r, g, b) = TileCode::Water.color();
        assert_eq!(img.get_pixel(8, 8), &Rgb([r, g, b]));
        let (r, g, b) = TileCode::Grass.color();
        assert_eq!(img.get_pixel(0, 0), &Rgb([r, g, b]));
        // Portal dot in the middle of tile (3, 2)
        assert_eq!(img.get_pixel(28, 20), &Rgb(PORTAL_COLOR));
        // Tile corner keeps the tile color
        let (r, g, b) = TileCode::Grass.color();
        assert_eq!(img.get_pixel(24, 16), &Rgb([r, g, b]));
    }

    #[test]
    fn test_map_json_shape() {
        let map = sample_map();
        let json: serde_json::Value = serde_json::to_value(&map).unwrap();
        assert_eq!(json["tiles"][1][1], 2);
        assert_eq!(json["portals"][0]["targetMap"], "elsewhere");
        assert_eq!(json["theme"], "outdoor");
    }

    #[test]
    fn test_json_file_round_trip() {
        let map = sample_map();
        let path = std::env::temp_dir().join(format!("overworld_export_{}.json", std::process::id()));
        export_map_json(&map, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let back: MapData = serde_json::from_str(&text).unwrap();
        assert_eq!(back, map);
    }
}
