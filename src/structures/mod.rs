//! Structure placement on the exterior map
//!
//! Each point of interest is turned into something concrete:
//! - Houses get an exterior footprint, a door path and an interior map
//! - Ruins get scattered rubble and a loot pickup
//! - Dungeon entrances get a rock rim and a generated dungeon behind them
//!
//! Footprints are stamped over whatever terrain and roads were there, so every
//! stamp is followed by a repair pass that relinks the roads it cut and a
//! connector from the door to the nearest road.

pub mod entrance;
pub mod house;
pub mod prefabs;
pub mod ruin;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::GeneratorConfig;
use crate::roads::{self, pave_path};
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{Interactable, MapData, PoiKind, PointOfInterest, Portal, TilePos};

use prefabs::Prefab;

/// Tile-space rectangle covered by a stamped prefab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Footprint {
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.x && pos.x < self.x + self.width && pos.y >= self.y && pos.y < self.y + self.height
    }

    pub fn origin(&self) -> TilePos {
        TilePos::new(self.x, self.y)
    }

    /// Cells 4-adjacent to the rectangle, row-major.
    pub fn ring(&self) -> Vec<TilePos> {
        let mut cells = Vec::new();
        let x0 = self.x as i64 - 1;
        let y0 = self.y as i64 - 1;
        let x1 = (self.x + self.width) as i64;
        let y1 = (self.y + self.height) as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let corner = (x == x0 || x == x1) && (y == y0 || y == y1);
                let inside = x > x0 && x < x1 && y > y0 && y < y1;
                if !corner && !inside && x >= 0 && y >= 0 {
                    cells.push(TilePos::new(x as usize, y as usize));
                }
            }
        }
        cells
    }
}

/// Footprint a POI will occupy once built, if it has one.
pub fn footprint_for(poi: &PointOfInterest) -> Option<Footprint> {
    let p = poi.position;
    match poi.kind {
        PoiKind::House => Some(house::footprint_at(p)),
        PoiKind::Dungeon => Some(entrance::footprint_at(p)),
        PoiKind::Spawn | PoiKind::Ruin => None,
    }
}

/// Everything the structure pass adds besides exterior tiles.
#[derive(Debug, Default)]
pub struct StructureOutput {
    pub interiors: BTreeMap<String, MapData>,
    pub interactables: Vec<Interactable>,
    pub portals: Vec<Portal>,
}

/// Build every structure, in POI order.
pub fn build_structures(
    map: &mut Tilemap<TileCode>,
    pois: &[PointOfInterest],
    world_seed: i64,
    config: &GeneratorConfig,
    rng: &mut crate::rng::RandomStream,
) -> StructureOutput {
    let footprints: Vec<Footprint> = pois.iter().filter_map(footprint_for).collect();
    let mut output = StructureOutput::default();

    for poi in pois {
        match poi.kind {
            PoiKind::Spawn => {}
            PoiKind::House => {
                let built = house::build_house(map, poi.position, &footprints, config, rng);
                output.portals.push(built.exterior_portal);
                output.interiors.insert(built.interior.id.clone(), built.interior);
            }
            PoiKind::Ruin => {
                let loot = ruin::build_ruin(map, poi.position, config, rng);
                output.interactables.push(loot);
            }
            PoiKind::Dungeon => {
                let built = entrance::build_entrance(map, poi.position, &footprints, world_seed, config);
                output.portals.push(built.exterior_portal);
                output.interiors.insert(built.dungeon.id.clone(), built.dungeon);
            }
        }
    }

    info!(
        "Built {} interiors, {} loot pickups",
        output.interiors.len(),
        output.interactables.len()
    );
    output
}

/// Stamp a prefab and relink any road it severed.
pub(crate) fn stamp_footprint(
    map: &mut Tilemap<TileCode>,
    prefab: &Prefab,
    footprint: &Footprint,
    footprints: &[Footprint],
) {
    prefab.stamp(map, footprint.origin());
    reconnect_roads(map, footprint, footprints);
}

/// Link all road stubs around `footprint` back into one network.
///
/// Stubs already connected through the rest of the network are left alone;
/// the others get a least-cost path to the reached set, routed around every
/// footprint.
pub(crate) fn reconnect_roads(map: &mut Tilemap<TileCode>, footprint: &Footprint, footprints: &[Footprint]) {
    let stubs: Vec<TilePos> = footprint
        .ring()
        .into_iter()
        .filter(|p| map.get(p.x, p.y).is_some_and(|t| t.is_road()))
        .collect();
    let Some(&root) = stubs.first() else { return };

    let blocked = |p: TilePos| footprints.iter().any(|f| f.contains(p));
    let mut reached = reached_mask(map, root);

    for &stub in &stubs[1..] {
        if reached[stub.y * map.width + stub.x] {
            continue;
        }
        let width = map.width;
        match roads::find_path(map, stub, |p| reached[p.y * width + p.x], blocked) {
            Some(path) => {
                pave_path(map, &path);
                reached = reached_mask(map, root);
            }
            None => debug!("Could not relink road stub at {:?}", stub),
        }
    }
}

fn reached_mask(map: &Tilemap<TileCode>, root: TilePos) -> Vec<bool> {
    let mut mask = vec![false; map.width * map.height];
    for p in roads::reachable_roads(map, root) {
        mask[p.y * map.width + p.x] = true;
    }
    mask
}

/// Pave from the tile in front of a door to the nearest road.
pub(crate) fn connect_door(map: &mut Tilemap<TileCode>, front: TilePos, footprints: &[Footprint]) {
    let blocked = |p: TilePos| footprints.iter().any(|f| f.contains(p));
    match roads::path_to_nearest_road(map, front, blocked) {
        Some(path) => pave_path(map, &path),
        None => {
            debug!("No road reachable from door at {:?}", front);
            pave_path(map, &[front]);
        }
    }
}
