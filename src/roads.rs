//! Road network
//!
//! Points of interest are joined greedily: each round links the closest
//! (connected, unconnected) pair by Manhattan distance with a monotone random
//! walk. A Dijkstra pathfinder handles the later fix-ups, reconnecting roads
//! cut by structure footprints and leading doors out to the network.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::rng::RandomStream;
use crate::tilemap::Tilemap;
use crate::tiles::TileCode;
use crate::types::{PointOfInterest, RoadSegment, TilePos};

/// Tile written by every road pass
pub const ROAD_TILE: TileCode = TileCode::Path;

/// Connect every POI to the network rooted at the first one (the spawn).
pub fn build_road_network(
    map: &mut Tilemap<TileCode>,
    pois: &[PointOfInterest],
    widen_chance: f64,
    rng: &mut RandomStream,
) -> Vec<RoadSegment> {
    let mut segments = Vec::new();
    if pois.len() < 2 {
        return segments;
    }

    let mut connected = vec![0usize];
    let mut unconnected: Vec<usize> = (1..pois.len()).collect();

    while !unconnected.is_empty() {
        // Closest pair; strict comparison keeps the first in scan order on ties
        let mut best: Option<(usize, usize, usize)> = None;
        for &c in &connected {
            for (slot, &u) in unconnected.iter().enumerate() {
                let d = pois[c].position.manhattan(&pois[u].position);
                if best.map_or(true, |(_, _, bd)| d < bd) {
                    best = Some((c, slot, d));
                }
            }
        }
        let Some((from, slot, _)) = best else { break };
        let to = unconnected.remove(slot);

        let start = pois[from].position;
        let end = pois[to].position;
        let path = carve_walk(map, start, end, widen_chance, rng);
        segments.push(RoadSegment { start, end, path });
        connected.push(to);
    }

    debug!("Carved {} road segments", segments.len());
    segments
}

/// Carve a monotone walk from `start` to `end`, returning the centre line.
///
/// Each step moves one tile closer on x or y; when both differ the axis is
/// drawn at random. Border cells are never paved.
pub fn carve_walk(
    map: &mut Tilemap<TileCode>,
    start: TilePos,
    end: TilePos,
    widen_chance: f64,
    rng: &mut RandomStream,
) -> Vec<TilePos> {
    let mut path = vec![start];
    pave(map, start);

    let mut cursor = start;
    while cursor != end {
        let step_x = cursor.x != end.x && (cursor.y == end.y || rng.chance(0.5));
        if step_x {
            cursor.x = if cursor.x < end.x { cursor.x + 1 } else { cursor.x - 1 };
        } else {
            cursor.y = if cursor.y < end.y { cursor.y + 1 } else { cursor.y - 1 };
        }
        pave(map, cursor);
        path.push(cursor);

        if rng.chance(widen_chance) {
            // Widen sideways relative to the step
            let side: i64 = if rng.chance(0.5) { 1 } else { -1 };
            let (dx, dy) = if step_x { (0, side) } else { (side, 0) };
            if let Some(next) = cursor.offset(dx, dy) {
                pave(map, next);
            }
        }
    }

    path
}

/// Pave a single cell unless it is on the border or a door.
fn pave(map: &mut Tilemap<TileCode>, pos: TilePos) {
    if map.is_border(pos.x, pos.y) {
        return;
    }
    if map.get(pos.x, pos.y).is_some_and(|&t| t != TileCode::Door) {
        map.set(pos.x, pos.y, ROAD_TILE);
    }
}

/// Pave every cell of a path.
pub fn pave_path(map: &mut Tilemap<TileCode>, path: &[TilePos]) {
    for &pos in path {
        pave(map, pos);
    }
}

/// Node for Dijkstra's priority queue
#[derive(Clone, Copy)]
struct PathNode {
    pos: TilePos,
    cost: f32,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for PathNode {}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
    }
}

/// Cost of stepping onto a tile when routing a connector.
fn step_cost(tile: TileCode) -> f32 {
    if tile.is_road() {
        0.3
    } else if tile.is_solid() {
        // Clearing trees, rocks or water is allowed but discouraged
        4.0
    } else {
        1.0
    }
}

/// Least-cost 4-connected path from `start` to the first cell satisfying
/// `is_goal`. Cells on the border or rejected by `is_blocked` are never
/// entered (the start cell is exempt).
pub fn find_path(
    map: &Tilemap<TileCode>,
    start: TilePos,
    is_goal: impl Fn(TilePos) -> bool,
    is_blocked: impl Fn(TilePos) -> bool,
) -> Option<Vec<TilePos>> {
    let (width, height) = (map.width, map.height);
    if start.x >= width || start.y >= height {
        return None;
    }
    let index = |p: TilePos| p.y * width + p.x;

    let mut cost_map = vec![f32::INFINITY; width * height];
    let mut came_from: Vec<Option<TilePos>> = vec![None; width * height];
    let mut pq = BinaryHeap::new();

    cost_map[index(start)] = 0.0;
    pq.push(PathNode { pos: start, cost: 0.0 });

    while let Some(PathNode { pos, cost }) = pq.pop() {
        if is_goal(pos) {
            let mut path = vec![pos];
            let mut current = pos;
            while let Some(prev) = came_from[index(current)] {
                path.push(prev);
                current = prev;
            }
            path.reverse();
            return Some(path);
        }

        if cost > cost_map[index(pos)] {
            continue;
        }

        for (nx, ny) in map.neighbors(pos.x, pos.y) {
            let next = TilePos::new(nx, ny);
            if map.is_border(nx, ny) || is_blocked(next) {
                continue;
            }
            let Some(&tile) = map.get(nx, ny) else { continue };

            let new_cost = cost + step_cost(tile);
            if new_cost < cost_map[index(next)] {
                cost_map[index(next)] = new_cost;
                came_from[index(next)] = Some(pos);
                pq.push(PathNode { pos: next, cost: new_cost });
            }
        }
    }

    None
}

/// Path from `start` to the nearest road tile other than the start itself.
pub fn path_to_nearest_road(
    map: &Tilemap<TileCode>,
    start: TilePos,
    is_blocked: impl Fn(TilePos) -> bool,
) -> Option<Vec<TilePos>> {
    find_path(
        map,
        start,
        |p| p != start && map.get(p.x, p.y).is_some_and(|t| t.is_road()),
        is_blocked,
    )
}

/// Road tiles reachable from `start` over 4-connected road tiles.
pub fn reachable_roads(map: &Tilemap<TileCode>, start: TilePos) -> Vec<TilePos> {
    let mut seen = vec![false; map.width * map.height];
    let mut queue = std::collections::VecDeque::new();
    let mut reached = Vec::new();

    if !map.get(start.x, start.y).is_some_and(|t| t.is_road()) {
        return reached;
    }
    seen[start.y * map.width + start.x] = true;
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        reached.push(pos);
        for (nx, ny) in map.neighbors(pos.x, pos.y) {
            let idx = ny * map.width + nx;
            if !seen[idx] && map.get(nx, ny).is_some_and(|t| t.is_road()) {
                seen[idx] = true;
                queue.push_back(TilePos::new(nx, ny));
            }
        }
    }

    reached
}

/// Road tile closest (Manhattan) to `target`, first in row-major order on ties.
pub fn nearest_road(map: &Tilemap<TileCode>, target: TilePos) -> Option<TilePos> {
    map.iter()
        .filter(|(_, _, t)| t.is_road())
        .map(|(x, y, _)| TilePos::new(x, y))
        .min_by_key(|p| p.manhattan(&target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PoiKind;

    fn poi(x: usize, y: usize, kind: PoiKind) -> PointOfInterest {
        PointOfInterest { position: TilePos::new(x, y), kind }
    }

    #[test]
    fn test_walk_is_monotone_and_reaches_target() {
        let mut map = Tilemap::new(40, 40);
        let mut rng = RandomStream::new(17);
        let path = carve_walk(&mut map, TilePos::new(5, 30), TilePos::new(30, 8), 0.3, &mut rng);
        assert_eq!(path.first(), Some(&TilePos::new(5, 30)));
        assert_eq!(path.last(), Some(&TilePos::new(30, 8)));
        assert_eq!(path.len(), 25 + 22 + 1);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(&pair[1]), 1);
            assert!(pair[1].x >= pair[0].x && pair[1].y <= pair[0].y);
        }
        for p in &path {
            assert_eq!(map.get(p.x, p.y), Some(&ROAD_TILE));
        }
    }

    #[test]
    fn test_walk_never_paves_border() {
        let mut map = Tilemap::new(20, 20);
        let mut rng = RandomStream::new(2);
        carve_walk(&mut map, TilePos::new(1, 1), TilePos::new(18, 1), 1.0, &mut rng);
        for x in 0..20 {
            assert_ne!(map.get(x, 0), Some(&ROAD_TILE));
        }
    }

    #[test]
    fn test_network_links_every_poi() {
        let pois = [
            poi(50, 50, PoiKind::Spawn),
            poi(20, 20, PoiKind::House),
            poi(80, 30, PoiKind::Ruin),
            poi(70, 80, PoiKind::Dungeon),
            poi(15, 85, PoiKind::House),
        ];
        let mut map = Tilemap::new(100, 100);
        let mut rng = RandomStream::new(4);
        let segments = build_road_network(&mut map, &pois, 0.3, &mut rng);
        assert_eq!(segments.len(), pois.len() - 1);

        let reached = reachable_roads(&map, pois[0].position);
        for p in &pois {
            assert!(reached.contains(&p.position), "{:?} not reached", p.position);
        }
    }

    #[test]
    fn test_greedy_picks_nearest_pair() {
        let pois = [
            poi(50, 50, PoiKind::Spawn),
            poi(90, 90, PoiKind::House),
            poi(55, 52, PoiKind::Ruin),
        ];
        let mut map = Tilemap::new(100, 100);
        let mut rng = RandomStream::new(1);
        let segments = build_road_network(&mut map, &pois, 0.0, &mut rng);
        assert_eq!(segments[0].end, TilePos::new(55, 52));
        assert_eq!(segments[1].start, TilePos::new(55, 52));
        assert_eq!(segments[1].end, TilePos::new(90, 90));
    }

    #[test]
    fn test_find_path_routes_around_blocked() {
        let map = Tilemap::new(20, 20);
        let wall = |p: TilePos| p.x == 10 && p.y < 15;
        let path = find_path(&map, TilePos::new(5, 5), |p| p == TilePos::new(15, 5), wall).unwrap();
        assert_eq!(path.first(), Some(&TilePos::new(5, 5)));
        assert_eq!(path.last(), Some(&TilePos::new(15, 5)));
        assert!(path.iter().all(|&p| !wall(p)));
        assert!(path.iter().any(|p| p.y >= 15));
    }

    #[test]
    fn test_nearest_road_connector() {
        let mut map = Tilemap::new(20, 20);
        for y in 1..19 {
            map.set(12, y, ROAD_TILE);
        }
        let path = path_to_nearest_road(&map, TilePos::new(4, 6), |_| false).unwrap();
        assert_eq!(path.last(), Some(&TilePos::new(12, 6)));
        assert_eq!(path.len(), 9);
        assert_eq!(nearest_road(&map, TilePos::new(4, 6)), Some(TilePos::new(12, 6)));
    }
}
