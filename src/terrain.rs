//! Terrain synthesis
//!
//! Classifies every exterior cell from the elevation and forest noise
//! channels, clears protected ground around points of interest, and rolls
//! wandering enemies in the same pass so the draw order stays fixed.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::rng::RandomStream;
use crate::tilemap::Tilemap;
use crate::tiles::{TileCode, BORDER_TILE};
use crate::types::{Enemy, EnemyKind, PoiKind, PointOfInterest, TilePos};
use crate::value_noise::NoiseChannels;

/// Elevation below this is open water
pub const WATER_LEVEL: f64 = -0.25;
/// Elevation below this (and above water) is shore sand
pub const SHORE_LEVEL: f64 = -0.18;
/// Elevation above this is impassable high ground
pub const MOUNTAIN_LEVEL: f64 = 0.45;
/// Forest density above this is dense forest
pub const DENSE_FOREST: f64 = 0.25;
/// Forest density above this is mixed woodland
pub const MIXED_FOREST: f64 = 0.0;

/// Vegetation regime of a mid-elevation cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Regime {
    DenseForest,
    MixedForest,
    Open,
}

impl Regime {
    pub fn from_density(forest: f64) -> Self {
        if forest > DENSE_FOREST {
            Regime::DenseForest
        } else if forest > MIXED_FOREST {
            Regime::MixedForest
        } else {
            Regime::Open
        }
    }

    fn table(self) -> &'static [(TileCode, f64)] {
        use TileCode::*;
        match self {
            Regime::DenseForest => &[(Tree, 0.70), (Bush, 0.22), (Grass, 0.08)],
            Regime::MixedForest => &[
                (Grass, 0.55),
                (Tree, 0.20),
                (Bush, 0.12),
                (Flower, 0.08),
                (TallGrass, 0.05),
            ],
            Regime::Open => &[
                (Grass, 0.78),
                (TallGrass, 0.08),
                (Flower, 0.06),
                (Dirt, 0.05),
                (Rock, 0.03),
            ],
        }
    }
}

/// Radius of cleared ground around a POI of the given kind.
pub fn protection_radius(kind: PoiKind) -> f64 {
    match kind {
        PoiKind::Spawn => 3.0,
        PoiKind::House => 4.0,
        PoiKind::Ruin => 5.0,
        PoiKind::Dungeon => 3.0,
    }
}

/// First POI whose protection radius covers `pos`.
fn protecting_poi(pois: &[PointOfInterest], pos: TilePos) -> Option<PoiKind> {
    pois.iter()
        .find(|p| p.position.distance(&pos) <= protection_radius(p.kind))
        .map(|p| p.kind)
}

fn protected_tile(kind: PoiKind, rng: &mut RandomStream) -> TileCode {
    match kind {
        PoiKind::Spawn | PoiKind::House => TileCode::Grass,
        PoiKind::Ruin => {
            if rng.chance(0.35) {
                TileCode::Dirt
            } else {
                TileCode::Grass
            }
        }
        PoiKind::Dungeon => TileCode::Floor,
    }
}

/// Fill the exterior map in place and return the enemies rolled on it.
///
/// Road tiles already present are left alone. The outer ring always ends up
/// as [`BORDER_TILE`].
pub fn synthesize_terrain(
    map: &mut Tilemap<TileCode>,
    noise: &NoiseChannels,
    pois: &[PointOfInterest],
    config: &GeneratorConfig,
    rng: &mut RandomStream,
) -> Vec<Enemy> {
    let mut enemies = Vec::new();

    for y in 0..map.height {
        for x in 0..map.width {
            if map.is_border(x, y) || map.get(x, y).is_some_and(|t| t.is_road()) {
                continue;
            }

            let pos = TilePos::new(x, y);
            if let Some(kind) = protecting_poi(pois, pos) {
                map.set(x, y, protected_tile(kind, rng));
                continue;
            }

            let elevation = noise.elevation_at(x, y);
            let tile = if elevation < WATER_LEVEL {
                TileCode::Water
            } else if elevation < SHORE_LEVEL {
                TileCode::Sand
            } else if elevation > MOUNTAIN_LEVEL {
                TileCode::Tree
            } else {
                let regime = Regime::from_density(noise.forest_at(x, y));
                let tile = rng.weighted(regime.table()).unwrap_or(TileCode::Grass);
                if !tile.is_solid() {
                    if let Some(kind) = roll_enemy(regime, config, rng) {
                        let id = format!("enemy_{}_{}", x, y);
                        enemies.push(Enemy::spawn(id, kind, pos, config.tile_size));
                    }
                }
                tile
            };
            map.set(x, y, tile);
        }
    }

    stamp_border(map);
    debug!("Terrain pass placed {} enemies", enemies.len());
    enemies
}

fn roll_enemy(regime: Regime, config: &GeneratorConfig, rng: &mut RandomStream) -> Option<EnemyKind> {
    match regime {
        Regime::DenseForest | Regime::MixedForest => rng
            .chance(config.forest_enemy_chance)
            .then(|| rng.weighted(&[(EnemyKind::Bat, 0.5), (EnemyKind::Slime, 0.5)]))
            .flatten(),
        Regime::Open => rng.chance(config.open_enemy_chance).then_some(EnemyKind::Slime),
    }
}

/// Force the outer ring to the impassable border tile.
pub fn stamp_border(map: &mut Tilemap<TileCode>) {
    let (w, h) = (map.width, map.height);
    if w == 0 || h == 0 {
        return;
    }
    for x in 0..w {
        map.set(x, 0, BORDER_TILE);
        map.set(x, h - 1, BORDER_TILE);
    }
    for y in 0..h {
        map.set(0, y, BORDER_TILE);
        map.set(w - 1, y, BORDER_TILE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::WorldSeeds;

    fn run(seed: i64, pois: &[PointOfInterest]) -> (Tilemap<TileCode>, Vec<Enemy>) {
        let config = GeneratorConfig::default();
        let noise = NoiseChannels::new(&WorldSeeds::from_master(seed));
        let mut map = Tilemap::new(config.map_width, config.map_height);
        let mut rng = RandomStream::new(seed);
        let enemies = synthesize_terrain(&mut map, &noise, pois, &config, &mut rng);
        (map, enemies)
    }

    #[test]
    fn test_border_ring_is_wall() {
        let (map, _) = run(5, &[]);
        for (x, y, &tile) in map.iter() {
            if map.is_border(x, y) {
                assert_eq!(tile, BORDER_TILE);
            }
        }
    }

    #[test]
    fn test_only_overworld_codes() {
        let (map, _) = run(77, &[]);
        assert!(map.iter().all(|(_, _, t)| t.code() <= TileCode::Dirt.code()));
    }

    #[test]
    fn test_road_tiles_survive() {
        let config = GeneratorConfig::default();
        let noise = NoiseChannels::new(&WorldSeeds::from_master(9));
        let mut map = Tilemap::new(config.map_width, config.map_height);
        for x in 10..40 {
            map.set(x, 20, TileCode::Path);
        }
        let mut rng = RandomStream::new(9);
        synthesize_terrain(&mut map, &noise, &[], &config, &mut rng);
        for x in 10..40 {
            assert_eq!(map.get(x, 20), Some(&TileCode::Path));
        }
    }

    #[test]
    fn test_protection_zones() {
        let pois = [
            PointOfInterest { position: TilePos::new(50, 50), kind: PoiKind::Spawn },
            PointOfInterest { position: TilePos::new(20, 20), kind: PoiKind::Dungeon },
            PointOfInterest { position: TilePos::new(75, 30), kind: PoiKind::House },
        ];
        let (map, enemies) = run(31, &pois);
        assert_eq!(map.get(50, 50), Some(&TileCode::Grass));
        assert_eq!(map.get(20, 20), Some(&TileCode::Floor));
        assert_eq!(map.get(22, 21), Some(&TileCode::Floor));
        assert_eq!(map.get(77, 33), Some(&TileCode::Grass));

        let config = GeneratorConfig::default();
        for enemy in &enemies {
            let tile = enemy.position.to_tile(config.tile_size).unwrap();
            assert!(protecting_poi(&pois, tile).is_none());
            assert!(!map.get(tile.x, tile.y).unwrap().is_solid());
        }
    }

    #[test]
    fn test_regime_thresholds() {
        assert_eq!(Regime::from_density(0.3), Regime::DenseForest);
        assert_eq!(Regime::from_density(0.1), Regime::MixedForest);
        assert_eq!(Regime::from_density(0.0), Regime::Open);
        assert_eq!(Regime::from_density(-0.7), Regime::Open);
    }

    #[test]
    fn test_deterministic() {
        let (a, ea) = run(123, &[]);
        let (b, eb) = run(123, &[]);
        assert_eq!(a, b);
        assert_eq!(ea, eb);
    }
}
