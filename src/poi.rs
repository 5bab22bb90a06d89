//! Point-of-interest placement
//!
//! Spawn goes to the grid centre; the rest are rejection-sampled inside the
//! edge margin with a minimum spacing. Placement is best-effort: a POI that
//! cannot find room within the attempt budget is dropped.

use tracing::debug;

use crate::config::GeneratorConfig;
use crate::rng::RandomStream;
use crate::types::{PoiKind, PointOfInterest, TilePos};

/// Place the spawn and up to `config.poi_count` further POIs.
///
/// The spawn is always element 0.
pub fn place_points_of_interest(
    config: &GeneratorConfig,
    rng: &mut RandomStream,
) -> Vec<PointOfInterest> {
    let spawn = PointOfInterest {
        position: TilePos::new(config.map_width / 2, config.map_height / 2),
        kind: PoiKind::Spawn,
    };
    let mut pois = vec![spawn];
    let mut dungeons = 0;

    for _ in 0..config.poi_count {
        let Some(position) = find_position(config, rng, &pois) else {
            debug!("POI dropped after {} attempts", config.poi_max_attempts);
            continue;
        };

        let kind = pick_kind(config, rng, dungeons);
        if kind == PoiKind::Dungeon {
            dungeons += 1;
        }
        pois.push(PointOfInterest { position, kind });
    }

    pois
}

/// Rejection-sample a position that respects margin and spacing.
fn find_position(
    config: &GeneratorConfig,
    rng: &mut RandomStream,
    placed: &[PointOfInterest],
) -> Option<TilePos> {
    for _ in 0..config.poi_max_attempts {
        let candidate = TilePos::new(
            rng.range(config.poi_margin, config.map_width - config.poi_margin),
            rng.range(config.poi_margin, config.map_height - config.poi_margin),
        );
        let clear = placed
            .iter()
            .all(|p| p.position.distance(&candidate) >= config.poi_min_distance);
        if clear {
            return Some(candidate);
        }
    }
    None
}

fn pick_kind(config: &GeneratorConfig, rng: &mut RandomStream, dungeons: usize) -> PoiKind {
    if dungeons < config.max_dungeons && rng.chance(config.dungeon_chance) {
        PoiKind::Dungeon
    } else if rng.chance(config.ruin_fraction) {
        PoiKind::Ruin
    } else {
        PoiKind::House
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(seed: i64, config: &GeneratorConfig) -> Vec<PointOfInterest> {
        let mut rng = RandomStream::new(seed);
        place_points_of_interest(config, &mut rng)
    }

    #[test]
    fn test_spawn_first_at_center() {
        let config = GeneratorConfig::default();
        let pois = place(11, &config);
        assert_eq!(pois[0].kind, PoiKind::Spawn);
        assert_eq!(pois[0].position, TilePos::new(50, 50));
        assert_eq!(pois.iter().filter(|p| p.kind == PoiKind::Spawn).count(), 1);
    }

    #[test]
    fn test_spacing_and_margin() {
        let config = GeneratorConfig::default();
        for seed in 1..40 {
            let pois = place(seed, &config);
            assert!(pois.len() <= config.poi_count + 1);
            for (i, a) in pois.iter().enumerate() {
                if a.kind != PoiKind::Spawn {
                    assert!(a.position.x >= config.poi_margin);
                    assert!(a.position.x < config.map_width - config.poi_margin);
                    assert!(a.position.y >= config.poi_margin);
                    assert!(a.position.y < config.map_height - config.poi_margin);
                }
                for b in &pois[i + 1..] {
                    assert!(a.position.distance(&b.position) >= config.poi_min_distance);
                }
            }
        }
    }

    #[test]
    fn test_dungeon_cap() {
        let config = GeneratorConfig {
            dungeon_chance: 1.0,
            ..Default::default()
        };
        let pois = place(3, &config);
        let dungeons = pois.iter().filter(|p| p.kind == PoiKind::Dungeon).count();
        assert_eq!(dungeons, config.max_dungeons.min(pois.len() - 1));
    }

    #[test]
    fn test_crowded_map_is_best_effort() {
        let config = GeneratorConfig {
            map_width: 30,
            map_height: 30,
            poi_margin: 5,
            poi_min_distance: 40.0,
            ..Default::default()
        };
        let pois = place(8, &config);
        assert_eq!(pois.len(), 1);
    }
}
