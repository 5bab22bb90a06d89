//! World assembly
//!
//! Runs the generation passes in their fixed order (placement, terrain,
//! roads, structures) against one random stream and packages the result.

use tracing::info;

use crate::config::GeneratorConfig;
use crate::error::ConfigError;
use crate::poi::place_points_of_interest;
use crate::rng::RandomStream;
use crate::roads::build_road_network;
use crate::seeds::{normalize_seed, WorldSeeds};
use crate::structures::build_structures;
use crate::terrain::synthesize_terrain;
use crate::tilemap::Tilemap;
use crate::types::{GeneratedWorld, MapData, MapTheme, PoiKind, WORLD_MAP_ID};
use crate::value_noise::NoiseChannels;

/// Generate a world with the default configuration.
pub fn generate_world(seed: i64) -> GeneratedWorld {
    assemble(seed, &GeneratorConfig::default())
}

/// Generate a world with a custom configuration.
pub fn generate_world_with(seed: i64, config: &GeneratorConfig) -> Result<GeneratedWorld, ConfigError> {
    config.validate()?;
    Ok(assemble(seed, config))
}

fn assemble(seed: i64, config: &GeneratorConfig) -> GeneratedWorld {
    let seeds = WorldSeeds::from_master(normalize_seed(seed));
    info!("Generating world: {}", seeds);

    let noise = NoiseChannels::new(&seeds);
    let mut rng = RandomStream::new(seeds.master);

    let pois = place_points_of_interest(config, &mut rng);
    info!(
        "Placed {} points of interest ({} houses, {} ruins, {} dungeons)",
        pois.len(),
        pois.iter().filter(|p| p.kind == PoiKind::House).count(),
        pois.iter().filter(|p| p.kind == PoiKind::Ruin).count(),
        pois.iter().filter(|p| p.kind == PoiKind::Dungeon).count(),
    );

    let mut tiles = Tilemap::new(config.map_width, config.map_height);
    let enemies = synthesize_terrain(&mut tiles, &noise, &pois, config, &mut rng);
    let roads = build_road_network(&mut tiles, &pois, config.road_widen_chance, &mut rng);
    let structures = build_structures(&mut tiles, &pois, seeds.master, config, &mut rng);

    let mut world_map = MapData::new(WORLD_MAP_ID, tiles, MapTheme::Outdoor);
    world_map.enemies = enemies;
    world_map.interactables = structures.interactables;
    world_map.portals = structures.portals;

    let spawn = pois[0].position.to_pixels(config.tile_size);
    info!(
        "World {} ready: {} enemies, {} portals, {} interiors",
        seeds.master,
        world_map.enemies.len(),
        world_map.portals.len(),
        structures.interiors.len()
    );

    GeneratedWorld {
        seed: seeds.master,
        world_map,
        interior_maps: structures.interiors,
        spawn,
        points_of_interest: pois,
        roads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_POI_SPACING;
    use crate::roads::{nearest_road, reachable_roads};
    use crate::seeds::DEFAULT_SEED;
    use crate::tiles::{Legend, TileCode, BORDER_TILE};
    use crate::types::{EnemyKind, TilePos};

    #[test]
    fn test_same_seed_identical_output() {
        let a = generate_world(1);
        let b = generate_world(1);
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a.world_map.tiles).unwrap(),
            serde_json::to_string(&b.world_map.tiles).unwrap()
        );
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = generate_world(1);
        let b = generate_world(2);
        assert_ne!(a.world_map.tiles, b.world_map.tiles);
    }

    #[test]
    fn test_degenerate_seed_uses_default() {
        assert_eq!(generate_world(0), generate_world(DEFAULT_SEED));
        assert_eq!(generate_world(-8).seed, DEFAULT_SEED);
    }

    #[test]
    fn test_grid_shape_and_border() {
        for seed in [1, 7, 1234, 99_999] {
            let world = generate_world(seed);
            let tiles = &world.world_map.tiles;
            assert_eq!((tiles.width, tiles.height), (100, 100));
            assert_eq!(tiles.rows().count(), 100);
            for (x, y, &t) in tiles.iter() {
                if tiles.is_border(x, y) {
                    assert_eq!(t, BORDER_TILE, "seed {} at ({}, {})", seed, x, y);
                }
            }
        }
    }

    #[test]
    fn test_poi_spacing() {
        let config = GeneratorConfig::default();
        for seed in 1..20 {
            let world = generate_world(seed);
            let pois = &world.points_of_interest;
            for (i, a) in pois.iter().enumerate() {
                for b in &pois[i + 1..] {
                    assert!(a.position.distance(&b.position) >= config.poi_min_distance);
                }
            }
        }
    }

    #[test]
    fn test_roads_reach_every_poi() {
        for seed in 1..25 {
            let world = generate_world(seed);
            let tiles = &world.world_map.tiles;
            let spawn = world.points_of_interest[0].position;
            let root = nearest_road(tiles, spawn).unwrap();
            let reached = reachable_roads(tiles, root);
            for poi in &world.points_of_interest {
                assert!(
                    reached.iter().any(|r| r.manhattan(&poi.position) <= 3),
                    "seed {}: {:?} cut off",
                    seed,
                    poi
                );
            }
        }
    }

    #[test]
    fn test_portal_round_trip() {
        let config = GeneratorConfig::default();
        for seed in 1..25 {
            let world = generate_world(seed);
            for (id, interior) in &world.interior_maps {
                let back: Vec<_> = interior.portals_to(WORLD_MAP_ID).collect();
                assert_eq!(back.len(), 1, "{} has {} exits", id, back.len());

                let inbound: Vec<_> = world.world_map.portals_to(id).collect();
                assert_eq!(inbound.len(), 1);

                let door = inbound[0].origin.top_left().to_tile(config.tile_size).unwrap();
                let landing = back[0].target().to_tile(config.tile_size).unwrap();
                assert!(landing.manhattan(&door) <= 2, "{}: {:?} vs {:?}", id, landing, door);
            }
        }
    }

    #[test]
    fn test_every_portal_targets_walkable_tile() {
        let config = GeneratorConfig::default();
        for seed in 1..25 {
            let world = generate_world(seed);
            let maps = std::iter::once(&world.world_map).chain(world.interior_maps.values());
            for map in maps {
                for portal in &map.portals {
                    let target = world.map(&portal.target_map).unwrap();
                    let tile = portal.target().to_tile(config.tile_size).unwrap();
                    let code = target.tile_at(tile).unwrap();
                    assert!(!code.is_solid(), "seed {}: {} -> {:?} is {:?}", seed, map.id, tile, code);
                }
            }
        }
    }

    #[test]
    fn test_one_boss_per_dungeon() {
        for seed in 1..25 {
            let world = generate_world(seed);
            for (id, map) in &world.interior_maps {
                let bosses = map.enemies.iter().filter(|e| e.kind == EnemyKind::Boss).count();
                if map.theme == MapTheme::Dungeon {
                    assert_eq!(bosses, 1, "{}", id);
                } else {
                    assert_eq!(bosses, 0, "{}", id);
                }
            }
            assert!(world.world_map.enemies.iter().all(|e| e.kind != EnemyKind::Boss));
        }
    }

    #[test]
    fn test_house_ids_follow_coordinates() {
        for seed in 1..15 {
            let world = generate_world(seed);
            for poi in world.points_of_interest.iter().filter(|p| p.kind == PoiKind::House) {
                let (x, y) = (poi.position.x, poi.position.y);
                let id = format!("house_{}_{}", x, y);
                let interior = world.interior_maps.get(&id).unwrap();
                assert_eq!(interior.theme, MapTheme::Indoor);
                assert_eq!(world.world_map.tile_at(TilePos::new(x, y + 1)), Some(TileCode::Door));

                let back = interior.portals_to(WORLD_MAP_ID).next().unwrap();
                assert_eq!(back.target().to_tile(32), Some(TilePos::new(x, y + 2)));
            }
        }
    }

    #[test]
    fn test_dungeon_cap_across_seeds() {
        for seed in 1..60 {
            let world = generate_world(seed);
            let dungeon_pois = world
                .points_of_interest
                .iter()
                .filter(|p| p.kind == PoiKind::Dungeon)
                .count();
            let dungeon_maps = world
                .interior_maps
                .values()
                .filter(|m| m.theme == MapTheme::Dungeon)
                .count();
            assert!(dungeon_pois <= 2);
            assert_eq!(dungeon_pois, dungeon_maps);
        }
    }

    #[test]
    fn test_only_overworld_legend() {
        for seed in [3, 30, 300] {
            let world = generate_world(seed);
            let maps = std::iter::once(&world.world_map).chain(world.interior_maps.values());
            for map in maps {
                assert!(map.tiles.iter().all(|(_, _, &t)| Legend::Overworld.allows(t)), "{}", map.id);
            }
        }
    }

    #[test]
    fn test_enemies_stand_on_walkable_tiles() {
        let config = GeneratorConfig::default();
        for seed in 1..15 {
            let world = generate_world(seed);
            let maps = std::iter::once(&world.world_map).chain(world.interior_maps.values());
            for map in maps {
                for enemy in &map.enemies {
                    let tile = enemy.position.to_tile(config.tile_size).unwrap();
                    assert!(!map.tile_at(tile).unwrap().is_solid(), "{} in {}", enemy.id, map.id);
                }
            }
        }
    }

    #[test]
    fn test_spawn_is_map_center() {
        let world = generate_world(42);
        assert_eq!(world.spawn, TilePos::new(50, 50).to_pixels(32));
        let tile = world.world_map.tile_at(TilePos::new(50, 50)).unwrap();
        assert!(!tile.is_solid());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = GeneratorConfig { map_width: 5, ..Default::default() };
        assert!(matches!(
            generate_world_with(1, &config),
            Err(ConfigError::MapTooSmall { .. })
        ));
    }

    #[test]
    fn test_oversized_tile_size_is_rejected() {
        let config = GeneratorConfig { tile_size: 50_000_000, ..Default::default() };
        assert!(matches!(
            generate_world_with(1, &config),
            Err(ConfigError::TileSizeTooLarge { .. })
        ));
    }

    #[test]
    fn test_tightest_spacing_keeps_structures_intact() {
        let config = GeneratorConfig {
            poi_count: 40,
            poi_min_distance: MIN_POI_SPACING,
            ..Default::default()
        };
        for seed in 1..30 {
            let world = generate_world_with(seed, &config).unwrap();

            let built = world
                .points_of_interest
                .iter()
                .filter(|p| matches!(p.kind, PoiKind::House | PoiKind::Dungeon))
                .count();
            assert_eq!(world.interior_maps.len(), built, "seed {}", seed);
            assert_eq!(world.world_map.portals.len(), built, "seed {}", seed);

            let maps = std::iter::once(&world.world_map).chain(world.interior_maps.values());
            for map in maps {
                for portal in &map.portals {
                    let target = world.map(&portal.target_map).unwrap();
                    let tile = portal.target().to_tile(config.tile_size).unwrap();
                    let code = target.tile_at(tile).unwrap();
                    assert!(!code.is_solid(), "seed {}: {} -> {:?} is {:?}", seed, map.id, tile, code);
                }
            }

            let tiles = &world.world_map.tiles;
            let root = nearest_road(tiles, world.points_of_interest[0].position).unwrap();
            let reached = reachable_roads(tiles, root);
            for poi in &world.points_of_interest {
                assert!(
                    reached.iter().any(|r| r.manhattan(&poi.position) <= 3),
                    "seed {}: {:?} cut off",
                    seed,
                    poi
                );
            }
        }
    }

    #[test]
    fn test_custom_config() {
        let config = GeneratorConfig {
            map_width: 60,
            map_height: 40,
            poi_count: 4,
            poi_min_distance: 10.0,
            poi_margin: 6,
            ..Default::default()
        };
        let world = generate_world_with(9, &config).unwrap();
        assert_eq!(world.world_map.tiles.width, 60);
        assert_eq!(world.world_map.tiles.height, 40);
        assert!(world.points_of_interest.len() <= 5);
        assert_eq!(world.spawn, TilePos::new(30, 20).to_pixels(32));
    }

    #[test]
    fn test_json_schema_names() {
        let world = generate_world(5);
        let json = serde_json::to_value(&world).unwrap();
        assert!(json.get("worldMap").is_some());
        assert!(json.get("interiorMaps").is_some());
        assert_eq!(json["worldMap"]["id"], "world");
        assert_eq!(json["worldMap"]["theme"], "outdoor");
        assert_eq!(json["worldMap"]["tiles"].as_array().unwrap().len(), 100);
    }
}
