//! Technology diffusion across borders

use crate::core::random::RandomSource;
use crate::core::types::CivId;
use crate::history::civ::Civilization;
use crate::history::world::World;

/// Let every civ pick up technology it can see across its borders.
///
/// The gap to the most advanced neighbor is split into units of
/// `value_of_knowledge`, each adopted independently with probability
/// `1 - exp(-Δt·power_of_memes)`. A partial unit is never adopted. Returns how many civs gained anything.
pub fn spread_ideas<C: Civilization, R: RandomSource>(world: &mut World<C>, rng: &mut R) -> usize {
    let visible: Vec<(CivId, f64)> = world
        .civs
        .values()
        .map(|civ| {
            let neighbors = civ
                .border()
                .values()
                .flatten()
                .filter_map(|&tile| world.ruler(tile))
                .filter_map(|id| world.civs.get(&id))
                .map(|other| other.technology());
            (civ.id(), neighbors.fold(civ.technology(), f64::max))
        })
        .collect();

    let config = world.config();
    let unit = config.value_of_knowledge;
    let adoption = 1.0 - (-config.time_step * config.power_of_memes).exp();

    let mut learned = 0;
    for (id, seen) in visible {
        let Some(civ) = world.civs.get_mut(&id) else {
            continue;
        };
        let gap = seen - civ.technology();
        if gap <= 0.0 {
            continue;
        }
        let adopted = rng.binomial((gap / unit).floor() as u64, adoption);
        if adopted > 0 {
            civ.set_technology(civ.technology() + unit * adopted as f64);
            learned += 1;
        }
    }
    learned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;
    use crate::core::types::TileId;
    use crate::history::civ::Civ;
    use crate::planet::{Biome, Edge, Planet, Tile};
    use crate::testing::ScriptedRandom;

    fn pair() -> Planet {
        Planet::new(vec![
            Tile::from_biome(TileId(0), Biome::Grassland, 100.0, 0.0, 0, vec![Edge { tile: TileId(1), distance: 1.0 }]),
            Tile::from_biome(TileId(1), Biome::Grassland, 100.0, 0.0, 0, vec![Edge { tile: TileId(0), distance: 1.0 }]),
        ])
        .unwrap()
    }

    #[test]
    fn test_backward_neighbor_catches_up_in_whole_units() {
        let mut world: World<Civ> = World::new(pair(), WorldConfig::default()).unwrap();
        let mut rng = ScriptedRandom::new(0.5);
        let behind = world.next_civ_id();
        let ahead = world.next_civ_id();
        world.found_civ(behind, TileId(0), 1.0, None, &mut rng).unwrap();
        world.found_civ(ahead, TileId(1), 3.0, None, &mut rng).unwrap();

        let learned = spread_ideas(&mut world, &mut ScriptedRandom::new(0.0));
        assert_eq!(learned, 1);
        assert_eq!(world.civ(behind).unwrap().technology(), 3.0);
        assert_eq!(world.civ(ahead).unwrap().technology(), 3.0);
    }

    #[test]
    fn test_partial_units_are_not_adopted() {
        let mut world: World<Civ> = World::new(pair(), WorldConfig::default()).unwrap();
        let mut rng = ScriptedRandom::new(0.5);
        let behind = world.next_civ_id();
        let ahead = world.next_civ_id();
        world.found_civ(behind, TileId(0), 1.0, None, &mut rng).unwrap();
        world.found_civ(ahead, TileId(1), 1.8, None, &mut rng).unwrap();

        assert_eq!(spread_ideas(&mut world, &mut ScriptedRandom::always()), 1);
        let technology = world.civ(behind).unwrap().technology();
        assert_eq!(technology, 1.5);
        assert!(technology <= 1.8);

        // what is left of the gap is less than one unit
        assert_eq!(spread_ideas(&mut world, &mut ScriptedRandom::always()), 0);
        assert_eq!(world.civ(behind).unwrap().technology(), 1.5);
    }

    #[test]
    fn test_powerless_memes_spread_nothing() {
        let config = WorldConfig {
            power_of_memes: 0.0,
            ..WorldConfig::default()
        };
        let mut world: World<Civ> = World::new(pair(), config).unwrap();
        let mut rng = ScriptedRandom::new(0.5);
        let behind = world.next_civ_id();
        let ahead = world.next_civ_id();
        world.found_civ(behind, TileId(0), 1.0, None, &mut rng).unwrap();
        world.found_civ(ahead, TileId(1), 3.0, None, &mut rng).unwrap();

        assert_eq!(spread_ideas(&mut world, &mut rng), 0);
        assert_eq!(world.civ(behind).unwrap().technology(), 1.0);
    }
}
