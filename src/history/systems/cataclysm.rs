//! Cataclysms - plague, famine and collapse, all at once

use tracing::info;

use crate::core::error::Result;
use crate::core::random::RandomSource;
use crate::core::types::{CivId, TileId, Year};
use crate::history::civ::Civilization;
use crate::history::events::EventType;
use crate::history::world::World;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CataclysmOutcome {
    pub tiles_lost: usize,
    pub collapsed: usize,
}

/// Whether the step starting at `year` contains a cataclysm.
///
/// Cataclysms come at `rate` per year, one each time `year·rate` crosses an
/// integer.
pub fn cataclysm_due(year: Year, time_step: f64, rate: f64) -> bool {
    ((year + time_step) * rate).floor() > (year * rate).floor()
}

/// Depopulate provinces and destroy knowledge everywhere.
///
/// Each tile survives with probability `apocalypse_survival_rate`; a tile
/// that does not takes everything acquired through it along. Each unit of
/// technology is kept with the same probability.
pub fn have_cataclysm<C: Civilization, R: RandomSource>(world: &mut World<C>, rng: &mut R) -> Result<CataclysmOutcome> {
    let survival = world.config().apocalypse_survival_rate;
    let unit = world.config().value_of_knowledge;
    let mut outcome = CataclysmOutcome::default();

    let ids: Vec<CivId> = world.civs.keys().copied().collect();
    for id in ids {
        let tiles: Vec<TileId> = world.civ(id)?.tiles().iter().collect();
        for tile in tiles {
            if world.ruler(tile) == Some(id) && !rng.probability(survival) {
                outcome.tiles_lost += world.transfer_tile(tile, None)?.lost.len();
            }
        }

        if let Some(civ) = world.civs.get_mut(&id) {
            let kept = rng.binomial((civ.technology() / unit).floor() as u64, survival);
            civ.set_technology(unit * kept as f64);
        }
    }

    outcome.collapsed = world.prune_dead()?.len();
    let year = world.year();
    world.log.add_event(
        EventType::Cataclysm {
            tiles_lost: outcome.tiles_lost,
        },
        year,
        Vec::new(),
        None,
    );
    info!(year, tiles_lost = outcome.tiles_lost, collapsed = outcome.collapsed, "cataclysm");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WorldConfig;
    use crate::history::civ::Civ;
    use crate::history::world::Claim;
    use crate::planet::{Biome, Edge, Planet, Tile};
    use crate::testing::ScriptedRandom;

    #[test]
    fn test_threshold_crossing() {
        let rate = 1.0 / 256.0;
        assert!(!cataclysm_due(0.0, 100.0, rate));
        assert!(!cataclysm_due(100.0, 100.0, rate));
        assert!(cataclysm_due(200.0, 100.0, rate));
        assert!(cataclysm_due(-100.0, 100.0, rate));
        assert!(!cataclysm_due(-200.0, 100.0, rate));
        assert!(!cataclysm_due(0.0, 100.0, 0.0));
    }

    fn pair() -> Planet {
        Planet::new(vec![
            Tile::from_biome(TileId(0), Biome::Grassland, 100.0, 0.0, 0, vec![Edge { tile: TileId(1), distance: 1.0 }]),
            Tile::from_biome(TileId(1), Biome::Grassland, 100.0, 0.0, 0, vec![Edge { tile: TileId(0), distance: 1.0 }]),
        ])
        .unwrap()
    }

    #[test]
    fn test_total_destruction() {
        let config = WorldConfig {
            apocalypse_survival_rate: 0.0,
            ..WorldConfig::default()
        };
        let mut world: World<Civ> = World::new(pair(), config).unwrap();
        let mut rng = ScriptedRandom::new(0.5);
        let id = world.next_civ_id();
        world.found_civ(id, TileId(0), 1.0, None, &mut rng).unwrap();
        world
            .transfer_tile(TileId(1), Some(Claim { civ: id, from: Some(TileId(0)) }))
            .unwrap();

        let outcome = have_cataclysm(&mut world, &mut rng).unwrap();
        assert_eq!(outcome, CataclysmOutcome { tiles_lost: 2, collapsed: 1 });
        assert_eq!(world.civ_count(), 0);
        assert!(world.political_map().iter().all(Option::is_none));
        world.verify_political_map().unwrap();
    }

    #[test]
    fn test_survivors_keep_everything() {
        let config = WorldConfig {
            apocalypse_survival_rate: 1.0,
            ..WorldConfig::default()
        };
        let mut world: World<Civ> = World::new(pair(), config).unwrap();
        let mut rng = ScriptedRandom::new(0.5);
        let id = world.next_civ_id();
        world.found_civ(id, TileId(0), 2.5, None, &mut rng).unwrap();

        let outcome = have_cataclysm(&mut world, &mut rng).unwrap();
        assert_eq!(outcome.tiles_lost, 0);
        assert_eq!(world.civ(id).unwrap().technology(), 2.5);
    }

    #[test]
    fn test_cataclysm_never_raises_technology() {
        let config = WorldConfig {
            apocalypse_survival_rate: 1.0,
            ..WorldConfig::default()
        };
        let mut world: World<Civ> = World::new(pair(), config).unwrap();
        let mut rng = ScriptedRandom::always();
        let id = world.next_civ_id();
        world.found_civ(id, TileId(0), 1.3, None, &mut rng).unwrap();

        have_cataclysm(&mut world, &mut rng).unwrap();
        let technology = world.civ(id).unwrap().technology();
        assert!(technology <= 1.3);
        assert_eq!(technology, 1.0);
    }
}
