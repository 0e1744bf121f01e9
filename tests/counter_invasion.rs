//! Conquest ordering with a scripted civilization
//!
//! `Garrison` has fixed strengths and marches at one year per kilometre, so
//! the order of every invasion in a step is known in advance.

use std::collections::{BTreeMap, BTreeSet};

use civ_history::core::error::Result;
use civ_history::core::random::RandomSource;
use civ_history::core::types::{CivId, TileId};
use civ_history::core::WorldConfig;
use civ_history::history::{Civilization, Claim, EventType, Lect, OwnershipTree, World};
use civ_history::planet::{Biome, Edge, Planet, Tile};
use civ_history::testing::ScriptedRandom;

/// Tiles with hill forts; whoever holds one defends it at `FORT_DEFENCE`
const FORTS: [TileId; 3] = [TileId(0), TileId(2), TileId(3)];
const ATTACK: f64 = 10.0;
const FIELD_DEFENCE: f64 = 1.0;
const FORT_DEFENCE: f64 = 100.0;

struct Garrison {
    id: CivId,
    capital: TileId,
    technology: f64,
    arable_area: f64,
    tiles: OwnershipTree<TileId>,
    border: BTreeMap<TileId, BTreeSet<TileId>>,
}

impl Garrison {
    fn rebuild_border(&mut self, planet: &Planet) {
        self.border = self
            .tiles
            .iter()
            .map(|tile| {
                let foreign = planet
                    .tile(tile)
                    .neighbor_ids()
                    .filter(|&n| !self.tiles.has(n))
                    .collect::<BTreeSet<_>>();
                (tile, foreign)
            })
            .filter(|(_, foreign)| !foreign.is_empty())
            .collect();
    }
}

impl Civilization for Garrison {
    fn found<R: RandomSource>(id: CivId, capital: TileId, technology: f64, _lect: Option<Lect>, _rng: &mut R) -> Self {
        Self {
            id,
            capital,
            technology,
            arable_area: 0.0,
            tiles: OwnershipTree::new(),
            border: BTreeMap::new(),
        }
    }

    fn id(&self) -> CivId {
        self.id
    }

    fn capital(&self) -> TileId {
        self.capital
    }

    fn technology(&self) -> f64 {
        self.technology
    }

    fn set_technology(&mut self, technology: f64) {
        self.technology = technology;
    }

    fn tiles(&self) -> &OwnershipTree<TileId> {
        &self.tiles
    }

    fn border(&self) -> &BTreeMap<TileId, BTreeSet<TileId>> {
        &self.border
    }

    fn lect_at(&self, _tile: TileId) -> Option<Lect> {
        None
    }

    fn official_lect(&self) -> Lect {
        Lect::proto(self.id.0 as u64)
    }

    fn update<R: RandomSource>(&mut self, _config: &WorldConfig, _rng: &mut R) {}

    fn estimate_invasion_time<R: RandomSource>(
        &self,
        from: TileId,
        to: TileId,
        _defender: Option<&Self>,
        planet: &Planet,
        _config: &WorldConfig,
        _rng: &mut R,
    ) -> f64 {
        planet.distance(from, to).unwrap_or(f64::INFINITY)
    }

    fn strength(&self, opponent: Option<&Self>, tile: TileId, _config: &WorldConfig) -> f64 {
        let defending = opponent.is_some_and(|o| o.id == self.id);
        match (defending, FORTS.contains(&tile)) {
            (false, _) => ATTACK,
            (true, true) => FORT_DEFENCE,
            (true, false) => FIELD_DEFENCE,
        }
    }

    fn conquer(&mut self, tile: TileId, from: Option<TileId>, _lect: Option<Lect>, planet: &Planet) -> Result<()> {
        self.tiles.add(tile, from)?;
        self.arable_area += planet.tile(tile).arable_area;
        self.rebuild_border(planet);
        Ok(())
    }

    fn lose(&mut self, tile: TileId, planet: &Planet) -> Result<Vec<TileId>> {
        let removed = self.tiles.delete(tile)?;
        self.arable_area -= removed.iter().map(|&t| planet.tile(t).arable_area).sum::<f64>();
        self.rebuild_border(planet);
        Ok(removed)
    }

    fn arable_area(&self) -> f64 {
        self.arable_area
    }
}

/// Grassland tiles joined by `(a, b, km)` roads
fn planet(tiles: u32, roads: &[(u32, u32, f64)]) -> Planet {
    let tiles = (0..tiles)
        .map(|i| {
            let edges = roads
                .iter()
                .filter_map(|&(a, b, km)| {
                    let other = if i == a {
                        b
                    } else if i == b {
                        a
                    } else {
                        return None;
                    };
                    Some(Edge { tile: TileId(other), distance: km })
                })
                .collect();
            Tile::from_biome(TileId(i), Biome::Grassland, 100.0, 0.0, 0, edges)
        })
        .collect();
    Planet::new(tiles).unwrap()
}

#[test]
fn test_loser_does_not_win_back_a_tile_in_the_same_step() {
    //   0 --10-- 1 --50-- 3
    //            |       /
    //          1000    20
    //            |   /
    //            2
    // `east` holds 2 (capital) and 1; `west` holds 0. West takes 1 at t=10,
    // east takes the empty fort at 3 at t=20 and would be back at 1 by t=70.
    let planet = planet(4, &[(0, 1, 10.0), (1, 2, 1000.0), (1, 3, 50.0), (2, 3, 20.0)]);
    let config = WorldConfig {
        time_step: 100.0,
        cataclysm_rate: 0.0,
        ..WorldConfig::default()
    };
    let mut world: World<Garrison> = World::new(planet, config).unwrap();
    let mut rng = ScriptedRandom::new(0.5);
    let west = world.next_civ_id();
    let east = world.next_civ_id();
    world.found_civ(west, TileId(0), 1.0, None, &mut rng).unwrap();
    world.found_civ(east, TileId(2), 1.0, None, &mut rng).unwrap();
    world
        .transfer_tile(TileId(1), Some(Claim { civ: east, from: Some(TileId(2)) }))
        .unwrap();

    let outcome = world.spread_civs(&mut rng).unwrap();

    assert_eq!(world.ruler(TileId(1)), Some(west));
    assert_eq!(world.ruler(TileId(3)), Some(east));
    assert_eq!(world.ruler(TileId(2)), Some(east));
    assert_eq!(outcome.conquests, 2);
    assert_eq!(outcome.collapsed, 0);
    // east's march from 1 at t=10, its march 1 -> 3 at t=50 and west's
    // assault on the fort at t=60; no march back to 1 was ever queued
    assert_eq!(outcome.discarded, 3);

    let east_took: Vec<Option<TileId>> = world
        .log()
        .events
        .iter()
        .filter(|event| matches!(event.event_type, EventType::Conquest { invader, .. } if invader == east))
        .map(|event| event.location)
        .collect();
    assert_eq!(east_took, vec![Some(TileId(3))]);
    world.verify_political_map().unwrap();
}

#[test]
fn test_fresh_step_may_retake_a_lost_tile() {
    // same map; on the next step the loss is forgotten and east marches on 1
    let planet = planet(4, &[(0, 1, 10.0), (1, 2, 1000.0), (1, 3, 50.0), (2, 3, 20.0)]);
    let config = WorldConfig {
        time_step: 100.0,
        cataclysm_rate: 0.0,
        ..WorldConfig::default()
    };
    let mut world: World<Garrison> = World::new(planet, config).unwrap();
    let mut rng = ScriptedRandom::new(0.5);
    let west = world.next_civ_id();
    let east = world.next_civ_id();
    world.found_civ(west, TileId(0), 1.0, None, &mut rng).unwrap();
    world.found_civ(east, TileId(2), 1.0, None, &mut rng).unwrap();
    world
        .transfer_tile(TileId(1), Some(Claim { civ: east, from: Some(TileId(2)) }))
        .unwrap();
    world.spread_civs(&mut rng).unwrap();

    world.spread_civs(&mut rng).unwrap();

    assert_eq!(world.ruler(TileId(1)), Some(east));
    world.verify_political_map().unwrap();
}
