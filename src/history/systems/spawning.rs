//! Founding of new states and revolts against old ones

use tracing::trace;

use crate::core::error::Result;
use crate::core::random::RandomSource;
use crate::core::types::TileId;
use crate::history::civ::Civilization;
use crate::history::events::EventType;
use crate::history::world::World;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnOutcome {
    pub founded: usize,
    pub revolts: usize,
    pub collapsed: usize,
}

/// Give every tile one chance to found a state or, if it is already ruled,
/// to break away.
///
/// Unclaimed land coalesces at `authoritarianism` per year per unit of
/// carrying capacity. Ruled land rebels at `libertarianism`, multiplied by
/// `nationalism` where the people do not understand their rulers. Rebels
/// keep their former ruler's technology. Every tile consumes an id whether
/// or not anything happens.
pub fn spawn_civs<C: Civilization, R: RandomSource>(world: &mut World<C>, rng: &mut R) -> Result<SpawnOutcome> {
    let mut outcome = SpawnOutcome::default();
    let time_step = world.config().time_step;

    for index in 0..world.planet().len() {
        let tile = TileId(index as u32);
        let id = world.next_civ_id();
        let config = world.config();
        let capacity = config.carrying_capacity * world.planet().tile(tile).arable_area;

        match world.ruler(tile) {
            None => {
                if rng.probability(config.authoritarianism * time_step * capacity) {
                    let technology = config.initial_technology;
                    world.found_civ(id, tile, technology, None, rng)?;
                    let year = world.year();
                    world.log.add_event(EventType::Founded { civ: id }, year, vec![id], Some(tile));
                    trace!(civ = %id, %tile, "state founded");
                    outcome.founded += 1;
                }
            }
            Some(ruler_id) => {
                let ruler = world.civ(ruler_id)?;
                let linguistic_modifier = if ruler.is_intelligible_at(tile) {
                    1.0
                } else {
                    config.nationalism
                };
                if rng.probability(config.libertarianism * time_step * capacity * linguistic_modifier) {
                    let technology = ruler.technology();
                    let lect = ruler.lect_at(tile);
                    world.found_civ(id, tile, technology, lect, rng)?;
                    let year = world.year();
                    world.log.add_event(
                        EventType::Revolt { rebel: id, ruler: ruler_id },
                        year,
                        vec![id, ruler_id],
                        Some(tile),
                    );
                    trace!(rebel = %id, ruler = %ruler_id, %tile, "revolt");
                    outcome.revolts += 1;
                }
            }
        }
    }

    outcome.collapsed = world.prune_dead()?.len();
    Ok(outcome)
}
