//! Territorial conquest within one time step
//!
//! Every border pair gets an invasion estimate. Those that finish within the
//! step are queued and committed in order of completion; each success
//! schedules follow-on invasions from the newly taken land. Since the state
//! changes as the queue drains, each invasion is re-checked when it comes up
//! and quietly dropped if it no longer makes sense.

use ahash::AHashSet;
use tracing::trace;

use crate::core::error::Result;
use crate::core::random::RandomSource;
use crate::core::types::{CivId, TileId};
use crate::history::civ::Civilization;
use crate::history::events::EventType;
use crate::history::queue::{EventQueue, Invasion};
use crate::history::world::{Claim, World};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConquestOutcome {
    /// Invasions that went through
    pub conquests: usize,
    /// Invasions dropped because the situation changed before they finished
    pub discarded: usize,
    pub collapsed: usize,
}

pub fn spread_civs<C: Civilization, R: RandomSource>(world: &mut World<C>, rng: &mut R) -> Result<ConquestOutcome> {
    let horizon = world.config().time_step;
    let mut invasions = EventQueue::new();

    for invader in world.civs.values() {
        for (&ours, theirs) in invader.border() {
            for &target in theirs {
                let time = estimate(world, invader, ours, target, rng);
                if time <= horizon {
                    invasions.push(Invasion::new(time, invader.id(), ours, target));
                }
            }
        }
    }

    // (civ, tile) pairs lost during this drain; nobody wins back a tile the
    // same step they lost it
    let mut lost: AHashSet<(CivId, TileId)> = AHashSet::new();
    let mut outcome = ConquestOutcome::default();

    while let Some(invasion) = invasions.pop() {
        if !is_viable(world, &invasion, &lost) {
            trace!(invader = %invasion.invader, target = %invasion.end, "invasion abandoned");
            outcome.discarded += 1;
            continue;
        }

        let claim = Claim {
            civ: invasion.invader,
            from: Some(invasion.start),
        };
        let transfer = world.transfer_tile(invasion.end, Some(claim))?;
        if let Some(loser) = transfer.loser {
            lost.extend(transfer.lost.iter().map(|&tile| (loser, tile)));
        }
        let year = world.year() + invasion.time.into_inner();
        let mut participants = vec![invasion.invader];
        participants.extend(transfer.loser);
        world.log.add_event(
            EventType::Conquest {
                invader: invasion.invader,
                loser: transfer.loser,
                captured: transfer.captured.len(),
            },
            year,
            participants,
            Some(invasion.end),
        );
        trace!(
            invader = %invasion.invader,
            target = %invasion.end,
            captured = transfer.captured.len(),
            "conquest"
        );
        outcome.conquests += 1;

        let invader = world.civ(invasion.invader)?;
        for conquered in invader.tiles().get_all_children(invasion.end)? {
            for neighbor in world.planet().tile(conquered).neighbor_ids() {
                if invader.tiles().has(neighbor) || lost.contains(&(invasion.invader, neighbor)) {
                    continue;
                }
                let time = invasion.time.into_inner() + estimate(world, invader, conquered, neighbor, rng);
                if time <= horizon {
                    invasions.push(Invasion::new(time, invasion.invader, conquered, neighbor));
                }
            }
        }
    }

    outcome.collapsed = world.prune_dead()?.len();
    Ok(outcome)
}

fn estimate<C: Civilization, R: RandomSource>(
    world: &World<C>,
    invader: &C,
    from: TileId,
    to: TileId,
    rng: &mut R,
) -> f64 {
    let defender = world.ruler(to).and_then(|id| world.civs.get(&id));
    invader.estimate_invasion_time(from, to, defender, world.planet(), world.config(), rng)
}

/// Whether a queued invasion still holds against the current state
fn is_viable<C: Civilization>(world: &World<C>, invasion: &Invasion, lost: &AHashSet<(CivId, TileId)>) -> bool {
    let Ok(invader) = world.civ(invasion.invader) else {
        return false;
    };
    if !invader.tiles().has(invasion.start) || invader.tiles().has(invasion.end) {
        return false;
    }
    if lost.contains(&(invasion.invader, invasion.end)) {
        return false;
    }
    let defender = world.ruler(invasion.end).and_then(|id| world.civs.get(&id));
    let resistance = defender.map_or(0.0, |d| d.strength(Some(d), invasion.end, world.config()));
    invader.strength(defender, invasion.end, world.config()) > resistance
}
