//! Simulation phases, run by [`World::step`](crate::history::World::step)
//! in this order: spawning, conquest, diffusion, cataclysm.

pub mod cataclysm;
pub mod conquest;
mod diffusion;
mod spawning;

pub use cataclysm::{cataclysm_due, have_cataclysm, CataclysmOutcome};
pub use conquest::{spread_civs, ConquestOutcome};
pub use diffusion::spread_ideas;
pub use spawning::{spawn_civs, SpawnOutcome};
