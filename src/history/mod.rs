//! Civilization history simulation
//!
//! Runs on a finished [`Planet`](crate::planet::Planet) in fixed time steps.
//! Each step ages every civilization, then spawns new states and revolts,
//! resolves conquest, spreads technology across borders, and occasionally
//! strikes with a cataclysm.

pub mod civ;
pub mod events;
pub mod lect;
pub mod output;
pub mod queue;
pub mod systems;
pub mod tree;
pub mod world;

pub use civ::{Civ, Civilization};
pub use events::{Event, EventType, HistoryLog};
pub use lect::Lect;
pub use output::{HistorySummary, StepReport, WorldSnapshot};
pub use queue::{EventQueue, Invasion};
pub use tree::{OwnershipTree, TreeError};
pub use world::{Claim, Transfer, World};
