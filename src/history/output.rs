//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{CivId, TileId, Year};
use crate::history::civ::Civilization;
use crate::history::events::{EventType, HistoryLog};
use crate::history::world::World;

/// What happened during one call to [`World::step`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Year at the start of the step
    pub year: Year,
    pub founded: usize,
    pub revolts: usize,
    pub conquests: usize,
    pub discarded_invasions: usize,
    pub civs_learned: usize,
    pub collapsed: usize,
    pub cataclysm: bool,
    pub live_civs: usize,
}

/// Serializable snapshot of world state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub year: Year,
    pub civs: Vec<CivSnapshot>,
    /// Owner of each tile, indexed by tile id
    pub political_map: Vec<Option<u32>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CivSnapshot {
    pub id: CivId,
    pub capital: TileId,
    pub tiles: usize,
    pub area: f64,
    pub arable_area: f64,
    pub technology: f64,
    pub population: f64,
}

impl WorldSnapshot {
    pub fn capture<C: Civilization>(world: &World<C>) -> Self {
        let civs = world
            .civs
            .values()
            .map(|civ| CivSnapshot {
                id: civ.id(),
                capital: civ.capital(),
                tiles: civ.tiles().size(),
                area: civ.area(world.planet()),
                arable_area: civ.arable_area(),
                technology: civ.technology(),
                population: civ.population(world.config()),
            })
            .collect();
        Self {
            year: world.year(),
            civs,
            political_map: world
                .political_map()
                .iter()
                .map(|owner| owner.map(|id| id.0))
                .collect(),
        }
    }
}

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistorySummary {
    pub final_world: WorldSnapshot,
    pub history: HistoryLog,
    pub statistics: HistoryStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistoryStats {
    pub start_year: Year,
    pub end_year: Year,
    pub steps: usize,
    pub simulation_time_ms: u64,
    pub total_events: usize,
    pub civs_founded: usize,
    pub revolts: usize,
    pub conquests: usize,
    pub cataclysms: usize,
    pub civs_at_end: usize,
}

impl HistorySummary {
    pub fn new<C: Civilization>(world: &World<C>, reports: &[StepReport], elapsed: Duration) -> Self {
        let history = world.log().clone();
        let count = |matches: fn(&EventType) -> bool| {
            history.events.iter().filter(|e| matches(&e.event_type)).count()
        };

        let statistics = HistoryStats {
            start_year: reports.first().map_or(world.year(), |r| r.year),
            end_year: world.year(),
            steps: reports.len(),
            simulation_time_ms: elapsed.as_millis() as u64,
            total_events: history.len(),
            civs_founded: count(|e| matches!(e, EventType::Founded { .. })),
            revolts: count(|e| matches!(e, EventType::Revolt { .. })),
            conquests: count(|e| matches!(e, EventType::Conquest { .. })),
            cataclysms: count(|e| matches!(e, EventType::Cataclysm { .. })),
            civs_at_end: world.civ_count(),
        };

        Self {
            final_world: world.snapshot(),
            history,
            statistics,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn summary(&self) -> String {
        format!(
            "Simulated {} to {} in {} steps ({}ms)\n{} states founded, {} revolts, {} conquests, {} cataclysms; {} civs remain",
            self.statistics.start_year,
            self.statistics.end_year,
            self.statistics.steps,
            self.statistics.simulation_time_ms,
            self.statistics.civs_founded,
            self.statistics.revolts,
            self.statistics.conquests,
            self.statistics.cataclysms,
            self.statistics.civs_at_end,
        )
    }
}
