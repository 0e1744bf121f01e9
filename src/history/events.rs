//! Events and history logging

use serde::{Deserialize, Serialize};

use crate::core::types::{CivId, TileId, Year};

/// A historical event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    pub id: u32,
    pub year: Year,
    pub event_type: EventType,
    pub participants: Vec<CivId>,
    pub location: Option<TileId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    /// A state formed in unclaimed land
    Founded { civ: CivId },
    /// A province broke away from its ruler
    Revolt { rebel: CivId, ruler: CivId },
    /// A tile changed hands by force; `captured` counts the whole subtree
    Conquest { invader: CivId, loser: Option<CivId>, captured: usize },
    /// A civ lost the last of its arable land
    Collapse { civ: CivId },
    Cataclysm { tiles_lost: usize },
}

/// The complete history log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryLog {
    pub events: Vec<Event>,
    next_event_id: u32,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(
        &mut self,
        event_type: EventType,
        year: Year,
        participants: Vec<CivId>,
        location: Option<TileId>,
    ) -> u32 {
        let id = self.next_event_id;
        self.next_event_id += 1;

        self.events.push(Event {
            id,
            year,
            event_type,
            participants,
            location,
        });

        id
    }

    pub fn events_for_year(&self, year: Year) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.year == year)
    }

    pub fn events_for_civ(&self, civ: CivId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.participants.contains(&civ))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
