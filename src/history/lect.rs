//! Lects - the languages spoken across a civilization's territory
//!
//! The simulation never generates words; it only needs to know whether two
//! populations can understand each other. A lect is therefore just its place
//! in a family tree of dialects.

use serde::{Deserialize, Serialize};

/// Generations after a split during which two dialects remain intelligible
pub const MUTUAL_INTELLIGIBILITY_GENERATIONS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lect {
    /// Root language this lect descends from
    pub family: u64,
    /// Which dialect of the family this is
    pub branch: u64,
    /// Generations since the proto-language
    pub generation: u32,
    /// Generation at which this branch split off
    pub branched_at: u32,
}

impl Lect {
    /// A fresh language with no relatives
    pub fn proto(family: u64) -> Self {
        Self {
            family,
            branch: 0,
            generation: 0,
            branched_at: 0,
        }
    }

    /// The same lect one generation later
    pub fn descend(&self) -> Self {
        Self {
            generation: self.generation + 1,
            ..*self
        }
    }

    /// Split off a new dialect
    pub fn branch(&self, new_branch: u64) -> Self {
        Self {
            branch: new_branch,
            branched_at: self.generation,
            ..*self
        }
    }

    pub fn is_intelligible(&self, other: &Lect) -> bool {
        if self.family != other.family {
            return false;
        }
        if self.branch == other.branch {
            return true;
        }
        let split = self.branched_at.max(other.branched_at);
        let elapsed = self.generation.max(other.generation).saturating_sub(split);
        elapsed < MUTUAL_INTELLIGIBILITY_GENERATIONS
    }
}
