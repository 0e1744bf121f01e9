//! Tile - one indivisible cell of the planet's surface

use serde::{Deserialize, Serialize};

use crate::core::types::TileId;

/// Arability bonus for each ocean or lake neighbor of a habitable tile
const WATER_ACCESS_UTILITY: f64 = 1.0;

/// A cell of the planet tessellation. Immutable once the planet exists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub biome: Biome,
    /// Surface area [km^2]
    pub area: f64,
    /// Area weighted by habitability [km^2]
    pub arable_area: f64,
    /// Multiplier on invasion speed into this tile
    pub passability: f64,
    /// Elevation [km]
    pub height: f64,
    pub neighbors: Vec<Edge>,
}

/// Adjacency from one tile to another
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub tile: TileId,
    /// Distance between the tile centers [km]
    pub distance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Lake,
    Ice,
    Tundra,
    Taiga,
    Steppe,
    Grassland,
    Desert,
    Swamp,
    Rainforest,
    Jungle,
}

impl Biome {
    /// How many people this biome feeds per km^2, relative to grassland
    pub fn arability(self) -> f64 {
        match self {
            Biome::Ocean => 0.0,
            Biome::Swamp => 0.1,
            Biome::Rainforest => 0.3,
            Biome::Jungle => 3.0,
            Biome::Lake => 0.0,
            Biome::Taiga => 0.3,
            Biome::Steppe => 0.1,
            Biome::Grassland => 1.0,
            Biome::Desert => 0.1,
            Biome::Tundra => 0.1,
            Biome::Ice => 0.0,
        }
    }

    /// How quickly armies cross this biome
    pub fn passability(self) -> f64 {
        match self {
            Biome::Ocean => 0.1,
            Biome::Swamp => 0.1,
            Biome::Rainforest => 0.1,
            Biome::Jungle => 1.0,
            Biome::Lake => 3.0,
            Biome::Taiga => 1.0,
            Biome::Steppe => 0.3,
            Biome::Grassland => 3.0,
            Biome::Desert => 0.1,
            Biome::Tundra => 0.3,
            Biome::Ice => 0.1,
        }
    }

    pub fn is_water(self) -> bool {
        matches!(self, Biome::Ocean | Biome::Lake)
    }
}

impl Tile {
    /// Build a tile whose arable area and passability follow from its biome.
    ///
    /// `water_neighbors` is the number of adjacent ocean or lake tiles; each
    /// one makes a habitable tile more productive.
    pub fn from_biome(
        id: TileId,
        biome: Biome,
        area: f64,
        height: f64,
        water_neighbors: usize,
        neighbors: Vec<Edge>,
    ) -> Self {
        let mut arability = biome.arability();
        if arability > 0.0 {
            arability += WATER_ACCESS_UTILITY * water_neighbors as f64;
        }
        Self {
            id,
            biome,
            area,
            arable_area: arability * area,
            passability: biome.passability(),
            height,
            neighbors,
        }
    }

    pub fn neighbor_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.neighbors.iter().map(|edge| edge.tile)
    }

    pub fn edge_to(&self, other: TileId) -> Option<&Edge> {
        self.neighbors.iter().find(|edge| edge.tile == other)
    }

    pub fn is_land(&self) -> bool {
        self.biome != Biome::Ocean
    }
}
