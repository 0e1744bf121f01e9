//! Planet - the immutable tile graph the history plays out on

pub mod generation;
pub mod tile;

pub use generation::{generate_grid, PlanetConfig};
pub use tile::{Biome, Edge, Tile};

use crate::core::error::{HistoryError, Result};
use crate::core::random::RandomSource;
use crate::core::types::TileId;

/// A validated set of tiles with symmetric adjacency
#[derive(Clone, Debug)]
pub struct Planet {
    tiles: Vec<Tile>,
}

impl Planet {
    /// Wrap a list of tiles, checking that ids are dense, that every neighbor
    /// exists and links back, and that areas are sane.
    pub fn new(tiles: Vec<Tile>) -> Result<Self> {
        for (index, tile) in tiles.iter().enumerate() {
            if tile.id.index() != index {
                return Err(HistoryError::InvalidPlanet(format!(
                    "{} is stored at position {index}",
                    tile.id
                )));
            }
            if !(tile.area >= 0.0) || !(tile.arable_area >= 0.0) || !(tile.passability > 0.0) {
                return Err(HistoryError::InvalidPlanet(format!(
                    "{} has a negative area or non-positive passability",
                    tile.id
                )));
            }
            for edge in &tile.neighbors {
                let Some(other) = tiles.get(edge.tile.index()) else {
                    return Err(HistoryError::InvalidPlanet(format!(
                        "{} links to missing {}",
                        tile.id, edge.tile
                    )));
                };
                if edge.tile == tile.id {
                    return Err(HistoryError::InvalidPlanet(format!("{} links to itself", tile.id)));
                }
                if other.edge_to(tile.id).is_none() {
                    return Err(HistoryError::InvalidPlanet(format!(
                        "{} links to {} but not the other way around",
                        tile.id, edge.tile
                    )));
                }
            }
        }
        Ok(Self { tiles })
    }

    /// Generate a rectangular grid planet
    pub fn grid<R: RandomSource>(config: &PlanetConfig, rng: &mut R) -> Result<Self> {
        generate_grid(config, rng)
    }

    /// Look up a tile. Ids handed out by this planet are always valid.
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.index()]
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|tile| tile.id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn distance(&self, from: TileId, to: TileId) -> Option<f64> {
        self.get(from)?.edge_to(to).map(|edge| edge.distance)
    }
}
