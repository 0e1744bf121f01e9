//! Grid planet generation
//!
//! Produces a rectangular, non-wrapping tessellation with value-noise terrain.
//! Good enough to drive the history simulation; not a climate model.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::random::RandomSource;
use crate::core::types::TileId;
use crate::planet::tile::{Biome, Edge, Tile};
use crate::planet::Planet;

/// Configuration for grid planet generation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub width: u32,
    pub height: u32,
    /// Edge length of one tile [km]
    pub tile_size: f64,
    /// Fraction of the height range below which tiles are ocean
    pub sea_level: f64,
    /// Tiles per noise lattice cell; larger gives bigger continents
    pub feature_size: u32,
    /// Elevation of the highest point [km]
    pub max_elevation: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            width: 48,
            height: 32,
            tile_size: 100.0,
            sea_level: 0.45,
            feature_size: 6,
            max_elevation: 4.0,
        }
    }
}

/// Generate a grid planet. Neighbors are the four orthogonal tiles.
pub fn generate_grid<R: RandomSource>(config: &PlanetConfig, rng: &mut R) -> Result<Planet> {
    let width = config.width.max(1);
    let height = config.height.max(1);

    let elevation = ValueNoise::new(width, height, config.feature_size, rng);
    let moisture = ValueNoise::new(width, height, config.feature_size, rng);

    let mut biomes = Vec::with_capacity((width * height) as usize);
    let mut heights = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let h = elevation.sample(x, y);
            let latitude = if height > 1 {
                (y as f64 / (height - 1) as f64 * 2.0 - 1.0).abs()
            } else {
                0.0
            };
            biomes.push(classify(h, moisture.sample(x, y), latitude, config.sea_level));
            heights.push(((h - config.sea_level).max(0.0) / (1.0 - config.sea_level).max(1e-9)) * config.max_elevation);
        }
    }

    let mut tiles = Vec::with_capacity(biomes.len());
    for y in 0..height {
        for x in 0..width {
            let index = (y * width + x) as usize;
            let neighbors: Vec<Edge> = grid_neighbors(x, y, width, height)
                .into_iter()
                .map(|tile| Edge {
                    tile,
                    distance: config.tile_size,
                })
                .collect();
            let water_neighbors = neighbors
                .iter()
                .filter(|edge| biomes[edge.tile.index()].is_water())
                .count();
            tiles.push(Tile::from_biome(
                TileId(index as u32),
                biomes[index],
                config.tile_size * config.tile_size,
                heights[index],
                water_neighbors,
                neighbors,
            ));
        }
    }

    Planet::new(tiles)
}

fn grid_neighbors(x: u32, y: u32, width: u32, height: u32) -> Vec<TileId> {
    let mut neighbors = Vec::with_capacity(4);
    if x > 0 {
        neighbors.push(TileId(y * width + x - 1));
    }
    if x + 1 < width {
        neighbors.push(TileId(y * width + x + 1));
    }
    if y > 0 {
        neighbors.push(TileId((y - 1) * width + x));
    }
    if y + 1 < height {
        neighbors.push(TileId((y + 1) * width + x));
    }
    neighbors
}

fn classify(elevation: f64, moisture: f64, latitude: f64, sea_level: f64) -> Biome {
    if elevation < sea_level {
        return if latitude > 0.9 { Biome::Ice } else { Biome::Ocean };
    }
    let temperature = 1.0 - latitude - 0.5 * (elevation - sea_level);
    if temperature < 0.1 {
        Biome::Ice
    } else if temperature < 0.25 {
        Biome::Tundra
    } else if temperature < 0.4 {
        Biome::Taiga
    } else if moisture < 0.25 {
        Biome::Desert
    } else if moisture < 0.4 {
        Biome::Steppe
    } else if moisture > 0.8 && elevation < sea_level + 0.05 {
        if moisture > 0.7 && temperature > 0.8 {
            Biome::Lake
        } else {
            Biome::Swamp
        }
    } else if temperature > 0.8 {
        if moisture > 0.7 {
            Biome::Rainforest
        } else {
            Biome::Jungle
        }
    } else {
        Biome::Grassland
    }
}

/// Bilinearly interpolated lattice of uniform draws
struct ValueNoise {
    lattice: Vec<f64>,
    lattice_width: u32,
    cell: u32,
}

impl ValueNoise {
    fn new<R: RandomSource>(width: u32, height: u32, cell: u32, rng: &mut R) -> Self {
        let cell = cell.max(1);
        let lattice_width = width / cell + 2;
        let lattice_height = height / cell + 2;
        let lattice = (0..lattice_width * lattice_height)
            .map(|_| rng.next_f64())
            .collect();
        Self {
            lattice,
            lattice_width,
            cell,
        }
    }

    fn sample(&self, x: u32, y: u32) -> f64 {
        let (cx, cy) = (x / self.cell, y / self.cell);
        let fx = (x % self.cell) as f64 / self.cell as f64;
        let fy = (y % self.cell) as f64 / self.cell as f64;
        let at = |i: u32, j: u32| self.lattice[(j * self.lattice_width + i) as usize];
        let top = at(cx, cy) * (1.0 - fx) + at(cx + 1, cy) * fx;
        let bottom = at(cx, cy + 1) * (1.0 - fx) + at(cx + 1, cy + 1) * fx;
        top * (1.0 - fy) + bottom * fy
    }
}
