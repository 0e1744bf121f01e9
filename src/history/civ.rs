//! Civilizations - political entities that own contiguous territory

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use crate::core::config::WorldConfig;
use crate::core::error::Result;
use crate::core::random::RandomSource;
use crate::core::types::{CivId, TileId};
use crate::history::lect::Lect;
use crate::history::tree::OwnershipTree;
use crate::planet::Planet;

/// Arable area below which a civ's running total is treated as zero
const AREA_EPSILON: f64 = 1e-8;

/// What the world needs from a civilization.
///
/// Implementations own their territory tree and border index; the world owns
/// the political map and is the only caller of [`conquer`](Civilization::conquer)
/// and [`lose`](Civilization::lose), which keeps the two in lockstep.
pub trait Civilization: Sized {
    /// Create a civ with no territory yet. `lect` is the language spoken at
    /// the capital when the civ breaks away from an existing ruler.
    fn found<R: RandomSource>(
        id: CivId,
        capital: TileId,
        technology: f64,
        lect: Option<Lect>,
        rng: &mut R,
    ) -> Self;

    fn id(&self) -> CivId;

    fn capital(&self) -> TileId;

    fn technology(&self) -> f64;

    fn set_technology(&mut self, technology: f64);

    fn tiles(&self) -> &OwnershipTree<TileId>;

    /// Owned tiles mapped to their foreign neighbors
    fn border(&self) -> &BTreeMap<TileId, BTreeSet<TileId>>;

    /// The lect spoken on an owned tile
    fn lect_at(&self, tile: TileId) -> Option<Lect>;

    /// The language of the ruling class
    fn official_lect(&self) -> Lect;

    /// Whether the people of `tile` understand their rulers
    fn is_intelligible_at(&self, tile: TileId) -> bool {
        self.lect_at(tile)
            .is_some_and(|lect| lect.is_intelligible(&self.official_lect()))
    }

    /// Age the civ by one time step
    fn update<R: RandomSource>(&mut self, config: &WorldConfig, rng: &mut R);

    /// Years this civ needs to take `to` from `from`; infinite if it cannot.
    fn estimate_invasion_time<R: RandomSource>(
        &self,
        from: TileId,
        to: TileId,
        defender: Option<&Self>,
        planet: &Planet,
        config: &WorldConfig,
        rng: &mut R,
    ) -> f64;

    /// Military strength against `opponent` at `tile`
    fn strength(&self, opponent: Option<&Self>, tile: TileId, config: &WorldConfig) -> f64;

    /// Take `tile`, attaching it under `from` (or as the seed). The tile's
    /// people speak `lect` if given, otherwise the official lect.
    fn conquer(
        &mut self,
        tile: TileId,
        from: Option<TileId>,
        lect: Option<Lect>,
        planet: &Planet,
    ) -> Result<()>;

    /// Give up `tile` and everything acquired through it. Returns the
    /// removed tiles.
    fn lose(&mut self, tile: TileId, planet: &Planet) -> Result<Vec<TileId>>;

    /// Land area, excluding ocean [km^2]
    fn area(&self, planet: &Planet) -> f64 {
        self.tiles()
            .iter()
            .map(|tile| planet.tile(tile))
            .filter(|tile| tile.is_land())
            .map(|tile| tile.area)
            .sum()
    }

    fn arable_area(&self) -> f64;

    fn population(&self, config: &WorldConfig) -> f64 {
        (config.carrying_capacity * self.arable_area() * self.technology()).round()
    }

    fn is_dead(&self) -> bool {
        self.arable_area() <= 0.0
    }
}

/// The standard civilization
#[derive(Clone, Debug)]
pub struct Civ {
    id: CivId,
    capital: TileId,
    /// Base military strength
    militarism: f64,
    /// Technological military modifier
    technology: f64,
    arable_area: f64,
    official: Lect,
    tiles: OwnershipTree<TileId>,
    border: BTreeMap<TileId, BTreeSet<TileId>>,
    dialects: AHashMap<TileId, Lect>,
}

impl Civ {
    pub fn militarism(&self) -> f64 {
        self.militarism
    }
}

impl Civilization for Civ {
    fn found<R: RandomSource>(
        id: CivId,
        capital: TileId,
        technology: f64,
        lect: Option<Lect>,
        rng: &mut R,
    ) -> Self {
        let official = match lect {
            Some(spoken) => spoken.branch(id.0 as u64 + 1),
            None => Lect::proto(id.0 as u64),
        };
        Self {
            id,
            capital,
            militarism: rng.erlang(4, 1.0),
            technology,
            arable_area: 0.0,
            official,
            tiles: OwnershipTree::new(),
            border: BTreeMap::new(),
            dialects: AHashMap::new(),
        }
    }

    fn id(&self) -> CivId {
        self.id
    }

    fn capital(&self) -> TileId {
        self.capital
    }

    fn technology(&self) -> f64 {
        self.technology
    }

    fn set_technology(&mut self, technology: f64) {
        self.technology = technology;
    }

    fn tiles(&self) -> &OwnershipTree<TileId> {
        &self.tiles
    }

    fn border(&self) -> &BTreeMap<TileId, BTreeSet<TileId>> {
        &self.border
    }

    fn lect_at(&self, tile: TileId) -> Option<Lect> {
        self.dialects.get(&tile).copied()
    }

    fn official_lect(&self) -> Lect {
        self.official
    }

    fn update<R: RandomSource>(&mut self, config: &WorldConfig, rng: &mut R) {
        if self.tiles.is_empty() {
            return;
        }
        let assimilation = config.time_step / config.cultural_memory;
        let official = self.official;
        for tile in self.tiles.iter() {
            let Some(lect) = self.dialects.get_mut(&tile) else {
                continue;
            };
            if *lect != official && (lect.is_intelligible(&official) || rng.probability(assimilation)) {
                *lect = official;
            }
            *lect = lect.descend();
        }
        self.official = official.descend();

        self.militarism *= (-config.time_step / config.social_decay_period).exp();
        let inventions = rng.poisson(config.intelligence * config.time_step * self.population(config));
        self.technology += config.value_of_knowledge * inventions as f64;
    }

    fn estimate_invasion_time<R: RandomSource>(
        &self,
        from: TileId,
        to: TileId,
        defender: Option<&Self>,
        planet: &Planet,
        config: &WorldConfig,
        rng: &mut R,
    ) -> f64 {
        let Some(edge) = planet.tile(from).edge_to(to) else {
            return f64::INFINITY;
        };
        let momentum = self.strength(defender, to, config);
        let resistance = defender.map_or(0.0, |d| d.strength(Some(d), to, config));
        if momentum <= resistance {
            return f64::INFINITY;
        }
        let target = planet.tile(to);
        let climb = config.slope_factor * (planet.tile(from).height - target.height);
        let effective_distance = edge.distance.hypot(climb) / target.passability;
        rng.exponential(effective_distance / config.imperialism / (momentum - resistance))
    }

    fn strength(&self, opponent: Option<&Self>, tile: TileId, config: &WorldConfig) -> f64 {
        let spoken = self
            .lect_at(tile)
            .or_else(|| opponent.and_then(|o| o.lect_at(tile)));
        let kinship = match (opponent, spoken) {
            (Some(_), Some(lect)) if lect.is_intelligible(&self.official) => config.nationalism,
            _ => 1.0,
        };
        self.militarism * self.technology * kinship
    }

    fn conquer(
        &mut self,
        tile: TileId,
        from: Option<TileId>,
        lect: Option<Lect>,
        planet: &Planet,
    ) -> Result<()> {
        self.tiles.add(tile, from)?;
        self.dialects.insert(tile, lect.unwrap_or(self.official));
        self.arable_area += planet.tile(tile).arable_area;

        for neighbor in planet.tile(tile).neighbor_ids() {
            if self.tiles.has(neighbor) {
                if let Some(foreign) = self.border.get_mut(&neighbor) {
                    foreign.remove(&tile);
                    if foreign.is_empty() {
                        self.border.remove(&neighbor);
                    }
                }
            } else {
                self.border.entry(tile).or_default().insert(neighbor);
            }
        }
        Ok(())
    }

    fn lose(&mut self, tile: TileId, planet: &Planet) -> Result<Vec<TileId>> {
        let removed = self.tiles.delete(tile)?;
        for &lost in &removed {
            self.dialects.remove(&lost);
            self.border.remove(&lost);
            self.arable_area -= planet.tile(lost).arable_area;
        }
        for &lost in &removed {
            for neighbor in planet.tile(lost).neighbor_ids() {
                if self.tiles.has(neighbor) {
                    self.border.entry(neighbor).or_default().insert(lost);
                }
            }
        }
        if self.tiles.is_empty() || self.arable_area < AREA_EPSILON {
            self.arable_area = 0.0;
        }
        Ok(removed)
    }

    fn arable_area(&self) -> f64 {
        self.arable_area
    }
}
