//! World - the history simulation's state container and step loop

use std::collections::{BTreeMap, VecDeque};

use tracing::{debug, info};

use crate::core::config::WorldConfig;
use crate::core::error::{HistoryError, Result};
use crate::core::random::RandomSource;
use crate::core::types::{CivId, TileId, Year};
use crate::history::civ::{Civ, Civilization};
use crate::history::events::{EventType, HistoryLog};
use crate::history::lect::Lect;
use crate::history::output::{StepReport, WorldSnapshot};
use crate::history::systems::{self, CataclysmOutcome, ConquestOutcome, SpawnOutcome};
use crate::history::tree::TreeError;
use crate::planet::Planet;

/// A civ's claim on a tile, made from one of its own tiles or as a new seed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Claim {
    pub civ: CivId,
    pub from: Option<TileId>,
}

/// What a call to [`World::transfer_tile`] changed
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transfer {
    /// Previous ruler of the tile, if any
    pub loser: Option<CivId>,
    /// Every tile the loser gave up
    pub lost: Vec<TileId>,
    /// Every tile the claimant gained, parents before children
    pub captured: Vec<TileId>,
}

/// The civilizations of one planet and who owns what
pub struct World<C: Civilization = Civ> {
    planet: Planet,
    config: WorldConfig,
    pub(crate) civs: BTreeMap<CivId, C>,
    /// Authoritative owner of each tile, indexed by tile id
    political_map: Vec<Option<CivId>>,
    next_civ_id: u32,
    year: Year,
    pub(crate) log: HistoryLog,
}

impl<C: Civilization> World<C> {
    pub fn new(planet: Planet, config: WorldConfig) -> Result<Self> {
        config.validate()?;
        let political_map = vec![None; planet.len()];
        Ok(Self {
            year: config.start_year,
            planet,
            config,
            civs: BTreeMap::new(),
            political_map,
            next_civ_id: 0,
            log: HistoryLog::new(),
        })
    }

    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn year(&self) -> Year {
        self.year
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    /// Generate a new unique CivId
    pub fn next_civ_id(&mut self) -> CivId {
        let id = CivId(self.next_civ_id);
        self.next_civ_id += 1;
        id
    }

    /// Current owner of a tile
    pub fn ruler(&self, tile: TileId) -> Option<CivId> {
        self.political_map.get(tile.index()).copied().flatten()
    }

    pub fn political_map(&self) -> &[Option<CivId>] {
        &self.political_map
    }

    pub fn civ(&self, id: CivId) -> Result<&C> {
        self.civs.get(&id).ok_or(HistoryError::CivNotFound(id))
    }

    pub fn civ_count(&self) -> usize {
        self.civs.len()
    }

    /// Live civilizations.
    ///
    /// When `sorted`, the list runs from largest to smallest land area. Civs
    /// with fewer than `min_size` tiles are left out, except that the first
    /// `min_number` of a sorted list are always kept.
    pub fn civs(&self, sorted: bool, min_size: usize, min_number: usize) -> Result<Vec<&C>> {
        if min_number > 0 && !sorted {
            return Err(HistoryError::UnsortedMinimum);
        }
        if min_number > self.civs.len() {
            return Err(HistoryError::NotEnoughCivs {
                requested: min_number,
                available: self.civs.len(),
            });
        }

        let mut output: Vec<&C> = self.civs.values().collect();
        if sorted {
            let mut keyed: Vec<(f64, &C)> = output
                .into_iter()
                .map(|civ| (civ.area(&self.planet), civ))
                .collect();
            keyed.sort_by(|(area_a, a), (area_b, b)| area_b.total_cmp(area_a).then(a.id().cmp(&b.id())));
            output = keyed.into_iter().map(|(_, civ)| civ).collect();
        }
        Ok(output
            .into_iter()
            .enumerate()
            .filter(|(rank, civ)| *rank < min_number || civ.tiles().size() >= min_size)
            .map(|(_, civ)| civ)
            .collect())
    }

    /// Create civ `id` and give it `capital` as its seed tile, taking the
    /// tile (and what hangs off it) from any current ruler.
    pub fn found_civ<R: RandomSource>(
        &mut self,
        id: CivId,
        capital: TileId,
        technology: f64,
        lect: Option<Lect>,
        rng: &mut R,
    ) -> Result<Transfer> {
        if self.civs.contains_key(&id) {
            return Err(HistoryError::Inconsistent(format!("{id} already exists")));
        }
        self.civs.insert(id, C::found(id, capital, technology, lect, rng));
        let transfer = self.transfer_tile(capital, Some(Claim { civ: id, from: None }));
        if transfer.is_err() {
            self.civs.remove(&id);
        }
        transfer
    }

    /// Move `tile` to the claimant, or release it when `claim` is `None`.
    ///
    /// This is the only place ownership changes. The previous ruler loses
    /// the tile's whole subtree; a claimant also takes every descendant
    /// reachable through arable tiles, keeping their lects and tree shape.
    /// Descendants it does not take become unowned.
    pub fn transfer_tile(&mut self, tile: TileId, claim: Option<Claim>) -> Result<Transfer> {
        if self.planet.get(tile).is_none() {
            return Err(HistoryError::InvalidPlanet(format!("{tile} does not exist")));
        }
        if let Some(claim) = claim {
            let claimant = self.civ(claim.civ)?;
            if claimant.tiles().has(tile) {
                return Err(HistoryError::Inconsistent(format!("{} already owns {tile}", claim.civ)));
            }
            match claim.from {
                Some(from) if !claimant.tiles().has(from) => return Err(TreeError::MissingParent.into()),
                None if !claimant.tiles().is_empty() => return Err(TreeError::SeedOccupied.into()),
                _ => {}
            }
        }

        let loser = self.ruler(tile);
        let mut captured: Vec<(TileId, Option<TileId>, Option<Lect>)> = Vec::new();
        let mut lost = Vec::new();

        if let Some(loser_id) = loser {
            let owner = self.civ(loser_id)?;
            if let Some(claim) = claim {
                captured.push((tile, claim.from, owner.lect_at(tile)));
                let mut queue = VecDeque::from([tile]);
                while let Some(parent) = queue.pop_front() {
                    for child in owner.tiles().get_children(parent)? {
                        if self.planet.tile(child).arable_area > 0.0 {
                            captured.push((child, Some(parent), owner.lect_at(child)));
                            queue.push_back(child);
                        }
                    }
                }
            }
            let owner = self
                .civs
                .get_mut(&loser_id)
                .ok_or(HistoryError::CivNotFound(loser_id))?;
            lost = owner.lose(tile, &self.planet)?;
            for &released in &lost {
                self.political_map[released.index()] = None;
            }
        } else if let Some(claim) = claim {
            captured.push((tile, claim.from, None));
        }

        if let Some(claim) = claim {
            let claimant = self
                .civs
                .get_mut(&claim.civ)
                .ok_or(HistoryError::CivNotFound(claim.civ))?;
            for &(gained, parent, lect) in &captured {
                claimant.conquer(gained, parent, lect, &self.planet)?;
                self.political_map[gained.index()] = Some(claim.civ);
            }
        }

        Ok(Transfer {
            loser,
            lost,
            captured: captured.into_iter().map(|(gained, _, _)| gained).collect(),
        })
    }

    /// Remove every civ without arable land, releasing whatever barren
    /// tiles it still holds. Returns the removed ids.
    pub fn prune_dead(&mut self) -> Result<Vec<CivId>> {
        let dead: Vec<CivId> = self
            .civs
            .values()
            .filter(|civ| civ.is_dead())
            .map(|civ| civ.id())
            .collect();
        for &id in &dead {
            if let Some(seed) = self.civ(id)?.tiles().seed() {
                self.transfer_tile(seed, None)?;
            }
            self.civs.remove(&id);
            self.log.add_event(EventType::Collapse { civ: id }, self.year, vec![id], None);
        }
        Ok(dead)
    }

    /// Check that the political map is exactly the union of all ownership
    /// trees.
    pub fn verify_political_map(&self) -> Result<()> {
        let mut owned = 0;
        for civ in self.civs.values() {
            for tile in civ.tiles() {
                if self.ruler(tile) != Some(civ.id()) {
                    return Err(HistoryError::Inconsistent(format!(
                        "{} holds {tile} but the map says {:?}",
                        civ.id(),
                        self.ruler(tile)
                    )));
                }
                owned += 1;
            }
        }
        let mapped = self.political_map.iter().filter(|owner| owner.is_some()).count();
        if mapped != owned {
            return Err(HistoryError::Inconsistent(format!(
                "{mapped} tiles are mapped but the civs hold {owned}"
            )));
        }
        Ok(())
    }

    /// Age every civ that still holds territory
    pub fn update_civs<R: RandomSource>(&mut self, rng: &mut R) {
        for civ in self.civs.values_mut() {
            if !civ.tiles().is_empty() {
                civ.update(&self.config, rng);
            }
        }
    }

    pub fn spawn_civs<R: RandomSource>(&mut self, rng: &mut R) -> Result<SpawnOutcome> {
        systems::spawn_civs(self, rng)
    }

    pub fn spread_civs<R: RandomSource>(&mut self, rng: &mut R) -> Result<ConquestOutcome> {
        systems::spread_civs(self, rng)
    }

    pub fn spread_ideas<R: RandomSource>(&mut self, rng: &mut R) -> usize {
        systems::spread_ideas(self, rng)
    }

    pub fn have_cataclysm<R: RandomSource>(&mut self, rng: &mut R) -> Result<CataclysmOutcome> {
        systems::have_cataclysm(self, rng)
    }

    /// Advance the world by one time step
    pub fn step<R: RandomSource>(&mut self, rng: &mut R) -> Result<StepReport> {
        let year = self.year;

        self.update_civs(rng);
        let spawned = self.spawn_civs(rng)?;
        let conquered = self.spread_civs(rng)?;
        let learned = self.spread_ideas(rng);
        let cataclysm = if systems::cataclysm_due(year, self.config.time_step, self.config.cataclysm_rate) {
            Some(self.have_cataclysm(rng)?)
        } else {
            None
        };

        self.year += self.config.time_step;

        let report = StepReport {
            year,
            founded: spawned.founded,
            revolts: spawned.revolts,
            conquests: conquered.conquests,
            discarded_invasions: conquered.discarded,
            civs_learned: learned,
            collapsed: spawned.collapsed
                + conquered.collapsed
                + cataclysm.as_ref().map_or(0, |c| c.collapsed),
            cataclysm: cataclysm.is_some(),
            live_civs: self.civs.len(),
        };
        debug!(
            year,
            civs = report.live_civs,
            conquests = report.conquests,
            "step complete"
        );
        Ok(report)
    }

    /// Run steps until the year reaches `end_year`
    pub fn generate_history<R: RandomSource>(&mut self, end_year: Year, rng: &mut R) -> Result<Vec<StepReport>> {
        let mut reports = Vec::new();
        while self.year < end_year {
            reports.push(self.step(rng)?);
        }
        info!(
            year = self.year,
            civs = self.civs.len(),
            events = self.log.len(),
            "history generated"
        );
        Ok(reports)
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(self)
    }
}
