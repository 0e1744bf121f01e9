//! Simulation configuration with documented constants
//!
//! All rates of the history simulation are collected here. Units are given in
//! brackets; "km^2" always refers to arable area unless stated otherwise.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{HistoryError, Result};
use crate::core::types::Year;

/// Configuration for the history simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === TIME ===
    /// The year at which civilization starts [year]
    pub start_year: Year,

    /// Length of one simulation step, Δt [year]
    ///
    /// Invasions that cannot finish within one step are not scheduled; they
    /// are re-estimated from scratch on the next step.
    pub time_step: f64,

    // === SPAWNING ===
    /// Rate at which people coalesce into kingdoms [1/year/km^2]
    pub authoritarianism: f64,

    /// Rate at which people start revolutions [1/year/km^2]
    pub libertarianism: f64,

    /// Factor by which linguistically alien subjects are more likely to rebel []
    ///
    /// Also the strength bonus of a defender fighting among people who speak
    /// the attacker's language.
    pub nationalism: f64,

    // === CONQUEST ===
    /// Rate at which denizens conquer with entry-level technology [km/year]
    pub imperialism: f64,

    /// Multiplier on vertical distances when estimating invasion time []
    pub slope_factor: f64,

    /// Time it takes for an empire's might to decay by a factor of e [year]
    pub social_decay_period: f64,

    // === POPULATION AND TECHNOLOGY ===
    /// Density of people that one km^2 of arable land supports with
    /// entry-level technology [1/km^2]
    pub carrying_capacity: f64,

    /// Rate at which a person has good ideas [1/year]
    pub intelligence: f64,

    /// Value of a single technological advancement []
    pub value_of_knowledge: f64,

    /// Rate at which an idea spreads across a border [1/year]
    pub power_of_memes: f64,

    /// Technology level of a wholly new civilization []
    pub initial_technology: f64,

    /// Time it takes to erase a people's language [year]
    pub cultural_memory: f64,

    // === CATACLYSMS ===
    /// Expected number of cataclysms per year [1/year]
    pub cataclysm_rate: f64,

    /// Fraction of provinces and technologies a civ keeps through a cataclysm []
    pub apocalypse_survival_rate: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            start_year: -3000.0,
            time_step: 100.0,

            authoritarianism: 1e-7,
            libertarianism: 2e-7,
            nationalism: 3.0,

            imperialism: 1e-1,
            slope_factor: 100.0,
            social_decay_period: 1000.0,

            carrying_capacity: 0.05,
            intelligence: 1e-7,
            value_of_knowledge: 0.5,
            power_of_memes: 0.02,
            initial_technology: 1.0,
            cultural_memory: 160.0,

            cataclysm_rate: 2e-3,
            apocalypse_survival_rate: 0.5,
        }
    }
}

impl WorldConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a config from a TOML string and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WorldConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.time_step > 0.0) || !self.time_step.is_finite() {
            return Err(HistoryError::InvalidConfig(format!(
                "time_step ({}) must be positive and finite",
                self.time_step
            )));
        }

        let rates = [
            ("authoritarianism", self.authoritarianism),
            ("libertarianism", self.libertarianism),
            ("imperialism", self.imperialism),
            ("slope_factor", self.slope_factor),
            ("carrying_capacity", self.carrying_capacity),
            ("intelligence", self.intelligence),
            ("power_of_memes", self.power_of_memes),
            ("cataclysm_rate", self.cataclysm_rate),
            ("initial_technology", self.initial_technology),
        ];
        for (name, value) in rates {
            if !(value >= 0.0) {
                return Err(HistoryError::InvalidConfig(format!(
                    "{name} ({value}) must be non-negative"
                )));
            }
        }

        let periods = [
            ("social_decay_period", self.social_decay_period),
            ("cultural_memory", self.cultural_memory),
            ("value_of_knowledge", self.value_of_knowledge),
        ];
        for (name, value) in periods {
            if !(value > 0.0) {
                return Err(HistoryError::InvalidConfig(format!(
                    "{name} ({value}) must be positive"
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.apocalypse_survival_rate) {
            return Err(HistoryError::InvalidConfig(format!(
                "apocalypse_survival_rate ({}) must be within [0, 1]",
                self.apocalypse_survival_rate
            )));
        }

        if !(self.nationalism >= 1.0) {
            return Err(HistoryError::InvalidConfig(format!(
                "nationalism ({}) must be at least 1",
                self.nationalism
            )));
        }

        Ok(())
    }
}
