use thiserror::Error;

use crate::core::types::CivId;
use crate::history::tree::TreeError;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Ownership tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("There is no civ with id {0}")]
    CivNotFound(CivId),

    #[error("A minimum civ count can only be requested from a sorted list")]
    UnsortedMinimum,

    #[error("Requested at least {requested} civs but only {available} exist")]
    NotEnoughCivs { requested: usize, available: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid planet: {0}")]
    InvalidPlanet(String),

    #[error("Political map is inconsistent: {0}")]
    Inconsistent(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
