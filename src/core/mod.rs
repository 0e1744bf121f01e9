pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::WorldConfig;
pub use error::{HistoryError, Result};
pub use random::{Random, RandomSource};
pub use types::{CivId, TileId, Year};
