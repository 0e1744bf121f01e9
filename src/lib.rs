//! Civ History - procedural history of civilizations on a tiled planet

pub mod core;
pub mod history;
pub mod planet;
pub mod testing;
