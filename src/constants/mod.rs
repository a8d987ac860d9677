//! Game constants organized by domain.
//!
//! Tuning values live here so gameplay code reads as rules, not numbers.

mod abilities;
mod combat;
mod effects;
mod enemies;
mod gameplay;
mod items;
mod screen;
mod world;

pub use abilities::*;
pub use combat::*;
pub use effects::*;
pub use enemies::*;
pub use gameplay::*;
pub use items::*;
pub use screen::*;
pub use world::*;
