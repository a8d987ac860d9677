//! Simulation core of a top-down action RPG on an endless grid of
//! screen-sized blocks.
//!
//! The host supplies decoded input, a [`render::Canvas`] to blit into and a
//! frame cadence; [`engine::GameEngine`] does the rest.

pub mod assets;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dialogue;
pub mod enemy;
pub mod engine;
pub mod entity;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hud;
pub mod input;
pub mod particles;
pub mod player;
pub mod render;
pub mod save;
pub mod world;
