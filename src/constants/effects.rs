//! Particle and projectile constants.

/// Blood gravity (px/frame²)
pub const BLOOD_GRAVITY: f32 = 0.15;
/// Blood velocity damping per frame
pub const BLOOD_FRICTION: f32 = 0.92;
/// Blood initial speed range
pub const BLOOD_SPEED_MIN: f32 = 0.5;
pub const BLOOD_SPEED_MAX: f32 = 3.0;
/// Blood life range in frames
pub const BLOOD_LIFE_MIN: u32 = 15;
pub const BLOOD_LIFE_MAX: u32 = 30;

/// Upward acceleration of smoke-like particles (px/frame²)
pub const SMOKE_RISE: f32 = -0.05;
/// Velocity damping of smoke-like particles
pub const SMOKE_FRICTION: f32 = 0.95;

/// Firebolt spawn offset beyond the player's facing edge
pub const PROJECTILE_SPAWN_OFFSET: f32 = 4.0;
/// Trail particles spawned per frame by a firebolt
pub const FIREBOLT_TRAIL_PER_FRAME: usize = 2;
/// Most secondary explosions a firebolt can trigger
pub const FIREBOLT_MAX_SECONDARY: u32 = 8;
