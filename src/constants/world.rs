//! World generation constants.

/// Side of the safe square around the player's entry point
pub const SAFE_AREA_SIZE: f32 = 200.0;
/// Bonfire offset from the origin spawn point (northeast)
pub const BONFIRE_SPAWN_OFFSET: (f32, f32) = (80.0, -80.0);
/// Health potion offset from the origin spawn point (southwest)
pub const POTION_SPAWN_OFFSET: (f32, f32) = (-80.0, 80.0);
/// Minimum gap between placed entities
pub const PLACEMENT_SEPARATION: f32 = 12.0;
/// Placement attempts for a single decoration or special item
pub const PLACEMENT_ATTEMPTS: usize = 50;
/// Total enemy placement attempts per block
pub const ENEMY_PLACEMENT_ATTEMPTS: usize = 100;
/// Share of the difficulty budget a single enemy may consume
pub const ENEMY_LEVEL_BUDGET_SHARE: f32 = 0.25;

/// Grass count range before noise modulation
pub const GRASS_COUNT_MIN: usize = 4;
pub const GRASS_COUNT_MAX: usize = 10;
/// Extra grass at the densest noise value
pub const GRASS_NOISE_BONUS: f64 = 6.0;
/// Block-coordinate scale for the meadow noise
pub const GRASS_NOISE_SCALE: f64 = 0.37;
/// Rock count range
pub const ROCK_COUNT_MIN: usize = 2;
pub const ROCK_COUNT_MAX: usize = 6;
/// Sprite variants picked from at generation time
pub const GRASS_VARIANTS: u8 = 4;
pub const ROCK_VARIANTS: u8 = 3;

/// Grass tile size
pub const GRASS_SIZE: u32 = 32;
/// Rock size
pub const ROCK_SIZE: u32 = 40;
/// Bonfire size
pub const BONFIRE_SIZE: u32 = 40;

/// Safe spawn step along the entry edge
pub const SAFE_SPAWN_STEP: f32 = 40.0;
/// Safe spawn retries before clearing grass
pub const SAFE_SPAWN_TRIES: u32 = 10;

/// Block distance range for the Ancient Scroll
pub const SCROLL_BLOCK_DISTANCE: (u32, u32) = (2, 4);
/// Block distance range for the Dragon Heart
pub const HEART_BLOCK_DISTANCE: (u32, u32) = (5, 7);
