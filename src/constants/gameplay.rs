//! Core player constants (size, speed, XP, levels).

/// Player sprite and hitbox size
pub const PLAYER_SIZE: u32 = 32;
/// Base walking speed in pixels per frame at DEX 1
pub const PLAYER_BASE_SPEED: f32 = 3.0;
/// Walking speed gained per DEX point above 1
pub const PLAYER_SPEED_PER_DEX: f32 = 0.05;

/// Highest reachable level
pub const PLAYER_MAX_LEVEL: u32 = 50;
/// XP needed to go from level 1 to level 2
pub const XP_BASE: f64 = 10.0;
/// Default XP table growth
pub const XP_MULTIPLIER_DEFAULT: f64 = 1.5;
/// XP table growth after finding the Ancient Scroll
pub const XP_MULTIPLIER_SCROLL: f64 = 1.3;
/// XP table growth after finding the Dragon Heart
pub const XP_MULTIPLIER_HEART: f64 = 1.2;

/// First level that awards a skill point
pub const SKILL_POINT_FIRST_LEVEL: u32 = 4;
/// Skill points are awarded every this many levels after the first
pub const SKILL_POINT_INTERVAL: u32 = 3;

/// Player max health at CON 0 (CON starts at 1)
pub const PLAYER_HEALTH_BASE: f32 = 8.0;
/// Player max health per CON point
pub const PLAYER_HEALTH_PER_CON: f32 = 2.0;
/// Player max mana at INT 0
pub const PLAYER_MANA_BASE: f32 = 3.0;
/// Player max mana per INT point
pub const PLAYER_MANA_PER_INT: f32 = 2.0;
/// Mana regenerated per regen tick
pub const PLAYER_MANA_REGEN_AMOUNT: f32 = 1.0;
/// Milliseconds between mana regen ticks
pub const PLAYER_MANA_REGEN_INTERVAL_MS: u64 = 5000;

/// Radius around a bonfire inside which interact rests the player
pub const BONFIRE_REST_RADIUS: f32 = 60.0;
