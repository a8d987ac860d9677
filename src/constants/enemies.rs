//! Enemy stats, AI and lifecycle constants.

/// Enemy sprite and hitbox size
pub const ENEMY_SIZE: u32 = 32;
/// Lowest enemy level
pub const ENEMY_MIN_LEVEL: u32 = 1;
/// Highest enemy level
pub const ENEMY_MAX_LEVEL: u32 = 10;
/// Extra stat points on top of the level when distributing
pub const ENEMY_STAT_POINT_BONUS: u32 = 2;
/// Maximum effective level boost from the difficulty factor
pub const ENEMY_DIFFICULTY_LEVEL_BOOST_MAX: u32 = 5;

/// Base walking speed in pixels per frame
pub const ENEMY_BASE_SPEED: f32 = 1.2;

/// Length of the knockback window (ms)
pub const ENEMY_KNOCKBACK_MS: u64 = 300;
/// Knockback strength before damage ratio and resistance
pub const ENEMY_KNOCKBACK_BASE: f32 = 40.0;
/// Knockback below this per-frame movement is skipped
pub const ENEMY_KNOCKBACK_MIN_STEP: f32 = 3.0;
/// Recovery window after knockback (ms)
pub const ENEMY_RECOVERY_MS: u64 = 1000;
/// Hit flash duration (ms)
pub const ENEMY_HIT_FLASH_MS: u64 = 200;
/// Death animation duration before removal (ms)
pub const ENEMY_DEATH_DURATION_MS: u64 = 800;
/// Smoke particles spawned on death (inclusive range)
pub const ENEMY_DEATH_PARTICLES_MIN: usize = 15;
pub const ENEMY_DEATH_PARTICLES_MAX: usize = 20;

/// Random idle pause (ms)
pub const ENEMY_IDLE_MIN_MS: u64 = 500;
pub const ENEMY_IDLE_MAX_MS: u64 = 2000;
/// Random walk duration (ms)
pub const ENEMY_MOVE_MIN_MS: u64 = 600;
pub const ENEMY_MOVE_MAX_MS: u64 = 2400;
/// Chance range to turn after bumping into something
pub const ENEMY_TURN_CHANCE_MIN: f64 = 0.25;
pub const ENEMY_TURN_CHANCE_MAX: f64 = 0.75;
/// Enemies keep this far from the screen edges while wandering
pub const ENEMY_SCREEN_MARGIN: f32 = 16.0;

// SKELETON
/// Distance at which a skeleton notices the player
pub const SKELETON_DETECTION_RANGE: f32 = 150.0;
/// Distance at which a skeleton swings
pub const SKELETON_ATTACK_RANGE: f32 = 50.0;
/// Lockout after a skeleton attack lands (ms)
pub const SKELETON_ATTACK_DURATION_MS: u64 = 400;
/// Cooldown after the lockout (ms)
pub const SKELETON_ATTACK_COOLDOWN_MS: u64 = 1200;

// SOULS
/// Soul orb size
pub const SOUL_SIZE: u32 = 16;
/// Player distance at which a soul starts drifting
pub const SOUL_ATTRACTION_RADIUS: f32 = 150.0;
/// Player distance at which a soul is consumed
pub const SOUL_COLLECTION_RADIUS: f32 = 20.0;
/// Drift speed at the attraction edge
pub const SOUL_MIN_SPEED: f32 = 1.0;
/// Drift speed right next to the player
pub const SOUL_MAX_SPEED: f32 = 8.0;
/// Bobbing amplitude in pixels
pub const SOUL_BOB_AMPLITUDE: f32 = 3.0;
