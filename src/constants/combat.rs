//! Player combat constants (sword, damage intake, knockback).

/// Frames a sword swing lasts
pub const SWORD_SWING_FRAMES: u32 = 5;
/// Total sweep of a swing in degrees, centred on the facing direction
pub const SWORD_SWEEP_DEGREES: f32 = 90.0;
/// Distance from the player centre to the sword hitbox centre
pub const SWORD_BASE_LENGTH: f32 = 40.0;
/// Side of the square sword hitbox
pub const SWORD_HITBOX_SIZE: f32 = 30.0;
/// Sword length multiplier granted by the extended sword skill
pub const SWORD_EXTENDED_SCALE: f32 = 1.5;
/// Blood particles spawned per sword hit
pub const SWORD_HIT_BLOOD_COUNT: usize = 8;

/// Damage reduction per CON point on incoming player damage
pub const PLAYER_DAMAGE_REDUCTION_PER_CON: f32 = 0.05;
/// Length of the player's damage knockback animation (ms)
pub const PLAYER_DAMAGE_ANIMATION_MS: u64 = 500;
/// Length of post-hit invulnerability (ms)
pub const PLAYER_INVULNERABILITY_MS: u64 = 1000;
/// Visibility toggles this often while invulnerable (ms)
pub const PLAYER_FLASH_INTERVAL_MS: u64 = 100;
/// Knockback strength applied to the player before CON reduction
pub const PLAYER_KNOCKBACK_STRENGTH: f32 = 12.0;
/// Knockback reduction per CON point
pub const PLAYER_KNOCKBACK_REDUCTION_PER_CON: f32 = 0.05;
/// Maximum knockback reduction from CON
pub const PLAYER_KNOCKBACK_REDUCTION_MAX: f32 = 0.8;
