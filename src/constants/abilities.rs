//! Movement ability constants.

/// Sprint speed multiplier
pub const SPRINT_MULTIPLIER: f32 = 1.5;
/// Sprint duration (ms)
pub const SPRINT_DURATION_MS: u64 = 1500;
/// Sprint cooldown, counted from the end of the sprint (ms)
pub const SPRINT_COOLDOWN_MS: u64 = 3000;

/// Dash speed multiplier
pub const DASH_MULTIPLIER: f32 = 5.0;
/// Dash duration (ms)
pub const DASH_DURATION_MS: u64 = 150;
/// Dash cooldown (ms)
pub const DASH_COOLDOWN_MS: u64 = 2700;

/// Blink distance in pixels
pub const BLINK_DISTANCE: f32 = 80.0;
/// Step used when shortening a blocked blink
pub const BLINK_STEP: f32 = 4.0;
/// Blink cooldown (ms)
pub const BLINK_COOLDOWN_MS: u64 = 2000;

/// Mana spent per firebolt
pub const FIREBOLT_MANA_COST: f32 = 1.0;
