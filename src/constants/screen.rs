//! Screen and block dimensions.

/// Screen width in pixels; one world block spans exactly one screen
pub const SCREEN_WIDTH: f32 = 800.0;
/// Screen height in pixels
pub const SCREEN_HEIGHT: f32 = 600.0;

/// Inset from the opposite edge when the player enters a new block
pub const BLOCK_ENTRY_INSET: f32 = 10.0;

/// Duration of the fade overlay after a block transition (ms)
pub const TRANSITION_FADE_MS: f32 = 400.0;
