//! Item constants.

/// Pickup sprite and hitbox size
pub const ITEM_SIZE: u32 = 24;
/// Health restored by a health potion
pub const HEALTH_POTION_HEAL: f32 = 5.0;
/// Mana restored by a mana potion
pub const MANA_POTION_RESTORE: f32 = 5.0;
/// Pickup bobbing amplitude in pixels
pub const ITEM_BOB_AMPLITUDE: f32 = 2.0;
/// Default distinct inventory slots
pub const INVENTORY_DEFAULT_CAPACITY: usize = 20;
