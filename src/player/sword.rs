//! Sword swing geometry.

use std::collections::HashSet;

use glam::Vec2;

use crate::constants::*;
use crate::geometry::{unit_from_degrees, Rect};

use super::Facing;

/// One swing in progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Swing {
    pub frame: u32,
    /// Enemies already struck by this swing
    hits: HashSet<u64>,
}

impl Swing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit; false if this swing already struck `enemy_id`
    pub fn register_hit(&mut self, enemy_id: u64) -> bool {
        self.hits.insert(enemy_id)
    }

    pub fn has_hit(&self, enemy_id: u64) -> bool {
        self.hits.contains(&enemy_id)
    }

    /// Move to the next frame; false once the swing is over
    pub fn advance(&mut self) -> bool {
        self.frame += 1;
        self.frame < SWORD_SWING_FRAMES
    }
}

/// Blade angle in degrees for a swing frame, sweeping across the facing
pub fn swing_angle(facing: Facing, frame: u32) -> f32 {
    let half = SWORD_SWEEP_DEGREES / 2.0;
    let t = frame.min(SWORD_SWING_FRAMES - 1) as f32 / (SWORD_SWING_FRAMES - 1) as f32;
    facing.degrees() - half + SWORD_SWEEP_DEGREES * t
}

/// Hitbox side for a sword length; grows by half the length scale
pub fn hitbox_size(sword_length: f32) -> f32 {
    let scale = sword_length / SWORD_BASE_LENGTH;
    SWORD_HITBOX_SIZE * (1.0 + (scale - 1.0) * 0.5)
}

/// Square hitbox at `sword_length` from the player centre along the blade
pub fn swing_hitbox(player_center: Vec2, facing: Facing, frame: u32, sword_length: f32) -> Rect {
    let tip = player_center + unit_from_degrees(swing_angle(facing, frame)) * sword_length;
    let size = hitbox_size(sword_length);
    Rect::centered(tip, size, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_is_centred_on_facing() {
        assert_eq!(swing_angle(Facing::Right, 0), -45.0);
        assert_eq!(swing_angle(Facing::Right, 2), 0.0);
        assert_eq!(swing_angle(Facing::Right, 4), 45.0);
        assert_eq!(swing_angle(Facing::Down, 2), 90.0);
    }

    #[test]
    fn test_hitbox_grows_with_extended_sword() {
        assert_eq!(hitbox_size(SWORD_BASE_LENGTH), SWORD_HITBOX_SIZE);
        let extended = hitbox_size(SWORD_BASE_LENGTH * SWORD_EXTENDED_SCALE);
        assert!((extended - SWORD_HITBOX_SIZE * 1.25).abs() < 1e-4);
    }

    #[test]
    fn test_hitbox_sits_in_front() {
        let center = Vec2::new(100.0, 100.0);
        let hb = swing_hitbox(center, Facing::Left, 2, SWORD_BASE_LENGTH);
        assert!((hb.center().x - 60.0).abs() < 1e-3);
        assert!((hb.center().y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_hit_set_blocks_second_hit() {
        let mut swing = Swing::new();
        assert!(swing.register_hit(3));
        assert!(!swing.register_hit(3));
        assert!(swing.has_hit(3));
        for _ in 0..SWORD_SWING_FRAMES - 1 {
            assert!(swing.advance());
        }
        assert!(!swing.advance());
    }
}
