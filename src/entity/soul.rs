//! Souls: XP orbs dropped by dying enemies.

use glam::Vec2;

use crate::assets::{AssetCatalog, SpriteId};
use crate::clock::FrameContext;
use crate::constants::*;
use crate::geometry::Rect;
use crate::render::Canvas;

use super::EntityBehavior;

/// An XP orb that drifts toward a nearby player
#[derive(Debug, Clone, PartialEq)]
pub struct Soul {
    /// Centre of the orb
    pub position: Vec2,
    pub xp: u32,
    pub collected: bool,
    pub rotation: f32,
    bob_offset: f32,
}

impl Soul {
    pub fn new(center: Vec2, xp: u32) -> Self {
        Self {
            position: center,
            xp,
            collected: false,
            rotation: 0.0,
            bob_offset: 0.0,
        }
    }

    /// Animate and drift toward the player. Returns the XP value on the
    /// frame the soul reaches the collection radius.
    pub fn update(&mut self, ctx: &FrameContext, player_center: Vec2) -> Option<u32> {
        if self.collected {
            return None;
        }
        self.rotation = (self.rotation + 3.0) % 360.0;
        self.bob_offset = (ctx.now_ms as f32 / 200.0).sin() * SOUL_BOB_AMPLITUDE;

        let to_player = player_center - self.position;
        let distance = to_player.length();
        if distance <= SOUL_COLLECTION_RADIUS {
            self.collected = true;
            return Some(self.xp);
        }
        if distance < SOUL_ATTRACTION_RADIUS {
            let closeness = 1.0 - distance / SOUL_ATTRACTION_RADIUS;
            let speed = SOUL_MIN_SPEED + (SOUL_MAX_SPEED - SOUL_MIN_SPEED) * closeness;
            self.position += to_player / distance * speed.min(distance);
        }
        None
    }
}

impl EntityBehavior for Soul {
    fn rect(&self) -> Rect {
        Rect::centered(self.position, SOUL_SIZE as f32, SOUL_SIZE as f32)
    }

    fn draw(&self, canvas: &mut dyn Canvas, _assets: &AssetCatalog, _now_ms: u64) {
        let rect = self.rect().translated(0.0, self.bob_offset);
        canvas.draw_sprite(SpriteId::Soul, 0, rect, self.rotation, 220);
    }

    fn is_collectible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soul_ignores_distant_player() {
        let mut soul = Soul::new(Vec2::new(0.0, 0.0), 3);
        let result = soul.update(&FrameContext::at(16), Vec2::new(500.0, 0.0));
        assert_eq!(result, None);
        assert_eq!(soul.position, Vec2::ZERO);
    }

    #[test]
    fn test_soul_drifts_faster_when_closer() {
        let mut far = Soul::new(Vec2::new(0.0, 0.0), 1);
        let mut near = Soul::new(Vec2::new(0.0, 0.0), 1);
        far.update(&FrameContext::at(16), Vec2::new(140.0, 0.0));
        near.update(&FrameContext::at(16), Vec2::new(40.0, 0.0));
        assert!(near.position.x > far.position.x);
        assert!(far.position.x > 0.0);
    }

    #[test]
    fn test_soul_collected_once() {
        let mut soul = Soul::new(Vec2::new(100.0, 100.0), 4);
        let player = Vec2::new(160.0, 100.0);
        let mut gained = 0;
        for frame in 0..200 {
            if let Some(xp) = soul.update(&FrameContext::at(frame * 16), player) {
                gained += xp;
            }
        }
        assert_eq!(gained, 4);
        assert!(soul.collected);
    }
}
