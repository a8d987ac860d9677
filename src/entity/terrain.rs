//! Static scenery: grass tufts, rocks and the bonfire.

use glam::Vec2;
use rand::Rng;

use crate::assets::{AssetCatalog, SpriteId};
use crate::clock::FrameContext;
use crate::constants::*;
use crate::geometry::Rect;
use crate::particles::{EffectKind, ParticleSystem};
use crate::render::Canvas;

use super::EntityBehavior;

/// Milliseconds between ember puffs from a bonfire
const BONFIRE_EMBER_INTERVAL_MS: u64 = 250;

/// Grass or rock; blocks movement, never updates
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    pub position: Vec2,
    pub width: u32,
    pub height: u32,
    /// Sprite variant picked at generation time
    pub variant: u8,
    sprite: SpriteId,
}

impl Terrain {
    pub fn grass(x: f32, y: f32, variant: u8) -> Self {
        Self {
            position: Vec2::new(x, y),
            width: GRASS_SIZE,
            height: GRASS_SIZE,
            variant,
            sprite: SpriteId::Grass,
        }
    }

    pub fn rock(x: f32, y: f32, variant: u8) -> Self {
        Self {
            position: Vec2::new(x, y),
            width: ROCK_SIZE,
            height: ROCK_SIZE,
            variant,
            sprite: SpriteId::Rock,
        }
    }
}

impl EntityBehavior for Terrain {
    fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width as f32, self.height as f32)
    }

    fn draw(&self, canvas: &mut dyn Canvas, assets: &AssetCatalog, _now_ms: u64) {
        let frame = assets.frame(self.sprite, "variant", self.variant as u64);
        canvas.draw_sprite(self.sprite, frame, self.rect(), 0.0, 255);
    }
}

/// The rest point at the world origin
#[derive(Debug, Clone, PartialEq)]
pub struct Bonfire {
    pub position: Vec2,
    last_ember_ms: u64,
}

impl Bonfire {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            last_ember_ms: 0,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Puff embers into the player's particle system now and then
    pub fn update(&mut self, ctx: &FrameContext, particles: &mut ParticleSystem, rng: &mut impl Rng) {
        if ctx.since(self.last_ember_ms) >= BONFIRE_EMBER_INTERVAL_MS {
            self.last_ember_ms = ctx.now_ms;
            let top = Vec2::new(self.center().x, self.position.y + 8.0);
            particles.spawn_effect_scaled(EffectKind::Ember, top, 2, 0.6, rng);
        }
    }
}

impl EntityBehavior for Bonfire {
    fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, BONFIRE_SIZE as f32, BONFIRE_SIZE as f32)
    }

    fn draw(&self, canvas: &mut dyn Canvas, assets: &AssetCatalog, now_ms: u64) {
        let frame = assets.frame_at(SpriteId::Bonfire, "burning", now_ms);
        canvas.draw_sprite(SpriteId::Bonfire, frame, self.rect(), 0.0, 255);
    }
}
