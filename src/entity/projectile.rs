//! Projectiles fired by the player.
//!
//! A projectile flies in a straight line until its lifespan runs out, it
//! leaves the screen, or it touches an enemy. Hit testing sweeps the segment
//! travelled this frame so fast bolts cannot tunnel through thin enemies.

use glam::Vec2;
use rand::Rng;

use crate::assets::{AssetCatalog, SpriteId};
use crate::clock::FrameContext;
use crate::constants::*;
use crate::enemy::Enemy;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::Rect;
use crate::particles::{EffectKind, ParticleSystem};
use crate::player::Facing;
use crate::render::Canvas;

use super::EntityBehavior;

/// Firebolt scaling derived from the caster's INT at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireboltTraits {
    pub intelligence: u32,
    pub trail_density: usize,
    pub explosion_radius: f32,
    pub secondary_explosions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    Plain,
    Firebolt(FireboltTraits),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Centre of the projectile
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub created_at: u64,
    pub lifespan_ms: u64,
    /// Visual radius; the collision box is a square of twice this side
    pub radius: f32,
    pub alive: bool,
    pub kind: ProjectileKind,
}

/// Linear INT scaling shared by every firebolt stat: 0 at INT 1, 1 at INT 15
fn int_progress(intelligence: u32) -> f32 {
    intelligence.saturating_sub(1) as f32 / 14.0
}

pub fn firebolt_speed(intelligence: u32) -> f32 {
    6.0 + int_progress(intelligence) * 6.0
}

pub fn firebolt_damage(intelligence: u32) -> f32 {
    3.0 + int_progress(intelligence) * 12.0
}

pub fn firebolt_lifespan_ms(intelligence: u32) -> u64 {
    (400.0 + int_progress(intelligence) * 1600.0) as u64
}

pub fn firebolt_radius(intelligence: u32) -> f32 {
    4.0 + intelligence.min(11) as f32
}

impl Projectile {
    pub fn new(position: Vec2, velocity: Vec2, damage: f32, radius: f32, lifespan_ms: u64, now_ms: u64) -> Self {
        Self {
            position,
            velocity,
            damage,
            created_at: now_ms,
            lifespan_ms,
            radius,
            alive: true,
            kind: ProjectileKind::Plain,
        }
    }

    /// Launch a firebolt from the facing edge of `caster`
    pub fn firebolt(caster: Rect, facing: Facing, intelligence: u32, now_ms: u64) -> Self {
        let radius = firebolt_radius(intelligence);
        let dir = facing.unit();
        let center = caster.center();
        let reach = match facing {
            Facing::Left | Facing::Right => caster.width / 2.0,
            Facing::Up | Facing::Down => caster.height / 2.0,
        };
        let position = center + dir * (reach + PROJECTILE_SPAWN_OFFSET + radius);
        let mut bolt = Self::new(
            position,
            dir * firebolt_speed(intelligence),
            firebolt_damage(intelligence),
            radius,
            firebolt_lifespan_ms(intelligence),
            now_ms,
        );
        bolt.kind = ProjectileKind::Firebolt(FireboltTraits {
            intelligence,
            trail_density: FIREBOLT_TRAIL_PER_FRAME + (intelligence / 4) as usize,
            explosion_radius: 5.0 + 2.0 * intelligence as f32,
            secondary_explosions: (2 * intelligence).min(FIREBOLT_MAX_SECONDARY),
        });
        bolt
    }

    /// Move one frame. Returns the position before the move.
    pub fn update(&mut self, ctx: &FrameContext, particles: &mut ParticleSystem, rng: &mut impl Rng) -> Vec2 {
        let previous = self.position;
        if !self.alive {
            return previous;
        }
        if ctx.since(self.created_at) >= self.lifespan_ms {
            self.alive = false;
            return previous;
        }
        self.position += self.velocity;
        if let ProjectileKind::Firebolt(traits) = self.kind {
            particles.spawn_effect_scaled(EffectKind::FireTrail, previous, traits.trail_density, 0.5, rng);
        }
        let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
        if !self.rect().intersects(&screen) {
            self.alive = false;
        }
        previous
    }

    /// Damage the first enemy touched by this frame's flight path
    pub fn resolve_hits<'a>(
        &mut self,
        previous: Vec2,
        enemies: impl Iterator<Item = &'a mut Enemy>,
        ctx: &FrameContext,
        particles: &mut ParticleSystem,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> bool {
        if !self.alive {
            return false;
        }
        let hitbox = self.rect();
        for enemy in enemies {
            let target = enemy.rect();
            if !(target.intersects(&hitbox) || target.intersects_segment(previous, self.position)) {
                continue;
            }
            if let Some(dealt) = enemy.take_damage(self.damage, Some(self.position), ctx, rng) {
                events.push(GameEvent::EnemyHit {
                    position: enemy.center(),
                    damage: dealt,
                });
                if enemy.is_dying() {
                    events.push(GameEvent::EnemyDied {
                        position: enemy.center(),
                        enemy_type: enemy.core.enemy_type,
                        level: enemy.level(),
                    });
                }
            }
            self.on_hit(particles, rng);
            self.alive = false;
            return true;
        }
        false
    }

    /// Impact effects: a main explosion plus INT-scaled secondary bursts
    fn on_hit(&self, particles: &mut ParticleSystem, rng: &mut impl Rng) {
        match self.kind {
            ProjectileKind::Plain => {
                particles.spawn_effect_scaled(EffectKind::Smoke, self.position, 4, 0.5, rng);
            }
            ProjectileKind::Firebolt(traits) => {
                particles.spawn_effect(EffectKind::Explosion, self.position, rng);
                for _ in 0..traits.secondary_explosions {
                    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                    let distance = rng.gen_range(0.0..=traits.explosion_radius);
                    let at = self.position + Vec2::from_angle(angle) * distance;
                    particles.spawn_effect_scaled(EffectKind::Explosion, at, 6, 1.5, rng);
                }
                particles.spawn_effect(EffectKind::Smoke, self.position, rng);
            }
        }
    }
}

impl EntityBehavior for Projectile {
    fn rect(&self) -> Rect {
        Rect::centered(self.position, self.radius * 2.0, self.radius * 2.0)
    }

    fn draw(&self, canvas: &mut dyn Canvas, _assets: &AssetCatalog, _now_ms: u64) {
        let angle = self.velocity.y.atan2(self.velocity.x).to_degrees();
        canvas.draw_sprite(SpriteId::Firebolt, 0, self.rect(), angle, 255);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{Enemy, EnemyKind, EnemyType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_firebolt_scaling_endpoints() {
        assert_eq!(firebolt_speed(1), 6.0);
        assert_eq!(firebolt_damage(1), 3.0);
        assert_eq!(firebolt_lifespan_ms(1), 400);
        assert_eq!(firebolt_radius(1), 5.0);
        assert!((firebolt_speed(15) - 12.0).abs() < 1e-4);
        assert!((firebolt_damage(15) - 15.0).abs() < 1e-4);
        assert_eq!(firebolt_lifespan_ms(15), 2000);
        assert_eq!(firebolt_radius(20), 15.0);
    }

    #[test]
    fn test_firebolt_spawns_past_facing_edge() {
        let caster = Rect::new(100.0, 100.0, 32.0, 32.0);
        let bolt = Projectile::firebolt(caster, Facing::Right, 3, 0);
        assert!(bolt.rect().x >= caster.right());
        assert!(bolt.velocity.x > 0.0 && bolt.velocity.y == 0.0);
        match bolt.kind {
            ProjectileKind::Firebolt(t) => assert_eq!(t.secondary_explosions, 6),
            ProjectileKind::Plain => panic!("expected firebolt"),
        }
    }

    #[test]
    fn test_lifespan_expiry() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut particles = ParticleSystem::new();
        let caster = Rect::new(300.0, 300.0, 32.0, 32.0);
        let mut bolt = Projectile::firebolt(caster, Facing::Up, 1, 0);
        bolt.update(&FrameContext::at(100), &mut particles, &mut rng);
        assert!(bolt.alive);
        bolt.update(&FrameContext::at(400), &mut particles, &mut rng);
        assert!(!bolt.alive);
    }

    #[test]
    fn test_hit_damages_enemy_and_dies() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut particles = ParticleSystem::new();
        let mut events = EventQueue::new();
        let mut enemy = Enemy::new(1, EnemyKind::Skeleton, EnemyType::Tank, 150.0, 100.0);
        enemy.set_level(8, 1.0);
        let before = enemy.core.health;

        let caster = Rect::new(100.0, 100.0, 32.0, 32.0);
        let mut bolt = Projectile::firebolt(caster, Facing::Right, 5, 0);
        let ctx = FrameContext::at(16);
        let prev = bolt.update(&ctx, &mut particles, &mut rng);
        let hit = bolt.resolve_hits(prev, std::iter::once(&mut enemy), &ctx, &mut particles, &mut rng, &mut events);

        assert!(hit);
        assert!(!bolt.alive);
        assert!(enemy.core.health < before);
        assert!(!events.is_empty());
        assert!(particles.effects.iter().any(|p| p.kind == EffectKind::Explosion));
    }
}
