//! Particle system: blood, smoke, fire and XP effects.
//!
//! Two shapes of particle exist. Blood is physical: it falls, slows down and
//! sticks to the first obstacle it runs into, after which it is handed to the
//! world's per-block stuck table so it stays on screen in the block where it
//! landed. Effect particles (death smoke, XP sparks, firebolt trail, explosions)
//! are purely visual, ignore obstacles and fade linearly.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;

use crate::constants::*;
use crate::geometry::Rect;

/// An RGB colour
pub type Rgb = [u8; 3];

/// A blood droplet in flight
#[derive(Debug, Clone)]
pub struct BloodParticle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Rgb,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
}

impl BloodParticle {
    /// Opaque for the first half of its life, then fades out
    pub fn alpha(&self) -> u8 {
        blood_alpha(self.life, self.max_life)
    }
}

fn blood_alpha(life: u32, max_life: u32) -> u8 {
    let half = (max_life / 2).max(1);
    if life >= half {
        255
    } else {
        ((life as f32 / half as f32) * 255.0) as u8
    }
}

/// A blood droplet bolted to an obstacle
#[derive(Debug, Clone)]
pub struct StuckParticle {
    /// Top-left corner of the obstacle at the moment of impact
    pub anchor: Vec2,
    /// Offset of the droplet from the anchor
    pub offset: Vec2,
    pub color: Rgb,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
}

impl StuckParticle {
    pub fn position(&self) -> Vec2 {
        self.anchor + self.offset
    }

    pub fn alpha(&self) -> u8 {
        blood_alpha(self.life, self.max_life)
    }
}

/// Visual variants of effect particles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Death,
    Xp,
    FireTrail,
    Explosion,
    Ember,
    Smoke,
}

/// Spawn parameters for one effect kind
#[derive(Debug, Clone, Copy)]
pub struct EffectProfile {
    pub color_min: Rgb,
    pub color_max: Rgb,
    pub speed: (f32, f32),
    pub velocity_mult: f32,
    pub life: (u32, u32),
    pub size: (f32, f32),
    pub count: usize,
    pub accel_y: f32,
    pub friction: f32,
}

impl EffectKind {
    pub fn profile(&self) -> EffectProfile {
        match self {
            EffectKind::Death => EffectProfile {
                color_min: [70, 70, 80],
                color_max: [130, 130, 140],
                speed: (0.3, 1.5),
                velocity_mult: 1.0,
                life: (30, 50),
                size: (3.0, 6.0),
                count: ENEMY_DEATH_PARTICLES_MIN,
                accel_y: SMOKE_RISE,
                friction: SMOKE_FRICTION,
            },
            EffectKind::Xp => EffectProfile {
                color_min: [80, 180, 220],
                color_max: [160, 240, 255],
                speed: (1.0, 3.0),
                velocity_mult: 1.0,
                life: (20, 35),
                size: (2.0, 4.0),
                count: 10,
                accel_y: SMOKE_RISE,
                friction: SMOKE_FRICTION,
            },
            EffectKind::FireTrail => EffectProfile {
                color_min: [220, 90, 10],
                color_max: [255, 200, 60],
                speed: (0.2, 1.0),
                velocity_mult: 0.5,
                life: (10, 20),
                size: (2.0, 4.0),
                count: FIREBOLT_TRAIL_PER_FRAME,
                accel_y: SMOKE_RISE,
                friction: SMOKE_FRICTION,
            },
            EffectKind::Explosion => EffectProfile {
                color_min: [200, 40, 0],
                color_max: [255, 190, 50],
                speed: (0.5, 2.0),
                velocity_mult: 3.0,
                life: (15, 30),
                size: (3.0, 7.0),
                count: 20,
                accel_y: SMOKE_RISE,
                friction: SMOKE_FRICTION,
            },
            EffectKind::Ember => EffectProfile {
                color_min: [240, 150, 20],
                color_max: [255, 230, 120],
                speed: (0.5, 1.5),
                velocity_mult: 2.0,
                life: (25, 45),
                size: (1.0, 2.5),
                count: 6,
                accel_y: SMOKE_RISE,
                friction: SMOKE_FRICTION,
            },
            EffectKind::Smoke => EffectProfile {
                color_min: [40, 40, 40],
                color_max: [90, 90, 90],
                speed: (0.2, 0.8),
                velocity_mult: 0.8,
                life: (35, 60),
                size: (4.0, 8.0),
                count: 8,
                accel_y: SMOKE_RISE,
                friction: SMOKE_FRICTION,
            },
        }
    }
}

/// A purely visual particle
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParticle {
    pub kind: EffectKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Rgb,
    pub size: f32,
    pub life: u32,
    pub max_life: u32,
    pub accel_y: f32,
    pub friction: f32,
}

impl EffectParticle {
    pub fn alpha(&self) -> u8 {
        ((self.life as f32 / self.max_life.max(1) as f32) * 255.0) as u8
    }

    /// Returns false once the particle has expired
    pub fn update(&mut self) -> bool {
        self.velocity.y += self.accel_y;
        self.velocity *= self.friction;
        self.position += self.velocity;
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }
}

fn random_color(rng: &mut impl Rng, min: Rgb, max: Rgb) -> Rgb {
    let mut out = [0u8; 3];
    for i in 0..3 {
        let (lo, hi) = (min[i].min(max[i]), min[i].max(max[i]));
        out[i] = rng.gen_range(lo..=hi);
    }
    out
}

/// Spawn one burst of effect particles of `kind`
pub fn spawn_effect(
    out: &mut Vec<EffectParticle>,
    kind: EffectKind,
    at: Vec2,
    count: usize,
    velocity_mult: f32,
    rng: &mut impl Rng,
) {
    let profile = kind.profile();
    for _ in 0..count {
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = rng.gen_range(profile.speed.0..=profile.speed.1) * velocity_mult;
        let life = rng.gen_range(profile.life.0..=profile.life.1);
        out.push(EffectParticle {
            kind,
            position: at,
            velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
            color: random_color(rng, profile.color_min, profile.color_max),
            size: rng.gen_range(profile.size.0..=profile.size.1),
            life,
            max_life: life,
            accel_y: profile.accel_y,
            friction: profile.friction,
        });
    }
}

/// Owner of in-flight blood and effect particles
#[derive(Debug, Default)]
pub struct ParticleSystem {
    pub blood: Vec<BloodParticle>,
    pub effects: Vec<EffectParticle>,
    /// Droplets that stuck this frame, waiting to be handed to the world
    graduated: Vec<StuckParticle>,
    blood_created: u64,
    blood_expired: u64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spray blood away from a hit, roughly along `direction`
    pub fn spawn_blood(&mut self, at: Vec2, direction: Vec2, count: usize, rng: &mut impl Rng) {
        let base = direction.try_normalize().unwrap_or(Vec2::NEG_Y);
        for _ in 0..count {
            let spread = rng.gen_range(-0.6f32..0.6);
            let dir = Vec2::from_angle(spread).rotate(base);
            let speed = rng.gen_range(BLOOD_SPEED_MIN..=BLOOD_SPEED_MAX);
            let life = rng.gen_range(BLOOD_LIFE_MIN..=BLOOD_LIFE_MAX);
            let shade = rng.gen_range(120..=200);
            self.blood.push(BloodParticle {
                position: at,
                velocity: dir * speed,
                color: [shade, 10, 10],
                size: rng.gen_range(2.0..4.0),
                life,
                max_life: life,
            });
            self.blood_created += 1;
        }
    }

    /// Spawn the profile's default burst of `kind`
    pub fn spawn_effect(&mut self, kind: EffectKind, at: Vec2, rng: &mut impl Rng) {
        let profile = kind.profile();
        spawn_effect(&mut self.effects, kind, at, profile.count, profile.velocity_mult, rng);
    }

    /// Spawn `count` particles of `kind` with a custom velocity multiplier
    pub fn spawn_effect_scaled(
        &mut self,
        kind: EffectKind,
        at: Vec2,
        count: usize,
        velocity_mult: f32,
        rng: &mut impl Rng,
    ) {
        spawn_effect(&mut self.effects, kind, at, count, velocity_mult, rng);
    }

    /// Advance all particles one frame. Blood that enters an obstacle sticks
    /// to it and moves to the graduated list.
    pub fn update(&mut self, obstacles: &[Rect]) {
        puffin::profile_function!();

        let mut expired = 0u64;
        let graduated = &mut self.graduated;
        self.blood.retain_mut(|p| {
            p.velocity.y += BLOOD_GRAVITY;
            p.velocity *= BLOOD_FRICTION;
            let next = p.position + p.velocity;
            p.life = p.life.saturating_sub(1);
            if p.life == 0 {
                expired += 1;
                return false;
            }
            let hit = obstacles
                .iter()
                .find(|r| r.contains_point(next) && !r.contains_point(p.position));
            if let Some(rect) = hit {
                let anchor = Vec2::new(rect.x, rect.y);
                graduated.push(StuckParticle {
                    anchor,
                    offset: next - anchor,
                    color: p.color,
                    size: p.size,
                    life: p.life,
                    max_life: p.max_life,
                });
                return false;
            }
            p.position = next;
            true
        });
        self.blood_expired += expired;

        self.effects.retain_mut(|p| p.update());
    }

    /// Hand over droplets that stuck since the last call
    pub fn take_graduated(&mut self) -> Vec<StuckParticle> {
        std::mem::take(&mut self.graduated)
    }

    /// Blood droplets created over the system's lifetime
    pub fn blood_created(&self) -> u64 {
        self.blood_created
    }

    /// Blood droplets that expired while still in flight
    pub fn blood_expired(&self) -> u64 {
        self.blood_expired
    }

    pub fn clear(&mut self) {
        self.blood_expired += self.blood.len() as u64;
        self.blood.clear();
        self.effects.clear();
    }
}

/// Stuck blood, keyed by the block it landed in
#[derive(Debug, Default)]
pub struct StuckParticleTable {
    blocks: HashMap<(i32, i32), Vec<StuckParticle>>,
    expired: u64,
}

impl StuckParticleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, block: (i32, i32), particles: Vec<StuckParticle>) {
        if particles.is_empty() {
            return;
        }
        self.blocks.entry(block).or_default().extend(particles);
    }

    /// Age the droplets of one block by a frame, dropping the dead ones
    pub fn tick(&mut self, block: (i32, i32)) {
        if let Some(list) = self.blocks.get_mut(&block) {
            let before = list.len();
            list.retain_mut(|p| {
                p.life = p.life.saturating_sub(1);
                p.life > 0
            });
            self.expired += (before - list.len()) as u64;
            if list.is_empty() {
                self.blocks.remove(&block);
            }
        }
    }

    pub fn in_block(&self, block: (i32, i32)) -> &[StuckParticle] {
        self.blocks.get(&block).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn expired(&self) -> u64 {
        self.expired
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_blood_falls_and_expires() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut ps = ParticleSystem::new();
        ps.spawn_blood(Vec2::new(100.0, 100.0), Vec2::X, 5, &mut rng);
        assert_eq!(ps.blood.len(), 5);
        for _ in 0..BLOOD_LIFE_MAX {
            ps.update(&[]);
        }
        assert!(ps.blood.is_empty());
        assert_eq!(ps.blood_expired(), 5);
    }

    #[test]
    fn test_blood_sticks_to_obstacle() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut ps = ParticleSystem::new();
        // A wall directly below the spray; gravity drags every droplet into it
        let wall = Rect::new(0.0, 104.0, 400.0, 50.0);
        ps.spawn_blood(Vec2::new(200.0, 100.0), Vec2::Y, 6, &mut rng);
        for _ in 0..10 {
            ps.update(&[wall]);
        }
        let stuck = ps.take_graduated();
        assert_eq!(stuck.len(), 6);
        for p in &stuck {
            assert!(wall.contains_point(p.position()));
            assert_eq!(p.anchor, Vec2::new(0.0, 104.0));
        }
        assert!(ps.take_graduated().is_empty());
    }

    #[test]
    fn test_blood_population_never_exceeds_created_minus_expired() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ps = ParticleSystem::new();
        let mut table = StuckParticleTable::new();
        let wall = Rect::new(0.0, 110.0, 400.0, 40.0);
        for frame in 0..60 {
            if frame % 7 == 0 {
                ps.spawn_blood(Vec2::new(200.0, 100.0), Vec2::X, 4, &mut rng);
            }
            ps.update(&[wall]);
            table.add((0, 0), ps.take_graduated());
            table.tick((0, 0));
            let alive = (ps.blood.len() + table.len()) as u64;
            let gone = ps.blood_expired() + table.expired();
            assert!(alive <= ps.blood_created() - gone);
        }
    }

    #[test]
    fn test_effect_particles_rise_and_fade() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut ps = ParticleSystem::new();
        ps.spawn_effect(EffectKind::Death, Vec2::new(50.0, 50.0), &mut rng);
        assert_eq!(ps.effects.len(), ENEMY_DEATH_PARTICLES_MIN);
        let first_alpha = ps.effects[0].alpha();
        ps.update(&[]);
        assert!(ps.effects[0].alpha() <= first_alpha);
        for _ in 0..60 {
            ps.update(&[]);
        }
        assert!(ps.effects.is_empty());
    }

    #[test]
    fn test_stuck_table_is_per_block() {
        let mut table = StuckParticleTable::new();
        let p = StuckParticle {
            anchor: Vec2::ZERO,
            offset: Vec2::ONE,
            color: [200, 0, 0],
            size: 2.0,
            life: 2,
            max_life: 20,
        };
        table.add((1, 2), vec![p.clone()]);
        assert_eq!(table.in_block((1, 2)).len(), 1);
        assert!(table.in_block((0, 0)).is_empty());
        table.tick((0, 0));
        assert_eq!(table.len(), 1);
        table.tick((1, 2));
        table.tick((1, 2));
        assert!(table.is_empty());
        assert_eq!(table.expired(), 1);
    }
}
