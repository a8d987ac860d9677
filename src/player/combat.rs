//! Player combat: sword swings and damage intake.

use glam::Vec2;
use rand::Rng;

use crate::clock::FrameContext;
use crate::constants::*;
use crate::enemy::Enemy;
use crate::entity::EntityBehavior;
use crate::events::{EventQueue, GameEvent};
use crate::geometry::{direction_between, Rect};

use super::sword::{swing_angle, swing_hitbox, Swing};
use super::Player;

impl Player {
    /// Start a swing unless one is already running. The per-swing hit set
    /// starts empty.
    pub fn start_swing(&mut self) -> bool {
        if self.swing.is_some() {
            return false;
        }
        self.swing = Some(Swing::new());
        true
    }

    pub fn is_swinging(&self) -> bool {
        self.swing.is_some()
    }

    /// Blade angle for the current swing frame
    pub fn current_swing_angle(&self) -> Option<f32> {
        self.swing.as_ref().map(|s| swing_angle(self.facing, s.frame))
    }

    pub fn sword_hitbox(&self) -> Option<Rect> {
        self.swing
            .as_ref()
            .map(|s| swing_hitbox(self.center(), self.facing, s.frame, self.attributes.sword_length))
    }

    /// Test this frame's hitbox against every enemy. An enemy is struck at
    /// most once per swing. Returns the number of enemies hit this frame.
    pub fn resolve_swing<'a>(
        &mut self,
        enemies: impl Iterator<Item = &'a mut Enemy>,
        ctx: &FrameContext,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> usize {
        puffin::profile_function!();

        let Some(hitbox) = self.sword_hitbox() else {
            return 0;
        };
        let origin = self.center();
        let damage = self.attributes.sword_damage();
        let Some(swing) = self.swing.as_mut() else {
            return 0;
        };

        let mut hits = 0;
        for enemy in enemies {
            if !enemy.rect().intersects(&hitbox) || swing.has_hit(enemy.core.id) {
                continue;
            }
            swing.register_hit(enemy.core.id);
            let Some(dealt) = enemy.take_damage(damage, Some(origin), ctx, rng) else {
                continue;
            };
            hits += 1;
            let at = enemy.center();
            let away = direction_between(origin, at, self.facing.unit());
            self.particles.spawn_blood(at, away, SWORD_HIT_BLOOD_COUNT, rng);
            events.push(GameEvent::EnemyHit { position: at, damage: dealt });
            if enemy.is_dying() {
                events.push(GameEvent::EnemyDied {
                    position: at,
                    enemy_type: enemy.core.enemy_type,
                    level: enemy.level(),
                });
            }
        }
        hits
    }

    /// Step the swing animation, ending it after the last frame
    pub fn advance_swing(&mut self) {
        if let Some(swing) = self.swing.as_mut() {
            if !swing.advance() {
                self.swing = None;
            }
        }
    }

    /// Take a hit unless already reeling or invulnerable. Returns the
    /// damage actually taken.
    pub fn take_damage(&mut self, damage: f32, source: Option<Vec2>, ctx: &FrameContext) -> Option<f32> {
        if self.is_taking_damage || self.invulnerable {
            return None;
        }
        let con = self.attributes.constitution as f32;
        let dealt = (damage * (1.0 - PLAYER_DAMAGE_REDUCTION_PER_CON * con)).max(1.0);
        self.attributes.health = (self.attributes.health - dealt).max(0.0);

        let center = self.center();
        self.damage_dir = match source {
            Some(from) => direction_between(from, center, -self.facing.unit()),
            None => -self.facing.unit(),
        };
        let reduction = (PLAYER_KNOCKBACK_REDUCTION_PER_CON * con).min(PLAYER_KNOCKBACK_REDUCTION_MAX);
        self.damage_strength = PLAYER_KNOCKBACK_STRENGTH * (1.0 - reduction);
        self.damage_started = ctx.now_ms;
        self.is_taking_damage = true;
        self.invulnerable = true;
        self.invulnerable_until = ctx.now_ms + PLAYER_INVULNERABILITY_MS;
        Some(dealt)
    }

    /// Slide away from the last hit; stops early once fully blocked
    pub(super) fn update_damage_animation(&mut self, ctx: &FrameContext, solid: &[Rect]) {
        let elapsed = ctx.since(self.damage_started);
        if elapsed >= PLAYER_DAMAGE_ANIMATION_MS {
            self.is_taking_damage = false;
            return;
        }
        let progress = elapsed as f32 / PLAYER_DAMAGE_ANIMATION_MS as f32;
        let step = self.damage_dir * self.damage_strength * (1.0 - progress) * 0.5;
        if !self.move_axis_separated(step, solid) {
            self.is_taking_damage = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::{EnemyKind, EnemyType};
    use crate::player::Facing;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_swing_hits_each_enemy_once() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut events = EventQueue::new();
        let mut player = Player::new(300.0, 300.0, INVENTORY_DEFAULT_CAPACITY);
        player.facing = Facing::Right;
        let mut enemies = vec![
            Enemy::new(1, EnemyKind::Skeleton, EnemyType::Normal, 350.0, 300.0),
            Enemy::new(2, EnemyKind::Skeleton, EnemyType::Normal, 340.0, 255.0),
        ];
        let before: Vec<f32> = enemies.iter().map(|e| e.core.health).collect();
        let expected = 1.0 + (0.5 * player.attributes.strength as f32).floor();

        assert!(player.start_swing());
        for frame in 0..5 {
            let ctx = FrameContext::at(frame * 16);
            player.resolve_swing(enemies.iter_mut(), &ctx, &mut rng, &mut events);
            player.advance_swing();
        }

        assert!(!player.is_swinging());
        for (enemy, hp) in enemies.iter().zip(before) {
            assert!((hp - enemy.core.health - expected).abs() < 1e-5, "enemy {}", enemy.core.id);
        }
        assert!(player.particles.blood.len() >= 2 * SWORD_HIT_BLOOD_COUNT);
        let hits = events.iter().filter(|e| matches!(e, GameEvent::EnemyHit { .. })).count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_new_swing_clears_hit_set() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut events = EventQueue::new();
        let mut player = Player::new(300.0, 300.0, INVENTORY_DEFAULT_CAPACITY);
        player.facing = Facing::Right;
        let mut enemy = Enemy::new(1, EnemyKind::Slime, EnemyType::Tank, 350.0, 300.0);
        enemy.set_level(10, 1.0);
        let start = enemy.core.health;

        for swing in 0..2u64 {
            player.start_swing();
            for frame in 0..5 {
                let ctx = FrameContext::at(swing * 1000 + frame * 16);
                player.resolve_swing(std::iter::once(&mut enemy), &ctx, &mut rng, &mut events);
                player.advance_swing();
            }
        }
        assert!((start - enemy.core.health - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_damage_intake_and_invulnerability() {
        let mut player = Player::new(300.0, 300.0, INVENTORY_DEFAULT_CAPACITY);
        player.attributes.constitution = 4;
        let full = player.attributes.health;
        let dealt = player.take_damage(5.0, Some(Vec2::new(250.0, 316.0)), &FrameContext::at(0));
        let dealt = dealt.expect("hit lands");
        assert!((dealt - 4.0).abs() < 1e-5);
        assert!((player.attributes.health - (full - 4.0)).abs() < 1e-5);
        assert!(player.invulnerable && player.is_taking_damage);
        assert_eq!(player.take_damage(5.0, None, &FrameContext::at(100)), None);

        let mut t = 16;
        while t <= PLAYER_INVULNERABILITY_MS + 16 {
            player.update(&FrameContext::at(t), Vec2::ZERO, &[], &[]);
            t += 16;
        }
        assert!(player.position.x > 300.0);
        assert!(!player.is_taking_damage);
        assert!(!player.invulnerable);
        assert!(player.take_damage(5.0, None, &FrameContext::at(t)).is_some());
    }

    #[test]
    fn test_minimum_damage_is_one() {
        let mut player = Player::new(300.0, 300.0, INVENTORY_DEFAULT_CAPACITY);
        player.attributes.constitution = 30;
        assert_eq!(player.take_damage(3.0, None, &FrameContext::at(0)), Some(1.0));
    }

    #[test]
    fn test_knockback_into_wall_ends_early() {
        let mut player = Player::new(300.0, 300.0, INVENTORY_DEFAULT_CAPACITY);
        let wall = Rect::new(332.0, 250.0, 30.0, 100.0);
        player.take_damage(2.0, Some(Vec2::new(250.0, 316.0)), &FrameContext::at(0));
        player.update(&FrameContext::at(16), Vec2::ZERO, &[wall], &[]);
        assert!(!player.is_taking_damage);
        assert!(player.invulnerable);
    }

    #[test]
    fn test_flashing_while_invulnerable() {
        let mut player = Player::new(300.0, 300.0, INVENTORY_DEFAULT_CAPACITY);
        player.take_damage(2.0, None, &FrameContext::at(0));
        assert!(player.is_visible(50));
        assert!(!player.is_visible(150));
        assert!(player.is_visible(250));
    }
}
