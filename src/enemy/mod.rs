//! Enemies: shared core state plus per-kind AI.
//!
//! Every enemy embeds an [`EnemyCore`] holding the transform, attribute
//! block and combat timers. The [`EnemyKind`] tag selects the AI step that
//! runs when the core is free to act, so knockback, recovery and death are
//! written once for all kinds.
//!
//! State machine:
//! ```text
//! idle <-> moving          (random walk, skeletons chase instead)
//! any  -> knockback        (hit; AI suspended)
//! knockback -> recovering  (AI suspended for ENEMY_RECOVERY_MS)
//! recovering -> idle
//! any  -> dying -> removed
//! ```

mod ai;
mod attributes;

pub use attributes::{difficulty_level_boost, distribute_points, EnemyAttributes};

use glam::Vec2;
use rand::Rng;

use crate::assets::{AssetCatalog, SpriteId};
use crate::clock::FrameContext;
use crate::constants::*;
use crate::entity::{EntityBehavior, Soul};
use crate::geometry::{direction_between, Rect};
use crate::particles::{spawn_effect, EffectKind, EffectParticle};
use crate::render::Canvas;

/// Stat archetype; decides how level points are distributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyType {
    Normal,
    Fast,
    Tank,
    Brute,
    Magic,
}

impl EnemyType {
    pub const ALL: [EnemyType; 5] = [
        EnemyType::Normal,
        EnemyType::Fast,
        EnemyType::Tank,
        EnemyType::Brute,
        EnemyType::Magic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyType::Normal => "normal",
            EnemyType::Fast => "fast",
            EnemyType::Tank => "tank",
            EnemyType::Brute => "brute",
            EnemyType::Magic => "magic",
        }
    }

    pub fn parse(name: &str) -> Option<EnemyType> {
        EnemyType::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Percent of the point budget for STR, CON, DEX, INT
    pub fn stat_ratios(&self) -> [u32; 4] {
        match self {
            EnemyType::Normal => [40, 30, 30, 0],
            EnemyType::Fast => [30, 10, 60, 0],
            EnemyType::Tank => [20, 70, 10, 0],
            EnemyType::Brute => [70, 20, 10, 0],
            EnemyType::Magic => [10, 20, 20, 50],
        }
    }

    /// Index of the stat that receives rounding leftovers
    pub fn primary_stat(&self) -> usize {
        match self {
            EnemyType::Normal | EnemyType::Brute => 0,
            EnemyType::Tank => 1,
            EnemyType::Fast => 2,
            EnemyType::Magic => 3,
        }
    }

    pub fn defense_base(&self) -> f32 {
        match self {
            EnemyType::Tank => 2.0,
            EnemyType::Brute => 1.0,
            _ => 0.0,
        }
    }
}

/// Body and behaviour variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Slime,
    Skeleton,
}

impl EnemyKind {
    /// Entity type tag used in save files
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Slime => "slime",
            EnemyKind::Skeleton => "skeleton",
        }
    }

    pub fn parse(name: &str) -> Option<EnemyKind> {
        match name {
            "slime" => Some(EnemyKind::Slime),
            "skeleton" => Some(EnemyKind::Skeleton),
            _ => None,
        }
    }

    fn sprite(&self) -> SpriteId {
        match self {
            EnemyKind::Slime => SpriteId::Slime,
            EnemyKind::Skeleton => SpriteId::Skeleton,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Moving,
    Attacking,
    Dying,
}

impl EnemyState {
    /// Animation name in the sheet layout
    pub fn animation(&self) -> &'static str {
        match self {
            EnemyState::Idle => "idle",
            EnemyState::Moving => "moving",
            EnemyState::Attacking => "attacking",
            EnemyState::Dying => "dying",
        }
    }
}

/// Something an enemy asks the world to do to the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    Attack { damage: f32, source: Vec2 },
}

/// State shared by every enemy kind
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyCore {
    pub id: u64,
    /// Top-left corner
    pub position: Vec2,
    pub enemy_type: EnemyType,
    pub attributes: EnemyAttributes,
    pub health: f32,
    pub state: EnemyState,
    state_until: u64,
    move_dir: Vec2,

    pub is_being_knocked_back: bool,
    knockback_started: u64,
    knockback_dir: Vec2,
    knockback_strength: f32,
    pub should_recover: bool,
    pub is_recovering: bool,
    recovery_started: u64,
    hit_flash_until: u64,

    attack_until: u64,
    attack_ready_at: u64,

    death_started: u64,
    pub death_particles: Vec<EffectParticle>,
    pub will_drop_soul: bool,
    pub should_remove: bool,
}

impl EnemyCore {
    fn new(id: u64, enemy_type: EnemyType, x: f32, y: f32) -> Self {
        let attributes = EnemyAttributes::new(enemy_type, ENEMY_MIN_LEVEL, 1.0);
        Self {
            id,
            position: Vec2::new(x, y),
            enemy_type,
            health: attributes.max_health,
            attributes,
            state: EnemyState::Idle,
            state_until: 0,
            move_dir: Vec2::X,
            is_being_knocked_back: false,
            knockback_started: 0,
            knockback_dir: Vec2::ZERO,
            knockback_strength: 0.0,
            should_recover: false,
            is_recovering: false,
            recovery_started: 0,
            hit_flash_until: 0,
            attack_until: 0,
            attack_ready_at: 0,
            death_started: 0,
            death_particles: Vec::new(),
            will_drop_soul: false,
            should_remove: false,
        }
    }

    fn body(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, ENEMY_SIZE as f32, ENEMY_SIZE as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.body().center()
    }

    fn set_state(&mut self, state: EnemyState) {
        if self.state != state {
            tracing::debug!("Enemy {} {:?} -> {:?}", self.id, self.state, state);
            self.state = state;
        }
    }

    /// Axis-separated move. Each axis is applied only if the moved body stays
    /// clear of obstacles and `margin` pixels inside the screen. Returns true
    /// if nothing blocked the move.
    fn try_move(&mut self, delta: Vec2, obstacles: &[Rect], margin: f32) -> bool {
        let bounds = Rect::new(
            margin,
            margin,
            SCREEN_WIDTH - 2.0 * margin,
            SCREEN_HEIGHT - 2.0 * margin,
        );
        let blocked = |r: &Rect| !r.is_inside(&bounds) || obstacles.iter().any(|o| o.intersects(r));

        let mut clear = true;
        if delta.x != 0.0 {
            let moved = self.body().translated(delta.x, 0.0);
            if blocked(&moved) {
                clear = false;
            } else {
                self.position.x += delta.x;
            }
        }
        if delta.y != 0.0 {
            let moved = self.body().translated(0.0, delta.y);
            if blocked(&moved) {
                clear = false;
            } else {
                self.position.y += delta.y;
            }
        }
        clear
    }

    fn start_knockback(&mut self, source: Vec2, damage: f32, ctx: &FrameContext) {
        let ratio = (damage / self.attributes.max_health).min(1.0);
        let strength = ENEMY_KNOCKBACK_BASE * ratio * (1.0 - self.attributes.knockback_resistance);
        // Hits too light to move the enemy at least a few pixels leave it in place
        if strength * 0.5 < ENEMY_KNOCKBACK_MIN_STEP {
            return;
        }
        let center = self.center();
        self.knockback_dir = direction_between(source, center, self.move_dir);
        self.knockback_strength = strength;
        self.knockback_started = ctx.now_ms;
        self.is_being_knocked_back = true;
        self.is_recovering = false;
        self.set_state(EnemyState::Idle);
    }

    fn update_knockback(&mut self, ctx: &FrameContext, obstacles: &[Rect]) {
        let elapsed = ctx.since(self.knockback_started);
        if elapsed >= ENEMY_KNOCKBACK_MS {
            self.end_knockback(ctx);
            return;
        }
        let progress = elapsed as f32 / ENEMY_KNOCKBACK_MS as f32;
        let step = self.knockback_dir * self.knockback_strength * (1.0 - progress) * 0.5;
        let before = self.position;
        self.try_move(step, obstacles, 0.0);
        if self.position == before && step != Vec2::ZERO {
            self.end_knockback(ctx);
        }
    }

    fn end_knockback(&mut self, ctx: &FrameContext) {
        self.is_being_knocked_back = false;
        if self.should_recover {
            self.should_recover = false;
            self.is_recovering = true;
            self.recovery_started = ctx.now_ms;
        }
    }
}

/// One enemy: shared core plus the AI variant
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub core: EnemyCore,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(id: u64, kind: EnemyKind, enemy_type: EnemyType, x: f32, y: f32) -> Self {
        Self {
            core: EnemyCore::new(id, enemy_type, x, y),
            kind,
        }
    }

    /// Rebuild attributes for `level`, boosted by the block's difficulty
    /// factor, and heal to full
    pub fn set_level(&mut self, level: u32, difficulty_factor: f32) {
        self.core.attributes = EnemyAttributes::new(self.core.enemy_type, level, difficulty_factor);
        self.core.health = self.core.attributes.max_health;
    }

    pub fn level(&self) -> u32 {
        self.core.attributes.level
    }

    pub fn max_health(&self) -> f32 {
        self.core.attributes.max_health
    }

    pub fn center(&self) -> Vec2 {
        self.core.center()
    }

    pub fn is_dying(&self) -> bool {
        self.core.state == EnemyState::Dying
    }

    /// Apply a hit. Returns the damage actually dealt, or `None` if the
    /// enemy is already dying.
    pub fn take_damage(
        &mut self,
        damage: f32,
        source: Option<Vec2>,
        ctx: &FrameContext,
        rng: &mut impl Rng,
    ) -> Option<f32> {
        if self.is_dying() {
            return None;
        }
        let dealt = self.core.attributes.damage_taken(damage);
        self.core.health = (self.core.health - dealt).max(0.0);
        self.core.hit_flash_until = ctx.now_ms + ENEMY_HIT_FLASH_MS;

        if self.core.health <= 0.0 {
            self.die(ctx, rng);
            return Some(dealt);
        }

        self.core.should_recover = true;
        let source = source.unwrap_or_else(|| self.center() - self.core.move_dir);
        self.core.start_knockback(source, dealt, ctx);
        Some(dealt)
    }

    /// Enter the death animation; the corpse stops colliding immediately
    pub fn die(&mut self, ctx: &FrameContext, rng: &mut impl Rng) {
        if self.is_dying() {
            return;
        }
        let core = &mut self.core;
        core.set_state(EnemyState::Dying);
        core.death_started = ctx.now_ms;
        core.is_being_knocked_back = false;
        core.is_recovering = false;
        core.should_recover = false;
        core.will_drop_soul = true;
        let count = rng.gen_range(ENEMY_DEATH_PARTICLES_MIN..=ENEMY_DEATH_PARTICLES_MAX);
        let center = core.center();
        spawn_effect(&mut core.death_particles, EffectKind::Death, center, count, 1.0, rng);
    }

    /// Advance one frame. `obstacles` must not include this enemy's own rect.
    pub fn update(
        &mut self,
        ctx: &FrameContext,
        player_rect: Rect,
        obstacles: &[Rect],
        rng: &mut impl Rng,
    ) -> Option<EnemyAction> {
        let core = &mut self.core;
        core.death_particles.retain_mut(|p| p.update());

        if core.state == EnemyState::Dying {
            if ctx.since(core.death_started) >= ENEMY_DEATH_DURATION_MS {
                core.should_remove = true;
            }
            return None;
        }

        if core.is_being_knocked_back {
            core.update_knockback(ctx, obstacles);
            return None;
        }

        if core.is_recovering {
            if ctx.since(core.recovery_started) >= ENEMY_RECOVERY_MS {
                core.is_recovering = false;
                core.set_state(EnemyState::Idle);
                core.state_until = ctx.now_ms + rng.gen_range(ENEMY_IDLE_MIN_MS..=ENEMY_IDLE_MAX_MS);
            }
            return None;
        }

        match self.kind {
            EnemyKind::Slime => ai::slime_step(core, ctx, obstacles, rng),
            EnemyKind::Skeleton => ai::skeleton_step(core, ctx, player_rect, obstacles, rng),
        }
    }

    /// Contact damage dealt when the player walks into this enemy
    pub fn on_player_collision(&self) -> Option<f32> {
        if self.is_dying() {
            return None;
        }
        match self.kind {
            EnemyKind::Slime => Some(self.core.attributes.attack),
            EnemyKind::Skeleton => None,
        }
    }

    /// Hand over the soul once; later calls return `None`
    pub fn drop_soul(&mut self) -> Option<Soul> {
        if !self.core.will_drop_soul {
            return None;
        }
        self.core.will_drop_soul = false;
        Some(Soul::new(self.center(), self.level()))
    }

    fn animation_frame(&self, assets: &AssetCatalog, now_ms: u64) -> u32 {
        assets.frame_at(self.kind.sprite(), self.core.state.animation(), now_ms)
    }
}

impl EntityBehavior for Enemy {
    fn rect(&self) -> Rect {
        if self.is_dying() {
            Rect::EMPTY
        } else {
            self.core.body()
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, assets: &AssetCatalog, now_ms: u64) {
        let body = self.core.body();
        let alpha = if self.is_dying() {
            let elapsed = now_ms.saturating_sub(self.core.death_started) as f32;
            (255.0 * (1.0 - elapsed / ENEMY_DEATH_DURATION_MS as f32)).clamp(0.0, 255.0) as u8
        } else {
            255
        };
        canvas.draw_sprite(self.kind.sprite(), self.animation_frame(assets, now_ms), body, 0.0, alpha);
        if now_ms < self.core.hit_flash_until {
            canvas.fill_rect(body, [255, 255, 255], 140);
        }
        for p in &self.core.death_particles {
            canvas.fill_rect(Rect::centered(p.position, p.size, p.size), p.color, p.alpha());
        }
    }
}
