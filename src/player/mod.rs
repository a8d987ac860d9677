//! The player: movement, pools, items, skills and progression.
//!
//! Combat (sword swings, damage intake) lives in `combat`, movement
//! abilities in `abilities`. Everything else that only touches the player
//! itself is here.

mod abilities;
mod attributes;
mod combat;
mod inventory;
mod skills;
mod sword;

pub use abilities::{Ability, AbilityRefusal};
pub use attributes::{
    base_speed_for, sword_damage_for, AbilityFlags, LevelUp, PlayerAttributes, Stat, StatChange, XpTable,
};
pub use inventory::Inventory;
pub use skills::{Skill, SkillEffect, SkillTree, UnlockError};
pub use sword::{hitbox_size, swing_angle, swing_hitbox, Swing};

use glam::Vec2;

use crate::clock::FrameContext;
use crate::constants::*;
use crate::entity::ItemKind;
use crate::geometry::Rect;
use crate::particles::ParticleSystem;

/// Cardinal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    pub fn unit(&self) -> Vec2 {
        match self {
            Facing::Up => Vec2::NEG_Y,
            Facing::Down => Vec2::Y,
            Facing::Left => Vec2::NEG_X,
            Facing::Right => Vec2::X,
        }
    }

    /// Screen angle (0° right, 90° down)
    pub fn degrees(&self) -> f32 {
        match self {
            Facing::Right => 0.0,
            Facing::Down => 90.0,
            Facing::Left => 180.0,
            Facing::Up => 270.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }

    pub fn parse(name: &str) -> Option<Facing> {
        match name {
            "up" => Some(Facing::Up),
            "down" => Some(Facing::Down),
            "left" => Some(Facing::Left),
            "right" => Some(Facing::Right),
            _ => None,
        }
    }

    /// Facing for a movement vector; the dominant axis wins
    pub fn from_vector(v: Vec2) -> Option<Facing> {
        if v == Vec2::ZERO {
            None
        } else if v.x.abs() > v.y.abs() {
            Some(if v.x > 0.0 { Facing::Right } else { Facing::Left })
        } else {
            Some(if v.y > 0.0 { Facing::Down } else { Facing::Up })
        }
    }
}

/// Result of using an inventory slot
#[derive(Debug, Clone, PartialEq)]
pub enum UseOutcome {
    Healed(f32),
    ManaRestored(f32),
    /// The potion would do nothing; it was not consumed
    AlreadyFull(ItemKind),
    /// Informational only; nothing changed
    Feedback(&'static str),
    EmptySlot,
}

impl UseOutcome {
    pub fn message(&self) -> String {
        match self {
            UseOutcome::Healed(amount) => format!("Restored {:.0} health", amount),
            UseOutcome::ManaRestored(amount) => format!("Restored {:.0} mana", amount),
            UseOutcome::AlreadyFull(ItemKind::ManaPotion) => "Mana is already full".to_string(),
            UseOutcome::AlreadyFull(_) => "Health is already full".to_string(),
            UseOutcome::Feedback(text) => text.to_string(),
            UseOutcome::EmptySlot => "Nothing there".to_string(),
        }
    }
}

/// Top-left that centres the player on the screen
fn spawn_position() -> Vec2 {
    let size = PLAYER_SIZE as f32;
    Vec2::new((SCREEN_WIDTH - size) / 2.0, (SCREEN_HEIGHT - size) / 2.0)
}

#[derive(Debug)]
pub struct Player {
    /// Top-left corner
    pub position: Vec2,
    pub facing: Facing,
    pub attributes: PlayerAttributes,
    pub skills: SkillTree,
    pub inventory: Inventory,
    pub particles: ParticleSystem,
    pub current_block: (i32, i32),
    /// Walking speed in pixels per frame, refreshed from DEX
    pub base_speed: f32,

    swing: Option<Swing>,

    pub is_taking_damage: bool,
    damage_started: u64,
    damage_dir: Vec2,
    damage_strength: f32,
    pub invulnerable: bool,
    invulnerable_until: u64,

    sprint_until: u64,
    sprint_ready_at: u64,
    dash_until: u64,
    dash_ready_at: u64,
    blink_ready_at: u64,
    last_mana_regen: u64,
}

impl Player {
    pub fn new(x: f32, y: f32, inventory_capacity: usize) -> Self {
        let attributes = PlayerAttributes::new();
        Self {
            position: Vec2::new(x, y),
            facing: Facing::Down,
            base_speed: attributes.base_speed(),
            attributes,
            skills: SkillTree::new(),
            inventory: Inventory::new(inventory_capacity),
            particles: ParticleSystem::new(),
            current_block: (0, 0),
            swing: None,
            is_taking_damage: false,
            damage_started: 0,
            damage_dir: Vec2::ZERO,
            damage_strength: 0.0,
            invulnerable: false,
            invulnerable_until: 0,
            sprint_until: 0,
            sprint_ready_at: 0,
            dash_until: 0,
            dash_ready_at: 0,
            blink_ready_at: 0,
            last_mana_regen: 0,
        }
    }

    /// Player centred on the screen, as at the start of a new game
    pub fn spawn(inventory_capacity: usize) -> Self {
        let mut player = Self::new(0.0, 0.0, inventory_capacity);
        player.position = spawn_position();
        player
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, PLAYER_SIZE as f32, PLAYER_SIZE as f32)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn is_dead(&self) -> bool {
        self.attributes.health <= 0.0
    }

    /// Flashing while invulnerable
    pub fn is_visible(&self, now_ms: u64) -> bool {
        if !self.invulnerable {
            return true;
        }
        (now_ms.saturating_sub(self.damage_started) / PLAYER_FLASH_INTERVAL_MS) % 2 == 0
    }

    /// Current walking speed including sprint or dash
    pub fn speed(&self, now_ms: u64) -> f32 {
        let multiplier = if now_ms < self.dash_until {
            DASH_MULTIPLIER
        } else if now_ms < self.sprint_until {
            SPRINT_MULTIPLIER
        } else {
            1.0
        };
        self.base_speed * multiplier
    }

    /// Advance one frame. `solid` blocks movement; `enemies` never does, but
    /// ids of enemies touching the player afterwards are returned so their
    /// contact handlers can run.
    pub fn update(
        &mut self,
        ctx: &FrameContext,
        intent: Vec2,
        solid: &[Rect],
        enemies: &[(u64, Rect)],
    ) -> Vec<u64> {
        puffin::profile_function!();

        self.regenerate_mana(ctx);
        if self.invulnerable && ctx.now_ms >= self.invulnerable_until {
            self.invulnerable = false;
        }

        if self.is_taking_damage {
            self.update_damage_animation(ctx, solid);
        } else if let Some(facing) = Facing::from_vector(intent) {
            self.facing = facing;
            let velocity = intent.normalize_or_zero() * self.speed(ctx.now_ms);
            self.move_axis_separated(velocity, solid);
        }

        let body = self.rect();
        enemies
            .iter()
            .filter(|(_, rect)| rect.intersects(&body))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Apply x then y, each only if the moved rect hits nothing. Returns
    /// whether any axis moved.
    fn move_axis_separated(&mut self, delta: Vec2, solid: &[Rect]) -> bool {
        let mut moved = false;
        if delta.x != 0.0 {
            let next = self.rect().translated(delta.x, 0.0);
            if !solid.iter().any(|r| r.intersects(&next)) {
                self.position.x += delta.x;
                moved = true;
            }
        }
        if delta.y != 0.0 {
            let next = self.rect().translated(0.0, delta.y);
            if !solid.iter().any(|r| r.intersects(&next)) {
                self.position.y += delta.y;
                moved = true;
            }
        }
        moved
    }

    fn regenerate_mana(&mut self, ctx: &FrameContext) {
        if ctx.since(self.last_mana_regen) >= PLAYER_MANA_REGEN_INTERVAL_MS {
            self.last_mana_regen = ctx.now_ms;
            self.attributes.restore_mana(PLAYER_MANA_REGEN_AMOUNT);
        }
    }

    /// Add XP and log any levels gained
    pub fn gain_xp(&mut self, amount: u32) -> Vec<LevelUp> {
        let ups = self.attributes.gain_xp(amount);
        for up in &ups {
            tracing::info!(
                "Level up! Now level {} (+{} stat, +{} skill)",
                up.new_level,
                up.stat_points,
                up.skill_points
            );
        }
        ups
    }

    /// Spend a stat point and apply whatever it changed
    pub fn allocate_stat(&mut self, stat: Stat) -> Option<StatChange> {
        let change = self.attributes.allocate(stat)?;
        self.apply_stat_change(&change);
        Some(change)
    }

    pub fn apply_stat_change(&mut self, change: &StatChange) {
        if let Some(speed) = change.base_speed {
            self.base_speed = speed;
        }
    }

    pub fn unlock_skill(&mut self, id: &str) -> Result<SkillEffect, UnlockError> {
        let effect = self
            .skills
            .unlock(id, self.attributes.level, &mut self.attributes.skill_points)?;
        self.apply_skill_effect(effect);
        Ok(effect)
    }

    pub fn apply_skill_effect(&mut self, effect: SkillEffect) {
        let abilities = &mut self.attributes.abilities;
        match effect {
            SkillEffect::EnableSprint => abilities.sprint = true,
            SkillEffect::EnableDash => abilities.dash = true,
            SkillEffect::EnableBlink => abilities.blink = true,
            SkillEffect::EnableFirebolt => abilities.firebolt = true,
            SkillEffect::ExtendSword => {
                abilities.extended_sword = true;
                self.attributes.sword_length = SWORD_BASE_LENGTH * SWORD_EXTENDED_SCALE;
            }
            SkillEffect::Unavailable => {}
        }
    }

    /// Re-derive every computed field after attributes or skills were
    /// overwritten wholesale
    pub fn refresh_after_load(&mut self) {
        self.attributes.refresh_derived();
        self.base_speed = self.attributes.base_speed();
        self.attributes.abilities = AbilityFlags::default();
        self.attributes.sword_length = SWORD_BASE_LENGTH;
        let effects: Vec<SkillEffect> = self
            .skills
            .skills()
            .iter()
            .filter(|s| s.unlocked)
            .map(|s| s.effect)
            .collect();
        for effect in effects {
            self.apply_skill_effect(effect);
        }
        self.swing = None;
        self.is_taking_damage = false;
        self.invulnerable = false;
    }

    /// Back at the origin spawn with full pools after a death. Level,
    /// stats, skills and inventory stay; anything in flight is dropped.
    pub fn respawn(&mut self) {
        self.position = spawn_position();
        self.facing = Facing::Down;
        self.current_block = (0, 0);
        self.attributes.restore_all();
        self.particles.clear();
        self.swing = None;
        self.is_taking_damage = false;
        self.damage_strength = 0.0;
        self.invulnerable = false;
        self.invulnerable_until = 0;
        self.sprint_until = 0;
        self.sprint_ready_at = 0;
        self.dash_until = 0;
        self.dash_ready_at = 0;
        self.blink_ready_at = 0;
    }

    /// Pick an item up. Artifacts apply their XP table switch here, once.
    pub fn collect_item(&mut self, kind: ItemKind) -> bool {
        if !self.inventory.add(kind) {
            return false;
        }
        match kind {
            ItemKind::AncientScroll if !self.attributes.found_ancient_scroll => {
                self.attributes.found_ancient_scroll = true;
                tracing::info!("Ancient Scroll found; XP table now x{}", XP_MULTIPLIER_SCROLL);
            }
            ItemKind::DragonHeart if !self.attributes.found_dragon_heart => {
                self.attributes.found_dragon_heart = true;
                tracing::info!("Dragon Heart found; XP table now x{}", XP_MULTIPLIER_HEART);
            }
            _ => {}
        }
        true
    }

    pub fn use_item(&mut self, slot: usize) -> UseOutcome {
        let Some(kind) = self.inventory.items().get(slot).copied() else {
            return UseOutcome::EmptySlot;
        };
        match kind {
            ItemKind::HealthPotion => {
                if self.attributes.health >= self.attributes.max_health {
                    return UseOutcome::AlreadyFull(kind);
                }
                self.inventory.remove_one(slot);
                UseOutcome::Healed(self.attributes.heal(HEALTH_POTION_HEAL))
            }
            ItemKind::ManaPotion => {
                if self.attributes.mana >= self.attributes.max_mana {
                    return UseOutcome::AlreadyFull(kind);
                }
                self.inventory.remove_one(slot);
                UseOutcome::ManaRestored(self.attributes.restore_mana(MANA_POTION_RESTORE))
            }
            ItemKind::AncientScroll => {
                UseOutcome::Feedback("The scroll's wisdom already guides your growth.")
            }
            ItemKind::DragonHeart => UseOutcome::Feedback("The dragon's heart already beats within you."),
        }
    }

    /// Rest if a bonfire centre is within reach
    pub fn rest_at(&mut self, bonfire_center: Vec2) -> bool {
        if self.center().distance(bonfire_center) > BONFIRE_REST_RADIUS {
            return false;
        }
        self.attributes.restore_all();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(100.0, 100.0, INVENTORY_DEFAULT_CAPACITY)
    }

    #[test]
    fn test_axis_separated_slide_along_wall() {
        let mut p = player();
        let wall = Rect::new(132.0, 0.0, 20.0, 400.0);
        p.update(&FrameContext::at(16), Vec2::new(1.0, 1.0), &[wall], &[]);
        assert_eq!(p.position.x, 100.0);
        assert!(p.position.y > 100.0);
    }

    #[test]
    fn test_respawn_drops_swing_and_ability_timers() {
        let mut p = player();
        p.attributes.abilities.sprint = true;
        p.attributes.abilities.dash = true;
        let ctx = FrameContext::at(1000);
        assert!(p.start_swing());
        p.sprint(&ctx).unwrap();
        p.dash(&ctx).unwrap();
        p.attributes.health = 0.0;

        p.respawn();
        assert!(p.current_swing_angle().is_none());
        assert!(!p.is_sprinting(1001));
        assert!(!p.is_dashing(1001));
        assert_eq!(p.speed(1001), p.base_speed);
        assert_eq!(p.cooldown_remaining(Ability::Dash, 1001), 0);
        assert_eq!(p.position, Player::spawn(0).position);
        assert_eq!(p.current_block, (0, 0));
        assert_eq!(p.attributes.health, p.attributes.max_health);
    }

    #[test]
    fn test_enemy_contact_does_not_block() {
        let mut p = player();
        let enemy = Rect::new(133.0, 100.0, 32.0, 32.0);
        let contacts = p.update(&FrameContext::at(16), Vec2::X, &[], &[(9, enemy)]);
        assert!(p.position.x > 100.0);
        assert_eq!(contacts, vec![9]);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn test_scroll_switches_xp_table_on_pickup() {
        let mut p = player();
        p.attributes.level = 4;
        assert_eq!(p.attributes.xp_needed(), 33);
        assert!(p.collect_item(ItemKind::AncientScroll));
        assert!(p.attributes.found_ancient_scroll);
        assert_eq!(p.attributes.xp_table(), XpTable::AncientScroll);
        assert_eq!(p.attributes.xp_needed(), 21);
        assert_eq!(p.attributes.xp_table().xp_needed(5), 28);
        assert_eq!(p.use_item(0), UseOutcome::Feedback("The scroll's wisdom already guides your growth."));
        assert_eq!(p.inventory.count(ItemKind::AncientScroll), 1);
    }

    #[test]
    fn test_health_potion_use() {
        let mut p = player();
        p.collect_item(ItemKind::HealthPotion);
        assert_eq!(p.use_item(0), UseOutcome::AlreadyFull(ItemKind::HealthPotion));
        p.attributes.health = 2.0;
        assert_eq!(p.use_item(0), UseOutcome::Healed(HEALTH_POTION_HEAL));
        assert!(p.inventory.is_empty());
        assert_eq!(p.use_item(0), UseOutcome::EmptySlot);
    }

    #[test]
    fn test_unlock_applies_effect() {
        let mut p = player();
        p.attributes.level = 3;
        p.attributes.skill_points = 1;
        p.unlock_skill("extended_sword").expect("unlockable");
        assert!(p.attributes.abilities.extended_sword);
        assert_eq!(p.attributes.sword_length, SWORD_BASE_LENGTH * SWORD_EXTENDED_SCALE);
        assert_eq!(p.attributes.skill_points, 0);
    }

    #[test]
    fn test_refresh_after_load_reapplies_skills() {
        let mut p = player();
        p.skills.restore_unlocked("sprint");
        p.skills.restore_unlocked("extended_sword");
        p.attributes.dexterity = 5;
        p.refresh_after_load();
        assert!(p.attributes.abilities.sprint);
        assert!(!p.attributes.abilities.dash);
        assert_eq!(p.base_speed, base_speed_for(5));
        assert!(p.attributes.sword_length > SWORD_BASE_LENGTH);
    }

    #[test]
    fn test_allocate_dex_updates_speed() {
        let mut p = player();
        p.attributes.stat_points = 2;
        p.allocate_stat(Stat::Dexterity);
        p.allocate_stat(Stat::Dexterity);
        assert_eq!(p.base_speed, base_speed_for(3));
        assert!(p.allocate_stat(Stat::Strength).is_none());
    }

    #[test]
    fn test_mana_regenerates_over_time() {
        let mut p = player();
        p.attributes.mana = 0.0;
        p.update(&FrameContext::at(PLAYER_MANA_REGEN_INTERVAL_MS), Vec2::ZERO, &[], &[]);
        assert_eq!(p.attributes.mana, PLAYER_MANA_REGEN_AMOUNT);
        p.update(&FrameContext::at(PLAYER_MANA_REGEN_INTERVAL_MS + 16), Vec2::ZERO, &[], &[]);
        assert_eq!(p.attributes.mana, PLAYER_MANA_REGEN_AMOUNT);
    }

    #[test]
    fn test_rest_requires_proximity() {
        let mut p = player();
        p.attributes.health = 1.0;
        assert!(!p.rest_at(p.center() + Vec2::new(200.0, 0.0)));
        assert!(p.rest_at(p.center() + Vec2::new(40.0, 0.0)));
        assert_eq!(p.attributes.health, p.attributes.max_health);
    }
}
