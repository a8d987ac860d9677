//! Movement abilities and the firebolt cast.
//!
//! Each ability is gated by a skill-granted flag and its own cooldown
//! timestamp. Refusals come back as [`AbilityRefusal`] values the UI can
//! show; nothing changes when an ability is refused.

use std::fmt;

use thiserror::Error;

use crate::clock::FrameContext;
use crate::constants::*;
use crate::entity::Projectile;
use crate::geometry::Rect;

use super::Player;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Sprint,
    Dash,
    Blink,
    Firebolt,
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Ability::Sprint => "Sprint",
            Ability::Dash => "Dash",
            Ability::Blink => "Blink",
            Ability::Firebolt => "Firebolt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AbilityRefusal {
    #[error("{0} has not been learned")]
    Locked(Ability),
    #[error("{ability} is ready in {remaining_ms} ms")]
    Cooldown { ability: Ability, remaining_ms: u64 },
    #[error("{0} is already active")]
    Active(Ability),
    #[error("No room to blink")]
    Blocked,
    #[error("Not enough mana ({available:.0}/{needed:.0})")]
    InsufficientMana { needed: f32, available: f32 },
}

fn ready(ability: Ability, ready_at: u64, ctx: &FrameContext) -> Result<(), AbilityRefusal> {
    if ctx.now_ms < ready_at {
        return Err(AbilityRefusal::Cooldown {
            ability,
            remaining_ms: ready_at - ctx.now_ms,
        });
    }
    Ok(())
}

impl Player {
    pub fn is_sprinting(&self, now_ms: u64) -> bool {
        now_ms < self.sprint_until
    }

    pub fn is_dashing(&self, now_ms: u64) -> bool {
        now_ms < self.dash_until
    }

    /// Milliseconds until `ability` may be used again
    pub fn cooldown_remaining(&self, ability: Ability, now_ms: u64) -> u64 {
        let ready_at = match ability {
            Ability::Sprint => self.sprint_ready_at,
            Ability::Dash => self.dash_ready_at,
            Ability::Blink => self.blink_ready_at,
            Ability::Firebolt => 0,
        };
        ready_at.saturating_sub(now_ms)
    }

    pub fn sprint(&mut self, ctx: &FrameContext) -> Result<(), AbilityRefusal> {
        if !self.attributes.abilities.sprint {
            return Err(AbilityRefusal::Locked(Ability::Sprint));
        }
        if self.is_sprinting(ctx.now_ms) {
            return Err(AbilityRefusal::Active(Ability::Sprint));
        }
        ready(Ability::Sprint, self.sprint_ready_at, ctx)?;
        self.sprint_until = ctx.now_ms + SPRINT_DURATION_MS;
        self.sprint_ready_at = self.sprint_until + SPRINT_COOLDOWN_MS;
        Ok(())
    }

    pub fn dash(&mut self, ctx: &FrameContext) -> Result<(), AbilityRefusal> {
        if !self.attributes.abilities.dash {
            return Err(AbilityRefusal::Locked(Ability::Dash));
        }
        ready(Ability::Dash, self.dash_ready_at, ctx)?;
        self.dash_until = ctx.now_ms + DASH_DURATION_MS;
        self.dash_ready_at = ctx.now_ms + DASH_COOLDOWN_MS;
        Ok(())
    }

    /// Jump up to `BLINK_DISTANCE` along the facing. A blocked path is
    /// shortened to the farthest clear spot; if none exists the blink is
    /// refused and no cooldown starts.
    pub fn blink(&mut self, ctx: &FrameContext, solid: &[Rect]) -> Result<f32, AbilityRefusal> {
        if !self.attributes.abilities.blink {
            return Err(AbilityRefusal::Locked(Ability::Blink));
        }
        ready(Ability::Blink, self.blink_ready_at, ctx)?;

        let dir = self.facing.unit();
        let body = self.rect();
        let mut distance = BLINK_DISTANCE;
        while distance > 0.0 {
            let offset = dir * distance;
            let landing = body.translated(offset.x, offset.y);
            if !solid.iter().any(|r| r.intersects(&landing)) {
                break;
            }
            distance -= BLINK_STEP;
        }
        if distance <= 0.0 {
            return Err(AbilityRefusal::Blocked);
        }
        self.position += dir * distance;
        self.blink_ready_at = ctx.now_ms + BLINK_COOLDOWN_MS;
        Ok(distance)
    }

    /// Spend mana and launch a firebolt from the facing edge
    pub fn cast_firebolt(&mut self, ctx: &FrameContext) -> Result<Projectile, AbilityRefusal> {
        if !self.attributes.abilities.firebolt {
            return Err(AbilityRefusal::Locked(Ability::Firebolt));
        }
        if !self.attributes.spend_mana(FIREBOLT_MANA_COST) {
            return Err(AbilityRefusal::InsufficientMana {
                needed: FIREBOLT_MANA_COST,
                available: self.attributes.mana,
            });
        }
        Ok(Projectile::firebolt(
            self.rect(),
            self.facing,
            self.attributes.intelligence,
            ctx.now_ms,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{Facing, SkillEffect};

    fn player_with(effects: &[SkillEffect]) -> Player {
        let mut p = Player::new(200.0, 200.0, INVENTORY_DEFAULT_CAPACITY);
        for effect in effects {
            p.apply_skill_effect(*effect);
        }
        p
    }

    #[test]
    fn test_locked_abilities_refused() {
        let mut p = player_with(&[]);
        let ctx = FrameContext::at(0);
        assert_eq!(p.sprint(&ctx), Err(AbilityRefusal::Locked(Ability::Sprint)));
        assert_eq!(p.dash(&ctx), Err(AbilityRefusal::Locked(Ability::Dash)));
        assert!(matches!(p.cast_firebolt(&ctx), Err(AbilityRefusal::Locked(Ability::Firebolt))));
    }

    #[test]
    fn test_sprint_duration_and_cooldown() {
        let mut p = player_with(&[SkillEffect::EnableSprint]);
        p.sprint(&FrameContext::at(0)).unwrap();
        assert_eq!(p.speed(100), p.base_speed * SPRINT_MULTIPLIER);
        assert_eq!(p.speed(SPRINT_DURATION_MS), p.base_speed);
        let early = p.sprint(&FrameContext::at(SPRINT_DURATION_MS + 100));
        assert!(matches!(early, Err(AbilityRefusal::Cooldown { .. })));
        assert!(p.sprint(&FrameContext::at(SPRINT_DURATION_MS + SPRINT_COOLDOWN_MS)).is_ok());
    }

    #[test]
    fn test_dash_overrides_sprint_speed() {
        let mut p = player_with(&[SkillEffect::EnableSprint, SkillEffect::EnableDash]);
        let ctx = FrameContext::at(0);
        p.sprint(&ctx).unwrap();
        p.dash(&ctx).unwrap();
        assert_eq!(p.speed(50), p.base_speed * DASH_MULTIPLIER);
        assert_eq!(p.cooldown_remaining(Ability::Dash, 700), DASH_COOLDOWN_MS - 700);
    }

    #[test]
    fn test_blink_full_distance() {
        let mut p = player_with(&[SkillEffect::EnableBlink]);
        p.facing = Facing::Right;
        assert_eq!(p.blink(&FrameContext::at(0), &[]), Ok(BLINK_DISTANCE));
        assert_eq!(p.position.x, 200.0 + BLINK_DISTANCE);
        assert!(p.blink(&FrameContext::at(10), &[]).is_err());
    }

    #[test]
    fn test_blink_shortened_by_wall() {
        let mut p = player_with(&[SkillEffect::EnableBlink]);
        p.facing = Facing::Right;
        let wall = Rect::new(280.0, 150.0, 40.0, 200.0);
        let moved = p.blink(&FrameContext::at(0), &[wall]).unwrap();
        assert_eq!(moved, 48.0);
        assert!(!p.rect().intersects(&wall));
    }

    #[test]
    fn test_blocked_blink_has_no_cooldown() {
        let mut p = player_with(&[SkillEffect::EnableBlink]);
        p.facing = Facing::Up;
        let wall = Rect::new(150.0, 100.0, 200.0, 99.0);
        assert_eq!(p.blink(&FrameContext::at(0), &[wall]), Err(AbilityRefusal::Blocked));
        assert_eq!(p.cooldown_remaining(Ability::Blink, 0), 0);
        assert_eq!(p.position, glam::Vec2::new(200.0, 200.0));
    }

    #[test]
    fn test_firebolt_costs_mana() {
        let mut p = player_with(&[SkillEffect::EnableFirebolt]);
        p.attributes.mana = 1.0;
        let bolt = p.cast_firebolt(&FrameContext::at(0)).unwrap();
        assert!(bolt.alive);
        assert_eq!(p.attributes.mana, 0.0);
        assert!(matches!(
            p.cast_firebolt(&FrameContext::at(16)),
            Err(AbilityRefusal::InsufficientMana { .. })
        ));
    }
}
