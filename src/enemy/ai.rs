//! Reactive enemy AI.
//!
//! No pathfinding: slimes random-walk, skeletons walk straight at a player
//! they can see and swing once in range. Both step functions run only when
//! the enemy is neither knocked back nor recovering.

use glam::Vec2;
use rand::Rng;

use crate::clock::FrameContext;
use crate::constants::*;
use crate::geometry::Rect;

use super::{EnemyAction, EnemyCore, EnemyState};

/// A random unit vector
pub(super) fn random_direction(rng: &mut impl Rng) -> Vec2 {
    Vec2::from_angle(rng.gen_range(0.0..std::f32::consts::TAU))
}

fn start_idle(core: &mut EnemyCore, ctx: &FrameContext, rng: &mut impl Rng) {
    core.set_state(EnemyState::Idle);
    core.state_until = ctx.now_ms + rng.gen_range(ENEMY_IDLE_MIN_MS..=ENEMY_IDLE_MAX_MS);
}

fn start_moving(core: &mut EnemyCore, ctx: &FrameContext, rng: &mut impl Rng) {
    core.set_state(EnemyState::Moving);
    core.move_dir = random_direction(rng);
    core.state_until = ctx.now_ms + rng.gen_range(ENEMY_MOVE_MIN_MS..=ENEMY_MOVE_MAX_MS);
}

/// Idle/move random walk shared by every enemy kind
pub(super) fn wander(core: &mut EnemyCore, ctx: &FrameContext, obstacles: &[Rect], rng: &mut impl Rng) {
    match core.state {
        EnemyState::Idle | EnemyState::Attacking => {
            if ctx.now_ms >= core.state_until {
                start_moving(core, ctx, rng);
            }
        }
        EnemyState::Moving => {
            if ctx.now_ms >= core.state_until {
                start_idle(core, ctx, rng);
                return;
            }
            let step = core.move_dir * core.attributes.speed();
            if !core.try_move(step, obstacles, ENEMY_SCREEN_MARGIN) {
                let chance = rng.gen_range(ENEMY_TURN_CHANCE_MIN..=ENEMY_TURN_CHANCE_MAX);
                if rng.gen_bool(chance) {
                    core.move_dir = random_direction(rng);
                }
            }
        }
        EnemyState::Dying => {}
    }
}

/// Slimes never attack; they hurt on contact while wandering
pub(super) fn slime_step(
    core: &mut EnemyCore,
    ctx: &FrameContext,
    obstacles: &[Rect],
    rng: &mut impl Rng,
) -> Option<EnemyAction> {
    wander(core, ctx, obstacles, rng);
    None
}

/// Detect, chase and swing at the player
pub(super) fn skeleton_step(
    core: &mut EnemyCore,
    ctx: &FrameContext,
    player_rect: Rect,
    obstacles: &[Rect],
    rng: &mut impl Rng,
) -> Option<EnemyAction> {
    if core.state == EnemyState::Attacking {
        if ctx.now_ms < core.attack_until {
            return None;
        }
        start_idle(core, ctx, rng);
    }

    let center = core.center();
    let to_player = player_rect.center() - center;
    let distance = to_player.length();

    if distance <= SKELETON_ATTACK_RANGE {
        if ctx.now_ms >= core.attack_ready_at {
            core.set_state(EnemyState::Attacking);
            core.attack_until = ctx.now_ms + SKELETON_ATTACK_DURATION_MS;
            core.attack_ready_at = core.attack_until + SKELETON_ATTACK_COOLDOWN_MS;
            return Some(EnemyAction::Attack {
                damage: core.attributes.attack,
                source: center,
            });
        }
        return None;
    }

    if distance <= SKELETON_DETECTION_RANGE {
        core.set_state(EnemyState::Moving);
        core.state_until = ctx.now_ms;
        core.move_dir = to_player / distance;
        let step = core.move_dir * core.attributes.speed();
        core.try_move(step, obstacles, ENEMY_SCREEN_MARGIN);
        return None;
    }

    wander(core, ctx, obstacles, rng);
    None
}
