//! Game simulation - one fixed-rate frame of the current block.

use glam::Vec2;

use crate::clock::FrameContext;
use crate::entity::Entity;
use crate::events::GameEvent;
use crate::input::Action;
use crate::player::AbilityRefusal;
use crate::world::Edge;

use super::GameState;

/// What happened during one frame that the engine reacts to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Screen edge crossed into a neighbouring block
    pub transition: Option<Edge>,
    /// Entities dropped from the current block
    pub removed: usize,
    pub player_died: bool,
}

/// Advance the world by one frame: player, block entities, transition,
/// then cleanup
pub fn advance_frame(state: &mut GameState, ctx: &FrameContext, intent: Vec2) -> FrameReport {
    puffin::profile_function!();

    let GameState {
        player,
        world,
        rng,
        events,
        ..
    } = state;

    {
        puffin::profile_scope!("player");
        world.update_player(player, ctx, intent, events);
    }
    {
        puffin::profile_scope!("block_entities");
        world.update_current_block_entities(player, ctx, rng, events);
    }
    let transition = world.check_player_block_transition(player, rng, events);
    let removed = world.remove_dead_entities();

    let player_died = player.is_dead();
    if player_died {
        state.respawn_player();
    }
    FrameReport {
        transition,
        removed,
        player_died,
    }
}

/// Apply one gameplay button press. Refusals come back for the UI to show;
/// the game state is unchanged when one is returned.
pub fn perform_action(state: &mut GameState, ctx: &FrameContext, action: Action) -> Result<(), AbilityRefusal> {
    let player = &mut state.player;
    match action {
        Action::Swing => {
            player.start_swing();
        }
        Action::Sprint => player.sprint(ctx)?,
        Action::Dash => player.dash(ctx)?,
        Action::Blink => {
            let solid = state
                .world
                .current_block()
                .map(|b| b.solid_rects())
                .unwrap_or_default();
            let distance = player.blink(ctx, &solid)?;
            tracing::debug!("Blinked {:.0} px {:?}", distance, player.facing);
        }
        Action::Firebolt => {
            let bolt = player.cast_firebolt(ctx)?;
            state.world.spawn_in_current(Entity::Projectile(bolt));
        }
        Action::Interact => {
            let rested = state
                .world
                .nearest_bonfire(player.center())
                .is_some_and(|bonfire| player.rest_at(bonfire));
            if rested {
                tracing::info!("Rested at bonfire");
                state.events.push(GameEvent::Rested);
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::entity::EntityKind;

    fn state() -> GameState {
        GameState::new(11, INVENTORY_DEFAULT_CAPACITY)
    }

    #[test]
    fn test_firebolt_needs_the_skill_and_mana() {
        let mut s = state();
        let ctx = FrameContext::at(100);
        assert!(matches!(
            perform_action(&mut s, &ctx, Action::Firebolt),
            Err(AbilityRefusal::Locked(_))
        ));

        s.player.attributes.abilities.firebolt = true;
        perform_action(&mut s, &ctx, Action::Firebolt).unwrap();
        let bolts = s.world.current_block().map_or(0, |b| b.count_kind(EntityKind::Projectile));
        assert_eq!(bolts, 1);

        s.player.attributes.mana = 0.0;
        assert!(matches!(
            perform_action(&mut s, &ctx, Action::Firebolt),
            Err(AbilityRefusal::InsufficientMana { .. })
        ));
    }

    #[test]
    fn test_interact_rests_only_near_bonfire() {
        let mut s = state();
        let ctx = FrameContext::at(100);
        s.player.attributes.health = 1.0;
        s.player.position = glam::Vec2::new(10.0, 10.0);
        perform_action(&mut s, &ctx, Action::Interact).unwrap();
        assert_eq!(s.player.attributes.health, 1.0);

        let bonfire = s.world.nearest_bonfire(s.player.center()).unwrap();
        s.player.position = bonfire - glam::Vec2::splat(PLAYER_SIZE as f32 / 2.0);
        perform_action(&mut s, &ctx, Action::Interact).unwrap();
        assert_eq!(s.player.attributes.health, s.player.attributes.max_health);
        assert!(s.events.iter().any(|e| matches!(e, GameEvent::Rested)));
    }

    #[test]
    fn test_frame_crossing_edge_reports_transition() {
        let mut s = state();
        s.player.position = glam::Vec2::new(SCREEN_WIDTH - 10.0, 284.0);
        let report = advance_frame(&mut s, &FrameContext::at(16), glam::Vec2::X);
        assert_eq!(report.transition, Some(Edge::Right));
        assert_eq!(s.world.current_block_coords, (1, 0));
        assert!(!report.player_died);
    }

    #[test]
    fn test_dead_player_respawns_after_frame() {
        let mut s = state();
        s.player.attributes.health = 0.0;
        let report = advance_frame(&mut s, &FrameContext::at(16), glam::Vec2::ZERO);
        assert!(report.player_died);
        assert_eq!(s.player.attributes.health, s.player.attributes.max_health);
    }
}
