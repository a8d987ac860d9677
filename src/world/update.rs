//! Per-frame update of the current block.
//!
//! Order within a frame: player movement and contact damage, sword, enemies,
//! projectiles, then souls, items and the bonfire, then particles. Damage
//! applied early in the frame is visible to everything after it.

use glam::Vec2;
use rand::Rng;

use crate::clock::FrameContext;
use crate::enemy::EnemyAction;
use crate::entity::{Entity, EntityBehavior};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::Rect;
use crate::particles::EffectKind;
use crate::player::Player;

use super::World;

impl World {
    /// Move the player by `intent` and run contact handlers of any enemy
    /// they end up touching
    pub fn update_player(&mut self, player: &mut Player, ctx: &FrameContext, intent: Vec2, events: &mut EventQueue) {
        let Some(block) = self.blocks.get_mut(&self.current_block_coords) else {
            return;
        };
        let solid = block.solid_rects();
        let enemies = block.enemy_rects();
        let contacts = player.update(ctx, intent, &solid, &enemies);

        for id in contacts {
            let Some(enemy) = block.enemy_mut(id) else {
                continue;
            };
            let Some(damage) = enemy.on_player_collision() else {
                continue;
            };
            if let Some(dealt) = player.take_damage(damage, Some(enemy.center()), ctx) {
                events.push(GameEvent::PlayerDamaged { amount: dealt });
            }
        }
    }

    /// Advance everything in the current block by one frame
    pub fn update_current_block_entities(
        &mut self,
        player: &mut Player,
        ctx: &FrameContext,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) {
        puffin::profile_function!();

        let coords = self.current_block_coords;
        let Some(block) = self.blocks.get_mut(&coords) else {
            return;
        };

        player.resolve_swing(block.enemies_mut(), ctx, rng, events);
        player.advance_swing();

        // Enemies: each sees the others where they stand right now
        let player_rect = player.rect();
        let mut obstacles: Vec<Rect> = block
            .entities
            .iter()
            .map(|e| if e.is_obstacle() { e.rect() } else { Rect::EMPTY })
            .collect();
        for (i, entity) in block.entities.iter_mut().enumerate() {
            let Entity::Enemy(enemy) = entity else {
                continue;
            };
            obstacles[i] = Rect::EMPTY;
            let action = enemy.update(ctx, player_rect, &obstacles, rng);
            obstacles[i] = enemy.rect();
            if let Some(EnemyAction::Attack { damage, source }) = action {
                if let Some(dealt) = player.take_damage(damage, Some(source), ctx) {
                    events.push(GameEvent::PlayerDamaged { amount: dealt });
                }
            }
        }

        // Projectiles: split around each bolt so it can reach every enemy
        for i in 0..block.entities.len() {
            let (before, rest) = block.entities.split_at_mut(i);
            let Some((current, after)) = rest.split_first_mut() else {
                break;
            };
            let Entity::Projectile(projectile) = current else {
                continue;
            };
            let previous = projectile.update(ctx, &mut player.particles, rng);
            let enemies = before
                .iter_mut()
                .chain(after.iter_mut())
                .filter_map(Entity::as_enemy_mut);
            projectile.resolve_hits(previous, enemies, ctx, &mut player.particles, rng, events);
        }

        let player_center = player.center();
        let player_rect = player.rect();
        for entity in block.entities.iter_mut() {
            match entity {
                Entity::Soul(soul) => {
                    let Some(xp) = soul.update(ctx, player_center) else {
                        continue;
                    };
                    player.particles.spawn_effect(EffectKind::Xp, player_center, rng);
                    events.push(GameEvent::SoulCollected { xp });
                    for up in player.gain_xp(xp) {
                        events.push(GameEvent::LevelUp { new_level: up.new_level });
                    }
                }
                Entity::Item(item) => {
                    item.update(ctx);
                    let overlapping = !item.collected && item.rect().intersects(&player_rect);
                    let first_contact = item.touch(overlapping);
                    if !overlapping {
                        continue;
                    }
                    let name = item.kind.name().to_string();
                    if player.collect_item(item.kind) {
                        item.collected = true;
                        tracing::info!("Picked up {}", name);
                        events.push(GameEvent::ItemCollected { name });
                    } else if first_contact {
                        tracing::warn!("Inventory full; {} left on the ground", name);
                        events.push(GameEvent::InventoryFull { name });
                    }
                }
                Entity::Bonfire(bonfire) => bonfire.update(ctx, &mut player.particles, rng),
                _ => {}
            }
        }

        let terrain = block.terrain_rects();
        player.particles.update(&terrain);
        self.stuck_particles.add(coords, player.particles.take_graduated());
        self.stuck_particles.tick(coords);
    }
}
