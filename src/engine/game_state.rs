//! Core game state - owns the simulation data.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::GameClock;
use crate::constants::*;
use crate::entity::{Entity, ItemKind};
use crate::events::{EventQueue, GameEvent};
use crate::player::Player;
use crate::world::{random_block_within, World};

/// Everything the simulation mutates
pub struct GameState {
    pub player: Player,
    pub world: World,

    /// Game clock (simulation time)
    pub clock: GameClock,

    /// Events raised this frame, drained by the engine
    pub events: EventQueue,

    /// World RNG; every random draw in the simulation goes through it
    pub rng: StdRng,

    pub seed: u64,
}

impl GameState {
    /// A fresh game: the origin block around the player plus the two
    /// artifacts hidden a few blocks out
    pub fn new(seed: u64, inventory_capacity: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut world = World::new(seed as u32);
        let mut player = Player::spawn(inventory_capacity);
        world.enter_origin(&mut player, &mut rng);

        let mut state = Self {
            player,
            world,
            clock: GameClock::new(),
            events: EventQueue::new(),
            rng,
            seed,
        };
        state.hide_artifact(ItemKind::AncientScroll, SCROLL_BLOCK_DISTANCE);
        state.hide_artifact(ItemKind::DragonHeart, HEART_BLOCK_DISTANCE);
        tracing::info!("New game with seed {}", seed);
        state
    }

    fn hide_artifact(&mut self, kind: ItemKind, (near, far): (u32, u32)) {
        let coords = random_block_within(near, far, &mut self.rng);
        self.world.place_special_item(kind, Some(coords), None, &mut self.rng);
    }

    /// Send a dead player back to the origin spawn with full pools.
    /// Progression and the world are kept.
    pub fn respawn_player(&mut self) {
        if let Some(block) = self.world.current_block_mut() {
            block.entities.retain(|e| !matches!(e, Entity::Projectile(_)));
        }
        let player = &mut self.player;
        player.respawn();
        self.world.current_block_coords = (0, 0);

        tracing::info!("Player died at level {}; respawned at the origin", player.attributes.level);
        self.events.push(GameEvent::PlayerDied {
            level: player.attributes.level,
        });
    }
}
