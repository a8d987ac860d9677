//! The world: an infinite sparse grid of screen-sized blocks.
//!
//! Blocks are generated lazily the first time the player walks into them
//! and kept forever after, so a revisited block is exactly as the player
//! left it. Only the current block is simulated.

mod block;
mod difficulty;
mod generation;
mod transition;
mod update;

pub use block::WorldBlock;
pub use difficulty::{block_distance, choose_enemy, difficulty_factor, difficulty_level, difficulty_points};
pub use generation::{grass_density, place_item, populate_block, IdSource, Placement};
pub use transition::{crossed_edge, entry_position, resolve_safe_spawn, Edge};

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use glam::Vec2;
use noise::Perlin;
use rand::Rng;

use crate::constants::*;
use crate::entity::{Entity, ItemKind};
use crate::events::{EventQueue, GameEvent};
use crate::geometry::Rect;
use crate::particles::StuckParticleTable;
use crate::player::Player;

pub struct World {
    pub blocks: HashMap<(i32, i32), WorldBlock>,
    pub current_block_coords: (i32, i32),
    /// Monotonic counter behind `block_<n>` ids
    pub next_block_id: u64,
    /// Monotonic counter for enemy ids
    pub next_entity_id: u64,
    pub stuck_particles: StuckParticleTable,
    perlin: Perlin,
}

impl World {
    pub fn new(noise_seed: u32) -> Self {
        Self {
            blocks: HashMap::new(),
            current_block_coords: (0, 0),
            next_block_id: 0,
            next_entity_id: 1,
            stuck_particles: StuckParticleTable::new(),
            perlin: Perlin::new(noise_seed),
        }
    }

    pub fn current_block(&self) -> Option<&WorldBlock> {
        self.blocks.get(&self.current_block_coords)
    }

    pub fn current_block_mut(&mut self) -> Option<&mut WorldBlock> {
        self.blocks.get_mut(&self.current_block_coords)
    }

    /// Return the block at `coords`, generating and populating it first if
    /// it has never been visited. `entry` is the player's rect on arrival.
    pub fn get_or_generate_block(
        &mut self,
        coords: (i32, i32),
        entry: Rect,
        rng: &mut impl Rng,
    ) -> (&mut WorldBlock, bool) {
        match self.blocks.entry(coords) {
            Entry::Occupied(slot) => (slot.into_mut(), false),
            Entry::Vacant(slot) => {
                let id = format!("block_{}", self.next_block_id);
                self.next_block_id += 1;
                let mut block = WorldBlock::new(id, coords.0, coords.1);
                populate_block(&mut block, entry, &self.perlin, &mut self.next_entity_id, rng);
                (slot.insert(block), true)
            }
        }
    }

    /// Put the player in the origin block, generating it around them
    pub fn enter_origin(&mut self, player: &mut Player, rng: &mut impl Rng) {
        self.current_block_coords = (0, 0);
        player.current_block = (0, 0);
        self.get_or_generate_block((0, 0), player.rect(), rng);
    }

    /// Place an artifact or potion. Without coordinates a random block 2 to
    /// 4 blocks out is chosen; without a position a random free spot is.
    /// Returns the block and top-left the item landed at.
    pub fn place_special_item(
        &mut self,
        kind: ItemKind,
        coords: Option<(i32, i32)>,
        position: Option<Vec2>,
        rng: &mut impl Rng,
    ) -> Option<((i32, i32), Vec2)> {
        let (near, far) = SCROLL_BLOCK_DISTANCE;
        let coords = coords.unwrap_or_else(|| random_block_within(near, far, rng));
        let spawn = screen_center_rect();
        let keep_clear = Rect::centered(spawn.center(), SAFE_AREA_SIZE, SAFE_AREA_SIZE);
        let (block, _) = self.get_or_generate_block(coords, spawn, rng);
        let landed = place_item(block, kind, position, keep_clear, rng);
        match landed {
            Some(at) => tracing::info!(
                "Placed {} in block ({}, {}) at ({:.0}, {:.0})",
                kind.name(),
                coords.0,
                coords.1,
                at.x,
                at.y
            ),
            None => tracing::warn!("No room for {} in block ({}, {})", kind.name(), coords.0, coords.1),
        }
        landed.map(|at| (coords, at))
    }

    /// Move the player into the neighbouring block if they crossed a screen
    /// edge this frame. Returns the edge crossed.
    pub fn check_player_block_transition(
        &mut self,
        player: &mut Player,
        rng: &mut impl Rng,
        events: &mut EventQueue,
    ) -> Option<Edge> {
        let edge = crossed_edge(&player.rect())?;
        let from = self.current_block_coords;
        let to = edge.neighbour(from);

        // Bolts in flight do not follow the player
        if let Some(old) = self.blocks.get_mut(&from) {
            old.entities.retain(|e| !matches!(e, Entity::Projectile(_)));
        }

        let size = PLAYER_SIZE as f32;
        let drop_in = entry_position(edge, player.position, size);
        let entry = Rect::new(drop_in.x, drop_in.y, size, size);
        let (block, generated) = self.get_or_generate_block(to, entry, rng);
        let landed = resolve_safe_spawn(block, edge, drop_in, size);
        let block_id = block.block_id.clone();

        player.position = landed;
        player.current_block = to;
        player.particles.clear();
        self.current_block_coords = to;

        tracing::info!(
            "Entered block {} at ({}, {}) via {:?} edge{}",
            block_id,
            to.0,
            to.1,
            edge,
            if generated { " (new)" } else { "" }
        );
        events.push(GameEvent::BlockEntered { coords: to, generated });
        Some(edge)
    }

    /// Drop finished entities from the current block
    pub fn remove_dead_entities(&mut self) -> usize {
        self.current_block_mut().map_or(0, WorldBlock::remove_dead)
    }

    /// Nearest bonfire centre in the current block
    pub fn nearest_bonfire(&self, to: Vec2) -> Option<Vec2> {
        self.current_block()?
            .entities
            .iter()
            .filter_map(|e| match e {
                Entity::Bonfire(b) => Some(b.center()),
                _ => None,
            })
            .min_by(|a, b| a.distance(to).total_cmp(&b.distance(to)))
    }

    pub fn spawn_in_current(&mut self, entity: Entity) {
        if let Some(block) = self.current_block_mut() {
            block.entities.push(entity);
        }
    }

    /// Swap in a restored set of blocks, as a load does
    pub fn replace_blocks(
        &mut self,
        blocks: HashMap<(i32, i32), WorldBlock>,
        current_block_coords: (i32, i32),
        next_block_id: u64,
    ) {
        let highest_enemy = blocks
            .values()
            .flat_map(|b| b.enemies())
            .map(|e| e.core.id)
            .max()
            .unwrap_or(0);
        self.blocks = blocks;
        self.current_block_coords = current_block_coords;
        self.next_block_id = next_block_id;
        self.next_entity_id = self.next_entity_id.max(highest_enemy + 1);
        self.stuck_particles.clear();
    }
}

/// Player-sized rect at the centre of the screen
pub fn screen_center_rect() -> Rect {
    let size = PLAYER_SIZE as f32;
    Rect::centered(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0), size, size)
}

/// A random block whose distance from the origin lies in `near..=far`
pub fn random_block_within(near: u32, far: u32, rng: &mut impl Rng) -> (i32, i32) {
    let d = rng.gen_range(near..=far.max(near)) as i32;
    let dx = rng.gen_range(-d..=d);
    let rest = d - dx.abs();
    let dy = if rng.gen_bool(0.5) { rest } else { -rest };
    (dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, Terrain};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(seed: u64) -> (World, Player, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut world = World::new(seed as u32);
        let mut player = Player::spawn(INVENTORY_DEFAULT_CAPACITY);
        world.enter_origin(&mut player, &mut rng);
        (world, player, rng)
    }

    #[test]
    fn test_origin_generated_once() {
        let (mut world, mut player, mut rng) = setup(1);
        assert_eq!(world.blocks.len(), 1);
        assert_eq!(world.current_block().map(|b| b.block_id.as_str()), Some("block_0"));
        world.enter_origin(&mut player, &mut rng);
        assert_eq!(world.blocks.len(), 1);
        assert_eq!(world.next_block_id, 1);
    }

    #[test]
    fn test_revisit_keeps_block() {
        let (mut world, _player, mut rng) = setup(2);
        let entry = screen_center_rect();
        let (block, generated) = world.get_or_generate_block((3, 1), entry, &mut rng);
        assert!(generated);
        let id = block.block_id.clone();
        let snapshot = block.clone();

        let (again, generated) = world.get_or_generate_block((3, 1), entry, &mut rng);
        assert!(!generated);
        assert_eq!(again.block_id, id);
        assert_eq!(*again, snapshot);
    }

    #[test]
    fn test_crossing_an_edge_happens_once() {
        let (mut world, mut player, mut rng) = setup(3);
        let mut events = EventQueue::new();
        player.position = Vec2::new(SCREEN_WIDTH - PLAYER_SIZE as f32, 300.0);
        assert_eq!(world.check_player_block_transition(&mut player, &mut rng, &mut events), None);

        player.position.x += 1.0;
        let edge = world.check_player_block_transition(&mut player, &mut rng, &mut events);
        assert_eq!(edge, Some(Edge::Right));
        assert_eq!(world.current_block_coords, (1, 0));
        assert_eq!(player.current_block, (1, 0));
        assert_eq!(world.check_player_block_transition(&mut player, &mut rng, &mut events), None);
        let east_id = world.current_block().map(|b| b.block_id.clone());

        // Walk straight back out the left edge
        player.position.x = -1.0;
        assert_eq!(
            world.check_player_block_transition(&mut player, &mut rng, &mut events),
            Some(Edge::Left)
        );
        assert_eq!(world.current_block_coords, (0, 0));
        assert_eq!(world.blocks.len(), 2);
        assert_eq!(world.current_block().map(|b| b.block_id.as_str()), Some("block_0"));

        player.position.x = SCREEN_WIDTH;
        world.check_player_block_transition(&mut player, &mut rng, &mut events);
        assert_eq!(world.current_block().map(|b| b.block_id.clone()), east_id);
        assert_eq!(world.blocks.len(), 2);

        let entered: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::BlockEntered { generated, .. } => Some(*generated),
                _ => None,
            })
            .collect();
        assert_eq!(entered, vec![true, false, false]);
    }

    #[test]
    fn test_transition_onto_grass_lands_clear() {
        let (mut world, mut player, mut rng) = setup(4);
        let mut events = EventQueue::new();
        let mut east = WorldBlock::new("block_9", 1, 0);
        east.visited = true;
        east.entities.push(Entity::Grass(Terrain::grass(10.0, 50.0, 0)));
        world.blocks.insert((1, 0), east);

        player.position = Vec2::new(SCREEN_WIDTH - PLAYER_SIZE as f32 + 2.0, 50.0);
        world.check_player_block_transition(&mut player, &mut rng, &mut events);

        let block = world.current_block().expect("east block");
        assert_eq!(block.block_id, "block_9");
        let body = player.rect();
        for entity in &block.entities {
            if entity.kind() == EntityKind::Grass {
                assert!(!entity.rect().intersects(&body));
            }
        }
    }

    #[test]
    fn test_place_special_item_in_random_far_block() {
        let (mut world, _player, mut rng) = setup(5);
        let (coords, at) = world
            .place_special_item(ItemKind::AncientScroll, None, None, &mut rng)
            .expect("placed");
        let d = block_distance(coords.0, coords.1);
        assert!((2..=4).contains(&d));
        let block = &world.blocks[&coords];
        let scrolls: Vec<_> = block
            .entities
            .iter()
            .filter_map(|e| match e {
                Entity::Item(item) if item.kind == ItemKind::AncientScroll => Some(item.position),
                _ => None,
            })
            .collect();
        assert_eq!(scrolls, vec![at]);
    }

    #[test]
    fn test_random_block_distance() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..200 {
            let (x, y) = random_block_within(5, 7, &mut rng);
            assert!((5..=7).contains(&block_distance(x, y)));
        }
    }
}
