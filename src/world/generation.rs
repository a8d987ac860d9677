//! Block population.
//!
//! A fresh block gets scenery and a budget of enemy levels. Nothing is
//! placed inside the safe area around the player's entry point, and
//! placements keep a small gap from each other so the block stays walkable.

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::constants::*;
use crate::enemy::Enemy;
use crate::entity::{Bonfire, Entity, ItemKind, ItemPickup, Terrain};
use crate::geometry::Rect;

use super::block::WorldBlock;
use super::difficulty::{choose_enemy, difficulty_factor, difficulty_level, difficulty_points};

/// Placement bookkeeping for one block
pub struct Placement {
    pub safe_area: Rect,
    placed: Vec<Rect>,
}

impl Placement {
    pub fn new(safe_area: Rect) -> Self {
        Self {
            safe_area,
            placed: Vec::new(),
        }
    }

    /// Seed with rects already present in a block
    pub fn with_existing(safe_area: Rect, existing: Vec<Rect>) -> Self {
        Self {
            safe_area,
            placed: existing,
        }
    }

    pub fn is_free(&self, rect: &Rect) -> bool {
        if rect.intersects(&self.safe_area) {
            return false;
        }
        let padded = rect.inflated(PLACEMENT_SEPARATION);
        !self.placed.iter().any(|r| r.intersects(&padded))
    }

    pub fn claim(&mut self, rect: Rect) {
        self.placed.push(rect);
    }

    /// Sample a free top-left position for a `width × height` rect
    pub fn sample(&mut self, width: f32, height: f32, attempts: usize, rng: &mut impl Rng) -> Option<Vec2> {
        for _ in 0..attempts {
            let x = rng.gen_range(0.0..=(SCREEN_WIDTH - width));
            let y = rng.gen_range(0.0..=(SCREEN_HEIGHT - height));
            let rect = Rect::new(x, y, width, height);
            if self.is_free(&rect) {
                self.claim(rect);
                return Some(Vec2::new(x, y));
            }
        }
        None
    }
}

/// Counter handing out unique enemy ids
pub trait IdSource {
    fn next_id(&mut self) -> u64;
}

impl IdSource for u64 {
    fn next_id(&mut self) -> u64 {
        let id = *self;
        *self += 1;
        id
    }
}

/// Meadow density in 0..1 for a block, smooth across neighbours
pub fn grass_density(perlin: &Perlin, x: i32, y: i32) -> f64 {
    let v = perlin.get([
        x as f64 * GRASS_NOISE_SCALE + 0.5,
        y as f64 * GRASS_NOISE_SCALE + 0.5,
    ]);
    ((v + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Top-left of a `size` square centred at `spawn + offset`
fn fixture_origin(spawn: Vec2, offset: (f32, f32), size: u32) -> Vec2 {
    spawn + Vec2::new(offset.0, offset.1) - Vec2::splat(size as f32 / 2.0)
}

/// Fill a new block. `entry` is the player's rect on arrival.
pub fn populate_block(
    block: &mut WorldBlock,
    entry: Rect,
    perlin: &Perlin,
    ids: &mut impl IdSource,
    rng: &mut impl Rng,
) {
    puffin::profile_function!();

    let (bx, by) = block.coords();
    let spawn = entry.center();
    let mut safe_area = Rect::centered(spawn, SAFE_AREA_SIZE, SAFE_AREA_SIZE);

    // Fixtures at the origin: bonfire to the northeast, potion to the southwest
    if (bx, by) == (0, 0) {
        let fire = fixture_origin(spawn, BONFIRE_SPAWN_OFFSET, BONFIRE_SIZE);
        let bonfire = Bonfire::new(fire.x, fire.y);
        let potion_at = fixture_origin(spawn, POTION_SPAWN_OFFSET, ITEM_SIZE);
        let potion = ItemPickup::new(ItemKind::HealthPotion, potion_at.x, potion_at.y);
        safe_area = safe_area
            .union(&Entity::Bonfire(bonfire.clone()).rect().inflated(PLACEMENT_SEPARATION))
            .union(&Entity::Item(potion.clone()).rect().inflated(PLACEMENT_SEPARATION));
        block.entities.push(Entity::Bonfire(bonfire));
        block.entities.push(Entity::Item(potion));
    }

    let mut placement = Placement::new(safe_area);

    let density = grass_density(perlin, bx, by);
    let grass_count = rng.gen_range(GRASS_COUNT_MIN..=GRASS_COUNT_MAX) + (density * GRASS_NOISE_BONUS).floor() as usize;
    for _ in 0..grass_count {
        let size = GRASS_SIZE as f32;
        if let Some(at) = placement.sample(size, size, PLACEMENT_ATTEMPTS, rng) {
            let variant = rng.gen_range(0..GRASS_VARIANTS);
            block.entities.push(Entity::Grass(Terrain::grass(at.x, at.y, variant)));
        }
    }

    let rock_count = rng.gen_range(ROCK_COUNT_MIN..=ROCK_COUNT_MAX);
    for _ in 0..rock_count {
        let size = ROCK_SIZE as f32;
        if let Some(at) = placement.sample(size, size, PLACEMENT_ATTEMPTS, rng) {
            let variant = rng.gen_range(0..ROCK_VARIANTS);
            block.entities.push(Entity::Rock(Terrain::rock(at.x, at.y, variant)));
        }
    }

    let level = difficulty_level(bx, by);
    let factor = difficulty_factor(bx, by);
    let total = difficulty_points(level, rng);
    let cap = ((total as f32) * ENEMY_LEVEL_BUDGET_SHARE).ceil().max(1.0) as u32;
    let mut remaining = total;
    let mut attempts = 0;
    let mut spawned = 0;
    while remaining > 0 && attempts < ENEMY_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let (kind, enemy_type) = choose_enemy(level, rng);
        let max_level = remaining.min(cap).clamp(ENEMY_MIN_LEVEL, ENEMY_MAX_LEVEL);
        let enemy_level = rng.gen_range(ENEMY_MIN_LEVEL..=max_level);
        let size = ENEMY_SIZE as f32;
        let Some(at) = placement.sample(size, size, 1, rng) else {
            continue;
        };
        let mut enemy = Enemy::new(ids.next_id(), kind, enemy_type, at.x, at.y);
        enemy.set_level(enemy_level, factor);
        block.entities.push(Entity::Enemy(enemy));
        remaining = remaining.saturating_sub(enemy_level);
        spawned += 1;
    }

    block.visited = true;
    tracing::info!(
        "Generated block {} at ({}, {}): difficulty {} ({} points), {} enemies, {} entities",
        block.block_id,
        bx,
        by,
        level,
        total,
        spawned,
        block.entities.len()
    );
}

/// Place an item at `position`, or at a random free spot if that is absent
/// or blocked. Returns where it landed.
pub fn place_item(
    block: &mut WorldBlock,
    kind: ItemKind,
    position: Option<Vec2>,
    keep_clear: Rect,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let size = ITEM_SIZE as f32;
    let existing = block.entities.iter().map(Entity::rect).collect();
    let mut placement = Placement::with_existing(keep_clear, existing);
    let at = match position {
        Some(p) if placement.is_free(&Rect::new(p.x, p.y, size, size)) => p,
        _ => placement.sample(size, size, PLACEMENT_ATTEMPTS * 4, rng)?,
    };
    block.entities.push(Entity::Item(ItemPickup::new(kind, at.x, at.y)));
    Some(at)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry() -> Rect {
        Rect::new(384.0, 284.0, PLAYER_SIZE as f32, PLAYER_SIZE as f32)
    }

    #[test]
    fn test_origin_has_fixtures() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut ids = 0u64;
        let mut block = WorldBlock::new("block_0", 0, 0);
        populate_block(&mut block, entry(), &Perlin::new(1), &mut ids, &mut rng);
        assert_eq!(block.count_kind(EntityKind::Bonfire), 1);
        assert_eq!(block.count_kind(EntityKind::Item), 1);
        assert!(block.visited);

        let bonfire = block
            .entities
            .iter()
            .find(|e| e.kind() == EntityKind::Bonfire)
            .map(Entity::rect)
            .expect("bonfire");
        assert!(bonfire.center().x > entry().center().x);
        assert!(bonfire.center().y < entry().center().y);
    }

    #[test]
    fn test_nothing_blocks_entry_and_no_overlaps() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut ids = 0u64;
            let mut block = WorldBlock::new("block_1", 3, -2);
            populate_block(&mut block, entry(), &Perlin::new(7), &mut ids, &mut rng);
            let safe = Rect::centered(entry().center(), SAFE_AREA_SIZE, SAFE_AREA_SIZE);
            let rects: Vec<Rect> = block.entities.iter().map(Entity::rect).collect();
            for (i, a) in rects.iter().enumerate() {
                assert!(!a.intersects(&safe), "seed {} entity {} in safe area", seed, i);
                for b in &rects[i + 1..] {
                    assert!(!a.intersects(b), "seed {} overlap", seed);
                }
            }
        }
    }

    #[test]
    fn test_enemy_levels_fit_budget() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut ids = 100u64;
        let mut block = WorldBlock::new("block_2", 0, 1);
        populate_block(&mut block, entry(), &Perlin::new(2), &mut ids, &mut rng);
        let enemies: Vec<_> = block.enemies().collect();
        assert!(!enemies.is_empty());
        // Tier 2 allows at most 8 points and distance 1 adds no level boost
        let levels: u32 = enemies.iter().map(|e| e.level()).sum();
        assert!(levels <= 8);
        let mut seen: Vec<u64> = enemies.iter().map(|e| e.core.id).collect();
        seen.dedup();
        assert_eq!(seen.len(), enemies.len());
        assert!(ids > 100);
    }

    #[test]
    fn test_place_item_avoids_existing() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut block = WorldBlock::new("block_0", 0, 0);
        block.entities.push(Entity::Rock(Terrain::rock(100.0, 100.0, 0)));
        let landed = place_item(
            &mut block,
            ItemKind::AncientScroll,
            Some(Vec2::new(110.0, 110.0)),
            Rect::EMPTY,
            &mut rng,
        )
        .expect("room available");
        assert_ne!(landed, Vec2::new(110.0, 110.0));
        let scroll = Rect::new(landed.x, landed.y, ITEM_SIZE as f32, ITEM_SIZE as f32);
        assert!(!scroll.intersects(&Rect::new(100.0, 100.0, ROCK_SIZE as f32, ROCK_SIZE as f32)));
    }
}
