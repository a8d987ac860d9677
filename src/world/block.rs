//! One screen-sized chunk of the world.

use crate::enemy::Enemy;
use crate::entity::{Entity, EntityBehavior, EntityKind};
use crate::geometry::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct WorldBlock {
    pub block_id: String,
    pub x_coord: i32,
    pub y_coord: i32,
    pub visited: bool,
    pub entities: Vec<Entity>,
}

impl WorldBlock {
    pub fn new(block_id: impl Into<String>, x_coord: i32, y_coord: i32) -> Self {
        Self {
            block_id: block_id.into(),
            x_coord,
            y_coord,
            visited: false,
            entities: Vec::new(),
        }
    }

    pub fn coords(&self) -> (i32, i32) {
        (self.x_coord, self.y_coord)
    }

    /// Rects of everything that blocks movement, enemies included
    pub fn obstacle_rects(&self) -> Vec<Rect> {
        self.entities
            .iter()
            .filter(|e| e.is_obstacle())
            .map(Entity::rect)
            .collect()
    }

    /// Rects of obstacles the player cannot walk through (everything but enemies)
    pub fn solid_rects(&self) -> Vec<Rect> {
        self.entities
            .iter()
            .filter(|e| e.is_obstacle() && e.kind() != EntityKind::Enemy)
            .map(Entity::rect)
            .collect()
    }

    /// Scenery rects blood can stick to
    pub fn terrain_rects(&self) -> Vec<Rect> {
        self.entities
            .iter()
            .filter(|e| e.is_terrain())
            .map(Entity::rect)
            .collect()
    }

    /// Ids and rects of living enemies
    pub fn enemy_rects(&self) -> Vec<(u64, Rect)> {
        self.entities
            .iter()
            .filter_map(Entity::as_enemy)
            .filter(|e| !e.is_dying())
            .map(|e| (e.core.id, e.rect()))
            .collect()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.entities.iter().filter_map(Entity::as_enemy)
    }

    pub fn enemies_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.entities.iter_mut().filter_map(Entity::as_enemy_mut)
    }

    pub fn enemy_mut(&mut self, id: u64) -> Option<&mut Enemy> {
        self.enemies_mut().find(|e| e.core.id == id)
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    /// Drop finished entities. Enemies leaving after their death animation
    /// hand over their soul, which is appended to the block. Returns the
    /// number of entities removed.
    pub fn remove_dead(&mut self) -> usize {
        let souls: Vec<Entity> = self
            .entities
            .iter_mut()
            .filter(|e| e.should_remove())
            .filter_map(Entity::as_enemy_mut)
            .filter_map(Enemy::drop_soul)
            .map(Entity::Soul)
            .collect();
        let before = self.entities.len();
        self.entities.retain(|e| !e.should_remove());
        let removed = before - self.entities.len();
        self.entities.extend(souls);
        removed
    }

    /// Whether `rect` overlaps any entity that blocks movement
    pub fn is_blocked(&self, rect: &Rect) -> bool {
        self.entities.iter().any(|e| e.is_obstacle() && e.rect().intersects(rect))
    }
}
