//! Entities that live inside a world block.
//!
//! A block holds a heterogeneous, ordered list of entities. Each kind is a
//! plain struct implementing [`EntityBehavior`]; [`Entity`] is the tagged
//! variant the block stores, so capability checks are `match`es on the tag
//! rather than runtime introspection.

mod item;
mod projectile;
mod soul;
mod terrain;

pub use item::{ItemKind, ItemPickup};
pub use projectile::{
    firebolt_damage, firebolt_lifespan_ms, firebolt_radius, firebolt_speed, FireboltTraits,
    Projectile, ProjectileKind,
};
pub use soul::Soul;
pub use terrain::{Bonfire, Terrain};

use crate::assets::AssetCatalog;
use crate::enemy::Enemy;
use crate::geometry::Rect;
use crate::render::Canvas;

/// Behaviour shared by everything that can sit in a block
pub trait EntityBehavior {
    /// Collision rectangle in screen pixels
    fn rect(&self) -> Rect;

    /// Frame indices come from the sheet layouts in `assets`
    fn draw(&self, canvas: &mut dyn Canvas, assets: &AssetCatalog, now_ms: u64);

    /// Pick-ups never block movement
    fn is_collectible(&self) -> bool {
        false
    }

    /// Draw order key; larger values are drawn later (in front)
    fn z_order(&self) -> f32 {
        self.rect().bottom()
    }
}

/// Tag used for save files and load ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Bonfire,
    Item,
    Grass,
    Rock,
    Soul,
    Enemy,
    Projectile,
}

/// One entity in a block
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Grass(Terrain),
    Rock(Terrain),
    Bonfire(Bonfire),
    Item(ItemPickup),
    Soul(Soul),
    Projectile(Projectile),
    Enemy(Enemy),
}

impl Entity {
    fn behavior(&self) -> &dyn EntityBehavior {
        match self {
            Entity::Grass(t) | Entity::Rock(t) => t,
            Entity::Bonfire(b) => b,
            Entity::Item(i) => i,
            Entity::Soul(s) => s,
            Entity::Projectile(p) => p,
            Entity::Enemy(e) => e,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Grass(_) => EntityKind::Grass,
            Entity::Rock(_) => EntityKind::Rock,
            Entity::Bonfire(_) => EntityKind::Bonfire,
            Entity::Item(_) => EntityKind::Item,
            Entity::Soul(_) => EntityKind::Soul,
            Entity::Projectile(_) => EntityKind::Projectile,
            Entity::Enemy(_) => EntityKind::Enemy,
        }
    }

    pub fn rect(&self) -> Rect {
        self.behavior().rect()
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, assets: &AssetCatalog, now_ms: u64) {
        self.behavior().draw(canvas, assets, now_ms)
    }

    pub fn z_order(&self) -> f32 {
        self.behavior().z_order()
    }

    pub fn is_collectible(&self) -> bool {
        self.behavior().is_collectible()
    }

    /// Whether this entity blocks movement
    pub fn is_obstacle(&self) -> bool {
        !self.is_collectible() && !matches!(self, Entity::Projectile(_)) && !self.rect().is_empty()
    }

    /// Scenery that blood can stick to
    pub fn is_terrain(&self) -> bool {
        matches!(self, Entity::Grass(_) | Entity::Rock(_) | Entity::Bonfire(_))
    }

    /// True once the entity has finished its lifecycle and should leave the block
    pub fn should_remove(&self) -> bool {
        match self {
            Entity::Enemy(e) => e.core.should_remove,
            Entity::Item(i) => i.collected,
            Entity::Soul(s) => s.collected,
            Entity::Projectile(p) => !p.alive,
            Entity::Grass(_) | Entity::Rock(_) | Entity::Bonfire(_) => false,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Entity::Enemy(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_enemy_mut(&mut self) -> Option<&mut Enemy> {
        match self {
            Entity::Enemy(e) => Some(e),
            _ => None,
        }
    }
}
