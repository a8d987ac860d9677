//! Item kinds and the pickups that lie around in blocks.

use glam::Vec2;

use crate::assets::{AssetCatalog, SpriteId};
use crate::clock::FrameContext;
use crate::constants::*;
use crate::geometry::Rect;
use crate::render::Canvas;

use super::EntityBehavior;

/// Everything the player can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    HealthPotion,
    ManaPotion,
    AncientScroll,
    DragonHeart,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::HealthPotion,
        ItemKind::ManaPotion,
        ItemKind::AncientScroll,
        ItemKind::DragonHeart,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::HealthPotion => "Health Potion",
            ItemKind::ManaPotion => "Mana Potion",
            ItemKind::AncientScroll => "Ancient Scroll",
            ItemKind::DragonHeart => "Dragon Heart",
        }
    }

    /// Category tag written to save files
    pub fn category(&self) -> &'static str {
        match self {
            ItemKind::HealthPotion | ItemKind::ManaPotion => "potion",
            ItemKind::AncientScroll | ItemKind::DragonHeart => "artifact",
        }
    }

    pub fn from_name(name: &str) -> Option<ItemKind> {
        ItemKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Stackable items share one inventory slot with a count
    pub fn is_stackable(&self) -> bool {
        matches!(self, ItemKind::HealthPotion | ItemKind::ManaPotion)
    }

    /// Artifacts take effect the moment they are picked up
    pub fn is_artifact(&self) -> bool {
        matches!(self, ItemKind::AncientScroll | ItemKind::DragonHeart)
    }

    pub fn sprite(&self) -> SpriteId {
        match self {
            ItemKind::HealthPotion => SpriteId::HealthPotion,
            ItemKind::ManaPotion => SpriteId::ManaPotion,
            ItemKind::AncientScroll => SpriteId::AncientScroll,
            ItemKind::DragonHeart => SpriteId::DragonHeart,
        }
    }
}

/// An item lying in the world, waiting to be walked over
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPickup {
    pub kind: ItemKind,
    /// Resting position; drawing bobs around it
    pub position: Vec2,
    pub collected: bool,
    bob_offset: f32,
    /// Overlapping the player last frame
    touching: bool,
}

impl ItemPickup {
    pub fn new(kind: ItemKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            position: Vec2::new(x, y),
            collected: false,
            bob_offset: 0.0,
            touching: false,
        }
    }

    /// Record whether the player overlaps this pickup. Returns true only on
    /// the first frame of a new contact.
    pub fn touch(&mut self, overlapping: bool) -> bool {
        let first = overlapping && !self.touching;
        self.touching = overlapping;
        first
    }

    pub fn update(&mut self, ctx: &FrameContext) {
        let phase = ctx.now_ms as f32 / 300.0 + self.position.x * 0.05;
        self.bob_offset = phase.sin() * ITEM_BOB_AMPLITUDE;
    }
}

impl EntityBehavior for ItemPickup {
    fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, ITEM_SIZE as f32, ITEM_SIZE as f32)
    }

    fn draw(&self, canvas: &mut dyn Canvas, _assets: &AssetCatalog, _now_ms: u64) {
        let rect = self.rect().translated(0.0, self.bob_offset);
        canvas.draw_sprite(self.kind.sprite(), 0, rect, 0.0, 255);
    }

    fn is_collectible(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ItemKind::ALL {
            assert_eq!(ItemKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ItemKind::from_name("Cursed Sock"), None);
    }

    #[test]
    fn test_artifacts_do_not_stack() {
        assert!(ItemKind::HealthPotion.is_stackable());
        assert!(!ItemKind::AncientScroll.is_stackable());
        assert!(ItemKind::DragonHeart.is_artifact());
    }

    #[test]
    fn test_touch_reports_new_contact_once() {
        let mut item = ItemPickup::new(ItemKind::ManaPotion, 0.0, 0.0);
        assert!(item.touch(true));
        assert!(!item.touch(true));
        assert!(!item.touch(false));
        assert!(item.touch(true));
    }

    #[test]
    fn test_bobbing_keeps_resting_position() {
        let mut item = ItemPickup::new(ItemKind::HealthPotion, 10.0, 20.0);
        item.update(&FrameContext::at(450));
        assert_eq!(item.position, Vec2::new(10.0, 20.0));
        assert!(item.bob_offset.abs() <= ITEM_BOB_AMPLITUDE);
    }
}
