//! Player inventory.
//!
//! Items keep pickup order. Stackable kinds occupy one slot and carry a
//! count in `counts`; every name in `counts` has exactly one slot, and
//! non-stackable items never appear there.

use std::collections::BTreeMap;

use crate::constants::INVENTORY_DEFAULT_CAPACITY;
use crate::entity::ItemKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    items: Vec<ItemKind>,
    counts: BTreeMap<String, u32>,
    capacity: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(INVENTORY_DEFAULT_CAPACITY)
    }
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            counts: BTreeMap::new(),
            capacity,
        }
    }

    pub fn items(&self) -> &[ItemKind] {
        &self.items
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Units held of `kind` (1 per slot for non-stackables)
    pub fn count(&self, kind: ItemKind) -> u32 {
        if kind.is_stackable() {
            self.counts.get(kind.name()).copied().unwrap_or(0)
        } else {
            self.items.iter().filter(|k| **k == kind).count() as u32
        }
    }

    pub fn contains(&self, kind: ItemKind) -> bool {
        self.items.contains(&kind)
    }

    /// Whether `kind` would fit
    pub fn has_room_for(&self, kind: ItemKind) -> bool {
        (kind.is_stackable() && self.counts.contains_key(kind.name())) || self.items.len() < self.capacity
    }

    /// Add one unit. Returns false, changing nothing, when there is no room.
    pub fn add(&mut self, kind: ItemKind) -> bool {
        if !self.has_room_for(kind) {
            return false;
        }
        if kind.is_stackable() {
            if let Some(count) = self.counts.get_mut(kind.name()) {
                *count += 1;
                return true;
            }
            self.counts.insert(kind.name().to_string(), 1);
        }
        self.items.push(kind);
        true
    }

    /// Remove one unit from `slot`; the slot disappears with its last unit
    pub fn remove_one(&mut self, slot: usize) -> Option<ItemKind> {
        let kind = *self.items.get(slot)?;
        if kind.is_stackable() {
            if let Some(count) = self.counts.get_mut(kind.name()) {
                *count -= 1;
                if *count > 0 {
                    return Some(kind);
                }
            }
            self.counts.remove(kind.name());
        }
        self.items.remove(slot);
        Some(kind)
    }

    /// Slot and count pairs in order, for save files and the character sheet
    pub fn entries(&self) -> Vec<(ItemKind, u32)> {
        self.items
            .iter()
            .map(|k| (*k, if k.is_stackable() { self.count(*k) } else { 1 }))
            .collect()
    }

    /// Replace the contents from saved entries. Duplicate stackable entries
    /// merge; entries past capacity are dropped.
    pub fn restore(&mut self, entries: &[(ItemKind, u32)]) {
        self.items.clear();
        self.counts.clear();
        for (kind, count) in entries {
            for _ in 0..(*count).max(1) {
                if !self.add(*kind) {
                    tracing::warn!("Inventory full while restoring {}; dropping it", kind.name());
                    break;
                }
                if !kind.is_stackable() {
                    break;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.counts.clear();
    }

    /// Checks the slot/count invariant
    pub fn is_consistent(&self) -> bool {
        let names_ok = self.counts.keys().all(|name| {
            self.items
                .iter()
                .filter(|k| k.name() == name.as_str() && k.is_stackable())
                .count()
                == 1
        });
        let stackables_ok = self
            .items
            .iter()
            .filter(|k| k.is_stackable())
            .all(|k| self.counts.get(k.name()).is_some_and(|c| *c > 0));
        names_ok && stackables_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stackables_share_a_slot() {
        let mut inv = Inventory::new(4);
        assert!(inv.add(ItemKind::HealthPotion));
        assert!(inv.add(ItemKind::HealthPotion));
        assert!(inv.add(ItemKind::AncientScroll));
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.count(ItemKind::HealthPotion), 2);
        assert_eq!(inv.count(ItemKind::AncientScroll), 1);
        assert!(inv.is_consistent());
    }

    #[test]
    fn test_full_inventory_refuses_new_slot() {
        let mut inv = Inventory::new(1);
        assert!(inv.add(ItemKind::ManaPotion));
        assert!(!inv.add(ItemKind::DragonHeart));
        // stacking onto an existing slot still works
        assert!(inv.add(ItemKind::ManaPotion));
        assert_eq!(inv.entries(), vec![(ItemKind::ManaPotion, 2)]);
    }

    #[test]
    fn test_remove_last_unit_clears_slot_and_count() {
        let mut inv = Inventory::new(4);
        inv.add(ItemKind::HealthPotion);
        inv.add(ItemKind::HealthPotion);
        assert_eq!(inv.remove_one(0), Some(ItemKind::HealthPotion));
        assert_eq!(inv.count(ItemKind::HealthPotion), 1);
        assert_eq!(inv.remove_one(0), Some(ItemKind::HealthPotion));
        assert!(inv.is_empty());
        assert_eq!(inv.count(ItemKind::HealthPotion), 0);
        assert!(inv.is_consistent());
        assert_eq!(inv.remove_one(0), None);
    }

    #[test]
    fn test_restore_rebuilds_counts() {
        let mut inv = Inventory::new(8);
        inv.restore(&[(ItemKind::HealthPotion, 3), (ItemKind::AncientScroll, 1)]);
        assert_eq!(inv.count(ItemKind::HealthPotion), 3);
        assert_eq!(inv.len(), 2);
        assert!(inv.is_consistent());
    }
}
