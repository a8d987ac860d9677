//! Game event system for decoupled communication between systems.
//!
//! Simulation code pushes events while it updates; the engine drains the
//! queue at the end of the frame and turns events into log lines and
//! dialogue balloons without the simulation knowing about either.

use std::path::PathBuf;

use glam::Vec2;

use crate::enemy::EnemyType;

/// Game events that systems can emit
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A sword swing or projectile damaged an enemy
    EnemyHit { position: Vec2, damage: f32 },
    /// An enemy entered its death animation
    EnemyDied {
        position: Vec2,
        enemy_type: EnemyType,
        level: u32,
    },
    /// The player took damage
    PlayerDamaged { amount: f32 },
    /// The player ran out of health and was sent back to the origin
    PlayerDied { level: u32 },
    /// A soul reached the player
    SoulCollected { xp: u32 },
    /// The player picked an item up
    ItemCollected { name: String },
    /// An item could not be picked up
    InventoryFull { name: String },
    /// Player leveled up
    LevelUp { new_level: u32 },
    /// A skill was unlocked
    SkillUnlocked { id: String },
    /// The player moved into another block
    BlockEntered { coords: (i32, i32), generated: bool },
    /// The player rested at a bonfire
    Rested,
    /// A save file was written
    GameSaved { path: PathBuf },
    /// A save file was loaded
    GameLoaded { path: PathBuf },
}

/// Events raised by the simulation during a frame; the engine drains them
/// into log lines and dialogue once the frame has run
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Queue an event for the end of the frame
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every pending event in the order raised
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Peek at pending events without consuming them
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}
