//! Dialogue balloons.
//!
//! Lines arrive on a bounded channel so a worker thread can feed it as well
//! as the engine. The engine pumps the channel once per frame; each line
//! becomes a balloon above the player for a few seconds. Scripted lines for
//! game events are the only built-in source.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use glam::Vec2;

use crate::events::GameEvent;
use crate::geometry::Rect;
use crate::render::Canvas;

/// Lines that may wait in the channel before new ones are dropped
pub const DIALOGUE_CHANNEL_CAPACITY: usize = 16;
/// How long a balloon stays up
pub const BALLOON_DURATION_MS: u64 = 3000;
/// Balloons shown at once; the oldest goes first
pub const MAX_BALLOONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balloon {
    pub text: String,
    pub until_ms: u64,
}

pub struct DialogueQueue {
    sender: SyncSender<String>,
    receiver: Receiver<String>,
    balloons: Vec<Balloon>,
}

impl DialogueQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::sync_channel(DIALOGUE_CHANNEL_CAPACITY);
        Self {
            sender,
            receiver,
            balloons: Vec::new(),
        }
    }

    /// A handle other threads can send lines through
    pub fn sender(&self) -> SyncSender<String> {
        self.sender.clone()
    }

    /// Queue a line without blocking; a full channel drops it
    pub fn say(&self, text: impl Into<String>) {
        match self.sender.try_send(text.into()) {
            Ok(()) => {}
            Err(TrySendError::Full(line)) => tracing::debug!("Dialogue channel full, dropped: {}", line),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    /// Move waiting lines into balloons and retire expired ones
    pub fn pump(&mut self, now_ms: u64) {
        loop {
            match self.receiver.try_recv() {
                Ok(text) => self.balloons.push(Balloon {
                    text,
                    until_ms: now_ms + BALLOON_DURATION_MS,
                }),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.balloons.retain(|b| b.until_ms > now_ms);
        let excess = self.balloons.len().saturating_sub(MAX_BALLOONS);
        self.balloons.drain(..excess);
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    pub fn clear(&mut self) {
        while self.receiver.try_recv().is_ok() {}
        self.balloons.clear();
    }
}

impl Default for DialogueQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Scripted line for an event, if it deserves one
pub fn scripted_line(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::LevelUp { new_level } => format!("Level {}! I feel stronger.", new_level),
        GameEvent::Rested => "The fire's warmth restores me.".to_string(),
        GameEvent::PlayerDied { .. } => "Back at the fire... that went badly.".to_string(),
        GameEvent::InventoryFull { name } => format!("No room for the {}.", name.to_lowercase()),
        GameEvent::ItemCollected { name } if name == "Ancient Scroll" => {
            "Old words... I understand my training better now.".to_string()
        }
        GameEvent::ItemCollected { name } if name == "Dragon Heart" => {
            "The heart still beats. Its strength flows into me.".to_string()
        }
        GameEvent::SkillUnlocked { id } => format!("I've learned {}.", id.replace('_', " ")),
        GameEvent::BlockEntered { generated: true, coords } if coords.0.abs() + coords.1.abs() >= 5 => {
            "These lands feel dangerous.".to_string()
        }
        GameEvent::GameSaved { .. } => "Progress saved.".to_string(),
        GameEvent::GameLoaded { .. } => "Where was I?".to_string(),
        _ => return None,
    };
    Some(line)
}

/// Stack balloons upward from just above the player's head
pub fn draw_balloons(canvas: &mut dyn Canvas, balloons: &[Balloon], speaker: Vec2) {
    for (i, balloon) in balloons.iter().rev().enumerate() {
        let width = 12.0 + balloon.text.chars().count() as f32 * 7.0;
        let center = speaker - Vec2::new(0.0, 36.0 + i as f32 * 26.0);
        let frame = Rect::centered(center, width, 22.0);
        canvas.fill_rect(frame, [250, 250, 240], 230);
        canvas.draw_text(&balloon.text, Vec2::new(frame.x + 6.0, frame.y + 4.0), [20, 20, 20]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_become_balloons_and_expire() {
        let mut queue = DialogueQueue::new();
        queue.say("hello");
        queue.pump(1000);
        assert_eq!(queue.balloons().len(), 1);
        assert_eq!(queue.balloons()[0].until_ms, 1000 + BALLOON_DURATION_MS);
        queue.pump(1000 + BALLOON_DURATION_MS);
        assert!(queue.balloons().is_empty());
    }

    #[test]
    fn test_worker_thread_can_send() {
        let mut queue = DialogueQueue::new();
        let sender = queue.sender();
        std::thread::spawn(move || {
            sender.send("from afar".to_string()).unwrap();
        })
        .join()
        .unwrap();
        queue.pump(0);
        assert_eq!(queue.balloons()[0].text, "from afar");
    }

    #[test]
    fn test_full_channel_drops_extra_lines() {
        let mut queue = DialogueQueue::new();
        for i in 0..DIALOGUE_CHANNEL_CAPACITY + 4 {
            queue.say(format!("line {}", i));
        }
        queue.pump(0);
        assert_eq!(queue.balloons().len(), MAX_BALLOONS);
        assert_eq!(
            queue.balloons().last().map(|b| b.text.clone()),
            Some(format!("line {}", DIALOGUE_CHANNEL_CAPACITY - 1))
        );
    }

    #[test]
    fn test_scripted_lines() {
        assert!(scripted_line(&GameEvent::LevelUp { new_level: 3 }).is_some());
        assert!(scripted_line(&GameEvent::EnemyHit {
            position: Vec2::ZERO,
            damage: 1.0
        })
        .is_none());
        assert!(scripted_line(&GameEvent::BlockEntered {
            coords: (1, 0),
            generated: true
        })
        .is_none());
    }
}
