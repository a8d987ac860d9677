//! Decoded input.
//!
//! The host turns keys, pads and clicks into [`InputEvent`]s. Held
//! directions become a movement intent each frame; button presses queue up
//! as [`Action`]s and are consumed once.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use crate::hud::UiIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// One-shot buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Swing,
    Sprint,
    Dash,
    Blink,
    Firebolt,
    Interact,
    ToggleInventory,
    ToggleCharacter,
    ToggleMap,
    Save,
    Load,
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Press(Direction),
    Release(Direction),
    /// Analogue stick; a zero vector hands control back to the keys
    Axis(Vec2),
    Action(Action),
    Ui(UiIntent),
}

/// Input accumulated between frames
#[derive(Debug, Default)]
pub struct InputState {
    held: [bool; 4],
    axis: Vec2,
    actions: VecDeque<Action>,
    intents: VecDeque<UiIntent>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::Press(dir) => self.held[dir.index()] = true,
            InputEvent::Release(dir) => self.held[dir.index()] = false,
            InputEvent::Axis(v) => self.axis = v.clamp_length_max(1.0),
            InputEvent::Action(action) => self.actions.push_back(action),
            InputEvent::Ui(intent) => self.intents.push_back(intent),
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held[dir.index()]
    }

    /// Movement intent in screen space (y grows downward)
    pub fn intent(&self) -> Vec2 {
        if self.axis != Vec2::ZERO {
            return self.axis;
        }
        let axis = |neg: Direction, pos: Direction| {
            (self.is_held(pos) as i32 - self.is_held(neg) as i32) as f32
        };
        Vec2::new(axis(Direction::Left, Direction::Right), axis(Direction::Up, Direction::Down))
    }

    pub fn take_actions(&mut self) -> Vec<Action> {
        self.actions.drain(..).collect()
    }

    pub fn take_intents(&mut self) -> Vec<UiIntent> {
        self.intents.drain(..).collect()
    }

    /// Forget held keys, e.g. when a menu opens
    pub fn release_all(&mut self) {
        self.held = [false; 4];
        self.axis = Vec2::ZERO;
    }
}

/// Headless input: wanders in straight runs, swinging now and then
pub struct WanderScript {
    heading: Option<Direction>,
    frames_left: u32,
}

impl WanderScript {
    pub fn new() -> Self {
        Self {
            heading: None,
            frames_left: 0,
        }
    }

    /// Events for the next frame
    pub fn next_events(&mut self, rng: &mut impl Rng) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.frames_left == 0 {
            if let Some(old) = self.heading.take() {
                events.push(InputEvent::Release(old));
            }
            let dir = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
            events.push(InputEvent::Press(dir));
            self.heading = Some(dir);
            self.frames_left = rng.gen_range(30..=180);
        }
        self.frames_left -= 1;

        if rng.gen_bool(0.05) {
            events.push(InputEvent::Action(Action::Swing));
        }
        if rng.gen_bool(0.005) {
            let action = [Action::Sprint, Action::Dash, Action::Blink, Action::Firebolt][rng.gen_range(0..4)];
            events.push(InputEvent::Action(action));
        }
        events
    }
}

impl Default for WanderScript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.apply(InputEvent::Press(Direction::Left));
        input.apply(InputEvent::Press(Direction::Down));
        assert_eq!(input.intent(), Vec2::new(-1.0, 1.0));
        input.apply(InputEvent::Press(Direction::Right));
        assert_eq!(input.intent(), Vec2::new(0.0, 1.0));
        input.apply(InputEvent::Release(Direction::Down));
        assert_eq!(input.intent(), Vec2::ZERO);
    }

    #[test]
    fn test_axis_overrides_keys() {
        let mut input = InputState::new();
        input.apply(InputEvent::Press(Direction::Up));
        input.apply(InputEvent::Axis(Vec2::new(3.0, 0.0)));
        assert_eq!(input.intent(), Vec2::X);
        input.apply(InputEvent::Axis(Vec2::ZERO));
        assert_eq!(input.intent(), Vec2::NEG_Y);
    }

    #[test]
    fn test_actions_consumed_once() {
        let mut input = InputState::new();
        input.apply(InputEvent::Action(Action::Swing));
        input.apply(InputEvent::Action(Action::Dash));
        assert_eq!(input.take_actions(), vec![Action::Swing, Action::Dash]);
        assert!(input.take_actions().is_empty());
    }

    #[test]
    fn test_wander_always_holds_one_direction() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut script = WanderScript::new();
        let mut input = InputState::new();
        for _ in 0..500 {
            for event in script.next_events(&mut rng) {
                input.apply(event);
            }
            let held = Direction::ALL.iter().filter(|d| input.is_held(**d)).count();
            assert_eq!(held, 1);
            input.take_actions();
        }
    }
}
