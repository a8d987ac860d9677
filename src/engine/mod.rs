//! Game engine - owns all game state and provides a clean API to the host.
//!
//! The engine handles:
//! - Game state (player, world, clock, RNG)
//! - Input processing and menu toggles
//! - Simulation advancement at a fixed frame delta
//! - Event processing into logs and dialogue
//! - Saving and loading
//!
//! The host (main.rs, or a windowed shell) only handles:
//! - Turning device input into [`InputEvent`]s
//! - Calling [`GameEngine::tick`] once per frame
//! - Providing a [`Canvas`] to draw into

mod fade;
mod game_state;
mod simulation;

pub use fade::TransitionFade;
pub use game_state::GameState;
pub use simulation::{advance_frame, perform_action, FrameReport};

use std::path::{Path, PathBuf};

use crate::assets::AssetCatalog;
use crate::config::GameConfig;
use crate::dialogue::{scripted_line, DialogueQueue};
use crate::events::GameEvent;
use crate::hud::{MenuScreen, UiIntent};
use crate::input::{Action, InputEvent, InputState};
use crate::render::{render_frame, Canvas, Scene};
use crate::save::SaveManager;

/// Result of a game tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickResult {
    /// The player asked to quit
    pub quit: bool,
    /// False while a menu holds the simulation paused
    pub simulated: bool,
    pub report: FrameReport,
}

/// The game engine - owns all game state and simulation logic.
pub struct GameEngine {
    pub config: GameConfig,

    /// Core game state (player, world, clock)
    pub state: GameState,

    pub input: InputState,

    /// Balloons shown over the player's head
    pub dialogue: DialogueQueue,

    pub fade: TransitionFade,

    /// Open menu; the simulation is paused while one is shown
    pub menu: Option<MenuScreen>,

    pub saves: SaveManager,

    /// Sprite sheets and their frame layouts
    pub assets: AssetCatalog,
}

impl GameEngine {
    /// Engine drawing from the sheets in `config.asset_dir`
    pub fn new(config: GameConfig) -> Self {
        let assets = AssetCatalog::load(&config.asset_dir);
        Self::with_assets(config, assets)
    }

    pub fn with_assets(config: GameConfig, assets: AssetCatalog) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let state = GameState::new(seed, config.inventory_capacity);
        let saves = SaveManager::new(config.save_dir.clone());
        Self {
            config,
            state,
            input: InputState::new(),
            dialogue: DialogueQueue::new(),
            fade: TransitionFade::default(),
            menu: None,
            saves,
            assets,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.state.clock.now_ms
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.apply(event);
    }

    /// Run one frame: menu intents, button presses, then (unless a menu is
    /// open) the simulation, then events into dialogue
    pub fn tick(&mut self) -> TickResult {
        puffin::profile_function!();

        let mut result = TickResult::default();
        for intent in self.input.take_intents() {
            self.apply_ui_intent(intent);
        }

        let actions = self.input.take_actions();
        let paused = self.menu.is_some() || actions.iter().any(|a| toggled_menu(*a).is_some());
        let ctx = if paused {
            self.state.clock.frame(0)
        } else {
            self.state.clock.advance(self.config.frame_ms())
        };

        for action in actions {
            match action {
                Action::Quit => result.quit = true,
                Action::Save => {
                    self.save();
                }
                Action::Load => {
                    self.load_latest();
                }
                other => {
                    if let Some(screen) = toggled_menu(other) {
                        self.toggle_menu(screen);
                    } else if self.menu.is_none() {
                        if let Err(refusal) = perform_action(&mut self.state, &ctx, other) {
                            tracing::debug!("{:?} refused: {}", other, refusal);
                        }
                    }
                }
            }
        }

        if self.menu.is_none() && !paused {
            result.report = advance_frame(&mut self.state, &ctx, self.input.intent());
            result.simulated = true;
            if result.report.transition.is_some() || result.report.player_died {
                self.fade.start(ctx.now_ms);
            }
        }

        self.process_events();
        self.dialogue.pump(self.now_ms());
        result
    }

    fn toggle_menu(&mut self, screen: MenuScreen) {
        self.menu = if self.menu == Some(screen) { None } else { Some(screen) };
        self.input.release_all();
        tracing::debug!("Menu now {:?}", self.menu);
    }

    pub fn apply_ui_intent(&mut self, intent: UiIntent) {
        let player = &mut self.state.player;
        match intent {
            UiIntent::AllocateStat(stat) => match player.allocate_stat(stat) {
                Some(change) => tracing::debug!("{} raised to {}", stat.short_name(), change.new_value),
                None => tracing::debug!("No stat points to spend on {}", stat.short_name()),
            },
            UiIntent::UnlockSkill(id) => match player.unlock_skill(&id) {
                Ok(_) => self.state.events.push(GameEvent::SkillUnlocked { id }),
                Err(refusal) => self.dialogue.say(refusal.to_string()),
            },
            UiIntent::UseItem(slot) => {
                let outcome = player.use_item(slot);
                self.dialogue.say(outcome.message());
            }
        }
    }

    /// Turn this frame's events into log lines and dialogue
    fn process_events(&mut self) {
        for event in self.state.events.drain() {
            tracing::trace!("{:?}", event);
            if let Some(line) = scripted_line(&event) {
                self.dialogue.say(line);
            }
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        let now_ms = self.now_ms();
        let scene = Scene {
            world: &self.state.world,
            player: &self.state.player,
            now_ms,
            balloons: self.dialogue.balloons(),
            menu: self.menu,
            fade_alpha: self.fade.alpha(now_ms),
        };
        render_frame(canvas, &self.assets, &scene);
    }

    /// Save under a timestamped name. Failures are logged and the game
    /// carries on.
    pub fn save(&mut self) -> Option<PathBuf> {
        match self.saves.save(&self.state.player, &self.state.world) {
            Ok(path) => {
                self.state.events.push(GameEvent::GameSaved { path: path.clone() });
                Some(path)
            }
            Err(err) => {
                tracing::error!("Save failed: {}", err);
                None
            }
        }
    }

    /// Load `path`; on failure the running game is left as it was
    pub fn load(&mut self, path: &Path) -> bool {
        match self.saves.load(path, &mut self.state.player, &mut self.state.world) {
            Ok(()) => {
                self.menu = None;
                self.dialogue.clear();
                self.input.release_all();
                self.state.events.push(GameEvent::GameLoaded {
                    path: path.to_path_buf(),
                });
                true
            }
            Err(err) => {
                tracing::error!("Load failed: {}", err);
                false
            }
        }
    }

    pub fn load_latest(&mut self) -> bool {
        match self.saves.latest() {
            Ok(path) => self.load(&path),
            Err(err) => {
                tracing::error!("Load failed: {}", err);
                false
            }
        }
    }
}

/// Menu a toggle action opens or closes
fn toggled_menu(action: Action) -> Option<MenuScreen> {
    match action {
        Action::ToggleInventory | Action::ToggleCharacter => Some(MenuScreen::Character),
        Action::ToggleMap => Some(MenuScreen::Map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ItemKind;
    use crate::input::Direction;
    use crate::player::Stat;
    use crate::render::RecordingCanvas;

    fn engine(dir: &Path) -> GameEngine {
        GameEngine::with_assets(
            GameConfig {
                seed: Some(21),
                save_dir: dir.to_path_buf(),
                ..GameConfig::default()
            },
            AssetCatalog::placeholders(),
        )
    }

    #[test]
    fn test_menu_pauses_simulation() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        engine.tick();
        let now = engine.now_ms();
        let position = engine.state.player.position;

        engine.handle_input(InputEvent::Action(Action::ToggleCharacter));
        engine.handle_input(InputEvent::Press(Direction::Right));
        let result = engine.tick();
        assert!(!result.simulated);
        assert_eq!(engine.menu, Some(MenuScreen::Character));
        engine.tick();
        assert_eq!(engine.now_ms(), now);
        assert_eq!(engine.state.player.position, position);

        engine.handle_input(InputEvent::Action(Action::ToggleCharacter));
        engine.tick();
        assert_eq!(engine.menu, None);
        assert!(engine.tick().simulated);
        assert!(engine.now_ms() > now);
    }

    #[test]
    fn test_ui_intents_apply_in_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        engine.state.player.attributes.stat_points = 1;
        engine.state.player.attributes.level = 2;
        engine.state.player.attributes.skill_points = 1;
        let strength = engine.state.player.attributes.strength;

        engine.handle_input(InputEvent::Action(Action::ToggleCharacter));
        engine.handle_input(InputEvent::Ui(UiIntent::AllocateStat(Stat::Strength)));
        engine.handle_input(InputEvent::Ui(UiIntent::UnlockSkill("sprint".to_string())));
        engine.tick();

        assert_eq!(engine.state.player.attributes.strength, strength + 1);
        assert!(engine.state.player.attributes.abilities.sprint);
        assert!(engine.dialogue.balloons().iter().any(|b| b.text == "I've learned sprint."));
    }

    #[test]
    fn test_using_potion_reports_feedback() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        engine.state.player.collect_item(ItemKind::HealthPotion);
        engine.state.player.attributes.health = 2.0;
        engine.handle_input(InputEvent::Ui(UiIntent::UseItem(0)));
        engine.tick();
        assert_eq!(engine.state.player.inventory.count(ItemKind::HealthPotion), 0);
        assert!(engine.dialogue.balloons().iter().any(|b| b.text.starts_with("Restored")));
    }

    #[test]
    fn test_transition_starts_fade() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        engine.state.player.position.x = 790.0;
        engine.handle_input(InputEvent::Press(Direction::Right));
        let result = engine.tick();
        assert!(result.report.transition.is_some());
        assert_eq!(engine.fade.alpha(engine.now_ms()), 255);

        let mut canvas = RecordingCanvas::default();
        engine.render(&mut canvas);
        assert!(!canvas.commands.is_empty());
    }

    #[test]
    fn test_save_then_load_latest() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        engine.state.player.attributes.xp = 7;
        engine.handle_input(InputEvent::Action(Action::Save));
        engine.tick();
        assert!(engine.saves.latest().is_ok());

        engine.state.player.attributes.xp = 0;
        engine.handle_input(InputEvent::Action(Action::Load));
        engine.tick();
        assert_eq!(engine.state.player.attributes.xp, 7);
    }

    #[test]
    fn test_failed_load_keeps_game() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        let blocks = engine.state.world.blocks.len();
        assert!(!engine.load_latest());
        assert!(!engine.load(&dir.path().join("missing.sav")));
        assert_eq!(engine.state.world.blocks.len(), blocks);
    }

    #[test]
    fn test_quit_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(dir.path());
        engine.handle_input(InputEvent::Action(Action::Quit));
        assert!(engine.tick().quit);
    }
}
