//! Rendering boundary.
//!
//! The core never touches a window or a GPU. Everything visible is issued
//! as rectangle fills, sprite blits and text through [`Canvas`]; a host
//! adapter turns those into real draws. Draw order is fixed: stuck blood,
//! block entities by depth, the player, loose particles, the sword, HUD,
//! dialogue balloons, open menus, and the transition fade on top. Sprite
//! frame indices are looked up in the [`AssetCatalog`] layouts.

use glam::Vec2;

use crate::assets::{AssetCatalog, SpriteId};
use crate::constants::*;
use crate::dialogue::{draw_balloons, Balloon};
use crate::geometry::Rect;
use crate::hud::{self, CharacterSheet, HudView, MapView, MenuScreen};
use crate::particles::Rgb;
use crate::player::Player;
use crate::world::World;

/// Blitting surface supplied by the host
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: u8);

    /// Draw `frame` of a sheet into `rect`, rotated about its centre
    fn draw_sprite(&mut self, sprite: SpriteId, frame: u32, rect: Rect, rotation_deg: f32, alpha: u8);

    fn draw_text(&mut self, text: &str, at: Vec2, color: Rgb);
}

/// Everything one frame needs to be drawn
pub struct Scene<'a> {
    pub world: &'a World,
    pub player: &'a Player,
    pub now_ms: u64,
    pub balloons: &'a [Balloon],
    pub menu: Option<MenuScreen>,
    /// Black overlay alpha from the block transition fade
    pub fade_alpha: u8,
}

pub fn render_frame(canvas: &mut dyn Canvas, assets: &AssetCatalog, scene: &Scene) {
    puffin::profile_function!();

    let coords = scene.world.current_block_coords;
    canvas.fill_rect(Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT), [34, 70, 38], 255);

    {
        puffin::profile_scope!("render_stuck_blood");
        for p in scene.world.stuck_particles.in_block(coords) {
            canvas.fill_rect(Rect::centered(p.position(), p.size, p.size), p.color, p.alpha());
        }
    }

    {
        puffin::profile_scope!("render_entities");
        if let Some(block) = scene.world.current_block() {
            let mut ordered: Vec<_> = block.entities.iter().collect();
            ordered.sort_by(|a, b| a.z_order().total_cmp(&b.z_order()));
            for entity in ordered {
                entity.draw(canvas, assets, scene.now_ms);
            }
        }
    }

    draw_player(canvas, assets, scene.player, scene.now_ms);

    {
        puffin::profile_scope!("render_particles");
        for p in &scene.player.particles.blood {
            canvas.fill_rect(Rect::centered(p.position, p.size, p.size), p.color, p.alpha());
        }
        for p in &scene.player.particles.effects {
            canvas.fill_rect(Rect::centered(p.position, p.size, p.size), p.color, p.alpha());
        }
    }

    draw_sword(canvas, scene.player);

    hud::draw_hud(canvas, &HudView::capture(scene.player, scene.now_ms));
    draw_balloons(canvas, scene.balloons, scene.player.center());

    match scene.menu {
        Some(MenuScreen::Character) => hud::draw_character_sheet(canvas, &CharacterSheet::capture(scene.player)),
        Some(MenuScreen::Map) => hud::draw_map(canvas, &MapView::capture(scene.world)),
        None => {}
    }

    if scene.fade_alpha > 0 {
        canvas.fill_rect(Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT), [0, 0, 0], scene.fade_alpha);
    }
}

/// Walk cycle in the facing direction; the first frame while flinching
fn draw_player(canvas: &mut dyn Canvas, assets: &AssetCatalog, player: &Player, now_ms: u64) {
    if !player.is_visible(now_ms) {
        return;
    }
    let elapsed = if player.is_taking_damage { 0 } else { now_ms };
    let frame = assets.frame_at(SpriteId::Player, player.facing.as_str(), elapsed);
    canvas.draw_sprite(SpriteId::Player, frame, player.rect(), 0.0, 255);
}

fn draw_sword(canvas: &mut dyn Canvas, player: &Player) {
    let Some(angle) = player.current_swing_angle() else {
        return;
    };
    let length = player.attributes.sword_length;
    let dir = Vec2::from_angle(angle.to_radians());
    let blade = Rect::centered(player.center() + dir * (length / 2.0), length, 8.0);
    canvas.draw_sprite(SpriteId::Sword, 0, blade, angle, 255);
}

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Fill { rect: Rect, color: Rgb, alpha: u8 },
    Sprite { sprite: SpriteId, frame: u32, rect: Rect, rotation_deg: f32, alpha: u8 },
    Text { text: String, at: Vec2 },
}

/// Canvas that keeps every call, for inspection
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprites(&self, id: SpriteId) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { sprite, .. } if *sprite == id))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Rgb, alpha: u8) {
        self.commands.push(DrawCommand::Fill { rect, color, alpha });
    }

    fn draw_sprite(&mut self, sprite: SpriteId, frame: u32, rect: Rect, rotation_deg: f32, alpha: u8) {
        self.commands.push(DrawCommand::Sprite {
            sprite,
            frame,
            rect,
            rotation_deg,
            alpha,
        });
    }

    fn draw_text(&mut self, text: &str, at: Vec2, _color: Rgb) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
        });
    }
}

/// Canvas that only counts calls; used by headless runs
#[derive(Debug, Default)]
pub struct NullCanvas {
    pub calls: u64,
}

impl Canvas for NullCanvas {
    fn fill_rect(&mut self, _rect: Rect, _color: Rgb, _alpha: u8) {
        self.calls += 1;
    }

    fn draw_sprite(&mut self, _sprite: SpriteId, _frame: u32, _rect: Rect, _rotation_deg: f32, _alpha: u8) {
        self.calls += 1;
    }

    fn draw_text(&mut self, _text: &str, _at: Vec2, _color: Rgb) {
        self.calls += 1;
    }
}
