//! HUD, character sheet and map.
//!
//! Screens never read the simulation while drawing. They draw from
//! read-only snapshots captured once per frame, and anything the player does
//! on them comes back as a [`UiIntent`] for the engine to apply.

use glam::Vec2;

use crate::constants::*;
use crate::entity::ItemKind;
use crate::geometry::Rect;
use crate::player::{Ability, Player, Stat};
use crate::render::Canvas;
use crate::world::World;

const TEXT: [u8; 3] = [235, 235, 235];
const DIM_TEXT: [u8; 3] = [150, 150, 150];
const PANEL: [u8; 3] = [20, 20, 28];

/// Inventory grid columns on the character sheet
const GRID_COLUMNS: usize = 5;
const GRID_CELL: f32 = 40.0;

/// Full-screen menus; the simulation pauses while one is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuScreen {
    Character,
    Map,
}

/// Player actions taken on a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    AllocateStat(Stat),
    UnlockSkill(String),
    UseItem(usize),
}

/// Bars and counters shown over gameplay
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub health: f32,
    pub max_health: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub level: u32,
    pub xp: u32,
    pub xp_needed: u32,
    pub stat_points: u32,
    pub skill_points: u32,
    pub block: (i32, i32),
    /// Learned abilities with their remaining cooldown
    pub cooldowns: Vec<(Ability, u64)>,
}

impl HudView {
    pub fn capture(player: &Player, now_ms: u64) -> Self {
        let a = &player.attributes;
        let learned = [
            (Ability::Sprint, a.abilities.sprint),
            (Ability::Dash, a.abilities.dash),
            (Ability::Blink, a.abilities.blink),
            (Ability::Firebolt, a.abilities.firebolt),
        ];
        Self {
            health: a.health,
            max_health: a.max_health,
            mana: a.mana,
            max_mana: a.max_mana,
            level: a.level,
            xp: a.xp,
            xp_needed: a.xp_needed(),
            stat_points: a.stat_points,
            skill_points: a.skill_points,
            block: player.current_block,
            cooldowns: learned
                .into_iter()
                .filter(|(_, known)| *known)
                .map(|(ability, _)| (ability, player.cooldown_remaining(ability, now_ms)))
                .collect(),
        }
    }
}

fn fraction(value: f32, max: f32) -> f32 {
    if max <= 0.0 {
        0.0
    } else {
        (value / max).clamp(0.0, 1.0)
    }
}

fn draw_bar(canvas: &mut dyn Canvas, at: Rect, fill: f32, color: [u8; 3]) {
    canvas.fill_rect(at, PANEL, 200);
    canvas.fill_rect(Rect::new(at.x, at.y, at.width * fill, at.height), color, 255);
}

pub fn draw_hud(canvas: &mut dyn Canvas, view: &HudView) {
    draw_bar(canvas, Rect::new(10.0, 10.0, 160.0, 12.0), fraction(view.health, view.max_health), [200, 40, 40]);
    draw_bar(canvas, Rect::new(10.0, 26.0, 160.0, 8.0), fraction(view.mana, view.max_mana), [50, 90, 220]);
    draw_bar(
        canvas,
        Rect::new(10.0, 38.0, 160.0, 4.0),
        fraction(view.xp as f32, view.xp_needed as f32),
        [230, 200, 60],
    );
    canvas.draw_text(
        &format!("Lv {}  ({}, {})", view.level, view.block.0, view.block.1),
        Vec2::new(180.0, 10.0),
        TEXT,
    );
    if view.stat_points + view.skill_points > 0 {
        canvas.draw_text(
            &format!("+{} stat  +{} skill", view.stat_points, view.skill_points),
            Vec2::new(180.0, 26.0),
            [230, 200, 60],
        );
    }
    for (i, (ability, remaining)) in view.cooldowns.iter().enumerate() {
        let at = Vec2::new(10.0 + i as f32 * 90.0, SCREEN_HEIGHT - 24.0);
        let (label, color) = if *remaining == 0 {
            (ability.to_string(), TEXT)
        } else {
            (format!("{} {:.1}s", ability, *remaining as f32 / 1000.0), DIM_TEXT)
        };
        canvas.draw_text(&label, at, color);
    }
}

/// One skill row on the character sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRow {
    pub id: &'static str,
    pub name: &'static str,
    pub unlocked: bool,
    /// Unlockable right now
    pub available: bool,
    pub implemented: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSheet {
    pub level: u32,
    pub stats: [(Stat, u32); 4],
    pub stat_points: u32,
    pub skill_points: u32,
    pub max_health: f32,
    pub max_mana: f32,
    pub sword_damage: f32,
    pub skills: Vec<SkillRow>,
    pub inventory: Vec<(ItemKind, u32)>,
    pub capacity: usize,
}

impl CharacterSheet {
    pub fn capture(player: &Player) -> Self {
        let a = &player.attributes;
        let skills = player
            .skills
            .skills()
            .iter()
            .map(|s| SkillRow {
                id: s.id,
                name: s.name,
                unlocked: s.unlocked,
                available: player.skills.can_unlock(s.id, a.level, a.skill_points).is_ok(),
                implemented: s.implemented,
            })
            .collect();
        Self {
            level: a.level,
            stats: Stat::ALL.map(|s| (s, a.stat(s))),
            stat_points: a.stat_points,
            skill_points: a.skill_points,
            max_health: a.max_health,
            max_mana: a.max_mana,
            sword_damage: a.sword_damage(),
            skills,
            inventory: player.inventory.entries(),
            capacity: player.inventory.capacity(),
        }
    }

    /// Screen rect of inventory slot `slot`
    pub fn slot_rect(slot: usize) -> Rect {
        let col = (slot % GRID_COLUMNS) as f32;
        let row = (slot / GRID_COLUMNS) as f32;
        Rect::new(460.0 + col * GRID_CELL, 120.0 + row * GRID_CELL, GRID_CELL - 4.0, GRID_CELL - 4.0)
    }

    /// Inventory slot under a screen point
    pub fn slot_at(&self, point: Vec2) -> Option<usize> {
        (0..self.capacity).find(|slot| Self::slot_rect(*slot).contains_point(point))
    }
}

pub fn draw_character_sheet(canvas: &mut dyn Canvas, sheet: &CharacterSheet) {
    canvas.fill_rect(Rect::new(40.0, 40.0, SCREEN_WIDTH - 80.0, SCREEN_HEIGHT - 80.0), PANEL, 230);
    canvas.draw_text(&format!("Level {}", sheet.level), Vec2::new(60.0, 60.0), TEXT);

    for (i, (stat, value)) in sheet.stats.iter().enumerate() {
        canvas.draw_text(
            &format!("{} {}", stat.short_name(), value),
            Vec2::new(60.0, 100.0 + i as f32 * 22.0),
            TEXT,
        );
    }
    canvas.draw_text(
        &format!("Points: {}  HP {:.0}  MP {:.0}  DMG {:.0}", sheet.stat_points, sheet.max_health, sheet.max_mana, sheet.sword_damage),
        Vec2::new(60.0, 196.0),
        DIM_TEXT,
    );

    canvas.draw_text(&format!("Skills ({} points)", sheet.skill_points), Vec2::new(60.0, 240.0), TEXT);
    for (i, row) in sheet.skills.iter().enumerate() {
        let color = if row.unlocked || row.available { TEXT } else { DIM_TEXT };
        let mark = match (row.unlocked, row.implemented) {
            (true, _) => "*",
            (false, false) => "?",
            (false, true) => "-",
        };
        canvas.draw_text(&format!("{} {}", mark, row.name), Vec2::new(60.0, 264.0 + i as f32 * 20.0), color);
    }

    draw_items_grid(canvas, sheet);
}

fn draw_items_grid(canvas: &mut dyn Canvas, sheet: &CharacterSheet) {
    for slot in 0..sheet.capacity {
        let cell = CharacterSheet::slot_rect(slot);
        canvas.fill_rect(cell, [45, 45, 60], 255);
        let Some((kind, count)) = sheet.inventory.get(slot) else {
            continue;
        };
        canvas.draw_sprite(kind.sprite(), 0, cell.inflated(-6.0), 0.0, 255);
        if kind.is_stackable() {
            canvas.draw_text(&count.to_string(), Vec2::new(cell.right() - 12.0, cell.bottom() - 14.0), TEXT);
        }
    }
}

/// Visited blocks around the player
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub current: (i32, i32),
    pub visited: Vec<(i32, i32)>,
}

impl MapView {
    pub fn capture(world: &World) -> Self {
        let mut visited: Vec<(i32, i32)> = world
            .blocks
            .values()
            .filter(|b| b.visited)
            .map(|b| b.coords())
            .collect();
        visited.sort();
        Self {
            current: world.current_block_coords,
            visited,
        }
    }
}

pub fn draw_map(canvas: &mut dyn Canvas, map: &MapView) {
    const CELL: f32 = 20.0;
    let origin = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
    canvas.fill_rect(Rect::new(40.0, 40.0, SCREEN_WIDTH - 80.0, SCREEN_HEIGHT - 80.0), PANEL, 230);
    let bounds = Rect::new(40.0, 40.0, SCREEN_WIDTH - 80.0, SCREEN_HEIGHT - 80.0);
    for &(x, y) in &map.visited {
        let offset = Vec2::new((x - map.current.0) as f32, (y - map.current.1) as f32) * CELL;
        let cell = Rect::centered(origin + offset, CELL - 2.0, CELL - 2.0);
        if !cell.is_inside(&bounds) {
            continue;
        }
        let color = if (x, y) == (0, 0) { [200, 120, 40] } else { [90, 130, 90] };
        canvas.fill_rect(cell, color, 255);
    }
    canvas.fill_rect(Rect::centered(origin, CELL / 2.0, CELL / 2.0), [240, 240, 240], 255);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteId;
    use crate::render::{DrawCommand, RecordingCanvas};

    #[test]
    fn test_items_grid_draws_each_item_once() {
        let mut player = Player::new(0.0, 0.0, 6);
        player.collect_item(ItemKind::HealthPotion);
        player.collect_item(ItemKind::HealthPotion);
        player.collect_item(ItemKind::AncientScroll);
        let sheet = CharacterSheet::capture(&player);

        let mut canvas = RecordingCanvas::new();
        draw_character_sheet(&mut canvas, &sheet);
        assert_eq!(canvas.sprites(SpriteId::HealthPotion), 1);
        assert_eq!(canvas.sprites(SpriteId::AncientScroll), 1);
        let cells = canvas
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill { color: [45, 45, 60], .. }))
            .count();
        assert_eq!(cells, 6);
        assert!(canvas
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "2")));
    }

    #[test]
    fn test_skill_availability() {
        let mut player = Player::new(0.0, 0.0, INVENTORY_DEFAULT_CAPACITY);
        player.attributes.level = 2;
        player.attributes.skill_points = 1;
        let sheet = CharacterSheet::capture(&player);
        let sprint = sheet.skills.iter().find(|s| s.id == "sprint").expect("sprint");
        assert!(sprint.available && !sprint.unlocked);
        let dash = sheet.skills.iter().find(|s| s.id == "dash").expect("dash");
        assert!(!dash.available);
    }

    #[test]
    fn test_slot_lookup() {
        let player = Player::new(0.0, 0.0, 10);
        let sheet = CharacterSheet::capture(&player);
        let inside = CharacterSheet::slot_rect(7).center();
        assert_eq!(sheet.slot_at(inside), Some(7));
        assert_eq!(sheet.slot_at(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_hud_lists_learned_abilities_only() {
        let mut player = Player::new(0.0, 0.0, INVENTORY_DEFAULT_CAPACITY);
        player.attributes.abilities.sprint = true;
        let view = HudView::capture(&player, 0);
        assert_eq!(view.cooldowns, vec![(Ability::Sprint, 0)]);
        assert_eq!(view.xp_needed, 10);
    }
}
