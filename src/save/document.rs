//! On-disk save document.
//!
//! Plain serde records, separate from the live simulation types so the
//! file format can stay stable while the game changes. Optional fields are
//! skipped when absent and tolerated when missing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SaveError;

/// Current document version; newer files are refused
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveDocument {
    pub schema_version: u32,
    pub player: PlayerRecord,
    pub world: WorldRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub position: [f32; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<String>,
    #[serde(default)]
    pub attributes: AttributesRecord,
    /// Skill id to its state
    #[serde(default)]
    pub skill_tree: BTreeMap<String, SkillRecord>,
    #[serde(default)]
    pub inventory: InventoryRecord,
}

/// Every field optional: a missing one keeps the in-memory value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributesRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constitution: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dexterity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intelligence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_mana: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_ancient_scroll: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_dragon_heart: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sword_length: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub unlocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub items: Vec<InventoryItemRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItemRecord {
    /// Item category, "potion" or "artifact"
    #[serde(rename = "type")]
    pub item_type: String,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    pub current_block_coords: [i32; 2],
    pub next_block_id: u64,
    /// Keyed `"x,y"`
    pub blocks: BTreeMap<String, BlockRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub id: String,
    pub x_coord: i32,
    pub y_coord: i32,
    pub visited: bool,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

/// One entity. `type` selects which optional fields apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u32>,
}

pub fn block_key(x: i32, y: i32) -> String {
    format!("{},{}", x, y)
}

pub fn parse_block_key(key: &str) -> Result<(i32, i32), SaveError> {
    let malformed = || SaveError::MalformedBlockKey(key.to_string());
    let (x, y) = key.split_once(',').ok_or_else(malformed)?;
    let x = x.trim().parse().map_err(|_| malformed())?;
    let y = y.trim().parse().map_err(|_| malformed())?;
    Ok((x, y))
}
