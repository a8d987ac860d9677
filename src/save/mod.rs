//! Save files.
//!
//! A save is a pretty-printed JSON [`SaveDocument`] named after the moment
//! it was written (`saves/20240131_184502.sav`). Loading parses and rebuilds
//! everything first and only then swaps it into the live game, so a broken
//! file leaves the running game untouched.

mod document;

pub use document::{
    block_key, parse_block_key, AttributesRecord, BlockRecord, EntityRecord, InventoryItemRecord,
    InventoryRecord, PlayerRecord, SaveDocument, SkillRecord, WorldRecord, SCHEMA_VERSION,
};

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use glam::Vec2;

use crate::constants::*;
use crate::enemy::{Enemy, EnemyKind, EnemyType};
use crate::entity::{Bonfire, Entity, EntityBehavior, ItemKind, ItemPickup, Soul, Terrain};
use crate::error::SaveError;
use crate::geometry::Rect;
use crate::player::{Facing, Player, SkillTree};
use crate::world::{World, WorldBlock};

/// Load order: fixtures and pickups claim their spots before scenery, and
/// scenery before anything that moves
fn load_priority(entity_type: &str) -> u8 {
    match entity_type {
        "bonfire" => 0,
        "item" => 1,
        "grass" => 2,
        "rock" => 3,
        "soul" => 4,
        "slime" | "skeleton" => 5,
        _ => 6,
    }
}

/// Snapshot the game into a document
pub fn capture(player: &Player, world: &World) -> SaveDocument {
    puffin::profile_function!();

    let blocks = world
        .blocks
        .values()
        .map(|block| (block_key(block.x_coord, block.y_coord), capture_block(block)))
        .collect::<BTreeMap<_, _>>();

    let (cx, cy) = world.current_block_coords;
    SaveDocument {
        schema_version: SCHEMA_VERSION,
        player: capture_player(player),
        world: WorldRecord {
            current_block_coords: [cx, cy],
            next_block_id: world.next_block_id,
            blocks,
        },
    }
}

fn capture_player(player: &Player) -> PlayerRecord {
    let a = &player.attributes;
    PlayerRecord {
        position: player.position.to_array(),
        facing: Some(player.facing.as_str().to_string()),
        attributes: AttributesRecord {
            level: Some(a.level),
            xp: Some(a.xp),
            strength: Some(a.strength),
            constitution: Some(a.constitution),
            dexterity: Some(a.dexterity),
            intelligence: Some(a.intelligence),
            health: Some(a.health),
            max_health: Some(a.max_health),
            mana: Some(a.mana),
            max_mana: Some(a.max_mana),
            stat_points: Some(a.stat_points),
            skill_points: Some(a.skill_points),
            found_ancient_scroll: Some(a.found_ancient_scroll),
            found_dragon_heart: Some(a.found_dragon_heart),
            sword_length: Some(a.sword_length),
        },
        skill_tree: player
            .skills
            .skills()
            .iter()
            .map(|s| (s.id.to_string(), SkillRecord { unlocked: s.unlocked }))
            .collect(),
        inventory: InventoryRecord {
            items: player
                .inventory
                .entries()
                .into_iter()
                .map(|(kind, count)| InventoryItemRecord {
                    item_type: kind.category().to_string(),
                    name: kind.name().to_string(),
                    count,
                })
                .collect(),
        },
    }
}

fn capture_block(block: &WorldBlock) -> BlockRecord {
    let mut entities: Vec<EntityRecord> = block.entities.iter().filter_map(capture_entity).collect();
    entities.sort_by_key(|r| load_priority(&r.entity_type));
    BlockRecord {
        id: block.block_id.clone(),
        x_coord: block.x_coord,
        y_coord: block.y_coord,
        visited: block.visited,
        entities,
    }
}

fn at(entity_type: &str, position: Vec2) -> EntityRecord {
    EntityRecord {
        entity_type: entity_type.to_string(),
        x: position.x,
        y: position.y,
        ..Default::default()
    }
}

/// Projectiles and collected pickups are transient and not saved. A dying
/// enemy is saved as the soul it is about to drop.
fn capture_entity(entity: &Entity) -> Option<EntityRecord> {
    let record = match entity {
        Entity::Grass(t) => EntityRecord {
            variant: Some(t.variant),
            ..at("grass", t.position)
        },
        Entity::Rock(t) => EntityRecord {
            variant: Some(t.variant),
            ..at("rock", t.position)
        },
        Entity::Bonfire(b) => at("bonfire", b.position),
        Entity::Item(item) if !item.collected => EntityRecord {
            name: Some(item.kind.name().to_string()),
            collected: Some(false),
            ..at("item", item.position)
        },
        Entity::Item(_) => return None,
        Entity::Soul(soul) if !soul.collected => EntityRecord {
            xp: Some(soul.xp),
            ..at("soul", soul.position)
        },
        Entity::Soul(_) => return None,
        Entity::Enemy(enemy) if enemy.is_dying() => {
            if !enemy.core.will_drop_soul {
                return None;
            }
            EntityRecord {
                xp: Some(enemy.level()),
                ..at("soul", enemy.center())
            }
        }
        Entity::Enemy(enemy) => EntityRecord {
            id: Some(enemy.core.id),
            enemy_type: Some(enemy.core.enemy_type.as_str().to_string()),
            level: Some(enemy.level()),
            health: Some(enemy.core.health),
            max_health: Some(enemy.max_health()),
            ..at(enemy.kind.as_str(), enemy.core.position)
        },
        Entity::Projectile(_) => return None,
    };
    Some(record)
}

pub fn to_json(doc: &SaveDocument) -> Result<String, SaveError> {
    serde_json::to_string_pretty(doc).map_err(SaveError::Encode)
}

/// Rebuild the game from a document. Nothing is modified unless the whole
/// document is valid.
pub fn restore(doc: SaveDocument, player: &mut Player, world: &mut World) -> Result<(), SaveError> {
    puffin::profile_function!();

    if doc.schema_version > SCHEMA_VERSION {
        return Err(SaveError::UnsupportedVersion {
            found: doc.schema_version,
            supported: SCHEMA_VERSION,
        });
    }

    let mut next_enemy_id = doc
        .world
        .blocks
        .values()
        .flat_map(|b| b.entities.iter().filter_map(|e| e.id))
        .max()
        .map_or(world.next_entity_id, |id| id + 1);
    let mut blocks = HashMap::new();
    for (key, record) in &doc.world.blocks {
        let block = rebuild_block(key, record, &mut next_enemy_id)?;
        blocks.insert(block.coords(), block);
    }
    let [cx, cy] = doc.world.current_block_coords;
    if !blocks.contains_key(&(cx, cy)) {
        return Err(SaveError::MissingCurrentBlock(cx, cy));
    }
    let inventory = inventory_entries(&doc.player.inventory);

    apply_player(&doc.player, inventory, player);
    player.current_block = (cx, cy);
    world.replace_blocks(blocks, (cx, cy), doc.world.next_block_id);
    world.next_entity_id = world.next_entity_id.max(next_enemy_id);
    Ok(())
}

fn inventory_entries(record: &InventoryRecord) -> Vec<(ItemKind, u32)> {
    record
        .items
        .iter()
        .filter_map(|item| match ItemKind::from_name(&item.name) {
            Some(kind) => Some((kind, item.count)),
            None => {
                tracing::warn!("Skipping unknown inventory item '{}'", item.name);
                None
            }
        })
        .collect()
}

fn keep_or<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn apply_player(record: &PlayerRecord, inventory: Vec<(ItemKind, u32)>, player: &mut Player) {
    player.position = Vec2::from_array(record.position);
    if let Some(facing) = record.facing.as_deref().and_then(Facing::parse) {
        player.facing = facing;
    }

    let saved = record.attributes.clone();
    let a = &mut player.attributes;
    keep_or(&mut a.level, saved.level.map(|l| l.clamp(1, PLAYER_MAX_LEVEL)));
    keep_or(&mut a.xp, saved.xp);
    keep_or(&mut a.strength, saved.strength);
    keep_or(&mut a.constitution, saved.constitution);
    keep_or(&mut a.dexterity, saved.dexterity);
    keep_or(&mut a.intelligence, saved.intelligence);
    keep_or(&mut a.health, saved.health);
    keep_or(&mut a.mana, saved.mana);
    keep_or(&mut a.stat_points, saved.stat_points);
    keep_or(&mut a.skill_points, saved.skill_points);
    keep_or(&mut a.found_ancient_scroll, saved.found_ancient_scroll);
    keep_or(&mut a.found_dragon_heart, saved.found_dragon_heart);

    if !record.skill_tree.is_empty() {
        player.skills = SkillTree::new();
        let unlocked = record.skill_tree.iter().filter(|(_, s)| s.unlocked).map(|(id, _)| id);
        for id in unlocked {
            if player.skills.restore_unlocked(id).is_none() {
                tracing::warn!("Skipping unknown skill '{}'", id);
            }
        }
    }
    player.inventory.restore(&inventory);
    player.particles.clear();
    player.refresh_after_load();
}

fn malformed(kind: &str, block: &str, details: &str) -> SaveError {
    SaveError::MalformedEntity {
        kind: kind.to_string(),
        block: block.to_string(),
        details: details.to_string(),
    }
}

fn rebuild_block(key: &str, record: &BlockRecord, next_enemy_id: &mut u64) -> Result<WorldBlock, SaveError> {
    let (x, y) = parse_block_key(key)?;
    if (x, y) != (record.x_coord, record.y_coord) {
        tracing::warn!(
            "Block {} stored under key '{}' claims ({}, {}); using the key",
            record.id,
            key,
            record.x_coord,
            record.y_coord
        );
    }
    let mut block = WorldBlock::new(record.id.clone(), x, y);
    block.visited = record.visited;

    let mut records: Vec<&EntityRecord> = record.entities.iter().collect();
    records.sort_by_key(|r| load_priority(&r.entity_type));

    let mut rocks: Vec<Rect> = Vec::new();
    for r in records {
        let entity = match r.entity_type.as_str() {
            "grass" => Entity::Grass(Terrain::grass(r.x, r.y, r.variant.unwrap_or(0))),
            "rock" => {
                let rock = Terrain::rock(r.x, r.y, r.variant.unwrap_or(0));
                let rect = rock.rect();
                if rocks.iter().any(|placed| placed.intersects(&rect)) {
                    tracing::debug!("Dropping overlapping rock at ({:.0}, {:.0}) in {}", r.x, r.y, record.id);
                    continue;
                }
                rocks.push(rect);
                Entity::Rock(rock)
            }
            "bonfire" => Entity::Bonfire(Bonfire::new(r.x, r.y)),
            "item" => {
                let name = r
                    .name
                    .as_deref()
                    .ok_or_else(|| malformed("item", &record.id, "missing name"))?;
                let Some(kind) = ItemKind::from_name(name) else {
                    tracing::warn!("Skipping unknown item '{}' in {}", name, record.id);
                    continue;
                };
                if r.collected == Some(true) {
                    continue;
                }
                Entity::Item(ItemPickup::new(kind, r.x, r.y))
            }
            "soul" => {
                let xp = r.xp.ok_or_else(|| malformed("soul", &record.id, "missing xp"))?;
                Entity::Soul(Soul::new(Vec2::new(r.x, r.y), xp))
            }
            "slime" | "skeleton" => Entity::Enemy(rebuild_enemy(r, &record.id, next_enemy_id)?),
            other => {
                tracing::warn!("Skipping unknown entity type '{}' in {}", other, record.id);
                continue;
            }
        };
        block.entities.push(entity);
    }
    Ok(block)
}

fn rebuild_enemy(r: &EntityRecord, block: &str, next_id: &mut u64) -> Result<Enemy, SaveError> {
    let kind = EnemyKind::parse(&r.entity_type).ok_or_else(|| malformed(&r.entity_type, block, "unknown kind"))?;
    let enemy_type = r
        .enemy_type
        .as_deref()
        .and_then(EnemyType::parse)
        .ok_or_else(|| malformed(&r.entity_type, block, "missing or unknown enemy_type"))?;
    let level = r
        .level
        .ok_or_else(|| malformed(&r.entity_type, block, "missing level"))?;
    let id = r.id.unwrap_or_else(|| {
        let id = *next_id;
        *next_id += 1;
        id
    });

    let mut enemy = Enemy::new(id, kind, enemy_type, r.x, r.y);
    // Factor 0 keeps the saved level exactly
    enemy.set_level(level, 0.0);
    if let Some(health) = r.health {
        enemy.core.health = health.clamp(0.0, enemy.max_health());
    }
    if enemy.core.health <= 0.0 {
        return Err(malformed(&r.entity_type, block, "no health left"));
    }
    Ok(enemy)
}

/// Writes and reads save files in one directory
#[derive(Debug, Clone)]
pub struct SaveManager {
    dir: PathBuf,
}

impl SaveManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save under a fresh timestamped name and return its path
    pub fn save(&self, player: &Player, world: &World) -> Result<PathBuf, SaveError> {
        let name = format!("{}.sav", chrono::Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.dir.join(name);
        self.save_to(&path, player, world)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path, player: &Player, world: &World) -> Result<(), SaveError> {
        let io = |source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io)?;
        }
        let text = to_json(&capture(player, world))?;
        let staging = path.with_extension("sav.tmp");
        std::fs::write(&staging, text).map_err(io)?;
        std::fs::rename(&staging, path).map_err(io)?;
        tracing::info!(
            "Saved game to {} ({} blocks)",
            path.display(),
            world.blocks.len()
        );
        Ok(())
    }

    pub fn load(&self, path: &Path, player: &mut Player, world: &mut World) -> Result<(), SaveError> {
        let text = std::fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: SaveDocument = serde_json::from_str(&text).map_err(|source| SaveError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        restore(doc, player, world)?;
        tracing::info!(
            "Loaded {}: block ({}, {}), level {}",
            path.display(),
            world.current_block_coords.0,
            world.current_block_coords.1,
            player.attributes.level
        );
        Ok(())
    }

    /// Newest `.sav` in the directory; names sort chronologically
    pub fn latest(&self) -> Result<PathBuf, SaveError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|_| SaveError::NoSaves(self.dir.clone()))?;
        entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "sav"))
            .max_by(|a, b| a.file_name().cmp(&b.file_name()))
            .ok_or_else(|| SaveError::NoSaves(self.dir.clone()))
    }
}
