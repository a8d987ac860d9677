//! Sprite sheet catalog.
//!
//! Sheets are decoded once at startup. A sheet that fails to load is
//! replaced by a flat coloured placeholder so the game stays playable with a
//! broken asset directory. Frame layouts and named animations come from
//! `sprites.json` next to the images; sheets it leaves out fall back to
//! [`SpriteId::default_layout`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::{GRASS_VARIANTS, ROCK_VARIANTS};
use crate::error::AssetError;
use crate::particles::Rgb;

/// Every sprite sheet the core draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Sword,
    Slime,
    Skeleton,
    Grass,
    Rock,
    Bonfire,
    HealthPotion,
    ManaPotion,
    AncientScroll,
    DragonHeart,
    Soul,
    Firebolt,
}

impl SpriteId {
    pub const ALL: [SpriteId; 13] = [
        SpriteId::Player,
        SpriteId::Sword,
        SpriteId::Slime,
        SpriteId::Skeleton,
        SpriteId::Grass,
        SpriteId::Rock,
        SpriteId::Bonfire,
        SpriteId::HealthPotion,
        SpriteId::ManaPotion,
        SpriteId::AncientScroll,
        SpriteId::DragonHeart,
        SpriteId::Soul,
        SpriteId::Firebolt,
    ];

    /// File name of the sheet inside the asset directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SpriteId::Player => "player.png",
            SpriteId::Sword => "sword.png",
            SpriteId::Slime => "slime.gif",
            SpriteId::Skeleton => "skeleton.png",
            SpriteId::Grass => "grass.png",
            SpriteId::Rock => "rock.png",
            SpriteId::Bonfire => "bonfire.png",
            SpriteId::HealthPotion => "health_potion.png",
            SpriteId::ManaPotion => "mana_potion.png",
            SpriteId::AncientScroll => "ancient_scroll.png",
            SpriteId::DragonHeart => "dragon_heart.png",
            SpriteId::Soul => "soul.png",
            SpriteId::Firebolt => "firebolt.png",
        }
    }

    /// Metadata key in `sprites.json`
    pub fn key(&self) -> &'static str {
        self.file_name()
            .split('.')
            .next()
            .unwrap_or_default()
    }

    /// Colour used when the sheet is missing
    pub fn placeholder_color(&self) -> Rgb {
        match self {
            SpriteId::Player => [60, 120, 220],
            SpriteId::Sword => [210, 210, 220],
            SpriteId::Slime => [80, 200, 90],
            SpriteId::Skeleton => [230, 230, 210],
            SpriteId::Grass => [40, 140, 40],
            SpriteId::Rock => [120, 110, 100],
            SpriteId::Bonfire => [240, 120, 30],
            SpriteId::HealthPotion => [220, 40, 40],
            SpriteId::ManaPotion => [50, 80, 230],
            SpriteId::AncientScroll => [230, 210, 150],
            SpriteId::DragonHeart => [180, 20, 60],
            SpriteId::Soul => [120, 220, 255],
            SpriteId::Firebolt => [255, 140, 0],
        }
    }
}

/// A run of consecutive frames in a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FrameRange {
    pub start: u32,
    pub count: u32,
}

/// Frame layout of one sheet: pixel geometry plus named animations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FrameLayout {
    /// Zero for placeholders, which have no pixels to slice
    #[serde(default)]
    pub frame_width: u32,
    #[serde(default)]
    pub frame_height: u32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// How long each animation step is shown
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    #[serde(default)]
    pub animations: HashMap<String, FrameRange>,
}

fn default_frames() -> u32 {
    1
}

fn default_frame_ms() -> u64 {
    150
}

impl FrameLayout {
    fn with_animations(frames: u32, animations: &[(&str, u32, u32)]) -> Self {
        Self {
            frame_width: 0,
            frame_height: 0,
            frames,
            frame_ms: default_frame_ms(),
            animations: animations
                .iter()
                .map(|&(name, start, count)| (name.to_string(), FrameRange { start, count }))
                .collect(),
        }
    }

    /// Add any animation this layout leaves out from `defaults`
    fn filled_from(mut self, defaults: &FrameLayout) -> Self {
        for (name, range) in &defaults.animations {
            self.animations.entry(name.clone()).or_insert(*range);
        }
        self
    }

    /// Sheet index of `step` within `animation`, wrapping around its run.
    /// Unknown animations cycle through the whole sheet.
    pub fn frame(&self, animation: &str, step: u64) -> u32 {
        match self.animations.get(animation) {
            Some(range) if range.count > 0 => range.start + (step % range.count as u64) as u32,
            _ => (step % self.frames.max(1) as u64) as u32,
        }
    }

    /// Sheet index of `animation` after it has played for `elapsed_ms`
    pub fn frame_at(&self, animation: &str, elapsed_ms: u64) -> u32 {
        self.frame(animation, elapsed_ms / self.frame_ms.max(1))
    }
}

impl SpriteId {
    /// Layout assumed when `sprites.json` has no entry for the sheet
    pub fn default_layout(&self) -> FrameLayout {
        const ENEMY: [(&str, u32, u32); 4] = [("idle", 0, 4), ("moving", 4, 4), ("attacking", 8, 4), ("dying", 12, 4)];
        match self {
            SpriteId::Player => {
                FrameLayout::with_animations(16, &[("down", 0, 4), ("left", 4, 4), ("right", 8, 4), ("up", 12, 4)])
            }
            SpriteId::Slime | SpriteId::Skeleton => FrameLayout::with_animations(16, &ENEMY),
            SpriteId::Bonfire => FrameLayout::with_animations(4, &[("burning", 0, 4)]),
            SpriteId::Grass => FrameLayout::with_animations(GRASS_VARIANTS as u32, &[]),
            SpriteId::Rock => FrameLayout::with_animations(ROCK_VARIANTS as u32, &[]),
            _ => FrameLayout::with_animations(1, &[]),
        }
    }
}

/// A decoded sheet or its stand-in
#[derive(Debug, Clone)]
pub enum SpriteSheet {
    Loaded {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
        layout: FrameLayout,
    },
    Placeholder {
        color: Rgb,
        layout: FrameLayout,
    },
}

impl SpriteSheet {
    fn placeholder(id: SpriteId, layout: FrameLayout) -> Self {
        SpriteSheet::Placeholder {
            color: id.placeholder_color(),
            layout: FrameLayout {
                frame_width: 0,
                frame_height: 0,
                ..layout
            },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, SpriteSheet::Placeholder { .. })
    }

    pub fn layout(&self) -> &FrameLayout {
        match self {
            SpriteSheet::Loaded { layout, .. } | SpriteSheet::Placeholder { layout, .. } => layout,
        }
    }
}

/// All sheets the game needs, keyed by sprite
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    sheets: HashMap<SpriteId, SpriteSheet>,
}

impl AssetCatalog {
    /// Catalog of placeholders only (headless runs and tests)
    pub fn placeholders() -> Self {
        let sheets = SpriteId::ALL
            .iter()
            .map(|id| (*id, SpriteSheet::placeholder(*id, id.default_layout())))
            .collect();
        Self { sheets }
    }

    /// Load every sheet from `dir`, substituting placeholders for failures
    pub fn load(dir: &Path) -> Self {
        let mut layouts = match read_layouts(&dir.join("sprites.json")) {
            Ok(layouts) => layouts,
            Err(err) => {
                tracing::warn!("Sprite metadata unavailable, using built-in layouts: {}", err);
                HashMap::new()
            }
        };

        let mut sheets = HashMap::new();
        for id in SpriteId::ALL {
            let path = dir.join(id.file_name());
            let layout = layouts.remove(id.key()).map(|layout| layout.filled_from(&id.default_layout()));
            let sheet = match load_sheet(&path, id, layout.clone()) {
                Ok(sheet) => sheet,
                Err(err) => {
                    tracing::warn!("Missing asset {}: {}; using placeholder", path.display(), err);
                    SpriteSheet::placeholder(id, layout.unwrap_or_else(|| id.default_layout()))
                }
            };
            sheets.insert(id, sheet);
        }
        for key in layouts.keys() {
            tracing::warn!("sprites.json describes unknown sheet '{}'", key);
        }
        Self { sheets }
    }

    /// Replace the layout of one sheet, keeping its pixels
    pub fn with_layout(mut self, id: SpriteId, layout: FrameLayout) -> Self {
        let layout = layout.filled_from(&id.default_layout());
        let sheet = match self.sheets.remove(&id) {
            Some(SpriteSheet::Loaded { width, height, rgba, .. }) => SpriteSheet::Loaded {
                width,
                height,
                rgba,
                layout,
            },
            _ => SpriteSheet::placeholder(id, layout),
        };
        self.sheets.insert(id, sheet);
        self
    }

    pub fn get(&self, id: SpriteId) -> Option<&SpriteSheet> {
        self.sheets.get(&id)
    }

    pub fn placeholder_count(&self) -> usize {
        self.sheets.values().filter(|s| s.is_placeholder()).count()
    }

    /// Frame to draw for `step` of an animation
    pub fn frame(&self, id: SpriteId, animation: &str, step: u64) -> u32 {
        match self.sheets.get(&id) {
            Some(sheet) => sheet.layout().frame(animation, step),
            None => id.default_layout().frame(animation, step),
        }
    }

    /// Frame to draw once an animation has run for `elapsed_ms`
    pub fn frame_at(&self, id: SpriteId, animation: &str, elapsed_ms: u64) -> u32 {
        match self.sheets.get(&id) {
            Some(sheet) => sheet.layout().frame_at(animation, elapsed_ms),
            None => id.default_layout().frame_at(animation, elapsed_ms),
        }
    }
}

fn read_layouts(path: &Path) -> Result<HashMap<String, FrameLayout>, AssetError> {
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| AssetError::Metadata {
        path: path.to_path_buf(),
        source,
    })
}

fn load_sheet(path: &PathBuf, id: SpriteId, layout: Option<FrameLayout>) -> Result<SpriteSheet, AssetError> {
    let img = image::open(path)
        .map_err(|source| AssetError::Decode {
            path: path.clone(),
            source,
        })?
        .into_rgba8();
    let (width, height) = img.dimensions();
    let layout = layout.unwrap_or_else(|| {
        let fallback = id.default_layout();
        FrameLayout {
            frame_width: width / fallback.frames.max(1),
            frame_height: height,
            ..fallback
        }
    });
    Ok(SpriteSheet::Loaded {
        width,
        height,
        rgba: img.into_raw(),
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_yields_placeholders() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = AssetCatalog::load(&dir.path().join("nope"));
        assert_eq!(catalog.placeholder_count(), SpriteId::ALL.len());
        assert!(catalog.get(SpriteId::Slime).unwrap().is_placeholder());
    }

    #[test]
    fn test_loads_png_with_layout() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(64, 32, image::Rgba([255, 0, 0, 255]));
        img.save(dir.path().join("rock.png")).unwrap();
        std::fs::write(
            dir.path().join("sprites.json"),
            r#"{ "rock": { "frame_width": 32, "frame_height": 32, "frames": 2 } }"#,
        )
        .unwrap();

        let catalog = AssetCatalog::load(dir.path());
        match catalog.get(SpriteId::Rock).unwrap() {
            SpriteSheet::Loaded { width, layout, .. } => {
                assert_eq!(*width, 64);
                assert_eq!(layout.frames, 2);
            }
            SpriteSheet::Placeholder { .. } => panic!("rock should have loaded"),
        }
        assert_eq!(catalog.placeholder_count(), SpriteId::ALL.len() - 1);
    }

    #[test]
    fn test_layout_metadata_drives_frames() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("sprites.json"),
            r#"{ "slime": { "frames": 8, "frame_ms": 50, "animations": { "moving": { "start": 2, "count": 2 } } } }"#,
        )
        .unwrap();

        let catalog = AssetCatalog::load(dir.path());
        assert_eq!(catalog.frame_at(SpriteId::Slime, "moving", 0), 2);
        assert_eq!(catalog.frame_at(SpriteId::Slime, "moving", 50), 3);
        assert_eq!(catalog.frame_at(SpriteId::Slime, "moving", 100), 2);
        // Left out of the metadata, so the built-in run applies
        assert_eq!(catalog.frame_at(SpriteId::Slime, "dying", 0), 12);
        // Skeleton has no metadata entry at all
        assert_eq!(catalog.frame_at(SpriteId::Skeleton, "moving", 150), 5);
    }

    #[test]
    fn test_unknown_animation_cycles_whole_sheet() {
        let catalog = AssetCatalog::placeholders();
        assert_eq!(catalog.frame(SpriteId::Rock, "variant", 2), 2);
        assert_eq!(catalog.frame(SpriteId::Rock, "variant", 4), 1);
        assert_eq!(catalog.frame(SpriteId::Soul, "spin", 9), 0);
        assert_eq!(AssetCatalog::default().frame_at(SpriteId::Bonfire, "burning", 450), 3);
    }

    #[test]
    fn test_sprite_keys() {
        assert_eq!(SpriteId::HealthPotion.key(), "health_potion");
        assert_eq!(SpriteId::Slime.key(), "slime");
    }
}
