//! Error types for save files and assets.
//!
//! Gameplay refusals (cooldowns, locked skills, full inventory) are not
//! errors; they are typed outcomes returned by the systems themselves.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while writing or reading a save file
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Failed to access save file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse save file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode save document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Save schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Malformed block key '{0}' (expected \"x,y\")")]
    MalformedBlockKey(String),

    #[error("Malformed {kind} record in block {block}: {details}")]
    MalformedEntity {
        kind: String,
        block: String,
        details: String,
    },

    #[error("Current block ({0}, {1}) is missing from the save")]
    MissingCurrentBlock(i32, i32),

    #[error("No save files found in '{0}'")]
    NoSaves(PathBuf),
}

/// Errors raised while loading sprite sheets
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to parse sprite metadata '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
