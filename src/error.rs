//! Crate error type. Only the outer layers (board files, CLI arguments,
//! rule profiles) can fail; the scoring core itself is infallible.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown tile kind: {0}")]
    UnknownTile(String),

    #[error("unknown enchantment: {0}")]
    UnknownEnchantment(String),

    #[error("unknown sticker: {0}")]
    UnknownSticker(String),

    #[error("invalid position '{0}', expected \"row,col\" with both in 0..5")]
    BadPosition(String),

    #[error("invalid rotation {0}, expected one of 0, 90, 180, 270")]
    BadRotation(u32),

    #[error("board must be 5x5, got {rows} rows (row lengths {cols:?})")]
    BoardShape { rows: usize, cols: Vec<usize> },

    #[error("unknown rule profile '{name}', available: {available:?}")]
    UnknownProfile { name: String, available: Vec<String> },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
