// error.rs - Error types
//
// Nothing here ever reaches the per-frame caller. Decode and draw failures
// are absorbed by the entity that owns the asset; these types exist for
// logging and for construction-time configuration.

use thiserror::Error;

use crate::render::Rect;

pub type Result<T> = std::result::Result<T, ArenaError>;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("failed to decode asset {path}: {reason}")]
    AssetDecode { path: String, reason: String },

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error("unknown environment type `{0}`")]
    UnknownEnvironment(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A blit the surface refused to perform.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot draw {src:?} of {sheet_width}x{sheet_height} sheet into {dst:?}")]
pub struct DrawError {
    pub src: Rect,
    pub dst: Rect,
    pub sheet_width: u32,
    pub sheet_height: u32,
}
