use thiserror::Error;

use crate::asset::{AssetCategory, AssetKind};
use crate::request::RequestStateError;

/// Unified result type for the asset crate.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors surfaced while declaring or rendering assets.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("invalid argument: `{0}` is absent")]
    InvalidArgument(&'static str),
    #[error("asset kind {kind:?} cannot be rendered in the {category:?} pass")]
    InvalidState {
        kind: AssetKind,
        category: AssetCategory,
    },
    #[error("request state error: {0}")]
    RequestState(#[from] RequestStateError),
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
