//! Scene engine error taxonomy.

use crate::asset::AssetKey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the composition engine. All of them are
/// recoverable: the previous scene stays viewable and the render loop
/// keeps running.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Every candidate location for `key` failed to load. Carries the
    /// full attempt list so the one user-facing error names them all.
    #[error("asset {key} failed to load after {} candidate(s)", attempted.len())]
    AssetLoadFailed {
        key: AssetKey,
        attempted: Vec<PathBuf>,
    },
}
