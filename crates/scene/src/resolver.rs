//! Ordered candidate resolution for logical asset keys.
//!
//! Deployed model files drift in naming (`base.glb`, `base.glb.glb`,
//! case changes), so each key maps to an ordered list of plausible
//! locations. The first one that loads wins; only total exhaustion is
//! an error, and that error names every attempted candidate.

use crate::asset::{AssetKey, SceneAsset};
use crate::error::SceneError;
use crate::loader::AssetLoader;
use std::path::{Path, PathBuf};

/// Resolves asset keys against candidate locations using a pluggable
/// [`AssetLoader`].
pub struct Resolver<L> {
    loader: L,
}

impl<L: AssetLoader> Resolver<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Attempt `candidates` strictly in order. Failures before the last
    /// candidate are logged at debug and swallowed; exhaustion yields a
    /// single [`SceneError::AssetLoadFailed`] carrying the attempt
    /// list. No retries beyond the list.
    pub fn resolve(
        &self,
        key: &AssetKey,
        candidates: &[PathBuf],
    ) -> Result<SceneAsset, SceneError> {
        let mut attempted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            attempted.push(candidate.clone());
            match self.loader.load(key, candidate) {
                Ok(asset) => {
                    log::info!("resolved {} from {}", key, candidate.display());
                    return Ok(asset);
                }
                Err(err) => {
                    log::debug!("candidate {} failed: {err:#}", candidate.display());
                }
            }
        }
        Err(SceneError::AssetLoadFailed {
            key: key.clone(),
            attempted,
        })
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}

/// Convenience for building candidate lists from a base directory and
/// relative names.
pub fn candidates_in(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|n| dir.join(n)).collect()
}
