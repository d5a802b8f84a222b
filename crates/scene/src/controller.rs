//! Session-lifetime scene state: one explicit controller object owns
//! the role registers, the color-override table, and the typed command
//! queue. The only reset path is [`SceneController::reset`].

use crate::align::{align_dependent, normalize_anchor, world_bounds, AlignmentOutcome};
use crate::asset::{AssetKey, AssetRole, SceneAsset};
use crate::error::SceneError;
use crate::material::{paint_by_exact_name, prepare_materials, restore_original};
use engine_core::{Aabb, Rgba};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Cross-component signal, consumed once per frame tick instead of
/// ad-hoc events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCommand {
    /// Re-frame the camera on the whole composed scene.
    Recenter,
    /// Switch to a named view preset.
    FocusPreset(String),
}

/// Proof of a load request. Completions carry it back; the controller
/// discards any ticket whose token no longer matches the role's
/// current token, so a slow earlier load can never clobber a newer
/// selection.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub role: AssetRole,
    pub key: AssetKey,
    token: u64,
}

/// What became of a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The asset was attached (replacing any prior asset of the role).
    Attached,
    /// A newer request superseded this one; the result was discarded.
    Stale,
}

/// Owns every loaded asset and all session-lifetime mutable state of
/// the composition engine.
#[derive(Default)]
pub struct SceneController {
    assets: HashMap<AssetRole, SceneAsset>,
    /// Most recent requested key per role, compared against completions.
    desired: HashMap<AssetRole, AssetKey>,
    /// Monotonically increasing request token per role.
    tokens: HashMap<AssetRole, u64>,
    next_token: u64,
    /// Material name → active color. Survives asset swaps, dies on reset.
    overrides: BTreeMap<String, Rgba>,
    /// Vertical clearance per dependent role (hand-tuned data, never
    /// derived from geometry).
    lifts: HashMap<AssetRole, f32>,
    commands: VecDeque<SceneCommand>,
}

impl SceneController {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Load lifecycle ──────────────────────────────────────────────

    /// Register intent to load `key` into `role`. Bumps the role's
    /// request token so any still-in-flight earlier load for the same
    /// role completes as stale.
    pub fn begin_load(&mut self, role: AssetRole, key: AssetKey) -> LoadTicket {
        self.next_token += 1;
        self.tokens.insert(role.clone(), self.next_token);
        self.desired.insert(role.clone(), key.clone());
        log::debug!("load {key} -> {role} (token {})", self.next_token);
        LoadTicket { role, key, token: self.next_token }
    }

    /// Deliver a load completion. Stale completions (token mismatch)
    /// are discarded regardless of success. A current failure is
    /// propagated; the previously attached asset of that role stays
    /// viewable.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<SceneAsset, SceneError>,
    ) -> Result<LoadOutcome, SceneError> {
        if self.tokens.get(&ticket.role) != Some(&ticket.token) {
            log::debug!("discarding stale load of {} for {}", ticket.key, ticket.role);
            return Ok(LoadOutcome::Stale);
        }
        let mut asset = result?;

        prepare_materials(&mut asset.materials);
        for (name, color) in &self.overrides {
            paint_by_exact_name(&mut asset, name, *color);
        }

        self.dispose(&ticket.role);
        self.assets.insert(ticket.role.clone(), asset);
        self.realign_all();
        log::info!("attached {} as {}", ticket.key, ticket.role);
        Ok(LoadOutcome::Attached)
    }

    /// Detach and release the asset of `role`, if any. Original-color
    /// captures die with it.
    pub fn remove(&mut self, role: &AssetRole) {
        self.dispose(role);
        self.desired.remove(role);
        self.realign_all();
    }

    fn dispose(&mut self, role: &AssetRole) {
        if let Some(old) = self.assets.remove(role) {
            log::debug!("disposing {} ({} meshes)", old.key, old.mesh_count());
            // Geometry, materials, and captured originals are freed here.
            drop(old);
        }
    }

    // ── Alignment ───────────────────────────────────────────────────

    /// Normalize the anchor and re-align every dependent against it.
    /// Runs after every attach/remove/lift change; degenerate boxes
    /// skip silently and get retried on the next call.
    pub fn realign_all(&mut self) {
        let anchor_bounds = match self.assets.get_mut(&AssetRole::Court) {
            Some(anchor) => {
                if normalize_anchor(anchor) == AlignmentOutcome::Skipped {
                    log::debug!("anchor bounds degenerate, alignment deferred");
                    return;
                }
                world_bounds(anchor)
            }
            None => return,
        };
        for (role, asset) in self.assets.iter_mut() {
            if role.is_anchor() {
                continue;
            }
            let lift = self.lifts.get(role).copied().unwrap_or(0.0);
            if align_dependent(&anchor_bounds, asset, lift) == AlignmentOutcome::Skipped {
                log::debug!("{role} bounds degenerate, alignment deferred");
            }
        }
    }

    /// Set the vertical clearance for a dependent role and re-align.
    pub fn set_lift(&mut self, role: AssetRole, lift: f32) {
        self.lifts.insert(role, lift);
        self.realign_all();
    }

    // ── Color overrides ─────────────────────────────────────────────

    /// Record an override for `material_name` and apply it to every
    /// loaded asset. The override survives later asset swaps.
    pub fn set_override(&mut self, material_name: impl Into<String>, color: Rgba) {
        let name = material_name.into();
        for asset in self.assets.values_mut() {
            paint_by_exact_name(asset, &name, color);
        }
        self.overrides.insert(name, color);
    }

    /// Drop all overrides and restore every material to its
    /// prepare-time color.
    pub fn clear_overrides(&mut self) {
        self.overrides.clear();
        for asset in self.assets.values_mut() {
            restore_original(asset);
        }
    }

    pub fn overrides(&self) -> impl Iterator<Item = (&str, &Rgba)> {
        self.overrides.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ── Queries ─────────────────────────────────────────────────────

    pub fn asset(&self, role: &AssetRole) -> Option<&SceneAsset> {
        self.assets.get(role)
    }

    pub fn anchor(&self) -> Option<&SceneAsset> {
        self.assets.get(&AssetRole::Court)
    }

    /// The key most recently requested for `role` (whether or not its
    /// load has completed).
    pub fn desired_key(&self, role: &AssetRole) -> Option<&AssetKey> {
        self.desired.get(role)
    }

    pub fn loaded_roles(&self) -> impl Iterator<Item = &AssetRole> {
        self.assets.keys()
    }

    pub fn assets(&self) -> impl Iterator<Item = (&AssetRole, &SceneAsset)> {
        self.assets.iter()
    }

    /// World bounds of one role's asset.
    pub fn bounds_of(&self, role: &AssetRole) -> Option<Aabb> {
        self.assets.get(role).map(world_bounds)
    }

    /// Union bounds of the whole composed scene.
    pub fn scene_bounds(&self) -> Aabb {
        self.assets
            .values()
            .map(world_bounds)
            .fold(Aabb::EMPTY, |acc, b| acc.union(&b))
    }

    // ── Command queue ───────────────────────────────────────────────

    pub fn push_command(&mut self, command: SceneCommand) {
        self.commands.push_back(command);
    }

    /// Drain queued commands; called once per frame tick.
    pub fn drain_commands(&mut self) -> Vec<SceneCommand> {
        self.commands.drain(..).collect()
    }

    // ── Teardown ────────────────────────────────────────────────────

    /// Clear every register and dispose all assets. The only reset
    /// path; overrides do not survive it.
    pub fn reset(&mut self) {
        let roles: Vec<_> = self.assets.keys().cloned().collect();
        for role in roles {
            self.dispose(&role);
        }
        self.desired.clear();
        self.tokens.clear();
        self.overrides.clear();
        self.lifts.clear();
        self.commands.clear();
        log::info!("scene controller reset");
    }
}
