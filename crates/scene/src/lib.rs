//! Scene composition & alignment engine.
//!
//! Independently authored court, lighting and accessory models are
//! loaded through an ordered candidate resolver, aligned into one
//! anchor-relative frame, and selectively repainted by material
//! identity. All session-lifetime mutable state lives in
//! [`SceneController`]; nothing here is a module-level global.

pub mod align;
pub mod asset;
pub mod controller;
pub mod error;
pub mod loader;
pub mod material;
pub mod resolver;

pub use align::{align_dependent, normalize_anchor, world_bounds, AlignmentOutcome};
pub use asset::{AssetKey, AssetRole, Material, MaterialSet, Mesh, Node, Primitive, SceneAsset};
pub use controller::{LoadOutcome, LoadTicket, SceneCommand, SceneController};
pub use error::SceneError;
pub use loader::{AssetLoader, GltfLoader};
pub use material::{paint_by_exact_name, prepare_materials, restore_original};
pub use resolver::Resolver;
