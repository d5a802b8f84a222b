//! Bounding-box alignment: dependents sit anchor-relative, never
//! world-absolute.

use crate::asset::{Node, SceneAsset};
use engine_core::Aabb;
use glam::{Mat4, Vec3};

/// Result of an alignment attempt. `Skipped` means a degenerate box
/// was involved; the caller retries on the next relevant update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentOutcome {
    Aligned,
    Skipped,
}

/// World-space bounds of an asset: hierarchy walk with accumulated
/// matrices over every mesh position. Degenerate for mesh-less assets.
pub fn world_bounds(asset: &SceneAsset) -> Aabb {
    let mut aabb = Aabb::EMPTY;
    grow_node(&asset.root, Mat4::IDENTITY, &mut aabb);
    aabb
}

fn grow_node(node: &Node, parent: Mat4, aabb: &mut Aabb) {
    let matrix = parent * node.transform.to_matrix();
    if let Some(mesh) = &node.mesh {
        for prim in &mesh.primitives {
            for &p in &prim.positions {
                aabb.grow(matrix.transform_point3(p));
            }
        }
    }
    for child in &node.children {
        grow_node(child, matrix, aabb);
    }
}

/// Normalize the anchor so it stands on the ground plane: bounds
/// XZ-centered at the origin and `min.y == 0`. Dependents are aligned
/// against the normalized anchor afterwards.
pub fn normalize_anchor(anchor: &mut SceneAsset) -> AlignmentOutcome {
    let bounds = world_bounds(anchor);
    if bounds.is_degenerate() {
        return AlignmentOutcome::Skipped;
    }
    let center = bounds.center();
    anchor
        .root
        .transform
        .translate(Vec3::new(-center.x, -bounds.min.y, -center.z));
    AlignmentOutcome::Aligned
}

/// Translate `dependent` so its bounds XZ-center matches the anchor's
/// and its `min.y` sits at `anchor.min.y + lift`. Lift 0 is
/// flush-to-ground; lighting rigs pass their configured clearance.
pub fn align_dependent(
    anchor_bounds: &Aabb,
    dependent: &mut SceneAsset,
    lift: f32,
) -> AlignmentOutcome {
    if anchor_bounds.is_degenerate() {
        return AlignmentOutcome::Skipped;
    }
    let dep_bounds = world_bounds(dependent);
    if dep_bounds.is_degenerate() {
        return AlignmentOutcome::Skipped;
    }

    let anchor_center = anchor_bounds.center();
    let dep_center = dep_bounds.center();
    let delta = Vec3::new(
        anchor_center.x - dep_center.x,
        anchor_bounds.min.y - dep_bounds.min.y + lift,
        anchor_center.z - dep_center.z,
    );
    dependent.root.transform.translate(delta);
    AlignmentOutcome::Aligned
}
