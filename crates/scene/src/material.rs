//! Selective material repainting by exact identity.
//!
//! Authored models separate visually similar surfaces by material name
//! suffix (`"Black"` vs `"Black.001"`), so matching is exact string
//! equality only — never prefix or fuzzy.

use crate::asset::{MaterialSet, SceneAsset};
use engine_core::Rgba;

/// Capture each material's original color, exactly once per material
/// instance. Runs at asset-prepare time, before any repaint; calling
/// it again is a no-op for already-captured materials.
pub fn prepare_materials(materials: &mut MaterialSet) {
    for mat in materials.iter_mut() {
        if mat.original.is_none() {
            mat.original = Some(mat.base_color);
        }
    }
}

/// Repaint every material whose identity string equals `name` exactly.
/// Mutates in place, marks repainted materials dirty, and returns how
/// many were touched. Idempotent.
pub fn paint_by_exact_name(asset: &mut SceneAsset, name: &str, color: Rgba) -> usize {
    let mut painted = 0;
    for mat in asset.materials.iter_mut() {
        if mat.name == name {
            mat.base_color = color;
            mat.dirty = true;
            painted += 1;
        }
    }
    if painted > 0 {
        log::debug!("repainted {painted} material(s) named {name:?} on {}", asset.key);
    }
    painted
}

/// Revert every repainted material to its captured original color.
/// Materials never prepared are left alone.
pub fn restore_original(asset: &mut SceneAsset) {
    for mat in asset.materials.iter_mut() {
        if let Some(original) = mat.original {
            if mat.base_color != original {
                mat.base_color = original;
                mat.dirty = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetKey, Material, MaterialSet, Node, SceneAsset};

    fn asset_with_materials(names: &[&str]) -> SceneAsset {
        let materials = MaterialSet::new(
            names.iter().map(|n| Material::new(*n, Rgba::rgb(0.1, 0.1, 0.1))).collect(),
        );
        SceneAsset::new(AssetKey::new("a"), Node::empty("root"), materials)
    }

    #[test]
    fn exact_match_never_touches_suffixed_names() {
        let mut asset = asset_with_materials(&["Black", "Black.001", "Black_grid", "Glass"]);
        let blue = Rgba::from_hex("#1e5bff").unwrap();

        let painted = paint_by_exact_name(&mut asset, "Black", blue);
        assert_eq!(painted, 1);

        let colors: Vec<_> = asset.materials.iter().map(|m| m.base_color).collect();
        assert!(colors[0].approx_eq(&blue, 1e-6));
        for c in &colors[1..] {
            assert!(c.approx_eq(&Rgba::rgb(0.1, 0.1, 0.1), 1e-6));
        }
    }

    #[test]
    fn repaint_is_idempotent() {
        let mut asset = asset_with_materials(&["Black"]);
        let blue = Rgba::from_hex("#1e5bff").unwrap();
        paint_by_exact_name(&mut asset, "Black", blue);
        let first = asset.materials.get(0).unwrap().base_color;
        paint_by_exact_name(&mut asset, "Black", blue);
        let second = asset.materials.get(0).unwrap().base_color;
        assert_eq!(first, second);
    }

    #[test]
    fn repaint_marks_dirty() {
        let mut asset = asset_with_materials(&["Black"]);
        assert!(!asset.materials.get(0).unwrap().dirty);
        paint_by_exact_name(&mut asset, "Black", Rgba::WHITE);
        assert!(asset.materials.get(0).unwrap().dirty);
    }

    #[test]
    fn restore_reverts_to_prepare_time_color() {
        let mut asset = asset_with_materials(&["Black", "Glass"]);
        prepare_materials(&mut asset.materials);

        paint_by_exact_name(&mut asset, "Black", Rgba::WHITE);
        restore_original(&mut asset);

        for mat in asset.materials.iter() {
            assert!(mat.base_color.approx_eq(&Rgba::rgb(0.1, 0.1, 0.1), 1e-6));
        }
    }

    #[test]
    fn prepare_captures_only_once() {
        let mut asset = asset_with_materials(&["Black"]);
        prepare_materials(&mut asset.materials);
        paint_by_exact_name(&mut asset, "Black", Rgba::WHITE);
        // A second prepare must not overwrite the capture with the
        // painted color.
        prepare_materials(&mut asset.materials);
        restore_original(&mut asset);
        assert!(asset
            .materials
            .get(0)
            .unwrap()
            .base_color
            .approx_eq(&Rgba::rgb(0.1, 0.1, 0.1), 1e-6));
    }

    #[test]
    fn restore_without_prepare_is_a_no_op() {
        let mut asset = asset_with_materials(&["Black"]);
        paint_by_exact_name(&mut asset, "Black", Rgba::WHITE);
        restore_original(&mut asset);
        assert!(asset.materials.get(0).unwrap().base_color.approx_eq(&Rgba::WHITE, 1e-6));
    }
}
