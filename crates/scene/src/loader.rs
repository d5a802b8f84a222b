//! Asset loading: glTF import into the engine's scene representation.

use crate::asset::{AssetKey, Material, MaterialSet, Mesh, Node, Primitive, SceneAsset};
use anyhow::{Context, Result};
use engine_core::{Rgba, Transform};
use glam::Vec3;
use std::path::Path;

/// Seam between the resolver and the storage format. The production
/// implementation reads .glb files; tests substitute synthetic assets.
pub trait AssetLoader {
    fn load(&self, key: &AssetKey, path: &Path) -> Result<SceneAsset>;
}

/// Loads binary glTF through the `gltf` crate, flattening materials
/// into a per-asset [`MaterialSet`] and keeping the node hierarchy.
#[derive(Debug, Default)]
pub struct GltfLoader;

impl AssetLoader for GltfLoader {
    fn load(&self, key: &AssetKey, path: &Path) -> Result<SceneAsset> {
        let (document, buffers, _images) = gltf::import(path)
            .with_context(|| format!("importing {}", path.display()))?;

        let mut materials = MaterialSet::default();
        for mat in document.materials() {
            let c = mat.pbr_metallic_roughness().base_color_factor();
            let name = mat.name().unwrap_or("").to_string();
            materials.push(Material::new(name, Rgba::new(c[0], c[1], c[2], c[3])));
        }
        // Slot for primitives authored without a material.
        let fallback = materials.push(Material::new("", Rgba::WHITE));

        let gltf_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .context("glb contains no scene")?;

        let mut root = Node::empty(key.as_str());
        for node in gltf_scene.nodes() {
            root.children.push(convert_node(&node, &buffers, fallback)?);
        }

        log::debug!(
            "loaded {}: {} material(s), {} mesh node(s)",
            path.display(),
            materials.len(),
            root.children.len()
        );
        Ok(SceneAsset::new(key.clone(), root, materials))
    }
}

fn convert_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    fallback_material: usize,
) -> Result<Node> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut out = Node {
        name: node.name().unwrap_or("").to_string(),
        transform: Transform::from_decomposed(translation, rotation, scale),
        mesh: None,
        children: Vec::new(),
    };

    if let Some(mesh) = node.mesh() {
        let mut primitives = Vec::new();
        for prim in mesh.primitives() {
            let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let positions: Vec<Vec3> = reader
                .read_positions()
                .map(|iter| iter.map(Vec3::from_array).collect())
                .unwrap_or_default();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(idx) => idx.into_u32().collect(),
                // Non-indexed geometry: triangles in vertex order.
                None => (0..positions.len() as u32).collect(),
            };
            let indices = checked_indices(indices, positions.len())
                .with_context(|| format!("mesh {:?}", mesh.name().unwrap_or("")))?;
            primitives.push(Primitive {
                positions,
                indices,
                material: prim.material().index().unwrap_or(fallback_material),
            });
        }
        out.mesh = Some(Mesh {
            name: mesh.name().unwrap_or("").to_string(),
            primitives,
        });
    }

    for child in node.children() {
        out.children.push(convert_node(&child, buffers, fallback_material)?);
    }
    Ok(out)
}

/// An index accessor pointing past the vertex data is a corrupt export;
/// fail the load here rather than panic in triangle iteration.
fn checked_indices(indices: Vec<u32>, vertex_count: usize) -> Result<Vec<u32>> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(bad) => anyhow::bail!("vertex index {bad} out of range ({vertex_count} vertices)"),
        None => Ok(indices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_indices_pass_through() {
        assert_eq!(checked_indices(vec![0, 1, 2, 2, 1, 0], 3).unwrap().len(), 6);
        assert!(checked_indices(Vec::new(), 0).unwrap().is_empty());
    }

    #[test]
    fn out_of_range_index_fails_the_load() {
        let err = checked_indices(vec![0, 1, 9], 3).unwrap_err();
        assert!(err.to_string().contains("index 9"));
    }
}
