//! Scene asset data model: keys, roles, node hierarchy, materials.

use engine_core::{Rgba, Transform};
use glam::Vec3;
use std::fmt;

/// Opaque identifier for a logical asset ("base", "lights-top", …).
/// Immutable once issued; the naming table mapping keys to candidate
/// files lives with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey(String);

impl AssetKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The slot an asset occupies in the composed scene. `Court` is the
/// anchor every dependent is positioned against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetRole {
    Court,
    Lighting,
    Accessory(String),
}

impl AssetRole {
    pub fn is_anchor(&self) -> bool {
        matches!(self, AssetRole::Court)
    }
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetRole::Court => f.write_str("court"),
            AssetRole::Lighting => f.write_str("lighting"),
            AssetRole::Accessory(id) => write!(f, "accessory:{id}"),
        }
    }
}

/// Index into a [`MaterialSet`].
pub type MaterialId = usize;

/// One mesh primitive: triangle geometry plus exactly one material
/// reference. Multi-material meshes are a sequence of primitives, so
/// downstream code never re-checks material shape.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub material: MaterialId,
}

impl Primitive {
    /// Iterate triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|idx| {
            [
                self.positions[idx[0] as usize],
                self.positions[idx[1] as usize],
                self.positions[idx[2] as usize],
            ]
        })
    }
}

/// A named mesh and its primitives.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    /// The normalized material sequence of this mesh (one entry per
    /// primitive, length 1 for single-material meshes).
    pub fn material_slots(&self) -> impl Iterator<Item = MaterialId> + '_ {
        self.primitives.iter().map(|p| p.material)
    }
}

/// One node in an asset's transform hierarchy.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            children: Vec::new(),
        }
    }
}

/// A material as authored: identity string plus the current base color.
/// `original` is captured once at prepare time and is the restore
/// target; it dies with the owning asset.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub base_color: Rgba,
    pub original: Option<Rgba>,
    /// Set on any in-place mutation so a GPU backend knows to re-upload.
    pub dirty: bool,
}

impl Material {
    pub fn new(name: impl Into<String>, base_color: Rgba) -> Self {
        Self {
            name: name.into(),
            base_color,
            original: None,
            dirty: false,
        }
    }
}

/// The indexed material table of one asset. Primitives refer into it
/// by [`MaterialId`].
#[derive(Debug, Clone, Default)]
pub struct MaterialSet {
    materials: Vec<Material>,
}

impl MaterialSet {
    pub fn new(materials: Vec<Material>) -> Self {
        Self { materials }
    }

    pub fn push(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.materials.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// A loaded 3D sub-scene: court, lighting rig, or accessory. Owned
/// exclusively by the engine and replaced wholesale on re-selection.
#[derive(Debug, Clone)]
pub struct SceneAsset {
    pub key: AssetKey,
    pub root: Node,
    pub materials: MaterialSet,
}

impl SceneAsset {
    pub fn new(key: AssetKey, root: Node, materials: MaterialSet) -> Self {
        Self { key, root, materials }
    }

    /// Visit every node depth-first.
    pub fn visit_nodes<'a>(&'a self, mut f: impl FnMut(&'a Node)) {
        fn walk<'a>(node: &'a Node, f: &mut impl FnMut(&'a Node)) {
            f(node);
            for child in &node.children {
                walk(child, f);
            }
        }
        walk(&self.root, &mut f);
    }

    /// Number of meshes across the hierarchy.
    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.visit_nodes(|n| {
            if n.mesh.is_some() {
                count += 1;
            }
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_names() {
        assert_eq!(AssetRole::Court.to_string(), "court");
        assert_eq!(AssetRole::Lighting.to_string(), "lighting");
        assert_eq!(AssetRole::Accessory("bench".into()).to_string(), "accessory:bench");
    }

    #[test]
    fn mesh_material_slots_are_a_sequence() {
        let mesh = Mesh {
            name: "frame".into(),
            primitives: vec![
                Primitive { positions: vec![], indices: vec![], material: 0 },
                Primitive { positions: vec![], indices: vec![], material: 2 },
            ],
        };
        let slots: Vec<_> = mesh.material_slots().collect();
        assert_eq!(slots, vec![0, 2]);
    }

    #[test]
    fn visit_nodes_is_depth_first() {
        let mut root = Node::empty("root");
        let mut a = Node::empty("a");
        a.children.push(Node::empty("a1"));
        root.children.push(a);
        root.children.push(Node::empty("b"));
        let asset = SceneAsset::new(AssetKey::new("k"), root, MaterialSet::default());

        let mut order = Vec::new();
        asset.visit_nodes(|n| order.push(n.name.clone()));
        assert_eq!(order, vec!["root", "a", "a1", "b"]);
    }
}
