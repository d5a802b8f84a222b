//! Flat-shaded software preview raster.
//!
//! Good enough to show the composed configuration and feed snapshot
//! capture; physically accurate rendering is explicitly out of scope.

use crate::camera::Camera;
use engine_core::Rgba;
use glam::{Mat4, Vec3, Vec4};
use image::RgbaImage;
use scene::{Node, SceneAsset};

/// Scene lighting preset for the preview: light direction, light tint,
/// ambient floor, background. Names mirror the configurator's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingPreset {
    Studio,
    Sunny,
    Arena,
    Night,
}

impl LightingPreset {
    fn light_dir(self) -> Vec3 {
        match self {
            LightingPreset::Studio => Vec3::new(-0.5, -1.0, -0.5),
            LightingPreset::Sunny => Vec3::new(-0.6, -0.9, -0.35),
            LightingPreset::Arena => Vec3::new(0.0, -1.0, -0.1),
            LightingPreset::Night => Vec3::new(0.55, -0.8, 0.4),
        }
        .normalize()
    }

    fn light_tint(self) -> Vec3 {
        match self {
            LightingPreset::Studio => Vec3::new(1.0, 1.0, 1.0),
            LightingPreset::Sunny => Vec3::new(1.0, 0.95, 0.84),
            LightingPreset::Arena => Vec3::new(0.95, 0.97, 1.0),
            LightingPreset::Night => Vec3::new(0.62, 0.71, 1.0),
        }
    }

    fn ambient(self) -> f32 {
        match self {
            LightingPreset::Studio => 0.35,
            LightingPreset::Sunny => 0.45,
            LightingPreset::Arena => 0.25,
            LightingPreset::Night => 0.12,
        }
    }

    fn background(self) -> Rgba {
        match self {
            LightingPreset::Night => Rgba::rgb(0.016, 0.023, 0.039),
            _ => Rgba::rgb(0.027, 0.039, 0.059),
        }
    }
}

/// Z-buffered triangle rasterizer over an RGBA pixel buffer.
pub struct PreviewRaster {
    width: u32,
    height: u32,
    color: Vec<[u8; 4]>,
    depth: Vec<f32>,
}

impl PreviewRaster {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            color: vec![[0; 4]; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render `assets` from `camera` under `preset` and return the
    /// finished frame.
    pub fn render<'a>(
        &mut self,
        assets: impl IntoIterator<Item = &'a SceneAsset>,
        camera: &Camera,
        preset: LightingPreset,
    ) -> RgbaImage {
        self.clear(preset.background());
        let view_proj = camera.view_projection_matrix();
        for asset in assets {
            self.draw_node(&asset.root, Mat4::IDENTITY, asset, view_proj, preset);
        }
        self.to_image()
    }

    fn clear(&mut self, background: Rgba) {
        let bg = background.to_bytes();
        self.color.fill(bg);
        self.depth.fill(f32::INFINITY);
    }

    fn draw_node(
        &mut self,
        node: &Node,
        parent: Mat4,
        asset: &SceneAsset,
        view_proj: Mat4,
        preset: LightingPreset,
    ) {
        let model = parent * node.transform.to_matrix();
        if let Some(mesh) = &node.mesh {
            for prim in &mesh.primitives {
                let base = asset
                    .materials
                    .get(prim.material)
                    .map(|m| m.base_color)
                    .unwrap_or_default();
                for tri in prim.triangles() {
                    let world = tri.map(|p| model.transform_point3(p));
                    self.draw_triangle(world, view_proj, base, preset);
                }
            }
        }
        for child in &node.children {
            self.draw_node(child, model, asset, view_proj, preset);
        }
    }

    fn draw_triangle(
        &mut self,
        world: [Vec3; 3],
        view_proj: Mat4,
        base: Rgba,
        preset: LightingPreset,
    ) {
        // Flat lambert from the world-space face normal.
        let normal = (world[1] - world[0]).cross(world[2] - world[0]).normalize_or_zero();
        let diffuse = normal.dot(-preset.light_dir()).abs();
        let tint = preset.light_tint();
        let light = (Vec3::splat(preset.ambient()) + diffuse * tint).min(Vec3::ONE);
        let lit = Vec3::new(base.r, base.g, base.b) * light;
        let shaded = Rgba::rgb(lit.x, lit.y, lit.z).to_bytes();

        let clip: [Vec4; 3] = world.map(|p| view_proj * p.extend(1.0));
        // Crude near-plane rejection instead of clipping; fine for a
        // preview where the subject is auto-framed well inside the
        // frustum.
        if clip.iter().any(|c| c.w <= 1e-4) {
            return;
        }
        let ndc: [Vec3; 3] = [
            clip[0].truncate() / clip[0].w,
            clip[1].truncate() / clip[1].w,
            clip[2].truncate() / clip[2].w,
        ];

        let (w, h) = (self.width as f32, self.height as f32);
        let screen: [Vec3; 3] = ndc.map(|p| {
            Vec3::new((p.x + 1.0) * 0.5 * w, (1.0 - p.y) * 0.5 * h, p.z)
        });

        let min_x = screen.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
        let max_x = (screen.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil() as i64)
            .clamp(0, self.width as i64) as u32;
        let min_y = screen.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0) as u32;
        let max_y = (screen.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil() as i64)
            .clamp(0, self.height as i64) as u32;

        let area = edge(screen[0], screen[1], screen[2]);
        if area.abs() < 1e-8 {
            return;
        }

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = Vec3::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);
                let w0 = edge(screen[1], screen[2], p) / area;
                let w1 = edge(screen[2], screen[0], p) / area;
                let w2 = edge(screen[0], screen[1], p) / area;
                // Same-sign barycentrics = inside (either winding).
                if (w0 < 0.0 || w1 < 0.0 || w2 < 0.0) && (w0 > 0.0 || w1 > 0.0 || w2 > 0.0) {
                    continue;
                }
                let z = w0 * screen[0].z + w1 * screen[1].z + w2 * screen[2].z;
                let idx = (y * self.width + x) as usize;
                if z < self.depth[idx] {
                    self.depth[idx] = z;
                    self.color[idx] = shaded;
                }
            }
        }
    }

    fn to_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width, self.height);
        for (i, px) in self.color.iter().enumerate() {
            let x = i as u32 % self.width;
            let y = i as u32 / self.width;
            img.put_pixel(x, y, image::Rgba(*px));
        }
        img
    }
}

fn edge(a: Vec3, b: Vec3, p: Vec3) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
