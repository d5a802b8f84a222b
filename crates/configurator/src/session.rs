//! One configurator session: catalog selections applied to the scene
//! controller, camera framing, the preview raster, and the selection
//! state a lead submission reports.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use delivery::{ConfigSnapshot, Selection};
use engine_core::{Rgba, Time};
use image::RgbaImage;
use renderer::{pose_for, Camera, FramingController, LightingPreset, PreviewRaster, ViewPreset};
use scene::resolver::candidates_in;
use scene::{
    AssetKey, AssetLoader, AssetRole, GltfLoader, Resolver, SceneCommand, SceneController,
};

use crate::catalog::{self, STRUCTURE_MATERIAL};
use crate::config::AppConfig;

pub struct Session<L> {
    resolver: Resolver<L>,
    assets_dir: PathBuf,
    scene: SceneController,
    camera: Camera,
    framing: FramingController,
    raster: PreviewRaster,
    preset: LightingPreset,
    court_id: Option<String>,
    lighting_id: String,
    scene_lighting_id: String,
    structure_hex: Option<String>,
    extras: BTreeSet<String>,
}

impl Session<GltfLoader> {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_loader(GltfLoader, config)
    }
}

impl<L: AssetLoader> Session<L> {
    pub fn with_loader(loader: L, config: &AppConfig) -> Self {
        let mut camera = Camera::default();
        camera.set_aspect(config.preview_width, config.preview_height);
        Session {
            resolver: Resolver::new(loader),
            assets_dir: config.assets_dir.clone(),
            scene: SceneController::new(),
            camera,
            framing: FramingController::new(),
            raster: PreviewRaster::new(config.preview_width, config.preview_height),
            preset: LightingPreset::Studio,
            court_id: None,
            lighting_id: "none".to_string(),
            scene_lighting_id: "studio".to_string(),
            structure_hex: None,
            extras: BTreeSet::new(),
        }
    }

    // ── Catalog selections ──────────────────────────────────────────

    pub fn select_court(&mut self, id: &str) -> Result<()> {
        let option = catalog::court(id).ok_or_else(|| anyhow!("unknown court {id:?}"))?;
        self.load_role(AssetRole::Court, id, option.candidates)?;
        self.court_id = Some(id.to_string());
        self.scene.push_command(SceneCommand::Recenter);
        Ok(())
    }

    pub fn select_lighting(&mut self, id: &str) -> Result<()> {
        let option = catalog::lighting(id).ok_or_else(|| anyhow!("unknown lighting {id:?}"))?;
        if option.candidates.is_empty() {
            self.scene.remove(&AssetRole::Lighting);
        } else {
            self.scene.set_lift(AssetRole::Lighting, option.lift);
            self.load_role(AssetRole::Lighting, id, option.candidates)?;
        }
        self.lighting_id = id.to_string();
        Ok(())
    }

    pub fn add_extra(&mut self, id: &str) -> Result<()> {
        let option = catalog::extra(id).ok_or_else(|| anyhow!("unknown extra {id:?}"))?;
        self.load_role(AssetRole::Accessory(id.to_string()), id, option.candidates)?;
        self.extras.insert(id.to_string());
        Ok(())
    }

    pub fn remove_extra(&mut self, id: &str) {
        self.scene.remove(&AssetRole::Accessory(id.to_string()));
        self.extras.remove(id);
    }

    pub fn set_structure_color(&mut self, hex: &str) -> Result<()> {
        let color = Rgba::from_hex(hex)?;
        self.scene.set_override(STRUCTURE_MATERIAL, color);
        self.structure_hex = Some(hex.to_string());
        Ok(())
    }

    pub fn clear_structure_color(&mut self) {
        self.scene.clear_overrides();
        self.structure_hex = None;
    }

    pub fn set_scene_lighting(&mut self, id: &str) -> Result<()> {
        let option =
            catalog::scene_lighting(id).ok_or_else(|| anyhow!("unknown scene lighting {id:?}"))?;
        self.preset = option.preset;
        self.scene_lighting_id = id.to_string();
        Ok(())
    }

    fn load_role(&mut self, role: AssetRole, key_id: &str, candidates: &[&str]) -> Result<()> {
        let key = AssetKey::new(key_id);
        let ticket = self.scene.begin_load(role, key.clone());
        let paths = candidates_in(&self.assets_dir, candidates);
        let result = self.resolver.resolve(&key, &paths);
        self.scene.complete_load(ticket, result)?;
        Ok(())
    }

    // ── Camera & frame loop ─────────────────────────────────────────

    pub fn recenter(&mut self) {
        self.scene.push_command(SceneCommand::Recenter);
    }

    pub fn begin_interaction(&mut self) {
        self.framing.begin_interaction();
    }

    pub fn end_interaction(&mut self) {
        self.framing.end_interaction();
    }

    /// One frame tick: consume queued scene commands, then advance any
    /// camera transition.
    pub fn tick(&mut self, dt: f32) {
        for command in self.scene.drain_commands() {
            let preset = match &command {
                SceneCommand::Recenter => ViewPreset::establishing(),
                SceneCommand::FocusPreset(name) if name == "detail" => ViewPreset::detail(),
                SceneCommand::FocusPreset(_) => ViewPreset::establishing(),
            };
            let bounds = self.scene.scene_bounds();
            if let Some(pose) = pose_for(
                &bounds,
                preset.bias,
                self.camera.fov_radians(),
                self.camera.aspect,
                preset.offset_factor,
            ) {
                self.framing.focus(&self.camera, pose);
            }
        }
        self.framing.tick(&mut self.camera, dt);
    }

    /// Step frames at a fixed 60 Hz until the camera settles (bounded).
    /// Deterministic, so tests land on exact poses.
    pub fn settle(&mut self) {
        for _ in 0..240 {
            self.tick(1.0 / 60.0);
            if !self.framing.is_transitioning() {
                break;
            }
        }
    }

    /// Drive the frame loop in real time until the camera settles.
    pub fn run_until_settled(&mut self) {
        let mut time = Time::new();
        // First tick consumes queued commands and starts transitions.
        self.tick(0.0);
        while self.framing.is_transitioning() && time.elapsed_seconds() < 5.0 {
            std::thread::sleep(std::time::Duration::from_millis(16));
            time.update();
            self.tick(time.delta_seconds());
        }
    }

    pub fn render_frame(&mut self) -> RgbaImage {
        let assets: Vec<_> = self.scene.assets().map(|(_, asset)| asset).collect();
        self.raster.render(assets, &self.camera, self.preset)
    }

    // ── Lead reporting ──────────────────────────────────────────────

    /// The selection state a lead submission carries.
    pub fn config_snapshot(&self) -> ConfigSnapshot {
        let court = self
            .court_id
            .as_deref()
            .and_then(catalog::court)
            .map(|c| Selection::new(c.id, c.label))
            .unwrap_or_else(|| Selection::new("none", "No court selected"));
        let lighting = catalog::lighting(&self.lighting_id)
            .map(|l| Selection::new(l.id, l.label))
            .unwrap_or_else(|| Selection::new("none", "No lighting"));
        let scene_lighting = catalog::scene_lighting(&self.scene_lighting_id)
            .map(|s| Selection::new(s.id, s.label))
            .unwrap_or_else(|| Selection::new("studio", "Studio"));
        let extras = self
            .extras
            .iter()
            .filter_map(|id| catalog::extra(id))
            .map(|e| Selection::new(e.id, e.label))
            .collect();
        ConfigSnapshot {
            court,
            lighting,
            scene_lighting,
            structure_color: self.structure_hex.clone(),
            extras,
        }
    }

    pub fn scene(&self) -> &SceneController {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Transform;
    use glam::Vec3;
    use scene::{Material, MaterialSet, Mesh, Node, Primitive, SceneAsset};
    use std::path::Path;

    /// Serves a synthetic box per catalog key so sessions can be
    /// exercised without .glb files on disk.
    struct BoxLoader;

    fn box_asset(key: &AssetKey, min: Vec3, max: Vec3, materials: &[&str]) -> SceneAsset {
        let positions = vec![
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 0, 2, 3, 4, 6, 5, 4, 7, 6,
            0, 3, 7, 0, 7, 4, 1, 5, 6, 1, 6, 2,
            3, 2, 6, 3, 6, 7, 0, 4, 5, 0, 5, 1,
        ];
        let mut set = MaterialSet::default();
        for name in materials {
            set.push(Material::new(*name, Rgba::rgb(0.1, 0.1, 0.1)));
        }
        let mesh = Mesh {
            name: format!("{key}-mesh"),
            primitives: vec![Primitive { positions, indices, material: 0 }],
        };
        let mut root = Node::empty(key.as_str());
        root.transform = Transform::default();
        root.mesh = Some(mesh);
        SceneAsset::new(key.clone(), root, set)
    }

    impl AssetLoader for BoxLoader {
        fn load(&self, key: &AssetKey, _path: &Path) -> anyhow::Result<SceneAsset> {
            Ok(match key.as_str() {
                "lights-top" => box_asset(
                    key,
                    Vec3::new(-8.0, 0.0, -4.0),
                    Vec3::new(8.0, 0.6, 4.0),
                    &["Metal"],
                ),
                "scoreboard" => box_asset(
                    key,
                    Vec3::new(11.0, 0.0, -1.0),
                    Vec3::new(12.0, 2.5, 1.0),
                    &["Plastic"],
                ),
                // Courts arrive deliberately off-center to prove
                // normalization happens.
                _ => box_asset(
                    key,
                    Vec3::new(-7.0, 0.8, -2.0),
                    Vec3::new(13.0, 6.8, 8.0),
                    &["Black", "Black.001", "Glass"],
                ),
            })
        }
    }

    fn session() -> Session<BoxLoader> {
        Session::with_loader(BoxLoader, &AppConfig::default())
    }

    #[test]
    fn full_configuration_aligns_paints_and_frames() {
        let mut s = session();
        s.select_court("base").unwrap();
        s.select_lighting("lights-top").unwrap();
        s.set_structure_color("#1e5bff").unwrap();

        // Court is normalized: grounded and centered on XZ.
        let court = s.scene().bounds_of(&AssetRole::Court).unwrap();
        assert!(court.min.y.abs() < 1e-4);
        assert!(court.center().x.abs() < 1e-3);
        assert!(court.center().z.abs() < 1e-3);

        // Lighting rig floats `lift` above the ground, XZ-centered on
        // the court.
        let rig = s.scene().bounds_of(&AssetRole::Lighting).unwrap();
        assert!((rig.min.y - 7.5).abs() < 1e-3);
        assert!((rig.center().x - court.center().x).abs() < 1e-3);

        // Exactly the material named "Black" took the override.
        let asset = s.scene().asset(&AssetRole::Court).unwrap();
        let expected = Rgba::from_hex("#1e5bff").unwrap();
        for mat in asset.materials.iter() {
            if mat.name == "Black" {
                assert!(mat.base_color.approx_eq(&expected, 1e-4));
            } else {
                assert!(!mat.base_color.approx_eq(&expected, 1e-4), "{} was painted", mat.name);
            }
        }

        // The queued recenter pose lands the camera looking at the
        // composed scene.
        s.settle();
        let target = s.camera().target;
        let scene_center = s.scene().scene_bounds().center();
        assert!((target - scene_center).length() < 1e-2);
    }

    #[test]
    fn swapping_courts_keeps_the_color_override() {
        let mut s = session();
        s.select_court("base").unwrap();
        s.set_structure_color("#c8102e").unwrap();
        s.select_court("ultra-panoramic").unwrap();

        let asset = s.scene().asset(&AssetRole::Court).unwrap();
        let expected = Rgba::from_hex("#c8102e").unwrap();
        let black = asset.materials.iter().find(|m| m.name == "Black").unwrap();
        assert!(black.base_color.approx_eq(&expected, 1e-4));
    }

    #[test]
    fn lighting_none_detaches_the_rig() {
        let mut s = session();
        s.select_court("base").unwrap();
        s.select_lighting("lights-top").unwrap();
        assert!(s.scene().asset(&AssetRole::Lighting).is_some());

        s.select_lighting("none").unwrap();
        assert!(s.scene().asset(&AssetRole::Lighting).is_none());
    }

    #[test]
    fn extras_sit_flush_on_the_ground() {
        let mut s = session();
        s.select_court("base").unwrap();
        s.add_extra("scoreboard").unwrap();
        let bounds = s
            .scene()
            .bounds_of(&AssetRole::Accessory("scoreboard".into()))
            .unwrap();
        assert!(bounds.min.y.abs() < 1e-4);
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut s = session();
        assert!(s.select_court("olympic").is_err());
        assert!(s.set_structure_color("not-a-color").is_err());
        assert!(s.set_scene_lighting("disco").is_err());
    }

    #[test]
    fn config_snapshot_reports_the_current_selection() {
        let mut s = session();
        s.select_court("base-panoramic").unwrap();
        s.select_lighting("lights-top").unwrap();
        s.set_scene_lighting("night").unwrap();
        s.set_structure_color("#1e66ff").unwrap();
        s.add_extra("bench").unwrap();

        let snap = s.config_snapshot();
        assert_eq!(snap.court, Selection::new("base-panoramic", "Base panoramic"));
        assert_eq!(snap.lighting, Selection::new("lights-top", "Top lights"));
        assert_eq!(snap.scene_lighting, Selection::new("night", "Night"));
        assert_eq!(snap.structure_color.as_deref(), Some("#1e66ff"));
        assert_eq!(snap.extras, vec![Selection::new("bench", "Player bench")]);
    }

    #[test]
    fn rendered_frame_matches_the_preview_size() {
        let mut s = session();
        s.select_court("base").unwrap();
        s.settle();
        let frame = s.render_frame();
        assert_eq!(frame.dimensions(), (1280, 720));
    }
}
