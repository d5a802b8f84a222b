//! The product catalog: which courts, lighting rigs, extras, colors and
//! scene moods the configurator offers, and which asset files back them.
//!
//! Candidate file lists exist because exported assets have shipped under
//! more than one name (including accidental `.glb.glb` double
//! extensions); the resolver tries them in order and the first hit wins.

use renderer::LightingPreset;

/// Exact material name the structure repaint targets. `Black.001` and
/// friends are deliberately left untouched.
pub const STRUCTURE_MATERIAL: &str = "Black";

/// A court model the customer can pick. Courts anchor the scene.
pub struct CourtOption {
    pub id: &'static str,
    pub label: &'static str,
    pub candidates: &'static [&'static str],
}

pub const COURTS: &[CourtOption] = &[
    CourtOption {
        id: "base",
        label: "Base court",
        candidates: &["padel_base.glb", "padel_base.glb.glb"],
    },
    CourtOption {
        id: "base-panoramic",
        label: "Base panoramic",
        candidates: &["padel_base_panoramic.glb", "padel_base_panoramic.glb.glb"],
    },
    CourtOption {
        id: "ultra-panoramic",
        label: "Ultra panoramic",
        candidates: &["padel_ultra_panoramic.glb", "padel_ultra_panoramic.glb.glb"],
    },
];

/// A lighting rig option. An empty candidate list means "no rig asset";
/// `lift` raises the rig above the court rim once it is flush-aligned.
pub struct LightingOption {
    pub id: &'static str,
    pub label: &'static str,
    pub candidates: &'static [&'static str],
    pub lift: f32,
}

pub const LIGHTING: &[LightingOption] = &[
    LightingOption { id: "none", label: "No lighting", candidates: &[], lift: 0.0 },
    LightingOption {
        id: "lights-top",
        label: "Top lights",
        candidates: &["padel_lights_top.glb", "padel_lights_top.glb.glb", "lights_top.glb"],
        lift: 7.5,
    },
];

/// Add-on assets that sit flush on the ground next to the court.
pub struct ExtraOption {
    pub id: &'static str,
    pub label: &'static str,
    pub candidates: &'static [&'static str],
}

pub const EXTRAS: &[ExtraOption] = &[
    ExtraOption {
        id: "scoreboard",
        label: "Scoreboard",
        candidates: &["scoreboard.glb", "scoreboard.glb.glb"],
    },
    ExtraOption {
        id: "bench",
        label: "Player bench",
        candidates: &["bench.glb", "bench.glb.glb"],
    },
];

/// Structure color swatches offered in the UI. Any valid hex value is
/// accepted on the command line; these are just the curated picks.
pub struct ColorSwatch {
    pub label: &'static str,
    pub hex: &'static str,
}

pub const STRUCTURE_COLORS: &[ColorSwatch] = &[
    ColorSwatch { label: "Factory black", hex: "#1a1a1a" },
    ColorSwatch { label: "Club blue", hex: "#1e66ff" },
    ColorSwatch { label: "Tournament green", hex: "#0f7a3d" },
    ColorSwatch { label: "Signal red", hex: "#c8102e" },
    ColorSwatch { label: "Pure white", hex: "#f4f4f4" },
];

/// Scene mood option, mapped onto a preview lighting preset.
pub struct SceneLightingOption {
    pub id: &'static str,
    pub label: &'static str,
    pub preset: LightingPreset,
}

pub const SCENE_LIGHTING: &[SceneLightingOption] = &[
    SceneLightingOption { id: "studio", label: "Studio", preset: LightingPreset::Studio },
    SceneLightingOption { id: "sunny", label: "Sunny", preset: LightingPreset::Sunny },
    SceneLightingOption { id: "arena", label: "Arena", preset: LightingPreset::Arena },
    SceneLightingOption { id: "night", label: "Night", preset: LightingPreset::Night },
];

pub fn court(id: &str) -> Option<&'static CourtOption> {
    COURTS.iter().find(|c| c.id == id)
}

pub fn lighting(id: &str) -> Option<&'static LightingOption> {
    LIGHTING.iter().find(|l| l.id == id)
}

pub fn extra(id: &str) -> Option<&'static ExtraOption> {
    EXTRAS.iter().find(|e| e.id == id)
}

pub fn scene_lighting(id: &str) -> Option<&'static SceneLightingOption> {
    SCENE_LIGHTING.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_within_each_list() {
        let courts: HashSet<_> = COURTS.iter().map(|c| c.id).collect();
        assert_eq!(courts.len(), COURTS.len());
        let lighting: HashSet<_> = LIGHTING.iter().map(|l| l.id).collect();
        assert_eq!(lighting.len(), LIGHTING.len());
    }

    #[test]
    fn every_court_has_at_least_one_candidate_file() {
        for court in COURTS {
            assert!(!court.candidates.is_empty(), "{} has no files", court.id);
        }
    }

    #[test]
    fn lookups_find_known_ids_and_reject_unknown() {
        assert_eq!(court("ultra-panoramic").unwrap().label, "Ultra panoramic");
        assert!(court("olympic").is_none());
        assert_eq!(lighting("lights-top").unwrap().lift, 7.5);
        assert_eq!(scene_lighting("night").unwrap().preset, LightingPreset::Night);
    }

    #[test]
    fn swatches_parse_as_colors() {
        for swatch in STRUCTURE_COLORS {
            assert!(engine_core::Rgba::from_hex(swatch.hex).is_ok(), "{}", swatch.hex);
        }
    }
}
