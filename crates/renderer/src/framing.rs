//! Automatic camera framing: fit a bounding box into the view, and
//! animate between framed poses without fighting the user.

use crate::camera::Camera;
use engine_core::Aabb;
use glam::Vec3;

/// How long after user interaction ends before automatic framing may
/// move the camera again.
pub const INTERACTION_COOLDOWN: f32 = 0.75;

/// Default transition duration in seconds.
pub const TRANSITION_DURATION: f32 = 0.8;

/// A framed camera pose: eye position and look-target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

/// Distance at which a box of `max_dim` fits the frustum, with
/// `offset_factor > 1` leaving margin around the subject.
pub fn fit_distance(bounds: &Aabb, fov: f32, aspect: f32, offset_factor: f32) -> f32 {
    let max_dim = bounds.max_dim();
    let fit_height = max_dim / (2.0 * (fov / 2.0).tan());
    let fit_width = fit_height / aspect;
    offset_factor * fit_height.max(fit_width)
}

/// Pose framing `bounds` from the `bias` direction. A degenerate box
/// yields `None` (nothing to frame yet).
pub fn pose_for(
    bounds: &Aabb,
    bias: Vec3,
    fov: f32,
    aspect: f32,
    offset_factor: f32,
) -> Option<CameraPose> {
    if bounds.is_degenerate() {
        return None;
    }
    let center = bounds.center();
    let distance = fit_distance(bounds, fov, aspect, offset_factor);
    Some(CameraPose {
        position: center + bias.normalize_or_zero() * distance,
        target: center,
    })
}

/// A named framing preset: which direction to look from and how much
/// margin to leave. The caller maps the preset to a target box (whole
/// scene or a single sub-asset).
#[derive(Debug, Clone)]
pub struct ViewPreset {
    pub name: &'static str,
    pub bias: Vec3,
    pub offset_factor: f32,
}

impl ViewPreset {
    /// Wide establishing shot, slightly elevated three-quarter view.
    pub fn establishing() -> Self {
        Self {
            name: "establishing",
            bias: Vec3::new(1.2, 0.65, 1.25),
            offset_factor: 1.3,
        }
    }

    /// Close-in detail shot on a specific sub-asset.
    pub fn detail() -> Self {
        Self {
            name: "detail",
            bias: Vec3::new(0.6, 0.35, 1.0),
            offset_factor: 1.05,
        }
    }
}

/// Smoothstep ease-in-out over `t` in `[0, 1]`.
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

struct Transition {
    from: CameraPose,
    to: CameraPose,
    elapsed: f32,
    duration: f32,
}

/// Drives the camera toward requested poses, one tick per animation
/// frame. Transition requests while the user is manipulating the view
/// (or during the cooldown after) are dropped so input is never fought.
pub struct FramingController {
    transition: Option<Transition>,
    user_interacting: bool,
    cooldown_remaining: f32,
}

impl Default for FramingController {
    fn default() -> Self {
        Self::new()
    }
}

impl FramingController {
    pub fn new() -> Self {
        Self {
            transition: None,
            user_interacting: false,
            cooldown_remaining: 0.0,
        }
    }

    /// Request an animated transition to `pose`. Returns false when
    /// suppressed by interaction or cooldown. A granted request cancels
    /// any in-flight transition.
    pub fn focus(&mut self, camera: &Camera, pose: CameraPose) -> bool {
        if self.is_suppressed() {
            log::debug!("framing request suppressed (user interaction)");
            return false;
        }
        self.transition = Some(Transition {
            from: CameraPose {
                position: camera.position,
                target: camera.target,
            },
            to: pose,
            elapsed: 0.0,
            duration: TRANSITION_DURATION,
        });
        true
    }

    /// Jump to `pose` immediately (initial placement, no animation).
    pub fn snap(&mut self, camera: &mut Camera, pose: CameraPose) {
        self.transition = None;
        camera.position = pose.position;
        camera.target = pose.target;
    }

    /// The user started manipulating the view; halt any in-progress
    /// interpolation immediately.
    pub fn begin_interaction(&mut self) {
        self.user_interacting = true;
        self.transition = None;
    }

    /// The user released the view; framing stays suppressed for a
    /// short cooldown window.
    pub fn end_interaction(&mut self) {
        self.user_interacting = false;
        self.cooldown_remaining = INTERACTION_COOLDOWN;
    }

    pub fn is_suppressed(&self) -> bool {
        self.user_interacting || self.cooldown_remaining > 0.0
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Advance the cooldown and any active transition by `dt` seconds,
    /// writing the interpolated pose into `camera`.
    pub fn tick(&mut self, camera: &mut Camera, dt: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }
        let Some(tr) = &mut self.transition else {
            return;
        };
        tr.elapsed += dt;
        let t = ease_in_out(tr.elapsed / tr.duration);
        camera.position = tr.from.position.lerp(tr.to.position, t);
        camera.target = tr.from.target.lerp(tr.to.target, t);
        if tr.elapsed >= tr.duration {
            camera.position = tr.to.position;
            camera.target = tr.to.target;
            self.transition = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn fit_distance_matches_formula() {
        let bounds = unit_box(); // max_dim = 2
        let fov = std::f32::consts::FRAC_PI_2; // tan(fov/2) = 1
        let d = fit_distance(&bounds, fov, 2.0, 1.0);
        // fit_height = 2 / 2 = 1; fit_width = 0.5; distance = 1.
        assert!((d - 1.0).abs() < 1e-5);
    }

    #[test]
    fn narrow_aspect_pushes_camera_back() {
        let bounds = unit_box();
        let fov = std::f32::consts::FRAC_PI_2;
        // aspect 0.5: fit_width = fit_height / 0.5 dominates.
        let d = fit_distance(&bounds, fov, 0.5, 1.0);
        assert!((d - 2.0).abs() < 1e-5);
    }

    #[test]
    fn pose_for_looks_at_center_from_bias() {
        let bounds = Aabb::new(Vec3::ZERO, Vec3::splat(2.0));
        let pose = pose_for(&bounds, Vec3::X, 1.0, 1.0, 1.5).unwrap();
        assert_eq!(pose.target, Vec3::splat(1.0));
        assert!(pose.position.x > pose.target.x);
        assert!((pose.position.y - pose.target.y).abs() < 1e-5);
    }

    #[test]
    fn degenerate_box_has_no_pose() {
        assert!(pose_for(&Aabb::EMPTY, Vec3::ONE, 1.0, 1.0, 1.0).is_none());
    }

    #[test]
    fn transition_eases_to_goal() {
        let mut camera = Camera {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            ..Default::default()
        };
        let mut framing = FramingController::new();
        let goal = CameraPose {
            position: Vec3::new(10.0, 0.0, 0.0),
            target: Vec3::new(1.0, 0.0, 0.0),
        };
        assert!(framing.focus(&camera, goal));

        // Halfway: somewhere strictly between start and goal.
        framing.tick(&mut camera, TRANSITION_DURATION / 2.0);
        assert!(camera.position.x > 0.0 && camera.position.x < 10.0);
        assert!(framing.is_transitioning());

        // Completion lands exactly on the goal.
        framing.tick(&mut camera, TRANSITION_DURATION);
        assert_eq!(camera.position, goal.position);
        assert_eq!(camera.target, goal.target);
        assert!(!framing.is_transitioning());
    }

    #[test]
    fn interaction_cancels_and_suppresses() {
        let mut camera = Camera::default();
        let start = camera.position;
        let mut framing = FramingController::new();
        let goal = CameraPose { position: Vec3::splat(5.0), target: Vec3::ZERO };

        assert!(framing.focus(&camera, goal));
        framing.begin_interaction();
        assert!(!framing.is_transitioning());

        // Suppressed while interacting and during cooldown.
        assert!(!framing.focus(&camera, goal));
        framing.end_interaction();
        assert!(!framing.focus(&camera, goal));

        // Cooldown expires; requests flow again.
        framing.tick(&mut camera, INTERACTION_COOLDOWN + 0.01);
        assert!(framing.focus(&camera, goal));
        assert_eq!(camera.position, start); // focus alone moves nothing
    }

    #[test]
    fn new_request_replaces_in_flight_transition() {
        let mut camera = Camera { position: Vec3::ZERO, target: Vec3::ZERO, ..Default::default() };
        let mut framing = FramingController::new();
        framing.focus(&camera, CameraPose { position: Vec3::splat(10.0), target: Vec3::ZERO });
        framing.tick(&mut camera, 0.1);

        let second = CameraPose { position: Vec3::new(-4.0, 0.0, 0.0), target: Vec3::ZERO };
        assert!(framing.focus(&camera, second));
        framing.tick(&mut camera, TRANSITION_DURATION * 2.0);
        assert_eq!(camera.position, second.position);
    }
}
