//! Viewing side of CourtViz: orbit camera, auto-framing with eased
//! transitions, a flat-shaded software preview raster, and snapshot
//! capture for lead submissions.

pub mod camera;
pub mod framing;
pub mod raster;
pub mod snapshot;

pub use camera::Camera;
pub use framing::{fit_distance, pose_for, CameraPose, FramingController, ViewPreset};
pub use raster::{LightingPreset, PreviewRaster};
pub use snapshot::{capture, RenderSurface, Snapshot};
