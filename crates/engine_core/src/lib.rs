//! Core types shared by every CourtViz subsystem:
//! - Transform and bounding-box math for scene composition
//! - Color type used by material repainting
//! - Frame timing for the cooperative tick loop

pub mod bounds;
pub mod color;
pub mod time;
pub mod transform;

pub use bounds::*;
pub use color::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
