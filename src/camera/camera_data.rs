//! Camera data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in camera_operations.rs

use crate::physics::ActorId;
use crate::transform::Rotator;
use cgmath::Point3;

/// Camera data structure - pure data, no methods
#[derive(Debug, Clone, PartialEq)]
pub struct CameraData {
    /// Scene identity of the camera actor
    pub actor: ActorId,

    /// Actor name, used as the export directory name
    pub name: String,

    /// Camera position in world space (engine units)
    pub position: Point3<f32>,

    /// Camera orientation, engine rotator in degrees
    pub rotation: Rotator,

    /// Horizontal field of view (degrees)
    pub fov_degrees: f32,

    /// Output resolution in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            actor: ActorId(0),
            name: "Camera".to_string(),
            position: Point3::new(0.0, 0.0, 0.0),
            rotation: Rotator::default(),
            fov_degrees: 90.0,
            width: 1920,
            height: 1080,
        }
    }
}
