//! Camera operations - Pure DOP functions
//!
//! Camera parameters for export, the forward axis used by face culling and
//! the visual-center probe.

use super::camera_data::CameraData;
use crate::constants::camera::VISUAL_CENTER_PROBE_LENGTH;
use crate::error::{CaptureError, CaptureResult};
use crate::physics::{Raycaster, TraceChannel};
use crate::transform::{engine_to_cv, rotator_forward, rotator_to_quaternion, Rotator, Transform};
use cgmath::{Point3, Vector3};

// ============================================================================
// INITIALIZATION
// ============================================================================

/// Initialize camera at a pose, keeping default lens and resolution
pub fn init_camera(name: &str, position: Point3<f32>, rotation: Rotator) -> CameraData {
    CameraData {
        name: name.to_string(),
        position,
        rotation,
        ..Default::default()
    }
}

/// Reject cameras whose pose or lens cannot produce rays
pub fn validate_camera(camera: &CameraData) -> CaptureResult<()> {
    let p = camera.position;
    if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
        return Err(CaptureError::InvalidInput {
            what: format!("camera {}", camera.name),
            reason: format!("non-finite position {:?}", p),
        });
    }

    let r = camera.rotation;
    if !(r.pitch.is_finite() && r.yaw.is_finite() && r.roll.is_finite()) {
        return Err(CaptureError::InvalidInput {
            what: format!("camera {}", camera.name),
            reason: format!("non-finite rotation {:?}", r),
        });
    }

    if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
        return Err(CaptureError::InvalidInput {
            what: format!("camera {}", camera.name),
            reason: format!("field of view {} outside (0, 180)", camera.fov_degrees),
        });
    }

    Ok(())
}

// ============================================================================
// ORIENTATION
// ============================================================================

/// Camera forward axis in world space
pub fn camera_forward(camera: &CameraData) -> Vector3<f32> {
    rotator_forward(&camera.rotation)
}

/// Camera pose as a transform (unit scale)
pub fn camera_transform(camera: &CameraData) -> Transform {
    Transform {
        translation: Vector3::new(camera.position.x, camera.position.y, camera.position.z),
        rotation: rotator_to_quaternion(&camera.rotation),
        ..Default::default()
    }
}

/// Camera pose remapped into the CV convention
pub fn camera_cv_transform(camera: &CameraData) -> Transform {
    engine_to_cv(&camera_transform(camera))
}

// ============================================================================
// EXPORT
// ============================================================================

/// `[x, y, z, roll, pitch, yaw, fov, width, height]`
pub fn camera_parameter_vector(camera: &CameraData) -> [f32; 9] {
    [
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.rotation.roll,
        camera.rotation.pitch,
        camera.rotation.yaw,
        camera.fov_degrees,
        camera.width as f32,
        camera.height as f32,
    ]
}

// ============================================================================
// PROBES
// ============================================================================

/// Where the camera's forward ray first meets the scene
///
/// Returns None when nothing is hit within the probe length.
pub fn visual_center_location<R: Raycaster + ?Sized>(
    raycaster: &R,
    camera: &CameraData,
) -> Option<Point3<f32>> {
    let end = camera.position + camera_forward(camera) * VISUAL_CENTER_PROBE_LENGTH;
    let hit = raycaster.cast_ray(camera.position, end, TraceChannel::Visibility);

    log::debug!(
        "[visual_center_location] {} hit={} at ({:.2}, {:.2}, {:.2})",
        camera.name,
        hit.hit,
        hit.location.x,
        hit.location.y,
        hit.location.z
    );

    if hit.hit {
        Some(hit.location)
    } else {
        None
    }
}
