//! Transform data structures - Pure DOP
//!
//! NO METHODS beyond trivial constructors. Just data.
//! All transformations happen in transform_operations.rs

use cgmath::{One, Quaternion, Vector3};
use serde::{Deserialize, Serialize};

/// World transform of a component: translation, rotation, scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Engine-style rotator in degrees
///
/// Pitch tilts the forward (+X) axis toward +Z, yaw turns it toward +Y and
/// roll spins around it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// One of the six signed unit axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignedAxis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

/// Where each source axis lands in the destination frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisMapping {
    pub src_x_in_dst: SignedAxis,
    pub src_y_in_dst: SignedAxis,
    pub src_z_in_dst: SignedAxis,
}

/// Engine convention (X forward, Y right, Z up) to the common computer-vision
/// convention (X right, Y down, Z forward): `(x, y, z) -> (y, -z, x)`
pub const ENGINE_TO_CV: AxisMapping = AxisMapping {
    src_x_in_dst: SignedAxis::PosZ,
    src_y_in_dst: SignedAxis::PosX,
    src_z_in_dst: SignedAxis::NegY,
};

/// Exact inverse of [`ENGINE_TO_CV`]: `(x, y, z) -> (z, x, -y)`
pub const CV_TO_ENGINE: AxisMapping = AxisMapping {
    src_x_in_dst: SignedAxis::PosY,
    src_y_in_dst: SignedAxis::NegZ,
    src_z_in_dst: SignedAxis::PosX,
};
