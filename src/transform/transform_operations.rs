//! Transform operations - Pure DOP functions
//!
//! Point/vector transforms, rotator conversion and axis remapping between the
//! engine convention and the computer-vision convention.

use super::transform_data::{AxisMapping, Rotator, SignedAxis, Transform, CV_TO_ENGINE, ENGINE_TO_CV};
use super::TransformError;
use cgmath::{ElementWise, Matrix, Matrix3, Point3, Quaternion, Vector3};

// ============================================================================
// POINT / VECTOR TRANSFORMS
// ============================================================================

/// Component-space point to world space: scale, then rotate, then translate
pub fn transform_position(transform: &Transform, point: Point3<f32>) -> Point3<f32> {
    let local = Vector3::new(point.x, point.y, point.z).mul_element_wise(transform.scale);
    let world = transform.rotation * local + transform.translation;
    Point3::new(world.x, world.y, world.z)
}

// ============================================================================
// ROTATORS
// ============================================================================

/// Rotation matrix of a rotator; columns are the rotated X, Y, Z axes
pub fn rotator_to_matrix(rotator: &Rotator) -> Matrix3<f32> {
    let (sp, cp) = rotator.pitch.to_radians().sin_cos();
    let (sy, cy) = rotator.yaw.to_radians().sin_cos();
    let (sr, cr) = rotator.roll.to_radians().sin_cos();

    let x_axis = Vector3::new(cp * cy, cp * sy, sp);
    let y_axis = Vector3::new(sr * sp * cy - cr * sy, sr * sp * sy + cr * cy, -sr * cp);
    let z_axis = Vector3::new(-(cr * sp * cy + sr * sy), cy * sr - cr * sp * sy, cr * cp);

    Matrix3::from_cols(x_axis, y_axis, z_axis)
}

pub fn rotator_to_quaternion(rotator: &Rotator) -> Quaternion<f32> {
    Quaternion::from(rotator_to_matrix(rotator))
}

/// Inverse of [`rotator_to_matrix`] for proper rotation matrices
pub fn matrix_to_rotator(matrix: &Matrix3<f32>) -> Rotator {
    let x_axis = matrix.x;
    let pitch = x_axis.z.atan2((x_axis.x * x_axis.x + x_axis.y * x_axis.y).sqrt());
    let yaw = x_axis.y.atan2(x_axis.x);
    let roll = (-matrix.y.z).atan2(matrix.z.z);

    Rotator {
        pitch: pitch.to_degrees(),
        yaw: yaw.to_degrees(),
        roll: roll.to_degrees(),
    }
}

pub fn quaternion_to_rotator(rotation: Quaternion<f32>) -> Rotator {
    matrix_to_rotator(&Matrix3::from(rotation))
}

/// Forward (+X) axis of a rotator
pub fn rotator_forward(rotator: &Rotator) -> Vector3<f32> {
    rotator_to_matrix(rotator).x
}

// ============================================================================
// AXIS REMAPPING
// ============================================================================

fn axis_slot(axis: SignedAxis) -> (usize, f32) {
    match axis {
        SignedAxis::PosX => (0, 1.0),
        SignedAxis::NegX => (0, -1.0),
        SignedAxis::PosY => (1, 1.0),
        SignedAxis::NegY => (1, -1.0),
        SignedAxis::PosZ => (2, 1.0),
        SignedAxis::NegZ => (2, -1.0),
    }
}

fn signed_axis(slot: usize, sign: f32) -> SignedAxis {
    match (slot, sign > 0.0) {
        (0, true) => SignedAxis::PosX,
        (0, false) => SignedAxis::NegX,
        (1, true) => SignedAxis::PosY,
        (1, false) => SignedAxis::NegY,
        (2, true) => SignedAxis::PosZ,
        _ => SignedAxis::NegZ,
    }
}

fn unit_vector(axis: SignedAxis) -> Vector3<f32> {
    let (slot, sign) = axis_slot(axis);
    let mut v = Vector3::new(0.0, 0.0, 0.0);
    v[slot] = sign;
    v
}

/// Reject mappings that send two source axes onto the same destination axis
pub fn validate_mapping(mapping: &AxisMapping) -> Result<(), TransformError> {
    let slots = [
        axis_slot(mapping.src_x_in_dst).0,
        axis_slot(mapping.src_y_in_dst).0,
        axis_slot(mapping.src_z_in_dst).0,
    ];
    for a in 0..3 {
        for b in (a + 1)..3 {
            if slots[a] == slots[b] {
                return Err(TransformError::DuplicateAxis {
                    first: a,
                    second: b,
                    mapping: *mapping,
                });
            }
        }
    }
    Ok(())
}

/// Signed permutation matrix of a mapping; column i is where source axis i lands
pub fn mapping_matrix(mapping: &AxisMapping) -> Result<Matrix3<f32>, TransformError> {
    validate_mapping(mapping)?;
    Ok(Matrix3::from_cols(
        unit_vector(mapping.src_x_in_dst),
        unit_vector(mapping.src_y_in_dst),
        unit_vector(mapping.src_z_in_dst),
    ))
}

/// Mapping that undoes `mapping`
pub fn inverse_mapping(mapping: &AxisMapping) -> Result<AxisMapping, TransformError> {
    validate_mapping(mapping)?;
    let sources = [mapping.src_x_in_dst, mapping.src_y_in_dst, mapping.src_z_in_dst];

    // Destination slot k came from source slot i, so the inverse sends k back to i
    let mut inverse = [SignedAxis::PosX; 3];
    for (src_slot, axis) in sources.iter().enumerate() {
        let (dst_slot, sign) = axis_slot(*axis);
        inverse[dst_slot] = signed_axis(src_slot, sign);
    }

    Ok(AxisMapping {
        src_x_in_dst: inverse[0],
        src_y_in_dst: inverse[1],
        src_z_in_dst: inverse[2],
    })
}

/// Remap a point between frames
pub fn convert_point(point: Point3<f32>, mapping: &AxisMapping) -> Result<Point3<f32>, TransformError> {
    let m = mapping_matrix(mapping)?;
    let v = m * Vector3::new(point.x, point.y, point.z);
    Ok(Point3::new(v.x, v.y, v.z))
}

/// Remap a transform's position and rotation between frames
///
/// Position becomes `M p`, rotation becomes `M R Mᵀ`. Scale magnitudes follow
/// their axes; no unit change is applied.
pub fn convert_axes(transform: &Transform, mapping: &AxisMapping) -> Result<Transform, TransformError> {
    let m = mapping_matrix(mapping)?;

    let translation = m * transform.translation;
    let rotation_matrix = m * Matrix3::from(transform.rotation) * m.transpose();

    let mut scale = Vector3::new(1.0, 1.0, 1.0);
    let sources = [mapping.src_x_in_dst, mapping.src_y_in_dst, mapping.src_z_in_dst];
    for (src_slot, axis) in sources.iter().enumerate() {
        let (dst_slot, _) = axis_slot(*axis);
        scale[dst_slot] = transform.scale[src_slot];
    }

    Ok(Transform {
        translation,
        rotation: Quaternion::from(rotation_matrix),
        scale,
    })
}

/// Convenience wrapper taking the three signed axes directly
pub fn convert_axes_with(
    transform: &Transform,
    src_x_in_dst: SignedAxis,
    src_y_in_dst: SignedAxis,
    src_z_in_dst: SignedAxis,
) -> Result<Transform, TransformError> {
    convert_axes(
        transform,
        &AxisMapping {
            src_x_in_dst,
            src_y_in_dst,
            src_z_in_dst,
        },
    )
}

pub fn engine_to_cv(transform: &Transform) -> Transform {
    // Constant mapping is a valid permutation
    convert_axes(transform, &ENGINE_TO_CV).unwrap_or(*transform)
}

pub fn cv_to_engine(transform: &Transform) -> Transform {
    convert_axes(transform, &CV_TO_ENGINE).unwrap_or(*transform)
}

/// Remap a batch of engine-space points into the CV convention
pub fn engine_points_to_cv(points: &[Point3<f32>]) -> Vec<Point3<f32>> {
    points
        .iter()
        .map(|p| Point3::new(p.y, -p.z, p.x))
        .collect()
}
