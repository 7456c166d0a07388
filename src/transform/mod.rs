/// Transform Module - Data-Oriented Programming (DOP) style
///
/// - transform_data.rs: transforms, rotators, axis mappings
/// - transform_operations.rs: pure functions over them
///

pub mod transform_data;
pub mod transform_operations;

pub use transform_data::{AxisMapping, Rotator, SignedAxis, Transform, CV_TO_ENGINE, ENGINE_TO_CV};

pub use transform_operations::{
    // Point transforms
    transform_position,

    // Rotators
    rotator_to_matrix,
    rotator_to_quaternion,
    matrix_to_rotator,
    quaternion_to_rotator,
    rotator_forward,

    // Axis remapping
    validate_mapping,
    mapping_matrix,
    inverse_mapping,
    convert_point,
    convert_axes,
    convert_axes_with,
    engine_to_cv,
    cv_to_engine,
    engine_points_to_cv,
};

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("source axes {first} and {second} map onto the same destination axis in {mapping:?}")]
    DuplicateAxis {
        first: usize,
        second: usize,
        mapping: AxisMapping,
    },
}
