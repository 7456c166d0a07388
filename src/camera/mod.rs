/// Camera Module - Data-Oriented Programming (DOP) style
///
/// This module follows pure DOP principles:
/// - camera_data.rs: Pure data structures with NO methods
/// - camera_operations.rs: Pure functions that operate on data
///

pub mod camera_data;
pub mod camera_operations;

// Re-export data structures
pub use camera_data::CameraData;

// Re-export all operations
pub use camera_operations::{
    // Initialization
    init_camera,
    validate_camera,

    // Orientation
    camera_forward,
    camera_transform,
    camera_cv_transform,

    // Export
    camera_parameter_vector,

    // Probes
    visual_center_location,
};
