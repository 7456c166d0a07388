/// Occlusion Module - Data-Oriented Programming (DOP) style
///
/// - occlusion_data.rs: labels and per-batch reports
/// - occlusion_operations.rs: ray-cast classification of sampled points
///

pub mod occlusion_data;
pub mod occlusion_operations;

pub use occlusion_data::{OcclusionLabel, OcclusionReport, OcclusionSettings};

pub use occlusion_operations::{
    // Single point
    classify_hit,
    classify_point,

    // Batches
    classify_points,
    occlusion_rates,

    // Actors
    detect_mesh_occlusion,
    detect_skeleton_occlusion,
};
