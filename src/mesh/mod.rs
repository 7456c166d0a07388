/// Mesh Module - Data-Oriented Programming (DOP) style
///
/// - mesh_data.rs: mesh, skin and skeleton buffers plus the bound-actor union
/// - mesh_operations.rs: world-space vertex, joint and face-center sampling
///

pub mod mesh_data;
pub mod mesh_operations;

pub use mesh_data::{
    BoundActor, CullingConvention, Joint, MeshHandle, SkeletonHandle, SkinInfluence, SkinnedLod,
    SkinnedMeshHandle, StaticLod,
};

pub use mesh_operations::{
    // Vertices
    get_static_vertices,
    get_skinned_vertices,

    // Joints
    get_joint_positions,

    // Face centers
    get_facing_triangle_centers,
    get_skinned_facing_triangle_centers,

    // Sub-sampling / dispatch
    sample_stride,
    sample_actor_points,
    actor_id,
    actor_name,
};
