//! Mesh data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! Sampling happens in mesh_operations.rs

use crate::camera::CameraData;
use crate::physics::ActorId;
use crate::transform::Transform;
use cgmath::{Matrix4, Point3};

/// One level of detail of a static mesh, in component space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticLod {
    pub positions: Vec<Point3<f32>>,
    /// Triangle list, three indices per face
    pub indices: Vec<u32>,
}

/// Static mesh instance placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct MeshHandle {
    pub actor: ActorId,
    pub name: String,
    pub stencil_value: i32,
    /// Component to world
    pub transform: Transform,
    pub lods: Vec<StaticLod>,
}

/// A single bone's contribution to a skinned vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinInfluence {
    pub bone: usize,
    pub weight: f32,
}

/// One level of detail of a skinned mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinnedLod {
    /// Bind-pose positions in component space
    pub ref_positions: Vec<Point3<f32>>,
    /// Per-vertex influences, parallel to `ref_positions`
    pub influences: Vec<Vec<SkinInfluence>>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    /// World space
    pub position: Point3<f32>,
}

/// Joints in the skeleton's native order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonHandle {
    pub joints: Vec<Joint>,
}

/// Skinned mesh instance with its current pose
#[derive(Debug, Clone, PartialEq)]
pub struct SkinnedMeshHandle {
    pub actor: ActorId,
    pub name: String,
    pub stencil_value: i32,
    pub transform: Transform,
    pub lods: Vec<SkinnedLod>,
    /// Current pose, one matrix per bone, bind pose to component space
    pub ref_to_local: Vec<Matrix4<f32>>,
    pub skeleton: SkeletonHandle,
}

/// Scene actor resolved once at bind time
#[derive(Debug, Clone, PartialEq)]
pub enum BoundActor {
    Static(MeshHandle),
    Skinned(SkinnedMeshHandle),
    Camera(CameraData),
}

/// Which sign of `dot(camera_forward, normal)` keeps a triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum CullingConvention {
    /// Keep faces with `dot > 0`
    PositiveDot,
    /// Keep faces with `dot < 0`
    #[default]
    NegativeDot,
}
