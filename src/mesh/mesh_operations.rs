//! Mesh sampling operations - Pure DOP functions
//!
//! Every sampler validates its inputs up front and then hands back a lazy
//! iterator, so a failure never leaves a half-filled buffer behind.

use super::mesh_data::{
    BoundActor, CullingConvention, MeshHandle, SkeletonHandle, SkinInfluence, SkinnedLod,
    SkinnedMeshHandle, StaticLod,
};
use crate::error::{CaptureError, CaptureResult, OptionExt};
use crate::physics::ActorId;
use crate::transform::{transform_position, Transform};
use cgmath::{InnerSpace, Matrix4, Point3, Quaternion, Transform as _, Vector3};

// ============================================================================
// LOD LOOKUP
// ============================================================================

/// Indices are 0-based, so `lod == lod_count` is already out of range
fn lod_out_of_range(mesh: &str, lod: usize, lod_count: usize) -> CaptureError {
    log::error!(
        "[lod_out_of_range] LOD error: {} only has {} LODs, but accessing LOD {}",
        mesh,
        lod_count,
        lod
    );
    CaptureError::LodOutOfRange {
        mesh: mesh.to_string(),
        lod,
        lod_count,
    }
}

fn static_lod(mesh: &MeshHandle, lod: usize) -> CaptureResult<&StaticLod> {
    mesh.lods
        .get(lod)
        .ok_or_capture(|| lod_out_of_range(&mesh.name, lod, mesh.lods.len()))
}

fn skinned_lod(mesh: &SkinnedMeshHandle, lod: usize) -> CaptureResult<&SkinnedLod> {
    mesh.lods
        .get(lod)
        .ok_or_capture(|| lod_out_of_range(&mesh.name, lod, mesh.lods.len()))
}

// ============================================================================
// VERTICES
// ============================================================================

/// World-space vertices of a static mesh LOD, in native vertex order
pub fn get_static_vertices(
    mesh: &MeshHandle,
    lod: usize,
) -> CaptureResult<impl Iterator<Item = Point3<f32>> + '_> {
    let data = static_lod(mesh, lod)?;
    let transform = mesh.transform;
    Ok(data
        .positions
        .iter()
        .map(move |p| transform_position(&transform, *p)))
}

fn validate_skin(mesh: &SkinnedMeshHandle, data: &SkinnedLod) -> CaptureResult<()> {
    if data.influences.len() != data.ref_positions.len() {
        return Err(CaptureError::SkinningError {
            mesh: mesh.name.clone(),
            reason: format!(
                "{} influence lists for {} vertices",
                data.influences.len(),
                data.ref_positions.len()
            ),
        });
    }

    let bone_count = mesh.ref_to_local.len();
    for (vertex, influences) in data.influences.iter().enumerate() {
        for influence in influences {
            if influence.bone >= bone_count {
                return Err(CaptureError::SkinningError {
                    mesh: mesh.name.clone(),
                    reason: format!(
                        "vertex {} references bone {} but the pose has {} bones",
                        vertex, influence.bone, bone_count
                    ),
                });
            }
            if !influence.weight.is_finite() {
                return Err(CaptureError::SkinningError {
                    mesh: mesh.name.clone(),
                    reason: format!("vertex {} has a non-finite weight", vertex),
                });
            }
        }
    }
    Ok(())
}

/// Linear blend skinning of one vertex: `sum(w * M * v_ref)`
fn skin_vertex(
    ref_position: Point3<f32>,
    influences: &[SkinInfluence],
    ref_to_local: &[Matrix4<f32>],
) -> Point3<f32> {
    let mut skinned = Vector3::new(0.0, 0.0, 0.0);
    for influence in influences {
        let posed = ref_to_local[influence.bone].transform_point(ref_position);
        skinned += Vector3::new(posed.x, posed.y, posed.z) * influence.weight;
    }
    Point3::new(skinned.x, skinned.y, skinned.z)
}

fn skinned_component_vertices<'a>(
    mesh: &'a SkinnedMeshHandle,
    data: &'a SkinnedLod,
) -> impl Iterator<Item = Point3<f32>> + 'a {
    data.ref_positions
        .iter()
        .zip(data.influences.iter())
        .map(move |(p, influences)| skin_vertex(*p, influences, &mesh.ref_to_local))
}

/// Pose-deformed world-space vertices of a skinned mesh LOD
pub fn get_skinned_vertices(
    mesh: &SkinnedMeshHandle,
    lod: usize,
) -> CaptureResult<impl Iterator<Item = Point3<f32>> + '_> {
    let data = skinned_lod(mesh, lod)?;
    validate_skin(mesh, data)?;

    let transform = mesh.transform;
    Ok(skinned_component_vertices(mesh, data).map(move |p| transform_position(&transform, p)))
}

// ============================================================================
// JOINTS
// ============================================================================

/// Joint positions and names, index-aligned, in skeleton order
pub fn get_joint_positions(skeleton: &SkeletonHandle) -> (Vec<Point3<f32>>, Vec<String>) {
    skeleton
        .joints
        .iter()
        .map(|joint| (joint.position, joint.name.clone()))
        .unzip()
}

// ============================================================================
// FACE CENTERS
// ============================================================================

fn keeps_face(convention: CullingConvention, check: f32) -> bool {
    match convention {
        CullingConvention::PositiveDot => check > 0.0,
        CullingConvention::NegativeDot => check < 0.0,
    }
}

fn check_indices(mesh: &str, indices: &[u32], vertex_count: usize) -> CaptureResult<()> {
    if let Some(bad) = indices.iter().find(|i| **i as usize >= vertex_count) {
        log::error!(
            "[check_indices] {} index buffer references vertex {} of {}",
            mesh,
            bad,
            vertex_count
        );
        return Err(CaptureError::IndexOutOfBounds {
            index: *bad as usize,
            size: vertex_count,
        });
    }
    Ok(())
}

/// Centers of faces passing the culling test
///
/// Normals come from component-space vertices and are rotated by
/// `actor_rotation`; centers are reported in world space. A trailing partial
/// triangle in the index buffer is ignored.
fn facing_centers(
    component_vertices: Vec<Point3<f32>>,
    indices: &[u32],
    transform: &Transform,
    actor_rotation: Quaternion<f32>,
    camera_forward: Vector3<f32>,
    convention: CullingConvention,
) -> Vec<Point3<f32>> {
    let mut centers = Vec::with_capacity(indices.len() / 3);

    for face in indices.chunks_exact(3) {
        let p1 = component_vertices[face[0] as usize];
        let p2 = component_vertices[face[1] as usize];
        let p3 = component_vertices[face[2] as usize];

        let e1 = p2 - p1;
        let e2 = p1 - p3;
        let normal = actor_rotation * e2.cross(e1);

        if keeps_face(convention, camera_forward.dot(normal)) {
            let center = Point3::new(
                (p1.x + p2.x + p3.x) / 3.0,
                (p1.y + p2.y + p3.y) / 3.0,
                (p1.z + p2.z + p3.z) / 3.0,
            );
            centers.push(transform_position(transform, center));
        }
    }

    centers
}

/// World-space centers of static-mesh triangles that pass `convention`
pub fn get_facing_triangle_centers(
    actor_rotation: Quaternion<f32>,
    camera_forward: Vector3<f32>,
    mesh: &MeshHandle,
    lod: usize,
    convention: CullingConvention,
) -> CaptureResult<Vec<Point3<f32>>> {
    let data = static_lod(mesh, lod)?;
    check_indices(&mesh.name, &data.indices, data.positions.len())?;

    Ok(facing_centers(
        data.positions.clone(),
        &data.indices,
        &mesh.transform,
        actor_rotation,
        camera_forward,
        convention,
    ))
}

/// World-space centers of posed skinned-mesh triangles that pass `convention`
pub fn get_skinned_facing_triangle_centers(
    actor_rotation: Quaternion<f32>,
    camera_forward: Vector3<f32>,
    mesh: &SkinnedMeshHandle,
    lod: usize,
    convention: CullingConvention,
) -> CaptureResult<Vec<Point3<f32>>> {
    let data = skinned_lod(mesh, lod)?;
    validate_skin(mesh, data)?;
    check_indices(&mesh.name, &data.indices, data.ref_positions.len())?;

    Ok(facing_centers(
        skinned_component_vertices(mesh, data).collect(),
        &data.indices,
        &mesh.transform,
        actor_rotation,
        camera_forward,
        convention,
    ))
}

// ============================================================================
// SUB-SAMPLING / DISPATCH
// ============================================================================

/// Keep every `stride`-th point starting with the first; stride <= 1 keeps all
pub fn sample_stride<T: Copy>(points: &[T], stride: usize) -> Vec<T> {
    if stride <= 1 {
        return points.to_vec();
    }
    points.iter().step_by(stride).copied().collect()
}

pub fn actor_id(actor: &BoundActor) -> ActorId {
    match actor {
        BoundActor::Static(mesh) => mesh.actor,
        BoundActor::Skinned(mesh) => mesh.actor,
        BoundActor::Camera(camera) => camera.actor,
    }
}

pub fn actor_name(actor: &BoundActor) -> &str {
    match actor {
        BoundActor::Static(mesh) => &mesh.name,
        BoundActor::Skinned(mesh) => &mesh.name,
        BoundActor::Camera(camera) => &camera.name,
    }
}

/// World-space vertices of any mesh actor; cameras have none
pub fn sample_actor_points(actor: &BoundActor, lod: usize) -> CaptureResult<Vec<Point3<f32>>> {
    match actor {
        BoundActor::Static(mesh) => Ok(get_static_vertices(mesh, lod)?.collect()),
        BoundActor::Skinned(mesh) => Ok(get_skinned_vertices(mesh, lod)?.collect()),
        BoundActor::Camera(camera) => {
            log::error!("[sample_actor_points] {} is not a mesh actor", camera.name);
            Err(CaptureError::UnsupportedActor {
                actor: camera.name.clone(),
                kind: "camera".to_string(),
            })
        }
    }
}
