//! Occlusion operations - Pure DOP functions
//!
//! One visibility ray per point, from the camera to the point. What stops the
//! ray decides the label.

use super::occlusion_data::{OcclusionLabel, OcclusionReport};
use crate::camera::{validate_camera, CameraData};
use crate::error::{CaptureError, CaptureResult};
use crate::mesh::{
    actor_id, actor_name, get_joint_positions, sample_actor_points, sample_stride, BoundActor,
    SkinnedMeshHandle,
};
use crate::physics::{ActorId, RayHit, Raycaster, TraceChannel};
use cgmath::Point3;

// ============================================================================
// SINGLE POINT
// ============================================================================

/// Label a finished ray query against the owner's identity
///
/// A hit on the owner counts as self-occlusion only when it stopped closer than
/// `thickness` to the target; farther owner hits are treated as grazing the
/// silhouette and stay non-occluded.
pub fn classify_hit(hit: &RayHit, owner: ActorId, thickness: f32) -> OcclusionLabel {
    if !hit.hit {
        return OcclusionLabel::NonOcclusion;
    }

    match &hit.actor {
        Some(actor) if actor.id == owner => {
            if hit.distance_to_target < thickness {
                OcclusionLabel::SelfOcclusion
            } else {
                OcclusionLabel::NonOcclusion
            }
        }
        Some(_) => OcclusionLabel::InterOcclusion,
        // Blocked by geometry with no owning actor
        None => OcclusionLabel::InterOcclusion,
    }
}

/// Cast one visibility ray from `origin` to `target` and label it
pub fn classify_point<R: Raycaster + ?Sized>(
    raycaster: &R,
    origin: Point3<f32>,
    target: Point3<f32>,
    owner: ActorId,
    thickness: f32,
) -> OcclusionLabel {
    let hit = raycaster.cast_ray(origin, target, TraceChannel::Visibility);
    classify_hit(&hit, owner, thickness)
}

// ============================================================================
// BATCHES
// ============================================================================

/// Fraction of each label; zero everywhere when there are no labels
pub fn occlusion_rates(labels: &[OcclusionLabel]) -> (f32, f32, f32) {
    if labels.is_empty() {
        return (0.0, 0.0, 0.0);
    }

    let (mut non, mut self_, mut inter) = (0usize, 0usize, 0usize);
    for label in labels {
        match label {
            OcclusionLabel::NonOcclusion => non += 1,
            OcclusionLabel::SelfOcclusion => self_ += 1,
            OcclusionLabel::InterOcclusion => inter += 1,
        }
    }

    let total = labels.len() as f32;
    (non as f32 / total, self_ as f32 / total, inter as f32 / total)
}

fn check_origin(origin: Point3<f32>) -> CaptureResult<()> {
    if origin.x.is_finite() && origin.y.is_finite() && origin.z.is_finite() {
        Ok(())
    } else {
        Err(CaptureError::InvalidInput {
            what: "ray origin".to_string(),
            reason: format!("non-finite position {:?}", origin),
        })
    }
}

/// Label every point and aggregate the rates
///
/// An invalid origin or thickness fails before any ray is cast. An empty point
/// set is not an error: the report comes back flagged `degenerate`.
pub fn classify_points<R: Raycaster + ?Sized>(
    raycaster: &R,
    points: &[Point3<f32>],
    origin: Point3<f32>,
    owner: ActorId,
    thickness: f32,
) -> CaptureResult<OcclusionReport> {
    check_origin(origin)?;
    if !(thickness.is_finite() && thickness >= 0.0) {
        return Err(CaptureError::InvalidInput {
            what: "mesh thickness".to_string(),
            reason: format!("{} is not a finite non-negative distance", thickness),
        });
    }

    if points.is_empty() {
        log::error!("[classify_points] No points to classify for actor {:?}", owner);
        return Ok(OcclusionReport {
            degenerate: true,
            ..Default::default()
        });
    }

    let labels: Vec<OcclusionLabel> = points
        .iter()
        .map(|p| classify_point(raycaster, origin, *p, owner, thickness))
        .collect();
    let (non, self_, inter) = occlusion_rates(&labels);

    log::debug!(
        "[classify_points] {:?}: {} points, non={:.3} self={:.3} inter={:.3}",
        owner,
        labels.len(),
        non,
        self_,
        inter
    );

    Ok(OcclusionReport {
        labels,
        non_occlusion_rate: non,
        self_occlusion_rate: self_,
        inter_occlusion_rate: inter,
        degenerate: false,
    })
}

// ============================================================================
// ACTORS
// ============================================================================

/// Sample a mesh actor's vertices (every `stride`-th) and classify them
pub fn detect_mesh_occlusion<R: Raycaster + ?Sized>(
    raycaster: &R,
    actor: &BoundActor,
    camera: &CameraData,
    lod: usize,
    stride: usize,
    thickness: f32,
) -> CaptureResult<OcclusionReport> {
    validate_camera(camera)?;

    let points = sample_actor_points(actor, lod)?;
    let sampled = sample_stride(&points, stride);

    log::info!(
        "[detect_mesh_occlusion] {}: {} of {} vertices sampled",
        actor_name(actor),
        sampled.len(),
        points.len()
    );

    classify_points(raycaster, &sampled, camera.position, actor_id(actor), thickness)
}

/// Classify every joint of a skinned mesh
///
/// Returns joint positions and names alongside the report so callers can
/// export them with matching indices.
pub fn detect_skeleton_occlusion<R: Raycaster + ?Sized>(
    raycaster: &R,
    mesh: &SkinnedMeshHandle,
    camera: &CameraData,
    thickness: f32,
) -> CaptureResult<(OcclusionReport, Vec<Point3<f32>>, Vec<String>)> {
    validate_camera(camera)?;

    let (positions, names) = get_joint_positions(&mesh.skeleton);
    let report = classify_points(raycaster, &positions, camera.position, mesh.actor, thickness)?;
    Ok((report, positions, names))
}
