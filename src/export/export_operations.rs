//! Export operations - Pure DOP functions
//!
//! Binary float buffers, the per-frame directory layout and the exporter that
//! walks one frame's bound actors.

use super::export_data::{ExportSettings, FrameExporter, FrameSummary, PackedPoint};
use crate::camera::{camera_parameter_vector, CameraData};
use crate::constants::export::{
    BONE_NAME_FILE, DIR_ACTOR_INFOS, DIR_CAMERA_PARAMS, DIR_OCCLUSION, DIR_OCCLUSION_RATE,
    DIR_SKELETON, DIR_VERTICES, FRAME_EXTENSION,
};
use crate::error::{CaptureError, CaptureResult, IoContext};
use crate::mesh::{actor_name, get_joint_positions, sample_actor_points, BoundActor};
use crate::occlusion::{
    detect_mesh_occlusion, detect_skeleton_occlusion, OcclusionReport, OcclusionSettings,
};
use crate::physics::Raycaster;
use crate::transform::{engine_points_to_cv, quaternion_to_rotator, Transform};
use cgmath::Point3;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// RAW WRITERS
// ============================================================================

fn ensure_parent(path: &Path) -> CaptureResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
    }
    Ok(())
}

/// Native-endian f32 records, no header; replaces any existing file
pub fn write_float_array(values: &[f32], path: &Path) -> CaptureResult<()> {
    ensure_parent(path)?;
    fs::write(path, bytemuck::cast_slice::<f32, u8>(values)).with_path(path)
}

/// Read back a buffer written by [`write_float_array`]
pub fn read_float_array(path: &Path) -> CaptureResult<Vec<f32>> {
    let bytes = fs::read(path).with_path(path)?;
    if bytes.len() % 4 != 0 {
        return Err(CaptureError::SerializationError {
            context: path.display().to_string(),
            error: format!("{} bytes is not a whole number of f32 records", bytes.len()),
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(bytemuck::pod_read_unaligned::<f32>)
        .collect())
}

pub fn write_byte_array(bytes: &[u8], path: &Path) -> CaptureResult<()> {
    ensure_parent(path)?;
    fs::write(path, bytes).with_path(path)
}

pub fn write_text_file(text: &str, path: &Path) -> CaptureResult<()> {
    ensure_parent(path)?;
    fs::write(path, text).with_path(path)
}

pub fn pack_points(points: &[Point3<f32>]) -> Vec<PackedPoint> {
    points
        .iter()
        .map(|p| PackedPoint { x: p.x, y: p.y, z: p.z })
        .collect()
}

/// `[x0, y0, z0, x1, ...]` as f32 records
pub fn write_point_array(points: &[PackedPoint], path: &Path) -> CaptureResult<()> {
    write_float_array(bytemuck::cast_slice::<PackedPoint, f32>(points), path)
}

// ============================================================================
// LAYOUT
// ============================================================================

/// `{root}/{category}/{actor}/{frame:04}.dat`
pub fn frame_path(root: &Path, category: &str, actor: &str, frame: u32) -> PathBuf {
    root.join(category)
        .join(actor)
        .join(format!("{:04}.{}", frame, FRAME_EXTENSION))
}

/// `{root}/skeleton/{actor}/BoneName.txt`
pub fn bone_name_path(root: &Path, actor: &str) -> PathBuf {
    root.join(DIR_SKELETON).join(actor).join(BONE_NAME_FILE)
}

/// `[x, y, z, roll, pitch, yaw, stencil]`
pub fn actor_info_vector(transform: &Transform, stencil_value: i32) -> [f32; 7] {
    let rotator = quaternion_to_rotator(transform.rotation);
    [
        transform.translation.x,
        transform.translation.y,
        transform.translation.z,
        rotator.roll,
        rotator.pitch,
        rotator.yaw,
        stencil_value as f32,
    ]
}

// ============================================================================
// FRAME EXPORTER
// ============================================================================

pub fn init_frame_exporter(root: impl Into<PathBuf>, settings: ExportSettings) -> FrameExporter {
    FrameExporter {
        root: root.into(),
        settings,
        is_first_frame: true,
        last_frame: None,
    }
}

fn point_buffer(exporter: &FrameExporter, points: &[Point3<f32>]) -> Vec<PackedPoint> {
    if exporter.settings.convert_to_cv {
        pack_points(&engine_points_to_cv(points))
    } else {
        pack_points(points)
    }
}

pub fn export_camera(exporter: &FrameExporter, camera: &CameraData, frame: u32) -> CaptureResult<()> {
    let path = frame_path(&exporter.root, DIR_CAMERA_PARAMS, &camera.name, frame);
    write_float_array(&camera_parameter_vector(camera), &path)
}

/// Actor info, vertices and (for skinned meshes) joints of one mesh actor
pub fn export_actor(exporter: &FrameExporter, actor: &BoundActor, frame: u32) -> CaptureResult<()> {
    let name = actor_name(actor);
    let (transform, stencil) = match actor {
        BoundActor::Static(mesh) => (mesh.transform, mesh.stencil_value),
        BoundActor::Skinned(mesh) => (mesh.transform, mesh.stencil_value),
        BoundActor::Camera(camera) => return export_camera(exporter, camera, frame),
    };

    write_float_array(
        &actor_info_vector(&transform, stencil),
        &frame_path(&exporter.root, DIR_ACTOR_INFOS, name, frame),
    )?;

    if exporter.settings.save_vertices {
        let vertices = sample_actor_points(actor, exporter.settings.lod_index)?;
        write_point_array(
            &point_buffer(exporter, &vertices),
            &frame_path(&exporter.root, DIR_VERTICES, name, frame),
        )?;
    }

    if let (true, BoundActor::Skinned(mesh)) = (exporter.settings.save_skeleton, actor) {
        let (positions, names) = get_joint_positions(&mesh.skeleton);
        if exporter.is_first_frame {
            let mut text = names.join("\n");
            text.push('\n');
            write_text_file(&text, &bone_name_path(&exporter.root, name))?;
        }
        write_point_array(
            &point_buffer(exporter, &positions),
            &frame_path(&exporter.root, DIR_SKELETON, name, frame),
        )?;
    }

    Ok(())
}

/// One byte per label plus `[non, self, inter]` rates
pub fn export_occlusion(
    exporter: &FrameExporter,
    actor: &str,
    report: &OcclusionReport,
    frame: u32,
) -> CaptureResult<()> {
    let bytes: Vec<u8> = report.labels.iter().map(|label| *label as u8).collect();
    write_byte_array(&bytes, &frame_path(&exporter.root, DIR_OCCLUSION, actor, frame))?;
    write_float_array(
        &[
            report.non_occlusion_rate,
            report.self_occlusion_rate,
            report.inter_occlusion_rate,
        ],
        &frame_path(&exporter.root, DIR_OCCLUSION_RATE, actor, frame),
    )
}

fn occlusion_for<R: Raycaster + ?Sized>(
    raycaster: &R,
    actor: &BoundActor,
    camera: &CameraData,
    lod: usize,
    occlusion: &OcclusionSettings,
) -> CaptureResult<OcclusionReport> {
    match actor {
        BoundActor::Skinned(mesh) => {
            detect_skeleton_occlusion(raycaster, mesh, camera, occlusion.mesh_thickness)
                .map(|(report, _, _)| report)
        }
        _ => detect_mesh_occlusion(
            raycaster,
            actor,
            camera,
            lod,
            occlusion.sample_stride,
            occlusion.mesh_thickness,
        ),
    }
}

/// Export every bound actor for one frame
///
/// Frames must come in increasing order. A failing actor is logged and
/// skipped; the rest of the frame is still written.
pub fn export_frame<R: Raycaster + ?Sized>(
    exporter: &mut FrameExporter,
    raycaster: &R,
    actors: &[BoundActor],
    occlusion: &OcclusionSettings,
    frame: u32,
) -> CaptureResult<FrameSummary> {
    if let Some(last) = exporter.last_frame {
        if frame <= last {
            return Err(CaptureError::InvalidInput {
                what: format!("frame {}", frame),
                reason: format!("frames must increase, last exported was {}", last),
            });
        }
    }

    let mut summary = FrameSummary {
        frame,
        ..Default::default()
    };

    let camera = actors.iter().find_map(|actor| match actor {
        BoundActor::Camera(camera) => Some(camera),
        _ => None,
    });

    for actor in actors {
        if let BoundActor::Camera(camera) = actor {
            export_camera(exporter, camera, frame)?;
            summary.cameras_written += 1;
            continue;
        }

        let mut result = export_actor(exporter, actor, frame);
        if result.is_ok() && exporter.settings.save_occlusion {
            if let Some(camera) = camera {
                result = occlusion_for(raycaster, actor, camera, exporter.settings.lod_index, occlusion)
                    .and_then(|report| export_occlusion(exporter, actor_name(actor), &report, frame));
            }
        }

        match result {
            Ok(()) => summary.actors_written += 1,
            Err(e) => {
                log::error!("[export_frame] Skipping {} at frame {}: {}", actor_name(actor), frame, e);
                summary.actors_skipped += 1;
            }
        }
    }

    exporter.is_first_frame = false;
    exporter.last_frame = Some(frame);

    log::debug!(
        "[export_frame] Frame {}: {} cameras, {} actors, {} skipped",
        frame,
        summary.cameras_written,
        summary.actors_written,
        summary.actors_skipped
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{
        Joint, MeshHandle, SkeletonHandle, SkinInfluence, SkinnedLod, SkinnedMeshHandle, StaticLod,
    };
    use crate::occlusion::OcclusionLabel;
    use crate::physics::{ActorId, BoxScene};
    use crate::transform::{rotator_to_quaternion, Rotator};
    use cgmath::{Matrix4, SquareMatrix, Vector3};
    use tempfile::TempDir;

    fn static_actor() -> BoundActor {
        BoundActor::Static(MeshHandle {
            actor: ActorId(1),
            name: "SM_Chair".to_string(),
            stencil_value: 7,
            transform: Transform {
                translation: Vector3::new(10.0, 20.0, 30.0),
                ..Default::default()
            },
            lods: vec![StaticLod {
                positions: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 2.0, 3.0)],
                indices: vec![],
            }],
        })
    }

    fn skinned_actor() -> BoundActor {
        BoundActor::Skinned(SkinnedMeshHandle {
            actor: ActorId(2),
            name: "SK_Human".to_string(),
            stencil_value: 3,
            transform: Transform::default(),
            lods: vec![SkinnedLod {
                ref_positions: vec![Point3::new(0.0, 0.0, 100.0)],
                influences: vec![vec![SkinInfluence { bone: 0, weight: 1.0 }]],
                indices: vec![],
            }],
            ref_to_local: vec![Matrix4::identity()],
            skeleton: SkeletonHandle {
                joints: vec![
                    Joint { name: "pelvis".to_string(), position: Point3::new(0.0, 0.0, 90.0) },
                    Joint { name: "head".to_string(), position: Point3::new(0.0, 0.0, 170.0) },
                ],
            },
        })
    }

    fn camera_actor() -> BoundActor {
        BoundActor::Camera(CameraData {
            name: "Camera".to_string(),
            position: Point3::new(500.0, 0.0, 100.0),
            ..Default::default()
        })
    }

    #[test]
    fn test_float_array_round_trip_and_truncate() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("nested").join("values.dat");

        write_float_array(&[1.0, -2.5, 3.25, 4.0], &path).expect("first write");
        write_float_array(&[9.0], &path).expect("second write");

        let size = fs::metadata(&path).expect("file exists").len();
        assert_eq!(size, 4);
        assert_eq!(read_float_array(&path).expect("readable"), vec![9.0]);
    }

    #[test]
    fn test_frame_path_layout() {
        let path = frame_path(Path::new("seq"), DIR_VERTICES, "SM_Chair", 7);
        assert_eq!(path, Path::new("seq").join("vertices").join("SM_Chair").join("0007.dat"));
    }

    #[test]
    fn test_actor_info_vector() {
        let transform = Transform {
            translation: Vector3::new(1.0, 2.0, 3.0),
            rotation: rotator_to_quaternion(&Rotator { pitch: 10.0, yaw: 20.0, roll: 30.0 }),
            ..Default::default()
        };
        let info = actor_info_vector(&transform, 5);
        assert_eq!(&info[..3], &[1.0, 2.0, 3.0]);
        assert!((info[3] - 30.0).abs() < 1e-2);
        assert!((info[4] - 10.0).abs() < 1e-2);
        assert!((info[5] - 20.0).abs() < 1e-2);
        assert_eq!(info[6], 5.0);
    }

    #[test]
    fn test_bone_names_written_on_first_frame_only() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut exporter = init_frame_exporter(temp_dir.path(), ExportSettings::default());
        let scene = BoxScene::new();
        let actors = vec![skinned_actor()];
        let settings = OcclusionSettings::default();

        export_frame(&mut exporter, &scene, &actors, &settings, 0).expect("frame 0");
        let bone_path = bone_name_path(temp_dir.path(), "SK_Human");
        assert_eq!(fs::read_to_string(&bone_path).expect("bone names"), "pelvis\nhead\n");

        fs::remove_file(&bone_path).expect("remove bone names");
        export_frame(&mut exporter, &scene, &actors, &settings, 1).expect("frame 1");
        assert!(!bone_path.exists());

        let joints = read_float_array(&frame_path(temp_dir.path(), DIR_SKELETON, "SK_Human", 1))
            .expect("joint buffer");
        assert_eq!(joints, vec![0.0, 0.0, 90.0, 0.0, 0.0, 170.0]);
    }

    #[test]
    fn test_export_frame_writes_layout() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let settings = ExportSettings {
            save_occlusion: true,
            ..Default::default()
        };
        let mut exporter = init_frame_exporter(temp_dir.path(), settings);
        let scene = BoxScene::new();
        let actors = vec![camera_actor(), static_actor(), skinned_actor()];

        let summary = export_frame(&mut exporter, &scene, &actors, &OcclusionSettings::default(), 12)
            .expect("frame exported");
        assert_eq!(summary.cameras_written, 1);
        assert_eq!(summary.actors_written, 2);
        assert_eq!(summary.actors_skipped, 0);

        let root = temp_dir.path();
        let camera = read_float_array(&frame_path(root, DIR_CAMERA_PARAMS, "Camera", 12)).expect("camera");
        assert_eq!(camera.len(), 9);
        assert_eq!(&camera[..3], &[500.0, 0.0, 100.0]);

        let info = read_float_array(&frame_path(root, DIR_ACTOR_INFOS, "SM_Chair", 12)).expect("info");
        assert_eq!(info[6], 7.0);

        let vertices = read_float_array(&frame_path(root, DIR_VERTICES, "SM_Chair", 12)).expect("vertices");
        assert_eq!(vertices, vec![10.0, 20.0, 30.0, 11.0, 22.0, 33.0]);

        // Empty scene: nothing blocks the camera
        let labels = fs::read(frame_path(root, DIR_OCCLUSION, "SK_Human", 12)).expect("labels");
        assert_eq!(labels, vec![OcclusionLabel::NonOcclusion as u8; 2]);
        let rates = read_float_array(&frame_path(root, DIR_OCCLUSION_RATE, "SM_Chair", 12)).expect("rates");
        assert_eq!(rates, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_export_frame_cv_points() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let settings = ExportSettings {
            convert_to_cv: true,
            ..Default::default()
        };
        let mut exporter = init_frame_exporter(temp_dir.path(), settings);
        export_frame(&mut exporter, &BoxScene::new(), &[static_actor()], &OcclusionSettings::default(), 0)
            .expect("frame exported");

        let vertices = read_float_array(&frame_path(temp_dir.path(), DIR_VERTICES, "SM_Chair", 0))
            .expect("vertices");
        assert_eq!(vertices, vec![20.0, -30.0, 10.0, 22.0, -33.0, 11.0]);
    }

    #[test]
    fn test_export_frame_skips_failing_actor() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let settings = ExportSettings {
            lod_index: 3,
            ..Default::default()
        };
        let mut exporter = init_frame_exporter(temp_dir.path(), settings);
        let summary = export_frame(&mut exporter, &BoxScene::new(), &[static_actor()], &OcclusionSettings::default(), 0)
            .expect("frame exported");
        assert_eq!(summary.actors_written, 0);
        assert_eq!(summary.actors_skipped, 1);
    }

    #[test]
    fn test_frames_must_increase() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut exporter = init_frame_exporter(temp_dir.path(), ExportSettings::default());
        let scene = BoxScene::new();
        let settings = OcclusionSettings::default();

        export_frame(&mut exporter, &scene, &[], &settings, 5).expect("frame 5");
        assert!(export_frame(&mut exporter, &scene, &[], &settings, 5).is_err());
        assert!(export_frame(&mut exporter, &scene, &[], &settings, 6).is_ok());
    }
}
