//! End-to-end runs of the capture core against an in-process box scene

use cgmath::{InnerSpace, Point3};
use groundtruth_capture::{
    export::{export_frame, frame_path, init_frame_exporter, read_float_array},
    mesh::StaticLod,
    occlusion::detect_mesh_occlusion,
    partition::{divide_scene_via_box_trace, init_box_trace_config, write_sweep_table},
    transform::{cv_to_engine, engine_to_cv, rotator_to_quaternion},
    ActorId, BoundActor, BoxScene, CameraData, ExportSettings, MeshHandle, OcclusionLabel,
    OcclusionSettings, Rotator, Transform,
};
use tempfile::TempDir;

const OWNER: ActorId = ActorId(10);

/// Owner crate at x 500..540 and a wall that only shadows negative y
fn occlusion_scene() -> BoxScene {
    let mut scene = BoxScene::new();
    scene.add_box(
        OWNER,
        "SM_Crate",
        Point3::new(500.0, -20.0, 80.0),
        Point3::new(540.0, 20.0, 120.0),
    );
    scene.add_box(
        ActorId(11),
        "Wall",
        Point3::new(200.0, -100.0, 0.0),
        Point3::new(210.0, -10.0, 200.0),
    );
    scene
}

fn crate_actor() -> BoundActor {
    BoundActor::Static(MeshHandle {
        actor: OWNER,
        name: "SM_Crate".to_string(),
        stencil_value: 1,
        transform: Transform::default(),
        lods: vec![StaticLod {
            positions: vec![
                Point3::new(500.0, -100.0, 100.0), // behind the wall
                Point3::new(500.0, 0.0, 100.0),    // on the near face
                Point3::new(540.0, 0.0, 100.0),    // on the far face
                Point3::new(500.0, 300.0, 100.0),  // open space
            ],
            indices: vec![],
        }],
    })
}

fn camera() -> CameraData {
    CameraData {
        actor: ActorId(99),
        name: "CineCamera".to_string(),
        position: Point3::new(0.0, 0.0, 100.0),
        ..Default::default()
    }
}

#[test]
fn flat_ground_sweep_writes_full_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut scene = BoxScene::new();
    scene.add_ground_plane(ActorId(1), "Landscape", 0.0, (-1500.0, -1500.0), (1500.0, 1500.0));

    let config = init_box_trace_config(
        20,
        Point3::new(0.0, 0.0, 2000.0),
        (-1500.0, 1500.0),
        (-1500.0, 1500.0),
        -2000.0,
    );
    let table = divide_scene_via_box_trace(&scene, &config).expect("sweep ran");
    let path = temp_dir.path().join("landscape.csv");
    write_sweep_table(&table, &path).expect("table written");

    let text = std::fs::read_to_string(&path).expect("table readable");
    let rows: Vec<&str> = text.lines().skip(3).collect();
    assert_eq!(rows.len(), 22500);
    for row in rows {
        let fields: Vec<&str> = row.split(',').collect();
        assert_eq!(fields.len(), 6);
        assert_eq!(fields[0], "Landscape");
        assert_eq!(fields[3], "-20.000000");
        assert_eq!(fields[5], "1");
    }
}

#[test]
fn mesh_occlusion_labels_each_vertex() {
    let report = detect_mesh_occlusion(&occlusion_scene(), &crate_actor(), &camera(), 0, 1, 5.0)
        .expect("classification ran");

    assert_eq!(
        report.labels,
        vec![
            OcclusionLabel::InterOcclusion,
            OcclusionLabel::SelfOcclusion,
            OcclusionLabel::NonOcclusion,
            OcclusionLabel::NonOcclusion,
        ]
    );
    assert_eq!(report.non_occlusion_rate, 0.5);
    assert_eq!(report.self_occlusion_rate, 0.25);
    assert_eq!(report.inter_occlusion_rate, 0.25);
}

#[test]
fn exported_frame_matches_classification() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let settings = ExportSettings {
        save_occlusion: true,
        ..Default::default()
    };
    let mut exporter = init_frame_exporter(temp_dir.path(), settings);
    let actors = vec![BoundActor::Camera(camera()), crate_actor()];

    let summary = export_frame(&mut exporter, &occlusion_scene(), &actors, &OcclusionSettings::default(), 3)
        .expect("frame exported");
    assert_eq!(summary.actors_written, 1);

    let root = temp_dir.path();
    let labels = std::fs::read(frame_path(root, "occlusion", "SM_Crate", 3)).expect("labels");
    assert_eq!(labels, vec![2, 1, 0, 0]);

    let rates = read_float_array(&frame_path(root, "occlusion_rate", "SM_Crate", 3)).expect("rates");
    assert_eq!(rates, vec![0.5, 0.25, 0.25]);

    let vertices = read_float_array(&frame_path(root, "vertices", "SM_Crate", 3)).expect("vertices");
    assert_eq!(vertices.len(), 12);
    assert_eq!(&vertices[3..6], &[500.0, 0.0, 100.0]);
}

#[test]
fn camera_pose_survives_cv_round_trip() {
    let pose = Transform {
        translation: cgmath::Vector3::new(120.0, -45.0, 310.0),
        rotation: rotator_to_quaternion(&Rotator { pitch: -15.0, yaw: 80.0, roll: 5.0 }),
        ..Default::default()
    };
    let back = cv_to_engine(&engine_to_cv(&pose));

    assert!((back.translation - pose.translation).magnitude2() < 1e-6);
    let dot = back.rotation.s * pose.rotation.s + back.rotation.v.dot(pose.rotation.v);
    assert!((dot.abs() - 1.0).abs() < 1e-5);
}
