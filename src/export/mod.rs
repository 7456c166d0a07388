/// Export Module - Data-Oriented Programming (DOP) style
///
/// - export_data.rs: exporter state and settings
/// - export_operations.rs: float/byte/text writers and the per-frame layout
///

pub mod export_data;
pub mod export_operations;

pub use export_data::{ExportSettings, FrameExporter, FrameSummary, PackedPoint};

pub use export_operations::{
    // Raw writers
    write_float_array,
    read_float_array,
    write_byte_array,
    write_text_file,
    pack_points,
    write_point_array,

    // Layout
    frame_path,
    bone_name_path,
    actor_info_vector,

    // Frame exporter
    init_frame_exporter,
    export_camera,
    export_actor,
    export_occlusion,
    export_frame,
};
