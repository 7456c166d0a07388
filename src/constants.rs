//! Tunable defaults shared by the sampler, classifier and partitioner.

/// Occlusion classification defaults
pub mod occlusion {
    /// Distance (engine units) under which a hit on the owner counts as self-occlusion
    pub const DEFAULT_MESH_THICKNESS: f32 = 5.0;

    /// Vertex stride used when sub-sampling meshes before ray casting
    pub const DEFAULT_SAMPLE_STRIDE: usize = 1;
}

/// Box-trace partitioner defaults
pub mod box_trace {
    /// Half length of the up/down rays used by the inside probe
    pub const INSIDE_PROBE_EXTEND: f32 = 1000.0;

    /// Consecutive misses tolerated before a row is closed
    pub const NOT_HIT_THRESHOLD: u32 = 2;

    /// Consecutive empty rows tolerated before a quadrant is closed
    pub const NOT_HIT_ROW_THRESHOLD: u32 = 2;

    /// Steps on each axis around the seed where misses are ignored
    pub const CORE_REGION_STEPS: i64 = 10;

    /// Height added above each seed in batch mode
    pub const BATCH_SEED_LIFT: f32 = 2000.0;

    /// Hard stop for a single quadrant sweep
    pub const MAX_STEPS_PER_QUADRANT: u64 = 1_000_000;

    /// Attempts made by the random seed finder before giving up
    pub const MAX_RANDOM_SEED_ATTEMPTS: u32 = 10_000;

    pub const TABLE_HEADER: &str = "actor_name,x,y,z,materials,visible";
    pub const TABLE_META_HEADER: &str = "BoxHalfSize,DeltaStep,CenterX,CenterY,CenterZ,HitEndZ";
}

/// Camera probes
pub mod camera {
    /// Length of the forward ray used to find the camera's visual center
    pub const VISUAL_CENTER_PROBE_LENGTH: f32 = 10000.0;
}

/// Per-frame export layout
pub mod export {
    pub const DIR_CAMERA_PARAMS: &str = "camera_params";
    pub const DIR_ACTOR_INFOS: &str = "actor_infos";
    pub const DIR_VERTICES: &str = "vertices";
    pub const DIR_SKELETON: &str = "skeleton";
    pub const DIR_OCCLUSION: &str = "occlusion";
    pub const DIR_OCCLUSION_RATE: &str = "occlusion_rate";
    pub const BONE_NAME_FILE: &str = "BoneName.txt";
    pub const FRAME_EXTENSION: &str = "dat";
}
