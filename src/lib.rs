// Ground-truth capture core - Data-Oriented Programming (DOP) Architecture
//
// Samples world-space geometry from bound actors, labels every sample's
// visibility from a camera by ray casting, and partitions a scene into
// ground-contact cells with a box sweep.
//
// - *_data.rs modules hold plain data
// - *_operations.rs modules hold the pure functions over it
// - physics::Raycaster is the only seam to the host scene

// Constants module
pub mod constants;

// Core modules
pub mod error;
pub mod transform;
pub mod physics;

// Capture systems
pub mod camera;
pub mod mesh;
pub mod occlusion;
pub mod partition;
pub mod export;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use camera::CameraData;
pub use error::{CaptureError, CaptureResult, IoContext, OptionExt};
pub use export::{ExportSettings, FrameExporter, FrameSummary};
pub use mesh::{BoundActor, CullingConvention, MeshHandle, SkeletonHandle, SkinnedMeshHandle};
pub use occlusion::{OcclusionLabel, OcclusionReport, OcclusionSettings};
pub use partition::{BoxTraceConfig, BoxTraceSettings, SweepCell, SweepTable};
pub use physics::{ActorId, BoxScene, HitActor, RayHit, Raycaster, TraceChannel, AABB};
pub use transform::{AxisMapping, Rotator, Transform};

/// Capture session configuration, usually loaded from a TOML file
///
/// Every section falls back to its defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub occlusion: OcclusionSettings,
    pub export: ExportSettings,
    pub box_trace: BoxTraceSettings,
}

impl CaptureConfig {
    pub fn from_toml_str(text: &str) -> CaptureResult<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> CaptureResult<Self> {
        let text = std::fs::read_to_string(path).with_path(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("[CaptureConfig] Loaded {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> CaptureResult<String> {
        toml::to_string_pretty(self).map_err(|e| CaptureError::SerializationError {
            context: "CaptureConfig".to_string(),
            error: e.to_string(),
        })
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        // Occlusion
        let thickness = self.occlusion.mesh_thickness;
        if !thickness.is_finite() || thickness < 0.0 {
            return Err(anyhow::anyhow!(
                "CaptureConfig: mesh_thickness {} must be a finite non-negative distance",
                thickness
            ));
        }
        if self.occlusion.sample_stride == 0 {
            return Err(anyhow::anyhow!("CaptureConfig: sample_stride cannot be 0"));
        }

        // Box trace
        let trace = &self.box_trace;
        if trace.box_half_size == 0 {
            return Err(anyhow::anyhow!("CaptureConfig: box_half_size cannot be 0"));
        }
        if trace.min_x_extend >= trace.max_x_extend || trace.min_y_extend >= trace.max_y_extend {
            return Err(anyhow::anyhow!(
                "CaptureConfig: border extends are inverted (x [{}, {}], y [{}, {}])",
                trace.min_x_extend,
                trace.max_x_extend,
                trace.min_y_extend,
                trace.max_y_extend
            ));
        }
        if trace.max_steps_per_quadrant == 0 {
            return Err(anyhow::anyhow!("CaptureConfig: max_steps_per_quadrant cannot be 0"));
        }
        if trace.use_random_seed && trace.random_seed_attempts == 0 {
            return Err(anyhow::anyhow!(
                "CaptureConfig: random seed requested with 0 attempts"
            ));
        }
        if !trace.z_extend.is_finite() || trace.z_extend <= 0.0 {
            return Err(anyhow::anyhow!(
                "CaptureConfig: z_extend {} must be positive",
                trace.z_extend
            ));
        }

        log::info!(
            "[CaptureConfig] Validation: thickness={}, stride={}, lod={}, box_half_size={}, border=({}, {})x({}, {})",
            thickness,
            self.occlusion.sample_stride,
            self.export.lod_index,
            trace.box_half_size,
            trace.min_x_extend,
            trace.max_x_extend,
            trace.min_y_extend,
            trace.max_y_extend
        );

        log::info!("[CaptureConfig] Configuration validated successfully");
        Ok(())
    }
}
