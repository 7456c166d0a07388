//! Occlusion data structures - Pure DOP
//!
//! NO METHODS. Just data.

use crate::constants::occlusion::{DEFAULT_MESH_THICKNESS, DEFAULT_SAMPLE_STRIDE};
use serde::{Deserialize, Serialize};

/// Visibility of one sampled point from one camera
///
/// Discriminants are the byte values written to occlusion label files.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OcclusionLabel {
    NonOcclusion = 0,
    SelfOcclusion = 1,
    InterOcclusion = 2,
}

/// Labels for a batch of points plus their label rates
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OcclusionReport {
    /// One label per input point, same order
    pub labels: Vec<OcclusionLabel>,

    pub non_occlusion_rate: f32,
    pub self_occlusion_rate: f32,
    pub inter_occlusion_rate: f32,

    /// Set when there were no points to classify; all rates are then 0
    pub degenerate: bool,
}

/// Tunables for mesh and skeleton classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcclusionSettings {
    /// Owner hits closer than this to the target count as self-occlusion
    pub mesh_thickness: f32,
    /// Classify every n-th vertex
    pub sample_stride: usize,
}

impl Default for OcclusionSettings {
    fn default() -> Self {
        Self {
            mesh_thickness: DEFAULT_MESH_THICKNESS,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}
