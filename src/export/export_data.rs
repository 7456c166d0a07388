//! Export data structures - Pure DOP
//!
//! NO METHODS. Just data.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One point as laid out in a point buffer file
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PackedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// What the per-frame exporter writes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// LOD sampled for vertex export and occlusion
    pub lod_index: usize,
    pub save_vertices: bool,
    pub save_skeleton: bool,
    pub save_occlusion: bool,
    /// Remap points into the CV convention before writing
    pub convert_to_cv: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            lod_index: 0,
            save_vertices: true,
            save_skeleton: true,
            save_occlusion: false,
            convert_to_cv: false,
        }
    }
}

/// Writes one sequence's ground truth under `root`
#[derive(Debug, Clone)]
pub struct FrameExporter {
    pub root: PathBuf,
    pub settings: ExportSettings,
    /// Joint names are written only while this is set
    pub is_first_frame: bool,
    /// Last frame finished, frames must arrive in increasing order
    pub last_frame: Option<u32>,
}

/// Outcome of exporting one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSummary {
    pub frame: u32,
    pub cameras_written: usize,
    pub actors_written: usize,
    /// Actors skipped after a local failure
    pub actors_skipped: usize,
}
