//! Box-trace data structures - Pure DOP
//!
//! NO METHODS. Just data.
//! The sweep itself lives in box_trace_operations.rs

use crate::constants::box_trace::{MAX_RANDOM_SEED_ATTEMPTS, MAX_STEPS_PER_QUADRANT};
use crate::physics::TraceChannel;
use cgmath::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// File-level sweep settings; the seed is supplied per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoxTraceSettings {
    pub box_half_size: u32,
    pub min_x_extend: f32,
    pub max_x_extend: f32,
    pub min_y_extend: f32,
    pub max_y_extend: f32,
    pub hit_end_z: f32,
    /// Batch mode: each sweep ends this far below its seed
    pub z_extend: f32,
    pub max_steps_per_quadrant: u64,
    /// Draw the seed at random instead of using the configured origin
    pub use_random_seed: bool,
    pub random_seed_attempts: u32,
}

impl Default for BoxTraceSettings {
    fn default() -> Self {
        Self {
            box_half_size: 20,
            min_x_extend: -1500.0,
            max_x_extend: 1500.0,
            min_y_extend: -1500.0,
            max_y_extend: 1500.0,
            hit_end_z: -2000.0,
            z_extend: 2000.0,
            max_steps_per_quadrant: MAX_STEPS_PER_QUADRANT,
            use_random_seed: false,
            random_seed_attempts: MAX_RANDOM_SEED_ATTEMPTS,
        }
    }
}

/// Everything one sweep needs, fixed for its whole run
#[derive(Debug, Clone, PartialEq)]
pub struct BoxTraceConfig {
    /// Half extent of the swept cube; also the grid step
    pub box_half_size: u32,

    /// Seed the four quadrants sweep out from
    pub origin: Point3<f32>,

    /// Border offsets relative to `origin` (min values are usually negative)
    pub min_x_extend: f32,
    pub max_x_extend: f32,
    pub min_y_extend: f32,
    pub max_y_extend: f32,

    /// Depth every downward sweep ends at
    pub hit_end_z: f32,

    /// Half length of the vertical inside-probe rays
    pub inside_probe_extend: f32,

    /// Iteration cap for a single quadrant
    pub max_steps_per_quadrant: u64,

    pub channel: TraceChannel,
}

/// Rectangle the sweep may record cells in (bounds exclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceBorder {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// Transient state of one quadrant sweep
#[derive(Debug, Clone, PartialEq)]
pub struct BoxTraceState {
    /// Grid offsets along X (rows) and Y (within a row)
    pub i: i64,
    pub j: i64,

    pub not_hit_count: u32,
    pub not_hit_row_count: u32,

    pub half_extent: Vector3<f32>,
    pub step: f32,
    pub border: TraceBorder,

    /// Candidates visited so far
    pub steps: u64,
}

/// One recorded ground contact
#[derive(Debug, Clone, PartialEq)]
pub struct SweepCell {
    pub actor_name: String,
    /// Contact x, y and the contact z lowered by one half extent
    pub location: Point3<f32>,
    pub materials: Vec<String>,
    /// Whether the candidate had line of sight back to the seed
    pub visible: bool,
}

/// Output table of one sweep: metadata plus append-only cells
#[derive(Debug, Clone, PartialEq)]
pub struct SweepTable {
    pub box_half_size: u32,
    pub delta_step: f32,
    pub center: Point3<f32>,
    pub hit_end_z: f32,
    pub cells: Vec<SweepCell>,
}

/// Why a quadrant stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadrantEnd {
    /// Too many consecutive empty rows
    NotHitRows,
    /// Iteration cap reached
    StepCap,
}
