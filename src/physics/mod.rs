//! Physics Module - scene queries for the capture core
//!
//! The core only ever asks "what does this ray / box hit". `Raycaster` is the
//! seam; `BoxScene` is the in-process implementation built on the AABB math.

pub mod aabb;
pub mod box_scene;
pub mod raycast_data;
pub mod raycaster;

pub use aabb::AABB;
pub use box_scene::{BoxActor, BoxScene};
pub use raycast_data::{ActorId, HitActor, RayHit, TraceChannel};
pub use raycaster::Raycaster;
