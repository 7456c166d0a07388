//! Ray-cast data structures - Pure DOP
//!
//! Just data, plus a constructor for misses.
//! Queries against a scene go through the `Raycaster` trait.

use cgmath::Point3;
use serde::{Deserialize, Serialize};

/// Stable identity of an actor in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// Collision channel a query runs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TraceChannel {
    #[default]
    Visibility,
    Camera,
}

/// The actor a query stopped on
#[derive(Debug, Clone, PartialEq)]
pub struct HitActor {
    pub id: ActorId,
    pub name: String,

    /// Material names of the hit component, may be empty
    pub materials: Vec<String>,
}

/// Result of a ray cast or box sweep from an origin toward a target
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    /// Whether anything blocked the query
    pub hit: bool,

    /// Impact point on the blocking surface
    pub location: Point3<f32>,

    /// Distance from the impact point to the query target
    pub distance_to_target: f32,

    /// Blocking actor, None when nothing was hit
    pub actor: Option<HitActor>,
}

impl RayHit {
    /// A query that reached its target unobstructed
    pub fn miss(target: Point3<f32>) -> Self {
        Self {
            hit: false,
            location: target,
            distance_to_target: 0.0,
            actor: None,
        }
    }
}
