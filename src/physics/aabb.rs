/// Data-Oriented Axis-Aligned Bounding Box System
///
/// Pure functions for segment and swept-box queries - no methods, just data transformations.

use cgmath::{Vector3, Point3};

/// Axis-Aligned Bounding Box - pure data structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

/// Create new AABB from min/max points, reordering corners if needed
pub fn create_aabb(a: Point3<f32>, b: Point3<f32>) -> AABB {
    AABB {
        min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
        max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
    }
}

/// Create AABB from center point and half extents
pub fn aabb_from_center_half_extents(center: Point3<f32>, half_extents: Vector3<f32>) -> AABB {
    AABB {
        min: Point3::new(
            center.x - half_extents.x,
            center.y - half_extents.y,
            center.z - half_extents.z,
        ),
        max: Point3::new(
            center.x + half_extents.x,
            center.y + half_extents.y,
            center.z + half_extents.z,
        ),
    }
}

/// Test if AABB contains a point (boundary included)
pub fn aabb_contains_point(aabb: &AABB, point: Point3<f32>) -> bool {
    point.x >= aabb.min.x && point.x <= aabb.max.x &&
    point.y >= aabb.min.y && point.y <= aabb.max.y &&
    point.z >= aabb.min.z && point.z <= aabb.max.z
}

/// Grow an AABB by half extents on every side (Minkowski sum with a box)
pub fn aabb_expanded(aabb: &AABB, half_extents: Vector3<f32>) -> AABB {
    AABB {
        min: aabb.min - half_extents,
        max: aabb.max + half_extents,
    }
}

/// Closest point of the AABB to `point`
pub fn aabb_closest_point(aabb: &AABB, point: Point3<f32>) -> Point3<f32> {
    Point3::new(
        point.x.clamp(aabb.min.x, aabb.max.x),
        point.y.clamp(aabb.min.y, aabb.max.y),
        point.z.clamp(aabb.min.z, aabb.max.z),
    )
}

/// Slab test of the segment `origin + t * delta`, `t` in [0, 1]
///
/// Returns the unclamped entry and exit parameters when the infinite line
/// overlaps the box within the segment's range.
pub fn aabb_segment_interval(aabb: &AABB, origin: Point3<f32>, delta: Vector3<f32>) -> Option<(f32, f32)> {
    let mut t_enter: f32 = f32::NEG_INFINITY;
    let mut t_exit: f32 = f32::INFINITY;

    for i in 0..3 {
        let o = origin[i];
        let d = delta[i];
        let box_min = aabb.min[i];
        let box_max = aabb.max[i];

        if d.abs() < 1e-6 {
            // Segment is parallel to this slab
            if o < box_min || o > box_max {
                return None;
            }
        } else {
            let t1 = (box_min - o) / d;
            let t2 = (box_max - o) / d;

            t_enter = t_enter.max(t1.min(t2));
            t_exit = t_exit.min(t1.max(t2));

            if t_enter > t_exit {
                return None;
            }
        }
    }

    if t_exit < 0.0 || t_enter > 1.0 {
        return None;
    }
    Some((t_enter, t_exit))
}

/// First parameter in [0, 1] where the segment touches the AABB surface
///
/// A segment starting outside reports its entry; one starting inside reports
/// its exit, treating the box as a closed shell.
pub fn aabb_segment_hit(aabb: &AABB, origin: Point3<f32>, delta: Vector3<f32>) -> Option<f32> {
    let (t_enter, t_exit) = aabb_segment_interval(aabb, origin, delta)?;
    if t_enter >= 0.0 {
        Some(t_enter)
    } else if t_exit <= 1.0 {
        Some(t_exit)
    } else {
        None
    }
}

/// Swept AABB collision detection
///
/// Time of impact in [0, 1] of a box with `half_extents` whose center moves
/// along `delta` from `origin`, against `other`.
pub fn aabb_swept_collision(
    origin: Point3<f32>,
    half_extents: Vector3<f32>,
    delta: Vector3<f32>,
    other: &AABB,
) -> Option<f32> {
    // If displacement is zero, only an initial overlap counts
    if delta.x == 0.0 && delta.y == 0.0 && delta.z == 0.0 {
        let expanded = aabb_expanded(other, half_extents);
        return if aabb_contains_point(&expanded, origin) { Some(0.0) } else { None };
    }

    let expanded = aabb_expanded(other, half_extents);
    let (t_enter, _) = aabb_segment_interval(&expanded, origin, delta)?;
    Some(t_enter.max(0.0))
}
