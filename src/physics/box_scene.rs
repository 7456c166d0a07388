//! In-process scene made of axis-aligned boxes
//!
//! A small `Raycaster` for tests and offline runs. Boxes are closed shells:
//! a ray that starts inside one stops on its exit face.

use super::aabb::{
    aabb_closest_point, aabb_from_center_half_extents, aabb_segment_hit, aabb_swept_collision,
    create_aabb, AABB,
};
use super::raycast_data::{ActorId, HitActor, RayHit, TraceChannel};
use super::raycaster::Raycaster;
use cgmath::{MetricSpace, Point3, Vector3};

/// One blocking box in the scene
#[derive(Debug, Clone)]
pub struct BoxActor {
    pub id: ActorId,
    pub name: String,
    pub bounds: AABB,
    pub materials: Vec<String>,
    /// Channels this actor blocks
    pub channels: Vec<TraceChannel>,
}

#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    pub actors: Vec<BoxActor>,
}

/// Thickness of the slab that stands in for a ground plane
const GROUND_SLAB_DEPTH: f32 = 100.0;

impl BoxScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a box blocking every channel
    pub fn add_box(&mut self, id: ActorId, name: &str, min: Point3<f32>, max: Point3<f32>) -> &mut BoxActor {
        self.actors.push(BoxActor {
            id,
            name: name.to_string(),
            bounds: create_aabb(min, max),
            materials: Vec::new(),
            channels: vec![TraceChannel::Visibility, TraceChannel::Camera],
        });
        let last = self.actors.len() - 1;
        &mut self.actors[last]
    }

    /// Add a cube around `center`
    pub fn add_cube(&mut self, id: ActorId, name: &str, center: Point3<f32>, half_extent: f32) -> &mut BoxActor {
        let bounds = aabb_from_center_half_extents(center, Vector3::new(half_extent, half_extent, half_extent));
        self.add_box(id, name, bounds.min, bounds.max)
    }

    /// Add a horizontal ground whose top surface sits at `height`
    pub fn add_ground_plane(
        &mut self,
        id: ActorId,
        name: &str,
        height: f32,
        min_xy: (f32, f32),
        max_xy: (f32, f32),
    ) -> &mut BoxActor {
        self.add_box(
            id,
            name,
            Point3::new(min_xy.0, min_xy.1, height - GROUND_SLAB_DEPTH),
            Point3::new(max_xy.0, max_xy.1, height),
        )
    }

    fn hit_from(actor: &BoxActor, location: Point3<f32>, target: Point3<f32>) -> RayHit {
        RayHit {
            hit: true,
            location,
            distance_to_target: location.distance(target),
            actor: Some(HitActor {
                id: actor.id,
                name: actor.name.clone(),
                materials: actor.materials.clone(),
            }),
        }
    }

    fn blocking(&self, channel: TraceChannel) -> impl Iterator<Item = &BoxActor> {
        self.actors.iter().filter(move |a| a.channels.contains(&channel))
    }
}

impl Raycaster for BoxScene {
    fn cast_ray(&self, origin: Point3<f32>, target: Point3<f32>, channel: TraceChannel) -> RayHit {
        self.cast_ray_multi(origin, target, channel)
            .into_iter()
            .next()
            .unwrap_or_else(|| RayHit::miss(target))
    }

    fn cast_ray_multi(&self, origin: Point3<f32>, target: Point3<f32>, channel: TraceChannel) -> Vec<RayHit> {
        let delta = target - origin;
        let mut hits: Vec<(f32, RayHit)> = self
            .blocking(channel)
            .filter_map(|actor| {
                let t = aabb_segment_hit(&actor.bounds, origin, delta)?;
                Some((t, Self::hit_from(actor, origin + delta * t, target)))
            })
            .collect();

        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, hit)| hit).collect()
    }

    fn sweep_box(
        &self,
        origin: Point3<f32>,
        target: Point3<f32>,
        half_extent: Vector3<f32>,
        channel: TraceChannel,
    ) -> RayHit {
        let delta = target - origin;
        let nearest = self
            .blocking(channel)
            .filter_map(|actor| {
                aabb_swept_collision(origin, half_extent, delta, &actor.bounds).map(|t| (t, actor))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match nearest {
            Some((t, actor)) => {
                let center = origin + delta * t;
                // Contact point is the part of the actor nearest the stopped box
                let location = aabb_closest_point(&actor.bounds, center);
                Self::hit_from(actor, location, target)
            }
            None => RayHit::miss(target),
        }
    }
}
