//! Scene query capability
//!
//! The capture core never owns the scene. Everything that needs to know what
//! a ray would hit takes a `&dyn Raycaster`, so the same code runs against the
//! engine's physics or against an in-process stub.

use super::raycast_data::{RayHit, TraceChannel};
use cgmath::{Point3, Vector3};

pub trait Raycaster {
    /// First blocking hit on the segment from `origin` to `target`
    fn cast_ray(&self, origin: Point3<f32>, target: Point3<f32>, channel: TraceChannel) -> RayHit;

    /// Every hit on the segment, nearest first
    fn cast_ray_multi(
        &self,
        origin: Point3<f32>,
        target: Point3<f32>,
        channel: TraceChannel,
    ) -> Vec<RayHit>;

    /// First blocking hit of an axis-aligned box swept from `origin` to `target`
    fn sweep_box(
        &self,
        origin: Point3<f32>,
        target: Point3<f32>,
        half_extent: Vector3<f32>,
        channel: TraceChannel,
    ) -> RayHit;
}

impl<R: Raycaster + ?Sized> Raycaster for &R {
    fn cast_ray(&self, origin: Point3<f32>, target: Point3<f32>, channel: TraceChannel) -> RayHit {
        (**self).cast_ray(origin, target, channel)
    }

    fn cast_ray_multi(
        &self,
        origin: Point3<f32>,
        target: Point3<f32>,
        channel: TraceChannel,
    ) -> Vec<RayHit> {
        (**self).cast_ray_multi(origin, target, channel)
    }

    fn sweep_box(
        &self,
        origin: Point3<f32>,
        target: Point3<f32>,
        half_extent: Vector3<f32>,
        channel: TraceChannel,
    ) -> RayHit {
        (**self).sweep_box(origin, target, half_extent, channel)
    }
}
