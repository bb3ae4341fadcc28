//! Ray picking against frame primitives.
//!
//! Every selectable primitive of the active frame is tested against the ray
//! with a test suited to its kind. Triangles must be hit exactly; lines and
//! points are accepted within a screen-space tolerance converted to world
//! units at the camera's target depth. The accepted candidate with the
//! smallest distance along the ray wins, ties going to the lower index.

use glam::Vec3;

use crate::math::{
    pixel_world_size, ray_intersect_triangle, ray_point_distance_squared,
    ray_segment_distance_squared, Ray,
};
use crate::options::PickOptions;
use crate::primitive::{Primitive, PrimitiveKind};

/// A picked primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index into the frame's primitive list.
    pub index: usize,
    /// Distance along the ray used for ordering.
    pub metric: f32,
}

/// Resolves rays to primitives.
#[derive(Debug, Clone, Copy)]
pub struct Picker {
    tolerance_px: f32,
    fov_y: f32,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(&PickOptions::default())
    }
}

impl Picker {
    /// Creates a picker from options.
    #[must_use]
    pub fn new(options: &PickOptions) -> Self {
        Self {
            tolerance_px: options.tolerance_px,
            fov_y: options.fov_y_degrees.to_radians(),
        }
    }

    /// World-space pick radius at `depth` for a viewport `viewport_height`
    /// pixels tall.
    #[must_use]
    pub fn pick_radius(&self, depth: f32, viewport_height: f32) -> f32 {
        self.tolerance_px * pixel_world_size(depth, viewport_height, self.fov_y)
    }

    /// Finds the nearest selectable primitive along `ray`.
    ///
    /// `depth` is the estimated distance to the geometry, normally the
    /// eye-to-target distance of the camera.
    #[must_use]
    pub fn pick(
        &self,
        ray: &Ray,
        primitives: &[Primitive],
        viewport_height: f32,
        depth: f32,
    ) -> Option<PickHit> {
        let radius = self.pick_radius(depth, viewport_height);
        let radius_sq = radius * radius;

        let mut best: Option<PickHit> = None;
        for (index, primitive) in primitives.iter().enumerate() {
            let Some(metric) = candidate_metric(ray, primitive, radius_sq) else {
                continue;
            };
            if best.map_or(true, |b| metric < b.metric) {
                best = Some(PickHit { index, metric });
            }
        }
        best
    }
}

/// Distance along the ray at which `primitive` is accepted, if it is.
fn candidate_metric(ray: &Ray, primitive: &Primitive, radius_sq: f32) -> Option<f32> {
    if !primitive.kind.is_selectable() || !primitive.is_complete() {
        return None;
    }
    let p = |i: usize| primitive.vertices[i].position;

    match primitive.kind {
        PrimitiveKind::Triangle => ray_intersect_triangle(ray, p(0), p(1), p(2)),
        PrimitiveKind::Line => {
            let (a, b) = (p(0), p(1));
            let distance_sq = ray_segment_distance_squared(ray, a, b)?;
            let along = ((a + b) * 0.5 - ray.origin).dot(ray.direction);
            (distance_sq < radius_sq && along > 0.0).then_some(along)
        }
        PrimitiveKind::Point => {
            let point = p(0);
            let along = (point - ray.origin).dot(ray.direction);
            let (distance_sq, _) = ray_point_distance_squared(ray, point);
            (distance_sq < radius_sq && along > 0.0).then_some(along)
        }
        PrimitiveKind::OverlayMesh => None,
    }
}

/// World-space point where `ray` first hits a triangle of the overlay meshes
/// or of the frame's triangle primitives. Lines and points are ignored.
#[must_use]
pub fn nearest_triangle_hit(
    ray: &Ray,
    frame_primitives: &[Primitive],
    overlay: &[Primitive],
) -> Option<Vec3> {
    let meshes = overlay
        .iter()
        .filter(|p| p.kind == PrimitiveKind::OverlayMesh);
    let triangles = frame_primitives
        .iter()
        .filter(|p| p.kind == PrimitiveKind::Triangle);

    meshes
        .chain(triangles)
        .flat_map(Primitive::triangles)
        .filter_map(|[v0, v1, v2]| ray_intersect_triangle(ray, v0, v1, v2))
        .min_by(f32::total_cmp)
        .map(|t| ray.at(t))
}
