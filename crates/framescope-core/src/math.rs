//! Geometry helpers shared by picking and view fitting.

use glam::Vec3;

/// Epsilon used by the ray-triangle test.
pub const TRIANGLE_EPSILON: f32 = 1e-6;

/// Below this the ray and segment are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Segments shorter than this (squared) are degenerate.
const DEGENERATE_SEGMENT_EPSILON: f32 = 1e-12;

/// A half-line in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start of the ray.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` if `direction` has no length.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        Some(Self { origin, direction })
    }

    /// Creates a ray through two points, e.g. unprojected near/far points.
    pub fn through(near: Vec3, far: Vec3) -> Option<Self> {
        Self::new(near, far - near)
    }

    /// Returns the point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box accumulated from points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// A box containing nothing; extending it with a point yields that point.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Grows the box to contain `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Returns true if no point was ever added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the box diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f32 {
        (self.max - self.min).length()
    }
}

impl FromIterator<Vec3> for Aabb {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        let mut aabb = Self::empty();
        for point in iter {
            aabb.extend(point);
        }
        aabb
    }
}

/// Flat normal of triangle `(v0, v1, v2)`.
///
/// Collinear or coincident points give `Vec3::ZERO` rather than NaN.
#[must_use]
pub fn face_normal(v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
    (v1 - v0).cross(v2 - v0).normalize_or_zero()
}

/// Möller-Trumbore ray-triangle intersection.
///
/// Both windings hit. Returns the distance along the ray.
#[must_use]
pub fn ray_intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < TRIANGLE_EPSILON {
        return None;
    }
    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * edge2.dot(q);
    (t > TRIANGLE_EPSILON).then_some(t)
}

/// Squared distance from the ray to segment `[a, b]`.
///
/// Uses the closest points between the two carrier lines with the segment
/// parameter clamped to `[0, 1]`; near-parallel configurations fall back to
/// the segment start. Returns `None` for a zero-length segment.
#[must_use]
pub fn ray_segment_distance_squared(ray: &Ray, a: Vec3, b: Vec3) -> Option<f32> {
    let v = b - a;
    let c = v.dot(v);
    if c < DEGENERATE_SEGMENT_EPSILON {
        return None;
    }

    let d = ray.direction;
    let w0 = ray.origin - a;
    let a_dot = d.dot(d);
    let b_dot = d.dot(v);
    let d_dot = d.dot(w0);
    let e_dot = v.dot(w0);
    let denom = a_dot * c - b_dot * b_dot;

    let s = if denom.abs() < PARALLEL_EPSILON {
        0.0
    } else {
        ((a_dot * e_dot - b_dot * d_dot) / denom).clamp(0.0, 1.0)
    };

    let on_segment = a + v * s;
    Some(ray_point_distance_squared(ray, on_segment).0)
}

/// Squared distance from the ray to `point`, and the ray parameter of the
/// closest approach.
///
/// The parameter is clamped to the ray, so points behind the origin measure
/// their distance to the origin itself.
#[must_use]
pub fn ray_point_distance_squared(ray: &Ray, point: Vec3) -> (f32, f32) {
    let t = (point - ray.origin).dot(ray.direction).max(0.0);
    (ray.at(t).distance_squared(point), t)
}

/// World-space size of one pixel at `depth` for a perspective camera with
/// vertical field of view `fov_y` (radians).
#[must_use]
pub fn pixel_world_size(depth: f32, viewport_height: f32, fov_y: f32) -> f32 {
    2.0 * depth * (fov_y * 0.5).tan() / viewport_height.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap()
    }

    #[test]
    fn test_ray_new_rejects_zero_direction() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0)).unwrap();
        assert!((ray.direction - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_triangle_hit_distance() {
        let t = ray_intersect_triangle(
            &z_ray(),
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_both_windings_hit() {
        let v0 = Vec3::new(-1.0, -1.0, 0.0);
        let v1 = Vec3::new(1.0, -1.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);
        assert!(ray_intersect_triangle(&z_ray(), v0, v1, v2).is_some());
        assert!(ray_intersect_triangle(&z_ray(), v0, v2, v1).is_some());
    }

    #[test]
    fn test_triangle_miss_and_behind() {
        let v0 = Vec3::new(2.0, 2.0, 0.0);
        let v1 = Vec3::new(3.0, 2.0, 0.0);
        let v2 = Vec3::new(2.0, 3.0, 0.0);
        assert!(ray_intersect_triangle(&z_ray(), v0, v1, v2).is_none());

        let behind = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z).unwrap();
        assert!(ray_intersect_triangle(
            &behind,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn test_triangle_parallel_ray_misses() {
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X).unwrap();
        assert!(ray_intersect_triangle(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn test_segment_crossing_ray() {
        let d2 = ray_segment_distance_squared(
            &z_ray(),
            Vec3::new(-1.0, 0.5, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
        )
        .unwrap();
        assert!((d2 - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_segment_clamped_to_endpoint() {
        // Closest point on the infinite line is x = 0, but the segment stops at x = 2.
        let d2 = ray_segment_distance_squared(
            &z_ray(),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.0),
        )
        .unwrap();
        assert!((d2 - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_segment_parallel_falls_back_to_start() {
        let d2 = ray_segment_distance_squared(
            &z_ray(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, -3.0),
        )
        .unwrap();
        assert!((d2 - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_segment_rejected() {
        let p = Vec3::new(0.0, 0.0, 0.0);
        assert!(ray_segment_distance_squared(&z_ray(), p, p).is_none());
    }

    #[test]
    fn test_point_distance() {
        let (d2, t) = ray_point_distance_squared(&z_ray(), Vec3::new(0.0, 2.0, 1.0));
        assert!((d2 - 4.0).abs() < 1e-5);
        assert!((t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_face_normal_degenerate_is_zero() {
        let n = face_normal(Vec3::ZERO, Vec3::X, Vec3::X * 2.0);
        assert_eq!(n, Vec3::ZERO);
        let n = face_normal(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!((n - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_pixel_world_size() {
        let fov = 90f32.to_radians();
        // tan(45deg) = 1, so a 100 px viewport spans 2 * depth world units.
        let size = pixel_world_size(10.0, 100.0, fov);
        assert!((size - 0.2).abs() < 1e-5);
        // Zero height must not divide by zero.
        assert!(pixel_world_size(10.0, 0.0, fov).is_finite());
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb: Aabb = [Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 2.0, 0.0)]
            .into_iter()
            .collect();
        assert!(!aabb.is_empty());
        assert!((aabb.center() - Vec3::new(1.0, 1.0, 1.0)).length() < 1e-6);
        assert!((aabb.diagonal() - 24f32.sqrt()).abs() < 1e-5);
        assert!(Aabb::empty().is_empty());
    }
}
