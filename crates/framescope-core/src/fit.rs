//! Fitting the camera to the visible geometry.

use glam::Vec3;

use crate::math::Aabb;
use crate::options::FitOptions;
use crate::scene::SceneModel;

/// Smallest near plane a fit will produce.
const MIN_NEAR_PLANE: f32 = 0.1;

/// Camera placement that frames a bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewFit {
    /// Center of the bounds; the new orbit target.
    pub target: Vec3,
    /// Bounding-sphere radius after flooring.
    pub radius: f32,
    /// Eye-to-target distance.
    pub distance: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

/// Fits the current frame plus the overlay.
///
/// Returns `None` if neither has any vertex.
#[must_use]
pub fn fit_view(scene: &SceneModel, options: &FitOptions) -> Option<ViewFit> {
    fit_points(scene.visible_positions(), options)
}

/// Fits an arbitrary set of points.
#[must_use]
pub fn fit_points(points: impl IntoIterator<Item = Vec3>, options: &FitOptions) -> Option<ViewFit> {
    let bounds: Aabb = points.into_iter().collect();
    if bounds.is_empty() {
        return None;
    }

    let radius = (bounds.diagonal() * 0.5).max(options.min_radius);
    let distance = radius * options.distance_factor;
    Some(ViewFit {
        target: bounds.center(),
        radius,
        distance,
        near_plane: options.near_plane.max(MIN_NEAR_PLANE),
        far_plane: distance + radius * options.far_padding,
    })
}
