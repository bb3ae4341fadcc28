//! The camera as seen from the core.
//!
//! Cameras live outside the core (input mapping, matrices, rendering); the
//! core only reads where the eye is and writes back a new view.

use glam::Vec3;

use crate::fit::ViewFit;

/// A camera the core can query and re-aim.
pub trait ViewCamera {
    /// World-space eye position.
    fn eye_position(&self) -> Vec3;

    /// Point the camera orbits around.
    fn target(&self) -> Vec3;

    /// Moves the orbit target without changing distance or orientation.
    fn set_target(&mut self, target: Vec3);

    /// Applies a fitted view: target, distance and clip planes.
    fn set_view(&mut self, fit: &ViewFit);

    /// Distance from the eye to the target, used as the picking depth guess.
    fn eye_distance(&self) -> f32 {
        self.eye_position().distance(self.target())
    }
}
