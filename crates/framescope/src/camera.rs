//! Orbit camera and view management.

use glam::{Mat4, Vec2, Vec3, Vec4};

use framescope_core::{Ray, ViewCamera, ViewFit};

/// Smallest eye-to-target distance zooming can reach.
const MIN_DISTANCE: f32 = 1e-3;

/// Pitch limit in degrees, keeps the view off the poles.
const MAX_PITCH: f32 = 89.0;

/// Pan offset per pixel, relative to the eye distance.
const PAN_SENSITIVITY: f32 = 0.005;

/// Distance change per scroll step.
const ZOOM_STEP: f32 = 0.1;

/// A Z-up camera orbiting a target point.
///
/// The eye sits on a sphere around `target`; `yaw` turns around the Z axis
/// and `pitch` lifts the eye above the XY plane. Angles are in degrees.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Eye-to-target distance.
    pub distance: f32,
    /// Rotation around +Z in degrees.
    pub yaw: f32,
    /// Elevation in degrees, within ±89.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl OrbitCamera {
    /// Creates a camera ten units from the origin, looking along +Y.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            yaw: -90.0,
            pitch: 0.0,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            aspect_ratio,
            near: 0.1,
            far: 10000.0,
        }
    }

    /// Sets the aspect ratio.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Unit vector from the target towards the eye.
    #[must_use]
    pub fn back(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(pitch.cos() * yaw.cos(), pitch.cos() * yaw.sin(), pitch.sin())
    }

    /// Eye position in world space.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.target + self.back() * self.distance
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Z)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rotates around the target by the given angles in degrees.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Shifts the target in the view plane by a cursor delta in pixels.
    ///
    /// The target moves against `delta_x` along screen-right and with
    /// `delta_y` along screen-up.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let scale = PAN_SENSITIVITY * self.distance;
        let front = -self.back();
        let right = front.cross(Vec3::Z).normalize_or_zero();
        let up = right.cross(front).normalize_or_zero();
        self.target -= right * (delta_x * scale);
        self.target += up * (delta_y * scale);
    }

    /// Scales the distance by `1 - 0.1 * steps`; positive steps zoom in.
    pub fn zoom(&mut self, steps: f32) {
        self.distance = (self.distance * (1.0 - steps * ZOOM_STEP)).max(MIN_DISTANCE);
    }

    /// Builds the world-space ray under `cursor` (pixels, origin top left).
    ///
    /// Returns `None` for an empty viewport or a degenerate unprojection.
    #[must_use]
    pub fn screen_ray(&self, cursor: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }

        let ndc_x = cursor.x / viewport.x * 2.0 - 1.0;
        let ndc_y = 1.0 - cursor.y / viewport.y * 2.0;
        let inv_view_proj = self.view_projection_matrix().inverse();

        // glam's perspective_rh maps depth to [0, 1]
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
            return None;
        }

        Ray::through(near.truncate() / near.w, far.truncate() / far.w)
    }
}

impl ViewCamera for OrbitCamera {
    fn eye_position(&self) -> Vec3 {
        self.position()
    }

    fn target(&self) -> Vec3 {
        self.target
    }

    fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    fn set_view(&mut self, fit: &ViewFit) {
        self.target = fit.target;
        self.distance = fit.distance;
        self.near = fit.near_plane;
        self.far = fit.far_plane;
    }

    fn eye_distance(&self) -> f32 {
        self.distance
    }
}
