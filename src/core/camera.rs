//! Perspective orbit camera
//!
//! Produces view-projection matrices for the GPU path and projects points
//! for the CPU painter. Depth range is [0, 1] (wgpu convention).

use glam::{Mat4, Quat, Vec3, Vec4Swizzles};
use std::f32::consts::TAU;

/// Orbit camera auto-rotate rate: one full turn per 60 s at speed 1.0
pub const AUTO_ROTATE_RATE: f32 = TAU / 60.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov_y: 75f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn with_fov_degrees(mut self, degrees: f32) -> Self {
        self.fov_y = degrees.to_radians();
        self
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Copy of this camera with the eye rotated `angle` radians about the
    /// target's vertical axis. `up` turns with it, so top-down views spin.
    pub fn orbited(&self, angle: f32) -> Self {
        let rotation = Quat::from_axis_angle(Vec3::Y, angle);
        Self {
            eye: self.target + rotation * (self.eye - self.target),
            up: rotation * self.up,
            ..*self
        }
    }

    /// Orbit angle reached after `time` seconds of auto-rotation.
    pub fn auto_rotate_angle(time: f32, speed: f32) -> f32 {
        time * AUTO_ROTATE_RATE * speed
    }

    /// Move the eye a fraction of the way toward `goal`.
    pub fn ease_toward(&mut self, goal: Vec3, factor: f32) {
        self.eye += (goal - self.eye) * factor.clamp(0.0, 1.0);
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Project a world point to NDC. `None` when the point is behind the eye.
    pub fn project(&self, point: [f32; 3], aspect: f32) -> Option<[f32; 2]> {
        self.project_with(&self.view_proj(aspect), point)
    }

    /// Same as [`Self::project`] with a precomputed matrix, for per-point loops.
    pub fn project_with(&self, view_proj: &Mat4, point: [f32; 3]) -> Option<[f32; 2]> {
        let clip = *view_proj * Vec3::from(point).extend(1.0);
        if clip.w <= self.near * 0.5 {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        Some([ndc.x, ndc.y])
    }
}
