use std::f32::consts::PI;

use glam::Vec3;

use super::{Demo, DemoId};
use crate::core::geometry::grid_plane;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, UniformSet};

pub const SIZE: f32 = 20.0;
pub const SEGMENTS: u32 = 100;
const RIPPLES: usize = 30;
const AMPLITUDE: f32 = 1.5;
const DAMPING: f32 = 0.05;
const RIPPLE_SPEED: f32 = 1.0;
/// Fraction of the remaining distance the camera covers per tick
pub const FOLLOW_SPEED: f32 = 0.15;
const CAMERA_DISTANCE: f32 = 20.0;

/// Sum of 30 staggered, distance-damped sine rings centered at `center`.
pub fn ripple_height(x: f32, y: f32, center: [f32; 2], t: f32) -> f32 {
    let dx = x - center[0];
    let dy = y - center[1];
    let d = (dx * dx + dy * dy).sqrt();
    let falloff = AMPLITUDE * (-d * DAMPING).exp();

    (0..RIPPLES)
        .map(|j| {
            let phase = j as f32 * PI / 2.0;
            let freq = 0.3 + j as f32 * 0.1;
            (d * freq - t * RIPPLE_SPEED + phase).sin()
        })
        .sum::<f32>()
        * falloff
}

/// Camera position the ripple view drifts toward for a pointer position.
pub fn camera_goal(pointer: [f32; 2]) -> Vec3 {
    Vec3::new(
        (pointer[0] * PI).sin() * CAMERA_DISTANCE,
        (pointer[1] * PI).sin() * CAMERA_DISTANCE,
        CAMERA_DISTANCE,
    )
}

/// Flat grid rippling out from the pointer, with a pointer-following camera.
pub struct RippleDemo {
    buffer: PointBuffer,
    camera: OrbitCamera,
    uniforms: UniformSet,
}

impl RippleDemo {
    pub fn new() -> Self {
        let plane = grid_plane(SIZE, SEGMENTS, |_, _| 0.0);
        Self {
            buffer: PointBuffer::from_points(plane.positions.into_iter().zip(plane.colors)),
            camera: OrbitCamera::new(Vec3::new(0.0, 0.0, CAMERA_DISTANCE), Vec3::ZERO),
            uniforms: UniformSet::with_standard(),
        }
    }
}

impl Default for RippleDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for RippleDemo {
    fn id(&self) -> DemoId {
        DemoId::Ripple
    }

    fn update(&mut self, input: &FrameInput) {
        let t = input.time;
        let center = [input.pointer[0] * SIZE, input.pointer[1] * SIZE];
        self.buffer.update_positions(|_, orig, live| {
            *live = [orig[0], orig[1], ripple_height(orig[0], orig[1], center, t)];
        });

        self.camera.ease_toward(camera_goal(input.pointer), FOLLOW_SPEED);
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn points(&self) -> Option<&PointBuffer> {
        Some(&self.buffer)
    }

    fn camera(&self) -> Option<&OrbitCamera> {
        Some(&self.camera)
    }

    fn point_size(&self) -> f32 {
        0.15
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_is_damped_with_distance() {
        let bound = |d: f32| RIPPLES as f32 * AMPLITUDE * (-d * DAMPING).exp();
        for &(x, y) in &[(0.0, 0.0), (5.0, 0.0), (9.0, -9.0)] {
            let h = ripple_height(x, y, [0.0, 0.0], 1.3);
            let d = (x * x + y * y).sqrt();
            assert!(h.abs() <= bound(d) + 1e-4);
        }
    }

    #[test]
    fn test_center_follows_pointer() {
        let mut a = RippleDemo::new();
        let mut b = RippleDemo::new();
        a.update(&FrameInput::at(1.0));
        b.update(&FrameInput::at(1.0).with_pointer(0.5, 0.0));
        assert_ne!(a.points().unwrap().positions(), b.points().unwrap().positions());

        // Translating the center translates the field
        let h0 = ripple_height(0.0, 0.0, [0.0, 0.0], 2.0);
        let h1 = ripple_height(10.0, 0.0, [10.0, 0.0], 2.0);
        assert!((h0 - h1).abs() < 1e-5);
    }

    #[test]
    fn test_camera_eases_toward_pointer() {
        let mut demo = RippleDemo::new();
        let goal = camera_goal([0.5, 0.0]);
        let start = demo.camera().unwrap().eye.distance(goal);
        for k in 0..10 {
            demo.update(&FrameInput::at(k as f32 / 60.0).with_pointer(0.5, 0.0));
        }
        let end = demo.camera().unwrap().eye.distance(goal);
        assert!(end < start * 0.25);
        assert!((goal.x - 20.0).abs() < 1e-4);
    }
}
