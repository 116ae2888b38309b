//! Staircase helix with two rails and a camera riding along the curve.

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use super::{Demo, DemoId};
use crate::core::color::{Rgb, WHITE};
use crate::core::geometry::helix;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, UniformSet};

pub const RADIUS: f32 = 5.0;
pub const TURNS: f32 = 8.0;
pub const SEGMENTS: u32 = 400;
pub const HEIGHT: f32 = 60.0;
pub const STAIR_STEP: f32 = 0.02;
/// Fraction of the curve travelled per second
pub const TRAVEL_SPEED: f32 = 0.02;

const RAIL_GAP: f32 = 0.8;
const RAIL_COLOR: Rgb = Rgb::from_hex(0xaaaaaa);
const BACKGROUND: Rgb = Rgb::from_hex(0x1a1a1a);
const HIGHLIGHT_SPAN: f32 = 12.0;
const HIGHLIGHT_STRENGTH: f32 = 0.8;

const CAMERA_OFFSET: f32 = 5.0;
const CAMERA_LIFT: f32 = 0.5;
const MAX_YAW: f32 = PI * 0.8;
/// Pointer pitch range is 0.7π; the look direction is clamped short of straight up/down
const PITCH_RANGE: f32 = PI * 0.7;
const MAX_PITCH: f32 = PI * 0.45;

/// Position along the center line at `progress` in [0, 1], linear between samples.
fn curve_point(points: &[[f32; 3]], progress: f32) -> Vec3 {
    let Some(last) = points.len().checked_sub(1) else {
        return Vec3::ZERO;
    };
    let x = progress.clamp(0.0, 1.0) * last as f32;
    let i = (x.floor() as usize).min(last);
    let j = (i + 1).min(last);
    Vec3::from(points[i]).lerp(Vec3::from(points[j]), x - i as f32)
}

/// Horizontal unit vector to the right of the curve direction at sample `i`.
fn rail_offset(points: &[[f32; 3]], i: usize) -> Vec3 {
    let prev = Vec3::from(points[i.saturating_sub(1)]);
    let next = Vec3::from(points[(i + 1).min(points.len() - 1)]);
    let right = (next - prev).cross(Vec3::Y);
    if right.length_squared() < 1e-12 {
        Vec3::X
    } else {
        right.normalize()
    }
}

/// Camera for curve progress `progress` and pointer `pointer` (NDC).
pub fn follow_camera(points: &[[f32; 3]], progress: f32, pointer: [f32; 2]) -> OrbitCamera {
    let point = curve_point(points, progress);
    let radial = Vec3::new(point.x, 0.0, point.z);
    let radial = if radial.length_squared() < 1e-6 {
        Vec3::X
    } else {
        radial.normalize()
    };
    let eye = point + radial * CAMERA_OFFSET + Vec3::Y * CAMERA_LIFT;

    let to_point = point - eye;
    let dist = to_point.length();
    let forward = to_point / dist;
    let right = forward.cross(Vec3::Y).normalize();

    let yaw = pointer[0] * MAX_YAW;
    let pitch = (-pointer[1] * PITCH_RANGE).clamp(-MAX_PITCH, MAX_PITCH);
    let look = Quat::from_axis_angle(right, pitch) * (Quat::from_axis_angle(Vec3::Y, yaw) * forward);

    OrbitCamera::new(eye, eye + look * dist).with_fov_degrees(50.0)
}

pub struct HelixDemo {
    buffer: PointBuffer,
    /// Center line samples, one per segment boundary
    center: Vec<[f32; 3]>,
    camera: OrbitCamera,
    uniforms: UniformSet,
}

impl HelixDemo {
    pub fn new() -> Self {
        let curve = helix(RADIUS, TURNS, SEGMENTS, HEIGHT, STAIR_STEP);
        let center = curve.positions.clone();

        let rails: Vec<([f32; 3], [f32; 3])> = [1.0, -1.0]
            .iter()
            .flat_map(|&side| {
                let center = &center;
                (0..center.len()).map(move |i| {
                    let p = Vec3::from(center[i]) + rail_offset(center, i) * (side * RAIL_GAP / 2.0);
                    (p.to_array(), RAIL_COLOR.to_array())
                })
            })
            .collect();

        let buffer = PointBuffer::from_points(
            curve
                .positions
                .into_iter()
                .zip(curve.colors)
                .chain(rails),
        );

        let camera = follow_camera(&center, 0.0, [0.0, 0.0]);
        Self {
            buffer,
            center,
            camera,
            uniforms: UniformSet::with_standard(),
        }
    }

    /// Number of samples on the center line; rails follow in the buffer.
    pub fn center_len(&self) -> usize {
        self.center.len()
    }
}

impl Default for HelixDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for HelixDemo {
    fn id(&self) -> DemoId {
        DemoId::Helix
    }

    fn update(&mut self, input: &FrameInput) {
        let progress = (input.time * TRAVEL_SPEED).rem_euclid(1.0);
        let head = progress * SEGMENTS as f32;
        let center_len = self.center.len();

        self.buffer.update_colors(|i, base, live| {
            *live = if i < center_len {
                let glow = (1.0 - (i as f32 - head).abs() / HIGHLIGHT_SPAN).max(0.0);
                Rgb::from_array(*base)
                    .lerp(WHITE, glow * HIGHLIGHT_STRENGTH)
                    .to_array()
            } else {
                *base
            };
        });

        self.camera = follow_camera(&self.center, progress, input.pointer);
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
        0.12
    }

    fn clear_color(&self) -> [f32; 3] {
        BACKGROUND.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_rails() {
        let demo = HelixDemo::new();
        let n = SEGMENTS as usize + 1;
        assert_eq!(demo.center_len(), n);
        let buffer = demo.points().unwrap();
        assert_eq!(buffer.len(), 3 * n);

        let positions = buffer.snapshot_positions();
        for i in [0, 50, 200, n - 1] {
            let c = Vec3::from(positions[i]);
            let l = Vec3::from(positions[n + i]);
            let r = Vec3::from(positions[2 * n + i]);
            assert!((l.distance(r) - RAIL_GAP).abs() < 1e-4);
            assert!(((l + r) / 2.0).distance(c) < 1e-4);
            assert!((l.y - c.y).abs() < 1e-6, "rails stay level with the center line");
        }
    }

    #[test]
    fn test_highlight_travels() {
        let mut demo = HelixDemo::new();
        demo.update(&FrameInput::at(0.0));
        let buffer = demo.points().unwrap();
        assert_ne!(buffer.colors()[0], buffer.snapshot_colors()[0]);
        assert_eq!(buffer.colors()[200], buffer.snapshot_colors()[200]);

        // Halfway round at t = 25 s
        demo.update(&FrameInput::at(25.0));
        let buffer = demo.points().unwrap();
        assert_eq!(buffer.colors()[0], buffer.snapshot_colors()[0]);
        assert_ne!(buffer.colors()[200], buffer.snapshot_colors()[200]);
    }

    #[test]
    fn test_camera_follows_curve() {
        let demo = HelixDemo::new();
        let center = &demo.center;
        let camera = follow_camera(center, 0.5, [0.0, 0.0]);
        let point = curve_point(center, 0.5);
        assert!((camera.target - point).length() < 1e-3);
        let horizontal = Vec3::new(camera.eye.x, 0.0, camera.eye.z).length();
        assert!((horizontal - (RADIUS + CAMERA_OFFSET)).abs() < 1e-3);
        assert!((camera.eye.y - point.y - CAMERA_LIFT).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_yaw_turns_view() {
        let demo = HelixDemo::new();
        let still = follow_camera(&demo.center, 0.1, [0.0, 0.0]);
        let turned = follow_camera(&demo.center, 0.1, [0.5, 0.0]);
        assert_eq!(still.eye, turned.eye);
        assert!(still.target.distance(turned.target) > 1.0);
        let pitched = follow_camera(&demo.center, 0.1, [0.0, 1.0]);
        assert!(pitched.target.y < still.target.y);
    }
}
