use glam::Vec3;

use super::{Demo, DemoId};
use crate::core::geometry::grid_plane;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, UniformSet};

pub const SIZE: f32 = 20.0;
pub const SEGMENTS: u32 = 50;
const FREQUENCY: f32 = 0.5;
const AMPLITUDE: f32 = 5.0;

/// Height of the travelling wave at `(x, y)` and time `t`.
pub fn wave_height(x: f32, y: f32, t: f32) -> f32 {
    (x * FREQUENCY + t).sin() * (y * FREQUENCY + t).cos() * AMPLITUDE
}

/// Colored plane whose z follows `sin(x/2 + t) cos(y/2 + t) * 5`.
pub struct WaveGridDemo {
    buffer: PointBuffer,
    camera: OrbitCamera,
    uniforms: UniformSet,
}

impl WaveGridDemo {
    pub fn new() -> Self {
        let plane = grid_plane(SIZE, SEGMENTS, |x, y| wave_height(x, y, 0.0));
        // Blue channel saturated for this plane
        let buffer = PointBuffer::from_points(
            plane
                .positions
                .into_iter()
                .zip(plane.colors)
                .map(|(p, c)| (p, [c[0], c[1], 1.0])),
        );

        Self {
            buffer,
            camera: OrbitCamera::new(Vec3::new(0.0, 0.0, 20.0), Vec3::ZERO),
            uniforms: UniformSet::with_standard(),
        }
    }
}

impl Default for WaveGridDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for WaveGridDemo {
    fn id(&self) -> DemoId {
        DemoId::WaveGrid
    }

    fn update(&mut self, input: &FrameInput) {
        let t = input.time;
        self.buffer.update_positions(|_, orig, live| {
            *live = [orig[0], orig[1], wave_height(orig[0], orig[1], t)];
        });
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
        0.25
    }
}
