use std::f32::consts::PI;

use glam::{Quat, Vec3};

use super::{Demo, DemoId};
use crate::core::color::{hsl_ramp, Hsl};
use crate::core::geometry::CubeLattice;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, UniformSet};

pub const COUNT: usize = 3375;
pub const GAP: f32 = 0.1;
pub const FLAP_FREQUENCY: f32 = 2.5;
pub const FLAP_MAX_ANGLE: f32 = PI / 6.0;

const BLUE: Hsl = Hsl::new(220.0 / 360.0, 1.0, 0.5);
const YELLOW: Hsl = Hsl::new(60.0 / 360.0, 1.0, 0.5);

/// Flap angle at time `t`, oscillating within ±30°.
pub fn flap_angle(t: f32) -> f32 {
    (t * FLAP_FREQUENCY).sin() * FLAP_MAX_ANGLE
}

/// Rotate `p` by `angle` about the horizontal axis perpendicular to its
/// xz direction. Points on the vertical axis rotate about +Y.
pub fn flap_point(p: Vec3, angle: f32) -> Vec3 {
    let axis = Vec3::new(p.z, 0.0, -p.x);
    let axis = if axis.length_squared() < 1e-8 {
        Vec3::Y
    } else {
        axis.normalize()
    };
    Quat::from_axis_angle(axis, angle) * p
}

/// Warp a lattice cell into the bulged "wing" shape shared by the cube demos.
pub fn warped_cell(offset: [f32; 3], normalized: [f32; 3], gap: f32) -> [f32; 3] {
    let fx = (normalized[0] * PI * 0.5).sin();
    let fy = (normalized[1] * PI * 0.5).sin();
    [
        offset[0] * gap * fy,
        offset[1] * gap * fx,
        offset[2] * gap * (fx + fy),
    ]
}

/// Warped lattice flapping like a pair of wings, colored blue to yellow by height.
pub struct WingFlapDemo {
    buffer: PointBuffer,
    camera: OrbitCamera,
    uniforms: UniformSet,
}

impl WingFlapDemo {
    pub fn new() -> Self {
        let lattice = CubeLattice::new(COUNT, GAP);
        let mid = lattice.mid();
        let y_range = {
            let r = 2.0 * mid * GAP;
            if r > 0.0 {
                r
            } else {
                1.0
            }
        };

        let buffer = PointBuffer::from_points(lattice.cells().map(|cell| {
            let position = warped_cell(cell.offset, cell.normalized, GAP);
            let t = (cell.offset[1] * GAP + mid * GAP) / y_range;
            (position, hsl_ramp(BLUE, YELLOW, t).to_array())
        }));

        Self {
            buffer,
            camera: OrbitCamera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO),
            uniforms: UniformSet::with_standard(),
        }
    }
}

impl Default for WingFlapDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for WingFlapDemo {
    fn id(&self) -> DemoId {
        DemoId::WingFlap
    }

    fn update(&mut self, input: &FrameInput) {
        let angle = flap_angle(input.time);
        self.buffer.update_positions(|_, orig, live| {
            *live = flap_point(Vec3::from(*orig), angle).to_array();
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flap_preserves_length() {
        let p = Vec3::new(0.4, -0.2, 0.7);
        for k in 0..20 {
            let q = flap_point(p, flap_angle(k as f32 * 0.21));
            assert!((q.length() - p.length()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_vertical_axis_points_stay_put() {
        let p = Vec3::new(0.0, 0.6, 0.0);
        assert!((flap_point(p, 0.4) - p).length() < 1e-6);
    }

    #[test]
    fn test_identity_at_t0() {
        let mut demo = WingFlapDemo::new();
        demo.update(&FrameInput::at(0.0));
        let buffer = demo.points().unwrap();
        assert_eq!(buffer.len(), COUNT);
        for (p, p0) in buffer.positions().iter().zip(buffer.snapshot_positions()) {
            for k in 0..3 {
                assert!((p[k] - p0[k]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_angle_bounded() {
        for k in 0..100 {
            assert!(flap_angle(k as f32 * 0.37).abs() <= FLAP_MAX_ANGLE + 1e-6);
        }
    }

    #[test]
    fn test_colors_ramp_with_height() {
        let demo = WingFlapDemo::new();
        let buffer = demo.points().unwrap();
        // Bottom and top layers of the first column
        let bottom = buffer.snapshot_colors()[0];
        let top = buffer.snapshot_colors()[14 * 15];
        assert_ne!(bottom, top);
        assert!(top[0] > bottom[0], "yellow end has more red");
    }
}
