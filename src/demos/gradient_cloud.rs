use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{Demo, DemoId};
use crate::core::color::{hsl_ramp, Hsl};
use crate::core::geometry::banded_cloud;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, UniformSet};

pub const COUNT: usize = 15_000;
const EXTENT: f32 = 2.5;
const SCROLL_SPEED: f32 = 0.2;
const SPIN_SPEED: f32 = 0.1;

/// Horizontal slabs the cloud's y values are drawn from.
pub const BANDS: [(f32, f32); 7] = [
    (-1.25, -1.0),
    (-0.85, -0.65),
    (-0.45, -0.25),
    (-0.10, 0.10),
    (0.25, 0.45),
    (0.65, 0.85),
    (1.0, 1.25),
];

const NAVY: Hsl = Hsl::new(220.0 / 360.0, 1.0, 0.15);
const YELLOW: Hsl = Hsl::new(60.0 / 360.0, 1.0, 0.5);

/// Ramp position of a point whose base position is `base_t`, shifted by time.
pub fn ramp_position(base_t: f32, t: f32) -> f32 {
    let offset = (t * SCROLL_SPEED).rem_euclid(1.0);
    (base_t + offset).rem_euclid(1.0)
}

/// Banded cloud seen from above, its navy-to-yellow gradient scrolling upward.
pub struct GradientCloudDemo {
    buffer: PointBuffer,
    /// Normalized height of every point, fixed at construction
    base_t: Vec<f32>,
    base_camera: OrbitCamera,
    camera: OrbitCamera,
    auto_rotate: bool,
    uniforms: UniformSet,
}

impl GradientCloudDemo {
    pub fn new(seed: u64, auto_rotate: bool) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let cloud = banded_cloud(COUNT, EXTENT, &BANDS, &mut rng);
        let range = cloud.y_range();

        let base_t: Vec<f32> = cloud
            .positions
            .iter()
            .map(|p| (p[1] - cloud.y_min) / range)
            .collect();
        let buffer = PointBuffer::from_points(
            cloud
                .positions
                .into_iter()
                .zip(base_t.iter())
                .map(|(p, &t)| (p, hsl_ramp(NAVY, YELLOW, ramp_position(t, 0.0)).to_array())),
        );

        let mut base_camera = OrbitCamera::new(Vec3::new(0.0, 2.0, 0.0), Vec3::ZERO);
        base_camera.up = Vec3::NEG_Z;

        Self {
            buffer,
            base_t,
            base_camera,
            camera: base_camera,
            auto_rotate,
            uniforms: UniformSet::with_standard(),
        }
    }
}

impl Demo for GradientCloudDemo {
    fn id(&self) -> DemoId {
        DemoId::GradientCloud
    }

    fn update(&mut self, input: &FrameInput) {
        let t = input.time;
        let base_t = &self.base_t;
        self.buffer.update_colors(|i, _, live| {
            *live = hsl_ramp(NAVY, YELLOW, ramp_position(base_t[i], t)).to_array();
        });

        if self.auto_rotate {
            self.camera = self.base_camera.orbited(t * SPIN_SPEED);
        }
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
        0.025
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_stay_inside_bands() {
        let demo = GradientCloudDemo::new(9, false);
        let buffer = demo.points().unwrap();
        assert_eq!(buffer.len(), COUNT);
        for p in buffer.snapshot_positions() {
            assert!(BANDS.iter().any(|&(lo, hi)| p[1] >= lo && p[1] <= hi));
            assert!(p[0].abs() <= EXTENT / 2.0 && p[2].abs() <= EXTENT / 2.0);
        }
    }

    #[test]
    fn test_positions_untouched() {
        let mut demo = GradientCloudDemo::new(3, true);
        for &t in &[0.0, 1.0, 7.5] {
            demo.update(&FrameInput::at(t));
            let buffer = demo.points().unwrap();
            assert_eq!(buffer.positions(), buffer.snapshot_positions());
        }
    }

    #[test]
    fn test_gradient_wraps_every_five_seconds() {
        assert!((ramp_position(0.3, 0.0) - 0.3).abs() < 1e-6);
        assert!((ramp_position(0.3, 5.0) - 0.3).abs() < 1e-5);
        assert!((ramp_position(0.9, 1.0) - 0.1).abs() < 1e-5);

        let mut a = GradientCloudDemo::new(3, false);
        a.update(&FrameInput::at(0.0));
        let at_zero = a.points().unwrap().colors().to_vec();
        assert_eq!(at_zero.as_slice(), a.points().unwrap().snapshot_colors());
    }

    #[test]
    fn test_colors_in_unit_range() {
        let mut demo = GradientCloudDemo::new(11, false);
        for k in 0..20 {
            demo.update(&FrameInput::at(k as f32 * 0.37));
            assert!(demo
                .points()
                .unwrap()
                .colors()
                .iter()
                .flatten()
                .all(|c| (0.0..=1.0).contains(c)));
        }
    }

    #[test]
    fn test_camera_spins_up_vector() {
        let mut demo = GradientCloudDemo::new(1, true);
        demo.update(&FrameInput::at(10.0));
        let camera = demo.camera().unwrap();
        assert!((camera.eye - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        assert!((camera.up - Vec3::NEG_Z).length() > 0.1);
        assert!((camera.up.length() - 1.0).abs() < 1e-5);
    }
}
