//! Flapping lattice with a travelling glow shell.
//!
//! Each tick, for every point:
//! 1. rotate the snapshot position with the wing flap
//! 2. breathe on x/z
//! 3. measure distance to an expanding spherical shell and derive a glow
//! 4. push the point outward along its direction by the glow
//! 5. shift the base color's hue/lightness and blend toward the glow color

use std::f32::consts::PI;

use glam::Vec3;

use super::wing_flap::{flap_angle, flap_point, warped_cell};
use super::{Demo, DemoId};
use crate::core::color::{Rgb, BLACK, WHITE};
use crate::core::geometry::CubeLattice;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, Simplex2, UniformSet};

pub const COUNT: usize = 15_625;
pub const GAP: f32 = 0.1;

const DEEP_BLUE: Rgb = Rgb::from_hex(0x034efc);
const LIGHT_BLUE: Rgb = Rgb::from_hex(0x427afc);
const GLOW: Rgb = Rgb::from_hex(0xf0c697);
const BACKGROUND: Rgb = Rgb::from_hex(0x100500);

const NOISE_FREQUENCY: f32 = 6.0;
const EYE_CENTER: [f32; 2] = [0.5, 0.6];
const EYE_RADIUS: f32 = 0.2;

const BREATH_SPEED: f32 = 1.0;
const BREATH_AMOUNT: f32 = 0.05;
const DRIFT_SPEED: f32 = 0.5;
const DRIFT_AMOUNT: f32 = 0.3;
const PULSE_SPEED: f32 = 1.0;
const PULSE_WIDTH_RATIO: f32 = 0.4;
const RIM_RATIO: f32 = 0.15;
const RIM_BOOST: f32 = 0.35;
const GLOW_EASING: f32 = 1.6;
pub const DISPLACEMENT: f32 = 0.25;
const HUE_SHIFT: f32 = 0.12;
const LIGHTNESS_BOOST: f32 = 0.25;
const GLOW_BLEND: f32 = 0.95;
const AUTO_ROTATE_SPEED: f32 = 0.2;

/// Per-tick pulse parameters shared by every point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub radius: f32,
    pub width: f32,
    pub fade: f32,
}

impl Pulse {
    pub fn at(t: f32, max_dist: f32) -> Self {
        let phase = (t * PULSE_SPEED).rem_euclid(1.0);
        Self {
            radius: phase * max_dist,
            width: max_dist * PULSE_WIDTH_RATIO,
            fade: (phase * PI).sin(),
        }
    }

    /// Eased glow in [0, 1] for a point at `dist` from the center.
    pub fn glow(&self, dist: f32) -> f32 {
        if self.width <= 0.0 {
            return 0.0;
        }
        let to_shell = (dist - self.radius).abs();
        let shell = if to_shell < self.width {
            (1.0 - to_shell / self.width).powi(3) * self.fade
        } else {
            0.0
        };
        let rim = (1.0 - to_shell / (self.width * RIM_RATIO)).max(0.0);
        let combined = (shell + rim * RIM_BOOST).clamp(0.0, 1.0);
        combined.powf(GLOW_EASING)
    }
}

/// Base color of a lattice cell from its normalized axis position.
fn base_color(noise: &Simplex2, normalized: [f32; 3]) -> Rgb {
    let [tx, ty, tz] = normalized;
    let eye = ((tx - EYE_CENTER[0]).powi(2) + (ty - EYE_CENTER[1]).powi(2)).sqrt();

    if eye < EYE_RADIUS {
        LIGHT_BLUE.lerp(WHITE, 1.0 - eye / EYE_RADIUS).scale(3.0)
    } else if tx < 0.1 && tz < 0.1 {
        WHITE.scale(2.5)
    } else if tx > 0.95 || ty > 0.95 {
        BLACK
    } else {
        let n = noise.sample(tx * NOISE_FREQUENCY, ty * NOISE_FREQUENCY);
        DEEP_BLUE.lerp(LIGHT_BLUE, (n + 1.0) / 2.0)
    }
}

/// Glow-shifted version of `base`: hue and lightness offset by the glow,
/// then blended toward the glow color. Over-bright bases are clamped into
/// [0, 1] first, so every output channel is in range.
pub fn glow_color(base: Rgb, eased: f32) -> Rgb {
    let base = base.clamp01();
    if eased <= 0.0 {
        return base;
    }
    let shifted = base.offset_hsl(eased * HUE_SHIFT, 0.0, eased * LIGHTNESS_BOOST);
    shifted.lerp(GLOW, (eased * GLOW_BLEND).min(1.0)).clamp01()
}

pub struct PulseCubeDemo {
    buffer: PointBuffer,
    /// Snapshot distance from the center, per point
    radii: Vec<f32>,
    max_dist: f32,
    base_camera: OrbitCamera,
    camera: OrbitCamera,
    auto_rotate: bool,
    uniforms: UniformSet,
}

impl PulseCubeDemo {
    pub fn new(seed: u64, auto_rotate: bool) -> Self {
        let noise = Simplex2::new(seed);
        let lattice = CubeLattice::new(COUNT, GAP);

        let buffer = PointBuffer::from_points(lattice.cells().map(|cell| {
            let position = warped_cell(cell.offset, cell.normalized, GAP);
            (position, base_color(&noise, cell.normalized).to_array())
        }));
        let radii: Vec<f32> = buffer
            .snapshot_positions()
            .iter()
            .map(|p| Vec3::from(*p).length())
            .collect();
        let max_dist = buffer.snapshot_radius();

        let base_camera =
            OrbitCamera::new(Vec3::new(0.0, 2.5, 9.0), Vec3::ZERO).with_fov_degrees(75.0);

        tracing::debug!(points = buffer.len(), max_dist, "pulse cube built");

        Self {
            buffer,
            radii,
            max_dist,
            base_camera,
            camera: base_camera,
            auto_rotate,
            uniforms: UniformSet::with_standard(),
        }
    }

    pub fn max_dist(&self) -> f32 {
        self.max_dist
    }
}

impl Demo for PulseCubeDemo {
    fn id(&self) -> DemoId {
        DemoId::PulseCube
    }

    fn update(&mut self, input: &FrameInput) {
        let t = input.time;
        let angle = flap_angle(t);
        let breath = 1.0 + (t * BREATH_SPEED).sin() * BREATH_AMOUNT;
        let drift = (t * DRIFT_SPEED).sin() * DRIFT_AMOUNT;
        let pulse = Pulse::at(t, self.max_dist);
        let radii = &self.radii;

        self.buffer.update_points(|i, pos0, col0, pos, col| {
            let mut p = flap_point(Vec3::from(*pos0), angle);
            p.x *= breath;
            p.z *= breath;

            let eased = pulse.glow(radii[i]);
            let normal = if p.length_squared() < 1e-8 {
                Vec3::Y
            } else {
                p.normalize()
            };
            p += normal * eased * DISPLACEMENT;
            p.y += drift;

            *pos = p.to_array();
            *col = glow_color(Rgb::from_array(*col0), eased).to_array();
        });

        self.camera = if self.auto_rotate {
            self.base_camera
                .orbited(OrbitCamera::auto_rotate_angle(t, AUTO_ROTATE_SPEED))
        } else {
            self.base_camera
        };
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

    fn clear_color(&self) -> [f32; 3] {
        BACKGROUND.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_and_extent() {
        let demo = PulseCubeDemo::new(1, true);
        assert_eq!(demo.points().unwrap().len(), COUNT);
        let expected = demo.points().unwrap().snapshot_radius();
        assert!((demo.max_dist() - expected).abs() < 1e-6);
        assert!(demo.max_dist() > 0.0);
    }

    #[test]
    fn test_pulse_cycle() {
        let start = Pulse::at(0.0, 2.0);
        assert_eq!(start.radius, 0.0);
        assert_eq!(start.fade, 0.0);
        let half = Pulse::at(0.5, 2.0);
        assert!((half.radius - 1.0).abs() < 1e-6);
        assert!((half.fade - 1.0).abs() < 1e-6);
        assert!((half.width - 0.8).abs() < 1e-6);
        // Period of one second
        assert!((Pulse::at(3.5, 2.0).radius - half.radius).abs() < 1e-4);
    }

    #[test]
    fn test_glow_peaks_on_shell() {
        let pulse = Pulse::at(0.5, 2.0);
        let on_shell = pulse.glow(1.0);
        let near = pulse.glow(1.3);
        let far = pulse.glow(1.9);
        assert!((on_shell - 1.0).abs() < 1e-6);
        assert!(near < on_shell && near > 0.0);
        assert_eq!(far, 0.0);
    }

    #[test]
    fn test_glow_color_blends_toward_glow() {
        let base = DEEP_BLUE;
        assert_eq!(glow_color(base, 0.0), base);
        let full = glow_color(base, 1.0);
        let target = GLOW;
        let dist = |a: Rgb, b: Rgb| (a.r - b.r).abs() + (a.g - b.g).abs() + (a.b - b.b).abs();
        assert!(dist(full, target) < dist(base, target));
    }

    #[test]
    fn test_glow_color_clamps_over_bright_bases() {
        let hot = LIGHT_BLUE.lerp(WHITE, 0.5).scale(3.0);
        for &eased in &[0.0, 0.1, 0.5, 1.0] {
            for base in [hot, WHITE.scale(2.5), DEEP_BLUE] {
                let c = glow_color(base, eased);
                assert!(
                    [c.r, c.g, c.b].iter().all(|v| (0.0..=1.0).contains(v)),
                    "{c:?} out of range at eased={eased}"
                );
            }
        }
        assert_eq!(glow_color(WHITE.scale(2.5), 0.0), WHITE);
    }

    #[test]
    fn test_lattice_colors_in_range_while_pulsing() {
        let mut demo = PulseCubeDemo::new(3, false);
        for &t in &[0.0, 0.3, 0.5, 0.8] {
            demo.update(&FrameInput::at(t));
            let colors = demo.points().unwrap().colors();
            assert!(colors.iter().flatten().all(|c| (0.0..=1.0).contains(c)), "t={t}");
        }
    }

    #[test]
    fn test_seed_changes_noise_colors_only() {
        let a = PulseCubeDemo::new(1, false);
        let b = PulseCubeDemo::new(2, false);
        let pa = a.points().unwrap();
        let pb = b.points().unwrap();
        assert_eq!(pa.snapshot_positions(), pb.snapshot_positions());
        assert_ne!(pa.snapshot_colors(), pb.snapshot_colors());
    }

    #[test]
    fn test_camera_auto_rotates() {
        let mut demo = PulseCubeDemo::new(1, true);
        demo.update(&FrameInput::at(30.0));
        let rotated = demo.camera().unwrap().eye;
        let mut still = PulseCubeDemo::new(1, false);
        still.update(&FrameInput::at(30.0));
        assert_ne!(rotated, still.camera().unwrap().eye);
        assert!((rotated.length() - still.camera().unwrap().eye.length()).abs() < 1e-4);
    }

    #[test]
    fn test_colors_finite() {
        let mut demo = PulseCubeDemo::new(5, true);
        for &t in &[0.0, 0.25, 0.5, 1.75, 12.3] {
            demo.update(&FrameInput::at(t));
            let buffer = demo.points().unwrap();
            assert!(buffer.colors().iter().flatten().all(|c| c.is_finite() && *c >= 0.0));
            assert!(buffer.positions().iter().flatten().all(|c| c.is_finite()));
        }
    }
}
