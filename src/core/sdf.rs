//! Signed distance functions and a sphere-tracing raymarcher.
//!
//! CPU reference for the raymarching shader; `render/shaders/raymarch.wgsl`
//! mirrors [`shade_sphere_uv`].

use glam::{Vec2, Vec3};

pub fn sd_sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

pub const NORMAL_EPSILON: f32 = 1e-4;

/// Central-difference gradient of `map`, normalized.
pub fn calc_normal<F>(map: F, p: Vec3) -> Vec3
where
    F: Fn(Vec3) -> f32,
{
    let e = NORMAL_EPSILON;
    let ex = Vec3::new(e, 0.0, 0.0);
    let ey = Vec3::new(0.0, e, 0.0);
    let ez = Vec3::new(0.0, 0.0, e);
    Vec3::new(
        map(p + ex) - map(p - ex),
        map(p + ey) - map(p - ey),
        map(p + ez) - map(p - ez),
    )
    .normalize_or_zero()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaymarchParams {
    pub max_steps: u32,
    pub hit_epsilon: f32,
    pub max_distance: f32,
}

impl Default for RaymarchParams {
    fn default() -> Self {
        Self {
            max_steps: 100,
            hit_epsilon: 0.001,
            max_distance: 20.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub position: Vec3,
    pub steps: u32,
}

pub fn raymarch<F>(map: F, ro: Vec3, rd: Vec3, params: RaymarchParams) -> Option<Hit>
where
    F: Fn(Vec3) -> f32,
{
    let mut t = 0.0;
    for step in 0..params.max_steps {
        let position = ro + rd * t;
        let d = map(position);
        if d < params.hit_epsilon {
            return Some(Hit {
                distance: t,
                position,
                steps: step + 1,
            });
        }
        t += d;
        if t > params.max_distance {
            break;
        }
    }
    None
}

pub const SPHERE_RADIUS: f32 = 0.25;

fn sphere_scene(p: Vec3) -> f32 {
    sd_sphere(p, SPHERE_RADIUS)
}

/// Per-pixel color of the raymarched sphere for `uv` in [0, 1]² (y up).
/// Returns grey `normal.y` on hit, black on miss.
pub fn shade_sphere_uv(uv: [f32; 2], resolution: [f32; 2]) -> [f32; 3] {
    let aspect = if resolution[1] > 0.0 {
        resolution[0] / resolution[1]
    } else {
        1.0
    };
    let mut p = Vec2::new(uv[0], uv[1]) * 2.0 - Vec2::ONE;
    p.x *= aspect;

    let ro = Vec3::new(0.0, 0.0, 1.0);
    let rd = Vec3::new(p.x, p.y, -1.5).normalize();

    match raymarch(sphere_scene, ro, rd, RaymarchParams::default()) {
        Some(hit) => {
            let n = calc_normal(sphere_scene, hit.position);
            [n.y, n.y, n.y]
        }
        None => [0.0, 0.0, 0.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_distances() {
        assert!((sd_sphere(Vec3::new(1.0, 0.0, 0.0), 0.25) - 0.75).abs() < 1e-6);
        assert!(sd_sphere(Vec3::ZERO, 0.25) < 0.0);
    }

    #[test]
    fn test_sphere_normal_points_outward() {
        let p = Vec3::new(0.0, 0.25, 0.0);
        let n = calc_normal(sphere_scene, p);
        assert!((n - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_raymarch_hits_sphere_front() {
        let hit = raymarch(sphere_scene, Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z, RaymarchParams::default())
            .expect("ray through center must hit");
        assert!((hit.distance - 0.75).abs() < 1e-3);
        assert!(hit.steps >= 1);
    }

    #[test]
    fn test_raymarch_miss() {
        let miss = raymarch(sphere_scene, Vec3::new(0.0, 0.0, 1.0), Vec3::Z, RaymarchParams::default());
        assert!(miss.is_none());
    }

    #[test]
    fn test_shade_center_and_corner() {
        // Center pixel hits the sphere head-on: normal is +z, y component ~0
        let center = shade_sphere_uv([0.5, 0.5], [100.0, 100.0]);
        assert!(center[0].abs() < 1e-2);

        // Slightly above center the normal tilts up
        let upper = shade_sphere_uv([0.5, 0.6], [100.0, 100.0]);
        assert!(upper[1] > 0.1);

        // Corners miss
        assert_eq!(shade_sphere_uv([0.0, 0.0], [100.0, 100.0]), [0.0; 3]);
    }
}
