//! Smoky fog tube between a sphere and a light.
//!
//! The scene is a fixed sphere and area light seen from a fixed camera. Each
//! tick both are projected to screen uv and handed to the fragment program
//! through the `u_params` uniforms; the program draws the two as discs and
//! lays animated fbm fog along the segment joining them.

use glam::{Vec2, Vec3};

use super::{smoothstep, Demo, DemoId, QuadShader, ShaderProgram};
use crate::core::color::Rgb;
use crate::core::noise::fbm;
use crate::core::uniforms::{UniformValue, U_PARAMS};
use crate::core::{FrameInput, OrbitCamera, QuadUniforms, UniformSet};

const CAMERA_EYE: Vec3 = Vec3::new(-5.0, 3.0, 8.0);
const CAMERA_FOV: f32 = 50.0;

const SPHERE_CENTER: Vec3 = Vec3::new(2.0, 0.0, -2.0);
const SPHERE_RADIUS: f32 = 0.8;
const LIGHT_CENTER: Vec3 = Vec3::new(3.0, 1.15, 10.0);
const LIGHT_RADIUS: f32 = 1.5;
const SPHERE_HALO: f32 = 1.4;
const LIGHT_HALO: f32 = 1.8;
const MIN_SCREEN_RADIUS: f32 = 0.01;

const BACKGROUND: Rgb = Rgb::from_hex(0x1a1a2a);
const SPHERE_COLOR: Rgb = Rgb::from_hex(0x9ad3ff);
const LIGHT_COLOR: Rgb = Rgb::from_hex(0xb0dfff);
const FOG_COLOR: Rgb = Rgb::new(0.58, 0.68, 0.78);

pub const NOISE_SCALE: f32 = 3.0;
pub const FLOW_SPEED: f32 = 0.25;
pub const DENSITY: f32 = 1.6;
pub const ADDITIVE: f32 = 0.9;

/// Screen-space placement of the sphere and the light, uv in `[0, 1]²`, y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FogLayout {
    pub sphere: [f32; 2],
    pub light: [f32; 2],
    /// Halo radii in uv units
    pub sphere_radius: f32,
    pub light_radius: f32,
}

/// Project a world point to screen uv. Points behind the eye land far off-screen.
fn screen_uv(camera: &OrbitCamera, aspect: f32, point: Vec3) -> Vec2 {
    match camera.project(point.to_array(), aspect) {
        Some([x, y]) => Vec2::new((x + 1.0) * 0.5, (y + 1.0) * 0.5),
        None => Vec2::splat(-10.0),
    }
}

/// Screen radius of a world sphere, measured along world +x.
fn screen_radius(camera: &OrbitCamera, aspect: f32, center: Vec3, radius: f32) -> f32 {
    let c = screen_uv(camera, aspect, center);
    let edge = screen_uv(camera, aspect, center + Vec3::X * radius);
    c.distance(edge).max(MIN_SCREEN_RADIUS)
}

impl FogLayout {
    pub fn project(camera: &OrbitCamera, aspect: f32) -> Self {
        Self {
            sphere: screen_uv(camera, aspect, SPHERE_CENTER).to_array(),
            light: screen_uv(camera, aspect, LIGHT_CENTER).to_array(),
            sphere_radius: screen_radius(camera, aspect, SPHERE_CENTER, SPHERE_RADIUS) * SPHERE_HALO,
            light_radius: screen_radius(camera, aspect, LIGHT_CENTER, LIGHT_RADIUS) * LIGHT_HALO,
        }
    }

    pub fn to_params(self) -> [[f32; 4]; 2] {
        [
            [self.sphere[0], self.sphere[1], self.light[0], self.light[1]],
            [self.sphere_radius, self.light_radius, 0.0, 0.0],
        ]
    }

    pub fn from_params(params: &[[f32; 4]; 2]) -> Self {
        let [a, b] = params;
        Self {
            sphere: [a[0], a[1]],
            light: [a[2], a[3]],
            sphere_radius: b[0],
            light_radius: b[1],
        }
    }
}

/// Parameter along segment `a → b` of the closest point to `p` (clamped to
/// [0, 1]) and the distance to it.
pub fn segment_info(p: Vec2, a: Vec2, b: Vec2) -> (f32, f32) {
    let ab = b - a;
    let t = ((p - a).dot(ab) / (ab.dot(ab) + 1e-6)).clamp(0.0, 1.0);
    (t, p.distance(a + ab * t))
}

fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The sphere and the light as flat discs over the background.
fn scene_color(uv: Vec2, layout: &FogLayout) -> Rgb {
    let mut color = BACKGROUND;

    let sphere_disc = layout.sphere_radius / SPHERE_HALO;
    let ds = uv.distance(Vec2::from(layout.sphere)) / sphere_disc;
    if ds < 1.0 {
        let facing = (1.0 - ds * ds).sqrt();
        color = SPHERE_COLOR.scale(0.4 + 0.6 * facing);
    }

    let light_disc = layout.light_radius / LIGHT_HALO;
    let dl = uv.distance(Vec2::from(layout.light)) / light_disc;
    if dl < 1.0 {
        color = color.lerp(LIGHT_COLOR, 1.0 - smoothstep(0.8, 1.0, dl));
    }
    color
}

/// Fog density in [0, 1] at `uv` for time `t`.
pub fn fog_mask(uv: Vec2, layout: &FogLayout, t: f32) -> f32 {
    let sphere = Vec2::from(layout.sphere);
    let light = Vec2::from(layout.light);
    let (seg_t, seg_d) = segment_info(uv, sphere, light);

    let from_middle = (seg_t - 0.5).abs();
    let length_fall = smoothstep(0.0, 0.25, seg_t) * smoothstep(1.0, 0.75, seg_t);
    let center_bias = 1.0 - from_middle * 2.0;
    let thickness = mix(0.38, 0.06, from_middle);
    let tube = smoothstep(thickness, thickness * 0.45, seg_d) * length_fall;

    let sphere_halo = smoothstep(layout.sphere_radius, layout.sphere_radius * 0.2, uv.distance(sphere));
    let light_halo = smoothstep(layout.light_radius, layout.light_radius * 0.2, uv.distance(light));

    let dir = (light - sphere).try_normalize().unwrap_or(Vec2::X);
    let along = (uv - sphere).dot(dir);
    let noise_uv = (uv - (sphere + dir * seg_t)) * NOISE_SCALE + dir * (along * 2.2) + dir * (FLOW_SPEED * t);

    let n = fbm(noise_uv.x, noise_uv.y) * 0.9
        + 0.6 * fbm(noise_uv.x * 2.0, noise_uv.y * 2.0)
        + 0.33 * fbm(noise_uv.x * 4.0, noise_uv.y * 4.0);

    let density = (center_bias * 0.9 + 0.1).powf(1.6);
    let local = (n * density * DENSITY).clamp(0.0, 1.0);
    (tube.max((sphere_halo * 0.9).max(light_halo * 0.9)) * local).clamp(0.0, 1.0)
}

pub fn shade(uv: [f32; 2], uniforms: &QuadUniforms) -> [f32; 4] {
    let layout = FogLayout::from_params(&uniforms.params);
    let uv = Vec2::from(uv);
    let scene = scene_color(uv, &layout);
    let fog = fog_mask(uv, &layout, uniforms.time);

    let scattered = Rgb::new(
        scene.r + FOG_COLOR.r * 1.1 * fog * ADDITIVE,
        scene.g + FOG_COLOR.g * 1.1 * fog * ADDITIVE,
        scene.b + FOG_COLOR.b * 1.1 * fog * ADDITIVE,
    );
    let soft = scene.lerp(scattered, fog * 0.7).scale(1.0 - 0.12 * fog);
    let out = scene.lerp(soft, fog);
    [out.r, out.g, out.b, 1.0]
}

pub struct SmokeDemo {
    camera: OrbitCamera,
    layout: FogLayout,
    uniforms: UniformSet,
}

impl SmokeDemo {
    pub fn new() -> Self {
        let camera = OrbitCamera::new(CAMERA_EYE, Vec3::ZERO).with_fov_degrees(CAMERA_FOV);
        let mut demo = Self {
            camera,
            layout: FogLayout::project(&camera, 1.0),
            uniforms: UniformSet::with_standard(),
        };
        demo.update(&FrameInput::default());
        demo
    }

    pub fn layout(&self) -> &FogLayout {
        &self.layout
    }
}

impl Default for SmokeDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for SmokeDemo {
    fn id(&self) -> DemoId {
        DemoId::Smoke
    }

    fn update(&mut self, input: &FrameInput) {
        self.layout = FogLayout::project(&self.camera, input.aspect());
        for (name, value) in U_PARAMS.iter().zip(self.layout.to_params()) {
            if let Err(e) = self.uniforms.set(name, UniformValue::Vec4(value)) {
                tracing::error!(error = %e, "fog uniform rejected");
            }
        }
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn shader(&self) -> Option<QuadShader<'_>> {
        Some(QuadShader {
            program: ShaderProgram::Smoke,
            textures: &[],
        })
    }

    fn camera(&self) -> Option<&OrbitCamera> {
        Some(&self.camera)
    }

    fn clear_color(&self) -> [f32; 3] {
        BACKGROUND.to_array()
    }
}
