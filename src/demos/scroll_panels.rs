//! Stacked pairs of textured panels that ripple as the page scrolls.
//!
//! One plane per page, each `2 × 1` world units and split into a left and a
//! right panel by a thin gap. Scrolling slides the stack upward past a fixed
//! camera and drives the wave time.

use std::f32::consts::PI;
use std::path::Path;

use glam::Vec3;

use super::{smoothstep, Demo, DemoId, MeshView};
use crate::assets::{load_or_blank, TextureImage};
use crate::core::mesh::{MeshBuilder, UvRect};
use crate::core::uniforms::UniformValue;
use crate::core::{FrameInput, OrbitCamera, TextureSlot, TexturedMesh, UniformSet};

pub const LEFT_TEXTURE: &str = "me1.jpg";
pub const RIGHT_TEXTURE: &str = "me2.jpg";
pub const U_TEXTURE_LEFT: &str = "u_texture_l";
pub const U_TEXTURE_RIGHT: &str = "u_texture_r";

pub const GAP: f32 = 0.01;
const HALF_WIDTH: f32 = (1.0 - GAP) * 0.5;
const HALF_HEIGHT: f32 = 1.0 - GAP;

pub const PLANE_SIZE: [f32; 2] = [2.0, 1.0];
/// Vertical distance between consecutive planes
pub const PLANE_SPACING: f32 = 2.0;
/// Grid resolution of one panel (half a plane)
const PANEL_SEGMENTS: [u32; 2] = [64, 128];
pub const WAVE_AMPLITUDE: f32 = 0.2;

/// Shader time driven by the normalized scroll offset.
pub fn scroll_time(scroll: f32, pages: f32) -> f32 {
    scroll * pages * PI * 8.0
}

/// World y of plane `index` for a normalized scroll offset.
pub fn plane_offset(scroll: f32, pages: f32, index: usize) -> f32 {
    (scroll * pages - index as f32) * PLANE_SPACING
}

/// z displacement of the panel surface at world `(x, y)` for shader time `t`.
/// Zero while `sin(t / 2) <= 0`, which includes the resting page.
pub fn wave_z(x: f32, y: f32, t: f32) -> f32 {
    let transition = smoothstep(0.0, 1.0, (t * 0.5).sin());
    (y + (x / 2.0 + y) * 4.0 + t).cos() * WAVE_AMPLITUDE * transition
}

fn build_stack(planes: usize) -> TexturedMesh {
    let left = UvRect {
        min: [0.0, 0.0],
        max: [HALF_WIDTH, HALF_HEIGHT],
    };
    let right = UvRect {
        min: [HALF_WIDTH + GAP, 0.0],
        max: [1.0, HALF_HEIGHT],
    };

    let mut builder = MeshBuilder::new();
    for _ in 0..planes {
        builder
            .plane_region(PLANE_SIZE, [0.0; 3], left, PANEL_SEGMENTS, 0)
            .plane_region(PLANE_SIZE, [0.0; 3], right, PANEL_SEGMENTS, 1);
    }
    builder.build()
}

pub struct ScrollPanelsDemo {
    mesh: TexturedMesh,
    /// Vertices per plane; plane `k` owns `k * per_plane..(k + 1) * per_plane`
    per_plane: usize,
    planes: usize,
    /// Left then right
    textures: [TextureImage; 2],
    pages: f32,
    camera: OrbitCamera,
    uniforms: UniformSet,
}

impl ScrollPanelsDemo {
    pub fn new(left: TextureImage, right: TextureImage, pages: f32) -> Self {
        let planes = (pages.round() as usize).max(1);
        let mesh = build_stack(planes);
        let per_plane = mesh.len() / planes;

        let mut uniforms = UniformSet::with_standard();
        for (name, slot) in [(U_TEXTURE_LEFT, 0), (U_TEXTURE_RIGHT, 1)] {
            if let Err(e) = uniforms.set(name, UniformValue::Texture(TextureSlot(slot))) {
                tracing::error!(error = %e, "texture uniform rejected");
            }
        }
        tracing::debug!(planes, vertices = mesh.len(), "panel stack built");

        let mut demo = Self {
            mesh,
            per_plane,
            planes,
            textures: [left, right],
            pages,
            camera: OrbitCamera::new(Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO),
            uniforms,
        };
        demo.update(&FrameInput::default());
        demo
    }

    /// Load both panel images; a missing image leaves its panels transparent.
    pub fn load(left: &Path, right: &Path, pages: f32) -> Self {
        Self::new(load_or_blank(left), load_or_blank(right), pages)
    }

    pub fn textures(&self) -> &[TextureImage] {
        &self.textures
    }

    pub fn planes(&self) -> usize {
        self.planes
    }

    pub fn plane_of(&self, vertex: usize) -> usize {
        vertex / self.per_plane.max(1)
    }
}

impl Demo for ScrollPanelsDemo {
    fn id(&self) -> DemoId {
        DemoId::ScrollPanels
    }

    fn update(&mut self, input: &FrameInput) {
        let t = scroll_time(input.scroll, self.pages);
        let offsets: Vec<f32> = (0..self.planes)
            .map(|k| plane_offset(input.scroll, self.pages, k))
            .collect();
        let per_plane = self.per_plane.max(1);

        self.mesh.update_positions(|i, orig, live| {
            let y = orig[1] + offsets[(i / per_plane).min(offsets.len() - 1)];
            *live = [orig[0], y, orig[2] + wave_z(orig[0], y, t)];
        });

        let driven = FrameInput { time: t, ..*input };
        self.uniforms.apply_frame(&driven);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn mesh(&self) -> Option<MeshView<'_>> {
        Some(MeshView {
            mesh: &self.mesh,
            textures: &self.textures,
        })
    }

    fn camera(&self) -> Option<&OrbitCamera> {
        Some(&self.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::uniforms::U_TIME;

    fn solid(rgba: [u8; 4]) -> TextureImage {
        TextureImage {
            width: 2,
            height: 2,
            rgba: rgba.repeat(4),
        }
    }

    fn demo() -> ScrollPanelsDemo {
        ScrollPanelsDemo::new(solid([255, 0, 0, 255]), solid([0, 0, 255, 255]), 7.0)
    }

    #[test]
    fn test_seven_planes_with_two_panels_each() {
        let demo = demo();
        assert_eq!(demo.planes(), 7);
        let mesh = demo.mesh().unwrap().mesh;
        let per_panel = (PANEL_SEGMENTS[0] as usize + 1) * (PANEL_SEGMENTS[1] as usize + 1);
        assert_eq!(mesh.len(), 7 * 2 * per_panel);
        assert_eq!(demo.plane_of(mesh.len() - 1), 6);

        let left_edge = -1.0 + 2.0 * HALF_WIDTH;
        let right_edge = -1.0 + 2.0 * (HALF_WIDTH + GAP);
        for (p, &layer) in mesh.snapshot_positions().iter().zip(mesh.layers()) {
            match layer {
                0 => assert!(p[0] <= left_edge + 1e-5),
                1 => assert!(p[0] >= right_edge - 1e-5),
                other => panic!("unexpected layer {other}"),
            }
            // Bottom-aligned, with the strip above the panels left empty
            assert!(p[1] >= -0.5 - 1e-6 && p[1] <= -0.5 + HALF_HEIGHT + 1e-6);
        }
    }

    #[test]
    fn test_rest_pose_stacks_planes_downward() {
        let demo = demo();
        let mesh = demo.mesh().unwrap().mesh;
        for (i, (live, orig)) in mesh.positions().iter().zip(mesh.snapshot_positions()).enumerate() {
            let plane = demo.plane_of(i) as f32;
            assert_eq!(live[0], orig[0]);
            assert!((live[1] - (orig[1] - plane * PLANE_SPACING)).abs() < 1e-5);
            assert_eq!(live[2], orig[2]);
        }
    }

    #[test]
    fn test_scroll_brings_next_plane_into_view() {
        let mut demo = demo();
        demo.update(&FrameInput::at(3.0).with_scroll(1.0 / 7.0));
        assert!(plane_offset(1.0 / 7.0, 7.0, 1).abs() < 1e-5);

        let mesh = demo.mesh().unwrap().mesh;
        let first_of_second = demo.per_plane;
        let orig = mesh.snapshot_positions()[first_of_second];
        let live = mesh.positions()[first_of_second];
        assert!((live[1] - orig[1]).abs() < 1e-4);
        let t = scroll_time(1.0 / 7.0, 7.0);
        assert!((live[2] - wave_z(live[0], live[1], t)).abs() < 1e-6);
    }

    #[test]
    fn test_scroll_drives_time() {
        let mut demo = demo();
        demo.update(&FrameInput::at(12.0).with_scroll(0.5));
        let time = demo.uniforms().float(U_TIME).unwrap();
        assert!((time - 0.5 * 7.0 * PI * 8.0).abs() < 1e-3);

        demo.update(&FrameInput::at(99.0));
        assert_eq!(demo.uniforms().float(U_TIME), Some(0.0));
    }

    #[test]
    fn test_texture_slots_bound() {
        let demo = demo();
        assert_eq!(demo.uniforms().texture(U_TEXTURE_LEFT), Some(TextureSlot(0)));
        assert_eq!(demo.uniforms().texture(U_TEXTURE_RIGHT), Some(TextureSlot(1)));
    }

    #[test]
    fn test_wave_gated_at_rest() {
        assert_eq!(wave_z(0.3, 0.4, 0.0), 0.0);
        // Negative half of the gate stays flat
        assert_eq!(wave_z(0.3, 0.4, 1.5 * PI * 2.0), 0.0);
        let moving = (0..50).any(|k| wave_z(0.3, 0.4, k as f32 * 0.3).abs() > 0.01);
        assert!(moving);
        for k in 0..50 {
            assert!(wave_z(0.7, -1.2, k as f32 * 0.3).abs() <= WAVE_AMPLITUDE);
        }
    }

    #[test]
    fn test_same_scroll_same_surface() {
        let mut demo = demo();
        demo.update(&FrameInput::at(0.0).with_scroll(0.37));
        let first = demo.mesh().unwrap().mesh.positions().to_vec();
        demo.update(&FrameInput::at(5.0).with_scroll(0.8));
        demo.update(&FrameInput::at(9.0).with_scroll(0.37));
        assert_eq!(demo.mesh().unwrap().mesh.positions(), &first[..]);
    }

    #[test]
    fn test_missing_textures_render_transparent() {
        let dir = std::env::temp_dir().join("shader-gallery-missing-panels");
        let demo = ScrollPanelsDemo::load(&dir.join("left.jpg"), &dir.join("right.jpg"), 7.0);
        assert!(demo.textures().iter().all(TextureImage::is_blank));
        let view = demo.mesh().unwrap();
        assert_eq!(view.textures.len(), 2);
        assert_eq!(view.textures[0].sample([0.5, 0.5]), [0.0; 4]);
    }
}
