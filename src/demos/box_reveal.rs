//! An image revealed through a 10 × 10 grid of boxes that grow column by
//! column from the right, on a horizontally swaying canvas.

use std::path::Path;

use super::{smoothstep, Demo, DemoId, QuadShader, ShaderProgram};
use crate::assets::{load_or_blank, TextureImage};
use crate::core::uniforms::UniformValue;
use crate::core::{FrameInput, QuadUniforms, TextureSlot, UniformSet};

pub const TEXTURE: &str = "AXC.jpg";
pub const U_TEXTURE: &str = "u_texture";

pub const GRID: usize = 10;
const CELL: f32 = 1.0 / GRID as f32;
/// Start delay between neighbouring columns, seconds
pub const COLUMN_DELAY: f32 = 0.1;
/// Vertical gap between boxes before they close up
const START_GAP: f32 = 0.5;
/// After this the columns stop breathing and stay full width
const SETTLE_TIME: f32 = 8.0;
const SWAY_AMPLITUDE: f32 = 0.2;

/// Animation clock of column `i`. The rightmost column starts first.
pub fn column_offset(t: f32, i: usize) -> f32 {
    t - (GRID - 1 - i) as f32 * COLUMN_DELAY
}

/// Rectangle `(x, y, width, height)` covered by box `(i, j)` at time `t`.
pub fn box_rect(t: f32, i: usize, j: usize) -> [f32; 4] {
    let offset = column_offset(t, i);
    let width = if offset < SETTLE_TIME {
        CELL * smoothstep(0.0, 1.0, offset.sin())
    } else {
        CELL
    };
    let grow = smoothstep(0.0, 1.0, offset);
    let height = CELL * grow;
    let gap = START_GAP * (1.0 - grow);
    [CELL * i as f32, gap * (j + 1) as f32 + height * j as f32, width, height]
}

/// Texture coordinate under `uv` once the canvas sways, `None` off the image.
pub fn sway(uv: [f32; 2], t: f32) -> Option<[f32; 2]> {
    let x = uv[0] - ((uv[1] - 0.5) * 4.0 + t * 2.0).sin() * SWAY_AMPLITUDE;
    (0.0..=1.0).contains(&x).then_some([x, uv[1]])
}

pub fn covered(uv: [f32; 2], t: f32) -> bool {
    (0..GRID).any(|i| {
        (0..GRID).any(|j| {
            let [x, y, w, h] = box_rect(t, i, j);
            uv[0] > x && uv[0] < x + w && uv[1] > y && uv[1] < y + h
        })
    })
}

pub fn shade(uv: [f32; 2], uniforms: &QuadUniforms, textures: &[TextureImage]) -> [f32; 4] {
    let t = uniforms.time;
    match (sway(uv, t), textures.first()) {
        (Some(st), Some(texture)) if covered(st, t) => texture.sample(st),
        _ => [0.0; 4],
    }
}

pub struct BoxRevealDemo {
    textures: [TextureImage; 1],
    uniforms: UniformSet,
}

impl BoxRevealDemo {
    pub fn new(texture: TextureImage) -> Self {
        let mut uniforms = UniformSet::with_standard();
        if let Err(e) = uniforms.set(U_TEXTURE, UniformValue::Texture(TextureSlot(0))) {
            tracing::error!(error = %e, "texture uniform rejected");
        }
        Self {
            textures: [texture],
            uniforms,
        }
    }

    pub fn load(path: &Path) -> Self {
        Self::new(load_or_blank(path))
    }
}

impl Demo for BoxRevealDemo {
    fn id(&self) -> DemoId {
        DemoId::BoxReveal
    }

    fn update(&mut self, input: &FrameInput) {
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn shader(&self) -> Option<QuadShader<'_>> {
        Some(QuadShader {
            program: ShaderProgram::BoxReveal,
            textures: &self.textures,
        })
    }
}
