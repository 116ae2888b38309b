//! One image repeated in four tiles separated by a gap.

use std::path::Path;

use super::{Demo, DemoId, QuadShader, ShaderProgram};
use crate::assets::{load_or_blank, TextureImage};
use crate::core::uniforms::UniformValue;
use crate::core::{FrameInput, QuadUniforms, TextureSlot, UniformSet};

pub const TEXTURE: &str = "AXC.jpg";
pub const U_TEXTURE: &str = "u_texture";

pub const GAP: f32 = 0.05;
const TILE: f32 = (1.0 - GAP) * 0.5;

/// Position inside the tile containing `v` (one axis), remapped to [0, 1].
/// `None` in the gap and on the outer edges.
fn tile_coord(v: f32) -> Option<f32> {
    if v < TILE {
        Some(v / TILE)
    } else if v > TILE + GAP {
        Some((v - (TILE + GAP)) / TILE)
    } else {
        None
    }
}

/// Texture coordinate sampled at `uv`, or `None` outside every tile.
pub fn tile_uv(uv: [f32; 2]) -> Option<[f32; 2]> {
    Some([tile_coord(uv[0])?, tile_coord(uv[1])?])
}

pub fn shade(uv: [f32; 2], _uniforms: &QuadUniforms, textures: &[TextureImage]) -> [f32; 4] {
    match (tile_uv(uv), textures.first()) {
        (Some(st), Some(texture)) => texture.sample(st),
        _ => [0.0; 4],
    }
}

pub struct TilesDemo {
    textures: [TextureImage; 1],
    uniforms: UniformSet,
}

impl TilesDemo {
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

impl Demo for TilesDemo {
    fn id(&self) -> DemoId {
        DemoId::Tiles
    }

    fn update(&mut self, input: &FrameInput) {
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn shader(&self) -> Option<QuadShader<'_>> {
        Some(QuadShader {
            program: ShaderProgram::Tiles,
            textures: &self.textures,
        })
    }
}
