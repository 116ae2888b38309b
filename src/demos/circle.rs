use super::{smoothstep, Demo, DemoId, QuadShader, ShaderProgram};
use crate::core::{FrameInput, QuadUniforms, UniformSet};

pub const RADIUS: f32 = 0.9;
/// Half-width of the anti-aliased edge, relative to the radius
const EDGE: f32 = 0.01;

/// Opaque white disc centered on the quad over black.
pub fn shade(uv: [f32; 2], _uniforms: &QuadUniforms) -> [f32; 4] {
    let dx = uv[0] - 0.5;
    let dy = uv[1] - 0.5;
    let d = (dx * dx + dy * dy) * 4.0;
    let v = 1.0 - smoothstep(RADIUS * (1.0 - EDGE), RADIUS * (1.0 + EDGE), d);
    [v, v, v, 1.0]
}

pub struct CircleDemo {
    uniforms: UniformSet,
}

impl CircleDemo {
    pub fn new() -> Self {
        Self {
            uniforms: UniformSet::with_standard(),
        }
    }
}

impl Default for CircleDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for CircleDemo {
    fn id(&self) -> DemoId {
        DemoId::Circle
    }

    fn update(&mut self, input: &FrameInput) {
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn shader(&self) -> Option<QuadShader<'_>> {
        Some(QuadShader {
            program: ShaderProgram::Circle,
            textures: &[],
        })
    }
}
