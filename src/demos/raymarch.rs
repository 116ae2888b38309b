use super::{Demo, DemoId, QuadShader, ShaderProgram};
use crate::core::sdf::shade_sphere_uv;
use crate::core::{FrameInput, QuadUniforms, UniformSet};

pub fn shade(uv: [f32; 2], uniforms: &QuadUniforms) -> [f32; 4] {
    let [r, g, b] = shade_sphere_uv(uv, uniforms.resolution);
    [r, g, b, 1.0]
}

/// Sphere raymarched per pixel and lit by its normal's y component.
pub struct RaymarchDemo {
    uniforms: UniformSet,
}

impl RaymarchDemo {
    pub fn new() -> Self {
        Self {
            uniforms: UniformSet::with_standard(),
        }
    }
}

impl Default for RaymarchDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Demo for RaymarchDemo {
    fn id(&self) -> DemoId {
        DemoId::Raymarch
    }

    fn update(&mut self, input: &FrameInput) {
        self.uniforms.apply_frame(input);
    }

    fn uniforms(&self) -> &UniformSet {
        &self.uniforms
    }

    fn shader(&self) -> Option<QuadShader<'_>> {
        Some(QuadShader {
            program: ShaderProgram::Raymarch,
            textures: &[],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniforms(width: f32, height: f32) -> QuadUniforms {
        QuadUniforms {
            resolution: [width, height],
            ..QuadUniforms::default()
        }
    }

    #[test]
    fn test_center_hits_and_corner_misses() {
        let u = uniforms(400.0, 400.0);
        let center = shade([0.5, 0.5], &u);
        assert_eq!(center[3], 1.0);
        // Facing the camera, normal.y is close to zero at the center
        assert!(center[0].abs() < 0.1);
        assert_eq!(shade([0.0, 0.0], &u), [0.0, 0.0, 0.0, 1.0]);

        let top = shade([0.5, 0.58], &u);
        assert!(top[0] > 0.2, "upper half is lit");
    }

    #[test]
    fn test_aspect_stretches_horizontally() {
        // Same uv off to the side: a wide canvas pushes it past the sphere
        let square = shade([0.58, 0.56], &uniforms(400.0, 400.0));
        let wide = shade([0.58, 0.56], &uniforms(1600.0, 400.0));
        assert!(square[0] > 0.1);
        assert_eq!(wide, [0.0, 0.0, 0.0, 1.0]);
    }
}
