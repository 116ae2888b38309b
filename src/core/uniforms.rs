//! Named shader uniforms owned by a single demo
//!
//! A `UniformSet` is the CPU-side view of the values a shader program reads
//! every frame. Names keep the GLSL-style `u_` prefix used by the shader
//! sources. Once a name is bound to a value kind it keeps that kind.

use std::collections::BTreeMap;

use bytemuck::{Pod, Zeroable};

use super::input::FrameInput;
use crate::error::{GalleryError, Result};

pub const U_TIME: &str = "u_time";
pub const U_RESOLUTION: &str = "u_resolution";
pub const U_POINTER: &str = "u_pointer";
pub const U_SCROLL: &str = "u_scroll";
/// Program-specific vec4 slots, packed after the standard uniforms
pub const U_PARAMS: [&str; 2] = ["u_params0", "u_params1"];

/// Texture binding slot in the quad renderer's bind group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureSlot(pub u8);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Texture(TextureSlot),
}

impl UniformValue {
    pub fn kind(&self) -> &'static str {
        match self {
            UniformValue::Float(_) => "float",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Texture(_) => "texture",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UniformSet {
    values: BTreeMap<String, UniformValue>,
}

impl UniformSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pre-populated with time, resolution, pointer and scroll.
    pub fn with_standard() -> Self {
        let mut values = BTreeMap::new();
        values.insert(U_TIME.to_string(), UniformValue::Float(0.0));
        values.insert(U_RESOLUTION.to_string(), UniformValue::Vec2([0.0, 0.0]));
        values.insert(U_POINTER.to_string(), UniformValue::Vec2([0.0, 0.0]));
        values.insert(U_SCROLL.to_string(), UniformValue::Float(0.0));
        Self { values }
    }

    /// Insert or overwrite. Overwriting with a different kind is an error.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<()> {
        match self.values.get_mut(name) {
            Some(existing) if std::mem::discriminant(existing) != std::mem::discriminant(&value) => {
                Err(GalleryError::UniformType {
                    name: name.to_string(),
                    expected: existing.kind(),
                    found: value.kind(),
                })
            }
            Some(existing) => {
                *existing = value;
                Ok(())
            }
            None => {
                self.values.insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.values.get(name)? {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<[f32; 2]> {
        match self.values.get(name)? {
            UniformValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<[f32; 4]> {
        match self.values.get(name)? {
            UniformValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn texture(&self, name: &str) -> Option<TextureSlot> {
        match self.values.get(name)? {
            UniformValue::Texture(slot) => Some(*slot),
            _ => None,
        }
    }

    /// Write the standard uniforms from this tick's input.
    ///
    /// Writes go straight to the map: the standard names are always bound to
    /// their fixed kinds by [`Self::with_standard`].
    pub fn apply_frame(&mut self, input: &FrameInput) {
        self.values
            .insert(U_TIME.to_string(), UniformValue::Float(input.time));
        self.values
            .insert(U_RESOLUTION.to_string(), UniformValue::Vec2(input.resolution));
        self.values
            .insert(U_POINTER.to_string(), UniformValue::Vec2(input.pointer));
        self.values
            .insert(U_SCROLL.to_string(), UniformValue::Float(input.scroll));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pack the standard uniforms and the `u_params` slots for the quad
    /// shaders. Missing values are zero.
    pub fn to_gpu(&self) -> QuadUniforms {
        QuadUniforms {
            time: self.float(U_TIME).unwrap_or(0.0),
            scroll: self.float(U_SCROLL).unwrap_or(0.0),
            resolution: self.vec2(U_RESOLUTION).unwrap_or([0.0, 0.0]),
            pointer: self.vec2(U_POINTER).unwrap_or([0.0, 0.0]),
            _pad: [0.0, 0.0],
            params: U_PARAMS.map(|name| self.vec4(name).unwrap_or([0.0; 4])),
        }
    }
}

/// Uniform block shared by every quad shader (must match the WGSL struct).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct QuadUniforms {
    pub time: f32,
    pub scroll: f32,
    pub resolution: [f32; 2],
    pub pointer: [f32; 2],
    pub _pad: [f32; 2],
    pub params: [[f32; 4]; 2],
}
