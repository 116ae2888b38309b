//! Platform-agnostic core - shared between the GUI, wasm and CLI builds

pub mod buffer;
pub mod camera;
pub mod color;
pub mod geometry;
pub mod input;
pub mod mesh;
pub mod noise;
pub mod sdf;
pub mod uniforms;

pub use buffer::{DirtyFlags, PointBuffer};
pub use camera::OrbitCamera;
pub use color::{Hsl, Rgb};
pub use input::{Clock, FrameInput};
pub use mesh::{MeshVertex, TexturedMesh};
pub use noise::Simplex2;
pub use uniforms::{QuadUniforms, TextureSlot, UniformSet, UniformValue};
