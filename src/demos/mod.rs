//! Gallery demos
//!
//! Every demo owns its buffers, camera and uniforms; dropping the demo
//! releases all of it. `update` is called once per tick and never fails.

pub mod box_reveal;
pub mod circle;
pub mod gradient_cloud;
pub mod helix;
pub mod pulse_cube;
pub mod raymarch;
pub mod ripple;
pub mod scroll_panels;
pub mod smoke;
pub mod tiles;
pub mod wave_grid;
pub mod wing_flap;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::assets::TextureImage;
use crate::config::GalleryConfig;
use crate::core::{FrameInput, OrbitCamera, PointBuffer, QuadUniforms, TexturedMesh, UniformSet};
use crate::error::GalleryError;

pub use box_reveal::BoxRevealDemo;
pub use circle::CircleDemo;
pub use gradient_cloud::GradientCloudDemo;
pub use helix::HelixDemo;
pub use pulse_cube::PulseCubeDemo;
pub use raymarch::RaymarchDemo;
pub use ripple::RippleDemo;
pub use scroll_panels::ScrollPanelsDemo;
pub use smoke::SmokeDemo;
pub use tiles::TilesDemo;
pub use wave_grid::WaveGridDemo;
pub use wing_flap::WingFlapDemo;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DemoId {
    WaveGrid,
    Ripple,
    PulseCube,
    WingFlap,
    GradientCloud,
    Helix,
    Circle,
    Raymarch,
    ScrollPanels,
    Smoke,
    #[serde(rename = "image-tiles")]
    Tiles,
    BoxReveal,
}

/// What a demo hands to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DemoKind {
    Points,
    Mesh,
    Shader,
}

impl DemoId {
    pub const ALL: &'static [DemoId] = &[
        DemoId::WaveGrid,
        DemoId::Ripple,
        DemoId::PulseCube,
        DemoId::WingFlap,
        DemoId::GradientCloud,
        DemoId::Helix,
        DemoId::Circle,
        DemoId::Raymarch,
        DemoId::ScrollPanels,
        DemoId::Smoke,
        DemoId::Tiles,
        DemoId::BoxReveal,
    ];

    /// Kebab-case name used on the command line and in config files.
    pub fn name(self) -> &'static str {
        match self {
            DemoId::WaveGrid => "wave-grid",
            DemoId::Ripple => "ripple",
            DemoId::PulseCube => "pulse-cube",
            DemoId::WingFlap => "wing-flap",
            DemoId::GradientCloud => "gradient-cloud",
            DemoId::Helix => "helix",
            DemoId::Circle => "circle",
            DemoId::Raymarch => "raymarch",
            DemoId::ScrollPanels => "scroll-panels",
            DemoId::Smoke => "smoke",
            DemoId::Tiles => "image-tiles",
            DemoId::BoxReveal => "box-reveal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DemoId::WaveGrid => "Wave grid",
            DemoId::Ripple => "Pointer ripples",
            DemoId::PulseCube => "Pulse cube",
            DemoId::WingFlap => "Wing flap",
            DemoId::GradientCloud => "Gradient cloud",
            DemoId::Helix => "Helix rails",
            DemoId::Circle => "Circle",
            DemoId::Raymarch => "Raymarched sphere",
            DemoId::ScrollPanels => "Scroll panels",
            DemoId::Smoke => "Fog tube",
            DemoId::Tiles => "Image tiles",
            DemoId::BoxReveal => "Box reveal",
        }
    }

    pub fn kind(self) -> DemoKind {
        match self {
            DemoId::WaveGrid
            | DemoId::Ripple
            | DemoId::PulseCube
            | DemoId::WingFlap
            | DemoId::GradientCloud
            | DemoId::Helix => DemoKind::Points,
            DemoId::ScrollPanels => DemoKind::Mesh,
            DemoId::Circle | DemoId::Raymarch | DemoId::Smoke | DemoId::Tiles | DemoId::BoxReveal => {
                DemoKind::Shader
            }
        }
    }
}

impl fmt::Display for DemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DemoId {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        DemoId::ALL
            .iter()
            .copied()
            .find(|id| id.name() == wanted)
            .ok_or_else(|| GalleryError::UnknownDemo(s.to_string()))
    }
}

/// Full-screen fragment programs available to the quad renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    Circle,
    Raymarch,
    Smoke,
    Tiles,
    BoxReveal,
}

impl ShaderProgram {
    pub const ALL: &'static [ShaderProgram] = &[
        ShaderProgram::Circle,
        ShaderProgram::Raymarch,
        ShaderProgram::Smoke,
        ShaderProgram::Tiles,
        ShaderProgram::BoxReveal,
    ];
}

/// What a shader demo hands to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct QuadShader<'a> {
    pub program: ShaderProgram,
    /// Bound to texture slots 0 and 1, in order
    pub textures: &'a [TextureImage],
}

impl QuadShader<'_> {
    /// CPU evaluation of the fragment program at `uv` (y up), RGBA.
    pub fn shade(&self, uv: [f32; 2], uniforms: &QuadUniforms) -> [f32; 4] {
        match self.program {
            ShaderProgram::Circle => circle::shade(uv, uniforms),
            ShaderProgram::Raymarch => raymarch::shade(uv, uniforms),
            ShaderProgram::Smoke => smoke::shade(uv, uniforms),
            ShaderProgram::Tiles => tiles::shade(uv, uniforms, self.textures),
            ShaderProgram::BoxReveal => box_reveal::shade(uv, uniforms, self.textures),
        }
    }
}

/// A textured mesh and the images its vertex layers index.
#[derive(Clone, Copy, Debug)]
pub struct MeshView<'a> {
    pub mesh: &'a TexturedMesh,
    /// Layer `k` samples `textures[k]`
    pub textures: &'a [TextureImage],
}

/// GLSL `smoothstep`: Hermite ramp from 0 at `edge0` to 1 at `edge1`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub trait Demo {
    fn id(&self) -> DemoId;

    fn title(&self) -> &'static str {
        self.id().label()
    }

    /// Advance to `input.time`. Output depends only on the input and the
    /// snapshot taken at construction.
    fn update(&mut self, input: &FrameInput);

    fn uniforms(&self) -> &UniformSet;

    fn points(&self) -> Option<&PointBuffer> {
        None
    }

    fn mesh(&self) -> Option<MeshView<'_>> {
        None
    }

    fn shader(&self) -> Option<QuadShader<'_>> {
        None
    }

    fn camera(&self) -> Option<&OrbitCamera> {
        None
    }

    /// World-space point diameter
    fn point_size(&self) -> f32 {
        0.05
    }

    fn clear_color(&self) -> [f32; 3] {
        [0.0, 0.0, 0.0]
    }
}

pub fn build(id: DemoId, config: &GalleryConfig) -> Box<dyn Demo> {
    match id {
        DemoId::WaveGrid => Box::new(WaveGridDemo::new()),
        DemoId::Ripple => Box::new(RippleDemo::new()),
        DemoId::PulseCube => Box::new(PulseCubeDemo::new(config.seed, config.auto_rotate)),
        DemoId::WingFlap => Box::new(WingFlapDemo::new()),
        DemoId::GradientCloud => Box::new(GradientCloudDemo::new(config.seed, config.auto_rotate)),
        DemoId::Helix => Box::new(HelixDemo::new()),
        DemoId::Circle => Box::new(CircleDemo::new()),
        DemoId::Raymarch => Box::new(RaymarchDemo::new()),
        DemoId::ScrollPanels => Box::new(ScrollPanelsDemo::load(
            &config.asset_path(scroll_panels::LEFT_TEXTURE),
            &config.asset_path(scroll_panels::RIGHT_TEXTURE),
            config.scroll_pages,
        )),
        DemoId::Smoke => Box::new(SmokeDemo::new()),
        DemoId::Tiles => Box::new(TilesDemo::load(&config.asset_path(tiles::TEXTURE))),
        DemoId::BoxReveal => Box::new(BoxRevealDemo::load(&config.asset_path(box_reveal::TEXTURE))),
    }
}
