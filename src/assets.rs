//! Texture loading
//!
//! Decoded images are kept as tightly packed RGBA8 so the same data can be
//! uploaded to wgpu or sampled by the CPU painter. Missing or undecodable
//! files degrade to a 1x1 transparent texture.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{GalleryError, Result};

#[derive(Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, top row first
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for TextureImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl TextureImage {
    pub fn transparent() -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: vec![0, 0, 0, 0],
        }
    }

    pub fn is_blank(&self) -> bool {
        self.rgba.iter().all(|&b| b == 0)
    }

    /// Nearest-neighbour lookup with clamped `uv` (v = 0 is the bottom row).
    /// Empty or truncated images read as transparent.
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        if self.width == 0 || self.height == 0 {
            return [0.0; 4];
        }
        let u = uv[0].clamp(0.0, 1.0);
        let v = uv[1].clamp(0.0, 1.0);
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = (((1.0 - v) * self.height as f32) as u32).min(self.height - 1);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let Some(px) = self.rgba.get(i..i + 4) else {
            return [0.0; 4];
        };
        [
            px[0] as f32 / 255.0,
            px[1] as f32 / 255.0,
            px[2] as f32 / 255.0,
            px[3] as f32 / 255.0,
        ]
    }
}

pub fn load_texture(path: &Path) -> Result<TextureImage> {
    if !path.exists() {
        return Err(GalleryError::AssetNotFound(path.to_path_buf()));
    }
    let decoded = image::open(path).map_err(|source| GalleryError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!(path = %path.display(), width, height, "texture loaded");
    Ok(TextureImage {
        width,
        height,
        rgba: rgba.into_raw(),
    })
}

/// [`load_texture`], logging failures and falling back to a transparent texel.
pub fn load_or_blank(path: &Path) -> TextureImage {
    match load_texture(path) {
        Ok(texture) if texture.width > 0 && texture.height > 0 => texture,
        Ok(_) => {
            warn!(path = %path.display(), "empty texture, rendering blank");
            TextureImage::transparent()
        }
        Err(e) => {
            warn!(error = %e, "texture unavailable, rendering blank");
            TextureImage::transparent()
        }
    }
}
