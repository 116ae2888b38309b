//! Error types for configuration, assets, and uniform bookkeeping.
//!
//! The per-frame animation path never returns errors; everything here happens
//! at mount or load time.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("unknown demo: {0}")]
    UnknownDemo(String),
    #[error("asset not found: {}", .0.display())]
    AssetNotFound(PathBuf),
    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("uniform {name} is {expected}, cannot assign {found}")]
    UniformType {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
    #[error("point buffer has {positions} positions but {colors} colors")]
    BufferShape { positions: usize, colors: usize },
    #[error("malformed mesh: {0}")]
    MeshShape(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
