//! Gallery configuration
//!
//! Resolution order: defaults, then the JSON file named by `--config` or
//! `SHADER_GALLERY_CONFIG`, then `SHADER_GALLERY_DEMO`, then `--demo`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::demos::DemoId;
use crate::error::{GalleryError, Result};

pub const CONFIG_ENV: &str = "SHADER_GALLERY_CONFIG";
pub const DEMO_ENV: &str = "SHADER_GALLERY_DEMO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Demo mounted at startup
    pub demo: DemoId,
    /// Directory that texture paths are resolved against
    pub asset_dir: PathBuf,
    /// Multiplier applied to every demo's point size
    pub point_size_scale: f32,
    /// Playback speed for the frame clock
    pub speed: f64,
    /// Seed for noise tables and random clouds
    pub seed: u64,
    /// Orbit the camera on demos that support it
    pub auto_rotate: bool,
    /// Page count of the scroll-driven demo
    pub scroll_pages: f32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            demo: DemoId::Circle,
            asset_dir: PathBuf::from("assets"),
            point_size_scale: 1.0,
            speed: 1.0,
            seed: 42,
            auto_rotate: true,
            scroll_pages: 7.0,
        }
    }
}

impl GalleryConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GalleryError::AssetNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        info!(path = %path.display(), demo = %config.demo, "config loaded");
        Ok(config)
    }

    /// Defaults, overlaid with the file at `path` or `SHADER_GALLERY_CONFIG`
    /// and the `SHADER_GALLERY_DEMO` override.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.or(env_path.as_deref()) {
            Some(p) => Self::load_from(p)?,
            None => {
                debug!("no config file, using defaults");
                Self::default()
            }
        };
        if let Ok(name) = std::env::var(DEMO_ENV) {
            config.demo = name.parse()?;
            debug!(demo = %config.demo, "demo overridden from environment");
        }
        Ok(config)
    }

    pub fn asset_path(&self, name: &str) -> PathBuf {
        self.asset_dir.join(name)
    }

    fn validate(self) -> Result<Self> {
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(GalleryError::InvalidConfig(format!(
                "speed must be a non-negative number, got {}",
                self.speed
            )));
        }
        if !(self.point_size_scale.is_finite() && self.point_size_scale > 0.0) {
            return Err(GalleryError::InvalidConfig(format!(
                "point_size_scale must be positive, got {}",
                self.point_size_scale
            )));
        }
        if !(self.scroll_pages.is_finite() && self.scroll_pages > 0.0) {
            return Err(GalleryError::InvalidConfig(format!(
                "scroll_pages must be positive, got {}",
                self.scroll_pages
            )));
        }
        Ok(self)
    }
}

/// Command-line flags shared by the native and headless binaries.
#[cfg(any(feature = "native", feature = "cli"))]
#[derive(Debug, Clone, PartialEq, clap::Parser)]
#[command(author, version, about = "Animated point clouds and fragment shaders", long_about = None)]
pub struct CliArgs {
    /// Demo to mount at startup (overrides config file and environment)
    #[arg(long, value_name = "NAME", value_parser = parse_demo)]
    pub demo: Option<DemoId>,

    /// JSON config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Draw with the CPU painter instead of wgpu
    #[arg(long)]
    pub use_cpu: bool,

    /// Frames to run headless, 0 = until interrupted
    #[arg(long, default_value_t = 0)]
    pub frames: u64,

    /// Headless frame rate
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,
}

#[cfg(any(feature = "native", feature = "cli"))]
fn parse_demo(name: &str) -> Result<DemoId> {
    name.parse()
}

#[cfg(any(feature = "native", feature = "cli"))]
impl CliArgs {
    /// Resolve the config, then let `--demo` win over file and environment.
    pub fn load_config(&self) -> Result<GalleryConfig> {
        let mut config = GalleryConfig::resolve(self.config.as_deref())?;
        if let Some(demo) = self.demo {
            config.demo = demo;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_gallery_constants() {
        let config = GalleryConfig::default();
        assert_eq!(config.demo, DemoId::Circle);
        assert_eq!(config.scroll_pages, 7.0);
        assert_eq!(config.speed, 1.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GalleryConfig::from_json(r#"{"demo": "pulse-cube", "seed": 7}"#).unwrap();
        assert_eq!(config.demo, DemoId::PulseCube);
        assert_eq!(config.seed, 7);
        assert_eq!(config.asset_dir, PathBuf::from("assets"));
        assert!(config.auto_rotate);
    }

    #[test]
    fn test_bad_json_and_bad_values() {
        assert!(matches!(
            GalleryConfig::from_json(r#"{"demo": "teapot"}"#),
            Err(GalleryError::ConfigParse(_))
        ));
        assert!(matches!(
            GalleryConfig::from_json(r#"{"speed": -1.0}"#),
            Err(GalleryError::InvalidConfig(_))
        ));
        assert!(matches!(
            GalleryConfig::from_json(r#"{"scroll_pages": 0}"#),
            Err(GalleryError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = GalleryConfig::load_from(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, GalleryError::AssetNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("shader-gallery-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"demo": "helix", "speed": 0.5}"#).unwrap();
        let config = GalleryConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.demo, DemoId::Helix);
        assert_eq!(config.speed, 0.5);
    }

    #[cfg(any(feature = "native", feature = "cli"))]
    mod flags {
        use clap::Parser;

        use super::*;

        #[test]
        fn test_parse_flags() {
            let args = CliArgs::try_parse_from([
                "shader-gallery",
                "--demo",
                "wave-grid",
                "--use-cpu",
                "--frames=120",
                "--fps",
                "30",
            ])
            .unwrap();
            assert_eq!(args.demo, Some(DemoId::WaveGrid));
            assert!(args.use_cpu);
            assert_eq!(args.frames, 120);
            assert_eq!(args.fps, 30);
            assert!(args.config.is_none());
        }

        #[test]
        fn test_defaults() {
            let args = CliArgs::try_parse_from(["gallery-cli"]).unwrap();
            assert_eq!(args.demo, None);
            assert!(!args.use_cpu);
            assert_eq!(args.frames, 0);
            assert_eq!(args.fps, 60);
        }

        #[test]
        fn test_parse_errors() {
            use clap::error::ErrorKind;

            let kind = |argv: &[&str]| CliArgs::try_parse_from(argv).unwrap_err().kind();
            assert_eq!(kind(&["gallery", "--demo"]), ErrorKind::InvalidValue);
            assert_eq!(kind(&["gallery", "--demo", "nope"]), ErrorKind::ValueValidation);
            assert_eq!(kind(&["gallery", "--fps", "0"]), ErrorKind::ValueValidation);
            assert_eq!(kind(&["gallery", "--verbose"]), ErrorKind::UnknownArgument);
        }

        #[test]
        fn test_unknown_demo_names_the_input() {
            let err = CliArgs::try_parse_from(["gallery", "--demo", "teapot"]).unwrap_err();
            assert!(err.to_string().contains("teapot"));
        }

        #[test]
        fn test_demo_flag_wins() {
            let args = CliArgs::try_parse_from(["gallery", "--demo", "raymarch"]).unwrap();
            let config = args.load_config().unwrap();
            assert_eq!(config.demo, DemoId::Raymarch);
        }
    }
}
