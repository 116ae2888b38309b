//! Native gallery window
//!
//! Run with: cargo run --features native -- --demo pulse-cube [--use-cpu] [--config gallery.json]

use clap::Parser;
use shader_gallery::app::GalleryApp;
use shader_gallery::config::CliArgs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shader_gallery=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = CliArgs::parse();
    let config = args.load_config()?;
    info!(demo = %config.demo, use_cpu = args.use_cpu, "starting gallery");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shader Gallery")
            .with_inner_size([1280.0, 800.0]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    let use_cpu = args.use_cpu;
    eframe::run_native(
        "Shader Gallery",
        options,
        Box::new(move |cc| Ok(Box::new(GalleryApp::new(cc, use_cpu, config)))),
    )?;
    Ok(())
}
