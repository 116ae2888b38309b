//! Headless gallery runner: drives a demo on a timer and logs per-second stats
//!
//! Run with: cargo run --bin gallery-cli --features cli -- --demo helix --frames 600

use std::time::Duration;

use clap::Parser;
use shader_gallery::config::CliArgs;
use shader_gallery::{Demo, Gallery};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Virtual canvas the headless demos render against
const RESOLUTION: [f32; 2] = [1280.0, 800.0];

/// Pointer sweeping a Lissajous figure so pointer-driven demos have input.
fn pointer_at(t: f64) -> [f32; 2] {
    [(t * 0.7).sin() as f32 * 0.8, (t * 1.1).sin() as f32 * 0.6]
}

/// Scroll bouncing through the page range every 20 s.
fn scroll_at(t: f64) -> f32 {
    let phase = (t / 20.0).rem_euclid(1.0);
    (1.0 - (phase * 2.0 - 1.0).abs()) as f32
}

/// One-line fingerprint of the active demo's output.
fn fingerprint(demo: &dyn Demo) -> (usize, f64) {
    if let Some(points) = demo.points() {
        return (points.len(), points.checksum());
    }
    if let Some(view) = demo.mesh() {
        return (view.mesh.len(), view.mesh.checksum());
    }
    let center = demo
        .shader()
        .map(|shader| shader.shade([0.5, 0.5], &demo.uniforms().to_gpu()))
        .unwrap_or_default();
    (0, center.iter().map(|&c| c as f64).sum())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shader_gallery=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = CliArgs::parse();
    let config = args.load_config()?;
    let mut gallery = Gallery::new(config);

    // Headless time is frame-locked so runs are reproducible
    let frame_secs = 1.0 / args.fps as f64;
    let mut frame_interval = tokio::time::interval(Duration::from_secs_f64(frame_secs));
    frame_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut stats_interval = tokio::time::interval(Duration::from_secs(1));

    let mut frames = 0u64;
    let mut frames_last_interval = 0u64;

    info!(
        demo = %gallery.active_id(),
        fps = args.fps,
        frames = args.frames,
        "running headless"
    );

    loop {
        tokio::select! {
            _ = frame_interval.tick() => {
                let now = frames as f64 * frame_secs;
                gallery.tick(now, pointer_at(now), scroll_at(now), RESOLUTION);
                frames += 1;
                frames_last_interval += 1;
                if args.frames > 0 && frames >= args.frames {
                    break;
                }
            }
            _ = stats_interval.tick() => {
                let (points, checksum) = fingerprint(gallery.active());
                info!(
                    demo = %gallery.active_id(),
                    t = format!("{:.2}", gallery.input().time),
                    points,
                    checksum = format!("{:.3}", checksum),
                    "/sec" = frames_last_interval,
                    "stats"
                );
                frames_last_interval = 0;
            }
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
        }
    }

    let (points, checksum) = fingerprint(gallery.active());
    info!(
        demo = %gallery.active_id(),
        frames,
        points,
        checksum = format!("{:.3}", checksum),
        "done"
    );
    Ok(())
}
