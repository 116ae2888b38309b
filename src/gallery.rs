//! Active-demo owner shared by the GUI, wasm and CLI front ends.
//!
//! Exactly one demo is mounted at a time. Switching drops the old demo
//! before the next one is built, and bumps `mount_epoch` so renderers know
//! to throw away whatever they uploaded for it.

use tracing::info;

use crate::config::GalleryConfig;
use crate::core::{Clock, FrameInput, UniformSet};
use crate::demos::{self, Demo, DemoId};

pub struct Gallery {
    config: GalleryConfig,
    active: Box<dyn Demo>,
    clock: Clock,
    input: FrameInput,
    mount_epoch: u64,
}

impl Gallery {
    pub fn new(config: GalleryConfig) -> Self {
        let active = demos::build(config.demo, &config);
        log_mount(active.as_ref());
        Self {
            clock: Clock::new(config.speed),
            config,
            active,
            input: FrameInput::default(),
            mount_epoch: 1,
        }
    }

    /// Mount a gallery around an already built demo.
    pub fn with_demo(config: GalleryConfig, demo: Box<dyn Demo>) -> Self {
        log_mount(demo.as_ref());
        Self {
            clock: Clock::new(config.speed),
            config,
            active: demo,
            input: FrameInput::default(),
            mount_epoch: 1,
        }
    }

    pub fn active(&self) -> &dyn Demo {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> DemoId {
        self.active.id()
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// Incremented on every switch.
    pub fn mount_epoch(&self) -> u64 {
        self.mount_epoch
    }

    /// Input handed to the active demo on the last tick.
    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Replace the active demo. Switching to the mounted demo rebuilds it.
    pub fn switch(&mut self, id: DemoId) {
        let previous = self.active.id();
        // Release the old buffers before allocating the new ones
        self.active = Box::new(Unmounted(UniformSet::new()));
        self.active = demos::build(id, &self.config);
        self.switched(previous);
    }

    /// Replace the active demo with one built by the caller.
    pub fn switch_to(&mut self, demo: Box<dyn Demo>) {
        let previous = self.active.id();
        self.active = demo;
        self.switched(previous);
    }

    fn switched(&mut self, previous: DemoId) {
        self.clock.reset();
        self.input = FrameInput {
            resolution: self.input.resolution,
            ..FrameInput::default()
        };
        self.mount_epoch += 1;
        self.config.demo = self.active.id();
        info!(from = %previous, epoch = self.mount_epoch, "demo switched");
        log_mount(self.active.as_ref());
    }

    /// Advance the clock to `now` and update the active demo.
    pub fn tick(
        &mut self,
        now: f64,
        pointer: [f32; 2],
        scroll: f32,
        resolution: [f32; 2],
    ) -> &FrameInput {
        let (elapsed, delta) = self.clock.tick(now);
        self.input = FrameInput {
            time: elapsed as f32,
            delta: delta as f32,
            pointer,
            scroll,
            resolution,
        };
        self.active.update(&self.input);
        &self.input
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
        self.config.speed = self.clock.speed();
    }
}

fn log_mount(demo: &dyn Demo) {
    let points = demo.points().map_or(0, |p| p.len());
    let mesh_vertices = demo.mesh().map_or(0, |view| view.mesh.len());
    info!(
        demo = %demo.id(),
        points,
        mesh_vertices,
        shader = demo.shader().is_some(),
        "demo mounted"
    );
}

/// Placeholder held for the instant between dropping one demo and building the next.
struct Unmounted(UniformSet);

impl Demo for Unmounted {
    fn id(&self) -> DemoId {
        DemoId::Circle
    }

    fn update(&mut self, _input: &FrameInput) {}

    fn uniforms(&self) -> &UniformSet {
        &self.0
    }
}
