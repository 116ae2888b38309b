//! Gallery app
//!
//! The egui front end shared by the native and wasm builds: header with demo
//! tabs, optional settings sidebar, and the canvas the active demo draws into.

mod canvas;
mod header;
mod settings;

use std::sync::Arc;

use eframe::egui;
use tracing::{info, warn};

use crate::assets::TextureImage;
use crate::config::GalleryConfig;
use crate::demos::DemoId;
use crate::gallery::Gallery;
use crate::render::{MeshStatic, UploadTracker};
use crate::theme::{colors, minimal_visuals};

pub use header::FpsCounter;

pub struct GalleryApp {
    pub(crate) gallery: Gallery,
    /// CPU painter instead of the wgpu callbacks (--use-cpu, or no wgpu available)
    pub(crate) use_cpu: bool,
    pub(crate) fps_counter: FpsCounter,
    pub(crate) show_settings: bool,
    /// Last pointer position over the canvas, NDC
    pub(crate) pointer: [f32; 2],
    /// Scroll distance in pixels, clamped to the virtual page range
    pub(crate) scroll_offset: f32,
    /// What has been packed and handed to the points callback
    pub(crate) point_uploads: UploadTracker,
    /// What has been packed and handed to the mesh callback
    pub(crate) mesh_uploads: UploadTracker,
    /// Indices and textures of the mounted mesh demo
    pub(crate) mesh_static: Option<(u64, Arc<MeshStatic>)>,
    /// egui copies of the mesh textures for the CPU path, one per layer
    pub(crate) mesh_textures: Option<(u64, Vec<egui::TextureHandle>)>,
    /// Shader textures of the current mount, shared with the quad callback
    pub(crate) shader_textures: (u64, Arc<Vec<TextureImage>>),
    /// Low-res target for shader demos on the CPU path
    pub(crate) cpu_target: Option<egui::TextureHandle>,
}

impl GalleryApp {
    pub fn new(cc: &eframe::CreationContext<'_>, use_cpu: bool, config: GalleryConfig) -> Self {
        cc.egui_ctx.set_visuals(minimal_visuals());

        let use_cpu = match cc.wgpu_render_state.as_ref() {
            Some(render_state) if !use_cpu => {
                crate::render::install(render_state);
                false
            }
            Some(_) => true,
            None => {
                warn!("wgpu unavailable, falling back to CPU painter");
                true
            }
        };
        info!(use_cpu, demo = %config.demo, "gallery app starting");

        Self {
            gallery: Gallery::new(config),
            use_cpu,
            fps_counter: FpsCounter::new(),
            show_settings: false,
            pointer: [0.0, 0.0],
            scroll_offset: 0.0,
            point_uploads: UploadTracker::default(),
            mesh_uploads: UploadTracker::default(),
            mesh_static: None,
            mesh_textures: None,
            shader_textures: (0, Arc::new(Vec::new())),
            cpu_target: None,
        }
    }

    /// Switch demos and forget everything tied to the previous mount.
    pub(crate) fn select_demo(&mut self, id: DemoId) {
        self.gallery.switch(id);
        self.scroll_offset = 0.0;
        self.point_uploads.clear();
        self.mesh_uploads.clear();
        self.mesh_static = None;
        self.mesh_textures = None;
        self.shader_textures = (0, Arc::new(Vec::new()));
    }

    /// Textures of the mounted shader demo, copied once per mount.
    pub(crate) fn mounted_textures(&mut self) -> Arc<Vec<TextureImage>> {
        let epoch = self.gallery.mount_epoch();
        if self.shader_textures.0 != epoch {
            let textures = self
                .gallery
                .active()
                .shader()
                .map(|shader| shader.textures.to_vec())
                .unwrap_or_default();
            self.shader_textures = (epoch, Arc::new(textures));
        }
        self.shader_textures.1.clone()
    }

    /// Indices and textures of the mounted mesh demo, copied once per mount.
    pub(crate) fn mounted_mesh(&mut self) -> Option<Arc<MeshStatic>> {
        let epoch = self.gallery.mount_epoch();
        match &self.mesh_static {
            Some((mounted, fixed)) if *mounted == epoch => Some(fixed.clone()),
            _ => {
                let view = self.gallery.active().mesh()?;
                let fixed = Arc::new(MeshStatic::new(view.mesh, view.textures));
                self.mesh_static = Some((epoch, fixed.clone()));
                Some(fixed)
            }
        }
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Animations run every frame
        ctx.request_repaint();

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(4.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        // Settings sidebar (left, must be shown before CentralPanel)
        if self.show_settings {
            self.render_settings(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                self.render_canvas(ui);
            });
    }
}
