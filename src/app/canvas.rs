//! Demo canvas: feeds pointer/scroll/time to the gallery and draws the
//! active demo, through the wgpu callbacks or the CPU painter.

use std::sync::Arc;

use eframe::egui;

use super::GalleryApp;
use crate::core::input::{normalize_scroll, pointer_to_ndc};
use crate::assets::TextureImage;
use crate::render::{
    pack_mesh, pack_points, MeshCallback, MeshUniforms, PointUniforms, PointsCallback, QuadCallback,
    UploadKey,
};
use crate::theme::{rgb_to_color32, rgba_to_color32};
use crate::time::now_seconds;

/// Width of the CPU-shaded target; height follows the canvas aspect
const CPU_SHADE_WIDTH: usize = 192;

impl GalleryApp {
    pub(crate) fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
        let rect = response.rect;
        let size = [rect.width(), rect.height()];

        // The scroll-driven demo treats the canvas as a window over `scroll_pages` pages
        let max_offset = rect.height() * (self.gallery.config().scroll_pages - 1.0).max(0.0);
        if let Some(pos) = response.hover_pos() {
            let local = pos - rect.min;
            self.pointer = pointer_to_ndc([local.x, local.y], size);
            let delta = ui.input(|i| i.smooth_scroll_delta.y);
            self.scroll_offset = (self.scroll_offset - delta).clamp(0.0, max_offset);
        }
        let scroll = normalize_scroll(self.scroll_offset, max_offset);

        self.gallery.tick(now_seconds(), self.pointer, scroll, size);

        let demo = self.gallery.active();
        painter.rect_filled(rect, 0.0, rgb_to_color32(demo.clear_color()));

        if demo.points().is_some() {
            if self.use_cpu {
                self.paint_points_cpu(&painter, rect);
            } else {
                self.paint_points_gpu(&painter, rect);
            }
        } else if demo.mesh().is_some() {
            if self.use_cpu {
                self.paint_mesh_cpu(ui.ctx(), &painter, rect);
            } else {
                self.paint_mesh_gpu(&painter, rect);
            }
        } else if demo.shader().is_some() {
            if self.use_cpu {
                self.paint_shader_cpu(ui.ctx(), &painter, rect);
            } else {
                self.paint_shader_gpu(&painter, rect);
            }
        }
    }

    fn paint_points_gpu(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let demo = self.gallery.active();
        let Some(points) = demo.points() else {
            return;
        };
        let camera = demo.camera().copied().unwrap_or_default();
        let point_size = demo.point_size() * self.gallery.config().point_size_scale;
        let uniforms = PointUniforms::new(&camera, aspect(rect), point_size);

        let key = UploadKey {
            epoch: self.gallery.mount_epoch(),
            generation: points.generation(),
        };
        // Only pack when the buffer moved since the last frame
        let packed = if self.point_uploads.is_stale(key) {
            self.point_uploads.record(key);
            pack_points(points)
        } else {
            Vec::new()
        };

        painter.add(egui_wgpu::Callback::new_paint_callback(
            rect,
            PointsCallback {
                key,
                points: Arc::new(packed),
                uniforms,
            },
        ));
    }

    fn paint_points_cpu(&self, painter: &egui::Painter, rect: egui::Rect) {
        let demo = self.gallery.active();
        let Some(points) = demo.points() else {
            return;
        };
        let camera = demo.camera().copied().unwrap_or_default();
        let aspect = aspect(rect);
        let view_proj = camera.view_proj(aspect);
        let focal = camera.projection(aspect).y_axis.y;

        // One radius for the whole cloud, sized at the orbit distance
        let point_size = demo.point_size() * self.gallery.config().point_size_scale;
        let radius = (point_size * 0.5 * focal / camera.distance().max(1e-3) * rect.height() * 0.5).max(0.75);

        let center = rect.center();
        for (&position, &color) in points.positions().iter().zip(points.colors()) {
            let Some([x, y]) = camera.project_with(&view_proj, position) else {
                continue;
            };
            if x.abs() > 1.1 || y.abs() > 1.1 {
                continue;
            }
            let pos = egui::pos2(
                center.x + x * rect.width() * 0.5,
                center.y - y * rect.height() * 0.5,
            );
            painter.circle_filled(pos, radius, rgb_to_color32(color));
        }
    }

    fn paint_mesh_gpu(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(fixed) = self.mounted_mesh() else {
            return;
        };
        let demo = self.gallery.active();
        let Some(view) = demo.mesh() else {
            return;
        };
        let camera = demo.camera().copied().unwrap_or_default();

        let key = UploadKey {
            epoch: self.gallery.mount_epoch(),
            generation: view.mesh.generation(),
        };
        let packed = if self.mesh_uploads.is_stale(key) {
            self.mesh_uploads.record(key);
            pack_mesh(view.mesh)
        } else {
            Vec::new()
        };

        painter.add(egui_wgpu::Callback::new_paint_callback(
            rect,
            MeshCallback {
                key,
                fixed,
                vertices: Arc::new(packed),
                uniforms: MeshUniforms::new(&camera, aspect(rect)),
            },
        ));
    }

    fn paint_mesh_cpu(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let epoch = self.gallery.mount_epoch();
        if self.mesh_textures.as_ref().map(|(e, _)| *e) != Some(epoch) {
            let handles: Vec<egui::TextureHandle> = self
                .gallery
                .active()
                .mesh()
                .map(|view| {
                    view.textures
                        .iter()
                        .enumerate()
                        .map(|(k, image)| {
                            ctx.load_texture(format!("mesh_layer_{k}"), color_image(image), egui::TextureOptions::LINEAR)
                        })
                        .collect()
                })
                .unwrap_or_default();
            self.mesh_textures = Some((epoch, handles));
        }
        let Some((_, handles)) = self.mesh_textures.as_ref() else {
            return;
        };

        let demo = self.gallery.active();
        let Some(view) = demo.mesh() else {
            return;
        };
        let camera = demo.camera().copied().unwrap_or_default();
        let view_proj = camera.view_proj(aspect(rect));
        let center = rect.center();

        let projected: Vec<Option<[f32; 2]>> = view
            .mesh
            .positions()
            .iter()
            .map(|&p| camera.project_with(&view_proj, p))
            .collect();
        let layers = view.mesh.layers();
        let uvs = view.mesh.uvs();

        for (layer, handle) in handles.iter().enumerate() {
            let mut mesh = egui::Mesh::with_texture(handle.id());
            for tri in view.mesh.indices().chunks_exact(3) {
                let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
                if layers[a] as usize != layer {
                    continue;
                }
                let (Some(pa), Some(pb), Some(pc)) = (projected[a], projected[b], projected[c]) else {
                    continue;
                };
                // Skip triangles entirely off one side of the canvas
                if [pa, pb, pc].iter().all(|p| p[1] > 1.1) || [pa, pb, pc].iter().all(|p| p[1] < -1.1) {
                    continue;
                }
                for (i, p) in [(a, pa), (b, pb), (c, pc)] {
                    let idx = mesh.vertices.len() as u32;
                    mesh.vertices.push(egui::epaint::Vertex {
                        pos: egui::pos2(center.x + p[0] * rect.width() * 0.5, center.y - p[1] * rect.height() * 0.5),
                        uv: egui::pos2(uvs[i][0], 1.0 - uvs[i][1]),
                        color: egui::Color32::WHITE,
                    });
                    mesh.indices.push(idx);
                }
            }
            if !mesh.is_empty() {
                painter.add(egui::Shape::mesh(mesh));
            }
        }
    }

    fn paint_shader_gpu(&mut self, painter: &egui::Painter, rect: egui::Rect) {
        let textures = self.mounted_textures();
        let Some(shader) = self.gallery.active().shader() else {
            return;
        };

        painter.add(egui_wgpu::Callback::new_paint_callback(
            rect,
            QuadCallback {
                program: shader.program,
                uniforms: self.gallery.active().uniforms().to_gpu(),
                epoch: self.gallery.mount_epoch(),
                textures,
            },
        ));
    }

    fn paint_shader_cpu(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let demo = self.gallery.active();
        let Some(shader) = demo.shader() else {
            return;
        };
        let uniforms = demo.uniforms().to_gpu();

        let width = CPU_SHADE_WIDTH;
        let height = ((width as f32 / aspect(rect)).round() as usize).max(1);
        let mut rgba = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            // Image rows run top to bottom, uv is y-up
            let v = 1.0 - (y as f32 + 0.5) / height as f32;
            for x in 0..width {
                let u = (x as f32 + 0.5) / width as f32;
                let color = rgba_to_color32(shader.shade([u, v], &uniforms));
                rgba.extend_from_slice(&color.to_srgba_unmultiplied());
            }
        }
        let image = egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba);

        if let Some(texture) = self.cpu_target.as_mut() {
            texture.set(image, egui::TextureOptions::LINEAR);
        } else {
            self.cpu_target = Some(ctx.load_texture("shader_cpu", image, egui::TextureOptions::LINEAR));
        }
        let Some(texture) = self.cpu_target.as_ref() else {
            return;
        };

        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
}

/// egui copy of a decoded texture; malformed images become transparent.
fn color_image(image: &TextureImage) -> egui::ColorImage {
    let size = [image.width as usize, image.height as usize];
    if size[0] == 0 || size[1] == 0 || image.rgba.len() != size[0] * size[1] * 4 {
        return egui::ColorImage::new([1, 1], egui::Color32::TRANSPARENT);
    }
    egui::ColorImage::from_rgba_unmultiplied(size, &image.rgba)
}

fn aspect(rect: egui::Rect) -> f32 {
    if rect.height() <= 0.0 {
        1.0
    } else {
        rect.width() / rect.height()
    }
}
