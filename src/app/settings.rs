//! Settings sidebar: playback speed, pause, restart

use eframe::egui;

use super::GalleryApp;
use crate::theme::{colors, group_frame};

impl GalleryApp {
    pub(crate) fn render_settings(&mut self, ctx: &egui::Context) {
        let half_width = ctx.screen_rect().width() * 0.18;
        egui::SidePanel::left("settings")
            .default_width(half_width)
            .min_width(240.0)
            .resizable(true)
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(8.0))
            .show(ctx, |ui| {
                group_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(egui::RichText::new("Playback:").color(colors::TEXT_MUTED));

                    let mut speed = self.gallery.clock().speed();
                    ui.label(
                        egui::RichText::new(format!("Speed: {:.2}x", speed)).color(colors::TEXT_MUTED),
                    );
                    let full_width = ui.available_width();
                    ui.spacing_mut().slider_width = full_width;
                    let speed_response = ui.add(
                        egui::Slider::new(&mut speed, 0.1..=4.0)
                            .logarithmic(true)
                            .clamping(egui::SliderClamping::Always)
                            .show_value(false),
                    );
                    if speed_response.double_clicked() {
                        speed = 1.0;
                    }
                    if speed != self.gallery.clock().speed() {
                        self.gallery.set_speed(speed);
                    }

                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        let paused = self.gallery.is_paused();
                        if ui.button(if paused { "Resume" } else { "Pause" }).clicked() {
                            if paused {
                                self.gallery.resume();
                            } else {
                                self.gallery.pause();
                            }
                        }
                        if ui.button("Restart").clicked() {
                            let id = self.gallery.active_id();
                            self.select_demo(id);
                        }
                    });
                });

                ui.add_space(8.0);

                group_frame().show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    let demo = self.gallery.active();
                    ui.label(egui::RichText::new(demo.title()).color(colors::TEXT_PRIMARY));

                    let kind = if let Some(points) = demo.points() {
                        format!("{} points", points.len())
                    } else if let Some(view) = demo.mesh() {
                        format!("{} mesh vertices", view.mesh.len())
                    } else if demo.shader().is_some() {
                        "fragment shader".to_string()
                    } else {
                        "empty".to_string()
                    };
                    ui.label(egui::RichText::new(kind).color(colors::TEXT_MUTED).small());
                    ui.label(
                        egui::RichText::new(format!("mount #{}", self.gallery.mount_epoch()))
                            .color(colors::TEXT_MUTED)
                            .small(),
                    );
                    if self.gallery.config().auto_rotate {
                        ui.label(
                            egui::RichText::new("Camera auto-rotate on")
                                .color(colors::TEXT_MUTED)
                                .small(),
                        );
                    }
                });
            });
    }
}
