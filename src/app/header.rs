//! Header bar with demo tabs and status

use eframe::egui;

use super::GalleryApp;
use crate::demos::DemoId;
use crate::theme::colors;
use crate::time::now_seconds;

impl GalleryApp {
    pub(crate) fn render_header(&mut self, ui: &mut egui::Ui) {
        self.fps_counter.tick();

        let active = self.gallery.active_id();
        let mut selected = None;

        ui.horizontal(|ui| {
            let settings_text = if self.show_settings { "Settings <<<" } else { "Settings >>>" };
            if ui.button(egui::RichText::new(settings_text)).clicked() {
                self.show_settings = !self.show_settings;
            }

            ui.add_space(10.0);

            for &id in DemoId::ALL {
                let color = if active == id {
                    colors::TEXT_PRIMARY
                } else {
                    colors::TEXT_MUTED
                };
                if ui
                    .selectable_label(active == id, egui::RichText::new(id.label()).color(color))
                    .clicked()
                {
                    selected = Some(id);
                }
            }

            // RIGHT: status and stats (right-to-left order)
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if let Some(points) = self.gallery.active().points() {
                    ui.label(
                        egui::RichText::new(format!("{} points", points.len()))
                            .color(colors::TEXT_MUTED),
                    );
                    ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));
                }

                ui.label(
                    egui::RichText::new(format!("t {:.1}s", self.gallery.input().time))
                        .color(colors::TEXT_MUTED),
                );
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED));

                ui.label(
                    egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                        .color(colors::TEXT_SECONDARY),
                );

                ui.add_space(10.0);

                let (status_color, status_text) = match (self.gallery.is_paused(), self.use_cpu) {
                    (true, _) => (colors::PAUSED, "Paused"),
                    (false, true) => (colors::TEXT_SECONDARY, "CPU"),
                    (false, false) => (colors::ACCENT, "GPU"),
                };
                ui.colored_label(status_color, egui::RichText::new(status_text));
            });
        });

        // Applied after the layout closure so `self` isn't borrowed twice
        if let Some(id) = selected {
            self.select_demo(id);
        }
    }
}

/// FPS counter over the last 60 frames
pub struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    pub fn tick(&mut self) {
        self.record(now_seconds() * 1000.0);
    }

    /// Record a frame at `now_ms` milliseconds.
    pub fn record(&mut self, now_ms: f64) {
        self.frames.push(now_ms);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.frames.first(), self.frames.last()) else {
            return 0.0;
        };
        let elapsed = last - first;
        if self.frames.len() < 2 || elapsed <= 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
