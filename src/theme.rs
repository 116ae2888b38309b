//! Dark gallery theme: black chrome so the demos carry all the color

use egui::Color32;

pub mod colors {
    use super::Color32;

    pub const BG_PRIMARY: Color32 = Color32::from_rgb(0, 0, 0);
    pub const BG_ELEVATED: Color32 = Color32::from_rgb(14, 14, 16);
    pub const BG_HOVER: Color32 = Color32::from_rgb(28, 28, 32);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 240);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 160, 160);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(90, 90, 90);

    pub const BORDER: Color32 = Color32::from_rgb(40, 40, 44);

    /// Warm highlight borrowed from the pulse cube glow (#f0c697)
    pub const ACCENT: Color32 = Color32::from_rgb(240, 198, 151);
    pub const PAUSED: Color32 = Color32::from_rgb(200, 160, 90);
}

pub fn minimal_visuals() -> egui::Visuals {
    use colors::*;

    let mut visuals = egui::Visuals::dark();

    visuals.panel_fill = BG_PRIMARY;
    visuals.window_fill = BG_ELEVATED;
    visuals.extreme_bg_color = BG_PRIMARY;
    visuals.faint_bg_color = BG_ELEVATED;
    visuals.override_text_color = Some(TEXT_PRIMARY);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = BG_PRIMARY;
    widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);
    widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    widgets.inactive.bg_fill = BG_ELEVATED;
    widgets.inactive.weak_bg_fill = BG_ELEVATED;
    widgets.inactive.fg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);
    widgets.inactive.bg_stroke = egui::Stroke::new(1.0, BORDER);

    widgets.hovered.bg_fill = BG_HOVER;
    widgets.hovered.weak_bg_fill = BG_HOVER;
    widgets.hovered.fg_stroke = egui::Stroke::new(1.0, TEXT_PRIMARY);
    widgets.hovered.bg_stroke = egui::Stroke::new(1.0, TEXT_MUTED);

    widgets.active.bg_fill = BG_HOVER;
    widgets.active.weak_bg_fill = BG_HOVER;
    widgets.active.fg_stroke = egui::Stroke::new(1.0, ACCENT);
    widgets.active.bg_stroke = egui::Stroke::new(1.0, TEXT_SECONDARY);

    visuals.selection.bg_fill = Color32::from_rgb(64, 52, 40);
    visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);
    visuals.hyperlink_color = ACCENT;

    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}

/// Bordered box used to group sidebar controls.
pub fn group_frame() -> egui::Frame {
    egui::Frame::new()
        .stroke(egui::Stroke::new(1.0, colors::TEXT_MUTED.gamma_multiply(0.6)))
        .corner_radius(4.0)
        .inner_margin(6.0)
}

/// Linear RGB (channels may exceed 1.0) to an opaque egui color.
pub fn rgb_to_color32(rgb: [f32; 3]) -> Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgb(channel(rgb[0]), channel(rgb[1]), channel(rgb[2]))
}

/// RGBA in [0, 1], straight alpha, to an egui color.
pub fn rgba_to_color32(rgba: [f32; 4]) -> Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(
        channel(rgba[0]),
        channel(rgba[1]),
        channel(rgba[2]),
        channel(rgba[3]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_bright_colors_saturate() {
        assert_eq!(rgb_to_color32([3.0, 0.5, -1.0]), Color32::from_rgb(255, 128, 0));
        assert_eq!(rgba_to_color32([1.0, 1.0, 1.0, 1.0]), Color32::WHITE);
        assert_eq!(rgba_to_color32([0.0; 4]), Color32::TRANSPARENT);
    }
}
