//! Theme management for the egui-based UI.

use eframe::egui::{self, Color32, Stroke};

use crate::settings::ThemeMode;

/// Colours used by the custom chrome and panels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub dark: bool,
    pub background: Color32,
    pub card: Color32,
    pub surface: Color32,
    pub button: Color32,
    pub button_hover: Color32,
    pub border: Color32,
    pub text: Color32,
    pub text_secondary: Color32,
    pub close_hover: Color32,
}

impl Palette {
    pub const DARK: Palette = Palette {
        dark: true,
        background: Color32::from_rgb(0x1A, 0x1A, 0x1A),
        card: Color32::from_rgb(0x24, 0x24, 0x24),
        surface: Color32::from_rgb(0x2A, 0x2A, 0x2A),
        button: Color32::from_rgb(0x33, 0x33, 0x33),
        button_hover: Color32::from_rgb(0x40, 0x40, 0x40),
        border: Color32::from_rgb(0x33, 0x33, 0x33),
        text: Color32::WHITE,
        text_secondary: Color32::from_rgb(0xAA, 0xAA, 0xAA),
        close_hover: Color32::from_rgb(0xFF, 0x00, 0x00),
    };

    pub const LIGHT: Palette = Palette {
        dark: false,
        background: Color32::WHITE,
        card: Color32::from_rgb(0xF5, 0xF5, 0xF5),
        surface: Color32::from_rgb(0xFA, 0xFA, 0xFA),
        button: Color32::from_rgb(0xE0, 0xE0, 0xE0),
        button_hover: Color32::from_rgb(0xCC, 0xCC, 0xCC),
        border: Color32::from_rgb(0xCC, 0xCC, 0xCC),
        text: Color32::BLACK,
        text_secondary: Color32::from_rgb(0x66, 0x66, 0x66),
        close_hover: Color32::from_rgb(0xFF, 0x00, 0x00),
    };

    /// Pick the palette for `mode`; `System` follows `system_dark`, and an
    /// unknown system preference means dark.
    pub fn resolve(mode: ThemeMode, system_dark: Option<bool>) -> Palette {
        let dark = match mode {
            ThemeMode::Light => false,
            ThemeMode::Dark => true,
            ThemeMode::System => system_dark.unwrap_or(true),
        };
        if dark { Self::DARK } else { Self::LIGHT }
    }
}

/// Apply the palette to the egui context.
pub fn apply_theme(ctx: &egui::Context, palette: &Palette) {
    let mut visuals = if palette.dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.window_fill = palette.background;
    visuals.panel_fill = palette.background;
    visuals.override_text_color = Some(palette.text);
    visuals.widgets.inactive.weak_bg_fill = palette.button;
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.border);
    visuals.widgets.hovered.weak_bg_fill = palette.button_hover;
    visuals.widgets.active.weak_bg_fill = palette.button_hover;
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.rounding = egui::Rounding::ZERO;
    }
    ctx.set_visuals(visuals);
}
