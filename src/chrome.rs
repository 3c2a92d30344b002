//! Custom window frame: maximize/restore geometry and title-bar dragging.
//!
//! The window is created without native decorations, so this module owns the
//! state the OS would normally track. It only computes geometry; the app
//! turns the results into viewport commands.

use egui::{Pos2, Vec2, pos2};

/// Outer position and inner size of the window, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowGeometry {
    pub position: Pos2,
    pub size: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WindowMode {
    #[default]
    Normal,
    /// Holds the bounds to return to; `None` when they were unknown.
    Maximized { restore: Option<WindowGeometry> },
}

#[derive(Debug, Default)]
pub struct WindowChrome {
    mode: WindowMode,
}

impl WindowChrome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_maximized(&self) -> bool {
        matches!(self.mode, WindowMode::Maximized { .. })
    }

    /// Glyph for the maximize/restore control.
    pub fn toggle_glyph(&self) -> &'static str {
        if self.is_maximized() { "🗗" } else { "🗖" }
    }

    /// Flip between normal and maximized; returns the geometry to apply.
    pub fn toggle_maximize(
        &mut self,
        current: Option<WindowGeometry>,
        screen: Vec2,
    ) -> Option<WindowGeometry> {
        match self.mode {
            WindowMode::Normal => {
                self.mode = WindowMode::Maximized { restore: current };
                Some(WindowGeometry {
                    position: pos2(0.0, 0.0),
                    size: screen,
                })
            }
            WindowMode::Maximized { restore } => {
                self.mode = WindowMode::Normal;
                restore
            }
        }
    }

    /// Title-bar drags move the window only while it is not maximized.
    pub fn can_drag(&self) -> bool {
        !self.is_maximized()
    }
}
