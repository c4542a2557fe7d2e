use egui::{Color32, PointerButton};
use serde::{Deserialize, Serialize};

/// Dash style of the pen outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PenStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

impl PenStyle {
    pub fn all() -> &'static [PenStyle] {
        &[PenStyle::Solid, PenStyle::Dashed, PenStyle::Dotted, PenStyle::DashDot]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PenStyle::Solid => "Solid Line",
            PenStyle::Dashed => "Dashed Line",
            PenStyle::Dotted => "Dotted Line",
            PenStyle::DashDot => "Dashed Dotted Line",
        }
    }

    /// Alternating on/off lengths in pen widths. Empty means solid.
    pub fn dash_pattern(&self) -> &'static [f32] {
        match self {
            PenStyle::Solid => &[],
            PenStyle::Dashed => &[4.0, 2.0],
            PenStyle::Dotted => &[1.0, 2.0],
            PenStyle::DashDot => &[4.0, 2.0, 1.0, 2.0],
        }
    }
}

/// Colours, width and style used by every draw operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenState {
    /// Colour used while the primary (left) button draws
    pub primary: Color32,
    /// Colour used while the secondary (right) button draws
    pub secondary: Color32,
    /// Colour of the stroke in progress, picked from `primary`/`secondary` on press
    pub color: Color32,
    pub width: u32,
    pub style: PenStyle,
}

impl Default for PenState {
    fn default() -> Self {
        Self {
            primary: Color32::BLACK,
            secondary: Color32::WHITE,
            color: Color32::BLACK,
            width: 1,
            style: PenStyle::Solid,
        }
    }
}

impl PenState {
    /// Pen colour for a stroke started with `button`, or `None` for buttons that don't draw
    pub fn color_for(&self, button: PointerButton) -> Option<Color32> {
        match button {
            PointerButton::Primary => Some(self.primary),
            PointerButton::Secondary => Some(self.secondary),
            _ => None,
        }
    }

    /// Set the width, keeping it at least one pixel
    pub fn set_width(&mut self, width: u32) {
        self.width = width.max(1);
    }
}

/// Interior fill for closed shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillState {
    pub enabled: bool,
    pub color: Color32,
}

impl Default for FillState {
    fn default() -> Self {
        Self {
            enabled: false,
            color: Color32::WHITE,
        }
    }
}

impl FillState {
    /// The colour to flood closed shapes with, if filling is on
    pub fn active_color(&self) -> Option<Color32> {
        self.enabled.then_some(self.color)
    }
}
