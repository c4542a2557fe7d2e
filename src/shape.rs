//! Paint modes and the geometry each one produces from a two-point drag.

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::canvas::pen::{FillState, PenState};
use crate::geometry::{self, damage_padding};
use crate::raster::{self, Surface};

/// Minimum number of segments used to approximate a circle outline
const MIN_CIRCLE_SEGMENTS: usize = 16;

/// How pointer drags turn into pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaintMode {
    /// Draw straight into the canvas while dragging
    #[default]
    Freehand,
    Line,
    Circle,
    Rectangle,
}

impl PaintMode {
    pub fn all() -> &'static [PaintMode] {
        &[
            PaintMode::Freehand,
            PaintMode::Line,
            PaintMode::Circle,
            PaintMode::Rectangle,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaintMode::Freehand => "✏ Freehand",
            PaintMode::Line => "╱ Line",
            PaintMode::Circle => "○ Circle",
            PaintMode::Rectangle => "▭ Rectangle",
        }
    }

    /// The shape spanned by a drag from `anchor` to `point`.
    /// Freehand has no shape: it paints segment by segment.
    pub fn shape(self, anchor: Pos2, point: Pos2) -> Option<Shape> {
        match self {
            PaintMode::Freehand => None,
            PaintMode::Line => Some(Shape::Line {
                from: anchor,
                to: point,
            }),
            PaintMode::Circle => Some(Shape::Circle {
                center: geometry::midpoint(anchor, point),
                radius: geometry::distance(anchor, point) / 2.0,
            }),
            PaintMode::Rectangle => {
                Some(Shape::Rectangle(geometry::normalized_rect(anchor, point)))
            }
        }
    }
}

/// A primitive drawn from two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line { from: Pos2, to: Pos2 },
    /// Ellipse with equal radii around `center`
    Circle { center: Pos2, radius: f32 },
    /// Axis-aligned, already normalized
    Rectangle(Rect),
}

impl Shape {
    /// Geometric bounding box, without pen width
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Line { from, to } => Rect::from_two_pos(*from, *to),
            Shape::Circle { center, radius } => {
                Rect::from_center_size(*center, egui::Vec2::splat(radius * 2.0))
            }
            Shape::Rectangle(rect) => *rect,
        }
    }

    /// Bounding box grown to cover the pen's caps and joins
    pub fn damage_rect(&self, pen_width: u32) -> Rect {
        self.bounds().expand(damage_padding(pen_width))
    }

    /// Only closed shapes get an interior fill
    pub fn is_closed(&self) -> bool {
        !matches!(self, Shape::Line { .. })
    }

    /// Polyline traced by the pen
    pub fn outline(&self) -> Vec<Pos2> {
        match self {
            Shape::Line { from, to } => vec![*from, *to],
            Shape::Circle { center, radius } => circle_outline(*center, *radius),
            Shape::Rectangle(rect) => vec![
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
                rect.left_top(),
            ],
        }
    }

    /// Draw the fill (if any) and then the outline on top of it
    pub fn rasterize<S: Surface + ?Sized>(&self, surface: &mut S, pen: &PenState, fill: &FillState) {
        if let Some(fill_color) = fill.active_color().filter(|_| self.is_closed()) {
            match self {
                Shape::Circle { center, radius } => {
                    raster::fill_ellipse(surface, *center, *radius, *radius, fill_color)
                }
                Shape::Rectangle(rect) => raster::fill_rect(surface, *rect, fill_color),
                Shape::Line { .. } => {}
            }
        }

        raster::stroke_polyline(
            surface,
            &self.outline(),
            pen.width,
            pen.style.dash_pattern(),
            pen.color,
        );
    }
}

fn circle_outline(center: Pos2, radius: f32) -> Vec<Pos2> {
    let segments = ((std::f32::consts::TAU * radius / 2.0).ceil() as usize).max(MIN_CIRCLE_SEGMENTS);
    (0..=segments)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / segments as f32;
            Pos2::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}
