//! Plain point arithmetic used by the shape modes.

use egui::{Pos2, Rect};

mod bounds;
pub use bounds::{calculate_bounds, clip_to_size, damage_padding};

/// Euclidean distance between two points
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// Point halfway between `a` and `b`
pub fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Axis-aligned rectangle with `a` and `b` as opposite corners, whatever the drag direction.
pub fn normalized_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_two_pos(a, b)
}
