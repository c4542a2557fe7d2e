use egui::{Pos2, Rect};

/// Pixels added around a primitive's bounding box so round caps and joins are repainted too.
pub fn damage_padding(pen_width: u32) -> f32 {
    (pen_width / 2 + 2) as f32
}

/// Calculate the bounding box for a set of points
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Intersect `rect` with a `width` x `height` bitmap. Returns `None` when nothing is left.
pub fn clip_to_size(rect: Rect, width: u32, height: u32) -> Option<Rect> {
    let bitmap = Rect::from_min_max(Pos2::ZERO, Pos2::new(width as f32, height as f32));
    let clipped = rect.intersect(bitmap);
    if clipped.is_positive() {
        Some(clipped)
    } else {
        None
    }
}
