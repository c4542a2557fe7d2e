use egui::{Color32, Pos2};

use super::{Surface, stamp_disk};
use crate::geometry::distance;

/// Spacing between disk stamps along a path, in pixels
const STAMP_STEP: f32 = 0.5;

/// Whether a dash `pattern` is "on" at `offset`. Both are measured in pen
/// widths; the pattern alternates on/off lengths and starts with "on".
/// An empty pattern is a solid line.
pub fn is_dash_on(pattern: &[f32], offset: f32) -> bool {
    let period: f32 = pattern.iter().sum();
    if pattern.is_empty() || period <= 0.0 {
        return true;
    }

    let mut position = offset.rem_euclid(period);
    for (index, length) in pattern.iter().enumerate() {
        if position < *length {
            return index % 2 == 0;
        }
        position -= length;
    }
    true
}

/// Stroke a polyline with a round pen of `width` pixels.
///
/// Disks are stamped along every segment, which gives round caps and round
/// joins. The dash pattern runs continuously across segment boundaries. A
/// path of zero length still stamps one disk, so a click draws a dot.
pub fn stroke_polyline<S: Surface + ?Sized>(
    surface: &mut S,
    points: &[Pos2],
    width: u32,
    pattern: &[f32],
    color: Color32,
) {
    let Some(first) = points.first() else {
        return;
    };

    let radius = (width as f32 / 2.0).max(0.5);
    let unit = width.max(1) as f32;

    if points.len() == 1 {
        stamp_disk(surface, *first, radius, color);
        return;
    }

    let mut travelled = 0.0;
    for segment in points.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let length = distance(start, end);
        let steps = ((length / STAMP_STEP).ceil() as usize).max(1);

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            if is_dash_on(pattern, (travelled + length * t) / unit) {
                stamp_disk(surface, start.lerp(end, t), radius, color);
            }
        }
        travelled += length;
    }
}
