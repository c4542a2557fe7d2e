//! Pixel-level drawing into the canvas bitmap and the preview overlay.
//!
//! Everything here works on owned `image` buffers passed in by reference. The
//! canvas bitmap is an opaque [`RgbImage`], the overlay is an [`RgbaImage`]
//! whose untouched pixels stay fully transparent.

use egui::{Color32, Pos2, Rect};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

mod stroke;
pub use stroke::{is_dash_on, stroke_polyline};

/// A bitmap the rasterizer can plot into
pub trait Surface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    /// Write one pixel. Coordinates are already known to be in bounds.
    fn put(&mut self, x: u32, y: u32, color: Color32);

    /// Write one pixel, silently dropping anything outside the bitmap
    fn plot(&mut self, x: i64, y: i64, color: Color32) {
        let (width, height) = self.size();
        if x >= 0 && y >= 0 && (x as u64) < width as u64 && (y as u64) < height as u64 {
            self.put(x as u32, y as u32, color);
        }
    }
}

impl Surface for RgbImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn put(&mut self, x: u32, y: u32, color: Color32) {
        let [r, g, b, _] = color.to_srgba_unmultiplied();
        self.put_pixel(x, y, Rgb([r, g, b]));
    }
}

impl Surface for RgbaImage {
    fn size(&self) -> (u32, u32) {
        self.dimensions()
    }

    fn put(&mut self, x: u32, y: u32, color: Color32) {
        self.put_pixel(x, y, Rgba(color.to_srgba_unmultiplied()));
    }
}

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pixel columns (or rows) covered by `min..=max`, limited to `0..len`.
/// `None` when nothing of the span lies on the bitmap.
fn clamp_span(min: f32, max: f32, len: u32) -> Option<(i64, i64)> {
    let min = (min.floor() as i64).max(0);
    let max = (max.ceil() as i64).min(len as i64 - 1);
    (min <= max).then_some((min, max))
}

/// Fill every pixel within `radius` of `center`
pub fn stamp_disk<S: Surface + ?Sized>(surface: &mut S, center: Pos2, radius: f32, color: Color32) {
    let r2 = radius * radius;
    let (width, height) = surface.size();
    let Some((min_x, max_x)) = clamp_span(center.x - radius, center.x + radius, width) else {
        return;
    };
    let Some((min_y, max_y)) = clamp_span(center.y - radius, center.y + radius, height) else {
        return;
    };

    for y in min_y..=max_y {
        let dy = y as f32 - center.y;
        for x in min_x..=max_x {
            let dx = x as f32 - center.x;
            if dx * dx + dy * dy <= r2 {
                surface.plot(x, y, color);
            }
        }
    }
}

/// Fill the pixels inside an axis-aligned ellipse. Zero radii fill nothing.
pub fn fill_ellipse<S: Surface + ?Sized>(
    surface: &mut S,
    center: Pos2,
    radius_x: f32,
    radius_y: f32,
    color: Color32,
) {
    if radius_x <= 0.0 || radius_y <= 0.0 {
        return;
    }

    let (width, height) = surface.size();
    let Some((min_x, max_x)) = clamp_span(center.x - radius_x, center.x + radius_x, width) else {
        return;
    };
    let Some((min_y, max_y)) = clamp_span(center.y - radius_y, center.y + radius_y, height) else {
        return;
    };

    for y in min_y..=max_y {
        let ny = (y as f32 - center.y) / radius_y;
        for x in min_x..=max_x {
            let nx = (x as f32 - center.x) / radius_x;
            if nx * nx + ny * ny <= 1.0 {
                surface.plot(x, y, color);
            }
        }
    }
}

/// Fill every pixel whose coordinates lie inside `rect` (edges included)
pub fn fill_rect<S: Surface + ?Sized>(surface: &mut S, rect: Rect, color: Color32) {
    let (width, height) = surface.size();
    let min_x = (rect.min.x.ceil() as i64).max(0);
    let max_x = (rect.max.x.floor() as i64).min(width as i64 - 1);
    let min_y = (rect.min.y.ceil() as i64).max(0);
    let max_y = (rect.max.y.floor() as i64).min(height as i64 - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            surface.plot(x, y, color);
        }
    }
}

/// Make every overlay pixel fully transparent
pub fn clear_overlay(overlay: &mut RgbaImage) {
    for pixel in overlay.pixels_mut() {
        *pixel = TRANSPARENT;
    }
}

/// Make the overlay pixels under `rect` transparent again
pub fn clear_overlay_region(overlay: &mut RgbaImage, rect: Rect) {
    let min_x = rect.min.x.floor().max(0.0) as u32;
    let min_y = rect.min.y.floor().max(0.0) as u32;
    let max_x = (rect.max.x.ceil().max(0.0) as u32).min(overlay.width().saturating_sub(1));
    let max_y = (rect.max.y.ceil().max(0.0) as u32).min(overlay.height().saturating_sub(1));

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            overlay.put_pixel(x, y, TRANSPARENT);
        }
    }
}

/// Fill the whole bitmap with one colour
pub fn fill_all(bitmap: &mut RgbImage, color: Color32) {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    for pixel in bitmap.pixels_mut() {
        *pixel = Rgb([r, g, b]);
    }
}

/// Source-over blend of one overlay pixel onto an opaque pixel
pub fn blend(dst: Rgb<u8>, src: Rgba<u8>) -> Rgb<u8> {
    match src[3] {
        0 => dst,
        255 => Rgb([src[0], src[1], src[2]]),
        alpha => {
            let a = alpha as u32;
            let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a) + 127) / 255) as u8;
            Rgb([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2])])
        }
    }
}

/// Blend `overlay` onto `bitmap`. Both are anchored at the top-left corner;
/// pixels outside the smaller of the two are left alone.
pub fn composite_over(bitmap: &mut RgbImage, overlay: &RgbaImage) {
    let width = bitmap.width().min(overlay.width());
    let height = bitmap.height().min(overlay.height());

    for y in 0..height {
        for x in 0..width {
            let src = *overlay.get_pixel(x, y);
            if src[3] == 0 {
                continue;
            }
            let dst = bitmap.get_pixel_mut(x, y);
            *dst = blend(*dst, src);
        }
    }
}

/// Flatten an RGBA image onto a solid background, dropping the alpha channel
pub fn flatten_onto(image: &RgbaImage, background: Color32) -> RgbImage {
    let [r, g, b, _] = background.to_srgba_unmultiplied();
    let backdrop = Rgb([r, g, b]);
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        blend(backdrop, *image.get_pixel(x, y))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([255, 255, 255]))
    }

    /// Counts every pixel a primitive asks to plot, on or off the bitmap
    struct CountingSurface {
        width: u32,
        height: u32,
        visits: usize,
    }

    impl Surface for CountingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn put(&mut self, _x: u32, _y: u32, _color: Color32) {}

        fn plot(&mut self, _x: i64, _y: i64, _color: Color32) {
            self.visits += 1;
        }
    }

    fn counting(width: u32, height: u32) -> CountingSurface {
        CountingSurface {
            width,
            height,
            visits: 0,
        }
    }

    #[test]
    fn test_huge_primitives_only_visit_the_bitmap() {
        let center = Pos2::new(5.0, 5.0);

        let mut surface = counting(10, 10);
        stamp_disk(&mut surface, center, 5000.0, Color32::BLACK);
        assert_eq!(surface.visits, 100);

        let mut surface = counting(10, 10);
        fill_ellipse(&mut surface, center, 5000.0, 3000.0, Color32::BLACK);
        assert_eq!(surface.visits, 100);

        let mut surface = counting(10, 10);
        fill_rect(
            &mut surface,
            Rect::from_min_max(Pos2::new(-1e6, -1e6), Pos2::new(1e6, 1e6)),
            Color32::BLACK,
        );
        assert_eq!(surface.visits, 100);
    }

    #[test]
    fn test_primitives_off_the_bitmap_visit_nothing() {
        let mut surface = counting(10, 10);
        stamp_disk(&mut surface, Pos2::new(-50.0, 5.0), 20.0, Color32::BLACK);
        fill_ellipse(&mut surface, Pos2::new(5.0, 80.0), 10.0, 10.0, Color32::BLACK);
        fill_rect(
            &mut surface,
            Rect::from_min_max(Pos2::new(20.0, 0.0), Pos2::new(30.0, 9.0)),
            Color32::BLACK,
        );
        assert_eq!(surface.visits, 0);
    }

    #[test]
    fn test_disk_at_the_edge_is_clipped_not_shifted() {
        let mut bitmap = white(10, 10);
        stamp_disk(&mut bitmap, Pos2::new(0.0, 0.0), 2.0, Color32::BLACK);
        assert_eq!(*bitmap.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*bitmap.get_pixel(2, 0), Rgb([0, 0, 0]));
        assert_eq!(*bitmap.get_pixel(2, 2), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_plot_ignores_out_of_bounds() {
        let mut bitmap = white(4, 4);
        bitmap.plot(-1, 0, Color32::BLACK);
        bitmap.plot(0, 4, Color32::BLACK);
        bitmap.plot(3, 3, Color32::BLACK);
        assert_eq!(*bitmap.get_pixel(3, 3), Rgb([0, 0, 0]));
        assert_eq!(bitmap.pixels().filter(|p| p.0 == [0, 0, 0]).count(), 1);
    }

    #[test]
    fn test_stamp_disk_small_radius_is_single_pixel() {
        let mut bitmap = white(5, 5);
        stamp_disk(&mut bitmap, Pos2::new(2.0, 2.0), 0.5, Color32::RED);
        assert_eq!(*bitmap.get_pixel(2, 2), Rgb([255, 0, 0]));
        assert_eq!(bitmap.pixels().filter(|p| p.0 == [255, 0, 0]).count(), 1);
    }

    #[test]
    fn test_fill_rect_includes_edges() {
        let mut bitmap = white(10, 10);
        fill_rect(
            &mut bitmap,
            Rect::from_min_max(Pos2::new(2.0, 3.0), Pos2::new(4.0, 5.0)),
            Color32::BLUE,
        );
        assert_eq!(bitmap.pixels().filter(|p| p.0 == [0, 0, 255]).count(), 9);
        assert_eq!(*bitmap.get_pixel(4, 5), Rgb([0, 0, 255]));
        assert_eq!(*bitmap.get_pixel(5, 5), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_fill_ellipse_zero_radius_draws_nothing() {
        let mut bitmap = white(10, 10);
        fill_ellipse(&mut bitmap, Pos2::new(5.0, 5.0), 0.0, 3.0, Color32::BLUE);
        assert!(bitmap.pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_composite_skips_transparent_pixels() {
        let mut bitmap = white(3, 1);
        let mut overlay = RgbaImage::from_pixel(3, 1, TRANSPARENT);
        overlay.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        overlay.put_pixel(2, 0, Rgba([0, 0, 0, 128]));

        composite_over(&mut bitmap, &overlay);

        assert_eq!(*bitmap.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*bitmap.get_pixel(1, 0), Rgb([10, 20, 30]));
        assert_eq!(*bitmap.get_pixel(2, 0), Rgb([127, 127, 127]));
    }

    #[test]
    fn test_clear_overlay_region_is_clipped() {
        let mut overlay = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        clear_overlay_region(
            &mut overlay,
            Rect::from_min_max(Pos2::new(-4.0, 6.0), Pos2::new(3.0, 40.0)),
        );
        assert_eq!(*overlay.get_pixel(0, 9), TRANSPARENT);
        assert_eq!(*overlay.get_pixel(3, 6), TRANSPARENT);
        assert_eq!(*overlay.get_pixel(4, 6), Rgba([1, 2, 3, 255]));
        assert_eq!(*overlay.get_pixel(0, 5), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_flatten_onto_white() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        image.put_pixel(1, 0, Rgba([1, 2, 3, 255]));
        let flat = flatten_onto(&image, Color32::WHITE);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*flat.get_pixel(1, 0), Rgb([1, 2, 3]));
    }
}
