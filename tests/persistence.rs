use std::path::PathBuf;

use drawing_board::persistence::supported_formats;
use drawing_board::{Canvas, PaintMode, PersistenceError};
use egui::{Color32, PointerButton, Pos2};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

// Unique per test and per process so parallel runs don't collide
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("drawing_board_{}_{}", std::process::id(), name))
}

fn sketch(canvas: &mut Canvas) {
    canvas.set_background(Color32::from_rgb(200, 220, 240));
    canvas.set_paint_mode(PaintMode::Rectangle);
    canvas.set_fill_color(Color32::RED);
    canvas.begin_stroke(Pos2::new(4.0, 4.0), PointerButton::Primary);
    canvas.end_stroke(Pos2::new(20.0, 12.0));
}

fn round_trip(format: &str) {
    let path = temp_path(&format!("round_trip.{format}"));
    let mut canvas = Canvas::new(32, 16);
    sketch(&mut canvas);
    assert!(canvas.is_modified());

    canvas.save(&path, format).unwrap();
    assert!(!canvas.is_modified());

    let mut reopened = Canvas::new(32, 16);
    reopened.open(&path).unwrap();
    assert_eq!(reopened.snapshot(), canvas.snapshot());
    assert!(!reopened.is_modified());

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_png_round_trip() {
    round_trip("png");
}

#[test]
fn test_bmp_round_trip() {
    round_trip("bmp");
}

#[test]
fn test_save_writes_snapshot_not_preview() {
    let path = temp_path("preview.png");
    let mut canvas = Canvas::new(32, 16);
    canvas.set_paint_mode(PaintMode::Line);
    canvas.begin_stroke(Pos2::new(2.0, 8.0), PointerButton::Primary);
    canvas.extend_stroke(Pos2::new(28.0, 8.0));

    canvas.save(&path, "png").unwrap();
    let saved = image::open(&path).unwrap().to_rgb8();
    assert!(saved.pixels().all(|p| *p == WHITE));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_open_larger_image_grows_canvas_with_white_padding() {
    let path = temp_path("wide.png");
    RgbImage::from_pixel(30, 10, Rgb([0, 0, 255])).save(&path).unwrap();

    let mut canvas = Canvas::new(20, 20);
    canvas.open(&path).unwrap();

    assert_eq!(canvas.size(), (30, 20));
    assert_eq!(*canvas.snapshot().get_pixel(29, 9), Rgb([0, 0, 255]));
    assert_eq!(*canvas.snapshot().get_pixel(29, 10), WHITE);
    assert_eq!(canvas.overlay().dimensions(), (30, 20));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_open_resets_history() {
    let path = temp_path("reset.png");
    RgbImage::from_pixel(10, 10, Rgb([0, 255, 0])).save(&path).unwrap();

    let mut canvas = Canvas::new(10, 10);
    sketch(&mut canvas);
    canvas.undo();
    assert!(canvas.can_redo());

    canvas.open(&path).unwrap();
    assert!(!canvas.can_undo());
    assert!(!canvas.can_redo());
    assert_eq!(canvas.history().len(), 1);

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_open_flattens_transparency_onto_white() {
    let path = temp_path("alpha.png");
    let mut image = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
    image.put_pixel(1, 1, Rgba([10, 20, 30, 255]));
    image.save(&path).unwrap();

    let mut canvas = Canvas::new(4, 4);
    canvas.open(&path).unwrap();
    assert_eq!(*canvas.snapshot().get_pixel(0, 0), WHITE);
    assert_eq!(*canvas.snapshot().get_pixel(1, 1), Rgb([10, 20, 30]));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_failed_open_leaves_canvas_untouched() {
    let mut canvas = Canvas::new(32, 16);
    sketch(&mut canvas);
    let before = canvas.snapshot().clone();
    let history_len = canvas.history().len();

    let err = canvas.open(&temp_path("missing.png")).unwrap_err();
    assert!(matches!(err, PersistenceError::Decode { .. }));

    assert_eq!(canvas.snapshot(), &before);
    assert_eq!(canvas.history().len(), history_len);
    assert!(canvas.is_modified());
}

#[test]
fn test_open_rejects_garbage() {
    let path = temp_path("garbage.png");
    std::fs::write(&path, b"definitely not an image").unwrap();

    let mut canvas = Canvas::new(8, 8);
    assert!(matches!(canvas.open(&path), Err(PersistenceError::Decode { .. })));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_failed_save_keeps_modified_flag() {
    let path = temp_path("no_such_dir").join("out.png");
    let mut canvas = Canvas::new(8, 8);
    sketch(&mut canvas);

    let err = canvas.save(&path, "png").unwrap_err();
    assert!(matches!(err, PersistenceError::Encode { .. }));
    assert!(canvas.is_modified());
}

#[test]
fn test_save_unknown_format_writes_nothing() {
    let path = temp_path("unknown.doc");
    let mut canvas = Canvas::new(8, 8);
    sketch(&mut canvas);

    let err = canvas.save(&path, "doc").unwrap_err();
    assert!(matches!(err, PersistenceError::UnsupportedFormat(_)));
    assert!(!path.exists());
    assert!(canvas.is_modified());
}

#[test]
fn test_every_offered_format_saves() {
    let formats = supported_formats();
    for format in ["ff", "exr", "hdr"] {
        assert!(formats.contains(&format), "{format} missing from {formats:?}");
    }

    let mut canvas = Canvas::new(12, 8);
    sketch(&mut canvas);
    for format in formats {
        let path = temp_path(&format!("every_format.{format}"));
        canvas
            .save(&path, format)
            .unwrap_or_else(|err| panic!("saving as {format} failed: {err}"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).ok();
    }
}
