use drawing_board::{Canvas, PaintMode, PenStyle};
use egui::{Color32, PointerButton, Pos2};
use image::Rgb;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);

fn drag(canvas: &mut Canvas, from: (f32, f32), to: (f32, f32)) {
    let (from, to) = (Pos2::new(from.0, from.1), Pos2::new(to.0, to.1));
    assert!(canvas.begin_stroke(from, PointerButton::Primary));
    canvas.extend_stroke(to);
    canvas.end_stroke(to);
}

#[test]
fn test_freehand_paints_directly_into_snapshot() {
    let mut canvas = Canvas::new(50, 30);
    canvas.begin_stroke(Pos2::new(5.0, 10.0), PointerButton::Primary);
    canvas.extend_stroke(Pos2::new(25.0, 10.0));

    assert_eq!(*canvas.snapshot().get_pixel(15, 10), BLACK);
    assert!(canvas.overlay().pixels().all(|p| p[3] == 0));
}

#[test]
fn test_shape_preview_stays_out_of_snapshot_until_commit() {
    let mut canvas = Canvas::new(50, 40);
    canvas.set_paint_mode(PaintMode::Line);

    canvas.begin_stroke(Pos2::new(5.0, 10.0), PointerButton::Primary);
    canvas.extend_stroke(Pos2::new(30.0, 10.0));
    assert_eq!(*canvas.snapshot().get_pixel(20, 10), WHITE);
    assert_eq!(canvas.overlay().get_pixel(20, 10)[3], 255);
    assert!(!canvas.is_modified());

    // Moving the end point replaces the preview instead of adding to it
    canvas.extend_stroke(Pos2::new(5.0, 30.0));
    assert_eq!(canvas.overlay().get_pixel(20, 10)[3], 0);
    assert_eq!(canvas.overlay().get_pixel(5, 20)[3], 255);

    canvas.end_stroke(Pos2::new(5.0, 30.0));
    assert_eq!(*canvas.snapshot().get_pixel(5, 20), BLACK);
    assert_eq!(*canvas.snapshot().get_pixel(20, 10), WHITE);
    assert!(canvas.overlay().pixels().all(|p| p[3] == 0));
    assert!(canvas.is_modified());
}

#[test]
fn test_rectangle_dragged_backwards_is_normalized_and_filled() {
    let mut canvas = Canvas::new(50, 40);
    canvas.set_paint_mode(PaintMode::Rectangle);
    canvas.set_fill_color(Color32::RED);

    drag(&mut canvas, (30.0, 25.0), (10.0, 10.0));

    let snapshot = canvas.snapshot();
    assert_eq!(*snapshot.get_pixel(10, 10), BLACK);
    assert_eq!(*snapshot.get_pixel(30, 25), BLACK);
    assert_eq!(*snapshot.get_pixel(20, 17), RED);
    assert_eq!(*snapshot.get_pixel(5, 5), WHITE);
    assert_eq!(*snapshot.get_pixel(35, 17), WHITE);
}

#[test]
fn test_circle_spans_the_drag() {
    let mut canvas = Canvas::new(50, 40);
    canvas.set_paint_mode(PaintMode::Circle);

    drag(&mut canvas, (10.0, 20.0), (30.0, 20.0));

    let snapshot = canvas.snapshot();
    assert_eq!(*snapshot.get_pixel(10, 20), BLACK);
    assert_eq!(*snapshot.get_pixel(30, 20), BLACK);
    // No fill by default
    assert_eq!(*snapshot.get_pixel(20, 20), WHITE);
    assert_eq!(*snapshot.get_pixel(40, 20), WHITE);
}

#[test]
fn test_fill_only_applies_to_closed_shapes() {
    let mut canvas = Canvas::new(50, 40);
    canvas.set_paint_mode(PaintMode::Line);
    canvas.set_fill_color(Color32::RED);

    drag(&mut canvas, (5.0, 5.0), (40.0, 35.0));
    assert!(canvas.snapshot().pixels().all(|p| *p != RED));
}

#[test]
fn test_dashed_line_leaves_gaps() {
    let mut canvas = Canvas::new(50, 20);
    canvas.set_paint_mode(PaintMode::Line);
    canvas.set_pen_style(PenStyle::Dashed);

    drag(&mut canvas, (0.0, 10.0), (40.0, 10.0));

    let snapshot = canvas.snapshot();
    assert_eq!(*snapshot.get_pixel(1, 10), BLACK);
    assert_eq!(*snapshot.get_pixel(5, 10), WHITE);
    assert_eq!(*snapshot.get_pixel(7, 10), BLACK);
    assert_eq!(*snapshot.get_pixel(11, 10), WHITE);
}

#[test]
fn test_wide_pen_covers_its_width() {
    let mut canvas = Canvas::new(50, 30);
    canvas.set_pen_width(6);
    drag(&mut canvas, (10.0, 15.0), (40.0, 15.0));

    let snapshot = canvas.snapshot();
    assert_eq!(*snapshot.get_pixel(25, 12), BLACK);
    assert_eq!(*snapshot.get_pixel(25, 18), BLACK);
    assert_eq!(*snapshot.get_pixel(25, 20), WHITE);
}

#[test]
fn test_set_background_is_undoable() {
    let mut canvas = Canvas::new(20, 20);
    drag(&mut canvas, (2.0, 2.0), (10.0, 2.0));

    canvas.set_background(Color32::RED);
    assert!(canvas.snapshot().pixels().all(|p| *p == RED));
    assert!(canvas.is_modified());

    assert!(canvas.undo());
    assert_eq!(*canvas.snapshot().get_pixel(5, 2), BLACK);
    assert_eq!(*canvas.snapshot().get_pixel(5, 10), WHITE);
}

#[test]
fn test_clear_resets_to_white() {
    let mut canvas = Canvas::new(20, 20);
    canvas.set_background(Color32::RED);
    drag(&mut canvas, (2.0, 2.0), (10.0, 2.0));

    canvas.clear();
    assert!(canvas.snapshot().pixels().all(|p| *p == WHITE));
    assert!(canvas.can_undo());
}

#[test]
fn test_modes_can_switch_between_strokes() {
    let mut canvas = Canvas::new(50, 40);
    canvas.set_paint_mode(PaintMode::Rectangle);
    drag(&mut canvas, (5.0, 5.0), (15.0, 15.0));

    canvas.set_paint_mode(PaintMode::Freehand);
    drag(&mut canvas, (30.0, 30.0), (40.0, 30.0));

    assert_eq!(*canvas.snapshot().get_pixel(5, 10), BLACK);
    assert_eq!(*canvas.snapshot().get_pixel(35, 30), BLACK);
    assert_eq!(canvas.history().len(), 3);
}
