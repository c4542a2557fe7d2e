//! The drawing surface: current bitmap, preview overlay, pen state and history.

use std::path::Path;

use egui::{Color32, PointerButton, Pos2, Rect};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::config::BoardConfig;
use crate::error::PersistenceResult;
use crate::geometry::{calculate_bounds, clip_to_size, damage_padding};
use crate::history::{DEFAULT_CAPACITY, HistoryRing};
use crate::persistence;
use crate::raster::{self, TRANSPARENT};
use crate::shape::PaintMode;

pub mod pen;
pub use pen::{FillState, PenState, PenStyle};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Region of the canvas the shell has to redraw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repaint {
    Region(Rect),
    Full,
}

impl Repaint {
    /// Combine two pending repaints into one that covers both
    pub fn merge(self, other: Repaint) -> Repaint {
        match (self, other) {
            (Repaint::Region(a), Repaint::Region(b)) => Repaint::Region(a.union(b)),
            _ => Repaint::Full,
        }
    }
}

/// State of one press-drag-release interaction
#[derive(Debug, Clone, Copy)]
struct StrokeSession {
    anchor: Pos2,
    /// Most recent freehand sample
    last: Pos2,
    /// Padded bounds of the shape currently in the overlay
    preview: Option<Rect>,
    /// Freehand pixels already went into the snapshot
    painted: bool,
}

/// Raster canvas with a bounded undo history.
///
/// The bitmap on display is always the history's current snapshot. Freehand
/// strokes paint into it directly; shapes are previewed in a transparent
/// overlay and only composited into the snapshot when the stroke ends.
pub struct Canvas {
    history: HistoryRing<RgbImage>,
    overlay: RgbaImage,
    /// Minimum canvas size, used when loading smaller images
    viewport: (u32, u32),
    pen: PenState,
    fill: FillState,
    mode: PaintMode,
    session: Option<StrokeSession>,
    modified: bool,
    repaint: Option<Repaint>,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("size", &self.size())
            .field("viewport", &self.viewport)
            .field("history", &format!("<{} of {} snapshots>", self.history.cursor() + 1, self.history.len()))
            .field("pen", &self.pen)
            .field("fill", &self.fill)
            .field("mode", &self.mode)
            .field("stroking", &self.session.is_some())
            .field("modified", &self.modified)
            .finish()
    }
}

impl Canvas {
    /// Creates a white canvas with the default history depth
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_capacity(width, height, DEFAULT_CAPACITY)
    }

    /// Creates a white canvas keeping at most `capacity` snapshots
    pub fn with_capacity(width: u32, height: u32, capacity: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            history: HistoryRing::new(RgbImage::from_pixel(width, height, WHITE), capacity),
            overlay: RgbaImage::from_pixel(width, height, TRANSPARENT),
            viewport: (width, height),
            pen: PenState::default(),
            fill: FillState::default(),
            mode: PaintMode::default(),
            session: None,
            modified: false,
            repaint: Some(Repaint::Full),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let mut canvas = Self::with_capacity(config.width, config.height, config.history_capacity);
        canvas.pen.primary = config.primary_color;
        canvas.pen.secondary = config.secondary_color;
        canvas.pen.color = config.primary_color;
        canvas.pen.set_width(config.pen_width);
        canvas
    }

    // --- Accessors ---

    pub fn width(&self) -> u32 {
        self.snapshot().width()
    }

    pub fn height(&self) -> u32 {
        self.snapshot().height()
    }

    pub fn size(&self) -> (u32, u32) {
        self.snapshot().dimensions()
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Change the minimum size used by the next load. The current bitmap is untouched.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    /// The bitmap on display
    pub fn snapshot(&self) -> &RgbImage {
        self.history.current()
    }

    /// The preview layer drawn on top of the snapshot
    pub fn overlay(&self) -> &RgbaImage {
        &self.overlay
    }

    pub fn history(&self) -> &HistoryRing<RgbImage> {
        &self.history
    }

    /// Snapshot with the overlay blended on top, as the shell should show it
    pub fn composited(&self) -> RgbaImage {
        let (width, height) = self.size();
        self.composite_pixels(0, 0, width, height)
    }

    /// Snapshot-then-overlay pixels under `rect`, clipped to the canvas.
    /// Returns the patch's top-left pixel and the patch.
    pub fn composite_region(&self, rect: Rect) -> Option<([u32; 2], RgbaImage)> {
        let (width, height) = self.size();
        let rect = clip_to_size(rect, width, height)?;
        let x0 = rect.min.x.floor() as u32;
        let y0 = rect.min.y.floor() as u32;
        let x1 = (rect.max.x.ceil() as u32).min(width);
        let y1 = (rect.max.y.ceil() as u32).min(height);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(([x0, y0], self.composite_pixels(x0, y0, x1 - x0, y1 - y0)))
    }

    fn composite_pixels(&self, x0: u32, y0: u32, width: u32, height: u32) -> RgbaImage {
        let snapshot = self.snapshot();
        RgbaImage::from_fn(width, height, |x, y| {
            let (x, y) = (x0 + x, y0 + y);
            let Rgb([r, g, b]) = raster::blend(*snapshot.get_pixel(x, y), *self.overlay.get_pixel(x, y));
            Rgba([r, g, b, 255])
        })
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn is_stroking(&self) -> bool {
        self.session.is_some()
    }

    /// Drain the region that changed since the last call
    pub fn take_repaint(&mut self) -> Option<Repaint> {
        self.repaint.take()
    }

    fn request_repaint(&mut self, repaint: Repaint) {
        self.repaint = Some(match self.repaint {
            Some(pending) => pending.merge(repaint),
            None => repaint,
        });
    }

    // --- Pen configuration ---

    pub fn pen(&self) -> &PenState {
        &self.pen
    }

    /// Replace colours, width and style at once (e.g. restoring saved settings)
    pub fn set_pen(&mut self, pen: PenState) {
        let width = pen.width;
        self.pen = pen;
        self.pen.set_width(width);
    }

    pub fn fill(&self) -> &FillState {
        &self.fill
    }

    pub fn set_fill(&mut self, fill: FillState) {
        self.fill = fill;
    }

    pub fn primary_color(&self) -> Color32 {
        self.pen.primary
    }

    pub fn set_primary_color(&mut self, color: Color32) {
        self.pen.primary = color;
    }

    pub fn secondary_color(&self) -> Color32 {
        self.pen.secondary
    }

    pub fn set_secondary_color(&mut self, color: Color32) {
        self.pen.secondary = color;
    }

    pub fn pen_width(&self) -> u32 {
        self.pen.width
    }

    /// Set the pen width in pixels. Zero is raised to one.
    pub fn set_pen_width(&mut self, width: u32) {
        self.pen.set_width(width);
    }

    pub fn pen_style(&self) -> PenStyle {
        self.pen.style
    }

    pub fn set_pen_style(&mut self, style: PenStyle) {
        self.pen.style = style;
    }

    pub fn fill_color(&self) -> Color32 {
        self.fill.color
    }

    pub fn is_fill_enabled(&self) -> bool {
        self.fill.enabled
    }

    /// Turn shape filling on with `color`
    pub fn set_fill_color(&mut self, color: Color32) {
        self.fill = FillState {
            enabled: true,
            color,
        };
    }

    /// Turn shape filling off. The colour is remembered.
    pub fn clear_fill(&mut self) {
        self.fill.enabled = false;
    }

    pub fn paint_mode(&self) -> PaintMode {
        self.mode
    }

    pub fn set_paint_mode(&mut self, mode: PaintMode) {
        self.mode = mode;
    }

    // --- Strokes ---

    /// Start a stroke at `point`.
    ///
    /// The primary button draws with the primary colour and the secondary
    /// button with the secondary colour. Other buttons, or a press while a
    /// stroke is already running, are ignored and return false. A new history
    /// slot is opened before any pixel changes.
    pub fn begin_stroke(&mut self, point: Pos2, button: PointerButton) -> bool {
        if self.session.is_some() {
            log::debug!("Ignoring {:?} press during an active stroke", button);
            return false;
        }
        let Some(color) = self.pen.color_for(button) else {
            return false;
        };

        self.history.capture_before_edit();
        self.pen.color = color;
        self.session = Some(StrokeSession {
            anchor: point,
            last: point,
            preview: None,
            painted: false,
        });
        log::debug!("Stroke started at {:?} in {:?} mode", point, self.mode);
        true
    }

    /// Continue the running stroke to `point`. Returns the damaged region.
    ///
    /// Freehand paints the segment from the previous sample into the snapshot.
    /// Shape modes redraw the whole shape from the anchor into the overlay and
    /// leave the snapshot alone.
    pub fn extend_stroke(&mut self, point: Pos2) -> Option<Rect> {
        let mut session = self.session.take()?;

        let damage = match self.mode.shape(session.anchor, point) {
            None => {
                let segment = [session.last, point];
                raster::stroke_polyline(
                    self.history.current_mut(),
                    &segment,
                    self.pen.width,
                    &[],
                    self.pen.color,
                );
                session.last = point;
                session.painted = true;
                calculate_bounds(&segment, damage_padding(self.pen.width))
            }
            Some(shape) => {
                let bounds = shape.damage_rect(self.pen.width);
                let damage = match session.preview {
                    Some(previous) => {
                        raster::clear_overlay_region(&mut self.overlay, previous);
                        previous.union(bounds)
                    }
                    None => bounds,
                };
                shape.rasterize(&mut self.overlay, &self.pen, &self.fill);
                session.preview = Some(bounds);
                damage
            }
        };
        self.session = Some(session);

        let (width, height) = self.size();
        let damage = clip_to_size(damage, width, height);
        if let Some(rect) = damage {
            self.request_repaint(Repaint::Region(rect));
        }
        damage
    }

    /// Finish the running stroke at `point`.
    ///
    /// Draws the final sample, then composites any shape preview permanently
    /// into the snapshot and clears the overlay. Marks the canvas modified.
    pub fn end_stroke(&mut self, point: Pos2) -> Option<Rect> {
        if self.session.is_none() {
            return None;
        }

        let damage = self.extend_stroke(point);
        if let Some(session) = self.session.take() {
            if session.preview.is_some() {
                raster::composite_over(self.history.current_mut(), &self.overlay);
                raster::clear_overlay(&mut self.overlay);
            }
        }

        self.modified = true;
        log::debug!("Stroke committed at {:?}", point);
        damage
    }

    /// Drop the running stroke without committing its shape preview.
    ///
    /// Freehand pixels already painted stay in the snapshot and count as a
    /// modification. Returns false when no stroke was running.
    pub fn cancel_stroke(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };

        if let Some(preview) = session.preview {
            raster::clear_overlay_region(&mut self.overlay, preview);
            self.request_repaint(Repaint::Region(preview));
        }
        if session.painted {
            self.modified = true;
        }
        log::debug!("Cancelled running stroke");
        true
    }

    // --- Whole-canvas edits ---

    /// Fill the whole canvas with `color` as a new undoable edit
    pub fn set_background(&mut self, color: Color32) {
        self.cancel_stroke();
        self.history.capture_before_edit();
        raster::clear_overlay(&mut self.overlay);
        raster::fill_all(self.history.current_mut(), color);
        self.modified = true;
        self.request_repaint(Repaint::Full);
    }

    /// Clear the canvas to white
    pub fn clear(&mut self) {
        self.set_background(Color32::WHITE);
    }

    // --- History ---

    /// Step back one snapshot. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.cancel_stroke();
        if !self.history.undo() {
            return false;
        }
        raster::clear_overlay(&mut self.overlay);
        self.request_repaint(Repaint::Full);
        true
    }

    /// Step forward one snapshot. Returns false when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.cancel_stroke();
        if !self.history.redo() {
            return false;
        }
        self.request_repaint(Repaint::Full);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Files ---

    /// Replace the canvas with `image`.
    ///
    /// The canvas grows to fit images larger than the viewport; the image sits
    /// at the top-left and any extra area is white. History starts over with
    /// this single snapshot and the canvas counts as unmodified.
    pub fn replace_image(&mut self, image: RgbImage) {
        let (viewport_width, viewport_height) = self.viewport;
        let width = image.width().max(viewport_width);
        let height = image.height().max(viewport_height);

        let bitmap = if image.dimensions() == (width, height) {
            image
        } else {
            let mut padded = RgbImage::from_pixel(width, height, WHITE);
            image::imageops::replace(&mut padded, &image, 0, 0);
            padded
        };

        self.session = None;
        self.history.reset(bitmap);
        self.overlay = RgbaImage::from_pixel(width, height, TRANSPARENT);
        self.modified = false;
        self.request_repaint(Repaint::Full);
    }

    /// Load an image file. On failure nothing about the canvas changes.
    pub fn open(&mut self, path: &Path) -> PersistenceResult<()> {
        let image = persistence::decode_image(path)?;
        log::info!(
            "Opened {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        self.replace_image(image);
        Ok(())
    }

    /// Write the current snapshot (not the history) to `path` in `format`.
    /// Clears the modified flag only on success.
    pub fn save(&mut self, path: &Path, format: &str) -> PersistenceResult<()> {
        persistence::encode_image(self.snapshot(), path, format)?;
        self.modified = false;
        log::info!("Saved {} as {}", path.display(), format);
        Ok(())
    }
}
