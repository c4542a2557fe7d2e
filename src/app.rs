use std::path::PathBuf;

use egui::{Color32, TextureHandle, TextureOptions};

use crate::canvas::{Canvas, FillState, PenState, PenStyle, Repaint};
use crate::config::BoardConfig;
use crate::input::{InputHandler, StrokeController};
use crate::persistence;
use crate::shape::PaintMode;

/// Pen and mode settings restored between runs.
/// We derive Deserialize/Serialize so we can persist them on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct Settings {
    pen: PenState,
    fill: FillState,
    mode: PaintMode,
    last_path: String,
    save_format: String,
}

/// What to do once the user has dealt with unsaved changes
#[derive(Debug, Clone, Copy, PartialEq)]
enum PendingAction {
    Open,
    Close,
}

pub struct PaintApp {
    canvas: Canvas,
    controller: StrokeController,
    input: InputHandler,
    config: BoardConfig,
    texture: Option<TextureHandle>,
    path: String,
    save_format: String,
    /// Formats offered by "Save As", checked once at startup
    save_formats: Vec<&'static str>,
    background: Color32,
    status: Option<String>,
    pending: Option<PendingAction>,
    allow_close: bool,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: BoardConfig) -> Self {
        let mut canvas = Canvas::from_config(&config);

        let settings: Option<Settings> = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY));
        let (path, save_format) = match settings {
            Some(settings) => {
                log::debug!("Restoring saved pen settings");
                canvas.set_pen(settings.pen);
                canvas.set_fill(settings.fill);
                canvas.set_paint_mode(settings.mode);
                (settings.last_path, settings.save_format)
            }
            None => (String::new(), String::new()),
        };
        let save_format = if save_format.is_empty() {
            config.default_save_format.clone()
        } else {
            save_format
        };

        Self {
            canvas,
            controller: StrokeController::new(),
            input: InputHandler::new(),
            config,
            texture: None,
            path,
            save_format,
            save_formats: persistence::supported_formats(),
            background: Color32::WHITE,
            status: None,
            pending: None,
            allow_close: false,
        }
    }

    fn open(&mut self) {
        let path = PathBuf::from(self.path.trim());
        match self.canvas.open(&path) {
            Ok(()) => {
                self.controller.cancel();
                self.status = Some(format!("Opened {}", path.display()));
            }
            Err(err) => {
                log::error!("{}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    /// Returns true when the file was written
    fn save(&mut self) -> bool {
        let path = PathBuf::from(self.path.trim());
        match self.canvas.save(&path, &self.save_format) {
            Ok(()) => {
                self.status = Some(format!("Saved {}", path.display()));
                true
            }
            Err(err) => {
                log::error!("{}", err);
                self.status = Some(err.to_string());
                false
            }
        }
    }

    /// Run `action` now, or ask first when there are unsaved changes
    fn request(&mut self, action: PendingAction, ctx: &egui::Context) {
        if self.canvas.is_modified() {
            self.ask_before(action);
        } else {
            self.perform(action, ctx);
        }
    }

    /// Show the unsaved-changes prompt. Input stops reaching the canvas while
    /// it is open, so a running stroke would never see its release.
    fn ask_before(&mut self, action: PendingAction) {
        self.controller.cancel();
        self.canvas.cancel_stroke();
        self.pending = Some(action);
    }

    fn perform(&mut self, action: PendingAction, ctx: &egui::Context) {
        match action {
            PendingAction::Open => self.open(),
            PendingAction::Close => {
                self.allow_close = true;
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, clear) = ctx.input_mut(|i| {
            (
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y),
                i.consume_key(egui::Modifiers::COMMAND, egui::Key::L),
            )
        });
        if undo {
            self.canvas.undo();
        }
        if redo {
            self.canvas.redo();
        }
        if clear {
            self.canvas.clear();
        }
    }

    fn file_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.label("File:");
            ui.add(egui::TextEdit::singleline(&mut self.path).desired_width(300.0));

            if ui.button("Open").clicked() {
                self.request(PendingAction::Open, ctx);
            }

            egui::ComboBox::from_id_salt("save_format")
                .selected_text(self.save_format.to_uppercase())
                .show_ui(ui, |ui| {
                    for format in &self.save_formats {
                        ui.selectable_value(&mut self.save_format, format.to_string(), format.to_uppercase());
                    }
                });
            if ui.button("Save As").clicked() {
                self.save();
            }

            if self.canvas.is_modified() {
                ui.label("● modified");
            }
            if let Some(status) = &self.status {
                ui.separator();
                ui.label(status);
            }
        });
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.separator();

        ui.horizontal(|ui| {
            if ui.add_enabled(self.canvas.can_undo(), egui::Button::new("⟲ Undo")).clicked() {
                self.canvas.undo();
            }
            if ui.add_enabled(self.canvas.can_redo(), egui::Button::new("⟳ Redo")).clicked() {
                self.canvas.redo();
            }
        });

        ui.separator();
        let mut mode = self.canvas.paint_mode();
        for candidate in PaintMode::all() {
            ui.selectable_value(&mut mode, *candidate, candidate.label());
        }
        self.canvas.set_paint_mode(mode);

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Primary:");
            let mut color = self.canvas.primary_color();
            if egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque)
                .changed()
            {
                self.canvas.set_primary_color(color);
            }
        });
        ui.horizontal(|ui| {
            ui.label("Secondary:");
            let mut color = self.canvas.secondary_color();
            if egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque)
                .changed()
            {
                self.canvas.set_secondary_color(color);
            }
        });

        ui.horizontal(|ui| {
            let mut enabled = self.canvas.is_fill_enabled();
            let mut color = self.canvas.fill_color();
            ui.checkbox(&mut enabled, "Fill:");
            egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque);
            if enabled {
                self.canvas.set_fill_color(color);
            } else {
                self.canvas.set_fill(FillState { enabled: false, color });
            }
        });

        ui.separator();
        ui.label("Pen width:");
        let mut width = self.canvas.pen_width();
        ui.horizontal_wrapped(|ui| {
            for preset in &self.config.pen_width_presets {
                ui.selectable_value(&mut width, *preset, format!("{preset} px"));
            }
        });
        ui.add(egui::Slider::new(&mut width, 1..=50).text("custom"));
        self.canvas.set_pen_width(width);

        let mut style = self.canvas.pen_style();
        egui::ComboBox::from_label("Style")
            .selected_text(style.label())
            .show_ui(ui, |ui| {
                for candidate in PenStyle::all() {
                    ui.selectable_value(&mut style, *candidate, candidate.label());
                }
            });
        self.canvas.set_pen_style(style);

        ui.separator();
        if ui.button("Clear Screen").clicked() {
            self.canvas.clear();
        }
        ui.horizontal(|ui| {
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut self.background,
                egui::color_picker::Alpha::Opaque,
            );
            if ui.button("Set Background").clicked() {
                self.canvas.set_background(self.background);
            }
        });
    }

    /// Push pending canvas changes into the GPU texture
    fn sync_texture(&mut self, ctx: &egui::Context) {
        let (width, height) = self.canvas.size();
        let size = [width as usize, height as usize];
        let repaint = self.canvas.take_repaint();

        let Some(texture) = &mut self.texture else {
            let image = egui::ColorImage::from_rgba_unmultiplied(size, self.canvas.composited().as_raw());
            self.texture = Some(ctx.load_texture("canvas", image, TextureOptions::NEAREST));
            return;
        };

        match repaint {
            Some(Repaint::Region(rect)) if texture.size() == size => {
                if let Some(([x, y], patch)) = self.canvas.composite_region(rect) {
                    let patch_size = [patch.width() as usize, patch.height() as usize];
                    let image = egui::ColorImage::from_rgba_unmultiplied(patch_size, patch.as_raw());
                    texture.set_partial([x as usize, y as usize], image, TextureOptions::NEAREST);
                }
            }
            Some(_) => {
                // Full repaint, or the canvas was resized by a load
                let image = egui::ColorImage::from_rgba_unmultiplied(size, self.canvas.composited().as_raw());
                texture.set(image, TextureOptions::NEAREST);
            }
            None => {}
        }
    }

    fn unsaved_changes_window(&mut self, ctx: &egui::Context) {
        let Some(action) = self.pending else {
            return;
        };

        egui::Window::new("Unsaved changes")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("The image has been modified.\nDo you want to save your changes?");
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() && self.save() {
                        self.pending = None;
                        self.perform(action, ctx);
                    }
                    if ui.button("Discard").clicked() {
                        self.pending = None;
                        self.perform(action, ctx);
                    }
                    if ui.button("Cancel").clicked() {
                        self.pending = None;
                    }
                });
            });
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = Settings {
            pen: self.canvas.pen().clone(),
            fill: *self.canvas.fill(),
            mode: self.canvas.paint_mode(),
            last_path: self.path.clone(),
            save_format: self.save_format.clone(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) && !self.allow_close && self.canvas.is_modified() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.ask_before(PendingAction::Close);
        }

        if self.pending.is_none() {
            self.handle_shortcuts(ctx);
        }

        egui::TopBottomPanel::top("file_bar").show(ctx, |ui| {
            self.file_bar(ui, ctx);
        });

        egui::SidePanel::left("tools_panel").show(ctx, |ui| {
            self.tools_panel(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let (width, height) = self.canvas.size();
                let (response, painter) = ui.allocate_painter(
                    egui::vec2(width as f32, height as f32),
                    egui::Sense::click_and_drag(),
                );
                let rect = response.rect;

                if self.pending.is_none() {
                    let events = self.input.process_input(ctx, &response);
                    self.controller.handle_events(&events, &mut self.canvas);
                }

                self.sync_texture(ctx);
                if let Some(texture) = &self.texture {
                    painter.image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        Color32::WHITE,
                    );
                }
                if response.hovered() {
                    ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
                }
            });
        });

        self.unsaved_changes_window(ctx);
    }
}
