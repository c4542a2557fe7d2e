#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use drawing_board::{BoardConfig, PaintApp};

/// Room around the canvas for the tool panel and file bar
const CHROME_WIDTH: f32 = 240.0;
const CHROME_HEIGHT: f32 = 60.0;

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = BoardConfig::from_env();
    log::info!("Starting with a {}x{} canvas", config.width, config.height);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Drawing Board")
            .with_inner_size([
                config.width as f32 + CHROME_WIDTH,
                config.height as f32 + CHROME_HEIGHT,
            ]),
        ..Default::default()
    };

    eframe::run_native(
        "drawing_board",
        native_options,
        Box::new(move |cc| Ok(Box::new(PaintApp::new(cc, config)))),
    )
}
