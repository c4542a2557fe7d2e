#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod input;
pub mod persistence;
pub mod raster;
pub mod shape;

pub use app::PaintApp;
pub use canvas::{Canvas, FillState, PenState, PenStyle, Repaint};
pub use config::BoardConfig;
pub use error::{ConfigError, PersistenceError};
pub use history::HistoryRing;
pub use input::{ControllerState, InputEvent, InputHandler, StrokeController};
pub use shape::{PaintMode, Shape};
