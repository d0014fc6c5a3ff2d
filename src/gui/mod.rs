//! GUI module - User interface components

mod app;
mod chart_viewer;
mod generation_panel;
mod notice;
mod preview_panel;
mod settings;

pub use app::KomaWariApp;
