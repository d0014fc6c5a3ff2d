//! Koma-wari Converter - comic panel drafting & emotion chart viewer
//!
//! Drafts story material, punchlines and paneled-comic scripts through a Dify
//! completion endpoint, and previews the resulting panel JSON as page cards
//! and a per-panel emotion bar chart.

mod charts;
mod config;
mod data;
mod dify;
mod gui;
mod session;
mod stats;

use anyhow::Context;
use config::AppConfig;
use eframe::egui;
use gui::KomaWariApp;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("koma_wari=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(endpoint = %config.endpoint, "starting koma-wari converter");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("コマ割りコンバーター"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Koma-wari Converter",
        options,
        Box::new(|cc| Ok(Box::new(KomaWariApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
