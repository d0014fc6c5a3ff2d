//! Settings window: canvas size and the per-generator API keys.

use crate::config::{MAX_CANVAS_SIDE, MIN_CANVAS_SIDE};
use crate::dify::GenerationKind;
use crate::session::Session;

/// Canvas size used for PNG export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

pub fn show_settings_window(
    ctx: &egui::Context,
    open: &mut bool,
    canvas: &mut CanvasSize,
    session: &mut Session,
    strict: &mut bool,
) {
    egui::Window::new("設定")
        .open(open)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label("幅");
                    ui.add(
                        egui::DragValue::new(&mut canvas.width)
                            .range(MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE),
                    );
                    ui.end_row();

                    ui.label("高さ");
                    ui.add(
                        egui::DragValue::new(&mut canvas.height)
                            .range(MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE),
                    );
                    ui.end_row();

                    for kind in GenerationKind::ALL {
                        ui.label(format!("{} API Key", kind.title()));
                        ui.add(
                            egui::TextEdit::singleline(session.api_keys.get_mut(kind))
                                .password(true)
                                .desired_width(240.0),
                        );
                        ui.end_row();
                    }

                    ui.label("コマ数を検証");
                    ui.checkbox(strict, "num_of_panels と実際のコマ数の一致を要求");
                    ui.end_row();
                });
        });
}
