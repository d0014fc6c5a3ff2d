//! Preview Panel Widget
//! JSON input editor and the rendered page/panel preview.

use crate::data::{Page, PreviewConverter, NO_ATTRIBUTE_LABEL};
use egui::{Color32, RichText, ScrollArea};

const ERROR_RED: Color32 = Color32::from_rgb(220, 53, 69);
const PANEL_CARD_WIDTH: f32 = 260.0;

/// JSON editor bound to the converter. Returns true when the text changed.
pub fn show_json_editor(ui: &mut egui::Ui, converter: &mut PreviewConverter) -> bool {
    ui.label(RichText::new("JSON入力").strong());
    let response = ui.add(
        egui::TextEdit::multiline(converter.input_mut())
            .code_editor()
            .hint_text("コマ割りJSONを貼り付けてください...")
            .desired_rows(10)
            .desired_width(f32::INFINITY),
    );

    let error = &converter.state().error;
    if !error.is_empty() {
        ui.label(RichText::new(error).color(ERROR_RED));
    }
    response.changed()
}

/// Page cards for the current preview.
pub fn show_pages(ui: &mut egui::Ui, pages: &[Page]) {
    ui.heading("プレビュー");
    ui.add_space(6.0);

    if pages.is_empty() {
        ui.label(RichText::new("プレビューなし").color(Color32::GRAY));
        return;
    }

    ScrollArea::vertical()
        .id_salt("preview_pages")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (page_idx, page) in pages.iter().enumerate() {
                draw_page_card(ui, page_idx, page);
                ui.add_space(10.0);
            }
        });
}

fn draw_page_card(ui: &mut egui::Ui, page_idx: usize, page: &Page) {
    egui::Frame::none()
        .rounding(8.0)
        .stroke(egui::Stroke::new(1.0, Color32::from_gray(110)))
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.label(RichText::new(format!("ページ {}", page.page)).size(16.0).strong());
            ui.label(format!("コマ数: {}", page.num_of_panels));
            ui.add_space(6.0);

            ui.horizontal_wrapped(|ui| {
                for (idx, panel) in page.panels.iter().enumerate() {
                    ui.push_id((page_idx, idx), |ui| {
                        egui::Frame::none()
                            .rounding(5.0)
                            .stroke(egui::Stroke::new(1.0, Color32::from_gray(80)))
                            .inner_margin(8.0)
                            .show(ui, |ui| {
                                ui.set_width(PANEL_CARD_WIDTH);
                                ui.vertical(|ui| {
                                    ui.label(RichText::new(format!("コマ {}", idx + 1)).strong());
                                    field(ui, "内容", &panel.content);
                                    field(ui, "ショット", &panel.shot);
                                    field(ui, "目的", &panel.aim);
                                    field(ui, "セリフ", &panel.dialogue);
                                    if !panel.prompt.is_empty() {
                                        field(ui, "プロンプト", &panel.prompt);
                                    }
                                    let attribute = if panel.attribute.is_empty() {
                                        NO_ATTRIBUTE_LABEL
                                    } else {
                                        panel.attribute.as_str()
                                    };
                                    field(ui, "属性", attribute);
                                    field(ui, "感情", &panel.emotion.to_string());
                                });
                            });
                    });
                }
            });
        });
}

fn field(ui: &mut egui::Ui, name: &str, value: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new(format!("{}:", name)).strong());
        ui.label(value);
    });
}
