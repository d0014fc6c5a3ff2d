//! Chart Viewer Widget
//! Analysis tab: emotion bar chart, legend, summary table and PNG export.

use crate::charts::ChartPlotter;
use crate::data::{AttributePalette, ChartRow};
use crate::stats::EmotionSummary;
use egui::{Color32, RichText, ScrollArea};

/// Actions triggered from the analysis tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartViewerAction {
    None,
    ExportPng,
}

/// Holds the rows currently charted and their cached summary.
#[derive(Default)]
pub struct ChartViewer {
    rows: Vec<ChartRow>,
    summary: Option<EmotionSummary>,
    pub export_status: Option<String>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the charted rows. Summary is recomputed only on change.
    pub fn set_rows(&mut self, rows: &[ChartRow]) {
        if self.rows != rows {
            self.rows = rows.to_vec();
            self.summary = EmotionSummary::from_rows(&self.rows);
        }
    }

    pub fn rows(&self) -> &[ChartRow] {
        &self.rows
    }

    pub fn summary(&self) -> Option<&EmotionSummary> {
        self.summary.as_ref()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, palette: &AttributePalette) -> ChartViewerAction {
        let mut action = ChartViewerAction::None;

        ui.horizontal(|ui| {
            ui.heading("感情チャート");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled_ui(!self.rows.is_empty(), |ui| {
                    if ui.button("🖼 PNG出力").clicked() {
                        action = ChartViewerAction::ExportPng;
                    }
                });
            });
        });
        if let Some(status) = &self.export_status {
            ui.label(RichText::new(status).size(11.0).color(Color32::GRAY));
        }
        ui.add_space(6.0);

        if self.rows.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return action;
        }

        ChartPlotter::draw_legend(ui, palette);
        ui.add_space(8.0);

        ScrollArea::vertical()
            .id_salt("analysis")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ChartPlotter::draw_emotion_chart(ui, &self.rows, palette);
                ui.add_space(12.0);
                if let Some(summary) = self.summary() {
                    ui.label(RichText::new("感情サマリー").size(14.0).strong());
                    ChartPlotter::draw_summary_table(ui, summary);
                }
            });

        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, emotion: i64) -> ChartRow {
        ChartRow {
            label: label.into(),
            emotion,
            content: String::new(),
            attribute: String::new(),
        }
    }

    #[test]
    fn summary_follows_rows() {
        let mut viewer = ChartViewer::new();
        assert!(viewer.summary().is_none());

        viewer.set_rows(&[row("P1-1", 2), row("P1-2", 6)]);
        assert_eq!(viewer.rows().len(), 2);
        assert_eq!(viewer.summary().map(|s| s.overall.mean), Some(4.0));

        viewer.set_rows(&[]);
        assert!(viewer.summary().is_none());
    }
}
