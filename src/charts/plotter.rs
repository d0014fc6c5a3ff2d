//! Chart Plotter Module
//! Interactive horizontal emotion bar chart using egui_plot.

use crate::data::{AttributePalette, ChartRow, NO_ATTRIBUTE_LABEL};
use crate::stats::EmotionSummary;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Plot};

const BAR_WIDTH: f64 = 0.6;
const ROW_HEIGHT: f32 = 28.0;
const MIN_CHART_HEIGHT: f32 = 400.0;

/// Draws the emotion chart and its summary table.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Bar position on the category axis. First row is drawn at the top.
    pub fn row_position(index: usize) -> f64 {
        -(index as f64)
    }

    /// Inverse of [`Self::row_position`] for axis labels and hover lookups.
    pub fn row_index(position: f64) -> Option<usize> {
        let idx = (-position).round();
        (idx >= 0.0 && (idx - (-position)).abs() < 1e-6).then_some(idx as usize)
    }

    /// Hover text for one row.
    pub fn tooltip(row: &ChartRow) -> String {
        let attribute = if row.attribute.is_empty() {
            NO_ATTRIBUTE_LABEL
        } else {
            row.attribute.as_str()
        };
        format!(
            "{}\n感情: {}\n内容: {}\n属性: {}",
            row.label, row.emotion, row.content, attribute
        )
    }

    pub fn draw_emotion_chart(ui: &mut egui::Ui, rows: &[ChartRow], palette: &AttributePalette) {
        let bars: Vec<Bar> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(Self::row_position(i), row.emotion as f64)
                    .width(BAR_WIDTH)
                    .name(&row.label)
                    .fill(palette.color_for(&row.attribute))
                    .stroke(egui::Stroke::new(1.0, Color32::from_gray(120)))
            })
            .collect();

        let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
        let tooltip_rows = rows.to_vec();
        let height = (rows.len() as f32 * ROW_HEIGHT).max(MIN_CHART_HEIGHT);

        let chart = BarChart::new(bars)
            .horizontal()
            .name("感情")
            .element_formatter(Box::new(move |bar: &Bar, _chart: &BarChart| {
                Self::row_index(bar.argument)
                    .and_then(|i| tooltip_rows.get(i))
                    .map(Self::tooltip)
                    .unwrap_or_default()
            }));

        Plot::new("emotion_chart")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_grid([true, false])
            .x_axis_label("感情")
            .y_axis_formatter(move |mark, _range| {
                Self::row_index(mark.value)
                    .and_then(|i| labels.get(i).cloned())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
            });
    }

    /// Color swatches for each known attribute plus the untagged color.
    pub fn draw_legend(ui: &mut egui::Ui, palette: &AttributePalette) {
        ui.horizontal_wrapped(|ui| {
            let entries = palette
                .entries()
                .into_iter()
                .chain(std::iter::once((NO_ATTRIBUTE_LABEL, palette.fallback())));
            for (label, color) in entries {
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 3.0, color);
                ui.label(RichText::new(label).size(12.0));
                ui.add_space(10.0);
            }
        });
    }

    /// Statistics table
    pub fn draw_summary_table(ui: &mut egui::Ui, summary: &EmotionSummary) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("emotion_summary")
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["属性", "N", "平均", "中央値", "標準偏差", "最小", "最大"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        for stats in std::iter::once(&summary.overall).chain(&summary.by_attribute)
                        {
                            ui.label(RichText::new(&stats.group_name).size(11.0));
                            ui.label(RichText::new(stats.count.to_string()).size(11.0));
                            for value in [stats.mean, stats.median, stats.std, stats.min, stats.max] {
                                ui.label(RichText::new(Self::format_stat(value)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn format_stat(value: f64) -> String {
        if value.is_finite() {
            format!("{:.2}", value)
        } else {
            "-".to_string()
        }
    }
}
