//! Static Chart Renderer
//! Renders the emotion bar chart to a PNG at the configured canvas size.
//!
//! Layout:
//! 1. Caption centered at the top
//! 2. One horizontal bar per chart row, first row at the top
//! 3. Emotion axis along the bottom, row labels on the left

use crate::config::{MAX_CANVAS_SIDE, MIN_CANVAS_SIDE};
use crate::data::{AttributePalette, ChartRow};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

const CAPTION: &str = "感情チャート";
const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No chart rows to render")]
    EmptyChart,
    #[error("Render error: {0}")]
    Render(String),
    #[error("PNG encode error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Write error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Clamp a requested canvas to the supported size range.
    pub fn canvas_size(width: u32, height: u32) -> (u32, u32) {
        (
            width.clamp(MIN_CANVAS_SIDE, MAX_CANVAS_SIDE),
            height.clamp(MIN_CANVAS_SIDE, MAX_CANVAS_SIDE),
        )
    }

    /// Emotion axis range, always including zero, padded by 10%.
    pub fn value_range(rows: &[ChartRow]) -> (f64, f64) {
        let min = rows.iter().map(|r| r.emotion).min().unwrap_or(0).min(0) as f64;
        let max = rows.iter().map(|r| r.emotion).max().unwrap_or(0).max(0) as f64;
        let pad = ((max - min) * 0.1).max(1.0);
        (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
    }

    /// Render to an RGB pixel buffer of `width * height * 3` bytes.
    pub fn render_rgb(
        rows: &[ChartRow],
        palette: &AttributePalette,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        if rows.is_empty() {
            return Err(ExportError::EmptyChart);
        }
        let render_err = |e: &dyn std::fmt::Display| ExportError::Render(e.to_string());

        let n = rows.len();
        let (x_min, x_max) = Self::value_range(rows);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(|e| render_err(&e))?;

            let label_width = (width / 8).clamp(60, 160);
            let mut chart = ChartBuilder::on(&root)
                .caption(CAPTION, (FONT, 28))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(label_width)
                .build_cartesian_2d(x_min..x_max, (0..n).into_segmented())
                .map_err(|e| render_err(&e))?;

            // Segment 0 sits at the bottom; flip so the first row is on top.
            let y_label = |v: &SegmentValue<usize>| match v {
                SegmentValue::CenterOf(i) if *i < n => rows[n - 1 - *i].label.clone(),
                _ => String::new(),
            };
            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_labels(n)
                .y_label_formatter(&y_label)
                .x_desc("感情")
                .axis_desc_style((FONT, 16))
                .draw()
                .map_err(|e| render_err(&e))?;

            chart
                .draw_series(rows.iter().enumerate().map(|(i, row)| {
                    let slot = n - 1 - i;
                    let c = palette.color_for(&row.attribute);
                    let mut bar = Rectangle::new(
                        [
                            (0.0, SegmentValue::Exact(slot)),
                            (row.emotion as f64, SegmentValue::Exact(slot + 1)),
                        ],
                        RGBColor(c.r(), c.g(), c.b()).filled(),
                    );
                    bar.set_margin(4, 4, 0, 0);
                    bar
                }))
                .map_err(|e| render_err(&e))?;

            root.present().map_err(|e| render_err(&e))?;
        }

        Ok(buffer)
    }

    /// Render to PNG bytes.
    pub fn render_png(
        rows: &[ChartRow],
        palette: &AttributePalette,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, ExportError> {
        let (width, height) = Self::canvas_size(width, height);
        let rgb = Self::render_rgb(rows, palette, width, height)?;
        let image = image::RgbImage::from_raw(width, height, rgb)
            .ok_or_else(|| ExportError::Render("pixel buffer size mismatch".to_string()))?;

        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render and write a PNG file.
    pub fn save_png(
        rows: &[ChartRow],
        palette: &AttributePalette,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<(), ExportError> {
        let bytes = Self::render_png(rows, palette, width, height)?;
        std::fs::write(path, bytes)?;
        tracing::info!(path = %path.display(), width, height, "exported emotion chart");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn row(emotion: i64) -> ChartRow {
        ChartRow {
            label: "P1-1".into(),
            emotion,
            content: String::new(),
            attribute: String::new(),
        }
    }

    #[test]
    fn range_includes_zero_and_pads() {
        assert_eq!(StaticChartRenderer::value_range(&[row(3), row(8)]), (0.0, 9.0));
        assert_eq!(
            StaticChartRenderer::value_range(&[row(-10), row(10)]),
            (-12.0, 12.0)
        );
        assert_eq!(StaticChartRenderer::value_range(&[row(0)]), (0.0, 1.0));
    }

    #[test]
    fn canvas_is_clamped() {
        assert_eq!(StaticChartRenderer::canvas_size(960, 1280), (960, 1280));
        assert_eq!(StaticChartRenderer::canvas_size(1, 100_000), (64, 8192));
    }

    #[test]
    fn png_matches_clamped_canvas() {
        let attributes = ["ヒキ", "メクリ", "", "キメ", "未知"];
        let rows: Vec<ChartRow> = attributes
            .iter()
            .enumerate()
            .map(|(i, attribute)| ChartRow {
                label: format!("P1-{}", i + 1),
                emotion: i as i64 * 3 - 5,
                content: String::new(),
                attribute: attribute.to_string(),
            })
            .collect();
        let palette = AttributePalette::default();

        for (width, height) in [(960, 1280), (64, 64), (10, 2_000)] {
            let bytes = StaticChartRenderer::render_png(&rows, &palette, width, height).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!(
                (decoded.width(), decoded.height()),
                StaticChartRenderer::canvas_size(width, height)
            );
        }
    }

    #[test]
    fn many_rows_fit_a_small_canvas() {
        let rows: Vec<ChartRow> = (0..500).map(|i| row(i % 21 - 10)).collect();
        let bytes =
            StaticChartRenderer::render_png(&rows, &AttributePalette::default(), 200, 200).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 200));
    }

    #[test]
    fn empty_chart_is_not_rendered() {
        assert_matches!(
            StaticChartRenderer::render_png(&[], &AttributePalette::default(), 960, 1280),
            Err(ExportError::EmptyChart)
        );
    }
}
