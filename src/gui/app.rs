//! Koma-wari Converter Main Application
//! Top bar, generator tabs, preview and analysis.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{AttributePalette, PreviewConverter};
use crate::dify::{DifyClient, GenerationKind, GenerationOutcome};
use crate::gui::chart_viewer::{ChartViewer, ChartViewerAction};
use crate::gui::generation_panel::{GenerationAction, GenerationPanel};
use crate::gui::notice::{show_error_banner, ToastKind, Toasts};
use crate::gui::preview_panel;
use crate::gui::settings::{show_settings_window, CanvasSize};
use crate::session::Session;
use egui::{Color32, RichText, ScrollArea};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

/// Fonts probed for Japanese glyphs when none is configured.
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    StoryAdaptation,
    PunchlineCreation,
    ComicStrip,
    Analysis,
}

impl Tab {
    const ALL: [Tab; 4] = [
        Tab::StoryAdaptation,
        Tab::PunchlineCreation,
        Tab::ComicStrip,
        Tab::Analysis,
    ];

    fn label(self) -> &'static str {
        match self {
            Tab::StoryAdaptation => "ストーリー転用",
            Tab::PunchlineCreation => "オチ作成",
            Tab::ComicStrip => "コマ割り",
            Tab::Analysis => "分析",
        }
    }
}

/// Main application window.
pub struct KomaWariApp {
    client: DifyClient,
    palette: AttributePalette,
    session: Session,
    generation_panel: GenerationPanel,
    converter: PreviewConverter,
    chart_viewer: ChartViewer,
    toasts: Toasts,

    tab: Tab,
    settings_open: bool,
    canvas: CanvasSize,
    strict_panel_count: bool,

    // Finished requests from worker threads
    outcome_tx: Sender<GenerationOutcome>,
    outcome_rx: Receiver<GenerationOutcome>,
}

impl KomaWariApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        install_cjk_font(&cc.egui_ctx, config.cjk_font.as_deref());

        let mut session = Session::new();
        for kind in GenerationKind::ALL {
            *session.api_keys.get_mut(kind) = config.api_key(kind).to_string();
        }

        let (outcome_tx, outcome_rx) = channel();

        Self {
            client: DifyClient::new(&config.endpoint, &config.user),
            palette: config.palette.clone(),
            session,
            generation_panel: GenerationPanel::new(),
            converter: PreviewConverter::new(config.strict_panel_count),
            chart_viewer: ChartViewer::new(),
            toasts: Toasts::default(),
            tab: Tab::StoryAdaptation,
            settings_open: false,
            canvas: CanvasSize {
                width: config.canvas_width,
                height: config.canvas_height,
            },
            strict_panel_count: config.strict_panel_count,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Apply finished requests in arrival order.
    fn check_generation_results(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match &outcome.result {
                Ok(_) => self.toasts.push(
                    ToastKind::Info,
                    "生成完了",
                    "Difyからの応答を受信しました。",
                ),
                Err(e) => {
                    self.toasts
                        .push(ToastKind::Destructive, "APIリクエストエラー", &e.to_string())
                }
            }
            self.session.apply_outcome(outcome);
        }
    }

    fn handle_generation_action(&mut self, ctx: &egui::Context, action: GenerationAction) {
        match action {
            GenerationAction::Generate(kind) => {
                let request = self.generation_panel.forms.request(kind);
                let api_key = self.session.api_keys.get(kind).clone();
                self.session.request_started(kind);
                // Detached; the outcome arrives on the channel.
                self.client
                    .dispatch(api_key, request, self.outcome_tx.clone());
            }
            GenerationAction::CopyOutput(kind) => {
                ctx.copy_text(self.session.outputs.get(kind).clone());
            }
            GenerationAction::ApplyToPreview => {
                let output = self.session.outputs.get(GenerationKind::ComicStrip).clone();
                self.converter.set_input(&output);
                self.sync_chart();
            }
            GenerationAction::None => {}
        }
    }

    fn sync_chart(&mut self) {
        self.chart_viewer.set_rows(&self.converter.state().rows);
    }

    /// Handle PNG export - render the chart at canvas size and save it
    fn handle_export_png(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("emotion_chart.png")
            .save_file()
        else {
            return; // User cancelled
        };

        match StaticChartRenderer::save_png(
            self.chart_viewer.rows(),
            &self.palette,
            self.canvas.width,
            self.canvas.height,
            &path,
        ) {
            Ok(()) => {
                self.chart_viewer.export_status = Some(format!("出力しました: {}", path.display()));
                open_exported(&path);
            }
            Err(e) => {
                tracing::error!(error = %e, "chart export failed");
                self.chart_viewer.export_status = Some(format!("出力エラー: {}", e));
                self.toasts
                    .push(ToastKind::Destructive, "PNG出力エラー", &e.to_string());
            }
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("コマ割りコンバーター")
                        .size(22.0)
                        .strong()
                        .color(Color32::from_rgb(100, 149, 237)),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ 設定").clicked() {
                        self.settings_open = !self.settings_open;
                    }
                });
            });

            if let Some(message) = self.session.last_error.clone() {
                ui.add_space(4.0);
                if show_error_banner(ui, &message) {
                    self.session.dismiss_error();
                }
            }

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                for tab in Tab::ALL {
                    ui.selectable_value(&mut self.tab, tab, RichText::new(tab.label()).size(15.0));
                }
            });
            ui.add_space(4.0);
        });
    }

    fn show_comic_strip_tab(&mut self, ui: &mut egui::Ui) -> GenerationAction {
        let mut action = GenerationAction::None;
        let mut edited = false;

        ui.columns(2, |columns| {
            ScrollArea::vertical()
                .id_salt("comic_form")
                .show(&mut columns[0], |ui| {
                    action = self.generation_panel.show_comic_strip(ui, &self.session);
                });

            let ui = &mut columns[1];
            edited = preview_panel::show_json_editor(ui, &mut self.converter);
            ui.add_space(8.0);
            preview_panel::show_pages(ui, &self.converter.state().pages);
        });

        if edited && self.converter.refresh() {
            self.sync_chart();
        }
        action
    }
}

impl eframe::App for KomaWariApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_generation_results();

        // Request repaint while requests are in flight
        if self.session.any_pending() {
            ctx.request_repaint();
        }

        self.show_top_bar(ctx);

        let mut generation_action = GenerationAction::None;
        let mut viewer_action = ChartViewerAction::None;

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::StoryAdaptation => {
                ScrollArea::vertical().id_salt("story").show(ui, |ui| {
                    generation_action = self.generation_panel.show_story(ui, &self.session);
                });
            }
            Tab::PunchlineCreation => {
                ScrollArea::vertical().id_salt("punchline").show(ui, |ui| {
                    generation_action = self.generation_panel.show_punchline(ui, &self.session);
                });
            }
            Tab::ComicStrip => {
                generation_action = self.show_comic_strip_tab(ui);
            }
            Tab::Analysis => {
                viewer_action = self.chart_viewer.show(ui, &self.palette);
            }
        });

        self.handle_generation_action(ctx, generation_action);
        if viewer_action == ChartViewerAction::ExportPng {
            self.handle_export_png();
        }

        let mut strict = self.strict_panel_count;
        show_settings_window(
            ctx,
            &mut self.settings_open,
            &mut self.canvas,
            &mut self.session,
            &mut strict,
        );
        if strict != self.strict_panel_count {
            self.strict_panel_count = strict;
            self.converter.set_strict(strict);
            self.sync_chart();
        }

        self.toasts.show(ctx);
    }
}

fn open_exported(path: &Path) {
    if let Err(e) = open::that(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not open exported chart");
    }
}

/// Register a CJK-capable font as a fallback for both families.
fn install_cjk_font(ctx: &egui::Context, configured: Option<&Path>) {
    let candidates = configured
        .map(|p| vec![p.to_path_buf()])
        .unwrap_or_else(|| CJK_FONT_CANDIDATES.iter().map(PathBuf::from).collect());

    let Some((path, bytes)) = candidates
        .into_iter()
        .find_map(|p| std::fs::read(&p).ok().map(|bytes| (p, bytes)))
    else {
        tracing::warn!("no CJK font found; Japanese text may not render");
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert("cjk".to_owned(), egui::FontData::from_owned(bytes).into());
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push("cjk".to_owned());
    }
    ctx.set_fonts(fonts);
    tracing::info!(path = %path.display(), "loaded CJK font");
}
