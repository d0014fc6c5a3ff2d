//! Generation Panel Widget
//! The three generator forms and their output areas.

use crate::dify::{
    ComicStripInputs, GenerationKind, GenerationRequest, PunchlineDirection, PunchlineInputs,
    StoryAdaptationInputs, MAX_RESULTS, MIN_RESULTS,
};
use crate::session::Session;
use egui::{ComboBox, RichText};

/// Form state for all generators. Each form is submitted independently.
#[derive(Default, Clone)]
pub struct GenerationForms {
    pub story: StoryAdaptationInputs,
    pub punchline: PunchlineInputs,
    pub comic: ComicStripInputs,
}

impl GenerationForms {
    /// Snapshot the form for `kind` as a request.
    pub fn request(&self, kind: GenerationKind) -> GenerationRequest {
        match kind {
            GenerationKind::StoryAdaptation => GenerationRequest::StoryAdaptation(self.story.clone()),
            GenerationKind::PunchlineCreation => {
                GenerationRequest::PunchlineCreation(self.punchline.clone())
            }
            GenerationKind::ComicStrip => GenerationRequest::ComicStrip(self.comic.clone()),
        }
    }
}

/// Actions triggered by a generator form
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationAction {
    None,
    Generate(GenerationKind),
    CopyOutput(GenerationKind),
    ApplyToPreview,
}

pub struct GenerationPanel {
    pub forms: GenerationForms,
}

impl GenerationPanel {
    pub fn new() -> Self {
        Self {
            forms: GenerationForms::default(),
        }
    }

    fn labeled_line(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
        ui.label(label);
        ui.add(
            egui::TextEdit::singleline(value)
                .hint_text(hint)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);
    }

    fn labeled_area(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str, rows: usize) {
        ui.label(label);
        ui.add(
            egui::TextEdit::multiline(value)
                .hint_text(hint)
                .desired_rows(rows)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(6.0);
    }

    fn generate_button(
        ui: &mut egui::Ui,
        session: &Session,
        kind: GenerationKind,
        text: &str,
        action: &mut GenerationAction,
    ) {
        ui.horizontal(|ui| {
            let button = egui::Button::new(RichText::new(text).size(15.0))
                .min_size(egui::vec2(120.0, 30.0));
            if ui.add(button).clicked() {
                *action = GenerationAction::Generate(kind);
            }
            if session.is_pending(kind) {
                ui.spinner();
                ui.label(RichText::new("生成中...").size(12.0));
            }
        });
    }

    /// Read-only output area. Nothing is drawn until the generator has answered.
    fn output_area(
        ui: &mut egui::Ui,
        session: &Session,
        kind: GenerationKind,
        action: &mut GenerationAction,
    ) -> bool {
        let output = session.outputs.get(kind);
        if output.is_empty() {
            return false;
        }

        ui.add_space(10.0);
        ui.label(RichText::new("出力結果:").strong());
        let mut view = output.as_str();
        ui.add(
            egui::TextEdit::multiline(&mut view)
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        if ui.small_button("📋 コピー").clicked() {
            *action = GenerationAction::CopyOutput(kind);
        }
        true
    }

    pub fn show_story(&mut self, ui: &mut egui::Ui, session: &Session) -> GenerationAction {
        let mut action = GenerationAction::None;
        let form = &mut self.forms.story;

        ui.heading(GenerationKind::StoryAdaptation.title());
        ui.add_space(8.0);
        Self::labeled_area(ui, "元ネタ", &mut form.original, "元ネタを入力してください...", 3);
        Self::labeled_line(ui, "テーマ", &mut form.theme, "テーマを入力してください...");
        Self::labeled_line(ui, "世界観", &mut form.world, "世界観を入力してください...");
        Self::labeled_area(
            ui,
            "追加指示",
            &mut form.instruction,
            "追加指示を入力してください...",
            3,
        );

        Self::generate_button(ui, session, GenerationKind::StoryAdaptation, "生成", &mut action);
        Self::output_area(ui, session, GenerationKind::StoryAdaptation, &mut action);
        action
    }

    pub fn show_punchline(&mut self, ui: &mut egui::Ui, session: &Session) -> GenerationAction {
        let mut action = GenerationAction::None;
        let form = &mut self.forms.punchline;

        ui.heading(GenerationKind::PunchlineCreation.title());
        ui.add_space(8.0);
        Self::labeled_line(ui, "キャラ", &mut form.character, "キャラを入力してください...");
        Self::labeled_area(ui, "フリ", &mut form.setup, "フリを入力してください...", 3);
        Self::labeled_area(ui, "ツッコミ", &mut form.reaction, "ツッコミを入力してください...", 3);

        ui.label("オチの方向性");
        ComboBox::from_id_salt("punchline_direction")
            .width(200.0)
            .selected_text(form.direction.label())
            .show_ui(ui, |ui| {
                for direction in PunchlineDirection::ALL {
                    ui.selectable_value(&mut form.direction, direction, direction.label());
                }
            });
        ui.add_space(6.0);

        ui.label("出力数");
        ui.add(egui::DragValue::new(&mut form.num_of_results).range(MIN_RESULTS..=MAX_RESULTS));
        ui.add_space(8.0);

        Self::generate_button(ui, session, GenerationKind::PunchlineCreation, "生成", &mut action);
        Self::output_area(ui, session, GenerationKind::PunchlineCreation, &mut action);
        action
    }

    pub fn show_comic_strip(&mut self, ui: &mut egui::Ui, session: &Session) -> GenerationAction {
        let mut action = GenerationAction::None;
        let form = &mut self.forms.comic;

        ui.heading(GenerationKind::ComicStrip.title());
        ui.add_space(8.0);
        Self::labeled_area(ui, "シナリオ", &mut form.scenario, "シナリオを入力してください...", 6);

        Self::generate_button(ui, session, GenerationKind::ComicStrip, "コマ割り生成", &mut action);
        if Self::output_area(ui, session, GenerationKind::ComicStrip, &mut action)
            && ui.button("➡ プレビューに反映").clicked()
        {
            action = GenerationAction::ApplyToPreview;
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_snapshots_the_matching_form() {
        let mut forms = GenerationForms::default();
        forms.comic.scenario = "雨の日".into();
        forms.punchline.direction = PunchlineDirection::Exaggeration;

        assert_eq!(
            forms.request(GenerationKind::ComicStrip),
            GenerationRequest::ComicStrip(ComicStripInputs {
                scenario: "雨の日".into()
            })
        );
        let punchline = forms.request(GenerationKind::PunchlineCreation);
        assert_eq!(punchline.kind(), GenerationKind::PunchlineCreation);
        assert_eq!(punchline.inputs().unwrap()["direction"], "誇張");
        assert_eq!(punchline.inputs().unwrap()["num_of_results"], 1);
    }
}
