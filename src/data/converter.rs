//! Preview Converter
//! Turns the raw JSON editor text into preview pages and chart rows.

use crate::data::model::{chart_rows, ChartRow, Page};
use thiserror::Error;

/// Message shown for any non-blank input that fails to convert.
pub const INVALID_JSON_MESSAGE: &str =
    "無効なJSON入力です。JSONを確認して再試行してください。";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Page {page} declares {declared} panels but contains {actual}")]
    PanelCountMismatch {
        page: i64,
        declared: i64,
        actual: usize,
    },
}

/// Everything derived from one raw input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewState {
    pub pages: Vec<Page>,
    pub rows: Vec<ChartRow>,
    /// User-facing error, empty when none.
    pub error: String,
}

/// Parse a page document. With `strict`, declared panel counts must match.
pub fn parse_pages(raw: &str, strict: bool) -> Result<Vec<Page>, ConvertError> {
    let pages: Vec<Page> = serde_json::from_str(raw)?;
    if strict {
        if let Some(page) = pages.iter().find(|p| !p.panel_count_matches()) {
            return Err(ConvertError::PanelCountMismatch {
                page: page.page,
                declared: page.num_of_panels,
                actual: page.panels.len(),
            });
        }
    }
    Ok(pages)
}

/// Derive preview state from raw text. Pure.
pub fn derive(raw: &str, strict: bool) -> PreviewState {
    match parse_pages(raw, strict) {
        Ok(pages) => {
            let rows = chart_rows(&pages);
            PreviewState {
                pages,
                rows,
                error: String::new(),
            }
        }
        Err(e) => {
            let blank = raw.trim().is_empty();
            if !blank {
                tracing::debug!(error = %e, "preview input rejected");
            }
            PreviewState {
                pages: Vec::new(),
                rows: Vec::new(),
                error: if blank {
                    String::new()
                } else {
                    INVALID_JSON_MESSAGE.to_string()
                },
            }
        }
    }
}

/// Holds the JSON editor text and the state derived from it.
pub struct PreviewConverter {
    input: String,
    last_applied: Option<String>,
    strict: bool,
    state: PreviewState,
}

impl PreviewConverter {
    pub fn new(strict: bool) -> Self {
        Self {
            input: String::new(),
            last_applied: None,
            strict,
            state: PreviewState::default(),
        }
    }

    /// Editor buffer, mutated directly by the text widget.
    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.refresh();
    }

    pub fn set_strict(&mut self, strict: bool) {
        if self.strict != strict {
            self.strict = strict;
            self.last_applied = None;
            self.refresh();
        }
    }

    /// Re-derive if the input changed since the last call. Returns whether it did.
    pub fn refresh(&mut self) -> bool {
        if self.last_applied.as_deref() == Some(self.input.as_str()) {
            return false;
        }
        self.state = derive(&self.input, self.strict);
        self.last_applied = Some(self.input.clone());
        true
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attributes::FALLBACK_COLOR;
    use crate::data::AttributePalette;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    const ONE_PANEL: &str = r#"[{"page":1,"num_of_panels":1,"panels":[{"Content":"A","Shot":"","Aim":"","Prompt":"","Dialogue":"","Attribute":"ヒキ","Emotion":5}]}]"#;

    #[test]
    fn single_panel_document_yields_one_row() {
        let state = derive(ONE_PANEL, false);
        assert_eq!(state.error, "");
        assert_eq!(state.pages.len(), 1);
        assert_eq!(
            state.rows,
            vec![ChartRow {
                label: "P1-1".to_string(),
                emotion: 5,
                content: "A".to_string(),
                attribute: "ヒキ".to_string(),
            }]
        );
    }

    #[test]
    fn null_attribute_falls_back_to_untagged_color() {
        let raw = r#"[{"page":1,"num_of_panels":1,"panels":[{"Content":"A","Shot":"","Aim":"","Prompt":"","Dialogue":null,"Attribute":null,"Emotion":5}]}]"#;
        let state = derive(raw, false);
        assert_eq!(state.error, "");
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.rows[0].attribute, "");
        assert_eq!(
            AttributePalette::default().color_for(&state.rows[0].attribute),
            FALLBACK_COLOR
        );
    }

    #[test]
    fn row_count_equals_total_panels() {
        let raw = r#"[
            {"page":1,"num_of_panels":2,"panels":[{"Emotion":1},{"Emotion":2}]},
            {"page":2,"num_of_panels":0,"panels":[]},
            {"page":3,"num_of_panels":3,"panels":[{"Emotion":3},{"Emotion":4},{"Emotion":5}]}
        ]"#;
        let state = derive(raw, false);
        let labels: Vec<&str> = state.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["P1-1", "P1-2", "P3-1", "P3-2", "P3-3"]);
        let values: Vec<i64> = state.rows.iter().map(|r| r.emotion).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn blank_input_is_silent_and_empty() {
        for raw in ["", "   ", "\n\t "] {
            assert_eq!(derive(raw, false), PreviewState::default());
        }
    }

    #[test]
    fn invalid_input_sets_message_and_clears() {
        for raw in ["{", "not json", "{\"page\":1}", "[{\"page\":1}]", "[1,2]"] {
            let state = derive(raw, false);
            assert_eq!(state.error, INVALID_JSON_MESSAGE, "input: {raw}");
            assert!(state.pages.is_empty());
            assert!(state.rows.is_empty());
        }
    }

    #[test]
    fn declared_count_is_trusted_unless_strict() {
        let raw = r#"[{"page":4,"num_of_panels":3,"panels":[{"Emotion":1}]}]"#;
        assert_eq!(derive(raw, false).rows.len(), 1);

        assert_matches!(
            parse_pages(raw, true),
            Err(ConvertError::PanelCountMismatch { page: 4, declared: 3, actual: 1 })
        );
        let strict = derive(raw, true);
        assert_eq!(strict.error, INVALID_JSON_MESSAGE);
        assert!(strict.rows.is_empty());
    }

    #[test]
    fn converter_resets_state_on_bad_edit() {
        let mut converter = PreviewConverter::new(false);
        converter.set_input(ONE_PANEL);
        assert_eq!(converter.state().rows.len(), 1);

        converter.input_mut().push('x');
        assert!(converter.refresh());
        assert_eq!(converter.state().error, INVALID_JSON_MESSAGE);
        assert!(converter.state().rows.is_empty());

        converter.input_mut().clear();
        assert!(converter.refresh());
        assert_eq!(converter.state(), &PreviewState::default());
    }

    #[test]
    fn unchanged_input_is_a_no_op() {
        let mut converter = PreviewConverter::new(false);
        converter.set_input(ONE_PANEL);
        let before = converter.state().clone();
        assert!(!converter.refresh());
        assert_eq!(converter.state(), &before);
        assert_eq!(derive(ONE_PANEL, false), before);
    }

    #[test]
    fn toggling_strict_rederives() {
        let raw = r#"[{"page":1,"num_of_panels":2,"panels":[{"Emotion":1}]}]"#;
        let mut converter = PreviewConverter::new(false);
        converter.set_input(raw);
        assert_eq!(converter.state().rows.len(), 1);

        converter.set_strict(true);
        assert!(converter.state().rows.is_empty());
    }
}
