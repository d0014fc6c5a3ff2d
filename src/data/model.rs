//! Comic Page Model
//! Page/panel document shape produced by the comic-strip generator, plus the
//! flattened chart rows derived from it.

use serde::{Deserialize, Deserializer};

/// One comic frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Panel {
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub shot: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub aim: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prompt: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dialogue: String,
    /// Categorical tag, see [`crate::data::Attribute`]. May be empty or unknown.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attribute: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emotion: i64,
}

/// Generated documents often carry `null` where a field is blank.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// An ordered run of panels.
///
/// `num_of_panels` is whatever the document declared; it is only checked
/// against `panels.len()` in strict mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub page: i64,
    #[serde(default)]
    pub num_of_panels: i64,
    pub panels: Vec<Panel>,
}

impl Page {
    /// True when the declared count matches the actual panel sequence.
    pub fn panel_count_matches(&self) -> bool {
        usize::try_from(self.num_of_panels).is_ok_and(|n| n == self.panels.len())
    }
}

/// One bar of the emotion chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow {
    /// `P<page>-<panel index, 1-based>`
    pub label: String,
    pub emotion: i64,
    pub content: String,
    pub attribute: String,
}

impl ChartRow {
    pub fn from_panel(page_number: i64, panel_index: usize, panel: &Panel) -> Self {
        Self {
            label: format!("P{}-{}", page_number, panel_index + 1),
            emotion: panel.emotion,
            content: panel.content.clone(),
            attribute: panel.attribute.clone(),
        }
    }
}

/// Flatten pages into chart rows, page order then panel order.
pub fn chart_rows(pages: &[Page]) -> Vec<ChartRow> {
    pages
        .iter()
        .flat_map(|page| {
            page.panels
                .iter()
                .enumerate()
                .map(move |(idx, panel)| ChartRow::from_panel(page.page, idx, panel))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn panel(content: &str, emotion: i64) -> Panel {
        Panel {
            content: content.to_string(),
            emotion,
            ..Default::default()
        }
    }

    #[test]
    fn rows_follow_page_then_panel_order() {
        let pages = vec![
            Page {
                page: 2,
                num_of_panels: 2,
                panels: vec![panel("a", 1), panel("b", 2)],
            },
            Page {
                page: 1,
                num_of_panels: 1,
                panels: vec![panel("c", 3)],
            },
        ];

        let labels: Vec<String> = chart_rows(&pages).into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["P2-1", "P2-2", "P1-1"]);
    }

    #[test]
    fn panel_fields_use_capitalized_json_names() {
        let json = r#"{"Content":"x","Shot":"wide","Aim":"","Prompt":"p","Dialogue":"hi","Attribute":"キメ","Emotion":-3}"#;
        let panel: Panel = serde_json::from_str(json).unwrap();
        assert_eq!(panel.shot, "wide");
        assert_eq!(panel.attribute, "キメ");
        assert_eq!(panel.emotion, -3);
    }

    #[test]
    fn null_fields_read_as_blank() {
        let json = r#"{"Content":"x","Shot":null,"Dialogue":null,"Attribute":null,"Emotion":null}"#;
        let panel: Panel = serde_json::from_str(json).unwrap();
        assert_eq!(panel.shot, "");
        assert_eq!(panel.dialogue, "");
        assert_eq!(panel.attribute, "");
        assert_eq!(panel.emotion, 0);
    }

    #[test]
    fn declared_count_is_compared_against_panels() {
        let mut page = Page {
            page: 1,
            num_of_panels: 3,
            panels: vec![panel("a", 0)],
        };
        assert!(!page.panel_count_matches());
        page.num_of_panels = 1;
        assert!(page.panel_count_matches());
        page.num_of_panels = -1;
        assert!(!page.panel_count_matches());
    }
}
