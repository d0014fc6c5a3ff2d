//! Emotion Statistics
//! Descriptive statistics of panel emotion scores, overall and per attribute.

use crate::data::{Attribute, ChartRow, NO_ATTRIBUTE_LABEL};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Descriptive statistics for one group of panels.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionStats {
    pub group_name: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; NaN below two panels.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl EmotionStats {
    pub fn compute(group_name: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = sorted.len();
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        Some(Self {
            group_name: group_name.to_string(),
            count: n,
            mean: values.mean(),
            median,
            std: values.std_dev(),
            min: Statistics::min(values),
            max: Statistics::max(values),
        })
    }
}

/// Overall plus per-attribute emotion statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionSummary {
    pub overall: EmotionStats,
    /// Known attributes first in palette order, then unknown tags, then untagged.
    pub by_attribute: Vec<EmotionStats>,
}

impl EmotionSummary {
    pub fn from_rows(rows: &[ChartRow]) -> Option<Self> {
        let all: Vec<f64> = rows.iter().map(|r| r.emotion as f64).collect();
        let overall = EmotionStats::compute("全体", &all)?;

        let mut groups: BTreeMap<(u8, usize, String), Vec<f64>> = BTreeMap::new();
        for row in rows {
            groups
                .entry(Self::group_key(&row.attribute))
                .or_default()
                .push(row.emotion as f64);
        }

        let by_attribute = groups
            .into_iter()
            .filter_map(|((_, _, name), values)| EmotionStats::compute(&name, &values))
            .collect();

        Some(Self {
            overall,
            by_attribute,
        })
    }

    fn group_key(attribute: &str) -> (u8, usize, String) {
        if attribute.is_empty() {
            return (2, 0, NO_ATTRIBUTE_LABEL.to_string());
        }
        match Attribute::from_label(attribute) {
            Some(known) => {
                let rank = Attribute::ALL.iter().position(|a| *a == known).unwrap_or(0);
                (0, rank, attribute.to_string())
            }
            None => (1, 0, attribute.to_string()),
        }
    }
}
