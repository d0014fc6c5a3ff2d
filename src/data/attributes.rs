//! Attribute Palette
//! Maps panel attribute tags to bar colors.

use egui::Color32;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PaletteError {
    #[error("Invalid color '{0}', expected #RRGGBB")]
    InvalidColor(String),
    #[error("Invalid palette entry '{0}', expected label=#RRGGBB")]
    InvalidEntry(String),
}

/// Known panel attribute tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// ヒキ - cliffhanger
    Hiki,
    /// メクリ - page-turn reveal
    Mekuri,
    /// キメ - climax shot
    Kime,
    /// フリ - setup
    Furi,
    /// ウケ - reaction
    Uke,
}

impl Attribute {
    pub const ALL: [Attribute; 5] = [
        Attribute::Hiki,
        Attribute::Mekuri,
        Attribute::Kime,
        Attribute::Furi,
        Attribute::Uke,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Attribute::Hiki => "ヒキ",
            Attribute::Mekuri => "メクリ",
            Attribute::Kime => "キメ",
            Attribute::Furi => "フリ",
            Attribute::Uke => "ウケ",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }

    fn default_color(self) -> Color32 {
        match self {
            Attribute::Hiki => Color32::from_rgb(0xFF, 0x6B, 0x6B),
            Attribute::Mekuri => Color32::from_rgb(0x4E, 0xCD, 0xC4),
            Attribute::Kime => Color32::from_rgb(0x45, 0xB7, 0xD1),
            Attribute::Furi => Color32::from_rgb(0xA9, 0xA9, 0xA9),
            Attribute::Uke => Color32::from_rgb(0x5D, 0x5D, 0x5D),
        }
    }
}

/// Color for empty or unrecognized tags.
pub const FALLBACK_COLOR: Color32 = Color32::from_rgb(0xF0, 0xF0, 0xF0);

/// Label shown in place of an empty attribute.
pub const NO_ATTRIBUTE_LABEL: &str = "なし";

/// Attribute → color lookup. Total over all strings.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributePalette {
    colors: HashMap<Attribute, Color32>,
    fallback: Color32,
}

impl Default for AttributePalette {
    fn default() -> Self {
        Self {
            colors: Attribute::ALL
                .into_iter()
                .map(|a| (a, a.default_color()))
                .collect(),
            fallback: FALLBACK_COLOR,
        }
    }
}

impl AttributePalette {
    /// Color for a raw attribute string.
    pub fn color_for(&self, label: &str) -> Color32 {
        Attribute::from_label(label)
            .and_then(|a| self.colors.get(&a).copied())
            .unwrap_or(self.fallback)
    }

    /// Entries in display order, for legends.
    pub fn entries(&self) -> Vec<(&'static str, Color32)> {
        Attribute::ALL
            .into_iter()
            .map(|a| (a.label(), self.color_for(a.label())))
            .collect()
    }

    pub fn fallback(&self) -> Color32 {
        self.fallback
    }

    /// Apply overrides of the form `ヒキ=#FF0000,=#EEEEEE`.
    ///
    /// An empty label sets the fallback color. Unknown labels are skipped.
    pub fn with_overrides(mut self, overrides: &str) -> Result<Self, PaletteError> {
        for entry in overrides.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (label, color) = entry
                .split_once('=')
                .ok_or_else(|| PaletteError::InvalidEntry(entry.to_string()))?;
            let color = parse_hex_color(color.trim())?;
            let label = label.trim();

            if label.is_empty() {
                self.fallback = color;
            } else if let Some(attr) = Attribute::from_label(label) {
                self.colors.insert(attr, color);
            } else {
                tracing::warn!(label, "ignoring palette override for unknown attribute");
            }
        }
        Ok(self)
    }
}

/// Parse `#RRGGBB`.
pub fn parse_hex_color(raw: &str) -> Result<Color32, PaletteError> {
    let invalid = || PaletteError::InvalidColor(raw.to_string());
    let hex = raw.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
