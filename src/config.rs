//! Application configuration loaded from environment variables.
//!
//! | Env Var                    | Default                                      |
//! |----------------------------|----------------------------------------------|
//! | `KOMA_DIFY_ENDPOINT`       | `https://api.dify.ai/v1/completion-messages` |
//! | `KOMA_DIFY_USER`           | `user-1`                                     |
//! | `KOMA_STORY_API_KEY`       | empty                                        |
//! | `KOMA_PUNCHLINE_API_KEY`   | empty                                        |
//! | `KOMA_COMIC_STRIP_API_KEY` | empty                                        |
//! | `KOMA_CANVAS_WIDTH`        | `960`                                        |
//! | `KOMA_CANVAS_HEIGHT`       | `1280`                                       |
//! | `KOMA_STRICT_PANEL_COUNT`  | `false`                                      |
//! | `KOMA_ATTRIBUTE_COLORS`    | built-in palette                             |
//! | `KOMA_CJK_FONT`            | probe system font paths                      |

use crate::data::{AttributePalette, PaletteError};
use crate::dify::{GenerationKind, DEFAULT_ENDPOINT, DEFAULT_USER};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CANVAS_WIDTH: u32 = 960;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 1280;
pub const MIN_CANVAS_SIDE: u32 = 64;
pub const MAX_CANVAS_SIDE: u32 = 8192;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got '{value}'")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("KOMA_ATTRIBUTE_COLORS: {0}")]
    Palette(#[from] PaletteError),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub endpoint: String,
    pub user: String,
    pub story_api_key: String,
    pub punchline_api_key: String,
    pub comic_strip_api_key: String,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub strict_panel_count: bool,
    pub palette: AttributePalette,
    pub cjk_font: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user: DEFAULT_USER.to_string(),
            story_api_key: String::new(),
            punchline_api_key: String::new(),
            comic_strip_api_key: String::new(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            strict_panel_count: false,
            palette: AttributePalette::default(),
            cjk_font: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any name → value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let canvas_width = match get("KOMA_CANVAS_WIDTH") {
            Some(v) => parse_side("KOMA_CANVAS_WIDTH", &v)?,
            None => defaults.canvas_width,
        };
        let canvas_height = match get("KOMA_CANVAS_HEIGHT") {
            Some(v) => parse_side("KOMA_CANVAS_HEIGHT", &v)?,
            None => defaults.canvas_height,
        };
        let strict_panel_count = match get("KOMA_STRICT_PANEL_COUNT") {
            Some(v) => parse_bool("KOMA_STRICT_PANEL_COUNT", &v)?,
            None => defaults.strict_panel_count,
        };
        let palette = match get("KOMA_ATTRIBUTE_COLORS") {
            Some(v) => defaults.palette.clone().with_overrides(&v)?,
            None => defaults.palette.clone(),
        };

        Ok(Self {
            endpoint: get("KOMA_DIFY_ENDPOINT").unwrap_or(defaults.endpoint),
            user: get("KOMA_DIFY_USER").unwrap_or(defaults.user),
            story_api_key: get("KOMA_STORY_API_KEY").unwrap_or_default(),
            punchline_api_key: get("KOMA_PUNCHLINE_API_KEY").unwrap_or_default(),
            comic_strip_api_key: get("KOMA_COMIC_STRIP_API_KEY").unwrap_or_default(),
            canvas_width,
            canvas_height,
            strict_panel_count,
            palette,
            cjk_font: get("KOMA_CJK_FONT").map(PathBuf::from),
        })
    }

    pub fn api_key(&self, kind: GenerationKind) -> &str {
        match kind {
            GenerationKind::StoryAdaptation => &self.story_api_key,
            GenerationKind::PunchlineCreation => &self.punchline_api_key,
            GenerationKind::ComicStrip => &self.comic_strip_api_key,
        }
    }
}

fn parse_side(var: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|v| (MIN_CANVAS_SIDE..=MAX_CANVAS_SIDE).contains(v))
        .ok_or_else(|| ConfigError::InvalidValue {
            var,
            expected: "pixel size between 64 and 8192",
            value: value.to_string(),
        })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            expected: "boolean",
            value: value.to_string(),
        }),
    }
}
