//! Shared types for logsift
//!
//! This crate contains the filter rule model used across logsift crates,
//! plus the store that owns the user's filter configuration.

mod store;

pub use store::{FilterStore, MovePosition};

use serde::{Deserialize, Serialize};

/// Identifier for filter groups and items
pub type FilterId = u64;

/// Context radius levels selectable per filter
pub const CONTEXT_LEVELS: [u32; 4] = [0, 3, 5, 9];

/// Whether a rule keeps or drops matching lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Include,
    Exclude,
}

/// How a matched filter is highlighted in a viewer
///
/// Informational only: the engine ignores highlight metadata entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightMode {
    #[default]
    Word,
    Line,
    Full,
}

impl HighlightMode {
    /// Cycle Word -> Line -> Full -> Word
    pub fn next(self) -> Self {
        match self {
            Self::Word => Self::Line,
            Self::Line => Self::Full,
            Self::Full => Self::Word,
        }
    }
}

/// One keyword or regex rule
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterItem {
    #[serde(default)]
    pub id: FilterId,

    /// The search text, or a regex pattern when `is_regex` is set
    pub keyword: String,

    pub kind: FilterKind,

    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub is_regex: bool,

    #[serde(default)]
    pub case_sensitive: bool,

    /// Neighboring lines to keep around a match, one of `CONTEXT_LEVELS`
    #[serde(default)]
    pub context_radius: u32,

    /// Optional display name shown instead of the raw pattern
    #[serde(default)]
    pub nickname: Option<String>,

    /// Highlight color preset id
    #[serde(default)]
    pub color: Option<String>,

    #[serde(default)]
    pub highlight_mode: HighlightMode,

    /// Matches seen in the most recent run, if known
    #[serde(skip)]
    pub result_count: Option<u64>,
}

impl FilterItem {
    pub fn new(id: FilterId, keyword: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            id,
            keyword: keyword.into(),
            kind,
            enabled: true,
            is_regex: false,
            case_sensitive: false,
            context_radius: 0,
            nickname: None,
            color: None,
            highlight_mode: HighlightMode::Word,
            result_count: None,
        }
    }

    /// Display name: the nickname when present, otherwise the keyword
    pub fn label(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.keyword)
    }

    /// Advance the context radius to the next configured level
    pub fn cycle_context_radius(&mut self) {
        let next = match CONTEXT_LEVELS.iter().position(|&l| l == self.context_radius) {
            Some(i) => (i + 1) % CONTEXT_LEVELS.len(),
            None => 0,
        };
        self.context_radius = CONTEXT_LEVELS[next];
    }
}

/// A named, independently toggleable collection of filters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default)]
    pub id: FilterId,

    pub name: String,

    #[serde(default, rename = "filter")]
    pub filters: Vec<FilterItem>,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Whether the group was created in regex mode (display only)
    #[serde(default)]
    pub is_regex: bool,

    /// Matches seen in the most recent run, if known
    #[serde(skip)]
    pub result_count: Option<u64>,
}

impl FilterGroup {
    pub fn new(id: FilterId, name: impl Into<String>, is_regex: bool) -> Self {
        Self {
            id,
            name: name.into(),
            filters: Vec::new(),
            enabled: false,
            is_regex,
            result_count: None,
        }
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Highlight color presets
// ============================================================================

/// A highlight color pair for dark and light themes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorPreset {
    pub id: String,
    pub dark: String,
    pub light: String,
}

impl ColorPreset {
    fn new(id: &str, dark: &str, light: &str) -> Self {
        Self {
            id: id.to_string(),
            dark: dark.to_string(),
            light: light.to_string(),
        }
    }
}

/// Built-in highlight colors, picked for mutual contrast
pub fn default_color_presets() -> Vec<ColorPreset> {
    vec![
        ColorPreset::new("color01", "rgba(255, 50, 50, 0.5)", "rgba(255, 50, 50, 0.4)"),
        ColorPreset::new("color02", "rgba(0, 180, 180, 0.5)", "rgba(0, 180, 180, 0.4)"),
        ColorPreset::new("color03", "rgba(255, 220, 0, 0.5)", "rgba(255, 220, 0, 0.4)"),
        ColorPreset::new("color04", "rgba(100, 50, 255, 0.5)", "rgba(100, 50, 255, 0.4)"),
        ColorPreset::new("color05", "rgba(255, 140, 0, 0.5)", "rgba(255, 140, 0, 0.4)"),
        ColorPreset::new("color06", "rgba(0, 200, 0, 0.5)", "rgba(0, 200, 0, 0.4)"),
        ColorPreset::new("color07", "rgba(255, 0, 100, 0.5)", "rgba(255, 0, 100, 0.4)"),
        ColorPreset::new("color08", "rgba(100, 150, 255, 0.5)", "rgba(100, 150, 255, 0.4)"),
        ColorPreset::new("color09", "rgba(200, 200, 0, 0.5)", "rgba(200, 200, 0, 0.4)"),
        ColorPreset::new("color10", "rgba(200, 0, 200, 0.5)", "rgba(200, 0, 200, 0.4)"),
        ColorPreset::new("color11", "rgba(0, 255, 200, 0.5)", "rgba(0, 255, 200, 0.4)"),
        ColorPreset::new("color12", "rgba(255, 100, 0, 0.5)", "rgba(255, 100, 0, 0.4)"),
        ColorPreset::new("color13", "rgba(0, 100, 255, 0.5)", "rgba(0, 100, 255, 0.4)"),
        ColorPreset::new("color14", "rgba(100, 255, 100, 0.5)", "rgba(100, 255, 100, 0.4)"),
        ColorPreset::new("color15", "rgba(180, 100, 255, 0.5)", "rgba(180, 100, 255, 0.4)"),
        ColorPreset::new("color16", "rgba(255, 100, 150, 0.5)", "rgba(255, 100, 150, 0.4)"),
    ]
}
