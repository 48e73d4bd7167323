use serde::{Deserialize, Serialize};

use crate::scoring::{
    EducationTrack, EntryTestKind, DEFAULT_BOARD_TOTAL, DEFAULT_TEST_TOTAL,
};

/// Top-level configuration file.
///
/// Example YAML:
/// ```yaml
/// defaults:
///   track: a-level
///   test_kind: nat
///   test_total: 100
/// display:
///   precision: 2
///   color: auto
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: Option<FormDefaults>,

    #[serde(default)]
    pub display: Option<DisplayConfig>,
}

impl Config {
    pub fn form_defaults(&self) -> FormDefaults {
        self.defaults.clone().unwrap_or_default()
    }

    pub fn display_config(&self) -> DisplayConfig {
        self.display.clone().unwrap_or_default()
    }
}

/// Initial values of a blank form.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormDefaults {
    #[serde(default)]
    pub track: Option<EducationTrack>,

    #[serde(default)]
    pub test_kind: Option<EntryTestKind>,

    /// Maximum matric/O-Level marks (default: 1100)
    #[serde(default)]
    pub matric_total: Option<f64>,

    /// Maximum FSc/A-Level marks (default: 1100)
    #[serde(default)]
    pub inter_total: Option<f64>,

    /// Maximum entry test marks for NU/NAT (default: 100). SAT always uses 1600.
    #[serde(default)]
    pub test_total: Option<f64>,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            track: Some(EducationTrack::Fsc),
            test_kind: Some(EntryTestKind::Nu),
            matric_total: Some(DEFAULT_BOARD_TOTAL),
            inter_total: Some(DEFAULT_BOARD_TOTAL),
            test_total: Some(DEFAULT_TEST_TOTAL),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Auto,
    Dark,
    Light,
}

/// How results are rendered.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Decimals shown for percentages (default: 2)
    #[serde(default)]
    pub precision: Option<usize>,

    #[serde(default)]
    pub color: Option<ColorMode>,

    #[serde(default)]
    pub theme: Option<ThemeMode>,
}

impl DisplayConfig {
    pub fn precision(&self) -> usize {
        self.precision.unwrap_or(2)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: Some(2),
            color: Some(ColorMode::Auto),
            theme: Some(ThemeMode::Auto),
        }
    }
}
