//! Visual options passed by the host on every refresh.
//!
//! Everything is defaulted so a host may send a partial (or empty) record. Colors and
//! format specifiers are passed through untouched; only the formatter parses them.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENT_COLOR: &str = "#3B82F6";
pub const DEFAULT_PREV_COLOR: &str = "#D1D5DB";
pub const DEFAULT_VALUE_FORMAT: &str = "$.2s";
pub const DEFAULT_PERCENT_FORMAT: &str = ".2%";

/// Quarter-to-date is approximated as this share of year-to-date.
pub const DEFAULT_QUARTER_SHARE_OF_YEAR: f64 = 0.25;
/// Quarter-over-year is approximated as year-over-year scaled by this factor.
pub const DEFAULT_QUARTER_DAMPENING: f64 = 0.9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisConfig {
    pub current_color: String,
    pub prev_color: String,
    pub value_format: String,
    pub percent_format: String,
    #[serde(flatten)]
    pub policy: PopPolicy,
}

impl Default for VisConfig {
    fn default() -> Self {
        Self {
            current_color: DEFAULT_CURRENT_COLOR.into(),
            prev_color: DEFAULT_PREV_COLOR.into(),
            value_format: DEFAULT_VALUE_FORMAT.into(),
            percent_format: DEFAULT_PERCENT_FORMAT.into(),
            policy: PopPolicy::default(),
        }
    }
}

/// Heuristic factors used for the quarter metrics. These are approximations, not a
/// quarter-to-date query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopPolicy {
    pub quarter_share_of_year: f64,
    pub quarter_dampening: f64,
}

impl Default for PopPolicy {
    fn default() -> Self {
        Self {
            quarter_share_of_year: DEFAULT_QUARTER_SHARE_OF_YEAR,
            quarter_dampening: DEFAULT_QUARTER_DAMPENING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Color,
    String,
}

/// Declaration of one user-editable option, in the shape hosts expect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionDecl {
    pub key: &'static str,
    #[serde(rename = "type")]
    pub kind: OptionKind,
    pub label: &'static str,
    pub default: &'static str,
}

impl VisConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Option declarations the host renders in its settings panel.
    pub fn options() -> Vec<OptionDecl> {
        vec![
            OptionDecl {
                key: "current_color",
                kind: OptionKind::Color,
                label: "Current Period Color",
                default: DEFAULT_CURRENT_COLOR,
            },
            OptionDecl {
                key: "prev_color",
                kind: OptionKind::Color,
                label: "Prior Period Color",
                default: DEFAULT_PREV_COLOR,
            },
            OptionDecl {
                key: "value_format",
                kind: OptionKind::String,
                label: "Value Format (D3)",
                default: DEFAULT_VALUE_FORMAT,
            },
            OptionDecl {
                key: "percent_format",
                kind: OptionKind::String,
                label: "Percent Format (D3)",
                default: DEFAULT_PERCENT_FORMAT,
            },
        ]
    }
}
