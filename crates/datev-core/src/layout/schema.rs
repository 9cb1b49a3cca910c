use serde::{Deserialize, Serialize};

use crate::model::{ColumnType, ReportKind};
use crate::parsing::amount::SignConvention;
use crate::parsing::columns::Anchor;

/// Geometry and filters for one report layout, as stored in a layout file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDef {
    pub kind: ReportKind,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Regex matched against the full page text to find the report pages.
    pub title_pattern: String,
    /// Human-readable form of the title, used in error messages.
    pub title_label: String,
    /// Maximum distance in points between top edges of words on one line.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f32,
    /// Which horizontal edge of a word decides its column.
    #[serde(default)]
    pub anchor: Anchor,
    /// Columns from left to right.
    pub columns: Vec<ColumnDef>,
    /// Lines matching any of these rules never become rows.
    #[serde(default)]
    pub noise: Vec<NoiseRuleDef>,
    /// Rename the amount columns after the month header found on the page.
    #[serde(default)]
    pub period_header: bool,
}

fn default_line_tolerance() -> f32 {
    2.0
}

/// A column slice: words whose anchor lies in `[start, end)` belong to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub start: f32,
    pub end: f32,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    #[serde(default)]
    pub sign: SignConvention,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseRuleDef {
    /// Line text matches this regex (titles, headers, footers).
    LineMatches(String),
    /// Cell of `column` does not match `pattern` (e.g. no account number).
    KeyMismatch { column: String, pattern: String },
    /// No word in any amount column, unless the label ends with `:`.
    NoFigures,
}
