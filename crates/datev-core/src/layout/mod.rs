pub mod builtin;
pub mod schema;

use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

use crate::error::DatevError;
use crate::model::{Column, ColumnType, ReportKind};
use crate::parsing::columns::Anchor;
use crate::parsing::noise::NoiseRule;
use schema::{ColumnDef, LayoutDef};

/// A validated, ready-to-use layout: the kind-specific configuration that
/// parameterises page search and row building.
#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: ReportKind,
    pub name: String,
    pub title: Regex,
    pub title_label: String,
    pub line_tolerance: f32,
    pub anchor: Anchor,
    pub columns: Vec<ColumnDef>,
    pub noise: Vec<NoiseRule>,
    pub period_header: bool,
}

impl Layout {
    pub fn compile(def: &LayoutDef) -> Result<Layout, DatevError> {
        validate_layout(def)?;

        let title = Regex::new(&def.title_pattern).map_err(|e| {
            DatevError::LayoutInvalid(format!(
                "invalid title pattern '{}': {}",
                def.title_pattern, e
            ))
        })?;

        let noise = def
            .noise
            .iter()
            .map(|rule| NoiseRule::compile(rule, &def.columns))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Layout {
            kind: def.kind,
            name: def.name.clone(),
            title,
            title_label: def.title_label.clone(),
            line_tolerance: def.line_tolerance,
            anchor: def.anchor,
            columns: def.columns.clone(),
            noise,
            period_header: def.period_header,
        })
    }

    pub fn matches_title(&self, page_text: &str) -> bool {
        self.title.is_match(page_text)
    }

    /// Output schema, before any header-based relabelling.
    pub fn output_columns(&self) -> Vec<Column> {
        self.columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                column_type: c.column_type,
            })
            .collect()
    }

    pub fn amount_column_count(&self) -> usize {
        self.columns
            .iter()
            .filter(|c| c.column_type == ColumnType::Amount)
            .count()
    }
}

/// Load a layout from a JSON file.
pub fn load_layout(path: &Path) -> Result<Layout, DatevError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatevError::LayoutLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_layout(&content, path)
}

/// Parse a layout from a JSON string.
pub fn parse_layout(json: &str, source: &Path) -> Result<Layout, DatevError> {
    let def: LayoutDef = serde_json::from_str(json).map_err(|e| DatevError::LayoutLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    Layout::compile(&def)
}

/// Parse a layout from a JSON string (no file path context).
pub fn parse_layout_str(json: &str) -> Result<Layout, DatevError> {
    let def: LayoutDef = serde_json::from_str(json).map_err(DatevError::Json)?;
    Layout::compile(&def)
}

/// Validate that a layout definition is well-formed.
pub fn validate_layout(def: &LayoutDef) -> Result<(), DatevError> {
    if def.columns.is_empty() {
        return Err(DatevError::LayoutInvalid("columns must not be empty".into()));
    }

    if !def.line_tolerance.is_finite() || def.line_tolerance < 0.0 {
        return Err(DatevError::LayoutInvalid(format!(
            "line_tolerance must be a non-negative number, got {}",
            def.line_tolerance
        )));
    }

    if !def.columns.iter().any(|c| c.column_type == ColumnType::Text) {
        return Err(DatevError::LayoutInvalid(
            "layout needs at least one text column".into(),
        ));
    }

    let mut names = HashSet::new();
    let mut previous_end = f32::NEG_INFINITY;
    for column in &def.columns {
        if column.name.trim().is_empty() {
            return Err(DatevError::LayoutInvalid(
                "column name must not be empty".into(),
            ));
        }

        if !names.insert(column.name.as_str()) {
            return Err(DatevError::LayoutInvalid(format!(
                "duplicate column '{}'",
                column.name
            )));
        }

        if !(column.start < column.end) {
            return Err(DatevError::LayoutInvalid(format!(
                "column '{}' has an empty range [{}, {})",
                column.name, column.start, column.end
            )));
        }

        if column.start < previous_end {
            return Err(DatevError::LayoutInvalid(format!(
                "column '{}' overlaps its left neighbour or is out of order",
                column.name
            )));
        }
        previous_end = column.end;
    }

    if def.period_header
        && !def
            .columns
            .iter()
            .any(|c| c.column_type == ColumnType::Amount)
    {
        return Err(DatevError::LayoutInvalid(
            "period_header requires amount columns".into(),
        ));
    }

    Ok(())
}
