use regex::Regex;

use crate::error::DatevError;
use crate::layout::schema::{ColumnDef, NoiseRuleDef};
use crate::model::ColumnType;
use crate::parsing::columns::RawLine;

/// A compiled predicate marking lines that must not become rows.
#[derive(Debug, Clone)]
pub enum NoiseRule {
    LineMatches(Regex),
    KeyMismatch { column: usize, pattern: Regex },
    NoFigures,
}

impl NoiseRule {
    pub fn compile(def: &NoiseRuleDef, columns: &[ColumnDef]) -> Result<NoiseRule, DatevError> {
        match def {
            NoiseRuleDef::LineMatches(pattern) => Ok(NoiseRule::LineMatches(compile_regex(pattern)?)),
            NoiseRuleDef::KeyMismatch { column, pattern } => {
                let idx = columns
                    .iter()
                    .position(|c| &c.name == column)
                    .ok_or_else(|| {
                        DatevError::LayoutInvalid(format!(
                            "noise rule references unknown column '{}'",
                            column
                        ))
                    })?;
                Ok(NoiseRule::KeyMismatch {
                    column: idx,
                    pattern: compile_regex(pattern)?,
                })
            }
            NoiseRuleDef::NoFigures => Ok(NoiseRule::NoFigures),
        }
    }

    pub fn is_noise(&self, line: &RawLine, columns: &[ColumnDef]) -> bool {
        match self {
            NoiseRule::LineMatches(re) => re.is_match(&line.text),
            NoiseRule::KeyMismatch { column, pattern } => {
                let key = line.cells.get(*column).map(|s| s.trim()).unwrap_or("");
                !pattern.is_match(key)
            }
            NoiseRule::NoFigures => {
                let has_figures = columns
                    .iter()
                    .zip(&line.cells)
                    .any(|(c, cell)| c.column_type == ColumnType::Amount && !cell.is_empty());
                !has_figures && !is_section_heading(line, columns)
            }
        }
    }

    /// Short description for logs and `datev layout explain`.
    pub fn describe(&self, columns: &[ColumnDef]) -> String {
        match self {
            NoiseRule::LineMatches(re) => format!("line matches /{}/", re.as_str()),
            NoiseRule::KeyMismatch { column, pattern } => format!(
                "'{}' does not match /{}/",
                columns.get(*column).map(|c| c.name.as_str()).unwrap_or("?"),
                pattern.as_str()
            ),
            NoiseRule::NoFigures => "no amount printed and not a heading".to_string(),
        }
    }
}

/// A text-only line such as `Kostenarten:`.
fn is_section_heading(line: &RawLine, columns: &[ColumnDef]) -> bool {
    columns
        .iter()
        .zip(&line.cells)
        .filter(|(c, _)| c.column_type == ColumnType::Text)
        .any(|(_, cell)| cell.trim_end().ends_with(':'))
}

fn compile_regex(pattern: &str) -> Result<Regex, DatevError> {
    Regex::new(pattern)
        .map_err(|e| DatevError::LayoutInvalid(format!("invalid pattern '{}': {}", pattern, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::amount::SignConvention;

    fn columns() -> Vec<ColumnDef> {
        let col = |name: &str, start: f32, end: f32, column_type| ColumnDef {
            name: name.into(),
            start,
            end,
            column_type,
            sign: SignConvention::Plain,
        };
        vec![
            col("Konto", 0.0, 90.0, ColumnType::Text),
            col("Beschriftung", 90.0, 320.0, ColumnType::Text),
            col("Saldo", 320.0, 400.0, ColumnType::Amount),
        ]
    }

    fn raw(cells: [&str; 3]) -> RawLine {
        RawLine {
            text: cells.iter().filter(|c| !c.is_empty()).copied().collect::<Vec<_>>().join(" "),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_line_matches() {
        let cols = columns();
        let rule = NoiseRule::compile(
            &NoiseRuleDef::LineMatches(r"(?i)^seite\s+\d+".into()),
            &cols,
        )
        .unwrap();
        assert!(rule.is_noise(&raw(["Seite", "3", ""]), &cols));
        assert!(!rule.is_noise(&raw(["120000", "Seitenwand", "1,00"]), &cols));
    }

    #[test]
    fn test_key_mismatch() {
        let cols = columns();
        let rule = NoiseRule::compile(
            &NoiseRuleDef::KeyMismatch {
                column: "Konto".into(),
                pattern: r"^\d{3,4}\s*\d{2}$".into(),
            },
            &cols,
        )
        .unwrap();
        assert!(!rule.is_noise(&raw(["120000", "Bank", "1,00"]), &cols));
        assert!(!rule.is_noise(&raw(["1200 00", "Bank", "1,00"]), &cols));
        assert!(rule.is_noise(&raw(["Konto", "Beschriftung", "Saldo"]), &cols));
        assert!(rule.is_noise(&raw(["", "Übertrag", "1,00"]), &cols));
    }

    #[test]
    fn test_key_mismatch_unknown_column_rejected() {
        let def = NoiseRuleDef::KeyMismatch {
            column: "Kto".into(),
            pattern: ".*".into(),
        };
        assert!(NoiseRule::compile(&def, &columns()).is_err());
    }

    #[test]
    fn test_no_figures_keeps_headings_and_placeholders() {
        let cols = columns();
        let rule = NoiseRule::NoFigures;
        assert!(rule.is_noise(&raw(["", "Musterfirma GmbH", ""]), &cols));
        assert!(!rule.is_noise(&raw(["", "Kostenarten:", ""]), &cols));
        assert!(!rule.is_noise(&raw(["", "Sonstige Kosten", "-"]), &cols));
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let def = NoiseRuleDef::LineMatches("(unclosed".into());
        assert!(NoiseRule::compile(&def, &columns()).is_err());
    }
}
