use serde::{Deserialize, Serialize};

use crate::extraction::lines::PhysicalLine;
use crate::extraction::{BBox, Word};
use crate::layout::schema::ColumnDef;

/// Which horizontal position of a word is compared against column ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    #[default]
    Left,
    Center,
    Right,
}

impl Anchor {
    pub fn position(&self, bbox: &BBox) -> f32 {
        match self {
            Anchor::Left => bbox.x_min,
            Anchor::Center => bbox.x_center(),
            Anchor::Right => bbox.x_max,
        }
    }
}

/// Index of the column whose `[start, end)` range holds the word's anchor,
/// or `None` when the word lies outside every column.
pub fn classify_word(word: &Word, columns: &[ColumnDef], anchor: Anchor) -> Option<usize> {
    let x = anchor.position(&word.bbox);
    columns.iter().position(|c| c.start <= x && x < c.end)
}

/// A physical line with its words distributed over the layout columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    pub text: String,
    /// Raw cell text per column, words joined by a single space.
    pub cells: Vec<String>,
}

impl RawLine {
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

pub fn split_line(line: &PhysicalLine<'_>, columns: &[ColumnDef], anchor: Anchor) -> RawLine {
    let mut cells = vec![String::new(); columns.len()];
    for word in &line.words {
        if let Some(idx) = classify_word(word, columns, anchor) {
            let cell = &mut cells[idx];
            if !cell.is_empty() {
                cell.push(' ');
            }
            cell.push_str(word.text.trim());
        }
    }

    RawLine {
        text: line.text(),
        cells,
    }
}
