use crate::extraction::Word;
use std::cmp::Ordering;

/// A physical line of a page: words sharing roughly the same top edge,
/// ordered left to right.
#[derive(Debug, Clone)]
pub struct PhysicalLine<'a> {
    pub top: f32,
    pub words: Vec<&'a Word>,
}

impl PhysicalLine<'_> {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Group words into physical lines by clustering their top coordinate.
///
/// Words are visited top to bottom; a word starts a new line when its top edge
/// lies more than `tolerance` below the first word of the current line.
/// Ties are broken by horizontal position so the result never depends on the
/// order the provider emitted the words in.
pub fn group_lines(words: &[Word], tolerance: f32) -> Vec<PhysicalLine<'_>> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| compare_position(a, b));

    let mut lines: Vec<PhysicalLine<'_>> = Vec::new();
    for word in sorted {
        match lines.last_mut() {
            Some(line) if word.bbox.y_min - line.top <= tolerance => line.words.push(word),
            _ => lines.push(PhysicalLine {
                top: word.bbox.y_min,
                words: vec![word],
            }),
        }
    }

    for line in &mut lines {
        line.words
            .sort_by(|a, b| a.bbox.x_min.total_cmp(&b.bbox.x_min));
    }

    lines
}

fn compare_position(a: &Word, b: &Word) -> Ordering {
    a.bbox
        .y_min
        .total_cmp(&b.bbox.y_min)
        .then(a.bbox.x_min.total_cmp(&b.bbox.x_min))
}
