//! Vertical column text planning.
//!
//! Planning is split from rasterization so exclusion behavior is testable
//! without a font: the planner walks the column grid and decides which
//! character lands at which sample point; the compositor only rasterizes the
//! resulting cells.

use kurbo::{Point, Rect};

/// Geometry of the vertical text block.
#[derive(Clone, Copy, Debug)]
pub struct ColumnLayout {
    /// X of the first (rightmost) column.
    pub right: f64,
    /// X limit of the last (leftmost) column, inclusive.
    pub left: f64,
    /// Horizontal distance between columns.
    pub col_step: f64,
    /// Y of the first character in each column.
    pub top: f64,
    /// Y limit, exclusive.
    pub bottom: f64,
    /// Vertical distance between characters.
    pub row_step: f64,
    /// Extra vertical gap inserted when a sentence ends.
    pub paragraph_gap: f64,
    /// A divider rule is planned after every this many columns.
    pub divider_every: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            right: 940.0,
            left: 60.0,
            col_step: 34.0,
            top: 290.0,
            bottom: 980.0,
            row_step: 26.0,
            paragraph_gap: 18.0,
            divider_every: 4,
        }
    }
}

/// One planned character cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphCell {
    /// Character to draw.
    pub ch: char,
    /// Sample point x.
    pub x: f64,
    /// Sample point y.
    pub y: f64,
    /// Column index, counted from the right.
    pub column: usize,
}

/// Planned glyph cells plus divider rule positions.
#[derive(Clone, Debug, Default)]
pub struct ColumnPlan {
    /// Character cells in draw order.
    pub cells: Vec<GlyphCell>,
    /// X positions of vertical divider rules.
    pub dividers: Vec<f64>,
}

/// Cyclic pool over fixed sentences: one character per call, with a
/// paragraph marker between sentences.
struct SentencePool<'a> {
    sentences: &'a [String],
    chars: Vec<Vec<char>>,
    sentence: usize,
    offset: usize,
}

impl<'a> SentencePool<'a> {
    fn new(sentences: &'a [String]) -> Self {
        Self {
            sentences,
            chars: sentences.iter().map(|s| s.chars().collect()).collect(),
            sentence: 0,
            offset: 0,
        }
    }

    /// `Some(ch)` for the next character, `None` exactly once at each
    /// sentence boundary.
    fn step(&mut self) -> Option<char> {
        if self.sentences.is_empty() {
            return Some('\u{3000}');
        }
        let current = &self.chars[self.sentence % self.chars.len()];
        if self.offset >= current.len() {
            self.sentence += 1;
            self.offset = 0;
            return None;
        }
        let ch = current[self.offset];
        self.offset += 1;
        Some(ch)
    }
}

/// Walk the column grid right-to-left, top-to-bottom, skipping sample points
/// inside any exclusion rectangle.
///
/// A skipped point advances the vertical position without consuming a
/// character, so text resumes correctly below the gap and never lands under
/// an inset image.
pub fn plan_columns(layout: &ColumnLayout, sentences: &[String], exclusions: &[Rect]) -> ColumnPlan {
    let mut pool = SentencePool::new(sentences);
    let mut plan = ColumnPlan::default();

    let mut x = layout.right;
    let mut column = 0usize;
    while x >= layout.left {
        let mut y = layout.top;
        while y < layout.bottom {
            let p = Point::new(x, y);
            if exclusions.iter().any(|r| r.contains(p)) {
                y += layout.row_step;
                continue;
            }
            match pool.step() {
                Some(ch) => {
                    plan.cells.push(GlyphCell { ch, x, y, column });
                    y += layout.row_step;
                }
                None => {
                    // Sentence boundary: paragraph gap, no glyph.
                    y += layout.paragraph_gap;
                }
            }
        }

        column += 1;
        if layout.divider_every > 0 && column % layout.divider_every == 0 {
            plan.dividers.push(x - layout.col_step * 0.5);
        }
        x -= layout.col_step;
    }

    plan
}
