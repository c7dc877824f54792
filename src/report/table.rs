use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::LayoutConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Right,
}

/// Fixed column width (points) and text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub width: f32,
    pub align: Align,
}

impl ColumnSpec {
    pub fn left(width: f32) -> Self {
        Self { width, align: Align::Left }
    }

    pub fn right(width: f32) -> Self {
        Self { width, align: Align::Right }
    }
}

/// Presentation hint for a cell. Derived from the variance sign; never feeds back
/// into matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CellTone {
    #[default]
    Plain,
    Increase,
    Decrease,
    Flagged,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub text: String,
    pub tone: CellTone,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), tone: CellTone::Plain }
    }

    pub fn toned(text: impl Into<String>, tone: CellTone) -> Self {
        Self { text: text.into(), tone }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Shade {
    #[default]
    None,
    Alternate,
    Header,
}

/// One positioned cell, ready to paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawCell {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<String>,
    pub align: Align,
    pub tone: CellTone,
    pub shade: Shade,
}

/// A row after wrapping: per-cell lines and the resulting height.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredRow {
    pub cells: Vec<(Vec<String>, CellTone)>,
    pub line_count: usize,
    pub height: f32,
}

/// Wraps cell text to column widths and turns measured rows into draw cells.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    config: LayoutConfig,
}

impl TableRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    fn glyph_width(&self) -> f32 {
        (self.config.font_size * self.config.glyph_width_ratio).max(0.1)
    }

    /// Rendered width of `text` in points, from its display width in cells.
    pub fn text_width(&self, text: &str) -> f32 {
        UnicodeWidthStr::width(text) as f32 * self.glyph_width()
    }

    /// How many display cells fit inside a column after insets.
    fn capacity(&self, column_width: f32) -> usize {
        let usable = column_width - 2.0 * self.config.cell_inset;
        ((usable / self.glyph_width()).floor() as usize).max(1)
    }

    /// Greedy word wrap; words wider than the column are broken by character.
    /// Always returns at least one line.
    pub fn wrap(&self, text: &str, column_width: f32) -> Vec<String> {
        let max = self.capacity(column_width);
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            let mut line = String::new();
            let mut used = 0usize;

            for word in paragraph.split_whitespace() {
                let width = UnicodeWidthStr::width(word);
                if width > max {
                    if !line.is_empty() {
                        lines.push(std::mem::take(&mut line));
                    }
                    let mut pieces = hard_break(word, max);
                    let last = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                    used = UnicodeWidthStr::width(last.as_str());
                    line = last;
                    continue;
                }

                let needed = if line.is_empty() { width } else { used + 1 + width };
                if needed <= max {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(word);
                    used = needed;
                } else {
                    lines.push(std::mem::replace(&mut line, word.to_string()));
                    used = width;
                }
            }
            lines.push(line);
        }

        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }

    /// Wraps every cell; the tallest cell sets the row height. Cells past the last
    /// column are dropped, missing cells render empty.
    pub fn measure(&self, columns: &[ColumnSpec], cells: &[Cell]) -> MeasuredRow {
        let wrapped: Vec<(Vec<String>, CellTone)> = columns
            .iter()
            .enumerate()
            .map(|(idx, col)| match cells.get(idx) {
                Some(cell) => (self.wrap(&cell.text, col.width), cell.tone),
                None => (vec![String::new()], CellTone::Plain),
            })
            .collect();

        let line_count = wrapped.iter().map(|(lines, _)| lines.len()).max().unwrap_or(1);
        MeasuredRow {
            height: self.config.row_height(line_count),
            line_count,
            cells: wrapped,
        }
    }

    /// One draw instruction per cell at vertical position `y`.
    pub fn draw(&self, columns: &[ColumnSpec], row: &MeasuredRow, y: f32, shade: Shade) -> Vec<DrawCell> {
        let mut x = self.config.margin_left;
        columns
            .iter()
            .zip(&row.cells)
            .map(|(col, (lines, tone))| {
                let cell = DrawCell {
                    x,
                    y,
                    width: col.width,
                    height: row.height,
                    lines: lines.clone(),
                    align: col.align,
                    tone: *tone,
                    shade,
                };
                x += col.width;
                cell
            })
            .collect()
    }
}

fn hard_break(word: &str, max: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut used = 0usize;
    for ch in word.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            used = 0;
        }
        piece.push(ch);
        used += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    // 8pt font at 0.5 ratio → 4pt per cell; 3pt insets
    fn renderer() -> TableRenderer {
        TableRenderer::new(LayoutConfig::default())
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(renderer().wrap("Body Labor", 100.0), vec!["Body Labor"]);
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // (46 - 6) / 4 = 10 cells per line
        let lines = renderer().wrap("Repl Rear Bumper Cover", 46.0);
        assert_eq!(lines, vec!["Repl Rear", "Bumper", "Cover"]);
    }

    #[test]
    fn long_words_are_hard_broken() {
        let lines = renderer().wrap("ABCDEFGHIJKLMNO xy", 46.0);
        assert_eq!(lines, vec!["ABCDEFGHIJ", "KLMNO xy"]);
    }

    #[test]
    fn wrapping_resumes_after_a_hard_break() {
        // "KLMNO" + " wxyz" fills the 10 cells exactly, "ab" moves down
        let lines = renderer().wrap("ABCDEFGHIJKLMNO wxyz ab", 46.0);
        assert_eq!(lines, vec!["ABCDEFGHIJ", "KLMNO wxyz", "ab"]);

        let lines = renderer().wrap("Repl ABCDEFGHIJKL Cover", 46.0);
        assert_eq!(lines, vec!["Repl", "ABCDEFGHIJ", "KL Cover"]);
    }

    #[test]
    fn empty_text_is_one_blank_line() {
        assert_eq!(renderer().wrap("", 50.0), vec![""]);
        assert_eq!(renderer().wrap("   ", 50.0), vec![""]);
    }

    #[test]
    fn row_height_follows_tallest_cell() {
        let r = renderer();
        let columns = [ColumnSpec::left(46.0), ColumnSpec::right(100.0)];
        let row = r.measure(
            &columns,
            &[Cell::plain("Repl Rear Bumper Cover"), Cell::toned("+$50.00", CellTone::Increase)],
        );
        assert_eq!(row.line_count, 3);
        assert_eq!(row.height, LayoutConfig::default().row_height(3));
    }

    #[test]
    fn draw_lays_cells_left_to_right() {
        let r = renderer();
        let columns = [ColumnSpec::left(46.0), ColumnSpec::right(100.0)];
        let row = r.measure(&columns, &[Cell::plain("a")]);
        let cells = r.draw(&columns, &row, 120.0, Shade::Alternate);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].x, 36.0);
        assert_eq!(cells[1].x, 82.0);
        assert_eq!(cells[1].lines, vec![""]);
        assert!(cells.iter().all(|c| c.y == 120.0 && c.shade == Shade::Alternate));
    }
}
