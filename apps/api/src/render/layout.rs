//! Page geometry for the paginated text renderer.
//!
//! Courier is monospaced at 0.6em per glyph, so the line budget is a plain
//! character count. Wrapping is greedy per word, the same way a multi-cell text
//! box wraps, and a word longer than a whole line is hard-split. Spacing inside
//! a printed line is left as written.

use serde::{Deserialize, Serialize};

/// Courier advance width in em units. Identical for every glyph.
pub const COURIER_ADVANCE_EM: f32 = 0.6;

const PT_PER_MM: f32 = 72.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Layout parameters for the PDF export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfLayout {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub font_size_pt: f32,
    /// Fixed cell height for every emitted line, blank or not.
    pub line_height_mm: f32,
    /// Width the logo is scaled to on the first page. Height follows its aspect.
    pub logo_width_mm: f32,
    /// Tall logos are scaled down further so their height stays within this.
    pub logo_max_height_mm: f32,
    /// Vertical gap between the logo and the first text line.
    pub logo_gap_mm: f32,
}

/// A4 portrait, 15 mm margins, Courier 10pt on 6 mm lines.
impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 15.0,
            font_size_pt: 10.0,
            line_height_mm: 6.0,
            logo_width_mm: 40.0,
            logo_max_height_mm: 60.0,
            logo_gap_mm: 5.0,
        }
    }
}

impl PdfLayout {
    /// Glyphs that fit between the left and right margins.
    pub fn chars_per_line(&self) -> usize {
        let usable_pt = (self.page_width_mm - 2.0 * self.margin_mm) * PT_PER_MM;
        let glyph_pt = self.font_size_pt * COURIER_ADVANCE_EM;
        ((usable_pt / glyph_pt).floor() as usize).max(1)
    }

    /// Line slots on a page after `reserved_mm` is taken from the top.
    pub fn lines_per_page(&self, reserved_mm: f32) -> usize {
        let usable = self.page_height_mm - 2.0 * self.margin_mm - reserved_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }

    /// Printed `(width, height)` of a logo with the given height/width ratio.
    /// Width is `logo_width_mm` unless the height cap binds first.
    pub fn logo_size_mm(&self, aspect: f32) -> (f32, f32) {
        let height = self.logo_width_mm * aspect;
        if height <= self.logo_max_height_mm {
            (self.logo_width_mm, height)
        } else {
            (self.logo_max_height_mm / aspect, self.logo_max_height_mm)
        }
    }

    /// Vertical space the logo block takes on the first page.
    pub fn logo_block_mm(&self, aspect: f32) -> f32 {
        self.logo_size_mm(aspect).1 + self.logo_gap_mm
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapping and pagination
// ────────────────────────────────────────────────────────────────────────────

/// Wraps one source line into printed lines of at most `width` characters.
///
/// Indentation and runs of inner spaces are kept; only the whitespace at a
/// break point is consumed. A blank source line yields one empty printed line
/// so vertical spacing survives.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let line = line.trim_end();
    if line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut out: Vec<String> = Vec::new();
    let mut current: Vec<char> = Vec::new();

    for piece in spaced_words(line) {
        if current.len() + piece.len() <= width {
            current.extend(piece);
            continue;
        }

        let mut word = piece;
        if !current.is_empty() || !out.is_empty() {
            if !current.is_empty() {
                out.push(current.drain(..).collect());
            }
            // The break consumes the separating whitespace.
            strip_leading_whitespace(&mut word);
        }

        // Hard-split words that cannot fit on any line.
        while word.len() > width {
            let rest = word.split_off(width);
            out.push(word.into_iter().collect());
            word = rest;
        }
        current = word;
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current.into_iter().collect());
    }
    out
}

/// Splits a line into pieces of leading whitespace plus one word: `"  a  b"`
/// becomes `["  a", "  b"]`. Concatenating the pieces gives the line back.
fn spaced_words(line: &str) -> Vec<Vec<char>> {
    let mut pieces = Vec::new();
    let mut piece = Vec::new();
    let mut in_word = false;
    for c in line.chars() {
        let is_space = c.is_whitespace();
        if is_space && in_word {
            pieces.push(std::mem::take(&mut piece));
            in_word = false;
        }
        in_word |= !is_space;
        piece.push(c);
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn strip_leading_whitespace(word: &mut Vec<char>) {
    let skip = word.iter().take_while(|c| c.is_whitespace()).count();
    word.drain(..skip);
}

/// Splits `text` into pages of printed lines.
///
/// `first_page_reserved_mm` is taken off the first page only (the logo block).
/// Always returns at least one page, possibly empty.
pub fn paginate(text: &str, layout: &PdfLayout, first_page_reserved_mm: f32) -> Vec<Vec<String>> {
    let width = layout.chars_per_line();
    let first_capacity = layout.lines_per_page(first_page_reserved_mm);
    let capacity = layout.lines_per_page(0.0);

    let mut pages: Vec<Vec<String>> = vec![Vec::new()];
    for printed in text.lines().flat_map(|line| wrap_line(line, width)) {
        let limit = if pages.len() == 1 {
            first_capacity
        } else {
            capacity
        };
        if pages.last().map_or(0, Vec::len) >= limit {
            pages.push(Vec::new());
        }
        if let Some(page) = pages.last_mut() {
            page.push(printed);
        }
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_budget() {
        let layout = PdfLayout::default();
        // 180 mm ≈ 510.2 pt; 10pt Courier glyph = 6 pt → 85 glyphs.
        assert_eq!(layout.chars_per_line(), 85);
        // 267 mm / 6 mm → 44 lines.
        assert_eq!(layout.lines_per_page(0.0), 44);
        assert_eq!(layout.lines_per_page(45.0), 37);
    }

    #[test]
    fn test_wide_logo_keeps_full_width() {
        let layout = PdfLayout::default();
        assert_eq!(layout.logo_size_mm(0.5), (40.0, 20.0));
        assert_eq!(layout.logo_block_mm(0.5), 25.0);
    }

    #[test]
    fn test_tall_logo_is_capped_and_text_stays_on_page() {
        let layout = PdfLayout::default();
        // A 10×100 px logo.
        let (width, height) = layout.logo_size_mm(10.0);
        assert_eq!(height, 60.0);
        assert!((width - 6.0).abs() < 1e-4);

        let reserved = layout.logo_block_mm(10.0);
        let text = (0..60).map(|i| format!("{i}")).collect::<Vec<_>>().join("\n");
        let pages = paginate(&text, &layout, reserved);
        // (267 - 65) / 6 → 33 lines below the logo.
        assert_eq!(pages[0].len(), 33);

        let top = layout.page_height_mm - layout.margin_mm - reserved;
        let last_baseline = top - pages[0].len() as f32 * layout.line_height_mm;
        assert!(last_baseline >= layout.margin_mm);
    }

    #[test]
    fn test_short_line_is_verbatim() {
        assert_eq!(wrap_line("# Overview", 20), vec!["# Overview"]);
        assert_eq!(wrap_line("", 20), vec![""]);
    }

    #[test]
    fn test_long_line_wraps_on_words() {
        let wrapped = wrap_line("alpha beta gamma delta", 11);
        assert_eq!(wrapped, vec!["alpha beta", "gamma delta"]);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 11));
    }

    #[test]
    fn test_oversized_word_is_hard_split() {
        let wrapped = wrap_line("x abcdefghij y", 4);
        assert_eq!(wrapped, vec!["x", "abcd", "efgh", "ij y"]);
    }

    #[test]
    fn test_wrap_keeps_indentation_and_inner_spacing() {
        let wrapped = wrap_line("    indented  double  spaced  words here", 20);
        assert_eq!(wrapped, vec!["    indented  double", "spaced  words here"]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        let wrapped = wrap_line("±0.1 °C ±0.2 °C", 7);
        assert_eq!(wrapped, vec!["±0.1 °C", "±0.2 °C"]);
    }

    #[test]
    fn test_paginate_spills_onto_second_page() {
        let layout = PdfLayout::default();
        let text = (0..50).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let pages = paginate(&text, &layout, 0.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 44);
        assert_eq!(pages[1].len(), 6);
        assert_eq!(pages[1][0], "line 44");
    }

    #[test]
    fn test_reserved_space_shrinks_first_page_only() {
        let layout = PdfLayout::default();
        let text = (0..80).map(|i| format!("{i}")).collect::<Vec<_>>().join("\n");
        let pages = paginate(&text, &layout, 45.0);
        assert_eq!(pages[0].len(), 37);
        assert_eq!(pages[1].len(), 43);
    }

    #[test]
    fn test_blank_lines_keep_their_slot() {
        let pages = paginate("a\n\nb", &PdfLayout::default(), 0.0);
        assert_eq!(pages, vec![vec!["a".to_string(), String::new(), "b".to_string()]]);
    }

    #[test]
    fn test_empty_text_yields_one_empty_page() {
        let pages = paginate("", &PdfLayout::default(), 0.0);
        assert_eq!(pages, vec![Vec::<String>::new()]);
    }
}
