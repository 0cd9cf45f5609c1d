//! Text measurement for the TextView.
//!
//! Stateless helpers: font metrics, soft-wrapping into visual lines and
//! char-boundary stepping. Nothing here knows about carets or delegates.

use std::borrow::Cow;
use std::ops::Range;

use unicode_width::UnicodeWidthStr;

/// The two numbers layout needs from a font.
///
/// Glyph advance is modelled as `char_width` per display column (so wide
/// CJK characters take two), which is exact for terminal cells and a close
/// enough stand-in for a monospaced face elsewhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub line_height: f64,
    pub char_width: f64,
}

impl FontMetrics {
    pub fn new(line_height: f64, char_width: f64) -> Self {
        Self { line_height, char_width }
    }

    /// Approximate metrics for a UI font of the given point size.
    pub fn with_point_size(size: f64) -> Self {
        Self::new(size * 1.193, size * 0.55)
    }

    /// One terminal cell per column and per line.
    pub fn cell() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Whole-point line height, as used for caps and minimum heights.
    pub fn rounded_line_height(&self) -> f64 {
        self.line_height.max(0.0).ceil()
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::with_point_size(14.0)
    }
}

/// Build textwrap options for the given column count.
pub(super) fn wrap_options(columns: usize) -> textwrap::Options<'static> {
    textwrap::Options::new(columns.max(1))
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// How many display columns fit in `width` points. 0 when nothing fits or
/// the font is degenerate.
pub(super) fn columns_for(width: f64, font: &FontMetrics) -> usize {
    if width <= 0.0 || font.char_width <= 0.0 || !width.is_finite() {
        return 0;
    }
    (width / font.char_width).floor() as usize
}

/// Byte ranges of every visual line of `text` wrapped at `columns`.
///
/// Ranges never include the `\n` that ends a logical line, but do keep any
/// trailing spaces that textwrap trims, so the ranges tile the text (minus
/// newlines) exactly. A trailing newline yields a final empty line, and the
/// empty string is one empty line.
pub(super) fn visual_lines(text: &str, columns: usize) -> Vec<Range<usize>> {
    let options = wrap_options(columns);
    let base = text.as_ptr() as usize;
    let mut lines = Vec::new();
    let mut logical_start = 0;

    for logical in text.split('\n') {
        let logical_end = logical_start + logical.len();
        let mut starts: Vec<usize> = Vec::new();

        for segment in textwrap::wrap(logical, &options) {
            // Borrowed segments point into `text`; anything else is ignored and
            // the previous start stands.
            if let Cow::Borrowed(s) = segment {
                let offset = (s.as_ptr() as usize).wrapping_sub(base);
                let in_line = (logical_start..=logical_end).contains(&offset);
                if in_line && starts.last().is_none_or(|&prev| offset > prev) {
                    starts.push(offset);
                }
            }
        }
        if starts.first() != Some(&logical_start) {
            starts.insert(0, logical_start);
        }

        for (i, &start) in starts.iter().enumerate() {
            let end = starts.get(i + 1).copied().unwrap_or(logical_end);
            lines.push(start..end);
        }
        logical_start = logical_end + 1;
    }

    lines
}

/// Number of visual lines for `text` at `columns`.
pub(super) fn wrap_line_count(text: &str, columns: usize) -> usize {
    visual_lines(text, columns).len()
}

/// Height in points of `text` laid out `width` points wide, rounded up.
///
/// Degenerates to 0 when there is no font or no width to lay out into.
pub(super) fn measure_text_height(text: &str, width: f64, font: Option<&FontMetrics>) -> f64 {
    let Some(font) = font else {
        return 0.0;
    };
    let columns = columns_for(width, font);
    if columns == 0 || font.line_height <= 0.0 {
        return 0.0;
    }
    (wrap_line_count(text, columns) as f64 * font.line_height).ceil()
}

/// Display width of a slice in columns.
pub(super) fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Byte offset of the char boundary before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Byte offset of the char boundary after `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}
