//! # TextView
//!
//! The auto-sizing text input at the bottom of the stack.
//!
//! ## Responsibilities
//!
//! - Hold the raw text and the caret
//! - Show a placeholder while the text is empty
//! - Measure the text and decide the view's expected height
//! - Switch internal scrolling on once the line cap is reached
//! - Keep the caret visible after every resize
//!
//! ## Height Notification
//!
//! Anything that can change the measured height (text, font, insets, width,
//! line cap) funnels into [`TextView::recompute_size`], which returns
//! `Some(HeightChanged)` only when the expected height differs from the last
//! one it reported. The owner (normally `InputBar`) reacts to that value;
//! the text view never calls back up.
//!
//! ```text
//! set_text / edit ─┐
//! set_font ────────┤
//! set_insets ──────┼──► recompute_size() ──► Option<HeightChanged>
//! set_max_lines ───┤
//! set_frame (width)┘
//! ```

mod cursor;
mod text_wrap;

use std::ops::Range;

use log::debug;

use crate::core::geometry::{EdgeInsets, Rect, Size};
use crate::core::style::Color;

use cursor::CaretState;
pub use cursor::CaretMotion;
pub use text_wrap::FontMetrics;
use text_wrap::{
    columns_for, display_width, measure_text_height, next_char_boundary, prev_char_boundary,
    visual_lines,
};

/// Emitted when the expected height of the text view changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightChanged(pub f64);

/// A pending replacement of `range` (byte offsets) with `replacement`.
///
/// Edits are described before they are applied so an owner can veto them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub range: Range<usize>,
    pub replacement: String,
}

/// Placeholder shown while the text is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub text: String,
    pub color: Color,
    visible: bool,
}

impl Placeholder {
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Multi-line text input that sizes itself to its content.
#[derive(Debug, Clone)]
pub struct TextView {
    text: String,
    caret: CaretState,
    font: Option<FontMetrics>,
    insets: EdgeInsets,
    /// 0 = no cap
    max_lines: usize,
    frame: Rect,
    expected_height: f64,
    scroll_enabled: bool,
    last_reported_height: Option<f64>,
    placeholder: Placeholder,
}

impl Default for TextView {
    fn default() -> Self {
        Self::new()
    }
}

impl TextView {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            caret: CaretState::default(),
            font: Some(FontMetrics::default()),
            insets: EdgeInsets::ZERO,
            max_lines: 0,
            frame: Rect::ZERO,
            expected_height: 0.0,
            scroll_enabled: false,
            last_reported_height: None,
            placeholder: Placeholder {
                text: String::new(),
                color: Color::LIGHT_GRAY,
                visible: false,
            },
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the whole text. Runs the same path as a user edit and leaves
    /// the caret at the end.
    pub fn set_text(&mut self, text: impl Into<String>) -> Option<HeightChanged> {
        self.text = text.into();
        self.caret.pos = self.text.len();
        self.text_did_change()
    }

    /// Call after the text changed: refresh the placeholder, then the size.
    pub fn text_did_change(&mut self) -> Option<HeightChanged> {
        self.caret.clamp_to(&self.text);
        self.update_placeholder();
        self.recompute_size()
    }

    // ------------------------------------------------------------------
    // Sizing
    // ------------------------------------------------------------------

    /// Measure the text and update the expected height and scrolling.
    ///
    /// Returns the new height if it differs from the last reported one.
    pub fn recompute_size(&mut self) -> Option<HeightChanged> {
        let measured = self.measured_height();
        match self.max_height() {
            Some(cap) if measured >= cap => {
                self.expected_height = cap;
                self.scroll_enabled = true;
            }
            _ => {
                self.expected_height = measured;
                self.scroll_enabled = false;
            }
        }

        let changed = self.last_reported_height != Some(self.expected_height);
        self.ensure_caret_visible();

        changed.then(|| {
            debug!(
                "text view height {:?} -> {} (scroll: {})",
                self.last_reported_height, self.expected_height, self.scroll_enabled
            );
            self.last_reported_height = Some(self.expected_height);
            HeightChanged(self.expected_height)
        })
    }

    /// Uncapped height of the current text plus vertical insets.
    pub fn measured_height(&self) -> f64 {
        let width = self.frame.width() - self.insets.horizontal();
        measure_text_height(&self.text, width, self.font.as_ref()) + self.insets.vertical()
    }

    /// Height of a single line plus vertical insets.
    pub fn minimum_height(&self) -> f64 {
        let line = self.font.map(|f| f.rounded_line_height()).unwrap_or(0.0);
        line + self.insets.vertical()
    }

    /// Height cap from `max_lines`, `None` when unbounded.
    pub fn max_height(&self) -> Option<f64> {
        if self.max_lines == 0 {
            return None;
        }
        let line = self.font.map(|f| f.rounded_line_height()).unwrap_or(0.0);
        Some(line * self.max_lines as f64 + self.insets.vertical())
    }

    pub fn expected_height(&self) -> f64 {
        self.expected_height
    }

    pub fn is_scroll_enabled(&self) -> bool {
        self.scroll_enabled
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn set_max_lines(&mut self, max_lines: usize) -> Option<HeightChanged> {
        self.max_lines = max_lines;
        self.recompute_size()
    }

    pub fn font(&self) -> Option<FontMetrics> {
        self.font
    }

    pub fn set_font(&mut self, font: Option<FontMetrics>) -> Option<HeightChanged> {
        self.font = font;
        self.recompute_size()
    }

    pub fn insets(&self) -> EdgeInsets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: EdgeInsets) -> Option<HeightChanged> {
        self.insets = insets;
        self.recompute_size()
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Place the view. Only a width change can alter the measured height, so
    /// only then is the size recomputed.
    pub fn set_frame(&mut self, frame: Rect) -> Option<HeightChanged> {
        let width_changed = frame.width() != self.frame.width();
        self.frame = frame;
        if width_changed {
            self.recompute_size()
        } else {
            None
        }
    }

    // ------------------------------------------------------------------
    // Placeholder
    // ------------------------------------------------------------------

    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    pub fn set_placeholder(&mut self, text: impl Into<String>) {
        self.placeholder.text = text.into();
        self.update_placeholder();
    }

    pub fn set_placeholder_color(&mut self, color: Color) {
        self.placeholder.color = color;
    }

    /// Where the placeholder label sits: the bounds inset by the container
    /// insets, one line tall, as wide as its text (or the view).
    pub fn placeholder_frame(&self) -> Rect {
        let bounds = Rect::new(0.0, 0.0, self.frame.width(), self.frame.height());
        let content = bounds.inset_by(self.insets);
        let (line, glyph) = self
            .font
            .map(|f| (f.rounded_line_height(), f.char_width))
            .unwrap_or((0.0, 0.0));
        let width = (display_width(&self.placeholder.text) as f64 * glyph).min(content.width());
        Rect {
            origin: content.origin,
            size: Size::new(width, line),
        }
    }

    fn update_placeholder(&mut self) {
        self.placeholder.visible = !self.placeholder.text.is_empty() && self.text.is_empty();
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Describe inserting `s` at the caret.
    pub fn insert_request(&self, s: &str) -> EditRequest {
        EditRequest {
            range: self.caret.pos..self.caret.pos,
            replacement: s.to_string(),
        }
    }

    /// Describe deleting the char before the caret.
    pub fn delete_backward_request(&self) -> Option<EditRequest> {
        (self.caret.pos > 0).then(|| EditRequest {
            range: prev_char_boundary(&self.text, self.caret.pos)..self.caret.pos,
            replacement: String::new(),
        })
    }

    /// Describe deleting the char after the caret.
    pub fn delete_forward_request(&self) -> Option<EditRequest> {
        (self.caret.pos < self.text.len()).then(|| EditRequest {
            range: self.caret.pos..next_char_boundary(&self.text, self.caret.pos),
            replacement: String::new(),
        })
    }

    /// Apply an edit and leave the caret after the replacement.
    ///
    /// Returns `false` (and changes nothing) if the range is out of bounds or
    /// splits a char. Does not recompute the size; follow with
    /// [`TextView::text_did_change`].
    pub fn replace_range(&mut self, edit: &EditRequest) -> bool {
        let Range { start, end } = edit.range;
        if start > end
            || end > self.text.len()
            || !self.text.is_char_boundary(start)
            || !self.text.is_char_boundary(end)
        {
            return false;
        }
        self.text.replace_range(start..end, &edit.replacement);
        self.caret.pos = start + edit.replacement.len();
        true
    }

    pub fn caret(&self) -> usize {
        self.caret.pos
    }

    /// Move the caret and keep it on screen. Returns `true` if it moved.
    pub fn move_caret(&mut self, motion: CaretMotion) -> bool {
        let columns = self.columns();
        let moved = self.caret.apply(&self.text, motion, columns);
        if moved {
            self.ensure_caret_visible();
        }
        moved
    }

    // ------------------------------------------------------------------
    // Scrolling and rendering support
    // ------------------------------------------------------------------

    /// Vertical scroll offset in points.
    pub fn content_offset(&self) -> f64 {
        let line = self.font.map(|f| f.line_height).unwrap_or(0.0);
        self.caret.scroll_line as f64 * line
    }

    /// Index of the first visual line on screen.
    pub fn first_visible_line(&self) -> usize {
        self.caret.scroll_line
    }

    /// The text split into visual lines at the current width.
    pub fn lines(&self) -> Vec<&str> {
        let columns = self.columns().max(1);
        visual_lines(&self.text, columns)
            .into_iter()
            .map(|range| &self.text[range])
            .collect()
    }

    /// Caret rectangle in the view's own coordinates, after scrolling.
    pub fn caret_rect(&self) -> Rect {
        let Some(font) = self.font else {
            return Rect::new(self.insets.left, self.insets.top, 0.0, 0.0);
        };
        let lines = visual_lines(&self.text, self.columns().max(1));
        let line = self.caret.line_index(&lines);
        let column = self.caret.column(&self.text, &lines);
        Rect::new(
            self.insets.left + column as f64 * font.char_width,
            self.insets.top + line as f64 * font.line_height - self.content_offset(),
            1.0,
            font.line_height,
        )
    }

    fn columns(&self) -> usize {
        match self.font {
            Some(font) => columns_for(self.frame.width() - self.insets.horizontal(), &font),
            None => 0,
        }
    }

    /// Scroll the caret's line into view, without animation.
    fn ensure_caret_visible(&mut self) {
        let visible = match self.font {
            Some(font) if self.scroll_enabled && font.line_height > 0.0 => {
                ((self.expected_height - self.insets.vertical()) / font.line_height).floor() as usize
            }
            _ => 0,
        };
        let columns = self.columns();
        if columns == 0 || visible == 0 {
            self.caret.scroll_line = 0;
            return;
        }
        let lines = visual_lines(&self.text, columns);
        self.caret.keep_visible(&lines, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10pt lines, 10pt glyphs, 1pt top/bottom insets, 100pt wide (10 columns).
    fn text_view(max_lines: usize) -> TextView {
        let mut view = TextView::new();
        let _ = view.set_font(Some(FontMetrics::new(10.0, 10.0)));
        let _ = view.set_insets(EdgeInsets::new(1.0, 0.0, 1.0, 0.0));
        let _ = view.set_max_lines(max_lines);
        let _ = view.set_frame(Rect::new(0.0, 0.0, 100.0, 12.0));
        view
    }

    #[test]
    fn minimum_height_is_one_line_plus_insets() {
        let view = text_view(0);
        assert_eq!(view.minimum_height(), 12.0);
    }

    #[test]
    fn minimum_height_follows_font() {
        let mut view = text_view(0);
        let _ = view.set_font(Some(FontMetrics::new(16.2, 8.0)));
        assert_eq!(view.minimum_height(), 19.0);
        let _ = view.set_font(None);
        assert_eq!(view.minimum_height(), 2.0);
    }

    #[test]
    fn empty_text_is_one_line_tall() {
        let view = text_view(3);
        assert_eq!(view.expected_height(), 12.0);
        assert!(!view.is_scroll_enabled());
    }

    #[test]
    fn unbounded_grows_with_text() {
        let mut view = text_view(0);
        // 500 chars, 10 columns: 50 lines
        let _ = view.set_text("x".repeat(500));
        assert_eq!(view.expected_height(), 502.0);
        assert!(!view.is_scroll_enabled());
    }

    #[test]
    fn capped_height_enables_scrolling() {
        let mut view = text_view(3);
        let change = view.set_text("x".repeat(45)); // 5 lines
        assert_eq!(change, Some(HeightChanged(32.0)));
        assert_eq!(view.expected_height(), view.max_height().unwrap());
        assert!(view.is_scroll_enabled());
    }

    #[test]
    fn exactly_at_cap_scrolls() {
        let mut view = text_view(3);
        let _ = view.set_text("x".repeat(30)); // 3 lines
        assert_eq!(view.expected_height(), 32.0);
        assert!(view.is_scroll_enabled());
    }

    #[test]
    fn same_text_twice_reports_once() {
        let mut view = text_view(0);
        assert_eq!(view.set_text("x".repeat(15)), Some(HeightChanged(22.0)));
        assert_eq!(view.set_text("x".repeat(15)), None);
        // Different text, same height: still nothing to report
        assert_eq!(view.set_text("y".repeat(12)), None);
    }

    #[test]
    fn first_computation_always_reports() {
        let mut view = TextView::new();
        assert!(view.recompute_size().is_some());
        assert!(view.recompute_size().is_none());
    }

    #[test]
    fn removing_cap_disables_scrolling() {
        let mut view = text_view(2);
        let _ = view.set_text("x".repeat(50));
        assert!(view.is_scroll_enabled());
        let change = view.set_max_lines(0);
        assert!(!view.is_scroll_enabled());
        assert_eq!(change, Some(HeightChanged(52.0)));
    }

    #[test]
    fn zero_width_degenerates_to_insets() {
        let mut view = text_view(0);
        let _ = view.set_text("hello");
        let _ = view.set_frame(Rect::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(view.expected_height(), 2.0);
    }

    #[test]
    fn missing_font_degenerates_to_insets() {
        let mut view = text_view(3);
        let _ = view.set_text("hello\nworld");
        let _ = view.set_font(None);
        assert_eq!(view.expected_height(), 2.0);
        // Cap is also insets-only, so measured == cap
        assert!(view.is_scroll_enabled());
    }

    #[test]
    fn height_is_monotonic_in_line_count() {
        let mut view = text_view(4);
        let mut previous = 0.0;
        for n in 0..80 {
            let _ = view.set_text("x".repeat(n));
            assert!(view.expected_height() >= previous);
            previous = view.expected_height();
        }
        assert_eq!(previous, view.max_height().unwrap());
    }

    #[test]
    fn placeholder_visibility_transitions() {
        let mut view = text_view(0);
        assert!(!view.placeholder().is_visible(), "no placeholder text yet");

        view.set_placeholder("Type here");
        assert!(view.placeholder().is_visible());

        let _ = view.set_text("hi");
        assert!(!view.placeholder().is_visible());

        let _ = view.set_text("");
        assert!(view.placeholder().is_visible());

        view.set_placeholder("");
        assert!(!view.placeholder().is_visible());
    }

    #[test]
    fn placeholder_frame_sits_inside_insets() {
        let mut view = text_view(0);
        view.set_placeholder("Type");
        assert_eq!(view.placeholder_frame(), Rect::new(0.0, 1.0, 40.0, 10.0));
    }

    #[test]
    fn edits_replace_and_move_caret() {
        let mut view = text_view(0);
        let _ = view.set_text("helo");
        let _ = view.move_caret(CaretMotion::Left);
        let edit = view.insert_request("l");
        assert_eq!(edit.range, 3..3);
        assert!(view.replace_range(&edit));
        assert_eq!(view.text(), "hello");
        assert_eq!(view.caret(), 4);

        let back = view.delete_backward_request().unwrap();
        assert!(view.replace_range(&back));
        assert_eq!(view.text(), "helo");

        let fwd = view.delete_forward_request().unwrap();
        assert_eq!(fwd.range, 3..4);
    }

    #[test]
    fn replace_range_rejects_bad_ranges() {
        let mut view = text_view(0);
        let _ = view.set_text("a🔥");
        let edit = EditRequest { range: 2..3, replacement: String::new() };
        assert!(!view.replace_range(&edit));
        let edit = EditRequest { range: 0..9, replacement: String::new() };
        assert!(!view.replace_range(&edit));
        assert_eq!(view.text(), "a🔥");
    }

    #[test]
    fn caret_stays_visible_while_capped() {
        let mut view = text_view(3);
        let _ = view.set_text("1\n2\n3\n4\n5\n6");
        assert!(view.is_scroll_enabled());
        assert_eq!(view.first_visible_line(), 3);
        assert_eq!(view.content_offset(), 30.0);
        assert_eq!(view.caret_rect().y(), 1.0 + 50.0 - 30.0);

        for _ in 0..5 {
            let _ = view.move_caret(CaretMotion::Up);
        }
        assert_eq!(view.first_visible_line(), 0);
    }

    #[test]
    fn uncapping_resets_scroll_offset() {
        let mut view = text_view(2);
        let _ = view.set_text("1\n2\n3\n4");
        assert!(view.content_offset() > 0.0);
        let _ = view.set_max_lines(0);
        assert_eq!(view.content_offset(), 0.0);
    }
}
