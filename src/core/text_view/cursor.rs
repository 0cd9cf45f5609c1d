//! Caret position and internal scroll offset for the TextView.
//!
//! `CaretState` owns the caret byte offset and the first visible line. Every
//! method takes `text: &str` explicitly since the text itself is owned by
//! `TextView`.

use std::ops::Range;

use super::text_wrap::{display_width, next_char_boundary, prev_char_boundary, visual_lines};

/// Caret movements the edit surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMotion {
    Left,
    Right,
    /// Start of the current logical line
    Home,
    /// End of the current logical line
    End,
    Up,
    Down,
}

#[derive(Debug, Clone, Default)]
pub(super) struct CaretState {
    /// Byte offset into the text, always on a char boundary
    pub pos: usize,
    /// First visible visual line while internal scrolling is on
    pub scroll_line: usize,
}

impl CaretState {
    /// Index of the visual line holding the caret.
    ///
    /// A caret sitting exactly on a soft-wrap boundary belongs to the later line.
    pub fn line_index(&self, lines: &[Range<usize>]) -> usize {
        lines
            .iter()
            .rposition(|line| line.start <= self.pos)
            .unwrap_or(0)
    }

    /// Display column of the caret within its visual line.
    pub fn column(&self, text: &str, lines: &[Range<usize>]) -> usize {
        let line = &lines[self.line_index(lines)];
        display_width(&text[line.start..self.pos.min(line.end).max(line.start)])
    }

    /// Move the caret. Returns `true` if it moved.
    pub fn apply(&mut self, text: &str, motion: CaretMotion, columns: usize) -> bool {
        let target = match motion {
            CaretMotion::Left if self.pos > 0 => prev_char_boundary(text, self.pos),
            CaretMotion::Right if self.pos < text.len() => next_char_boundary(text, self.pos),
            CaretMotion::Home => text[..self.pos].rfind('\n').map(|i| i + 1).unwrap_or(0),
            CaretMotion::End => text[self.pos..]
                .find('\n')
                .map(|i| self.pos + i)
                .unwrap_or(text.len()),
            CaretMotion::Up => return self.move_vertically(text, -1, columns),
            CaretMotion::Down => return self.move_vertically(text, 1, columns),
            _ => self.pos,
        };
        let moved = target != self.pos;
        self.pos = target;
        moved
    }

    /// Move one visual line up (`-1`) or down (`1`), keeping the display column
    /// where the target line is long enough.
    fn move_vertically(&mut self, text: &str, direction: i8, columns: usize) -> bool {
        if columns == 0 {
            return false;
        }
        let lines = visual_lines(text, columns);
        let current = self.line_index(&lines);
        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < lines.len() => current + 1,
            _ => return false,
        };

        let column = self.column(text, &lines);
        let line = lines[target].clone();
        let mut pos = line.start;
        for (offset, c) in text[line.clone()].char_indices() {
            if display_width(&text[line.start..line.start + offset + c.len_utf8()]) > column {
                break;
            }
            pos = line.start + offset + c.len_utf8();
        }
        // A soft-wrapped line's end is the next line's start; stay on this one.
        if pos == line.end && target + 1 < lines.len() && lines[target + 1].start == line.end {
            pos = prev_char_boundary(text, pos).max(line.start);
        }
        self.pos = pos;
        true
    }

    /// Scroll so the caret line is within `visible_lines` lines from
    /// `scroll_line`. With nothing hidden the offset snaps back to zero.
    pub fn keep_visible(&mut self, lines: &[Range<usize>], visible_lines: usize) {
        if visible_lines == 0 || lines.len() <= visible_lines {
            self.scroll_line = 0;
            return;
        }
        let caret_line = self.line_index(lines);
        if caret_line < self.scroll_line {
            self.scroll_line = caret_line;
        } else if caret_line >= self.scroll_line + visible_lines {
            self.scroll_line = caret_line + 1 - visible_lines;
        }
        self.scroll_line = self.scroll_line.min(lines.len() - visible_lines);
    }

    /// Clamp the caret after the text was replaced from outside.
    pub fn clamp_to(&mut self, text: &str) {
        self.pos = self.pos.min(text.len());
        while !text.is_char_boundary(self.pos) {
            self.pos -= 1;
        }
    }
}
