//! # TitleBar Component
//!
//! Top status line: the bar's current height, whether the keyboard is up,
//! whether the text view has started scrolling, and the key hints.
//!
//! Purely presentational. Every field is a prop set by the caller, so the
//! component renders whatever it is given:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(bar.frame().height(), keyboard_visible, scrolling);
//! title_bar.render(frame, title_area);
//! ```
//!
//! On narrow terminals the hints are dropped first, then the scroll marker.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

const HINTS: &str = "Enter send · Ctrl+J newline · Ctrl+L attach · Ctrl+A always send · Ctrl+B border · Ctrl+K keyboard · Ctrl+C quit";

pub struct TitleBar {
    /// Current bar height in rows
    pub bar_height: f64,
    pub keyboard_visible: bool,
    /// The text view hit its line cap and scrolls
    pub scrolling: bool,
}

impl TitleBar {
    pub fn new(bar_height: f64, keyboard_visible: bool, scrolling: bool) -> Self {
        Self {
            bar_height,
            keyboard_visible,
            scrolling,
        }
    }

    fn status(&self) -> String {
        let keyboard = if self.keyboard_visible { "keyboard up" } else { "keyboard down" };
        format!("chatbar | bar {} rows | {}", self.bar_height, keyboard)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = usize::from(area.width);
        let mut spans = vec![Span::styled(
            self.status(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        let mut used = spans[0].width();

        if self.scrolling && used + " | scrolling".len() <= width {
            spans.push(Span::raw(" | scrolling"));
            used += " | scrolling".len();
        }
        let hints = format!(" | {HINTS}");
        if used + hints.chars().count() <= width {
            spans.push(Span::styled(hints, Style::default().add_modifier(Modifier::DIM)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
