//! # KeyboardPanel Component
//!
//! Stand-in for the on-screen keyboard. Draws a few rows of keys in the
//! area the screen reserves for it; purely decorative.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::component::Component;

const KEY_ROWS: [&str; 4] = [
    "q w e r t y u i o p",
    "a s d f g h j k l",
    "z x c v b n m",
    "space",
];

pub struct KeyboardPanel;

impl Component for KeyboardPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let block = Block::default()
            .borders(Borders::TOP)
            .title(" keyboard · Esc to dismiss ")
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(Color::Rgb(0x20, 0x20, 0x20)));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = KEY_ROWS
            .iter()
            .map(|row| Line::styled(*row, Style::default().add_modifier(Modifier::DIM)))
            .collect();
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}
