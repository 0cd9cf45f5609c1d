//! # Conversation Component
//!
//! Fills the space above the input bar: sent messages on the left, the
//! delegate activity log on the right. Both stick to the bottom so the newest
//! entry sits just above the bar, the way a chat view does when the bar
//! grows into it.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::tui::component::Component;

/// Width of the activity column when there's room for it.
const ACTIVITY_WIDTH: u16 = 28;

pub struct Conversation<'a> {
    pub messages: &'a [String],
    pub activity: &'a [String],
}

impl<'a> Conversation<'a> {
    pub fn new(messages: &'a [String], activity: &'a [String]) -> Self {
        Self { messages, activity }
    }
}

impl<'a> Component for Conversation<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let (message_area, activity_area) = if area.width >= ACTIVITY_WIDTH * 2 {
            let [left, right] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(ACTIVITY_WIDTH)])
                    .areas(area);
            (left, Some(right))
        } else {
            (area, None)
        };

        let mut lines = Vec::new();
        for message in self.messages {
            lines.push(Line::styled("You", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)));
            lines.extend(message.lines().map(|l| Line::raw(l.to_string())));
            lines.push(Line::raw(""));
        }
        render_bottom_aligned(frame, Paragraph::new(lines).wrap(Wrap { trim: false }), message_area);

        if let Some(activity_area) = activity_area {
            let block = Block::default()
                .borders(Borders::LEFT)
                .border_style(Style::default().fg(Color::DarkGray));
            let inner = block.inner(activity_area);
            frame.render_widget(block, activity_area);

            let lines: Vec<Line> = self
                .activity
                .iter()
                .map(|entry| Line::styled(entry.as_str(), Style::default().fg(Color::DarkGray)))
                .collect();
            render_bottom_aligned(frame, Paragraph::new(lines), inner);
        }
    }
}

/// Scroll `paragraph` so its last line lands on the bottom row of `area`.
fn render_bottom_aligned(frame: &mut Frame, paragraph: Paragraph, area: Rect) {
    let height = paragraph.line_count(area.width) as u16;
    let scroll = height.saturating_sub(area.height);
    let top_pad = area.height.saturating_sub(height);
    let area = Rect {
        y: area.y + top_pad,
        height: area.height - top_pad,
        ..area
    };
    frame.render_widget(paragraph.scroll((scroll, 0)), area);
}
