//! # InputBarView Component
//!
//! Draws an [`InputBar`] at the frames its last layout pass produced. One
//! point is one terminal cell, and the bar's frame is already in screen
//! coordinates, so the component ignores the area it is given except as a
//! clip rectangle.
//!
//! ## Architecture
//!
//! Like `MessageList` in spirit: a transient component built each frame that
//! wraps `&'a mut InputBarViewState` (persistent presentation state) and the
//! bar itself (props).
//!
//! ## Accessory Slide
//!
//! The bar applies frames immediately and only tags a pass as
//! `Transition::Animated`. When a new layout generation arrives with that tag
//! and the right accessory moved, the view slides it from the old x to the
//! new one over the transition's duration.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::geometry;
use crate::core::input_bar::{AccessoryView, InputBar, Transition};
use crate::core::style::Color;
use crate::tui::component::Component;

/// An in-flight slide of the right accessory.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slide {
    from_x: f64,
    to_x: f64,
    started: Instant,
    duration: Duration,
}

impl Slide {
    fn x_at(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to_x;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from_x + (self.to_x - self.from_x) * t
    }

    fn is_done(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }
}

/// Presentation state for the bar. Must be persisted in the parent TuiState.
#[derive(Debug, Default)]
pub struct InputBarViewState {
    seen_generation: Option<u64>,
    right_x: Option<f64>,
    slide: Option<Slide>,
}

impl InputBarViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the event loop should keep redrawing for the slide.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.slide.is_some_and(|s| !s.is_done(now))
    }

    /// Pick up a new layout pass and return the x to draw the right
    /// accessory at.
    fn sync(&mut self, bar: &InputBar, now: Instant) -> Option<f64> {
        let target = bar.right_view().map(|v| v.frame().x());
        let generation = bar.layout_generation();

        if self.seen_generation != Some(generation) {
            self.seen_generation = Some(generation);
            self.slide = match (bar.last_transition(), self.right_x, target) {
                (Transition::Animated(duration), Some(from_x), Some(to_x)) if from_x != to_x => {
                    // Start from wherever the previous slide had got to
                    let from_x = self.slide.map_or(from_x, |s| s.x_at(now));
                    Some(Slide { from_x, to_x, started: now, duration })
                }
                (Transition::Animated(_), _, _) => self.slide,
                // The bar only moved; let the slide finish
                (Transition::Immediate, from_x, to_x) if from_x == to_x => self.slide,
                (Transition::Immediate, _, _) => None,
            };
            self.right_x = target;
        }

        match (self.slide, target) {
            (Some(slide), Some(_)) => Some(slide.x_at(now)),
            (_, target) => target,
        }
    }
}

/// Transient renderer for one frame.
pub struct InputBarView<'a> {
    pub state: &'a mut InputBarViewState,
    pub bar: &'a InputBar,
    pub now: Instant,
}

impl<'a> InputBarView<'a> {
    pub fn new(state: &'a mut InputBarViewState, bar: &'a InputBar, now: Instant) -> Self {
        Self { state, bar, now }
    }
}

impl<'a> Component for InputBarView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let right_x = self.state.sync(self.bar, self.now);
        let bar = self.bar;
        let style = bar.style();
        let origin = bar.frame().origin;

        let Some(bar_area) = to_cells(bar.frame(), geometry::Point::ZERO, area) else {
            return;
        };
        frame.render_widget(Block::default().style(Style::default().bg(to_color(style.bar_background))), bar_area);

        // Border (or a plain background) around the text view
        let text_view = bar.text_view();
        let text_bg = Style::default().bg(to_color(style.text_view_background));
        if style.show_text_view_border {
            if let Some(border_area) = to_cells(bar.border_frame(), origin, bar_area) {
                let border_type = if style.corner_radius > 0.0 {
                    BorderType::Rounded
                } else {
                    BorderType::Plain
                };
                let block = Block::bordered()
                    .border_type(border_type)
                    .border_style(Style::default().fg(to_color(style.border_color)))
                    .style(text_bg);
                frame.render_widget(block, border_area);
            }
        }

        if let Some(text_area) = to_cells(text_view.frame(), origin, bar_area) {
            frame.render_widget(Block::default().style(text_bg), text_area);

            let content = text_view.frame().inset_by(text_view.insets());
            if let Some(content_area) = to_cells(content, origin, text_area) {
                if text_view.placeholder().is_visible() {
                    let placeholder = text_view.placeholder();
                    let line = Line::styled(
                        placeholder.text.as_str(),
                        Style::default().fg(to_color(placeholder.color)),
                    );
                    frame.render_widget(Paragraph::new(line), content_area);
                } else {
                    let lines: Vec<Line> = text_view
                        .lines()
                        .into_iter()
                        .skip(text_view.first_visible_line())
                        .take(usize::from(content_area.height))
                        .map(|l| Line::raw(l.trim_end_matches('\n')))
                        .collect();
                    let paragraph =
                        Paragraph::new(lines).style(Style::default().fg(to_color(style.text_color)));
                    frame.render_widget(paragraph, content_area);
                }

                if bar.is_editing() {
                    let caret = text_view.caret_rect();
                    let x = content_area.x.saturating_add(cell(caret.x() - text_view.insets().left));
                    let y = content_area.y.saturating_add(cell(caret.y() - text_view.insets().top));
                    if content_area.contains(Position::new(x, y)) {
                        frame.set_cursor_position(Position::new(x, y));
                    }
                }
            }
        }

        if let Some(view) = bar.left_view() {
            render_accessory(frame, view, view.frame(), origin, bar_area);
        }
        if let (Some(view), Some(x)) = (bar.right_view(), right_x) {
            let frame_at = view.frame().with_origin(geometry::Point::new(x, view.frame().y()));
            render_accessory(frame, view, frame_at, origin, bar_area);
        }
    }
}

fn render_accessory(
    frame: &mut Frame,
    view: &AccessoryView,
    at: geometry::Rect,
    origin: geometry::Point,
    clip: Rect,
) {
    // Off-screen (e.g. a hidden send button parked past the right edge)
    let Some(area) = to_cells(at, origin, clip) else {
        return;
    };
    let label = Paragraph::new(format!("[{}]", view.label))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(label, area);
}

/// Round a point coordinate to a cell index, clamping at zero.
fn cell(value: f64) -> u16 {
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Map a rect given relative to `origin` into terminal cells, clipped to
/// `clip`. Returns `None` when nothing is left.
fn to_cells(rect: geometry::Rect, origin: geometry::Point, clip: Rect) -> Option<Rect> {
    let x = (origin.x + rect.x()).round();
    let y = (origin.y + rect.y()).round();
    let right = (x + rect.width().round()).max(x);
    let bottom = (y + rect.height().round()).max(y);

    let x = x.max(f64::from(clip.x));
    let y = y.max(f64::from(clip.y));
    let right = right.min(f64::from(clip.right()));
    let bottom = bottom.min(f64::from(clip.bottom()));
    if right <= x || bottom <= y {
        return None;
    }
    Some(Rect::new(cell(x), cell(y), cell(right - x), cell(bottom - y)))
}

pub(crate) fn to_color(color: Color) -> ratatui::style::Color {
    ratatui::style::Color::Rgb(color.r, color.g, color.b)
}
