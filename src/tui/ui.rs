use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Conversation, InputBarView, KeyboardPanel, TitleBar};
use crate::tui::screen::Screen;

/// Cells a core rect covers vertically, as a `(top, bottom)` row pair.
fn rows(top: f64, bottom: f64, limit: u16) -> (u16, u16) {
    let clamp = |v: f64| v.round().clamp(0.0, f64::from(limit)) as u16;
    (clamp(top), clamp(bottom))
}

pub fn draw_ui(frame: &mut Frame, screen: &Screen, tui: &mut TuiState, now: Instant) {
    let area = frame.area();
    let bar = screen.bar();

    // Title
    let title_area = Rect { height: area.height.min(1), ..area };
    TitleBar::new(
        bar.frame().height(),
        screen.is_keyboard_visible(),
        bar.text_view().is_scroll_enabled(),
    )
    .render(frame, title_area);

    // Conversation fills whatever the bar leaves above it
    let (bar_top, _) = rows(bar.frame().y(), bar.frame().max_y(), area.height);
    let conversation_top = title_area.bottom();
    if bar_top > conversation_top {
        let conversation_area = Rect {
            y: conversation_top,
            height: bar_top - conversation_top,
            ..area
        };
        let activity = screen.activity();
        Conversation::new(screen.messages(), &activity).render(frame, conversation_area);
    }

    // Keyboard
    let keyboard = screen.keyboard_frame();
    let (keyboard_top, keyboard_bottom) = rows(keyboard.y(), keyboard.max_y(), area.height);
    if keyboard_bottom > keyboard_top {
        let keyboard_area = Rect {
            y: keyboard_top,
            height: keyboard_bottom - keyboard_top,
            ..area
        };
        KeyboardPanel.render(frame, keyboard_area);
    }

    // The bar last, on top of anything it overlaps
    let bar_clip = Rect {
        y: conversation_top,
        height: area.height.saturating_sub(conversation_top),
        ..area
    };
    InputBarView::new(&mut tui.input_bar, bar, now).render(frame, bar_clip);
}
