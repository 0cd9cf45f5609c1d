//! # TUI Adapter
//!
//! The ratatui-specific layer: terminal I/O, rendering, and translating key
//! presses into calls on the [`Screen`], which owns the input bar.
//!
//! This is the only module that knows about ratatui and crossterm. The
//! `core` types don't know what a terminal is; a different front end would
//! replace this module and keep the rest.
//!
//! ## Redraw Strategy
//!
//! The event loop redraws conditionally:
//!
//! - **Animating** (send button sliding): draws every ~16ms until the slide
//!   finishes.
//! - **Idle**: sleeps up to 500ms and only redraws on events or resize.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
mod screen;
mod ui;

use log::info;
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::config::ResolvedConfig;
use crate::tui::component::EventHandler;
use crate::tui::components::InputBarViewState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::screen::{Screen, ScreenEvent};

/// TUI-specific presentation state (not part of the bar's model)
pub struct TuiState {
    pub input_bar: InputBarViewState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            input_bar: InputBarViewState::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without
        // it ignore the request
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let size = terminal.size()?;
    let mut screen = Screen::new(&config, size.width, size.height);
    let mut tui = TuiState::new();
    let mut needs_redraw = true; // Force first frame

    let result = loop {
        let now = Instant::now();
        let animating = tui.input_bar.is_animating(now);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            if let Err(e) = terminal.draw(|f| ui::draw_ui(f, &screen, &mut tui, now)) {
                break Err(e);
            }
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                match terminal.size() {
                    Ok(size) => screen.resize(size.width, size.height),
                    Err(e) => log::warn!("Could not read terminal size: {}", e),
                }
                continue;
            }
            if screen.handle_event(&event) == Some(ScreenEvent::Quit) {
                should_quit = true;
                break;
            }
        }

        if should_quit {
            break Ok(());
        }
    };

    ratatui::restore();
    info!("Exiting with {} messages sent", screen.messages().len());
    result
}
