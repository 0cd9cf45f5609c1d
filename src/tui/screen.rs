//! # Demo Screen
//!
//! The controller that owns the input bar and plays the part of the host
//! window: it places the simulated keyboard, listens to the tracker's channel
//! and moves the bar so it always sits on top of the keyboard.
//!
//! ```text
//! ┌──────────────────────────────┐ row 0: title
//! │ sent messages / activity     │
//! │                              │
//! ├──────────────────────────────┤ ← bar.y == slot.y
//! │ [+] │ text view         │Send│   input bar (grows upward)
//! ├──────────────────────────────┤
//! │ simulated keyboard           │   only while editing
//! └──────────────────────────────┘
//! ```
//!
//! The accessory slot the [`KeyboardHost`] reports is the bar plus the
//! keyboard, so its top edge is exactly where the bar belongs. Nothing here
//! reads the bar's height directly; it comes back through
//! `KeyboardTracker::intrinsic_height`.
//!
//! Kept free of ratatui types so the whole flow can be tested headless.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::ops::Range;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};

use log::{debug, info};
use unicode_width::UnicodeWidthStr;

use crate::core::config::ResolvedConfig;
use crate::core::geometry::{Point, Rect, Size};
use crate::core::input_bar::{AccessoryView, InputBar, InputBarDelegate};
use crate::core::keyboard::{KeyboardEvent, KeyboardHost, KeyboardTracker};
use crate::core::text_view::CaretMotion;
use crate::tui::component::EventHandler;
use crate::tui::event::TuiEvent;

pub const SEND_LABEL: &str = "Send";
pub const ATTACH_LABEL: &str = "+";

/// Longest message the demo accepts, in bytes.
pub const MAX_MESSAGE_LEN: usize = 500;

/// Activity entries kept for the side panel.
const ACTIVITY_CAPACITY: usize = 64;

pub type ActivityLog = Rc<RefCell<VecDeque<String>>>;

fn push_activity(log: &ActivityLog, entry: String) {
    let mut log = log.borrow_mut();
    if log.len() == ACTIVITY_CAPACITY {
        log.pop_front();
    }
    log.push_back(entry);
}

/// Receives the bar's callbacks on behalf of the screen.
///
/// Enforces [`MAX_MESSAGE_LEN`] through `should_change_text` and records
/// everything else in the activity log.
struct ScreenDelegate {
    activity: ActivityLog,
    text_len: usize,
}

impl ScreenDelegate {
    fn new(activity: ActivityLog) -> Self {
        Self { activity, text_len: 0 }
    }
}

impl InputBarDelegate for ScreenDelegate {
    fn did_begin_editing(&mut self) {
        push_activity(&self.activity, "editing began".to_string());
    }

    fn did_end_editing(&mut self) {
        push_activity(&self.activity, "editing ended".to_string());
    }

    fn did_change(&mut self, text: &str) {
        self.text_len = text.len();
    }

    fn should_change_text(&mut self, range: Range<usize>, replacement: &str) -> bool {
        let after = self.text_len.saturating_sub(range.len()) + replacement.len();
        // Deletions always pass so an oversized text can still be trimmed
        let allowed = after <= MAX_MESSAGE_LEN || replacement.is_empty();
        if !allowed {
            push_activity(&self.activity, format!("rejected edit: over {MAX_MESSAGE_LEN} bytes"));
        }
        allowed
    }

    fn did_change_height(&mut self, height: f64) {
        push_activity(&self.activity, format!("bar height -> {height}"));
    }
}

/// High-level events the screen hands back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    Quit,
}

pub struct Screen {
    bar: InputBar,
    tracker: Rc<RefCell<KeyboardTracker>>,
    host: Rc<RefCell<KeyboardHost>>,
    keyboard_events: Receiver<KeyboardEvent>,
    activity: ActivityLog,
    messages: Vec<String>,
    stashed_left_view: Option<AccessoryView>,
    keyboard_height: f64,
    keyboard_visible: bool,
    size: Size,
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("bar", &self.bar)
            .field("keyboard_visible", &self.keyboard_visible)
            .field("size", &self.size)
            .finish()
    }
}

impl Screen {
    pub fn new(config: &ResolvedConfig, width: u16, height: u16) -> Self {
        let (sender, keyboard_events) = mpsc::channel();
        let tracker = KeyboardTracker::new(sender)
            .with_default_height(config.default_height)
            .with_platform_version(config.platform_version)
            .into_shared();
        let host = Rc::new(RefCell::new(KeyboardHost::new(Rect::ZERO)));
        KeyboardTracker::attach(&tracker, &host);

        let activity: ActivityLog = Rc::new(RefCell::new(VecDeque::new()));

        let mut bar = InputBar::from_config(config);
        bar.set_keyboard_tracker(&tracker);
        bar.set_left_view(Some(label_view(ATTACH_LABEL)));
        bar.set_right_view(Some(label_view(SEND_LABEL)));
        bar.set_delegate(Box::new(ScreenDelegate::new(activity.clone())));

        let mut screen = Self {
            bar,
            tracker,
            host,
            keyboard_events,
            activity,
            messages: Vec::new(),
            stashed_left_view: None,
            keyboard_height: config.keyboard_height.max(0.0),
            keyboard_visible: false,
            size: Size::ZERO,
        };
        screen.resize(width, height);
        info!("Screen ready at {}x{}", width, height);
        screen
    }

    pub fn bar(&self) -> &InputBar {
        &self.bar
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn activity(&self) -> Vec<String> {
        self.activity.borrow().iter().cloned().collect()
    }

    pub fn is_keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    pub fn keyboard_frame(&self) -> Rect {
        let height = if self.keyboard_visible { self.keyboard_height } else { 0.0 };
        Rect::new(0.0, self.size.height - height, self.size.width, height)
    }

    /// The accessory slot as the host last reported it.
    #[cfg(test)]
    pub fn slot_frame(&self) -> Rect {
        self.host.borrow().frame()
    }

    pub fn tracker_height(&self) -> f64 {
        self.tracker.borrow().intrinsic_height()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(f64::from(width), f64::from(height));
        self.bar.set_width(self.size.width);
        self.relayout_host();
    }

    /// Size the accessory slot from the tracker and the keyboard, then move
    /// the bar to wherever the host says the slot went.
    fn relayout_host(&mut self) {
        let keyboard = self.keyboard_frame();
        let accessory = self.tracker_height();
        let slot = Rect::new(
            0.0,
            keyboard.y() - accessory,
            self.size.width,
            accessory + keyboard.height(),
        );
        self.host.borrow_mut().set_frame(slot);
        self.drain_keyboard_events();
    }

    fn drain_keyboard_events(&mut self) {
        while let Ok(event) = self.keyboard_events.try_recv() {
            match event {
                KeyboardEvent::FrameChanged(frame) => {
                    debug!("slot moved to {:?}", frame);
                    self.bar.set_origin(Point::new(0.0, frame.y()));
                }
            }
        }
    }

    fn show_keyboard(&mut self) {
        if self.bar.begin_editing() {
            self.keyboard_visible = true;
        }
    }

    fn hide_keyboard(&mut self) {
        if self.bar.end_editing() {
            self.keyboard_visible = false;
        }
    }

    fn submit(&mut self) {
        let message = self.bar.text().trim().to_string();
        if message.is_empty() {
            return;
        }
        info!("Sent message ({} chars)", message.chars().count());
        push_activity(&self.activity, "message sent".to_string());
        self.messages.push(message);
        self.bar.set_text("");
    }

    fn toggle_left_view(&mut self) {
        match self.stashed_left_view.take() {
            Some(view) => {
                self.bar.set_left_view(Some(view));
            }
            None => self.stashed_left_view = self.bar.set_left_view(None),
        }
    }

    fn apply(&mut self, event: &TuiEvent) {
        match event {
            TuiEvent::InputChar(c) => {
                self.show_keyboard();
                let mut buf = [0u8; 4];
                self.bar.insert_str(c.encode_utf8(&mut buf));
            }
            TuiEvent::Paste(data) => {
                self.show_keyboard();
                self.bar.insert_str(data);
            }
            TuiEvent::Backspace => {
                self.bar.delete_backward();
            }
            TuiEvent::Delete => {
                self.bar.delete_forward();
            }
            TuiEvent::CursorLeft => {
                self.bar.move_caret(CaretMotion::Left);
            }
            TuiEvent::CursorRight => {
                self.bar.move_caret(CaretMotion::Right);
            }
            TuiEvent::CursorUp => {
                self.bar.move_caret(CaretMotion::Up);
            }
            TuiEvent::CursorDown => {
                self.bar.move_caret(CaretMotion::Down);
            }
            TuiEvent::CursorHome => {
                self.bar.move_caret(CaretMotion::Home);
            }
            TuiEvent::CursorEnd => {
                self.bar.move_caret(CaretMotion::End);
            }
            TuiEvent::Submit => self.submit(),
            TuiEvent::Dismiss => self.hide_keyboard(),
            TuiEvent::ToggleKeyboard => {
                if self.keyboard_visible {
                    self.hide_keyboard();
                } else {
                    self.show_keyboard();
                }
            }
            TuiEvent::ToggleLeftView => self.toggle_left_view(),
            TuiEvent::ToggleAlwaysShow => {
                let always = !self.bar.always_show_right_button();
                self.bar.set_always_show_right_button(always);
            }
            TuiEvent::ToggleBorder => {
                let show = !self.bar.style().show_text_view_border;
                self.bar.set_show_text_view_border(show);
            }
            TuiEvent::Resize | TuiEvent::Quit => {}
        }
    }
}

impl EventHandler for Screen {
    type Event = ScreenEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<ScreenEvent> {
        if matches!(event, TuiEvent::Quit) {
            return Some(ScreenEvent::Quit);
        }
        self.apply(event);
        self.relayout_host();
        None
    }
}

/// A one-row accessory just wide enough for `label`.
fn label_view(label: &str) -> AccessoryView {
    AccessoryView::new(label, Size::new(label.width() as f64 + 2.0, 1.0))
}
