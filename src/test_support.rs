//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use crate::core::geometry::{EdgeInsets, Rect};
use crate::core::input_bar::{InputBar, InputBarDelegate};
use crate::core::text_view::FontMetrics;

/// One delegate callback, as seen by [`RecordingDelegate`].
#[derive(Debug, Clone, PartialEq)]
pub enum DelegateCall {
    ShouldBegin,
    ShouldEnd,
    DidBegin,
    DidEnd,
    Changed(String),
    SelectionChanged,
    ShouldChange(Range<usize>, String),
    Height(f64),
}

pub type CallLog = Rc<RefCell<Vec<DelegateCall>>>;

/// A delegate that writes every callback into a shared log.
pub struct RecordingDelegate {
    calls: CallLog,
    pub allow_changes: bool,
}

impl RecordingDelegate {
    pub fn new(calls: CallLog) -> Self {
        Self { calls, allow_changes: true }
    }

    fn record(&self, call: DelegateCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl InputBarDelegate for RecordingDelegate {
    fn should_begin_editing(&mut self) -> bool {
        self.record(DelegateCall::ShouldBegin);
        true
    }

    fn should_end_editing(&mut self) -> bool {
        self.record(DelegateCall::ShouldEnd);
        true
    }

    fn did_begin_editing(&mut self) {
        self.record(DelegateCall::DidBegin);
    }

    fn did_end_editing(&mut self) {
        self.record(DelegateCall::DidEnd);
    }

    fn did_change(&mut self, text: &str) {
        self.record(DelegateCall::Changed(text.to_string()));
    }

    fn did_change_selection(&mut self) {
        self.record(DelegateCall::SelectionChanged);
    }

    fn should_change_text(&mut self, range: Range<usize>, replacement: &str) -> bool {
        self.record(DelegateCall::ShouldChange(range, replacement.to_string()));
        self.allow_changes
    }

    fn did_change_height(&mut self, height: f64) {
        self.record(DelegateCall::Height(height));
    }
}

/// A 300pt wide bar with round numbers: 18pt lines, 10pt glyphs, 1pt
/// vertical insets (minimum height 20, 28 columns), no line cap, and a
/// recording delegate whose log starts empty.
pub fn test_bar() -> (InputBar, CallLog) {
    let mut bar = InputBar::new();
    bar.set_font(Some(FontMetrics::new(18.0, 10.0)));
    bar.set_text_insets(EdgeInsets::new(1.0, 0.0, 1.0, 0.0));
    bar.set_max_lines(0);
    bar.set_frame(Rect::new(0.0, 0.0, 300.0, 44.0));

    let calls: CallLog = Rc::new(RefCell::new(Vec::new()));
    bar.set_delegate(Box::new(RecordingDelegate::new(calls.clone())));
    (bar, calls)
}
