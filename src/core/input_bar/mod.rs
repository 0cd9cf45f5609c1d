//! # InputBar
//!
//! The container: a [`TextView`] flanked by optional accessory views,
//! resized whenever the text view reports a new height.
//!
//! ## Layout
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐ ─┬─
//!  │ pad ┌──────────────────────────────────────┐             │  │ (defaultHeight - minimumHeight) / 2
//!  │     │ text view (grows downwards)          │             │ ─┘
//!  │     │                                      │             │
//!  │ [L] │                                      │ spc [R] pad │ ◄── accessories centred in the
//!  │     └──────────────────────────────────────┘             │     bottom defaultHeight band
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The text view's top edge is fixed, so growth pushes its bottom down and
//! the bar grows by exactly the text delta. Side accessories stay in the
//! bottom `default_height` band, next to the last line being typed.
//!
//! ## Height Protocol
//!
//! `TextView` returns `Option<HeightChanged>`; the bar turns that into
//! `bar height = (default_height - minimum_height) + text height`, never
//! below `default_height`, then:
//!
//! 1. updates its own frame,
//! 2. pushes the height into the keyboard tracker (if it is still alive),
//! 3. tells the delegate.
//!
//! The tracker has no way to call back, so the chain ends there.

mod accessory;
mod delegate;

use std::cell::RefCell;
use std::ops::Range;
use std::rc::{Rc, Weak};
use std::time::Duration;

use log::debug;

use crate::core::config::ResolvedConfig;
use crate::core::geometry::{EdgeInsets, Point, Rect};
use crate::core::keyboard::KeyboardTracker;
use crate::core::style::{BarStyle, Color};
use crate::core::text_view::{CaretMotion, EditRequest, FontMetrics, HeightChanged, TextView};

pub use accessory::AccessoryView;
pub use delegate::InputBarDelegate;

pub const DEFAULT_BAR_HEIGHT: f64 = 44.0;
pub const DEFAULT_HORIZONTAL_PADDING: f64 = 10.0;
pub const DEFAULT_HORIZONTAL_SPACING: f64 = 5.0;
pub const DEFAULT_MAX_LINES: usize = 6;
pub const DEFAULT_PLACEHOLDER: &str = "Type here";
/// Duration of the slide when the right accessory appears or disappears.
pub const ACCESSORY_ANIMATION: Duration = Duration::from_millis(200);

/// How the geometry of a layout pass should be presented.
///
/// Frames are always applied immediately; an animated transition only tells
/// a renderer it may interpolate from the previous frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Immediate,
    Animated(Duration),
}

/// Snapshot of every frame a layout pass produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub frame: Rect,
    pub text_frame: Rect,
    pub border_frame: Rect,
    pub left_frame: Option<Rect>,
    pub right_frame: Option<Rect>,
}

/// Which side an accessory goes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

pub struct InputBar {
    frame: Rect,
    text_view: TextView,
    left_view: Option<AccessoryView>,
    right_view: Option<AccessoryView>,
    border_frame: Rect,
    style: BarStyle,
    default_height: f64,
    horizontal_padding: f64,
    horizontal_spacing: f64,
    always_show_right_button: bool,
    show_right_button: bool,
    is_editing: bool,
    delegate: Option<Box<dyn InputBarDelegate>>,
    keyboard_tracker: Option<Weak<RefCell<KeyboardTracker>>>,
    last_transition: Transition,
    layout_generation: u64,
}

impl std::fmt::Debug for InputBar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputBar")
            .field("geometry", &self.geometry())
            .field("text", &self.text_view.text())
            .field("show_right_button", &self.show_right_button)
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}

impl Default for InputBar {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBar {
    pub fn new() -> Self {
        let mut text_view = TextView::new();
        let _ = text_view.set_insets(EdgeInsets::new(1.0, 0.0, 1.0, 0.0));
        let _ = text_view.set_font(Some(FontMetrics::with_point_size(14.0)));
        let _ = text_view.set_max_lines(DEFAULT_MAX_LINES);
        text_view.set_placeholder(DEFAULT_PLACEHOLDER);
        text_view.set_placeholder_color(Color::LIGHT_GRAY);

        let mut bar = Self {
            frame: Rect::new(0.0, 0.0, 0.0, DEFAULT_BAR_HEIGHT),
            text_view,
            left_view: None,
            right_view: None,
            border_frame: Rect::ZERO,
            style: BarStyle::default(),
            default_height: DEFAULT_BAR_HEIGHT,
            horizontal_padding: DEFAULT_HORIZONTAL_PADDING,
            horizontal_spacing: DEFAULT_HORIZONTAL_SPACING,
            always_show_right_button: false,
            show_right_button: false,
            is_editing: false,
            delegate: None,
            keyboard_tracker: None,
            last_transition: Transition::Immediate,
            layout_generation: 0,
        };
        bar.layout();
        bar
    }

    /// A bar configured from resolved settings. Width is left at zero for the
    /// host to set.
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut bar = Self::new();
        bar.horizontal_padding = config.horizontal_padding;
        bar.horizontal_spacing = config.horizontal_spacing;
        bar.always_show_right_button = config.always_show_right_button;
        bar.style = config.style.clone();

        let change = bar.text_view.set_font(Some(config.font));
        bar.handle_height(change);
        let change = bar.text_view.set_insets(config.text_insets);
        bar.handle_height(change);
        let change = bar.text_view.set_max_lines(config.max_lines);
        bar.handle_height(change);
        bar.text_view.set_placeholder(config.placeholder.clone());
        bar.text_view.set_placeholder_color(config.placeholder_color);

        bar.set_default_height(config.default_height);
        bar
    }

    // ------------------------------------------------------------------
    // Wiring
    // ------------------------------------------------------------------

    pub fn set_delegate(&mut self, delegate: Box<dyn InputBarDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn take_delegate(&mut self) -> Option<Box<dyn InputBarDelegate>> {
        self.delegate.take()
    }

    /// Observe (not own) a keyboard tracker. Height changes are pushed into it
    /// for as long as its owner keeps it alive.
    pub fn set_keyboard_tracker(&mut self, tracker: &Rc<RefCell<KeyboardTracker>>) {
        self.keyboard_tracker = Some(Rc::downgrade(tracker));
    }

    pub fn clear_keyboard_tracker(&mut self) {
        self.keyboard_tracker = None;
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Place the bar. The host owns origin and width; height normally comes
    /// from the height protocol.
    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.layout();
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.set_frame(self.frame.with_origin(origin));
    }

    pub fn set_width(&mut self, width: f64) {
        self.set_frame(self.frame.with_width(width));
    }

    /// Height the bar asks for when the text is a single line.
    pub fn intrinsic_height(&self) -> f64 {
        self.default_height
    }

    pub fn default_height(&self) -> f64 {
        self.default_height
    }

    /// Changes the chrome around the text, so the bar height is recomputed
    /// and pushed out like any other height change.
    pub fn set_default_height(&mut self, height: f64) {
        self.default_height = height.max(0.0);
        self.text_view_height_changed(self.text_view.expected_height());
    }

    pub fn set_horizontal_padding(&mut self, padding: f64) {
        self.horizontal_padding = padding;
        self.layout();
    }

    pub fn set_horizontal_spacing(&mut self, spacing: f64) {
        self.horizontal_spacing = spacing;
        self.layout();
    }

    pub fn border_frame(&self) -> Rect {
        self.border_frame
    }

    pub fn geometry(&self) -> BarGeometry {
        BarGeometry {
            frame: self.frame,
            text_frame: self.text_view.frame(),
            border_frame: self.border_frame,
            left_frame: self.left_view.as_ref().map(AccessoryView::frame),
            right_frame: self.right_view.as_ref().map(AccessoryView::frame),
        }
    }

    pub fn last_transition(&self) -> Transition {
        self.last_transition
    }

    /// Bumped on every layout pass, so renderers can spot new geometry.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    /// Lay out without animation.
    pub fn layout(&mut self) {
        self.layout_with(Transition::Immediate);
    }

    /// Re-run layout, optionally flagged as the accessory animation.
    pub fn update_views(&mut self, animated: bool) {
        if animated {
            self.layout_with(Transition::Animated(ACCESSORY_ANIMATION));
        } else {
            self.layout_with(Transition::Immediate);
        }
    }

    fn layout_with(&mut self, transition: Transition) {
        let width = self.frame.width();
        let left_size = self.left_view.as_ref().map(AccessoryView::size).unwrap_or_default();
        let right_size = self.right_view.as_ref().map(AccessoryView::size).unwrap_or_default();
        let right_shown = self.is_right_view_shown();

        // Text view: everything between the accessories
        let mut text_x = self.horizontal_padding;
        let mut text_width = width - 2.0 * self.horizontal_padding;
        if left_size.width > 0.0 {
            text_x += left_size.width + self.horizontal_spacing;
            text_width -= left_size.width + self.horizontal_spacing;
        }
        if self.style.show_text_view_border {
            let border = self.style.border_padding;
            text_x += border.left;
            text_width -= border.horizontal();
        }
        if right_shown && right_size.width > 0.0 {
            text_width -= self.horizontal_spacing + right_size.width;
        }
        let text_y = (self.default_height - self.text_view.minimum_height()) / 2.0;

        // A new width may re-wrap the text; settle the bar height before
        // anything is anchored to it.
        let text_frame = Rect::new(text_x, text_y, text_width, self.text_view.expected_height());
        if let Some(HeightChanged(height)) = self.text_view.set_frame(text_frame) {
            self.apply_text_height(height);
        }
        let _ = self
            .text_view
            .set_frame(text_frame.with_height(self.text_view.expected_height()));
        self.border_frame = self.text_view.frame().inset_by(self.style.border_padding.inverted());

        // Accessories: centred in the bottom default-height band
        let bar_height = self.frame.height().floor();
        let band_y = |h: f64| bar_height - (h + (self.default_height - h) / 2.0);
        let left_frame = Rect::new(
            self.horizontal_padding,
            band_y(left_size.height),
            left_size.width,
            left_size.height,
        );
        let mut right_x = width;
        if right_shown {
            right_x -= right_size.width + self.horizontal_padding;
        }
        let right_frame = Rect::new(right_x, band_y(right_size.height), right_size.width, right_size.height);

        if let Some(view) = self.left_view.as_mut() {
            view.set_frame(left_frame);
        }
        if let Some(view) = self.right_view.as_mut() {
            view.set_frame(right_frame);
        }

        self.last_transition = transition;
        self.layout_generation += 1;
    }

    // ------------------------------------------------------------------
    // Height protocol
    // ------------------------------------------------------------------

    /// React to a new text view height: resize, push to the tracker, notify,
    /// then lay out once.
    pub fn text_view_height_changed(&mut self, new_height: f64) {
        self.apply_text_height(new_height);
        self.layout();
    }

    /// Everything `text_view_height_changed` does except layout.
    fn apply_text_height(&mut self, text_height: f64) {
        let chrome = self.default_height - self.text_view.minimum_height();
        let height = (chrome + text_height).max(self.default_height);
        debug!("input bar height -> {height} (text {text_height})");

        self.frame = self.frame.with_height(height);

        if let Some(tracker) = self.keyboard_tracker.as_ref().and_then(Weak::upgrade) {
            tracker.borrow_mut().update_height(height);
        }
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_change_height(height);
        }
    }

    fn handle_height(&mut self, change: Option<HeightChanged>) {
        if let Some(HeightChanged(height)) = change {
            self.text_view_height_changed(height);
        }
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    pub fn text_view(&self) -> &TextView {
        &self.text_view
    }

    pub fn text(&self) -> &str {
        self.text_view.text()
    }

    /// Replace the text, running the same path as typing.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let change = self.text_view.set_text(text);
        self.after_text_change(change);
    }

    /// The text view's text changed underneath us.
    pub fn text_did_change(&mut self) {
        let change = self.text_view.text_did_change();
        self.after_text_change(change);
    }

    fn after_text_change(&mut self, change: Option<HeightChanged>) {
        if let Some(HeightChanged(height)) = change {
            self.apply_text_height(height);
        }

        let should_show = !self.text_view.text().is_empty();
        if self.show_right_button != should_show && !self.always_show_right_button {
            self.show_right_button = should_show;
            self.update_views(true);
        } else {
            self.layout();
        }

        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_change(self.text_view.text());
        }
    }

    pub fn set_max_lines(&mut self, max_lines: usize) {
        let change = self.text_view.set_max_lines(max_lines);
        self.handle_height(change);
    }

    pub fn set_font(&mut self, font: Option<FontMetrics>) {
        let change = self.text_view.set_font(font);
        // Minimum height moved too, so the text view's top anchor did.
        self.handle_height(change);
        self.layout();
    }

    pub fn set_text_insets(&mut self, insets: EdgeInsets) {
        let change = self.text_view.set_insets(insets);
        self.handle_height(change);
        self.layout();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.text_view.set_placeholder(placeholder);
    }

    pub fn set_placeholder_color(&mut self, color: Color) {
        self.text_view.set_placeholder_color(color);
    }

    // ------------------------------------------------------------------
    // Accessories
    // ------------------------------------------------------------------

    pub fn left_view(&self) -> Option<&AccessoryView> {
        self.left_view.as_ref()
    }

    pub fn right_view(&self) -> Option<&AccessoryView> {
        self.right_view.as_ref()
    }

    /// Install (or clear) the left accessory. The previous one is detached and
    /// handed back.
    pub fn set_left_view(&mut self, view: Option<AccessoryView>) -> Option<AccessoryView> {
        self.swap_accessory(Side::Left, view)
    }

    /// Install (or clear) the right accessory. The previous one is detached and
    /// handed back.
    pub fn set_right_view(&mut self, view: Option<AccessoryView>) -> Option<AccessoryView> {
        self.swap_accessory(Side::Right, view)
    }

    fn swap_accessory(&mut self, side: Side, view: Option<AccessoryView>) -> Option<AccessoryView> {
        let slot = match side {
            Side::Left => &mut self.left_view,
            Side::Right => &mut self.right_view,
        };
        let mut previous = slot.take();
        if let Some(old) = previous.as_mut() {
            old.set_attached(false);
        }
        *slot = view.map(|mut new| {
            new.set_attached(true);
            new
        });
        debug!("{side:?} accessory replaced");
        self.layout();
        previous
    }

    /// Whether the right accessory is currently laid out on screen.
    pub fn is_right_view_shown(&self) -> bool {
        self.show_right_button || self.always_show_right_button
    }

    pub fn always_show_right_button(&self) -> bool {
        self.always_show_right_button
    }

    pub fn set_always_show_right_button(&mut self, always: bool) {
        self.always_show_right_button = always;
        if !always {
            self.show_right_button = !self.text_view.text().is_empty();
        }
        self.layout();
    }

    // ------------------------------------------------------------------
    // Style
    // ------------------------------------------------------------------

    pub fn style(&self) -> &BarStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: BarStyle) {
        self.style = style;
        self.layout();
    }

    pub fn set_show_text_view_border(&mut self, show: bool) {
        self.style.show_text_view_border = show;
        self.layout();
    }

    // ------------------------------------------------------------------
    // Editing passthroughs
    // ------------------------------------------------------------------

    pub fn should_begin_editing(&mut self) -> bool {
        self.delegate.as_mut().is_none_or(|d| d.should_begin_editing())
    }

    pub fn should_end_editing(&mut self) -> bool {
        self.delegate.as_mut().is_none_or(|d| d.should_end_editing())
    }

    pub fn did_begin_editing(&mut self) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_begin_editing();
        }
    }

    pub fn did_end_editing(&mut self) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_end_editing();
        }
    }

    pub fn did_change_selection(&mut self) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.did_change_selection();
        }
    }

    /// Ask whether `range` may become `replacement`. Never edits the text.
    pub fn should_change_text(&mut self, range: Range<usize>, replacement: &str) -> bool {
        self.delegate
            .as_mut()
            .is_none_or(|d| d.should_change_text(range, replacement))
    }

    // ------------------------------------------------------------------
    // Editing session
    // ------------------------------------------------------------------

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Start editing if the delegate agrees. Returns whether editing is on.
    pub fn begin_editing(&mut self) -> bool {
        if self.is_editing {
            return true;
        }
        if !self.should_begin_editing() {
            return false;
        }
        self.is_editing = true;
        self.did_begin_editing();
        true
    }

    /// Stop editing if the delegate agrees. Returns whether editing stopped.
    pub fn end_editing(&mut self) -> bool {
        if !self.is_editing {
            return true;
        }
        if !self.should_end_editing() {
            return false;
        }
        self.is_editing = false;
        self.did_end_editing();
        true
    }

    /// Gate `edit` through the delegate and apply it if allowed.
    pub fn apply_edit(&mut self, edit: EditRequest) -> bool {
        if !self.should_change_text(edit.range.clone(), &edit.replacement) {
            debug!("edit {:?} vetoed", edit.range);
            return false;
        }
        if !self.text_view.replace_range(&edit) {
            return false;
        }
        self.text_did_change();
        self.did_change_selection();
        true
    }

    pub fn insert_str(&mut self, s: &str) -> bool {
        let edit = self.text_view.insert_request(s);
        self.apply_edit(edit)
    }

    pub fn delete_backward(&mut self) -> bool {
        match self.text_view.delete_backward_request() {
            Some(edit) => self.apply_edit(edit),
            None => false,
        }
    }

    pub fn delete_forward(&mut self) -> bool {
        match self.text_view.delete_forward_request() {
            Some(edit) => self.apply_edit(edit),
            None => false,
        }
    }

    pub fn move_caret(&mut self, motion: CaretMotion) -> bool {
        let moved = self.text_view.move_caret(motion);
        if moved {
            self.did_change_selection();
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Size;
    use crate::test_support::{DelegateCall, RecordingDelegate, test_bar};
    use std::sync::mpsc;

    #[test]
    fn new_bar_is_default_height() {
        let bar = InputBar::new();
        assert_eq!(bar.frame().height(), DEFAULT_BAR_HEIGHT);
        assert_eq!(bar.intrinsic_height(), DEFAULT_BAR_HEIGHT);
        assert!(bar.text_view().placeholder().is_visible());
    }

    #[test]
    fn from_config_uses_cell_metrics() {
        use crate::core::config::{CliOverrides, ChatbarConfig, resolve};
        let config = resolve(&ChatbarConfig::default(), &CliOverrides::default());
        let mut bar = InputBar::from_config(&config);
        bar.set_width(40.0);
        assert_eq!(bar.frame().height(), 3.0);
        assert_eq!(bar.text_view().minimum_height(), 1.0);
        assert_eq!(bar.text_view().frame().y(), 1.0);
        assert_eq!(bar.border_frame().y(), 0.0);
        assert_eq!(bar.border_frame().height(), 3.0);
    }

    #[test]
    fn from_config_height_settles_before_width_is_known() {
        use crate::core::config::{BarConfig, ChatbarConfig, CliOverrides, resolve};
        let config = ChatbarConfig {
            bar: BarConfig {
                default_height: Some(5.0),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = resolve(&config, &CliOverrides::default());
        let mut bar = InputBar::from_config(&config);
        assert_eq!(bar.frame().height(), 5.0);

        bar.set_width(40.0);
        assert_eq!(bar.frame().height(), 5.0);
        assert_eq!(bar.text_view().frame().y(), 2.0);
    }

    #[test]
    fn bar_height_adds_text_growth_to_chrome() {
        // default 44, minimum 20, text 60 → 84
        let (mut bar, calls) = test_bar();
        let (tx, _rx) = mpsc::channel();
        let tracker = KeyboardTracker::new(tx).into_shared();
        bar.set_keyboard_tracker(&tracker);
        assert_eq!(bar.text_view().minimum_height(), 20.0);

        bar.text_view_height_changed(60.0);
        assert_eq!(bar.frame().height(), 84.0);
        assert_eq!(tracker.borrow().intrinsic_height(), 84.0);
        assert_eq!(calls.borrow().last(), Some(&DelegateCall::Height(84.0)));
    }

    #[test]
    fn bar_height_never_below_default() {
        let (mut bar, calls) = test_bar();
        bar.text_view_height_changed(2.0);
        assert_eq!(bar.frame().height(), 44.0);
        assert_eq!(calls.borrow().last(), Some(&DelegateCall::Height(44.0)));
    }

    #[test]
    fn raising_default_height_resizes_bar() {
        let (mut bar, calls) = test_bar();
        let (tx, _rx) = mpsc::channel();
        let tracker = KeyboardTracker::new(tx).into_shared();
        bar.set_keyboard_tracker(&tracker);
        let _ = bar.set_left_view(Some(AccessoryView::new("+", Size::new(30.0, 30.0))));

        bar.set_default_height(60.0);
        assert_eq!(bar.frame().height(), 60.0);
        assert_eq!(tracker.borrow().intrinsic_height(), 60.0);
        assert_eq!(calls.borrow().last(), Some(&DelegateCall::Height(60.0)));
        assert_eq!(bar.text_view().frame().y(), 20.0);
        assert_eq!(bar.left_view().unwrap().frame().y(), 15.0);

        // Growth on top of the new default keeps the same chrome
        bar.set_text("x".repeat(40));
        assert_eq!(bar.frame().height(), 40.0 + 38.0);
    }

    #[test]
    fn typing_grows_bar_through_text_view() {
        let (mut bar, calls) = test_bar();
        // 300 wide: 10 padding each side, 280pt text = 28 columns
        bar.set_text("x".repeat(40)); // 2 lines → 38
        assert_eq!(bar.text_view().expected_height(), 38.0);
        assert_eq!(bar.frame().height(), 24.0 + 38.0);
        assert!(calls.borrow().contains(&DelegateCall::Height(62.0)));
    }

    #[test]
    fn same_text_twice_notifies_height_once() {
        let (mut bar, calls) = test_bar();
        bar.set_text("x".repeat(40));
        bar.set_text("x".repeat(40));
        let heights = calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, DelegateCall::Height(_)))
            .count();
        assert_eq!(heights, 1);
    }

    #[test]
    fn text_frame_is_top_anchored() {
        let (mut bar, _) = test_bar();
        let top = bar.text_view().frame().y();
        assert_eq!(top, 12.0); // (44 - 20) / 2
        bar.set_text("x".repeat(100));
        assert_eq!(bar.text_view().frame().y(), top);
        assert_eq!(bar.text_view().frame().height(), bar.text_view().expected_height());
    }

    #[test]
    fn layout_is_idempotent() {
        let (mut bar, _) = test_bar();
        let _ = bar.set_left_view(Some(AccessoryView::new("+", Size::new(30.0, 30.0))));
        let _ = bar.set_right_view(Some(AccessoryView::new("Send", Size::new(40.0, 30.0))));
        bar.set_show_text_view_border(true);
        bar.set_text("hello there, this wraps onto a few lines for sure");

        bar.layout();
        let first = bar.geometry();
        bar.layout();
        assert_eq!(bar.geometry(), first);
    }

    #[test]
    fn accessories_sit_in_bottom_default_band() {
        let (mut bar, _) = test_bar();
        let _ = bar.set_left_view(Some(AccessoryView::new("+", Size::new(30.0, 30.0))));
        assert_eq!(bar.left_view().unwrap().frame(), Rect::new(10.0, 7.0, 30.0, 30.0));

        bar.set_text("x".repeat(40)); // bar grows to 62
        assert_eq!(bar.left_view().unwrap().frame().y(), 62.0 - 37.0);
    }

    #[test]
    fn left_view_narrows_text_and_clearing_restores() {
        let (mut bar, _) = test_bar();
        let plain = bar.text_view().frame();

        let _ = bar.set_left_view(Some(AccessoryView::new("+", Size::new(30.0, 30.0))));
        assert_eq!(bar.text_view().frame().x(), plain.x() + 35.0);
        assert_eq!(bar.text_view().frame().width(), plain.width() - 35.0);

        let removed = bar.set_left_view(None).unwrap();
        assert!(!removed.is_attached());
        assert!(bar.left_view().is_none());
        assert_eq!(bar.text_view().frame(), plain);
    }

    #[test]
    fn replacing_accessory_detaches_previous() {
        let (mut bar, _) = test_bar();
        let _ = bar.set_right_view(Some(AccessoryView::new("A", Size::new(10.0, 10.0))));
        let old = bar.set_right_view(Some(AccessoryView::new("B", Size::new(10.0, 10.0))));
        assert_eq!(old.as_ref().map(|v| v.label.as_str()), Some("A"));
        assert!(!old.unwrap().is_attached());
        assert!(bar.right_view().unwrap().is_attached());
    }

    #[test]
    fn right_view_tracks_text() {
        let (mut bar, _) = test_bar();
        let _ = bar.set_right_view(Some(AccessoryView::new("Send", Size::new(40.0, 30.0))));
        assert!(!bar.is_right_view_shown());
        assert_eq!(bar.right_view().unwrap().frame().x(), 300.0);
        let full_width = bar.text_view().frame().width();

        bar.set_text("hi");
        assert!(bar.is_right_view_shown());
        assert_eq!(bar.last_transition(), Transition::Animated(ACCESSORY_ANIMATION));
        assert_eq!(bar.right_view().unwrap().frame().x(), 250.0);
        assert_eq!(bar.text_view().frame().width(), full_width - 45.0);

        bar.set_text("");
        assert!(!bar.is_right_view_shown());
        assert_eq!(bar.right_view().unwrap().frame().x(), 300.0);
    }

    #[test]
    fn always_show_pins_right_view() {
        let (mut bar, _) = test_bar();
        let _ = bar.set_right_view(Some(AccessoryView::new("Send", Size::new(40.0, 30.0))));
        bar.set_always_show_right_button(true);
        for text in ["", "abc", ""] {
            bar.set_text(text);
            assert!(bar.is_right_view_shown());
            assert_eq!(bar.last_transition(), Transition::Immediate);
        }
    }

    #[test]
    fn border_shrinks_text_and_wraps_it() {
        let (mut bar, _) = test_bar();
        let plain = bar.text_view().frame();
        bar.set_show_text_view_border(true);
        let text = bar.text_view().frame();
        assert_eq!(text.x(), plain.x() + 8.0);
        assert_eq!(text.width(), plain.width() - 16.0);
        assert_eq!(
            bar.border_frame(),
            Rect::new(text.x() - 8.0, text.y() - 6.0, text.width() + 16.0, text.height() + 12.0)
        );
    }

    #[test]
    fn narrowing_rewraps_in_the_same_pass() {
        let (mut bar, calls) = test_bar();
        bar.set_text("x".repeat(20)); // one line at 28 columns
        calls.borrow_mut().clear();

        bar.set_width(150.0); // 13 columns → 2 lines
        assert_eq!(bar.frame().height(), 62.0);
        assert_eq!(calls.borrow().as_slice(), &[DelegateCall::Height(62.0)]);

        calls.borrow_mut().clear();
        bar.layout();
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn dead_tracker_is_ignored() {
        let (mut bar, _) = test_bar();
        let (tx, _rx) = mpsc::channel();
        let tracker = KeyboardTracker::new(tx).into_shared();
        bar.set_keyboard_tracker(&tracker);
        drop(tracker);
        bar.text_view_height_changed(60.0);
        assert_eq!(bar.frame().height(), 84.0);
    }

    #[test]
    fn gates_default_to_true_without_delegate() {
        let mut bar = InputBar::new();
        assert!(bar.should_begin_editing());
        assert!(bar.should_end_editing());
        assert!(bar.should_change_text(0..0, "x"));
        bar.did_begin_editing();
        bar.did_end_editing();
        bar.did_change_selection();
    }

    #[test]
    fn vetoed_edit_leaves_text_alone() {
        let (mut bar, calls) = test_bar();
        let mut delegate = RecordingDelegate::new(calls.clone());
        delegate.allow_changes = false;
        bar.set_delegate(Box::new(delegate));

        assert!(!bar.insert_str("nope"));
        assert_eq!(bar.text(), "");
        assert_eq!(
            calls.borrow().as_slice(),
            &[DelegateCall::ShouldChange(0..0, "nope".to_string())]
        );
    }

    #[test]
    fn edit_runs_full_event_sequence() {
        let (mut bar, calls) = test_bar();
        assert!(bar.insert_str("a"));
        assert_eq!(
            calls.borrow().as_slice(),
            &[
                DelegateCall::ShouldChange(0..0, "a".to_string()),
                DelegateCall::Changed("a".to_string()),
                DelegateCall::SelectionChanged,
            ]
        );
        assert!(bar.delete_backward());
        assert_eq!(bar.text(), "");
        assert!(!bar.delete_backward());
    }

    #[test]
    fn editing_session_respects_gates() {
        let (mut bar, calls) = test_bar();
        assert!(bar.begin_editing());
        assert!(bar.is_editing());
        assert!(bar.begin_editing(), "already editing");
        assert!(bar.end_editing());
        assert_eq!(
            calls.borrow().as_slice(),
            &[
                DelegateCall::ShouldBegin,
                DelegateCall::DidBegin,
                DelegateCall::ShouldEnd,
                DelegateCall::DidEnd,
            ]
        );
    }

    #[test]
    fn caret_moves_report_selection_changes() {
        let (mut bar, calls) = test_bar();
        bar.set_text("ab");
        calls.borrow_mut().clear();
        assert!(bar.move_caret(CaretMotion::Left));
        assert!(bar.move_caret(CaretMotion::Left));
        assert!(!bar.move_caret(CaretMotion::Home), "already at line start");
        assert_eq!(
            calls.borrow().as_slice(),
            &[DelegateCall::SelectionChanged, DelegateCall::SelectionChanged]
        );
    }

    #[test]
    fn max_lines_caps_bar_height() {
        let (mut bar, _) = test_bar();
        bar.set_max_lines(3);
        bar.set_text("x".repeat(28 * 5)); // 5 lines
        assert!(bar.text_view().is_scroll_enabled());
        assert_eq!(bar.text_view().expected_height(), 3.0 * 18.0 + 2.0);
        assert_eq!(bar.frame().height(), 24.0 + 56.0);

        bar.set_max_lines(0);
        assert!(!bar.text_view().is_scroll_enabled());
        assert_eq!(bar.frame().height(), 24.0 + 5.0 * 18.0 + 2.0);
    }
}
