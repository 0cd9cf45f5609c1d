//! Side views placed to the left and right of the text view.

use crate::core::geometry::{Rect, Size};

/// A fixed-size view the bar positions but does not draw.
///
/// `label` is only there so a renderer has something to show.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessoryView {
    pub label: String,
    size: Size,
    frame: Rect,
    attached: bool,
}

impl AccessoryView {
    pub fn new(label: impl Into<String>, size: Size) -> Self {
        Self {
            label: label.into(),
            size,
            frame: Rect::ZERO,
            attached: false,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Frame in the bar's coordinates, as of the last layout pass.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Whether the view is currently displayed by a bar.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(super) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub(super) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }
}
