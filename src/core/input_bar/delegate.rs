//! Callbacks the InputBar sends to whoever registers as its delegate.
//!
//! Every method has a default, so a delegate only implements what it cares
//! about. Gates (`should_*`) default to `true`; notifications default to
//! doing nothing. A bar with no delegate behaves exactly like one whose
//! delegate overrides nothing.

use std::ops::Range;

pub trait InputBarDelegate {
    fn should_begin_editing(&mut self) -> bool {
        true
    }

    fn should_end_editing(&mut self) -> bool {
        true
    }

    fn did_begin_editing(&mut self) {}

    fn did_end_editing(&mut self) {}

    /// The text changed; `text` is the full current text.
    fn did_change(&mut self, _text: &str) {}

    fn did_change_selection(&mut self) {}

    /// Gate a pending edit of `range` (byte offsets) to `replacement`.
    /// Must not mutate the bar; return `false` to drop the edit.
    fn should_change_text(&mut self, _range: Range<usize>, _replacement: &str) -> bool {
        true
    }

    /// The bar's height changed to `height` (chrome plus text).
    fn did_change_height(&mut self, _height: f64) {}
}
