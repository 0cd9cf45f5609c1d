use ratatui::layout::Rect;
use ratatui::Frame;

/// A piece of the demo screen that knows how to draw itself.
///
/// Data comes in through struct fields ("props"); `render` takes `&mut self`
/// so a component can keep presentation state between frames, such as the
/// accessory slide in [`super::components::InputBarView`].
pub trait Component {
    /// Render the component into the given area.
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
