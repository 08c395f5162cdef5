use ratatui::Frame;
use ratatui::layout::Rect;

/// A reusable UI component.
///
/// Data comes in as props (struct fields or render arguments). Components
/// may keep presentation state, which is why `render` takes `&mut self`:
/// layout caches and scroll offsets are updated during the render pass.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal events.
pub trait EventHandler {
    /// High-level event this component emits.
    type Event;

    /// Handle a `TuiEvent`, optionally producing a component event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
