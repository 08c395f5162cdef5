//! # ThreadView Component
//!
//! Scrollable view of the visible thread.
//!
//! ## Responsibilities
//!
//! - Measure and draw every node (messages and the typing placeholder)
//! - Follow new content: whenever `Thread::revision` moves, the view
//!   re-attaches to the bottom
//! - Manual scrolling detaches; scrolling back to the end re-attaches
//!
//! ## Architecture
//!
//! Same split as the other stateful components: `ThreadView` is rebuilt
//! every frame from props and borrows `ThreadViewState`, which lives in
//! `TuiState` and survives between frames.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::Text;
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::thread::{Thread, ThreadNode};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::{MessageView, formatted};
use crate::tui::components::typing_indicator::TypingIndicator;
use crate::tui::event::TuiEvent;
use crate::tui::markdown::Formatter;

/// (revision, node count, width) the cached heights were measured for.
type LayoutKey = (u64, usize, u16);
/// (revision, node count, formatter) the cached bodies were formatted for.
type TextKey = (u64, usize, Formatter);

pub struct ThreadViewState {
    pub scroll_state: ScrollViewState,
    /// Follow the newest content
    pub stick_to_bottom: bool,
    seen_revision: u64,
    /// Formatted body per node; empty for the typing placeholder
    texts: Vec<Text<'static>>,
    text_key: Option<TextKey>,
    heights: Vec<u16>,
    layout_key: Option<LayoutKey>,
    viewport_height: u16,
    content_height: u16,
}

impl Default for ThreadViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            seen_revision: 0,
            texts: Vec::new(),
            text_key: None,
            heights: Vec::new(),
            layout_key: None,
            viewport_height: 0,
            content_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Content exists below the viewport (drives the "↓ New" hint).
    pub fn has_content_below(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.set_offset(Position {
            x: 0,
            y: self.max_offset(),
        });
    }

    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y > max_y {
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.scroll_to_bottom();
        }
    }

    /// Markdown and highlighting run only when the thread changes.
    fn format(&mut self, thread: &Thread, formatter: Formatter) {
        let key = (thread.revision(), thread.nodes().len(), formatter);
        if self.text_key == Some(key) {
            return;
        }
        self.texts = thread
            .nodes()
            .iter()
            .map(|node| match node {
                ThreadNode::Message(m) => formatted(m, formatter),
                ThreadNode::Typing(_) => Text::default(),
            })
            .collect();
        self.text_key = Some(key);
        // heights depend on the bodies
        self.layout_key = None;
    }

    fn measure(&mut self, thread: &Thread, formatter: Formatter, width: u16) {
        self.format(thread, formatter);
        let key = (thread.revision(), thread.nodes().len(), width);
        if self.layout_key == Some(key) {
            return;
        }
        self.heights = thread
            .nodes()
            .iter()
            .zip(&self.texts)
            .map(|(node, text)| match node {
                ThreadNode::Message(m) => MessageView::new(m, text).calculate_height(width),
                ThreadNode::Typing(_) => TypingIndicator::HEIGHT,
            })
            .collect();
        self.content_height = self
            .heights
            .iter()
            .fold(0u16, |acc, h| acc.saturating_add(*h));
        self.layout_key = Some(key);
    }
}

/// Scrollable thread. Created fresh each frame.
pub struct ThreadView<'a> {
    pub state: &'a mut ThreadViewState,
    pub thread: &'a Thread,
    pub formatter: Formatter,
    /// Animation frame for the typing dots
    pub frame: usize,
}

impl<'a> ThreadView<'a> {
    pub fn new(
        state: &'a mut ThreadViewState,
        thread: &'a Thread,
        formatter: Formatter,
        frame: usize,
    ) -> Self {
        Self {
            state,
            thread,
            formatter,
            frame,
        }
    }
}

impl Component for ThreadView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // -1 for the scrollbar
        let width = area.width.saturating_sub(1);
        self.state.measure(self.thread, self.formatter, width);
        self.state.viewport_height = area.height;

        if self.thread.revision() != self.state.seen_revision {
            self.state.seen_revision = self.thread.revision();
            self.state.stick_to_bottom = true;
        }
        if self.state.stick_to_bottom {
            self.state.scroll_to_bottom();
        } else {
            self.state.clamp_scroll();
        }

        let offset = self.state.scroll_state.offset().y;
        let bottom = offset.saturating_add(area.height);
        let mut scroll_view = ScrollView::new(Size::new(width, self.state.content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        let cached = self.state.texts.iter().zip(&self.state.heights);
        for (node, (text, &height)) in self.thread.nodes().iter().zip(cached) {
            let top = y;
            y = y.saturating_add(height);
            // only nodes overlapping the viewport are drawn
            if y <= offset || top >= bottom {
                continue;
            }
            let rect = Rect::new(0, top, width, height);
            match node {
                ThreadNode::Message(m) => {
                    scroll_view.render_widget(MessageView::new(m, text), rect)
                }
                ThreadNode::Typing(_) => {
                    scroll_view.render_widget(TypingIndicator::new(self.frame), rect)
                }
            }
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for ThreadViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::End => self.scroll_to_bottom(),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &mut ThreadViewState, thread: &Thread, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| ThreadView::new(state, thread, Formatter::new(true), 0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn long_thread(n: usize) -> Thread {
        let mut thread = Thread::new();
        for i in 0..n {
            thread.render(&Message::user(format!("message {i}")));
        }
        thread
    }

    #[test]
    fn newest_content_is_visible() {
        let thread = long_thread(10);
        let mut state = ThreadViewState::new();
        let screen = draw(&mut state, &thread, 40, 9);
        assert!(screen.contains("message 9"));
        assert!(!screen.contains("message 0"));
        assert!(!state.has_content_below());
    }

    #[test]
    fn typing_placeholder_is_drawn() {
        let mut thread = long_thread(1);
        thread.show_typing();
        let mut state = ThreadViewState::new();
        let screen = draw(&mut state, &thread, 40, 10);
        assert!(screen.contains("message 0"));
        assert!(screen.contains('●'));
    }

    #[test]
    fn scrolling_up_detaches_and_end_reattaches() {
        let thread = long_thread(10);
        let mut state = ThreadViewState::new();
        draw(&mut state, &thread, 40, 9);

        state.handle_event(&TuiEvent::ScrollPageUp);
        assert!(!state.stick_to_bottom);
        draw(&mut state, &thread, 40, 9);
        assert!(state.has_content_below());

        state.handle_event(&TuiEvent::End);
        assert!(state.stick_to_bottom);
        assert!(!state.has_content_below());
    }

    #[test]
    fn new_content_reattaches_to_bottom() {
        let mut thread = long_thread(10);
        let mut state = ThreadViewState::new();
        draw(&mut state, &thread, 40, 9);
        state.handle_event(&TuiEvent::ScrollPageUp);
        draw(&mut state, &thread, 40, 9);
        assert!(!state.stick_to_bottom);

        thread.render(&Message::bot("fresh reply"));
        let screen = draw(&mut state, &thread, 40, 9);
        assert!(state.stick_to_bottom);
        assert!(screen.contains("fresh reply"));
    }

    #[test]
    fn scrolling_down_past_the_end_repins() {
        let thread = long_thread(10);
        let mut state = ThreadViewState::new();
        draw(&mut state, &thread, 40, 9);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn bodies_are_formatted_once_per_thread_change() {
        let mut thread = long_thread(3);
        thread.render(&Message::bot("```rust\nfn main() {}\n```"));
        thread.show_typing();
        let mut state = ThreadViewState::new();
        draw(&mut state, &thread, 40, 20);
        let first = state.texts.as_ptr();

        // animation frames and resizes reuse the cached bodies
        draw(&mut state, &thread, 40, 20);
        draw(&mut state, &thread, 60, 20);
        assert_eq!(state.texts.as_ptr(), first);
        assert_eq!(state.texts.len(), thread.nodes().len());

        thread.render(&Message::user("more"));
        draw(&mut state, &thread, 60, 20);
        assert_eq!(state.text_key.map(|k| k.0), Some(thread.revision()));
        assert_eq!(state.texts.len(), thread.nodes().len());
    }

    #[test]
    fn cleared_thread_renders_empty() {
        let mut thread = long_thread(3);
        let mut state = ThreadViewState::new();
        draw(&mut state, &thread, 40, 9);
        thread.clear();
        let screen = draw(&mut state, &thread, 40, 9);
        assert!(!screen.contains("message"));
    }
}
