//! # InputBox Component
//!
//! The compose box.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste and line breaks (Shift+Enter / Ctrl+J)
//! - Editing: backspace, delete, cursor movement
//! - Emit a submit request on Enter
//! - Grow with its content up to `max_lines`, then scroll internally
//! - Show the send affordance, dimmed while sending is not possible
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `busy` is a prop set from
//! `App::is_busy()` every frame. Submitting does not clear the buffer: the
//! controller decides, and the event loop calls `clear()` once the send is
//! accepted.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::core::config::DEFAULT_MAX_INPUT_LINES;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use layout::{BORDER_ROWS, Row, inner_width, locate, next_boundary, offset_at, prev_boundary, rows};

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed with this buffer content
    SubmitRequested(String),
    /// Buffer or cursor changed
    ContentChanged,
}

pub struct InputBox {
    buffer: String,
    /// Byte offset into `buffer`, always on a char boundary
    cursor: usize,
    /// First visible row when content is taller than `max_lines`
    scroll: u16,
    /// Inner width from the last render, used for vertical movement
    last_width: u16,
    /// Visible content rows before scrolling (Prop)
    pub max_lines: u16,
    /// An exchange is pending (Prop)
    pub busy: bool,
}

impl InputBox {
    const DEFAULT_WIDTH: u16 = 78;

    pub fn new(max_lines: u16) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            last_width: Self::DEFAULT_WIDTH,
            max_lines: max_lines.max(1),
            busy: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replace the whole buffer, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    /// Empty the buffer and shrink back to one row.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Whether the send affordance is enabled.
    pub fn send_enabled(&self) -> bool {
        !self.busy && !self.buffer.trim().is_empty()
    }

    /// Outer height for `outer_width`: content rows clamped to
    /// `[1, max_lines]` plus borders.
    pub fn calculate_height(&self, outer_width: u16) -> u16 {
        let count = rows(&self.buffer, inner_width(outer_width)).len();
        let visible = u16::try_from(count).unwrap_or(u16::MAX).clamp(1, self.max_lines);
        visible + BORDER_ROWS
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Move to the same display column on the row above or below.
    fn move_vertically(&mut self, down: bool) -> bool {
        let layout = rows(&self.buffer, self.last_width);
        let (row, col) = locate(&self.buffer, &layout, self.cursor);
        let target = if down {
            row + 1
        } else if row > 0 {
            row - 1
        } else {
            return false;
        };
        match layout.get(target) {
            Some(&r) => {
                self.cursor = offset_at(&self.buffer, r, col);
                true
            }
            None => false,
        }
    }

    fn keep_cursor_visible(&mut self, layout: &[Row]) {
        let (row, _) = locate(&self.buffer, layout, self.cursor);
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        let total = u16::try_from(layout.len()).unwrap_or(u16::MAX);
        if total <= self.max_lines {
            self.scroll = 0;
        } else if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + self.max_lines {
            self.scroll = row + 1 - self.max_lines;
        }
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, total: usize) {
        let visible = usize::from(self.max_lines);
        if total <= visible {
            return;
        }
        let mut state = ScrollbarState::default()
            .content_length(total - visible)
            .position(usize::from(self.scroll));
        let track = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(BORDER_ROWS),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            track,
            &mut state,
        );
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.last_width = width.max(1);
        let layout = rows(&self.buffer, self.last_width);
        self.keep_cursor_visible(&layout);

        let start = usize::from(self.scroll);
        let visible: Vec<Line> = layout
            .iter()
            .skip(start)
            .take(usize::from(self.max_lines))
            .map(|r| Line::raw(self.buffer[r.start..r.end].to_string()))
            .collect();

        let send_style = if self.send_enabled() {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" Message ")
            .title_bottom(Line::from(Span::styled(" ⏎ Send ", send_style)).right_aligned());
        if self.busy {
            block = block.title_bottom(Line::from(Span::styled(
                " waiting for reply… ",
                Style::default().fg(Color::Yellow),
            )));
        }

        frame.render_widget(Paragraph::new(visible).block(block), area);
        self.render_scrollbar(frame, area, layout.len());

        let (row, col) = locate(&self.buffer, &layout, self.cursor);
        let row = u16::try_from(row).unwrap_or(u16::MAX).saturating_sub(self.scroll);
        frame.set_cursor_position((
            area.x + 1 + col.min(width.saturating_sub(1)),
            area.y + 1 + row,
        ));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0; 4];
                self.insert(c.encode_utf8(&mut utf8));
                true
            }
            TuiEvent::Newline => {
                self.insert("\n");
                true
            }
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&text);
                true
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                true
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_boundary(&self.buffer, self.cursor);
                true
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_boundary(&self.buffer, self.cursor);
                true
            }
            TuiEvent::Home => {
                let line_start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                std::mem::replace(&mut self.cursor, line_start) != line_start
            }
            TuiEvent::End => {
                let line_end = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                std::mem::replace(&mut self.cursor, line_end) != line_end
            }
            TuiEvent::CursorUp => self.move_vertically(false),
            TuiEvent::CursorDown => self.move_vertically(true),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                return Some(InputEvent::SubmitRequested(self.buffer.clone()));
            }
            _ => false,
        };
        changed.then_some(InputEvent::ContentChanged)
    }
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_LINES)
    }
}
