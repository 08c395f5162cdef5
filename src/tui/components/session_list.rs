//! # Session List Component
//!
//! Sidebar with the in-memory session history, newest first.
//!
//! Always drawn on wide terminals; on narrow ones it appears as an
//! overlay only while the menu is open. While the menu is open it has
//! keyboard focus:
//!
//! ```text
//! Up/Down  move selection
//! Enter    switch to the selected session
//! n        new session
//! Esc      close
//! ```
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SessionListState` lives in `TuiState`
//! - `SessionList` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};

use crate::core::session::Session;
use crate::tui::event::TuiEvent;

/// Events emitted by the session list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Switch(String),
    NewSession,
    Dismiss,
}

#[derive(Default)]
pub struct SessionListState {
    pub selected: usize,
    pub list_state: ListState,
}

impl SessionListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the selection on the active session (called when the menu opens).
    pub fn select_active(&mut self, sessions: &[Session], active_id: Option<&str>) {
        self.selected = active_id
            .and_then(|id| sessions.iter().position(|s| s.id == id))
            .unwrap_or(0);
        self.list_state.select(Some(self.selected));
    }

    /// Handle a key while the list has focus.
    pub fn handle_event(&mut self, event: &TuiEvent, sessions: &[Session]) -> Option<SessionEvent> {
        match event {
            TuiEvent::Escape => Some(SessionEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::CursorDown => {
                if !sessions.is_empty() {
                    self.selected = (self.selected + 1).min(sessions.len() - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit => sessions
                .get(self.selected)
                .map(|s| SessionEvent::Switch(s.id.clone())),
            TuiEvent::InputChar('n') => Some(SessionEvent::NewSession),
            _ => None,
        }
    }
}

pub struct SessionList<'a> {
    state: &'a mut SessionListState,
    sessions: &'a [Session],
    active_id: Option<&'a str>,
    /// Menu open: highlight the selection and show the key help
    focused: bool,
}

impl<'a> SessionList<'a> {
    pub const WIDTH: u16 = 32;

    pub fn new(
        state: &'a mut SessionListState,
        sessions: &'a [Session],
        active_id: Option<&'a str>,
        focused: bool,
    ) -> Self {
        Self {
            state,
            sessions,
            active_id,
            focused,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let help = if self.focused {
            " ↑↓ Enter  n new  Esc "
        } else {
            " ^B chats  ^N new "
        };
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
            .border_style(border)
            .title(" Chats ")
            .title_bottom(Line::from(help).centered())
            .padding(Padding::horizontal(1));

        // border, padding, marker and time
        let title_width = usize::from(area.width.saturating_sub(1 + 2 + 2 + 6));
        let items: Vec<ListItem> = self
            .sessions
            .iter()
            .map(|session| {
                let active = self.active_id == Some(session.id.as_str());
                let marker = if active { "▸ " } else { "  " };
                let style = if active {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(
                        format!("{:<title_width$}", truncate(&session.title, title_width)),
                        style,
                    ),
                    Span::styled(
                        session.created_at.format(" %H:%M").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let mut list = List::new(items).block(block);
        if self.focused {
            list = list.highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            self.state.list_state.select(Some(self.state.selected));
        } else {
            self.state.list_state.select(None);
        }
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

/// Cut `s` to at most `max` chars, marking the cut with "…".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
