//! # TitleBar Component
//!
//! Single-line status bar at the top of the screen.
//!
//! Shows, in priority order so the important parts survive narrow
//! terminals: app name and session title, the status text, and a
//! "↓ New" hint when the thread has content below the viewport.
//!
//! ```text
//! Charla · Hello world, this is a long qu... | Waiting for reply... | ↓ New
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

/// # Props
///
/// - `session_title`: title of the current session (core state)
/// - `status_message`: transient status (core state)
/// - `has_unseen_content`: thread scrolled away from the bottom (TUI state)
pub struct TitleBar {
    pub session_title: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(session_title: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            session_title,
            status_message,
            has_unseen_content,
        }
    }

    fn line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled("Charla", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(" · {}", self.session_title)),
        ];
        if !self.status_message.is_empty() {
            spans.push(Span::styled(
                format!(" | {}", self.status_message),
                Style::default().fg(Color::DarkGray),
            ));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(
                " | ↓ New",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(title_bar: &mut TitleBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| title_bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut title_bar =
            TitleBar::new("New chat".to_string(), "Waiting for reply...".to_string(), true);
        let text = draw(&mut title_bar);
        assert!(text.contains("Charla"));
        assert!(text.contains("New chat"));
        assert!(text.contains("Waiting for reply..."));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar =
            TitleBar::new("Trip ideas".to_string(), "Reply received".to_string(), false);
        let text = draw(&mut title_bar);
        assert!(text.contains("Trip ideas"));
        assert!(text.contains("Reply received"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let mut title_bar = TitleBar::new("New chat".to_string(), String::new(), false);
        let text = draw(&mut title_bar);
        assert!(text.contains("Charla · New chat"));
        assert!(!text.contains('|'));
    }
}
