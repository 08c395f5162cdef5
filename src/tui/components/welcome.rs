//! # Welcome Component
//!
//! Shown in place of the thread while the current session has nothing
//! visible yet. Lists the configured suggestions with their Alt+digit
//! shortcuts.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;

pub struct Welcome<'a> {
    pub suggestions: &'a [String],
}

impl<'a> Welcome<'a> {
    pub fn new(suggestions: &'a [String]) -> Self {
        Self { suggestions }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                "Charla",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask anything to get started.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        if !self.suggestions.is_empty() {
            lines.push(Line::default());
        }
        for (i, suggestion) in self.suggestions.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("Alt+{}  ", i + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(suggestion.clone(), Style::default().fg(Color::Green)),
            ]));
        }
        lines
    }
}

impl Component for Welcome<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
        let [center] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, center);
    }
}
