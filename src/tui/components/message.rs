use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{MessageKind, Sender};
use crate::core::thread::MessageNode;
use crate::tui::markdown::Formatter;

/// Horizontal padding (per side) between the border and text.
const CONTENT_PAD_H: u16 = 1;
/// Borders plus padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top + bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;

/// A single rendered message. Created fresh each frame by `ThreadView`
/// around a body that was formatted once and cached.
///
/// Users are green, the bot is blue. Fallback replies switch to yellow
/// and carry a `fallback` label; error templates are red with an `error`
/// label.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub node: &'a MessageNode,
    pub text: &'a Text<'static>,
}

impl<'a> MessageView<'a> {
    pub fn new(node: &'a MessageNode, text: &'a Text<'static>) -> Self {
        Self { node, text }
    }

    /// Rows needed at `width`, borders included.
    ///
    /// Wrapped line count comes from `Paragraph::line_count` on the same
    /// paragraph that `render` draws, so prediction and output agree.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if inner == 0 {
            return 1;
        }
        let lines = self.paragraph().line_count(inner).max(1);
        u16::try_from(lines)
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn paragraph(&self) -> Paragraph<'static> {
        Paragraph::new(self.text.clone()).wrap(Wrap { trim: false })
    }
}

/// Styled body of `node`, ready for `MessageView`.
pub fn formatted(node: &MessageNode, formatter: Formatter) -> Text<'static> {
    formatter.format(&node.body, body_style(node))
}

pub fn body_style(node: &MessageNode) -> Style {
    match (node.sender, node.kind) {
        (_, MessageKind::Error) => Style::default().fg(Color::Red),
        (_, MessageKind::Fallback) => Style::default().fg(Color::Yellow),
        (Sender::User, MessageKind::Normal) => Style::default().fg(Color::Green),
        (Sender::Bot, MessageKind::Normal) => Style::default().fg(Color::Blue),
    }
}

fn title(node: &MessageNode, border: Style) -> Line<'static> {
    let role = match node.sender {
        Sender::User => "you",
        Sender::Bot => "charla",
    };
    let mut spans = vec![Span::styled(format!(" {role} "), border)];
    match node.kind {
        MessageKind::Normal => {}
        MessageKind::Fallback => spans.push(Span::styled(
            "[fallback] ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        MessageKind::Error => spans.push(Span::styled(
            "[error] ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    }
    Line::from(spans)
}

impl Widget for MessageView<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border = body_style(self.node).add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title(self.node, border))
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        self.paragraph().render(inner, buf);
    }
}
