use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

/// Placeholder shown in the thread while a reply is pending.
///
/// Styled like a bot message with three dots; one dot is lit per frame.
pub struct TypingIndicator {
    pub frame: usize,
}

impl TypingIndicator {
    pub const HEIGHT: u16 = 3;
    const DOTS: usize = 3;

    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    fn dots(&self) -> Line<'static> {
        let lit = self.frame % Self::DOTS;
        let spans: Vec<Span> = (0..Self::DOTS)
            .map(|i| {
                let style = if i == lit {
                    Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Blue).add_modifier(Modifier::DIM)
                };
                Span::styled("● ", style)
            })
            .collect();
        Line::from(spans)
    }
}

impl Widget for TypingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = Style::default().fg(Color::Blue).add_modifier(Modifier::DIM);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Span::styled(" charla ", border))
            .padding(Padding::horizontal(1));
        Paragraph::new(self.dots()).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_dot_is_lit_and_it_moves() {
        let first = TypingIndicator::new(0).dots();
        let second = TypingIndicator::new(1).dots();
        let bold = |line: &Line| {
            line.spans
                .iter()
                .position(|s| s.style.add_modifier.contains(Modifier::BOLD))
        };
        assert_eq!(bold(&first), Some(0));
        assert_eq!(bold(&second), Some(1));
        assert_eq!(bold(&TypingIndicator::new(3).dots()), Some(0));
    }

    #[test]
    fn renders_inside_a_bot_frame() {
        let area = Rect::new(0, 0, 20, TypingIndicator::HEIGHT);
        let mut buf = Buffer::empty(area);
        TypingIndicator::new(0).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("charla"));
        assert_eq!(text.matches('●').count(), 3);
    }
}
