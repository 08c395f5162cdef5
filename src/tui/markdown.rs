//! Message body → ratatui `Text`.
//!
//! Bot answers are markdown. They go through `pulldown_cmark` and come out
//! as styled lines: headings, emphasis, inline code, fenced code (syntect
//! highlighted), lists, block quotes and links. Everything else (user
//! text, fallbacks, error templates) is shown literally with its line
//! breaks kept.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::core::thread::Body;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME: LazyLock<Option<Theme>> =
    LazyLock::new(|| ThemeSet::load_defaults().themes.remove("base16-ocean.dark"));

/// ratatui draws `\t` as zero-width.
const TAB: &str = "    ";

/// Renders message bodies. With markdown switched off the formatter is
/// unavailable and markup bodies degrade to literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    markdown: bool,
}

impl Formatter {
    pub fn new(markdown: bool) -> Self {
        Self { markdown }
    }

    pub fn format(&self, body: &Body, base: Style) -> Text<'static> {
        match body {
            Body::Markup(source) if self.markdown => markdown(source, base),
            other => plain(other.text(), base),
        }
    }
}

/// Literal text: one line per `\n`, nothing else interpreted.
pub fn plain(content: &str, style: Style) -> Text<'static> {
    content
        .split('\n')
        .map(|line| {
            let line = line.trim_end_matches('\r').replace('\t', TAB);
            Line::from(Span::styled(line, style))
        })
        .collect()
}

/// Markdown to styled text. Unstyled runs use `base`.
pub fn markdown(source: &str, base: Style) -> Text<'static> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut walker = Walker::new(base);
    for event in Parser::new_ext(source, options) {
        walker.event(event);
    }
    walker.finish()
}

enum ListKind {
    Bullet,
    Numbered(u64),
}

struct CodeBuffer {
    lang: String,
    source: String,
}

/// Accumulates spans for the line being built and flushes them at block
/// boundaries.
struct Walker {
    base: Style,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    quote_depth: usize,
    lists: Vec<ListKind>,
    code: Option<CodeBuffer>,
    link: Option<String>,
    /// Blank line owed before the next block.
    gap: bool,
    /// A list marker was written and the item has no content yet.
    item_open: bool,
}

impl Walker {
    fn new(base: Style) -> Self {
        Self {
            base,
            lines: Vec::new(),
            spans: Vec::new(),
            styles: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            code: None,
            link: None,
            gap: false,
            item_open: false,
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }

    fn current(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, overlay: Style) {
        let style = self.current().patch(overlay);
        self.styles.push(style);
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth)
            .map(|_| Span::styled("▌ ", Style::default().fg(Color::DarkGray)))
            .collect()
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut line = self.prefix();
        line.append(&mut self.spans);
        self.lines.push(Line::from(line));
    }

    fn start_block(&mut self) {
        self.flush();
        if self.gap && !self.lines.is_empty() {
            let spacer = self.prefix();
            self.lines.push(Line::from(spacer));
        }
        self.gap = false;
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => {
                if let Some(code) = self.code.as_mut() {
                    code.source.push_str(&text);
                } else {
                    self.item_open = false;
                    let style = self.current();
                    self.spans.push(Span::styled(text.replace('\t', TAB), style));
                }
            }
            Event::Code(code) => {
                self.item_open = false;
                self.spans.push(Span::styled(
                    code.to_string(),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Event::SoftBreak => self.spans.push(Span::styled(" ", self.current())),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.start_block();
                self.lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                )));
                self.gap = true;
            }
            Event::TaskListMarker(done) => {
                self.spans
                    .push(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            // raw HTML, footnotes, math
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.item_open {
                    self.item_open = false;
                } else {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_style(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
                self.push_style(Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .next()
                        .unwrap_or("")
                        .to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBuffer {
                    lang,
                    source: String::new(),
                });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush();
                }
                self.lists.push(match start {
                    Some(n) => ListKind::Numbered(n),
                    None => ListKind::Bullet,
                });
            }
            Tag::Item => {
                self.flush();
                self.gap = false;
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(ListKind::Numbered(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    Some(ListKind::Bullet) | None => format!("{indent}• "),
                };
                self.spans
                    .push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
                self.item_open = true;
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            // tables, images, definition lists
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                self.gap = true;
            }
            TagEnd::Heading(_) => {
                self.flush();
                self.pop_style();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.pop_style();
                self.gap = true;
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    self.emit_code(code);
                }
                self.gap = true;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap = true;
                }
            }
            TagEnd::Item => {
                self.flush();
                self.item_open = false;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link.take() {
                    self.spans.push(Span::styled(
                        format!(" <{url}>"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn emit_code(&mut self, code: CodeBuffer) {
        let frame = Style::default().fg(Color::DarkGray);
        if !code.lang.is_empty() {
            let mut label = self.prefix();
            label.push(Span::styled(
                format!("┌ {}", code.lang),
                frame.add_modifier(Modifier::ITALIC),
            ));
            self.lines.push(Line::from(label));
        }
        for spans in highlight(&code.lang, &code.source) {
            let mut line = self.prefix();
            line.push(Span::styled("┃ ", frame));
            line.extend(spans);
            self.lines.push(Line::from(line));
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn code_style() -> Style {
    Style::default().fg(Color::White)
}

/// One span list per source line. Unknown languages come back unstyled.
fn highlight(lang: &str, source: &str) -> Vec<Vec<Span<'static>>> {
    let syntax = if lang.is_empty() {
        None
    } else {
        SYNTAXES.find_syntax_by_token(lang)
    };
    let (Some(syntax), Some(theme)) = (syntax, THEME.as_ref()) else {
        return source
            .lines()
            .map(|line| vec![Span::styled(line.replace('\t', TAB), code_style())])
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(source)
        .map(|line| match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => ranges
                .into_iter()
                .filter_map(|(style, fragment)| {
                    let content = fragment.trim_end_matches('\n').replace('\t', TAB);
                    if content.is_empty() {
                        return None;
                    }
                    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    Some(Span::styled(content, Style::default().fg(fg)))
                })
                .collect(),
            Err(_) => vec![Span::styled(
                line.trim_end_matches('\n').replace('\t', TAB),
                code_style(),
            )],
        })
        .collect()
}
