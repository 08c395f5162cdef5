//! # Thread
//!
//! The visible conversation: an ordered list of nodes that the TUI draws
//! top to bottom. Two kinds of node exist:
//!
//! ```text
//! Thread
//! ├── Message(MessageNode)   // rendered Message, body = Markup | Literal
//! ├── Message(MessageNode)
//! └── Typing(TypingHandle)   // transient placeholder while a reply is pending
//! ```
//!
//! Every mutation that adds content bumps `revision`. The thread view
//! compares revisions between frames and scrolls to the bottom when it
//! changes, which is how "render then scroll to newest" works without the
//! core knowing about scroll offsets.

use crate::core::message::{Message, MessageKind, Sender};

/// Identifies the typing placeholder so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingHandle(u64);

/// How a message body must be presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Interpreted by the formatting collaborator (markdown).
    Markup(String),
    /// Shown exactly as written. No markup interpretation.
    Literal(String),
}

impl Body {
    pub fn text(&self) -> &str {
        match self {
            Body::Markup(s) | Body::Literal(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub sender: Sender,
    pub kind: MessageKind,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThreadNode {
    Message(MessageNode),
    Typing(TypingHandle),
}

#[derive(Debug, Default)]
pub struct Thread {
    nodes: Vec<ThreadNode>,
    next_handle: u64,
    revision: u64,
}

impl Thread {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node for `message` and request a scroll to the bottom.
    pub fn render(&mut self, message: &Message) {
        let body = if message.is_markup() {
            Body::Markup(message.content.clone())
        } else {
            Body::Literal(message.content.clone())
        };
        self.nodes.push(ThreadNode::Message(MessageNode {
            sender: message.sender,
            kind: message.kind,
            body,
        }));
        self.revision += 1;
    }

    /// Append the typing placeholder and return a handle to remove it.
    pub fn show_typing(&mut self) -> TypingHandle {
        let handle = TypingHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.push(ThreadNode::Typing(handle));
        self.revision += 1;
        handle
    }

    /// Remove the placeholder identified by `handle`.
    ///
    /// Returns false if it is already gone (e.g. the thread was cleared).
    pub fn hide_typing(&mut self, handle: TypingHandle) -> bool {
        let before = self.nodes.len();
        self.nodes
            .retain(|node| !matches!(node, ThreadNode::Typing(h) if *h == handle));
        self.nodes.len() != before
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.revision += 1;
    }

    pub fn nodes(&self) -> &[ThreadNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_typing(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, ThreadNode::Typing(_)))
    }

    /// Message nodes only, in display order.
    pub fn messages(&self) -> impl Iterator<Item = &MessageNode> {
        self.nodes.iter().filter_map(|node| match node {
            ThreadNode::Message(m) => Some(m),
            ThreadNode::Typing(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_reply_is_markup_everything_else_literal() {
        let mut thread = Thread::new();
        thread.render(&Message::user("**not bold**"));
        thread.render(&Message::bot("**bold**"));
        thread.render(&Message::fallback("*plain*"));
        thread.render(&Message::connection_error());

        let bodies: Vec<&Body> = thread.messages().map(|m| &m.body).collect();
        assert_eq!(bodies[0], &Body::Literal("**not bold**".to_string()));
        assert_eq!(bodies[1], &Body::Markup("**bold**".to_string()));
        assert_eq!(bodies[2], &Body::Literal("*plain*".to_string()));
        assert!(matches!(bodies[3], Body::Literal(_)));
    }

    #[test]
    fn test_render_bumps_revision() {
        let mut thread = Thread::new();
        let r0 = thread.revision();
        thread.render(&Message::user("hi"));
        assert!(thread.revision() > r0);
    }

    #[test]
    fn test_typing_indicator_removed_exactly_once() {
        let mut thread = Thread::new();
        thread.render(&Message::user("hi"));
        let handle = thread.show_typing();
        assert!(thread.is_typing());
        assert_eq!(thread.nodes().len(), 2);

        assert!(thread.hide_typing(handle));
        assert!(!thread.is_typing());
        assert_eq!(thread.nodes().len(), 1);

        // Second removal is a no-op
        assert!(!thread.hide_typing(handle));
        assert_eq!(thread.nodes().len(), 1);
    }

    #[test]
    fn test_hide_typing_only_removes_matching_handle() {
        let mut thread = Thread::new();
        let old = thread.show_typing();
        thread.clear();
        let current = thread.show_typing();

        assert!(!thread.hide_typing(old));
        assert!(thread.is_typing());
        assert!(thread.hide_typing(current));
    }

    #[test]
    fn test_clear_empties_thread() {
        let mut thread = Thread::new();
        thread.render(&Message::user("a"));
        thread.show_typing();
        thread.clear();
        assert!(thread.is_empty());
    }
}
