use relay_core::chat::{ChatMessage, Sender};
use textwrap::{wrap, Options};
use unicode_width::UnicodeWidthStr;

use crate::strings::{loading_frame, PREFIX_ASSISTANT, PREFIX_USER};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    User,
    Assistant,
    Error,
    Loading,
    Spacer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatLine {
    pub kind: LineKind,
    /// Byte length of the sender prefix on this line; 0 on continuation lines.
    pub prefix_len: usize,
    pub text: String,
}

fn prefix_for(sender: Sender) -> &'static str {
    match sender {
        Sender::User => PREFIX_USER,
        Sender::Assistant => PREFIX_ASSISTANT,
    }
}

fn wrap_with_prefix(prefix: &str, body: &str, width: u16, kind: LineKind, out: &mut Vec<ChatLine>) {
    let indent = " ".repeat(UnicodeWidthStr::width(prefix));
    let mut first = true;
    for (i, para) in body.split('\n').enumerate() {
        // textwrap drops the indent of an empty paragraph, so the prefix is placed by hand.
        if para.is_empty() {
            out.push(ChatLine {
                kind,
                prefix_len: if first { prefix.len() } else { 0 },
                text: if first { prefix.to_string() } else { String::new() },
            });
            first = false;
            continue;
        }
        let lead = if i == 0 { prefix } else { indent.as_str() };
        let opts = Options::new(width.max(1) as usize)
            .initial_indent(lead)
            .subsequent_indent(&indent);
        for l in wrap(para, opts) {
            out.push(ChatLine {
                kind,
                prefix_len: if first { prefix.len() } else { 0 },
                text: l.into_owned(),
            });
            first = false;
        }
    }
}

/// Lines of the conversation as displayed, oldest first. The loading
/// placeholder is derived from `sending` and is never part of `messages`.
pub fn chat_lines(messages: &[ChatMessage], sending: bool, tick: u64, width: u16) -> Vec<ChatLine> {
    let mut out = Vec::new();
    for (i, m) in messages.iter().enumerate() {
        if i > 0 {
            out.push(ChatLine {
                kind: LineKind::Spacer,
                prefix_len: 0,
                text: String::new(),
            });
        }
        let kind = match (m.sender, m.is_error) {
            (_, true) => LineKind::Error,
            (Sender::User, false) => LineKind::User,
            (Sender::Assistant, false) => LineKind::Assistant,
        };
        wrap_with_prefix(prefix_for(m.sender), &m.text, width, kind, &mut out);
    }
    if sending {
        if !messages.is_empty() {
            out.push(ChatLine {
                kind: LineKind::Spacer,
                prefix_len: 0,
                text: String::new(),
            });
        }
        out.push(ChatLine {
            kind: LineKind::Loading,
            prefix_len: PREFIX_ASSISTANT.len(),
            text: format!("{}{}", PREFIX_ASSISTANT, loading_frame(tick)),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(lines: &[ChatLine], kind: LineKind) -> usize {
        lines.iter().filter(|l| l.kind == kind).count()
    }

    #[test]
    fn messages_render_in_order() {
        let msgs = vec![ChatMessage::user("Hello"), ChatMessage::assistant("Hi there!")];
        let lines = chat_lines(&msgs, false, 0, 40);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["You: Hello", "", "AI:  Hi there!"]);
        assert_eq!(lines[0].prefix_len, PREFIX_USER.len());
    }

    #[test]
    fn placeholder_only_while_sending() {
        let msgs = vec![ChatMessage::user("Hello")];
        assert_eq!(count(&chat_lines(&msgs, true, 7, 40), LineKind::Loading), 1);
        assert_eq!(count(&chat_lines(&msgs, false, 7, 40), LineKind::Loading), 0);
    }

    #[test]
    fn long_text_wraps_under_the_prefix() {
        let msgs = vec![ChatMessage::assistant("one two three four five six")];
        let lines = chat_lines(&msgs, false, 0, 14);
        assert!(lines.len() > 1);
        assert!(lines[1].text.starts_with("     "));
        assert_eq!(lines[1].prefix_len, 0);
    }

    #[test]
    fn error_messages_are_marked() {
        let msgs = vec![ChatMessage::offline_notice()];
        let lines = chat_lines(&msgs, false, 0, 200);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].kind, LineKind::Error);
    }

    #[test]
    fn explicit_newlines_are_kept() {
        let msgs = vec![ChatMessage::user("a\nb")];
        let lines = chat_lines(&msgs, false, 0, 40);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["You: a", "     b"]);
    }

    #[test]
    fn leading_newline_keeps_the_prefix() {
        let msgs = vec![ChatMessage::assistant("\nHello")];
        let lines = chat_lines(&msgs, false, 0, 40);
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["AI:  ", "     Hello"]);
        assert_eq!(lines[0].prefix_len, PREFIX_ASSISTANT.len());
        assert_eq!(lines[1].prefix_len, 0);
    }
}
