// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

// Sender prefixes, padded to the same width so wrapped text lines up.
pub const PREFIX_USER: &str = "You: ";
pub const PREFIX_ASSISTANT: &str = "AI:  ";

pub const INPUT_HINT: &str = "Type a message, Enter to send / Shift+Enter for newline";
pub const INPUT_BUSY: &str = "Sending...";
pub const EMPTY_STATE: &str = "Ask anything. Your conversation starts here.";
pub const STATUS_CONNECTING: &str = "Connecting";

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_APP: &str = " Relay Chat ";
pub const TITLE_CHAT: &str = " Chat ";
pub const TITLE_INPUT: &str = " Message ";

const LOADING_FRAMES: [&str; 3] = [".  ", ".. ", "..."];

pub fn loading_frame(tick: u64) -> &'static str {
    LOADING_FRAMES[((tick / 3) % LOADING_FRAMES.len() as u64) as usize]
}

pub fn scroll_label(scroll: u16) -> String {
    if scroll == 0 {
        "Bottom".to_string()
    } else {
        format!("+{} lines", scroll)
    }
}

// Build the status bar line with width-aware compaction.
// Segments are appended in order until the next one would overflow `max_width`.
pub fn build_status_line(
    backend_url: &str,
    messages: usize,
    scroll: u16,
    sending: bool,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[{}]", backend_url));
    segments.push(format!("[{}] Msgs:{}", scroll_label(scroll), messages));
    if sending {
        segments.push(INPUT_BUSY.to_string());
    }
    let hints: [&str; 3] = [
        "Enter: send; Shift+Enter: newline",
        "PgUp/PgDn: scroll",
        "Esc/Ctrl-C: quit",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}
