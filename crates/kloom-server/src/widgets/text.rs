//! Width-aware text helpers.  Frames embed SGR colors and OSC 8 hyperlinks,
//! so every measurement strips control sequences first.

use std::sync::OnceLock;

use regex::Regex;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

fn control_sequences() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // CSI (colors, cursor) | OSC terminated by ST or BEL (hyperlinks)
        Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]|\x1b\][^\x1b\x07]*(?:\x1b\\|\x07)")
            .expect("control sequence pattern is valid")
    })
}

pub fn strip_controls(s: &str) -> String {
    control_sequences().replace_all(s, "").into_owned()
}

/// Columns `s` occupies on screen.
pub fn visible_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_controls(s).as_str())
}

/// Plain text cut to at most `max` columns.
pub fn truncate(s: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

/// Styled text cut to at most `max` visible columns. Control sequences are
/// all kept, so colors still reset and hyperlinks still close.
pub fn clip(s: &str, max: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut used = 0;
    let mut rest = 0;
    for m in control_sequences().find_iter(s) {
        push_visible(&mut out, &s[rest..m.start()], &mut used, max);
        out.push_str(m.as_str());
        rest = m.end();
    }
    push_visible(&mut out, &s[rest..], &mut used, max);
    out
}

fn push_visible(out: &mut String, text: &str, used: &mut usize, max: usize) {
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if *used + w > max {
            return;
        }
        *used += w;
        out.push(c);
    }
}

/// OSC 8 hyperlink: clickable where supported, plain `text` elsewhere.
pub fn link(url: &str, text: &str) -> String {
    format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", url, text)
}

/// `content` preceded by enough spaces to center it in `width` columns.
pub fn centered(content: &str, width: usize) -> String {
    let pad = width.saturating_sub(visible_width(content)) / 2;
    format!("{}{}", " ".repeat(pad), content)
}

/// Greedy word wrap of plain text into lines of at most `width` columns.
/// A single word wider than `width` gets a line of its own.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.width() + 1 + word.width() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
