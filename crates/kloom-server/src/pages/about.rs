use super::{footer, title_bar};
use crate::theme::{
    BOLD, BRIGHT_GREEN, BRIGHT_WHITE, CYAN, C_MUTED, C_SECONDARY, GREEN, MAGENTA, RESET, YELLOW,
};

pub fn render() -> Vec<String> {
    let blurb: &[(&str, &str)] = &[
        (BRIGHT_WHITE, "KLOOM LO KADOSH is an underground"),
        (BRIGHT_WHITE, "radio archive."),
        ("", ""),
        (CYAN, "Experimental sound. Noise."),
        (CYAN, "Conversations."),
        ("", ""),
        (C_SECONDARY, "Broadcast out of the void by"),
        (BRIGHT_GREEN, "the KLOOM collective"),
        (C_SECONDARY, "and whoever else shows up."),
        ("", ""),
        (YELLOW, "Nothing is Holy."),
        (MAGENTA, "The signal is the message."),
        ("", ""),
        (C_MUTED, "──────────────────────────────────────────────────"),
        ("", ""),
        (C_SECONDARY, "Broadcasts, mixtapes and transmissions"),
        (C_SECONDARY, "from the edges, collected here because"),
        (C_SECONDARY, "they don't fit anywhere else."),
        ("", ""),
        (GREEN, "All frequencies welcome."),
    ];

    let mut lines: Vec<String> = title_bar("ABOUT").into();
    lines.push(String::new());
    for &(color, text) in blurb {
        if text.is_empty() {
            lines.push(String::new());
        } else if color == YELLOW {
            lines.push(format!("  {YELLOW}{BOLD}{text}{RESET}"));
        } else {
            lines.push(format!("  {color}{text}{RESET}"));
        }
    }
    lines.push(String::new());
    lines.extend(footer("[ESC] back  [Q] quit"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::text::strip_controls;

    #[test]
    fn about_has_banner_and_hints() {
        let text = strip_controls(&render().join("\n"));
        assert!(text.contains("ABOUT"));
        assert!(text.contains("Nothing is Holy."));
        assert!(text.contains("[ESC] back  [Q] quit"));
    }
}
