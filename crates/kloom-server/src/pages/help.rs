use kloom_proto::show::ShowKind;

use super::{footer, title_bar};
use crate::theme::{badge, CYAN, C_SECONDARY, GREEN, MAGENTA, RESET, WIDTH, YELLOW};
use crate::widgets::frame_box::{box_bot, box_top, row};

/// A titled box of `key  description` rows.
fn key_box(lines: &mut Vec<String>, title: &str, color: &str, keys: &[(&str, &str)]) {
    lines.push(box_top(title, color, WIDTH));
    for (key, what) in keys {
        if key.is_empty() {
            lines.push(row(&format!("{C_SECONDARY}            {what}"), color));
        } else {
            lines.push(row(&format!("{YELLOW}{key:<10}{RESET} {what}"), color));
        }
    }
    lines.push(box_bot(color, WIDTH));
    lines.push(String::new());
}

pub fn render() -> Vec<String> {
    let mut lines: Vec<String> = title_bar("HELP").into();
    lines.push(String::new());

    key_box(
        &mut lines,
        "NAVIGATION",
        CYAN,
        &[
            ("↑ ↓", "Move up/down"),
            ("ENTER", "Select item"),
            ("ESC", "Go back"),
            ("←", "Also go back"),
        ],
    );
    key_box(
        &mut lines,
        "PLAYBACK",
        GREEN,
        &[
            ("T", "Tune in to show"),
            ("", "(sets 'now playing' for everyone)"),
            ("O", "Show the listen URL"),
        ],
    );
    key_box(
        &mut lines,
        "QUICK KEYS",
        MAGENTA,
        &[
            ("1", "Archive"),
            ("2", "About"),
            ("3", "This help"),
            ("Q", "Quit"),
        ],
    );

    let kinds = [
        (ShowKind::LocalAudio, "Local audio (in-browser player)"),
        (ShowKind::Embed { embed_url: String::new() }, "Mixcloud embed"),
        (ShowKind::YouTube { embed_url: String::new() }, "YouTube embed"),
    ];
    lines.push(box_top("SHOW TYPES", C_SECONDARY, WIDTH));
    for (kind, what) in &kinds {
        let (glyph, color) = badge(kind);
        lines.push(row(&format!("{color}{glyph}{RESET}  {what}"), C_SECONDARY));
    }
    lines.push(box_bot(C_SECONDARY, WIDTH));

    lines.push(String::new());
    lines.extend(footer("[ESC] back  [Q] quit"));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::text::{strip_controls, visible_width};

    #[test]
    fn lists_every_section() {
        let text = strip_controls(&render().join("\n"));
        for section in ["NAVIGATION", "PLAYBACK", "QUICK KEYS", "SHOW TYPES"] {
            assert!(text.contains(section), "{section}");
        }
        assert!(text.contains("●  Local audio"));
        assert!(text.contains("▶  YouTube embed"));
    }

    #[test]
    fn boxes_stay_inside_width() {
        for line in render() {
            assert!(visible_width(&line) <= WIDTH, "{}", strip_controls(&line));
        }
    }
}
