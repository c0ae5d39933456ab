//! Double-line boxes and horizontal rules.

use super::text::{clip, visible_width};
use crate::theme::{BOLD, RESET, WIDTH, YELLOW};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// `╔═══ TITLE ═══╗` spanning `width` columns.  An empty title draws a plain top.
pub fn box_top(title: &str, color: &str, width: usize) -> String {
    let inner = width.saturating_sub(2);
    if title.is_empty() {
        return format!("{color}╔{}╗{RESET}", "═".repeat(inner));
    }
    let title = format!(" {} ", title);
    let title_w = visible_width(&title);
    let left = inner.saturating_sub(title_w) / 2;
    let right = inner.saturating_sub(title_w + left);
    format!(
        "{color}╔{}{RESET}{BOLD}{YELLOW}{title}{RESET}{color}{}╗{RESET}",
        "═".repeat(left),
        "═".repeat(right)
    )
}

/// `║ content ║`, padded by visible width.  Content wider than `width - 4`
/// is clipped so the right border stays in place.
pub fn box_mid(content: &str, color: &str, width: usize, align: Align) -> String {
    let room = width.saturating_sub(4);
    let clipped;
    let content = if visible_width(content) > room {
        clipped = clip(content, room);
        clipped.as_str()
    } else {
        content
    };
    let padding = width.saturating_sub(visible_width(content) + 2);
    let inner = match align {
        Align::Left => format!(
            " {content}{RESET}{}",
            " ".repeat(padding.saturating_sub(1))
        ),
        Align::Center => {
            let left = padding / 2;
            format!(
                "{}{content}{RESET}{}",
                " ".repeat(left),
                " ".repeat(padding - left)
            )
        }
    };
    format!("{color}║{RESET}{inner}{color}║{RESET}")
}

pub fn box_bot(color: &str, width: usize) -> String {
    format!("{color}╚{}╝{RESET}", "═".repeat(width.saturating_sub(2)))
}

/// Left-aligned row in a full-width box.
pub fn row(content: &str, color: &str) -> String {
    box_mid(content, color, WIDTH, Align::Left)
}

/// Solid full-width bar (`█`), used as the teletext page edge.
pub fn bar(color: &str) -> String {
    format!("{color}{}{RESET}", "█".repeat(WIDTH))
}

/// Thin full-width rule.
pub fn rule(color: &str) -> String {
    format!("{color}{}{RESET}", "─".repeat(WIDTH))
}

/// Single-line box around a section label: three lines.
pub fn label_box(label: &str, border: &str, text: &str) -> [String; 3] {
    let w = visible_width(label) + 2;
    [
        format!("  {border}{BOLD}┌{}┐{RESET}", "─".repeat(w)),
        format!("  {border}{BOLD}│ {text}{label}{border} │{RESET}"),
        format!("  {border}{BOLD}└{}┘{RESET}", "─".repeat(w)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{CYAN, MAGENTA};

    #[test]
    fn rows_fill_exact_width() {
        for align in [Align::Left, Align::Center] {
            let line = box_mid(&format!("{CYAN}hello{RESET}"), MAGENTA, WIDTH, align);
            assert_eq!(visible_width(&line), WIDTH, "{align:?}");
        }
    }

    #[test]
    fn overlong_rows_are_clipped_to_width() {
        let long = format!("{CYAN}{}{RESET}", "x".repeat(WIDTH * 2));
        for align in [Align::Left, Align::Center] {
            let line = box_mid(&long, MAGENTA, WIDTH, align);
            assert_eq!(visible_width(&line), WIDTH, "{align:?}");
            assert!(crate::widgets::text::strip_controls(&line).ends_with("x ║"));
        }
    }

    #[test]
    fn top_and_bottom_fill_width() {
        assert_eq!(visible_width(&box_top("NOW PLAYING", MAGENTA, WIDTH)), WIDTH);
        assert_eq!(visible_width(&box_top("", MAGENTA, WIDTH)), WIDTH);
        assert_eq!(visible_width(&box_top("ODD", MAGENTA, 41)), 41);
        assert_eq!(visible_width(&box_bot(MAGENTA, WIDTH)), WIDTH);
    }

    #[test]
    fn empty_row_is_blank_inside() {
        let line = box_mid("", MAGENTA, 10, Align::Center);
        assert_eq!(crate::widgets::text::strip_controls(&line), "║        ║");
    }

    #[test]
    fn label_box_lines_align() {
        let [top, mid, bot] = label_box("KOL HAZUTI", MAGENTA, YELLOW);
        assert_eq!(visible_width(&top), visible_width(&mid));
        assert_eq!(visible_width(&mid), visible_width(&bot));
    }
}
