//! Archive listing: section headers and show rows in a scrolling window.

use kloom_proto::catalog::Entry;

use super::{footer, RenderContext};
use crate::theme::{
    badge, BG_MAGENTA, BOLD, BRIGHT_GREEN, BRIGHT_MAGENTA, BRIGHT_WHITE, CYAN, C_MUTED,
    C_SECONDARY, MAGENTA, MINI_LOGO, RESET, WIDTH, YELLOW,
};
use crate::widgets::frame_box::{bar, box_mid, label_box, Align};
use crate::widgets::text::truncate;

/// Catalog entries visible at once.
pub const VISIBLE_ROWS: usize = 15;

/// Scroll offset that keeps `selected_row` inside a `window`-row view,
/// moving as little as possible from `offset`.
pub fn scroll_for(selected_row: usize, offset: usize, window: usize) -> usize {
    if selected_row < offset {
        selected_row
    } else if selected_row >= offset + window {
        selected_row + 1 - window
    } else {
        offset
    }
}

/// Returns the page lines and the adjusted scroll offset.
pub fn render(selection: usize, offset: usize, ctx: &RenderContext<'_>) -> (Vec<String>, usize) {
    let catalog = ctx.catalog;
    let entries = catalog.entries();
    let selected_row = catalog.entry_position(selection).unwrap_or(0);
    let offset = scroll_for(selected_row, offset, VISIBLE_ROWS);

    let mut lines = Vec::new();
    lines.push(bar(MAGENTA));
    lines.push(box_mid(
        &format!(
            "{BRIGHT_MAGENTA}{MINI_LOGO}{RESET}  {BOLD}{YELLOW}ARCHIVE{RESET}  {C_SECONDARY}[{} shows]{RESET}",
            catalog.shows().len()
        ),
        MAGENTA,
        WIDTH,
        Align::Center,
    ));
    lines.push(bar(MAGENTA));
    lines.push(String::new());

    if offset > 0 {
        lines.push(format!("  {C_SECONDARY}↑ more above{RESET}"));
    }

    if entries.is_empty() {
        lines.push(format!("  {C_SECONDARY}(the archive is empty){RESET}"));
    }

    for (pos, entry) in entries.iter().enumerate().skip(offset).take(VISIBLE_ROWS) {
        match *entry {
            Entry::Header(label) => lines.extend(label_box(label, MAGENTA, YELLOW)),
            Entry::Show(idx) => {
                let Some(show) = catalog.show(idx) else { continue };
                let (glyph, color) = badge(&show.kind);
                if pos == selected_row {
                    lines.push(format!(
                        "  {BRIGHT_GREEN}▶{RESET} {BG_MAGENTA}{BRIGHT_WHITE}{BOLD} {} {RESET} {color}{glyph}{RESET}",
                        truncate(&show.title, WIDTH - 14)
                    ));
                    lines.push(format!(
                        "    {CYAN}{}{RESET} {C_MUTED}// {}{RESET}",
                        show.series,
                        show.date_label()
                    ));
                } else {
                    lines.push(format!(
                        "    {YELLOW}{}{RESET} {color}{glyph}{RESET}",
                        truncate(&show.title, WIDTH - 12)
                    ));
                }
            }
        }
    }

    if offset + VISIBLE_ROWS < entries.len() {
        lines.push(format!("  {C_SECONDARY}↓ more below{RESET}"));
    }

    lines.push(String::new());
    lines.extend(footer("[↑↓] navigate  [ENTER] select  [ESC] back  [Q] quit"));

    (lines, offset)
}
