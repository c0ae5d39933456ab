use kloom_proto::show::ShowRecord;

use super::{footer, RenderContext};
use crate::theme::{
    badge, BG_CHIP, BG_GREEN, BG_MAGENTA, BOLD, BRIGHT_CYAN, BRIGHT_GREEN, BRIGHT_WHITE, CYAN,
    C_BODY, C_MUTED, C_SECONDARY, MAGENTA, RESET, UNDERLINE, WHITE, WIDTH, YELLOW,
};
use crate::widgets::frame_box::{bar, box_bot, box_mid, box_top, row, Align};
use crate::widgets::text::{link, truncate, wrap_words};

const MAX_TAGS: usize = 6;
const MAX_DESCRIPTION_LINES: usize = 6;

pub fn render(idx: usize, show: &ShowRecord, frame: u64, ctx: &RenderContext<'_>) -> Vec<String> {
    let mut lines = Vec::new();

    let (glyph, color) = badge(&show.kind);
    lines.push(bar(MAGENTA));
    lines.push(box_mid(
        &format!(
            "{color}{glyph}{RESET}  {BOLD}{YELLOW}{}{RESET}",
            truncate(&show.title, WIDTH - 10)
        ),
        MAGENTA,
        WIDTH,
        Align::Center,
    ));
    lines.push(bar(MAGENTA));
    lines.push(String::new());

    lines.push(box_top("INFO", CYAN, WIDTH));
    lines.push(row(
        &format!("{C_SECONDARY}Series:{RESET}  {BRIGHT_WHITE}{}{RESET}", show.series),
        CYAN,
    ));
    lines.push(row(
        &format!("{C_SECONDARY}Date:{RESET}    {WHITE}{}{RESET}", show.date_label()),
        CYAN,
    ));
    if let Some(guest) = &show.guest {
        lines.push(row(
            &format!("{C_SECONDARY}Guest:{RESET}   {BRIGHT_GREEN}{guest}{RESET}"),
            CYAN,
        ));
    }
    if let Some(host) = &show.host {
        lines.push(row(
            &format!("{C_SECONDARY}Host:{RESET}    {BRIGHT_CYAN}{host}{RESET}"),
            CYAN,
        ));
    }
    lines.push(box_bot(CYAN, WIDTH));
    lines.push(String::new());

    if !show.tags.is_empty() {
        let chips: Vec<String> = show
            .tags
            .iter()
            .take(MAX_TAGS)
            .map(|t| format!("{BG_CHIP}{BRIGHT_WHITE} #{t} {RESET}"))
            .collect();
        lines.push(format!("  {}", chips.join("  ")));
        lines.push(String::new());
    }

    let description = show.description.as_deref().unwrap_or("No description.");
    let wrapped = wrap_words(description, WIDTH - 6);
    lines.push(box_top("DESCRIPTION", C_MUTED, WIDTH));
    for text in wrapped.iter().take(MAX_DESCRIPTION_LINES) {
        lines.push(row(&format!("{C_BODY}{text}"), C_MUTED));
    }
    if wrapped.len() > MAX_DESCRIPTION_LINES {
        lines.push(row(&format!("{C_MUTED}..."), C_MUTED));
    }
    lines.push(box_bot(C_MUTED, WIDTH));
    lines.push(String::new());

    let url = ctx.listen_url(show);
    lines.push(format!("  {C_SECONDARY}Listen:{RESET}"));
    let label = format!("{UNDERLINE}{BRIGHT_CYAN}{}{RESET}", truncate(&url, WIDTH - 4));
    lines.push(format!("  {}", link(&url, &label)));
    lines.push(format!(
        "  {C_MUTED}(click link or Cmd/Ctrl+click in terminal){RESET}"
    ));
    lines.push(String::new());

    if ctx.snapshot.is_playing(idx) {
        let pulse = if frame % 2 == 0 { "▓" } else { "█" };
        lines.push(format!(
            "  {BG_GREEN}{BOLD}{WHITE} {pulse} TUNED IN {pulse} {RESET}  {C_SECONDARY}[T] to untune{RESET}"
        ));
    } else {
        lines.push(format!(
            "  {BG_MAGENTA}{BOLD}{BRIGHT_WHITE}   ▶ TUNE IN   {RESET}  {C_SECONDARY}[T] to tune{RESET}"
        ));
    }

    lines.push(String::new());
    lines.extend(footer("[T] tune/untune  [O] copy URL  [ESC] back  [Q] quit"));

    lines
}

/// Full-screen overlay showing the listen URL on its own for copying. A URL
/// too long for the box is clipped on screen but stays whole as the link
/// target.
pub fn render_popup(show: &ShowRecord, ctx: &RenderContext<'_>) -> Vec<String> {
    let url = ctx.listen_url(show);
    let frame_row = |content: &str| box_mid(content, BRIGHT_GREEN, WIDTH, Align::Center);

    vec![
        String::new(),
        bar(MAGENTA),
        box_top("LISTEN URL", BRIGHT_GREEN, WIDTH),
        frame_row(""),
        frame_row(&format!("{BRIGHT_WHITE}{BOLD}Copy this URL to listen:{RESET}")),
        frame_row(""),
        frame_row(&link(&url, &format!("{UNDERLINE}{BRIGHT_CYAN}{url}{RESET}"))),
        frame_row(""),
        frame_row(&format!(
            "{C_SECONDARY}(triple-click to select, or Cmd/Ctrl+click to open){RESET}"
        )),
        frame_row(""),
        box_bot(BRIGHT_GREEN, WIDTH),
        String::new(),
    ]
    .into_iter()
    .chain(footer("[O] close  [ESC] back"))
    .collect()
}
