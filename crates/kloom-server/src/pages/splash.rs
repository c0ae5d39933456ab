use rand::Rng;

use super::RenderContext;
use crate::theme::{
    BOLD, BRIGHT_CYAN, BRIGHT_WHITE, CYAN, C_CLOCK, C_FLICKER, C_MUTED, C_SECONDARY, GREEN,
    LOGO, LOGO_CYCLE, MAGENTA, RESET, SUBTITLE, UNDERLINE, WHITE, WIDTH, YELLOW,
};
use crate::widgets::frame_box::{bar, box_bot, box_mid, box_top, row, rule, Align};
use crate::widgets::meter::{random_levels, vu_bar};
use crate::widgets::noise::static_line;
use crate::widgets::text::{centered, link, truncate};

pub fn render<R: Rng + ?Sized>(frame: u64, ctx: &RenderContext<'_>, rng: &mut R) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(bar(MAGENTA));
    lines.push(static_line(rng, WIDTH, 0.15));

    for (i, logo_row) in LOGO.iter().enumerate() {
        let color = LOGO_CYCLE[(i + frame as usize) % LOGO_CYCLE.len()];
        lines.push(centered(&format!("{color}{logo_row}{RESET}"), WIDTH));
    }

    let sub_color = if frame % 3 != 0 { YELLOW } else { C_FLICKER };
    lines.push(centered(&format!("{sub_color}{BOLD}{SUBTITLE}{RESET}"), WIDTH));

    lines.push(static_line(rng, WIDTH, 0.15));
    lines.push(String::new());

    now_playing_panel(&mut lines, ctx, rng);
    lines.push(String::new());

    let menu_rule = format!("{C_MUTED}{}", "━".repeat(35));
    lines.push(box_top("MENU", MAGENTA, WIDTH));
    lines.push(row(
        &format!("{YELLOW}[1]{RESET} {BRIGHT_WHITE}BROWSE ARCHIVE{RESET}   {menu_rule}"),
        MAGENTA,
    ));
    lines.push(row(
        &format!("{CYAN}[2]{RESET} {WHITE}ABOUT{RESET}            {menu_rule}"),
        MAGENTA,
    ));
    lines.push(row(
        &format!("{GREEN}[3]{RESET} {WHITE}HELP{RESET}             {menu_rule}"),
        MAGENTA,
    ));
    lines.push(box_bot(MAGENTA, WIDTH));
    lines.push(String::new());

    let listeners = ctx.snapshot.listeners;
    let plural = if listeners == 1 { "" } else { "s" };
    lines.push(format!("{C_MUTED}╾{}╼{RESET}", "─".repeat(WIDTH - 2)));
    lines.push(format!(
        "  {GREEN}●{RESET} {C_SECONDARY}SYSTEM ONLINE{RESET}    {C_CLOCK}{}{RESET}    {CYAN}⚡{RESET} {C_SECONDARY}{listeners} listener{plural}{RESET}    {MAGENTA}↑{RESET} {C_SECONDARY}{}{RESET}",
        ctx.now.format("%H:%M:%S"),
        format_uptime(ctx.uptime.as_secs()),
    ));

    lines.push(rule(C_MUTED));
    lines.push(format!("  {C_SECONDARY}[Q] quit{RESET}"));
    lines.push(bar(MAGENTA));

    lines
}

fn now_playing_panel<R: Rng + ?Sized>(lines: &mut Vec<String>, ctx: &RenderContext<'_>, rng: &mut R) {
    let Some(show) = ctx.now_playing() else {
        lines.push(box_top("◇ SILENCE", C_MUTED, WIDTH));
        lines.push(row(&format!("{C_SECONDARY}nothing playing..."), C_MUTED));
        lines.push(row(&format!("{C_MUTED}browse the archive to tune in"), C_MUTED));
        lines.push(box_bot(C_MUTED, WIDTH));
        return;
    };

    lines.push(box_top("▶ NOW PLAYING", GREEN, WIDTH));
    lines.push(row(
        &format!("{BRIGHT_WHITE}{BOLD}{}{RESET}", truncate(&show.title, WIDTH - 6)),
        GREEN,
    ));
    lines.push(row(
        &format!("{CYAN}{} // {}", truncate(&show.series, WIDTH - 20), show.date_label()),
        GREEN,
    ));

    let meters: Vec<String> = random_levels(rng).iter().map(|l| vu_bar(*l, 4)).collect();
    lines.push(box_mid(&meters.join("  "), GREEN, WIDTH, Align::Center));

    let url = ctx.listen_url(show);
    let label = format!("{UNDERLINE}{BRIGHT_CYAN}{}{RESET}", truncate(&url, WIDTH - 6));
    lines.push(row(&link(&url, &label), GREEN));
    lines.push(box_bot(GREEN, WIDTH));
}

/// `HH:MM:SS`; hours keep counting past 99.
pub fn format_uptime(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
