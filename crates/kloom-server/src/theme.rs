//! ANSI palette and control sequences for the teletext screens.

use kloom_proto::show::ShowKind;

/// Frame width in columns.
pub const WIDTH: usize = 80;

// ── Control ───────────────────────────────────────────────────────────────────

pub const CLEAR: &str = "\x1b[2J\x1b[H";
pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

// ── Style ─────────────────────────────────────────────────────────────────────

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const UNDERLINE: &str = "\x1b[4m";

// ── Color palette ─────────────────────────────────────────────────────────────

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

pub const BRIGHT_RED: &str = "\x1b[91m";
pub const BRIGHT_GREEN: &str = "\x1b[92m";
pub const BRIGHT_YELLOW: &str = "\x1b[93m";
pub const BRIGHT_MAGENTA: &str = "\x1b[95m";
pub const BRIGHT_CYAN: &str = "\x1b[96m";
pub const BRIGHT_WHITE: &str = "\x1b[97m";

pub const BG_BLACK: &str = "\x1b[40m";
pub const BG_GREEN: &str = "\x1b[42m";
pub const BG_MAGENTA: &str = "\x1b[45m";

pub const C_METER_OFF: &str = "\x1b[38;5;236m"; // unlit meter cells, scanlines
pub const C_MUTED: &str = "\x1b[38;5;240m"; // rules, dim borders
pub const C_SECONDARY: &str = "\x1b[38;5;245m"; // labels, key hints
pub const C_BODY: &str = "\x1b[38;5;250m"; // description text
pub const C_CLOCK: &str = "\x1b[38;5;208m";
pub const C_FLICKER: &str = "\x1b[38;5;172m"; // subtitle flicker frame
pub const BG_CHIP: &str = "\x1b[48;5;236m";

/// Foreground from the 256-color cube.
pub fn fg(n: u8) -> String {
    format!("\x1b[38;5;{}m", n)
}

/// Glyph and color marking how a show is published.
pub fn badge(kind: &ShowKind) -> (&'static str, &'static str) {
    match kind {
        ShowKind::LocalAudio => ("●", BRIGHT_GREEN),
        ShowKind::Embed { .. } => ("◆", BRIGHT_MAGENTA),
        ShowKind::YouTube { .. } => ("▶", BRIGHT_RED),
    }
}

// ── Artwork ───────────────────────────────────────────────────────────────────

pub const LOGO: &[&str] = &[
    "██╗  ██╗██╗      ██████╗  ██████╗ ███╗   ███╗",
    "██║ ██╔╝██║     ██╔═══██╗██╔═══██╗████╗ ████║",
    "█████╔╝ ██║     ██║   ██║██║   ██║██╔████╔██║",
    "██╔═██╗ ██║     ██║   ██║██║   ██║██║╚██╔╝██║",
    "██║  ██╗███████╗╚██████╔╝╚██████╔╝██║ ╚═╝ ██║",
    "╚═╝  ╚═╝╚══════╝ ╚═════╝  ╚═════╝ ╚═╝     ╚═╝",
];

pub const SUBTITLE: &str = "L O   K A D O S H   //   N O T H I N G   I S   H O L Y";

pub const MINI_LOGO: &str = "◢◤ KLOOM ◥◣";

/// Colors the splash logo cycles through, one step per frame.
pub const LOGO_CYCLE: &[&str] = &[
    BRIGHT_MAGENTA,
    BRIGHT_CYAN,
    BRIGHT_GREEN,
    BRIGHT_YELLOW,
    BRIGHT_WHITE,
];
