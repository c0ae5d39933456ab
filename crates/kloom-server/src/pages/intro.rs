//! Boot animation: static → logo fading in → full logo.

use rand::Rng;

use crate::theme::{
    BOLD, BRIGHT_MAGENTA, C_SECONDARY, GREEN, LOGO, MAGENTA, RESET, SUBTITLE, WIDTH, YELLOW,
};
use crate::widgets::meter::progress_bar;
use crate::widgets::noise::static_line;
use crate::widgets::text::centered;

/// Frames in the boot sequence; frame `INTRO_FRAMES` reports completion.
pub const INTRO_FRAMES: u64 = 8;

const NOISE_FRAMES: u64 = 3;
const FADE_FRAMES: u64 = 6;
const NOISE_ROWS: usize = 20;
const PROGRESS_WIDTH: usize = 32;

pub fn render<R: Rng + ?Sized>(frame: u64, rng: &mut R) -> Option<Vec<String>> {
    let mut lines = Vec::new();

    if frame < NOISE_FRAMES {
        let intensity = 0.8 - frame as f32 * 0.2;
        for _ in 0..NOISE_ROWS {
            lines.push(static_line(rng, WIDTH, intensity));
        }
    } else if frame < FADE_FRAMES {
        // Each logo row resolves with growing probability.
        let resolved = (frame - NOISE_FRAMES) as f32 / (FADE_FRAMES - NOISE_FRAMES) as f32;
        lines.push(String::new());
        for row in LOGO {
            if rng.gen::<f32>() < resolved {
                lines.push(centered(&format!("{MAGENTA}{row}{RESET}"), WIDTH));
            } else {
                lines.push(static_line(rng, WIDTH, 0.3));
            }
        }
    } else if frame < INTRO_FRAMES {
        lines.push(String::new());
        for row in LOGO {
            lines.push(centered(&format!("{BRIGHT_MAGENTA}{row}{RESET}"), WIDTH));
        }
        lines.push(String::new());
        lines.push(centered(&format!("{YELLOW}{BOLD}{SUBTITLE}{RESET}"), WIDTH));
    } else {
        return None;
    }

    lines.push(String::new());
    lines.push(format!(
        "  {}",
        progress_bar(frame as usize * 4, PROGRESS_WIDTH, GREEN)
    ));
    lines.push(format!("  {C_SECONDARY}INITIALIZING...{RESET}"));

    Some(lines)
}
