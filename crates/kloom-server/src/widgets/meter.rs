//! Fake level meters and progress bars.  Nothing here measures audio; the
//! splash page just wants something that twitches.

use rand::Rng;

use crate::theme::{C_METER_OFF, GREEN, RED, RESET, YELLOW};

pub const METER_COUNT: usize = 8;

/// One horizontal meter, `level` in 0.0..=1.0, green → yellow → red.
pub fn vu_bar(level: f32, width: usize) -> String {
    let lit = ((level.clamp(0.0, 1.0) * width as f32) as usize).min(width);
    let mut out = String::new();
    for i in 0..width {
        if i < lit {
            let color = if (i as f32) < width as f32 * 0.5 {
                GREEN
            } else if (i as f32) < width as f32 * 0.75 {
                YELLOW
            } else {
                RED
            };
            out.push_str(color);
            out.push('█');
        } else {
            out.push_str(C_METER_OFF);
            out.push('░');
        }
    }
    out.push_str(RESET);
    out
}

/// Mostly low levels with the occasional spike.
pub fn random_levels<R: Rng + ?Sized>(rng: &mut R) -> [f32; METER_COUNT] {
    std::array::from_fn(|_| {
        let spike = if rng.gen::<f32>() > 0.7 { 0.5 } else { 0.0 };
        rng.gen::<f32>() * 0.3 + 0.1 + spike
    })
}

pub fn progress_bar(filled: usize, width: usize, on: &str) -> String {
    let filled = filled.min(width);
    format!(
        "{on}{}{C_METER_OFF}{}{RESET}",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}
