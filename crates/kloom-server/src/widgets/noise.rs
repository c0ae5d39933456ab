use rand::seq::SliceRandom;
use rand::Rng;

use crate::theme::{fg, RESET};

const STATIC_CHARS: &[char] = &[
    '.', ':', ';', '!', '|', '/', '\\', '-', '_', '=', '+', '*', '#', '@', '%', '&', '$', '?',
];

/// A row of grey static; each cell is noise with probability `intensity`.
pub fn static_line<R: Rng + ?Sized>(rng: &mut R, width: usize, intensity: f32) -> String {
    let mut out = String::new();
    for _ in 0..width {
        if rng.gen::<f32>() < intensity {
            out.push_str(&fg(rng.gen_range(232..=255)));
            out.push(*STATIC_CHARS.choose(rng).unwrap_or(&'.'));
        } else {
            out.push(' ');
        }
    }
    out.push_str(RESET);
    out
}
