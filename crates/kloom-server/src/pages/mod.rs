//! Frame renderer.
//!
//! `render` maps the session, a snapshot of the broadcast state, and the
//! clock into one complete frame.  It performs no I/O and never touches
//! shared state; randomness (static, meters) comes from the caller's `Rng` so
//! tests can seed it.

mod about;
pub mod archive;
mod detail;
mod help;
pub mod intro;
mod splash;

use std::time::Duration;

use chrono::{DateTime, Local};
use kloom_proto::catalog::Catalog;
use kloom_proto::show::ShowRecord;
use kloom_proto::state::BroadcastSnapshot;
use rand::Rng;

use crate::session::{Page, Session};
use crate::theme::{
    BG_BLACK, BOLD, BRIGHT_MAGENTA, CLEAR, C_MUTED, C_SECONDARY, HIDE_CURSOR, MAGENTA, MINI_LOGO,
    RESET, WIDTH, YELLOW,
};
use crate::widgets::frame_box::{bar, box_mid, rule, Align};

/// Everything a frame may show besides the session itself.
pub struct RenderContext<'a> {
    pub catalog: &'a Catalog,
    /// Public archive root for local-audio listen URLs.
    pub site_url: &'a str,
    pub snapshot: BroadcastSnapshot,
    pub now: DateTime<Local>,
    pub uptime: Duration,
}

impl RenderContext<'_> {
    pub fn now_playing(&self) -> Option<&ShowRecord> {
        self.snapshot.now_playing.and_then(|i| self.catalog.show(i))
    }

    pub fn listen_url(&self, show: &ShowRecord) -> String {
        show.listen_url(self.site_url)
    }
}

/// A composed screen, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub text: String,
    /// Archive scroll offset after keeping the selection visible; the
    /// session's offset is returned unchanged on other pages.
    pub scroll_offset: usize,
}

/// Render the session's current page.  Returns `None` once the intro
/// animation has run out; the caller moves the session on and renders again.
pub fn render<R: Rng + ?Sized>(
    session: &Session,
    ctx: &RenderContext<'_>,
    rng: &mut R,
) -> Option<Frame> {
    let mut scroll_offset = session.scroll_offset;
    let lines = match session.page {
        Page::Intro => intro::render(session.frame, rng)?,
        Page::Splash => splash::render(session.frame, ctx, rng),
        Page::Archive => {
            let (lines, offset) = archive::render(session.selection, session.scroll_offset, ctx);
            scroll_offset = offset;
            lines
        }
        Page::Detail => match session.detail.and_then(|i| ctx.catalog.show(i).map(|s| (i, s))) {
            Some((_, show)) if session.popup => detail::render_popup(show, ctx),
            Some((idx, show)) => detail::render(idx, show, session.frame, ctx),
            // No show to inspect; fall back to the archive listing.
            None => archive::render(session.selection, session.scroll_offset, ctx).0,
        },
        Page::About => about::render(),
        Page::Help => help::render(),
    };

    Some(Frame {
        text: compose(&lines),
        scroll_offset,
    })
}

/// Magenta page banner with the mini logo and a page title.
fn title_bar(title: &str) -> [String; 3] {
    [
        bar(MAGENTA),
        box_mid(
            &format!("{BRIGHT_MAGENTA}{MINI_LOGO}{RESET}  {BOLD}{YELLOW}{title}{RESET}"),
            MAGENTA,
            WIDTH,
            Align::Center,
        ),
        bar(MAGENTA),
    ]
}

/// Rule, key hints and closing bar.
fn footer(hints: &str) -> [String; 3] {
    [
        rule(C_MUTED),
        format!("  {C_SECONDARY}{hints}{RESET}"),
        bar(MAGENTA),
    ]
}

/// Join page lines into one frame that overwrites the whole screen.
fn compose(lines: &[String]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum::<usize>() + 16);
    text.push_str(CLEAR);
    text.push_str(BG_BLACK);
    text.push_str(HIDE_CURSOR);
    // Raw-mode terminals do not translate LF, so send CR LF.
    text.push_str(&lines.join("\r\n"));
    text
}
