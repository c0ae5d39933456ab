//! Per-connection page state machine.
//!
//! Transitions are a pure function of (session, key, catalog).  The one
//! transition that touches shared state, tuning in, is returned as an
//! [`Effect`] for the driver to apply to the `StateManager`, so replaying a
//! key sequence always lands on the same session state.

use kloom_proto::catalog::Catalog;

use crate::input::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Intro,
    Splash,
    Archive,
    Detail,
    About,
    Help,
}

impl Page {
    /// Pages with per-frame animation, redrawn on the fast timer.
    pub fn is_animated(self) -> bool {
        matches!(self, Page::Intro | Page::Splash | Page::Detail)
    }

    /// Pages that display the shared now-playing state.
    pub fn shows_broadcast(self) -> bool {
        matches!(self, Page::Splash | Page::Detail)
    }
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Toggle now-playing for this show index.
    ToggleTune(usize),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub page: Page,
    /// Navigable show index; meaningful on the archive page.
    pub selection: usize,
    /// First visible archive row.  Re-derived by the renderer every frame.
    pub scroll_offset: usize,
    /// Show index inspected on the detail page.
    pub detail: Option<usize>,
    /// URL popup overlay on the detail page.
    pub popup: bool,
    pub frame: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            page: Page::Intro,
            selection: 0,
            scroll_offset: 0,
            detail: None,
            popup: false,
            frame: 0,
        }
    }

    pub fn handle_key(&mut self, key: Key, catalog: &Catalog) -> Effect {
        if key.is_quit() {
            return Effect::Quit;
        }

        match self.page {
            Page::Intro => self.page = Page::Splash,

            Page::Splash => {
                if key.is_char(b'1') || key.is_enter() || matches!(key, Key::Down | Key::Right) {
                    self.page = Page::Archive;
                } else if key.is_char(b'2') {
                    self.page = Page::About;
                } else if key.is_char(b'3') {
                    self.page = Page::Help;
                }
            }

            Page::Archive => {
                let count = catalog.navigable_count();
                match key {
                    Key::Up if count > 0 => {
                        self.selection = (self.selection + count - 1) % count;
                    }
                    Key::Down if count > 0 => {
                        self.selection = (self.selection + 1) % count;
                    }
                    k if k.is_enter() || k == Key::Right => {
                        if let Some(show) = catalog.navigable_show(self.selection) {
                            self.detail = Some(show);
                            self.popup = false;
                            self.page = Page::Detail;
                        }
                    }
                    k if k.is_back() => self.page = Page::Splash,
                    _ => {}
                }
            }

            Page::Detail => {
                if key.is_char(b't') {
                    if let Some(show) = self.detail {
                        return Effect::ToggleTune(show);
                    }
                } else if key.is_char(b'o') {
                    self.popup = !self.popup;
                } else if key.is_back() {
                    self.popup = false;
                    self.page = Page::Archive;
                }
            }

            Page::About | Page::Help => {
                if key.is_back() {
                    self.page = Page::Splash;
                }
            }
        }

        Effect::None
    }

    /// The intro animation ran out without a keypress.
    pub fn finish_intro(&mut self) {
        if self.page == Page::Intro {
            self.page = Page::Splash;
        }
    }

    pub fn advance_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
    }
}
