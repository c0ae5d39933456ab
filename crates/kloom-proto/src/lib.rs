//! Shared model for the KLOOM teletext radio server: show records, the
//! catalog index, configuration, platform paths, and the broadcast state
//! shared by every connected session.

pub mod catalog;
pub mod config;
pub mod platform;
pub mod show;
pub mod state;
