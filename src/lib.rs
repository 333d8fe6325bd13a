//! Two small arcade games driven by body pose: a three-lane fruit catcher
//! and a vertical shooter with weapon pickups.
//!
//! The simulations (`compute`, `catcher`) are pure functions over plain
//! state values.  `session` wraps them with sound and observer callbacks,
//! `frame` describes what to draw and `display` draws it in a terminal.

pub mod catcher;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod frame;
pub mod input;
#[cfg(feature = "audio")]
pub mod playback;
pub mod scoring;
pub mod session;
pub mod sound;
pub mod weapons;
