//! Cadence Player
//!
//! Terminal front end for the playback engine: loads the configuration and
//! a song catalog, then drives `cadence-playback` from typed commands
//! against a simulated media element.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod session;

pub use error::{PlayerError, Result};
