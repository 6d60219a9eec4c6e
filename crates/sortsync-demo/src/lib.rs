#![forbid(unsafe_code)]

//! Headless host for the sortsync engine.
//!
//! Plays the part of the browser side: it builds lists, delivers drop
//! notifications the way a drag library would, and prints what a user would
//! see. Three entry points:
//!
//! - [`trello`]: a Next/Doing/Done board with drop announcements.
//! - [`scenario`]: replays a JSON file of lists and steps.
//! - [`groups`]: shows which lists accept items from which.

pub mod cli;
pub mod error;
pub mod groups;
pub mod logging;
pub mod scenario;
pub mod trello;

pub use cli::run_from_env;
pub use error::{DemoError, Result};
