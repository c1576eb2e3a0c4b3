//! # statemon-utils
//!
//! Logging and file helpers shared by the statemon crates.

#[macro_use]
extern crate tracing;

pub mod file;
pub mod logging;

pub use logging::{subscriber, try_subscriber};
