//! # statemon-recorder
//!
//! Records, for every account touched during one execution, the values each piece of persistent
//! state took on. Histories can be looked up by the variable name the caller assigned or by the raw
//! storage slot backing it.

#[macro_use]
extern crate tracing;

mod changes;
mod config;
mod error;
mod monitor;
mod state;

pub use changes::{BindingConflict, StateChanges};
pub use config::MonitorConfig;
pub use error::RecordError;
pub use monitor::Monitor;
pub use state::State;
