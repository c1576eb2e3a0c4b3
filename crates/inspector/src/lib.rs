//! # statemon-inspector
//!
//! Connects a [`statemon_recorder::Monitor`] to revm. The [`StateChangeInspector`] watches every
//! `SSTORE` (and optionally `SLOAD`) the interpreter executes and records the observed value under
//! the name a [`StorageLayout`] gives the slot.

#[macro_use]
extern crate tracing;

mod evm;
mod inspector;
mod layout;

pub use evm::new_monitored_evm;
pub use inspector::StateChangeInspector;
pub use layout::{NamedLayout, RawSlotLayout, SlotName, StorageLayout};
