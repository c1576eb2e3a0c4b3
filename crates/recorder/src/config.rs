use std::path::Path;

use eyre::Result;
use serde::{Deserialize, Serialize};

/// Tunables for a [`crate::Monitor`] and the store it owns.
///
/// ```toml
/// warn_on_rebind = true
/// track_conflicts = true
/// record_reads = false
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Emit a warning when a slot that is already bound is recorded under a different name.
    pub warn_on_rebind: bool,

    /// Keep a [`crate::BindingConflict`] for every rejected rebinding.
    pub track_conflicts: bool,

    /// Record storage reads as observations, not only writes. The engine adapter consults this;
    /// the store itself records whatever it is given.
    pub record_reads: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self { warn_on_rebind: true, track_conflicts: true, record_reads: true }
    }
}

impl MonitorConfig {
    /// Loads the configuration from a TOML file. Missing keys take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        statemon_utils::file::load_toml(path)
    }
}
