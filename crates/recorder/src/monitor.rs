use crate::{MonitorConfig, StateChanges};

/// Monitors the state changes during a transaction execution.
///
/// A monitor is scoped to one execution: create a fresh one per transaction and hand it to the
/// engine explicitly. The engine writes through [`Monitor::state_changes_mut`] while executing;
/// consumers read through [`Monitor::state_changes`] afterwards.
#[derive(Debug, Default)]
pub struct Monitor {
    config: MonitorConfig,
    states: StateChanges,
}

impl Monitor {
    /// Creates a monitor with an empty store and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a monitor with an empty store configured by `config`.
    pub fn with_config(config: MonitorConfig) -> Self {
        Self { states: StateChanges::with_config(config.clone()), config }
    }

    /// The configuration the monitor was created with.
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Read access to the recorded history.
    pub fn state_changes(&self) -> &StateChanges {
        &self.states
    }

    /// Write access for the engine while it executes.
    pub fn state_changes_mut(&mut self) -> &mut StateChanges {
        &mut self.states
    }

    /// Hands the recorded history off, ending the monitoring scope.
    pub fn into_state_changes(self) -> StateChanges {
        self.states
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;
    use crate::State;

    #[test]
    fn test_fresh_monitor_is_empty() {
        let monitor = Monitor::new();
        assert!(monitor.state_changes().is_empty());
        assert_eq!(monitor.config(), &MonitorConfig::default());
    }

    #[test]
    fn test_monitors_do_not_share_state() {
        let mut first = Monitor::new();
        let second = Monitor::new();

        first
            .state_changes_mut()
            .record(Address::ZERO, "balance", Some(U256::from(1)), "", State::baseline(vec![0x01]))
            .unwrap();

        assert_eq!(first.state_changes().len(), 1);
        assert!(second.state_changes().is_empty());
    }

    #[test]
    fn test_config_reaches_store() {
        let config = MonitorConfig { track_conflicts: false, ..Default::default() };
        let mut monitor = Monitor::with_config(config);

        let states = monitor.state_changes_mut();
        states.record(Address::ZERO, "a", Some(U256::ZERO), "", State::default()).unwrap();
        states.record(Address::ZERO, "b", Some(U256::ZERO), "", State::default()).unwrap();

        let states = monitor.into_state_changes();
        assert_eq!(states.variable_of(Address::ZERO, U256::ZERO), Some("a"));
        assert!(states.conflicts().is_empty());
    }
}
