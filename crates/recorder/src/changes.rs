use alloy_primitives::{Address, U256};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::{MonitorConfig, RecordError, State};

/// Everything recorded for a single account.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct AccountChanges {
    /// Storage slot -> variable name. The first binding of a slot is kept forever.
    slots: FxHashMap<U256, String>,

    /// Variable name -> sub-index -> timeline of observed values.
    variables: FxHashMap<String, FxHashMap<String, Vec<State>>>,
}

/// A `record` call that tried to bind an already bound slot to another variable name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConflict {
    pub account: Address,
    pub slot: U256,
    /// The name the slot stays bound to.
    pub bound: String,
    /// The name that was rejected.
    pub rejected: String,
}

/// The state changes observed during one execution.
///
/// The mapping is `account -> variable -> index -> changes`, with a secondary
/// `account -> slot -> variable` index so that histories can be looked up by slot as well.
///
/// Within a timeline:
///  - two consecutive entries are never equal; repeated observations of the same value are
///    dropped.
///  - the first entry is the baseline and carries no triggering account.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StateChanges {
    accounts: FxHashMap<Address, AccountChanges>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conflicts: Vec<BindingConflict>,

    #[serde(skip)]
    config: MonitorConfig,
}

impl StateChanges {
    /// Creates an empty store with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that reports rebindings as `config` asks.
    pub fn with_config(config: MonitorConfig) -> Self {
        Self { config, ..Default::default() }
    }

    /// Saves a state change. If the timeline already ends with an equal state, nothing is saved.
    ///
    /// `slot` is bound to `variable` for `account` unless it is already bound, in which case the
    /// existing binding wins. The first state of a timeline is stored as a baseline, whatever
    /// account it was reported with.
    pub fn record(
        &mut self,
        account: Address,
        variable: &str,
        slot: Option<U256>,
        index: &str,
        state: State,
    ) -> Result<(), RecordError> {
        let Some(slot) = slot else {
            return Err(RecordError::MissingSlot);
        };

        let changes = self.accounts.entry(account).or_default();
        match changes.slots.get(&slot) {
            None => {
                changes.slots.insert(slot, variable.to_string());
            }
            Some(bound) if bound != variable => {
                if self.config.warn_on_rebind {
                    warn!(
                        account=?account, slot=?slot, bound=%bound, rejected=variable,
                        "slot is already bound to another variable, keeping the first binding"
                    );
                }
                if self.config.track_conflicts {
                    self.conflicts.push(BindingConflict {
                        account,
                        slot,
                        bound: bound.clone(),
                        rejected: variable.to_string(),
                    });
                }
            }
            Some(_) => {}
        }

        let timeline = changes
            .variables
            .entry(variable.to_string())
            .or_default()
            .entry(index.to_string())
            .or_default();

        // compare with the last state change, skip if equal
        if timeline.last() == Some(&state) {
            trace!(account=?account, variable=variable, index=index, "state unchanged");
            return Ok(());
        }

        let state = if timeline.is_empty() { state.into_baseline() } else { state };
        trace!(account=?account, variable=variable, index=index, state=%state, "state changed");
        timeline.push(state);

        Ok(())
    }

    /// Looks up state changes by variable name.
    pub fn variable(&self, account: Address, variable: &str, index: &str) -> Option<&[State]> {
        self.accounts.get(&account)?.variables.get(variable)?.get(index).map(Vec::as_slice)
    }

    /// Looks up state changes by storage slot.
    pub fn slot(&self, account: Address, slot: Option<U256>, index: &str) -> Option<&[State]> {
        let variable = self.variable_of(account, slot?)?;
        self.variable(account, variable, index)
    }

    /// Returns the variable name `slot` is bound to for `account`.
    pub fn variable_of(&self, account: Address, slot: U256) -> Option<&str> {
        self.accounts.get(&account)?.slots.get(&slot).map(String::as_str)
    }

    /// Returns the most recent state of a timeline.
    pub fn latest(&self, account: Address, variable: &str, index: &str) -> Option<&State> {
        self.variable(account, variable, index)?.last()
    }

    /// Accounts with at least one recorded change, in no particular order.
    pub fn accounts(&self) -> impl Iterator<Item = Address> + '_ {
        self.accounts.keys().copied()
    }

    /// Variable names recorded for `account`, in no particular order.
    pub fn variables(&self, account: Address) -> impl Iterator<Item = &str> + '_ {
        self.accounts
            .get(&account)
            .into_iter()
            .flat_map(|changes| changes.variables.keys().map(String::as_str))
    }

    /// Sub-indices recorded for `variable` of `account`, in no particular order.
    pub fn indices(&self, account: Address, variable: &str) -> impl Iterator<Item = &str> + '_ {
        self.accounts
            .get(&account)
            .and_then(|changes| changes.variables.get(variable))
            .into_iter()
            .flat_map(|indices| indices.keys().map(String::as_str))
    }

    /// Rejected rebindings, in the order they happened. Always empty when conflict tracking is
    /// disabled.
    pub fn conflicts(&self) -> &[BindingConflict] {
        &self.conflicts
    }

    /// Number of timelines.
    pub fn len(&self) -> usize {
        self.accounts
            .values()
            .flat_map(|changes| changes.variables.values())
            .map(|indices| indices.len())
            .sum()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
