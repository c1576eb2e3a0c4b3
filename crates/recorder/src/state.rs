use std::fmt::Display;

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// A single observed value of a piece of persistent state.
///
/// Two states are equal when both the triggering account and the raw bytes match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    /// The account that triggered the state change. [`Address::ZERO`] marks a baseline value that
    /// is not attributed to anyone.
    account: Address,
    /// Raw data of the updated state.
    value: Bytes,
}

impl State {
    /// A value observed after `account` triggered a change.
    pub fn new(account: Address, value: impl Into<Bytes>) -> Self {
        Self { account, value: value.into() }
    }

    /// A value not attributed to any account.
    pub fn baseline(value: impl Into<Bytes>) -> Self {
        Self::new(Address::ZERO, value)
    }

    /// The triggering account, [`Address::ZERO`] for baselines.
    pub fn account(&self) -> Address {
        self.account
    }

    /// The raw observed bytes.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Whether this is a baseline (pre-execution) value.
    pub fn is_baseline(&self) -> bool {
        self.account.is_zero()
    }

    /// Detaches the state from its triggering account.
    pub(crate) fn into_baseline(self) -> Self {
        Self { account: Address::ZERO, ..self }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_baseline() {
            write!(f, "{} (baseline)", hex::encode_prefixed(&self.value))
        } else {
            write!(f, "{} by {}", hex::encode_prefixed(&self.value), self.account)
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = address!("00000000000000000000000000000000000000aa");
        let b = address!("00000000000000000000000000000000000000bb");

        assert_eq!(State::new(a, vec![0x64]), State::new(a, vec![0x64]));
        assert_ne!(State::new(a, vec![0x64]), State::new(b, vec![0x64]));
        assert_ne!(State::new(a, vec![0x64]), State::new(a, vec![0x00, 0x64]));
    }

    #[test]
    fn test_into_baseline() {
        let a = address!("00000000000000000000000000000000000000aa");
        let state = State::new(a, vec![0x01]).into_baseline();

        assert!(state.is_baseline());
        assert_eq!(state, State::baseline(vec![0x01]));
    }

    #[test]
    fn test_display() {
        assert_eq!(State::baseline(vec![0x00, 0x64]).to_string(), "0x0064 (baseline)");
    }
}
