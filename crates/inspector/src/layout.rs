use std::path::Path;

use alloy_primitives::{Address, U256};
use eyre::Result;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// The logical name of a storage slot: the variable it backs and the element of that variable
/// (empty for scalars).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotName {
    pub variable: String,
    #[serde(default)]
    pub index: String,
}

impl SlotName {
    /// Names element `index` of `variable`.
    pub fn new(variable: impl Into<String>, index: impl Into<String>) -> Self {
        Self { variable: variable.into(), index: index.into() }
    }

    /// Names a scalar variable (empty sub-index).
    pub fn scalar(variable: impl Into<String>) -> Self {
        Self::new(variable, String::new())
    }
}

/// Maps physical storage slots to logical names.
///
/// Deciding what a slot means is up to the layout; the monitor treats the names as opaque keys.
pub trait StorageLayout {
    fn resolve(&self, account: Address, slot: U256) -> SlotName;
}

impl<T: StorageLayout + ?Sized> StorageLayout for &T {
    fn resolve(&self, account: Address, slot: U256) -> SlotName {
        (**self).resolve(account, slot)
    }
}

/// Names every slot after its own hex value, e.g. slot 7 becomes `0x7`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawSlotLayout;

impl StorageLayout for RawSlotLayout {
    fn resolve(&self, _account: Address, slot: U256) -> SlotName {
        SlotName::scalar(format!("{slot:#x}"))
    }
}

#[derive(Debug, Deserialize)]
struct LayoutEntry {
    account: Address,
    slot: U256,
    variable: String,
    #[serde(default)]
    index: String,
}

/// An explicit `(account, slot) -> name` table. Slots missing from the table fall back to
/// [`RawSlotLayout`] naming.
#[derive(Clone, Debug, Default)]
pub struct NamedLayout {
    slots: FxHashMap<(Address, U256), SlotName>,
}

impl NamedLayout {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names `slot` of `account`. A slot that is already named keeps its first name.
    pub fn insert(&mut self, account: Address, slot: U256, name: SlotName) -> bool {
        if let Some(existing) = self.slots.get(&(account, slot)) {
            warn!(account=?account, slot=?slot, existing=?existing, ignored=?name, "slot named twice in layout");
            return false;
        }
        self.slots.insert((account, slot), name);
        true
    }

    /// Builder-style [`NamedLayout::insert`].
    pub fn with(mut self, account: Address, slot: U256, name: SlotName) -> Self {
        self.insert(account, slot, name);
        self
    }

    /// Loads a layout from a JSON file holding a list of entries:
    ///
    /// ```json
    /// [{ "account": "0x5fbd...0aa3", "slot": "0x1", "variable": "balance", "index": "" }]
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let entries: Vec<LayoutEntry> = statemon_utils::file::load_json(path)?;
        debug!("loaded {} layout entries", entries.len());

        let mut layout = Self::new();
        for LayoutEntry { account, slot, variable, index } in entries {
            layout.insert(account, slot, SlotName::new(variable, index));
        }
        Ok(layout)
    }

    /// The explicit name of `slot`, without fallback.
    pub fn get(&self, account: Address, slot: U256) -> Option<&SlotName> {
        self.slots.get(&(account, slot))
    }

    /// Number of named slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot is named.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl StorageLayout for NamedLayout {
    fn resolve(&self, account: Address, slot: U256) -> SlotName {
        match self.get(account, slot) {
            Some(name) => name.clone(),
            None => RawSlotLayout.resolve(account, slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    const TOKEN: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

    #[test]
    fn test_raw_names() {
        assert_eq!(RawSlotLayout.resolve(TOKEN, U256::from(7)), SlotName::scalar("0x7"));
        assert_eq!(RawSlotLayout.resolve(TOKEN, U256::ZERO), SlotName::scalar("0x0"));
    }

    #[test]
    fn test_named_with_fallback() {
        let layout = NamedLayout::new()
            .with(TOKEN, U256::from(1), SlotName::scalar("totalSupply"))
            .with(TOKEN, U256::from(5), SlotName::new("holders", "0"));

        assert_eq!(layout.resolve(TOKEN, U256::from(1)), SlotName::scalar("totalSupply"));
        assert_eq!(layout.resolve(TOKEN, U256::from(5)), SlotName::new("holders", "0"));
        assert_eq!(layout.resolve(TOKEN, U256::from(2)), SlotName::scalar("0x2"));
        assert_eq!(layout.resolve(Address::ZERO, U256::from(1)), SlotName::scalar("0x1"));
    }

    #[test]
    fn test_first_name_wins() {
        let mut layout = NamedLayout::new();
        assert!(layout.insert(TOKEN, U256::from(1), SlotName::scalar("owner")));
        assert!(!layout.insert(TOKEN, U256::from(1), SlotName::scalar("admin")));

        assert_eq!(layout.len(), 1);
        assert_eq!(layout.get(TOKEN, U256::from(1)), Some(&SlotName::scalar("owner")));
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(
            &path,
            r#"[
                { "account": "0x5fbdb2315678afecb367f032d93f642f64180aa3", "slot": "0x0", "variable": "owner" },
                { "account": "0x5fbdb2315678afecb367f032d93f642f64180aa3", "slot": "0x3", "variable": "items", "index": "2" }
            ]"#,
        )
        .unwrap();

        let layout = NamedLayout::load(&path).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.resolve(TOKEN, U256::ZERO), SlotName::scalar("owner"));
        assert_eq!(layout.resolve(TOKEN, U256::from(3)), SlotName::new("items", "2"));
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        std::fs::write(&path, r#"[{ "account": "0x01", "slot": "0x0" }]"#).unwrap();

        assert!(NamedLayout::load(&path).is_err());
    }
}
