use alloy_primitives::{Address, Bytes, U256};
use revm::{
    interpreter::{
        opcode::{SLOAD, SSTORE},
        InstructionResult, Interpreter, OpCode,
    },
    Database, EvmContext, Inspector,
};
use statemon_recorder::{Monitor, State};

use crate::{SlotName, StorageLayout};

/// A storage access seen in `step` and committed in `step_end`, once we know the instruction
/// did not halt.
#[derive(Debug)]
struct PendingAccess {
    /// The account whose storage is accessed.
    storage: Address,
    /// The account that triggered the access.
    caller: Address,
    slot: U256,
    /// The value an `SSTORE` writes. `None` for `SLOAD`, whose value is only on the stack after
    /// the instruction ran.
    written: Option<U256>,
}

/// Records every storage write (and, if the monitor is configured to, every storage read) into
/// the monitor's [`statemon_recorder::StateChanges`].
///
/// Values are recorded as 32-byte big-endian words and attributed to the caller of the frame
/// performing the access.
#[derive(Debug)]
pub struct StateChangeInspector<'a, L> {
    monitor: &'a mut Monitor,
    layout: L,
    pending: Option<PendingAccess>,
}

impl<'a, L> StateChangeInspector<'a, L>
where
    L: StorageLayout,
{
    /// Creates an inspector recording into `monitor` and naming slots through `layout`.
    pub fn new(monitor: &'a mut Monitor, layout: L) -> Self {
        Self { monitor, layout, pending: None }
    }

    /// The layout used to name slots.
    pub fn layout(&self) -> &L {
        &self.layout
    }

    /// Records `value` for the accessed slot.
    ///
    /// `original` is the slot's value at the start of the transaction. It becomes the baseline
    /// when the slot has no history yet, so that a first write is kept as a change attributed to
    /// its caller. The store compares whole states, so an unchanged value seen by another caller
    /// is filtered here.
    fn observe(&mut self, access: PendingAccess, value: U256, original: Option<U256>) {
        let PendingAccess { storage, caller, slot, .. } = access;
        let SlotName { variable, index } = self.layout.resolve(storage, slot);
        trace!(storage=?storage, caller=?caller, slot=?slot, variable=%variable, index=%index, value=?value, "storage access");

        if let Some(original) = original {
            if self.monitor.state_changes().variable(storage, &variable, &index).is_none() {
                self.record(storage, slot, &variable, &index, State::baseline(word(original)));
            }
        }

        let value = word(value);
        let states = self.monitor.state_changes();
        if states.latest(storage, &variable, &index).is_some_and(|state| *state.value() == value) {
            trace!(storage=?storage, slot=?slot, "storage value unchanged");
            return;
        }

        self.record(storage, slot, &variable, &index, State::new(caller, value));
    }

    fn record(&mut self, storage: Address, slot: U256, variable: &str, index: &str, state: State) {
        if let Err(err) =
            self.monitor.state_changes_mut().record(storage, variable, Some(slot), index, state)
        {
            debug!(storage=?storage, slot=?slot, "failed to record storage access: {err}");
        }
    }
}

/// A storage word as 32 big-endian bytes.
fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

impl<'a, L, DB> Inspector<DB> for StateChangeInspector<'a, L>
where
    L: StorageLayout,
    DB: Database,
{
    fn step(&mut self, interp: &mut Interpreter, _context: &mut EvmContext<DB>) {
        let op = interp.current_opcode();
        let tracked = op == SSTORE || (op == SLOAD && self.monitor.config().record_reads);
        if !tracked {
            return;
        }

        let Ok(slot) = interp.stack().peek(0) else {
            debug!(op=?OpCode::new(op), "storage access without a key on the stack");
            return;
        };

        let written = if op == SSTORE {
            let Ok(value) = interp.stack().peek(1) else {
                debug!(slot=?slot, "SSTORE without a value on the stack");
                return;
            };
            Some(value)
        } else {
            None
        };

        self.pending = Some(PendingAccess {
            storage: interp.contract.target_address,
            caller: interp.contract.caller,
            slot,
            written,
        });
    }

    fn step_end(&mut self, interp: &mut Interpreter, context: &mut EvmContext<DB>) {
        let Some(access) = self.pending.take() else {
            return;
        };

        if interp.instruction_result != InstructionResult::Continue {
            debug!(slot=?access.slot, result=?interp.instruction_result, "storage access halted");
            return;
        }

        let (value, original) = match access.written {
            // the executed SSTORE has loaded the slot into the journal
            Some(value) => {
                let original = context
                    .journaled_state
                    .state
                    .get(&access.storage)
                    .and_then(|account| account.storage.get(&access.slot))
                    .map(|slot| slot.original_value());
                (value, original)
            }
            None => match interp.stack().peek(0) {
                Ok(value) => (value, None),
                Err(_) => {
                    debug!(slot=?access.slot, "SLOAD left no value on the stack");
                    return;
                }
            },
        };

        self.observe(access, value, original);
    }
}
