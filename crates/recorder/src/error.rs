use thiserror::Error;

/// Errors returned by [`crate::StateChanges::record`].
///
/// These point at a broken instrumentation call site rather than a runtime condition, so retrying
/// will not help.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum RecordError {
    /// The caller did not supply the storage slot backing the variable.
    #[error("slot cannot be nil")]
    MissingSlot,
}
