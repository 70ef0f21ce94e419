//! Session Errors

use thiserror::Error;

use crate::session::snapshot::SnapshotError;

/// Errors surfaced by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The caller passed a value outside the operation's contract. State is unchanged.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A persisted snapshot could not be restored (strict mode only).
    #[error("corrupt snapshot under key {key:?}: {source}")]
    CorruptState {
        /// Storage key of the snapshot
        key: String,

        /// Decoding failure
        #[source]
        source: SnapshotError,
    },
}
