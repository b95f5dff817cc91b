//! Error types for store operations.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by the store, its pipeline, and its persistence backends.
///
/// All failures are synchronous and raised to the immediate caller; the
/// store performs no retry and no silent recovery.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Serialized state (or a partial update) reached the memory limit.
    #[error("state exceeds the memory limit of {limit} characters ({actual} given)")]
    StateTooLarge { limit: usize, actual: usize },

    /// A persisted blob exists under the store key but cannot be decoded.
    #[error("failed to decode persisted state under key {key:?}: {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Structurally invalid setup: empty middleware composition, non-object
    /// merge operands, a deferred action with no thunk stage installed.
    #[error("invalid store configuration: {0}")]
    Configuration(String),

    /// State or a patch failed to (de)serialize outside the persisted-blob path.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The persistence backend failed at the I/O layer.
    #[error("persistence backend error: {0}")]
    Persistence(#[from] std::io::Error),

    /// A subscribed listener reported a failure.
    #[error("listener failed: {0}")]
    Listener(String),
}
