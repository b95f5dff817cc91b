//! Per-store configuration.
//!
//! The size ceiling is injected configuration, not a shared static, so each
//! store can carry its own limit and tests can shrink it deterministically.

use std::sync::atomic::{AtomicU64, Ordering};

/// Default ceiling on the serialized length of state, in characters.
pub const DEFAULT_MEMORY_LIMIT: usize = 5_000_000;

static STORE_KEY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Produce a fresh `store-N` key, unique within the process.
pub(crate) fn generated_store_key() -> String {
    format!("store-{}", STORE_KEY_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Configuration fixed at store construction.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Maximum serialized length, in characters, of the full state at
    /// construction and of the argument passed to a partial update.
    pub memory_limit: usize,
    /// Key the whole-state blob is persisted under.
    pub store_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            store_key: generated_store_key(),
        }
    }
}
