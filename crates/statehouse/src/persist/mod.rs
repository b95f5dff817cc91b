//! Durable persistence boundary.
//!
//! The store reads through and writes through an abstract key-value backend
//! holding one serialized whole-state blob per store key. Adapters move
//! opaque JSON text; the store owns (de)serialization. Backends:
//!
//! - [`MemoryAdapter`]: in-process map, for testing and development
//! - [`FileAdapter`]: one blob file per key, durable across restarts

mod file;
mod memory;

pub use file::FileAdapter;
pub use memory::MemoryAdapter;

use crate::error::Result;

/// Abstract durable key-value storage for serialized state blobs.
///
/// Failures are fatal to the store call that triggered them: a failed write
/// propagates to the caller with the in-memory state already mutated.
pub trait PersistenceAdapter {
    /// Store the serialized state blob under `key`, replacing any previous blob.
    fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Fetch the blob stored under `key`, or `None` when the key is absent.
    fn load(&self, key: &str) -> Result<Option<String>>;
}
