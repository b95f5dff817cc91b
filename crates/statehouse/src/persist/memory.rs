//! In-memory persistence adapter.
//!
//! Not durable - blobs are lost on process exit. Use for testing and
//! development. Clones share one backing map, so several stores (or a store
//! and a test) can observe the same persisted blobs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::Result;
use crate::persist::PersistenceAdapter;

/// In-memory implementation of [`PersistenceAdapter`].
#[derive(Clone, Default)]
pub struct MemoryAdapter {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryAdapter {
    /// Create a new empty adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted blobs.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop all persisted blobs.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn save(&self, key: &str, blob: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }
}
