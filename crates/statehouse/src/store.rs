//! Redux-style store: a single observable state value mutated through a
//! reducer or a middleware-wrapped dispatch pipeline.
//!
//! The store follows the classic pattern:
//! - Centralized state, replaced (never patched in place) on each action
//! - Pure reducers handle transitions
//! - Listeners are notified synchronously, in subscription order, after
//!   every successful mutation
//! - Optional write-through/read-through persistence of the whole state
//!
//! `Store` is a cheap cloneable handle over shared single-threaded
//! ownership, so listeners, middleware stages, and validators can call back
//! into the store that invoked them. Re-entrant dispatch from inside a
//! listener is processed to completion, nested last-in-first-out.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::action::{Action, DispatchFn};
use crate::config::{self, StoreConfig, DEFAULT_MEMORY_LIMIT};
use crate::error::{Result, StoreError};
use crate::persist::PersistenceAdapter;
use crate::reducer::Reducer;

/// Identity token for a subscription entry. Listeners are removed by token,
/// in place of the closure identity dynamic languages lean on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerFn = Rc<dyn Fn() -> Result<()>>;

struct ListenerEntry {
    id: ListenerId,
    notify: ListenerFn,
}

struct StoreInner<S, A> {
    state: S,
    listeners: Vec<ListenerEntry>,
    next_listener_id: u64,
    reducer: Reducer<S, A>,
    /// Installed middleware pipeline; `None` means raw reducer-dispatch.
    pipeline: Option<DispatchFn<S, A>>,
    adapter: Option<Rc<dyn PersistenceAdapter>>,
    config: StoreConfig,
}

/// Serialized length in characters, the unit the memory limit is counted in.
fn serialized_len<T: Serialize>(value: &T) -> Result<usize> {
    Ok(serde_json::to_string(value)?.chars().count())
}

/// Handle to a store instance. Clones share the same underlying state.
pub struct Store<S, A> {
    inner: Rc<RefCell<StoreInner<S, A>>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, A> std::fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Store(..)")
    }
}

/// Non-owning store handle. Installed pipeline stages and teardown handles
/// hold one of these so they never keep the store alive cyclically.
pub struct WeakStore<S, A> {
    inner: Weak<RefCell<StoreInner<S, A>>>,
}

impl<S, A> Clone for WeakStore<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, A> WeakStore<S, A> {
    /// Recover a full handle, if the store is still alive.
    pub fn upgrade(&self) -> Option<Store<S, A>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

/// Configures and validates a [`Store`].
pub struct StoreBuilder<S, A> {
    initial_state: S,
    reducer: Reducer<S, A>,
    store_key: Option<String>,
    memory_limit: usize,
    adapter: Option<Rc<dyn PersistenceAdapter>>,
}

impl<S: 'static, A: 'static> StoreBuilder<S, A> {
    pub fn new(initial_state: S, reducer: impl Fn(&S, &A) -> S + 'static) -> Self {
        Self {
            initial_state,
            reducer: Rc::new(reducer),
            store_key: None,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            adapter: None,
        }
    }

    /// Key the whole-state blob is persisted under. Defaults to a generated
    /// `store-N` value.
    pub fn store_key(mut self, key: impl Into<String>) -> Self {
        self.store_key = Some(key.into());
        self
    }

    /// Per-instance ceiling on serialized state size, in characters.
    pub fn memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }

    /// Enable persistence through the given adapter.
    pub fn persist_with(mut self, adapter: Rc<dyn PersistenceAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Validate the initial state's serialized size and build the store.
    pub fn build(self) -> Result<Store<S, A>>
    where
        S: Serialize,
    {
        let actual = serialized_len(&self.initial_state)?;
        if actual >= self.memory_limit {
            return Err(StoreError::StateTooLarge {
                limit: self.memory_limit,
                actual,
            });
        }

        let config = StoreConfig {
            memory_limit: self.memory_limit,
            store_key: self.store_key.unwrap_or_else(config::generated_store_key),
        };

        Ok(Store {
            inner: Rc::new(RefCell::new(StoreInner {
                state: self.initial_state,
                listeners: Vec::new(),
                next_listener_id: 0,
                reducer: self.reducer,
                pipeline: None,
                adapter: self.adapter,
                config,
            })),
        })
    }
}

impl<S: 'static, A: 'static> Store<S, A> {
    /// Create a store with an explicit initial state and no persistence.
    pub fn new(initial_state: S, reducer: impl Fn(&S, &A) -> S + 'static) -> Result<Self>
    where
        S: Serialize,
    {
        StoreBuilder::new(initial_state, reducer).build()
    }

    /// Shorthand: reducer only, empty initial state.
    pub fn with_default_state(reducer: impl Fn(&S, &A) -> S + 'static) -> Result<Self>
    where
        S: Serialize + Default,
    {
        StoreBuilder::new(S::default(), reducer).build()
    }

    /// Full construction surface: key, size limit, persistence.
    pub fn builder(initial_state: S, reducer: impl Fn(&S, &A) -> S + 'static) -> StoreBuilder<S, A> {
        StoreBuilder::new(initial_state, reducer)
    }

    /// Downgrade to a non-owning handle.
    pub fn downgrade(&self) -> WeakStore<S, A> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current state.
    ///
    /// When persistence is enabled the adapter is the source of truth: a
    /// stored blob is decoded and replaces the in-memory copy before this
    /// returns (read-through refresh). A present-but-malformed blob fails
    /// with [`StoreError::Deserialization`].
    pub fn get_state(&self) -> Result<S>
    where
        S: DeserializeOwned + Clone,
    {
        let (adapter, key) = {
            let inner = self.inner.borrow();
            (inner.adapter.clone(), inner.config.store_key.clone())
        };

        if let Some(adapter) = adapter {
            if let Some(blob) = adapter.load(&key)? {
                let refreshed: S = serde_json::from_str(&blob)
                    .map_err(|source| StoreError::Deserialization { key, source })?;
                self.inner.borrow_mut().state = refreshed;
            }
        }

        Ok(self.inner.borrow().state.clone())
    }

    /// Shallow-merge a partial update into the state.
    ///
    /// Fields present in `patch` override same-named fields of the current
    /// state; all other fields are retained. Both the state and the patch
    /// must serialize to JSON objects. The size guard measures the
    /// serialized patch alone, never the merged result; a rejected update
    /// leaves state and persisted storage untouched.
    pub fn set_state<P: Serialize>(&self, patch: P) -> Result<()>
    where
        S: Serialize + DeserializeOwned,
    {
        let patch = serde_json::to_value(patch)?;

        let limit = self.inner.borrow().config.memory_limit;
        let actual = serialized_len(&patch)?;
        if actual >= limit {
            return Err(StoreError::StateTooLarge { limit, actual });
        }

        let Value::Object(patch_fields) = patch else {
            return Err(StoreError::Configuration(
                "set_state patch must serialize to a JSON object".to_string(),
            ));
        };

        let merged: S = {
            let inner = self.inner.borrow();
            let mut doc = serde_json::to_value(&inner.state)?;
            let Value::Object(fields) = &mut doc else {
                return Err(StoreError::Configuration(
                    "set_state requires an object-shaped state".to_string(),
                ));
            };
            for (key, value) in patch_fields {
                fields.insert(key, value);
            }
            serde_json::from_value(doc)?
        };

        self.commit(merged)
    }

    /// Replace the entire state, bypassing the reducer.
    ///
    /// Unlike `set_state` this validates the full serialized state against
    /// the memory limit, the same check construction applies.
    pub fn replace_state(&self, state: S) -> Result<()>
    where
        S: Serialize,
    {
        let limit = self.inner.borrow().config.memory_limit;
        let actual = serialized_len(&state)?;
        if actual >= limit {
            return Err(StoreError::StateTooLarge { limit, actual });
        }
        self.commit(state)
    }

    /// Commit an already-computed next state: swap it in, write through the
    /// adapter if enabled, then notify listeners in subscription order.
    fn commit(&self, next: S) -> Result<()>
    where
        S: Serialize,
    {
        self.inner.borrow_mut().state = next;
        self.persist_store()?;
        self.notify()
    }

    fn persist_store(&self) -> Result<()>
    where
        S: Serialize,
    {
        let inner = self.inner.borrow();
        if let Some(adapter) = &inner.adapter {
            let blob = serde_json::to_string(&inner.state)?;
            adapter.save(&inner.config.store_key, &blob)?;
            log::debug!("persisted state under {:?}", inner.config.store_key);
        }
        Ok(())
    }

    /// Notify every listener, in subscription order, against a snapshot of
    /// the listener sequence. A listener error propagates immediately and
    /// later listeners in the round are not notified.
    fn notify(&self) -> Result<()> {
        let snapshot: Vec<ListenerFn> = {
            let inner = self.inner.borrow();
            inner
                .listeners
                .iter()
                .map(|entry| Rc::clone(&entry.notify))
                .collect()
        };
        for notify in snapshot {
            notify()?;
        }
        Ok(())
    }

    /// Dispatch an action through the currently installed entry point: the
    /// middleware pipeline when one is installed, the raw reducer-dispatch
    /// otherwise.
    pub fn dispatch(&self, action: Action<S, A>) -> Result<()> {
        let installed = self.inner.borrow().pipeline.clone();
        match installed {
            Some(pipeline) => pipeline(action),
            None => self.dispatch_raw(action),
        }
    }

    /// Terminal dispatch: apply the reducer and notify listeners.
    ///
    /// Raw dispatch bypasses persistence and the size guard; only
    /// `set_state`/`replace_state` enforce them.
    pub(crate) fn dispatch_raw(&self, action: Action<S, A>) -> Result<()> {
        match action {
            Action::Plain(action) => {
                let next = {
                    let inner = self.inner.borrow();
                    (inner.reducer)(&inner.state, &action)
                };
                self.inner.borrow_mut().state = next;
                self.notify()
            }
            Action::Deferred(_) => Err(StoreError::Configuration(
                "deferred action reached the terminal dispatch; install a thunk stage first"
                    .to_string(),
            )),
        }
    }

    /// The raw reducer-dispatch as a standalone entry point, handed to the
    /// middleware pipeline as its innermost stage.
    pub(crate) fn raw_dispatch_fn(&self) -> DispatchFn<S, A> {
        let weak = self.downgrade();
        Rc::new(move |action| match weak.upgrade() {
            Some(store) => store.dispatch_raw(action),
            None => Err(StoreError::Configuration(
                "store was dropped while its dispatch pipeline was still held".to_string(),
            )),
        })
    }

    /// The currently installed dispatch entry point.
    pub(crate) fn current_dispatch_fn(&self) -> DispatchFn<S, A> {
        let installed = self.inner.borrow().pipeline.clone();
        installed.unwrap_or_else(|| self.raw_dispatch_fn())
    }

    /// Install a composed pipeline as the dispatch entry point.
    pub(crate) fn install_pipeline(&self, dispatch: DispatchFn<S, A>) {
        self.inner.borrow_mut().pipeline = Some(dispatch);
    }

    /// Register a listener, invoked with no arguments after every successful
    /// mutation. Listeners observe the new state by calling `get_state`.
    pub fn subscribe(&self, listener: impl Fn() -> Result<()> + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener_id);
        inner.next_listener_id += 1;
        inner.listeners.push(ListenerEntry {
            id,
            notify: Rc::new(listener),
        });
        id
    }

    /// Remove a listener by identity. A no-op if it is not present.
    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner.borrow_mut().listeners.retain(|entry| entry.id != id);
    }

    /// Ordered snapshot of the current subscription identities.
    pub fn listeners(&self) -> Vec<ListenerId> {
        self.inner
            .borrow()
            .listeners
            .iter()
            .map(|entry| entry.id)
            .collect()
    }

    /// Return the store to an empty, listener-free baseline. Persisted
    /// storage is left as-is.
    pub fn reset(&self)
    where
        S: Default,
    {
        let mut inner = self.inner.borrow_mut();
        inner.state = S::default();
        inner.listeners.clear();
        log::debug!("store {:?} reset to baseline", inner.config.store_key);
    }

    /// Key the whole-state blob is persisted under.
    pub fn store_key(&self) -> String {
        self.inner.borrow().config.store_key.clone()
    }

    /// Per-instance serialized-size ceiling, in characters.
    pub fn memory_limit(&self) -> usize {
        self.inner.borrow().config.memory_limit
    }

    /// Whether a persistence adapter is configured.
    pub fn is_persistent(&self) -> bool {
        self.inner.borrow().adapter.is_some()
    }
}
