//! # statehouse
//!
//! Observable state container: a single application-state value, mutated
//! only through a pure reducer or a middleware-wrapped dispatch pipeline,
//! with synchronous subscriber notification, optional durable persistence,
//! a hard size ceiling on state, and an observational validation layer.
//!
//! - **Reducers** are pure `(state, action) -> state` functions;
//!   [`combine_reducers`] composes named slice reducers into one.
//! - **Middleware** stages wrap the dispatch entry point to log, transform,
//!   cancel, or defer actions ([`LoggingMiddleware`], [`ThunkMiddleware`]).
//! - **Persistence** is an abstract key-value blob backend behind
//!   [`PersistenceAdapter`]: [`FileAdapter`] (durable) and [`MemoryAdapter`]
//!   (testing and development).
//! - **Validators** observe every transition and report per-key failures;
//!   they never veto a mutation.
//!
//! The store is a single-threaded, cooperatively scheduled handle: clones
//! share one instance, and exclusive per-thread access is enforced by the
//! type system (`Store` is not `Send`).
//!
//! ## Quick start
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use statehouse::{Action, Store};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Counter {
//!     value: i64,
//! }
//!
//! #[derive(Debug)]
//! enum CounterEvent {
//!     Add(i64),
//! }
//!
//! fn main() -> statehouse::Result<()> {
//!     let store = Store::new(
//!         Counter::default(),
//!         |state: &Counter, event: &CounterEvent| match event {
//!             CounterEvent::Add(n) => Counter {
//!                 value: state.value + n,
//!             },
//!         },
//!     )?;
//!
//!     store.dispatch(Action::plain(CounterEvent::Add(2)))?;
//!     assert_eq!(store.get_state()?.value, 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Durable state
//!
//! ```rust,no_run
//! use std::rc::Rc;
//! use serde::{Deserialize, Serialize};
//! use statehouse::{FileAdapter, Store};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! struct Session {
//!     user: Option<String>,
//! }
//!
//! #[derive(Debug)]
//! enum SessionEvent {
//!     SignOut,
//! }
//!
//! fn main() -> statehouse::Result<()> {
//!     let store = Store::builder(
//!         Session::default(),
//!         |_state: &Session, event: &SessionEvent| match event {
//!             SessionEvent::SignOut => Session::default(),
//!         },
//!     )
//!     .store_key("session")
//!     .persist_with(Rc::new(FileAdapter::new(".statehouse")))
//!     .build()?;
//!
//!     // Written through to disk; a later process under the same key
//!     // reads it back on `get_state`.
//!     store.set_state(serde_json::json!({"user": "sam"}))?;
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod config;
pub mod error;
pub mod middleware;
pub mod persist;
pub mod reducer;
pub mod store;
pub mod validate;

pub use action::{Action, DispatchFn, StateFn, ThunkFn};
pub use config::{StoreConfig, DEFAULT_MEMORY_LIMIT};
pub use error::{Result, StoreError};
pub use middleware::{apply_middleware, compose, LoggingMiddleware, Middleware, ThunkMiddleware};
pub use persist::{FileAdapter, MemoryAdapter, PersistenceAdapter};
pub use reducer::{combine_reducers, Reducer, SliceReducer};
pub use store::{ListenerId, Store, StoreBuilder, WeakStore};
pub use validate::{apply_validators, ValidatorFn, ValidatorHandle};
