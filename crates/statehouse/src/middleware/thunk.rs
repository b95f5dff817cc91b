//! ThunkMiddleware - runs deferred actions instead of forwarding them.
//!
//! A deferred action is a one-shot computation dispatched in place of plain
//! data. This stage hands it the next dispatch stage and a state accessor,
//! which lets a single "action" perform multiple dispatches, conditional
//! dispatches, or none at all, deferring further propagation entirely to
//! the computation's own logic. Plain actions pass through unchanged.

use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::action::{Action, DispatchFn, StateFn};
use crate::error::StoreError;
use crate::middleware::Middleware;
use crate::store::{Store, WeakStore};

/// Dispatch stage that executes [`Action::Deferred`] payloads.
pub struct ThunkMiddleware<S, A> {
    store: WeakStore<S, A>,
}

impl<S: 'static, A: 'static> ThunkMiddleware<S, A> {
    /// The state accessor handed to deferred actions reads through the given
    /// store's `get_state`. Only a weak handle is kept, so installing this
    /// stage never keeps the store alive.
    pub fn new(store: &Store<S, A>) -> Self {
        Self {
            store: store.downgrade(),
        }
    }
}

impl<S, A> Middleware<S, A> for ThunkMiddleware<S, A>
where
    S: DeserializeOwned + Clone + 'static,
    A: 'static,
{
    fn wrap(&self, next: DispatchFn<S, A>) -> DispatchFn<S, A> {
        let weak = self.store.clone();
        Rc::new(move |action| match action {
            Action::Deferred(thunk) => {
                let Some(store) = weak.upgrade() else {
                    return Err(StoreError::Configuration(
                        "store was dropped before a deferred action could run".to_string(),
                    ));
                };
                let read_state: StateFn<S> = Rc::new(move || store.get_state());
                thunk(Rc::clone(&next), read_state)
            }
            plain => next(plain),
        })
    }
}
