//! Actions and the dispatch function type they flow through.
//!
//! An action is either a plain data record handed to the reducer, or a
//! deferred computation that drives the dispatch pipeline itself. The tag is
//! explicit so dispatch stages pattern-match instead of inspecting runtime
//! types.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;

/// A dispatch entry point: the store's own, or one stage of the pipeline.
pub type DispatchFn<S, A> = Rc<dyn Fn(Action<S, A>) -> Result<()>>;

/// Read access to the store's current state, as handed to deferred actions.
/// Reads go through `Store::get_state`, so persistence read-through applies.
pub type StateFn<S> = Rc<dyn Fn() -> Result<S>>;

/// The payload of a deferred action: a one-shot computation that receives
/// the next dispatch stage and a state accessor, and forwards (or doesn't)
/// entirely on its own terms.
pub type ThunkFn<S, A> = Box<dyn FnOnce(DispatchFn<S, A>, StateFn<S>) -> Result<()>>;

/// A value describing an intended state transition.
pub enum Action<S, A> {
    /// Plain data, destined for the reducer.
    Plain(A),
    /// A deferred computation; only a thunk stage in the pipeline can run it.
    Deferred(ThunkFn<S, A>),
}

impl<S, A> Action<S, A> {
    /// Wrap a plain data action.
    pub fn plain(action: A) -> Self {
        Action::Plain(action)
    }

    /// Wrap a deferred computation.
    pub fn deferred(
        thunk: impl FnOnce(DispatchFn<S, A>, StateFn<S>) -> Result<()> + 'static,
    ) -> Self {
        Action::Deferred(Box::new(thunk))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Action::Deferred(_))
    }
}

impl<S, A: fmt::Debug> fmt::Debug for Action<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Plain(action) => f.debug_tuple("Plain").field(action).finish(),
            Action::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
