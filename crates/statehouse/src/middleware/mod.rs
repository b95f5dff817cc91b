//! Middleware pipeline around the dispatch entry point.
//!
//! Middleware sits between action dispatch and reducer execution, allowing
//! side effects, deferred work, logging, and other cross-cutting concerns to
//! be handled in a composable way.
//!
//! ```text
//! Action -> Middleware Chain -> Reducer -> State
//! ```
//!
//! Each stage receives the next stage's dispatch and returns its own. A
//! stage may forward the action unchanged, transform it, decline to forward
//! it at all (cancelling the action), or defer work around the call.
//!
//! Stages are explicit transformer objects composed by iteration, outermost
//! first: `apply_middleware(&store, vec![a, b])` makes `a` the first stage
//! to see a dispatched action and the last to see the reducer's direct
//! consequence.

mod logging;
mod thunk;

pub use logging::LoggingMiddleware;
pub use thunk::ThunkMiddleware;

use crate::action::DispatchFn;
use crate::error::{Result, StoreError};
use crate::store::Store;

/// A composable wrapper around the dispatch entry point.
pub trait Middleware<S, A> {
    /// Wrap the next dispatch stage, returning the dispatch for this stage.
    fn wrap(&self, next: DispatchFn<S, A>) -> DispatchFn<S, A>;
}

/// Compose stages around a terminal dispatch, right to left, so the first
/// stage is the outermost wrapper.
///
/// Composing an empty sequence has no meaningful identity dispatch and
/// fails fast with [`StoreError::Configuration`].
pub fn compose<S, A>(
    stages: &[Box<dyn Middleware<S, A>>],
    terminal: DispatchFn<S, A>,
) -> Result<DispatchFn<S, A>> {
    if stages.is_empty() {
        return Err(StoreError::Configuration(
            "cannot compose an empty middleware chain".to_string(),
        ));
    }
    let mut dispatch = terminal;
    for stage in stages.iter().rev() {
        dispatch = stage.wrap(dispatch);
    }
    Ok(dispatch)
}

/// Compose `stages` around the store's currently installed entry point and
/// install the result as the new dispatch entry point.
///
/// Normally invoked once, after construction. Re-invoking composes atop
/// whatever is currently installed, nesting the new pipeline outside the
/// old one - an intentional capability.
pub fn apply_middleware<S: 'static, A: 'static>(
    store: &Store<S, A>,
    stages: Vec<Box<dyn Middleware<S, A>>>,
) -> Result<()> {
    let terminal = store.current_dispatch_fn();
    let composed = compose(&stages, terminal)?;
    store.install_pipeline(composed);
    log::debug!("installed dispatch pipeline with {} stage(s)", stages.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
    struct CountState {
        count: i64,
    }

    #[derive(Debug)]
    enum Event {
        Add(i64),
    }

    fn reduce(state: &CountState, event: &Event) -> CountState {
        match event {
            Event::Add(n) => CountState {
                count: state.count + n,
            },
        }
    }

    type Trace = Rc<RefCell<Vec<String>>>;

    /// Records its name around the forwarded call.
    struct TraceMiddleware {
        name: &'static str,
        trace: Trace,
    }

    impl<S: 'static, A: 'static> Middleware<S, A> for TraceMiddleware {
        fn wrap(&self, next: DispatchFn<S, A>) -> DispatchFn<S, A> {
            let name = self.name;
            let trace = Rc::clone(&self.trace);
            Rc::new(move |action| {
                trace.borrow_mut().push(format!("{name}:pre"));
                let outcome = next(action);
                trace.borrow_mut().push(format!("{name}:post"));
                outcome
            })
        }
    }

    /// Never forwards: the action is cancelled.
    struct CancelMiddleware;

    impl<S: 'static, A: 'static> Middleware<S, A> for CancelMiddleware {
        fn wrap(&self, _next: DispatchFn<S, A>) -> DispatchFn<S, A> {
            Rc::new(|_action| Ok(()))
        }
    }

    /// Replaces every action with a fixed one before forwarding.
    struct RewriteMiddleware;

    impl<S: 'static> Middleware<S, Event> for RewriteMiddleware {
        fn wrap(&self, next: DispatchFn<S, Event>) -> DispatchFn<S, Event> {
            Rc::new(move |_action| next(Action::plain(Event::Add(100))))
        }
    }

    fn traced_store(trace: &Trace) -> Store<CountState, Event> {
        let t = Rc::clone(trace);
        Store::with_default_state(move |state: &CountState, event: &Event| {
            t.borrow_mut().push("reduce".to_string());
            reduce(state, event)
        })
        .unwrap()
    }

    #[test]
    fn test_composition_order_is_outermost_first() {
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let store = traced_store(&trace);

        apply_middleware(
            &store,
            vec![
                Box::new(TraceMiddleware {
                    name: "A",
                    trace: Rc::clone(&trace),
                }),
                Box::new(TraceMiddleware {
                    name: "B",
                    trace: Rc::clone(&trace),
                }),
            ],
        )
        .unwrap();

        store.dispatch(Action::plain(Event::Add(1))).unwrap();

        assert_eq!(
            *trace.borrow(),
            vec!["A:pre", "B:pre", "reduce", "B:post", "A:post"]
        );
    }

    #[test]
    fn test_empty_composition_fails_fast() {
        let store: Store<CountState, Event> = Store::with_default_state(reduce).unwrap();
        let err = apply_middleware(&store, Vec::new()).unwrap_err();
        assert!(matches!(err, StoreError::Configuration(_)));
    }

    #[test]
    fn test_cancelling_stage_stops_the_chain() {
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let store = traced_store(&trace);

        apply_middleware(&store, vec![Box::new(CancelMiddleware)]).unwrap();

        store.dispatch(Action::plain(Event::Add(1))).unwrap();

        assert!(trace.borrow().is_empty());
        assert_eq!(store.get_state().unwrap().count, 0);
    }

    #[test]
    fn test_stage_may_transform_the_action() {
        let store: Store<CountState, Event> = Store::with_default_state(reduce).unwrap();

        apply_middleware(&store, vec![Box::new(RewriteMiddleware)]).unwrap();

        store.dispatch(Action::plain(Event::Add(1))).unwrap();

        assert_eq!(store.get_state().unwrap().count, 100);
    }

    #[test]
    fn test_reapplying_nests_outside_the_installed_pipeline() {
        let trace: Trace = Rc::new(RefCell::new(Vec::new()));
        let store = traced_store(&trace);

        apply_middleware(
            &store,
            vec![Box::new(TraceMiddleware {
                name: "inner",
                trace: Rc::clone(&trace),
            })],
        )
        .unwrap();
        apply_middleware(
            &store,
            vec![Box::new(TraceMiddleware {
                name: "outer",
                trace: Rc::clone(&trace),
            })],
        )
        .unwrap();

        store.dispatch(Action::plain(Event::Add(1))).unwrap();

        assert_eq!(
            *trace.borrow(),
            vec!["outer:pre", "inner:pre", "reduce", "inner:post", "outer:post"]
        );
    }
}
