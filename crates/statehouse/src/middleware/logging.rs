//! LoggingMiddleware - logs every action that passes through the pipeline.

use std::fmt;
use std::rc::Rc;

use crate::action::DispatchFn;
use crate::middleware::Middleware;

/// Pure pass-through side effect: records the dispatched action before
/// forwarding it unchanged. Never alters or drops actions.
pub struct LoggingMiddleware;

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, A: fmt::Debug + 'static> Middleware<S, A> for LoggingMiddleware {
    fn wrap(&self, next: DispatchFn<S, A>) -> DispatchFn<S, A> {
        Rc::new(move |action| {
            log::debug!("dispatching action {:?}", action);
            next(action)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::middleware::apply_middleware;
    use crate::store::Store;

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

    #[test]
    fn test_logging_forwards_unaltered() {
        let _ = env_logger::builder().is_test(true).try_init();

        let store = Store::with_default_state(reduce).unwrap();
        apply_middleware(&store, vec![Box::new(LoggingMiddleware::new())]).unwrap();

        store.dispatch(Action::plain(Event::Add(3))).unwrap();

        assert_eq!(store.get_state().unwrap().count, 3);
    }
}
