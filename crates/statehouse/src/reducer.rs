//! Reducers: pure state transitions, and composition of named slices.

use std::rc::Rc;

use serde_json::{Map, Value};

/// Pure transition function: current state and an action produce the next
/// state. Reducers must not dispatch back into the store.
pub type Reducer<S, A> = Rc<dyn Fn(&S, &A) -> S>;

/// Reducer over one named slice of a JSON-object state. Receives the current
/// slice (`Value::Null` when the state has no such key) and the action.
pub type SliceReducer<A> = Box<dyn Fn(Value, &A) -> Value>;

/// Compose an ordered mapping of named slice reducers into one whole-state
/// reducer over `serde_json::Value`.
///
/// Each named reducer is applied independently to its own slice with the
/// same action. The output object contains exactly the mapped keys: slices
/// of the input state with no reducer are dropped. This is a narrowing
/// combinator, not a merge.
pub fn combine_reducers<A>(slices: Vec<(String, SliceReducer<A>)>) -> impl Fn(&Value, &A) -> Value {
    move |state, action| {
        let mut next = Map::new();
        for (name, reduce_slice) in &slices {
            let current = state.get(name.as_str()).cloned().unwrap_or(Value::Null);
            next.insert(name.clone(), reduce_slice(current, action));
        }
        Value::Object(next)
    }
}
