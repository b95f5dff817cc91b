//! Validator subsystem: per-key predicates observed on every mutation.
//!
//! Validators are strictly observational. They never veto or roll back a
//! mutation; a failing predicate only invokes the failure callback. The
//! subsystem rides on the ordinary listener mechanism - one extra listener,
//! registered alongside whatever listeners already exist.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::store::{ListenerId, Store, WeakStore};

/// Predicate over one keyed field of the state's JSON projection.
pub type ValidatorFn = Box<dyn Fn(&Value) -> bool>;

/// Teardown handle returned by [`apply_validators`].
///
/// Holds the identities of every listener present on the store at
/// registration time, plus the validator's own listener.
pub struct ValidatorHandle<S, A> {
    store: WeakStore<S, A>,
    attached: Vec<ListenerId>,
}

impl<S: 'static, A: 'static> ValidatorHandle<S, A> {
    /// Bulk-detach: unsubscribe every listener captured at registration
    /// time as well as the validator's own listener.
    pub fn teardown(self) {
        if let Some(store) = self.store.upgrade() {
            for id in self.attached {
                store.unsubscribe(id);
            }
            log::debug!("validator teardown detached all captured listeners");
        }
    }
}

/// Attach a validating listener to `store`.
///
/// On every state change, each `(key, predicate)` pair is evaluated against
/// the corresponding field of the current state (read via `get_state`, so
/// persistence read-through applies; a missing field reads as JSON `null`).
/// For every key whose predicate returns `false`,
/// `on_validation_fail(key, value)` is invoked.
pub fn apply_validators<S, A>(
    store: &Store<S, A>,
    validators: Vec<(String, ValidatorFn)>,
    on_validation_fail: impl Fn(&str, &Value) + 'static,
) -> ValidatorHandle<S, A>
where
    S: Serialize + DeserializeOwned + Clone + 'static,
    A: 'static,
{
    // Snapshot of the listeners that exist before ours is added.
    let mut attached = store.listeners();

    let weak = store.downgrade();
    let own = store.subscribe(move || {
        let Some(store) = weak.upgrade() else {
            return Ok(());
        };
        let state = store.get_state()?;
        let doc = serde_json::to_value(&state)?;
        for (key, is_valid) in &validators {
            let value = doc.get(key.as_str()).cloned().unwrap_or(Value::Null);
            if !is_valid(&value) {
                on_validation_fail(key, &value);
            }
        }
        Ok(())
    });
    attached.push(own);

    ValidatorHandle {
        store: store.downgrade(),
        attached,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::reducer::{combine_reducers, SliceReducer};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    enum Event {
        UpdateData(String),
    }

    fn data_slice() -> SliceReducer<Event> {
        Box::new(|_slice, action| match action {
            Event::UpdateData(payload) => Value::String(payload.clone()),
        })
    }

    fn non_empty_string() -> ValidatorFn {
        Box::new(|value| value.as_str().is_some_and(|s| !s.is_empty()))
    }

    type Failures = Rc<RefCell<Vec<(String, Value)>>>;

    fn recording(failures: &Failures) -> impl Fn(&str, &Value) + 'static {
        let failures = Rc::clone(failures);
        move |key, value| failures.borrow_mut().push((key.to_string(), value.clone()))
    }

    #[test]
    fn test_failing_and_passing_updates() {
        let reduce = combine_reducers(vec![("data".to_string(), data_slice())]);
        let store = Store::new(serde_json::json!({"data": ""}), reduce).unwrap();

        let failures: Failures = Rc::new(RefCell::new(Vec::new()));
        let _handle = apply_validators(
            &store,
            vec![("data".to_string(), non_empty_string())],
            recording(&failures),
        );

        store
            .dispatch(Action::plain(Event::UpdateData(String::new())))
            .unwrap();
        assert_eq!(
            *failures.borrow(),
            vec![("data".to_string(), Value::String(String::new()))]
        );

        store
            .dispatch(Action::plain(Event::UpdateData("x".to_string())))
            .unwrap();
        // No new failure for the passing update.
        assert_eq!(failures.borrow().len(), 1);
        assert_eq!(
            store.get_state().unwrap(),
            serde_json::json!({"data": "x"})
        );
    }

    #[test]
    fn test_missing_field_reads_as_null() {
        let reduce = combine_reducers(vec![("data".to_string(), data_slice())]);
        let store = Store::new(serde_json::json!({"data": ""}), reduce).unwrap();

        let failures: Failures = Rc::new(RefCell::new(Vec::new()));
        let _handle = apply_validators(
            &store,
            vec![("absent".to_string(), non_empty_string())],
            recording(&failures),
        );

        store
            .dispatch(Action::plain(Event::UpdateData("x".to_string())))
            .unwrap();

        assert_eq!(
            *failures.borrow(),
            vec![("absent".to_string(), Value::Null)]
        );
    }

    #[test]
    fn test_validators_never_block_the_mutation() {
        let reduce = combine_reducers(vec![("data".to_string(), data_slice())]);
        let store = Store::new(serde_json::json!({"data": "start"}), reduce).unwrap();

        let failures: Failures = Rc::new(RefCell::new(Vec::new()));
        let _handle = apply_validators(
            &store,
            vec![("data".to_string(), non_empty_string())],
            recording(&failures),
        );

        store
            .dispatch(Action::plain(Event::UpdateData(String::new())))
            .unwrap();

        // The transition stands even though validation failed.
        assert_eq!(
            store.get_state().unwrap(),
            serde_json::json!({"data": ""})
        );
        assert_eq!(failures.borrow().len(), 1);
    }

    #[test]
    fn test_teardown_bulk_detaches_preexisting_listeners() {
        let reduce = combine_reducers(vec![("data".to_string(), data_slice())]);
        let store = Store::new(serde_json::json!({"data": ""}), reduce).unwrap();

        let notified = Rc::new(RefCell::new(0));
        let n = Rc::clone(&notified);
        store.subscribe(move || {
            *n.borrow_mut() += 1;
            Ok(())
        });

        let failures: Failures = Rc::new(RefCell::new(Vec::new()));
        let handle = apply_validators(
            &store,
            vec![("data".to_string(), non_empty_string())],
            recording(&failures),
        );

        handle.teardown();

        // Both the pre-existing listener and the validator's own are gone:
        // a subsequent mutation notifies nobody.
        store
            .dispatch(Action::plain(Event::UpdateData(String::new())))
            .unwrap();
        assert_eq!(*notified.borrow(), 0);
        assert!(failures.borrow().is_empty());
        assert!(store.listeners().is_empty());
    }

    #[test]
    fn test_listeners_registered_after_validators_survive_teardown() {
        let reduce = combine_reducers(vec![("data".to_string(), data_slice())]);
        let store = Store::new(serde_json::json!({"data": ""}), reduce).unwrap();

        let failures: Failures = Rc::new(RefCell::new(Vec::new()));
        let handle = apply_validators(
            &store,
            vec![("data".to_string(), non_empty_string())],
            recording(&failures),
        );

        // Subscribed after the snapshot was taken: not part of the bulk detach.
        let notified = Rc::new(RefCell::new(0));
        let n = Rc::clone(&notified);
        store.subscribe(move || {
            *n.borrow_mut() += 1;
            Ok(())
        });

        handle.teardown();

        store
            .dispatch(Action::plain(Event::UpdateData("y".to_string())))
            .unwrap();
        assert_eq!(*notified.borrow(), 1);
        assert!(failures.borrow().is_empty());
    }
}
