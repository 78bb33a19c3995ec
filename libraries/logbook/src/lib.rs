//! A small in-memory event-sourced store.
//!
//! Model:
//! 1. The application never edits its state directly. It commits "events".
//! 2. A commit is a transaction: one or more events appended to the log together, applied together, and observed together.
//! 3. Starting from a default initial state, the events are applied in log order to get the current state.
//! 4. Readers register "live queries". After every commit, each query is re-run against the new state and its consumer
//!    is told about the new value, but only if the value actually changed.
//!
//! There is no persistence and no syncing between processes here. `Store::export_json` and `Store::restore` exist so
//! that a run can be inspected or replayed.

pub mod data_model;

pub use data_model::{
    CommitReceipt, Committed, Error, Event, LiveQuery, Store, SubscriptionKey,
};

/// State derived from a log of events.
pub trait Materialized: Default + 'static {
    type Event: Event + 'static;

    fn apply_event(self, event: &Committed<Self::Event>) -> Self;
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::StreamExt;

    use super::*;

    #[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    #[serde(tag = "name", content = "args")]
    enum CounterEvent {
        #[serde(rename = "v1.Added")]
        Added(i64),
        #[serde(rename = "v1.Reset")]
        Reset,
    }

    impl Event for CounterEvent {
        fn name(&self) -> &'static str {
            match self {
                CounterEvent::Added(_) => "v1.Added",
                CounterEvent::Reset => "v1.Reset",
            }
        }

        fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
            serde_json::to_value(self)
        }

        fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
            serde_json::from_value(json.clone())
        }
    }

    #[derive(Default, Debug)]
    struct Counter {
        total: i64,
        applied: usize,
    }

    impl Materialized for Counter {
        type Event = CounterEvent;

        fn apply_event(self, event: &Committed<Self::Event>) -> Self {
            let total = match event.event {
                CounterEvent::Added(n) => self.total + n,
                CounterEvent::Reset => 0,
            };
            Counter {
                total,
                applied: self.applied + 1,
            }
        }
    }

    fn total(state: &Counter) -> i64 {
        state.total
    }

    fn recorder() -> (Rc<RefCell<Vec<i64>>>, impl Fn(i64) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |value| sink.borrow_mut().push(value))
    }

    fn flush(store: &mut Store<Counter>) {
        for notification in store.drain_due_notifications() {
            notification();
        }
    }

    #[test]
    fn test_commit_is_one_transaction() {
        let mut store: Store<Counter> = Store::default();
        let receipt = store
            .commit(vec![CounterEvent::Added(1), CounterEvent::Added(2)])
            .expect("non-empty commit");

        assert_eq!(receipt.commit, 1);
        assert_eq!(receipt.first_position, 0);
        assert_eq!(receipt.events, 2);
        assert_eq!(store.num_commits(), 1);
        assert_eq!(store.num_events(), 2);
        assert_eq!(store.state().total, 3);
        assert!(store.events().all(|e| e.commit == 1));

        let receipt = store.commit_one(CounterEvent::Added(4));
        assert_eq!(receipt.commit, 2);
        assert_eq!(receipt.first_position, 2);
        assert_eq!(store.query(&total), 7);
    }

    #[test]
    fn test_empty_commit_is_a_no_op() {
        let mut store: Store<Counter> = Store::default();
        let (seen, callback) = recorder();
        store.subscribe(total, callback);
        flush(&mut store);

        assert!(store.commit(Vec::new()).is_none());
        flush(&mut store);

        assert_eq!(store.num_commits(), 0);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn test_subscription_sees_initial_value_then_changes() {
        let mut store: Store<Counter> = Store::default();
        let (seen, callback) = recorder();
        store.subscribe(total, callback);

        flush(&mut store);
        store.commit_one(CounterEvent::Added(5));
        flush(&mut store);
        // no change in the projected value, so no delivery
        store.commit_one(CounterEvent::Added(0));
        flush(&mut store);
        store.commit_one(CounterEvent::Reset);
        flush(&mut store);

        assert_eq!(*seen.borrow(), vec![0, 5, 0]);
        assert_eq!(store.state().applied, 3);
    }

    #[test]
    fn test_commits_between_flushes_coalesce() {
        let mut store: Store<Counter> = Store::default();
        let (seen, callback) = recorder();
        store.subscribe(total, callback);
        flush(&mut store);

        store.commit_one(CounterEvent::Added(1));
        store.commit_one(CounterEvent::Added(1));
        flush(&mut store);

        assert_eq!(*seen.borrow(), vec![0, 2]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let mut store: Store<Counter> = Store::default();
        let (kept, keep_callback) = recorder();
        let (dropped, drop_callback) = recorder();
        store.subscribe(total, keep_callback);
        let key = store.subscribe(total, drop_callback);
        flush(&mut store);

        assert!(store.unsubscribe(key));
        assert!(!store.unsubscribe(key));
        assert_eq!(store.num_subscriptions(), 1);

        store.commit_one(CounterEvent::Added(3));
        flush(&mut store);

        assert_eq!(*kept.borrow(), vec![0, 3]);
        assert_eq!(*dropped.borrow(), vec![0]);
    }

    #[test]
    fn test_stale_key_does_not_hit_new_subscription() {
        let mut store: Store<Counter> = Store::default();
        let (_, first) = recorder();
        let stale = store.subscribe(total, first);
        store.unsubscribe(stale);

        let (seen, second) = recorder();
        store.subscribe(total, second);

        assert!(!store.unsubscribe(stale));
        flush(&mut store);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn test_unsubscribed_during_flush_is_not_delivered() {
        let mut store: Store<Counter> = Store::default();
        let (seen, callback) = recorder();
        let key = store.subscribe(total, callback);
        store.commit_one(CounterEvent::Added(1));

        let notifications = store.drain_due_notifications();
        store.unsubscribe(key);
        for notification in notifications {
            notification();
        }

        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_watch_streams_values_in_commit_order() {
        let mut store: Store<Counter> = Store::default();
        let (_key, values) = store.watch(total);

        flush(&mut store);
        for n in 1..=3 {
            store.commit_one(CounterEvent::Added(n));
            flush(&mut store);
        }

        let collected: Vec<i64> =
            futures::executor::block_on(values.take(4).collect());
        assert_eq!(collected, vec![0, 1, 3, 6]);
    }

    #[test]
    fn test_export_then_restore_keeps_commit_grouping() {
        let mut store: Store<Counter> = Store::default();
        store.commit(vec![CounterEvent::Added(2), CounterEvent::Added(3)]);
        store.commit_one(CounterEvent::Reset);
        store.commit_one(CounterEvent::Added(7));

        let exported = store.export_json().unwrap();
        assert_eq!(exported[0]["event"]["name"], "v1.Added");

        let restored: Store<Counter> = Store::restore(exported).unwrap();
        assert_eq!(restored.num_commits(), 3);
        assert_eq!(restored.num_events(), 4);
        assert_eq!(restored.state().total, 7);
        let original: Vec<_> = store.events().cloned().collect();
        let replayed: Vec<_> = restored.events().cloned().collect();
        assert_eq!(original, replayed);
    }

    #[test]
    fn test_restore_rejects_out_of_order_commits() {
        let mut store: Store<Counter> = Store::default();
        store.commit_one(CounterEvent::Added(1));
        store.commit_one(CounterEvent::Added(2));
        let mut exported = store.export_json().unwrap();
        exported.reverse();

        let Err(err) = Store::<Counter>::restore(exported) else {
            panic!("restore should fail");
        };
        assert!(matches!(
            err,
            Error::OutOfOrder {
                position: 1,
                commit: 1,
                previous: 2
            }
        ));
    }

    #[test]
    fn test_restore_reports_undecodable_event() {
        let json = serde_json::json!({
            "commit": 1,
            "position": 0,
            "timestamp": "2025-01-01T00:00:00Z",
            "event": { "name": "v9.Unknown" }
        });

        let Err(err) = Store::<Counter>::restore(vec![json]) else {
            panic!("restore should fail");
        };
        assert!(matches!(err, Error::Decode { position: 0, .. }));
    }

    fn exported_event(commit: u64, position: usize, amount: i64) -> serde_json::Value {
        serde_json::json!({
            "commit": commit,
            "position": position,
            "timestamp": "2025-01-01T00:00:00Z",
            "event": { "name": "v1.Added", "args": amount }
        })
    }

    #[test]
    fn test_restore_rejects_commit_gaps() {
        let Err(err) =
            Store::<Counter>::restore(vec![exported_event(3, 0, 1), exported_event(7, 1, 1)])
        else {
            panic!("restore should fail");
        };
        assert!(matches!(
            err,
            Error::CommitGap {
                position: 0,
                commit: 3,
                expected: 1
            }
        ));

        let Err(err) = Store::<Counter>::restore(vec![
            exported_event(1, 0, 1),
            exported_event(1, 1, 1),
            exported_event(3, 2, 1),
        ]) else {
            panic!("restore should fail");
        };
        assert!(matches!(
            err,
            Error::CommitGap {
                position: 2,
                commit: 3,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_restore_keeps_commit_numbers() {
        let restored = Store::<Counter>::restore(vec![
            exported_event(1, 0, 1),
            exported_event(2, 1, 2),
            exported_event(2, 2, 3),
        ])
        .unwrap();

        let commits: Vec<u64> = restored.events().map(|e| e.commit).collect();
        assert_eq!(commits, vec![1, 2, 2]);
        assert_eq!(restored.state().total, 6);
    }
}
