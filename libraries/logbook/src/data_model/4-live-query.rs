//! # LiveQuery
//! A live query is a projection of the materialized state. Subscribers are handed a new value whenever a commit
//! changes what the query returns; commits that leave the projection untouched are not reported.

use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

pub trait LiveQuery<S> {
    type Output: Clone + PartialEq + 'static;

    fn run(&self, state: &S) -> Self::Output;
}

impl<S, O, F> LiveQuery<S> for F
where
    F: Fn(&S) -> O,
    O: Clone + PartialEq + 'static,
{
    type Output = O;

    fn run(&self, state: &S) -> O {
        self(state)
    }
}

/// Type-erased subscription, so queries with different outputs can live in one slotmap.
pub(crate) trait Subscription<S> {
    /// Re-run the query. Returns a delivery if the value changed since the last one.
    fn poll(&mut self, state: &S) -> Option<Box<dyn FnOnce()>>;

    /// Stop any delivery that was already drained but not yet run.
    fn cancel(&self);
}

pub(crate) struct QuerySubscription<S, Q: LiveQuery<S>> {
    query: Q,
    last: Option<Q::Output>,
    callback: Rc<dyn Fn(Q::Output)>,
    active: Rc<Cell<bool>>,
    _state: PhantomData<fn(&S)>,
}

impl<S, Q: LiveQuery<S>> QuerySubscription<S, Q> {
    pub(crate) fn new(query: Q, callback: impl Fn(Q::Output) + 'static) -> Self {
        Self {
            query,
            last: None,
            callback: Rc::new(callback),
            active: Rc::new(Cell::new(true)),
            _state: PhantomData,
        }
    }
}

impl<S, Q: LiveQuery<S>> Subscription<S> for QuerySubscription<S, Q> {
    fn poll(&mut self, state: &S) -> Option<Box<dyn FnOnce()>> {
        let value = self.query.run(state);
        if self.last.as_ref() == Some(&value) {
            return None;
        }
        self.last = Some(value.clone());

        let callback = self.callback.clone();
        let active = self.active.clone();
        Some(Box::new(move || {
            if active.get() {
                callback(value)
            }
        }))
    }

    fn cancel(&self) {
        self.active.set(false);
    }
}
