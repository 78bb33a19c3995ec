use futures::channel::mpsc;

use crate::Materialized;
use crate::data_model::live_query::{QuerySubscription, Subscription};
use crate::data_model::{Committed, DirtyTracker, Error, Event, LiveQuery, SubscriptionKey};

struct Subscriber<S> {
    /// Generation of the state this subscriber was last evaluated against.
    seen: Option<u64>,
    subscription: Box<dyn Subscription<S>>,
}

/// What a successful commit appended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    pub commit: u64,
    pub first_position: usize,
    pub events: usize,
}

pub struct Store<S: Materialized> {
    log: Vec<Committed<S::Event>>,
    commits: u64,
    state: DirtyTracker<S>,
    subscribers: slotmap::SlotMap<slotmap::DefaultKey, Subscriber<S>>,
}

impl<S: Materialized> Default for Store<S> {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            commits: 0,
            state: DirtyTracker::default(),
            subscribers: Default::default(),
        }
    }
}

impl<S: Materialized> Store<S> {
    /// Append `events` as a single transaction. Committing nothing is a no-op and returns `None`.
    pub fn commit<I>(&mut self, events: I) -> Option<CommitReceipt>
    where
        I: IntoIterator<Item = S::Event>,
    {
        let events: Vec<S::Event> = events.into_iter().collect();
        if events.is_empty() {
            log::trace!("Ignoring empty commit");
            return None;
        }
        Some(self.append(events, chrono::Utc::now()))
    }

    pub fn commit_one(&mut self, event: S::Event) -> CommitReceipt {
        self.append(vec![event], chrono::Utc::now())
    }

    /// `events` must not be empty.
    fn append(
        &mut self,
        events: Vec<S::Event>,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> CommitReceipt {
        let commit = self.commits + 1;
        let first_position = self.log.len();
        let num_events = events.len();

        if let Some(first) = events.first() {
            log::debug!(
                "Commit #{commit}: {num_events} event(s), first is {}",
                first.name()
            );
        }

        let committed = events.into_iter().enumerate().map(|(i, event)| Committed {
            commit,
            position: first_position + i,
            timestamp,
            event,
        });

        {
            let mut state = self.state.value_mut();
            for event in committed {
                let current = std::mem::take(&mut *state);
                *state = current.apply_event(&event);
                self.log.push(event);
            }
        }
        self.commits = commit;

        CommitReceipt {
            commit,
            first_position,
            events: num_events,
        }
    }

    pub fn state(&self) -> &S {
        self.state.value()
    }

    /// One-off read, without subscribing.
    pub fn query<Q: LiveQuery<S>>(&self, query: &Q) -> Q::Output {
        query.run(self.state.value())
    }

    pub fn events(&self) -> impl Iterator<Item = &Committed<S::Event>> {
        self.log.iter()
    }

    pub fn num_events(&self) -> usize {
        self.log.len()
    }

    pub fn num_commits(&self) -> u64 {
        self.commits
    }

    /// The callback receives the current value on the next drain, and then every changed value after a commit.
    pub fn subscribe<Q>(&mut self, query: Q, callback: impl Fn(Q::Output) + 'static) -> SubscriptionKey
    where
        Q: LiveQuery<S> + 'static,
    {
        let subscription = QuerySubscription::new(query, callback);
        let key = self.subscribers.insert(Subscriber {
            seen: None,
            subscription: Box::new(subscription),
        });
        SubscriptionKey(key)
    }

    /// Stream form of [`Store::subscribe`]. The receiver stays open until the subscription is removed.
    pub fn watch<Q>(&mut self, query: Q) -> (SubscriptionKey, mpsc::UnboundedReceiver<Q::Output>)
    where
        Q: LiveQuery<S> + 'static,
    {
        let (sender, receiver) = mpsc::unbounded();
        let key = self.subscribe(query, move |value| {
            // the receiver being gone just means nobody is listening anymore
            let _ = sender.unbounded_send(value);
        });
        (key, receiver)
    }

    /// Returns false if the key was already removed. Safe to call any number of times.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        match self.subscribers.remove(key.0) {
            Some(subscriber) => {
                subscriber.subscription.cancel();
                true
            }
            None => false,
        }
    }

    pub fn num_subscriptions(&self) -> usize {
        self.subscribers.len()
    }

    /// Re-runs every query whose subscriber hasn't seen the current state. The returned closures deliver the changed
    /// values; run them after releasing any borrow of the store, since callbacks are allowed to call back in.
    pub fn drain_due_notifications(&mut self) -> Vec<Box<dyn FnOnce()>> {
        let generation = self.state.generation();
        let state = self.state.value();
        let mut notifications: Vec<Box<dyn FnOnce()>> = Vec::new();

        for (_, subscriber) in self.subscribers.iter_mut() {
            if !self.state.is_dirty_for(subscriber.seen) {
                continue;
            }
            subscriber.seen = Some(generation);
            if let Some(notification) = subscriber.subscription.poll(state) {
                notifications.push(notification);
            }
        }
        notifications
    }

    pub fn export_json(&self) -> Result<Vec<serde_json::Value>, Error> {
        self.log
            .iter()
            .map(|event| {
                event.to_json().map_err(|source| Error::Encode {
                    position: event.position,
                    source,
                })
            })
            .collect()
    }

    /// Rebuild a store by replaying an exported log. Events sharing a commit number are committed together again.
    ///
    /// Commit numbers must run 1, 2, 3, ... without gaps, so the restored store numbers its commits exactly as the
    /// exported one did.
    pub fn restore<I>(events: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = serde_json::Value>,
    {
        let mut store = Self::default();
        let mut batch: Vec<S::Event> = Vec::new();
        let mut batch_commit: Option<(u64, chrono::DateTime<chrono::Utc>)> = None;

        for (position, json) in events.into_iter().enumerate() {
            let event = Committed::<S::Event>::from_json(&json)
                .map_err(|source| Error::Decode { position, source })?;

            match batch_commit {
                None if event.commit != 1 => {
                    return Err(Error::CommitGap {
                        position,
                        commit: event.commit,
                        expected: 1,
                    });
                }
                Some((previous, _)) if event.commit < previous => {
                    return Err(Error::OutOfOrder {
                        position,
                        commit: event.commit,
                        previous,
                    });
                }
                Some((previous, _)) if event.commit > previous + 1 => {
                    return Err(Error::CommitGap {
                        position,
                        commit: event.commit,
                        expected: previous + 1,
                    });
                }
                Some((previous, timestamp)) if event.commit == previous + 1 => {
                    store.append(std::mem::take(&mut batch), timestamp);
                }
                _ => {}
            }
            batch_commit = Some((event.commit, event.timestamp));
            batch.push(event.event);
        }

        if let Some((_, timestamp)) = batch_commit {
            store.append(batch, timestamp);
        }
        log::info!(
            "Restored {} event(s) in {} commit(s)",
            store.num_events(),
            store.num_commits()
        );
        Ok(store)
    }
}
