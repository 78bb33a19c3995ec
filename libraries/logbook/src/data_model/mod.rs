#[path = "1-event.rs"]
mod event;

#[path = "2-committed.rs"]
mod committed;

#[path = "3-dirty-tracker.rs"]
mod dirty_tracker;

#[path = "4-live-query.rs"]
mod live_query;

#[path = "5-store.rs"]
mod store;

pub use committed::*;
pub use dirty_tracker::*;
pub use event::*;
pub use live_query::*;
pub use store::*;

#[cfg_attr(target_arch = "wasm32", wasm_bindgen::prelude::wasm_bindgen)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SubscriptionKey(pub(crate) slotmap::DefaultKey);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to encode event at position {position}: {source}")]
    Encode {
        position: usize,
        source: serde_json::Error,
    },
    #[error("failed to decode event at position {position}: {source}")]
    Decode {
        position: usize,
        source: serde_json::Error,
    },
    #[error("event at position {position} belongs to commit {commit}, which precedes commit {previous}")]
    OutOfOrder {
        position: usize,
        commit: u64,
        previous: u64,
    },
    #[error("event at position {position} belongs to commit {commit}, expected commit {expected}")]
    CommitGap {
        position: usize,
        commit: u64,
        expected: u64,
    },
}
