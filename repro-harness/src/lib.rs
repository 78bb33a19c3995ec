//! Workload harness for reproducing sync bugs in an event-sourced store.
//!
//! The harness generates batches of random items and commits them with one of several [`CommitStrategy`]s, while
//! a table (or anything else) stays bound to the live "all items" query. Committing large batches in one tab and
//! watching another is how the replication defect shows up; nothing in here tries to work around it.

pub mod events;
pub mod labels;
pub mod state;
pub mod strategy;
pub mod workload;

#[cfg(target_arch = "wasm32")]
mod wasm;

use std::cell::{Cell, RefCell};

use eyedee::SequentialIds;
use logbook::{Store, SubscriptionKey};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use events::ItemEvent;
pub use state::{ItemsState, UiState};
pub use strategy::{CommitReport, CommitStrategy};
pub use workload::{Item, ItemId};

pub const MIN_BATCH_SIZE: usize = 1;
pub const MAX_BATCH_SIZE: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error(
        "batch size must be between {min} and {max}, got {0}",
        min = MIN_BATCH_SIZE,
        max = MAX_BATCH_SIZE
    )]
    BatchSize(usize),
    #[error("unknown commit strategy {0:?}")]
    UnknownStrategy(String),
    #[error(transparent)]
    Store(#[from] logbook::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase", default)]
pub struct HarnessConfig {
    pub batch_size: usize,
    /// Makes labels reproducible. Ids don't depend on it.
    pub seed: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            seed: None,
        }
    }
}

pub struct Harness {
    // never hold one of these borrows while running notifications: callbacks are allowed to call back into the harness
    store: RefCell<Store<ItemsState>>,
    ids: RefCell<SequentialIds>,
    rng: RefCell<ChaCha8Rng>,
    batch_size: Cell<usize>,
    session_id: String,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        check_batch_size(config.batch_size)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let session_id = eyedee::get_uuid();
        log::info!(
            "Session {session_id} started (batch size {}, seed {seed})",
            config.batch_size
        );

        Ok(Self {
            store: RefCell::new(Store::default()),
            ids: RefCell::new(SequentialIds::default()),
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
            batch_size: Cell::new(config.batch_size),
            session_id,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    pub fn set_batch_size(&self, batch_size: usize) -> Result<(), HarnessError> {
        check_batch_size(batch_size)?;
        self.batch_size.set(batch_size);
        Ok(())
    }

    /// The id the next generated item will get.
    pub fn next_id(&self) -> ItemId {
        ItemId(self.ids.borrow().peek())
    }

    /// Generate a batch of the current batch size and commit it.
    pub fn create_items(&self, strategy: CommitStrategy) -> CommitReport {
        self.create_batch(strategy, self.batch_size.get())
    }

    pub fn create_items_single_commit(&self) -> CommitReport {
        self.create_items(CommitStrategy::SingleCommit)
    }

    pub fn create_items_commit_per_event(&self) -> CommitReport {
        self.create_items(CommitStrategy::CommitPerEvent)
    }

    pub fn create_items_bulk(&self) -> CommitReport {
        self.create_items(CommitStrategy::BulkEvent)
    }

    /// Like [`Harness::create_items`] but with an explicit count, which may be zero.
    pub fn create_batch(&self, strategy: CommitStrategy, count: usize) -> CommitReport {
        let items = {
            let mut ids = self.ids.borrow_mut();
            let mut rng = self.rng.borrow_mut();
            workload::generate_items(&mut ids, &mut *rng, count)
        };

        let report = strategy.apply(&self.store, items, || self.flush_notifications());
        log::info!(
            "[{}] {strategy}: {} item(s) as {} event(s) in {} commit(s)",
            self.session_id,
            report.items,
            report.events,
            report.commits
        );
        report
    }

    pub fn clear_all(&self) {
        let _flusher = FlushLater::new(self);
        let receipt = self
            .store
            .borrow_mut()
            .commit_one(ItemEvent::all_items_deleted());
        log::info!("[{}] Cleared all items (commit #{})", self.session_id, receipt.commit);
    }

    pub fn delete_item(&self, id: ItemId) {
        let _flusher = FlushLater::new(self);
        self.store
            .borrow_mut()
            .commit_one(ItemEvent::item_deleted(id));
    }

    pub fn select_item(&self, id: ItemId) {
        let _flusher = FlushLater::new(self);
        self.store
            .borrow_mut()
            .commit_one(ItemEvent::ui_state_set(Some(id)));
    }

    pub fn clear_selection(&self) {
        let _flusher = FlushLater::new(self);
        self.store
            .borrow_mut()
            .commit_one(ItemEvent::ui_state_set(None));
    }

    pub fn all_items(&self) -> im::Vector<Item> {
        self.store.borrow().query(&state::all_items)
    }

    pub fn ui_state(&self) -> UiState {
        self.store.borrow().query(&state::ui_state)
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.ui_state().selected == Some(id)
    }

    /// `callback` gets the current list right away, then the new list after every commit that changes it.
    pub fn subscribe_items(
        &self,
        callback: impl Fn(im::Vector<Item>) + 'static,
    ) -> SubscriptionKey {
        let _flusher = FlushLater::new(self);
        self.store
            .borrow_mut()
            .subscribe(state::all_items, callback)
    }

    pub fn subscribe_ui_state(&self, callback: impl Fn(UiState) + 'static) -> SubscriptionKey {
        let _flusher = FlushLater::new(self);
        self.store
            .borrow_mut()
            .subscribe(state::ui_state, callback)
    }

    pub fn unsubscribe(&self, key: SubscriptionKey) -> bool {
        self.store.borrow_mut().unsubscribe(key)
    }

    pub fn num_events(&self) -> usize {
        self.store.borrow().num_events()
    }

    pub fn num_commits(&self) -> u64 {
        self.store.borrow().num_commits()
    }

    pub fn export_events_json(&self) -> Result<Vec<serde_json::Value>, HarnessError> {
        Ok(self.store.borrow().export_json()?)
    }

    fn flush_notifications(&self) {
        // collect first so the store isn't borrowed while callbacks run
        let notifications = self.store.borrow_mut().drain_due_notifications();
        for notification in notifications {
            notification();
        }
    }
}

fn check_batch_size(batch_size: usize) -> Result<(), HarnessError> {
    if (MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&batch_size) {
        Ok(())
    } else {
        Err(HarnessError::BatchSize(batch_size))
    }
}

struct FlushLater<'a> {
    harness: &'a Harness,
}

impl<'a> FlushLater<'a> {
    fn new(harness: &'a Harness) -> Self {
        Self { harness }
    }
}

impl Drop for FlushLater<'_> {
    fn drop(&mut self) {
        self.harness.flush_notifications();
    }
}
