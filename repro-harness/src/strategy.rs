//! The ways a generated batch can be pushed into the store. They produce the same items; what differs is how many
//! transactions and how many payloads the store has to deal with.

use std::cell::RefCell;

use logbook::Store;

use crate::HarnessError;
use crate::events::ItemEvent;
use crate::state::ItemsState;
use crate::workload::Item;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "kebab-case")]
pub enum CommitStrategy {
    /// N events, 1 commit
    SingleCommit,
    /// N events, N commits
    CommitPerEvent,
    /// 1 event carrying the whole batch, 1 commit
    BulkEvent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(rename_all = "camelCase")]
pub struct CommitReport {
    pub strategy: CommitStrategy,
    pub commits: usize,
    pub events: usize,
    pub items: usize,
}

impl CommitStrategy {
    pub const ALL: [CommitStrategy; 3] = [
        CommitStrategy::SingleCommit,
        CommitStrategy::CommitPerEvent,
        CommitStrategy::BulkEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitStrategy::SingleCommit => "single-commit",
            CommitStrategy::CommitPerEvent => "commit-per-event",
            CommitStrategy::BulkEvent => "bulk-event",
        }
    }

    /// Button caption, e.g. "Create 1000 events (n events, 1 commit)".
    pub fn caption(&self, count: usize) -> String {
        match self {
            CommitStrategy::SingleCommit => format!("Create {count} events (n events, 1 commit)"),
            CommitStrategy::CommitPerEvent => {
                format!("Create {count} events (n events, n commits)")
            }
            CommitStrategy::BulkEvent => format!("Create {count} items (1 event, 1 commit)"),
        }
    }

    /// Commit `items`. `after_commit` runs after every transaction boundary, with the store no longer borrowed.
    /// An empty batch commits nothing, whatever the strategy.
    pub fn apply(
        self,
        store: &RefCell<Store<ItemsState>>,
        items: Vec<Item>,
        mut after_commit: impl FnMut(),
    ) -> CommitReport {
        let mut report = CommitReport {
            strategy: self,
            commits: 0,
            events: 0,
            items: items.len(),
        };
        if items.is_empty() {
            return report;
        }

        match self {
            CommitStrategy::SingleCommit => {
                let receipt = store
                    .borrow_mut()
                    .commit(items.into_iter().map(ItemEvent::item_created));
                if let Some(receipt) = receipt {
                    report.commits += 1;
                    report.events += receipt.events;
                }
                after_commit();
            }
            CommitStrategy::CommitPerEvent => {
                for item in items {
                    let receipt = store.borrow_mut().commit_one(ItemEvent::item_created(item));
                    report.commits += 1;
                    report.events += receipt.events;
                    after_commit();
                }
            }
            CommitStrategy::BulkEvent => {
                let receipt = store
                    .borrow_mut()
                    .commit_one(ItemEvent::items_created(items));
                report.commits += 1;
                report.events += receipt.events;
                after_commit();
            }
        }
        report
    }
}

impl std::fmt::Display for CommitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitStrategy {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommitStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| HarnessError::UnknownStrategy(s.to_string()))
    }
}
