use logbook::{Committed, Materialized};

use crate::events::ItemEvent;
use crate::workload::{Item, ItemId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub struct UiState {
    pub selected: Option<ItemId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemsState {
    items: im::OrdMap<ItemId, Item>,
    ui: UiState,
}

impl ItemsState {
    pub fn items(&self) -> &im::OrdMap<ItemId, Item> {
        &self.items
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }
}

impl Materialized for ItemsState {
    type Event = ItemEvent;

    fn apply_event(mut self, event: &Committed<Self::Event>) -> Self {
        match &event.event {
            // a repeated id replaces the earlier item
            ItemEvent::ItemCreated(item) => {
                self.items.insert(item.id, item.clone());
            }
            ItemEvent::ItemsCreated(items) => {
                for item in items {
                    self.items.insert(item.id, item.clone());
                }
            }
            ItemEvent::ItemDeleted(id) => {
                self.items.remove(id);
            }
            ItemEvent::AllItemsDeleted => {
                self.items = im::OrdMap::new();
            }
            ItemEvent::UiStateSet(ui) => {
                self.ui = *ui;
            }
        }
        self
    }
}

/// Every item that was created and not deleted since, by id.
pub fn all_items(state: &ItemsState) -> im::Vector<Item> {
    state.items.values().cloned().collect()
}

pub fn ui_state(state: &ItemsState) -> UiState {
    state.ui
}
