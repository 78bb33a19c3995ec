//! The page's view of the harness. Everything here is a thin wrapper that converts to and from JS values.

use std::sync::LazyLock;

use logbook::SubscriptionKey;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{CommitReport, CommitStrategy, Harness, HarnessConfig, ItemId, UiState};

// putting this inside LOGGER prevents us from accidentally initializing the logger more than once
static LOGGER: LazyLock<()> = LazyLock::new(|| {
    set_panic_hook();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
});

fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct ReproApp {
    harness: Harness,
}

#[wasm_bindgen]
impl ReproApp {
    #[wasm_bindgen(constructor)]
    pub fn new(config: HarnessConfig) -> Result<ReproApp, JsError> {
        LazyLock::force(&LOGGER);

        Ok(Self {
            harness: Harness::new(config)?,
        })
    }

    #[wasm_bindgen(getter)]
    pub fn session_id(&self) -> String {
        self.harness.session_id().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn batch_size(&self) -> usize {
        self.harness.batch_size()
    }

    pub fn set_batch_size(&self, batch_size: usize) -> Result<(), JsError> {
        Ok(self.harness.set_batch_size(batch_size)?)
    }

    pub fn caption(&self, strategy: CommitStrategy) -> String {
        strategy.caption(self.harness.batch_size())
    }

    pub fn create_items(&self, strategy: CommitStrategy) -> CommitReport {
        self.harness.create_items(strategy)
    }

    pub fn clear_all(&self) {
        self.harness.clear_all()
    }

    // ids are handed to JS as plain numbers, so take them back the same way
    pub fn delete_item(&self, id: f64) {
        self.harness.delete_item(ItemId(id as u64))
    }

    pub fn select_item(&self, id: f64) {
        self.harness.select_item(ItemId(id as u64))
    }

    pub fn clear_selection(&self) {
        self.harness.clear_selection()
    }

    pub fn is_selected(&self, id: f64) -> bool {
        self.harness.is_selected(ItemId(id as u64))
    }

    pub fn all_items(&self) -> Result<JsValue, JsError> {
        let items: Vec<_> = self.harness.all_items().into_iter().collect();
        Ok(serde_wasm_bindgen::to_value(&items)?)
    }

    pub fn ui_state(&self) -> UiState {
        self.harness.ui_state()
    }

    pub fn subscribe_items(&self, callback: js_sys::Function) -> SubscriptionKey {
        self.harness.subscribe_items(move |items| {
            let items: Vec<_> = items.into_iter().collect();
            match serde_wasm_bindgen::to_value(&items) {
                Ok(items) => {
                    let _ = callback.call1(&JsValue::null(), &items);
                }
                Err(e) => log::error!("Error converting items for JS: {e:?}"),
            }
        })
    }

    pub fn subscribe_ui_state(&self, callback: js_sys::Function) -> SubscriptionKey {
        self.harness.subscribe_ui_state(move |ui_state| {
            match serde_wasm_bindgen::to_value(&ui_state) {
                Ok(ui_state) => {
                    let _ = callback.call1(&JsValue::null(), &ui_state);
                }
                Err(e) => log::error!("Error converting UI state for JS: {e:?}"),
            }
        })
    }

    pub fn unsubscribe(&self, key: SubscriptionKey) -> bool {
        self.harness.unsubscribe(key)
    }

    /// The event log as an array of versioned JSON objects.
    pub fn export_events_json(&self) -> Result<JsValue, JsError> {
        let events = self.harness.export_events_json()?;
        // plain objects rather than JS `Map`s
        Ok(events.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
    }

    #[wasm_bindgen(getter)]
    pub fn num_events(&self) -> usize {
        self.harness.num_events()
    }

    #[wasm_bindgen(getter)]
    pub fn num_commits(&self) -> f64 {
        self.harness.num_commits() as f64
    }
}
