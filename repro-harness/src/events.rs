use logbook::Event;

use crate::state::UiState;
use crate::workload::{Item, ItemId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemEvent {
    ItemCreated(Item),
    /// The whole batch in one payload.
    ItemsCreated(Vec<Item>),
    ItemDeleted(ItemId),
    AllItemsDeleted,
    UiStateSet(UiState),
}

impl ItemEvent {
    pub fn item_created(item: Item) -> Self {
        ItemEvent::ItemCreated(item)
    }

    pub fn items_created(items: Vec<Item>) -> Self {
        ItemEvent::ItemsCreated(items)
    }

    pub fn item_deleted(id: ItemId) -> Self {
        ItemEvent::ItemDeleted(id)
    }

    pub fn all_items_deleted() -> Self {
        ItemEvent::AllItemsDeleted
    }

    pub fn ui_state_set(selected: Option<ItemId>) -> Self {
        ItemEvent::UiStateSet(UiState { selected })
    }
}

/// What actually gets exported. Never change a variant once it has shipped; add a new version instead.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(tag = "name", content = "args")]
pub enum VersionedItemEvent {
    #[serde(rename = "v1.ItemCreated")]
    ItemCreatedV1 { id: ItemId, label: String },
    #[serde(rename = "v1.ItemsCreated")]
    ItemsCreatedV1 { items: Vec<Item> },
    #[serde(rename = "v1.ItemDeleted")]
    ItemDeletedV1 { id: ItemId },
    #[serde(rename = "v1.AllItemsDeleted")]
    AllItemsDeletedV1,
    #[serde(rename = "v1.UiStateSet")]
    UiStateSetV1 { selected: Option<ItemId> },
}

impl From<ItemEvent> for VersionedItemEvent {
    fn from(event: ItemEvent) -> Self {
        match event {
            ItemEvent::ItemCreated(Item { id, label }) => {
                VersionedItemEvent::ItemCreatedV1 { id, label }
            }
            ItemEvent::ItemsCreated(items) => VersionedItemEvent::ItemsCreatedV1 { items },
            ItemEvent::ItemDeleted(id) => VersionedItemEvent::ItemDeletedV1 { id },
            ItemEvent::AllItemsDeleted => VersionedItemEvent::AllItemsDeletedV1,
            ItemEvent::UiStateSet(UiState { selected }) => {
                VersionedItemEvent::UiStateSetV1 { selected }
            }
        }
    }
}

impl From<VersionedItemEvent> for ItemEvent {
    fn from(event: VersionedItemEvent) -> Self {
        match event {
            VersionedItemEvent::ItemCreatedV1 { id, label } => {
                ItemEvent::ItemCreated(Item { id, label })
            }
            VersionedItemEvent::ItemsCreatedV1 { items } => ItemEvent::ItemsCreated(items),
            VersionedItemEvent::ItemDeletedV1 { id } => ItemEvent::ItemDeleted(id),
            VersionedItemEvent::AllItemsDeletedV1 => ItemEvent::AllItemsDeleted,
            VersionedItemEvent::UiStateSetV1 { selected } => {
                ItemEvent::UiStateSet(UiState { selected })
            }
        }
    }
}

impl Event for ItemEvent {
    fn name(&self) -> &'static str {
        match self {
            ItemEvent::ItemCreated(_) => "v1.ItemCreated",
            ItemEvent::ItemsCreated(_) => "v1.ItemsCreated",
            ItemEvent::ItemDeleted(_) => "v1.ItemDeleted",
            ItemEvent::AllItemsDeleted => "v1.AllItemsDeleted",
            ItemEvent::UiStateSet(_) => "v1.UiStateSet",
        }
    }

    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        let versioned = VersionedItemEvent::from(self.clone());
        serde_json::to_value(versioned)
    }

    fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value::<VersionedItemEvent>(json.clone()).map(|versioned| versioned.into())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_names_match_event_names() {
        let events = [
            ItemEvent::item_created(Item {
                id: ItemId(1),
                label: "odd pink pony".to_string(),
            }),
            ItemEvent::items_created(vec![]),
            ItemEvent::item_deleted(ItemId(1)),
            ItemEvent::all_items_deleted(),
            ItemEvent::ui_state_set(None),
        ];
        for event in events {
            let json = event.to_json().unwrap();
            assert_eq!(json["name"], event.name());
        }
    }

    #[test]
    fn test_item_created_payload_shape() {
        let event = ItemEvent::item_created(Item {
            id: ItemId(12),
            label: "tall blue desk".to_string(),
        });
        assert_eq!(
            event.to_json().unwrap(),
            json!({ "name": "v1.ItemCreated", "args": { "id": 12, "label": "tall blue desk" } })
        );
    }

    #[test]
    fn test_decodes_payload_without_args() {
        let event = ItemEvent::from_json(&json!({ "name": "v1.AllItemsDeleted" })).unwrap();
        assert_eq!(event, ItemEvent::AllItemsDeleted);
    }

    #[test]
    fn test_unknown_version_is_an_error() {
        assert!(ItemEvent::from_json(&json!({ "name": "v2.ItemCreated", "args": {} })).is_err());
    }
}
