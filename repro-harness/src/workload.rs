use eyedee::SequentialIds;
use rand::Rng;

use crate::labels::random_label;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(target_arch = "wasm32", derive(tsify::Tsify))]
#[cfg_attr(target_arch = "wasm32", tsify(into_wasm_abi, from_wasm_abi))]
pub struct Item {
    pub id: ItemId,
    pub label: String,
}

/// Produce `count` candidate items. Ids come from `ids`, which advances by exactly `count`.
pub fn generate_items<R: Rng + ?Sized>(
    ids: &mut SequentialIds,
    rng: &mut R,
    count: usize,
) -> Vec<Item> {
    ids.take(count)
        .map(|id| Item {
            id: ItemId(id),
            label: random_label(rng),
        })
        .collect()
}
