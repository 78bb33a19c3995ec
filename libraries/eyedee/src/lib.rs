//! Identifiers.
//!
//! - [`SequentialIds`] hands out record ids from an owned counter. Whoever owns the counter decides its scope; ids are
//!   only unique among values taken from the same counter.
//! - [`get_uuid`] names a session.

use std::ops::Range;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequentialIds {
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// The id the next call to [`SequentialIds::take`] will start from.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Reserve `count` consecutive ids. `take(0)` returns an empty range and leaves the counter alone.
    pub fn take(&mut self, count: usize) -> Range<u64> {
        let start = self.next;
        self.next += count as u64;
        start..self.next
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["self", "crypto"])]
    fn randomUUID() -> String;
}

pub fn get_uuid() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        randomUUID()
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_uuid() {
        let uuid1 = get_uuid();
        let uuid2 = get_uuid();

        assert_ne!(uuid1, uuid2);
        assert_eq!(uuid1.len(), 36);
        assert!(uuid1.chars().filter(|&c| c == '-').count() == 4);
    }

    #[test]
    fn test_ids_are_consecutive_and_never_reused() {
        let mut ids = SequentialIds::default();
        assert_eq!(ids.take(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(ids.take(2).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(ids.peek(), 6);
    }

    #[test]
    fn test_taking_zero_ids() {
        let mut ids = SequentialIds::starting_at(42);
        assert!(ids.take(0).is_empty());
        assert_eq!(ids.peek(), 42);
    }
}
