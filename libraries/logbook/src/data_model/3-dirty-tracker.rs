//! # DirtyTracker
//! A DirtyTracker is a wrapper around any type that counts how many times it has been handed out mutably.
//! Subscriptions remember the generation they last saw, so after a commit the store knows which live queries
//! have to be re-run without diffing the state itself.

use std::ops::{Deref, DerefMut};

#[derive(Clone, Debug, Default)]
pub struct DirtyTracker<T> {
    value: T,
    generation: u64,
}

/// Smart pointer that bumps the generation (once) when dereferenced mutably
pub struct DirtyOnDerefMut<'a, T> {
    value: &'a mut T,
    generation: &'a mut u64,
    marked: bool,
}

impl<T> Deref for DirtyOnDerefMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.value
    }
}

impl<T> DerefMut for DirtyOnDerefMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        if !self.marked {
            self.marked = true;
            *self.generation += 1;
        }
        self.value
    }
}

impl<T> DirtyTracker<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn value_mut(&mut self) -> DirtyOnDerefMut<'_, T> {
        DirtyOnDerefMut {
            value: &mut self.value,
            generation: &mut self.generation,
            marked: false,
        }
    }

    /// A subscriber that last saw `seen` has to be re-run.
    pub fn is_dirty_for(&self, seen: Option<u64>) -> bool {
        seen != Some(self.generation)
    }
}
