// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pointer state storage.

use hashbrown::HashMap;

use crate::event::PointerId;

/// A map from pointer id to per-pointer state.
///
/// The engine keeps one of these for last-known targets and one for
/// required-recognizer sets; recognizers keep their own for private state.
/// Exactly one entry exists per live pointer id, ids are never reused while
/// live, and no iteration order is guaranteed. All operations are O(1)
/// amortized.
///
/// ```
/// use thicket_pointer::{PointerId, PointerMap};
///
/// let mut map: PointerMap<u32> = PointerMap::new();
/// map.set(PointerId(3), 7);
/// assert!(map.has(PointerId(3)));
/// assert_eq!(map.get(PointerId(3)), Some(&7));
/// assert_eq!(map.pointers(), 1);
/// map.delete(PointerId(3));
/// assert_eq!(map.pointers(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct PointerMap<V> {
    entries: HashMap<PointerId, V>,
}

impl<V> Default for PointerMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PointerMap<V> {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts or replaces the state for a pointer id.
    pub fn set(&mut self, id: PointerId, value: V) {
        self.entries.insert(id, value);
    }

    /// The state for a pointer id, if tracked.
    #[must_use]
    pub fn get(&self, id: PointerId) -> Option<&V> {
        self.entries.get(&id)
    }

    /// Mutable state for a pointer id, if tracked.
    #[must_use]
    pub fn get_mut(&mut self, id: PointerId) -> Option<&mut V> {
        self.entries.get_mut(&id)
    }

    /// Whether the pointer id is tracked.
    #[must_use]
    pub fn has(&self, id: PointerId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Removes and returns the state for a pointer id.
    pub fn delete(&mut self, id: PointerId) -> Option<V> {
        self.entries.remove(&id)
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Visits every entry as `(value, id)`, in no particular order.
    pub fn for_each(&self, mut f: impl FnMut(&V, PointerId)) {
        for (&id, value) in &self.entries {
            f(value, id);
        }
    }

    /// The number of tracked pointers.
    #[must_use]
    pub fn pointers(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn set_get_delete() {
        let mut map = PointerMap::new();
        map.set(PointerId(1), "mouse");
        map.set(PointerId(2), "touch");
        assert_eq!(map.get(PointerId(1)), Some(&"mouse"));
        assert!(map.has(PointerId(2)));
        assert_eq!(map.pointers(), 2);

        assert_eq!(map.delete(PointerId(1)), Some("mouse"));
        assert_eq!(map.delete(PointerId(1)), None);
        assert_eq!(map.pointers(), 1);
    }

    #[test]
    fn set_replaces_existing() {
        let mut map = PointerMap::new();
        map.set(PointerId(5), 1);
        map.set(PointerId(5), 2);
        assert_eq!(map.pointers(), 1);
        assert_eq!(map.get(PointerId(5)), Some(&2));
    }

    #[test]
    fn clear_and_for_each() {
        let mut map = PointerMap::new();
        map.set(PointerId(1), 10);
        map.set(PointerId(3), 30);
        let mut seen: Vec<(PointerId, i32)> = Vec::new();
        map.for_each(|&v, id| seen.push((id, v)));
        seen.sort();
        assert_eq!(seen, [(PointerId(1), 10), (PointerId(3), 30)]);

        map.clear();
        assert_eq!(map.pointers(), 0);
    }
}
