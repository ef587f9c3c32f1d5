// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recognizer interface and the per-interaction activation set.

use core::fmt;

use thicket_scope_tree::{NodeId, ScopeTree, TouchAction};

use crate::engine::EngineCore;
use crate::event::{AnyEvent, PointerEvent};
use crate::host::{TimerHost, TimerId};

/// Slot-indexed set of recognizers required for one interaction.
///
/// Computed once per interaction when its `down` is processed, from the
/// gesture listeners reachable on the down target's ancestor path, and
/// attached to every event queued for that pointer until the pointer is
/// removed. Never recomputed mid-interaction: listeners added or removed
/// mid-drag do not retroactively affect an in-flight interaction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RecognizerSet(u64);

impl RecognizerSet {
    /// The maximum number of recognizer slots.
    pub const CAPACITY: usize = 64;

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds a slot to the set. Out-of-range slots are ignored.
    pub fn insert(&mut self, slot: usize) {
        if slot < Self::CAPACITY {
            self.0 |= 1 << slot;
        }
    }

    /// Whether a slot is in the set.
    #[must_use]
    pub const fn contains(self, slot: usize) -> bool {
        slot < Self::CAPACITY && self.0 & (1 << slot) != 0
    }

    /// Whether no slots are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// A gesture recognizer: a small state machine keyed by pointer id that
/// consumes canonical pointer events and emits gesture events.
///
/// Recognizers are registered once with the engine, which assigns each a
/// slot. During a frame flush a recognizer's callback runs for a queued event
/// if and only if its slot is in that event's [`RecognizerSet`] — recognizers
/// nobody listens for are never invoked. Callbacks default to no-ops so a
/// recognizer implements only the phases it consumes.
pub trait GestureRecognizer {
    /// The gesture names this recognizer can emit, lower-cased.
    fn exposes(&self) -> &'static [&'static str];

    /// Scroll-policy attributes to apply to nodes that first listen for one
    /// of the exposed gestures, unless the node already declares one.
    fn default_actions(&self) -> &'static [(&'static str, TouchAction)] {
        &[]
    }

    /// A canonical `down` was queued for a required interaction.
    fn down(&mut self, _event: &PointerEvent, _ctx: &mut GestureCtx<'_>) {}

    /// A canonical `move` was queued for a required interaction.
    ///
    /// Named `moved` because `move` is reserved.
    fn moved(&mut self, _event: &PointerEvent, _ctx: &mut GestureCtx<'_>) {}

    /// A canonical `up` was queued for a required interaction. Canonical
    /// cancels arrive here too, with the interaction marked tap-ineligible.
    fn up(&mut self, _event: &PointerEvent, _ctx: &mut GestureCtx<'_>) {}

    /// A timer this recognizer scheduled through
    /// [`GestureCtx::start_interval`] fired.
    fn timer(&mut self, _id: TimerId, _now: u64, _ctx: &mut GestureCtx<'_>) {}
}

/// What a recognizer callback may do: read the tree, dispatch gesture
/// events, and manage its timers.
pub struct GestureCtx<'a> {
    pub(crate) tree: &'a ScopeTree,
    pub(crate) core: &'a mut EngineCore,
    pub(crate) timers: &'a mut dyn TimerHost,
    pub(crate) slot: usize,
}

impl GestureCtx<'_> {
    /// The document model events resolve against.
    #[must_use]
    pub fn tree(&self) -> &ScopeTree {
        self.tree
    }

    /// Dispatches a gesture event on its target, bubbling through ancestors
    /// (host links included) to every listener registered for its name.
    pub fn dispatch(&mut self, event: AnyEvent) {
        self.core.deliver(self.tree, &event);
    }

    /// The lowest common ancestor of two nodes, crossing scope boundaries.
    #[must_use]
    pub fn lowest_common_ancestor(&self, a: Option<NodeId>, b: Option<NodeId>) -> NodeId {
        thicket_scope_tree::lowest_common_ancestor(self.tree, a, b)
    }

    /// Starts a repeating timer owned by this recognizer; its
    /// [`GestureRecognizer::timer`] callback fires each period until the
    /// timer is cleared.
    pub fn start_interval(&mut self, period_ms: u64) -> TimerId {
        let id = self.core.alloc_timer_for_recognizer(self.slot, true);
        self.timers.set_interval(id, period_ms);
        id
    }

    /// Cancels a timer started by this recognizer.
    pub fn clear_timer(&mut self, id: TimerId) {
        self.core.drop_timer(id);
        self.timers.clear(id);
    }
}

impl fmt::Debug for GestureCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureCtx")
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizer_set_bits() {
        let mut set = RecognizerSet::empty();
        assert!(set.is_empty());
        set.insert(0);
        set.insert(5);
        assert!(set.contains(0));
        assert!(set.contains(5));
        assert!(!set.contains(1));
        assert!(!set.is_empty());
    }

    #[test]
    fn out_of_range_slots_are_ignored() {
        let mut set = RecognizerSet::empty();
        set.insert(RecognizerSet::CAPACITY);
        assert!(set.is_empty());
        assert!(!set.contains(RecognizerSet::CAPACITY));
    }
}
