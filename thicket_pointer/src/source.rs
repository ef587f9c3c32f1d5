// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input-source interface.
//!
//! An input source normalizes one platform event stream into canonical
//! pointer events. It declares the raw event kinds it consumes and the
//! canonical names it can produce, accepts node registration as listeners
//! come and go, and drives the canonical lifecycle through the
//! [`SourceCtx`] it is handed per raw event.

use core::fmt;

use kurbo::Point;
use smallvec::SmallVec;

use thicket_scope_tree::{HitProbe, NodeId, ScopeTree, TouchAction};

use crate::engine::EngineCore;
use crate::event::{PointerEvent, PointerId};
use crate::host::{FrameHost, TimerHost, TimerId};
use crate::raw::{RawEvent, RawKind};

/// A normalizer for one platform event stream.
///
/// At most one platform source set is active at a time — mouse and touch
/// together, or a single unified-pointer source — chosen once at startup by
/// the embedder's capability probing (see
/// [`sources::install`](crate::sources::install)).
pub trait InputSource {
    /// The raw event kinds this source consumes.
    fn events(&self) -> &'static [RawKind];

    /// The canonical names this source can produce.
    fn exposes(&self) -> &'static [&'static str];

    /// A node gained its first listener; start observing raw events for it.
    fn register(&mut self, node: NodeId);

    /// A node lost its last listener; stop observing raw events for it.
    fn unregister(&mut self, node: NodeId);

    /// Normalize one raw event, driving the canonical lifecycle through
    /// `ctx`.
    fn handle(&mut self, raw: &RawEvent, ctx: &mut SourceCtx<'_>);

    /// A timer this source scheduled through [`SourceCtx::set_timeout`]
    /// fired.
    fn timer(&mut self, _id: TimerId, _now: u64, _ctx: &mut SourceCtx<'_>) {}
}

/// What a source may do while handling a raw event: resolve targets, use the
/// shared pointer store, drive the canonical lifecycle, manage the
/// mouse-compat dedup list, and schedule timers.
pub struct SourceCtx<'a> {
    tree: &'a ScopeTree,
    core: &'a mut EngineCore,
    frames: &'a mut dyn FrameHost,
    timers: &'a mut dyn TimerHost,
    source: usize,
}

impl<'a> SourceCtx<'a> {
    pub(crate) fn new(
        tree: &'a ScopeTree,
        core: &'a mut EngineCore,
        frames: &'a mut dyn FrameHost,
        timers: &'a mut dyn TimerHost,
        source: usize,
    ) -> Self {
        Self {
            tree,
            core,
            frames,
            timers,
            source,
        }
    }

    /// The document model events resolve against.
    #[must_use]
    pub fn tree(&self) -> &ScopeTree {
        self.tree
    }

    /// Resolves the true origin element for a raw event.
    #[must_use]
    pub fn find_target(&self, probe: &HitProbe<'_>) -> NodeId {
        thicket_scope_tree::find_target(self.tree, probe)
    }

    /// Resolves the effective scroll-policy attribute for a raw event.
    #[must_use]
    pub fn find_touch_action(&self, probe: &HitProbe<'_>) -> TouchAction {
        thicket_scope_tree::find_touch_action(self.tree, probe)
    }

    // The shared per-pointer state store ------------------------------------

    /// Records a pointer's last-known target.
    pub fn set_pointer(&mut self, id: PointerId, target: NodeId) {
        self.core.set_pointer(id, target);
    }

    /// A live pointer's last-known target.
    #[must_use]
    pub fn pointer_target(&self, id: PointerId) -> Option<NodeId> {
        self.core.pointer_target(id)
    }

    /// Whether a pointer id is live.
    #[must_use]
    pub fn has_pointer(&self, id: PointerId) -> bool {
        self.core.has_pointer(id)
    }

    /// Removes a pointer from the store.
    pub fn remove_pointer(&mut self, id: PointerId) {
        self.core.remove_pointer(id);
    }

    /// The number of live pointers.
    #[must_use]
    pub fn live_pointers(&self) -> usize {
        self.core.live_pointers()
    }

    /// Snapshot of every live pointer and its last-known target, in no
    /// particular order.
    #[must_use]
    pub fn pointer_entries(&self) -> SmallVec<[(PointerId, NodeId); 8]> {
        self.core.pointer_entries()
    }

    // Canonical lifecycle ---------------------------------------------------

    /// Routes a canonical `down`, freezing the interaction's
    /// required-recognizer set.
    pub fn down(&mut self, event: PointerEvent) {
        self.core.down(self.tree, &mut *self.frames, event);
    }

    /// Routes a canonical `move` straight into the gesture queue.
    ///
    /// Named `moved` because `move` is reserved.
    pub fn moved(&mut self, event: PointerEvent) {
        self.core.moved(&mut *self.frames, event);
    }

    /// Routes a canonical `up` and forgets the interaction.
    pub fn up(&mut self, event: PointerEvent) {
        self.core.up(self.tree, &mut *self.frames, event);
    }

    /// Routes a canonical `cancel`: a gesture-suppressing `up`.
    pub fn cancel(&mut self, event: PointerEvent) {
        self.core.cancel(self.tree, &mut *self.frames, event);
    }

    // Mouse-compat dedup ----------------------------------------------------

    /// Remembers a primary-touch position so compat mouse events near it are
    /// swallowed until `until` (milliseconds on the embedder's clock).
    pub fn arm_mouse_dedup(&mut self, pos: Point, until: u64) {
        self.core.arm_mouse_dedup(pos, until);
    }

    /// Whether a position falls within `radius` of a recently-ended touch.
    /// Expired entries are pruned against `now`.
    #[must_use]
    pub fn near_recent_touch(&mut self, pos: Point, now: u64, radius: f64) -> bool {
        self.core.near_recent_touch(pos, now, radius)
    }

    // Timers ----------------------------------------------------------------

    /// Schedules a one-shot timer owned by this source; its
    /// [`InputSource::timer`] callback fires once.
    pub fn set_timeout(&mut self, delay_ms: u64) -> TimerId {
        let id = self.core.alloc_timer_for_source(self.source, false);
        self.timers.set_timeout(id, delay_ms);
        id
    }

    /// Cancels a timer scheduled by this source.
    pub fn clear_timer(&mut self, id: TimerId) {
        self.core.drop_timer(id);
        self.timers.clear(id);
    }
}

impl fmt::Debug for SourceCtx<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceCtx")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
