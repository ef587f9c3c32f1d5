// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observability hooks for event dispatch.
//!
//! The engine intentionally stores no history of what it dispatched. For
//! embedders that want to answer "why did this gesture (not) fire?", this
//! module provides a minimal, additive callback sink the engine reports its
//! decisions through, plus a small recorder that accumulates them.
//!
//! Install a sink with [`PointerEngine::set_trace`]; the default is no sink
//! and zero overhead beyond an `Option` check.
//!
//! [`PointerEngine::set_trace`]: crate::PointerEngine::set_trace

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use thicket_scope_tree::NodeId;

use crate::event::{PointerEventKind, PointerId};
use crate::recognizer::RecognizerSet;

/// A callback sink for dispatch decisions.
///
/// All methods default to no-ops so sinks implement only what they need.
pub trait InputTrace {
    /// A canonical event was synthesized and dispatched.
    fn canonical(&mut self, _kind: PointerEventKind, _pointer: PointerId, _target: Option<NodeId>) {
    }

    /// A required-recognizer set was computed for a new interaction.
    fn required_set(&mut self, _pointer: PointerId, _set: RecognizerSet) {}

    /// A canonical event snapshot was queued for the next frame flush.
    fn enqueued(&mut self, _kind: PointerEventKind, _pointer: PointerId) {}

    /// The gesture queue was flushed with this many events.
    fn flushed(&mut self, _events: usize) {}

    /// An event was delivered to listeners on a node.
    fn delivered(&mut self, _name: &str, _node: NodeId) {}

    /// A duplicate raw event was dropped by the already-handled guard.
    fn duplicate_raw(&mut self) {}
}

/// One recorded dispatch decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEntry {
    /// A canonical event was synthesized and dispatched.
    Canonical {
        /// The canonical event type.
        kind: PointerEventKind,
        /// The pointer it belongs to.
        pointer: PointerId,
        /// Its resolved dispatch target.
        target: Option<NodeId>,
    },
    /// A required-recognizer set was computed for a new interaction.
    RequiredSet {
        /// The pointer the interaction belongs to.
        pointer: PointerId,
        /// The computed set.
        set: RecognizerSet,
    },
    /// A canonical event snapshot was queued for the next frame flush.
    Enqueued {
        /// The canonical event type.
        kind: PointerEventKind,
        /// The pointer it belongs to.
        pointer: PointerId,
    },
    /// The gesture queue was flushed.
    Flushed {
        /// How many events the flush replayed.
        events: usize,
    },
    /// An event was delivered to listeners on a node.
    Delivered {
        /// The gesture name delivered under.
        name: String,
        /// The node whose listeners ran.
        node: NodeId,
    },
    /// A duplicate raw event was dropped.
    DuplicateRaw,
}

/// An [`InputTrace`] that records every decision.
///
/// Clones share the same entry list, so a test can keep one clone and hand
/// the other to the engine.
#[derive(Clone, Debug, Default)]
pub struct TraceRecorder {
    entries: Rc<RefCell<Vec<TraceEntry>>>,
}

impl TraceRecorder {
    /// An empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.borrow().clone()
    }

    /// Drops all recorded entries.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl InputTrace for TraceRecorder {
    fn canonical(&mut self, kind: PointerEventKind, pointer: PointerId, target: Option<NodeId>) {
        self.entries.borrow_mut().push(TraceEntry::Canonical {
            kind,
            pointer,
            target,
        });
    }

    fn required_set(&mut self, pointer: PointerId, set: RecognizerSet) {
        self.entries
            .borrow_mut()
            .push(TraceEntry::RequiredSet { pointer, set });
    }

    fn enqueued(&mut self, kind: PointerEventKind, pointer: PointerId) {
        self.entries
            .borrow_mut()
            .push(TraceEntry::Enqueued { kind, pointer });
    }

    fn flushed(&mut self, events: usize) {
        self.entries.borrow_mut().push(TraceEntry::Flushed { events });
    }

    fn delivered(&mut self, name: &str, node: NodeId) {
        self.entries.borrow_mut().push(TraceEntry::Delivered {
            name: String::from(name),
            node,
        });
    }

    fn duplicate_raw(&mut self) {
        self.entries.borrow_mut().push(TraceEntry::DuplicateRaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_clones_share_entries() {
        let recorder = TraceRecorder::new();
        let mut sink = recorder.clone();
        sink.flushed(3);
        sink.duplicate_raw();
        assert_eq!(
            recorder.entries(),
            [TraceEntry::Flushed { events: 3 }, TraceEntry::DuplicateRaw]
        );
        recorder.clear();
        assert!(recorder.entries().is_empty());
    }
}
