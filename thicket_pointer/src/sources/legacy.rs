// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The legacy unified-pointer input source.
//!
//! Identical to the native source except that the platform reports device
//! kinds as numeric codes.

use hashbrown::HashSet;

use thicket_scope_tree::NodeId;

use crate::event::{PointerEventKind, PointerType, SourceTag};
use crate::raw::{PointerPhase, RawEvent, RawKind, RawPointer};
use crate::source::{InputSource, SourceCtx};

use super::pointer::{prepare, route};

/// Device kind for a legacy numeric code.
fn type_from_code(code: u8) -> PointerType {
    match code {
        2 => PointerType::Touch,
        3 => PointerType::Pen,
        4 => PointerType::Mouse,
        _ => PointerType::Legacy,
    }
}

/// Normalizes a legacy unified-pointer stream.
#[derive(Debug, Default)]
pub struct LegacySource {
    registered: HashSet<NodeId>,
}

impl LegacySource {
    /// A source with no registered nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for LegacySource {
    fn events(&self) -> &'static [RawKind] {
        &[
            RawKind::LegacyDown,
            RawKind::LegacyMove,
            RawKind::LegacyUp,
            RawKind::LegacyCancel,
        ]
    }

    fn exposes(&self) -> &'static [&'static str] {
        &["down", "up", "move"]
    }

    fn register(&mut self, node: NodeId) {
        self.registered.insert(node);
    }

    fn unregister(&mut self, node: NodeId) {
        self.registered.remove(&node);
    }

    fn handle(&mut self, raw: &RawEvent, ctx: &mut SourceCtx<'_>) {
        if self.registered.is_empty() {
            return;
        }
        let RawEvent::Legacy(raw) = raw else { return };
        let kind = match raw.kind {
            PointerPhase::Down => PointerEventKind::Down,
            PointerPhase::Move => PointerEventKind::Move,
            PointerPhase::Up => PointerEventKind::Up,
            PointerPhase::Cancel => PointerEventKind::Cancel,
        };
        let normalized = RawPointer {
            pointer_type: type_from_code(raw.type_code),
            ..raw.clone()
        };
        let event = prepare(&normalized, kind, SourceTag::Legacy);
        route(&normalized, ctx, event);
    }
}
