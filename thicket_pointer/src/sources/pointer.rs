// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native unified-pointer input source.

use hashbrown::HashSet;

use thicket_scope_tree::NodeId;

use crate::event::{PointerEvent, PointerEventKind, PointerId, SourceTag, default_pressure};
use crate::raw::{PointerPhase, RawEvent, RawKind, RawPointer};
use crate::source::{InputSource, SourceCtx};

/// Normalizes a platform stream that already speaks unified pointers; only
/// retargeting and bookkeeping are added.
#[derive(Debug, Default)]
pub struct PointerSource {
    registered: HashSet<NodeId>,
}

impl PointerSource {
    /// A source with no registered nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn prepare(raw: &RawPointer, kind: PointerEventKind, tag: SourceTag) -> PointerEvent {
    let mut event = PointerEvent::new(kind, PointerId(raw.pointer_id), raw.pointer_type);
    event.client = raw.client;
    event.page = raw.page;
    event.screen = raw.screen;
    event.is_primary = raw.is_primary;
    event.buttons = raw.buttons;
    event.pressure = if raw.pressure != 0.0 {
        raw.pressure
    } else {
        default_pressure(raw.buttons)
    };
    event.width = raw.width;
    event.height = raw.height;
    event.detail = raw.detail;
    event.modifiers = raw.modifiers;
    event.source = tag;
    event.time_stamp = raw.time_stamp;
    event.native = raw.native.clone();
    event
}

pub(crate) fn route(raw: &RawPointer, ctx: &mut SourceCtx<'_>, mut event: PointerEvent) {
    let id = event.pointer_id;
    match raw.kind {
        PointerPhase::Down => {
            let target = ctx.find_target(&raw.probe());
            event.target = Some(target);
            ctx.set_pointer(id, target);
            ctx.down(event);
        }
        PointerPhase::Move => {
            let Some(target) = ctx.pointer_target(id) else {
                return;
            };
            event.target = Some(target);
            ctx.moved(event);
        }
        PointerPhase::Up => {
            event.related_target = Some(ctx.find_target(&raw.probe()));
            event.target = ctx.pointer_target(id);
            ctx.up(event);
            ctx.remove_pointer(id);
        }
        PointerPhase::Cancel => {
            event.related_target = Some(ctx.find_target(&raw.probe()));
            event.target = ctx.pointer_target(id);
            ctx.cancel(event);
            ctx.remove_pointer(id);
        }
    }
}

impl InputSource for PointerSource {
    fn events(&self) -> &'static [RawKind] {
        &[
            RawKind::PointerDown,
            RawKind::PointerMove,
            RawKind::PointerUp,
            RawKind::PointerCancel,
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
        let RawEvent::Pointer(raw) = raw else { return };
        let kind = match raw.kind {
            PointerPhase::Down => PointerEventKind::Down,
            PointerPhase::Move => PointerEventKind::Move,
            PointerPhase::Up => PointerEventKind::Up,
            PointerPhase::Cancel => PointerEventKind::Cancel,
        };
        let event = prepare(raw, kind, SourceTag::Pointer);
        route(raw, ctx, event);
    }
}
