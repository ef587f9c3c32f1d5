// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mouse input source.

use hashbrown::HashSet;

use thicket_scope_tree::NodeId;

use crate::event::{
    Buttons, MOUSE_POINTER_ID, PointerEvent, PointerEventKind, PointerType, SourceTag,
    default_pressure,
};
use crate::raw::{MousePhase, RawEvent, RawKind, RawMouse};
use crate::source::{InputSource, SourceCtx};

/// Radius around a recently-ended touch inside which compat mouse events are
/// swallowed.
const DEDUP_DIST: f64 = 25.0;

/// Buttons mask for the legacy 1-based `which` indicator.
fn which_to_buttons(which: u8) -> Buttons {
    match which {
        1 => Buttons::PRIMARY,
        2 => Buttons::AUXILIARY,
        3 => Buttons::SECONDARY,
        _ => Buttons::empty(),
    }
}

/// Normalizes a raw mouse stream onto the reserved mouse pointer id.
///
/// Platforms synthesize compatibility mouse events after touches; any mouse
/// event landing near a recently-ended primary touch is dropped. A `down`
/// arriving while the mouse pointer is still live first replays the missed
/// `up`.
#[derive(Debug, Default)]
pub struct MouseSource {
    registered: HashSet<NodeId>,
}

impl MouseSource {
    /// A source with no registered nodes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare(&self, raw: &RawMouse, kind: PointerEventKind) -> PointerEvent {
        let buttons = raw.buttons.unwrap_or_else(|| which_to_buttons(raw.which));
        let mut event = PointerEvent::new(kind, MOUSE_POINTER_ID, PointerType::Mouse);
        event.client = raw.client;
        event.page = raw.page;
        event.screen = raw.screen;
        event.is_primary = true;
        event.buttons = buttons;
        event.pressure = default_pressure(buttons);
        event.detail = raw.detail;
        event.modifiers = raw.modifiers;
        event.source = SourceTag::Mouse;
        event.time_stamp = raw.time_stamp;
        event.native = raw.native.clone();
        event
    }

    fn mouse_down(&mut self, raw: &RawMouse, ctx: &mut SourceCtx<'_>) {
        if ctx.has_pointer(MOUSE_POINTER_ID) {
            // Some platforms drop the mouseup; recover before the new press.
            self.mouse_up(raw, ctx);
        }
        let mut event = self.prepare(raw, PointerEventKind::Down);
        let target = ctx.find_target(&raw.probe());
        event.target = Some(target);
        ctx.set_pointer(MOUSE_POINTER_ID, target);
        ctx.down(event);
    }

    fn mouse_move(&mut self, raw: &RawMouse, ctx: &mut SourceCtx<'_>) {
        let Some(target) = ctx.pointer_target(MOUSE_POINTER_ID) else {
            return;
        };
        let mut event = self.prepare(raw, PointerEventKind::Move);
        event.target = Some(target);
        if event.buttons.is_empty() {
            // Every button came up without a mouseup reaching us.
            ctx.cancel(event);
            ctx.remove_pointer(MOUSE_POINTER_ID);
        } else {
            ctx.moved(event);
        }
    }

    fn mouse_up(&mut self, raw: &RawMouse, ctx: &mut SourceCtx<'_>) {
        let mut event = self.prepare(raw, PointerEventKind::Up);
        event.related_target = Some(ctx.find_target(&raw.probe()));
        event.target = ctx.pointer_target(MOUSE_POINTER_ID);
        ctx.up(event);
        ctx.remove_pointer(MOUSE_POINTER_ID);
    }
}

impl InputSource for MouseSource {
    fn events(&self) -> &'static [RawKind] {
        &[RawKind::MouseDown, RawKind::MouseMove, RawKind::MouseUp]
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
        let RawEvent::Mouse(raw) = raw else { return };
        if ctx.near_recent_touch(raw.client, raw.time_stamp, DEDUP_DIST) {
            return;
        }
        match raw.kind {
            MousePhase::Down => self.mouse_down(raw, ctx),
            MousePhase::Move => self.mouse_move(raw, ctx),
            MousePhase::Up => self.mouse_up(raw, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn which_maps_to_buttons() {
        assert_eq!(which_to_buttons(0), Buttons::empty());
        assert_eq!(which_to_buttons(1), Buttons::PRIMARY);
        assert_eq!(which_to_buttons(2), Buttons::AUXILIARY);
        assert_eq!(which_to_buttons(3), Buttons::SECONDARY);
        assert_eq!(which_to_buttons(9), Buttons::empty());
    }
}
