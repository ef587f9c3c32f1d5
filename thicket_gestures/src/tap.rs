// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tap recognizer: a quick down-and-up denoting activation.
//!
//! On a primary, unsuppressed `down` the recognizer records the target,
//! buttons, and position. On the matching `up` it validates the interaction
//! (mouse: the primary button was held at down; other pointers: no
//! suppression happened) and dispatches `tap` on the lowest common ancestor
//! of the down target and the element under the pointer at release — so a
//! press that slides between siblings still taps their shared container.
//! The stored state is cleared for the pointer regardless of the outcome,
//! and any listener can veto an in-flight tap through the interaction's
//! suppression handle.

use kurbo::Point;

use thicket_scope_tree::NodeId;

use thicket_pointer::{
    AnyEvent, Buttons, GestureCtx, GestureRecognizer, PointerEvent, PointerMap, PointerType,
    TapEvent,
};

#[derive(Clone, Debug)]
struct TapStart {
    target: Option<NodeId>,
    buttons: Buttons,
    #[expect(dead_code, reason = "recorded with the rest of the down state")]
    client: Point,
}

fn should_tap(event: &PointerEvent, start: &TapStart) -> bool {
    // Suppression at any point of the interaction is final.
    if event.tap_prevented() {
        return false;
    }
    if event.pointer_type == PointerType::Mouse {
        // Only the primary button taps for a mouse.
        return start.buttons == Buttons::PRIMARY;
    }
    true
}

/// The tap recognizer.
#[derive(Debug, Default)]
pub struct TapRecognizer {
    pointers: PointerMap<TapStart>,
}

impl TapRecognizer {
    /// A recognizer with no pending taps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GestureRecognizer for TapRecognizer {
    fn exposes(&self) -> &'static [&'static str] {
        &["tap"]
    }

    fn down(&mut self, event: &PointerEvent, _ctx: &mut GestureCtx<'_>) {
        if event.is_primary && !event.tap_prevented() {
            self.pointers.set(
                event.pointer_id,
                TapStart {
                    target: event.target,
                    buttons: event.buttons,
                    client: event.client,
                },
            );
        }
    }

    fn up(&mut self, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
        if let Some(start) = self.pointers.get(event.pointer_id) {
            if should_tap(event, start) {
                let target = ctx.lowest_common_ancestor(start.target, event.related_target);
                ctx.dispatch(AnyEvent::Tap(TapEvent {
                    target,
                    client: event.client,
                    detail: event.detail,
                    pointer_type: event.pointer_type,
                    pointer_id: event.pointer_id,
                    modifiers: event.modifiers,
                    suppress: event.suppress.clone(),
                }));
            }
        }
        self.pointers.delete(event.pointer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_pointer::{MOUSE_POINTER_ID, PointerEventKind, PointerId};

    fn up_event(pointer_type: PointerType) -> PointerEvent {
        PointerEvent::new(PointerEventKind::Up, PointerId(7), pointer_type)
    }

    fn start_with(buttons: Buttons) -> TapStart {
        TapStart {
            target: None,
            buttons,
            client: Point::ZERO,
        }
    }

    #[test]
    fn mouse_taps_only_with_the_primary_button() {
        let up = up_event(PointerType::Mouse);
        assert!(should_tap(&up, &start_with(Buttons::PRIMARY)));
        assert!(!should_tap(&up, &start_with(Buttons::SECONDARY)));
        assert!(!should_tap(&up, &start_with(Buttons::PRIMARY | Buttons::SECONDARY)));
    }

    #[test]
    fn non_mouse_taps_unless_suppressed() {
        let up = up_event(PointerType::Touch);
        assert!(should_tap(&up, &start_with(Buttons::empty())));
        up.prevent_tap();
        assert!(!should_tap(&up, &start_with(Buttons::empty())));
    }

    #[test]
    fn suppression_outranks_the_mouse_button() {
        let mut up = up_event(PointerType::Mouse);
        up.pointer_id = MOUSE_POINTER_ID;
        up.prevent_tap();
        assert!(!should_tap(&up, &start_with(Buttons::PRIMARY)));
    }
}
