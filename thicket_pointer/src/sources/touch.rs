// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The multi-touch input source.
//!
//! This is the most involved normalizer: it elects a primary touch, offsets
//! platform identifiers into the canonical id space, arbitrates single-axis
//! native scrolling against the resolved scroll policy, counts rapid taps
//! into a click detail, arms the compat-mouse suppression window, and
//! recovers from touches whose termination event never arrived.

use hashbrown::HashSet;
use kurbo::Point;
use smallvec::SmallVec;

use thicket_scope_tree::{HitProbe, NodeId, TouchAction};

use crate::event::{
    Buttons, MOUSE_POINTER_ID, PointerEvent, PointerEventKind, PointerId, PointerType, SourceTag,
    TOUCH_ID_OFFSET,
};
use crate::host::TimerId;
use crate::raw::{RawEvent, RawKind, RawTouch, TouchPhase, TouchPoint};
use crate::source::{InputSource, SourceCtx};

/// How long after a primary touch ends its position keeps swallowing compat
/// mouse events, in milliseconds.
const DEDUP_TIMEOUT: u64 = 2500;

/// How long after the primary touch lifts the click counter survives, so a
/// rapid tap sequence accumulates its detail count. Milliseconds.
const CLICK_COUNT_TIMEOUT: u64 = 200;

/// Displacement from the down point, in pixels, past which an undecided
/// interaction is handed back to native scrolling.
const HYSTERESIS: f64 = 20.0;

/// Which native scroll axes the resolved policy leaves to the platform.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum ScrollAxis {
    None,
    X,
    Y,
    Both,
}

fn scroll_axis(action: TouchAction) -> ScrollAxis {
    match action {
        TouchAction::None => ScrollAxis::None,
        TouchAction::PanX => ScrollAxis::X,
        TouchAction::PanY => ScrollAxis::Y,
        TouchAction::Auto | TouchAction::PanXY | TouchAction::Manipulation => ScrollAxis::Both,
    }
}

/// Tunables for the touch source.
#[derive(Copy, Clone, Debug, Default)]
pub struct TouchSourceConfig {
    /// Trust the platform's own scroll-policy handling: forward cancelable
    /// touch moves without manual arbitration. Off by default; the manual
    /// arbitration below is the behavior embedders get everywhere.
    pub native_touch_action: bool,
}

/// Normalizes a raw touch stream into canonical pointer events.
#[derive(Debug, Default)]
pub struct TouchSource {
    registered: HashSet<NodeId>,
    config: TouchSourceConfig,
    /// Platform identifier of the elected primary touch.
    first_touch: Option<u64>,
    /// Where the primary touch came down.
    first_xy: Option<Point>,
    /// `None` until scroll intent is decided; `Some(true)` yields to native
    /// scroll, `Some(false)` keeps the interaction.
    scrolling: Option<bool>,
    click_count: u32,
    reset_timer: Option<TimerId>,
}

impl TouchSource {
    /// A source with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source with explicit configuration.
    #[must_use]
    pub fn with_config(config: TouchSourceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    fn canonical_id(identifier: u64) -> PointerId {
        PointerId(identifier + TOUCH_ID_OFFSET)
    }

    fn is_primary(&self, identifier: u64) -> bool {
        self.first_touch == Some(identifier)
    }

    /// Elects a new primary touch, but only when no non-mouse pointer is
    /// currently tracked.
    fn set_primary(&mut self, touch: &TouchPoint, ctx: &mut SourceCtx<'_>) {
        let pointers = ctx.live_pointers();
        if pointers == 0 || (pointers == 1 && ctx.has_pointer(MOUSE_POINTER_ID)) {
            self.first_touch = Some(touch.identifier);
            self.first_xy = Some(touch.client);
            self.scrolling = None;
            if let Some(timer) = self.reset_timer.take() {
                ctx.clear_timer(timer);
            }
        }
    }

    fn start_click_reset(&mut self, ctx: &mut SourceCtx<'_>) {
        if let Some(timer) = self.reset_timer.take() {
            ctx.clear_timer(timer);
        }
        self.reset_timer = Some(ctx.set_timeout(CLICK_COUNT_TIMEOUT));
    }

    fn touch_to_pointer(
        &self,
        touch: &TouchPoint,
        raw: &RawTouch,
        phase: TouchPhase,
        ctx: &SourceCtx<'_>,
    ) -> PointerEvent {
        let id = Self::canonical_id(touch.identifier);
        let mut event = PointerEvent::new(PointerEventKind::Down, id, PointerType::Touch);
        event.target = match phase {
            TouchPhase::Start => {
                let probe = if self.is_primary(touch.identifier) {
                    // The primary touch reuses the platform's own path.
                    HitProbe {
                        client: touch.client,
                        target: raw.target,
                        path: raw.path.as_deref(),
                    }
                } else {
                    HitProbe {
                        client: touch.client,
                        target: raw.target,
                        path: None,
                    }
                };
                Some(ctx.find_target(&probe))
            }
            // Reuse the target found at touchstart.
            _ => ctx.pointer_target(id),
        };
        event.client = touch.client;
        event.page = touch.page;
        event.screen = touch.screen;
        event.is_primary = self.is_primary(touch.identifier);
        event.buttons = match phase {
            TouchPhase::Start | TouchPhase::Move => Buttons::PRIMARY,
            TouchPhase::End | TouchPhase::Cancel => Buttons::empty(),
        };
        event.pressure = if touch.force != 0.0 { touch.force } else { 0.5 };
        event.width = touch.radius_x;
        event.height = touch.radius_y;
        event.detail = self.click_count;
        event.modifiers = raw.modifiers;
        event.source = SourceTag::Touch;
        event.time_stamp = raw.time_stamp;
        event.native = raw.native.clone();
        event
    }

    fn process(&mut self, raw: &RawTouch, ctx: &mut SourceCtx<'_>, phase: TouchPhase) {
        for touch in &raw.changed {
            let mut event = self.touch_to_pointer(touch, raw, phase, ctx);
            let id = event.pointer_id;
            let is_primary = event.is_primary;
            if phase == TouchPhase::Start {
                if let Some(target) = event.target {
                    ctx.set_pointer(id, target);
                }
            }
            if ctx.has_pointer(id) {
                match phase {
                    TouchPhase::Start => ctx.down(event),
                    TouchPhase::Move => ctx.moved(event),
                    TouchPhase::End => {
                        event.related_target = Some(ctx.find_target(&HitProbe {
                            client: touch.client,
                            target: event.target,
                            path: None,
                        }));
                        ctx.up(event);
                    }
                    TouchPhase::Cancel => ctx.cancel(event),
                }
            }
            if matches!(phase, TouchPhase::End | TouchPhase::Cancel) {
                self.cleanup(id, is_primary, ctx);
            }
        }
    }

    fn cleanup(&mut self, id: PointerId, was_primary: bool, ctx: &mut SourceCtx<'_>) {
        ctx.remove_pointer(id);
        if was_primary {
            self.first_touch = None;
            self.first_xy = None;
            self.start_click_reset(ctx);
        }
    }

    /// Fires a synthetic cancel for every tracked touch pointer whose
    /// terminating event never arrived, so a touchstart can never observe a
    /// stale store.
    fn vacuum_touches(&mut self, raw: &RawTouch, ctx: &mut SourceCtx<'_>) {
        // The new touchstart has not been processed yet, so the store should
        // still be smaller than the platform's current contact list.
        if ctx.live_pointers() < raw.touches.len() {
            return;
        }
        let mut stale: SmallVec<[(PointerId, NodeId); 4]> = SmallVec::new();
        for (id, target) in ctx.pointer_entries() {
            // The mouse reservation is never a touch and never vacuumed.
            if id != MOUSE_POINTER_ID
                && !raw
                    .touches
                    .iter()
                    .any(|t| Self::canonical_id(t.identifier) == id)
            {
                stale.push((id, target));
            }
        }
        for (id, target) in stale {
            let mut event = PointerEvent::new(PointerEventKind::Cancel, id, PointerType::Touch);
            event.target = Some(target);
            event.is_primary = self.first_touch.map(Self::canonical_id) == Some(id);
            event.source = SourceTag::Touch;
            event.time_stamp = raw.time_stamp;
            ctx.cancel(event);
            ctx.remove_pointer(id);
        }
    }

    /// For single-axis scroll policies, decides whether the platform should
    /// keep this interaction: yes when the displacement on the declared axis
    /// is at least the displacement on the orthogonal axis.
    fn should_scroll(&self, raw: &RawTouch, ctx: &SourceCtx<'_>) -> bool {
        let Some(first) = self.first_xy else {
            return false;
        };
        let action = ctx.find_touch_action(&raw.probe());
        match scroll_axis(action) {
            ScrollAxis::None => false,
            ScrollAxis::Both => true,
            axis => {
                let Some(touch) = raw.changed.first() else {
                    return false;
                };
                let dx = (touch.client.x - first.x).abs();
                let dy = (touch.client.y - first.y).abs();
                let (declared, orthogonal) = match axis {
                    ScrollAxis::X => (dx, dy),
                    _ => (dy, dx),
                };
                declared >= orthogonal
            }
        }
    }

    /// Remembers the primary touch's position so compat mouse events near it
    /// are swallowed for a while.
    fn dedup_synth_mouse(&self, raw: &RawTouch, ctx: &mut SourceCtx<'_>) {
        if let Some(touch) = raw.changed.first() {
            if self.is_primary(touch.identifier) {
                ctx.arm_mouse_dedup(touch.client, raw.time_stamp + DEDUP_TIMEOUT);
            }
        }
    }

    fn touch_start(&mut self, raw: &RawTouch, ctx: &mut SourceCtx<'_>) {
        self.vacuum_touches(raw, ctx);
        if let Some(first) = raw.changed.first() {
            self.set_primary(first, ctx);
        }
        self.dedup_synth_mouse(raw, ctx);
        if self.scrolling != Some(true) {
            self.click_count += 1;
            self.process(raw, ctx, TouchPhase::Start);
        }
    }

    fn touch_move(&mut self, raw: &RawTouch, ctx: &mut SourceCtx<'_>) {
        if self.config.native_touch_action {
            // The platform arbitrates scrolling itself; a non-cancelable
            // move means native scrolling already owns the sequence.
            if raw.cancelable {
                self.process(raw, ctx, TouchPhase::Move);
            }
            return;
        }
        if self.scrolling != Some(true) {
            if self.scrolling.is_none() && self.should_scroll(raw, ctx) {
                self.scrolling = Some(true);
            } else {
                self.scrolling = Some(false);
                raw.native.set();
                self.process(raw, ctx, TouchPhase::Move);
            }
        } else if let Some(first) = self.first_xy {
            let Some(touch) = raw.changed.first() else {
                return;
            };
            let d = touch.client - first;
            if d.hypot2() >= HYSTERESIS * HYSTERESIS {
                // Scroll ownership flipped mid-interaction; cancel what was
                // tracked and yield for good.
                self.touch_cancel(raw, ctx);
                self.scrolling = Some(true);
                self.first_xy = None;
            }
        }
    }

    fn touch_end(&mut self, raw: &RawTouch, ctx: &mut SourceCtx<'_>) {
        self.dedup_synth_mouse(raw, ctx);
        self.process(raw, ctx, TouchPhase::End);
    }

    fn touch_cancel(&mut self, raw: &RawTouch, ctx: &mut SourceCtx<'_>) {
        self.process(raw, ctx, TouchPhase::Cancel);
    }
}

impl InputSource for TouchSource {
    fn events(&self) -> &'static [RawKind] {
        &[
            RawKind::TouchStart,
            RawKind::TouchMove,
            RawKind::TouchEnd,
            RawKind::TouchCancel,
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
        let RawEvent::Touch(raw) = raw else { return };
        match raw.kind {
            TouchPhase::Start => self.touch_start(raw, ctx),
            TouchPhase::Move => self.touch_move(raw, ctx),
            TouchPhase::End => self.touch_end(raw, ctx),
            TouchPhase::Cancel => self.touch_cancel(raw, ctx),
        }
    }

    fn timer(&mut self, id: TimerId, _now: u64, _ctx: &mut SourceCtx<'_>) {
        if self.reset_timer == Some(id) {
            self.click_count = 0;
            self.reset_timer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_axis_mapping() {
        assert_eq!(scroll_axis(TouchAction::None), ScrollAxis::None);
        assert_eq!(scroll_axis(TouchAction::PanX), ScrollAxis::X);
        assert_eq!(scroll_axis(TouchAction::PanY), ScrollAxis::Y);
        assert_eq!(scroll_axis(TouchAction::Auto), ScrollAxis::Both);
        assert_eq!(scroll_axis(TouchAction::PanXY), ScrollAxis::Both);
        assert_eq!(scroll_axis(TouchAction::Manipulation), ScrollAxis::Both);
    }

    #[test]
    fn canonical_ids_are_offset() {
        assert_eq!(TouchSource::canonical_id(0), PointerId(2));
        assert_eq!(TouchSource::canonical_id(5), PointerId(7));
    }
}
