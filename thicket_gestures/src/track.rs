// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The track recognizer: sustained drags.
//!
//! Per pointer, the machine runs `idle → armed → tracking → idle`. A primary
//! `down` arms it (for a mouse, only with the primary button held); tracking
//! starts on the first `move` whose squared displacement from the down point
//! exceeds the wiggle threshold, emitting `trackstart` followed by `track`
//! and the axis-restricted `trackx`/`tracky` for that same move; every later
//! tracked move repeats the `track` family; `up` emits `trackend` iff
//! tracking started.

use kurbo::Vec2;

use thicket_scope_tree::{NodeId, TouchAction};

use thicket_pointer::{
    AnyEvent, Buttons, GestureCtx, GestureRecognizer, PointerEvent, PointerMap, PointerType,
    TrackEvent, TrackKind,
};

/// Squared displacement, in pixels, a pointer must wiggle before tracking
/// starts.
const WIGGLE_THRESHOLD: f64 = 4.0;

fn clamp_dir(delta: f64) -> i8 {
    if delta > 0.0 { 1 } else { -1 }
}

fn position_delta(from: &PointerEvent, to: &PointerEvent) -> Vec2 {
    to.page - from.page
}

#[derive(Debug)]
struct TrackState {
    down: PointerEvent,
    down_target: NodeId,
    /// The last processed move; starts as the down event so the first
    /// tracked move reports its full delta incrementally too.
    last: PointerEvent,
    x_direction: i8,
    y_direction: i8,
    tracking: bool,
}

/// Emits one track-family event, updating the sticky direction signs.
///
/// Axis-restricted kinds are suppressed entirely when their axis has no
/// incremental delta; the direction sign for an axis only changes when that
/// axis actually moved.
fn fire_track(state: &mut TrackState, kind: TrackKind, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
    let d = position_delta(&state.down, event);
    let dd = position_delta(&state.last, event);
    if dd.x != 0.0 {
        state.x_direction = clamp_dir(dd.x);
    } else if kind == TrackKind::TrackX {
        return;
    }
    if dd.y != 0.0 {
        state.y_direction = clamp_dir(dd.y);
    } else if kind == TrackKind::TrackY {
        return;
    }
    ctx.dispatch(AnyEvent::Track(TrackEvent {
        kind,
        target: state.down_target,
        related_target: event.related_target,
        client: event.client,
        page: event.page,
        screen: event.screen,
        dx: d.x,
        dy: d.y,
        ddx: dd.x,
        ddy: dd.y,
        x_direction: state.x_direction,
        y_direction: state.y_direction,
        pointer_type: event.pointer_type,
        pointer_id: event.pointer_id,
        suppress: event.suppress.clone(),
    }));
}

/// The sustained-drag recognizer.
#[derive(Debug, Default)]
pub struct TrackRecognizer {
    pointers: PointerMap<TrackState>,
}

impl TrackRecognizer {
    /// A recognizer tracking no pointers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl GestureRecognizer for TrackRecognizer {
    fn exposes(&self) -> &'static [&'static str] {
        &["trackstart", "track", "trackx", "tracky", "trackend"]
    }

    fn default_actions(&self) -> &'static [(&'static str, TouchAction)] {
        &[
            ("track", TouchAction::None),
            ("trackx", TouchAction::PanY),
            ("tracky", TouchAction::PanX),
        ]
    }

    fn down(&mut self, event: &PointerEvent, _ctx: &mut GestureCtx<'_>) {
        let armed = event.is_primary
            && (event.pointer_type != PointerType::Mouse || event.buttons == Buttons::PRIMARY);
        if !armed {
            return;
        }
        let Some(down_target) = event.target else {
            return;
        };
        self.pointers.set(
            event.pointer_id,
            TrackState {
                down: event.clone(),
                down_target,
                last: event.clone(),
                x_direction: 0,
                y_direction: 0,
                tracking: false,
            },
        );
    }

    fn moved(&mut self, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
        let Some(state) = self.pointers.get_mut(event.pointer_id) else {
            return;
        };
        if !state.tracking {
            let d = position_delta(&state.down, event);
            if d.hypot2() > WIGGLE_THRESHOLD {
                state.tracking = true;
                state.last = state.down.clone();
                fire_track(state, TrackKind::Start, event, ctx);
            }
        }
        if state.tracking {
            fire_track(state, TrackKind::Track, event, ctx);
            fire_track(state, TrackKind::TrackX, event, ctx);
            fire_track(state, TrackKind::TrackY, event, ctx);
        }
        state.last = event.clone();
    }

    fn up(&mut self, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
        if let Some(state) = self.pointers.get_mut(event.pointer_id) {
            if state.tracking {
                fire_track(state, TrackKind::End, event, ctx);
            }
        }
        self.pointers.delete(event.pointer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use thicket_pointer::{MOUSE_POINTER_ID, PointerEventKind};

    #[test]
    fn directions_clamp_to_unit_signs() {
        assert_eq!(clamp_dir(0.001), 1);
        assert_eq!(clamp_dir(250.0), 1);
        assert_eq!(clamp_dir(-0.001), -1);
        assert_eq!(clamp_dir(-250.0), -1);
    }

    #[test]
    fn deltas_are_page_space() {
        let mut from = PointerEvent::new(PointerEventKind::Down, MOUSE_POINTER_ID, PointerType::Mouse);
        from.page = Point::new(10.0, 20.0);
        let mut to = from.clone();
        to.page = Point::new(15.0, 18.0);
        // Client coordinates do not participate.
        to.client = Point::new(100.0, 100.0);
        let d = position_delta(&from, &to);
        assert_eq!((d.x, d.y), (5.0, -2.0));
    }
}
