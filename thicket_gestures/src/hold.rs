// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hold recognizer: press and hold still.
//!
//! A primary `down` (only one hold at a time) starts a repeating timer. The
//! first tick emits `hold`, every later tick `holdpulse` with the elapsed
//! time. Moving past the wiggle threshold or releasing the pointer cancels
//! the timer and emits a final `release` iff at least one pulse fired.

use thicket_pointer::{
    AnyEvent, GestureCtx, GestureRecognizer, HoldEvent, HoldKind, PointerEvent, TimerId,
};

/// Milliseconds between hold pulses, and before the first.
const HOLD_DELAY_MS: u64 = 200;

/// Squared displacement, in pixels, past which a held pointer no longer
/// counts as holding.
const WIGGLE_THRESHOLD: f64 = 16.0;

/// The press-and-hold recognizer.
#[derive(Debug, Default)]
pub struct HoldRecognizer {
    held: Option<PointerEvent>,
    timer: Option<TimerId>,
    pulsed: bool,
}

impl HoldRecognizer {
    /// A recognizer holding nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fire(&self, kind: HoldKind, hold_time: Option<u64>, ctx: &mut GestureCtx<'_>) {
        let Some(held) = &self.held else { return };
        let Some(target) = held.target else { return };
        ctx.dispatch(AnyEvent::Hold(HoldEvent {
            kind,
            target,
            hold_time,
            client: held.client,
            pointer_type: held.pointer_type,
            pointer_id: held.pointer_id,
            suppress: held.suppress.clone(),
        }));
    }

    fn cancel(&mut self, ctx: &mut GestureCtx<'_>) {
        if let Some(timer) = self.timer.take() {
            ctx.clear_timer(timer);
        }
        if self.pulsed {
            self.fire(HoldKind::Release, None, ctx);
        }
        self.pulsed = false;
        self.held = None;
    }

    fn holds(&self, event: &PointerEvent) -> bool {
        self.held
            .as_ref()
            .is_some_and(|held| held.pointer_id == event.pointer_id)
    }
}

impl GestureRecognizer for HoldRecognizer {
    fn exposes(&self) -> &'static [&'static str] {
        &["hold", "holdpulse", "release"]
    }

    fn down(&mut self, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
        if !event.is_primary || self.held.is_some() || event.target.is_none() {
            return;
        }
        self.held = Some(event.clone());
        self.pulsed = false;
        self.timer = Some(ctx.start_interval(HOLD_DELAY_MS));
    }

    fn moved(&mut self, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
        if !self.holds(event) {
            return;
        }
        let wiggled = self.held.as_ref().is_some_and(|held| {
            let d = event.client - held.client;
            d.hypot2() > WIGGLE_THRESHOLD
        });
        if wiggled {
            self.cancel(ctx);
        }
    }

    fn up(&mut self, event: &PointerEvent, ctx: &mut GestureCtx<'_>) {
        if self.holds(event) {
            self.cancel(ctx);
        }
    }

    fn timer(&mut self, id: TimerId, now: u64, ctx: &mut GestureCtx<'_>) {
        if self.timer != Some(id) {
            return;
        }
        let hold_time = self
            .held
            .as_ref()
            .map(|held| now.saturating_sub(held.time_stamp));
        let kind = if self.pulsed {
            HoldKind::Pulse
        } else {
            HoldKind::Hold
        };
        self.fire(kind, hold_time, ctx);
        self.pulsed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_pointer::{PointerEventKind, PointerId, PointerType};

    #[test]
    fn only_the_held_pointer_matches() {
        let mut hold = HoldRecognizer::new();
        let held = PointerEvent::new(PointerEventKind::Down, PointerId(3), PointerType::Touch);
        assert!(!hold.holds(&held));

        hold.held = Some(held.clone());
        assert!(hold.holds(&held));

        let other = PointerEvent::new(PointerEventKind::Move, PointerId(4), PointerType::Touch);
        assert!(!hold.holds(&other));
    }
}
