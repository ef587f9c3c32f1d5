// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host scheduling seams: rendering frames and timers.
//!
//! The engine never talks to a platform loop directly. It asks a [`FrameHost`]
//! for "one flush on the next rendering frame" and a [`TimerHost`] for
//! one-shot or repeating timers, and the embedder calls back into
//! [`PointerEngine::run_frame`] and [`PointerEngine::fire_timer`] when those
//! moments arrive. Swapping in the manual hosts below makes every schedule
//! observable and every test deterministic, with no platform loop at all.
//!
//! [`PointerEngine::run_frame`]: crate::PointerEngine::run_frame
//! [`PointerEngine::fire_timer`]: crate::PointerEngine::fire_timer

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

/// Handle of one scheduled timer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TimerId(pub(crate) u64);

/// Schedules the engine's frame-aligned flush.
///
/// [`request_frame`](Self::request_frame) is called at most once while the
/// gesture queue is non-empty; the embedder answers each request with exactly
/// one [`run_frame`](crate::PointerEngine::run_frame) call at its next
/// rendering frame boundary.
pub trait FrameHost {
    /// Ask for one flush at the next frame boundary.
    fn request_frame(&mut self);
}

/// Schedules the engine's timers.
///
/// The embedder fires a scheduled timer by calling
/// [`fire_timer`](crate::PointerEngine::fire_timer) with the id and the
/// current time: once for a timeout, once per period for an interval, until
/// [`clear`](Self::clear) is called for that id.
pub trait TimerHost {
    /// Schedule a one-shot timer.
    fn set_timeout(&mut self, id: TimerId, delay_ms: u64);
    /// Schedule a repeating timer.
    fn set_interval(&mut self, id: TimerId, period_ms: u64);
    /// Cancel a scheduled timer.
    fn clear(&mut self, id: TimerId);
}

/// Shared view of a [`ManualFrameHost`]'s pending flush request.
#[derive(Clone, Debug, Default)]
pub struct FrameFlag(Rc<Cell<bool>>);

impl FrameFlag {
    /// Takes the pending request, returning whether one was set.
    #[must_use]
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }

    /// Whether a flush request is pending.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.get()
    }
}

/// A [`FrameHost`] that records requests into a [`FrameFlag`] for the
/// embedder (or a test) to drain.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    flag: FrameFlag,
}

impl ManualFrameHost {
    /// A host with an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle onto the pending-request flag.
    #[must_use]
    pub fn flag(&self) -> FrameFlag {
        self.flag.clone()
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) {
        self.flag.0.set(true);
    }
}

/// One timer as recorded by a [`ManualTimerHost`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ScheduledTimer {
    /// The timer's handle.
    pub id: TimerId,
    /// Delay or period in milliseconds.
    pub period_ms: u64,
    /// Whether the timer repeats.
    pub repeating: bool,
}

/// Shared view of a [`ManualTimerHost`]'s active timers.
#[derive(Clone, Debug, Default)]
pub struct TimerLog(Rc<RefCell<Vec<ScheduledTimer>>>);

impl TimerLog {
    /// Snapshot of the currently scheduled timers, oldest first.
    #[must_use]
    pub fn active(&self) -> Vec<ScheduledTimer> {
        self.0.borrow().clone()
    }

    /// Removes a one-shot timer after the embedder fired it.
    pub fn expire(&self, id: TimerId) {
        self.0.borrow_mut().retain(|t| t.id != id || t.repeating);
    }
}

/// A [`TimerHost`] that records schedules into a [`TimerLog`] for the
/// embedder (or a test) to drive.
#[derive(Debug, Default)]
pub struct ManualTimerHost {
    log: TimerLog,
}

impl ManualTimerHost {
    /// A host with no scheduled timers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared handle onto the schedule.
    #[must_use]
    pub fn log(&self) -> TimerLog {
        self.log.clone()
    }
}

impl TimerHost for ManualTimerHost {
    fn set_timeout(&mut self, id: TimerId, delay_ms: u64) {
        self.log.0.borrow_mut().push(ScheduledTimer {
            id,
            period_ms: delay_ms,
            repeating: false,
        });
    }

    fn set_interval(&mut self, id: TimerId, period_ms: u64) {
        self.log.0.borrow_mut().push(ScheduledTimer {
            id,
            period_ms,
            repeating: true,
        });
    }

    fn clear(&mut self, id: TimerId) {
        self.log.0.borrow_mut().retain(|t| t.id != id);
    }
}
