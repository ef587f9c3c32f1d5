// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Gestures: the built-in recognizers for the Thicket pointer
//! engine.
//!
//! ## Overview
//!
//! Three recognizers derive higher-level gestures from the canonical pointer
//! stream, each a small state machine keyed by pointer id:
//!
//! - [`TrackRecognizer`] — sustained drags: `trackstart`, `track`,
//!   `trackx`/`tracky`, `trackend`, with cumulative and incremental deltas
//!   and sticky per-axis direction signs.
//! - [`HoldRecognizer`] — press-and-hold: `hold`, repeating `holdpulse`
//!   with elapsed time, and `release` once something held actually pulsed.
//! - [`TapRecognizer`] — activation: `tap` on the lowest common ancestor of
//!   the press and release targets, suppressible by any listener.
//!
//! Recognizers only run for interactions that need them: the engine freezes
//! the set of required recognizers when an interaction's `down` is
//! processed, from the gesture listeners reachable on the down target's
//! ancestor path. Registering a recognizer nobody listens to costs nothing
//! per event.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use thicket_gestures::install_default_gestures;
//! use thicket_pointer::host::{ManualFrameHost, ManualTimerHost};
//! use thicket_pointer::sources::{PlatformSources, install};
//! use thicket_pointer::{AnyEvent, MousePhase, PointerEngine, RawEvent, RawMouse};
//! use thicket_scope_tree::ScopeTree;
//!
//! let mut tree = ScopeTree::new();
//! let button = tree.insert_element(tree.document()).unwrap();
//! tree.set_bounds(button, Rect::new(0.0, 0.0, 100.0, 40.0));
//!
//! let frames = ManualFrameHost::new();
//! let flag = frames.flag();
//! let mut engine = PointerEngine::new(Box::new(frames), Box::new(ManualTimerHost::new()));
//! install(&mut engine, PlatformSources::MouseAndTouch);
//! install_default_gestures(&mut engine);
//!
//! let taps = Rc::new(Cell::new(0));
//! let seen = taps.clone();
//! engine.add_listener(&mut tree, button, "tap", Box::new(move |event| {
//!     if let AnyEvent::Tap(_) = event {
//!         seen.set(seen.get() + 1);
//!     }
//! }));
//!
//! // Press and release without moving.
//! let mut down = RawMouse::new(MousePhase::Down, Point::new(10.0, 10.0), 0);
//! down.which = 1;
//! engine.handle_raw(&tree, &RawEvent::Mouse(down));
//! let up = RawMouse::new(MousePhase::Up, Point::new(10.0, 10.0), 40);
//! engine.handle_raw(&tree, &RawEvent::Mouse(up));
//!
//! // Gesture recognition is frame-aligned.
//! assert!(flag.take());
//! engine.run_frame(&tree);
//! assert_eq!(taps.get(), 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hold;
mod tap;
mod track;

pub use hold::HoldRecognizer;
pub use tap::TapRecognizer;
pub use track::TrackRecognizer;

use alloc::boxed::Box;

use thicket_pointer::PointerEngine;

/// Registers the three built-in recognizers, in the canonical order: track,
/// hold, tap. Within one flush, recognizers see each event in this order.
pub fn install_default_gestures(engine: &mut PointerEngine) {
    engine.register_recognizer("track", Box::new(TrackRecognizer::new()));
    engine.register_recognizer("hold", Box::new(HoldRecognizer::new()));
    engine.register_recognizer("tap", Box::new(TapRecognizer::new()));
}
