// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Pointer: one canonical pointer-event stream from heterogeneous
//! platform input, with frame-batched gesture routing on top.
//!
//! ## Overview
//!
//! Platforms report pointing input in incompatible shapes: mouse streams,
//! multi-touch streams, and two generations of unified-pointer streams. This
//! crate normalizes all of them into canonical [`PointerEvent`]s with one
//! attribute set, retargets each event to its true origin through
//! encapsulated sub-tree boundaries (via [`thicket_scope_tree`]), and routes
//! the result two ways:
//!
//! - **Synchronously** to listeners: canonical `down` and `up` deliver on
//!   the resolved target and bubble through its ancestors in the same turn
//!   as the raw event.
//! - **Frame-batched** to recognizers: every canonical event is snapshotted
//!   into a queue that flushes at most once per rendering frame, and each
//!   snapshot replays only into the recognizers its interaction requires.
//!
//! ## Pay for what you use
//!
//! Listening is reference-counted per node and per gesture name. A node's
//! first listener registers it with the active input sources; its last
//! removal unregisters it. When an interaction's `down` is processed, the
//! gesture names with listeners on the target's ancestor path are frozen
//! into a [`RecognizerSet`]; recognizers outside that set never see the
//! interaction.
//!
//! ## Scheduling is injected
//!
//! The engine depends on a [`FrameHost`] and a [`TimerHost`] rather than a
//! platform loop, and the embedder drives [`PointerEngine::run_frame`] and
//! [`PointerEngine::fire_timer`]. The manual hosts in [`host`] make tests
//! fully deterministic.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
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
//!
//! // Listen for canonical downs on the button.
//! let downs = Rc::new(Cell::new(0));
//! let seen = downs.clone();
//! engine.add_listener(&mut tree, button, "down", Box::new(move |event| {
//!     if let AnyEvent::Pointer(_) = event {
//!         seen.set(seen.get() + 1);
//!     }
//! }));
//!
//! let mut raw = RawMouse::new(MousePhase::Down, Point::new(10.0, 10.0), 0);
//! raw.which = 1;
//! engine.handle_raw(&tree, &RawEvent::Mouse(raw));
//! assert_eq!(downs.get(), 1);
//!
//! // The down was also queued for recognizers on the next frame.
//! assert!(flag.take());
//! engine.run_frame(&tree);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod engine;
mod event;
pub mod host;
mod pointer_map;
mod raw;
mod recognizer;
mod source;
pub mod sources;
mod styles;
pub mod trace;

pub use engine::{GestureHandler, ListenerId, PointerEngine};
pub use event::{
    AnyEvent, Buttons, HoldEvent, HoldKind, MOUSE_POINTER_ID, Modifiers, PointerEvent,
    PointerEventKind, PointerId, PointerType, SharedFlag, SourceTag, TOUCH_ID_OFFSET, TapEvent,
    TrackEvent, TrackKind,
};
pub use host::{FrameHost, TimerHost, TimerId};
pub use pointer_map::PointerMap;
pub use raw::{
    MousePhase, PointerPhase, RawEvent, RawKind, RawMouse, RawPointer, RawTouch, TouchPhase,
    TouchPoint,
};
pub use recognizer::{GestureCtx, GestureRecognizer, RecognizerSet};
pub use source::{InputSource, SourceCtx};
pub use styles::touch_action_rules;
