// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-source behavior: scroll arbitration, stale-touch recovery, primary
//! election, and click-count debouncing.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};

use thicket_pointer::host::{FrameFlag, ManualFrameHost, ManualTimerHost, TimerLog};
use thicket_pointer::sources::{
    MouseSource, PlatformSources, TouchSource, TouchSourceConfig, install,
};
use thicket_pointer::{
    AnyEvent, PointerEngine, RawEvent, RawTouch, TouchPhase, TouchPoint,
};
use thicket_scope_tree::{NodeId, ScopeTree, TouchAction};

struct Rig {
    tree: ScopeTree,
    engine: PointerEngine,
    #[expect(dead_code, reason = "kept for suites that drive frames")]
    frames: FrameFlag,
    timers: TimerLog,
}

impl Rig {
    fn new() -> Self {
        Self::build(|engine| install(engine, PlatformSources::MouseAndTouch))
    }

    fn with_native_touch_action() -> Self {
        Self::build(|engine| {
            engine.register_source("mouse", Box::new(MouseSource::new()));
            engine.register_source(
                "touch",
                Box::new(TouchSource::with_config(TouchSourceConfig {
                    native_touch_action: true,
                })),
            );
        })
    }

    fn build(wire: impl FnOnce(&mut PointerEngine)) -> Self {
        let frame_host = ManualFrameHost::new();
        let timer_host = ManualTimerHost::new();
        let frames = frame_host.flag();
        let timers = timer_host.log();
        let mut engine = PointerEngine::new(Box::new(frame_host), Box::new(timer_host));
        wire(&mut engine);
        Rig {
            tree: ScopeTree::new(),
            engine,
            frames,
            timers,
        }
    }

    fn element(&mut self) -> NodeId {
        let id = self.tree.insert_element(self.tree.document()).unwrap();
        self.tree.set_bounds(id, Rect::new(0.0, 0.0, 200.0, 200.0));
        id
    }

    /// Records `(name, pointer_id, detail, is_primary)` for canonical events
    /// delivered on `node`.
    #[expect(clippy::type_complexity, reason = "test-local log tuple")]
    fn record(&mut self, node: NodeId, gesture: &str) -> Rc<RefCell<Vec<(String, u64, u32, bool)>>> {
        let log: Rc<RefCell<Vec<(String, u64, u32, bool)>>> = Rc::default();
        let sink = log.clone();
        self.engine
            .add_listener(
                &mut self.tree,
                node,
                gesture,
                Box::new(move |event| {
                    if let AnyEvent::Pointer(e) = event {
                        sink.borrow_mut().push((
                            event.name().to_owned(),
                            e.pointer_id.0,
                            e.detail,
                            e.is_primary,
                        ));
                    }
                }),
            )
            .unwrap();
        log
    }

    fn touch(&mut self, kind: TouchPhase, target: NodeId, changed: &[(u64, Point)], all: &[(u64, Point)], t: u64) -> RawEvent {
        let mut raw = RawTouch::new(
            kind,
            changed.iter().map(|&(id, p)| TouchPoint::new(id, p)).collect(),
            t,
        );
        raw.touches = all.iter().map(|&(id, p)| TouchPoint::new(id, p)).collect();
        raw.target = Some(target);
        let event = RawEvent::Touch(raw);
        self.engine.handle_raw(&self.tree, &event);
        event
    }
}

#[test]
fn single_axis_policy_keeps_cross_axis_drags() {
    let mut rig = Rig::new();
    let el = rig.element();
    rig.tree.set_touch_action(el, Some(TouchAction::PanY));
    let _log = rig.record(el, "down");

    rig.touch(TouchPhase::Start, el, &[(0, Point::new(10.0, 10.0))], &[(0, Point::new(10.0, 10.0))], 0);
    assert_eq!(rig.engine.pending_events(), 1);

    // Mostly horizontal on a pan-y element: the gesture system owns it and
    // suppresses native scrolling.
    let moved = rig.touch(TouchPhase::Move, el, &[(0, Point::new(40.0, 15.0))], &[(0, Point::new(40.0, 15.0))], 16);
    assert!(moved.default_prevented());
    assert_eq!(rig.engine.pending_events(), 2);
}

#[test]
fn single_axis_policy_yields_declared_axis_drags() {
    let mut rig = Rig::new();
    let el = rig.element();
    rig.tree.set_touch_action(el, Some(TouchAction::PanY));
    let log = rig.record(el, "up");

    rig.touch(TouchPhase::Start, el, &[(0, Point::new(10.0, 10.0))], &[(0, Point::new(10.0, 10.0))], 0);

    // Mostly vertical: native scrolling wins, no move is produced.
    let moved = rig.touch(TouchPhase::Move, el, &[(0, Point::new(12.0, 60.0))], &[(0, Point::new(12.0, 60.0))], 16);
    assert!(!moved.default_prevented());
    assert_eq!(rig.engine.pending_events(), 1);

    // Past the hysteresis displacement the tracked pointer is canceled for
    // good.
    rig.touch(TouchPhase::Move, el, &[(0, Point::new(12.0, 80.0))], &[(0, Point::new(12.0, 80.0))], 32);
    assert_eq!(rig.engine.live_pointers(), 0);
    assert_eq!(log.borrow().len(), 1, "the flip synthesizes one cancel-up");
}

#[test]
fn native_touch_action_mode_trusts_the_platform() {
    let mut rig = Rig::with_native_touch_action();
    let el = rig.element();
    rig.tree.set_touch_action(el, Some(TouchAction::PanY));
    let _log = rig.record(el, "down");

    rig.touch(TouchPhase::Start, el, &[(0, Point::new(10.0, 10.0))], &[(0, Point::new(10.0, 10.0))], 0);

    // Cancelable moves forward without arbitration, policy notwithstanding.
    let moved = rig.touch(TouchPhase::Move, el, &[(0, Point::new(12.0, 60.0))], &[(0, Point::new(12.0, 60.0))], 16);
    assert!(!moved.default_prevented());
    assert_eq!(rig.engine.pending_events(), 2);

    // A non-cancelable move means native scrolling already owns the
    // sequence.
    let mut raw = RawTouch::new(
        TouchPhase::Move,
        vec![TouchPoint::new(0, Point::new(12.0, 90.0))],
        32,
    );
    raw.target = Some(el);
    raw.cancelable = false;
    rig.engine.handle_raw(&rig.tree, &RawEvent::Touch(raw));
    assert_eq!(rig.engine.pending_events(), 2);
}

#[test]
fn stale_touches_are_vacuumed_with_cancels() {
    let mut rig = Rig::new();
    let el = rig.element();
    let doc = rig.tree.document();
    let downs = rig.record(doc, "down");
    let ups = rig.record(doc, "up");

    // A touch starts and its touchend never arrives.
    rig.touch(TouchPhase::Start, el, &[(0, Point::new(10.0, 10.0))], &[(0, Point::new(10.0, 10.0))], 0);
    assert_eq!(rig.engine.live_pointers(), 1);

    // The next touchstart no longer lists it: the stale pointer gets a
    // synthetic cancel before the new down is processed.
    rig.touch(TouchPhase::Start, el, &[(5, Point::new(50.0, 50.0))], &[(5, Point::new(50.0, 50.0))], 500);

    assert_eq!(ups.borrow().as_slice(), [("up".to_owned(), 2, 0, true)]);
    assert_eq!(downs.borrow().len(), 2);
    assert_eq!(downs.borrow()[1].1, 7, "touch identifiers offset by 2");
    assert_eq!(rig.engine.live_pointers(), 1);
}

#[test]
fn concurrent_touches_keep_distinct_identities() {
    let mut rig = Rig::new();
    let el = rig.element();
    let doc = rig.tree.document();
    let downs = rig.record(doc, "down");
    let ups = rig.record(doc, "up");

    let p0 = Point::new(20.0, 20.0);
    let p1 = Point::new(120.0, 20.0);
    rig.touch(TouchPhase::Start, el, &[(0, p0)], &[(0, p0)], 0);
    rig.touch(TouchPhase::Start, el, &[(1, p1)], &[(0, p0), (1, p1)], 10);
    assert_eq!(rig.engine.live_pointers(), 2);

    // Only the first touch is primary; both carry offset identities.
    assert_eq!(downs.borrow()[0].1, 2);
    assert!(downs.borrow()[0].3);
    assert_eq!(downs.borrow()[1].1, 3);
    assert!(!downs.borrow()[1].3);

    // They end independently, in either order.
    rig.touch(TouchPhase::End, el, &[(0, p0)], &[(1, p1)], 100);
    assert_eq!(rig.engine.live_pointers(), 1);
    rig.touch(TouchPhase::End, el, &[(1, p1)], &[], 150);
    assert_eq!(rig.engine.live_pointers(), 0);
    assert_eq!(ups.borrow()[0].1, 2);
    assert_eq!(ups.borrow()[1].1, 3);
}

#[test]
fn rapid_taps_accumulate_click_detail_until_the_debounce_expires() {
    let mut rig = Rig::new();
    let el = rig.element();
    let downs = rig.record(el, "down");
    let p = Point::new(30.0, 30.0);

    rig.touch(TouchPhase::Start, el, &[(0, p)], &[(0, p)], 0);
    rig.touch(TouchPhase::End, el, &[(0, p)], &[], 50);
    rig.touch(TouchPhase::Start, el, &[(1, p)], &[(1, p)], 120);
    rig.touch(TouchPhase::End, el, &[(1, p)], &[], 170);

    // Two presses inside the debounce window: detail counts up.
    assert_eq!(downs.borrow()[0].2, 1);
    assert_eq!(downs.borrow()[1].2, 2);

    // Let the debounce timer fire; the next press starts over.
    let pending = rig.timers.active();
    assert_eq!(pending.len(), 1);
    assert!(!pending[0].repeating);
    rig.engine.fire_timer(&rig.tree, pending[0].id, 400);
    rig.timers.expire(pending[0].id);

    rig.touch(TouchPhase::Start, el, &[(2, p)], &[(2, p)], 500);
    assert_eq!(downs.borrow()[2].2, 1);
}
