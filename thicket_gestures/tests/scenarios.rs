// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end gesture scenarios: raw platform events in, gesture events out,
//! with frames and timers driven by hand.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Rect};

use thicket_gestures::install_default_gestures;
use thicket_pointer::host::{FrameFlag, ManualFrameHost, ManualTimerHost, TimerLog};
use thicket_pointer::sources::{PlatformSources, install};
use thicket_pointer::{
    AnyEvent, MousePhase, PointerEngine, PointerPhase, RawEvent, RawMouse, RawPointer, RawTouch,
    TouchPhase, TouchPoint,
};
use thicket_scope_tree::{NodeId, ScopeTree, TouchAction};

type NameLog = Rc<RefCell<Vec<String>>>;

struct Rig {
    tree: ScopeTree,
    engine: PointerEngine,
    frames: FrameFlag,
    timers: TimerLog,
}

impl Rig {
    fn new() -> Self {
        Self::with_sources(PlatformSources::MouseAndTouch)
    }

    fn with_sources(choice: PlatformSources) -> Self {
        let frame_host = ManualFrameHost::new();
        let timer_host = ManualTimerHost::new();
        let frames = frame_host.flag();
        let timers = timer_host.log();
        let mut engine = PointerEngine::new(Box::new(frame_host), Box::new(timer_host));
        install(&mut engine, choice);
        install_default_gestures(&mut engine);
        Rig {
            tree: ScopeTree::new(),
            engine,
            frames,
            timers,
        }
    }

    fn element(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        let id = self.tree.insert_element(parent).unwrap();
        self.tree.set_bounds(id, bounds);
        id
    }

    fn listen(&mut self, node: NodeId, gesture: &str, log: &NameLog) {
        let sink = log.clone();
        self.engine
            .add_listener(
                &mut self.tree,
                node,
                gesture,
                Box::new(move |event| sink.borrow_mut().push(event.name().to_owned())),
            )
            .unwrap();
    }

    fn frame(&mut self) {
        assert!(self.frames.take(), "expected a pending flush request");
        self.engine.run_frame(&self.tree);
    }

    fn mouse(&mut self, kind: MousePhase, at: Point, which: u8, t: u64) {
        let mut raw = RawMouse::new(kind, at, t);
        raw.which = which;
        self.engine.handle_raw(&self.tree, &RawEvent::Mouse(raw));
    }

    fn touch(&mut self, kind: TouchPhase, target: NodeId, changed: &[(u64, Point)], all: &[(u64, Point)], t: u64) {
        let mut raw = RawTouch::new(
            kind,
            changed.iter().map(|&(id, p)| TouchPoint::new(id, p)).collect(),
            t,
        );
        raw.touches = all.iter().map(|&(id, p)| TouchPoint::new(id, p)).collect();
        raw.target = Some(target);
        self.engine.handle_raw(&self.tree, &RawEvent::Touch(raw));
    }
}

const BOX: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

/// Mouse press and release without displacement: a tap, and nothing from the
/// track family.
#[test]
fn stationary_press_taps_without_tracking() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    for gesture in ["tap", "trackstart", "track", "trackx", "tracky", "trackend"] {
        rig.listen(el, gesture, &log);
    }

    let p = Point::new(10.0, 10.0);
    rig.mouse(MousePhase::Down, p, 1, 0);
    rig.mouse(MousePhase::Move, p, 1, 8);
    rig.mouse(MousePhase::Up, p, 1, 16);
    rig.frame();

    assert_eq!(log.borrow().as_slice(), ["tap"]);
}

/// A horizontal mouse drag: `trackstart`, then `track` and `trackx` but no
/// `tracky`, and `trackend` last.
#[test]
fn horizontal_drag_tracks_one_axis() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    for gesture in ["trackstart", "track", "trackx", "tracky", "trackend"] {
        rig.listen(el, gesture, &log);
    }

    rig.mouse(MousePhase::Down, Point::new(0.0, 0.0), 1, 0);
    rig.mouse(MousePhase::Move, Point::new(50.0, 0.0), 1, 16);
    rig.mouse(MousePhase::Up, Point::new(50.0, 0.0), 1, 32);
    rig.frame();

    assert_eq!(
        log.borrow().as_slice(),
        ["trackstart", "track", "trackx", "trackend"]
    );
}

#[test]
fn trackstart_fires_once_and_orders_the_family() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    for gesture in ["trackstart", "track", "trackx", "tracky", "trackend"] {
        rig.listen(el, gesture, &log);
    }

    rig.mouse(MousePhase::Down, Point::new(0.0, 0.0), 1, 0);
    rig.mouse(MousePhase::Move, Point::new(50.0, 0.0), 1, 16);
    rig.mouse(MousePhase::Move, Point::new(80.0, 0.0), 1, 32);
    rig.mouse(MousePhase::Up, Point::new(80.0, 0.0), 1, 48);
    rig.frame();

    assert_eq!(
        log.borrow().as_slice(),
        ["trackstart", "track", "trackx", "track", "trackx", "trackend"]
    );
}

#[test]
fn direction_signs_are_sticky_per_axis() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let dirs: Rc<RefCell<Vec<(f64, f64, i8, i8)>>> = Rc::default();
    let sink = dirs.clone();
    rig.engine
        .add_listener(
            &mut rig.tree,
            el,
            "track",
            Box::new(move |event| {
                if let AnyEvent::Track(e) = event {
                    sink.borrow_mut().push((e.ddx, e.ddy, e.x_direction, e.y_direction));
                }
            }),
        )
        .unwrap();

    rig.mouse(MousePhase::Down, Point::new(0.0, 0.0), 1, 0);
    rig.mouse(MousePhase::Move, Point::new(10.0, 0.0), 1, 16);
    rig.mouse(MousePhase::Move, Point::new(5.0, 0.0), 1, 32);
    rig.mouse(MousePhase::Move, Point::new(5.0, 5.0), 1, 48);
    rig.mouse(MousePhase::Up, Point::new(5.0, 5.0), 1, 64);
    rig.frame();

    // Rightward, then leftward, then purely vertical: the x sign holds its
    // last movement's direction while y picks one up.
    assert_eq!(
        dirs.borrow().as_slice(),
        [
            (10.0, 0.0, 1, 0),
            (-5.0, 0.0, -1, 0),
            (0.0, 5.0, -1, 1),
        ]
    );
}

/// Touch press held past the delay: `hold`, pulses, then `release` on lift.
#[test]
fn held_touch_pulses_and_releases() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: Rc<RefCell<Vec<(String, Option<u64>)>>> = Rc::default();
    for gesture in ["hold", "holdpulse", "release"] {
        let sink = log.clone();
        rig.engine
            .add_listener(
                &mut rig.tree,
                el,
                gesture,
                Box::new(move |event| {
                    if let AnyEvent::Hold(e) = event {
                        sink.borrow_mut().push((event.name().to_owned(), e.hold_time));
                    }
                }),
            )
            .unwrap();
    }

    let p = Point::new(10.0, 10.0);
    rig.touch(TouchPhase::Start, el, &[(0, p)], &[(0, p)], 0);
    rig.frame();

    let pending = rig.timers.active();
    assert_eq!(pending.len(), 1, "the hold recognizer armed its pulse timer");
    assert!(pending[0].repeating);
    let timer = pending[0].id;

    rig.engine.fire_timer(&rig.tree, timer, 200);
    rig.engine.fire_timer(&rig.tree, timer, 400);
    rig.touch(TouchPhase::End, el, &[(0, p)], &[], 450);
    rig.frame();

    assert_eq!(
        log.borrow().as_slice(),
        [
            ("hold".to_owned(), Some(200)),
            ("holdpulse".to_owned(), Some(400)),
            ("release".to_owned(), None),
        ]
    );
    assert!(
        rig.timers.active().iter().all(|t| !t.repeating),
        "release cleared the pulse timer"
    );
}

#[test]
fn wiggling_before_the_first_pulse_means_no_release() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    // Keep every move: no native scrolling for this element.
    rig.tree.set_touch_action(el, Some(TouchAction::None));
    let log: NameLog = Rc::default();
    for gesture in ["hold", "holdpulse", "release"] {
        rig.listen(el, gesture, &log);
    }

    rig.touch(TouchPhase::Start, el, &[(0, Point::new(10.0, 10.0))], &[(0, Point::new(10.0, 10.0))], 0);
    rig.frame();
    assert_eq!(rig.timers.active().len(), 1);

    // Move past the hold wiggle threshold before any pulse fired.
    rig.touch(TouchPhase::Move, el, &[(0, Point::new(15.0, 10.0))], &[(0, Point::new(15.0, 10.0))], 50);
    rig.frame();

    assert!(log.borrow().is_empty());
    assert!(rig.timers.active().is_empty(), "the pulse timer was canceled");
}

/// A press that slides from one sibling to another taps their common
/// container.
#[test]
fn sliding_press_taps_the_common_ancestor() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let parent = rig.element(doc, BOX);
    let left = rig.element(parent, Rect::new(0.0, 0.0, 50.0, 100.0));
    let right = rig.element(parent, Rect::new(50.0, 0.0, 100.0, 100.0));

    let targets: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let sink = targets.clone();
    rig.engine
        .add_listener(
            &mut rig.tree,
            parent,
            "tap",
            Box::new(move |event| {
                if let AnyEvent::Tap(e) = event {
                    sink.borrow_mut().push(e.target);
                }
            }),
        )
        .unwrap();

    rig.mouse(MousePhase::Down, Point::new(25.0, 25.0), 1, 0);
    rig.mouse(MousePhase::Up, Point::new(75.0, 25.0), 1, 16);
    rig.frame();

    assert_eq!(targets.borrow().as_slice(), [parent]);
    let _ = (left, right);
}

#[test]
fn secondary_button_presses_never_tap_or_track() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    for gesture in ["tap", "trackstart", "trackend"] {
        rig.listen(el, gesture, &log);
    }

    rig.mouse(MousePhase::Down, Point::new(10.0, 10.0), 3, 0);
    rig.mouse(MousePhase::Move, Point::new(40.0, 10.0), 3, 16);
    rig.mouse(MousePhase::Up, Point::new(40.0, 10.0), 3, 32);
    rig.frame();

    assert!(log.borrow().is_empty());
}

/// Any gesture listener can veto the pending tap for the interaction.
#[test]
fn gesture_listeners_can_suppress_the_tap() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    rig.listen(el, "tap", &log);
    rig.engine
        .add_listener(
            &mut rig.tree,
            el,
            "trackstart",
            Box::new(|event| event.prevent_tap()),
        )
        .unwrap();

    rig.mouse(MousePhase::Down, Point::new(0.0, 0.0), 1, 0);
    rig.mouse(MousePhase::Move, Point::new(50.0, 0.0), 1, 16);
    rig.mouse(MousePhase::Up, Point::new(50.0, 0.0), 1, 32);
    rig.frame();

    assert!(log.borrow().is_empty(), "the trackstart listener vetoed the tap");
}

#[test]
fn canonical_cancel_suppresses_the_tap() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    rig.listen(el, "tap", &log);

    let p = Point::new(10.0, 10.0);
    rig.touch(TouchPhase::Start, el, &[(0, p)], &[(0, p)], 0);
    rig.touch(TouchPhase::Cancel, el, &[(0, p)], &[], 50);
    rig.frame();

    assert!(log.borrow().is_empty());
    assert_eq!(rig.engine.live_pointers(), 0);
}

/// A unified-pointer platform produces the same gestures through its thin
/// source.
#[test]
fn unified_pointer_stream_taps() {
    let mut rig = Rig::with_sources(PlatformSources::Pointer);
    let doc = rig.tree.document();
    let el = rig.element(doc, BOX);
    let log: NameLog = Rc::default();
    rig.listen(el, "tap", &log);

    let mut down = RawPointer::new(PointerPhase::Down, 12, Point::new(10.0, 10.0), 0);
    down.is_primary = true;
    down.buttons = thicket_pointer::Buttons::PRIMARY;
    rig.engine.handle_raw(&rig.tree, &RawEvent::Pointer(down));
    let mut up = RawPointer::new(PointerPhase::Up, 12, Point::new(10.0, 10.0), 16);
    up.is_primary = true;
    rig.engine.handle_raw(&rig.tree, &RawEvent::Pointer(up));
    rig.frame();

    assert_eq!(log.borrow().as_slice(), ["tap"]);
}

/// Listening for an axis-restricted track gesture declares the orthogonal
/// scroll policy on the node unless it already has one.
#[test]
fn track_listeners_apply_default_scroll_policies() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let plain = rig.element(doc, BOX);
    let declared = rig.element(doc, BOX);
    rig.tree.set_touch_action(declared, Some(TouchAction::Auto));
    let log: NameLog = Rc::default();

    rig.listen(plain, "trackx", &log);
    assert_eq!(rig.tree.touch_action(plain), Some(TouchAction::PanY));

    rig.listen(declared, "track", &log);
    assert_eq!(rig.tree.touch_action(declared), Some(TouchAction::Auto));
}

#[test]
fn gestures_retarget_through_scope_boundaries() {
    let mut rig = Rig::new();
    let doc = rig.tree.document();
    let host = rig.element(doc, BOX);
    let scope = rig.tree.attach_scope_root(host).unwrap();
    let inner = rig.element(scope, BOX);

    // Listen outside the boundary; the gesture originates inside it.
    let targets: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let sink = targets.clone();
    rig.engine
        .add_listener(
            &mut rig.tree,
            doc,
            "tap",
            Box::new(move |event| {
                if let AnyEvent::Tap(e) = event {
                    sink.borrow_mut().push(e.target);
                }
            }),
        )
        .unwrap();

    rig.mouse(MousePhase::Down, Point::new(10.0, 10.0), 1, 0);
    rig.mouse(MousePhase::Up, Point::new(10.0, 10.0), 1, 16);
    rig.frame();

    // The tap dispatched on the retargeted inner element and bubbled out to
    // the document listener.
    assert_eq!(targets.borrow().as_slice(), [inner]);
}
