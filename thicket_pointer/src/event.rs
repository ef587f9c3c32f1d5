// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical pointer events and the gesture events derived from them.
//!
//! Every input source normalizes its platform stream into [`PointerEvent`]
//! values carrying one unified attribute set, no matter the source. The
//! recognizers then derive [`TrackEvent`]/[`HoldEvent`]/[`TapEvent`] values
//! from that stream. [`AnyEvent`] is the delivery wrapper listeners receive;
//! its [`name`](AnyEvent::name) is the lower-cased gesture name listeners
//! subscribe under.
//!
//! ## The canonical id space
//!
//! Pointer id [`MOUSE_POINTER_ID`] (1) is reserved for the mouse cursor.
//! Touch identifiers are offset by [`TOUCH_ID_OFFSET`] (2) so that a platform
//! touch identifier of 0 can never collide with the mouse. Unified-pointer
//! platforms hand out ids that already respect the reservation and are used
//! as-is.

use alloc::rc::Rc;
use core::cell::Cell;

use kurbo::Point;

use thicket_scope_tree::NodeId;

/// Stable identifier of one pointer for its lifetime.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// The pointer id reserved for the mouse cursor.
pub const MOUSE_POINTER_ID: PointerId = PointerId(1);

/// Offset added to platform touch identifiers to keep them clear of the
/// mouse reservation.
pub const TOUCH_ID_OFFSET: u64 = 2;

/// Canonical pointer event types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerEventKind {
    /// A pointer was added (pressed).
    Down,
    /// A pointer moved.
    Move,
    /// A pointer was removed (released).
    Up,
    /// A pointer will no longer produce events. Dispatched to listeners as an
    /// `up` that suppresses gestures.
    Cancel,
}

/// The kind of device behind a pointer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerType {
    /// A mouse cursor.
    Mouse,
    /// A touch contact.
    Touch,
    /// A pen or stylus.
    Pen,
    /// A unified-pointer platform that did not say more.
    Unified,
    /// A legacy unified-pointer stream with an unknown device code.
    Legacy,
}

/// Which part of the system produced an event.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SourceTag {
    /// The mouse input source.
    Mouse,
    /// The touch input source.
    Touch,
    /// The native unified-pointer input source.
    Pointer,
    /// The legacy unified-pointer input source.
    Legacy,
    /// The track recognizer.
    Track,
    /// The hold recognizer.
    Hold,
    /// The tap recognizer.
    Tap,
}

bitflags::bitflags! {
    /// Depressed-button state of a pointer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u8 {
        /// Left mouse button, touch contact, or pen contact.
        const PRIMARY   = 1;
        /// Right mouse button or pen barrel button.
        const SECONDARY = 1 << 1;
        /// Middle mouse button.
        const AUXILIARY = 1 << 2;
        /// Back navigation button.
        const BACK      = 1 << 3;
        /// Forward navigation button.
        const FORWARD   = 1 << 4;
    }
}

bitflags::bitflags! {
    /// Modifier-key state carried on events.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Control key.
        const CTRL  = 1;
        /// Alt / option key.
        const ALT   = 1 << 1;
        /// Shift key.
        const SHIFT = 1 << 2;
        /// Meta / command key.
        const META  = 1 << 3;
    }
}

/// A boolean that survives event cloning.
///
/// Canonical events are snapshotted into the gesture queue, and gesture
/// events copy attributes from canonical events; a plain `bool` field would
/// go stale across those copies. All copies of a `SharedFlag` observe a `set`
/// made through any of them. This carries the tap-suppression state of an
/// interaction, the prevent-native-default request of a raw event, and the
/// already-handled marker guarding duplicate raw dispatch.
#[derive(Clone, Debug, Default)]
pub struct SharedFlag(Rc<Cell<bool>>);

impl SharedFlag {
    /// A fresh, unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag, visible through every copy.
    pub fn set(&self) {
        self.0.set(true);
    }

    /// Reads the flag.
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.get()
    }
}

/// The pressure to report when a source did not measure one.
pub(crate) fn default_pressure(buttons: Buttons) -> f64 {
    if buttons.is_empty() { 0.0 } else { 0.5 }
}

/// One canonical pointer event, with the same semantics no matter which
/// platform stream produced it.
#[derive(Clone, Debug)]
pub struct PointerEvent {
    /// What happened.
    pub kind: PointerEventKind,
    /// The resolved origin element the event dispatches on.
    pub target: Option<NodeId>,
    /// For `up` events, the element currently under the pointer.
    pub related_target: Option<NodeId>,
    /// Position in client coordinates.
    pub client: Point,
    /// Position in page coordinates.
    pub page: Point,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Stable pointer identity.
    pub pointer_id: PointerId,
    /// Device kind.
    pub pointer_type: PointerType,
    /// Whether this is the primary pointer of its kind.
    pub is_primary: bool,
    /// Depressed buttons.
    pub buttons: Buttons,
    /// Normalized pressure; 0.5 while pressed when the device cannot measure.
    pub pressure: f64,
    /// Contact width, 0 when unknown.
    pub width: f64,
    /// Contact height, 0 when unknown.
    pub height: f64,
    /// Click count of the interaction (tap sequences accumulate).
    pub detail: u32,
    /// Modifier-key state.
    pub modifiers: Modifiers,
    /// Which source produced the event.
    pub source: SourceTag,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
    /// Interaction-wide tap suppression; shared by every event of one
    /// down..up interaction.
    pub suppress: SharedFlag,
    /// Suppression request for the originating platform event's default
    /// action; shared with the raw event it came from.
    pub native: SharedFlag,
}

impl PointerEvent {
    /// A minimal canonical event; sources and tests fill in the rest.
    #[must_use]
    pub fn new(kind: PointerEventKind, pointer_id: PointerId, pointer_type: PointerType) -> Self {
        Self {
            kind,
            target: None,
            related_target: None,
            client: Point::ZERO,
            page: Point::ZERO,
            screen: Point::ZERO,
            pointer_id,
            pointer_type,
            is_primary: false,
            buttons: Buttons::empty(),
            pressure: 0.0,
            width: 0.0,
            height: 0.0,
            detail: 0,
            modifiers: Modifiers::empty(),
            source: SourceTag::Pointer,
            time_stamp: 0,
            suppress: SharedFlag::new(),
            native: SharedFlag::new(),
        }
    }

    /// Marks the whole interaction as tap-ineligible.
    pub fn prevent_tap(&self) {
        self.suppress.set();
    }

    /// Whether the interaction was marked tap-ineligible.
    #[must_use]
    pub fn tap_prevented(&self) -> bool {
        self.suppress.get()
    }

    /// Asks the embedder to suppress the originating platform event's
    /// default action.
    pub fn prevent_native_default(&self) {
        self.native.set();
    }
}

/// Track-family gesture event types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TrackKind {
    /// Tracking began; always the first track-family event of an interaction.
    Start,
    /// A tracked movement.
    Track,
    /// A tracked movement with horizontal incremental delta.
    TrackX,
    /// A tracked movement with vertical incremental delta.
    TrackY,
    /// Tracking ended; always the last track-family event of an interaction.
    End,
}

/// A sustained-drag gesture event.
#[derive(Clone, Debug)]
pub struct TrackEvent {
    /// Which track-family event this is.
    pub kind: TrackKind,
    /// The interaction's origin target the event dispatches on.
    pub target: NodeId,
    /// The element currently under the pointer, when known.
    pub related_target: Option<NodeId>,
    /// Current position in client coordinates.
    pub client: Point,
    /// Current position in page coordinates.
    pub page: Point,
    /// Current position in screen coordinates.
    pub screen: Point,
    /// Cumulative page-space delta since tracking started.
    pub dx: f64,
    /// Cumulative page-space delta since tracking started.
    pub dy: f64,
    /// Incremental page-space delta since the last tracked move.
    pub ddx: f64,
    /// Incremental page-space delta since the last tracked move.
    pub ddy: f64,
    /// Sticky horizontal direction sign: -1, 0 before first movement, or 1.
    pub x_direction: i8,
    /// Sticky vertical direction sign: -1, 0 before first movement, or 1.
    pub y_direction: i8,
    /// Device kind of the tracked pointer.
    pub pointer_type: PointerType,
    /// Identity of the tracked pointer.
    pub pointer_id: PointerId,
    /// The interaction's shared tap-suppression handle.
    pub suppress: SharedFlag,
}

/// Hold-family gesture event types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum HoldKind {
    /// The pointer has been held still for one delay period.
    Hold,
    /// The pointer is still held; fires once per further period.
    Pulse,
    /// The held pointer was released or moved away after pulsing.
    Release,
}

/// A press-and-hold gesture event.
#[derive(Clone, Debug)]
pub struct HoldEvent {
    /// Which hold-family event this is.
    pub kind: HoldKind,
    /// The held interaction's origin target.
    pub target: NodeId,
    /// Milliseconds held so far; absent on release.
    pub hold_time: Option<u64>,
    /// The held pointer's down position in client coordinates.
    pub client: Point,
    /// Device kind of the held pointer.
    pub pointer_type: PointerType,
    /// Identity of the held pointer.
    pub pointer_id: PointerId,
    /// The interaction's shared tap-suppression handle.
    pub suppress: SharedFlag,
}

/// A tap gesture event.
#[derive(Clone, Debug)]
pub struct TapEvent {
    /// The dispatch target: the lowest common ancestor of the down target
    /// and the element under the pointer at release.
    pub target: NodeId,
    /// Release position in client coordinates.
    pub client: Point,
    /// Click count of the interaction.
    pub detail: u32,
    /// Device kind of the tapping pointer.
    pub pointer_type: PointerType,
    /// Identity of the tapping pointer.
    pub pointer_id: PointerId,
    /// Modifier-key state at release.
    pub modifiers: Modifiers,
    /// The interaction's shared tap-suppression handle.
    pub suppress: SharedFlag,
}

/// Any event the dispatcher delivers to listeners.
///
/// Listeners subscribe by [`name`](Self::name); canonical moves are never
/// delivered (they only feed recognizers), and canonical cancels deliver
/// under the name `up`.
#[derive(Clone, Debug)]
pub enum AnyEvent {
    /// A canonical pointer event (`down` or `up`).
    Pointer(PointerEvent),
    /// A track-family gesture event.
    Track(TrackEvent),
    /// A hold-family gesture event.
    Hold(HoldEvent),
    /// A tap gesture event.
    Tap(TapEvent),
}

impl AnyEvent {
    /// The lower-cased gesture name listeners subscribe under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pointer(e) => match e.kind {
                PointerEventKind::Down => "down",
                PointerEventKind::Move => "move",
                PointerEventKind::Up | PointerEventKind::Cancel => "up",
            },
            Self::Track(e) => match e.kind {
                TrackKind::Start => "trackstart",
                TrackKind::Track => "track",
                TrackKind::TrackX => "trackx",
                TrackKind::TrackY => "tracky",
                TrackKind::End => "trackend",
            },
            Self::Hold(e) => match e.kind {
                HoldKind::Hold => "hold",
                HoldKind::Pulse => "holdpulse",
                HoldKind::Release => "release",
            },
            Self::Tap(_) => "tap",
        }
    }

    /// The node the event dispatches on.
    #[must_use]
    pub fn target(&self) -> Option<NodeId> {
        match self {
            Self::Pointer(e) => e.target,
            Self::Track(e) => Some(e.target),
            Self::Hold(e) => Some(e.target),
            Self::Tap(e) => Some(e.target),
        }
    }

    /// Marks the originating interaction as tap-ineligible.
    pub fn prevent_tap(&self) {
        match self {
            Self::Pointer(e) => e.suppress.set(),
            Self::Track(e) => e.suppress.set(),
            Self::Hold(e) => e.suppress.set(),
            Self::Tap(e) => e.suppress.set(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_flag_survives_clones() {
        let ev = PointerEvent::new(PointerEventKind::Down, MOUSE_POINTER_ID, PointerType::Mouse);
        let snapshot = ev.clone();
        snapshot.prevent_tap();
        assert!(ev.tap_prevented());
    }

    #[test]
    fn cancel_delivers_as_up() {
        let ev = PointerEvent::new(PointerEventKind::Cancel, MOUSE_POINTER_ID, PointerType::Mouse);
        assert_eq!(AnyEvent::Pointer(ev).name(), "up");
    }

    #[test]
    fn pressure_defaults_from_buttons() {
        assert_eq!(default_pressure(Buttons::empty()), 0.0);
        assert_eq!(default_pressure(Buttons::PRIMARY), 0.5);
    }
}
