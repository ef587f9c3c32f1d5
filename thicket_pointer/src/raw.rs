// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw platform event descriptions fed into the engine by the embedder.
//!
//! These are the normalization inputs: whatever the platform reports for a
//! mouse, touch, or unified-pointer stream, restated as plain data. Every raw
//! event carries a shared already-handled marker; an embedder that observes
//! the same underlying platform event through more than one registered scope
//! feeds clones sharing that marker, and the engine processes only the first.

use alloc::vec::Vec;

use kurbo::Point;

use thicket_scope_tree::{HitProbe, NodeId};

use crate::event::{Buttons, Modifiers, PointerType, SharedFlag};

/// Discriminant of a raw platform event, used by sources to declare interest.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RawKind {
    /// A mouse button was pressed.
    MouseDown,
    /// The mouse moved.
    MouseMove,
    /// A mouse button was released.
    MouseUp,
    /// Touch contacts were added.
    TouchStart,
    /// Touch contacts moved.
    TouchMove,
    /// Touch contacts were lifted.
    TouchEnd,
    /// Touch contacts were aborted by the platform.
    TouchCancel,
    /// A native unified pointer was pressed.
    PointerDown,
    /// A native unified pointer moved.
    PointerMove,
    /// A native unified pointer was released.
    PointerUp,
    /// A native unified pointer was aborted.
    PointerCancel,
    /// A legacy unified pointer was pressed.
    LegacyDown,
    /// A legacy unified pointer moved.
    LegacyMove,
    /// A legacy unified pointer was released.
    LegacyUp,
    /// A legacy unified pointer was aborted.
    LegacyCancel,
}

/// Phases of a raw mouse stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MousePhase {
    /// Button press.
    Down,
    /// Movement.
    Move,
    /// Button release.
    Up,
}

/// Phases of a raw touch stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TouchPhase {
    /// Contacts added.
    Start,
    /// Contacts moved.
    Move,
    /// Contacts lifted.
    End,
    /// Contacts aborted.
    Cancel,
}

/// Phases of a raw unified-pointer stream.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PointerPhase {
    /// Pointer pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Pointer released.
    Up,
    /// Pointer aborted.
    Cancel,
}

/// A raw mouse event.
#[derive(Clone, Debug)]
pub struct RawMouse {
    /// Which phase of the stream this is.
    pub kind: MousePhase,
    /// Position in client coordinates.
    pub client: Point,
    /// Position in page coordinates.
    pub page: Point,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Depressed buttons, when the platform reports them; derived from
    /// `which` otherwise.
    pub buttons: Option<Buttons>,
    /// Legacy 1-based button indicator for platforms without a buttons field.
    pub which: u8,
    /// Platform click count.
    pub detail: u32,
    /// Modifier-key state.
    pub modifiers: Modifiers,
    /// The literal target the platform reported.
    pub target: Option<NodeId>,
    /// The full retargeted path, deepest first, when the platform has one.
    pub path: Option<Vec<NodeId>>,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
    /// Already-handled marker shared between clones of this event.
    pub handled: SharedFlag,
    /// Default-action suppression shared between clones of this event.
    pub native: SharedFlag,
}

impl RawMouse {
    /// A raw mouse event at `client`, with page and screen positions assumed
    /// equal. Remaining fields take their quiet defaults.
    #[must_use]
    pub fn new(kind: MousePhase, client: Point, time_stamp: u64) -> Self {
        Self {
            kind,
            client,
            page: client,
            screen: client,
            buttons: None,
            which: 0,
            detail: 0,
            modifiers: Modifiers::empty(),
            target: None,
            path: None,
            time_stamp,
            handled: SharedFlag::new(),
            native: SharedFlag::new(),
        }
    }

    pub(crate) fn probe(&self) -> HitProbe<'_> {
        HitProbe {
            client: self.client,
            target: self.target,
            path: self.path.as_deref(),
        }
    }
}

/// One contact inside a raw touch event.
#[derive(Clone, Debug)]
pub struct TouchPoint {
    /// Platform touch identifier; canonical ids add [`TOUCH_ID_OFFSET`].
    ///
    /// [`TOUCH_ID_OFFSET`]: crate::TOUCH_ID_OFFSET
    pub identifier: u64,
    /// Position in client coordinates.
    pub client: Point,
    /// Position in page coordinates.
    pub page: Point,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Contact radius, horizontal.
    pub radius_x: f64,
    /// Contact radius, vertical.
    pub radius_y: f64,
    /// Contact force; 0 when the device cannot measure.
    pub force: f64,
}

impl TouchPoint {
    /// A contact at `client`, with page and screen positions assumed equal
    /// and no measured size or force.
    #[must_use]
    pub fn new(identifier: u64, client: Point) -> Self {
        Self {
            identifier,
            client,
            page: client,
            screen: client,
            radius_x: 0.0,
            radius_y: 0.0,
            force: 0.0,
        }
    }
}

/// A raw touch event.
#[derive(Clone, Debug)]
pub struct RawTouch {
    /// Which phase of the stream this is.
    pub kind: TouchPhase,
    /// All contacts currently on the surface.
    pub touches: Vec<TouchPoint>,
    /// The contacts that changed in this event.
    pub changed: Vec<TouchPoint>,
    /// The literal target the platform reported.
    pub target: Option<NodeId>,
    /// The full retargeted path, deepest first, when the platform has one.
    pub path: Option<Vec<NodeId>>,
    /// Modifier-key state.
    pub modifiers: Modifiers,
    /// Whether the platform still allows its default action to be suppressed.
    pub cancelable: bool,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
    /// Already-handled marker shared between clones of this event.
    pub handled: SharedFlag,
    /// Default-action suppression shared between clones of this event.
    pub native: SharedFlag,
}

impl RawTouch {
    /// A raw touch event whose current and changed contact lists are both
    /// `changed`. Remaining fields take their quiet defaults.
    #[must_use]
    pub fn new(kind: TouchPhase, changed: Vec<TouchPoint>, time_stamp: u64) -> Self {
        Self {
            kind,
            touches: changed.clone(),
            changed,
            target: None,
            path: None,
            modifiers: Modifiers::empty(),
            cancelable: true,
            time_stamp,
            handled: SharedFlag::new(),
            native: SharedFlag::new(),
        }
    }

    pub(crate) fn probe(&self) -> HitProbe<'_> {
        HitProbe {
            client: self.changed.first().map(|t| t.client).unwrap_or_default(),
            target: self.target,
            path: self.path.as_deref(),
        }
    }
}

/// A raw unified-pointer event, native or legacy.
#[derive(Clone, Debug)]
pub struct RawPointer {
    /// Which phase of the stream this is.
    pub kind: PointerPhase,
    /// Platform pointer id, used as the canonical id unchanged.
    pub pointer_id: u64,
    /// Device kind; legacy streams report a numeric code instead.
    pub pointer_type: PointerType,
    /// Numeric device code of legacy streams; ignored by the native source.
    pub type_code: u8,
    /// Whether this is the primary pointer of its kind.
    pub is_primary: bool,
    /// Position in client coordinates.
    pub client: Point,
    /// Position in page coordinates.
    pub page: Point,
    /// Position in screen coordinates.
    pub screen: Point,
    /// Depressed buttons.
    pub buttons: Buttons,
    /// Measured pressure; 0 when the device cannot measure.
    pub pressure: f64,
    /// Contact width.
    pub width: f64,
    /// Contact height.
    pub height: f64,
    /// Platform click count.
    pub detail: u32,
    /// Modifier-key state.
    pub modifiers: Modifiers,
    /// The literal target the platform reported.
    pub target: Option<NodeId>,
    /// The full retargeted path, deepest first, when the platform has one.
    pub path: Option<Vec<NodeId>>,
    /// Milliseconds on the embedder's clock.
    pub time_stamp: u64,
    /// Already-handled marker shared between clones of this event.
    pub handled: SharedFlag,
    /// Default-action suppression shared between clones of this event.
    pub native: SharedFlag,
}

impl RawPointer {
    /// A raw unified-pointer event at `client`, with page and screen
    /// positions assumed equal. Remaining fields take their quiet defaults.
    #[must_use]
    pub fn new(kind: PointerPhase, pointer_id: u64, client: Point, time_stamp: u64) -> Self {
        Self {
            kind,
            pointer_id,
            pointer_type: PointerType::Unified,
            type_code: 0,
            is_primary: false,
            client,
            page: client,
            screen: client,
            buttons: Buttons::empty(),
            pressure: 0.0,
            width: 0.0,
            height: 0.0,
            detail: 0,
            modifiers: Modifiers::empty(),
            target: None,
            path: None,
            time_stamp,
            handled: SharedFlag::new(),
            native: SharedFlag::new(),
        }
    }

    pub(crate) fn probe(&self) -> HitProbe<'_> {
        HitProbe {
            client: self.client,
            target: self.target,
            path: self.path.as_deref(),
        }
    }
}

/// Any raw platform event the engine can be fed.
#[derive(Clone, Debug)]
pub enum RawEvent {
    /// A raw mouse event.
    Mouse(RawMouse),
    /// A raw touch event.
    Touch(RawTouch),
    /// A raw native unified-pointer event.
    Pointer(RawPointer),
    /// A raw legacy unified-pointer event.
    Legacy(RawPointer),
}

impl RawEvent {
    /// The discriminant sources declare interest in.
    #[must_use]
    pub fn kind(&self) -> RawKind {
        match self {
            Self::Mouse(m) => match m.kind {
                MousePhase::Down => RawKind::MouseDown,
                MousePhase::Move => RawKind::MouseMove,
                MousePhase::Up => RawKind::MouseUp,
            },
            Self::Touch(t) => match t.kind {
                TouchPhase::Start => RawKind::TouchStart,
                TouchPhase::Move => RawKind::TouchMove,
                TouchPhase::End => RawKind::TouchEnd,
                TouchPhase::Cancel => RawKind::TouchCancel,
            },
            Self::Pointer(p) => match p.kind {
                PointerPhase::Down => RawKind::PointerDown,
                PointerPhase::Move => RawKind::PointerMove,
                PointerPhase::Up => RawKind::PointerUp,
                PointerPhase::Cancel => RawKind::PointerCancel,
            },
            Self::Legacy(p) => match p.kind {
                PointerPhase::Down => RawKind::LegacyDown,
                PointerPhase::Move => RawKind::LegacyMove,
                PointerPhase::Up => RawKind::LegacyUp,
                PointerPhase::Cancel => RawKind::LegacyCancel,
            },
        }
    }

    /// The shared already-handled marker.
    #[must_use]
    pub fn handled(&self) -> &SharedFlag {
        match self {
            Self::Mouse(m) => &m.handled,
            Self::Touch(t) => &t.handled,
            Self::Pointer(p) | Self::Legacy(p) => &p.handled,
        }
    }

    /// Whether the embedder was asked to suppress the platform default
    /// action for this event.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        match self {
            Self::Mouse(m) => m.native.get(),
            Self::Touch(t) => t.native.get(),
            Self::Pointer(p) | Self::Legacy(p) => p.native.get(),
        }
    }
}
