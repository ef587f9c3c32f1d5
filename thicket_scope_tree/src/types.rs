// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scope tree: node identifiers, node kinds, and the
//! scroll-policy attribute.

/// Identifier for a node in a [`ScopeTree`](crate::ScopeTree).
///
/// This is a small, copyable handle that stays stable across updates but
/// becomes invalid when the underlying slot is reused. It consists of a slot
/// index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that
///   slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a
///   new, distinct `NodeId`.
///
/// Use [`ScopeTree::is_alive`](crate::ScopeTree::is_alive) to check whether a
/// `NodeId` still refers to a live node. Stale ids never alias a different
/// live node because the generation must match; resolution code treats them
/// like absent nodes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// What a live node is: the document root, an ordinary element, or an
/// encapsulated scope root.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// The single root of the document. Always alive.
    Document,
    /// An ordinary element with bounds and ordered children.
    Element,
    /// The root of an encapsulated sub-tree. Has no parent; links back to its
    /// host element instead.
    ScopeRoot,
}

/// The per-element scroll-policy attribute.
///
/// Declares which native scroll axes, if any, take precedence over gesture
/// recognition for touches that start on (or under) the element. Resolution
/// via [`find_touch_action`](crate::find_touch_action) walks outward from the
/// event origin and defaults to [`TouchAction::Auto`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TouchAction {
    /// The platform decides; native scrolling wins on both axes.
    Auto,
    /// The element owns the interaction; native scrolling never wins.
    None,
    /// Native horizontal scrolling wins when the gesture is mostly horizontal.
    PanX,
    /// Native vertical scrolling wins when the gesture is mostly vertical.
    PanY,
    /// Native scrolling wins on both axes, stated explicitly.
    PanXY,
    /// Pan and zoom manipulation stays native; treated like both axes here.
    Manipulation,
}

impl TouchAction {
    /// The canonical attribute spelling of this policy.
    pub const fn as_attr(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::PanX => "pan-x",
            Self::PanY => "pan-y",
            Self::PanXY => "pan-x pan-y",
            Self::Manipulation => "manipulation",
        }
    }

    /// Parse an attribute value. Both orderings of the combined pan value are
    /// accepted.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "none" => Some(Self::None),
            "pan-x" => Some(Self::PanX),
            "pan-y" => Some(Self::PanY),
            "pan-x pan-y" | "pan-y pan-x" => Some(Self::PanXY),
            "manipulation" => Some(Self::Manipulation),
            _ => None,
        }
    }
}
