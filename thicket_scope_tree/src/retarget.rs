// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target resolution across encapsulated sub-tree boundaries.
//!
//! Raw platform events name a literal target that may be a scope host rather
//! than the element actually under the pointer. The functions here recover
//! the true origin:
//!
//! - [`find_target`] returns the deepest plausible origin element, using the
//!   platform's full retargeted path when one is available and coordinate
//!   probing through nested and older scope roots otherwise.
//! - [`lowest_common_ancestor`] and [`deep_contains`] answer ancestry
//!   questions with scope-root host links treated as parent links.
//! - [`find_touch_action`] resolves the effective scroll-policy attribute
//!   for an event origin.
//!
//! Every function degrades to the document root (or `false`) for absent,
//! stale, or out-of-bounds inputs.

use kurbo::Point;

use crate::tree::{ScopeTree, rect_contains};
use crate::types::{NodeId, NodeKind, TouchAction};

/// The resolution-relevant slice of a raw platform event.
///
/// Input sources build one of these from whatever the platform reported: the
/// pointer position, the literal (possibly scope-host) target, and, when the
/// platform supports it, the full retargeted path with the deepest node
/// first.
#[derive(Clone, Debug, Default)]
pub struct HitProbe<'a> {
    /// Pointer position in client coordinates.
    pub client: Point,
    /// The literal target the platform reported, if any.
    pub target: Option<NodeId>,
    /// The full retargeted path, deepest node first, if the platform
    /// provides one.
    pub path: Option<&'a [NodeId]>,
}

impl<'a> HitProbe<'a> {
    /// A probe at `client` with no target information.
    #[must_use]
    pub fn at(client: Point) -> Self {
        Self {
            client,
            target: None,
            path: None,
        }
    }

    /// Attach the literal platform target.
    #[must_use]
    pub fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach a full retargeted path (deepest node first).
    #[must_use]
    pub fn with_path(mut self, path: &'a [NodeId]) -> Self {
        self.path = Some(path);
        self
    }
}

/// Finds the deepest node that could have been the original target of an
/// event before scope-boundary retargeting.
///
/// When the probe carries a full retargeted path, its first (deepest) live
/// entry wins outright. Otherwise the event's nominal scope root — the
/// nearest enclosing scope of the literal target, or the document — is probed
/// by coordinates; when the probed element itself exposes a nested scope, the
/// search recurses into progressively older overlapping roots, falling back
/// to the light-tree element if no deeper hit is found. Coordinates outside
/// every scope resolve to the document root.
#[must_use]
pub fn find_target(tree: &ScopeTree, probe: &HitProbe<'_>) -> NodeId {
    if let Some(path) = probe.path {
        if let Some(&first) = path.first() {
            if tree.is_alive(first) {
                return first;
            }
        }
    }
    // If the position is not inside the nominal scope at all, the event came
    // from somewhere else entirely; restart from the document.
    let mut scope = probe
        .target
        .filter(|&t| tree.is_alive(t))
        .map(|t| tree.owner_scope(t))
        .unwrap_or_else(|| tree.document());
    if tree.element_from_point(scope, probe.client).is_none() {
        scope = tree.document();
    }
    search_root(tree, Some(scope), probe.client).unwrap_or_else(|| tree.document())
}

fn search_root(tree: &ScopeTree, scope: Option<NodeId>, p: Point) -> Option<NodeId> {
    let scope = scope?;
    let hit = tree.element_from_point(scope, p);
    let deeper = match hit {
        // The hit element may shadow this position with a nested scope.
        Some(el) => tree.nested_scope(el),
        // No hit in this root; an older sibling root may still cover it.
        None if scope != tree.document() => tree.older_scope(scope),
        None => None,
    };
    search_root(tree, deeper, p).or(hit)
}

/// The lowest common ancestor of two nodes, walking host links as well as
/// ordinary parent links.
///
/// Symmetric. Returns the node itself when both sides are equal, the live
/// side when the other is absent or stale, and the document root when both
/// are absent or the walks exhaust without converging.
#[must_use]
pub fn lowest_common_ancestor(
    tree: &ScopeTree,
    a: Option<NodeId>,
    b: Option<NodeId>,
) -> NodeId {
    let a = a.filter(|&n| tree.is_alive(n));
    let b = b.filter(|&n| tree.is_alive(n));
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (Some(a), None) => return a,
        (None, Some(b)) => return b,
        (None, None) => return tree.document(),
    };
    if a == b {
        return a;
    }
    // Fast case: direct light-tree containment either way.
    if tree.contains(a, b) {
        return a;
    }
    if tree.contains(b, a) {
        return b;
    }
    let da = depth(tree, a);
    let db = depth(tree, b);
    let (mut x, mut y) = if da >= db {
        (walk_up(tree, Some(a), da - db), Some(b))
    } else {
        (Some(a), walk_up(tree, Some(b), db - da))
    };
    while let (Some(xn), Some(yn)) = (x, y) {
        if xn == yn {
            return xn;
        }
        x = tree.parent_or_host(xn);
        y = tree.parent_or_host(yn);
    }
    tree.document()
}

/// Whether `container` deeply contains `containee`, including containment
/// through one or more scope-root boundaries.
#[must_use]
pub fn deep_contains(tree: &ScopeTree, container: NodeId, containee: NodeId) -> bool {
    lowest_common_ancestor(tree, Some(container), Some(containee)) == container
}

/// Resolves the effective scroll-policy attribute for an event origin.
///
/// Walks the full retargeted path when the probe has one, otherwise the
/// ancestor chain of the literal target including host links, and returns the
/// first explicit attribute found. Defaults to [`TouchAction::Auto`].
#[must_use]
pub fn find_touch_action(tree: &ScopeTree, probe: &HitProbe<'_>) -> TouchAction {
    if let Some(path) = probe.path {
        for &n in path {
            if tree.kind(n) == Some(NodeKind::Element) {
                if let Some(action) = tree.touch_action(n) {
                    return action;
                }
            }
        }
    } else {
        let mut current = probe.target.filter(|&t| tree.is_alive(t));
        while let Some(n) = current {
            if let Some(action) = tree.touch_action(n) {
                return action;
            }
            current = tree.parent_or_host(n);
        }
    }
    TouchAction::Auto
}

/// Whether the position lies inside the element's bounds, edges inclusive.
#[must_use]
pub fn inside_node(tree: &ScopeTree, node: NodeId, p: Point) -> bool {
    tree.bounds(node).is_some_and(|b| rect_contains(&b, p))
}

fn depth(tree: &ScopeTree, node: NodeId) -> usize {
    let mut d = 0;
    let mut current = Some(node);
    while let Some(n) = current {
        d += 1;
        current = tree.parent_or_host(n);
    }
    d
}

fn walk_up(tree: &ScopeTree, node: Option<NodeId>, steps: usize) -> Option<NodeId> {
    let mut current = node;
    for _ in 0..steps {
        current = current.and_then(|n| tree.parent_or_host(n));
    }
    current
}
