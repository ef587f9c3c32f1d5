// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The retained document model: a slot arena of elements, scope roots, and
//! the document root.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::types::{NodeId, NodeKind, TouchAction};

/// A document model of elements and encapsulated sub-trees.
///
/// The tree always contains exactly one [`NodeKind::Document`] root. Elements
/// form ordinary parent/child chains under the document or under scope roots;
/// an element may additionally host a stack of [`NodeKind::ScopeRoot`] nodes
/// (newest first) whose contents are hidden from ordinary ancestor walks and
/// reachable only through the explicit host links this tree exposes.
///
/// ## Probing
///
/// Elements carry world-space bounds. [`ScopeTree::element_from_point`] probes
/// a single scope's light tree: later siblings sit on top of earlier ones, and
/// descendants sit on top of their ancestors. Probing never descends into a
/// hit element's scope roots; target resolution recurses explicitly so that
/// it can also consider older overlapping roots.
///
/// ## Liveness
///
/// Node handles are generational; removing a node frees its whole subtree and
/// invalidates every handle into it. All accessors treat stale handles as
/// absent nodes and return `None` or an empty slice.
#[derive(Debug)]
pub struct ScopeTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    host: Option<NodeId>,
    children: Vec<NodeId>,
    scopes: Vec<NodeId>,
    bounds: Rect,
    action: Option<TouchAction>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            host: None,
            children: Vec::new(),
            scopes: Vec::new(),
            bounds: Rect::ZERO,
            action: None,
        }
    }
}

/// Inclusive containment check used for probing; edges count as inside.
pub(crate) fn rect_contains(rect: &Rect, p: Point) -> bool {
    rect.x0 <= p.x && p.x <= rect.x1 && rect.y0 <= p.y && p.y <= rect.y1
}

impl ScopeTree {
    /// Creates a tree holding only the document root.
    #[must_use]
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
        };
        tree.alloc(NodeData::new(NodeKind::Document));
        tree
    }

    /// The document root. Always alive.
    #[must_use]
    pub fn document(&self) -> NodeId {
        NodeId::new(0, self.slots[0].generation)
    }

    /// Returns whether `node` still refers to a live node.
    #[must_use]
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    /// The kind of a live node.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.get(node).map(|d| d.kind)
    }

    /// Inserts a new element under `parent` (an element, a scope root, or the
    /// document), on top of its existing siblings. Returns `None` if the
    /// parent is not alive.
    pub fn insert_element(&mut self, parent: NodeId) -> Option<NodeId> {
        self.get(parent)?;
        let mut data = NodeData::new(NodeKind::Element);
        data.parent = Some(parent);
        let id = self.alloc(data);
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Attaches a new encapsulated scope root to `host`, shadowing any scope
    /// roots the host already has (the new root becomes the newest). Returns
    /// `None` unless the host is a live element.
    pub fn attach_scope_root(&mut self, host: NodeId) -> Option<NodeId> {
        if self.kind(host) != Some(NodeKind::Element) {
            return None;
        }
        let mut data = NodeData::new(NodeKind::ScopeRoot);
        data.host = Some(host);
        let id = self.alloc(data);
        if let Some(h) = self.get_mut(host) {
            h.scopes.insert(0, id);
        }
        Some(id)
    }

    /// Removes `node` and its entire subtree, including any scope roots
    /// hosted inside it. Removing the document root or a stale handle is a
    /// no-op.
    pub fn remove(&mut self, node: NodeId) {
        let Some(data) = self.get(node) else { return };
        if data.kind == NodeKind::Document {
            return;
        }
        match (data.parent, data.host) {
            (Some(parent), _) => {
                if let Some(p) = self.get_mut(parent) {
                    p.children.retain(|&c| c != node);
                }
            }
            (None, Some(host)) => {
                if let Some(h) = self.get_mut(host) {
                    h.scopes.retain(|&s| s != node);
                }
            }
            (None, None) => {}
        }
        self.free_subtree(node);
    }

    /// Sets the world-space bounds of an element. No-op for other nodes.
    pub fn set_bounds(&mut self, node: NodeId, bounds: Rect) {
        if let Some(data) = self.get_mut(node) {
            if data.kind == NodeKind::Element {
                data.bounds = bounds;
            }
        }
    }

    /// The world-space bounds of a live element.
    #[must_use]
    pub fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.get(node)
            .filter(|d| d.kind == NodeKind::Element)
            .map(|d| d.bounds)
    }

    /// Sets or clears the explicit scroll-policy attribute of an element.
    pub fn set_touch_action(&mut self, node: NodeId, action: Option<TouchAction>) {
        if let Some(data) = self.get_mut(node) {
            if data.kind == NodeKind::Element {
                data.action = action;
            }
        }
    }

    /// The explicit scroll-policy attribute of a node, if one was set.
    ///
    /// This is the declared attribute only; use
    /// [`find_touch_action`](crate::find_touch_action) for the resolved,
    /// inherited policy.
    #[must_use]
    pub fn touch_action(&self, node: NodeId) -> Option<TouchAction> {
        self.get(node).and_then(|d| d.action)
    }

    /// The ordinary parent of a node. Scope roots have no parent.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|d| d.parent)
    }

    /// The host element of a scope root. `None` for other nodes.
    #[must_use]
    pub fn host(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|d| d.host)
    }

    /// One step of the boundary-crossing ancestor walk: the ordinary parent,
    /// or the host element when the node is a scope root.
    #[must_use]
    pub fn parent_or_host(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|d| d.parent.or(d.host))
    }

    /// The children of a node, in insertion order (later siblings on top).
    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map_or(&[], |d| d.children.as_slice())
    }

    /// The scope roots hosted by an element, newest first.
    #[must_use]
    pub fn scope_roots(&self, host: NodeId) -> &[NodeId] {
        self.get(host).map_or(&[], |d| d.scopes.as_slice())
    }

    /// The newest scope root hosted by an element, if any. This is the root
    /// that shadows the element's light tree.
    #[must_use]
    pub fn nested_scope(&self, element: NodeId) -> Option<NodeId> {
        self.scope_roots(element).first().copied()
    }

    /// The next-older scope root on the same host, if any.
    #[must_use]
    pub fn older_scope(&self, scope: NodeId) -> Option<NodeId> {
        let host = self.host(scope)?;
        let scopes = self.scope_roots(host);
        let i = scopes.iter().position(|&s| s == scope)?;
        scopes.get(i + 1).copied()
    }

    /// The scope owning `node`: the nearest enclosing scope root or the
    /// document, found by walking ordinary parent links only. Stale handles
    /// and detached chains resolve to the document.
    #[must_use]
    pub fn owner_scope(&self, node: NodeId) -> NodeId {
        if !self.is_alive(node) {
            return self.document();
        }
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        match self.kind(current) {
            Some(NodeKind::Document | NodeKind::ScopeRoot) => current,
            _ => self.document(),
        }
    }

    /// Light-tree containment: whether `b` is `a` or a descendant of `a`
    /// through ordinary parent links. Never crosses scope boundaries.
    #[must_use]
    pub fn contains(&self, a: NodeId, b: NodeId) -> bool {
        if !self.is_alive(a) || !self.is_alive(b) {
            return false;
        }
        let mut current = Some(b);
        while let Some(n) = current {
            if n == a {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    /// Probes one scope's light tree for the deepest, topmost element whose
    /// bounds contain `p` (edges inclusive). Never descends into scope roots.
    #[must_use]
    pub fn element_from_point(&self, scope: NodeId, p: Point) -> Option<NodeId> {
        if !self.is_alive(scope) {
            return None;
        }
        self.probe_children(scope, p)
    }

    fn probe_children(&self, node: NodeId, p: Point) -> Option<NodeId> {
        // Later siblings are on top; descendants may overflow their parent,
        // so subtrees are probed before the sibling's own bounds are tested.
        for &child in self.children(node).iter().rev() {
            if let Some(hit) = self.probe_children(child, p) {
                return Some(hit);
            }
            if let Some(data) = self.get(child) {
                if rect_contains(&data.bounds, p) {
                    return Some(child);
                }
            }
        }
        None
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.data = Some(data);
            NodeId::new(idx, slot.generation)
        } else {
            let idx = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
            self.slots.push(Slot {
                generation: 1,
                data: Some(data),
            });
            NodeId::new(idx, 1)
        }
    }

    fn free_subtree(&mut self, node: NodeId) {
        let Some(data) = self.get_mut(node) else {
            return;
        };
        let children = core::mem::take(&mut data.children);
        let scopes = core::mem::take(&mut data.scopes);
        data.parent = None;
        data.host = None;
        for child in children {
            self.free_subtree(child);
        }
        for scope in scopes {
            self.free_subtree(scope);
        }
        let slot = &mut self.slots[node.idx()];
        slot.data = None;
        self.free.push(node.0);
    }

    fn get(&self, node: NodeId) -> Option<&NodeData> {
        let slot = self.slots.get(node.idx())?;
        if slot.generation != node.1 {
            return None;
        }
        slot.data.as_ref()
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        let slot = self.slots.get_mut(node.idx())?;
        if slot.generation != node.1 {
            return None;
        }
        slot.data.as_mut()
    }
}
