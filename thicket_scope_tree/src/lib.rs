// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Thicket Scope Tree: an encapsulated sub-tree document model with pointer
//! target resolution.
//!
//! ## Overview
//!
//! UI documents built from encapsulated sub-trees (shadow-tree-like scopes)
//! hide the literal origin of an input event from ancestor-walking code. This
//! crate provides the two halves needed to undo that:
//!
//! - [`ScopeTree`]: a retained document model of elements, encapsulated scope
//!   roots, and a single document root. Elements carry world-space bounds used
//!   for point probing, ordered children (later siblings probe on top), an
//!   optional explicit [`TouchAction`] policy attribute, and optionally a
//!   stack of scope roots (newest first) that each link back to their host
//!   element.
//! - Resolution algorithms over that model: [`find_target`] recovers the
//!   deepest plausible origin element for a raw event,
//!   [`lowest_common_ancestor`] and [`deep_contains`] answer ancestry
//!   questions across scope boundaries, and [`find_touch_action`] resolves
//!   the effective scroll-policy attribute for a raw event.
//!
//! ## Degradation, not failure
//!
//! Resolution never fails: absent elements, stale handles, and coordinates
//! outside every scope degrade to the document root. There are no panics and
//! no error types in this crate.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use thicket_scope_tree::{HitProbe, ScopeTree, find_target};
//!
//! let mut tree = ScopeTree::new();
//! let panel = tree.insert_element(tree.document()).unwrap();
//! tree.set_bounds(panel, Rect::new(0.0, 0.0, 100.0, 100.0));
//!
//! // The panel hosts an encapsulated scope with an inner button.
//! let scope = tree.attach_scope_root(panel).unwrap();
//! let button = tree.insert_element(scope).unwrap();
//! tree.set_bounds(button, Rect::new(10.0, 10.0, 50.0, 50.0));
//!
//! // A raw event nominally hitting the panel retargets to the inner button.
//! let probe = HitProbe::at(Point::new(20.0, 20.0)).with_target(panel);
//! assert_eq!(find_target(&tree, &probe), button);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod retarget;
mod tree;
mod types;

pub use retarget::{
    HitProbe, deep_contains, find_target, find_touch_action, inside_node, lowest_common_ancestor,
};
pub use tree::ScopeTree;
pub use types::{NodeId, NodeKind, TouchAction};
