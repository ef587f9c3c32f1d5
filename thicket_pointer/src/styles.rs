// Copyright 2026 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stylesheet text for declared scroll-policy attributes.
//!
//! On platforms whose style system understands scroll-suppression
//! properties, injecting these rules once at startup makes a declared policy
//! attribute take effect natively. Generation is pure; whether and how to
//! inject the text is the embedder's side of the boundary.

use alloc::string::String;

/// The attribute values the rule set covers. The combined pan value gets a
/// selector for each spelling.
const VALUES: &[&str] = &["none", "auto", "pan-x", "pan-y", "manipulation"];

fn selector(out: &mut String, value: &str, scoped: bool) {
    if scoped {
        out.push_str("html /deep/ ");
    }
    out.push_str("[touch-action=\"");
    out.push_str(value);
    out.push_str("\"]");
}

fn rule(out: &mut String, value: &str) {
    out.push_str(" { -ms-touch-action: ");
    out.push_str(value);
    out.push_str("; touch-action: ");
    out.push_str(value);
    out.push_str("; }\n");
}

fn line(out: &mut String, selectors: &[&str], value: &str, scoped: bool) {
    for (i, s) in selectors.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        selector(out, s, scoped);
    }
    rule(out, value);
}

/// Generates the scrolling-suppression rule set.
///
/// With `include_scoped`, every rule is duplicated with a selector that
/// pierces encapsulated sub-trees, for platforms that support and require
/// that form.
///
/// ```
/// let css = thicket_pointer::touch_action_rules(false);
/// assert!(css.contains("[touch-action=\"pan-y\"] { -ms-touch-action: pan-y; touch-action: pan-y; }"));
/// assert!(css.contains("[touch-action=\"pan-x pan-y\"], [touch-action=\"pan-y pan-x\"]"));
/// ```
#[must_use]
pub fn touch_action_rules(include_scoped: bool) -> String {
    let mut out = String::new();
    for value in VALUES {
        line(&mut out, &[value], value, false);
        if include_scoped {
            line(&mut out, &[value], value, true);
        }
    }
    // Both spellings of the combined pan value select the same rule.
    let combined = ["pan-x pan-y", "pan-y pan-x"];
    line(&mut out, &combined, "pan-x pan-y", false);
    if include_scoped {
        line(&mut out, &combined, "pan-x pan-y", true);
    }
    out
}
