//! Focusable / tabbable element discovery.
//!
//! An element is *focusable* when it is a form control that is not
//! disabled, an anchor with an `href`, or anything with a numeric
//! `tabindex`, and neither it nor any ancestor is hidden.  It is *tabbable*
//! when it is focusable and its tab index is not negative.

use crate::constants::{ATTR_DISABLED, ATTR_HREF, ATTR_TABINDEX};
use crate::dom::Dom;

const FORM_CONTROLS: [&str; 5] = ["input", "select", "textarea", "button", "object"];

/// Parsed `tabindex`, `None` when missing or not a number.
fn tab_index<D: Dom>(dom: &D, node: &D::Node) -> Option<i32> {
    dom.get_attribute(node, ATTR_TABINDEX)
        .and_then(|v| v.trim().parse::<i32>().ok())
}

/// Neither `node` nor an ancestor is hidden.
pub fn is_visible<D: Dom>(dom: &D, node: &D::Node) -> bool {
    let mut cursor = Some(node.clone());
    while let Some(current) = cursor {
        if dom.tag_name(&current).as_deref() == Some("body") {
            break;
        }
        if dom.is_hidden(&current) {
            return false;
        }
        cursor = dom.parent(&current);
    }
    true
}

fn focusable_with<D: Dom>(dom: &D, node: &D::Node, has_tab_index: bool) -> bool {
    let Some(tag) = dom.tag_name(node) else {
        return false;
    };
    let eligible = if FORM_CONTROLS.contains(&tag.as_str()) {
        dom.get_attribute(node, ATTR_DISABLED).is_none()
    } else if tag == "a" {
        dom.get_attribute(node, ATTR_HREF).is_some() || has_tab_index
    } else {
        has_tab_index
    };
    eligible && is_visible(dom, node)
}

pub fn is_focusable<D: Dom>(dom: &D, node: &D::Node) -> bool {
    focusable_with(dom, node, tab_index(dom, node).is_some())
}

pub fn is_tabbable<D: Dom>(dom: &D, node: &D::Node) -> bool {
    let index = tab_index(dom, node);
    index.map_or(true, |i| i >= 0) && focusable_with(dom, node, index.is_some())
}

/// Tabbable descendants of `root` in document order.
pub fn find_tabbable<D: Dom>(dom: &D, root: &D::Node) -> Vec<D::Node> {
    dom.descendants(root)
        .into_iter()
        .filter(|node| is_tabbable(dom, node))
        .collect()
}
