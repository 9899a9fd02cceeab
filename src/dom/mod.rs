//! The DOM-like tree the modal renders into.
//!
//! Everything above this module talks to the tree through [`Dom`] only, so
//! the same controller drives the real browser document (`web`, wasm32
//! only) and the in-memory [`VirtualDom`] used by headless hosts and tests.
//!
//! All methods take `&self`: the browser hands out shared handles and the
//! virtual tree uses interior mutability, matching the single-threaded UI
//! model.

use std::fmt;

use crate::constants::ATTR_CLASS;
use crate::dom_utils;
use crate::error::DomError;

pub mod virtual_dom;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use virtual_dom::{NodeId, VirtualDom};
#[cfg(target_arch = "wasm32")]
pub use web::WebDom;

pub trait Dom: 'static {
    /// Cheap, clonable handle to a node.  Equality is node identity.
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    fn body(&self) -> Result<Self::Node, DomError>;
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;
    fn create_text_node(&self, text: &str) -> Result<Self::Node, DomError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;
    /// Detach `node` from its parent.  Detached nodes are left alone.
    fn remove(&self, node: &Self::Node) -> Result<(), DomError>;
    /// Detach `node` for good.  Neither it nor any descendant handle is
    /// used again, so a backend that owns its storage may reclaim them.
    fn release(&self, node: &Self::Node) -> Result<(), DomError> {
        self.remove(node)
    }

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;
    /// Child nodes in document order (text nodes included).
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;
    /// Lower-case tag name, `None` for non-element nodes.
    fn tag_name(&self, node: &Self::Node) -> Option<String>;
    /// Is the node attached to the document?
    fn is_connected(&self, node: &Self::Node) -> bool;

    fn get_attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), DomError>;
    fn remove_attribute(&self, node: &Self::Node, name: &str) -> Result<(), DomError>;

    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;
    /// Drop every inline style property.
    fn clear_style(&self, node: &Self::Node) -> Result<(), DomError>;
    /// True when the node itself does not lay out (zero size or
    /// `display: none`).  Ancestors are not consulted.
    fn is_hidden(&self, node: &Self::Node) -> bool;

    fn focus(&self, node: &Self::Node) -> Result<(), DomError>;
    fn active_element(&self) -> Option<Self::Node>;

    // ---------------------------------------------------------------------
    // Provided helpers
    // ---------------------------------------------------------------------

    fn class_name(&self, node: &Self::Node) -> String {
        self.get_attribute(node, ATTR_CLASS).unwrap_or_default()
    }

    fn set_class_name(&self, node: &Self::Node, value: &str) -> Result<(), DomError> {
        self.set_attribute(node, ATTR_CLASS, value)
    }

    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), DomError> {
        let current = self.class_name(node);
        let next = dom_utils::add_token(&current, class);
        if next != current {
            self.set_class_name(node, &next)?;
        }
        Ok(())
    }

    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<(), DomError> {
        let current = self.class_name(node);
        if dom_utils::has_token(&current, class) {
            self.set_class_name(node, &dom_utils::remove_token(&current, class))?;
        }
        Ok(())
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool {
        dom_utils::has_token(&self.class_name(node), class)
    }

    /// Inclusive containment: a node contains itself.
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut cursor = Some(node.clone());
        while let Some(current) = cursor {
            if &current == ancestor {
                return true;
            }
            cursor = self.parent(&current);
        }
        false
    }

    /// Element descendants of `root` in document (pre-)order, `root`
    /// excluded.
    fn descendants(&self, root: &Self::Node) -> Vec<Self::Node> {
        let mut out = Vec::new();
        let mut stack: Vec<Self::Node> = self.children(root).into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            if self.tag_name(&node).is_none() {
                continue;
            }
            stack.extend(self.children(&node).into_iter().rev());
            out.push(node);
        }
        out
    }

    fn clear_children(&self, node: &Self::Node) -> Result<(), DomError> {
        for child in self.children(node) {
            self.remove(&child)?;
        }
        Ok(())
    }
}
