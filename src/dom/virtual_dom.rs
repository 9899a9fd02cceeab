//! In-memory document used by headless hosts and the test-suite.
//!
//! Nodes live in an arena and are addressed by [`NodeId`].  The tree starts
//! with a document element holding a `<body>`; anything reachable from the
//! document element counts as connected.  There is no event system: the
//! host calls the modal's `handle_*` methods directly.
//!
//! Detached nodes stay allocated (they may be re-inserted) until
//! [`Dom::release`] frees them; the portal releases every subtree it drops.

use std::cell::RefCell;

use crate::constants::ATTR_HIDDEN;
use crate::dom::Dom;
use crate::error::DomError;

/// Handle into the arena.  Slots are recycled once a subtree is released,
/// so the handle carries the slot generation and a stale one stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        style: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

#[derive(Debug, Default)]
struct Tree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    focused: Option<NodeId>,
}

impl Tree {
    fn get(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(DomError::UnknownNode(id.index))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(DomError::UnknownNode(id.index))
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        };
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.data = Some(data);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    data: Some(data),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Free `id` and its descendants.  The caller has already detached it.
    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Ok(data) = self.get(current) else { continue };
            stack.extend(data.children.iter().copied());
            let slot = &mut self.slots[current.index];
            slot.data = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(current.index);
        }
    }

    fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent {
            self.get_mut(parent)?.children.retain(|c| *c != id);
            self.get_mut(id)?.parent = None;
        }
        Ok(())
    }

    fn element_mut(
        &mut self,
        id: NodeId,
    ) -> Result<(&mut Vec<(String, String)>, &mut Vec<(String, String)>), DomError> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Element {
                attributes, style, ..
            } => Ok((attributes, style)),
            NodeKind::Text(_) => Err(DomError::NotAnElement),
        }
    }
}

#[derive(Debug)]
pub struct VirtualDom {
    tree: RefCell<Tree>,
    document_element: NodeId,
    body: NodeId,
}

impl Default for VirtualDom {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDom {
    pub fn new() -> Self {
        let mut tree = Tree::default();
        let html = tree.alloc(element_kind("html"));
        let body = tree.alloc(element_kind("body"));
        if let Ok(data) = tree.get_mut(html) {
            data.children.push(body);
        }
        if let Ok(data) = tree.get_mut(body) {
            data.parent = Some(html);
        }
        Self {
            tree: RefCell::new(tree),
            document_element: html,
            body,
        }
    }

    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    /// Create `<tag>` and append it to `parent` in one go.
    pub fn append_element(&self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let node = self.create_element(tag)?;
        self.append_child(&parent, &node)?;
        Ok(node)
    }

    /// Append a text node to `parent`.
    pub fn append_text(&self, parent: NodeId, text: &str) -> Result<NodeId, DomError> {
        let node = self.create_text_node(text)?;
        self.append_child(&parent, &node)?;
        Ok(node)
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let tree = self.tree.borrow();
        match &tree.get(node).ok()?.kind {
            NodeKind::Element { style, .. } => style
                .iter()
                .find(|(k, _)| k == property)
                .map(|(_, v)| v.clone()),
            NodeKind::Text(_) => None,
        }
    }

    /// Serialised children of `node`.
    pub fn inner_html(&self, node: NodeId) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        if let Ok(data) = tree.get(node) {
            for child in &data.children {
                serialize(&tree, *child, &mut out);
            }
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let tree = self.tree.borrow();
        let mut out = String::new();
        serialize(&tree, node, &mut out);
        out
    }

    /// Arena slots in use or waiting on the free list.
    pub fn allocated(&self) -> usize {
        self.tree.borrow().slots.len()
    }

    /// Every connected element carrying `class`, in document order.
    pub fn query_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(&self.document_element)
            .into_iter()
            .filter(|n| self.has_class(n, class))
            .collect()
    }
}

fn element_kind(tag: &str) -> NodeKind {
    NodeKind::Element {
        tag: tag.to_ascii_lowercase(),
        attributes: Vec::new(),
        style: Vec::new(),
    }
}

fn escape(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn serialize(tree: &Tree, id: NodeId, out: &mut String) {
    let Ok(data) = tree.get(id) else { return };
    match &data.kind {
        NodeKind::Text(text) => escape(text, out),
        NodeKind::Element {
            tag,
            attributes,
            style,
        } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape(value, out);
                out.push('"');
            }
            if !style.is_empty() {
                out.push_str(" style=\"");
                for (k, v) in style {
                    out.push_str(&format!("{}: {};", k, v));
                }
                out.push('"');
            }
            out.push('>');
            for child in &data.children {
                serialize(tree, *child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

impl Dom for VirtualDom {
    type Node = NodeId;

    fn body(&self) -> Result<NodeId, DomError> {
        Ok(self.body)
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        Ok(self.tree.borrow_mut().alloc(element_kind(tag)))
    }

    fn create_text_node(&self, text: &str) -> Result<NodeId, DomError> {
        Ok(self.tree.borrow_mut().alloc(NodeKind::Text(text.to_string())))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        if matches!(tree.get(*parent)?.kind, NodeKind::Text(_)) {
            return Err(DomError::NotAnElement);
        }
        tree.detach(*child)?;
        tree.get_mut(*parent)?.children.push(*child);
        tree.get_mut(*child)?.parent = Some(*parent);
        Ok(())
    }

    fn remove(&self, node: &NodeId) -> Result<(), DomError> {
        self.tree.borrow_mut().detach(*node)
    }

    fn release(&self, node: &NodeId) -> Result<(), DomError> {
        if *node == self.body || *node == self.document_element {
            return Err(DomError::NotAnElement);
        }
        let mut tree = self.tree.borrow_mut();
        tree.detach(*node)?;
        tree.release(*node);
        Ok(())
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.tree.borrow().get(*node).ok()?.parent
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.tree
            .borrow()
            .get(*node)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, node: &NodeId) -> Option<String> {
        match &self.tree.borrow().get(*node).ok()?.kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.contains(&self.document_element, node)
    }

    fn get_attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        match &self.tree.borrow().get(*node).ok()?.kind {
            NodeKind::Element { attributes, .. } => attributes
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            NodeKind::Text(_) => None,
        }
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let (attributes, _) = tree.element_mut(*node)?;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let (attributes, _) = tree.element_mut(*node)?;
        attributes.retain(|(k, _)| k != name);
        Ok(())
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let (_, style) = tree.element_mut(*node)?;
        match style.iter_mut().find(|(k, _)| k == property) {
            Some(slot) => slot.1 = value.to_string(),
            None => style.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn clear_style(&self, node: &NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        let (_, style) = tree.element_mut(*node)?;
        style.clear();
        Ok(())
    }

    fn is_hidden(&self, node: &NodeId) -> bool {
        self.get_attribute(node, ATTR_HIDDEN).is_some()
            || self.style(*node, "display").as_deref() == Some("none")
    }

    fn focus(&self, node: &NodeId) -> Result<(), DomError> {
        if self.tag_name(node).is_none() {
            return Err(DomError::NotAnElement);
        }
        // Browsers silently ignore focus() on detached elements.
        if self.is_connected(node) {
            self.tree.borrow_mut().focused = Some(*node);
        }
        Ok(())
    }

    fn active_element(&self) -> Option<NodeId> {
        let focused = self.tree.borrow().focused;
        match focused {
            Some(node) if self.is_connected(&node) => Some(node),
            _ => Some(self.body),
        }
    }
}
