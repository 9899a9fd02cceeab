//! Browser backend: [`Dom`] over the live `web_sys` document.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Node};

use crate::dom::Dom;
use crate::error::DomError;

#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// Bind to `window.document`.
    pub fn new() -> Result<Self, DomError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(DomError::NoDocument)?;
        Ok(Self { document })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn element(node: &Node) -> Result<&Element, DomError> {
    node.dyn_ref::<Element>().ok_or(DomError::NotAnElement)
}

fn html_element(node: &Node) -> Result<&HtmlElement, DomError> {
    node.dyn_ref::<HtmlElement>().ok_or(DomError::NotAnElement)
}

impl Dom for WebDom {
    type Node = Node;

    fn body(&self) -> Result<Node, DomError> {
        self.document
            .body()
            .map(Into::into)
            .ok_or(DomError::NoBody)
    }

    fn create_element(&self, tag: &str) -> Result<Node, DomError> {
        Ok(self.document.create_element(tag)?.into())
    }

    fn create_text_node(&self, text: &str) -> Result<Node, DomError> {
        Ok(self.document.create_text_node(text).into())
    }

    fn append_child(&self, parent: &Node, child: &Node) -> Result<(), DomError> {
        parent.append_child(child)?;
        Ok(())
    }

    fn remove(&self, node: &Node) -> Result<(), DomError> {
        if let Some(parent) = node.parent_node() {
            parent.remove_child(node)?;
        }
        Ok(())
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn children(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn tag_name(&self, node: &Node) -> Option<String> {
        node.dyn_ref::<Element>()
            .map(|el| el.tag_name().to_lowercase())
    }

    fn is_connected(&self, node: &Node) -> bool {
        node.is_connected()
    }

    fn get_attribute(&self, node: &Node, name: &str) -> Option<String> {
        node.dyn_ref::<Element>()?.get_attribute(name)
    }

    fn set_attribute(&self, node: &Node, name: &str, value: &str) -> Result<(), DomError> {
        element(node)?.set_attribute(name, value)?;
        Ok(())
    }

    fn remove_attribute(&self, node: &Node, name: &str) -> Result<(), DomError> {
        element(node)?.remove_attribute(name)?;
        Ok(())
    }

    fn set_style(&self, node: &Node, property: &str, value: &str) -> Result<(), DomError> {
        html_element(node)?.style().set_property(property, value)?;
        Ok(())
    }

    fn clear_style(&self, node: &Node) -> Result<(), DomError> {
        self.remove_attribute(node, "style")
    }

    fn is_hidden(&self, node: &Node) -> bool {
        match node.dyn_ref::<HtmlElement>() {
            Some(el) => {
                (el.offset_width() <= 0 && el.offset_height() <= 0)
                    || el
                        .style()
                        .get_property_value("display")
                        .map(|d| d == "none")
                        .unwrap_or(false)
            }
            // Non-HTML elements (SVG …) have no offset box; treat as laid out.
            None => false,
        }
    }

    fn focus(&self, node: &Node) -> Result<(), DomError> {
        html_element(node)?.focus()?;
        Ok(())
    }

    fn active_element(&self) -> Option<Node> {
        self.document.active_element().map(Into::into)
    }
}

// ---------------------------------------------------------------------------
// wasm-bindgen tests – these need a real document.
// ---------------------------------------------------------------------------
