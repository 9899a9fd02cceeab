//! Per-instance configuration.
//!
//! [`ModalProps`] is the plain-data half: it deserialises from the same
//! camelCase object a JS caller would pass (`isOpen`, `closeTimeoutMS`, …).
//! [`ModalConfig`] adds what cannot be serialised: the app element
//! override, callbacks and the children renderer.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use serde_json::Value;

use crate::constants::{
    DEFAULT_ARIA_HIDE_APP, DEFAULT_CLOSE_TIMEOUT_MS, DEFAULT_ROLE,
    DEFAULT_SHOULD_CLOSE_ON_OVERLAY_CLICK,
};
use crate::dom::Dom;
use crate::error::DomError;

pub type Callback = Rc<dyn Fn()>;

/// Renders the modal body into the content element.
pub type Children<D> = Rc<dyn Fn(&D, &<D as Dom>::Node) -> Result<(), DomError>>;

/// `className` / `overlayClassName`.
///
/// A plain string is appended to the built-in classes; the object form
/// replaces them, one class per stage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ClassNames {
    Extra(String),
    Staged {
        base: String,
        #[serde(rename = "afterOpen", default)]
        after_open: String,
        #[serde(rename = "beforeClose", default)]
        before_close: String,
    },
}

impl From<&str> for ClassNames {
    fn from(value: &str) -> Self {
        ClassNames::Extra(value.to_string())
    }
}

/// Inline style overrides.  Values are passed through as written; numbers
/// are stringified, anything else non-string is skipped by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModalStyle {
    pub content: BTreeMap<String, Value>,
    pub overlay: BTreeMap<String, Value>,
}

impl ModalStyle {
    pub fn content(mut self, property: &str, value: &str) -> Self {
        self.content
            .insert(property.to_string(), Value::String(value.to_string()));
        self
    }

    pub fn overlay(mut self, property: &str, value: &str) -> Self {
        self.overlay
            .insert(property.to_string(), Value::String(value.to_string()));
        self
    }
}

/// Render a style value the way the browser would receive it.
pub fn style_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModalProps {
    pub is_open: bool,
    pub aria_hide_app: bool,
    #[serde(rename = "closeTimeoutMS")]
    pub close_timeout_ms: u32,
    pub should_close_on_overlay_click: bool,
    pub class_name: Option<ClassNames>,
    pub overlay_class_name: Option<ClassNames>,
    pub style: ModalStyle,
    pub content_label: Option<String>,
    pub role: Option<String>,
}

impl Default for ModalProps {
    fn default() -> Self {
        Self {
            is_open: false,
            aria_hide_app: DEFAULT_ARIA_HIDE_APP,
            close_timeout_ms: DEFAULT_CLOSE_TIMEOUT_MS,
            should_close_on_overlay_click: DEFAULT_SHOULD_CLOSE_ON_OVERLAY_CLICK,
            class_name: None,
            overlay_class_name: None,
            style: ModalStyle::default(),
            content_label: None,
            role: Some(DEFAULT_ROLE.to_string()),
        }
    }
}

pub struct ModalConfig<D: Dom> {
    pub props: ModalProps,
    pub app_element: Option<D::Node>,
    pub on_after_open: Option<Callback>,
    pub on_request_close: Option<Callback>,
    pub children: Option<Children<D>>,
}

impl<D: Dom> Default for ModalConfig<D> {
    fn default() -> Self {
        Self {
            props: ModalProps::default(),
            app_element: None,
            on_after_open: None,
            on_request_close: None,
            children: None,
        }
    }
}

impl<D: Dom> Clone for ModalConfig<D> {
    fn clone(&self) -> Self {
        Self {
            props: self.props.clone(),
            app_element: self.app_element.clone(),
            on_after_open: self.on_after_open.clone(),
            on_request_close: self.on_request_close.clone(),
            children: self.children.clone(),
        }
    }
}

impl<D: Dom> fmt::Debug for ModalConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalConfig")
            .field("props", &self.props)
            .field("app_element", &self.app_element)
            .field("on_after_open", &self.on_after_open.is_some())
            .field("on_request_close", &self.on_request_close.is_some())
            .field("children", &self.children.is_some())
            .finish()
    }
}

impl<D: Dom> ModalConfig<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_props(props: ModalProps) -> Self {
        Self {
            props,
            ..Self::default()
        }
    }

    pub fn open(mut self, is_open: bool) -> Self {
        self.props.is_open = is_open;
        self
    }

    pub fn aria_hide_app(mut self, enabled: bool) -> Self {
        self.props.aria_hide_app = enabled;
        self
    }

    pub fn close_timeout_ms(mut self, ms: u32) -> Self {
        self.props.close_timeout_ms = ms;
        self
    }

    pub fn should_close_on_overlay_click(mut self, enabled: bool) -> Self {
        self.props.should_close_on_overlay_click = enabled;
        self
    }

    pub fn class_name(mut self, names: impl Into<ClassNames>) -> Self {
        self.props.class_name = Some(names.into());
        self
    }

    pub fn overlay_class_name(mut self, names: impl Into<ClassNames>) -> Self {
        self.props.overlay_class_name = Some(names.into());
        self
    }

    pub fn style(mut self, style: ModalStyle) -> Self {
        self.props.style = style;
        self
    }

    pub fn content_label(mut self, label: &str) -> Self {
        self.props.content_label = Some(label.to_string());
        self
    }

    pub fn app_element(mut self, element: D::Node) -> Self {
        self.app_element = Some(element);
        self
    }

    pub fn on_after_open(mut self, f: impl Fn() + 'static) -> Self {
        self.on_after_open = Some(Rc::new(f));
        self
    }

    pub fn on_request_close(mut self, f: impl Fn() + 'static) -> Self {
        self.on_request_close = Some(Rc::new(f));
        self
    }

    pub fn children(
        mut self,
        render: impl Fn(&D, &D::Node) -> Result<(), DomError> + 'static,
    ) -> Self {
        self.children = Some(Rc::new(render));
        self
    }

    /// Children consisting of a single text node.
    pub fn text(self, text: &str) -> Self {
        let text = text.to_string();
        self.children(move |dom, content| {
            let node = dom.create_text_node(&text)?;
            dom.append_child(content, &node)
        })
    }
}
