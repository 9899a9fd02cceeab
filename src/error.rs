//! Error type shared by every DOM-touching operation.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure reported by a [`Dom`](crate::dom::Dom) backend.
///
/// Configuration problems are *not* errors: they are logged and a fallback
/// is used.  Only genuine tree failures (the browser threw, a handle went
/// stale) surface here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    #[error("no global `window`/`document` exists")]
    NoDocument,

    #[error("document has no <body>")]
    NoBody,

    #[error("node is not an element")]
    NotAnElement,

    #[error("unknown node handle {0}")]
    UnknownNode(usize),

    #[error("portal is not mounted")]
    NotMounted,

    #[error("DOM operation failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<DomError> for JsValue {
    fn from(err: DomError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
