//! Out-of-tree mount point and the open/close animation phases.
//!
//! ```text
//!            set_open(true)            next tick
//!  Closed ─────────────────▶ BeforeOpen ─────────▶ Open
//!    ▲                         │   ▲                 │ set_open(false)
//!    │ timeout elapsed         │   │ set_open(true)  ▼
//!    └──────────────────── BeforeClose ◀─────────────┘
//!         (or at once when closeTimeoutMS == 0)
//! ```
//!
//! # Invariants
//!
//! - At most one timer is pending per portal; every transition cancels it
//!   before doing anything else, so a stale timer can never close a
//!   re-opened portal.
//! - The overlay/content subtree exists iff the state is not `Closed`.
//! - Each portal holds at most one body-open count.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::{style_value, ClassNames, Children, ModalConfig, ModalStyle};
use crate::constants::{
    ATTR_ARIA_LABEL, ATTR_ROLE, ATTR_TABINDEX, CSS_CONTENT, CSS_OVERLAY, CSS_PORTAL,
    STAGE_AFTER_OPEN, STAGE_BEFORE_CLOSE, TABINDEX_PROGRAMMATIC,
};
use crate::dom::Dom;
use crate::dom_utils::join_classes;
use crate::error::DomError;
use crate::scheduling::TimerId;
use crate::services::ModalServices;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortalState {
    #[default]
    Closed,
    BeforeOpen,
    Open,
    BeforeClose,
}

impl PortalState {
    /// Is the overlay/content subtree in the document?
    pub fn is_rendered(self) -> bool {
        self != PortalState::Closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Part {
    Overlay,
    Content,
}

impl Part {
    fn base(self) -> &'static str {
        match self {
            Part::Overlay => CSS_OVERLAY,
            Part::Content => CSS_CONTENT,
        }
    }
}

/// Class string for one part in one state.
fn stage_class(part: Part, names: Option<&ClassNames>, state: PortalState) -> String {
    let after_open = matches!(state, PortalState::Open | PortalState::BeforeClose);
    let before_close = state == PortalState::BeforeClose;

    match names {
        Some(ClassNames::Staged {
            base,
            after_open: open_class,
            before_close: close_class,
        }) => join_classes([
            base.as_str(),
            if after_open { open_class.as_str() } else { "" },
            if before_close { close_class.as_str() } else { "" },
        ]),
        other => {
            let base = part.base();
            let open_class = format!("{}{}", base, STAGE_AFTER_OPEN);
            let close_class = format!("{}{}", base, STAGE_BEFORE_CLOSE);
            let extra = match other {
                Some(ClassNames::Extra(extra)) => extra.as_str(),
                _ => "",
            };
            join_classes([
                base,
                if after_open { open_class.as_str() } else { "" },
                if before_close { close_class.as_str() } else { "" },
                extra,
            ])
        }
    }
}

/// The presentational slice of a [`ModalConfig`] the portal renders.
pub struct Appearance<D: Dom> {
    pub class_name: Option<ClassNames>,
    pub overlay_class_name: Option<ClassNames>,
    pub style: ModalStyle,
    pub content_label: Option<String>,
    pub role: Option<String>,
    pub children: Option<Children<D>>,
}

impl<D: Dom> Appearance<D> {
    pub fn from_config(config: &ModalConfig<D>) -> Self {
        Self {
            class_name: config.props.class_name.clone(),
            overlay_class_name: config.props.overlay_class_name.clone(),
            style: config.props.style.clone(),
            content_label: config.props.content_label.clone(),
            role: config.props.role.clone(),
            children: config.children.clone(),
        }
    }

    fn same_children(&self, other: &Self) -> bool {
        match (&self.children, &other.children) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

struct Inner<D: Dom> {
    services: Rc<ModalServices<D>>,
    appearance: Appearance<D>,
    root: Option<D::Node>,
    overlay: Option<D::Node>,
    content: Option<D::Node>,
    state: PortalState,
    pending: Option<TimerId>,
    holds_body_open: bool,
    unmounted: bool,
}

impl<D: Dom> Inner<D> {
    fn dom(&self) -> Rc<D> {
        self.services.dom().clone()
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.services.scheduler().cancel(id);
        }
    }

    fn acquire_body(&mut self) -> Result<(), DomError> {
        if !self.holds_body_open {
            self.services.body_open().acquire()?;
            self.holds_body_open = true;
        }
        Ok(())
    }

    fn release_body(&mut self) -> Result<(), DomError> {
        if self.holds_body_open {
            self.holds_body_open = false;
            self.services.body_open().release()?;
        }
        Ok(())
    }

    fn apply_classes(&self) -> Result<(), DomError> {
        let dom = self.dom();
        if let Some(overlay) = &self.overlay {
            let class = stage_class(
                Part::Overlay,
                self.appearance.overlay_class_name.as_ref(),
                self.state,
            );
            dom.set_class_name(overlay, &class)?;
        }
        if let Some(content) = &self.content {
            let class = stage_class(Part::Content, self.appearance.class_name.as_ref(), self.state);
            dom.set_class_name(content, &class)?;
        }
        Ok(())
    }

    fn apply_attributes(&self) -> Result<(), DomError> {
        let dom = self.dom();
        let (Some(overlay), Some(content)) = (&self.overlay, &self.content) else {
            return Ok(());
        };

        dom.clear_style(overlay)?;
        for (property, value) in &self.appearance.style.overlay {
            if let Some(value) = style_value(value) {
                dom.set_style(overlay, property, &value)?;
            }
        }
        dom.clear_style(content)?;
        for (property, value) in &self.appearance.style.content {
            if let Some(value) = style_value(value) {
                dom.set_style(content, property, &value)?;
            }
        }

        match &self.appearance.role {
            Some(role) => dom.set_attribute(content, ATTR_ROLE, role)?,
            None => dom.remove_attribute(content, ATTR_ROLE)?,
        }
        match &self.appearance.content_label {
            Some(label) => dom.set_attribute(content, ATTR_ARIA_LABEL, label)?,
            None => dom.remove_attribute(content, ATTR_ARIA_LABEL)?,
        }
        Ok(())
    }

    fn render_children(&self) -> Result<(), DomError> {
        let dom = self.dom();
        if let Some(content) = &self.content {
            dom.clear_children(content)?;
            if let Some(render) = &self.appearance.children {
                render(dom.as_ref(), content)?;
            }
        }
        Ok(())
    }

    fn render_subtree(&mut self) -> Result<(), DomError> {
        let dom = self.dom();
        let root = self.root.clone().ok_or(DomError::NotMounted)?;

        let overlay = dom.create_element("div")?;
        let content = dom.create_element("div")?;
        dom.set_attribute(&content, ATTR_TABINDEX, TABINDEX_PROGRAMMATIC)?;
        dom.append_child(&overlay, &content)?;
        self.overlay = Some(overlay.clone());
        self.content = Some(content);

        self.apply_attributes()?;
        self.render_children()?;
        dom.append_child(&root, &overlay)?;
        Ok(())
    }

    fn remove_subtree(&mut self) -> Result<(), DomError> {
        self.content = None;
        if let Some(overlay) = self.overlay.take() {
            self.dom().release(&overlay)?;
        }
        Ok(())
    }

    fn finish_open(&mut self) -> Result<(), DomError> {
        self.pending = None;
        if self.state != PortalState::BeforeOpen {
            return Ok(());
        }
        self.state = PortalState::Open;
        debug_log!("portal entered {:?}", self.state);
        self.apply_classes()
    }

    fn finish_close(&mut self) -> Result<(), DomError> {
        self.pending = None;
        if self.state != PortalState::BeforeClose {
            return Ok(());
        }
        self.state = PortalState::Closed;
        debug_log!("portal entered {:?}", self.state);
        self.remove_subtree()
    }
}

/// Owns the portal root and drives [`PortalState`].
pub struct PortalController<D: Dom> {
    inner: Rc<RefCell<Inner<D>>>,
}

impl<D: Dom> PortalController<D> {
    pub fn new(services: Rc<ModalServices<D>>, appearance: Appearance<D>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                services,
                appearance,
                root: None,
                overlay: None,
                content: None,
                state: PortalState::Closed,
                pending: None,
                holds_body_open: false,
                unmounted: false,
            })),
        }
    }

    /// Create the portal root and append it to `parent` (default `<body>`).
    pub fn mount(&self, parent: Option<&D::Node>) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        if inner.root.is_some() {
            return Ok(());
        }
        let dom = inner.dom();
        let parent = match parent {
            Some(p) => p.clone(),
            None => dom.body()?,
        };
        let root = dom.create_element("div")?;
        dom.set_class_name(&root, CSS_PORTAL)?;
        dom.append_child(&parent, &root)?;
        inner.root = Some(root);
        inner.unmounted = false;
        Ok(())
    }

    pub fn state(&self) -> PortalState {
        self.inner.borrow().state
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.borrow().root.is_some()
    }

    pub fn root(&self) -> Option<D::Node> {
        self.inner.borrow().root.clone()
    }

    pub fn overlay(&self) -> Option<D::Node> {
        self.inner.borrow().overlay.clone()
    }

    pub fn content(&self) -> Option<D::Node> {
        self.inner.borrow().content.clone()
    }

    /// Swap in new classes/styles/children.  A rendered subtree is updated
    /// in place; children are re-rendered only when the renderer changed.
    pub fn set_appearance(&self, appearance: Appearance<D>) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        let children_changed = !inner.appearance.same_children(&appearance);
        inner.appearance = appearance;
        if inner.state.is_rendered() {
            inner.apply_attributes()?;
            inner.apply_classes()?;
            if children_changed {
                inner.render_children()?;
            }
        }
        Ok(())
    }

    pub fn set_open(&self, open: bool, close_timeout_ms: u32) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        if inner.root.is_none() {
            return Err(DomError::NotMounted);
        }

        match (inner.state, open) {
            (PortalState::Closed, true) | (PortalState::BeforeClose, true) => {
                inner.cancel_pending();
                if inner.state == PortalState::Closed {
                    inner.render_subtree()?;
                }
                inner.state = PortalState::BeforeOpen;
                inner.apply_classes()?;
                inner.acquire_body()?;
                let weak = Rc::downgrade(&self.inner);
                let id = inner.services.scheduler().schedule(
                    0,
                    Box::new(move || run_on(&weak, Inner::finish_open)),
                );
                inner.pending = Some(id);
            }
            (PortalState::BeforeOpen, false) | (PortalState::Open, false) => {
                inner.cancel_pending();
                inner.release_body()?;
                if close_timeout_ms == 0 {
                    inner.state = PortalState::Closed;
                    inner.remove_subtree()?;
                } else {
                    inner.state = PortalState::BeforeClose;
                    inner.apply_classes()?;
                    let weak = Rc::downgrade(&self.inner);
                    let id = inner.services.scheduler().schedule(
                        close_timeout_ms,
                        Box::new(move || run_on(&weak, Inner::finish_close)),
                    );
                    inner.pending = Some(id);
                }
            }
            // Already heading the requested way.
            _ => return Ok(()),
        }
        debug_log!("portal entered {:?}", inner.state);
        Ok(())
    }

    /// Tear everything down.  Safe to call twice; the second call only
    /// logs in debug builds.
    pub fn unmount(&self) -> Result<(), DomError> {
        let mut inner = self.inner.borrow_mut();
        if inner.unmounted || inner.root.is_none() {
            if cfg!(debug_assertions) {
                warn_log!("react-modal: portal unmounted twice; ignoring");
            }
            return Ok(());
        }
        inner.unmounted = true;
        inner.cancel_pending();
        inner.state = PortalState::Closed;
        let body = inner.release_body();
        inner.remove_subtree()?;
        if let Some(root) = inner.root.take() {
            inner.dom().release(&root)?;
        }
        body
    }
}

fn run_on<D: Dom>(weak: &Weak<RefCell<Inner<D>>>, step: fn(&mut Inner<D>) -> Result<(), DomError>) {
    let Some(inner) = weak.upgrade() else { return };
    // A transition already in progress owns the state; the timer is stale.
    let Ok(mut inner) = inner.try_borrow_mut() else { return };
    if let Err(err) = step(&mut inner) {
        warn_log!("portal transition failed: {}", err);
    }
}
