//! Shared, injectable services every modal instance is handed at mount.
//!
//! The aria-hide stack, the body "open" counter and the default app
//! element are process-wide by nature.  Instead of ambient statics they
//! live in one [`ModalServices`] value that instances hold by `Rc`, and
//! tests build a fresh one (or call [`ModalServices::reset_for_testing`]).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::aria_app_hider::AriaAppHider;
use crate::constants::CSS_BODY_OPEN;
use crate::dom::Dom;
use crate::error::DomError;
use crate::scheduling::Scheduler;

/// Keeps `ReactModal__Body--open` on `<body>` while at least one instance
/// holds it.
pub struct BodyOpenTracker<D: Dom> {
    dom: Rc<D>,
    open: Cell<usize>,
}

impl<D: Dom> BodyOpenTracker<D> {
    pub fn new(dom: Rc<D>) -> Self {
        Self {
            dom,
            open: Cell::new(0),
        }
    }

    pub fn open_count(&self) -> usize {
        self.open.get()
    }

    pub fn acquire(&self) -> Result<(), DomError> {
        let count = self.open.get() + 1;
        self.open.set(count);
        if count == 1 {
            self.dom.add_class(&self.dom.body()?, CSS_BODY_OPEN)?;
        }
        Ok(())
    }

    pub fn release(&self) -> Result<(), DomError> {
        let count = self.open.get();
        if count == 0 {
            return Ok(());
        }
        self.open.set(count - 1);
        if count == 1 {
            self.dom.remove_class(&self.dom.body()?, CSS_BODY_OPEN)?;
        }
        Ok(())
    }

    pub fn reset_for_testing(&self) {
        self.open.set(0);
        if let Ok(body) = self.dom.body() {
            let _ = self.dom.remove_class(&body, CSS_BODY_OPEN);
        }
    }
}

pub struct ModalServices<D: Dom> {
    dom: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    aria: AriaAppHider<D>,
    body_open: BodyOpenTracker<D>,
    app_element: RefCell<Option<D::Node>>,
}

impl<D: Dom> ModalServices<D> {
    pub fn new(dom: Rc<D>, scheduler: Rc<dyn Scheduler>) -> Rc<Self> {
        Rc::new(Self {
            aria: AriaAppHider::new(dom.clone()),
            body_open: BodyOpenTracker::new(dom.clone()),
            dom,
            scheduler,
            app_element: RefCell::new(None),
        })
    }

    pub fn dom(&self) -> &Rc<D> {
        &self.dom
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn aria(&self) -> &AriaAppHider<D> {
        &self.aria
    }

    pub fn body_open(&self) -> &BodyOpenTracker<D> {
        &self.body_open
    }

    /// Default app element for instances that do not pass their own.
    pub fn set_app_element(&self, element: D::Node) {
        *self.app_element.borrow_mut() = Some(element);
    }

    pub fn app_element(&self) -> Option<D::Node> {
        self.app_element.borrow().clone()
    }

    /// Pick the element to hide: the instance override, else the global
    /// default, else `<body>` (with a warning when hiding is enabled, since
    /// hiding the body also hides the portal for assistive tech).
    pub fn resolve_app_element(
        &self,
        override_element: Option<&D::Node>,
        aria_hide_app: bool,
    ) -> Result<D::Node, DomError> {
        if let Some(el) = override_element {
            return Ok(el.clone());
        }
        if let Some(el) = self.app_element() {
            return Ok(el);
        }
        if aria_hide_app {
            warn_log!(
                "react-modal: no app element set, hiding <body>; \
                 call set_app_element(el) or pass app_element"
            );
        }
        self.dom.body()
    }

    /// Reset the shared counters and attributes.  The default app element is
    /// kept.
    pub fn reset_for_testing(&self) {
        self.aria.reset_for_testing();
        self.body_open.reset_for_testing();
    }
}
