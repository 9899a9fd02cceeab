//! Shared fixture for the integration suites: a fresh virtual document,
//! a manual clock and one service object wired to both.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use react_modal_rs::{Dom, ManualScheduler, ModalServices, NodeId, VirtualDom};

pub struct Harness {
    pub dom: Rc<VirtualDom>,
    pub clock: Rc<ManualScheduler>,
    pub services: Rc<ModalServices<VirtualDom>>,
    pub app: NodeId,
}

impl Harness {
    pub fn new() -> Self {
        let dom = Rc::new(VirtualDom::new());
        let clock = Rc::new(ManualScheduler::new());
        let services = ModalServices::new(dom.clone(), clock.clone());
        let app = dom.append_element(dom.body().unwrap(), "div").unwrap();
        services.set_app_element(app);
        Self {
            dom,
            clock,
            services,
            app,
        }
    }

    pub fn body(&self) -> NodeId {
        self.dom.body().unwrap()
    }

    pub fn portals(&self) -> Vec<NodeId> {
        self.dom.query_class("ReactModalPortal")
    }

    pub fn aria_hidden(&self, node: NodeId) -> bool {
        self.dom.get_attribute(&node, "aria-hidden").as_deref() == Some("true")
    }
}

/// Counts how many times a callback fired.
#[derive(Clone, Default)]
pub struct Spy(Rc<Cell<usize>>);

impl Spy {
    pub fn calls(&self) -> usize {
        self.0.get()
    }

    pub fn called(&self) -> bool {
        self.calls() > 0
    }

    pub fn callback(&self) -> impl Fn() + 'static {
        let inner = self.0.clone();
        move || inner.set(inner.get() + 1)
    }
}
