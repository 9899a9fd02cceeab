//! Focus capture / restore and Tab trapping for one modal instance.
//!
//! Lifecycle per open:
//!
//! 1. `capture_active()` before the portal renders.
//! 2. `focus_content(content)` once it is in the document.
//! 3. Tab key-downs go through `trap_tab_key`; `note_focus_in` /
//!    `handle_focus_out` keep focus from drifting out of the content.
//! 4. `restore_active()` + `teardown()` when closing starts.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::{ATTR_AUTOFOCUS, ATTR_TABINDEX, TABINDEX_PROGRAMMATIC};
use crate::dom::Dom;
use crate::error::DomError;
use crate::scheduling::{Scheduler, TimerId};
use crate::tabbable;

/// What a Tab key-down turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabTrap<N> {
    /// Nothing tabbable inside: default prevented, focus stays put.
    Pinned,
    /// Focus wrapped around to this element; default prevented.
    Wrapped(N),
    /// Let the browser move focus.
    Native,
}

impl<N> TabTrap<N> {
    pub fn prevents_default(&self) -> bool {
        !matches!(self, TabTrap::Native)
    }
}

pub struct FocusManager<D: Dom> {
    dom: Rc<D>,
    scheduler: Rc<dyn Scheduler>,
    captured: Option<D::Node>,
    last_inside: Rc<RefCell<Option<D::Node>>>,
    pending_check: Option<TimerId>,
}

impl<D: Dom> FocusManager<D> {
    pub fn new(dom: Rc<D>, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            dom,
            scheduler,
            captured: None,
            last_inside: Rc::new(RefCell::new(None)),
            pending_check: None,
        }
    }

    /// Element captured at open time, if any.
    pub fn captured(&self) -> Option<&D::Node> {
        self.captured.as_ref()
    }

    pub fn capture_active(&mut self) {
        self.captured = self.dom.active_element();
    }

    /// Give focus back to the captured element.  The record is consumed;
    /// a detached element is skipped silently.
    pub fn restore_active(&mut self) -> Result<(), DomError> {
        match self.captured.take() {
            Some(node) if self.dom.is_connected(&node) => self.dom.focus(&node),
            Some(node) => {
                debug_log!("focus restore skipped, {:?} left the document", node);
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn focus_content(&self, root: &D::Node) -> Result<(), DomError> {
        focus_inside(self.dom.as_ref(), root, &self.last_inside)
    }

    pub fn trap_tab_key(&self, shift: bool, root: &D::Node) -> Result<TabTrap<D::Node>, DomError> {
        let dom = self.dom.as_ref();
        let tabbable = tabbable::find_tabbable(dom, root);
        let (Some(first), Some(last)) = (tabbable.first(), tabbable.last()) else {
            return Ok(TabTrap::Pinned);
        };

        let edge = if shift { first } else { last };
        let active = dom.active_element();
        let leaving = match &active {
            Some(node) => node == edge || node == root,
            None => false,
        };
        if !leaving {
            return Ok(TabTrap::Native);
        }

        let target = if shift { last } else { first };
        dom.focus(target)?;
        Ok(TabTrap::Wrapped(target.clone()))
    }

    /// Remember the latest element focused inside `root`.
    pub fn note_focus_in(&self, target: &D::Node, root: &D::Node) {
        if target != root && self.dom.contains(root, target) {
            *self.last_inside.borrow_mut() = Some(target.clone());
        }
    }

    /// Focus left something inside the modal.  On the next tick, if it
    /// landed outside `root` (browser chrome, another window), pull it back.
    pub fn handle_focus_out(&mut self, root: &D::Node) {
        if let Some(id) = self.pending_check.take() {
            self.scheduler.cancel(id);
        }
        let dom = self.dom.clone();
        let root = root.clone();
        let last_inside = self.last_inside.clone();
        let id = self.scheduler.schedule(
            0,
            Box::new(move || {
                let inside = dom
                    .active_element()
                    .is_some_and(|active| dom.contains(&root, &active));
                if inside || !dom.is_connected(&root) {
                    return;
                }
                if let Err(err) = focus_inside(dom.as_ref(), &root, &last_inside) {
                    warn_log!("could not return focus to modal: {}", err);
                }
            }),
        );
        self.pending_check = Some(id);
    }

    /// Stop scoped focus for this open cycle.
    pub fn teardown(&mut self) {
        if let Some(id) = self.pending_check.take() {
            self.scheduler.cancel(id);
        }
        self.last_inside.borrow_mut().take();
    }
}

fn focus_inside<D: Dom>(
    dom: &D,
    root: &D::Node,
    last_inside: &RefCell<Option<D::Node>>,
) -> Result<(), DomError> {
    let remembered = last_inside.borrow().clone();
    if let Some(node) = remembered {
        if node != *root && dom.contains(root, &node) && dom.is_connected(&node) {
            return dom.focus(&node);
        }
    }

    if let Some(auto) = dom
        .descendants(root)
        .into_iter()
        .find(|n| dom.get_attribute(n, ATTR_AUTOFOCUS).is_some())
    {
        return dom.focus(&auto);
    }

    if dom.get_attribute(root, ATTR_TABINDEX).is_none() {
        dom.set_attribute(root, ATTR_TABINDEX, TABINDEX_PROGRAMMATIC)?;
    }
    dom.focus(root)
}
