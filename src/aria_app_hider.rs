//! Reference-counted `aria-hidden` toggling for application root elements.
//!
//! Every open modal asks for its app element to be hidden from assistive
//! technology.  Several modals may share one app element and they do not
//! close in strict LIFO order, so each element carries a count: the
//! attribute is set on the 0→1 transition and cleared on 1→0.
//!
//! # Invariants
//!
//! - An element is hidden iff its count is > 0.
//! - Only callers that want the app hidden touch the count; a modal with
//!   hiding disabled never calls in, so it cannot unbalance a shared element.
//! - Unbalanced `show()` calls floor at zero and never error.
//! - Distinct elements are tracked independently.

use std::cell::RefCell;
use std::rc::Rc;

use crate::constants::ATTR_ARIA_HIDDEN;
use crate::dom::Dom;
use crate::error::DomError;

pub struct AriaAppHider<D: Dom> {
    dom: Rc<D>,
    // Element handles are not hashable in the browser, and the number of
    // distinct app roots is tiny.
    counts: RefCell<Vec<(D::Node, usize)>>,
}

impl<D: Dom> AriaAppHider<D> {
    pub fn new(dom: Rc<D>) -> Self {
        Self {
            dom,
            counts: RefCell::new(Vec::new()),
        }
    }

    /// Current reference count for `element`.
    pub fn count(&self, element: &D::Node) -> usize {
        self.counts
            .borrow()
            .iter()
            .find(|(el, _)| el == element)
            .map_or(0, |(_, n)| *n)
    }

    pub fn is_hidden(&self, element: &D::Node) -> bool {
        self.dom
            .get_attribute(element, ATTR_ARIA_HIDDEN)
            .is_some_and(|v| v == "true")
    }

    pub fn hide(&self, element: &D::Node) -> Result<(), DomError> {
        let became_hidden = {
            let mut counts = self.counts.borrow_mut();
            match counts.iter_mut().find(|(el, _)| el == element) {
                Some((_, n)) => {
                    *n += 1;
                    *n == 1
                }
                None => {
                    counts.push((element.clone(), 1));
                    true
                }
            }
        };
        if became_hidden {
            self.dom.set_attribute(element, ATTR_ARIA_HIDDEN, "true")?;
        }
        Ok(())
    }

    pub fn show(&self, element: &D::Node) -> Result<(), DomError> {
        let became_visible = {
            let mut counts = self.counts.borrow_mut();
            match counts.iter().position(|(el, _)| el == element) {
                Some(index) => {
                    let n = &mut counts[index].1;
                    *n = n.saturating_sub(1);
                    if *n == 0 {
                        counts.swap_remove(index);
                        true
                    } else {
                        false
                    }
                }
                None => false,
            }
        };
        if became_visible {
            self.dom.remove_attribute(element, ATTR_ARIA_HIDDEN)?;
        }
        Ok(())
    }

    /// Forget every count and strip the attribute from every tracked
    /// element.  Meant for isolating tests that share one service object.
    pub fn reset_for_testing(&self) {
        let tracked: Vec<_> = self.counts.borrow_mut().drain(..).collect();
        for (element, _) in tracked {
            let _ = self.dom.remove_attribute(&element, ATTR_ARIA_HIDDEN);
        }
    }
}
