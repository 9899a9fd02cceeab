//! Accessible modal dialog overlay.
//!
//! * [`aria_app_hider`] – reference-counted `aria-hidden` on app roots
//! * [`focus_manager`] / [`tabbable`] – focus capture, restore and Tab trap
//! * [`components::portal`] – out-of-tree mount point and animation phases
//! * [`components::modal`] – the component tying it all together
//!
//! The tree is reached through the [`dom::Dom`] trait and time through
//! [`scheduling::Scheduler`]; the in-memory implementations make the whole
//! thing usable (and testable) off the browser.  On `wasm32` the
//! [`bindings`] module exports a `WebModal` class over the real document.

#[macro_use]
mod macros;

pub mod aria_app_hider;
pub mod components;
pub mod config;
pub mod constants;
pub mod dom;
pub mod dom_utils;
pub mod error;
pub mod focus_manager;
pub mod scheduling;
pub mod services;
pub mod tabbable;

#[cfg(target_arch = "wasm32")]
pub mod bindings;

pub use components::{EventOutcome, KeyPress, Modal, PortalState};
pub use config::{ClassNames, ModalConfig, ModalProps, ModalStyle};
pub use dom::{Dom, NodeId, VirtualDom};
pub use error::DomError;
pub use focus_manager::TabTrap;
pub use scheduling::{ManualScheduler, Scheduler, TimerId};
pub use services::ModalServices;
