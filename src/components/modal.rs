//! The modal component: one instance per dialog.
//!
//! Composes the shared services with a per-instance [`PortalController`]
//! and [`FocusManager`], and sequences the open / close transitions:
//!
//! * open  – hide app → capture focus → portal open → focus content →
//!   `on_after_open`
//! * close – restore focus → portal close (maybe delayed) → show app
//!
//! The modal never closes itself.  Overlay clicks and Escape only call
//! `on_request_close`; the owner decides and passes `is_open = false`.

use std::rc::Rc;

use crate::components::portal::{Appearance, PortalController, PortalState};
use crate::config::ModalConfig;
use crate::constants::{KEY_ESCAPE, KEY_ESCAPE_LEGACY, KEY_TAB};
use crate::dom::Dom;
use crate::error::DomError;
use crate::focus_manager::{FocusManager, TabTrap};
use crate::services::ModalServices;

/// A key-down as the modal sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    /// `KeyboardEvent.key`
    pub key: String,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            shift: false,
        }
    }

    pub fn tab() -> Self {
        Self::new(KEY_TAB)
    }

    pub fn shift_tab() -> Self {
        Self::tab().with_shift(true)
    }

    pub fn escape() -> Self {
        Self::new(KEY_ESCAPE)
    }

    pub fn with_shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }
}

/// Whether the host should call `preventDefault()` on the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    PreventDefault,
    Propagate,
}

pub struct Modal<D: Dom> {
    services: Rc<ModalServices<D>>,
    config: ModalConfig<D>,
    portal: PortalController<D>,
    focus: FocusManager<D>,
    // App element this instance counted on the aria stack.  Stays `None`
    // while `aria_hide_app` is off.
    hidden_app: Option<D::Node>,
    mounted: bool,
}

impl<D: Dom> Modal<D> {
    /// Mount with the portal root appended to `<body>`.
    pub fn mount(
        services: &Rc<ModalServices<D>>,
        config: ModalConfig<D>,
    ) -> Result<Self, DomError> {
        Self::mount_in(services, config, None)
    }

    /// Mount with the portal root appended to `parent` (or `<body>`).
    pub fn mount_in(
        services: &Rc<ModalServices<D>>,
        config: ModalConfig<D>,
        parent: Option<&D::Node>,
    ) -> Result<Self, DomError> {
        let portal = PortalController::new(services.clone(), Appearance::from_config(&config));
        portal.mount(parent)?;
        let mut modal = Self {
            focus: FocusManager::new(services.dom().clone(), services.scheduler().clone()),
            services: services.clone(),
            config,
            portal,
            hidden_app: None,
            mounted: true,
        };
        if modal.config.props.is_open {
            modal.open()?;
        }
        Ok(modal)
    }

    /// Replace the configuration wholesale and run whatever transition the
    /// `is_open` edge calls for.
    pub fn update(&mut self, config: ModalConfig<D>) -> Result<(), DomError> {
        if !self.mounted {
            return Err(DomError::NotMounted);
        }
        let was_open = self.config.props.is_open;
        self.config = config;
        self.portal.set_appearance(Appearance::from_config(&self.config))?;

        match (was_open, self.config.props.is_open) {
            (false, true) => self.open(),
            (true, false) => self.close(),
            _ => Ok(()),
        }
    }

    /// Release everything this instance holds: pending timers, aria count,
    /// body class and the portal root.  A second call is a no-op.
    pub fn unmount(&mut self) -> Result<(), DomError> {
        if !self.mounted {
            if cfg!(debug_assertions) {
                warn_log!("react-modal: unmount called on an unmounted modal");
            }
            return Ok(());
        }
        self.mounted = false;
        self.focus.teardown();
        let aria = self.release_app();
        self.portal.unmount()?;
        aria
    }

    pub fn config(&self) -> &ModalConfig<D> {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn state(&self) -> PortalState {
        self.portal.state()
    }

    pub fn portal_root(&self) -> Option<D::Node> {
        self.portal.root()
    }

    pub fn overlay(&self) -> Option<D::Node> {
        self.portal.overlay()
    }

    pub fn content(&self) -> Option<D::Node> {
        self.portal.content()
    }

    fn open(&mut self) -> Result<(), DomError> {
        let props = &self.config.props;
        if props.aria_hide_app && self.hidden_app.is_none() {
            let app = self
                .services
                .resolve_app_element(self.config.app_element.as_ref(), true)?;
            self.services.aria().hide(&app)?;
            self.hidden_app = Some(app);
        }

        self.focus.capture_active();
        self.portal.set_open(true, props.close_timeout_ms)?;
        if let Some(content) = self.portal.content() {
            self.focus.focus_content(&content)?;
        }

        if let Some(callback) = self.config.on_after_open.clone() {
            callback();
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), DomError> {
        self.focus.restore_active()?;
        self.focus.teardown();
        self.portal.set_open(false, self.config.props.close_timeout_ms)?;
        self.release_app()
    }

    fn release_app(&mut self) -> Result<(), DomError> {
        match self.hidden_app.take() {
            Some(app) => self.services.aria().show(&app),
            None => Ok(()),
        }
    }

    fn request_close(&self) -> bool {
        match &self.config.on_request_close {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Click anywhere in the portal.  Only a click whose target is the
    /// overlay element itself counts; clicks inside the content never do.
    /// Returns whether `on_request_close` was called.
    pub fn handle_overlay_click(&self, target: &D::Node) -> Result<bool, DomError> {
        let Some(overlay) = self.portal.overlay() else {
            return Ok(false);
        };
        if *target != overlay || !self.config.props.should_close_on_overlay_click {
            return Ok(false);
        }
        if self.request_close() {
            return Ok(true);
        }
        // Nobody is listening, so at least keep focus in the dialog.
        if let Some(content) = self.portal.content() {
            self.focus.focus_content(&content)?;
        }
        Ok(false)
    }

    pub fn handle_key_down(&self, key: &KeyPress) -> Result<EventOutcome, DomError> {
        let Some(content) = self.portal.content() else {
            return Ok(EventOutcome::Propagate);
        };
        match key.key.as_str() {
            KEY_TAB => {
                let trap = self.focus.trap_tab_key(key.shift, &content)?;
                Ok(if trap.prevents_default() {
                    EventOutcome::PreventDefault
                } else {
                    EventOutcome::Propagate
                })
            }
            KEY_ESCAPE | KEY_ESCAPE_LEGACY => {
                self.request_close();
                Ok(EventOutcome::PreventDefault)
            }
            _ => Ok(EventOutcome::Propagate),
        }
    }

    /// Same as [`handle_key_down`](Self::handle_key_down) for Tab, but
    /// returns where focus went.
    pub fn trap_tab(&self, shift: bool) -> Result<Option<TabTrap<D::Node>>, DomError> {
        match self.portal.content() {
            Some(content) => self.focus.trap_tab_key(shift, &content).map(Some),
            None => Ok(None),
        }
    }

    pub fn handle_focus_in(&self, target: &D::Node) {
        if let Some(content) = self.portal.content() {
            self.focus.note_focus_in(target, &content);
        }
    }

    pub fn handle_focus_out(&mut self) {
        if !self.config.props.is_open {
            return;
        }
        if let Some(content) = self.portal.content() {
            self.focus.handle_focus_out(&content);
        }
    }
}

impl<D: Dom> Drop for Modal<D> {
    fn drop(&mut self) {
        if self.mounted {
            if let Err(err) = self.unmount() {
                warn_log!("react-modal: unmount on drop failed: {}", err);
            }
        }
    }
}
