//! Browser entry point: a `WebModal` class exported through wasm-bindgen.
//!
//! JS owns the props object and the callbacks; this layer converts them,
//! forwards DOM events from the portal root to the [`Modal`] controller and
//! keeps the event closures alive until `unmount()`.
//!
//! ```js
//! WebModal.setAppElement(document.getElementById("app"));
//! const modal = new WebModal({ isOpen: true, closeTimeoutMS: 150 },
//!                            () => modal.update({ isOpen: false }),
//!                            null, null, "<p>Hello</p>");
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, KeyboardEvent, Node};

use crate::components::{EventOutcome, KeyPress, Modal};
use crate::config::{Callback, Children, ModalConfig, ModalProps};
use crate::dom::WebDom;
use crate::scheduling::GlooScheduler;
use crate::services::ModalServices;

// One set of services per page, created on first use.
thread_local! {
    static SERVICES: RefCell<Option<Rc<ModalServices<WebDom>>>> = RefCell::new(None);
}

fn services() -> Result<Rc<ModalServices<WebDom>>, JsValue> {
    SERVICES.with(|cell| {
        let mut slot = cell.borrow_mut();
        if let Some(services) = slot.as_ref() {
            return Ok(services.clone());
        }
        let services = ModalServices::new(Rc::new(WebDom::new()?), Rc::new(GlooScheduler::new()));
        *slot = Some(services.clone());
        Ok(services)
    })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

// JS callbacks must not run while the controller is borrowed (they usually
// call `update`), so they are queued and flushed after each entry point.
type Deferred = Rc<RefCell<Vec<Function>>>;

fn defer(queue: &Deferred, function: Option<Function>) -> Option<Callback> {
    function.map(|f| {
        let queue = queue.clone();
        Rc::new(move || queue.borrow_mut().push(f.clone())) as Callback
    })
}

fn flush(queue: &Deferred) {
    let calls: Vec<Function> = queue.borrow_mut().drain(..).collect();
    for call in calls {
        if let Err(err) = call.call0(&JsValue::NULL) {
            web_sys::console::error_1(&err);
        }
    }
}

fn event_target_node(event: &Event) -> Option<Node> {
    event.target().and_then(|t| t.dyn_into::<Node>().ok())
}

#[wasm_bindgen]
pub struct WebModal {
    modal: Rc<RefCell<Modal<WebDom>>>,
    deferred: Deferred,
    children: Option<(String, Children<WebDom>)>,
    root: Option<Node>,
    listeners: Vec<(&'static str, Closure<dyn FnMut(Event)>)>,
}

impl WebModal {
    fn children_for(&mut self, html: Option<String>) -> Option<Children<WebDom>> {
        let html = html?;
        if let Some((previous, render)) = &self.children {
            if *previous == html {
                return Some(render.clone());
            }
        }
        let markup = html.clone();
        let render: Children<WebDom> = Rc::new(move |_dom: &WebDom, content: &Node| {
            if let Some(el) = content.dyn_ref::<Element>() {
                el.set_inner_html(&markup);
            }
            Ok(())
        });
        self.children = Some((html, render.clone()));
        Some(render)
    }

    fn config(
        &mut self,
        props: JsValue,
        on_request_close: Option<Function>,
        on_after_open: Option<Function>,
        app_element: Option<Element>,
        children_html: Option<String>,
    ) -> Result<ModalConfig<WebDom>, JsValue> {
        let props: ModalProps = if props.is_undefined() || props.is_null() {
            ModalProps::default()
        } else {
            serde_wasm_bindgen::from_value(props)?
        };
        let mut config = ModalConfig::from_props(props);
        config.app_element = app_element.map(Into::into);
        config.on_request_close = defer(&self.deferred, on_request_close);
        config.on_after_open = defer(&self.deferred, on_after_open);
        config.children = self.children_for(children_html);
        Ok(config)
    }

    fn listen<F>(&mut self, event: &'static str, handler: F) -> Result<(), JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let Some(root) = &self.root else {
            return Ok(());
        };
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        root.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((event, closure));
        Ok(())
    }

    fn attach_listeners(&mut self) -> Result<(), JsValue> {
        {
            let modal = self.modal.clone();
            let deferred = self.deferred.clone();
            self.listen("click", move |event| {
                if let (Some(target), Ok(modal)) = (event_target_node(&event), modal.try_borrow()) {
                    if let Err(err) = modal.handle_overlay_click(&target) {
                        warn_log!("overlay click failed: {}", err);
                    }
                }
                flush(&deferred);
            })?;
        }
        {
            let modal = self.modal.clone();
            let deferred = self.deferred.clone();
            self.listen("keydown", move |event| {
                let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = KeyPress::new(&key_event.key()).with_shift(key_event.shift_key());
                // Focus moves below re-enter through focusin; a shared borrow
                // lets that handler run.
                if let Ok(modal) = modal.try_borrow() {
                    match modal.handle_key_down(&key) {
                        Ok(EventOutcome::PreventDefault) => event.prevent_default(),
                        Ok(EventOutcome::Propagate) => {}
                        Err(err) => warn_log!("keydown failed: {}", err),
                    }
                }
                flush(&deferred);
            })?;
        }
        {
            let modal = self.modal.clone();
            self.listen("focusin", move |event| {
                if let (Some(target), Ok(modal)) = (event_target_node(&event), modal.try_borrow()) {
                    modal.handle_focus_in(&target);
                }
            })?;
        }
        {
            let modal = self.modal.clone();
            self.listen("focusout", move |_event| {
                if let Ok(mut modal) = modal.try_borrow_mut() {
                    modal.handle_focus_out();
                }
            })?;
        }
        Ok(())
    }
}

#[wasm_bindgen]
impl WebModal {
    #[wasm_bindgen(constructor)]
    pub fn new(
        props: JsValue,
        on_request_close: Option<Function>,
        on_after_open: Option<Function>,
        app_element: Option<Element>,
        children_html: Option<String>,
    ) -> Result<WebModal, JsValue> {
        let services = services()?;
        let deferred: Deferred = Rc::new(RefCell::new(Vec::new()));

        // Mount closed so the listeners are in place before the first open
        // transition moves focus.
        let mut shell = WebModal {
            modal: Rc::new(RefCell::new(Modal::mount(&services, ModalConfig::new())?)),
            deferred,
            children: None,
            root: None,
            listeners: Vec::new(),
        };
        shell.root = shell.modal.borrow().portal_root();
        shell.attach_listeners()?;

        let config = shell.config(
            props,
            on_request_close,
            on_after_open,
            app_element,
            children_html,
        )?;
        shell.modal.borrow_mut().update(config)?;
        flush(&shell.deferred);
        Ok(shell)
    }

    pub fn update(
        &mut self,
        props: JsValue,
        on_request_close: Option<Function>,
        on_after_open: Option<Function>,
        app_element: Option<Element>,
        children_html: Option<String>,
    ) -> Result<(), JsValue> {
        let config = self.config(
            props,
            on_request_close,
            on_after_open,
            app_element,
            children_html,
        )?;
        self.modal.borrow_mut().update(config)?;
        flush(&self.deferred);
        Ok(())
    }

    pub fn unmount(&mut self) -> Result<(), JsValue> {
        self.modal.borrow_mut().unmount()?;
        if let Some(root) = self.root.take() {
            for (event, closure) in self.listeners.drain(..) {
                let _ = root
                    .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            }
        }
        self.deferred.borrow_mut().clear();
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn portal(&self) -> Option<Node> {
        self.modal.borrow().portal_root()
    }

    #[wasm_bindgen(getter)]
    pub fn overlay(&self) -> Option<Node> {
        self.modal.borrow().overlay()
    }

    #[wasm_bindgen(getter)]
    pub fn content(&self) -> Option<Node> {
        self.modal.borrow().content()
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        format!("{:?}", self.modal.borrow().state())
    }

    #[wasm_bindgen(js_name = setAppElement)]
    pub fn set_app_element(element: Element) -> Result<(), JsValue> {
        services()?.set_app_element(element.into());
        Ok(())
    }

    #[wasm_bindgen(js_name = resetForTesting)]
    pub fn reset_for_testing() -> Result<(), JsValue> {
        services()?.reset_for_testing();
        Ok(())
    }
}

// `free()` from JS without `unmount()` must not leave listeners pointing at
// dropped closures.
impl Drop for WebModal {
    fn drop(&mut self) {
        if self.root.is_some() {
            if let Err(err) = self.unmount() {
                web_sys::console::error_1(&err);
            }
        }
    }
}
