//! End-to-end behaviour of the modal component against the virtual
//! document: rendering, aria hiding, body class, stage classes, overlay
//! clicks and the open/close timing.

mod common;

use common::{Harness, Spy};
use react_modal_rs::{
    ClassNames, Dom, EventOutcome, KeyPress, Modal, ModalConfig, ModalStyle, PortalState,
};

type Config = ModalConfig<react_modal_rs::VirtualDom>;

#[test]
fn can_be_open_initially() {
    let h = Harness::new();
    let modal = Modal::mount(&h.services, Config::new().open(true).text("hello")).unwrap();
    assert_eq!(h.dom.inner_html(modal.content().unwrap()), "hello");
}

#[test]
fn can_be_closed_initially() {
    let h = Harness::new();
    let modal = Modal::mount(&h.services, Config::new().text("hello")).unwrap();
    assert_eq!(h.dom.inner_html(modal.portal_root().unwrap()), "");
    assert!(modal.content().is_none());
    assert_eq!(modal.state(), PortalState::Closed);
}

#[test]
fn default_config_values() {
    let h = Harness::new();
    let modal = Modal::mount(&h.services, Config::default()).unwrap();
    let props = &modal.config().props;
    assert!(!props.is_open);
    assert!(props.aria_hide_app);
    assert_eq!(props.close_timeout_ms, 0);
    assert!(props.should_close_on_overlay_click);
}

#[test]
fn renders_children_verbatim() {
    let h = Harness::new();
    let child = "I am a child of Modal, and he has sent me here...";
    let modal = Modal::mount(&h.services, Config::new().open(true).text(child)).unwrap();
    assert_eq!(h.dom.inner_html(modal.content().unwrap()), child);
}

#[test]
fn renders_into_the_body_not_in_context() {
    let h = Harness::new();
    let _modal = Modal::mount(&h.services, Config::new().open(true).aria_hide_app(false)).unwrap();
    let portals = h.portals();
    assert_eq!(portals.len(), 1);
    assert_eq!(h.dom.parent(&portals[0]), Some(h.body()));
}

#[test]
fn structure_is_portal_overlay_content() {
    let h = Harness::new();
    let modal = Modal::mount(
        &h.services,
        Config::new().open(true).content_label("Settings"),
    )
    .unwrap();
    let overlay = modal.overlay().unwrap();
    let content = modal.content().unwrap();
    assert_eq!(h.dom.parent(&overlay), modal.portal_root());
    assert_eq!(h.dom.parent(&content), Some(overlay));
    assert!(h.dom.has_class(&overlay, "ReactModal__Overlay"));
    assert!(h.dom.has_class(&content, "ReactModal__Content"));
    assert_eq!(h.dom.get_attribute(&content, "role").as_deref(), Some("dialog"));
    assert_eq!(h.dom.get_attribute(&content, "aria-label").as_deref(), Some("Settings"));
}

#[test]
fn removes_the_portal_node_on_unmount() {
    let h = Harness::new();
    let mut modal = Modal::mount(&h.services, Config::new().open(true).text("hello")).unwrap();
    modal.unmount().unwrap();
    assert!(h.portals().is_empty());
    // Second unmount is tolerated.
    modal.unmount().unwrap();
}

#[test]
fn dropping_a_mounted_modal_releases_everything() {
    let h = Harness::new();
    {
        let _modal = Modal::mount(&h.services, Config::new().open(true)).unwrap();
        assert!(h.aria_hidden(h.app));
    }
    assert!(h.portals().is_empty());
    assert!(!h.aria_hidden(h.app));
    assert!(!h.dom.has_class(&h.body(), "ReactModal__Body--open"));
}

#[test]
fn uses_the_global_app_element() {
    let h = Harness::new();
    let mut modal = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    assert!(h.aria_hidden(h.app));
    modal.unmount().unwrap();
    h.services.reset_for_testing();
    assert!(!h.aria_hidden(h.app));
}

#[test]
fn accepts_app_element_override() {
    let h = Harness::new();
    let el = h.dom.create_element("div").unwrap();
    let _modal = Modal::mount(&h.services, Config::new().open(true).app_element(el)).unwrap();
    assert!(h.aria_hidden(el));
    assert!(!h.aria_hidden(h.app));
}

#[test]
fn aria_hide_app_false_leaves_the_app_alone() {
    let h = Harness::new();
    let _modal = Modal::mount(&h.services, Config::new().open(true).aria_hide_app(false)).unwrap();
    assert!(!h.aria_hidden(h.app));
    assert_eq!(h.services.aria().count(&h.app), 0);
}

#[test]
fn non_hiding_modal_does_not_keep_the_app_hidden() {
    let h = Harness::new();
    let mut hiding = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    let mut plain =
        Modal::mount(&h.services, Config::new().open(true).aria_hide_app(false)).unwrap();
    assert!(h.aria_hidden(h.app));

    hiding.update(Config::new()).unwrap();
    assert!(!h.aria_hidden(h.app));
    plain.update(Config::new().aria_hide_app(false)).unwrap();
    assert!(!h.aria_hidden(h.app));
    assert_eq!(h.services.aria().count(&h.app), 0);
}

#[test]
fn hiding_modal_opened_after_a_non_hiding_one_hides_the_app() {
    let h = Harness::new();
    let mut plain =
        Modal::mount(&h.services, Config::new().open(true).aria_hide_app(false)).unwrap();
    let mut hiding = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    assert!(h.aria_hidden(h.app));
    assert_eq!(h.services.aria().count(&h.app), 1);

    plain.unmount().unwrap();
    assert!(h.aria_hidden(h.app));
    hiding.unmount().unwrap();
    assert!(!h.aria_hidden(h.app));
}

#[test]
fn shared_app_element_stays_hidden_until_every_modal_closes() {
    let h = Harness::new();
    let mut first = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    let mut second = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    assert!(h.aria_hidden(h.app));

    // Close out of opening order.
    first.update(Config::new().open(false)).unwrap();
    assert!(h.aria_hidden(h.app));
    second.update(Config::new().open(false)).unwrap();
    assert!(!h.aria_hidden(h.app));

    second.update(Config::new().open(true)).unwrap();
    assert!(h.aria_hidden(h.app));
    second.unmount().unwrap();
    assert!(!h.aria_hidden(h.app));
    first.unmount().unwrap();
    assert_eq!(h.services.aria().count(&h.app), 0);
}

#[test]
fn missing_app_element_falls_back_to_body() {
    let dom = std::rc::Rc::new(react_modal_rs::VirtualDom::new());
    let clock = std::rc::Rc::new(react_modal_rs::ManualScheduler::new());
    let services = react_modal_rs::ModalServices::new(dom.clone(), clock);
    let _modal = Modal::mount(&services, Config::new().open(true)).unwrap();
    assert_eq!(
        dom.get_attribute(&dom.body().unwrap(), "aria-hidden").as_deref(),
        Some("true")
    );
}

#[test]
fn adds_class_to_body_when_open() {
    let h = Harness::new();
    let body = h.body();
    let mut modal = Modal::mount(&h.services, Config::new()).unwrap();
    assert!(!h.dom.has_class(&body, "ReactModal__Body--open"));

    modal.update(Config::new().open(true)).unwrap();
    assert!(h.dom.has_class(&body, "ReactModal__Body--open"));

    modal.update(Config::new().open(false)).unwrap();
    assert!(!h.dom.has_class(&body, "ReactModal__Body--open"));
}

#[test]
fn body_class_is_shared_between_instances() {
    let h = Harness::new();
    let body = h.body();
    let mut a = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    let mut b = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    a.update(Config::new()).unwrap();
    assert!(h.dom.has_class(&body, "ReactModal__Body--open"));
    b.unmount().unwrap();
    assert!(!h.dom.has_class(&body, "ReactModal__Body--open"));
    a.unmount().unwrap();
    assert_eq!(h.services.body_open().open_count(), 0);
}

#[test]
fn adds_after_open_for_animations() {
    let h = Harness::new();
    let modal = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    let overlay = modal.overlay().unwrap();
    let content = modal.content().unwrap();
    assert_eq!(modal.state(), PortalState::BeforeOpen);

    h.clock.tick();
    assert_eq!(modal.state(), PortalState::Open);
    assert!(h.dom.has_class(&overlay, "ReactModal__Overlay--after-open"));
    assert!(h.dom.has_class(&content, "ReactModal__Content--after-open"));
}

#[test]
fn adds_before_close_for_animations() {
    let h = Harness::new();
    let mut modal = Modal::mount(
        &h.services,
        Config::new().open(true).aria_hide_app(false).close_timeout_ms(50),
    )
    .unwrap();
    h.clock.tick();
    modal
        .update(Config::new().aria_hide_app(false).close_timeout_ms(50))
        .unwrap();

    let overlay = modal.overlay().unwrap();
    let content = modal.content().unwrap();
    assert!(h.dom.has_class(&overlay, "ReactModal__Overlay--before-close"));
    assert!(h.dom.has_class(&content, "ReactModal__Content--before-close"));

    h.clock.advance(50);
    assert_eq!(modal.state(), PortalState::Closed);
    assert!(modal.overlay().is_none());
    assert_eq!(h.dom.inner_html(modal.portal_root().unwrap()), "");
}

#[test]
fn supports_custom_class_names() {
    let h = Harness::new();
    let modal = Modal::mount(
        &h.services,
        Config::new()
            .open(true)
            .class_name("myClass")
            .overlay_class_name("myOverlayClass"),
    )
    .unwrap();
    let content = modal.content().unwrap();
    let overlay = modal.overlay().unwrap();
    assert!(h.dom.has_class(&content, "myClass"));
    assert!(h.dom.has_class(&content, "ReactModal__Content"));
    assert!(h.dom.has_class(&overlay, "myOverlayClass"));
    // Custom classes bring no inline defaults.
    assert_eq!(h.dom.style(content, "top"), None);
    assert_eq!(h.dom.style(overlay, "background-color"), None);
}

#[test]
fn staged_class_names_replace_the_defaults() {
    let h = Harness::new();
    let modal = Modal::mount(
        &h.services,
        Config::new().open(true).class_name(ClassNames::Staged {
            base: "sheet".into(),
            after_open: "sheet--shown".into(),
            before_close: "sheet--leaving".into(),
        }),
    )
    .unwrap();
    let content = modal.content().unwrap();
    assert_eq!(h.dom.class_name(&content), "sheet");
    h.clock.tick();
    assert_eq!(h.dom.class_name(&content), "sheet sheet--shown");
}

#[test]
fn supports_style_overrides() {
    let h = Harness::new();
    let mut modal = Modal::mount(
        &h.services,
        Config::new().open(true).style(
            ModalStyle::default()
                .content("width", "20px")
                .content("position", "static")
                .overlay("width", "75px"),
        ),
    )
    .unwrap();
    let content = modal.content().unwrap();
    let overlay = modal.overlay().unwrap();
    assert_eq!(h.dom.style(content, "width").as_deref(), Some("20px"));
    assert_eq!(h.dom.style(content, "position").as_deref(), Some("static"));
    assert_eq!(h.dom.style(overlay, "width").as_deref(), Some("75px"));

    // A new config replaces the old one wholesale.
    modal
        .update(Config::new().open(true).style(ModalStyle::default().overlay("position", "static")))
        .unwrap();
    assert_eq!(h.dom.style(content, "width"), None);
    assert_eq!(h.dom.style(overlay, "position").as_deref(), Some("static"));
}

#[test]
fn update_rerenders_children_only_when_they_change() {
    let h = Harness::new();
    let config = Config::new().open(true).text("first");
    let mut modal = Modal::mount(&h.services, config.clone()).unwrap();
    let content = modal.content().unwrap();

    modal.update(config.content_label("same children")).unwrap();
    assert_eq!(h.dom.inner_html(content), "first");

    modal.update(Config::new().open(true).text("second")).unwrap();
    assert_eq!(h.dom.inner_html(content), "second");
}

#[test]
fn on_after_open_fires_once_per_open() {
    let h = Harness::new();
    let spy = Spy::default();
    let config = || Config::new().on_after_open(spy.callback());
    let mut modal = Modal::mount(&h.services, config().open(true)).unwrap();
    assert_eq!(spy.calls(), 1);
    modal.update(config().open(true)).unwrap();
    assert_eq!(spy.calls(), 1);
    modal.update(config()).unwrap();
    modal.update(config().open(true)).unwrap();
    assert_eq!(spy.calls(), 2);
}

#[test]
fn overlay_click_requests_close_when_enabled() {
    let h = Harness::new();
    let spy = Spy::default();
    let modal = Modal::mount(
        &h.services,
        Config::new()
            .open(true)
            .should_close_on_overlay_click(true)
            .on_request_close(spy.callback()),
    )
    .unwrap();
    assert!(modal.handle_overlay_click(&modal.overlay().unwrap()).unwrap());
    assert_eq!(spy.calls(), 1);
    // The component never closes itself.
    assert!(modal.config().props.is_open);
    assert!(modal.content().is_some());
}

#[test]
fn overlay_click_is_ignored_when_disabled() {
    let h = Harness::new();
    let spy = Spy::default();
    let modal = Modal::mount(
        &h.services,
        Config::new()
            .open(true)
            .should_close_on_overlay_click(false)
            .on_request_close(spy.callback()),
    )
    .unwrap();
    assert!(!modal.handle_overlay_click(&modal.overlay().unwrap()).unwrap());
    assert!(!spy.called());
}

#[test]
fn clicks_inside_content_never_request_close() {
    let h = Harness::new();
    let spy = Spy::default();
    let modal = Modal::mount(
        &h.services,
        Config::new()
            .open(true)
            .on_request_close(spy.callback())
            .children(|dom, content| {
                let button = dom.create_element("button")?;
                dom.append_child(content, &button)
            }),
    )
    .unwrap();
    let content = modal.content().unwrap();
    let button = h.dom.children(&content)[0];
    assert!(!modal.handle_overlay_click(&content).unwrap());
    assert!(!modal.handle_overlay_click(&button).unwrap());
    assert!(!spy.called());
}

#[test]
fn overlay_click_without_listener_refocuses_content() {
    let h = Harness::new();
    let outside = h.dom.append_element(h.body(), "button").unwrap();
    let modal = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    h.dom.focus(&outside).unwrap();
    assert!(!modal.handle_overlay_click(&modal.overlay().unwrap()).unwrap());
    assert_eq!(h.dom.active_element(), modal.content());
}

#[test]
fn escape_requests_close() {
    let h = Harness::new();
    let spy = Spy::default();
    let modal = Modal::mount(
        &h.services,
        Config::new().open(true).on_request_close(spy.callback()),
    )
    .unwrap();
    assert_eq!(
        modal.handle_key_down(&KeyPress::escape()).unwrap(),
        EventOutcome::PreventDefault
    );
    assert_eq!(spy.calls(), 1);
    assert_eq!(
        modal.handle_key_down(&KeyPress::new("a")).unwrap(),
        EventOutcome::Propagate
    );
}

#[test]
fn rapid_toggling_keeps_exactly_one_portal() {
    let h = Harness::new();
    let config = |open: bool| Config::new().open(open).close_timeout_ms(50).text("hi");
    let mut modal = Modal::mount(&h.services, config(false)).unwrap();

    for open in [true, false, true, false, true] {
        modal.update(config(open)).unwrap();
        assert_eq!(h.portals().len(), 1);
        assert!(h.dom.children(&modal.portal_root().unwrap()).len() <= 1);
        h.clock.advance(10);
    }
    h.clock.advance(200);
    assert_eq!(modal.state(), PortalState::Open);
    assert_eq!(h.portals().len(), 1);
    assert_eq!(h.dom.inner_html(modal.content().unwrap()), "hi");

    // Close with the timer still pending, then unmount.
    modal.update(config(false)).unwrap();
    assert_eq!(h.clock.pending(), 1);
    modal.unmount().unwrap();
    assert_eq!(h.clock.pending(), 0);
    assert!(h.portals().is_empty());
    h.clock.advance(100);
}

#[test]
fn focus_returns_to_the_opener_on_close() {
    let h = Harness::new();
    let opener = h.dom.append_element(h.app, "button").unwrap();
    h.dom.focus(&opener).unwrap();

    let mut modal = Modal::mount(&h.services, Config::new().open(true)).unwrap();
    assert_eq!(h.dom.active_element(), modal.content());

    modal.update(Config::new()).unwrap();
    assert_eq!(h.dom.active_element(), Some(opener));
}

#[test]
fn props_from_json_drive_the_component() {
    let h = Harness::new();
    let props: react_modal_rs::ModalProps =
        serde_json::from_str(r#"{"isOpen": true, "ariaHideApp": false, "className": "fromJson"}"#)
            .unwrap();
    let modal = Modal::mount(&h.services, Config::from_props(props)).unwrap();
    assert!(h.dom.has_class(&modal.content().unwrap(), "fromJson"));
    assert!(!h.aria_hidden(h.app));
}
