use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::dom;

/// Links that navigate within the current page.
const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";

/// Intercept clicks on every in-page anchor link and animate the scroll
/// instead of letting the browser jump.
pub fn init() {
    let Some(document) = dom::document() else {
        return;
    };
    let Ok(anchors) = document.query_selector_all(ANCHOR_SELECTOR) else {
        return;
    };
    dom::for_each_element(&anchors, bind_anchor);
}

fn bind_anchor(anchor: Element) {
    let target = anchor.clone();
    let closure = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        if let Some(href) = target.get_attribute("href") {
            scroll_to_fragment(&href);
        }
    }) as Box<dyn Fn(Event)>);

    let _ = anchor.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Smooth-scroll the element addressed by `fragment` (e.g. `#theory`) to
/// the top of the viewport. Dangling fragments scroll nothing.
fn scroll_to_fragment(fragment: &str) {
    let Some(document) = dom::document() else {
        return;
    };
    let Some(target) = document.query_selector(fragment).ok().flatten() else {
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::wasm_bindgen_test;
    use web_sys::{Event, EventInit, HtmlElement};

    use super::*;
    use crate::dom;

    fn body() -> HtmlElement {
        dom::document().unwrap().body().unwrap()
    }

    fn mount_anchor(href: &str) -> Element {
        let document = dom::document().unwrap();
        let anchor = document.create_element("a").unwrap();
        anchor.set_attribute("href", href).unwrap();
        body().append_child(&anchor).unwrap();
        anchor
    }

    fn click_event() -> Event {
        let init = EventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        Event::new_with_event_init_dict("click", &init).unwrap()
    }

    #[wasm_bindgen_test]
    fn dangling_fragment_click_is_prevented_and_harmless() {
        let anchor = mount_anchor("#does-not-exist-anywhere");
        bind_anchor(anchor.clone());

        let event = click_event();
        let not_prevented = anchor.dispatch_event(&event).unwrap();

        assert!(!not_prevented, "default navigation should be prevented");
        assert!(event.default_prevented());
    }

    #[wasm_bindgen_test]
    fn bare_hash_href_does_not_raise() {
        let anchor = mount_anchor("#");
        bind_anchor(anchor.clone());

        let event = click_event();
        // querySelector("#") is a selector syntax error; it must be
        // swallowed, with default prevention still applied.
        let not_prevented = anchor.dispatch_event(&event).unwrap();
        assert!(!not_prevented);
    }

    #[wasm_bindgen_test]
    fn existing_fragment_scrolls_without_error() {
        let document = dom::document().unwrap();
        let section = document.create_element("div").unwrap();
        section.set_id("scroll-target-section");
        body().append_child(&section).unwrap();

        let anchor = mount_anchor("#scroll-target-section");
        bind_anchor(anchor.clone());

        let event = click_event();
        let not_prevented = anchor.dispatch_event(&event).unwrap();
        assert!(!not_prevented);
    }
}
