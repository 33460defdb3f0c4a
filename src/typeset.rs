use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit, MutationRecord};

use crate::dom;

/// Content regions whose dynamically loaded children carry math notation.
const CONTENT_SECTION_SELECTOR: &str = ".content-section";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = MathJax, js_name = typesetPromise)]
    fn mathjax_typeset_promise() -> js_sys::Promise;
}

/// Whether the MathJax global is loaded on this page.
///
/// Pages without math content never load the engine, so every caller
/// treats `false` as "nothing to do" rather than an error.
fn engine_available() -> bool {
    js_sys::eval("typeof MathJax !== 'undefined' && typeof MathJax.typesetPromise === 'function'")
        .map(|v| v.as_bool().unwrap_or(false))
        .unwrap_or(false)
}

/// Typeset all pending math notation, if the engine is present.
///
/// Fire-and-forget: the engine's promise is dropped, not awaited.
/// Re-running over already-typeset content is idempotent.
fn typeset_pending() {
    if engine_available() {
        let _ = mathjax_typeset_promise();
    }
}

/// Initial typeset pass plus re-typesetting when content sections change.
pub fn init() {
    typeset_pending();
    observe_content_sections();
}

/// Watch every content section for added/removed descendants and re-run
/// the typesetter on each childList mutation.
fn observe_content_sections() {
    let Some(document) = dom::document() else {
        return;
    };
    let Ok(sections) = document.query_selector_all(CONTENT_SECTION_SELECTOR) else {
        return;
    };

    let callback = Closure::wrap(Box::new(
        move |mutations: js_sys::Array, _observer: MutationObserver| {
            for mutation in mutations.iter() {
                let Ok(record) = mutation.dyn_into::<MutationRecord>() else {
                    continue;
                };
                if record.type_() == "childList" {
                    typeset_pending();
                }
            }
        },
    )
        as Box<dyn Fn(js_sys::Array, MutationObserver)>);

    let Ok(observer) = MutationObserver::new(callback.as_ref().unchecked_ref()) else {
        return;
    };

    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);

    dom::for_each_element(&sections, |section| {
        let _ = observer.observe_with_options(&section, &options);
    });
    callback.forget(); // keep the observer callback alive
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    use super::*;
    use crate::dom;

    #[wasm_bindgen_test]
    fn init_without_engine_is_a_silent_noop() {
        // The test page never loads MathJax.
        assert!(!engine_available());

        let document = dom::document().unwrap();
        let section = document.create_element("div").unwrap();
        section.set_class_name("content-section");
        document.body().unwrap().append_child(&section).unwrap();

        init();
        // Mutating the observed section must not raise either.
        let child = document.create_element("p").unwrap();
        section.append_child(&child).unwrap();
    }
}
