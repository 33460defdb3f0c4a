use wasm_bindgen::JsCast;
use web_sys::{Document, Element, NodeList};

/// Bootstrap utility class used by the templates to hide panel regions.
pub const HIDDEN_CLASS: &str = "d-none";

/// Attempts to get the page's document.
///
/// Returns `None` when running outside a browser environment, in which
/// case every DOM operation in this crate degrades to a no-op.
pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

/// Reveal an element by dropping the shared hidden class.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1(HIDDEN_CLASS);
}

/// Hide an element by adding the shared hidden class.
pub fn hide(el: &Element) {
    let _ = el.class_list().add_1(HIDDEN_CLASS);
}

/// Log a warning message to the browser console.
///
/// Used for non-fatal glue errors (malformed payloads, mostly) that a
/// template author might want to know about.
pub fn log_warning(msg: &str) {
    web_sys::console::warn_1(&format!("PatentInsight: {msg}").into());
}

/// Run `f` for every element in a static NodeList, skipping non-element nodes.
pub fn for_each_element(list: &NodeList, mut f: impl FnMut(Element)) {
    for i in 0..list.length() {
        if let Some(el) = list.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
            f(el);
        }
    }
}
