pub mod dom;
pub mod nav;
pub mod simulation;
pub mod typeset;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

pub use simulation::{SimulationPanel, SimulationResult};

#[cfg(all(test, target_arch = "wasm32"))]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

/// Run `f` once the document has finished parsing.
///
/// The WASM module is usually loaded as a deferred module script, in which
/// case the DOM is already complete and `f` runs immediately; a one-shot
/// `DOMContentLoaded` listener covers the early-load case.
fn run_when_ready(f: impl FnOnce() + 'static) {
    let Some(document) = dom::document() else {
        return;
    };
    if document.ready_state() != "loading" {
        f();
        return;
    }

    let closure = Closure::once(Box::new(f) as Box<dyn FnOnce()>);
    let _ = document
        .add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Wire up every page enhancement.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    run_when_ready(|| {
        typeset::init();
        nav::init();
        simulation::init();
    });
}
