use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlImageElement};

use crate::dom::{self, hide, show};

/// Panels are tagged with this class by the content templates.
const PANEL_SELECTOR: &str = ".simulation-section";

const LOADING_ID: &str = "simulationLoading";
const RESULTS_ID: &str = "simulationResults";
const ERROR_ID: &str = "simulationError";
const OUTPUT_ID: &str = "simulationOutput";
const PLOTS_ID: &str = "simulationPlots";
const RUN_BTN_ID: &str = "runSimulationBtn";
const RESET_BTN_ID: &str = "resetSimulationBtn";

/// Payload produced by a simulation run.
///
/// The server response carries extra bookkeeping fields (`success`), which
/// are ignored here; absent fields deserialize to `None` and leave the
/// corresponding region untouched.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Captured stdout of the run. Only written when non-empty.
    #[serde(default)]
    pub output: Option<String>,
    /// Base64-encoded PNG plot images, rendered in order.
    #[serde(default)]
    pub plots: Option<Vec<String>>,
}

impl SimulationResult {
    /// Payload used by the reset button: clears the plots and leaves the
    /// panel in the results state.
    pub fn cleared() -> Self {
        Self {
            output: Some(String::new()),
            plots: Some(Vec::new()),
        }
    }
}

fn plot_data_uri(blob: &str) -> String {
    format!("data:image/png;base64,{blob}")
}

fn plot_alt_label(index: usize) -> String {
    format!("Simulation Plot {}", index + 1)
}

/// Visibility controller for one simulation panel.
///
/// Exported to page JS: the templates' inline scripts construct one for
/// the panel they drive and call `showResults` / `showError` on it once
/// the run finishes. A controller whose container id resolves to nothing
/// is permanently disabled; every operation on it is a no-op.
#[wasm_bindgen]
#[derive(Clone)]
pub struct SimulationPanel {
    container: Option<Element>,
}

#[wasm_bindgen]
impl SimulationPanel {
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> SimulationPanel {
        let container = dom::document().and_then(|doc| doc.get_element_by_id(container_id));
        SimulationPanel { container }
    }

    /// Reveal the loading region and hide both outcome regions.
    #[wasm_bindgen(js_name = showLoading)]
    pub fn show_loading(&self) {
        let Some(container) = &self.container else {
            return;
        };
        if let Some(loading) = region(container, LOADING_ID) {
            show(&loading);
        }
        if let Some(results) = region(container, RESULTS_ID) {
            hide(&results);
        }
        if let Some(error) = region(container, ERROR_ID) {
            hide(&error);
        }
    }

    /// Render a finished run. The payload is a plain JS object shaped like
    /// `{output: string, plots: [base64, ...]}`; malformed payloads are
    /// logged and ignored.
    #[wasm_bindgen(js_name = showResults)]
    pub fn show_results(&self, payload: JsValue) {
        match serde_wasm_bindgen::from_value::<SimulationResult>(payload) {
            Ok(result) => self.render_results(&result),
            Err(e) => dom::log_warning(&format!("ignoring malformed simulation result: {e}")),
        }
    }

    /// Reveal the error region with `message` as its text.
    #[wasm_bindgen(js_name = showError)]
    pub fn show_error(&self, message: &str) {
        let Some(container) = &self.container else {
            return;
        };
        if let Some(loading) = region(container, LOADING_ID) {
            hide(&loading);
        }
        if let Some(error) = region(container, ERROR_ID) {
            error.set_text_content(Some(message));
            show(&error);
        }
    }
}

impl SimulationPanel {
    /// Typed counterpart of `showResults`, used by the reset binding.
    pub fn render_results(&self, result: &SimulationResult) {
        let Some(container) = &self.container else {
            return;
        };
        if let Some(loading) = region(container, LOADING_ID) {
            hide(&loading);
        }
        if let Some(results) = region(container, RESULTS_ID) {
            show(&results);
        }

        // Empty output is not written, so a reset keeps prior text.
        if let Some(output) = result.output.as_deref().filter(|s| !s.is_empty()) {
            if let Some(node) = region(container, OUTPUT_ID) {
                node.set_text_content(Some(output));
            }
        }

        // An empty plot list still clears previously rendered images;
        // an absent one leaves them alone.
        if let Some(plots) = &result.plots {
            if let Some(plots_node) = region(container, PLOTS_ID) {
                plots_node.set_inner_html("");
                for (index, blob) in plots.iter().enumerate() {
                    if let Some(img) = build_plot_image(index, blob) {
                        let _ = plots_node.append_child(&img);
                    }
                }
            }
        }
    }
}

/// Look up a panel sub-region by id, scoped to the container.
fn region(container: &Element, id: &str) -> Option<Element> {
    container.query_selector(&format!("#{id}")).ok().flatten()
}

fn build_plot_image(index: usize, blob: &str) -> Option<HtmlImageElement> {
    let img = dom::document()?
        .create_element("img")
        .ok()?
        .dyn_into::<HtmlImageElement>()
        .ok()?;
    img.set_src(&plot_data_uri(blob));
    img.set_class_name("simulation-plots img-fluid mb-3");
    img.set_alt(&plot_alt_label(index));
    let _ = img.set_attribute("loading", "lazy");
    Some(img)
}

/// Find every simulation panel on the page and wire up its buttons.
///
/// The run button only enters the loading state; the actual run (and the
/// eventual `showResults` / `showError` call) is driven by the content
/// template's inline script.
pub fn init() {
    let Some(document) = dom::document() else {
        return;
    };
    let Ok(panels) = document.query_selector_all(PANEL_SELECTOR) else {
        return;
    };
    dom::for_each_element(&panels, |panel_el| bind_panel(&panel_el));
}

fn bind_panel(panel_el: &Element) {
    let panel = SimulationPanel::new(&panel_el.id());

    if let Some(run) = region(panel_el, RUN_BTN_ID) {
        let panel = panel.clone();
        bind_click(&run, move || panel.show_loading());
    }
    if let Some(reset) = region(panel_el, RESET_BTN_ID) {
        let panel = panel.clone();
        bind_click(&reset, move || {
            panel.render_results(&SimulationResult::cleared())
        });
    }
}

fn bind_click(target: &Element, handler: impl Fn() + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn Fn()>);
    let _ = target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_parses_full_server_response() {
        let json = r#"{"success": true, "output": "t = 0.5s", "plots": ["aGVsbG8="]}"#;
        let result: SimulationResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.output.as_deref(), Some("t = 0.5s"));
        assert_eq!(result.plots.as_deref(), Some(&["aGVsbG8=".to_string()][..]));
    }

    #[test]
    fn result_tolerates_missing_fields() {
        let result: SimulationResult = serde_json::from_str("{}").unwrap();
        assert!(result.output.is_none());
        assert!(result.plots.is_none());
    }

    #[test]
    fn cleared_result_carries_empty_output_and_plots() {
        let cleared = SimulationResult::cleared();
        assert_eq!(cleared.output.as_deref(), Some(""));
        assert_eq!(cleared.plots.as_deref(), Some(&[][..]));
    }

    #[test]
    fn plot_data_uri_wraps_blob() {
        assert_eq!(
            plot_data_uri("aGVsbG8="),
            "data:image/png;base64,aGVsbG8="
        );
    }

    #[test]
    fn plot_alt_labels_are_one_based() {
        assert_eq!(plot_alt_label(0), "Simulation Plot 1");
        assert_eq!(plot_alt_label(2), "Simulation Plot 3");
    }
}
