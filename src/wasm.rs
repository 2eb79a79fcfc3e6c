//! Browser bindings.
//!
//! Compiled only for `wasm32-unknown-unknown`. The page script constructs a
//! [`StatusPage`] once the document is ready and wires the retry button to
//! [`StatusPage::retry`]:
//!
//! ```javascript
//! import init, { StatusPage } from "./pkg/hadash_status.js";
//!
//! await init();
//! const page = new StatusPage(window.location.origin);
//! page.start();
//! document.getElementById("retry-button").onclick = () => page.retry();
//! ```

use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::{status_url, ElementSink, RequestExecutor, StatusPoller, StatusPresenter};

/// [`ElementSink`] backed by the live document.
#[derive(Debug, Clone)]
pub struct DomElements {
    document: web_sys::Document,
}

impl DomElements {
    /// Returns `None` outside a window context (e.g. in a worker).
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    fn element(&self, id: &str) -> Option<web_sys::Element> {
        self.document.get_element_by_id(id)
    }
}

impl ElementSink for DomElements {
    fn set_text(&self, id: &str, text: &str) {
        if let Some(element) = self.element(id) {
            element.set_text_content(Some(text));
        }
    }

    fn add_class(&self, id: &str, class: &str) {
        if let Some(element) = self.element(id) {
            if let Err(err) = element.class_list().add_1(class) {
                report_dom_error("add class", id, &err);
            }
        }
    }

    fn remove_class(&self, id: &str, class: &str) {
        if let Some(element) = self.element(id) {
            if let Err(err) = element.class_list().remove_1(class) {
                report_dom_error("remove class", id, &err);
            }
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(element) = self.element(id) {
            let result = if hidden {
                element.set_attribute("hidden", "")
            } else {
                element.remove_attribute("hidden")
            };
            if let Err(err) = result {
                report_dom_error("toggle hidden", id, &err);
            }
        }
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn report_dom_error(operation: &str, id: &str, err: &JsValue) {
    #[cfg(feature = "tracing")]
    tracing::warn!(operation, element = id, error = ?err, "DOM update failed");
}

/// WASM-exported handle to the status poller of the configuration page.
#[wasm_bindgen]
pub struct StatusPage {
    poller: Rc<StatusPoller<StatusPresenter<DomElements>>>,
}

#[wasm_bindgen]
impl StatusPage {
    /// Creates a page handle polling `{base_url}/api/status`.
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: &str) -> Result<StatusPage, JsValue> {
        let elements = DomElements::from_window()
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let poller = StatusPoller::new(
            RequestExecutor::new(),
            status_url(base_url),
            StatusPresenter::new(elements),
        );
        Ok(StatusPage {
            poller: Rc::new(poller),
        })
    }

    /// Runs the initial cycle. Later calls do nothing.
    pub fn start(&self) {
        let poller = Rc::clone(&self.poller);
        spawn_local(async move {
            let _ = poller.start().await;
        });
    }

    /// Starts a fresh cycle; an in-flight cycle keeps running but can no
    /// longer update the page.
    pub fn retry(&self) {
        let poller = Rc::clone(&self.poller);
        spawn_local(async move {
            let _ = poller.retry().await;
        });
    }
}
