//! Browser implementations of the widget seams

use gloo_timers::callback::Timeout;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlScriptElement};

use super::manager::{ScriptHost, Scheduler};

/// Global the loader script reads its settings from
pub const CONFIG_GLOBAL: &str = "wxOConfiguration";

/// Global the loader script exposes once evaluated
const LOADER_GLOBAL: &str = "wxoLoader";

/// The live document
pub struct DomHost;

impl ScriptHost for DomHost {
    fn remove_scripts(&self, marker: &str) -> usize {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return 0;
        };
        let Ok(nodes) = document.query_selector_all(&format!("script[src*=\"{}\"]", marker)) else {
            return 0;
        };

        let mut removed = 0;
        for i in 0..nodes.length() {
            if let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                element.remove();
                removed += 1;
            }
        }
        removed
    }

    fn write_config(&self, config: &Value) -> Result<(), String> {
        let window = web_sys::window().ok_or("No window")?;
        let text = serde_json::to_string(config).map_err(|e| e.to_string())?;
        let object = js_sys::JSON::parse(&text).map_err(|e| format!("{:?}", e))?;

        js_sys::Reflect::set(&window, &JsValue::from_str(CONFIG_GLOBAL), &object)
            .map_err(|e| format!("{:?}", e))?;
        Ok(())
    }

    fn clear_config(&self) {
        if let Some(window) = web_sys::window() {
            let _ = js_sys::Reflect::delete_property(&window, &JsValue::from_str(CONFIG_GLOBAL));
        }
    }

    fn inject_script(&self, src: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(script) = document
            .create_element("script")
            .ok()
            .and_then(|e| e.dyn_into::<HtmlScriptElement>().ok())
        else {
            return;
        };

        script.set_src(src);
        script.set_async(true);

        // Load failures are left to the widget
        let on_load = Closure::once(init_loader);
        let _ = script.add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
        on_load.forget();

        if let Some(head) = document.head() {
            if let Err(e) = head.append_child(&script) {
                web_sys::console::error_1(&format!("Failed to inject chat widget: {:?}", e).into());
            }
        }
    }
}

/// Call `wxoLoader.init()` if the loader exposed it
fn init_loader() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(loader) = js_sys::Reflect::get(&window, &JsValue::from_str(LOADER_GLOBAL)) else {
        return;
    };
    if loader.is_undefined() || loader.is_null() {
        return;
    }

    if let Ok(init) = js_sys::Reflect::get(&loader, &JsValue::from_str("init")) {
        if let Ok(init) = init.dyn_into::<js_sys::Function>() {
            if let Err(e) = init.call0(&loader) {
                web_sys::console::error_1(&format!("Chat widget init failed: {:?}", e).into());
            }
        }
    }
}

/// `setTimeout`-backed scheduler; dropping a `Timeout` clears it
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    type Handle = Timeout;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, task)
    }
}
