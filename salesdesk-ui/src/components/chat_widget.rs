//! Chat Widget Component
//!
//! Keeps the embedded chat agent in step with navigation: each route asks
//! the gateway which agent to use and remounts the widget when it changes.

use leptos::*;
use leptos_router::use_location;
use std::cell::Cell;
use std::rc::Rc;

use crate::api::{self, WidgetConfigResponse};
use crate::widget::{DomHost, GlooScheduler, WidgetManager, WidgetSpec};

const DEFAULT_ROOT_ELEMENT_ID: &str = "watsonx-chat-root";

impl From<WidgetConfigResponse> for WidgetSpec {
    fn from(response: WidgetConfigResponse) -> Self {
        WidgetSpec {
            config: response.config,
            loader_url: response.loader_url,
            delay_ms: response.injection_delay_ms,
        }
    }
}

#[component]
pub fn ChatWidget() -> impl IntoView {
    let manager = Rc::new(WidgetManager::new(DomHost, GlooScheduler));
    let disposed = Rc::new(Cell::new(false));
    let pathname = use_location().pathname;
    let root_id = create_rw_signal(DEFAULT_ROOT_ELEMENT_ID.to_string());

    let effect_manager = Rc::clone(&manager);
    let effect_disposed = Rc::clone(&disposed);
    create_effect(move |_| {
        let route = pathname.get();
        let manager = Rc::clone(&effect_manager);
        let disposed = Rc::clone(&effect_disposed);

        spawn_local(async move {
            let response = match api::fetch_widget_config(&route).await {
                Ok(response) => response,
                Err(e) => {
                    web_sys::console::error_1(&format!("Chat widget unavailable: {}", e).into());
                    return;
                }
            };

            // Navigated away (or torn down) while the request was in flight
            if disposed.get() || pathname.get_untracked() != route {
                return;
            }

            if let Some(id) = response.config["rootElementID"].as_str() {
                root_id.set(id.to_string());
            }
            if let Err(e) = manager.mount(response.into()) {
                web_sys::console::error_1(&format!("Chat widget mount failed: {}", e).into());
            }
        });
    });

    on_cleanup(move || {
        disposed.set(true);
        manager.unmount();
    });

    view! { <div id=move || root_id.get() /> }
}
