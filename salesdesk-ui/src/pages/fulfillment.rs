//! Fulfillment Page
//!
//! Orders waiting for an invoice, each with its own amount field.

use leptos::*;
use std::collections::HashMap;

use crate::api::{self, InvoiceRequest, PendingOrder};
use crate::components::Loading;
use crate::state::global::GlobalState;

/// Invoice amount typed by the user, if it is a usable number
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

/// `2024-01-05` as `Jan 5, 2024`; anything else verbatim
pub fn format_requested(date: &str) -> String {
    let day = date.get(..10).unwrap_or(date);
    chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| date.to_string())
}

/// Fulfillment page component
#[component]
pub fn Fulfillment() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let orders = create_rw_signal(Vec::<PendingOrder>::new());
    let amounts = create_rw_signal(HashMap::<i64, String>::new());
    let processing = create_rw_signal(None::<i64>);
    let (loading, set_loading) = create_signal(false);

    let state_for_load = state.clone();
    let load_pending = move || {
        let state = state_for_load.clone();
        set_loading.set(true);
        spawn_local(async move {
            match api::fetch_pending().await {
                Ok(pending) => orders.set(pending),
                Err(e) => {
                    web_sys::console::error_1(&format!("Error fetching pending orders: {}", e).into());
                    state.show_error(&format!("Failed to load pending orders: {}", e));
                }
            }
            set_loading.set(false);
        });
    };

    load_pending();

    let send_invoice = move |order_id: i64| {
        let raw = amounts.get_untracked().get(&order_id).cloned().unwrap_or_default();
        let Some(amount) = parse_amount(&raw) else {
            state.show_error("Invalid Amount: please enter a valid amount");
            return;
        };

        processing.set(Some(order_id));
        let state = state.clone();
        spawn_local(async move {
            let invoice = InvoiceRequest { sales_id: order_id, amount };
            match api::process_invoice(&invoice).await {
                Ok(()) => {
                    state.show_success("Invoice generated successfully");
                    orders.update(|list| list.retain(|o| o.id != order_id));
                    amounts.update(|map| {
                        map.remove(&order_id);
                    });
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Error processing invoice: {}", e).into());
                    state.show_error(&format!("Failed to generate invoice: {}", e));
                }
            }
            processing.set(None);
        });
    };

    view! {
        <div class="space-y-6">
            <div class="flex flex-col sm:flex-row justify-between items-start sm:items-center gap-4">
                <div>
                    <h1 class="text-3xl sm:text-4xl font-bold">"Fulfillment"</h1>
                    <p class="text-gray-400 mt-1">"Manage pending orders and generate invoices"</p>
                </div>
                <button
                    on:click={
                        let load_pending = load_pending.clone();
                        move |_| load_pending()
                    }
                    disabled=move || loading.get()
                    class="px-4 py-2 rounded-lg text-sm border border-gray-600 hover:bg-gray-700 disabled:opacity-50"
                >
                    "Refresh List"
                </button>
            </div>

            {move || {
                if loading.get() {
                    return view! { <Loading message="Loading pending orders..." /> }.into_view();
                }

                let list = orders.get();
                if list.is_empty() {
                    return view! { <AllCaughtUp /> }.into_view();
                }

                view! {
                    <div class="grid grid-cols-1 gap-4">
                        {list.into_iter().map(|order| view! {
                            <OrderCard
                                order=order
                                amounts=amounts
                                processing=processing
                                on_send=send_invoice.clone()
                            />
                        }).collect_view()}
                    </div>
                }.into_view()
            }}
        </div>
    }
}

#[component]
fn OrderCard(
    order: PendingOrder,
    amounts: RwSignal<HashMap<i64, String>>,
    processing: RwSignal<Option<i64>>,
    on_send: impl Fn(i64) + 'static,
) -> impl IntoView {
    let id = order.id;
    let amount = move || amounts.get().get(&id).cloned().unwrap_or_default();
    let is_processing = move || processing.get() == Some(id);

    view! {
        <div class="bg-gray-800 rounded-xl p-6 border border-gray-700 hover:shadow-lg transition-all">
            <div class="flex flex-col lg:flex-row justify-between gap-6">
                <div class="flex-1 space-y-4">
                    <div class="flex items-start justify-between">
                        <div>
                            <h3 class="text-lg font-semibold">"👤 " {order.customer.clone()}</h3>
                            <div class="text-sm text-gray-400 mt-1">
                                "Requested: "
                                {order.requested_date.as_deref().map(format_requested).unwrap_or_else(|| "-".to_string())}
                            </div>
                        </div>
                        <div class="bg-gray-700 px-3 py-1 rounded-full text-xs font-medium">
                            {format!("ID: #{}", id)}
                        </div>
                    </div>

                    <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                        <div class="p-3 rounded-lg bg-gray-700/50">
                            <p class="text-xs text-gray-400">"Product"</p>
                            <p class="font-medium">{order.product.clone()}</p>
                        </div>
                        <div class="p-3 rounded-lg bg-gray-700/50">
                            <p class="text-xs text-gray-400">"Quantity"</p>
                            <p class="font-medium">{order.quantity}</p>
                        </div>
                    </div>
                </div>

                <div class="flex flex-col justify-end gap-3 lg:w-72 lg:border-l border-gray-700 lg:pl-6">
                    <label class="text-sm font-medium">"Invoice Amount ($)"</label>
                    <input
                        type="number"
                        placeholder="0.00"
                        prop:value=amount
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            amounts.update(|map| {
                                map.insert(id, value);
                            });
                        }
                        class="w-full bg-gray-700 rounded-lg px-4 py-2 text-white border border-gray-600"
                    />
                    <button
                        on:click=move |_| on_send(id)
                        disabled=move || is_processing() || amount().is_empty()
                        class="w-full bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-600 rounded-lg py-2 font-semibold"
                    >
                        {move || if is_processing() { "Processing..." } else { "Send Invoice" }}
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn AllCaughtUp() -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-12 flex flex-col items-center justify-center min-h-[400px] text-center">
            <div class="text-5xl mb-4">"📦"</div>
            <h3 class="text-xl font-semibold mb-2">"All Caught Up!"</h3>
            <p class="text-gray-400">"No pending orders found requiring invoice generation."</p>
        </div>
    }
}
