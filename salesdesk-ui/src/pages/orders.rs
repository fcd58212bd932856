//! Orders Page
//!
//! Order entry form. The chat agent on this page places orders too.

use leptos::*;

use crate::api::{self, CreateOrderRequest};
use crate::state::global::GlobalState;

/// Raw form fields, as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderForm {
    pub customer: String,
    pub product: String,
    pub quantity: String,
    pub tentative_delivery_date: String,
    pub contact_number: String,
}

impl OrderForm {
    fn quantity_value(&self) -> Option<i64> {
        self.quantity.trim().parse::<i64>().ok().filter(|q| *q > 0)
    }

    /// Required fields present and quantity a positive integer
    pub fn is_valid(&self) -> bool {
        !self.customer.trim().is_empty()
            && !self.product.trim().is_empty()
            && self.quantity_value().is_some()
    }

    /// Request body, or `None` while the form is invalid
    pub fn to_request(&self) -> Option<CreateOrderRequest> {
        if !self.is_valid() {
            return None;
        }

        Some(CreateOrderRequest {
            customer: self.customer.trim().to_string(),
            product: self.product.trim().to_string(),
            quantity: self.quantity_value()?,
            tentative_delivery_date: optional(&self.tentative_delivery_date),
            contact_number: optional(&self.contact_number),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Orders page component
#[component]
pub fn Orders() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let form = create_rw_signal(OrderForm::default());
    let (submitting, set_submitting) = create_signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let Some(order) = form.get_untracked().to_request() else {
            return;
        };

        set_submitting.set(true);
        let state = state.clone();
        spawn_local(async move {
            match api::create_order(&order).await {
                Ok(_) => {
                    state.show_success("Order created successfully");
                    form.update(OrderForm::reset);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("Error creating order: {}", e).into());
                    state.show_error(&e);
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="flex items-center justify-center">
            <div class="w-full max-w-2xl bg-gray-800 rounded-xl p-8">
                <h1 class="text-4xl font-bold mb-2">"Create New Order"</h1>
                <p class="text-gray-400 mb-8">"Fill in the details to place a new order"</p>

                <form on:submit=on_submit class="space-y-6">
                    <FormField
                        label="Customer Name *"
                        placeholder="Enter customer or company name"
                        value=Signal::derive(move || form.get().customer)
                        on_input=move |v| form.update(|f| f.customer = v)
                    />
                    <FormField
                        label="Product Name *"
                        placeholder="Enter product name"
                        value=Signal::derive(move || form.get().product)
                        on_input=move |v| form.update(|f| f.product = v)
                    />
                    <FormField
                        label="Quantity *"
                        input_type="number"
                        placeholder="Enter quantity"
                        value=Signal::derive(move || form.get().quantity)
                        on_input=move |v| form.update(|f| f.quantity = v)
                    />
                    <FormField
                        label="Tentative Delivery Date"
                        input_type="date"
                        value=Signal::derive(move || form.get().tentative_delivery_date)
                        on_input=move |v| form.update(|f| f.tentative_delivery_date = v)
                    />
                    <FormField
                        label="Contact Number"
                        input_type="tel"
                        placeholder="Optional"
                        value=Signal::derive(move || form.get().contact_number)
                        on_input=move |v| form.update(|f| f.contact_number = v)
                    />

                    <button
                        type="submit"
                        disabled=move || submitting.get() || !form.get().is_valid()
                        class="w-full bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-600
                               disabled:cursor-not-allowed rounded-lg py-3 font-semibold
                               transition-colors flex items-center justify-center space-x-2"
                    >
                        {move || if submitting.get() {
                            view! {
                                <div class="loading-spinner w-5 h-5" />
                                <span>"Creating Order..."</span>
                            }.into_view()
                        } else {
                            view! { <span>"Create Order"</span> }.into_view()
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}

#[component]
fn FormField(
    label: &'static str,
    #[prop(default = "text")]
    input_type: &'static str,
    #[prop(default = "")]
    placeholder: &'static str,
    value: Signal<String>,
    on_input: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <div class="space-y-2">
            <label class="block text-sm text-gray-400">{label}</label>
            <input
                type=input_type
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| on_input(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-4 py-3 text-white
                       border border-gray-600 focus:border-emerald-500 focus:outline-none"
            />
        </div>
    }
}
