//! Toasts for order, invoice and report outcomes.
//!
//! Messages of the form `"Invalid Amount: please enter a valid amount"` are
//! shown as a bold title over a detail line.

use leptos::*;

use crate::state::global::GlobalState;

/// Split `"Title: detail"` into its parts
///
/// Messages without a separator are all title.
pub fn split_title(message: &str) -> (&str, Option<&str>) {
    match message.split_once(": ") {
        Some((title, detail)) if !title.is_empty() && !detail.is_empty() => {
            (title, Some(detail))
        }
        _ => (message, None),
    }
}

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let success = state.success;
    let error = state.error;

    view! {
        <div class="fixed bottom-20 left-4 z-50 flex flex-col gap-2 max-w-sm">
            {move || success.get().map(|message| view! {
                <Notice message=message outcome=Outcome::Done on_dismiss=move || success.set(None) />
            })}
            {move || error.get().map(|message| view! {
                <Notice message=message outcome=Outcome::Failed on_dismiss=move || error.set(None) />
            })}
        </div>
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Outcome {
    Done,
    Failed,
}

impl Outcome {
    fn classes(self) -> &'static str {
        match self {
            Outcome::Done => "bg-emerald-600 border-emerald-700",
            Outcome::Failed => "bg-rose-600 border-rose-700",
        }
    }
}

#[component]
fn Notice<F>(message: String, outcome: Outcome, on_dismiss: F) -> impl IntoView
where
    F: Fn() + 'static,
{
    let (title, detail) = split_title(&message);
    let title = title.to_string();
    let detail = detail.map(str::to_string);

    view! {
        <div
            role="status"
            class=format!("flex items-start gap-3 border text-white px-4 py-3 rounded-lg shadow-lg {}", outcome.classes())
        >
            <div class="flex-1">
                <p class="text-sm font-semibold">{title}</p>
                {detail.map(|d| view! { <p class="text-xs opacity-90">{d}</p> })}
            </div>
            <button
                class="text-white/80 hover:text-white text-sm"
                aria-label="Dismiss"
                on:click=move |_| on_dismiss()
            >
                "×"
            </button>
        </div>
    }
}
